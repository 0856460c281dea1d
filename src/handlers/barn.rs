use super::{date_or_today, optional_date, optional_number};
use crate::barn::{find_stall, PercentRect, PixelRect, STALLS};
use crate::collection::Document;
use crate::dates::today;
use crate::errors::AppError;
use crate::occupancy::{group_by_stall, resolve_stalls, stall_history, OccupancyRecord, StallState};
use crate::state::AppState;
use crate::ui::barn::render_barn;
use crate::view::{build_board, BarnQuery, BarnView, StatusFilter};
use axum::{
    extract::{Path, Query, State},
    response::{Html, Redirect},
    Form, Json,
};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

pub async fn page(
    State(state): State<AppState>,
    Query(query): Query<BarnQuery>,
) -> Html<String> {
    let view = BarnView::from_query(&query, today());
    let data = state.data.lock().await;
    let board = build_board(view, &data.occupancies);
    let editing = query
        .edit
        .as_deref()
        .and_then(|id| data.occupancies.get(id));
    Html(render_barn(&board, &state.barn_image, editing))
}

/// Fields posted by the occupancy form. The `view_*` fields carry the page
/// state to return to.
#[derive(Debug, Default, Deserialize)]
pub struct OccupancyForm {
    pub stall_id: Option<String>,
    pub horse_name: Option<String>,
    pub owner_name: Option<String>,
    pub arrival_date: Option<String>,
    pub departure_date: Option<String>,
    pub monthly_rate: Option<String>,
    pub notes: Option<String>,
    #[serde(flatten)]
    pub view: ViewForm,
}

#[derive(Debug, Default, Deserialize)]
pub struct ViewForm {
    pub view_as_of: Option<String>,
    pub view_filter: Option<String>,
    pub view_stall: Option<String>,
}

impl ViewForm {
    /// Rebuilt through [`BarnView`] so only barn pages can be redirect targets.
    fn redirect(&self) -> Redirect {
        let query = BarnQuery {
            as_of: self.view_as_of.clone(),
            filter: self.view_filter.clone(),
            stall: self.view_stall.clone(),
            edit: None,
        };
        Redirect::to(&BarnView::from_query(&query, today()).href())
    }
}

impl OccupancyForm {
    fn to_record(&self) -> Result<OccupancyRecord, AppError> {
        Ok(OccupancyRecord {
            stall_id: self
                .stall_id
                .as_deref()
                .map(str::trim)
                .filter(|id| !id.is_empty())
                .map(str::to_string),
            horse_name: self.horse_name.clone().unwrap_or_default(),
            owner_name: self.owner_name.clone().unwrap_or_default(),
            arrival_date: optional_date("arrival_date", self.arrival_date.as_deref())?,
            departure_date: optional_date("departure_date", self.departure_date.as_deref())?,
            monthly_rate: optional_number("monthly_rate", self.monthly_rate.as_deref())?,
            notes: self.notes.clone(),
        })
    }
}

pub async fn create_form(
    State(state): State<AppState>,
    Form(form): Form<OccupancyForm>,
) -> Result<Redirect, AppError> {
    let record = form.to_record()?;
    let id = state
        .mutate(|data| {
            data.occupancies
                .insert(record, Utc::now())
                .map(|doc| doc.id.clone())
        })
        .await?;
    info!("created occupancy {id}");
    Ok(form.view.redirect())
}

pub async fn update_form(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Form(form): Form<OccupancyForm>,
) -> Result<Redirect, AppError> {
    let record = form.to_record()?;
    state
        .mutate(|data| data.occupancies.replace(&id, record).map(|_| ()))
        .await?;
    info!("updated occupancy {id}");
    Ok(form.view.redirect())
}

pub async fn delete_form(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Form(view): Form<ViewForm>,
) -> Result<Redirect, AppError> {
    state
        .mutate(|data| data.occupancies.remove(&id).map(|_| ()))
        .await?;
    info!("deleted occupancy {id}");
    Ok(view.redirect())
}

#[derive(Debug, Serialize)]
pub struct StallInfo {
    pub id: &'static str,
    pub number: u8,
    pub rect: PixelRect,
    pub percent: Option<PercentRect>,
}

pub async fn stalls(State(state): State<AppState>) -> Json<Vec<StallInfo>> {
    let size = state.barn_image.size;
    let stalls = STALLS
        .iter()
        .map(|stall| StallInfo {
            id: stall.id,
            number: stall.number,
            rect: stall.rect,
            percent: stall.rect.to_percent(size),
        })
        .collect();
    Json(stalls)
}

#[derive(Debug, Default, Deserialize)]
pub struct StatusQuery {
    pub as_of: Option<String>,
    pub filter: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct StallStatusEntry {
    pub stall_id: &'static str,
    pub number: u8,
    pub state: StallState,
    pub record: Option<Document<OccupancyRecord>>,
}

#[derive(Debug, Serialize)]
pub struct StatusCounts {
    pub occupied: usize,
    pub scheduled: usize,
    pub empty: usize,
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub as_of: NaiveDate,
    pub filter: StatusFilter,
    /// Counted over every stall, before the filter is applied.
    pub counts: StatusCounts,
    pub stalls: Vec<StallStatusEntry>,
}

pub async fn status(
    State(state): State<AppState>,
    Query(query): Query<StatusQuery>,
) -> Result<Json<StatusResponse>, AppError> {
    let as_of = date_or_today("as_of", query.as_of.as_deref())?;
    let filter = match query.filter.as_deref().map(str::trim).filter(|f| !f.is_empty()) {
        Some(raw) => StatusFilter::parse(raw)
            .ok_or_else(|| AppError::bad_request(format!("unknown filter {raw:?}")))?,
        None => StatusFilter::All,
    };

    let data = state.data.lock().await;
    let grouped = group_by_stall(&data.occupancies);
    let statuses = resolve_stalls(&STALLS, &grouped, as_of);

    let mut counts = StatusCounts {
        occupied: 0,
        scheduled: 0,
        empty: 0,
    };
    for (_, status) in &statuses {
        match status.state {
            StallState::Occupied => counts.occupied += 1,
            StallState::Scheduled => counts.scheduled += 1,
            StallState::Empty => counts.empty += 1,
        }
    }

    let stalls = statuses
        .into_iter()
        .filter(|(_, status)| filter.admits(status.state))
        .map(|(stall, status)| StallStatusEntry {
            stall_id: stall.id,
            number: stall.number,
            state: status.state,
            record: status.record.cloned(),
        })
        .collect();

    Ok(Json(StatusResponse {
        as_of,
        filter,
        counts,
        stalls,
    }))
}

pub async fn history(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<Document<OccupancyRecord>>>, AppError> {
    let stall = find_stall(&id).ok_or_else(|| AppError::not_found(format!("unknown stall: {id}")))?;
    let data = state.data.lock().await;
    let records = stall_history(stall.id, &data.occupancies)
        .into_iter()
        .cloned()
        .collect();
    Ok(Json(records))
}
