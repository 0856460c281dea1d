pub mod barn;
pub mod finances;
pub mod fitness;
pub mod records;

use crate::barn::STALLS;
use crate::dates::{month_key, parse_date, today};
use crate::errors::AppError;
use crate::finances::monthly_summary;
use crate::fitness::daily_log;
use crate::occupancy::{group_by_stall, resolve_stalls, StallState};
use crate::state::AppState;
use crate::ui::{render_index, HomeSummary};
use axum::{extract::State, response::Html, Json};
use chrono::NaiveDate;
use serde_json::{json, Value};

pub async fn index(State(state): State<AppState>) -> Html<String> {
    let today = today();
    let data = state.data.lock().await;

    let grouped = group_by_stall(&data.occupancies);
    let statuses = resolve_stalls(&STALLS, &grouped, today);
    let count = |wanted: StallState| {
        statuses
            .iter()
            .filter(|(_, status)| status.state == wanted)
            .count()
    };

    let summary = HomeSummary {
        today,
        occupied: count(StallState::Occupied),
        scheduled: count(StallState::Scheduled),
        empty: count(StallState::Empty),
        month: monthly_summary(&data.transactions, &month_key(today)),
        fitness: daily_log(&data.fitness_logs, today).totals,
    };
    Html(render_index(&summary))
}

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Blank means absent. Anything else must be a `YYYY-MM-DD` date.
pub(crate) fn optional_date(field: &str, value: Option<&str>) -> Result<Option<NaiveDate>, AppError> {
    match value.map(str::trim).filter(|value| !value.is_empty()) {
        Some(raw) => parse_date(raw)
            .map(Some)
            .ok_or_else(|| AppError::bad_request(format!("{field} must be a YYYY-MM-DD date, got {raw:?}"))),
        None => Ok(None),
    }
}

pub(crate) fn date_or_today(field: &str, value: Option<&str>) -> Result<NaiveDate, AppError> {
    Ok(optional_date(field, value)?.unwrap_or_else(today))
}

pub(crate) fn optional_number(field: &str, value: Option<&str>) -> Result<Option<f64>, AppError> {
    match value.map(str::trim).filter(|value| !value.is_empty()) {
        Some(raw) => raw
            .parse::<f64>()
            .ok()
            .filter(|number| number.is_finite())
            .map(Some)
            .ok_or_else(|| AppError::bad_request(format!("{field} must be a number, got {raw:?}"))),
        None => Ok(None),
    }
}

pub(crate) fn required_number(field: &str, value: Option<&str>) -> Result<f64, AppError> {
    optional_number(field, value)?.ok_or_else(|| AppError::unprocessable(format!("{field} is required")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn blank_dates_are_absent_and_garbage_is_rejected() {
        assert_eq!(optional_date("as_of", None).unwrap(), None);
        assert_eq!(optional_date("as_of", Some("  ")).unwrap(), None);
        assert_eq!(
            optional_date("as_of", Some("2024-02-29")).unwrap(),
            NaiveDate::from_ymd_opt(2024, 2, 29)
        );
        let err = optional_date("as_of", Some("2023-02-29")).unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
    }

    #[test]
    fn numbers_parse_or_fail_with_status() {
        assert_eq!(optional_number("rate", Some(" 450.5 ")).unwrap(), Some(450.5));
        assert_eq!(optional_number("rate", Some("")).unwrap(), None);
        assert_eq!(
            optional_number("rate", Some("lots")).unwrap_err().status,
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            required_number("minutes", None).unwrap_err().status,
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }
}
