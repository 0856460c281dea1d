use super::{date_or_today, optional_number, required_number};
use crate::collection::{Document, ListQuery};
use crate::dates::today;
use crate::errors::AppError;
use crate::fitness::{daily_log, exercise_entry, food_entry, Exercise, Food, LogEntry};
use crate::state::AppState;
use crate::ui::fitness::render_fitness;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    Form, Json,
};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use tracing::info;

#[derive(Debug, Default, Deserialize)]
pub struct DateQuery {
    pub date: Option<String>,
}

impl DateQuery {
    fn resolve(&self) -> Result<NaiveDate, AppError> {
        date_or_today("date", self.date.as_deref())
    }
}

fn day_redirect(date: NaiveDate) -> Redirect {
    Redirect::to(&format!("/fitness?date={date}"))
}

pub async fn page(
    State(state): State<AppState>,
    Query(query): Query<DateQuery>,
) -> Result<Html<String>, AppError> {
    let date = query.resolve()?;
    let data = state.data.lock().await;
    let log = daily_log(&data.fitness_logs, date);
    let foods = data.foods.query(&ListQuery::default());
    let exercises = data.exercises.query(&ListQuery::default());
    Ok(Html(render_fitness(&log, &foods, &exercises)))
}

pub async fn daily(
    State(state): State<AppState>,
    Query(query): Query<DateQuery>,
) -> Result<Response, AppError> {
    let date = query.resolve()?;
    let data = state.data.lock().await;
    Ok(Json(daily_log(&data.fitness_logs, date)).into_response())
}

async fn log_food(
    state: &AppState,
    date: NaiveDate,
    food_id: &str,
    servings: f64,
) -> Result<Document<LogEntry>, AppError> {
    let doc = state
        .mutate(|data| {
            let entry = food_entry(date, data.foods.require(food_id)?, servings)?;
            data.fitness_logs.insert(entry, Utc::now()).cloned()
        })
        .await?;
    info!("logged food {} on {date}", doc.fields.name);
    Ok(doc)
}

async fn log_exercise(
    state: &AppState,
    date: NaiveDate,
    exercise_id: &str,
    minutes: f64,
    weight_kg: f64,
    note: &str,
) -> Result<Document<LogEntry>, AppError> {
    let doc = state
        .mutate(|data| {
            let exercise = data.exercises.require(exercise_id)?;
            let entry = exercise_entry(date, exercise, minutes, weight_kg, note)?;
            data.fitness_logs.insert(entry, Utc::now()).cloned()
        })
        .await?;
    info!("logged exercise {} on {date}", doc.fields.name);
    Ok(doc)
}

#[derive(Debug, Deserialize)]
pub struct FoodLogRequest {
    pub date: Option<NaiveDate>,
    pub food_id: String,
    pub servings: f64,
}

pub async fn api_log_food(
    State(state): State<AppState>,
    Json(request): Json<FoodLogRequest>,
) -> Result<(StatusCode, Json<Document<LogEntry>>), AppError> {
    let date = request.date.unwrap_or_else(today);
    let doc = log_food(&state, date, &request.food_id, request.servings).await?;
    Ok((StatusCode::CREATED, Json(doc)))
}

#[derive(Debug, Deserialize)]
pub struct ExerciseLogRequest {
    pub date: Option<NaiveDate>,
    pub exercise_id: String,
    pub minutes: f64,
    pub weight_kg: f64,
    #[serde(default)]
    pub note: String,
}

pub async fn api_log_exercise(
    State(state): State<AppState>,
    Json(request): Json<ExerciseLogRequest>,
) -> Result<(StatusCode, Json<Document<LogEntry>>), AppError> {
    let date = request.date.unwrap_or_else(today);
    let doc = log_exercise(
        &state,
        date,
        &request.exercise_id,
        request.minutes,
        request.weight_kg,
        &request.note,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(doc)))
}

#[derive(Debug, Default, Deserialize)]
pub struct FoodLogForm {
    pub date: Option<String>,
    pub food_id: Option<String>,
    pub servings: Option<String>,
}

pub async fn log_food_form(
    State(state): State<AppState>,
    Form(form): Form<FoodLogForm>,
) -> Result<Redirect, AppError> {
    let date = date_or_today("date", form.date.as_deref())?;
    let servings = required_number("servings", form.servings.as_deref())?;
    log_food(&state, date, form.food_id.as_deref().unwrap_or_default(), servings).await?;
    Ok(day_redirect(date))
}

#[derive(Debug, Default, Deserialize)]
pub struct ExerciseLogForm {
    pub date: Option<String>,
    pub exercise_id: Option<String>,
    pub minutes: Option<String>,
    pub weight_kg: Option<String>,
    pub note: Option<String>,
}

pub async fn log_exercise_form(
    State(state): State<AppState>,
    Form(form): Form<ExerciseLogForm>,
) -> Result<Redirect, AppError> {
    let date = date_or_today("date", form.date.as_deref())?;
    let minutes = required_number("minutes", form.minutes.as_deref())?;
    let weight_kg = required_number("weight_kg", form.weight_kg.as_deref())?;
    log_exercise(
        &state,
        date,
        form.exercise_id.as_deref().unwrap_or_default(),
        minutes,
        weight_kg,
        form.note.as_deref().unwrap_or_default(),
    )
    .await?;
    Ok(day_redirect(date))
}

#[derive(Debug, Default, Deserialize)]
pub struct FoodForm {
    pub name: Option<String>,
    pub serving: Option<String>,
    pub calories: Option<String>,
    pub protein: Option<String>,
    pub date: Option<String>,
}

pub async fn create_food_form(
    State(state): State<AppState>,
    Form(form): Form<FoodForm>,
) -> Result<Redirect, AppError> {
    let date = date_or_today("date", form.date.as_deref())?;
    let food = Food {
        name: form.name.unwrap_or_default(),
        serving: form.serving.unwrap_or_default(),
        calories: required_number("calories", form.calories.as_deref())?,
        protein: optional_number("protein", form.protein.as_deref())?.unwrap_or_default(),
    };
    let id = state
        .mutate(|data| data.foods.insert(food, Utc::now()).map(|doc| doc.id.clone()))
        .await?;
    info!("created food {id}");
    Ok(day_redirect(date))
}

#[derive(Debug, Default, Deserialize)]
pub struct ExerciseForm {
    pub name: Option<String>,
    pub met: Option<String>,
    pub date: Option<String>,
}

pub async fn create_exercise_form(
    State(state): State<AppState>,
    Form(form): Form<ExerciseForm>,
) -> Result<Redirect, AppError> {
    let date = date_or_today("date", form.date.as_deref())?;
    let exercise = Exercise {
        name: form.name.unwrap_or_default(),
        met: required_number("met", form.met.as_deref())?,
    };
    let id = state
        .mutate(|data| data.exercises.insert(exercise, Utc::now()).map(|doc| doc.id.clone()))
        .await?;
    info!("created exercise {id}");
    Ok(day_redirect(date))
}

pub async fn delete_log_form(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Form(query): Form<DateQuery>,
) -> Result<Redirect, AppError> {
    let date = query.resolve()?;
    state
        .mutate(|data| data.fitness_logs.remove(&id).map(|_| ()))
        .await?;
    info!("deleted fitness log {id}");
    Ok(day_redirect(date))
}
