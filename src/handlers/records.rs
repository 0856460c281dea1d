//! JSON CRUD shared by every stored record type.

use crate::collection::{Document, ListQuery};
use crate::errors::AppError;
use crate::models::Stored;
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use chrono::Utc;
use tracing::info;

pub fn routes<T: Stored>() -> Router<AppState> {
    Router::new()
        .route("/", get(list::<T>).post(create::<T>))
        .route("/:id", get(fetch::<T>).put(replace::<T>).delete(remove::<T>))
}

pub async fn list<T: Stored>(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Json<Vec<Document<T>>> {
    let data = state.data.lock().await;
    let rows = T::collection(&data)
        .query(&query)
        .into_iter()
        .cloned()
        .collect();
    Json(rows)
}

pub async fn create<T: Stored>(
    State(state): State<AppState>,
    Json(fields): Json<T>,
) -> Result<(StatusCode, Json<Document<T>>), AppError> {
    let doc = state
        .mutate(|data| T::collection_mut(data).insert(fields, Utc::now()).cloned())
        .await?;
    info!("created {} record {}", T::STORE, doc.id);
    Ok((StatusCode::CREATED, Json(doc)))
}

pub async fn fetch<T: Stored>(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Document<T>>, AppError> {
    let data = state.data.lock().await;
    let doc = T::collection(&data).require(&id)?.clone();
    Ok(Json(doc))
}

pub async fn replace<T: Stored>(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(fields): Json<T>,
) -> Result<Json<Document<T>>, AppError> {
    let doc = state
        .mutate(|data| T::collection_mut(data).replace(&id, fields).cloned())
        .await?;
    info!("replaced {} record {id}", T::STORE);
    Ok(Json(doc))
}

pub async fn remove<T: Stored>(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    state
        .mutate(|data| T::collection_mut(data).remove(&id).map(|_| ()))
        .await?;
    info!("deleted {} record {id}", T::STORE);
    Ok(StatusCode::NO_CONTENT)
}
