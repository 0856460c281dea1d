use crate::finances::Transaction;
use crate::fitness::{Exercise, Food, LogEntry};
use crate::handlers::{self, barn, finances, fitness, records};
use crate::occupancy::OccupancyRecord;
use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/health", get(handlers::health))
        // barn
        .route("/barn", get(barn::page))
        .route("/barn/occupancies", post(barn::create_form))
        .route("/barn/occupancies/:id", post(barn::update_form))
        .route("/barn/occupancies/:id/delete", post(barn::delete_form))
        .route("/api/barn/stalls", get(barn::stalls))
        .route("/api/barn/status", get(barn::status))
        .route("/api/barn/stalls/:id/history", get(barn::history))
        .nest("/api/barn/occupancies", records::routes::<OccupancyRecord>())
        // finances
        .route("/finances", get(finances::page))
        .route("/finances/transactions", post(finances::create_form))
        .route("/finances/transactions/:id/delete", post(finances::delete_form))
        .route("/api/finances/summary", get(finances::summary))
        .route("/api/finances/categories", get(finances::categories))
        .nest("/api/finances/transactions", records::routes::<Transaction>())
        // fitness
        .route("/fitness", get(fitness::page))
        .route("/fitness/foods", post(fitness::create_food_form))
        .route("/fitness/exercises", post(fitness::create_exercise_form))
        .route("/fitness/logs/food", post(fitness::log_food_form))
        .route("/fitness/logs/exercise", post(fitness::log_exercise_form))
        .route("/fitness/logs/:id/delete", post(fitness::delete_log_form))
        .route("/api/fitness/daily", get(fitness::daily))
        .route("/api/fitness/logs/food", post(fitness::api_log_food))
        .route("/api/fitness/logs/exercise", post(fitness::api_log_exercise))
        .nest("/api/fitness/foods", records::routes::<Food>())
        .nest("/api/fitness/exercises", records::routes::<Exercise>())
        .nest("/api/fitness/logs", records::routes::<LogEntry>())
        .with_state(state)
}
