pub mod app;
pub mod barn;
pub mod collection;
pub mod config;
pub mod dates;
pub mod errors;
pub mod finances;
pub mod fitness;
pub mod handlers;
pub mod models;
pub mod occupancy;
pub mod state;
pub mod storage;
pub mod telemetry;
pub mod ui;
pub mod view;

pub use app::router;
pub use config::Config;
pub use state::AppState;
pub use storage::{load_data, persist_data};
