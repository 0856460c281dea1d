use crate::config::BarnImage;
use crate::errors::{AppError, RecordError};
use crate::models::AppData;
use crate::storage::persist_data;
use std::{path::PathBuf, sync::Arc};
use tokio::sync::Mutex;

#[derive(Clone)]
pub struct AppState {
    pub data_path: PathBuf,
    pub data: Arc<Mutex<AppData>>,
    pub barn_image: Arc<BarnImage>,
}

impl AppState {
    pub fn new(data_path: PathBuf, data: AppData, barn_image: BarnImage) -> Self {
        Self {
            data_path,
            data: Arc::new(Mutex::new(data)),
            barn_image: Arc::new(barn_image),
        }
    }

    /// Applies `change` to a draft of the data, persists the draft, and only
    /// then publishes it. On any failure the in-memory data is left as it was.
    pub async fn mutate<T, F>(&self, change: F) -> Result<T, AppError>
    where
        F: FnOnce(&mut AppData) -> Result<T, RecordError>,
    {
        let mut data = self.data.lock().await;
        let mut draft = data.clone();
        let output = change(&mut draft)?;
        persist_data(&self.data_path, &draft).await?;
        *data = draft;
        Ok(output)
    }
}
