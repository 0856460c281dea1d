use crate::errors::AppError;
use crate::models::AppData;
use std::path::Path;
use tokio::fs;
use tracing::error;

pub async fn load_data(path: &Path) -> AppData {
    match fs::read(path).await {
        Ok(bytes) => match serde_json::from_slice(&bytes) {
            Ok(data) => data,
            Err(err) => {
                error!("failed to parse data file {}: {err}", path.display());
                AppData::default()
            }
        },
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => AppData::default(),
        Err(err) => {
            error!("failed to read data file {}: {err}", path.display());
            AppData::default()
        }
    }
}

pub async fn persist_data(path: &Path, data: &AppData) -> Result<(), AppError> {
    let payload = serde_json::to_vec_pretty(data).map_err(AppError::internal)?;
    fs::write(path, payload).await.map_err(AppError::internal)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::occupancy::OccupancyRecord;
    use chrono::{NaiveDate, Utc};

    fn temp_path(name: &str) -> std::path::PathBuf {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        std::env::temp_dir().join(format!("family_dashboard_{name}_{}_{nanos}.json", std::process::id()))
    }

    #[tokio::test]
    async fn missing_file_loads_empty_data() {
        let data = load_data(&temp_path("missing")).await;
        assert!(data.occupancies.is_empty());
        assert!(data.transactions.is_empty());
    }

    #[tokio::test]
    async fn persisted_data_loads_back() {
        let path = temp_path("roundtrip");
        let mut data = AppData::default();
        data.occupancies
            .insert(
                OccupancyRecord {
                    stall_id: Some("S03".into()),
                    horse_name: "Pepper".into(),
                    arrival_date: NaiveDate::from_ymd_opt(2024, 4, 1),
                    ..OccupancyRecord::default()
                },
                Utc::now(),
            )
            .unwrap();

        persist_data(&path, &data).await.unwrap();
        let loaded = load_data(&path).await;
        let _ = std::fs::remove_file(&path);

        assert_eq!(loaded.occupancies, data.occupancies);
    }

    #[tokio::test]
    async fn corrupt_file_falls_back_to_empty_data() {
        let path = temp_path("corrupt");
        std::fs::write(&path, b"{ not json").unwrap();
        let data = load_data(&path).await;
        let _ = std::fs::remove_file(&path);
        assert!(data.occupancies.is_empty());
    }
}
