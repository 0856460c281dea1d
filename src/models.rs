use crate::collection::{Collection, Record};
use crate::finances::Transaction;
use crate::fitness::{Exercise, Food, LogEntry};
use crate::occupancy::OccupancyRecord;
use serde::{Deserialize, Serialize};

/// Everything persisted in the data file.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppData {
    #[serde(default)]
    pub occupancies: Collection<OccupancyRecord>,
    #[serde(default)]
    pub transactions: Collection<Transaction>,
    #[serde(default)]
    pub foods: Collection<Food>,
    #[serde(default)]
    pub exercises: Collection<Exercise>,
    #[serde(default)]
    pub fitness_logs: Collection<LogEntry>,
}

/// Locates a record type's collection inside [`AppData`].
pub trait Stored: Record {
    fn collection(data: &AppData) -> &Collection<Self>;
    fn collection_mut(data: &mut AppData) -> &mut Collection<Self>;
}

macro_rules! stored {
    ($record:ty, $field:ident) => {
        impl Stored for $record {
            fn collection(data: &AppData) -> &Collection<Self> {
                &data.$field
            }

            fn collection_mut(data: &mut AppData) -> &mut Collection<Self> {
                &mut data.$field
            }
        }
    };
}

stored!(OccupancyRecord, occupancies);
stored!(Transaction, transactions);
stored!(Food, foods);
stored!(Exercise, exercises);
stored!(LogEntry, fitness_logs);
