use crate::collection::{Collection, Column, Document, ListConfig, Record, SortValue, CREATED_AT};
use crate::errors::RecordError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub const MAX_SERVING_CALORIES: f64 = 10_000.0;
pub const MAX_SERVING_PROTEIN: f64 = 1_000.0;
pub const MAX_MET: f64 = 30.0;
/// Servings for food, minutes for exercise.
pub const MAX_QUANTITY: f64 = 1_440.0;
pub const MAX_ENTRY_CALORIES: i64 = 100_000;
pub const MAX_ENTRY_PROTEIN: f64 = 10_000.0;

/// Non-negative and finite, at most `max`.
fn check_amount(field: &'static str, value: f64, max: f64) -> Result<(), RecordError> {
    if value < 0.0 {
        return Err(RecordError::Negative(field));
    }
    if !value.is_finite() || value > max {
        return Err(RecordError::OutOfRange { field, max });
    }
    Ok(())
}

/// Nutrition per serving.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Food {
    pub name: String,
    #[serde(default)]
    pub serving: String,
    #[serde(default)]
    pub calories: f64,
    #[serde(default)]
    pub protein: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exercise {
    pub name: String,
    /// Metabolic equivalent of task.
    #[serde(default)]
    pub met: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogKind {
    Food,
    Exercise,
}

impl LogKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Food => "food",
            Self::Exercise => "exercise",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub date: NaiveDate,
    pub kind: LogKind,
    pub ref_id: String,
    pub name: String,
    /// Servings for food, minutes for exercise.
    pub quantity: f64,
    pub calories: i64,
    #[serde(default)]
    pub protein: Option<f64>,
    #[serde(default)]
    pub notes: String,
}

impl Record for Food {
    const STORE: &'static str = "fitness_foods";

    fn list_config() -> &'static ListConfig<Self> {
        &FOOD_LIST
    }

    fn normalize(mut self) -> Self {
        self.name = self.name.trim().to_string();
        self.serving = self.serving.trim().to_string();
        self
    }

    fn validate(&self) -> Result<(), RecordError> {
        if self.name.is_empty() {
            return Err(RecordError::Missing("name"));
        }
        check_amount("calories", self.calories, MAX_SERVING_CALORIES)?;
        check_amount("protein", self.protein, MAX_SERVING_PROTEIN)
    }
}

impl Record for Exercise {
    const STORE: &'static str = "fitness_exercises";

    fn list_config() -> &'static ListConfig<Self> {
        &EXERCISE_LIST
    }

    fn normalize(mut self) -> Self {
        self.name = self.name.trim().to_string();
        self
    }

    fn validate(&self) -> Result<(), RecordError> {
        if self.name.is_empty() {
            return Err(RecordError::Missing("name"));
        }
        check_amount("met", self.met, MAX_MET)
    }
}

impl Record for LogEntry {
    const STORE: &'static str = "fitness_logs";

    fn list_config() -> &'static ListConfig<Self> {
        &LOG_LIST
    }

    fn validate(&self) -> Result<(), RecordError> {
        if self.name.trim().is_empty() {
            return Err(RecordError::Missing("name"));
        }
        if !(self.quantity > 0.0) {
            return Err(RecordError::NotPositive("quantity"));
        }
        check_amount("quantity", self.quantity, MAX_QUANTITY)?;
        if self.calories < 0 {
            return Err(RecordError::Negative("calories"));
        }
        if self.calories > MAX_ENTRY_CALORIES {
            return Err(RecordError::OutOfRange {
                field: "calories",
                max: MAX_ENTRY_CALORIES as f64,
            });
        }
        match self.protein {
            Some(protein) => check_amount("protein", protein, MAX_ENTRY_PROTEIN),
            None => Ok(()),
        }
    }
}

fn round_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn entry_calories(value: f64) -> Result<i64, RecordError> {
    check_amount("calories", value, MAX_ENTRY_CALORIES as f64)?;
    Ok(value.round() as i64)
}

pub fn food_entry(date: NaiveDate, food: &Document<Food>, servings: f64) -> Result<LogEntry, RecordError> {
    if !(servings > 0.0) {
        return Err(RecordError::NotPositive("servings"));
    }
    Ok(LogEntry {
        date,
        kind: LogKind::Food,
        ref_id: food.id.clone(),
        name: food.fields.name.clone(),
        quantity: servings,
        calories: entry_calories(food.fields.calories * servings)?,
        protein: Some(round_tenth(food.fields.protein * servings)),
        notes: food.fields.serving.clone(),
    })
}

pub fn exercise_entry(
    date: NaiveDate,
    exercise: &Document<Exercise>,
    minutes: f64,
    weight_kg: f64,
    note: &str,
) -> Result<LogEntry, RecordError> {
    if !(minutes > 0.0) {
        return Err(RecordError::NotPositive("minutes"));
    }
    if !(weight_kg > 0.0) {
        return Err(RecordError::NotPositive("weight_kg"));
    }
    Ok(LogEntry {
        date,
        kind: LogKind::Exercise,
        ref_id: exercise.id.clone(),
        name: exercise.fields.name.clone(),
        quantity: minutes,
        calories: entry_calories(exercise.fields.met * weight_kg * (minutes / 60.0))?,
        protein: None,
        notes: note.trim().to_string(),
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct DailyTotals {
    pub calories_in: i64,
    pub calories_out: i64,
    pub protein: f64,
    pub net: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyLog<'a> {
    pub date: NaiveDate,
    pub rows: Vec<&'a Document<LogEntry>>,
    pub totals: DailyTotals,
}

/// Entries logged for `date` in the order they were recorded.
pub fn daily_log(logs: &Collection<LogEntry>, date: NaiveDate) -> DailyLog<'_> {
    let mut rows: Vec<_> = logs.iter().filter(|doc| doc.fields.date == date).collect();
    rows.sort_by(|a, b| a.created_at.cmp(&b.created_at));

    let mut totals = DailyTotals::default();
    for doc in &rows {
        match doc.fields.kind {
            LogKind::Food => {
                totals.calories_in = totals.calories_in.saturating_add(doc.fields.calories);
                totals.protein += doc.fields.protein.unwrap_or_default();
            }
            LogKind::Exercise => {
                totals.calories_out = totals.calories_out.saturating_add(doc.fields.calories);
            }
        }
    }
    totals.protein = round_tenth(totals.protein);
    totals.net = totals.calories_in.saturating_sub(totals.calories_out);

    DailyLog { date, rows, totals }
}

fn food_name_cell(doc: &Document<Food>) -> String {
    doc.fields.name.clone()
}

fn food_name_sort(doc: &Document<Food>) -> SortValue {
    doc.fields.name.as_str().into()
}

fn serving_cell(doc: &Document<Food>) -> String {
    doc.fields.serving.clone()
}

fn food_calories_cell(doc: &Document<Food>) -> String {
    format!("{:.0}", doc.fields.calories)
}

fn food_calories_sort(doc: &Document<Food>) -> SortValue {
    SortValue::Number(doc.fields.calories)
}

fn protein_cell(doc: &Document<Food>) -> String {
    format!("{:.1}", doc.fields.protein)
}

pub static FOOD_LIST: ListConfig<Food> = ListConfig {
    columns: &[
        Column { key: "name", label: "Food", cell: food_name_cell, sort: Some(food_name_sort) },
        Column { key: "serving", label: "Serving", cell: serving_cell, sort: None },
        Column { key: "calories", label: "kcal", cell: food_calories_cell, sort: Some(food_calories_sort) },
        Column { key: "protein", label: "Protein (g)", cell: protein_cell, sort: None },
    ],
    default_sort: "name",
    default_ascending: true,
    filter: None,
    empty_message: "No foods yet",
};

fn exercise_name_cell(doc: &Document<Exercise>) -> String {
    doc.fields.name.clone()
}

fn exercise_name_sort(doc: &Document<Exercise>) -> SortValue {
    doc.fields.name.as_str().into()
}

fn met_cell(doc: &Document<Exercise>) -> String {
    format!("{:.1}", doc.fields.met)
}

pub static EXERCISE_LIST: ListConfig<Exercise> = ListConfig {
    columns: &[
        Column { key: "name", label: "Exercise", cell: exercise_name_cell, sort: Some(exercise_name_sort) },
        Column { key: "met", label: "MET", cell: met_cell, sort: None },
    ],
    default_sort: "name",
    default_ascending: true,
    filter: None,
    empty_message: "No exercises yet",
};

fn log_kind_cell(doc: &Document<LogEntry>) -> String {
    doc.fields.kind.as_str().to_string()
}

fn log_name_cell(doc: &Document<LogEntry>) -> String {
    doc.fields.name.clone()
}

fn log_quantity_cell(doc: &Document<LogEntry>) -> String {
    match doc.fields.kind {
        LogKind::Food => format!("{} serv", doc.fields.quantity),
        LogKind::Exercise => format!("{} min", doc.fields.quantity),
    }
}

fn log_calories_cell(doc: &Document<LogEntry>) -> String {
    doc.fields.calories.to_string()
}

fn log_protein_cell(doc: &Document<LogEntry>) -> String {
    doc.fields
        .protein
        .map(|protein| format!("{protein:.1}"))
        .unwrap_or_default()
}

fn log_notes_cell(doc: &Document<LogEntry>) -> String {
    doc.fields.notes.clone()
}

fn log_filter(entry: &LogEntry, value: &str) -> bool {
    entry.date.to_string() == value || entry.kind.as_str().eq_ignore_ascii_case(value)
}

pub static LOG_LIST: ListConfig<LogEntry> = ListConfig {
    columns: &[
        Column { key: "kind", label: "Kind", cell: log_kind_cell, sort: None },
        Column { key: "name", label: "Item", cell: log_name_cell, sort: None },
        Column { key: "quantity", label: "Qty", cell: log_quantity_cell, sort: None },
        Column { key: "calories", label: "kcal", cell: log_calories_cell, sort: None },
        Column { key: "protein", label: "Protein (g)", cell: log_protein_cell, sort: None },
        Column { key: "notes", label: "Notes", cell: log_notes_cell, sort: None },
    ],
    default_sort: CREATED_AT,
    default_ascending: true,
    filter: Some(log_filter),
    empty_message: "Nothing logged for this day",
};
