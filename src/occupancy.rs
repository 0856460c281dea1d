//! Stall occupancy records and the status resolver.
//!
//! Status is never stored. Every query recomputes it from the full record set
//! for the requested as-of date:
//!
//! * **occupied**: `arrival <= as_of` and either no departure or `as_of < departure`
//! * **scheduled**: nothing occupied and some `arrival > as_of`
//! * **empty**: neither
//!
//! Records missing a stall or an arrival date never contribute to a status.

use crate::barn::{find_stall, Stall};
use crate::collection::{Column, Document, ListConfig, Record, SortValue};
use crate::dates::{clear_unparseable_dates, lenient_text, optional_date_field};
use crate::errors::RecordError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct OccupancyRecord {
    #[serde(default, deserialize_with = "lenient_text")]
    pub stall_id: Option<String>,
    #[serde(default)]
    pub horse_name: String,
    #[serde(default)]
    pub owner_name: String,
    #[serde(default, deserialize_with = "optional_date_field")]
    pub arrival_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "optional_date_field")]
    pub departure_date: Option<NaiveDate>,
    #[serde(default)]
    pub monthly_rate: Option<f64>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl OccupancyRecord {
    pub fn is_occupied_on(&self, as_of: NaiveDate) -> bool {
        match self.arrival_date {
            Some(arrival) if arrival <= as_of => {
                self.departure_date.is_none_or(|departure| as_of < departure)
            }
            _ => false,
        }
    }

    pub fn is_scheduled_after(&self, as_of: NaiveDate) -> bool {
        self.arrival_date.is_some_and(|arrival| arrival > as_of)
    }

    /// Well-formed records carry both a stall and an arrival date.
    pub fn stall_key(&self) -> Option<&str> {
        match (&self.stall_id, self.arrival_date) {
            (Some(stall_id), Some(_)) => Some(stall_id.as_str()),
            _ => None,
        }
    }
}

impl Record for OccupancyRecord {
    const STORE: &'static str = "barn_occupancies";

    fn list_config() -> &'static ListConfig<Self> {
        &OCCUPANCY_LIST
    }

    fn normalize(mut self) -> Self {
        // Stall ids are stored in their canonical spelling.
        if let Some(stall) = self.stall_id.as_deref().and_then(find_stall) {
            self.stall_id = Some(stall.id.to_string());
        }
        self.horse_name = self.horse_name.trim().to_string();
        self.owner_name = self.owner_name.trim().to_string();
        self.notes = self
            .notes
            .map(|notes| notes.trim().to_string())
            .filter(|notes| !notes.is_empty());
        self
    }

    fn validate(&self) -> Result<(), RecordError> {
        let stall_id = self.stall_id.as_deref().ok_or(RecordError::Missing("stall_id"))?;
        if find_stall(stall_id).is_none() {
            return Err(RecordError::UnknownStall(stall_id.to_string()));
        }
        let arrival = self.arrival_date.ok_or(RecordError::Missing("arrival_date"))?;
        if let Some(departure) = self.departure_date {
            if departure < arrival {
                return Err(RecordError::DepartureBeforeArrival {
                    arrival: arrival.to_string(),
                    departure: departure.to_string(),
                });
            }
        }
        if self.monthly_rate.is_some_and(|rate| rate < 0.0) {
            return Err(RecordError::Negative("monthly_rate"));
        }
        Ok(())
    }

    fn repair_stored(value: &mut serde_json::Value) {
        clear_unparseable_dates(value, &["arrival_date", "departure_date"]);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StallState {
    Occupied,
    Scheduled,
    Empty,
}

impl StallState {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Occupied => "occupied",
            Self::Scheduled => "scheduled",
            Self::Empty => "empty",
        }
    }
}

/// Classification of one stall plus the record that determined it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StallStatus<'a> {
    pub state: StallState,
    pub record: Option<&'a Document<OccupancyRecord>>,
}

impl StallStatus<'_> {
    pub const EMPTY: Self = Self {
        state: StallState::Empty,
        record: None,
    };
}

pub type StallRecords<'a> = BTreeMap<&'a str, Vec<&'a Document<OccupancyRecord>>>;

/// Buckets well-formed records by canonical stall id. Malformed records and
/// records naming an unknown stall are dropped.
pub fn group_by_stall<'a, I>(records: I) -> StallRecords<'a>
where
    I: IntoIterator<Item = &'a Document<OccupancyRecord>>,
{
    let mut grouped: StallRecords<'a> = BTreeMap::new();
    for doc in records {
        if let Some(stall) = doc.fields.stall_key().and_then(find_stall) {
            grouped.entry(stall.id).or_default().push(doc);
        }
    }
    grouped
}

/// Classifies a single stall from the records attached to it.
///
/// Overlapping occupied ranges resolve to the latest arrival, then the most
/// recently created record, then the greatest id. Among future arrivals the
/// earliest arrival wins, then the most recently created, then the smallest id.
/// Neither choice depends on the order of `records`.
pub fn resolve_stall<'a>(
    records: &[&'a Document<OccupancyRecord>],
    as_of: NaiveDate,
) -> StallStatus<'a> {
    let wellformed = records.iter().copied().filter(|doc| doc.fields.stall_key().is_some());

    let occupied = wellformed
        .clone()
        .filter(|doc| doc.fields.is_occupied_on(as_of))
        .max_by(|a, b| {
            a.fields
                .arrival_date
                .cmp(&b.fields.arrival_date)
                .then_with(|| a.created_at.cmp(&b.created_at))
                .then_with(|| a.id.cmp(&b.id))
        });
    if let Some(record) = occupied {
        return StallStatus {
            state: StallState::Occupied,
            record: Some(record),
        };
    }

    let scheduled = wellformed
        .filter(|doc| doc.fields.is_scheduled_after(as_of))
        .min_by(|a, b| {
            a.fields
                .arrival_date
                .cmp(&b.fields.arrival_date)
                .then_with(|| b.created_at.cmp(&a.created_at))
                .then_with(|| a.id.cmp(&b.id))
        });
    match scheduled {
        Some(record) => StallStatus {
            state: StallState::Scheduled,
            record: Some(record),
        },
        None => StallStatus::EMPTY,
    }
}

pub fn resolve_stalls<'a>(
    stalls: &'static [Stall],
    grouped: &StallRecords<'a>,
    as_of: NaiveDate,
) -> Vec<(&'static Stall, StallStatus<'a>)> {
    stalls
        .iter()
        .map(|stall| {
            let status = grouped
                .get(stall.id)
                .map_or(StallStatus::EMPTY, |records| resolve_stall(records, as_of));
            (stall, status)
        })
        .collect()
}

/// Every record for a stall, newest arrival first. Records without an arrival
/// date sort last.
pub fn stall_history<'a, I>(stall_id: &str, records: I) -> Vec<&'a Document<OccupancyRecord>>
where
    I: IntoIterator<Item = &'a Document<OccupancyRecord>>,
{
    let Some(stall) = find_stall(stall_id) else {
        return Vec::new();
    };
    let mut history: Vec<_> = records
        .into_iter()
        .filter(|doc| doc.fields.stall_id.as_deref().and_then(find_stall) == Some(stall))
        .collect();
    history.sort_by(|a, b| match (a.fields.arrival_date, b.fields.arrival_date) {
        (Some(a_date), Some(b_date)) => b_date.cmp(&a_date),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
    history
}

fn stall_cell(doc: &Document<OccupancyRecord>) -> String {
    doc.fields
        .stall_id
        .as_deref()
        .and_then(find_stall)
        .map(|stall| stall.number.to_string())
        .unwrap_or_default()
}

fn stall_sort(doc: &Document<OccupancyRecord>) -> SortValue {
    doc.fields
        .stall_id
        .as_deref()
        .and_then(find_stall)
        .map_or(SortValue::Missing, |stall| SortValue::Number(f64::from(stall.number)))
}

fn horse_cell(doc: &Document<OccupancyRecord>) -> String {
    doc.fields.horse_name.clone()
}

fn horse_sort(doc: &Document<OccupancyRecord>) -> SortValue {
    doc.fields.horse_name.as_str().into()
}

fn owner_cell(doc: &Document<OccupancyRecord>) -> String {
    doc.fields.owner_name.clone()
}

fn owner_sort(doc: &Document<OccupancyRecord>) -> SortValue {
    doc.fields.owner_name.as_str().into()
}

fn arrival_cell(doc: &Document<OccupancyRecord>) -> String {
    doc.fields.arrival_date.map(|d| d.to_string()).unwrap_or_default()
}

fn arrival_sort(doc: &Document<OccupancyRecord>) -> SortValue {
    doc.fields.arrival_date.into()
}

fn departure_cell(doc: &Document<OccupancyRecord>) -> String {
    doc.fields.departure_date.map(|d| d.to_string()).unwrap_or_default()
}

fn departure_sort(doc: &Document<OccupancyRecord>) -> SortValue {
    doc.fields.departure_date.into()
}

fn rate_cell(doc: &Document<OccupancyRecord>) -> String {
    doc.fields
        .monthly_rate
        .map(|rate| format!("{rate:.2}"))
        .unwrap_or_default()
}

fn rate_sort(doc: &Document<OccupancyRecord>) -> SortValue {
    doc.fields.monthly_rate.into()
}

fn notes_cell(doc: &Document<OccupancyRecord>) -> String {
    doc.fields.notes.clone().unwrap_or_default()
}

fn stall_filter(record: &OccupancyRecord, value: &str) -> bool {
    match (record.stall_id.as_deref().and_then(find_stall), find_stall(value)) {
        (Some(stored), Some(wanted)) => stored == wanted,
        _ => false,
    }
}

pub static OCCUPANCY_LIST: ListConfig<OccupancyRecord> = ListConfig {
    columns: &[
        Column { key: "stall", label: "Stall", cell: stall_cell, sort: Some(stall_sort) },
        Column { key: "horse_name", label: "Horse", cell: horse_cell, sort: Some(horse_sort) },
        Column { key: "owner_name", label: "Owner", cell: owner_cell, sort: Some(owner_sort) },
        Column { key: "arrival_date", label: "Arrival", cell: arrival_cell, sort: Some(arrival_sort) },
        Column {
            key: "departure_date",
            label: "Departure",
            cell: departure_cell,
            sort: Some(departure_sort),
        },
        Column { key: "monthly_rate", label: "Rate / mo", cell: rate_cell, sort: Some(rate_sort) },
        Column { key: "notes", label: "Notes", cell: notes_cell, sort: None },
    ],
    default_sort: "arrival_date",
    default_ascending: false,
    filter: Some(stall_filter),
    empty_message: "No history",
};
