//! Typed record collections and the list binding shared by every dashboard table.
//!
//! A [`Collection`] owns the documents of one record type. A [`ListConfig`]
//! describes how that type is shown as a table: which columns exist, which of
//! them can be sorted, the default ordering, and an optional filter predicate.
//! [`Collection::query`] applies a [`ListQuery`] (free-text search, filter
//! value, sort key) against that configuration.

use crate::errors::RecordError;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{de::DeserializeOwned, Deserialize, Deserializer, Serialize};
use std::cmp::Ordering;
use tracing::warn;
use uuid::Uuid;

pub const CREATED_AT: &str = "created_at";

pub trait Record: Clone + Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Collection name used in logs and error messages.
    const STORE: &'static str;

    fn list_config() -> &'static ListConfig<Self>;

    /// Canonicalizes submitted fields before validation.
    fn normalize(self) -> Self {
        self
    }

    fn validate(&self) -> Result<(), RecordError> {
        Ok(())
    }

    /// Patches a document read from the data file before it is decoded.
    fn repair_stored(_value: &mut serde_json::Value) {}
}

/// A stored record with its server-assigned identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document<T> {
    pub id: String,
    pub created_at: DateTime<Utc>,
    #[serde(flatten)]
    pub fields: T,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Collection<T> {
    docs: Vec<Document<T>>,
}

impl<T> Default for Collection<T> {
    fn default() -> Self {
        Self { docs: Vec::new() }
    }
}

impl<'de, T: Record> Deserialize<'de> for Collection<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Vec::<serde_json::Value>::deserialize(deserializer)?;
        let docs = raw
            .into_iter()
            .filter_map(|mut value| {
                T::repair_stored(&mut value);
                match serde_json::from_value::<Document<T>>(value) {
                    Ok(doc) => Some(doc),
                    Err(err) => {
                        warn!("skipping undecodable {} document: {err}", T::STORE);
                        None
                    }
                }
            })
            .collect();
        Ok(Self { docs })
    }
}

impl<T> Collection<T> {
    pub fn len(&self) -> usize {
        self.docs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Document<T>> {
        self.docs.iter()
    }

    pub fn get(&self, id: &str) -> Option<&Document<T>> {
        self.docs.iter().find(|doc| doc.id == id)
    }
}

impl<'a, T> IntoIterator for &'a Collection<T> {
    type Item = &'a Document<T>;
    type IntoIter = std::slice::Iter<'a, Document<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.docs.iter()
    }
}

impl<T: Record> Collection<T> {
    pub fn require(&self, id: &str) -> Result<&Document<T>, RecordError> {
        self.get(id).ok_or_else(|| not_found::<T>(id))
    }

    pub fn insert(&mut self, fields: T, now: DateTime<Utc>) -> Result<&Document<T>, RecordError> {
        let fields = fields.normalize();
        fields.validate()?;

        let index = self.docs.len();
        self.docs.push(Document {
            id: Uuid::new_v4().to_string(),
            created_at: now,
            fields,
        });
        Ok(&self.docs[index])
    }

    /// Whole-record replace. `id` and `created_at` are kept.
    pub fn replace(&mut self, id: &str, fields: T) -> Result<&Document<T>, RecordError> {
        let fields = fields.normalize();
        fields.validate()?;

        let doc = self
            .docs
            .iter_mut()
            .find(|doc| doc.id == id)
            .ok_or_else(|| not_found::<T>(id))?;
        doc.fields = fields;
        Ok(doc)
    }

    pub fn remove(&mut self, id: &str) -> Result<Document<T>, RecordError> {
        let index = self
            .docs
            .iter()
            .position(|doc| doc.id == id)
            .ok_or_else(|| not_found::<T>(id))?;
        Ok(self.docs.remove(index))
    }

    pub fn query(&self, query: &ListQuery) -> Vec<&Document<T>> {
        let config = T::list_config();
        let needle = query.search_term();
        let filter_value = query.filter_value();

        let mut rows: Vec<&Document<T>> = self
            .docs
            .iter()
            .filter(|doc| match (filter_value, config.filter) {
                (Some(value), Some(predicate)) => predicate(&doc.fields, value),
                _ => true,
            })
            .filter(|doc| {
                needle
                    .as_deref()
                    .is_none_or(|needle| search_text(&doc.fields).contains(needle))
            })
            .collect();

        let key = query
            .sort
            .as_deref()
            .filter(|key| config.is_sortable(key))
            .unwrap_or(config.default_sort);
        let ascending = query.asc.unwrap_or(config.default_ascending);

        rows.sort_by(|a, b| {
            let ordering = config
                .sort_value(key, a)
                .compare(&config.sort_value(key, b))
                .then_with(|| a.created_at.cmp(&b.created_at))
                .then_with(|| a.id.cmp(&b.id));
            if ascending { ordering } else { ordering.reverse() }
        });
        rows
    }
}

fn not_found<T: Record>(id: &str) -> RecordError {
    RecordError::NotFound {
        store: T::STORE,
        id: id.to_string(),
    }
}

fn search_text<T: Serialize>(fields: &T) -> String {
    serde_json::to_string(fields)
        .map(|text| text.to_lowercase())
        .unwrap_or_default()
}

/// A comparable cell value. Missing values order before everything else.
#[derive(Debug, Clone, PartialEq)]
pub enum SortValue {
    Missing,
    Number(f64),
    Date(NaiveDate),
    Timestamp(DateTime<Utc>),
    Text(String),
}

impl SortValue {
    fn rank(&self) -> u8 {
        match self {
            Self::Missing => 0,
            Self::Number(_) => 1,
            Self::Date(_) => 2,
            Self::Timestamp(_) => 3,
            Self::Text(_) => 4,
        }
    }

    pub fn compare(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Number(a), Self::Number(b)) => a.total_cmp(b),
            (Self::Date(a), Self::Date(b)) => a.cmp(b),
            (Self::Timestamp(a), Self::Timestamp(b)) => a.cmp(b),
            (Self::Text(a), Self::Text(b)) => a.to_lowercase().cmp(&b.to_lowercase()),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl From<Option<NaiveDate>> for SortValue {
    fn from(value: Option<NaiveDate>) -> Self {
        value.map_or(Self::Missing, Self::Date)
    }
}

impl From<Option<f64>> for SortValue {
    fn from(value: Option<f64>) -> Self {
        value.map_or(Self::Missing, Self::Number)
    }
}

impl From<&str> for SortValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

pub struct Column<T: 'static> {
    pub key: &'static str,
    pub label: &'static str,
    pub cell: fn(&Document<T>) -> String,
    pub sort: Option<fn(&Document<T>) -> SortValue>,
}

pub struct ListConfig<T: 'static> {
    pub columns: &'static [Column<T>],
    pub default_sort: &'static str,
    pub default_ascending: bool,
    pub filter: Option<fn(&T, &str) -> bool>,
    pub empty_message: &'static str,
}

impl<T: 'static> ListConfig<T> {
    pub fn is_sortable(&self, key: &str) -> bool {
        key == CREATED_AT
            || self
                .columns
                .iter()
                .any(|column| column.key == key && column.sort.is_some())
    }

    pub fn sort_value(&self, key: &str, doc: &Document<T>) -> SortValue {
        if key == CREATED_AT {
            return SortValue::Timestamp(doc.created_at);
        }
        self.columns
            .iter()
            .find(|column| column.key == key)
            .and_then(|column| column.sort)
            .map_or(SortValue::Missing, |sort| sort(doc))
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListQuery {
    pub q: Option<String>,
    pub filter: Option<String>,
    pub sort: Option<String>,
    pub asc: Option<bool>,
}

impl ListQuery {
    fn search_term(&self) -> Option<String> {
        self.q
            .as_deref()
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .map(str::to_lowercase)
    }

    fn filter_value(&self) -> Option<&str> {
        self.filter.as_deref().map(str::trim).filter(|v| !v.is_empty())
    }
}
