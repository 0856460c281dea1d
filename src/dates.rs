use chrono::{Local, NaiveDate};
use serde::{de, Deserialize, Deserializer};
use serde_json::Value;
use tracing::warn;

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Parses a `YYYY-MM-DD` form value. Blank input is treated as absent.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
}

pub fn month_key(date: NaiveDate) -> String {
    date.format("%Y-%m").to_string()
}

/// Accepts `YYYY-MM` and returns it normalized, or `None` when it is not a real month.
pub fn parse_month(value: &str) -> Option<String> {
    let value = value.trim();
    NaiveDate::parse_from_str(&format!("{value}-01"), "%Y-%m-%d")
        .ok()
        .map(month_key)
}

/// Optional `YYYY-MM-DD` field. Missing or blank is `None`; anything else
/// has to be a real calendar date.
pub(crate) fn optional_date_field<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => parse_date(value)
            .map(Some)
            .ok_or_else(|| de::Error::custom(format!("invalid date {value:?}, expected YYYY-MM-DD"))),
    }
}

/// Nulls out date fields of a stored document that would not parse, so the
/// document loads with those fields absent.
pub(crate) fn clear_unparseable_dates(value: &mut Value, fields: &[&str]) {
    let Some(object) = value.as_object_mut() else {
        return;
    };
    for field in fields {
        let unparseable = match object.get(*field) {
            None | Some(Value::Null) => false,
            Some(Value::String(raw)) => !raw.trim().is_empty() && parse_date(raw).is_none(),
            Some(_) => true,
        };
        if unparseable {
            warn!("clearing unparseable {field} in stored document");
            object.insert((*field).to_string(), Value::Null);
        }
    }
}

pub(crate) fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_date_treats_blank_as_absent() {
        assert_eq!(parse_date("   "), None);
        assert_eq!(parse_date("2024-13-01"), None);
        assert_eq!(
            parse_date(" 2024-02-29 "),
            NaiveDate::from_ymd_opt(2024, 2, 29)
        );
    }

    #[test]
    fn parse_month_rejects_invalid_months() {
        assert_eq!(parse_month("2024-07").as_deref(), Some("2024-07"));
        assert_eq!(parse_month("2024-00"), None);
        assert_eq!(parse_month("july"), None);
    }

    #[test]
    fn unparseable_stored_dates_are_cleared() {
        let mut value = serde_json::json!({
            "arrival_date": "2024-02-30",
            "departure_date": " ",
            "other": "2024-02-30",
        });
        clear_unparseable_dates(&mut value, &["arrival_date", "departure_date"]);
        assert_eq!(value["arrival_date"], Value::Null);
        assert_eq!(value["departure_date"], " ");
        assert_eq!(value["other"], "2024-02-30");
    }
}
