use chrono::{DateTime, NaiveDateTime, Utc};
use serde_json::Value;

use crate::config::COMPETITIONS_BASE_URL;
use crate::domain::models::{EventTuple, TournamentRecord};

/// Flatten one raw search payload into the canonical row shape.
///
/// Total by construction: every field defaults to empty/None when the
/// source data is missing or malformed. All optionality handling lives
/// here; downstream code sees a fully-populated record.
pub fn normalize(raw: &Value) -> TournamentRecord {
    let timezone = string_or(raw, &["timeZone"], "UTC");
    let location = string_at(raw, &["location", "name"]);
    let town = string_at(raw, &["primaryLocation", "town"]);
    let county = string_at(raw, &["primaryLocation", "county"]);

    TournamentRecord {
        id: string_at(raw, &["id"]),
        name: string_at(raw, &["name"]),
        is_cancelled: field(raw, &["isCancelled"]).and_then(Value::as_bool).unwrap_or(false),
        start_date: first_timestamp(raw, &["timeZoneStartDateTime", "startDate"]),
        end_date: first_timestamp(raw, &["timeZoneEndDateTime", "endDate"]),
        latitude: field(raw, &["location", "geo", "latitude"]).and_then(Value::as_f64),
        longitude: field(raw, &["location", "geo", "longitude"]).and_then(Value::as_f64),
        full_location: join_location_parts(&[&location, &town, &county]),
        location,
        town,
        county,
        tournament_type: first_category(raw),
        tournament_level: string_at(raw, &["level", "name"]),
        entries_close: timestamp_at(raw, &["registrationRestrictions", "entriesCloseDateTime"]),
        registration_timezone: string_or(raw, &["registrationRestrictions", "timeZone"], &timezone),
        timezone,
        events: extract_event_tuples(raw),
        tournament_url: build_tournament_url(raw),
        raw: raw.to_string(),
        last_updated: Utc::now(),
    }
}

/// Parse a source timestamp leniently: RFC 3339, or a naive local
/// datetime treated as UTC (the source emits timezone-local strings
/// without an offset).
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S") {
        return Some(dt.and_utc());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(dt.and_utc());
    }
    None
}

// --- Field Access Helpers ---

fn field<'a>(raw: &'a Value, path: &[&str]) -> Option<&'a Value> {
    let mut current = raw;
    for key in path {
        current = current.get(key)?;
    }
    Some(current)
}

fn string_at(raw: &Value, path: &[&str]) -> String {
    field(raw, path)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

fn string_or(raw: &Value, path: &[&str], default: &str) -> String {
    match field(raw, path).and_then(Value::as_str) {
        Some(s) if !s.is_empty() => s.to_string(),
        _ => default.to_string(),
    }
}

fn timestamp_at(raw: &Value, path: &[&str]) -> Option<DateTime<Utc>> {
    field(raw, path).and_then(Value::as_str).and_then(parse_timestamp)
}

fn first_timestamp(raw: &Value, keys: &[&str]) -> Option<DateTime<Utc>> {
    keys.iter().find_map(|key| timestamp_at(raw, &[key]))
}

// --- Derivations ---

fn first_category(raw: &Value) -> String {
    field(raw, &["levelCategories"])
        .and_then(Value::as_array)
        .and_then(|categories| categories.first())
        .and_then(|category| category.get("name"))
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

fn join_location_parts(parts: &[&str]) -> String {
    parts
        .iter()
        .filter(|part| !part.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join(", ")
}

fn extract_event_tuples(raw: &Value) -> Vec<EventTuple> {
    let Some(events) = field(raw, &["events"]).and_then(Value::as_array) else {
        return Vec::new();
    };

    let mut tuples: Vec<EventTuple> = Vec::new();
    for event in events {
        let gender = string_at(event, &["division", "gender"]);
        let event_type = string_at(event, &["division", "eventType"]);
        if gender.is_empty() || event_type.is_empty() {
            continue;
        }
        let tuple = EventTuple { gender, event_type };
        if !tuples.contains(&tuple) {
            tuples.push(tuple);
        }
    }
    tuples
}

fn build_tournament_url(raw: &Value) -> Option<String> {
    let path = string_at(raw, &["url"]).trim().to_string();
    let org_slug = string_at(raw, &["organization", "urlSegment"]).trim().to_string();

    if path.is_empty() || org_slug.is_empty() {
        return None;
    }
    Some(format!("{COMPETITIONS_BASE_URL}{org_slug}{path}"))
}
