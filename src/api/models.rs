use serde::Serialize;
use serde_json::Value;

use crate::config::COMPETITIONS_BASE_URL;

/// One tournament pin for the map view, built from the raw payload.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MapTournament {
    pub id: Option<String>,
    pub name: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub entries_close_date_time: Option<String>,
    pub location: String,
    pub categories: Vec<String>,
    pub url: Option<String>,
    pub level: String,
    pub events: Vec<EventDetail>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDetail {
    pub surface: Option<String>,
    pub court_location: Option<String>,
    pub gender: Option<String>,
    pub event_type: Option<String>,
    pub tods_code: Option<String>,
}

impl MapTournament {
    /// Serialize a raw tournament for the map. Returns `None` when the
    /// payload has no coordinates; callers skip those rows.
    pub fn from_raw(raw: &Value) -> Option<Self> {
        let geo = &raw["location"]["geo"];
        let latitude = geo["latitude"].as_f64()?;
        let longitude = geo["longitude"].as_f64()?;

        Some(Self {
            id: raw["id"].as_str().map(str::to_string),
            name: raw["name"].as_str().map(str::to_string),
            latitude,
            longitude,
            start_date: raw["timeZoneStartDateTime"].as_str().map(str::to_string),
            end_date: raw["timeZoneEndDateTime"].as_str().map(str::to_string),
            entries_close_date_time: raw["registrationRestrictions"]["entriesCloseDateTime"]
                .as_str()
                .map(str::to_string),
            location: location_summary(raw),
            categories: level_categories(raw),
            url: competition_url(raw),
            level: trimmed(&raw["level"]["name"]).unwrap_or_default(),
            events: event_details(raw),
        })
    }
}

/// "venue, town, state" with empty parts dropped.
fn location_summary(raw: &Value) -> String {
    let parts = [
        trimmed(&raw["location"]["name"]),
        trimmed(&raw["primaryLocation"]["town"]),
        trimmed(&raw["primaryLocation"]["county"]),
    ];
    parts.into_iter().flatten().collect::<Vec<_>>().join(", ")
}

/// Title-cased names from `levelCategories`, e.g. ["junior"] -> ["Junior"].
fn level_categories(raw: &Value) -> Vec<String> {
    raw["levelCategories"]
        .as_array()
        .map(|categories| {
            categories
                .iter()
                .filter_map(|entry| trimmed(&entry["name"]))
                .map(|name| title_case(&name))
                .collect()
        })
        .unwrap_or_default()
}

fn event_details(raw: &Value) -> Vec<EventDetail> {
    raw["events"]
        .as_array()
        .map(|events| {
            events
                .iter()
                .filter(|event| event.is_object())
                .map(|event| EventDetail {
                    surface: trimmed(&event["surface"]),
                    court_location: trimmed(&event["courtLocation"]),
                    gender: trimmed(&event["division"]["gender"]),
                    event_type: trimmed(&event["division"]["eventType"]),
                    tods_code: trimmed(&event["division"]["ageCategory"]["todsCode"]),
                })
                .collect()
        })
        .unwrap_or_default()
}

/// Public competition page link; needs both the org slug and the url path.
fn competition_url(raw: &Value) -> Option<String> {
    let path = trimmed(&raw["url"])?;
    let slug = trimmed(&raw["organization"]["urlSegment"])?;
    Some(format!("{COMPETITIONS_BASE_URL}{slug}{path}"))
}

fn trimmed(value: &Value) -> Option<String> {
    value
        .as_str()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn title_case(text: &str) -> String {
    text.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => {
                    first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
