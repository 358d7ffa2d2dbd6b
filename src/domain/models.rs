use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One (gender, event type) pair describing a competitive bracket
/// within a tournament.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventTuple {
    pub gender: String,
    pub event_type: String,
}

impl EventTuple {
    pub fn new(gender: impl Into<String>, event_type: impl Into<String>) -> Self {
        Self {
            gender: gender.into(),
            event_type: event_type.into(),
        }
    }
}

/// Canonical flat tournament row, produced by the normalizer and
/// persisted by the store. Rows are replaced whole on re-fetch, never
/// mutated in place.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TournamentRecord {
    pub id: String,
    pub name: String,
    pub is_cancelled: bool,
    /// Source-local instants coerced to UTC for comparison.
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub timezone: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// Venue name.
    pub location: String,
    pub town: String,
    pub county: String,
    /// Comma-joined non-empty parts of [location, town, county].
    pub full_location: String,
    /// First category label, raw source casing.
    pub tournament_type: String,
    pub tournament_level: String,
    pub entries_close: Option<DateTime<Utc>>,
    pub registration_timezone: String,
    /// Deduplicated event brackets.
    pub events: Vec<EventTuple>,
    /// Present only when both the url path and the org slug are non-empty.
    pub tournament_url: Option<String>,
    /// Full original payload as JSON text, kept for detail lookups.
    pub raw: String,
    pub last_updated: DateTime<Utc>,
}

impl TournamentRecord {
    /// Rows without coordinates are excluded from map-oriented views.
    pub fn has_coordinates(&self) -> bool {
        self.latitude.is_some() && self.longitude.is_some()
    }
}
