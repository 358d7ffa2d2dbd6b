use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::SearchSettings;

/// POST body for the unified-search endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct SearchQuery {
    pub filters: Vec<SearchFilter>,
    pub options: SearchOptions,
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchFilter {
    pub key: &'static str,
    pub items: Vec<FilterItem>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum FilterItem {
    Distance {
        value: u32,
    },
    DateRange {
        #[serde(rename = "minDate")]
        min_date: String,
        #[serde(rename = "maxDate")]
        max_date: String,
    },
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchOptions {
    pub size: usize,
    pub from: usize,
    pub sort_key: &'static str,
    pub latitude: f64,
    pub longitude: f64,
}

impl SearchQuery {
    /// Fixed nationwide query: a radius wide enough to cover the country
    /// and a date window from today through +`date_window_days`. Only the
    /// `from` offset varies between pages.
    pub fn nationwide(settings: &SearchSettings, offset: usize) -> Self {
        let today = Utc::now().date_naive();
        let max_date = today + Duration::days(settings.date_window_days);

        Self {
            filters: vec![
                SearchFilter {
                    key: "distance",
                    items: vec![FilterItem::Distance {
                        value: settings.distance_miles,
                    }],
                },
                SearchFilter {
                    key: "date-range",
                    items: vec![FilterItem::DateRange {
                        min_date: today.format("%Y-%m-%d").to_string(),
                        max_date: max_date.format("%Y-%m-%d").to_string(),
                    }],
                },
            ],
            options: SearchOptions {
                size: settings.page_size,
                from: offset,
                sort_key: settings.sort_key,
                latitude: settings.latitude,
                longitude: settings.longitude,
            },
        }
    }
}

/// Response wrapper; each envelope's `item` is one raw tournament.
#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    #[serde(rename = "searchResults", default)]
    pub search_results: Vec<SearchResult>,
}

#[derive(Debug, Deserialize)]
pub struct SearchResult {
    #[serde(default)]
    pub item: Option<Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nationwide_query_serializes_to_the_expected_shape() {
        let settings = SearchSettings::default();
        let query = SearchQuery::nationwide(&settings, 200);
        let body = serde_json::to_value(&query).unwrap();

        assert_eq!(body["filters"][0]["key"], "distance");
        assert_eq!(body["filters"][0]["items"][0]["value"], 5000);
        assert_eq!(body["filters"][1]["key"], "date-range");
        assert!(body["filters"][1]["items"][0]["minDate"].is_string());
        assert!(body["filters"][1]["items"][0]["maxDate"].is_string());
        assert_eq!(body["options"]["size"], 100);
        assert_eq!(body["options"]["from"], 200);
        assert_eq!(body["options"]["sortKey"], "date");
    }

    #[test]
    fn response_tolerates_missing_fields() {
        let empty: SearchResponse = serde_json::from_str("{}").unwrap();
        assert!(empty.search_results.is_empty());

        let partial: SearchResponse =
            serde_json::from_str(r#"{"searchResults": [{}, {"item": {"id": "x"}}]}"#).unwrap();
        assert_eq!(partial.search_results.len(), 2);
        assert!(partial.search_results[0].item.is_none());
        assert!(partial.search_results[1].item.is_some());
    }
}
