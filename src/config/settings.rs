use std::path::PathBuf;

/// Base URL for human-facing tournament pages; the org slug and the
/// record's url path are appended to build a full link.
pub const COMPETITIONS_BASE_URL: &str = "https://playtennis.usta.com/Competitions/";

/// Parameters for the USTA unified-search API.
#[derive(Debug, Clone)]
pub struct SearchSettings {
    pub endpoint: String,
    pub user_agent: &'static str,
    pub accept: &'static str,
    pub content_type: &'static str,
    /// Results per page; a short page signals the end of results.
    pub page_size: usize,
    /// Search radius in miles; large enough to cover the whole country.
    pub distance_miles: u32,
    /// Search origin (center of the continental US).
    pub latitude: f64,
    pub longitude: f64,
    pub sort_key: &'static str,
    /// Query window: today through today + this many days.
    pub date_window_days: i64,
    pub timeout_secs: u64,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            endpoint: "https://prd-usta-kube.clubspark.pro/unified-search-api/api/Search/tournaments/Query?indexSchema=tournament".to_string(),
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/136.0.0.0 Safari/537.36",
            accept: "application/json, text/plain, */*",
            content_type: "application/json;charset=UTF-8",
            page_size: 100,
            distance_miles: 5000,
            latitude: 39.8283,
            longitude: -98.5795,
            sort_key: "date",
            date_window_days: 365,
            timeout_secs: 30,
        }
    }
}

/// Where the Parquet projections live.
#[derive(Debug, Clone)]
pub struct StorageSettings {
    pub data_dir: PathBuf,
    pub tournaments_file: String,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            tournaments_file: "tournaments.parquet".to_string(),
        }
    }
}

impl StorageSettings {
    pub fn tournaments_path(&self) -> PathBuf {
        self.data_dir.join(&self.tournaments_file)
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub search: SearchSettings,
    pub storage: StorageSettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl AppConfig {
    pub fn new() -> Self {
        Self {
            search: SearchSettings::default(),
            storage: StorageSettings::default(),
        }
    }
}
