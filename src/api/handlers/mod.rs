use crate::config::AppConfig;
use crate::store::TournamentStore;

pub mod tournaments;

pub struct AppState {
    pub store: TournamentStore,
    pub config: AppConfig,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        let store = TournamentStore::from_settings(&config.storage);
        Self { store, config }
    }
}
