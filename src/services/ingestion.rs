use anyhow::Result;
use log::info;

use crate::config::AppConfig;
use crate::domain::{normalize, TournamentRecord};
use crate::fetchers::TournamentSearchClient;
use crate::store::TournamentStore;

/// One update cycle: fetch pages from the search API, flatten the raw
/// payloads, and merge them into the columnar store.
pub struct IngestionService {
    client: TournamentSearchClient,
    store: TournamentStore,
    max_pages: usize,
}

impl IngestionService {
    pub fn new(
        config: &AppConfig,
        max_pages: usize,
        min_delay_secs: f64,
        max_delay_secs: f64,
    ) -> Result<Self> {
        let client =
            TournamentSearchClient::new(config.search.clone(), min_delay_secs, max_delay_secs)?;
        let store = TournamentStore::from_settings(&config.storage);

        Ok(Self {
            client,
            store,
            max_pages,
        })
    }

    pub async fn run(&mut self) -> Result<()> {
        info!("=== Starting Tournament Update ===");

        let raw_tournaments = self.client.fetch_tournaments(self.max_pages).await;
        info!("  → Fetched {} raw tournaments", raw_tournaments.len());

        let records = self.normalize_all(raw_tournaments);
        info!("  → Normalized {} records", records.len());

        self.store.save(&records);
        info!("  → Merged into {}", self.store.path().display());

        info!("=== Update Complete ===");
        Ok(())
    }

    fn normalize_all(&self, raw_tournaments: Vec<serde_json::Value>) -> Vec<TournamentRecord> {
        raw_tournaments.iter().map(normalize).collect()
    }
}
