use anyhow::Result;
use log::{error, info};
use serde_json::Value;

use crate::config::SearchSettings;
use crate::fetchers::query::{SearchQuery, SearchResponse};
use crate::http::RateLimitedClient;
use crate::pagination::PageIterator;

/// Client for the tournament unified-search API.
pub struct TournamentSearchClient {
    settings: SearchSettings,
    client: RateLimitedClient,
}

impl TournamentSearchClient {
    pub fn new(
        settings: SearchSettings,
        min_delay_secs: f64,
        max_delay_secs: f64,
    ) -> Result<Self> {
        let client = RateLimitedClient::new(&settings, min_delay_secs, max_delay_secs)?;
        Ok(Self { settings, client })
    }

    /// Fetch raw tournament payloads page by page.
    ///
    /// Stops at a 204, a short page, the page cap, or the first transport or
    /// decode error. Whatever has been accumulated so far is always returned,
    /// never discarded.
    pub async fn fetch_tournaments(&mut self, max_pages: usize) -> Vec<Value> {
        let mut all_tournaments = Vec::new();
        let mut pages = PageIterator::new(self.settings.page_size, Some(max_pages));

        info!("Fetching tournaments (up to {max_pages} pages)");

        while !pages.has_reached_max() {
            let query = SearchQuery::nationwide(&self.settings, pages.offset());

            let response = match self.client.post_json(&self.settings.endpoint, &query).await {
                Ok(response) => response,
                Err(e) => {
                    error!("Request for page {} failed: {e:#}", pages.current_page() + 1);
                    break;
                }
            };

            let status = response.status();
            if status == reqwest::StatusCode::NO_CONTENT {
                info!("No more results (204)");
                break;
            }
            if !status.is_success() {
                error!(
                    "Search API returned HTTP {status} on page {}",
                    pages.current_page() + 1
                );
                break;
            }

            let page: SearchResponse = match response.json().await {
                Ok(page) => page,
                Err(e) => {
                    error!("Failed to decode page {}: {e:#}", pages.current_page() + 1);
                    break;
                }
            };

            let envelope_count = page.search_results.len();
            let items = page
                .search_results
                .into_iter()
                .filter_map(|result| result.item)
                .filter(is_nonempty_item);

            let before = all_tournaments.len();
            all_tournaments.extend(items);
            info!(
                "Page {}: {} tournaments",
                pages.current_page() + 1,
                all_tournaments.len() - before
            );

            // A short page means the index has been exhausted.
            if envelope_count < self.settings.page_size {
                break;
            }

            pages.advance();
        }

        info!("Fetched {} tournaments in total", all_tournaments.len());
        all_tournaments
    }
}

fn is_nonempty_item(item: &Value) -> bool {
    !item.is_null() && item.as_object().is_none_or(|obj| !obj.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    fn test_settings(server: &mockito::ServerGuard, page_size: usize) -> SearchSettings {
        SearchSettings {
            endpoint: format!("{}/search", server.url()),
            page_size,
            ..SearchSettings::default()
        }
    }

    fn page_body(ids: &[&str]) -> String {
        let results: Vec<Value> = ids
            .iter()
            .map(|id| serde_json::json!({"item": {"id": id}}))
            .collect();
        serde_json::json!({"searchResults": results}).to_string()
    }

    fn mock_page(server: &mut mockito::ServerGuard, from: usize, body: &str) -> mockito::Mock {
        server
            .mock("POST", "/search")
            .match_body(Matcher::PartialJson(
                serde_json::json!({"options": {"from": from}}),
            ))
            .with_status(200)
            .with_body(body)
            .create()
    }

    #[tokio::test]
    async fn fetches_until_a_short_page() {
        let mut server = mockito::Server::new_async().await;
        let full = mock_page(&mut server, 0, &page_body(&["a", "b"]));
        let short = mock_page(&mut server, 2, &page_body(&["c"]));

        let mut client = TournamentSearchClient::new(test_settings(&server, 2), 0.0, 0.0).unwrap();
        let tournaments = client.fetch_tournaments(10).await;

        full.assert();
        short.assert();
        assert_eq!(tournaments.len(), 3);
        assert_eq!(tournaments[2]["id"], "c");
    }

    #[tokio::test]
    async fn stops_at_204_with_results_so_far() {
        let mut server = mockito::Server::new_async().await;
        mock_page(&mut server, 0, &page_body(&["a", "b"]));
        let end = server
            .mock("POST", "/search")
            .match_body(Matcher::PartialJson(
                serde_json::json!({"options": {"from": 2}}),
            ))
            .with_status(204)
            .create();

        let mut client = TournamentSearchClient::new(test_settings(&server, 2), 0.0, 0.0).unwrap();
        let tournaments = client.fetch_tournaments(10).await;

        end.assert();
        assert_eq!(tournaments.len(), 2);
    }

    #[tokio::test]
    async fn server_error_keeps_earlier_pages() {
        let mut server = mockito::Server::new_async().await;
        mock_page(&mut server, 0, &page_body(&["a", "b"]));
        server
            .mock("POST", "/search")
            .match_body(Matcher::PartialJson(
                serde_json::json!({"options": {"from": 2}}),
            ))
            .with_status(500)
            .create();

        let mut client = TournamentSearchClient::new(test_settings(&server, 2), 0.0, 0.0).unwrap();
        let tournaments = client.fetch_tournaments(10).await;

        assert_eq!(tournaments.len(), 2);
    }

    #[tokio::test]
    async fn respects_the_page_cap() {
        let mut server = mockito::Server::new_async().await;
        let first = mock_page(&mut server, 0, &page_body(&["a", "b"]));

        let mut client = TournamentSearchClient::new(test_settings(&server, 2), 0.0, 0.0).unwrap();
        let tournaments = client.fetch_tournaments(1).await;

        first.assert();
        assert_eq!(tournaments.len(), 2);
    }

    #[tokio::test]
    async fn skips_null_and_empty_items() {
        let mut server = mockito::Server::new_async().await;
        let body = serde_json::json!({
            "searchResults": [
                {"item": {"id": "a"}},
                {"item": null},
                {"item": {}},
                {},
            ]
        })
        .to_string();
        mock_page(&mut server, 0, &body);

        let mut client = TournamentSearchClient::new(test_settings(&server, 100), 0.0, 0.0).unwrap();
        let tournaments = client.fetch_tournaments(10).await;

        assert_eq!(tournaments.len(), 1);
        assert_eq!(tournaments[0]["id"], "a");
    }
}
