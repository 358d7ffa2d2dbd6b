use crate::config::SearchSettings;
use crate::rate_limiter::RateLimiter;
use anyhow::{Context, Result};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;

/// HTTP client with a built-in inter-request politeness delay.
pub struct RateLimitedClient {
    client: Client,
    rate_limiter: RateLimiter,
}

impl RateLimitedClient {
    pub fn new(settings: &SearchSettings, min_delay_secs: f64, max_delay_secs: f64) -> Result<Self> {
        let client = Self::build_client(settings)?;
        let rate_limiter = RateLimiter::new(min_delay_secs, max_delay_secs);

        Ok(Self {
            client,
            rate_limiter,
        })
    }

    /// POST a JSON body, waiting out the politeness delay first.
    pub async fn post_json<T: Serialize>(&mut self, url: &str, body: &T) -> Result<reqwest::Response> {
        self.rate_limiter.wait().await;
        self.send_post_request(url, body).await
    }

    fn build_client(settings: &SearchSettings) -> Result<Client> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(settings.content_type));
        headers.insert(ACCEPT, HeaderValue::from_static(settings.accept));

        Client::builder()
            .user_agent(settings.user_agent)
            .default_headers(headers)
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .context("Failed to build HTTP client")
    }

    async fn send_post_request<T: Serialize>(&self, url: &str, body: &T) -> Result<reqwest::Response> {
        // Body is pre-encoded so the charset-qualified content type from the
        // default headers survives (reqwest's .json() would overwrite it).
        let payload = serde_json::to_vec(body).context("Failed to encode request body")?;

        self.client
            .post(url)
            .body(payload)
            .send()
            .await
            .context("Failed to send POST request")
    }
}
