use crate::app::ports::{DocumentFetcher, RateLimiterPort};
use crate::config::CrawlerConfig;
use crate::error::{Result, ScraperError};
use crate::infra::rate_limiter::RateLimiter;
use crate::types::Seed;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE};
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument};

/// Fetches registry detail pages over HTTP, one rate-limited GET per seed.
pub struct ReqwestFetcher {
    client: Client,
    limiter: Arc<dyn RateLimiterPort>,
}

impl ReqwestFetcher {
    pub fn new(config: &CrawlerConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8"),
        );
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("fr-BE,fr;q=0.9"));

        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Self {
            client,
            limiter: Arc::new(RateLimiter::new(config.requests_per_min)),
        })
    }
}

#[async_trait]
impl DocumentFetcher for ReqwestFetcher {
    #[instrument(skip(self, seed), fields(numero = %seed.numero))]
    async fn fetch(&self, seed: &Seed) -> Result<String> {
        self.limiter.acquire().await;

        let response = self.client.get(&seed.url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ScraperError::Fetch {
                numero: seed.numero.clone(),
                message: format!("detail page request failed with status: {status}"),
            });
        }

        let body = response.text().await?;
        if body.trim().is_empty() {
            return Err(ScraperError::Fetch {
                numero: seed.numero.clone(),
                message: "detail page body is empty".to_string(),
            });
        }
        debug!(bytes = body.len(), "Fetched detail page");
        Ok(body)
    }
}
