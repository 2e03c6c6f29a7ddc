use crate::error::Result;
use crate::types::Seed;
use async_trait::async_trait;

/// Resolves a seed into the HTML of its detail page.
#[async_trait]
pub trait DocumentFetcher: Send + Sync {
    async fn fetch(&self, seed: &Seed) -> Result<String>;
}

#[async_trait]
pub trait RateLimiterPort: Send + Sync {
    async fn acquire(&self);
}
