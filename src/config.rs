use crate::constants::{
    DEFAULT_ID_COLUMN, DEFAULT_MAX_SEEDS, DEFAULT_STORE_DATABASE, DEFAULT_STORE_HOST,
    DEFAULT_STORE_PASSWORD, DEFAULT_STORE_USERNAME, KBO_BASE_URL,
};
use crate::error::{Result, ScraperError};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::debug;

const DEFAULT_CONFIG_PATH: &str = "config.toml";

// Environment variables read by the store configuration
pub const ENV_STORE_USERNAME: &str = "MONGODB_USERNAME";
pub const ENV_STORE_PASSWORD: &str = "MONGODB_PASSWORD";
pub const ENV_STORE_HOST: &str = "MONGODB_URL";
pub const ENV_STORE_DATABASE: &str = "MONGODB_DATABASE";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub crawler: CrawlerConfig,
    pub store: StoreConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    pub base_url: String,
    pub id_column: String,
    pub max_seeds: usize,
    /// Detail pages fetched at the same time.
    pub concurrency: usize,
    /// Politeness bound; `None` disables the limiter.
    pub requests_per_min: Option<u64>,
    pub timeout_seconds: u64,
    pub user_agent: String,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            base_url: KBO_BASE_URL.to_string(),
            id_column: DEFAULT_ID_COLUMN.to_string(),
            max_seeds: DEFAULT_MAX_SEEDS,
            concurrency: 4,
            requests_per_min: Some(30),
            timeout_seconds: 30,
            user_agent: format!("kbo_scraper/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub username: String,
    pub password: String,
    /// `host:port` of the document store.
    pub host: String,
    pub database: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            username: DEFAULT_STORE_USERNAME.to_string(),
            password: DEFAULT_STORE_PASSWORD.to_string(),
            host: DEFAULT_STORE_HOST.to_string(),
            database: DEFAULT_STORE_DATABASE.to_string(),
        }
    }
}

impl StoreConfig {
    /// Credentials are percent-encoded, the host is used as given.
    pub fn connection_string(&self) -> String {
        format!(
            "mongodb://{}:{}@{}/",
            urlencoding::encode(&self.username),
            urlencoding::encode(&self.password),
            self.host
        )
    }

    /// Overrides fields from `lookup`, typically the process environment.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let value = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        if let Some(v) = value(ENV_STORE_USERNAME) {
            self.username = v;
        }
        if let Some(v) = value(ENV_STORE_PASSWORD) {
            self.password = v;
        }
        if let Some(v) = value(ENV_STORE_HOST) {
            self.host = v;
        }
        if let Some(v) = value(ENV_STORE_DATABASE) {
            self.database = v;
        }
    }
}

impl Config {
    /// Defaults, then the TOML file, then the environment.
    ///
    /// An explicit `path` must exist; without one `config.toml` is read when
    /// present.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None if Path::new(DEFAULT_CONFIG_PATH).exists() => {
                Self::from_file(Path::new(DEFAULT_CONFIG_PATH))?
            }
            None => Self::default(),
        };
        config.store.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            ScraperError::Config(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        debug!("Loaded configuration from {}", path.display());
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.crawler.concurrency == 0 {
            return Err(ScraperError::Config(
                "crawler.concurrency must be at least 1".to_string(),
            ));
        }
        if self.crawler.base_url.trim().is_empty() {
            return Err(ScraperError::Config(
                "crawler.base_url must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}
