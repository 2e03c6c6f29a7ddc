use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScraperError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Fetch failed for {numero}: {message}")]
    Fetch { numero: String, message: String },

    #[error("Store error: {message}")]
    Store { message: String },

    #[error("Pipeline error: {0}")]
    Pipeline(String),
}

#[cfg(feature = "db")]
impl From<mongodb::error::Error> for ScraperError {
    fn from(err: mongodb::error::Error) -> Self {
        ScraperError::Store {
            message: err.to_string(),
        }
    }
}

#[cfg(feature = "db")]
impl From<mongodb::bson::ser::Error> for ScraperError {
    fn from(err: mongodb::bson::ser::Error) -> Self {
        ScraperError::Store {
            message: format!("BSON conversion failed: {err}"),
        }
    }
}

pub type Result<T> = std::result::Result<T, ScraperError>;
