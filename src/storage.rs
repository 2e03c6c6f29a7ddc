use crate::error::Result;
use crate::types::EnterpriseRecord;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs::{self, File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::debug;

/// Destination of extracted records: one insert per record, no updates.
#[async_trait]
pub trait RecordSink: Send + Sync {
    async fn insert(&self, record: &EnterpriseRecord) -> Result<()>;

    /// Short name used in logs.
    fn name(&self) -> &'static str;
}

/// In-memory sink for development/testing
#[derive(Default, Clone)]
pub struct InMemorySink {
    records: Arc<Mutex<Vec<EnterpriseRecord>>>,
}

impl InMemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn records(&self) -> Vec<EnterpriseRecord> {
        self.records.lock().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.records.lock().await.len()
    }
}

#[async_trait]
impl RecordSink for InMemorySink {
    async fn insert(&self, record: &EnterpriseRecord) -> Result<()> {
        self.records.lock().await.push(record.clone());
        debug!("Stored record {} in memory", record.numero);
        Ok(())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}

/// Appends one JSON document per line.
pub struct JsonLinesSink {
    path: PathBuf,
    file: Mutex<File>,
}

impl JsonLinesSink {
    pub async fn create(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await?;
        }
        let file = OpenOptions::new().create(true).append(true).open(path).await?;
        Ok(Self {
            path: path.to_path_buf(),
            file: Mutex::new(file),
        })
    }

}

#[async_trait]
impl RecordSink for JsonLinesSink {
    async fn insert(&self, record: &EnterpriseRecord) -> Result<()> {
        let mut line = serde_json::to_vec(record)?;
        line.push(b'\n');

        let mut file = self.file.lock().await;
        file.write_all(&line).await?;
        file.flush().await?;
        debug!("Appended record {} to {}", record.numero, self.path.display());
        Ok(())
    }

    fn name(&self) -> &'static str {
        "jsonl"
    }
}

#[cfg(feature = "db")]
pub use mongo::MongoSink;

#[cfg(feature = "db")]
mod mongo {
    use super::RecordSink;
    use crate::config::StoreConfig;
    use crate::constants::STORE_COLLECTION;
    use crate::error::Result;
    use crate::types::EnterpriseRecord;
    use async_trait::async_trait;
    use mongodb::bson::{self, Document};
    use mongodb::{Client, Collection};
    use tracing::{debug, info};

    /// Inserts each record as one document of the `entreprises` collection.
    pub struct MongoSink {
        collection: Collection<Document>,
    }

    impl MongoSink {
        pub async fn connect(config: &StoreConfig) -> Result<Self> {
            let client = Client::with_uri_str(config.connection_string()).await?;
            let collection = client
                .database(&config.database)
                .collection::<Document>(STORE_COLLECTION);
            info!(
                host = %config.host,
                database = %config.database,
                collection = STORE_COLLECTION,
                "Connected to document store"
            );
            Ok(Self { collection })
        }
    }

    #[async_trait]
    impl RecordSink for MongoSink {
        async fn insert(&self, record: &EnterpriseRecord) -> Result<()> {
            let document = bson::to_document(record)?;
            let result = self.collection.insert_one(document, None).await?;
            debug!("Inserted record {} as {}", record.numero, result.inserted_id);
            Ok(())
        }

        fn name(&self) -> &'static str {
            "mongo"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::RecordExtractor;

    fn record(numero: &str) -> EnterpriseRecord {
        RecordExtractor::new().extract_html("<html></html>", numero)
    }

    #[tokio::test]
    async fn test_in_memory_keeps_insert_order() {
        let sink = InMemorySink::new();
        sink.insert(&record("1")).await.unwrap();
        sink.insert(&record("2")).await.unwrap();

        let numeros: Vec<String> = sink.records().await.into_iter().map(|r| r.numero).collect();
        assert_eq!(numeros, vec!["1", "2"]);
    }

    #[tokio::test]
    async fn test_json_lines_appends_one_document_per_record() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("entreprises.jsonl");
        let sink = JsonLinesSink::create(&path).await.unwrap();
        sink.insert(&record("0200.065.765")).await.unwrap();
        sink.insert(&record("0200.068.636")).await.unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        let first: EnterpriseRecord = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first.numero, "0200.065.765");
    }
}
