use crate::app::ports::DocumentFetcher;
use crate::error::{Result, ScraperError};
use crate::parser::{RecordExtractor, RecordParser};
use crate::storage::RecordSink;
use crate::types::{EnterpriseRecord, Seed};
use metrics::counter;
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{mpsc, Semaphore};
use tokio::task::{JoinError, JoinSet};
use tracing::{error, info, instrument, warn};

/// Result of a complete crawl run
#[derive(Debug, Default, Serialize)]
pub struct PipelineResult {
    pub seeds: usize,
    pub fetched: usize,
    pub stored: usize,
    pub errors: Vec<String>,
    pub duration_secs: f64,
}

/// seed → fetch → extract → persist.
///
/// A blocking producer feeds seeds through a channel, every seed becomes a
/// task (at most `concurrency` at a time) that fetches and extracts, and a
/// single consumer hands records to the sink. Records reach the sink in
/// completion order, not seed order.
pub struct Pipeline {
    fetcher: Arc<dyn DocumentFetcher>,
    parser: Arc<dyn RecordParser>,
    sink: Arc<dyn RecordSink>,
    concurrency: usize,
}

impl Pipeline {
    pub fn new(
        fetcher: Arc<dyn DocumentFetcher>,
        sink: Arc<dyn RecordSink>,
        concurrency: usize,
    ) -> Self {
        Self {
            fetcher,
            parser: Arc::new(RecordExtractor::new()),
            sink,
            concurrency: concurrency.max(1),
        }
    }

    pub fn with_parser(mut self, parser: Arc<dyn RecordParser>) -> Self {
        self.parser = parser;
        self
    }

    #[instrument(skip_all, fields(sink = self.sink.name(), concurrency = self.concurrency))]
    pub async fn run<I>(&self, seeds: I) -> Result<PipelineResult>
    where
        I: IntoIterator<Item = Seed> + Send + 'static,
        I::IntoIter: Send,
    {
        let started = Instant::now();
        let capacity = self.concurrency * 2;
        let (seed_tx, mut seed_rx) = mpsc::channel::<Seed>(capacity);
        let (record_tx, record_rx) = mpsc::channel::<EnterpriseRecord>(capacity);

        // Seed sources do synchronous I/O
        let producer = tokio::task::spawn_blocking(move || {
            let mut produced = 0usize;
            for seed in seeds {
                if seed_tx.blocking_send(seed).is_err() {
                    break;
                }
                produced += 1;
            }
            produced
        });

        let consumer = tokio::spawn(drain_to_sink(Arc::clone(&self.sink), record_rx));

        let semaphore = Arc::new(Semaphore::new(self.concurrency));
        let mut workers = JoinSet::new();
        let mut fetched = 0;
        let mut errors = Vec::new();
        while let Some(seed) = seed_rx.recv().await {
            while let Some(joined) = workers.try_join_next() {
                record_outcome(joined, &mut fetched, &mut errors);
            }
            let permit = Arc::clone(&semaphore)
                .acquire_owned()
                .await
                .map_err(|e| ScraperError::Pipeline(format!("worker semaphore closed: {e}")))?;
            counter!("kbo_seeds_dispatched_total").increment(1);

            let fetcher = Arc::clone(&self.fetcher);
            let parser = Arc::clone(&self.parser);
            let records = record_tx.clone();
            workers.spawn(async move {
                let _permit = permit;
                let record = fetch_and_extract(fetcher.as_ref(), parser.as_ref(), &seed).await?;
                records
                    .send(record)
                    .await
                    .map_err(|_| ScraperError::Pipeline("record channel closed".to_string()))
            });
        }
        drop(record_tx);

        while let Some(joined) = workers.join_next().await {
            record_outcome(joined, &mut fetched, &mut errors);
        }

        let seeds = producer
            .await
            .map_err(|e| ScraperError::Pipeline(format!("seed producer failed: {e}")))?;
        let (stored, store_errors) = consumer
            .await
            .map_err(|e| ScraperError::Pipeline(format!("sink consumer failed: {e}")))?;
        errors.extend(store_errors);

        let result = PipelineResult {
            seeds,
            fetched,
            stored,
            errors,
            duration_secs: started.elapsed().as_secs_f64(),
        };
        info!(
            seeds = result.seeds,
            fetched = result.fetched,
            stored = result.stored,
            errors = result.errors.len(),
            "Crawl finished"
        );
        Ok(result)
    }
}

fn record_outcome(
    joined: std::result::Result<Result<()>, JoinError>,
    fetched: &mut usize,
    errors: &mut Vec<String>,
) {
    match joined {
        Ok(Ok(())) => *fetched += 1,
        Ok(Err(e)) => {
            warn!("{}", e);
            counter!(failure_counter(&e)).increment(1);
            errors.push(e.to_string());
        }
        Err(e) => {
            error!("Worker task failed: {}", e);
            counter!("kbo_pipeline_errors_total").increment(1);
            errors.push(format!("worker task failed: {e}"));
        }
    }
}

/// Counter charged for a failed seed.
fn failure_counter(error: &ScraperError) -> &'static str {
    match error {
        ScraperError::Fetch { .. } => "kbo_fetch_failures_total",
        _ => "kbo_pipeline_errors_total",
    }
}

/// Fetch failures are tagged with the seed; extraction itself cannot fail.
async fn fetch_and_extract(
    fetcher: &dyn DocumentFetcher,
    parser: &dyn RecordParser,
    seed: &Seed,
) -> Result<EnterpriseRecord> {
    let html = fetcher.fetch(seed).await.map_err(|e| match e {
        fetch @ ScraperError::Fetch { .. } => fetch,
        other => ScraperError::Fetch {
            numero: seed.numero.clone(),
            message: other.to_string(),
        },
    })?;

    let record = parser.parse_record(&html, &seed.numero);
    counter!("kbo_records_extracted_total").increment(1);
    Ok(record)
}

async fn drain_to_sink(
    sink: Arc<dyn RecordSink>,
    mut records: mpsc::Receiver<EnterpriseRecord>,
) -> (usize, Vec<String>) {
    let mut stored = 0;
    let mut errors = Vec::new();
    while let Some(record) = records.recv().await {
        match sink.insert(&record).await {
            Ok(()) => {
                stored += 1;
                counter!("kbo_records_stored_total").increment(1);
            }
            Err(e) => {
                error!("Failed to store record {}: {}", record.numero, e);
                counter!("kbo_store_failures_total").increment(1);
                errors.push(format!("store {}: {}", record.numero, e));
            }
        }
    }
    (stored, errors)
}
