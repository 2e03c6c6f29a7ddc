use anyhow::Result;
use async_trait::async_trait;
use kbo_scraper::app::ports::DocumentFetcher;
use kbo_scraper::error::ScraperError;
use kbo_scraper::parser::{RecordExtractor, RecordParser};
use kbo_scraper::pipeline::Pipeline;
use kbo_scraper::seeds::SeedReader;
use kbo_scraper::storage::{InMemorySink, JsonLinesSink};
use kbo_scraper::types::{EnterpriseRecord, Seed};
use std::collections::HashMap;
use std::io::Write;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tempfile::NamedTempFile;

const FIXTURE: &str = include_str!("fixtures/kbo_enterprise.html");
const BASE: &str = "https://kbopub.economie.fgov.be/kbopub/toonondernemingps.html?lang=fr";

/// Serves canned pages by URL; unknown URLs fail like a 404 would.
struct StubFetcher {
    pages: HashMap<String, String>,
    calls: AtomicUsize,
}

impl StubFetcher {
    fn new(pages: &[(&str, &str)]) -> Self {
        Self {
            pages: pages
                .iter()
                .map(|(url, html)| (url.to_string(), html.to_string()))
                .collect(),
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl DocumentFetcher for StubFetcher {
    async fn fetch(&self, seed: &Seed) -> kbo_scraper::error::Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.pages
            .get(&seed.url)
            .cloned()
            .ok_or_else(|| ScraperError::Fetch {
                numero: seed.numero.clone(),
                message: "detail page request failed with status: 404 Not Found".to_string(),
            })
    }
}

fn url(digits: &str) -> String {
    format!("{BASE}&ondernemingsnummer={digits}")
}

fn seed_file(rows: &[&str]) -> Result<NamedTempFile> {
    let mut file = NamedTempFile::new()?;
    writeln!(file, "EnterpriseNumber,Status,JuridicalSituation")?;
    for row in rows {
        writeln!(file, "{row}")?;
    }
    file.flush()?;
    Ok(file)
}

#[tokio::test]
async fn test_crawl_stores_every_fetched_page() -> Result<()> {
    let seeds = seed_file(&[
        "0403.170.701,AC,000",
        "0200.065.765,AC,000",
        ",AC,000",
        "0200.068.636,AC,000",
    ])?;
    let fetcher = Arc::new(StubFetcher::new(&[
        (url("0403170701").as_str(), FIXTURE),
        (url("0200065765").as_str(), "<html><body><table></table></body></html>"),
    ]));
    let sink = InMemorySink::new();

    let reader = SeedReader::open(seeds.path(), "EnterpriseNumber", BASE, 10)?;
    let result = Pipeline::new(fetcher.clone(), Arc::new(sink.clone()), 2)
        .run(reader)
        .await?;

    assert_eq!(result.seeds, 3);
    assert_eq!(result.fetched, 2);
    assert_eq!(result.stored, 2);
    assert_eq!(result.errors.len(), 1);
    assert!(result.errors[0].contains("0200.068.636"));
    assert_eq!(fetcher.calls.load(Ordering::SeqCst), 3);

    let mut records: Vec<EnterpriseRecord> = sink.records().await;
    records.sort_by(|a, b| a.numero.cmp(&b.numero));
    assert_eq!(records[0].numero, "0200.065.765");
    assert!(records[0].generalites.is_empty());
    assert_eq!(records[1].numero, "0403.170.701");
    assert_eq!(
        records[1].generalites.denomination.as_deref(),
        Some("Brasserie du Parc")
    );
    Ok(())
}

#[tokio::test]
async fn test_crawl_respects_seed_limit() -> Result<()> {
    let rows: Vec<String> = (0..10).map(|i| format!("0400.000.00{i},AC,000")).collect();
    let rows: Vec<&str> = rows.iter().map(String::as_str).collect();
    let seeds = seed_file(&rows)?;
    let fetcher = Arc::new(StubFetcher::new(&[]));
    let sink = InMemorySink::new();

    let reader = SeedReader::open(seeds.path(), "EnterpriseNumber", BASE, 4)?;
    let result = Pipeline::new(fetcher.clone(), Arc::new(sink.clone()), 3)
        .run(reader)
        .await?;

    assert_eq!(result.seeds, 4);
    assert_eq!(fetcher.calls.load(Ordering::SeqCst), 4);
    assert_eq!(result.stored, 0);
    assert_eq!(result.errors.len(), 4);
    assert_eq!(sink.len().await, 0);
    Ok(())
}

#[tokio::test]
async fn test_crawl_to_json_lines() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let output = dir.path().join("entreprises.jsonl");
    let fetcher = Arc::new(StubFetcher::new(&[(url("0403170701").as_str(), FIXTURE)]));
    let sink = Arc::new(JsonLinesSink::create(&output).await?);

    let seeds = vec![Seed {
        numero: "0403.170.701".to_string(),
        url: url("0403170701"),
    }];
    let result = Pipeline::new(fetcher, sink, 1).run(seeds).await?;
    assert_eq!(result.stored, 1);

    let content = std::fs::read_to_string(&output)?;
    let record: EnterpriseRecord = serde_json::from_str(content.trim())?;
    assert_eq!(record.numero, "0403.170.701");
    assert_eq!(record.nace_codes.nace_2025.len(), 1);
    assert_eq!(record.liens_externes.len(), 2);
    Ok(())
}

/// Tags every record so the test can tell it went through this parser.
struct TaggingParser;

impl RecordParser for TaggingParser {
    fn parse_record(&self, html: &str, numero: &str) -> EnterpriseRecord {
        let mut record = RecordExtractor::new().extract_html(html, numero);
        record.generalites.statut = Some("tagged".to_string());
        record
    }
}

#[tokio::test]
async fn test_crawl_uses_the_configured_parser() -> Result<()> {
    let fetcher = Arc::new(StubFetcher::new(&[(url("0403170701").as_str(), FIXTURE)]));
    let sink = InMemorySink::new();
    let seeds = vec![Seed {
        numero: "0403.170.701".to_string(),
        url: url("0403170701"),
    }];

    let result = Pipeline::new(fetcher, Arc::new(sink.clone()), 1)
        .with_parser(Arc::new(TaggingParser))
        .run(seeds)
        .await?;

    assert_eq!(result.stored, 1);
    let records = sink.records().await;
    assert_eq!(records[0].generalites.statut.as_deref(), Some("tagged"));
    assert_eq!(
        records[0].generalites.denomination.as_deref(),
        Some("Brasserie du Parc")
    );
    Ok(())
}

#[tokio::test]
async fn test_many_seeds_with_single_worker() -> Result<()> {
    let fetcher = Arc::new(StubFetcher::new(&[(url("0403170701").as_str(), FIXTURE)]));
    let sink = InMemorySink::new();
    let seeds: Vec<Seed> = (0..12)
        .map(|i| Seed {
            numero: format!("seed-{i}"),
            url: if i % 3 == 0 { url("0403170701") } else { url("0") },
        })
        .collect();

    let result = Pipeline::new(fetcher.clone(), Arc::new(sink.clone()), 1)
        .run(seeds)
        .await?;

    assert_eq!(result.seeds, 12);
    assert_eq!(result.fetched, 4);
    assert_eq!(result.stored, 4);
    assert_eq!(result.errors.len(), 8);
    assert_eq!(fetcher.calls.load(Ordering::SeqCst), 12);
    Ok(())
}

#[test]
fn test_missing_seed_column_fails_before_crawling() -> Result<()> {
    let mut file = NamedTempFile::new()?;
    writeln!(file, "Number,Status")?;
    writeln!(file, "0403.170.701,AC")?;
    file.flush()?;

    let result = SeedReader::open(file.path(), "EnterpriseNumber", BASE, 10);
    assert!(matches!(result, Err(ScraperError::MissingField(_))));
    Ok(())
}
