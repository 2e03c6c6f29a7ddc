use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use kbo_scraper::config::Config;
use kbo_scraper::infra::http_client::ReqwestFetcher;
use kbo_scraper::logging;
use kbo_scraper::parser::RecordExtractor;
use kbo_scraper::pipeline::{Pipeline, PipelineResult};
use kbo_scraper::seeds::SeedReader;
use kbo_scraper::storage::{JsonLinesSink, RecordSink};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info, warn};

#[derive(Parser)]
#[command(name = "kbo_scraper")]
#[command(about = "Belgian enterprise registry (KBO/BCE) detail page scraper")]
#[command(version = "0.1.0")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch, extract and store the enterprises listed in a seed CSV
    Crawl {
        /// CSV file with a header row containing the enterprise number column
        #[arg(long)]
        seeds: PathBuf,
        /// Maximum number of seeds to process (overrides crawler.max_seeds)
        #[arg(long)]
        limit: Option<usize>,
        /// TOML configuration file (defaults to ./config.toml when present)
        #[arg(long)]
        config: Option<PathBuf>,
        /// Defaults to mongo when built with the `db` feature, jsonl otherwise
        #[arg(long, value_enum, default_value_t = SinkKind::DEFAULT)]
        sink: SinkKind,
        /// Output file for the jsonl sink
        #[arg(long, default_value = "output/entreprises.jsonl")]
        output: PathBuf,
    },
    /// Extract one record from a saved detail page and print it as JSON
    Extract {
        #[arg(long)]
        html: PathBuf,
        #[arg(long)]
        numero: String,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum SinkKind {
    Mongo,
    Jsonl,
}

impl SinkKind {
    #[cfg(feature = "db")]
    const DEFAULT: SinkKind = SinkKind::Mongo;
    #[cfg(not(feature = "db"))]
    const DEFAULT: SinkKind = SinkKind::Jsonl;
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let _guard = logging::init_logging();

    let cli = Cli::parse();

    match cli.command {
        Commands::Crawl {
            seeds,
            limit,
            config,
            sink,
            output,
        } => {
            let config = Config::load(config.as_deref())?;
            let limit = limit.unwrap_or(config.crawler.max_seeds);
            info!(seeds = %seeds.display(), limit, "Starting crawl");

            let reader = SeedReader::open(
                &seeds,
                &config.crawler.id_column,
                &config.crawler.base_url,
                limit,
            )?;
            let fetcher = Arc::new(ReqwestFetcher::new(&config.crawler)?);
            let sink = build_sink(sink, &config, &output).await?;

            let pipeline = Pipeline::new(fetcher, sink, config.crawler.concurrency);
            match pipeline.run(reader).await {
                Ok(result) => report(&result),
                Err(e) => {
                    error!("Crawl failed: {}", e);
                    return Err(e.into());
                }
            }
        }
        Commands::Extract { html, numero } => {
            let content = std::fs::read_to_string(&html)
                .with_context(|| format!("reading {}", html.display()))?;
            let record = RecordExtractor::new().extract_html(&content, &numero);
            println!("{}", serde_json::to_string_pretty(&record)?);
        }
    }
    Ok(())
}

async fn build_sink(
    kind: SinkKind,
    config: &Config,
    output: &std::path::Path,
) -> anyhow::Result<Arc<dyn RecordSink>> {
    match kind {
        SinkKind::Jsonl => Ok(Arc::new(JsonLinesSink::create(output).await?)),
        #[cfg(feature = "db")]
        SinkKind::Mongo => Ok(Arc::new(
            kbo_scraper::storage::MongoSink::connect(&config.store).await?,
        )),
        #[cfg(not(feature = "db"))]
        SinkKind::Mongo => {
            let _ = config;
            Err(kbo_scraper::error::ScraperError::Config(
                "the mongo sink requires building with --features db".to_string(),
            )
            .into())
        }
    }
}

fn report(result: &PipelineResult) {
    println!("\n📊 Crawl Results:");
    println!("   Seeds: {}", result.seeds);
    println!("   Fetched: {}", result.fetched);
    println!("   Stored: {}", result.stored);
    println!("   Errors: {}", result.errors.len());
    println!("   Duration: {:.1}s", result.duration_secs);

    if !result.errors.is_empty() {
        warn!("{} errors encountered during crawl", result.errors.len());
        println!("\n⚠️  Errors encountered:");
        for error in &result.errors {
            println!("   - {}", error);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn crawl_sink(args: &[&str]) -> SinkKind {
        let cli = Cli::try_parse_from(args).unwrap();
        match cli.command {
            Commands::Crawl { sink, .. } => sink,
            Commands::Extract { .. } => panic!("expected crawl"),
        }
    }

    #[test]
    fn test_default_sink_matches_build() {
        let sink = crawl_sink(&["kbo_scraper", "crawl", "--seeds", "enterprise.csv"]);
        if cfg!(feature = "db") {
            assert_eq!(sink, SinkKind::Mongo);
        } else {
            assert_eq!(sink, SinkKind::Jsonl);
        }
    }

    #[test]
    fn test_explicit_sink_wins() {
        let sink = crawl_sink(&["kbo_scraper", "crawl", "--seeds", "e.csv", "--sink", "mongo"]);
        assert_eq!(sink, SinkKind::Mongo);
    }
}
