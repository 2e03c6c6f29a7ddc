use crate::constants::ENTERPRISE_NUMBER_PARAM;
use crate::error::{Result, ScraperError};
use crate::types::Seed;
use csv::{ReaderBuilder, StringRecordsIntoIter};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::warn;

/// Keeps the digits of an enterprise number (`0403.170.701` → `0403170701`).
pub fn normalize_enterprise_number(raw: &str) -> String {
    raw.chars().filter(char::is_ascii_digit).collect()
}

pub fn detail_url(base_url: &str, normalized: &str) -> String {
    format!("{base_url}&{ENTERPRISE_NUMBER_PARAM}={normalized}")
}

/// Lazy, capped stream of seeds read from a CSV file with a header row.
///
/// Rows without a usable identifier are skipped and do not count toward the
/// cap.
pub struct SeedReader<R: Read> {
    records: StringRecordsIntoIter<R>,
    column: usize,
    base_url: String,
    limit: usize,
    emitted: usize,
    line: usize,
}

impl SeedReader<File> {
    pub fn open(path: &Path, id_column: &str, base_url: &str, limit: usize) -> Result<Self> {
        let file = File::open(path).map_err(|e| {
            ScraperError::Config(format!("Failed to open seed file '{}': {}", path.display(), e))
        })?;
        Self::from_reader(file, id_column, base_url, limit)
    }
}

impl<R: Read> SeedReader<R> {
    pub fn from_reader(reader: R, id_column: &str, base_url: &str, limit: usize) -> Result<Self> {
        let mut csv = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let column = csv
            .headers()?
            .iter()
            .position(|header| header.trim_start_matches('\u{feff}') == id_column)
            .ok_or_else(|| ScraperError::MissingField(format!("seed column '{id_column}'")))?;

        Ok(Self {
            records: csv.into_records(),
            column,
            base_url: base_url.to_string(),
            limit,
            emitted: 0,
            line: 1,
        })
    }
}

impl<R: Read> Iterator for SeedReader<R> {
    type Item = Seed;

    fn next(&mut self) -> Option<Seed> {
        if self.emitted >= self.limit {
            return None;
        }

        for result in self.records.by_ref() {
            self.line += 1;
            let record = match result {
                Ok(record) => record,
                Err(e) => {
                    warn!(line = self.line, "Skipping malformed seed row: {}", e);
                    continue;
                }
            };

            let raw = record.get(self.column).unwrap_or("").trim();
            if raw.is_empty() {
                warn!(line = self.line, "Skipping seed row without identifier");
                continue;
            }
            let normalized = normalize_enterprise_number(raw);
            if normalized.is_empty() {
                warn!(line = self.line, identifier = raw, "Skipping identifier without digits");
                continue;
            }

            self.emitted += 1;
            return Some(Seed {
                numero: raw.to_string(),
                url: detail_url(&self.base_url, &normalized),
            });
        }
        None
    }
}
