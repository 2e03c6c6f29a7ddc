//! Registry detail page → [`EnterpriseRecord`].
//!
//! Every sub-extractor is a plain function of the parsed document. None of
//! them fails: a missing section yields an empty container and the record
//! is always produced.

pub mod authorizations;
pub mod capacities;
pub mod dom;
pub mod functions;
pub mod labeled;
pub mod links;
pub mod nace;
pub mod qualifications;

use crate::types::EnterpriseRecord;
use scraper::Html;
use tracing::{debug, instrument};

pub use authorizations::extract_authorizations;
pub use capacities::extract_capacities;
pub use functions::extract_officer_functions;
pub use labeled::{extract_financial_summary, extract_generalities};
pub use links::{extract_external_links, extract_related_entity_links};
pub use nace::{extract_all_nace_codes, extract_nace_codes};
pub use qualifications::extract_qualifications;

/// Turns a fetched page into a record.
pub trait RecordParser: Send + Sync {
    fn parse_record(&self, html: &str, numero: &str) -> EnterpriseRecord;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RecordExtractor;

impl RecordExtractor {
    pub fn new() -> Self {
        Self
    }

    /// `numero` comes from the seed and is carried through as is.
    #[instrument(level = "debug", skip(self, document))]
    pub fn extract(&self, document: &Html, numero: &str) -> EnterpriseRecord {
        let record = EnterpriseRecord {
            numero: numero.to_string(),
            generalites: extract_generalities(document),
            fonctions: extract_officer_functions(document),
            capacites: extract_capacities(document),
            qualites: extract_qualifications(document),
            autorisations: extract_authorizations(document),
            nace_codes: extract_all_nace_codes(document),
            donnees_financieres: extract_financial_summary(document),
            liens_entites: extract_related_entity_links(document),
            liens_externes: extract_external_links(document),
        };

        debug!(
            functions = record.fonctions.len(),
            qualifications = record.qualites.len(),
            authorizations = record.autorisations.len(),
            nace_2025 = record.nace_codes.nace_2025.len(),
            nace_2008 = record.nace_codes.nace_2008.len(),
            nace_2003 = record.nace_codes.nace_2003.len(),
            related = record.liens_entites.len(),
            "Extracted enterprise record"
        );
        record
    }

    pub fn extract_html(&self, html: &str, numero: &str) -> EnterpriseRecord {
        let document = Html::parse_document(html);
        self.extract(&document, numero)
    }
}

impl RecordParser for RecordExtractor {
    fn parse_record(&self, html: &str, numero: &str) -> EnterpriseRecord {
        self.extract_html(html, numero)
    }
}
