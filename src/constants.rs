//! Registry endpoints, anchor texts and scan bounds.
//!
//! Anchors are the French labels of the public search pages. When the
//! registry changes its wording, this file is the place to edit.

/// Public search detail page, French edition.
pub const KBO_BASE_URL: &str = "https://kbopub.economie.fgov.be/kbopub/toonondernemingps.html?lang=fr";

/// Query parameter carrying the normalized enterprise number.
pub const ENTERPRISE_NUMBER_PARAM: &str = "ondernemingsnummer";

/// Header of the identifier column in the open data `enterprise.csv`.
pub const DEFAULT_ID_COLUMN: &str = "EnterpriseNumber";

pub const DEFAULT_MAX_SEEDS: usize = 10;

/// Shown by the registry when a section holds nothing.
pub const NO_DATA_SENTINEL: &str = "Pas de données reprises dans la BCE.";

/// Prefix of the "since" annotation spans.
pub const SINCE_PREFIX: &str = "Depuis le";

// Section headings (the `h2` inside a table row)
pub const HEADING_CAPACITIES: &str = "Capacités entrepreneuriales";
pub const HEADING_QUALIFICATIONS: &str = "Qualités";
pub const HEADING_AUTHORIZATIONS: &str = "Autorisations";
pub const HEADING_RELATED_ENTITIES: &str = "Liens entre entités";
pub const HEADING_EXTERNAL_LINKS: &str = "Liens externes";

// Table ids
pub const OFFICER_TABLE_ID: &str = "toonfctie";
pub const NACE_2008_TABLE_ID: &str = "toonbtw2008";
pub const NACE_2003_TABLE_ID: &str = "toonbtw";

// Row markers of the classification revisions
pub const NACE_2025_MARKER: &str = "TVA 2025";
pub const NACE_2008_MARKER: &str = "TVA 2008";
pub const NACE_2003_MARKER: &str = "TVA2003";

// Scan bounds
pub const MAX_CAPACITY_ROWS: usize = 2;
pub const MAX_QUALIFICATION_ENTRIES: usize = 5;
pub const MAX_QUALIFICATION_ROWS_WITHOUT_AUTHORIZATIONS: usize = 4;
pub const MAX_AUTHORIZATION_ROWS: usize = 3;
pub const MAX_RELATED_ENTITY_ROWS: usize = 20;

// Document store
pub const DEFAULT_STORE_USERNAME: &str = "root";
pub const DEFAULT_STORE_PASSWORD: &str = "password";
pub const DEFAULT_STORE_HOST: &str = "localhost:27017";
pub const DEFAULT_STORE_DATABASE: &str = "kbo";
pub const STORE_COLLECTION: &str = "entreprises";
