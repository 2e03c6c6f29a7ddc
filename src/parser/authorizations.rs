use super::dom;
use crate::constants::{HEADING_AUTHORIZATIONS, MAX_AUTHORIZATION_ROWS, NO_DATA_SENTINEL};
use crate::types::Authorization;
use scraper::{ElementRef, Html};

/// Authorizations are links to the issuing body. The "no data" line is kept
/// as an entry so consumers can tell "none recorded" from "not parsed".
pub fn extract_authorizations(document: &Html) -> Vec<Authorization> {
    let Some(heading) = dom::find_heading_row(document, HEADING_AUTHORIZATIONS) else {
        return Vec::new();
    };

    if dom::section_has_no_data(heading) {
        return vec![no_data()];
    }

    dom::section_rows(heading)
        .take(MAX_AUTHORIZATION_ROWS)
        .filter_map(authorization_from_row)
        .collect()
}

fn no_data() -> Authorization {
    Authorization {
        description: NO_DATA_SENTINEL.to_string(),
        url: None,
    }
}

fn authorization_from_row(row: ElementRef<'_>) -> Option<Authorization> {
    match dom::first_link_text(row) {
        Some(description) => Some(Authorization {
            description,
            url: dom::first_link_href(row),
        }),
        None => dom::row_text(row)
            .filter(|text| text.contains(NO_DATA_SENTINEL))
            .map(|_| no_data()),
    }
}
