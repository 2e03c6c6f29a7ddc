//! The "Qualités" section.
//!
//! Unlike the other sections it has no fixed length, so where it ends
//! depends on whether the page also has an "Autorisations" section:
//!
//! * with one, the section runs until the next heading row, blank rows are
//!   skipped and at most [`MAX_QUALIFICATION_ENTRIES`] rows are read;
//! * without one, only the first
//!   [`MAX_QUALIFICATION_ROWS_WITHOUT_AUTHORIZATIONS`] rows are looked at.
//!
//! The registry's "no data" line is never kept as a qualification.

use super::dom;
use crate::constants::{
    HEADING_AUTHORIZATIONS, HEADING_QUALIFICATIONS, MAX_QUALIFICATION_ENTRIES,
    MAX_QUALIFICATION_ROWS_WITHOUT_AUTHORIZATIONS, NO_DATA_SENTINEL,
};
use crate::types::Qualification;
use scraper::{ElementRef, Html};
use tracing::debug;

pub fn extract_qualifications(document: &Html) -> Vec<Qualification> {
    let Some(heading) = dom::find_heading_row(document, HEADING_QUALIFICATIONS) else {
        return Vec::new();
    };

    if dom::find_heading_row(document, HEADING_AUTHORIZATIONS).is_some() {
        until_next_heading(document, heading)
    } else {
        leading_rows(heading)
    }
}

fn until_next_heading(document: &Html, heading: ElementRef<'_>) -> Vec<Qualification> {
    let mut qualifications_at = None;
    let mut authorizations_at = None;
    for (index, row) in dom::heading_rows(document).enumerate() {
        if dom::is_heading(row, HEADING_QUALIFICATIONS) {
            qualifications_at = Some(index);
        } else if dom::is_heading(row, HEADING_AUTHORIZATIONS) {
            authorizations_at = Some(index);
            break;
        }
    }

    match (qualifications_at, authorizations_at) {
        (Some(q), Some(a)) if q < a => {}
        _ => {
            debug!("Qualifications heading does not precede authorizations, skipping section");
            return Vec::new();
        }
    }

    let mut qualifications = Vec::new();
    let mut read = 0;
    for row in dom::section_rows(heading) {
        let Some(text) = dom::row_text(row).filter(|t| !t.trim().is_empty()) else {
            continue;
        };
        qualifications.extend(qualification_from(row, text));
        read += 1;
        if read >= MAX_QUALIFICATION_ENTRIES {
            break;
        }
    }
    qualifications
}

fn leading_rows(heading: ElementRef<'_>) -> Vec<Qualification> {
    dom::section_rows(heading)
        .take(MAX_QUALIFICATION_ROWS_WITHOUT_AUTHORIZATIONS)
        .filter_map(|row| dom::row_text(row).and_then(|text| qualification_from(row, text)))
        .collect()
}

fn qualification_from(row: ElementRef<'_>, text: &str) -> Option<Qualification> {
    let description = dom::clean(text).filter(|d| !d.contains(NO_DATA_SENTINEL))?;
    let date_debut = dom::first_descendant_text(row, &dom::UPDATE_SPAN).and_then(dom::since_date);
    Some(Qualification {
        description,
        date_debut,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::dom::table_document;

    const QUALITES: &str = "<tr><td><h2>Qualités</h2></td></tr>";
    const AUTORISATIONS: &str = "<tr><td><h2>Autorisations</h2></td></tr>";

    fn row(text: &str) -> String {
        format!("<tr><td>{text}</td></tr>")
    }

    #[test]
    fn test_empty_section_before_authorizations() {
        let doc = table_document(&format!("{QUALITES}{AUTORISATIONS}{}", row("Autorisation X")));
        assert!(extract_qualifications(&doc).is_empty());
    }

    #[test]
    fn test_sentinel_is_suppressed() {
        let doc = table_document(&format!(
            "{QUALITES}{}{AUTORISATIONS}",
            row(NO_DATA_SENTINEL)
        ));
        assert!(extract_qualifications(&doc).is_empty());
    }

    #[test]
    fn test_bounded_mode_skips_blank_rows_and_caps_at_five() {
        let mut rows = String::from(QUALITES);
        rows.push_str(&row("   "));
        for i in 1..=7 {
            rows.push_str(&format!(
                "<tr><td>Qualité {i}<br><span class=\"upd\">Depuis le {i} janvier 2010</span></td></tr>"
            ));
        }
        rows.push_str(AUTORISATIONS);
        let doc = table_document(&rows);

        let found = extract_qualifications(&doc);
        assert_eq!(found.len(), 5);
        assert_eq!(found[0].description, "Qualité 1");
        assert_eq!(found[0].date_debut.as_deref(), Some("1 janvier 2010"));
        assert_eq!(found[4].description, "Qualité 5");
    }

    #[test]
    fn test_sentinel_rows_count_toward_the_cap() {
        let mut rows = String::from(QUALITES);
        for _ in 0..MAX_QUALIFICATION_ENTRIES {
            rows.push_str(&row(NO_DATA_SENTINEL));
        }
        rows.push_str(&row("Employeur ONSS"));
        rows.push_str(AUTORISATIONS);
        let doc = table_document(&rows);
        assert!(extract_qualifications(&doc).is_empty());
    }

    #[test]
    fn test_authorizations_before_qualifications_gives_nothing() {
        let doc = table_document(&format!(
            "{AUTORISATIONS}{}{QUALITES}{}",
            row("Autorisation X"),
            row("Employeur ONSS")
        ));
        assert!(extract_qualifications(&doc).is_empty());
    }

    #[test]
    fn test_without_authorizations_reads_four_rows() {
        let mut rows = String::from(QUALITES);
        for i in 1..=6 {
            rows.push_str(&row(&format!("Qualité {i}")));
        }
        let doc = table_document(&rows);

        let found: Vec<String> = extract_qualifications(&doc)
            .into_iter()
            .map(|q| q.description)
            .collect();
        assert_eq!(found, vec!["Qualité 1", "Qualité 2", "Qualité 3", "Qualité 4"]);
    }

    #[test]
    fn test_without_authorizations_stops_at_heading() {
        let doc = table_document(&format!(
            "{QUALITES}{}<tr><td><h2>Capacités entrepreneuriales</h2></td></tr>{}",
            row("Employeur ONSS"),
            row("Connaissances de gestion de base")
        ));
        let found = extract_qualifications(&doc);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].description, "Employeur ONSS");
        assert_eq!(found[0].date_debut, None);
    }
}
