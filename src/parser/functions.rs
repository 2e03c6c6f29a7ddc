use super::dom;
use crate::constants::OFFICER_TABLE_ID;
use crate::types::OfficerFunction;
use scraper::{ElementRef, Html};

/// Officers listed in the functions table: title, person, "since" date.
pub fn extract_officer_functions(document: &Html) -> Vec<OfficerFunction> {
    let Some(table) = dom::table_by_id(document, OFFICER_TABLE_ID) else {
        return Vec::new();
    };
    dom::own_rows(table).filter_map(officer_from_row).collect()
}

fn officer_from_row(row: ElementRef<'_>) -> Option<OfficerFunction> {
    let titre = dom::cell(row, 0)
        .and_then(dom::first_text)
        .and_then(dom::clean)?;
    let nom = dom::cell(row, 1).and_then(dom::joined_texts)?;
    let date_debut = dom::cell(row, 2).and_then(dom::span_since_date);

    Some(OfficerFunction {
        titre,
        nom,
        date_debut,
    })
}
