//! NACE activity codes.
//!
//! The page lists each classification edition with its own row marker and
//! its own cell layout, so every edition has a [`RevisionLayout`] entry and
//! they are extracted independently.

use super::dom;
use crate::constants::{
    NACE_2003_MARKER, NACE_2003_TABLE_ID, NACE_2008_MARKER, NACE_2008_TABLE_ID, NACE_2025_MARKER,
};
use crate::types::{NaceCode, NaceCodes, NaceRevision};
use scraper::{ElementRef, Html};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeLayout {
    /// `TVA 2025 <a>code</a> - description <span>since</span>`
    LinkedCode,
    /// Code in the first text fragment, description in the second.
    Fragments,
    /// `code - description` in one fragment.
    DashSeparated,
}

#[derive(Debug, Clone, Copy)]
pub struct RevisionLayout {
    pub revision: NaceRevision,
    pub marker: &'static str,
    /// Rows are searched inside this table only; `None` searches the page.
    pub table_id: Option<&'static str>,
    pub layout: CodeLayout,
}

pub static REVISION_LAYOUTS: [RevisionLayout; 3] = [
    RevisionLayout {
        revision: NaceRevision::Nace2025,
        marker: NACE_2025_MARKER,
        table_id: None,
        layout: CodeLayout::LinkedCode,
    },
    RevisionLayout {
        revision: NaceRevision::Nace2008,
        marker: NACE_2008_MARKER,
        table_id: Some(NACE_2008_TABLE_ID),
        layout: CodeLayout::Fragments,
    },
    RevisionLayout {
        revision: NaceRevision::Nace2003,
        marker: NACE_2003_MARKER,
        table_id: Some(NACE_2003_TABLE_ID),
        layout: CodeLayout::DashSeparated,
    },
];

pub fn layout_for(revision: NaceRevision) -> Option<&'static RevisionLayout> {
    REVISION_LAYOUTS
        .iter()
        .find(|layout| layout.revision == revision)
}

pub fn extract_nace_codes(document: &Html, revision: NaceRevision) -> Vec<NaceCode> {
    let Some(layout) = layout_for(revision) else {
        return Vec::new();
    };
    let candidates: Vec<ElementRef<'_>> = match layout.table_id {
        Some(id) => match dom::table_by_id(document, id) {
            Some(table) => table.select(&dom::ROW).collect(),
            None => return Vec::new(),
        },
        None => dom::rows(document).collect(),
    };

    candidates
        .into_iter()
        .filter(|row| dom::row_has_cell_text(*row, layout.marker))
        .map(|row| layout.layout.read(row))
        .filter(|code| !code.is_empty())
        .collect()
}

pub fn extract_all_nace_codes(document: &Html) -> NaceCodes {
    let mut codes = NaceCodes::default();
    for revision in NaceRevision::ALL {
        codes.set(revision, extract_nace_codes(document, revision));
    }
    codes
}

impl CodeLayout {
    pub fn read(self, row: ElementRef<'_>) -> NaceCode {
        let (code, description) = match self {
            CodeLayout::LinkedCode => (dom::first_link_text(row), linked_description(row)),
            CodeLayout::Fragments => {
                let fragments: Vec<&str> = dom::cells(row)
                    .flat_map(dom::own_texts)
                    .map(str::trim)
                    .filter(|fragment| !fragment.is_empty())
                    .collect();
                match fragments.as_slice() {
                    [first, second, ..] => (dom::decimal_code(first), dom::clean(second)),
                    _ => (None, None),
                }
            }
            CodeLayout::DashSeparated => dom::cells(row)
                .flat_map(dom::own_texts)
                .find_map(|fragment| fragment.split_once('-'))
                .map_or((None, None), |(code, description)| {
                    (dom::decimal_code(code), dom::clean(description))
                }),
        };

        NaceCode {
            code,
            description,
            date_debut: dom::span_since_date(row),
        }
    }
}

/// Second-to-last direct text node of the first cell that has two; the last
/// one trails the "since" annotation.
fn linked_description(row: ElementRef<'_>) -> Option<String> {
    dom::cells(row)
        .find_map(|td| {
            let texts: Vec<&str> = dom::own_texts(td).collect();
            texts.len().checked_sub(2).map(|i| texts[i])
        })
        .map(|text| text.trim_matches(|c: char| c == '-' || c.is_whitespace()))
        .and_then(dom::clean)
}
