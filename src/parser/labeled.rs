//! `<td>label</td><td>value</td>` fields.
//!
//! Each field is one [`LabelRule`]: the anchor text to look for, how to read
//! the value cell and which slot of the output it fills. Adding or fixing a
//! field is an edit to the tables below.

use super::dom;
use crate::types::{FinancialSummary, Generalities};
use scraper::{ElementRef, Html};

/// How the value cell is read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellRead {
    /// First direct text node.
    FirstText,
    /// Text of the first `span` inside the cell (status badges).
    SpanText,
    /// All direct text nodes joined (multi-line addresses).
    AllTexts,
}

impl CellRead {
    pub fn read(self, cell: ElementRef<'_>) -> Option<String> {
        match self {
            CellRead::FirstText => dom::first_text(cell).and_then(dom::clean),
            CellRead::SpanText => dom::first_descendant_text(cell, &dom::SPAN).and_then(dom::clean),
            CellRead::AllTexts => dom::joined_texts(cell),
        }
    }
}

pub struct LabelRule<T> {
    pub label: &'static str,
    pub read: CellRead,
    pub slot: fn(&mut T) -> &mut Option<String>,
}

pub static GENERALITY_RULES: &[LabelRule<Generalities>] = &[
    LabelRule { label: "Numéro d'entreprise", read: CellRead::FirstText, slot: |g| &mut g.numero },
    LabelRule { label: "Statut", read: CellRead::SpanText, slot: |g| &mut g.statut },
    LabelRule { label: "Situation juridique", read: CellRead::SpanText, slot: |g| &mut g.situation_juridique },
    LabelRule { label: "Date de début", read: CellRead::FirstText, slot: |g| &mut g.date_debut },
    LabelRule { label: "Dénomination", read: CellRead::FirstText, slot: |g| &mut g.denomination },
    LabelRule { label: "Adresse du siège", read: CellRead::AllTexts, slot: |g| &mut g.adresse },
    LabelRule { label: "Forme légale", read: CellRead::FirstText, slot: |g| &mut g.forme_legale },
];

pub static FINANCIAL_RULES: &[LabelRule<FinancialSummary>] = &[
    LabelRule { label: "Capital", read: CellRead::FirstText, slot: |f| &mut f.capital },
    LabelRule { label: "Assemblée générale", read: CellRead::FirstText, slot: |f| &mut f.assemblee_generale },
    LabelRule {
        label: "Date de fin de l'année comptable",
        read: CellRead::FirstText,
        slot: |f| &mut f.fin_annee_comptable,
    },
];

/// Runs every rule; the first row carrying a label wins, the value is in its
/// second cell. Unmatched labels leave their slot empty.
pub fn apply_rules<T: Default>(document: &Html, rules: &[LabelRule<T>]) -> T {
    let mut out = T::default();
    for rule in rules {
        let value = dom::find_label_row(document, rule.label)
            .and_then(|row| dom::cell(row, 1))
            .and_then(|cell| rule.read.read(cell));
        if value.is_some() {
            *(rule.slot)(&mut out) = value;
        }
    }
    out
}

pub fn extract_generalities(document: &Html) -> Generalities {
    apply_rules(document, GENERALITY_RULES)
}

pub fn extract_financial_summary(document: &Html) -> FinancialSummary {
    apply_rules(document, FINANCIAL_RULES)
}
