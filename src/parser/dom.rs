//! Tree queries over the registry markup.
//!
//! The detail page is one long sequence of table rows. Sections start at a
//! row holding an `h2` and fields sit in `<td>label</td><td>value</td>`
//! pairs, so everything here works on rows, cells and their *direct* text
//! nodes (the `td/text()` of the markup, not the flattened text).

use crate::constants::{NO_DATA_SENTINEL, SINCE_PREFIX};
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};

fn selector(css: &str) -> Selector {
    Selector::parse(css).unwrap_or_else(|e| panic!("invalid built-in selector {css:?}: {e:?}"))
}

pub(crate) static ROW: Lazy<Selector> = Lazy::new(|| selector("tr"));
pub(crate) static TABLE: Lazy<Selector> = Lazy::new(|| selector("table"));
pub(crate) static SPAN: Lazy<Selector> = Lazy::new(|| selector("span"));
pub(crate) static UPDATE_SPAN: Lazy<Selector> = Lazy::new(|| selector("span.upd"));
pub(crate) static LINK: Lazy<Selector> = Lazy::new(|| selector("a"));

/// `digits.digits`, the shape of a NACE code.
pub(crate) static DECIMAL_CODE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d+\.\d+)").expect("valid regex"));

/// Direct child text nodes, untrimmed.
pub fn own_texts<'a>(el: ElementRef<'a>) -> impl Iterator<Item = &'a str> + 'a {
    el.children()
        .filter_map(|node| node.value().as_text().map(|text| &**text))
}

pub fn first_text(el: ElementRef<'_>) -> Option<&str> {
    own_texts(el).next()
}

/// Direct element children named `name`.
pub fn child_elements<'a>(
    el: ElementRef<'a>,
    name: &'static str,
) -> impl Iterator<Item = ElementRef<'a>> + 'a {
    el.children()
        .filter_map(ElementRef::wrap)
        .filter(move |child| child.value().name() == name)
}

pub fn cells<'a>(row: ElementRef<'a>) -> impl Iterator<Item = ElementRef<'a>> + 'a {
    child_elements(row, "td")
}

/// Zero-based cell lookup.
pub fn cell(row: ElementRef<'_>, index: usize) -> Option<ElementRef<'_>> {
    cells(row).nth(index)
}

/// Only the first direct text node is tested, the way the registry labels
/// are written (`<td>Statut:</td>`).
pub fn text_contains(el: ElementRef<'_>, needle: &str) -> bool {
    first_text(el).map_or(false, |text| text.contains(needle))
}

pub fn row_has_cell_text(row: ElementRef<'_>, anchor: &str) -> bool {
    cells(row).any(|td| text_contains(td, anchor))
}

/// First direct text node of the first cell that has one.
pub fn row_text(row: ElementRef<'_>) -> Option<&str> {
    cells(row).find_map(first_text)
}

/// The `n`-th direct text node of the first cell that has that many.
pub fn nth_cell_text(row: ElementRef<'_>, n: usize) -> Option<&str> {
    cells(row).find_map(|td| own_texts(td).nth(n))
}

pub fn rows(document: &Html) -> impl Iterator<Item = ElementRef<'_>> {
    document.select(&ROW)
}

/// First row in document order carrying `label` in one of its cells.
pub fn find_label_row<'a>(document: &'a Html, label: &str) -> Option<ElementRef<'a>> {
    rows(document).find(|row| row_has_cell_text(*row, label))
}

fn headings<'a>(row: ElementRef<'a>) -> impl Iterator<Item = ElementRef<'a>> + 'a {
    cells(row).flat_map(|td| child_elements(td, "h2"))
}

pub fn is_heading_row(row: ElementRef<'_>) -> bool {
    headings(row).next().is_some()
}

pub fn is_heading(row: ElementRef<'_>, heading: &str) -> bool {
    headings(row).any(|h2| text_contains(h2, heading))
}

pub fn heading_rows(document: &Html) -> impl Iterator<Item = ElementRef<'_>> {
    rows(document).filter(|row| is_heading_row(*row))
}

pub fn find_heading_row<'a>(document: &'a Html, heading: &str) -> Option<ElementRef<'a>> {
    rows(document).find(|row| is_heading(*row, heading))
}

/// Sibling rows after `row`, in document order.
pub fn following_rows<'a>(row: ElementRef<'a>) -> impl Iterator<Item = ElementRef<'a>> + 'a {
    row.next_siblings()
        .filter_map(ElementRef::wrap)
        .filter(|sibling| sibling.value().name() == "tr")
}

/// Rows after a heading, up to (excluding) the next heading row.
pub fn section_rows<'a>(heading: ElementRef<'a>) -> impl Iterator<Item = ElementRef<'a>> + 'a {
    following_rows(heading).take_while(|row| !is_heading_row(*row))
}

/// True when the row right after `heading` is the registry's "no data" line.
pub fn section_has_no_data(heading: ElementRef<'_>) -> bool {
    following_rows(heading)
        .next()
        .map_or(false, |row| row_has_cell_text(row, NO_DATA_SENTINEL))
}

pub fn table_by_id<'a>(document: &'a Html, id: &str) -> Option<ElementRef<'a>> {
    document
        .select(&TABLE)
        .find(|table| table.value().id() == Some(id))
}

/// Rows belonging to `table` itself, not to tables nested inside it.
pub fn own_rows<'a>(table: ElementRef<'a>) -> impl Iterator<Item = ElementRef<'a>> + 'a {
    table.select(&ROW).filter(move |row| {
        row.ancestors()
            .filter_map(ElementRef::wrap)
            .find(|ancestor| ancestor.value().name() == "table")
            .map_or(false, |nearest| nearest.id() == table.id())
    })
}

/// First direct text of the first matching descendant that has one.
pub fn first_descendant_text<'a>(el: ElementRef<'a>, selector: &Selector) -> Option<&'a str> {
    el.select(selector).find_map(first_text)
}

pub fn first_link_text(el: ElementRef<'_>) -> Option<String> {
    first_descendant_text(el, &LINK).and_then(clean)
}

pub fn first_link_href(el: ElementRef<'_>) -> Option<String> {
    el.select(&LINK)
        .find_map(|a| a.value().attr("href"))
        .and_then(clean)
}

/// Trimmed, `None` when nothing is left.
pub fn clean(text: &str) -> Option<String> {
    let trimmed = text.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Every direct text node trimmed, blanks dropped, joined by single spaces.
pub fn joined_texts(el: ElementRef<'_>) -> Option<String> {
    let parts: Vec<&str> = own_texts(el)
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect();
    (!parts.is_empty()).then(|| parts.join(" "))
}

/// `"Depuis le 1 janvier 2020"` gives `"1 janvier 2020"`; other text gives
/// nothing.
pub fn since_date(text: &str) -> Option<String> {
    if !text.contains(SINCE_PREFIX) {
        return None;
    }
    clean(&text.replacen(SINCE_PREFIX, "", 1))
}

/// Date of the first `span` under `el`, when that span is a "since" note.
pub fn span_since_date(el: ElementRef<'_>) -> Option<String> {
    first_descendant_text(el, &SPAN).and_then(since_date)
}

pub fn decimal_code(text: &str) -> Option<String> {
    DECIMAL_CODE.find(text).map(|m| m.as_str().to_string())
}

/// Wraps table rows in a full page, the way tests build documents.
#[cfg(test)]
pub(crate) fn table_document(rows: &str) -> Html {
    Html::parse_document(&format!(
        "<html><body><table>{rows}</table></body></html>"
    ))
}
