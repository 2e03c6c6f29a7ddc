use super::dom;
use crate::constants::{HEADING_CAPACITIES, MAX_CAPACITY_ROWS};
use crate::types::Capacity;
use scraper::{ElementRef, Html};

pub fn extract_capacities(document: &Html) -> Vec<Capacity> {
    let Some(heading) = dom::find_heading_row(document, HEADING_CAPACITIES) else {
        return Vec::new();
    };
    dom::section_rows(heading)
        .take(MAX_CAPACITY_ROWS)
        .filter_map(capacity_from_row)
        .collect()
}

fn capacity_from_row(row: ElementRef<'_>) -> Option<Capacity> {
    let kind = dom::cell(row, 0)
        .and_then(dom::first_text)
        .and_then(dom::clean)?;
    let valeur = dom::cell(row, 1)
        .and_then(dom::first_text)
        .and_then(dom::clean);

    Some(Capacity {
        kind,
        valeur,
        date_debut: dom::span_since_date(row),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::dom::table_document;

    #[test]
    fn test_reads_at_most_two_rows_of_the_section() {
        let doc = table_document(
            r#"<tr><td colspan="3"><h2>Capacités entrepreneuriales</h2></td></tr>
               <tr><td>Connaissances de gestion de base</td><td>Oui</td><td><span class="upd">Depuis le 2 février 2004</span></td></tr>
               <tr><td>Compétence professionnelle</td><td></td></tr>
               <tr><td>Troisième ligne</td><td>ignorée</td></tr>"#,
        );

        let found = extract_capacities(&doc);
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].kind, "Connaissances de gestion de base");
        assert_eq!(found[0].valeur.as_deref(), Some("Oui"));
        assert_eq!(found[0].date_debut.as_deref(), Some("2 février 2004"));
        assert_eq!(found[1].kind, "Compétence professionnelle");
        assert_eq!(found[1].valeur, None);
    }

    #[test]
    fn test_stops_at_next_heading_and_drops_untyped_rows() {
        let doc = table_document(
            r#"<tr><td><h2>Capacités entrepreneuriales</h2></td></tr>
               <tr><td>  </td><td>Oui</td></tr>
               <tr><td><h2>Qualités</h2></td></tr>
               <tr><td>Employeur ONSS</td></tr>"#,
        );
        assert!(extract_capacities(&doc).is_empty());
    }
}
