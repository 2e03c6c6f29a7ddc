use super::dom;
use crate::constants::{
    HEADING_EXTERNAL_LINKS, HEADING_RELATED_ENTITIES, MAX_RELATED_ENTITY_ROWS, NO_DATA_SENTINEL,
};
use crate::types::{ExternalLink, RelatedEntityLink};
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html};

static RELATED_SINCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"depuis le (\d+ \w+ \d+)").expect("valid regex"));

/// Links to other registered entities (absorptions, successors, ...).
///
/// Row cells carry: the linked enterprise number as a link, then the name,
/// the relation and a "depuis le" date as successive text nodes.
pub fn extract_related_entity_links(document: &Html) -> Vec<RelatedEntityLink> {
    let Some(heading) = dom::find_heading_row(document, HEADING_RELATED_ENTITIES) else {
        return Vec::new();
    };

    if dom::section_has_no_data(heading) {
        return vec![RelatedEntityLink {
            description: Some(NO_DATA_SENTINEL.to_string()),
            ..Default::default()
        }];
    }

    dom::section_rows(heading)
        .take(MAX_RELATED_ENTITY_ROWS)
        .filter(|row| has_cell_link(*row))
        .map(related_from_row)
        .filter(|link| !link.is_empty())
        .collect()
}

fn has_cell_link(row: ElementRef<'_>) -> bool {
    dom::cells(row).any(|td| dom::child_elements(td, "a").next().is_some())
}

fn related_from_row(row: ElementRef<'_>) -> RelatedEntityLink {
    let numero = dom::cells(row)
        .flat_map(|td| dom::child_elements(td, "a"))
        .find_map(dom::first_text)
        .and_then(dom::clean);
    let date = dom::nth_cell_text(row, 2)
        .and_then(|text| RELATED_SINCE.captures(text))
        .map(|captures| captures[1].to_string());

    RelatedEntityLink {
        numero,
        nom: dom::nth_cell_text(row, 0).and_then(dom::clean),
        relation: dom::nth_cell_text(row, 1).and_then(dom::clean),
        date,
        description: None,
    }
}

/// Links of the row right below the "Liens externes" heading.
pub fn extract_external_links(document: &Html) -> Vec<ExternalLink> {
    let Some(row) = dom::find_heading_row(document, HEADING_EXTERNAL_LINKS)
        .and_then(|heading| dom::section_rows(heading).next())
    else {
        return Vec::new();
    };

    row.select(&dom::LINK)
        .map(|a| ExternalLink {
            description: dom::first_text(a).and_then(dom::clean),
            url: a.value().attr("href").and_then(dom::clean),
        })
        .filter(|link| link.description.is_some() || link.url.is_some())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::dom::table_document;

    const RELATED: &str = "<tr><td><h2>Liens entre entités</h2></td></tr>";

    #[test]
    fn test_related_sentinel_is_single_entry() {
        let doc = table_document(&format!(
            "{RELATED}<tr><td>{NO_DATA_SENTINEL}</td></tr>"
        ));
        let found = extract_related_entity_links(&doc);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].description.as_deref(), Some(NO_DATA_SENTINEL));
        assert_eq!(found[0].numero, None);
    }

    #[test]
    fn test_related_row_fields() {
        let doc = table_document(&format!(
            r#"{RELATED}
               <tr><td>Entité enregistrée <a href="?ondernemingsnummer=0456789123">0456.789.123</a>Absorbée par<br>depuis le 1 avril 2015</td></tr>
               <tr><td>Sans lien</td></tr>"#
        ));

        let found = extract_related_entity_links(&doc);
        assert_eq!(
            found,
            vec![RelatedEntityLink {
                numero: Some("0456.789.123".into()),
                nom: Some("Entité enregistrée".into()),
                relation: Some("Absorbée par".into()),
                date: Some("1 avril 2015".into()),
                description: None,
            }]
        );
    }

    #[test]
    fn test_related_scan_is_bounded() {
        let mut rows = String::from(RELATED);
        for i in 0..30 {
            rows.push_str(&format!(
                "<tr><td>Nom {i}<a href=\"#\">0{i:03}.000.000</a></td></tr>"
            ));
        }
        let doc = table_document(&rows);
        assert_eq!(extract_related_entity_links(&doc).len(), MAX_RELATED_ENTITY_ROWS);
    }

    #[test]
    fn test_related_rows_without_link_count_toward_bound() {
        let mut rows = String::from(RELATED);
        for i in 0..MAX_RELATED_ENTITY_ROWS {
            rows.push_str(&format!("<tr><td>Sans lien {i}</td></tr>"));
        }
        rows.push_str("<tr><td>Tardive <a href=\"#\">0456.789.123</a></td></tr>");
        let doc = table_document(&rows);
        assert!(extract_related_entity_links(&doc).is_empty());
    }

    #[test]
    fn test_related_stops_before_external_links() {
        let doc = table_document(&format!(
            r##"{RELATED}
               <tr><td>X <a href="#">0456.789.123</a></td></tr>
               <tr><td><h2>Liens externes</h2></td></tr>
               <tr><td><a href="https://www.nbb.be">Comptes annuels</a></td></tr>"##
        ));
        assert_eq!(extract_related_entity_links(&doc).len(), 1);

        let external = extract_external_links(&doc);
        assert_eq!(
            external,
            vec![ExternalLink {
                description: Some("Comptes annuels".into()),
                url: Some("https://www.nbb.be".into()),
            }]
        );
    }

    #[test]
    fn test_external_links_from_first_row_only() {
        let doc = table_document(
            r#"<tr><td><h2>Liens externes</h2></td></tr>
               <tr><td><a href="https://a.example">Moniteur belge</a> <a href="https://b.example"></a></td></tr>
               <tr><td><a href="https://c.example">Ignoré</a></td></tr>"#,
        );
        let found = extract_external_links(&doc);
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].description.as_deref(), Some("Moniteur belge"));
        assert_eq!(found[1].description, None);
        assert_eq!(found[1].url.as_deref(), Some("https://b.example"));
    }
}
