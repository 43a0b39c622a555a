pub mod geoscheme;
pub mod iso_codes;
pub mod names;

use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};

use crate::merge::{self, MergeOutcome};

static LINK_SEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("a").unwrap());

/// Two-document pipeline: ISO list + geoscheme table → merged, sorted table.
pub fn process_documents(iso_html: &str, geoscheme_html: &str) -> MergeOutcome {
    let codes = iso_codes::extract(&Html::parse_document(iso_html));
    let records = geoscheme::extract(&Html::parse_document(geoscheme_html));
    merge::merge(records, &codes)
}

/// All descendant text, trimmed.
pub(crate) fn text_of(el: ElementRef) -> String {
    el.text().collect::<String>().trim().to_string()
}

/// Text of the first hyperlink inside `el`, or of `el` itself when it has none.
pub(crate) fn link_or_text(el: ElementRef) -> String {
    match el.select(&LINK_SEL).next() {
        Some(link) => text_of(link),
        None => text_of(el),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::overrides::POLAR_ENTITY;

    fn fixture(name: &str) -> String {
        std::fs::read_to_string(format!("tests/fixtures/{}.html", name)).unwrap()
    }

    fn first_td(html: &str) -> String {
        let doc = Html::parse_fragment(html);
        let sel = Selector::parse("td").unwrap();
        let td = doc.select(&sel).next().unwrap();
        link_or_text(td)
    }

    #[test]
    fn prefers_link_text() {
        assert_eq!(
            first_td("<table><tr><td>[1] <a href=\"/x\"> Albania </a> extra</td></tr></table>"),
            "Albania"
        );
        assert_eq!(first_td("<table><tr><td>  Plain cell </td></tr></table>"), "Plain cell");
    }

    #[test]
    fn fixture_pages_end_to_end() {
        let out = process_documents(&fixture("iso_codes"), &fixture("geoscheme"));
        let names: Vec<&str> = out.records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["Afghanistan", "Åland Islands", "Albania", "Antarctica", "Atlantis", "Zimbabwe"]
        );

        let afg = &out.records[0];
        assert_eq!(afg.code.as_deref(), Some("AFG"));
        assert_eq!(afg.continent, "Asia");
        assert_eq!(afg.region, "Southern Asia");

        let polar = out.records.iter().find(|r| r.name == POLAR_ENTITY).unwrap();
        assert_eq!(polar.code.as_deref(), Some("ATA"));
        assert_eq!(polar.continent, POLAR_ENTITY);
        assert_eq!(polar.region, POLAR_ENTITY);

        assert_eq!(out.unmatched, vec!["Atlantis".to_string()]);
    }

    #[test]
    fn missing_table_and_codes() {
        let out = process_documents("<html><body></body></html>", "<html><body><p>gone</p></body></html>");
        assert_eq!(out.records.len(), 1);
        let only = &out.records[0];
        assert_eq!(only.name, POLAR_ENTITY);
        assert_eq!(only.code.as_deref(), Some("ATA"));
        assert!(out.unmatched.is_empty());
    }
}
