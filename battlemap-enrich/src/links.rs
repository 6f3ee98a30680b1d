//! Source links attached to an enriched battle.

use battlemap_core::{PeriodArchive, SourceLinks};

pub const WIKIPEDIA_SEARCH: &str = "https://fr.wikipedia.org/wiki/Special:Search?search=";
pub const GALLICA_SEARCH: &str = "https://gallica.bnf.fr/services/engine/search/sru?operation=searchRetrieve&exactSearch=false&collapsing=true&version=1.2&query=";
pub const PERSEE_SEARCH: &str = "https://www.persee.fr/search?q=";

/// Percent-encode a query the way search URLs expect it.
pub fn encode_query(query: &str) -> String {
    urlencoding::encode(query).into_owned()
}

/// Ordered search links for a battle: the three generic sources, then the
/// archive for its period.
pub fn build_source_links(name: &str, year: i32) -> SourceLinks {
    let q = encode_query(name);
    let archive = PeriodArchive::of_year(year);

    let mut links = SourceLinks::new();
    links.insert("wikipedia", format!("{WIKIPEDIA_SEARCH}{q}"));
    links.insert("gallica", format!("{GALLICA_SEARCH}{q}"));
    links.insert("persee", format!("{PERSEE_SEARCH}{q}"));
    links.insert(archive.name(), format!("{}{}", archive.search_prefix(), q));
    links
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_links_order_and_archive() {
        let links = build_source_links("Siège d'Orléans", 1429);
        assert_eq!(
            links.names().collect::<Vec<_>>(),
            vec!["wikipedia", "gallica", "persee", "menestrel"]
        );
        assert_eq!(
            links.get("wikipedia"),
            Some("https://fr.wikipedia.org/wiki/Special:Search?search=Si%C3%A8ge%20d%27Orl%C3%A9ans")
        );
        assert_eq!(
            links.get("menestrel"),
            Some("http://www.menestrel.fr/spip.php?recherche=Si%C3%A8ge%20d%27Orl%C3%A9ans")
        );
    }

    #[test]
    fn test_archive_by_period() {
        assert!(build_source_links("Bataille d'Alésia", -52).get("inrap").is_some());
        assert!(build_source_links("Bataille de Valmy", 1792).get("histoire_defense").is_some());
        assert_eq!(build_source_links("Bataille de Valmy", 1792).len(), 4);
    }
}
