//! Namespace page extraction
//!
//! A namespace page lists the classes it contains, again in a directory
//! table, plus an optional description paragraph. The fallback chain for
//! class links is: directory table, then member declaration tables, then
//! any table on the page.

use crate::extract::html::{resolve_href, row_description, text_of};
use crate::extract::index::dedup_by_name;
use crate::extract::{ExtractError, Listing};
use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};
use url::Url;

/// Extracted contents of a namespace page
///
/// Checkpointed verbatim when the page completes, so a resumed run can
/// rebuild the class work list without refetching.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NamespacePage {
    /// Description paragraph from the contents block, if present
    pub description: Option<String>,

    /// Classes listed under this namespace
    pub classes: Vec<Listing>,
}

/// Extracts the class listing and description from a namespace page
///
/// Zero classes is valid; some namespaces only contain nested namespaces.
pub fn extract_namespace(html: &str, page_url: &Url) -> Result<NamespacePage, ExtractError> {
    let document = Html::parse_document(html);

    let class_links = Selector::parse("a[href*='class']")
        .map_err(|e| ExtractError::Parse(format!("invalid selector: {e}")))?;

    // Layered container lookup: directory table, then memberdecls, then any
    // table at all.
    let mut classes = Vec::new();
    for container in ["table.directory", "table.memberdecls", "table"] {
        let selector = Selector::parse(container)
            .map_err(|e| ExtractError::Parse(format!("invalid selector: {e}")))?;
        for table in document.select(&selector) {
            for link in table.select(&class_links) {
                if let Some(listing) = class_listing(link, page_url) {
                    classes.push(listing);
                }
            }
        }
        if !classes.is_empty() {
            break;
        }
    }

    Ok(NamespacePage {
        description: extract_description(&document),
        classes: dedup_by_name(classes),
    })
}

fn class_listing(link: ElementRef, page_url: &Url) -> Option<Listing> {
    let name = text_of(link);
    if name.is_empty() {
        return None;
    }
    let href = link.value().attr("href")?;
    // Anchors into the same page (member lists) are not class pages.
    if href.starts_with('#') {
        return None;
    }
    let url = resolve_href(page_url, href)?;

    Some(Listing {
        name,
        url,
        description: row_description(link),
    })
}

/// Pulls the first meaningful paragraph out of the contents block
fn extract_description(document: &Html) -> Option<String> {
    let selector = Selector::parse("div.contents div.textblock p").ok()?;
    for p in document.select(&selector) {
        let text = text_of(p);
        if text.len() > 5 {
            return Some(text);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page_url() -> Url {
        Url::parse("https://example.com/csreference/doc/ja/namespace_yukar.html").unwrap()
    }

    const NAMESPACE_HTML: &str = r#"
        <html><body><div class="contents">
        <div class="textblock"><p>Engine scripting entry points.</p></div>
        <table class="directory">
            <tr>
                <td><a href="class_yukar_1_1_map_scene.html">MapScene</a></td>
                <td>Controls the active map.</td>
            </tr>
            <tr>
                <td><a href="class_yukar_1_1_battle_scene.html">BattleScene</a></td>
                <td>Runs battles.</td>
            </tr>
        </table>
        </div></body></html>
    "#;

    #[test]
    fn test_extracts_classes_and_description() {
        let page = extract_namespace(NAMESPACE_HTML, &page_url()).unwrap();

        assert_eq!(
            page.description.as_deref(),
            Some("Engine scripting entry points.")
        );
        assert_eq!(page.classes.len(), 2);
        assert_eq!(page.classes[0].name, "MapScene");
        assert_eq!(
            page.classes[0].url,
            "https://example.com/csreference/doc/ja/class_yukar_1_1_map_scene.html"
        );
        assert_eq!(
            page.classes[0].description.as_deref(),
            Some("Controls the active map.")
        );
    }

    #[test]
    fn test_falls_back_to_memberdecls_table() {
        let html = r#"
            <html><body>
            <table class="memberdecls">
                <tr><td><a href="class_yukar_1_1_map.html">Map</a></td></tr>
            </table>
            </body></html>
        "#;
        let page = extract_namespace(html, &page_url()).unwrap();
        assert_eq!(page.classes.len(), 1);
        assert_eq!(page.classes[0].name, "Map");
    }

    #[test]
    fn test_empty_namespace_is_valid() {
        let html = r#"<html><body><table class="directory"></table></body></html>"#;
        let page = extract_namespace(html, &page_url()).unwrap();
        assert!(page.classes.is_empty());
        assert!(page.description.is_none());
    }

    #[test]
    fn test_skips_same_page_anchors() {
        let html = r##"
            <html><body><table class="directory">
                <tr><td><a href="#classlist">Classes</a></td></tr>
                <tr><td><a href="class_yukar_1_1_map.html">Map</a></td></tr>
            </table></body></html>
        "##;
        let page = extract_namespace(html, &page_url()).unwrap();
        assert_eq!(page.classes.len(), 1);
        assert_eq!(page.classes[0].name, "Map");
    }

    #[test]
    fn test_duplicate_classes_removed() {
        let html = r#"
            <html><body><table class="directory">
                <tr><td><a href="class_yukar_1_1_map.html">Map</a></td></tr>
                <tr><td><a href="class_yukar_1_1_map.html">Map</a></td></tr>
            </table></body></html>
        "#;
        let page = extract_namespace(html, &page_url()).unwrap();
        assert_eq!(page.classes.len(), 1);
    }
}
