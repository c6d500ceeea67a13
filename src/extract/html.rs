//! Shared HTML helpers for the extractors

use scraper::{ElementRef, Selector};
use url::Url;

/// Collects the visible text of an element, whitespace-collapsed
pub fn text_of(element: ElementRef) -> String {
    clean_text(&element.text().collect::<String>())
}

/// Collapses runs of whitespace (including non-breaking spaces) and trims
pub fn clean_text(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut last_was_space = true;
    for ch in raw.chars() {
        let ch = if ch == '\u{a0}' { ' ' } else { ch };
        if ch.is_whitespace() {
            if !last_was_space {
                out.push(' ');
                last_was_space = true;
            }
        } else {
            out.push(ch);
            last_was_space = false;
        }
    }
    while out.ends_with(' ') {
        out.pop();
    }
    out
}

/// Resolves a link href against the page's own URL
///
/// Returns None for non-HTTP(S) results, fragments, and unresolvable hrefs.
/// Resolution is always relative to the referencing page, never a hardcoded
/// base, so redirected pages keep their links intact.
pub fn resolve_href(base: &Url, href: &str) -> Option<String> {
    let href = href.trim();
    if href.is_empty() || href.starts_with('#') {
        return None;
    }
    if href.starts_with("javascript:") || href.starts_with("mailto:") {
        return None;
    }

    match base.join(href) {
        Ok(mut absolute) => {
            if absolute.scheme() != "http" && absolute.scheme() != "https" {
                return None;
            }
            absolute.set_fragment(None);
            Some(absolute.to_string())
        }
        Err(_) => None,
    }
}

/// Extracts the description cell of the table row containing a link
///
/// Listing tables on this site put the entity link in the first cell and an
/// optional description in the second.
pub fn row_description(link: ElementRef) -> Option<String> {
    let tr = containing_row(link)?;
    let td_selector = Selector::parse("td").ok()?;
    let cells: Vec<ElementRef> = tr.select(&td_selector).collect();
    if cells.len() < 2 {
        return None;
    }
    let text = text_of(cells[cells.len() - 1]);
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

/// Walks up from an element to its enclosing `<tr>`, if any
pub fn containing_row(element: ElementRef) -> Option<ElementRef> {
    let mut node = element.parent()?;
    loop {
        if let Some(el) = ElementRef::wrap(node) {
            if el.value().name() == "tr" {
                return Some(el);
            }
        }
        node = node.parent()?;
    }
}

/// Returns the next sibling element of an element, skipping text nodes
pub fn next_element(element: ElementRef) -> Option<ElementRef> {
    element.next_siblings().find_map(ElementRef::wrap)
}
