//! Index page extraction
//!
//! The root index page carries a directory table listing every namespace in
//! the reference. Extraction targets that table first and falls back to a
//! document-wide link scan when the table markup has drifted.

use crate::extract::html::{resolve_href, row_description, text_of};
use crate::extract::{ExtractError, Listing};
use scraper::{Html, Selector};
use url::Url;

/// Extracts the namespace listing from the index page
///
/// # Arguments
///
/// * `html` - The fetched index page HTML
/// * `page_url` - The index page's own URL, for resolving relative links
///
/// # Returns
///
/// * `Ok(Vec<Listing>)` - Namespaces found; an empty list is valid (the
///   caller flags it for review) as long as the listing container exists
/// * `Err(ExtractError)` - Neither the directory table nor any namespace
///   link exists in the document
pub fn extract_index(html: &str, page_url: &Url) -> Result<Vec<Listing>, ExtractError> {
    let document = Html::parse_document(html);

    let directory = Selector::parse("table.directory")
        .map_err(|e| ExtractError::Parse(format!("invalid selector: {e}")))?;
    let namespace_links = Selector::parse("a[href*='namespace']")
        .map_err(|e| ExtractError::Parse(format!("invalid selector: {e}")))?;

    let mut listings = Vec::new();

    if let Some(table) = document.select(&directory).next() {
        for link in table.select(&namespace_links) {
            if let Some(listing) = listing_from_link(link, page_url) {
                listings.push(listing);
            }
        }
    } else {
        // Fallback: the directory table is gone, scan the whole document.
        tracing::warn!("index page has no directory table, using document-wide scan");
        for link in document.select(&namespace_links) {
            if let Some(listing) = listing_from_link(link, page_url) {
                listings.push(listing);
            }
        }
        if listings.is_empty() {
            return Err(ExtractError::Parse(
                "namespace listing not found on index page".to_string(),
            ));
        }
    }

    Ok(dedup_by_name(listings))
}

fn listing_from_link(link: scraper::ElementRef, page_url: &Url) -> Option<Listing> {
    let name = text_of(link);
    if name.is_empty() {
        return None;
    }
    let href = link.value().attr("href")?;
    let url = resolve_href(page_url, href)?;
    let description = row_description(link);

    Some(Listing {
        name,
        url,
        description,
    })
}

/// Removes duplicate listings, keeping the first occurrence of each name
pub(crate) fn dedup_by_name(listings: Vec<Listing>) -> Vec<Listing> {
    let mut seen = std::collections::HashSet::new();
    listings
        .into_iter()
        .filter(|l| seen.insert(l.name.clone()))
        .collect()
}
