//! Role-specific HTML extraction
//!
//! One extractor per page role: the index page (namespace listing),
//! namespace pages (class listings), and class pages (full member
//! documentation). Extractors are pure functions over fetched HTML with no
//! network or filesystem knowledge.
//!
//! Selector strategy is layered: a primary structural selector first, then a
//! looser fallback before a section is declared unparsable. On class pages
//! every member section parses independently; a malformed or absent section
//! degrades to an empty list plus a recorded warning instead of failing the
//! page (tolerant extraction).

mod class;
mod html;
mod index;
mod namespace;
mod signature;

pub use class::extract_class;
pub use html::resolve_href;
pub use index::extract_index;
pub use namespace::{extract_namespace, NamespacePage};
pub use signature::full_name_from_url;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors produced by extractors
///
/// Only the absence of a page's primary identity block is a hard failure;
/// everything below that degrades to warnings on the record.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Parse failure: {0}")]
    Parse(String),
}

/// A name + URL pair discovered on a listing page
///
/// Produced by the index extractor (namespaces) and the namespace extractor
/// (classes). Serializable because listings are checkpointed verbatim so a
/// resumed run can re-enumerate work without refetching listing pages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Listing {
    /// Display name as it appears in the listing
    pub name: String,

    /// Absolute URL, resolved against the listing page's own URL
    pub url: String,

    /// Short description from the listing row, if present
    pub description: Option<String>,
}
