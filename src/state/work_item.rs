/// Work item and status definitions for tracking crawl progress
///
/// A work item is the unit of crawl work: one page to fetch and extract,
/// identified by a stable key derived from its canonical URL.
use std::fmt;
use url::Url;

/// The kind of page a work item points at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageRole {
    /// The root index page listing all namespaces
    Index,

    /// A namespace page listing its classes
    Namespace,

    /// A class page carrying full member documentation
    Class,
}

impl PageRole {
    pub fn to_db_string(&self) -> &'static str {
        match self {
            Self::Index => "index",
            Self::Namespace => "namespace",
            Self::Class => "class",
        }
    }

    pub fn from_db_string(s: &str) -> Option<Self> {
        match s {
            "index" => Some(Self::Index),
            "namespace" => Some(Self::Namespace),
            "class" => Some(Self::Class),
            _ => None,
        }
    }
}

impl fmt::Display for PageRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_db_string())
    }
}

/// Checkpoint status of a work item
///
/// Transitions are monotonic within one checkpoint lineage:
/// Pending -> Done (terminal, never re-attempted) or Pending -> Failed
/// (re-enqueued at most once per new invocation).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemStatus {
    /// Discovered but not yet successfully extracted
    Pending,

    /// Successfully extracted; the checkpoint carries the record
    Done,

    /// Terminally failed in this lineage (network budget exhausted or
    /// unparsable page)
    Failed,

    /// Page legitimately absent (HTTP 404); terminal, never retried
    NotFound,
}

impl ItemStatus {
    /// Returns true if no further fetch attempts should be made
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending)
    }

    /// Returns true if this item contributed a record to the dataset
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Done)
    }

    pub fn to_db_string(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Done => "done",
            Self::Failed => "failed",
            Self::NotFound => "not_found",
        }
    }

    pub fn from_db_string(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(Self::Pending),
            "done" => Some(Self::Done),
            "failed" => Some(Self::Failed),
            "not_found" => Some(Self::NotFound),
            _ => None,
        }
    }
}

impl fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_db_string())
    }
}

/// A unit of crawl work, immutable once discovered
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkItem {
    /// Stable identity derived from the canonical URL
    pub key: String,

    /// What kind of page this is
    pub role: PageRole,

    /// Absolute source URL
    pub url: String,

    /// Key of the owning namespace, for class items
    pub namespace_key: Option<String>,

    /// Display name of the entity (namespace or class name)
    pub name: String,
}

impl WorkItem {
    /// Creates a work item, deriving the key from the URL
    pub fn new(
        role: PageRole,
        url: impl Into<String>,
        name: impl Into<String>,
        namespace_key: Option<String>,
    ) -> Self {
        let url = url.into();
        Self {
            key: item_key(&url),
            role,
            url,
            namespace_key,
            name: name.into(),
        }
    }
}

/// Derives the stable checkpoint key for a URL
///
/// The key is the lowercased URL path with query and fragment stripped, so
/// the same entity keeps its identity across scheme changes, redirects to a
/// different host, and incidental query parameters.
pub fn item_key(url: &str) -> String {
    match Url::parse(url) {
        Ok(parsed) => parsed.path().to_ascii_lowercase(),
        // Unparsable input falls back to the raw string; still stable.
        Err(_) => url.to_ascii_lowercase(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_key_strips_host_and_query() {
        assert_eq!(
            item_key("https://example.com/doc/class_a.html?lang=ja#section"),
            "/doc/class_a.html"
        );
        assert_eq!(
            item_key("http://other.example.org/doc/class_a.html"),
            "/doc/class_a.html"
        );
    }

    #[test]
    fn test_item_key_lowercases() {
        assert_eq!(
            item_key("https://example.com/Doc/Class_A.html"),
            "/doc/class_a.html"
        );
    }

    #[test]
    fn test_item_key_invalid_url_falls_back() {
        assert_eq!(item_key("not a url"), "not a url");
    }

    #[test]
    fn test_work_item_derives_key() {
        let item = WorkItem::new(
            PageRole::Class,
            "https://example.com/doc/class_map.html",
            "Map",
            Some("/doc/namespace_yukar.html".to_string()),
        );
        assert_eq!(item.key, "/doc/class_map.html");
        assert_eq!(item.role, PageRole::Class);
        assert_eq!(item.name, "Map");
    }

    #[test]
    fn test_status_is_terminal() {
        assert!(!ItemStatus::Pending.is_terminal());
        assert!(ItemStatus::Done.is_terminal());
        assert!(ItemStatus::Failed.is_terminal());
        assert!(ItemStatus::NotFound.is_terminal());
    }

    #[test]
    fn test_status_roundtrip_db_string() {
        for status in [
            ItemStatus::Pending,
            ItemStatus::Done,
            ItemStatus::Failed,
            ItemStatus::NotFound,
        ] {
            assert_eq!(
                ItemStatus::from_db_string(status.to_db_string()),
                Some(status)
            );
        }
        assert_eq!(ItemStatus::from_db_string("bogus"), None);
    }

    #[test]
    fn test_role_roundtrip_db_string() {
        for role in [PageRole::Index, PageRole::Namespace, PageRole::Class] {
            assert_eq!(PageRole::from_db_string(role.to_db_string()), Some(role));
        }
        assert_eq!(PageRole::from_db_string("bogus"), None);
    }
}
