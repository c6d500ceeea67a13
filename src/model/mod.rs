//! Typed document records for the extracted reference data
//!
//! These structures form the schema of the dataset artifact. Every record is
//! a closed tagged type with explicit optional fields; consumers (the
//! renderer, the checkpoint store) pattern-match on this set rather than on
//! ad hoc maps. Field names serialize in camelCase so the artifact matches
//! the published dataset schema.

mod members;

pub use members::{
    AccessModifier, ConstructorDoc, EventDoc, ExceptionDoc, FieldDoc, MethodDoc, ParamDoc,
    PropertyDoc,
};

use serde::{Deserialize, Serialize};

/// Schema version of the dataset artifact
///
/// Bumped on any breaking change to the record shapes so the renderer can
/// detect drift before consuming an artifact.
pub const DATASET_SCHEMA_VERSION: u32 = 1;

/// Metadata block carried at the top of every dataset artifact
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetMeta {
    /// Schema version of the record shapes below
    pub schema_version: u32,

    /// Capture timestamp (RFC 3339)
    pub captured_at: String,

    /// Root index URL the crawl started from
    pub source_root: String,
}

/// The complete dataset artifact: metadata plus the namespace tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    pub meta: DatasetMeta,
    pub namespaces: Vec<NamespaceDoc>,
}

impl Dataset {
    /// Creates a dataset with the given capture metadata and no namespaces
    pub fn new(captured_at: String, source_root: String) -> Self {
        Self {
            meta: DatasetMeta {
                schema_version: DATASET_SCHEMA_VERSION,
                captured_at,
                source_root,
            },
            namespaces: Vec::new(),
        }
    }

    /// Total number of classes across all namespaces
    pub fn class_count(&self) -> usize {
        self.namespaces.iter().map(|ns| ns.classes.len()).sum()
    }
}

/// A namespace with its member classes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NamespaceDoc {
    /// Namespace name as displayed on the index page (e.g. "Yukar.Engine")
    pub name: String,

    /// Absolute URL of the namespace page
    pub url: String,

    /// Short description from the index listing, if present
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Classes attached to this namespace, in discovery order
    #[serde(default)]
    pub classes: Vec<ClassDoc>,
}

impl NamespaceDoc {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            description: None,
            classes: Vec::new(),
        }
    }
}

/// A fully-extracted class page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassDoc {
    /// Simple class name (e.g. "MapScene")
    pub name: String,

    /// Fully-qualified name (e.g. "Yukar.Engine.MapScene")
    pub full_name: String,

    /// Absolute URL of the class page
    pub url: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Base class or inheritance chain text, if the page declares one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inheritance: Option<String>,

    #[serde(default)]
    pub constructors: Vec<ConstructorDoc>,

    #[serde(default)]
    pub methods: Vec<MethodDoc>,

    #[serde(default)]
    pub properties: Vec<PropertyDoc>,

    #[serde(default)]
    pub fields: Vec<FieldDoc>,

    #[serde(default)]
    pub events: Vec<EventDoc>,

    /// Section-level warnings recorded during tolerant extraction
    ///
    /// A warning here means a member section was absent or unparsable and
    /// degraded to an empty list instead of failing the page.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl ClassDoc {
    pub fn new(
        name: impl Into<String>,
        full_name: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            full_name: full_name.into(),
            url: url.into(),
            description: None,
            inheritance: None,
            constructors: Vec::new(),
            methods: Vec::new(),
            properties: Vec::new(),
            fields: Vec::new(),
            events: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Total number of members across all sections
    pub fn member_count(&self) -> usize {
        self.constructors.len()
            + self.methods.len()
            + self.properties.len()
            + self.fields.len()
            + self.events.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dataset_new_sets_schema_version() {
        let ds = Dataset::new(
            "2024-01-01T00:00:00Z".to_string(),
            "https://example.com/doc/namespaces.html".to_string(),
        );
        assert_eq!(ds.meta.schema_version, DATASET_SCHEMA_VERSION);
        assert!(ds.namespaces.is_empty());
        assert_eq!(ds.class_count(), 0);
    }

    #[test]
    fn test_class_count_sums_namespaces() {
        let mut ds = Dataset::new("t".to_string(), "r".to_string());
        let mut ns1 = NamespaceDoc::new("A", "https://example.com/a.html");
        ns1.classes.push(ClassDoc::new("X", "A.X", "u"));
        ns1.classes.push(ClassDoc::new("Y", "A.Y", "u"));
        let mut ns2 = NamespaceDoc::new("B", "https://example.com/b.html");
        ns2.classes.push(ClassDoc::new("Z", "B.Z", "u"));
        ds.namespaces.push(ns1);
        ds.namespaces.push(ns2);

        assert_eq!(ds.class_count(), 3);
    }

    #[test]
    fn test_dataset_serializes_camel_case() {
        let ds = Dataset::new("2024-01-01T00:00:00Z".to_string(), "root".to_string());
        let json = serde_json::to_string(&ds).unwrap();

        assert!(json.contains("\"schemaVersion\":1"));
        assert!(json.contains("\"capturedAt\""));
        assert!(json.contains("\"sourceRoot\""));
    }

    #[test]
    fn test_class_doc_roundtrip() {
        let mut class = ClassDoc::new("Color", "SharpKmyGfx.Color", "https://example.com/c.html");
        class.description = Some("A color value.".to_string());
        class.inheritance = Some("ValueType".to_string());
        class.warnings.push("events section not found".to_string());

        let json = serde_json::to_string(&class).unwrap();
        assert!(json.contains("\"fullName\":\"SharpKmyGfx.Color\""));

        let back: ClassDoc = serde_json::from_str(&json).unwrap();
        assert_eq!(back, class);
    }

    #[test]
    fn test_class_doc_deserializes_with_missing_sections() {
        // Older or partial records omit empty member lists entirely.
        let json = r#"{"name":"A","fullName":"N.A","url":"u"}"#;
        let class: ClassDoc = serde_json::from_str(json).unwrap();

        assert_eq!(class.member_count(), 0);
        assert!(class.warnings.is_empty());
    }
}
