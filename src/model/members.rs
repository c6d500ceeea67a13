//! Member-level document records
//!
//! One record type per member kind found on a class page. These are the leaf
//! shapes of the dataset schema.

use serde::{Deserialize, Serialize};
use std::fmt;

/// C# access modifier as declared on the page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AccessModifier {
    #[default]
    Public,
    Protected,
    Private,
    Internal,
}

impl AccessModifier {
    /// Parses a modifier keyword, defaulting to `Public` for anything else
    ///
    /// Doxygen pages for this site rarely annotate public members, so the
    /// absence of a keyword means public.
    pub fn parse(s: &str) -> Self {
        match s.trim() {
            "protected" => Self::Protected,
            "private" => Self::Private,
            "internal" => Self::Internal,
            _ => Self::Public,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Protected => "protected",
            Self::Private => "private",
            Self::Internal => "internal",
        }
    }
}

impl fmt::Display for AccessModifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A method or constructor parameter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParamDoc {
    pub name: String,

    #[serde(rename = "type")]
    pub param_type: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ParamDoc {
    pub fn new(name: impl Into<String>, param_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            param_type: param_type.into(),
            description: None,
        }
    }
}

/// An exception a method declares it can throw
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExceptionDoc {
    #[serde(rename = "type")]
    pub exception_type: String,

    pub description: String,
}

/// A class constructor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConstructorDoc {
    /// Constructor name (always the class name)
    pub name: String,

    #[serde(default)]
    pub parameters: Vec<ParamDoc>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default)]
    pub access_modifier: AccessModifier,
}

/// A class method
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MethodDoc {
    pub name: String,

    pub return_type: String,

    #[serde(default)]
    pub parameters: Vec<ParamDoc>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default)]
    pub is_static: bool,

    #[serde(default)]
    pub access_modifier: AccessModifier,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exceptions: Vec<ExceptionDoc>,
}

/// A class property
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyDoc {
    pub name: String,

    #[serde(rename = "type")]
    pub property_type: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default)]
    pub access_modifier: AccessModifier,

    /// Whether the property exposes a getter
    #[serde(default = "default_true")]
    pub getter: bool,

    /// Whether the property exposes a setter
    #[serde(default = "default_true")]
    pub setter: bool,

    #[serde(default)]
    pub is_static: bool,
}

/// A class field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDoc {
    pub name: String,

    #[serde(rename = "type")]
    pub field_type: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default)]
    pub access_modifier: AccessModifier,

    #[serde(default)]
    pub is_static: bool,

    #[serde(default)]
    pub is_readonly: bool,

    /// Declared initial value, when the page shows one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

/// A class event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDoc {
    pub name: String,

    #[serde(rename = "type")]
    pub event_type: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default)]
    pub access_modifier: AccessModifier,
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_access_modifier_parse() {
        assert_eq!(AccessModifier::parse("public"), AccessModifier::Public);
        assert_eq!(AccessModifier::parse("private"), AccessModifier::Private);
        assert_eq!(
            AccessModifier::parse("protected"),
            AccessModifier::Protected
        );
        assert_eq!(AccessModifier::parse("internal"), AccessModifier::Internal);
        // Unannotated members are public on this site
        assert_eq!(AccessModifier::parse(""), AccessModifier::Public);
        assert_eq!(AccessModifier::parse("virtual"), AccessModifier::Public);
    }

    #[test]
    fn test_access_modifier_serializes_lowercase() {
        let json = serde_json::to_string(&AccessModifier::Protected).unwrap();
        assert_eq!(json, "\"protected\"");
    }

    #[test]
    fn test_param_type_serializes_as_type() {
        let param = ParamDoc::new("count", "int");
        let json = serde_json::to_string(&param).unwrap();
        assert!(json.contains("\"type\":\"int\""));
    }

    #[test]
    fn test_method_roundtrip_with_exceptions() {
        let method = MethodDoc {
            name: "Load".to_string(),
            return_type: "bool".to_string(),
            parameters: vec![ParamDoc::new("path", "string")],
            description: Some("Loads a resource.".to_string()),
            is_static: true,
            access_modifier: AccessModifier::Public,
            exceptions: vec![ExceptionDoc {
                exception_type: "IOException".to_string(),
                description: "The file could not be read.".to_string(),
            }],
        };

        let json = serde_json::to_string(&method).unwrap();
        assert!(json.contains("\"returnType\":\"bool\""));
        assert!(json.contains("\"isStatic\":true"));

        let back: MethodDoc = serde_json::from_str(&json).unwrap();
        assert_eq!(back, method);
    }

    #[test]
    fn test_property_defaults_getter_setter() {
        let json = r#"{"name":"Width","type":"int"}"#;
        let prop: PropertyDoc = serde_json::from_str(json).unwrap();

        assert!(prop.getter);
        assert!(prop.setter);
        assert!(!prop.is_static);
        assert_eq!(prop.access_modifier, AccessModifier::Public);
    }

    #[test]
    fn test_field_omits_empty_value() {
        let field = FieldDoc {
            name: "MaxSize".to_string(),
            field_type: "int".to_string(),
            description: None,
            access_modifier: AccessModifier::Public,
            is_static: true,
            is_readonly: true,
            value: None,
        };

        let json = serde_json::to_string(&field).unwrap();
        assert!(!json.contains("\"value\""));
        assert!(json.contains("\"isReadonly\":true"));
    }
}
