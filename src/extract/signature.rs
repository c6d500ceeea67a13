//! C# signature text parsing
//!
//! Pure string processing shared by the class extractor: declaration cells,
//! parameter lists, and the Doxygen URL-encoded qualified names.

use crate::model::{AccessModifier, ParamDoc};

/// Parsed form of a member declaration's left cell
///
/// Doxygen puts modifiers and the type in the left column of a member
/// listing row, e.g. `static bool` or `override readonly int`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LeftCell {
    pub access: AccessModifier,
    pub is_static: bool,
    pub is_readonly: bool,
    /// Remaining text after modifiers: the return type or member type.
    /// Empty for constructors.
    pub member_type: String,
}

/// Parses the modifier/type cell of a member row
pub fn parse_left_cell(text: &str) -> LeftCell {
    let mut cell = LeftCell::default();
    let mut type_parts: Vec<&str> = Vec::new();

    for token in text.split_whitespace() {
        match token {
            "public" => cell.access = AccessModifier::Public,
            "protected" => cell.access = AccessModifier::Protected,
            "private" => cell.access = AccessModifier::Private,
            "internal" => cell.access = AccessModifier::Internal,
            "static" => cell.is_static = true,
            "readonly" => cell.is_readonly = true,
            // Keywords that carry no schema meaning
            "override" | "virtual" | "abstract" | "sealed" | "const" | "new" => {}
            other => type_parts.push(other),
        }
    }

    cell.member_type = type_parts.join(" ");
    cell
}

/// Splits a member declaration's right cell into name and parameter text
///
/// `"Load (string path, int slot)"` becomes `("Load", Some("string path, int slot"))`;
/// a parameterless member like `"Width"` becomes `("Width", None)`.
pub fn split_name_and_params(text: &str) -> (String, Option<String>) {
    match text.find('(') {
        Some(open) => {
            let name = text[..open].trim().to_string();
            let rest = &text[open + 1..];
            let params = match rest.rfind(')') {
                Some(close) => rest[..close].trim().to_string(),
                None => rest.trim().to_string(),
            };
            (name, Some(params))
        }
        None => (text.trim().to_string(), None),
    }
}

/// Splits a parameter list on top-level commas, generic brackets aware
///
/// `"Dictionary<string, int> map, int count"` yields two entries; the comma
/// inside the generic argument list does not split.
pub fn split_params(text: &str) -> Vec<String> {
    let mut params = Vec::new();
    let mut current = String::new();
    let mut depth = 0i32;

    for ch in text.chars() {
        match ch {
            '<' | '[' | '(' => {
                depth += 1;
                current.push(ch);
            }
            '>' | ']' | ')' => {
                depth -= 1;
                current.push(ch);
            }
            ',' if depth == 0 => {
                let trimmed = current.trim();
                if !trimmed.is_empty() {
                    params.push(trimmed.to_string());
                }
                current.clear();
            }
            _ => current.push(ch),
        }
    }

    let trimmed = current.trim();
    if !trimmed.is_empty() {
        params.push(trimmed.to_string());
    }

    params
}

/// Parses a single parameter declaration into a `ParamDoc`
///
/// Handles `ref`/`out`/`params` qualifiers and strips default values. A
/// declaration with only a type gets the placeholder name `param`.
pub fn parse_param(text: &str) -> Option<ParamDoc> {
    // Drop any default value.
    let text = match text.find('=') {
        Some(pos) => text[..pos].trim(),
        None => text.trim(),
    };
    if text.is_empty() {
        return None;
    }

    let tokens: Vec<&str> = text
        .split_whitespace()
        .filter(|t| !matches!(*t, "ref" | "out" | "in" | "params" | "this"))
        .collect();

    match tokens.len() {
        0 => None,
        1 => Some(ParamDoc::new("param", tokens[0])),
        _ => {
            let name = tokens[tokens.len() - 1];
            let param_type = tokens[..tokens.len() - 1].join(" ");
            Some(ParamDoc::new(name, param_type))
        }
    }
}

/// Parses a full parameter list into `ParamDoc`s
pub fn parse_params(text: &str) -> Vec<ParamDoc> {
    split_params(text)
        .iter()
        .filter_map(|p| parse_param(p))
        .collect()
}

/// Recovers a qualified class name from a Doxygen class page filename
///
/// Doxygen encodes `Yukar.Engine.MapScene` as
/// `class_yukar_1_1_engine_1_1_map_scene.html`: `_1_1` separates namespace
/// segments and `_x` escapes an uppercase letter. Used as the identity
/// fallback when a page's title block lacks a qualified name.
pub fn full_name_from_url(url: &str) -> Option<String> {
    let file = url.rsplit('/').next()?;
    let stem = file
        .strip_prefix("class_")
        .or_else(|| file.strip_prefix("struct_"))
        .or_else(|| file.strip_prefix("interface_"))?;
    let stem = stem.strip_suffix(".html").unwrap_or(stem);
    if stem.is_empty() {
        return None;
    }

    let segments: Vec<String> = stem
        .split("_1_1_")
        .map(decode_doxygen_segment)
        .filter(|s| !s.is_empty())
        .collect();

    if segments.is_empty() {
        None
    } else {
        Some(segments.join("."))
    }
}

/// Decodes one Doxygen-escaped identifier segment
///
/// `map_scene` becomes `MapScene`: the leading character and every character
/// following an underscore are uppercased.
fn decode_doxygen_segment(segment: &str) -> String {
    let mut out = String::with_capacity(segment.len());
    let mut upper_next = true;
    for ch in segment.chars() {
        if ch == '_' {
            upper_next = true;
            continue;
        }
        if upper_next {
            out.extend(ch.to_uppercase());
            upper_next = false;
        } else {
            out.push(ch);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_left_cell_modifiers() {
        let cell = parse_left_cell("static bool");
        assert!(cell.is_static);
        assert!(!cell.is_readonly);
        assert_eq!(cell.member_type, "bool");
        assert_eq!(cell.access, AccessModifier::Public);
    }

    #[test]
    fn test_parse_left_cell_access_and_readonly() {
        let cell = parse_left_cell("protected static readonly int");
        assert_eq!(cell.access, AccessModifier::Protected);
        assert!(cell.is_static);
        assert!(cell.is_readonly);
        assert_eq!(cell.member_type, "int");
    }

    #[test]
    fn test_parse_left_cell_empty_for_constructor() {
        let cell = parse_left_cell("");
        assert_eq!(cell.member_type, "");
        assert!(!cell.is_static);
    }

    #[test]
    fn test_parse_left_cell_drops_override() {
        let cell = parse_left_cell("override void");
        assert_eq!(cell.member_type, "void");
    }

    #[test]
    fn test_split_name_and_params() {
        assert_eq!(
            split_name_and_params("Load (string path, int slot)"),
            ("Load".to_string(), Some("string path, int slot".to_string()))
        );
        assert_eq!(
            split_name_and_params("Width"),
            ("Width".to_string(), None)
        );
        assert_eq!(
            split_name_and_params("Clear ()"),
            ("Clear".to_string(), Some(String::new()))
        );
    }

    #[test]
    fn test_split_params_generic_aware() {
        let parts = split_params("Dictionary<string, int> map, int count");
        assert_eq!(
            parts,
            vec!["Dictionary<string, int> map".to_string(), "int count".to_string()]
        );
    }

    #[test]
    fn test_split_params_empty() {
        assert!(split_params("").is_empty());
        assert!(split_params("   ").is_empty());
    }

    #[test]
    fn test_parse_param_basic() {
        let param = parse_param("string path").unwrap();
        assert_eq!(param.name, "path");
        assert_eq!(param.param_type, "string");
    }

    #[test]
    fn test_parse_param_strips_qualifiers_and_default() {
        let param = parse_param("ref int count = 0").unwrap();
        assert_eq!(param.name, "count");
        assert_eq!(param.param_type, "int");
    }

    #[test]
    fn test_parse_param_type_only() {
        let param = parse_param("float").unwrap();
        assert_eq!(param.name, "param");
        assert_eq!(param.param_type, "float");
    }

    #[test]
    fn test_parse_params_list() {
        let params = parse_params("string path, out bool ok");
        assert_eq!(params.len(), 2);
        assert_eq!(params[1].name, "ok");
        assert_eq!(params[1].param_type, "bool");
    }

    #[test]
    fn test_full_name_from_url() {
        assert_eq!(
            full_name_from_url(
                "https://example.com/doc/class_yukar_1_1_engine_1_1_map_scene.html"
            )
            .as_deref(),
            Some("Yukar.Engine.MapScene")
        );
    }

    #[test]
    fn test_full_name_from_url_single_segment() {
        assert_eq!(
            full_name_from_url("https://example.com/doc/class_color.html").as_deref(),
            Some("Color")
        );
    }

    #[test]
    fn test_full_name_from_url_struct_prefix() {
        assert_eq!(
            full_name_from_url("https://example.com/doc/struct_sharp_kmy_gfx_1_1_color.html")
                .as_deref(),
            Some("SharpKmyGfx.Color")
        );
    }

    #[test]
    fn test_full_name_from_url_not_a_class_page() {
        assert_eq!(
            full_name_from_url("https://example.com/doc/namespaces.html"),
            None
        );
    }
}
