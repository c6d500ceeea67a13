//! Class page extraction
//!
//! A class page is extracted tolerantly: only the title/identity block is a
//! hard requirement. Each member section (constructors, methods, properties,
//! fields, events) parses independently; an absent or malformed section
//! yields an empty list plus a recorded warning on the record, never a
//! failed page.
//!
//! The page layout is Doxygen's: member listings live in
//! `table.memberdecls` tables whose sections are introduced by
//! `h2.groupheader` rows, and per-member detail blocks (`div.memitem`)
//! carry parameter descriptions and declared exceptions.

use crate::extract::html::{next_element, text_of};
use crate::extract::signature::{
    full_name_from_url, parse_left_cell, parse_params, split_name_and_params,
};
use crate::extract::ExtractError;
use crate::model::{
    ClassDoc, ConstructorDoc, EventDoc, ExceptionDoc, FieldDoc, MethodDoc, PropertyDoc,
};
use scraper::{ElementRef, Html, Selector};
use std::collections::HashMap;
use url::Url;

/// Member section kinds on a class page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SectionKind {
    Constructors,
    Methods,
    Properties,
    Fields,
    Events,
}

impl SectionKind {
    const ALL: [SectionKind; 5] = [
        Self::Constructors,
        Self::Methods,
        Self::Properties,
        Self::Fields,
        Self::Events,
    ];

    fn label(&self) -> &'static str {
        match self {
            Self::Constructors => "constructors",
            Self::Methods => "methods",
            Self::Properties => "properties",
            Self::Fields => "fields",
            Self::Events => "events",
        }
    }
}

/// One raw member listing row, before kind-specific interpretation
#[derive(Debug, Clone)]
struct MemberRow {
    /// Modifier/type cell text
    left: String,

    /// Name + parameter cell text
    right: String,

    /// Short description from the following memdesc row
    description: Option<String>,

    /// Whether the enclosing section heading was marked static
    section_static: bool,
}

/// Detail block content keyed by member name
#[derive(Debug, Default, Clone)]
struct MemberDetail {
    description: Option<String>,
    param_descriptions: HashMap<String, String>,
    exceptions: Vec<ExceptionDoc>,
}

/// Extracts a full class record from a class page
///
/// # Arguments
///
/// * `html` - The fetched class page HTML
/// * `page_url` - The class page's own URL
///
/// # Returns
///
/// * `Ok((ClassDoc, warnings))` - The record plus tolerant-extraction
///   warnings (also recorded on the record itself)
/// * `Err(ExtractError)` - The page's identity block is missing
pub fn extract_class(html: &str, page_url: &Url) -> Result<(ClassDoc, Vec<String>), ExtractError> {
    let document = Html::parse_document(html);

    let full_name = extract_identity(&document, page_url).ok_or_else(|| {
        ExtractError::Parse("class title block not found".to_string())
    })?;
    let name = full_name
        .rsplit('.')
        .next()
        .unwrap_or(&full_name)
        .to_string();

    let mut class = ClassDoc::new(name.clone(), full_name, page_url.as_str());
    let mut warnings = Vec::new();

    class.description = extract_description(&document);
    class.inheritance = extract_inheritance(&document);

    let details = collect_member_details(&document);
    let SectionScan {
        rows: raw_rows,
        unparsable,
        seen,
    } = collect_member_rows(&document);

    // Constructor declarations appear inside the member-functions listing:
    // a row whose name matches the class and carries no return type.
    let rows: Vec<(SectionKind, MemberRow)> = raw_rows
        .into_iter()
        .map(|(kind, row)| {
            if kind == SectionKind::Methods {
                let left = parse_left_cell(&row.left);
                let (row_name, params) = split_name_and_params(&row.right);
                if row_name == class.name && left.member_type.is_empty() && params.is_some() {
                    return (SectionKind::Constructors, row);
                }
            }
            (kind, row)
        })
        .collect();

    for kind in SectionKind::ALL {
        let kind_rows: Vec<&MemberRow> = rows
            .iter()
            .filter(|(k, _)| *k == kind)
            .map(|(_, row)| row)
            .collect();
        let unparsable = unparsable.iter().filter(|k| **k == kind).count();
        let heading_seen = seen.contains(&kind)
            || (kind == SectionKind::Constructors && !kind_rows.is_empty());

        if !heading_seen && unparsable == 0 {
            warnings.push(format!("{} section not found", kind.label()));
            continue;
        }

        let mut applied = 0usize;
        for row in &kind_rows {
            if apply_row(&mut class, kind, row, &details) {
                applied += 1;
            }
        }

        if applied == 0 && (unparsable > 0 || !kind_rows.is_empty()) {
            warnings.push(format!("{} section unparsable", kind.label()));
        }
    }

    class.warnings = warnings.clone();
    Ok((class, warnings))
}

// ===== Identity =====

/// Finds the qualified class name, layered: header title block, then the
/// document title, then the Doxygen-encoded page filename
fn extract_identity(document: &Html, page_url: &Url) -> Option<String> {
    let mut candidate = header_title(document).or_else(|| document_title(document))?;

    // An unqualified candidate can often be upgraded from the URL encoding.
    if !candidate.contains('.') {
        if let Some(from_url) = full_name_from_url(page_url.as_str()) {
            if from_url.ends_with(&candidate) || from_url.contains('.') {
                candidate = from_url;
            }
        }
    }

    Some(candidate)
}

fn header_title(document: &Html) -> Option<String> {
    let selector = Selector::parse("div.headertitle div.title").ok()?;
    let element = document.select(&selector).next()?;
    first_identifier(&text_of(element))
}

fn document_title(document: &Html) -> Option<String> {
    let selector = Selector::parse("title").ok()?;
    let text = text_of(document.select(&selector).next()?);
    // Site titles look like "BAKIN: SharpKmyGfx::Color クラス".
    let after_site = match text.split_once(": ") {
        Some((_, rest)) => rest,
        None => text.as_str(),
    };
    first_identifier(after_site)
}

/// Takes the first whitespace token of a title and normalizes `::` to `.`
fn first_identifier(text: &str) -> Option<String> {
    let token = text.split_whitespace().next()?;
    let normalized = token.replace("::", ".");
    let trimmed = normalized.trim_matches(|c: char| !c.is_alphanumeric() && c != '.' && c != '_');
    if trimmed.is_empty() || !trimmed.chars().next()?.is_alphabetic() {
        return None;
    }
    Some(trimmed.to_string())
}

// ===== Description and inheritance =====

/// Navigation phrases that disqualify a paragraph as a class description
const NAV_PHRASES: [&str; 6] = [
    "公開メンバ関数",
    "全メンバ一覧",
    "#include",
    "Public Member Functions",
    "Public Attributes",
    "List of all members",
];

fn extract_description(document: &Html) -> Option<String> {
    for selector_str in ["div.textblock p", "div.memdoc p", "div.contents p"] {
        let selector = Selector::parse(selector_str).ok()?;
        for p in document.select(&selector) {
            let text = text_of(p);
            if text.len() > 5 && !NAV_PHRASES.iter().any(|nav| text.contains(nav)) {
                return Some(text);
            }
        }
    }
    None
}

fn extract_inheritance(document: &Html) -> Option<String> {
    // Tables with an explicit inheritance row come first.
    if let Ok(tr_selector) = Selector::parse("table tr") {
        let td_selector = Selector::parse("td, th").ok()?;
        for row in document.select(&tr_selector) {
            let cells: Vec<ElementRef> = row.select(&td_selector).collect();
            if cells.len() >= 2 {
                let label = text_of(cells[0]);
                if label.contains("継承") || label.to_lowercase().contains("inherit") {
                    let value = text_of(cells[1]);
                    if !value.is_empty() {
                        return Some(value);
                    }
                }
            }
        }
    }

    // Fallback: a class declaration inside a code block, "class X : Base".
    let code_selector = Selector::parse("code, pre, div.memproto").ok()?;
    for element in document.select(&code_selector) {
        let text = text_of(element);
        if let Some(base) = base_from_declaration(&text) {
            return Some(base);
        }
    }

    None
}

/// Pulls the base type out of a `class Name : Base` declaration
fn base_from_declaration(text: &str) -> Option<String> {
    let class_pos = text.find("class ")?;
    let after = &text[class_pos + "class ".len()..];
    let colon = after.find(':')?;
    // A generic constraint or a body brace before the colon means this is
    // not the inheritance clause.
    if after[..colon].contains('{') {
        return None;
    }
    let base = after[colon + 1..]
        .split(|c: char| c == '{' || c == ',' || c == '\n')
        .next()?
        .trim();
    if base.is_empty() || base.eq_ignore_ascii_case("object") {
        return None;
    }
    Some(base.to_string())
}

// ===== Member listing rows =====

/// Classifies a group heading into a section kind plus a static marker
fn classify_heading(text: &str) -> Option<(SectionKind, bool)> {
    let lower = text.to_lowercase();
    let is_static = lower.contains("static") || text.contains("静的");

    let kind = if lower.contains("constructor") || text.contains("コンストラクタ") {
        SectionKind::Constructors
    } else if lower.contains("member function") || text.contains("メンバ関数") {
        SectionKind::Methods
    } else if lower.contains("propert") || text.contains("プロパティ") {
        SectionKind::Properties
    } else if lower.contains("attribute") || lower.contains("field") || text.contains("変数") {
        SectionKind::Fields
    } else if lower.contains("event") || text.contains("イベント") {
        SectionKind::Events
    } else {
        return None;
    };

    Some((kind, is_static))
}

/// Result of scanning the member declaration tables
#[derive(Debug, Default)]
struct SectionScan {
    /// Parsed rows tagged with the section they appeared under
    rows: Vec<(SectionKind, MemberRow)>,

    /// Rows under a recognized heading that could not be parsed
    unparsable: Vec<SectionKind>,

    /// Section headings encountered, in document order
    seen: Vec<SectionKind>,
}

/// Walks all member declaration tables, grouping rows under their headings
fn collect_member_rows(document: &Html) -> SectionScan {
    let mut scan = SectionScan::default();

    let Ok(table_selector) = Selector::parse("table.memberdecls") else {
        return scan;
    };
    let Ok(tr_selector) = Selector::parse("tr") else {
        return scan;
    };
    let Ok(heading_selector) = Selector::parse("h2.groupheader") else {
        return scan;
    };

    for table in document.select(&table_selector) {
        let mut current: Option<(SectionKind, bool)> = None;

        for tr in table.select(&tr_selector) {
            if let Some(heading) = tr.select(&heading_selector).next() {
                current = classify_heading(&text_of(heading));
                if let Some((kind, _)) = current {
                    if !scan.seen.contains(&kind) {
                        scan.seen.push(kind);
                    }
                }
                continue;
            }

            let row_class = tr.value().attr("class").unwrap_or("");
            if !row_class.starts_with("memitem") {
                continue;
            }
            let Some((kind, section_static)) = current else {
                continue;
            };

            match parse_member_row(tr, section_static) {
                Some(row) => scan.rows.push((kind, row)),
                None => scan.unparsable.push(kind),
            }
        }
    }

    scan
}

/// Parses one memitem row into its raw cells plus the trailing description
fn parse_member_row(tr: ElementRef, section_static: bool) -> Option<MemberRow> {
    let left_selector = Selector::parse("td.memItemLeft").ok()?;
    let right_selector = Selector::parse("td.memItemRight").ok()?;

    let left = tr
        .select(&left_selector)
        .next()
        .map(text_of)
        .unwrap_or_default();
    let right = text_of(tr.select(&right_selector).next()?);
    if right.is_empty() {
        return None;
    }

    // The description, when present, sits in the next memdesc row.
    let description = next_element(tr).and_then(|next| {
        let class = next.value().attr("class").unwrap_or("");
        if !class.starts_with("memdesc") {
            return None;
        }
        let desc_selector = Selector::parse("td.mdescRight").ok()?;
        let text = text_of(next.select(&desc_selector).next()?);
        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    });

    Some(MemberRow {
        left,
        right,
        description,
        section_static,
    })
}

/// Interprets one raw row as a member of the given kind and attaches it
///
/// Returns false when the row does not form a valid member of that kind.
fn apply_row(
    class: &mut ClassDoc,
    kind: SectionKind,
    row: &MemberRow,
    details: &HashMap<String, MemberDetail>,
) -> bool {
    let left = parse_left_cell(&row.left);
    let (name, params_text) = split_name_and_params(&row.right);
    if name.is_empty() {
        return false;
    }
    let detail = details.get(&name);
    let description = row
        .description
        .clone()
        .or_else(|| detail.and_then(|d| d.description.clone()));

    match kind {
        SectionKind::Constructors => {
            let mut parameters = parse_params(params_text.as_deref().unwrap_or(""));
            enrich_params(&mut parameters, detail);
            class.constructors.push(ConstructorDoc {
                name: class.name.clone(),
                parameters,
                description,
                access_modifier: left.access,
            });
        }
        SectionKind::Methods => {
            let mut parameters = parse_params(params_text.as_deref().unwrap_or(""));
            enrich_params(&mut parameters, detail);
            class.methods.push(MethodDoc {
                name,
                return_type: if left.member_type.is_empty() {
                    "void".to_string()
                } else {
                    left.member_type
                },
                parameters,
                description,
                is_static: left.is_static || row.section_static,
                access_modifier: left.access,
                exceptions: detail.map(|d| d.exceptions.clone()).unwrap_or_default(),
            });
        }
        SectionKind::Properties => {
            if left.member_type.is_empty() {
                return false;
            }
            let (prop_name, getter, setter) = parse_property_name(&name);
            class.properties.push(PropertyDoc {
                name: prop_name,
                property_type: left.member_type,
                description,
                access_modifier: left.access,
                getter,
                setter,
                is_static: left.is_static || row.section_static,
            });
        }
        SectionKind::Fields => {
            if left.member_type.is_empty() {
                return false;
            }
            let (field_name, value) = parse_field_name(&name);
            class.fields.push(FieldDoc {
                name: field_name,
                field_type: left.member_type,
                description,
                access_modifier: left.access,
                is_static: left.is_static || row.section_static,
                is_readonly: left.is_readonly,
                value,
            });
        }
        SectionKind::Events => {
            if left.member_type.is_empty() {
                return false;
            }
            class.events.push(EventDoc {
                name,
                event_type: left.member_type,
                description,
                access_modifier: left.access,
            });
        }
    }

    true
}

/// Splits a property declaration like `Width [get, set]` into name + flags
///
/// Without accessor brackets both accessors are assumed present.
fn parse_property_name(raw: &str) -> (String, bool, bool) {
    match raw.split_once('[') {
        Some((name, accessors)) => {
            let accessors = accessors.to_lowercase();
            (
                name.trim().to_string(),
                accessors.contains("get"),
                accessors.contains("set"),
            )
        }
        None => (raw.trim().to_string(), true, true),
    }
}

/// Splits a field declaration like `MaxSize = 42` into name + initial value
fn parse_field_name(raw: &str) -> (String, Option<String>) {
    match raw.split_once('=') {
        Some((name, value)) => {
            let value = value.trim();
            (
                name.trim().to_string(),
                if value.is_empty() {
                    None
                } else {
                    Some(value.to_string())
                },
            )
        }
        None => (raw.trim().to_string(), None),
    }
}

/// Copies parameter descriptions from a detail block onto parsed parameters
fn enrich_params(params: &mut [crate::model::ParamDoc], detail: Option<&MemberDetail>) {
    let Some(detail) = detail else {
        return;
    };
    for param in params.iter_mut() {
        if let Some(desc) = detail.param_descriptions.get(&param.name) {
            param.description = Some(desc.clone());
        }
    }
}

// ===== Member detail blocks =====

/// Indexes the page's `div.memitem` detail blocks by member name
fn collect_member_details(document: &Html) -> HashMap<String, MemberDetail> {
    let mut details = HashMap::new();

    let Ok(memitem_selector) = Selector::parse("div.memitem") else {
        return details;
    };
    let Ok(memname_selector) = Selector::parse("table.memproto td.memname") else {
        return details;
    };
    let Ok(doc_p_selector) = Selector::parse("div.memdoc p") else {
        return details;
    };
    let Ok(param_row_selector) = Selector::parse("dl.params table.params tr") else {
        return details;
    };
    let Ok(exception_row_selector) = Selector::parse("dl.exception table.exception tr") else {
        return details;
    };
    let Ok(cell_selector) = Selector::parse("td") else {
        return details;
    };

    for block in document.select(&memitem_selector) {
        let Some(name_cell) = block.select(&memname_selector).next() else {
            continue;
        };
        let Some(name) = member_name_from_proto(&text_of(name_cell)) else {
            continue;
        };

        let mut detail = MemberDetail::default();

        detail.description = block
            .select(&doc_p_selector)
            .map(|p| text_of(p))
            .find(|text| text.len() > 5);

        for row in block.select(&param_row_selector) {
            let cells: Vec<ElementRef> = row.select(&cell_selector).collect();
            if cells.len() >= 2 {
                let pname = text_of(cells[0]);
                let pdesc = text_of(cells[cells.len() - 1]);
                if !pname.is_empty() && !pdesc.is_empty() {
                    detail.param_descriptions.insert(pname, pdesc);
                }
            }
        }

        for row in block.select(&exception_row_selector) {
            let cells: Vec<ElementRef> = row.select(&cell_selector).collect();
            if cells.len() >= 2 {
                let etype = text_of(cells[0]);
                let edesc = text_of(cells[cells.len() - 1]);
                if !etype.is_empty() {
                    detail.exceptions.push(ExceptionDoc {
                        exception_type: etype,
                        description: edesc,
                    });
                }
            }
        }

        details.insert(name, detail);
    }

    details
}

/// Extracts the member's simple name from a memproto name cell
///
/// The cell text looks like `bool Yukar.Engine.MapScene.Load` (the
/// parameter list lives in sibling cells).
fn member_name_from_proto(text: &str) -> Option<String> {
    let qualified = text.split_whitespace().last()?;
    let simple = qualified.rsplit('.').next()?.trim_matches('(');
    if simple.is_empty() {
        return None;
    }
    Some(simple.to_string())
}
