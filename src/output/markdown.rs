//! Markdown rendering of a completed dataset
//!
//! A deterministic transform over the dataset artifact: one page per
//! namespace plus an index page linking them. The renderer never touches
//! the network or the checkpoint store; it can be re-run any number of
//! times over the same artifact.

use crate::model::{ClassDoc, Dataset, MethodDoc, NamespaceDoc};
use crate::output::OutputResult;
use std::fs;
use std::path::{Path, PathBuf};

/// Renders a dataset to Markdown files under the given directory
///
/// Returns the paths written, index page first.
pub fn render_markdown(dataset: &Dataset, docs_dir: &Path) -> OutputResult<Vec<PathBuf>> {
    fs::create_dir_all(docs_dir)?;

    let mut written = Vec::new();

    let index_path = docs_dir.join("index.md");
    fs::write(&index_path, format_index_page(dataset))?;
    written.push(index_path);

    for namespace in &dataset.namespaces {
        let path = docs_dir.join(namespace_file_name(&namespace.name));
        fs::write(&path, format_namespace_page(namespace))?;
        written.push(path);
    }

    Ok(written)
}

/// File name for a namespace page: `Yukar.Engine` -> `yukar-engine.md`
pub fn namespace_file_name(name: &str) -> String {
    let slug: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '-'
            }
        })
        .collect();
    format!("{}.md", slug.trim_matches('-'))
}

/// Formats the index page linking every namespace
pub fn format_index_page(dataset: &Dataset) -> String {
    let mut md = String::new();

    md.push_str("# API Reference\n\n");
    md.push_str(&format!("- Source: {}\n", dataset.meta.source_root));
    md.push_str(&format!("- Captured: {}\n", dataset.meta.captured_at));
    md.push_str(&format!(
        "- Namespaces: {} / Classes: {}\n\n",
        dataset.namespaces.len(),
        dataset.class_count()
    ));

    md.push_str("## Namespaces\n\n");
    for namespace in &dataset.namespaces {
        md.push_str(&format!(
            "- [{}]({}) ({} classes)\n",
            namespace.name,
            namespace_file_name(&namespace.name),
            namespace.classes.len()
        ));
        if let Some(desc) = &namespace.description {
            md.push_str(&format!("  - {}\n", desc));
        }
    }

    md
}

/// Formats one namespace with all its classes
pub fn format_namespace_page(namespace: &NamespaceDoc) -> String {
    let mut md = String::new();

    md.push_str(&format!("# {} Namespace\n\n", namespace.name));
    if let Some(desc) = &namespace.description {
        md.push_str(&format!("{}\n\n", desc));
    }

    for class in &namespace.classes {
        format_class(&mut md, class);
    }

    md
}

fn format_class(md: &mut String, class: &ClassDoc) {
    md.push_str(&format!("## {}\n\n", class.name));
    md.push_str(&format!("- **Full name**: `{}`\n", class.full_name));
    if let Some(inheritance) = &class.inheritance {
        md.push_str(&format!("- **Inherits**: `{}`\n", inheritance));
    }
    md.push_str(&format!("- **Source**: {}\n\n", class.url));

    if let Some(desc) = &class.description {
        md.push_str(&format!("{}\n\n", desc));
    }

    if !class.constructors.is_empty() {
        md.push_str("### Constructors\n\n");
        for ctor in &class.constructors {
            let params: Vec<String> = ctor
                .parameters
                .iter()
                .map(|p| format!("{} {}", p.param_type, p.name))
                .collect();
            md.push_str(&format!(
                "- `{} {}({})`\n",
                ctor.access_modifier,
                ctor.name,
                params.join(", ")
            ));
            if let Some(desc) = &ctor.description {
                md.push_str(&format!("  - {}\n", desc));
            }
        }
        md.push('\n');
    }

    if !class.methods.is_empty() {
        md.push_str("### Methods\n\n");
        for method in &class.methods {
            format_method(md, method);
        }
        md.push('\n');
    }

    if !class.properties.is_empty() {
        md.push_str("### Properties\n\n");
        md.push_str("| Name | Type | Access | Accessors |\n");
        md.push_str("|------|------|--------|-----------|\n");
        for prop in &class.properties {
            let mut accessors = Vec::new();
            if prop.getter {
                accessors.push("get");
            }
            if prop.setter {
                accessors.push("set");
            }
            md.push_str(&format!(
                "| {} | `{}` | {} | {} |\n",
                prop.name,
                prop.property_type,
                prop.access_modifier,
                accessors.join(", ")
            ));
        }
        md.push('\n');
    }

    if !class.fields.is_empty() {
        md.push_str("### Fields\n\n");
        for field in &class.fields {
            let mut line = format!("- `{} {}`", field.field_type, field.name);
            if let Some(value) = &field.value {
                line.push_str(&format!(" = `{}`", value));
            }
            if field.is_static {
                line.push_str(" (static)");
            }
            if field.is_readonly {
                line.push_str(" (readonly)");
            }
            md.push_str(&line);
            md.push('\n');
            if let Some(desc) = &field.description {
                md.push_str(&format!("  - {}\n", desc));
            }
        }
        md.push('\n');
    }

    if !class.events.is_empty() {
        md.push_str("### Events\n\n");
        for event in &class.events {
            md.push_str(&format!("- `{}` ({})\n", event.name, event.event_type));
            if let Some(desc) = &event.description {
                md.push_str(&format!("  - {}\n", desc));
            }
        }
        md.push('\n');
    }
}

fn format_method(md: &mut String, method: &MethodDoc) {
    let params: Vec<String> = method
        .parameters
        .iter()
        .map(|p| format!("{} {}", p.param_type, p.name))
        .collect();
    let static_marker = if method.is_static { "static " } else { "" };
    md.push_str(&format!(
        "- `{}{} {}({})`\n",
        static_marker,
        method.return_type,
        method.name,
        params.join(", ")
    ));
    if let Some(desc) = &method.description {
        md.push_str(&format!("  - {}\n", desc));
    }
    for param in &method.parameters {
        if let Some(desc) = &param.description {
            md.push_str(&format!("  - `{}`: {}\n", param.name, desc));
        }
    }
    for exception in &method.exceptions {
        md.push_str(&format!(
            "  - Throws `{}`: {}\n",
            exception.exception_type, exception.description
        ));
    }
}
