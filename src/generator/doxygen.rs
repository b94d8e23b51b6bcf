use askama::Template;

use super::context::ModuleContext;
use crate::error::EmissionError;

#[derive(Template)]
#[template(path = "doc_block.txt", escape = "none")]
struct DocBlockTemplate {
    indent: String,
    lines: Vec<String>,
}

/// Escape text for a Doxygen comment body.
///
/// Doxygen command characters are backslash-escaped and `*/` is broken up so
/// that a description can never close the surrounding comment.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' | '@' | '<' | '>' | '&' | '#' | '%' => {
                out.push('\\');
                out.push(c);
            }
            '/' if out.ends_with('*') => out.push_str(" /"),
            c => out.push(c),
        }
    }
    out
}

/// Render a `/** ... */` block.
///
/// `brief` becomes the `@brief` paragraph; `details` lines follow verbatim
/// (callers escape them). Every line of `brief` is escaped here.
pub fn doc_block(indent: &str, brief: &str, details: &[String]) -> Result<String, EmissionError> {
    let mut body = Vec::new();
    let mut brief_lines = brief.lines();
    body.push(format!("@brief {}", escape(brief_lines.next().unwrap_or("").trim())));
    body.extend(brief_lines.map(|l| escape(l.trim())));
    body.extend(details.iter().cloned());

    let lines = body
        .into_iter()
        .map(|l| {
            if l.is_empty() {
                "*".to_string()
            } else {
                format!("* {l}")
            }
        })
        .collect();

    let rendered = DocBlockTemplate {
        indent: indent.to_string(),
        lines,
    }
    .render()?
    .trim_end()
    .to_string();
    Ok(rendered)
}

/// Documentation block placed above the class declaration.
///
/// Lists configuration settings, termination criteria and operations in
/// declaration order.
pub fn class_doc(ctx: &ModuleContext<'_>) -> Result<String, EmissionError> {
    let module = ctx.module;
    let mut details = Vec::new();

    if let Some(description) = &module.description {
        details.push(String::new());
        details.extend(description.lines().map(|l| escape(l.trim())));
    }

    if !module.configurable_items.is_empty() {
        details.push(String::new());
        details.push("@par Configuration Settings".to_string());
        for item in &module.configurable_items {
            details.push(format!(
                "- {} ({}): {}",
                escape(&item.name.label()),
                escape(&item.declared_type),
                escape(first_line(&item.description))
            ));
        }
    }

    if !module.termination_criteria.is_empty() {
        details.push(String::new());
        details.push("@par Termination Criteria".to_string());
        for criterion in &module.termination_criteria {
            details.push(format!(
                "- {} ({}): {}",
                escape(&criterion.name.label()),
                escape(&criterion.declared_type),
                escape(first_line(&criterion.description))
            ));
        }
    }

    if !module.available_operations.is_empty() {
        details.push(String::new());
        details.push("@par Operations".to_string());
        for op in &module.available_operations {
            details.push(format!(
                "- {}: {}",
                escape(&op.name),
                escape(first_line(&op.description))
            ));
        }
    }

    doc_block(
        "",
        &format!("Class declaration for module: {}.", module.name),
        &details,
    )
}

fn first_line(text: &str) -> &str {
    text.lines().next().unwrap_or("").trim()
}
