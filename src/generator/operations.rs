use askama::Template;

use super::accessors::printf_safe;
use super::context::ModuleContext;
use super::types::cpp_string_literal;
use crate::error::EmissionError;

struct OperationView {
    name_literal: String,
    handler: String,
}

#[derive(Template)]
#[template(path = "run_operation.txt", escape = "none")]
struct RunOperationTemplate<'a> {
    class_name: &'a str,
    sample_type: &'a str,
    operations: Vec<OperationView>,
    has_parent: bool,
    parent: String,
    unknown_error: String,
}

/// `runOperation(name, sample)`, or `None` when the module declares no
/// operations.
///
/// Names are matched in declaration order; unmatched names fall through to
/// the parent module before being reported.
pub fn run_operation(ctx: &ModuleContext<'_>) -> Result<Option<String>, EmissionError> {
    let module = ctx.module;
    if module.available_operations.is_empty() {
        return Ok(None);
    }

    let operations = module
        .available_operations
        .iter()
        .map(|op| OperationView {
            name_literal: cpp_string_literal(&op.name),
            handler: op.handler(),
        })
        .collect();

    let unknown_error = format!(
        "{}({}, operation.c_str());",
        ctx.settings.error_macro,
        cpp_string_literal(&format!(
            " + Operation %s not recognized for module {}.\n",
            printf_safe(&module.name)
        ))
    );

    let parent = ctx.chained_parent();
    let rendered = RunOperationTemplate {
        class_name: ctx.class_name(),
        sample_type: &ctx.settings.sample_type,
        operations,
        has_parent: parent.is_some(),
        parent: parent.unwrap_or_default(),
        unknown_error,
    }
    .render()?
    .trim_end()
    .to_string();
    Ok(Some(rendered))
}
