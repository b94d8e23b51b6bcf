use askama::Template;

use super::context::ModuleContext;
use super::types::{cpp_string_literal, CppType};
use crate::error::EmissionError;

struct CriterionView {
    condition: String,
    reason: String,
}

#[derive(Template)]
#[template(path = "check_termination.txt", escape = "none")]
struct CheckTerminationTemplate<'a> {
    class_name: &'a str,
    log: &'a str,
    criteria: Vec<CriterionView>,
    has_parent: bool,
    parent: String,
}

/// `checkTermination()`, or `None` when the module declares no criteria.
///
/// Every criterion that holds pushes `Class['Name'] = value.` onto the
/// termination log, so the reason a run stopped is visible to the user.
pub fn check_termination(ctx: &ModuleContext<'_>) -> Result<Option<String>, EmissionError> {
    let module = ctx.module;
    if module.termination_criteria.is_empty() {
        return Ok(None);
    }

    let mut criteria = Vec::with_capacity(module.termination_criteria.len());
    for criterion in &module.termination_criteria {
        let label = criterion.name.label();
        let ty = CppType::resolve(&label, &criterion.declared_type, ctx.settings)?;
        let member = criterion.name.member_identifier();
        let head = format!("{}['{}']", module.name, label);
        let reason = match ty.display_expr(&member, ctx.settings) {
            Some(value) => format!(
                "{} + {} + \".\"",
                cpp_string_literal(&format!("{head} = ")),
                value
            ),
            None => cpp_string_literal(&format!("{head} reached.")),
        };
        criteria.push(CriterionView {
            condition: criterion.criteria.trim().to_string(),
            reason,
        });
    }

    let parent = ctx.chained_parent();
    let rendered = CheckTerminationTemplate {
        class_name: ctx.class_name(),
        log: &ctx.settings.termination_log,
        criteria,
        has_parent: parent.is_some(),
        parent: parent.unwrap_or_default(),
    }
    .render()?
    .trim_end()
    .to_string();
    Ok(Some(rendered))
}
