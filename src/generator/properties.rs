use askama::Template;

use super::accessors::printf_safe;
use super::context::ModuleContext;
use super::types::{cpp_string_literal, CppType};
use crate::error::EmissionError;

struct PropertyView {
    guard: String,
    member: String,
}

#[derive(Template)]
#[template(path = "property_pointer.txt", escape = "none")]
struct PropertyPointerTemplate<'a> {
    class_name: &'a str,
    value_type: String,
    properties: Vec<PropertyView>,
    unknown_error: String,
}

/// Common storage type of the conditional variables, or `None` when the
/// module has none.
///
/// # Errors
///
/// [`EmissionError::MixedPropertyTypes`] when two variables disagree.
pub fn property_type(ctx: &ModuleContext<'_>) -> Result<Option<String>, EmissionError> {
    let mut common: Option<String> = None;
    for var in &ctx.module.conditional_variables {
        let ty = CppType::resolve(&var.name.label(), &var.declared_type, ctx.settings)?
            .storage(ctx.settings);
        match &common {
            None => common = Some(ty),
            Some(first) if *first != ty => {
                return Err(EmissionError::MixedPropertyTypes {
                    first: first.clone(),
                    second: ty,
                });
            }
            Some(_) => {}
        }
    }
    Ok(common)
}

/// `getPropertyPointer(name)`, or `None` when the module has no conditional
/// variables.
///
/// A member's address is returned only while its condition holds.
pub fn property_pointer(ctx: &ModuleContext<'_>) -> Result<Option<String>, EmissionError> {
    let Some(value_type) = property_type(ctx)? else {
        return Ok(None);
    };

    let properties = ctx
        .module
        .conditional_variables
        .iter()
        .map(|var| {
            let name_check = format!("property == {}", cpp_string_literal(&var.name.label()));
            let guard = if var.is_unconditional() {
                name_check
            } else {
                format!("{name_check} && ({})", var.condition.trim())
            };
            PropertyView {
                guard,
                member: var.name.member_identifier(),
            }
        })
        .collect();

    let unknown_error = format!(
        "{}({}, property.c_str());",
        ctx.settings.error_macro,
        cpp_string_literal(&format!(
            " + Property %s not recognized for module {}.\n",
            printf_safe(&ctx.module.name)
        ))
    );

    let rendered = PropertyPointerTemplate {
        class_name: ctx.class_name(),
        value_type,
        properties,
        unknown_error,
    }
    .render()?
    .trim_end()
    .to_string();
    Ok(Some(rendered))
}
