use askama::Template;
use serde_json::Value;

use super::context::ModuleContext;
use super::types::{cpp_string_literal, json_access, key_args, CppType};
use crate::error::EmissionError;
use crate::schema::KeyPath;

/// What `setConfiguration` does when a setting is absent from its input.
#[derive(Debug, Clone, PartialEq)]
pub enum Fallback {
    /// Report through the error macro
    Required,
    /// Assign the default
    Default { value: Value, expr: String },
    /// Leave the member as it is (internal settings)
    Keep,
}

/// One member bound to a key path of the configuration object.
#[derive(Debug, Clone, PartialEq)]
pub struct SettingBinding {
    pub member: String,
    pub key: KeyPath,
    pub cpp_type: CppType,
    pub fallback: Fallback,
}

/// Outcome of reading one binding from an input object.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolved {
    Input(Value),
    Default(Value),
    Unchanged,
    Missing,
}

impl SettingBinding {
    /// Evaluate the generated read logic against `input`.
    ///
    /// Mirrors the `setConfiguration` branch emitted for this binding: the
    /// input value when defined, else the fallback.
    pub fn resolve(&self, input: &Value) -> Resolved {
        let mut node = input;
        let mut found = true;
        for segment in self.key.segments() {
            match node.get(segment) {
                Some(next) => node = next,
                None => {
                    found = false;
                    break;
                }
            }
        }
        if found {
            return Resolved::Input(node.clone());
        }
        match &self.fallback {
            Fallback::Required => Resolved::Missing,
            Fallback::Default { value, .. } => Resolved::Default(value.clone()),
            Fallback::Keep => Resolved::Unchanged,
        }
    }
}

fn binding(
    ctx: &ModuleContext<'_>,
    key: KeyPath,
    member: String,
    declared: &str,
    default: Option<&Value>,
    internal: bool,
) -> Result<SettingBinding, EmissionError> {
    let label = key.label();
    let cpp_type = CppType::resolve(&label, declared, ctx.settings)?;
    let fallback = match default {
        Some(value) => {
            let expr = cpp_type.default_expr(value, ctx.settings).ok_or_else(|| {
                EmissionError::DefaultTypeMismatch {
                    item: label.clone(),
                    declared: declared.to_string(),
                    value: value.to_string(),
                }
            })?;
            Fallback::Default {
                value: value.clone(),
                expr,
            }
        }
        None if internal => Fallback::Keep,
        None => Fallback::Required,
    };
    Ok(SettingBinding {
        member,
        key,
        cpp_type,
        fallback,
    })
}

/// Bindings read and written by the configuration accessors, in order:
/// configuration settings, termination criteria, internal settings.
pub fn setting_bindings(ctx: &ModuleContext<'_>) -> Result<Vec<SettingBinding>, EmissionError> {
    let module = ctx.module;
    let mut out = Vec::new();
    for item in &module.configurable_items {
        out.push(binding(
            ctx,
            item.name.clone(),
            item.name.member_identifier(),
            &item.declared_type,
            item.default.as_ref(),
            false,
        )?);
    }
    for criterion in &module.termination_criteria {
        out.push(binding(
            ctx,
            criterion.key_path(),
            criterion.name.member_identifier(),
            &criterion.declared_type,
            criterion.default.as_ref(),
            false,
        )?);
    }
    for item in &module.internal_settings {
        out.push(binding(
            ctx,
            item.name.clone(),
            item.name.member_identifier(),
            &item.declared_type,
            item.default.as_ref(),
            true,
        )?);
    }
    Ok(out)
}

struct BindingView {
    member: String,
    key_args: String,
    read_expr: String,
    read_error: String,
    has_else: bool,
    else_stmt: String,
}

#[derive(Template)]
#[template(path = "set_configuration.txt", escape = "none")]
struct SetConfigurationTemplate<'a> {
    class_name: &'a str,
    json_type: &'a str,
    bindings: Vec<BindingView>,
    has_parent: bool,
    parent: String,
}

#[derive(Template)]
#[template(path = "get_configuration.txt", escape = "none")]
struct GetConfigurationTemplate<'a> {
    class_name: &'a str,
    json_type: &'a str,
    statements: Vec<String>,
    has_parent: bool,
    parent: String,
}

/// Escape `%` so that user text survives printf-style error macros.
pub(crate) fn printf_safe(text: &str) -> String {
    text.replace('%', "%%")
}

/// `setConfiguration(json&)`: reads every binding from the configuration
/// object, substituting defaults or reporting missing mandatory settings.
pub fn set_configuration(ctx: &ModuleContext<'_>) -> Result<String, EmissionError> {
    let class = ctx.class_name();
    let macro_name = &ctx.settings.error_macro;
    let bindings = setting_bindings(ctx)?
        .into_iter()
        .map(|b| {
            let access = json_access("js", b.key.segments());
            let key = printf_safe(&b.key.to_string());
            let read_error = format!(
                "{macro_name}({}, e.what());",
                cpp_string_literal(&format!(
                    " + Object: [ {class} ] \n + Key:    {key}\n%s"
                ))
            );
            let else_stmt = match &b.fallback {
                Fallback::Required => Some(format!(
                    "{macro_name}({});",
                    cpp_string_literal(&format!(
                        " + No value provided for mandatory setting: {key} required by {class}.\n"
                    ))
                )),
                Fallback::Default { expr, .. } => Some(format!("{} = {expr};", b.member)),
                Fallback::Keep => None,
            };
            BindingView {
                read_expr: b.cpp_type.read_expr(&access, ctx.settings),
                key_args: key_args(b.key.segments()),
                member: b.member,
                read_error,
                has_else: else_stmt.is_some(),
                else_stmt: else_stmt.unwrap_or_default(),
            }
        })
        .collect();

    let parent = ctx.chained_parent();
    Ok(SetConfigurationTemplate {
        class_name: class,
        json_type: ctx.json_type(),
        bindings,
        has_parent: parent.is_some(),
        parent: parent.unwrap_or_default(),
    }
    .render()?
    .trim_end()
    .to_string())
}

/// `getConfiguration(json&)`: writes every binding back into the
/// configuration object.
pub fn get_configuration(ctx: &ModuleContext<'_>) -> Result<String, EmissionError> {
    let statements = setting_bindings(ctx)?
        .iter()
        .map(|b| {
            b.cpp_type
                .write_stmt(&b.member, &json_access("js", b.key.segments()))
        })
        .collect();

    let parent = ctx.chained_parent();
    Ok(GetConfigurationTemplate {
        class_name: ctx.class_name(),
        json_type: ctx.json_type(),
        statements,
        has_parent: parent.is_some(),
        parent: parent.unwrap_or_default(),
    }
    .render()?
    .trim_end()
    .to_string())
}
