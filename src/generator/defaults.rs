use askama::Template;
use serde_json::{Map, Value};

use super::context::ModuleContext;
use super::types::{json_access, json_value_expr, key_args, CppType};
use crate::error::EmissionError;
use crate::schema::{ConfigItem, KeyPath};

/// Ordered `(key path, value)` default assignments.
///
/// Each entry is applied only when its key is not already defined, so
/// applying a plan twice leaves the object exactly as applying it once.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DefaultPlan {
    entries: Vec<(Vec<String>, Value)>,
}

impl DefaultPlan {
    pub fn entries(&self) -> &[(Vec<String>, Value)] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Add an assignment. The first assignment for a path wins.
    pub fn push(&mut self, path: Vec<String>, value: Value) {
        if self.entries.iter().any(|(p, _)| *p == path) {
            return;
        }
        self.entries.push((path, value));
    }

    /// Add one assignment per leaf of a defaults tree.
    ///
    /// Non-empty objects are descended into; everything else (scalars,
    /// arrays, empty objects) is a leaf.
    pub fn push_tree(&mut self, tree: &Map<String, Value>) {
        let mut prefix = Vec::new();
        self.push_tree_at(&mut prefix, tree);
    }

    fn push_tree_at(&mut self, prefix: &mut Vec<String>, tree: &Map<String, Value>) {
        for (key, value) in tree {
            prefix.push(key.clone());
            match value {
                Value::Object(inner) if !inner.is_empty() => self.push_tree_at(prefix, inner),
                leaf => self.push(prefix.clone(), leaf.clone()),
            }
            prefix.pop();
        }
    }

    /// Apply the plan to a JSON object in place.
    ///
    /// Missing intermediate objects are created (a `null` node becomes an
    /// object); a path running through a non-object value is skipped.
    pub fn apply(&self, target: &mut Value) {
        for (path, value) in &self.entries {
            apply_one(target, path, value);
        }
    }
}

fn apply_one(target: &mut Value, path: &[String], value: &Value) {
    let Some((last, parents)) = path.split_last() else {
        return;
    };
    let mut node = target;
    for segment in parents {
        if node.is_null() {
            *node = Value::Object(Map::new());
        }
        let Some(obj) = node.as_object_mut() else {
            return;
        };
        node = obj
            .entry(segment.clone())
            .or_insert_with(|| Value::Object(Map::new()));
    }
    if node.is_null() {
        *node = Value::Object(Map::new());
    }
    if let Some(obj) = node.as_object_mut() {
        obj.entry(last.clone()).or_insert_with(|| value.clone());
    }
}

fn check_item_default(
    ctx: &ModuleContext<'_>,
    key: &KeyPath,
    declared: &str,
    value: &Value,
) -> Result<(), EmissionError> {
    let ty = CppType::resolve(&key.label(), declared, ctx.settings)?;
    if ty.default_expr(value, ctx.settings).is_none() {
        return Err(EmissionError::DefaultTypeMismatch {
            item: key.label(),
            declared: declared.to_string(),
            value: value.to_string(),
        });
    }
    Ok(())
}

fn push_items(
    ctx: &ModuleContext<'_>,
    plan: &mut DefaultPlan,
    items: &[ConfigItem],
) -> Result<(), EmissionError> {
    for item in items {
        if let Some(value) = &item.default {
            check_item_default(ctx, &item.name, &item.declared_type, value)?;
            plan.push(item.name.segments().to_vec(), value.clone());
        }
    }
    Ok(())
}

/// Module-level plan: item defaults in declaration order, then the
/// `Module Defaults` tree.
pub fn module_default_plan(ctx: &ModuleContext<'_>) -> Result<DefaultPlan, EmissionError> {
    let module = ctx.module;
    let mut plan = DefaultPlan::default();
    push_items(ctx, &mut plan, &module.configurable_items)?;
    for criterion in &module.termination_criteria {
        if let Some(value) = &criterion.default {
            let key = criterion.key_path();
            check_item_default(ctx, &key, &criterion.declared_type, value)?;
            plan.push(key.segments().to_vec(), value.clone());
        }
    }
    push_items(ctx, &mut plan, &module.internal_settings)?;
    plan.push_tree(&module.module_defaults);
    Ok(plan)
}

/// Per-variable plan: variable item defaults, then the `Variable Defaults`
/// tree.
pub fn variable_default_plan(ctx: &ModuleContext<'_>) -> Result<DefaultPlan, EmissionError> {
    let module = ctx.module;
    let mut plan = DefaultPlan::default();
    push_items(ctx, &mut plan, &module.variable_items)?;
    plan.push_tree(&module.variable_defaults);
    Ok(plan)
}

struct AssignmentView {
    key_args: String,
    access: String,
    value: String,
}

#[derive(Template)]
#[template(path = "apply_defaults.txt", escape = "none")]
struct ApplyDefaultsTemplate<'a> {
    class_name: &'a str,
    method: &'a str,
    json_type: &'a str,
    assignments: Vec<AssignmentView>,
    has_parent: bool,
    parent: String,
}

fn render_plan(
    ctx: &ModuleContext<'_>,
    method: &str,
    plan: &DefaultPlan,
) -> Result<String, EmissionError> {
    let assignments = plan
        .entries()
        .iter()
        .map(|(path, value)| AssignmentView {
            key_args: key_args(path),
            access: json_access("js", path),
            value: json_value_expr(value, ctx.settings),
        })
        .collect();
    let parent = ctx.chained_parent();
    Ok(ApplyDefaultsTemplate {
        class_name: ctx.class_name(),
        method,
        json_type: ctx.json_type(),
        assignments,
        has_parent: parent.is_some(),
        parent: parent.unwrap_or_default(),
    }
    .render()?
    .trim_end()
    .to_string())
}

/// `applyModuleDefaults(json&)`
pub fn apply_module_defaults(ctx: &ModuleContext<'_>) -> Result<String, EmissionError> {
    render_plan(ctx, "applyModuleDefaults", &module_default_plan(ctx)?)
}

/// `applyVariableDefaults(json&)`
pub fn apply_variable_defaults(ctx: &ModuleContext<'_>) -> Result<String, EmissionError> {
    render_plan(ctx, "applyVariableDefaults", &variable_default_plan(ctx)?)
}
