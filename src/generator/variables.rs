use askama::Template;
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;
use tracing::debug;

use super::doxygen::doc_block;
use super::types::{json_access, key_args, CppType};
use crate::error::{AggregateError, EmissionError};
use crate::schema::{KeyPath, ModuleConfig};
use crate::settings::GeneratorSettings;
use crate::template::{expand, Marker, ValidatedTemplate};

/// One field of the aggregate `Variable` class.
#[derive(Debug, Clone, PartialEq)]
pub struct VariableField {
    pub member: String,
    pub key: KeyPath,
    pub cpp_type: CppType,
    pub declared_type: String,
    pub description: String,
    pub default: Option<Value>,
    /// Module that first declared the field
    pub module: String,
}

/// Union of the `Variables Configuration` items of every generated module.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VariableAggregate {
    fields: Vec<VariableField>,
}

impl VariableAggregate {
    /// Merge variable items in the given module order.
    ///
    /// The first declaration of an identifier wins; a later declaration with
    /// a different C++ type is an error.
    pub fn build<'a, I>(modules: I, settings: &GeneratorSettings) -> Result<Self, AggregateError>
    where
        I: IntoIterator<Item = &'a ModuleConfig>,
    {
        let mut fields: Vec<VariableField> = Vec::new();
        let mut by_member: HashMap<String, usize> = HashMap::new();

        for module in modules {
            for item in &module.variable_items {
                let label = item.name.label();
                let cpp_type = CppType::resolve(&label, &item.declared_type, settings)?;
                let member = item.name.member_identifier();

                if let Some(&idx) = by_member.get(&member) {
                    let first = &fields[idx];
                    if first.cpp_type != cpp_type {
                        return Err(AggregateError::ConflictingVariable {
                            name: member,
                            first: first.declared_type.clone(),
                            first_module: first.module.clone(),
                            second: item.declared_type.clone(),
                            second_module: module.name.clone(),
                        });
                    }
                    debug!(%member, module = %module.name, "variable field already declared");
                    continue;
                }

                by_member.insert(member.clone(), fields.len());
                fields.push(VariableField {
                    member,
                    key: item.name.clone(),
                    cpp_type,
                    declared_type: item.declared_type.clone(),
                    description: item.description.clone(),
                    default: item.default.clone(),
                    module: module.name.clone(),
                });
            }
        }

        Ok(VariableAggregate { fields })
    }

    pub fn fields(&self) -> &[VariableField] {
        &self.fields
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Expand the variable template with the field declarations and the
    /// inline configuration accessors. `path` only labels errors.
    pub fn render(
        &self,
        template: &ValidatedTemplate,
        path: &Path,
        settings: &GeneratorSettings,
    ) -> Result<String, AggregateError> {
        let mut fragments = vec![(Marker::VariableDeclarations, self.declarations(settings)?)];
        if template.contains(Marker::VariableConfiguration) {
            fragments.push((Marker::VariableConfiguration, self.configuration(settings)?));
        }
        expand(template, &fragments).map_err(|source| AggregateError::Template {
            path: path.to_path_buf(),
            source,
        })
    }

    fn default_expr(
        field: &VariableField,
        settings: &GeneratorSettings,
    ) -> Result<Option<String>, EmissionError> {
        let Some(value) = &field.default else {
            return Ok(None);
        };
        field
            .cpp_type
            .default_expr(value, settings)
            .map(Some)
            .ok_or_else(|| EmissionError::DefaultTypeMismatch {
                item: field.key.label(),
                declared: field.declared_type.clone(),
                value: value.to_string(),
            })
    }

    fn declarations(&self, settings: &GeneratorSettings) -> Result<String, EmissionError> {
        let mut fields = Vec::with_capacity(self.fields.len());
        for field in &self.fields {
            let storage = field.cpp_type.storage(settings);
            let declaration = match Self::default_expr(field, settings)? {
                Some(expr) => format!("{storage} {} = {expr};", field.member),
                None => format!("{storage} {};", field.member),
            };
            let brief = if field.description.trim().is_empty() {
                field.key.label()
            } else {
                field.description.clone()
            };
            fields.push(FieldDeclView {
                doc: doc_block("  ", &brief, &[])?,
                declaration,
            });
        }
        let rendered = VariableDeclarationsTemplate { fields }.render()?;
        Ok(rendered.trim().to_string())
    }

    fn configuration(&self, settings: &GeneratorSettings) -> Result<String, EmissionError> {
        let mut fields = Vec::with_capacity(self.fields.len());
        for field in &self.fields {
            let access = json_access("js", field.key.segments());
            let default_expr = Self::default_expr(field, settings)?;
            fields.push(FieldConfigView {
                key_args: key_args(field.key.segments()),
                member: field.member.clone(),
                read_expr: field.cpp_type.read_expr(&access, settings),
                write_stmt: field.cpp_type.write_stmt(&field.member, &access),
                has_default: default_expr.is_some(),
                default_expr: default_expr.unwrap_or_default(),
            });
        }
        let rendered = VariableConfigurationTemplate {
            set_doc: doc_block(
                "  ",
                "Reads the variable's settings from its JSON configuration.",
                &["@param js JSON object of one variable.".to_string()],
            )?,
            get_doc: doc_block(
                "  ",
                "Writes the variable's settings into a JSON object.",
                &["@param js JSON object of one variable.".to_string()],
            )?,
            json_type: &settings.json_type,
            fields,
        }
        .render()?
        .trim_end()
        .to_string();
        Ok(rendered.trim_start().to_string())
    }
}

struct FieldDeclView {
    doc: String,
    declaration: String,
}

struct FieldConfigView {
    key_args: String,
    member: String,
    read_expr: String,
    write_stmt: String,
    has_default: bool,
    default_expr: String,
}

#[derive(Template)]
#[template(path = "variable_declarations.txt", escape = "none")]
struct VariableDeclarationsTemplate {
    fields: Vec<FieldDeclView>,
}

#[derive(Template)]
#[template(path = "variable_configuration.txt", escape = "none")]
struct VariableConfigurationTemplate<'a> {
    set_doc: String,
    get_doc: String,
    json_type: &'a str,
    fields: Vec<FieldConfigView>,
}
