use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::Path;
use tracing::{debug, warn};

use super::types::{
    ConditionalVariable, ConfigItem, KeyPath, ModuleConfig, Operation, TerminationCriterion,
};
use crate::error::SchemaError;

/// Serialization format of a module description.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Json,
    Yaml,
}

impl ConfigFormat {
    /// `.yaml`/`.yml` files are YAML; everything else (`.config`, `.json`) is JSON.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => ConfigFormat::Yaml,
            _ => ConfigFormat::Json,
        }
    }
}

// Keeps an explicit `null` distinguishable from an absent key.
fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

#[derive(Deserialize)]
struct RawModule {
    #[serde(rename = "Module Data")]
    module_data: Option<RawModuleData>,
    #[serde(rename = "Configuration Settings", default)]
    configuration_settings: Vec<RawConfigItem>,
    #[serde(rename = "Termination Criteria", default)]
    termination_criteria: Vec<RawTerminationCriterion>,
    #[serde(rename = "Internal Settings", default)]
    internal_settings: Vec<RawConfigItem>,
    #[serde(rename = "Variables Configuration", default)]
    variables_configuration: Vec<RawConfigItem>,
    #[serde(rename = "Conditional Variables", default)]
    conditional_variables: Vec<RawConditionalVariable>,
    #[serde(rename = "Available Operations", default)]
    available_operations: Vec<RawOperation>,
    #[serde(rename = "Module Defaults", default)]
    module_defaults: Option<Value>,
    #[serde(rename = "Variable Defaults", default)]
    variable_defaults: Option<Value>,
    #[serde(flatten)]
    extra: BTreeMap<String, Value>,
}

#[derive(Deserialize)]
struct RawModuleData {
    #[serde(rename = "Class Name")]
    class_name: Option<String>,
    #[serde(rename = "Namespace")]
    namespace: Option<Vec<String>>,
    #[serde(rename = "Parent Module")]
    parent_module: Option<String>,
    #[serde(rename = "Description")]
    description: Option<String>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfigItem {
    #[serde(rename = "Name")]
    name: KeyPath,
    #[serde(rename = "Type")]
    declared_type: String,
    #[serde(rename = "Description")]
    description: String,
    #[serde(rename = "Default", default, deserialize_with = "present")]
    default: Option<Value>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawTerminationCriterion {
    #[serde(rename = "Name")]
    name: KeyPath,
    #[serde(rename = "Type")]
    declared_type: String,
    #[serde(rename = "Criteria")]
    criteria: String,
    #[serde(rename = "Description")]
    description: String,
    #[serde(rename = "Default", default, deserialize_with = "present")]
    default: Option<Value>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConditionalVariable {
    #[serde(rename = "Name")]
    name: KeyPath,
    #[serde(rename = "Condition")]
    condition: String,
    #[serde(rename = "Type", default = "default_property_type")]
    declared_type: String,
    #[serde(rename = "Description", default)]
    description: String,
}

fn default_property_type() -> String {
    "double".to_string()
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawOperation {
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "Function")]
    function: Option<String>,
    #[serde(rename = "Description")]
    description: String,
}

impl From<RawConfigItem> for ConfigItem {
    fn from(raw: RawConfigItem) -> Self {
        ConfigItem {
            name: raw.name,
            declared_type: raw.declared_type,
            description: raw.description,
            default: raw.default,
        }
    }
}

/// Load and validate a module description from disk.
///
/// The format is chosen from the file extension (see [`ConfigFormat::from_path`]).
///
/// # Errors
///
/// Returns [`SchemaError`] if the file cannot be read, is not valid JSON/YAML,
/// is missing `Module Data` / `Class Name` / `Namespace`, has a list entry
/// without a mandated key (or with an unknown one), or declares two members
/// with the same C++ identifier.
pub fn load_module_config(path: &Path) -> Result<ModuleConfig, SchemaError> {
    load_module_config_as(path, &path.display().to_string())
}

/// Like [`load_module_config`], labelling errors with `origin` instead of
/// the full path.
pub fn load_module_config_as(path: &Path, origin: &str) -> Result<ModuleConfig, SchemaError> {
    let text = std::fs::read_to_string(path).map_err(|source| SchemaError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_module_config(&text, ConfigFormat::from_path(path), origin)
}

/// Parse a module description held in memory.
///
/// `origin` is only used to label errors and log lines.
pub fn parse_module_config(
    text: &str,
    format: ConfigFormat,
    origin: &str,
) -> Result<ModuleConfig, SchemaError> {
    let raw: RawModule = match format {
        ConfigFormat::Json => serde_json::from_str(text).map_err(|e| malformed(origin, e))?,
        ConfigFormat::Yaml => serde_yaml::from_str(text).map_err(|e| malformed(origin, e))?,
    };

    let data = raw
        .module_data
        .ok_or_else(|| missing(origin, "Module Data"))?;
    let name = data
        .class_name
        .filter(|n| !n.trim().is_empty())
        .ok_or_else(|| missing(origin, "Module Data.Class Name"))?;
    let namespace = data
        .namespace
        .ok_or_else(|| missing(origin, "Module Data.Namespace"))?;
    if namespace.iter().any(|n| n.trim().is_empty()) {
        return Err(SchemaError::Malformed {
            origin: origin.to_string(),
            message: "Namespace contains an empty segment".to_string(),
        });
    }

    for key in raw.extra.keys() {
        warn!(origin, key = %key, "ignoring unknown top-level key in module description");
    }

    let config = ModuleConfig {
        origin: origin.to_string(),
        name,
        namespace,
        parent: data.parent_module.filter(|p| !p.trim().is_empty()),
        description: data.description,
        configurable_items: raw
            .configuration_settings
            .into_iter()
            .map(ConfigItem::from)
            .collect(),
        termination_criteria: raw
            .termination_criteria
            .into_iter()
            .map(|raw| TerminationCriterion {
                name: raw.name,
                declared_type: raw.declared_type,
                criteria: raw.criteria,
                description: raw.description,
                default: raw.default,
            })
            .collect(),
        internal_settings: raw
            .internal_settings
            .into_iter()
            .map(ConfigItem::from)
            .collect(),
        variable_items: raw
            .variables_configuration
            .into_iter()
            .map(ConfigItem::from)
            .collect(),
        conditional_variables: raw
            .conditional_variables
            .into_iter()
            .map(|raw| ConditionalVariable {
                name: raw.name,
                condition: raw.condition,
                declared_type: raw.declared_type,
                description: raw.description,
            })
            .collect(),
        available_operations: raw
            .available_operations
            .into_iter()
            .map(|raw| Operation {
                name: raw.name,
                function: raw.function.filter(|f| !f.trim().is_empty()),
                description: raw.description,
            })
            .collect(),
        module_defaults: defaults_tree(origin, "Module Defaults", raw.module_defaults)?,
        variable_defaults: defaults_tree(origin, "Variable Defaults", raw.variable_defaults)?,
    };

    check_key_paths(&config)?;
    check_collisions(&config)?;
    debug!(
        origin,
        module = %config.name,
        settings = config.configurable_items.len(),
        criteria = config.termination_criteria.len(),
        operations = config.available_operations.len(),
        "parsed module description"
    );
    Ok(config)
}

fn malformed(origin: &str, e: impl std::fmt::Display) -> SchemaError {
    SchemaError::Malformed {
        origin: origin.to_string(),
        message: e.to_string(),
    }
}

fn missing(origin: &str, field: &str) -> SchemaError {
    SchemaError::MissingField {
        origin: origin.to_string(),
        field: field.to_string(),
    }
}

fn defaults_tree(
    origin: &str,
    section: &str,
    value: Option<Value>,
) -> Result<Map<String, Value>, SchemaError> {
    match value {
        None | Some(Value::Null) => Ok(Map::new()),
        Some(Value::Object(map)) => Ok(map),
        Some(other) => Err(SchemaError::Malformed {
            origin: origin.to_string(),
            message: format!("{section} must be an object, found {other}"),
        }),
    }
}

fn check_key_paths(config: &ModuleConfig) -> Result<(), SchemaError> {
    let sections: [(&str, Vec<&KeyPath>); 5] = [
        (
            "Configuration Settings",
            config.configurable_items.iter().map(|i| &i.name).collect(),
        ),
        (
            "Termination Criteria",
            config.termination_criteria.iter().map(|i| &i.name).collect(),
        ),
        (
            "Internal Settings",
            config.internal_settings.iter().map(|i| &i.name).collect(),
        ),
        (
            "Variables Configuration",
            config.variable_items.iter().map(|i| &i.name).collect(),
        ),
        (
            "Conditional Variables",
            config.conditional_variables.iter().map(|i| &i.name).collect(),
        ),
    ];
    for (section, paths) in sections {
        if paths.iter().any(|p| p.is_empty()) {
            return Err(SchemaError::EmptyKeyPath {
                origin: config.origin.clone(),
                section: section.to_string(),
            });
        }
        // Names made only of non-ASCII or punctuation collapse to `_`.
        if let Some(path) = paths.iter().find(|p| p.member_identifier() == "_") {
            return Err(SchemaError::NoIdentifier {
                origin: config.origin.clone(),
                section: section.to_string(),
                path: path.to_string(),
            });
        }
    }
    if config
        .available_operations
        .iter()
        .any(|op| op.name.trim().is_empty())
    {
        return Err(SchemaError::EmptyKeyPath {
            origin: config.origin.clone(),
            section: "Available Operations".to_string(),
        });
    }
    Ok(())
}

fn check_collisions(config: &ModuleConfig) -> Result<(), SchemaError> {
    let mut members: HashMap<String, String> = HashMap::new();
    let all_members = config
        .configurable_items
        .iter()
        .map(|i| &i.name)
        .chain(config.termination_criteria.iter().map(|c| &c.name))
        .chain(config.internal_settings.iter().map(|i| &i.name))
        .chain(config.conditional_variables.iter().map(|v| &v.name));
    for path in all_members {
        let ident = path.member_identifier();
        if members.insert(ident.clone(), path.label()).is_some() {
            return Err(SchemaError::Duplicate {
                origin: config.origin.clone(),
                kind: "member",
                name: ident,
            });
        }
    }

    let mut variables = HashSet::new();
    for item in &config.variable_items {
        let ident = item.name.member_identifier();
        if !variables.insert(ident.clone()) {
            return Err(SchemaError::Duplicate {
                origin: config.origin.clone(),
                kind: "variable",
                name: ident,
            });
        }
    }

    let mut operations = HashSet::new();
    for op in &config.available_operations {
        if !operations.insert(op.name.as_str()) {
            return Err(SchemaError::Duplicate {
                origin: config.origin.clone(),
                kind: "operation",
                name: op.name.clone(),
            });
        }
    }
    Ok(())
}
