use serde::Deserialize;
use serde_json::{Map, Value};
use std::fmt;

/// Location of a setting inside the generic JSON configuration object.
///
/// `.config` files name settings either with a plain string (`"Bar"`) or with
/// a path (`["Termination Criteria", "Max Generations"]`); both forms
/// deserialize into a `KeyPath`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(from = "KeyPathRepr")]
pub struct KeyPath(Vec<String>);

#[derive(Deserialize)]
#[serde(untagged)]
enum KeyPathRepr {
    Single(String),
    Path(Vec<String>),
}

impl From<KeyPathRepr> for KeyPath {
    fn from(repr: KeyPathRepr) -> Self {
        match repr {
            KeyPathRepr::Single(s) => KeyPath(vec![s]),
            KeyPathRepr::Path(p) => KeyPath(p),
        }
    }
}

impl KeyPath {
    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        KeyPath(segments.into_iter().map(Into::into).collect())
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// True when the path has no segments or only blank ones.
    pub fn is_empty(&self) -> bool {
        self.0.iter().all(|s| s.trim().is_empty())
    }

    /// Returns a new path with `prefix` prepended.
    pub fn prefixed(&self, prefix: &str) -> KeyPath {
        let mut segments = Vec::with_capacity(self.0.len() + 1);
        segments.push(prefix.to_string());
        segments.extend(self.0.iter().cloned());
        KeyPath(segments)
    }

    /// Human label: the segments joined by a space (`Max Generations`).
    pub fn label(&self) -> String {
        self.0.join(" ")
    }

    /// C++ member identifier derived from the path (`_maxGenerations`).
    pub fn member_identifier(&self) -> String {
        format!("_{}", lower_camel(self.0.iter().map(String::as_str)))
    }
}

impl fmt::Display for KeyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for segment in &self.0 {
            write!(f, "['{segment}']")?;
        }
        Ok(())
    }
}

/// Join the words of `parts` in lowerCamelCase.
///
/// Words are split on any non-alphanumeric character. Only the first letter
/// of each word is touched, so acronyms keep their inner casing.
pub fn lower_camel<'a, I>(parts: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let mut out = String::new();
    for word in parts
        .into_iter()
        .flat_map(|p| p.split(|c: char| !c.is_ascii_alphanumeric()))
        .filter(|w| !w.is_empty())
    {
        let mut chars = word.chars();
        if let Some(first) = chars.next() {
            if out.is_empty() {
                out.extend(first.to_lowercase());
            } else {
                out.extend(first.to_uppercase());
            }
            out.push_str(chars.as_str());
        }
    }
    out
}

/// A configurable item: one member variable read from and written to the
/// module's JSON configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigItem {
    pub name: KeyPath,
    pub declared_type: String,
    pub description: String,
    pub default: Option<Value>,
}

/// A termination criterion: a configurable threshold plus the C++ condition
/// that decides whether the module has finished.
#[derive(Debug, Clone, PartialEq)]
pub struct TerminationCriterion {
    pub name: KeyPath,
    pub declared_type: String,
    pub criteria: String,
    pub description: String,
    pub default: Option<Value>,
}

impl TerminationCriterion {
    /// Termination criteria live under the `Termination Criteria` key.
    pub fn key_path(&self) -> KeyPath {
        self.name.prefixed("Termination Criteria")
    }
}

/// A runtime operation the module can dispatch by name.
#[derive(Debug, Clone, PartialEq)]
pub struct Operation {
    pub name: String,
    pub function: Option<String>,
    pub description: String,
}

impl Operation {
    /// Name of the C++ member function that handles this operation.
    pub fn handler(&self) -> String {
        self.function
            .clone()
            .unwrap_or_else(|| lower_camel([self.name.as_str()]))
    }
}

/// A property exposed through pointer lookup when its condition holds.
#[derive(Debug, Clone, PartialEq)]
pub struct ConditionalVariable {
    pub name: KeyPath,
    pub condition: String,
    pub declared_type: String,
    pub description: String,
}

impl ConditionalVariable {
    /// True when the condition is empty or the literal `true`.
    pub fn is_unconditional(&self) -> bool {
        let c = self.condition.trim();
        c.is_empty() || c == "true"
    }
}

/// Parsed, immutable description of one module.
#[derive(Debug, Clone, PartialEq)]
pub struct ModuleConfig {
    /// Where the description came from (file path or test label).
    pub origin: String,
    pub name: String,
    pub namespace: Vec<String>,
    pub parent: Option<String>,
    pub description: Option<String>,
    pub configurable_items: Vec<ConfigItem>,
    pub termination_criteria: Vec<TerminationCriterion>,
    pub internal_settings: Vec<ConfigItem>,
    pub variable_items: Vec<ConfigItem>,
    pub conditional_variables: Vec<ConditionalVariable>,
    pub available_operations: Vec<Operation>,
    pub module_defaults: Map<String, Value>,
    pub variable_defaults: Map<String, Value>,
}

impl ModuleConfig {
    /// Fully qualified C++ class name, e.g. `korali::solver::optimizer::CMAES`.
    pub fn qualified_name(&self) -> String {
        self.namespace
            .iter()
            .map(String::as_str)
            .chain(std::iter::once(self.name.as_str()))
            .collect::<Vec<_>>()
            .join("::")
    }
}
