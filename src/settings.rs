//! Generator settings
//!
//! The C++ names the emitters splice into generated code (JSON type, error
//! macro, sample type, module factory ...) are not hard-coded. They are read
//! from a TOML file that sits at the root of the source tree (`modgen.toml`)
//! or is passed explicitly with `--settings`.
//!
//! ```toml
//! json_type = "knlohmann::json"
//! error_macro = "KORALI_LOG_ERROR"
//! base_class = "korali::Module"
//! jobs = 8
//! ```
//!
//! Every key is optional; a missing file means the defaults below.

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};
use tracing::debug;

/// File name looked up at the source root when `--settings` is not given.
pub const SETTINGS_FILE_NAME: &str = "modgen.toml";

/// C++ vocabulary and run options for the generator.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct GeneratorSettings {
    /// Type used for every `json&` parameter and JSON-typed member
    pub json_type: String,
    /// Macro invoked as `MACRO("fmt", args...)` for runtime configuration errors
    pub error_macro: String,
    /// Type of the sample argument passed to `runOperation`
    pub sample_type: String,
    /// Factory called to build module-pointer members from their JSON
    pub module_factory: String,
    /// Engine handle passed to the module factory
    pub engine_handle: String,
    /// Root base class; generated overrides carry `override` when set
    pub base_class: Option<String>,
    /// Member collecting human-readable termination reasons
    pub termination_log: String,
    /// Variable template, relative to the source root
    pub variable_template: PathBuf,
    /// Worker threads for module generation (rayon default when unset)
    pub jobs: Option<usize>,
}

impl Default for GeneratorSettings {
    fn default() -> Self {
        Self {
            json_type: "knlohmann::json".to_string(),
            error_macro: "KORALI_LOG_ERROR".to_string(),
            sample_type: "korali::Sample".to_string(),
            module_factory: "korali::Module::getModule".to_string(),
            engine_handle: "_k".to_string(),
            base_class: Some("korali::Module".to_string()),
            termination_log: "_terminationCriteria".to_string(),
            variable_template: PathBuf::from("variable/variable._hpp"),
            jobs: None,
        }
    }
}

impl GeneratorSettings {
    /// Apply environment overrides (`MODGEN_JOBS`).
    ///
    /// Unparseable or zero values are ignored.
    pub fn with_env_overrides(mut self) -> Self {
        if let Some(jobs) = env::var("MODGEN_JOBS")
            .ok()
            .and_then(|s| s.trim().parse::<usize>().ok())
            .filter(|&n| n > 0)
        {
            self.jobs = Some(jobs);
        }
        self
    }

    /// True when `declared` names the configured JSON type (or plain `json`).
    pub fn is_json_type(&self, declared: &str) -> bool {
        declared == self.json_type || declared == "json"
    }
}

/// Load settings from a TOML file.
///
/// Returns `Ok(None)` when the file does not exist, and an error when it
/// exists but cannot be read or parsed.
pub fn load_settings(path: &Path) -> anyhow::Result<Option<GeneratorSettings>> {
    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read generator settings: {}", path.display()))?;
    let settings: GeneratorSettings = toml::from_str(&contents)
        .with_context(|| format!("Failed to parse generator settings: {}", path.display()))?;
    Ok(Some(settings))
}

/// Resolve the settings for a run.
///
/// An explicit path must exist. Otherwise `<source_root>/modgen.toml` is used
/// when present, and the defaults when it is not. Environment overrides are
/// applied last.
pub fn discover_settings(
    source_root: &Path,
    explicit: Option<&Path>,
) -> anyhow::Result<GeneratorSettings> {
    let settings = match explicit {
        Some(path) => load_settings(path)?
            .with_context(|| format!("Settings file not found: {}", path.display()))?,
        None => {
            let candidate = source_root.join(SETTINGS_FILE_NAME);
            match load_settings(&candidate)? {
                Some(settings) => {
                    debug!(path = %candidate.display(), "loaded generator settings");
                    settings
                }
                None => GeneratorSettings::default(),
            }
        }
    };
    Ok(settings.with_env_overrides())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_is_none() {
        let dir = TempDir::new().unwrap();
        let loaded = load_settings(&dir.path().join("modgen.toml")).unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("modgen.toml");
        fs::write(&path, "error_macro = \"MY_ERROR\"\njobs = 3\n").unwrap();

        let settings = load_settings(&path).unwrap().unwrap();
        assert_eq!(settings.error_macro, "MY_ERROR");
        assert_eq!(settings.jobs, Some(3));
        assert_eq!(settings.json_type, "knlohmann::json");
        assert_eq!(settings.base_class.as_deref(), Some("korali::Module"));
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("modgen.toml");
        fs::write(&path, "error_marco = \"MY_ERROR\"\n").unwrap();
        assert!(load_settings(&path).is_err());
    }

    #[test]
    fn test_discover_prefers_source_root_file() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join(SETTINGS_FILE_NAME),
            "sample_type = \"my::Sample\"\n",
        )
        .unwrap();
        let settings = discover_settings(dir.path(), None).unwrap();
        assert_eq!(settings.sample_type, "my::Sample");
    }

    #[test]
    fn test_discover_explicit_missing_is_error() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope.toml");
        assert!(discover_settings(dir.path(), Some(&missing)).is_err());
    }

    #[test]
    fn test_json_type_aliases() {
        let settings = GeneratorSettings::default();
        assert!(settings.is_json_type("knlohmann::json"));
        assert!(settings.is_json_type("json"));
        assert!(!settings.is_json_type("nlohmann::json"));
    }
}
