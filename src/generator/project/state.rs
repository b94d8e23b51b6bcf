use std::fmt;

use crate::error::ModuleError;

/// Where a module is in the pipeline.
///
/// `Discovered → ConfigParsed → TemplateValidated → Expanded → Written`, or
/// `Failed` from any state that is not already terminal. Check mode stops at
/// `Expanded`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModuleState {
    Discovered,
    ConfigParsed,
    TemplateValidated,
    Expanded,
    Written,
    Failed,
}

impl ModuleState {
    pub fn is_terminal(self) -> bool {
        matches!(self, ModuleState::Written | ModuleState::Failed)
    }

    pub fn can_transition_to(self, next: ModuleState) -> bool {
        use ModuleState::*;
        match (self, next) {
            (Written | Failed, _) => false,
            (_, Failed) => true,
            (Discovered, ConfigParsed)
            | (ConfigParsed, TemplateValidated)
            | (TemplateValidated, Expanded)
            | (Expanded, Written) => true,
            _ => false,
        }
    }
}

impl fmt::Display for ModuleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ModuleState::Discovered => "discovered",
            ModuleState::ConfigParsed => "config-parsed",
            ModuleState::TemplateValidated => "template-validated",
            ModuleState::Expanded => "expanded",
            ModuleState::Written => "written",
            ModuleState::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Result of running the pipeline for one discovered module.
#[derive(Debug)]
pub struct ModuleOutcome {
    /// Path of the `.config` relative to the source root
    pub label: String,
    /// Class name, once the config has been parsed
    pub module: Option<String>,
    pub state: ModuleState,
    pub error: Option<ModuleError>,
    /// Both outputs already had the generated content
    pub unchanged: bool,
}

impl ModuleOutcome {
    pub fn discovered(label: String) -> Self {
        Self {
            label,
            module: None,
            state: ModuleState::Discovered,
            error: None,
            unchanged: false,
        }
    }

    /// Move to `next`. Illegal transitions are ignored in release builds.
    pub fn advance(&mut self, next: ModuleState) {
        debug_assert!(
            self.state.can_transition_to(next),
            "illegal module transition {} -> {}",
            self.state,
            next
        );
        if self.state.can_transition_to(next) {
            self.state = next;
        }
    }

    pub fn fail(&mut self, error: impl Into<ModuleError>) {
        self.advance(ModuleState::Failed);
        self.error = Some(error.into());
    }

    pub fn is_failed(&self) -> bool {
        self.state == ModuleState::Failed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SchemaError;

    #[test]
    fn test_happy_path_transitions() {
        let mut outcome = ModuleOutcome::discovered("a/A.config".into());
        for next in [
            ModuleState::ConfigParsed,
            ModuleState::TemplateValidated,
            ModuleState::Expanded,
            ModuleState::Written,
        ] {
            outcome.advance(next);
            assert_eq!(outcome.state, next);
        }
        assert!(outcome.state.is_terminal());
    }

    #[test]
    fn test_terminal_states_are_final() {
        assert!(!ModuleState::Written.can_transition_to(ModuleState::Failed));
        assert!(!ModuleState::Failed.can_transition_to(ModuleState::Written));
        assert!(!ModuleState::Discovered.can_transition_to(ModuleState::Expanded));
        assert!(ModuleState::Expanded.can_transition_to(ModuleState::Failed));
    }

    #[test]
    fn test_fail_records_error() {
        let mut outcome = ModuleOutcome::discovered("a/A.config".into());
        outcome.fail(SchemaError::MissingField {
            origin: "a/A.config".into(),
            field: "Class Name".into(),
        });
        assert!(outcome.is_failed());
        assert_eq!(outcome.error.as_ref().map(|e| e.category()), Some("schema"));
    }
}
