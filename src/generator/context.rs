use crate::schema::ModuleConfig;
use crate::settings::GeneratorSettings;

/// Everything an emitter may look at when generating code for one module.
///
/// Emitters are pure functions of this context: no filesystem access, no
/// global state.
#[derive(Debug, Clone, Copy)]
pub struct ModuleContext<'a> {
    pub module: &'a ModuleConfig,
    /// Resolved parent module, if the module declares one
    pub parent: Option<&'a ModuleConfig>,
    pub settings: &'a GeneratorSettings,
}

impl<'a> ModuleContext<'a> {
    pub fn new(
        module: &'a ModuleConfig,
        parent: Option<&'a ModuleConfig>,
        settings: &'a GeneratorSettings,
    ) -> Self {
        Self {
            module,
            parent,
            settings,
        }
    }

    pub fn class_name(&self) -> &str {
        &self.module.name
    }

    /// Qualified name of the class this module derives from: the parent
    /// module, else the configured base class.
    pub fn base_class(&self) -> Option<String> {
        match self.parent {
            Some(parent) => Some(parent.qualified_name()),
            None => self.settings.base_class.clone(),
        }
    }

    /// Qualified parent name used to chain generated methods.
    pub fn chained_parent(&self) -> Option<String> {
        self.parent.map(ModuleConfig::qualified_name)
    }

    /// `" override"` when there is a base class to override, else empty.
    pub fn override_suffix(&self) -> &'static str {
        if self.base_class().is_some() {
            " override"
        } else {
            ""
        }
    }

    pub fn json_type(&self) -> &str {
        &self.settings.json_type
    }
}
