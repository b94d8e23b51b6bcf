//! # Schema Module
//!
//! Loads declarative `.config` module descriptions into typed
//! [`ModuleConfig`] values and resolves the single-inheritance chain between
//! modules.
//!
//! ## Format
//!
//! A module description is a JSON document (YAML is accepted for `.yaml` /
//! `.yml` files):
//!
//! ```json
//! {
//!   "Module Data": {
//!     "Class Name": "CMAES",
//!     "Namespace": ["korali", "solver", "optimizer"],
//!     "Parent Module": "Optimizer"
//!   },
//!   "Configuration Settings": [
//!     { "Name": ["Population Size"], "Type": "size_t",
//!       "Description": "Number of samples per generation.", "Default": 32 }
//!   ],
//!   "Termination Criteria": [
//!     { "Name": ["Max Generations"], "Type": "size_t",
//!       "Criteria": "_k->_currentGeneration > _maxGenerations",
//!       "Description": "Maximum number of generations.", "Default": 1000 }
//!   ],
//!   "Available Operations": [
//!     { "Name": "Evaluate", "Function": "evaluate", "Description": "Evaluates a sample." }
//!   ]
//! }
//! ```
//!
//! ## Two-phase loading
//!
//! Each file is parsed on its own with [`load_module_config`]. Parent
//! references are only checked once every file has been parsed, through
//! [`ModuleIndex::build`], so that a child discovered before its parent is
//! never reported as broken.

mod load;
mod resolve;
mod types;

#[cfg(test)]
mod tests;

pub use load::{load_module_config, load_module_config_as, parse_module_config, ConfigFormat};
pub use resolve::ModuleIndex;
pub use types::{
    lower_camel, ConditionalVariable, ConfigItem, KeyPath, ModuleConfig, Operation,
    TerminationCriterion,
};
