//! # Generator Module
//!
//! The generator turns a parsed [`ModuleConfig`](crate::schema::ModuleConfig)
//! and its pair of validated templates into a complete C++ header and source.
//!
//! ## Overview
//!
//! Each emitter is a pure function of a [`ModuleContext`] (the module, its
//! resolved parent, and the [`GeneratorSettings`](crate::settings::GeneratorSettings))
//! and produces one fragment of C++:
//!
//! - **Declarations** - one documented member per configuration setting,
//!   termination criterion, internal setting and conditional variable, plus
//!   the prototypes of the generated methods
//! - **Accessors** - `setConfiguration(json&)` / `getConfiguration(json&)`
//! - **Defaults** - `applyModuleDefaults(json&)` / `applyVariableDefaults(json&)`
//! - **Termination** - `checkTermination()` (only when criteria exist)
//! - **Operations** - `runOperation(name, sample)` (only when operations exist)
//! - **Properties** - `getPropertyPointer(name)` (only with conditional variables)
//! - **Doxygen** - class and member documentation blocks
//!
//! Fragments are rendered with Askama templates from the `templates/`
//! directory and spliced into the user's templates by
//! [`template::expand`](crate::template::expand):
//!
//! ```text
//! .config ─┐
//!          ├─> ModuleContext ─> emitters ─> fragments ─┐
//! ._hpp ───┤                                           ├─> expand ─> .hpp
//! ._cpp ───┘                                           └─> expand ─> .cpp
//! ```
//!
//! ## Generated Source
//!
//! For a module `Foo` with one setting `Bar: int = 5` the source receives:
//!
//! ```cpp
//! void Foo::setConfiguration(knlohmann::json& js)
//! {
//!  if (isDefined(js, "Bar"))
//!  {
//!   try
//!   {
//!    _bar = js["Bar"].get<int>();
//!   }
//!   catch (const std::exception& e)
//!   {
//!    KORALI_LOG_ERROR(" + Object: [ Foo ] \n + Key:    ['Bar']\n%s", e.what());
//!   }
//!  }
//!  else _bar = 5;
//! }
//! ```
//!
//! ## Type Mapping
//!
//! Declared types map onto the closed [`CppType`] set. Anything else fails
//! the module with [`EmissionError::UnknownType`](crate::error::EmissionError::UnknownType).
//!
//! ## Project Orchestration
//!
//! [`project`] discovers module directories, runs the pipeline on a rayon
//! pool, writes header/source pairs atomically and builds the aggregate
//! `variable.hpp`.

mod accessors;
mod context;
mod declarations;
mod defaults;
mod doxygen;
mod module;
mod operations;
pub mod project;
mod properties;
mod termination;
mod types;
mod variables;

pub use accessors::{
    get_configuration, set_configuration, setting_bindings, Fallback, Resolved, SettingBinding,
};
pub use context::ModuleContext;
pub use declarations::{
    class_declaration, member_declarations, method_prototypes, public_section, Declaration,
};
pub use defaults::{
    apply_module_defaults, apply_variable_defaults, module_default_plan, variable_default_plan,
    DefaultPlan,
};
pub use doxygen::{class_doc, doc_block, escape as escape_doxygen};
pub use module::{
    generate_module, method_definitions, namespace_close, namespace_open, GeneratedCode,
};
pub use operations::run_operation;
pub use properties::{property_pointer, property_type};
pub use termination::check_termination;
pub use types::{cpp_string_literal, json_value_expr, CppType};
pub use variables::{VariableAggregate, VariableField};
