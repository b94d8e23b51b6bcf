//! # modgen
//!
//! **modgen** generates the boilerplate of C++ engine modules from
//! declarative `.config` descriptions and partial source templates.
//!
//! ## Overview
//!
//! A module author writes three files per module:
//!
//! - `<name>.config` - the class name, namespace, parent module, settings,
//!   termination criteria, variable fields and operations
//! - `<name>._hpp` / `<name>._cpp` - hand-written C++ with marker comments
//!   where generated code goes
//!
//! modgen expands them into `<name>.hpp` / `<name>.cpp`: member declarations,
//! JSON configuration accessors, default application, termination checks,
//! operation dispatch, property lookup and Doxygen documentation. The
//! `Variables Configuration` items of every module are merged into one
//! aggregate `variable.hpp`.
//!
//! ## Architecture
//!
//! - **[`schema`]** - load and link `.config` descriptions
//! - **[`template`]** - validate marker templates and splice fragments in
//! - **[`generator`]** - the code emitters and the project orchestrator
//! - **[`settings`]** - target-specific names (JSON type, error macro, ...)
//! - **[`error`]** - typed errors per layer
//! - **[`logging`]** - `tracing` subscriber setup
//! - **[`cli`]** - the `modgen` command line
//!
//! ```text
//! discover ─> parse all configs ─> link parents ─┬─> module A ─> A.hpp/A.cpp
//!                                                ├─> module B ─> B.hpp/B.cpp
//!                                                └─> ...
//!                                  (rayon pool)        │
//!                          written modules ─> aggregate variable.hpp
//! ```
//!
//! ## Usage from Code
//!
//! ```rust,no_run
//! use modgen::generator::project::{print_report, run_generation, RunOptions};
//!
//! let options = RunOptions::new("source/modules", "build/modules");
//! let report = run_generation(&options)?;
//! print_report(&report);
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod cli;
pub mod error;
pub mod generator;
pub mod logging;
pub mod schema;
pub mod settings;
pub mod template;
