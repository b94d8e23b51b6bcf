//! Project-level orchestration: walk a source tree, generate every module
//! found in it, and build the aggregate variable header.
//!
//! A module directory holds `<name>.config`, `<name>._hpp` and
//! `<name>._cpp`; outputs land at the mirrored location under the
//! destination. See [`run_generation`] for the phases of a run.

mod discover;
mod report;
mod run;
mod state;
mod write;

pub use discover::{discover_modules, output_path_for, ModuleSources, CONFIG_EXTENSION};
pub use report::{format_report, print_report};
pub use run::{run_generation, AggregateOutcome, RunOptions, RunReport};
pub use state::{ModuleOutcome, ModuleState};
pub use write::{write_file_atomic, write_pair, PairOutcome, WriteOutcome};
