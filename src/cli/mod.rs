//! # CLI Module
//!
//! Command-line interface of the `modgen` binary.
//!
//! ## Commands
//!
//! ### `generate`
//!
//! Generate every module found under a source tree:
//!
//! ```bash
//! modgen generate --dir source/modules
//! modgen generate --source source/modules --destination build/modules --jobs 8
//! ```
//!
//! ### `check`
//!
//! Run the whole pipeline without writing anything, e.g. in CI:
//!
//! ```bash
//! modgen check --dir source/modules
//! ```
//!
//! Both commands accept `--settings <file>` and `--variable-template <file>`.
//!
//! ## Exit Codes
//!
//! | Code | Meaning |
//! |------|---------|
//! | 0 | every module generated |
//! | 1 | at least one module failed |
//! | 2 | the aggregate variable header failed or the run could not start |

mod commands;

#[cfg(test)]
mod tests;

pub use commands::{run_cli, Cli, Commands, RunInputs};
