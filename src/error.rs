//! # Error Taxonomy
//!
//! Every layer of the generator has its own error type so that the
//! orchestrator can tell *why* a module failed without string matching:
//!
//! - [`SchemaError`] - the `.config` file is missing a field, malformed, or
//!   references a parent module that does not exist
//! - [`TemplateError`] - a `._hpp`/`._cpp` template is missing a marker,
//!   repeats one, or contains an unknown one
//! - [`EmissionError`] - an emitter met a type or default it cannot render
//! - [`WriteError`] - the filesystem refused the generated output
//!
//! All four are non-fatal to the batch and fatal to the one module; they are
//! wrapped in [`ModuleError`] for reporting. [`AggregateError`] belongs to
//! the variable-header pass, which has no per-module isolation and aborts the
//! run.

use std::path::PathBuf;
use thiserror::Error;

use crate::template::{Marker, TemplateKind};

/// Failure while loading or resolving a `.config` module description.
#[derive(Error, Debug)]
pub enum SchemaError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{origin}: missing required field '{field}'")]
    MissingField { origin: String, field: String },

    #[error("{origin}: malformed module description: {message}")]
    Malformed { origin: String, message: String },

    #[error("{origin}: empty key path in {section}")]
    EmptyKeyPath { origin: String, section: String },

    #[error("{origin}: key path {path} in {section} yields no C++ identifier")]
    NoIdentifier {
        origin: String,
        section: String,
        path: String,
    },

    #[error("{origin}: {kind} '{name}' is declared more than once")]
    Duplicate {
        origin: String,
        kind: &'static str,
        name: String,
    },

    #[error("module '{module}' is also declared by {other}")]
    DuplicateModule { module: String, other: String },

    #[error("module '{module}' extends unknown parent module '{parent}'")]
    UnresolvedParent { module: String, parent: String },

    #[error("module '{module}' has a cyclic parent chain: {chain}")]
    ParentCycle { module: String, chain: String },

    #[error("module '{module}' cannot be generated: parent module '{parent}' failed generation")]
    ParentFailed { module: String, parent: String },
}

/// Failure while validating or expanding a partial source template.
#[derive(Error, Debug)]
pub enum TemplateError {
    #[error("cannot read template {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{kind} template is missing required marker {marker}")]
    MissingMarker { kind: TemplateKind, marker: Marker },

    #[error("{kind} template contains marker {marker} {count} times (expected once)")]
    DuplicateMarker {
        kind: TemplateKind,
        marker: Marker,
        count: usize,
    },

    #[error("{kind} template contains unknown marker '{token}' on line {line}")]
    UnknownMarker {
        kind: TemplateKind,
        token: String,
        line: usize,
    },

    #[error("marker {0} was targeted for replacement more than once")]
    ReplacedTwice(Marker),

    #[error("required marker {0} was left unreplaced")]
    Unreplaced(Marker),
}

/// Failure inside one of the code emitters.
#[derive(Error, Debug)]
pub enum EmissionError {
    #[error("'{item}' declares type '{declared}' which has no code-generation mapping")]
    UnknownType { item: String, declared: String },

    #[error("'{item}' has default {value} which does not fit type '{declared}'")]
    DefaultTypeMismatch {
        item: String,
        declared: String,
        value: String,
    },

    #[error("conditional variables must share one type, found '{first}' and '{second}'")]
    MixedPropertyTypes { first: String, second: String },

    #[error("template rendering failed: {0}")]
    Render(#[from] askama::Error),
}

/// Failure while writing generated files to disk.
#[derive(Error, Debug)]
pub enum WriteError {
    #[error("cannot create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot move generated file into place at {path}: {source}")]
    Persist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Any error that fails a single module.
#[derive(Error, Debug)]
pub enum ModuleError {
    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Template(#[from] TemplateError),

    #[error(transparent)]
    Emission(#[from] EmissionError),

    #[error(transparent)]
    Write(#[from] WriteError),
}

impl ModuleError {
    /// Short category label used in the run report.
    pub fn category(&self) -> &'static str {
        match self {
            ModuleError::Schema(_) => "schema",
            ModuleError::Template(_) => "template",
            ModuleError::Emission(_) => "emission",
            ModuleError::Write(_) => "write",
        }
    }
}

/// Failure of the aggregate variable-header pass.
#[derive(Error, Debug)]
pub enum AggregateError {
    #[error("variable template {path} does not exist")]
    MissingTemplate { path: PathBuf },

    #[error("variable template {path}: {source}")]
    Template {
        path: PathBuf,
        #[source]
        source: TemplateError,
    },

    #[error("variable '{name}' is declared as '{first}' by {first_module} and as '{second}' by {second_module}")]
    ConflictingVariable {
        name: String,
        first: String,
        first_module: String,
        second: String,
        second_module: String,
    },

    #[error(transparent)]
    Emission(#[from] EmissionError),

    #[error(transparent)]
    Write(#[from] WriteError),
}
