//! # Template Module
//!
//! Partial C++ templates (`._hpp`, `._cpp`, `variable._hpp`) are ordinary
//! source files with a handful of insertion markers. This module checks that
//! a template carries exactly the markers its [`TemplateKind`] requires and
//! then substitutes generated fragments for them.
//!
//! ## Markers
//!
//! | Marker | Token | Header | Source | Variable header |
//! |---|---|---|---|---|
//! | [`Marker::StartNamespace`] | `__startNamespace__` | required | optional | |
//! | [`Marker::ClassDeclaration`] | `__classDeclaration__` | required | | |
//! | [`Marker::PublicSection`] | `public:` line | required | | |
//! | [`Marker::EndNamespace`] | `__endNamespace__` | required | required | |
//! | [`Marker::VariableDeclarations`] | `__variableDeclarationList__` | | | required |
//! | [`Marker::VariableConfiguration`] | `__variableConfiguration__` | | | optional |
//!
//! A token marker may be written with a trailing `;` so that the template
//! stays friendly to C++ formatters; the `;` is replaced along with it.
//!
//! ## Example
//!
//! ```cpp
//! #pragma once
//! #include "modules/solver/optimizer/optimizer.hpp"
//!
//! __startNamespace__;
//!
//! __classDeclaration__
//! {
//!   public:
//!   void runGeneration() override;
//! };
//!
//! __endNamespace__;
//! ```

mod expand;
mod marker;
mod validate;


pub use expand::expand;
pub use marker::{Marker, TemplateKind};
pub use validate::{load_template, validate, MarkerSpan, ValidatedTemplate};
