#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Core data structures shared by the canonpkg frontend and registry.
//!
//! - [`ImportKey`]: the registry's memoization key (import path or synthetic inline key)
//! - [`SourceFile`] / [`SourceUnit`]: what gets handed to the frontend
//! - [`BasicKind`]: predeclared basic types of the Go subset
//! - [`utils`]: naming rules (exported-ness, identifiers)

mod basic;
mod import_key;
mod source;
pub mod utils;

#[cfg(test)]
mod basic_tests;
#[cfg(test)]
mod utils_tests;

pub use basic::BasicKind;
pub use import_key::{ImportKey, InvalidImportPath};
pub use source::{SourceFile, SourceUnit};
