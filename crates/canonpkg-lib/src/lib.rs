//! canonpkg: canonical package loading and type identity for a Go subset.
//!
//! A [`Registry`] resolves import keys into [`TypedPackage`]s and hands out
//! one instance per key for its whole lifetime. Type handles taken from
//! those packages can then be compared by identity with [`identical`].
//!
//! # Example
//!
//! ```
//! use canonpkg_lib::{Registry, SourceFile, StdSource, identical};
//!
//! let registry = Registry::new(StdSource);
//! let key = registry.add_inline(SourceFile::new(
//!     "demo.go",
//!     "package demo\n\nimport \"sync\"\n\nvar m sync.Mutex\n",
//! ));
//!
//! let demo = registry.load(&key).expect("demo checks");
//! let sync = registry.load_path("sync").expect("sync is embedded");
//!
//! let var_type = demo.type_of("m").unwrap();
//! let mutex = sync.lookup_type("Mutex").unwrap();
//! assert!(identical(&var_type, &mutex));
//! ```

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod check;
pub mod diagnostics;
pub mod discovery;
pub mod error;
pub mod frontend;
pub mod parser;
pub mod registry;
pub mod source_map;
pub mod types;


pub use canonpkg_core::{ImportKey, SourceFile, SourceUnit};
pub use diagnostics::{Diagnostics, DiagnosticsPrinter, Severity};
pub use discovery::{DirSource, DiscoveryError, MemorySource, PackageSource, SearchPath, StdSource};
pub use error::{DiagnosticReport, ResolutionFailure, Stage};
pub use frontend::{Frontend, Importer};
pub use registry::{Registry, RegistryBuilder, RegistryStats};
pub use source_map::SourceMap;
pub use types::{TypeHandle, TypedPackage, identical};

/// Result type for registry loads.
pub type Result<T> = std::result::Result<T, ResolutionFailure>;
