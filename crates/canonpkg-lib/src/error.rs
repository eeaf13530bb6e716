use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use canonpkg_core::ImportKey;

use crate::diagnostics::Diagnostics;
use crate::discovery::DiscoveryError;
use crate::source_map::SourceMap;

/// Diagnostics together with the files they point into.
#[derive(Debug, Clone)]
pub struct DiagnosticReport {
    pub sources: SourceMap,
    pub diagnostics: Diagnostics,
}

impl DiagnosticReport {
    pub fn new(sources: SourceMap, diagnostics: Diagnostics) -> Self {
        Self {
            sources,
            diagnostics,
        }
    }

    pub fn render(&self, colored: bool) -> String {
        self.diagnostics.render_colored(&self.sources, colored)
    }

    pub fn error_count(&self) -> usize {
        self.diagnostics.error_count()
    }
}

/// Stage a failed resolution stopped at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Discovery,
    Parse,
    TypeCheck,
    Load,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Discovery => "discovery",
            Self::Parse => "parse",
            Self::TypeCheck => "type check",
            Self::Load => "load",
        })
    }
}

/// Why a source unit produced no typed package.
///
/// Failures are never cached: the next load of the same key runs the
/// frontend again.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ResolutionFailure {
    #[error("{key}: parsing failed with {} errors", .report.error_count())]
    Parse {
        key: ImportKey,
        report: Arc<DiagnosticReport>,
    },

    #[error("{key}: type checking failed with {} errors", .report.error_count())]
    TypeCheck {
        key: ImportKey,
        report: Arc<DiagnosticReport>,
    },

    #[error("{reason}")]
    PackageNotFound { path: String, reason: DiscoveryError },

    #[error("import cycle not allowed: {}", format_chain(.chain))]
    ImportCycle { chain: Vec<ImportKey> },

    #[error("{key}: gave up waiting for another load after {waited:?}")]
    Timeout { key: ImportKey, waited: Duration },

    #[error("{key}: internal consistency violation: {detail}")]
    InternalConsistency { key: ImportKey, detail: String },
}

impl ResolutionFailure {
    /// Key of the unit that failed, when the failure belongs to one.
    pub fn key(&self) -> Option<&ImportKey> {
        match self {
            Self::Parse { key, .. }
            | Self::TypeCheck { key, .. }
            | Self::Timeout { key, .. }
            | Self::InternalConsistency { key, .. } => Some(key),
            Self::ImportCycle { chain } => chain.first(),
            Self::PackageNotFound { .. } => None,
        }
    }

    /// Source diagnostics, for parse and type errors.
    pub fn report(&self) -> Option<&DiagnosticReport> {
        match self {
            Self::Parse { report, .. } | Self::TypeCheck { report, .. } => Some(report),
            _ => None,
        }
    }

    pub fn stage(&self) -> Stage {
        match self {
            Self::PackageNotFound { .. } => Stage::Discovery,
            Self::Parse { .. } => Stage::Parse,
            Self::TypeCheck { .. } | Self::ImportCycle { .. } => Stage::TypeCheck,
            Self::Timeout { .. } | Self::InternalConsistency { .. } => Stage::Load,
        }
    }
}

fn format_chain(chain: &[ImportKey]) -> String {
    chain
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" -> ")
}
