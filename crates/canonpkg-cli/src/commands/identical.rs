use std::path::PathBuf;

use canonpkg_core::utils::is_identifier;
use canonpkg_lib::types::DeclKind;
use canonpkg_lib::{Registry, ResolutionFailure, SourceFile, identical};

use super::LookupArgs;
use super::session::{new_registry, report_failure};
use super::unit_loader::load_unit;

pub struct IdenticalArgs {
    pub file: Option<PathBuf>,
    pub source_text: Option<String>,
    pub var: String,
    pub type_ref: String,
    pub isolated: bool,
    pub lookup: LookupArgs,
}

/// Why no verdict could be reached.
#[derive(Debug)]
pub enum CompareError {
    Usage(String),
    Failed(ResolutionFailure),
}

impl From<ResolutionFailure> for CompareError {
    fn from(failure: ResolutionFailure) -> Self {
        Self::Failed(failure)
    }
}

pub fn run(args: IdenticalArgs) {
    let unit = match load_unit(args.file.as_deref(), args.source_text.as_deref()) {
        Ok(unit) => unit,
        Err(msg) => {
            eprintln!("error: {}", msg);
            std::process::exit(1);
        }
    };

    let registry = new_registry(&args.lookup);
    let isolated = args.isolated.then(|| new_registry(&args.lookup));
    let verdict = compare(
        &registry,
        isolated.as_ref(),
        unit,
        &args.var,
        &args.type_ref,
    );

    match verdict {
        Ok(true) => println!("identical"),
        Ok(false) => {
            println!("not identical");
            std::process::exit(1);
        }
        Err(CompareError::Usage(msg)) => {
            eprintln!("error: {}", msg);
            std::process::exit(1);
        }
        Err(CompareError::Failed(failure)) => {
            report_failure(&failure, args.lookup.color);
            std::process::exit(1);
        }
    }
}

/// Compare the declared type of `var` in `unit` with the type `type_ref`.
///
/// The unit is loaded through `registry`. The target package comes from
/// `isolated` when given, which reproduces two uncoordinated loads.
pub fn compare(
    registry: &Registry,
    isolated: Option<&Registry>,
    unit: SourceFile,
    var: &str,
    type_ref: &str,
) -> Result<bool, CompareError> {
    let (path, name) = split_type_ref(type_ref).map_err(CompareError::Usage)?;

    let key = registry.add_inline(unit);
    let package = registry.load(&key)?;
    let decl = package
        .decl(var)
        .ok_or_else(|| CompareError::Usage(format!("undefined: {}", var)))?;
    if decl.kind != DeclKind::Var {
        return Err(CompareError::Usage(format!(
            "`{}` is a {}, not a variable",
            var, decl.kind
        )));
    }

    let target = isolated.unwrap_or(registry).load_path(path)?;
    let ty = target.lookup_type(name).ok_or_else(|| {
        CompareError::Usage(format!("package `{}` has no type `{}`", path, name))
    })?;

    let verdict = identical(&decl.ty, &ty);
    tracing::info!(var, %ty, isolated = isolated.is_some(), verdict, "compared");
    Ok(verdict)
}

/// `sync.Mutex` → (`sync`, `Mutex`); the name follows the last `.`.
pub fn split_type_ref(type_ref: &str) -> Result<(&str, &str), String> {
    let Some((path, name)) = type_ref.rsplit_once('.') else {
        return Err(format!("expected PATH.NAME, got `{}`", type_ref));
    };
    if path.is_empty() || !is_identifier(name) {
        return Err(format!("expected PATH.NAME, got `{}`", type_ref));
    }
    Ok((path, name))
}
