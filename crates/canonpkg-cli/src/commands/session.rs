use std::env;
use std::path::PathBuf;

use canonpkg_lib::{DirSource, Registry, ResolutionFailure, SearchPath, StdSource};

use super::LookupArgs;

const PATH_ENV: &str = "CANONPKG_PATH";

/// Package roots in search order: `--root` flags, then `CANONPKG_PATH`.
pub fn package_roots(args: &LookupArgs) -> Vec<PathBuf> {
    let mut roots = args.roots.clone();
    if let Some(paths) = env::var_os(PATH_ENV) {
        roots.extend(env::split_paths(&paths).filter(|p| !p.as_os_str().is_empty()));
    }
    roots
}

/// Search path for one invocation. Embedded std packages come last.
pub fn search_path(args: &LookupArgs) -> SearchPath {
    let mut search = SearchPath::new();
    for root in package_roots(args) {
        tracing::debug!(root = %root.display(), "package root");
        search = search.with(DirSource::new(root));
    }
    if !args.no_std {
        search = search.with(StdSource);
    }
    search
}

pub fn new_registry(args: &LookupArgs) -> Registry {
    Registry::new(search_path(args))
}

/// Print a failure with its stage and, when present, its source snippets.
pub fn report_failure(failure: &ResolutionFailure, color: bool) {
    eprintln!("error: {} ({} failed)", failure, failure.stage());
    if let Some(report) = failure.report() {
        eprint!("{}", report.render(color));
    }
}
