use std::path::PathBuf;

use super::LookupArgs;
use super::session::{new_registry, report_failure};
use super::unit_loader::load_unit;

pub struct CheckArgs {
    pub file: Option<PathBuf>,
    pub source_text: Option<String>,
    pub lookup: LookupArgs,
}

pub fn run(args: CheckArgs) {
    let unit = match load_unit(args.file.as_deref(), args.source_text.as_deref()) {
        Ok(unit) => unit,
        Err(msg) => {
            eprintln!("error: {}", msg);
            std::process::exit(1);
        }
    };

    let registry = new_registry(&args.lookup);
    let key = registry.add_inline(unit);
    if let Err(failure) = registry.load(&key) {
        report_failure(&failure, args.lookup.color);
        std::process::exit(1);
    }

    // Silent on success (like cargo check)
}
