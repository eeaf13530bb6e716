//! Dispatch logic: extract params from ArgMatches and convert to command args.

use std::path::PathBuf;

use clap::ArgMatches;

use super::ColorChoice;
use crate::commands::LookupArgs;
use crate::commands::check::CheckArgs;
use crate::commands::describe::DescribeArgs;
use crate::commands::identical::IdenticalArgs;

/// `--root`, `--no-std` and `--color`, as parsed.
pub struct LookupParams {
    pub roots: Vec<PathBuf>,
    pub no_std: bool,
    pub color: ColorChoice,
}

impl LookupParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            roots: m
                .get_many::<PathBuf>("root")
                .map(|roots| roots.cloned().collect())
                .unwrap_or_default(),
            no_std: m.get_flag("no_std"),
            color: parse_color(m),
        }
    }
}

impl From<LookupParams> for LookupArgs {
    fn from(p: LookupParams) -> Self {
        Self {
            roots: p.roots,
            no_std: p.no_std,
            color: p.color.should_colorize(),
        }
    }
}

pub struct CheckParams {
    pub file: Option<PathBuf>,
    pub source_text: Option<String>,
    pub lookup: LookupParams,
}

impl CheckParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            file: m.get_one::<PathBuf>("file").cloned(),
            source_text: m.get_one::<String>("source_text").cloned(),
            lookup: LookupParams::from_matches(m),
        }
    }
}

impl From<CheckParams> for CheckArgs {
    fn from(p: CheckParams) -> Self {
        Self {
            file: p.file,
            source_text: p.source_text,
            lookup: p.lookup.into(),
        }
    }
}

pub struct IdenticalParams {
    pub file: Option<PathBuf>,
    pub source_text: Option<String>,
    pub var: String,
    pub type_ref: String,
    pub isolated: bool,
    pub lookup: LookupParams,
}

impl IdenticalParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            file: m.get_one::<PathBuf>("file").cloned(),
            source_text: m.get_one::<String>("source_text").cloned(),
            var: m.get_one::<String>("var").cloned().unwrap_or_default(),
            type_ref: m.get_one::<String>("type").cloned().unwrap_or_default(),
            isolated: m.get_flag("isolated"),
            lookup: LookupParams::from_matches(m),
        }
    }
}

impl From<IdenticalParams> for IdenticalArgs {
    fn from(p: IdenticalParams) -> Self {
        Self {
            file: p.file,
            source_text: p.source_text,
            var: p.var,
            type_ref: p.type_ref,
            isolated: p.isolated,
            lookup: p.lookup.into(),
        }
    }
}

pub struct DescribeParams {
    pub import_path: String,
    pub json: bool,
    pub lookup: LookupParams,
}

impl DescribeParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            import_path: m
                .get_one::<String>("import_path")
                .cloned()
                .unwrap_or_default(),
            json: m.get_flag("json"),
            lookup: LookupParams::from_matches(m),
        }
    }
}

impl From<DescribeParams> for DescribeArgs {
    fn from(p: DescribeParams) -> Self {
        Self {
            import_path: p.import_path,
            json: p.json,
            lookup: p.lookup.into(),
        }
    }
}

fn parse_color(m: &ArgMatches) -> ColorChoice {
    match m.get_one::<String>("color").map(|s| s.as_str()) {
        Some("always") => ColorChoice::Always,
        Some("never") => ColorChoice::Never,
        _ => ColorChoice::Auto,
    }
}
