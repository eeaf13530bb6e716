pub mod check;
pub mod describe;
pub mod identical;
pub mod session;
pub mod unit_loader;

#[cfg(test)]
mod describe_tests;
#[cfg(test)]
mod identical_tests;

use std::path::PathBuf;

/// Where packages are looked up, and how failures are shown.
#[derive(Clone, Debug, Default)]
pub struct LookupArgs {
    pub roots: Vec<PathBuf>,
    pub no_std: bool,
    pub color: bool,
}
