//! Grammar productions for the Go subset.
//!
//! This module implements all `parse_*` methods as an extension of `Parser`.
//! Only declarations are parsed structurally. Function bodies and composite
//! literal contents are kept as balanced raw token blocks.

mod exprs;
mod items;
mod types;
