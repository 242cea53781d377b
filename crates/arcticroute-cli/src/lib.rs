//! arcticroute CLI library.
//!
//! Report types and renderers shared by the `arcticroute-cli` binary. Routing
//! itself lives in `arcticroute-lib`; this crate only formats its results.

pub mod output;
pub mod terminal;
