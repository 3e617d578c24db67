//! CubeViz command line
//!
//! Library half of the `cubeviz` binary: configuration, data sources and
//! the subcommands, kept here so they can be tested without a process.

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod commands;
pub mod config;
pub mod source;

// Re-exports
pub use config::CubevizConfig;
pub use source::Source;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
