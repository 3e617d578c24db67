//! CubeViz Import
//!
//! Turns the first Linked Data Cube found in a triple store into a
//! [`cubeviz_model::CubeModel`].
//!
//! ```rust,ignore
//! use cubeviz_import::{ImportConfig, ImportOrchestrator};
//!
//! let cube = ImportOrchestrator::new(client, ImportConfig::default())
//!     .import()
//!     .await?;
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod config;
pub mod error;
pub mod orchestrator;

// Re-exports
pub use config::ImportConfig;
pub use error::ImportError;
pub use orchestrator::ImportOrchestrator;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
