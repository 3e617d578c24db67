//! CubeViz Store
//!
//! Access to triple stores holding Linked Data Cubes.
//!
//! # Layers
//!
//! - [`query`]: SPARQL text for each discovery step
//! - [`TripleStore`]: backend seam, with [`MemoryStore`] (in-process) and
//!   [`HttpStore`] (remote SPARQL endpoint)
//! - [`parse_graph`]: N-Triples responses to [`cubeviz_model::Node`]s
//! - [`StoreClient`]: the three combined, used by the import pipeline
//!
//! # Example
//!
//! ```rust,ignore
//! use cubeviz_store::{MemoryStore, RdfFormat, StoreClient};
//! use std::sync::Arc;
//!
//! let store = MemoryStore::with_data(RdfFormat::Turtle, turtle.as_bytes())?;
//! let client = StoreClient::connected(Arc::new(store));
//! let datasets = client.datasets().await?;
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod backend;
pub mod client;
pub mod error;
pub mod parse;
pub mod query;

// Re-exports
pub use backend::{Binding, HttpStore, MemoryStore, TripleStore};
pub use client::StoreClient;
pub use error::{StoreError, StoreResult};
pub use oxigraph::io::RdfFormat;
pub use parse::{convert_term, parse_graph};
pub use query::ComponentKind;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
