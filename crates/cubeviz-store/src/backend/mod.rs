//! Triple store backends
//!
//! A backend answers CONSTRUCT queries with N-Triples text and SELECT
//! queries with variable bindings. Everything above this seam is backend
//! agnostic.

mod http;
mod memory;

pub use http::HttpStore;
pub use memory::MemoryStore;

use crate::error::StoreError;
use cubeviz_model::Term;
use std::collections::BTreeMap;

/// One SELECT solution: variable name (without `?`) to bound term
pub type Binding = BTreeMap<String, Term>;

/// A SPARQL-capable triple store
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait TripleStore: Send + Sync {
    /// Run a CONSTRUCT query and return the graph as N-Triples
    async fn construct(&self, query: &str) -> Result<String, StoreError>;

    /// Run a SELECT query and return its solutions
    async fn select(&self, query: &str) -> Result<Vec<Binding>, StoreError>;
}
