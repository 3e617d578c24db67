//! In-process store backed by an oxigraph in-memory dataset

use super::{Binding, TripleStore};
use crate::error::{StoreError, StoreResult};
use crate::parse::convert_term;
use oxigraph::io::{RdfFormat, RdfParser};
use oxigraph::model::{GraphName, Quad};
use oxigraph::sparql::{QueryResults, SparqlEvaluator};
use oxigraph::store::Store;
use std::fmt::Write as _;

/// In-memory triple store
///
/// Loaded data always lands in the default graph, which is the graph every
/// discovery query runs against.
#[derive(Clone)]
pub struct MemoryStore {
    store: Store,
}

impl MemoryStore {
    /// Create an empty store
    ///
    /// # Errors
    /// [`StoreError::Load`] if the storage cannot be opened.
    pub fn new() -> Result<Self, StoreError> {
        let store = Store::new().map_err(storage)?;
        Ok(Self { store })
    }

    /// Create a store holding `data`
    ///
    /// # Errors
    /// See [`MemoryStore::new`] and [`MemoryStore::load`].
    pub fn with_data(format: RdfFormat, data: &[u8]) -> Result<Self, StoreError> {
        let store = Self::new()?;
        store.load(format, data)?;
        Ok(store)
    }

    /// Parse `data` and insert its triples
    ///
    /// Returns the number of triples that were not already present.
    ///
    /// # Errors
    /// [`StoreError::Load`] on syntax errors or storage failures. Triples
    /// parsed before the error stay loaded.
    pub fn load(&self, format: RdfFormat, data: &[u8]) -> StoreResult<usize> {
        let mut inserted = 0;
        for quad in RdfParser::from_format(format).for_slice(data) {
            let quad = quad.map_err(|e| StoreError::Load(e.to_string()))?;
            let quad = Quad::new(quad.subject, quad.predicate, quad.object, GraphName::DefaultGraph);
            if self.store.contains(quad.as_ref()).map_err(storage)? {
                continue;
            }
            self.store.insert(quad.as_ref()).map_err(storage)?;
            inserted += 1;
        }
        tracing::debug!(inserted, "loaded triples into memory store");
        Ok(inserted)
    }

    /// Number of stored triples
    ///
    /// # Errors
    /// [`StoreError::Load`] if the storage cannot be read.
    pub fn len(&self) -> StoreResult<usize> {
        self.store.len().map_err(storage)
    }

    /// Whether the store holds no triples
    ///
    /// # Errors
    /// [`StoreError::Load`] if the storage cannot be read.
    pub fn is_empty(&self) -> StoreResult<bool> {
        self.store.is_empty().map_err(storage)
    }
}

fn storage(err: oxigraph::store::StorageError) -> StoreError {
    StoreError::Load(err.to_string())
}

impl std::fmt::Debug for MemoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryStore").field("triples", &self.len().ok()).finish()
    }
}

#[async_trait::async_trait]
impl TripleStore for MemoryStore {
    async fn construct(&self, query: &str) -> Result<String, StoreError> {
        let results = SparqlEvaluator::new()
            .parse_query(query)
            .map_err(|e| StoreError::query(query, e))?
            .on_store(&self.store)
            .execute()
            .map_err(|e| StoreError::query(query, e))?;
        let QueryResults::Graph(triples) = results else {
            return Err(StoreError::UnexpectedResponse(
                "expected a graph for a CONSTRUCT query".to_string(),
            ));
        };

        let mut out = String::new();
        for triple in triples {
            let triple = triple.map_err(|e| StoreError::query(query, e))?;
            // Display of a triple is its N-Triples form without the final dot
            let _ = writeln!(out, "{triple} .");
        }
        Ok(out)
    }

    async fn select(&self, query: &str) -> Result<Vec<Binding>, StoreError> {
        let results = SparqlEvaluator::new()
            .parse_query(query)
            .map_err(|e| StoreError::query(query, e))?
            .on_store(&self.store)
            .execute()
            .map_err(|e| StoreError::query(query, e))?;
        let QueryResults::Solutions(solutions) = results else {
            return Err(StoreError::UnexpectedResponse(
                "expected solutions for a SELECT query".to_string(),
            ));
        };

        let mut bindings = Vec::new();
        for solution in solutions {
            let solution = solution.map_err(|e| StoreError::query(query, e))?;
            let binding: Binding = solution
                .iter()
                .filter_map(|(variable, term)| {
                    convert_term(term).map(|t| (variable.as_str().to_string(), t))
                })
                .collect();
            bindings.push(binding);
        }
        Ok(bindings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::parse_graph;
    use crate::query;
    use cubeviz_model::vocab::qb;
    use cubeviz_model::Term;

    const DATA: &str = r#"
@prefix qb: <http://purl.org/linked-data/cube#> .
@prefix rdfs: <http://www.w3.org/2000/01/rdf-schema#> .
<http://ex/ds> a qb:DataSet ; rdfs:label "Deaths"@en ; qb:structure <http://ex/dsd> .
<http://ex/dsd> a qb:DataStructureDefinition ; qb:component <http://ex/cs1> , <http://ex/cs2> .
"#;

    fn store() -> MemoryStore {
        MemoryStore::with_data(RdfFormat::Turtle, DATA.as_bytes()).unwrap()
    }

    #[test]
    fn load_counts_new_triples() {
        let store = MemoryStore::new().unwrap();
        assert!(store.is_empty().unwrap());
        assert_eq!(store.load(RdfFormat::Turtle, DATA.as_bytes()).unwrap(), 6);
        assert_eq!(store.load(RdfFormat::Turtle, DATA.as_bytes()).unwrap(), 0);
        assert_eq!(store.len().unwrap(), 6);
        assert!(!store.is_empty().unwrap());
    }

    #[test]
    fn load_rejects_bad_syntax() {
        let store = MemoryStore::new().unwrap();
        let err = store.load(RdfFormat::Turtle, b"<http://ex/s> <http://ex/p> .").unwrap_err();
        assert!(matches!(err, StoreError::Load(_)));
    }

    #[tokio::test]
    async fn construct_returns_parsable_ntriples() {
        let graph = store().construct(&query::datasets()).await.unwrap();
        let nodes = parse_graph(&graph).unwrap();

        assert_eq!(nodes.len(), 1);
        assert!(nodes[0].has_type(qb::DATA_SET));
        assert_eq!(nodes[0].label("en"), Some("Deaths"));
    }

    #[tokio::test]
    async fn select_returns_bindings() {
        let rows = store()
            .select(&query::component_specifications("http://ex/dsd"))
            .await
            .unwrap();
        let mut values: Vec<&Term> = rows.iter().filter_map(|row| row.get("o")).collect();
        values.sort_by_key(|t| t.as_node().map(|u| u.as_str().to_string()));

        assert_eq!(values, vec![&Term::node("http://ex/cs1"), &Term::node("http://ex/cs2")]);
    }

    #[tokio::test]
    async fn wrong_query_form_is_unexpected() {
        let err = store().select(&query::all_triples()).await.unwrap_err();
        assert!(matches!(err, StoreError::UnexpectedResponse(_)));

        let err = store().construct("CONSTRUCT WHERE {").await.unwrap_err();
        assert!(matches!(err, StoreError::Query { .. }));
    }
}
