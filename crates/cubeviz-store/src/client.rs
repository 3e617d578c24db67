//! Query client used by the import pipeline
//!
//! [`StoreClient`] pairs the query builders with a backend and parses every
//! graph response into nodes. A client may be created without a backend; any
//! query on it fails with [`StoreError::NotInitialized`].

use crate::backend::{Binding, TripleStore};
use crate::error::StoreError;
use crate::parse::parse_graph;
use crate::query::{self, ComponentKind};
use cubeviz_model::Node;
use std::sync::Arc;

/// Store access for cube discovery
#[derive(Clone, Default)]
pub struct StoreClient {
    backend: Option<Arc<dyn TripleStore>>,
}

impl StoreClient {
    /// Create a client with no backend
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a client connected to `backend`
    #[must_use]
    pub fn connected(backend: Arc<dyn TripleStore>) -> Self {
        Self {
            backend: Some(backend),
        }
    }

    /// Attach a backend, replacing any previous one
    pub fn connect(&mut self, backend: Arc<dyn TripleStore>) {
        self.backend = Some(backend);
    }

    /// Whether a backend is attached
    #[inline]
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.backend.is_some()
    }

    fn backend(&self) -> Result<&Arc<dyn TripleStore>, StoreError> {
        self.backend.as_ref().ok_or(StoreError::NotInitialized)
    }

    /// Run a CONSTRUCT query and parse the graph
    ///
    /// # Errors
    /// [`StoreError::NotInitialized`] without a backend, otherwise any backend
    /// or parse error.
    pub async fn construct(&self, query: &str) -> Result<Vec<Node>, StoreError> {
        let graph = self.backend()?.construct(query).await?;
        let nodes = parse_graph(&graph)?;
        tracing::trace!(nodes = nodes.len(), "graph parsed");
        Ok(nodes)
    }

    /// Run a SELECT query
    ///
    /// # Errors
    /// [`StoreError::NotInitialized`] without a backend, otherwise any backend
    /// error.
    pub async fn select(&self, query: &str) -> Result<Vec<Binding>, StoreError> {
        self.backend()?.select(query).await
    }

    /// Every triple in the store, as nodes
    ///
    /// # Errors
    /// See [`StoreClient::construct`].
    pub async fn all_triples(&self) -> Result<Vec<Node>, StoreError> {
        self.construct(&query::all_triples()).await
    }

    /// Every triple in the store, as N-Triples text
    ///
    /// # Errors
    /// [`StoreError::NotInitialized`] without a backend, otherwise any backend
    /// error.
    pub async fn dump(&self) -> Result<String, StoreError> {
        self.backend()?.construct(&query::all_triples()).await
    }

    /// Dataset nodes
    ///
    /// # Errors
    /// See [`StoreClient::construct`].
    pub async fn datasets(&self) -> Result<Vec<Node>, StoreError> {
        self.construct(&query::datasets()).await
    }

    /// Structure definition nodes of a dataset
    ///
    /// # Errors
    /// See [`StoreClient::construct`].
    pub async fn dsd(&self, dataset: &str) -> Result<Vec<Node>, StoreError> {
        self.construct(&query::data_structure_definition(dataset)).await
    }

    /// Component specification identifiers of a structure definition
    ///
    /// # Errors
    /// See [`StoreClient::select`].
    pub async fn component_specifications(&self, dsd: &str) -> Result<Vec<cubeviz_model::Uri>, StoreError> {
        let rows = self.select(&query::component_specifications(dsd)).await?;
        Ok(rows
            .iter()
            .filter_map(|row| row.get("o").and_then(cubeviz_model::Term::as_node).cloned())
            .collect())
    }

    /// Component property nodes of one kind
    ///
    /// # Errors
    /// See [`StoreClient::construct`].
    pub async fn components(
        &self,
        dataset: &str,
        dsd: &str,
        kind: ComponentKind,
    ) -> Result<Vec<Node>, StoreError> {
        self.construct(&query::components(dataset, dsd, kind)).await
    }

    /// Dimension property nodes
    ///
    /// # Errors
    /// See [`StoreClient::construct`].
    pub async fn dimensions(&self, dataset: &str, dsd: &str) -> Result<Vec<Node>, StoreError> {
        self.components(dataset, dsd, ComponentKind::Dimension).await
    }

    /// Measure property nodes
    ///
    /// # Errors
    /// See [`StoreClient::construct`].
    pub async fn measures(&self, dataset: &str, dsd: &str) -> Result<Vec<Node>, StoreError> {
        self.components(dataset, dsd, ComponentKind::Measure).await
    }

    /// Attribute property nodes
    ///
    /// # Errors
    /// See [`StoreClient::construct`].
    pub async fn attributes(&self, dataset: &str, dsd: &str) -> Result<Vec<Node>, StoreError> {
        self.components(dataset, dsd, ComponentKind::Attribute).await
    }

    /// Nodes used by the dataset's observations on `property`
    ///
    /// Works for dimension and attribute properties alike.
    ///
    /// # Errors
    /// See [`StoreClient::construct`].
    pub async fn dimension_elements(&self, property: &str, dataset: &str) -> Result<Vec<Node>, StoreError> {
        self.construct(&query::dimension_elements(property, dataset)).await
    }

    /// Observation nodes of a dataset
    ///
    /// # Errors
    /// See [`StoreClient::construct`].
    pub async fn observations(&self, dataset: &str) -> Result<Vec<Node>, StoreError> {
        self.construct(&query::observations(dataset)).await
    }
}

impl std::fmt::Debug for StoreClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreClient")
            .field("connected", &self.is_connected())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MockTripleStore;
    use cubeviz_model::vocab::qb;
    use cubeviz_model::{Term, Uri};

    const DATASET_GRAPH: &str = "<http://ex/ds> <http://www.w3.org/1999/02/22-rdf-syntax-ns#type> \
                                 <http://purl.org/linked-data/cube#DataSet> .\n";

    #[tokio::test]
    async fn unconnected_client_is_not_initialized() {
        let client = StoreClient::new();
        assert!(!client.is_connected());
        assert!(matches!(client.datasets().await, Err(StoreError::NotInitialized)));
        assert!(matches!(client.dump().await, Err(StoreError::NotInitialized)));
    }

    #[tokio::test]
    async fn datasets_sends_dataset_query_and_parses() {
        let mut backend = MockTripleStore::new();
        backend
            .expect_construct()
            .withf(|q| q == query::datasets())
            .times(1)
            .returning(|_| Ok(DATASET_GRAPH.to_string()));

        let client = StoreClient::connected(Arc::new(backend));
        let nodes = client.datasets().await.unwrap();

        assert_eq!(nodes.len(), 1);
        assert!(nodes[0].has_type(qb::DATA_SET));
    }

    #[tokio::test]
    async fn component_specifications_reads_o_bindings() {
        let mut backend = MockTripleStore::new();
        backend
            .expect_select()
            .withf(|q| q == query::component_specifications("http://ex/dsd"))
            .returning(|_| {
                let mut row = Binding::new();
                row.insert("o".to_string(), Term::node("http://ex/cs1"));
                Ok(vec![row, Binding::new()])
            });

        let client = StoreClient::connected(Arc::new(backend));
        let specs = client.component_specifications("http://ex/dsd").await.unwrap();
        assert_eq!(specs, vec![Uri::from("http://ex/cs1")]);
    }

    #[tokio::test]
    async fn backend_errors_propagate() {
        let mut backend = MockTripleStore::new();
        backend
            .expect_construct()
            .returning(|q| Err(StoreError::query(q, "boom")));

        let mut client = StoreClient::new();
        client.connect(Arc::new(backend));
        let err = client.observations("http://ex/ds").await.unwrap_err();
        assert!(matches!(err, StoreError::Query { .. }));
    }

    #[tokio::test]
    async fn malformed_graph_is_a_parse_error() {
        let mut backend = MockTripleStore::new();
        backend
            .expect_construct()
            .returning(|_| Ok("not n-triples".to_string()));

        let client = StoreClient::connected(Arc::new(backend));
        assert!(client.measures("a", "b").await.unwrap_err().is_parse());
    }
}
