//! Remote SPARQL endpoint over the SPARQL 1.1 protocol

use super::{Binding, TripleStore};
use crate::error::StoreError;
use cubeviz_model::{Literal, Term};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::time::Duration;

const NTRIPLES: &str = "application/n-triples";
const SPARQL_RESULTS_JSON: &str = "application/sparql-results+json";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Client for a remote SPARQL endpoint
///
/// Queries are POSTed as `application/x-www-form-urlencoded` bodies.
#[derive(Debug, Clone)]
pub struct HttpStore {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpStore {
    /// Create a client for `endpoint` with the default timeout
    ///
    /// # Errors
    /// [`StoreError::Http`] if the HTTP client cannot be built.
    pub fn new(endpoint: impl Into<String>) -> Result<Self, StoreError> {
        Self::with_timeout(endpoint, DEFAULT_TIMEOUT)
    }

    /// Create a client with a request timeout
    ///
    /// # Errors
    /// [`StoreError::Http`] if the HTTP client cannot be built.
    pub fn with_timeout(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, StoreError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("cubeviz/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    /// Endpoint URL
    #[inline]
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn send(&self, query: &str, accept: &str) -> Result<reqwest::Response, StoreError> {
        let response = self
            .client
            .post(&self.endpoint)
            .header(reqwest::header::ACCEPT, accept)
            .form(&[("query", query)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StoreError::query(query, format!("HTTP {status}: {body}")));
        }
        Ok(response)
    }
}

#[async_trait::async_trait]
impl TripleStore for HttpStore {
    async fn construct(&self, query: &str) -> Result<String, StoreError> {
        tracing::trace!(endpoint = %self.endpoint, "sending CONSTRUCT");
        Ok(self.send(query, NTRIPLES).await?.text().await?)
    }

    async fn select(&self, query: &str) -> Result<Vec<Binding>, StoreError> {
        tracing::trace!(endpoint = %self.endpoint, "sending SELECT");
        let document: SparqlResults = self
            .send(query, SPARQL_RESULTS_JSON)
            .await?
            .json()
            .await
            .map_err(|e| StoreError::UnexpectedResponse(e.to_string()))?;
        Ok(document.into_bindings())
    }
}

/// SPARQL 1.1 query results, JSON format
#[derive(Debug, Deserialize)]
struct SparqlResults {
    results: SparqlSolutions,
}

#[derive(Debug, Deserialize)]
struct SparqlSolutions {
    bindings: Vec<BTreeMap<String, SparqlTerm>>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
enum SparqlTerm {
    Uri {
        value: String,
    },
    Bnode {
        value: String,
    },
    #[serde(alias = "typed-literal")]
    Literal {
        value: String,
        datatype: Option<String>,
        #[serde(rename = "xml:lang")]
        language: Option<String>,
    },
}

impl SparqlResults {
    fn into_bindings(self) -> Vec<Binding> {
        self.results
            .bindings
            .into_iter()
            .map(|row| row.into_iter().map(|(name, term)| (name, term.into_term())).collect())
            .collect()
    }
}

impl SparqlTerm {
    fn into_term(self) -> Term {
        match self {
            Self::Uri { value } => Term::node(value),
            Self::Bnode { value } => Term::node(format!("_:{value}")),
            Self::Literal {
                value,
                language: Some(language),
                ..
            } => Term::Literal(Literal::tagged(value, language)),
            Self::Literal {
                value,
                datatype: Some(datatype),
                ..
            } if datatype != "http://www.w3.org/2001/XMLSchema#string" => {
                Term::Literal(Literal::typed(value, datatype))
            }
            Self::Literal { value, .. } => Term::Literal(Literal::plain(value)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn decodes_sparql_json_results() {
        let body = r#"{
            "head": {"vars": ["o"]},
            "results": {"bindings": [
                {"o": {"type": "uri", "value": "http://ex/cs1"}},
                {"o": {"type": "bnode", "value": "b0"}},
                {"o": {"type": "literal", "value": "Tote", "xml:lang": "de"}},
                {"o": {"type": "typed-literal", "value": "80", "datatype": "http://www.w3.org/2001/XMLSchema#integer"}},
                {"o": {"type": "literal", "value": "x", "datatype": "http://www.w3.org/2001/XMLSchema#string"}}
            ]}
        }"#;
        let document: SparqlResults = serde_json::from_str(body).unwrap();
        let terms: Vec<Term> = document
            .into_bindings()
            .into_iter()
            .filter_map(|mut row| row.remove("o"))
            .collect();

        assert_eq!(
            terms,
            vec![
                Term::node("http://ex/cs1"),
                Term::node("_:b0"),
                Term::Literal(Literal::tagged("Tote", "de")),
                Term::Literal(Literal::typed("80", "http://www.w3.org/2001/XMLSchema#integer")),
                Term::Literal(Literal::plain("x")),
            ]
        );
    }

    #[test]
    fn keeps_endpoint() {
        let store = HttpStore::new("http://localhost:3030/ds/sparql").unwrap();
        assert_eq!(store.endpoint(), "http://localhost:3030/ds/sparql");
    }
}
