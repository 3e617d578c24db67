//! Scripted store backend
//!
//! Answers queries from canned replies matched by substring, optionally
//! falling back to a [`MemoryStore`]. Every query is recorded so tests can
//! assert on call counts.

use cubeviz_store::{Binding, MemoryStore, StoreError, TripleStore};
use std::sync::{Mutex, PoisonError};

/// Canned reply
#[derive(Debug, Clone)]
pub enum Reply {
    /// N-Triples text for a CONSTRUCT
    Graph(String),
    /// Solutions for a SELECT
    Rows(Vec<Binding>),
    /// Fail with [`StoreError::Query`] carrying this message
    QueryFailure(String),
    /// Fail with [`StoreError::Parse`] carrying this message
    ParseFailure(String),
}

impl Reply {
    /// Empty graph
    #[must_use]
    pub fn empty() -> Self {
        Self::Graph(String::new())
    }

    fn graph(&self, query: &str) -> Result<String, StoreError> {
        match self {
            Self::Graph(text) => Ok(text.clone()),
            Self::Rows(_) => Err(StoreError::UnexpectedResponse("scripted rows for CONSTRUCT".into())),
            Self::QueryFailure(message) => Err(StoreError::query(query, message)),
            Self::ParseFailure(message) => Err(StoreError::Parse(message.clone())),
        }
    }

    fn rows(&self, query: &str) -> Result<Vec<Binding>, StoreError> {
        match self {
            Self::Rows(rows) => Ok(rows.clone()),
            Self::Graph(_) => Err(StoreError::UnexpectedResponse("scripted graph for SELECT".into())),
            Self::QueryFailure(message) => Err(StoreError::query(query, message)),
            Self::ParseFailure(message) => Err(StoreError::Parse(message.clone())),
        }
    }
}

#[derive(Debug)]
struct Script {
    needle: String,
    reply: Reply,
}

/// Store answering from scripts, then from an optional in-memory store
#[derive(Debug, Default)]
pub struct ScriptedStore {
    fallback: Option<MemoryStore>,
    scripts: Vec<Script>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedStore {
    /// Store that answers unscripted queries with empty results
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store that answers unscripted queries from `store`
    #[must_use]
    pub fn over(store: MemoryStore) -> Self {
        Self {
            fallback: Some(store),
            ..Self::default()
        }
    }

    /// Reply to queries containing `needle`; earlier scripts win
    #[must_use]
    pub fn on(mut self, needle: impl Into<String>, reply: Reply) -> Self {
        self.scripts.push(Script {
            needle: needle.into(),
            reply,
        });
        self
    }

    /// Fail queries containing `needle` with a query error
    #[must_use]
    pub fn fail_on(self, needle: impl Into<String>, message: impl Into<String>) -> Self {
        self.on(needle, Reply::QueryFailure(message.into()))
    }

    /// Answer queries containing `needle` with an empty graph
    #[must_use]
    pub fn empty_on(self, needle: impl Into<String>) -> Self {
        self.on(needle, Reply::empty())
    }

    /// Every query received, in order
    #[must_use]
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Number of received queries containing `needle`
    #[must_use]
    pub fn calls_matching(&self, needle: &str) -> usize {
        self.calls().iter().filter(|q| q.contains(needle)).count()
    }

    fn record(&self, query: &str) -> Option<&Reply> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(query.to_string());
        self.scripts
            .iter()
            .find(|s| query.contains(&s.needle))
            .map(|s| &s.reply)
    }
}

#[async_trait::async_trait]
impl TripleStore for ScriptedStore {
    async fn construct(&self, query: &str) -> Result<String, StoreError> {
        match (self.record(query), &self.fallback) {
            (Some(reply), _) => reply.graph(query),
            (None, Some(store)) => store.construct(query).await,
            (None, None) => Ok(String::new()),
        }
    }

    async fn select(&self, query: &str) -> Result<Vec<Binding>, StoreError> {
        match (self.record(query), &self.fallback) {
            (Some(reply), _) => reply.rows(query),
            (None, Some(store)) => store.select(query).await,
            (None, None) => Ok(Vec::new()),
        }
    }
}
