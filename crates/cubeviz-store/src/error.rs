//! Error types for store access

/// Errors while talking to a triple store or reading its responses
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// No backend is connected
    #[error("store is not initialized")]
    NotInitialized,

    /// The store rejected or failed to execute a query
    #[error("query failed: {message}")]
    Query {
        /// Query text
        query: String,
        /// Store-specific reason
        message: String,
    },

    /// A returned graph could not be converted into nodes
    #[error("failed to parse graph: {0}")]
    Parse(String),

    /// Source data could not be loaded into the store
    #[error("failed to load data: {0}")]
    Load(String),

    /// HTTP transport failure against a remote endpoint
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Response had an unexpected shape (e.g. solutions for a CONSTRUCT)
    #[error("unexpected response: {0}")]
    UnexpectedResponse(String),
}

impl StoreError {
    /// Create a query failure for `query`
    pub fn query(query: impl Into<String>, message: impl ToString) -> Self {
        Self::Query {
            query: query.into(),
            message: message.to_string(),
        }
    }

    /// Whether the failure happened while parsing a response
    #[inline]
    #[must_use]
    pub fn is_parse(&self) -> bool {
        matches!(self, Self::Parse(_))
    }
}

/// Result type alias for store operations
pub type StoreResult<T> = Result<T, StoreError>;
