//! Error types for cube import
//!
//! Every stage of the pipeline has its own failure so callers can tell an
//! empty store from a broken one.

use cubeviz_model::ModelError;
use cubeviz_store::StoreError;

/// Import failure
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    /// No store backend is connected
    #[error("store is not initialized")]
    StoreNotInitialized,

    /// The store holds no `qb:DataSet`
    #[error("no dataset found")]
    NoDatasets,

    /// The dataset has no data structure definition
    #[error("no data structure definition found")]
    NoDsd,

    /// The structure declares no measures
    #[error("no measures found")]
    NoMeasures,

    /// The structure declares no dimensions
    #[error("no dimensions found")]
    NoDimensions,

    /// No dimension has any element used by an observation
    #[error("no dimension elements found")]
    NoDimensionElements,

    /// The dataset has no observations
    #[error("no observations found")]
    NoObservations,

    /// A query failed in the store or on the way to it
    #[error("query execution failed")]
    QueryExecution(#[source] StoreError),

    /// A store response could not be parsed
    #[error("failed to parse store response: {0}")]
    Parse(String),

    /// The discovered data does not form a valid cube
    #[error("invalid cube: {0}")]
    Model(#[from] ModelError),
}

impl ImportError {
    /// Whether the store answered but lacked required data
    #[inline]
    #[must_use]
    pub fn is_missing_data(&self) -> bool {
        matches!(
            self,
            Self::NoDatasets
                | Self::NoDsd
                | Self::NoMeasures
                | Self::NoDimensions
                | Self::NoDimensionElements
                | Self::NoObservations
        )
    }
}

impl From<StoreError> for ImportError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotInitialized => Self::StoreNotInitialized,
            StoreError::Parse(message) => Self::Parse(message),
            other => Self::QueryExecution(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_errors_map_to_dedicated_variants() {
        assert!(matches!(ImportError::from(StoreError::NotInitialized), ImportError::StoreNotInitialized));
        assert!(matches!(
            ImportError::from(StoreError::Parse("bad".into())),
            ImportError::Parse(m) if m == "bad"
        ));
        assert!(matches!(
            ImportError::from(StoreError::query("SELECT", "boom")),
            ImportError::QueryExecution(StoreError::Query { .. })
        ));
    }

    #[test]
    fn query_failure_message_appears_once_in_chain() {
        let err = ImportError::from(StoreError::query("SELECT", "boom"));
        assert_eq!(err.to_string(), "query execution failed");

        let source = std::error::Error::source(&err).map(ToString::to_string);
        assert_eq!(source.as_deref(), Some("query failed: boom"));
    }

    #[test]
    fn missing_data_classification() {
        assert!(ImportError::NoObservations.is_missing_data());
        assert!(!ImportError::StoreNotInitialized.is_missing_data());
        assert!(!ImportError::Model(ModelError::EmptyMeasures).is_missing_data());
    }
}
