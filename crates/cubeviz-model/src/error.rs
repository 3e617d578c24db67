//! Error types for the cube model

use crate::uri::Uri;

/// Errors raised while assembling a [`CubeModel`](crate::CubeModel)
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModelError {
    /// Cube declares no measures, so there is no default measure
    #[error("cube declares no measures")]
    EmptyMeasures,

    /// Something references a dimension the structure does not declare
    #[error("unknown dimension: {0}")]
    UnknownDimension(Uri),

    /// An observation carries a value for an undeclared measure
    #[error("unknown measure: {0}")]
    UnknownMeasure(Uri),

    /// Something references an attribute the structure does not declare
    #[error("unknown attribute: {0}")]
    UnknownAttribute(Uri),

    /// Observation assigns two values on one axis
    #[error("observation {observation} has more than one element on dimension {dimension}")]
    AmbiguousObservation {
        /// Offending observation
        observation: Uri,
        /// Dimension with several values
        dimension: Uri,
    },
}
