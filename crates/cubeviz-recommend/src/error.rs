//! Error types for chart conversion

use cubeviz_model::Uri;

/// Chart conversion failure
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChartError {
    /// The visual names no known chart
    #[error("unknown chart type: {0}")]
    UnknownChartType(String),

    /// The chart needs a dimension the cube does not provide
    #[error(
        "{chart} needs a dimension of the cube, got {}",
        .dimension.as_ref().map_or("none", Uri::as_str)
    )]
    MissingDimension {
        /// Chart name
        chart: String,
        /// Requested dimension, if any
        dimension: Option<Uri>,
    },

    /// A default measure value is not a number
    #[error("observation {observation} has non-numeric value {value:?}")]
    NonNumericValue {
        /// Offending observation
        observation: Uri,
        /// Lexical form of the value
        value: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chart_error_display() {
        assert_eq!(
            ChartError::UnknownChartType("radar".into()).to_string(),
            "unknown chart type: radar"
        );
        let err = ChartError::MissingDimension {
            chart: "pieChart".into(),
            dimension: None,
        };
        assert_eq!(err.to_string(), "pieChart needs a dimension of the cube, got none");
    }
}
