//! Chart kinds

use crate::error::ChartError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Charts the engine can recommend and convert to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ChartKind {
    /// Two-dimensional grid of colored cells
    Heatmap,
    /// Share of a whole per element
    PieChart,
    /// One bar per element
    BarChart,
    /// Bars grouped by one dimension, stacked by another
    GroupedStackedBar,
}

impl ChartKind {
    /// Every kind
    pub const ALL: [Self; 4] = [Self::Heatmap, Self::PieChart, Self::BarChart, Self::GroupedStackedBar];

    /// Chart name as used in recommendations and visuals
    #[inline]
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Heatmap => "heatmap",
            Self::PieChart => "pieChart",
            Self::BarChart => "barChart",
            Self::GroupedStackedBar => "groupedStackedBar",
        }
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChartKind {
    type Err = ChartError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == name)
            .ok_or_else(|| ChartError::UnknownChartType(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_parse_back() {
        for kind in ChartKind::ALL {
            assert_eq!(kind.as_str().parse::<ChartKind>(), Ok(kind));
        }
    }

    #[test]
    fn unknown_name() {
        assert_eq!(
            "lineChart".parse::<ChartKind>(),
            Err(ChartError::UnknownChartType("lineChart".into()))
        );
        // names are case sensitive
        assert!("PieChart".parse::<ChartKind>().is_err());
    }
}
