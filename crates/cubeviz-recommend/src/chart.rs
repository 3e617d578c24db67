//! Cube to chart data conversion
//!
//! [`convert`] turns a cube into the data one chart needs. Only the default
//! measure is charted. Observations without a value for it are left out; a
//! value that is not a number fails the conversion.

use crate::engine::Recommendation;
use crate::error::ChartError;
use crate::kind::ChartKind;
use crate::rule::DimensionShape;
use cubeviz_model::{CubeModel, Dimension, Observation, Uri};
use serde::{Deserialize, Serialize};

/// A chart to draw, and the dimension it is drawn along
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Visual {
    /// Chart name, e.g. `pieChart`
    pub name: String,
    /// Dimension to chart along; the first multi-element one when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_dimension: Option<Uri>,
}

impl Visual {
    /// Visual for a chart name
    #[inline]
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            selected_dimension: None,
        }
    }

    /// Chart along `dimension`
    #[inline]
    #[must_use]
    pub fn with_dimension(mut self, dimension: impl Into<Uri>) -> Self {
        self.selected_dimension = Some(dimension.into());
        self
    }
}

impl From<&Recommendation> for Visual {
    fn from(recommendation: &Recommendation) -> Self {
        Self {
            name: recommendation.name.as_str().to_string(),
            selected_dimension: recommendation
                .multi_element_dimensions
                .first()
                .map(|d| d.id.clone()),
        }
    }
}

/// Heatmap cell
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Cell {
    /// Element position per cube dimension, in dimension order
    pub indices: Vec<usize>,
    /// Default measure value
    pub value: f64,
}

/// Pie slice
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Slice {
    /// Element label on the selected dimension
    pub label: String,
    /// Default measure value
    pub value: f64,
    /// Rounded share of the total in percent
    pub percent: f64,
}

/// Bar or stacked segment
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Point {
    /// Element label
    pub label: String,
    /// Default measure value
    pub value: f64,
}

/// Bars sharing one element of the grouping dimension
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Group {
    /// Element label on the grouping dimension
    pub label: String,
    /// One segment per element of the stacked dimension
    pub series: Vec<Point>,
}

/// Data for one chart
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ChartData {
    /// Grid of cells over the cube's dimensions
    Heatmap {
        /// Axis labels, in dimension order
        axes: Vec<String>,
        /// One cell per observation
        cells: Vec<Cell>,
    },
    /// Shares of the total
    PieChart {
        /// One slice per observation
        slices: Vec<Slice>,
    },
    /// One bar per observation
    BarChart {
        /// Label of the charted dimension
        x_label: String,
        /// Label of the default measure
        y_label: String,
        /// Bars
        points: Vec<Point>,
    },
    /// Bars grouped by one dimension and stacked by another
    GroupedStackedBar {
        /// Label of the grouping dimension
        group_label: String,
        /// Label of the stacked dimension
        series_label: String,
        /// Groups in first-seen order
        groups: Vec<Group>,
    },
}

impl ChartData {
    /// Chart this data is for
    #[must_use]
    pub fn kind(&self) -> ChartKind {
        match self {
            Self::Heatmap { .. } => ChartKind::Heatmap,
            Self::PieChart { .. } => ChartKind::PieChart,
            Self::BarChart { .. } => ChartKind::BarChart,
            Self::GroupedStackedBar { .. } => ChartKind::GroupedStackedBar,
        }
    }
}

/// Convert `cube` into the data `visual` needs
///
/// # Errors
///
/// - [`ChartError::UnknownChartType`] for an unknown chart name
/// - [`ChartError::MissingDimension`] when the chart needs a dimension the
///   cube does not have
/// - [`ChartError::NonNumericValue`] when a default measure value is not a
///   number
pub fn convert(visual: &Visual, cube: &CubeModel) -> Result<ChartData, ChartError> {
    let kind: ChartKind = visual.name.parse()?;
    let values = numeric_values(cube)?;

    let data = match kind {
        ChartKind::Heatmap => heatmap(cube, &values),
        ChartKind::PieChart => {
            let dimension = selected_dimension(kind, visual, cube)?;
            pie_chart(cube, &dimension, &values)
        }
        ChartKind::BarChart => {
            let dimension = selected_dimension(kind, visual, cube)?;
            ChartData::BarChart {
                x_label: dimension.display_label().to_string(),
                y_label: cube.default_measure().display_label().to_string(),
                points: points_along(cube, &dimension, &values),
            }
        }
        ChartKind::GroupedStackedBar => {
            let dimension = selected_dimension(kind, visual, cube)?;
            let stacked = other_multi_dimension(kind, cube, &dimension)?;
            grouped_stacked_bar(cube, &dimension, &stacked, &values)
        }
    };

    tracing::debug!(chart = %kind, observations = values.len(), "converted cube to chart data");
    Ok(data)
}

type Values<'a> = Vec<(&'a Observation, f64)>;

fn numeric_values(cube: &CubeModel) -> Result<Values<'_>, ChartError> {
    let measure = cube.default_measure().id.as_str();
    let mut values = Vec::with_capacity(cube.observations().len());
    for observation in cube.observations() {
        let Some(value) = observation.value_of(measure) else {
            continue;
        };
        let number = value.as_f64().ok_or_else(|| ChartError::NonNumericValue {
            observation: observation.id.clone(),
            value: value.lexical.clone(),
        })?;
        values.push((observation, number));
    }
    Ok(values)
}

fn selected_dimension(kind: ChartKind, visual: &Visual, cube: &CubeModel) -> Result<Dimension, ChartError> {
    let found = match &visual.selected_dimension {
        Some(id) => cube.dimensions().iter().find(|d| d.id == *id).cloned(),
        None => DimensionShape::of(cube).multi.into_iter().next().map(|(d, _)| d),
    };
    found.ok_or_else(|| ChartError::MissingDimension {
        chart: kind.as_str().to_string(),
        dimension: visual.selected_dimension.clone(),
    })
}

fn other_multi_dimension(kind: ChartKind, cube: &CubeModel, selected: &Dimension) -> Result<Dimension, ChartError> {
    DimensionShape::of(cube)
        .multi
        .into_iter()
        .map(|(d, _)| d)
        .find(|d| d.id != selected.id)
        .ok_or_else(|| ChartError::MissingDimension {
            chart: kind.as_str().to_string(),
            dimension: None,
        })
}

fn element_label(cube: &CubeModel, observation: &Observation, dimension: &Dimension) -> String {
    match observation.element_on(dimension.id.as_str()) {
        Some(id) => cube
            .element_on(dimension.id.as_str(), id.as_str())
            .map_or_else(|| id.to_string(), |e| e.label.clone()),
        None => String::new(),
    }
}

fn heatmap(cube: &CubeModel, values: &Values<'_>) -> ChartData {
    let dimensions = cube.dimensions();
    let cells = values
        .iter()
        .filter_map(|(observation, value)| {
            let indices = dimensions
                .iter()
                .map(|d| {
                    observation
                        .element_on(d.id.as_str())
                        .and_then(|e| cube.element_position(d.id.as_str(), e.as_str()))
                })
                .collect::<Option<Vec<usize>>>();
            if indices.is_none() {
                tracing::warn!(observation = %observation.id, "observation has no position on every dimension, skipped");
            }
            Some(Cell {
                indices: indices?,
                value: *value,
            })
        })
        .collect();

    ChartData::Heatmap {
        axes: dimensions.iter().map(|d| d.display_label().to_string()).collect(),
        cells,
    }
}

fn pie_chart(cube: &CubeModel, dimension: &Dimension, values: &Values<'_>) -> ChartData {
    let total: f64 = values.iter().map(|(_, v)| v).sum();
    let slices = values
        .iter()
        .map(|(observation, value)| Slice {
            label: element_label(cube, observation, dimension),
            value: *value,
            percent: if total == 0.0 {
                0.0
            } else {
                (value / total * 100.0).round()
            },
        })
        .collect();
    ChartData::PieChart { slices }
}

fn points_along(cube: &CubeModel, dimension: &Dimension, values: &Values<'_>) -> Vec<Point> {
    values
        .iter()
        .map(|(observation, value)| Point {
            label: element_label(cube, observation, dimension),
            value: *value,
        })
        .collect()
}

fn grouped_stacked_bar(
    cube: &CubeModel,
    grouping: &Dimension,
    stacked: &Dimension,
    values: &Values<'_>,
) -> ChartData {
    let mut groups: Vec<(Option<&Uri>, Group)> = Vec::new();
    for (observation, value) in values {
        let key = observation.element_on(grouping.id.as_str());
        let point = Point {
            label: element_label(cube, observation, stacked),
            value: *value,
        };
        match groups.iter_mut().find(|(k, _)| *k == key) {
            Some((_, group)) => group.series.push(point),
            None => groups.push((
                key,
                Group {
                    label: element_label(cube, observation, grouping),
                    series: vec![point],
                },
            )),
        }
    }

    ChartData::GroupedStackedBar {
        group_label: grouping.display_label().to_string(),
        series_label: stacked.display_label().to_string(),
        groups: groups.into_iter().map(|(_, g)| g).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cubeviz_model::{DataStructureDefinition, Dataset, DimensionElement, Measure, MeasureValue};
    use cubeviz_test_utils::{grid_cube, ids, sample_cube};
    use pretty_assertions::assert_eq;

    #[test]
    fn pie_percentages_of_default_measure() {
        let data = convert(&Visual::new("pieChart"), &sample_cube()).unwrap();
        // France has no births and is left out
        assert_eq!(
            data,
            ChartData::PieChart {
                slices: vec![
                    Slice { label: "England".into(), value: 30.0, percent: 55.0 },
                    Slice { label: "Germany".into(), value: 25.0, percent: 45.0 },
                ],
            }
        );
    }

    #[test]
    fn pie_of_zeros_has_zero_shares() {
        let cube = CubeModel::builder(Dataset::new("ds"), DataStructureDefinition::new("dsd"))
            .measure(Measure::new("m"))
            .dimension(Dimension::new("d"))
            .observation(Observation::new("o1").with_element("d", "a").with_measure("m", 0.0))
            .observation(Observation::new("o2").with_element("d", "b").with_measure("m", 0.0))
            .build()
            .unwrap();
        let ChartData::PieChart { slices } = convert(&Visual::new("pieChart"), &cube).unwrap() else {
            panic!("expected a pie chart");
        };
        assert!(slices.iter().all(|s| s.percent == 0.0));
        // unindexed elements are labelled by identifier
        assert_eq!(slices[0].label, "a");
    }

    #[test]
    fn bar_axes_and_points() {
        let visual = Visual::new("barChart").with_dimension(ids::COUNTRY);
        let ChartData::BarChart { x_label, y_label, points } = convert(&visual, &sample_cube()).unwrap() else {
            panic!("expected a bar chart");
        };
        assert_eq!(x_label, "Country");
        assert_eq!(y_label, "Births");
        let labels: Vec<&str> = points.iter().map(|p| p.label.as_str()).collect();
        assert_eq!(labels, vec!["England", "Germany"]);
    }

    #[test]
    fn heatmap_cells_are_element_positions() {
        let data = convert(&Visual::new("heatmap"), &grid_cube(2, 2, |_, _| true)).unwrap();
        let ChartData::Heatmap { axes, cells } = data else {
            panic!("expected a heatmap");
        };
        assert_eq!(axes, vec!["Row", "Column"]);
        let indexed: Vec<(Vec<usize>, f64)> = cells.into_iter().map(|c| (c.indices, c.value)).collect();
        assert_eq!(
            indexed,
            vec![
                (vec![0, 0], 0.0),
                (vec![0, 1], 1.0),
                (vec![1, 0], 2.0),
                (vec![1, 1], 3.0),
            ]
        );
    }

    #[test]
    fn heatmap_positions_are_per_dimension() {
        const AREA: &str = "http://ex/dim/area";
        const PARTNER: &str = "http://ex/dim/partner";
        const DE: &str = "http://ex/geo/DE";
        const FR: &str = "http://ex/geo/FR";
        let cube = CubeModel::builder(Dataset::new("ds"), DataStructureDefinition::new("dsd"))
            .measure(Measure::new("m"))
            .dimension(Dimension::new(AREA))
            .dimension(Dimension::new(PARTNER))
            .dimension_elements(
                AREA,
                [DimensionElement::new(DE, "Germany", AREA), DimensionElement::new(FR, "France", AREA)],
            )
            .dimension_elements(
                PARTNER,
                [DimensionElement::new(FR, "France", PARTNER), DimensionElement::new(DE, "Germany", PARTNER)],
            )
            .observation(Observation::new("o1").with_element(AREA, DE).with_element(PARTNER, FR).with_measure("m", 5.0))
            .observation(Observation::new("o2").with_element(AREA, FR).with_element(PARTNER, DE).with_measure("m", 7.0))
            .build()
            .unwrap();

        let ChartData::Heatmap { cells, .. } = convert(&Visual::new("heatmap"), &cube).unwrap() else {
            panic!("expected a heatmap");
        };
        let indexed: Vec<(Vec<usize>, f64)> = cells.into_iter().map(|c| (c.indices, c.value)).collect();
        assert_eq!(indexed, vec![(vec![0, 0], 5.0), (vec![1, 1], 7.0)]);
    }

    #[test]
    fn grouped_stacked_bar_groups_by_selected_dimension() {
        let visual = Visual::new("groupedStackedBar").with_dimension("http://ex/dim/col");
        let data = convert(&visual, &grid_cube(2, 3, |_, _| true)).unwrap();
        let ChartData::GroupedStackedBar { group_label, series_label, groups } = data else {
            panic!("expected a grouped stacked bar");
        };
        assert_eq!(group_label, "Column");
        assert_eq!(series_label, "Row");
        assert_eq!(groups.len(), 3);
        assert_eq!(groups[1].label, "col 1");
        let series: Vec<(&str, f64)> = groups[1].series.iter().map(|p| (p.label.as_str(), p.value)).collect();
        assert_eq!(series, vec![("row 0", 1.0), ("row 1", 4.0)]);
    }

    #[test]
    fn grouped_stacked_bar_needs_two_axes() {
        let err = convert(&Visual::new("groupedStackedBar"), &sample_cube()).unwrap_err();
        assert_eq!(
            err,
            ChartError::MissingDimension {
                chart: "groupedStackedBar".into(),
                dimension: None,
            }
        );
    }

    #[test]
    fn unknown_selected_dimension() {
        let visual = Visual::new("pieChart").with_dimension("http://example.org/dimension/sex");
        let err = convert(&visual, &sample_cube()).unwrap_err();
        assert!(matches!(err, ChartError::MissingDimension { dimension: Some(_), .. }));
    }

    #[test]
    fn non_numeric_value_fails() {
        let cube = CubeModel::builder(Dataset::new("ds"), DataStructureDefinition::new("dsd"))
            .measure(Measure::new("m"))
            .dimension(Dimension::new("d"))
            .observation(Observation::new("o1").with_element("d", "a").with_measure("m", MeasureValue::new("n/a")))
            .build()
            .unwrap();
        let err = convert(&Visual::new("barChart"), &cube).unwrap_err();
        assert_eq!(
            err,
            ChartError::NonNumericValue {
                observation: "o1".into(),
                value: "n/a".into(),
            }
        );
    }

    #[test]
    fn visual_from_recommendation() {
        let cube = sample_cube();
        let best = crate::engine::RecommendationEngine::default().best(&cube).unwrap();
        let visual = Visual::from(&best);
        assert_eq!(visual.name, "pieChart");
        assert_eq!(visual.selected_dimension.as_ref().map(Uri::as_str), Some(ids::COUNTRY));
    }

    #[test]
    fn serializes_tagged() {
        let data = convert(&Visual::new("barChart"), &sample_cube()).unwrap();
        let json = serde_json::to_value(&data).unwrap();
        assert_eq!(json["type"], "barChart");
        assert_eq!(json["xLabel"], "Country");
        assert_eq!(json["points"][0]["value"], 30.0);
    }
}
