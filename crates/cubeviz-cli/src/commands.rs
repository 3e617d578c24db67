//! Subcommand implementations
//!
//! Each command returns a serializable value; printing is left to the
//! binary.

use crate::config::CubevizConfig;
use crate::source::Source;
use anyhow::{bail, Context as _};
use cubeviz_import::ImportOrchestrator;
use cubeviz_model::{CubeModel, DimensionElement, Node, SelectionFilter, Uri};
use cubeviz_recommend::{convert as convert_chart, ChartData, Recommendation, RecommendationEngine, Visual};
use serde::Serialize;
use std::fmt;

/// Overview of a cube
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CubeSummary {
    /// Dataset identifier
    pub dataset: Uri,
    /// Dataset label
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Measure charts and filters use
    pub default_measure: Uri,
    /// Number of declared measures
    pub measures: usize,
    /// Active dimensions with the number of elements observations use
    pub dimensions: Vec<DimensionSummary>,
    /// Number of observations
    pub observations: usize,
}

/// One active dimension
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DimensionSummary {
    /// Dimension identifier
    pub id: Uri,
    /// Display label
    pub label: String,
    /// Distinct elements in use
    pub elements: usize,
}

impl CubeSummary {
    /// Summarize `cube`
    #[must_use]
    pub fn of(cube: &CubeModel) -> Self {
        Self {
            dataset: cube.dataset().id.clone(),
            label: cube.dataset().label.clone(),
            default_measure: cube.default_measure().id.clone(),
            measures: cube.measures().len(),
            dimensions: cube
                .dimensions()
                .iter()
                .map(|d| DimensionSummary {
                    id: d.id.clone(),
                    label: d.display_label().to_string(),
                    elements: cube.observed_elements(d.id.as_str()).len(),
                })
                .collect(),
            observations: cube.observations().len(),
        }
    }
}

impl fmt::Display for CubeSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Dataset: {}", self.label.as_deref().unwrap_or(self.dataset.as_str()))?;
        writeln!(f, "  Identifier: {}", self.dataset)?;
        writeln!(f, "  Default measure: {} (of {})", self.default_measure, self.measures)?;
        writeln!(f, "  Observations: {}", self.observations)?;
        writeln!(f, "  Dimensions:")?;
        for dimension in &self.dimensions {
            writeln!(f, "    {} ({} elements)", dimension.label, dimension.elements)?;
        }
        Ok(())
    }
}

/// Ranked charts for a (sub-)cube
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecommendReport {
    /// Cube the charts were ranked for
    pub cube: CubeSummary,
    /// Best first
    pub charts: Vec<Recommendation>,
}

impl fmt::Display for RecommendReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.cube)?;
        writeln!(f, "Charts:")?;
        for chart in &self.charts {
            let mark = if chart.is_satisfied { "✓" } else { "✗" };
            writeln!(f, "  {mark} {:<18} {:.2}", chart.name.as_str(), chart.score)?;
        }
        Ok(())
    }
}

/// Import the cube held by `source`
///
/// # Errors
///
/// Fails when the source cannot be opened or the import fails.
pub async fn import(source: &Source, config: &CubevizConfig) -> anyhow::Result<CubeModel> {
    let client = source.connect().await?;
    ImportOrchestrator::new(client, config.import.clone())
        .import()
        .await
        .context("importing cube")
}

/// Restrict `cube` to the given dimension elements
///
/// No elements leaves the cube as it is.
///
/// # Errors
///
/// Fails when an identifier names no element of the cube, or names elements
/// of more than one dimension.
pub fn select(cube: &CubeModel, elements: &[String]) -> anyhow::Result<CubeModel> {
    if elements.is_empty() {
        return Ok(cube.clone());
    }
    let selection = elements
        .iter()
        .map(|id| resolve_element(cube, id))
        .collect::<anyhow::Result<Vec<DimensionElement>>>()?;
    Ok(SelectionFilter::sub_cube(&selection, cube))
}

fn resolve_element(cube: &CubeModel, id: &str) -> anyhow::Result<DimensionElement> {
    match cube.elements_named(id).as_slice() {
        [] => bail!("no dimension element {id} in the cube"),
        [element] => Ok((*element).clone()),
        shared => {
            let dimensions: Vec<&str> = shared.iter().map(|e| e.dimension.as_str()).collect();
            bail!("dimension element {id} is ambiguous, it belongs to {}", dimensions.join(", "))
        }
    }
}

/// Rank charts for `cube` restricted to `elements`
///
/// # Errors
///
/// See [`select`].
pub fn recommend(cube: &CubeModel, elements: &[String], config: &CubevizConfig) -> anyhow::Result<RecommendReport> {
    let sub_cube = select(cube, elements)?;
    let charts = RecommendationEngine::from_config(&config.recommend).determine_charts(Some(&sub_cube));
    Ok(RecommendReport {
        cube: CubeSummary::of(&sub_cube),
        charts,
    })
}

/// Chart data for `cube` restricted to `elements`
///
/// # Errors
///
/// See [`select`] and [`cubeviz_recommend::convert`].
pub fn convert(cube: &CubeModel, elements: &[String], visual: &Visual) -> anyhow::Result<ChartData> {
    let sub_cube = select(cube, elements)?;
    convert_chart(visual, &sub_cube).with_context(|| format!("converting to {}", visual.name))
}

/// Every triple of `source` grouped by subject
///
/// # Errors
///
/// Fails when the source cannot be opened or queried.
pub async fn dump(source: &Source) -> anyhow::Result<Vec<Node>> {
    let client = source.connect().await?;
    client.all_triples().await.context("reading all triples")
}
