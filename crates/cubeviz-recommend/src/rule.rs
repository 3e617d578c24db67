//! Chart rules
//!
//! A rule looks at the shape of a cube and says whether its chart fits and
//! how well. Shape means the cube's active dimensions split by how many
//! distinct elements the observations use on each:
//!
//! - single-element: exactly one element
//! - multi-element: more than one
//!
//! Dimensions no observation touches are in neither class.

use crate::kind::ChartKind;
use cubeviz_model::{CubeModel, Dimension};
use serde::{Deserialize, Serialize};

/// Thresholds used by the rules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleConfig {
    /// Most slices a pie chart scores fully with
    pub max_pie_slices: usize,
    /// Most bars a bar chart scores fully with
    pub max_bars: usize,
    /// Most groups on the smaller axis of a grouped stacked bar
    pub max_stack_groups: usize,
}

impl RuleConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With pie slice limit
    #[inline]
    #[must_use]
    pub fn with_max_pie_slices(mut self, max: usize) -> Self {
        self.max_pie_slices = max;
        self
    }

    /// With bar limit
    #[inline]
    #[must_use]
    pub fn with_max_bars(mut self, max: usize) -> Self {
        self.max_bars = max;
        self
    }

    /// With stack group limit
    #[inline]
    #[must_use]
    pub fn with_max_stack_groups(mut self, max: usize) -> Self {
        self.max_stack_groups = max;
        self
    }
}

impl Default for RuleConfig {
    fn default() -> Self {
        Self {
            max_pie_slices: 7,
            max_bars: 25,
            max_stack_groups: 8,
        }
    }
}

/// Dimension classes of a cube
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DimensionShape {
    /// Dimensions with exactly one used element
    pub single: Vec<Dimension>,
    /// Dimensions with several used elements, with their element counts
    pub multi: Vec<(Dimension, usize)>,
}

impl DimensionShape {
    /// Classify the cube's active dimensions
    #[must_use]
    pub fn of(cube: &CubeModel) -> Self {
        let mut shape = Self::default();
        for dimension in cube.dimensions() {
            match cube.observed_elements(dimension.id.as_str()).len() {
                0 => {}
                1 => shape.single.push(dimension.clone()),
                n => shape.multi.push((dimension.clone(), n)),
            }
        }
        shape
    }

    /// Element counts of the multi-element dimensions
    #[must_use]
    pub fn multi_counts(&self) -> Vec<usize> {
        self.multi.iter().map(|(_, n)| *n).collect()
    }

    /// The multi-element dimensions without their counts
    #[must_use]
    pub fn multi_dimensions(&self) -> Vec<Dimension> {
        self.multi.iter().map(|(d, _)| d.clone()).collect()
    }
}

/// Capabilities every chart rule has
///
/// Rules are written against a [`DimensionShape`] computed by the caller, so
/// evaluating several rules on one cube classifies its dimensions once.
pub trait ChartRule: Send + Sync + std::fmt::Debug {
    /// Chart the rule is about
    fn kind(&self) -> ChartKind;

    /// Whether the chart can show a cube of this shape at all
    fn is_satisfied_with(&self, cube: &CubeModel, shape: &DimensionShape) -> bool;

    /// Fit in `[0, 1]` for a cube of this shape; zero when not satisfied
    fn score_with(&self, cube: &CubeModel, shape: &DimensionShape) -> f64;

    /// Whether the chart can show the cube at all
    fn is_satisfied_by(&self, cube: &CubeModel) -> bool {
        self.is_satisfied_with(cube, &DimensionShape::of(cube))
    }

    /// Fit in `[0, 1]`; zero when not satisfied
    fn score(&self, cube: &CubeModel) -> f64 {
        self.score_with(cube, &DimensionShape::of(cube))
    }

    /// Chart name
    fn name(&self) -> &'static str {
        self.kind().as_str()
    }

    /// Dimensions with exactly one used element
    fn single_element_dimensions(&self, cube: &CubeModel) -> Vec<Dimension> {
        DimensionShape::of(cube).single
    }

    /// Dimensions with several used elements
    fn multi_element_dimensions(&self, cube: &CubeModel) -> Vec<Dimension> {
        DimensionShape::of(cube).multi_dimensions()
    }
}

/// Pie chart: one multi-element dimension, non-negative numeric values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PieChartRule {
    max_slices: usize,
}

impl PieChartRule {
    /// Create the rule
    #[must_use]
    pub fn new(config: &RuleConfig) -> Self {
        Self {
            max_slices: config.max_pie_slices,
        }
    }
}

impl ChartRule for PieChartRule {
    fn kind(&self) -> ChartKind {
        ChartKind::PieChart
    }

    fn is_satisfied_with(&self, cube: &CubeModel, shape: &DimensionShape) -> bool {
        let measure = cube.default_measure().id.as_str();
        shape.multi.len() == 1
            && cube
                .observations()
                .iter()
                .filter_map(|o| o.value_of(measure))
                .all(|v| v.as_f64().is_some_and(|v| v >= 0.0))
    }

    fn score_with(&self, cube: &CubeModel, shape: &DimensionShape) -> f64 {
        if !self.is_satisfied_with(cube, shape) {
            return 0.0;
        }
        match shape.multi_counts().as_slice() {
            &[slices] if slices > self.max_slices => ratio(self.max_slices, slices),
            _ => 1.0,
        }
    }
}

/// Heatmap: two multi-element dimensions, scored by grid fill
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HeatmapRule;

impl ChartRule for HeatmapRule {
    fn kind(&self) -> ChartKind {
        ChartKind::Heatmap
    }

    fn is_satisfied_with(&self, _cube: &CubeModel, shape: &DimensionShape) -> bool {
        shape.multi.len() == 2
    }

    fn score_with(&self, cube: &CubeModel, shape: &DimensionShape) -> f64 {
        let counts = shape.multi_counts();
        let &[rows, cols] = counts.as_slice() else {
            return 0.0;
        };
        let fill = ratio(cube.observations().len(), rows * cols).min(1.0);
        0.9 * fill
    }
}

/// Bar chart: one multi-element dimension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BarChartRule {
    max_bars: usize,
}

impl BarChartRule {
    /// Create the rule
    #[must_use]
    pub fn new(config: &RuleConfig) -> Self {
        Self {
            max_bars: config.max_bars,
        }
    }
}

impl ChartRule for BarChartRule {
    fn kind(&self) -> ChartKind {
        ChartKind::BarChart
    }

    fn is_satisfied_with(&self, _cube: &CubeModel, shape: &DimensionShape) -> bool {
        shape.multi.len() == 1
    }

    fn score_with(&self, _cube: &CubeModel, shape: &DimensionShape) -> f64 {
        match shape.multi_counts().as_slice() {
            &[bars] if bars <= self.max_bars => 0.8,
            [_] => 0.4,
            _ => 0.0,
        }
    }
}

/// Grouped stacked bar: two multi-element dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupedStackedBarRule {
    max_groups: usize,
}

impl GroupedStackedBarRule {
    /// Create the rule
    #[must_use]
    pub fn new(config: &RuleConfig) -> Self {
        Self {
            max_groups: config.max_stack_groups,
        }
    }
}

impl ChartRule for GroupedStackedBarRule {
    fn kind(&self) -> ChartKind {
        ChartKind::GroupedStackedBar
    }

    fn is_satisfied_with(&self, _cube: &CubeModel, shape: &DimensionShape) -> bool {
        shape.multi.len() == 2
    }

    fn score_with(&self, _cube: &CubeModel, shape: &DimensionShape) -> f64 {
        match shape.multi_counts().as_slice() {
            &[a, b] if a.min(b) <= self.max_groups => 0.7,
            [_, _] => 0.35,
            _ => 0.0,
        }
    }
}

/// The closed set of rules
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// See [`PieChartRule`]
    PieChart(PieChartRule),
    /// See [`HeatmapRule`]
    Heatmap(HeatmapRule),
    /// See [`BarChartRule`]
    BarChart(BarChartRule),
    /// See [`GroupedStackedBarRule`]
    GroupedStackedBar(GroupedStackedBarRule),
}

impl Rule {
    /// Rule for a chart kind
    #[must_use]
    pub fn for_kind(kind: ChartKind, config: &RuleConfig) -> Self {
        match kind {
            ChartKind::PieChart => Self::PieChart(PieChartRule::new(config)),
            ChartKind::Heatmap => Self::Heatmap(HeatmapRule),
            ChartKind::BarChart => Self::BarChart(BarChartRule::new(config)),
            ChartKind::GroupedStackedBar => Self::GroupedStackedBar(GroupedStackedBarRule::new(config)),
        }
    }
}

impl ChartRule for Rule {
    fn kind(&self) -> ChartKind {
        match self {
            Self::PieChart(rule) => rule.kind(),
            Self::Heatmap(rule) => rule.kind(),
            Self::BarChart(rule) => rule.kind(),
            Self::GroupedStackedBar(rule) => rule.kind(),
        }
    }

    fn is_satisfied_with(&self, cube: &CubeModel, shape: &DimensionShape) -> bool {
        match self {
            Self::PieChart(rule) => rule.is_satisfied_with(cube, shape),
            Self::Heatmap(rule) => rule.is_satisfied_with(cube, shape),
            Self::BarChart(rule) => rule.is_satisfied_with(cube, shape),
            Self::GroupedStackedBar(rule) => rule.is_satisfied_with(cube, shape),
        }
    }

    fn score_with(&self, cube: &CubeModel, shape: &DimensionShape) -> f64 {
        match self {
            Self::PieChart(rule) => rule.score_with(cube, shape),
            Self::Heatmap(rule) => rule.score_with(cube, shape),
            Self::BarChart(rule) => rule.score_with(cube, shape),
            Self::GroupedStackedBar(rule) => rule.score_with(cube, shape),
        }
    }
}

#[allow(clippy::cast_precision_loss)]
fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}
