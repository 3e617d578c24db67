//! Ranking charts for a cube
//!
//! A [`Context`] holds named [`Complex`]es; a complex is a list of rules
//! evaluated together. [`determine_charts`] evaluates every complex of a
//! context against a cube and ranks the results by score.

use crate::rule::{ChartRule, DimensionShape, Rule, RuleConfig};
use crate::kind::ChartKind;
use cubeviz_model::{CubeModel, Dimension};
use serde::Serialize;

/// Name of the default complex
pub const COMPARISON: &str = "comparison";

/// Outcome of one rule on one cube
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    /// Complex the rule was evaluated in
    #[serde(skip_serializing_if = "Option::is_none")]
    pub complex: Option<String>,
    /// Recommended chart
    pub name: ChartKind,
    /// Fit in `[0, 1]`
    pub score: f64,
    /// Whether the chart can show the cube at all
    pub is_satisfied: bool,
    /// Dimensions with exactly one used element
    pub single_element_dimensions: Vec<Dimension>,
    /// Dimensions with several used elements
    pub multi_element_dimensions: Vec<Dimension>,
}

impl Recommendation {
    /// Evaluate `rule` on `cube`
    #[must_use]
    pub fn evaluate(rule: &impl ChartRule, cube: &CubeModel) -> Self {
        Self::evaluate_with(rule, cube, &DimensionShape::of(cube))
    }

    /// Evaluate `rule` on `cube`, whose shape is already known
    #[must_use]
    pub fn evaluate_with(rule: &impl ChartRule, cube: &CubeModel, shape: &DimensionShape) -> Self {
        Self {
            complex: None,
            name: rule.kind(),
            score: rule.score_with(cube, shape),
            is_satisfied: rule.is_satisfied_with(cube, shape),
            single_element_dimensions: shape.single.clone(),
            multi_element_dimensions: shape.multi_dimensions(),
        }
    }

    /// Tag with the complex it came from
    #[inline]
    #[must_use]
    pub fn in_complex(mut self, complex: impl Into<String>) -> Self {
        self.complex = Some(complex.into());
        self
    }
}

/// Named group of rules
#[derive(Debug, Clone, PartialEq)]
pub struct Complex {
    /// Complex name
    pub name: String,
    /// Rules in evaluation order
    pub rules: Vec<Rule>,
}

impl Complex {
    /// Create a complex
    #[must_use]
    pub fn new(name: impl Into<String>, rules: Vec<Rule>) -> Self {
        Self {
            name: name.into(),
            rules,
        }
    }

    /// Pie chart and heatmap, compared against each other
    #[must_use]
    pub fn comparison(config: &RuleConfig) -> Self {
        Self::new(
            COMPARISON,
            vec![
                Rule::for_kind(ChartKind::PieChart, config),
                Rule::for_kind(ChartKind::Heatmap, config),
            ],
        )
    }

    /// Evaluate every rule, in rule order
    #[must_use]
    pub fn evaluate(&self, cube: &CubeModel) -> Vec<Recommendation> {
        self.evaluate_with(cube, &DimensionShape::of(cube))
    }

    fn evaluate_with(&self, cube: &CubeModel, shape: &DimensionShape) -> Vec<Recommendation> {
        self.rules
            .iter()
            .map(|rule| Recommendation::evaluate_with(rule, cube, shape).in_complex(self.name.clone()))
            .collect()
    }
}

/// Set of complexes charts are chosen from
#[derive(Debug, Clone, PartialEq)]
pub struct Context {
    /// Context name
    pub name: String,
    /// Free-form description
    pub description: String,
    /// Complexes in evaluation order
    pub complexes: Vec<Complex>,
}

impl Context {
    /// Create a context
    #[must_use]
    pub fn new(name: impl Into<String>, description: impl Into<String>, complexes: Vec<Complex>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            complexes,
        }
    }

    /// Default context with rule thresholds from `config`
    #[must_use]
    pub fn with_config(config: &RuleConfig) -> Self {
        Self::new(
            "default",
            "Compares a pie chart against a heatmap.",
            vec![Complex::comparison(config)],
        )
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::with_config(&RuleConfig::default())
    }
}

/// Evaluate `rules` on `cube`, best first
///
/// Equal scores keep rule order.
#[must_use]
pub fn recommend(rules: &[Rule], cube: &CubeModel) -> Vec<Recommendation> {
    let shape = DimensionShape::of(cube);
    let mut recommendations: Vec<Recommendation> = rules
        .iter()
        .map(|rule| Recommendation::evaluate_with(rule, cube, &shape))
        .collect();
    rank(&mut recommendations);
    recommendations
}

/// Evaluate every complex of `context` on `cube`, best first
///
/// Without a cube there is nothing to recommend. Equal scores keep complex
/// order, then rule order.
#[must_use]
pub fn determine_charts(context: &Context, cube: Option<&CubeModel>) -> Vec<Recommendation> {
    let Some(cube) = cube else {
        return Vec::new();
    };

    let shape = DimensionShape::of(cube);
    let mut recommendations: Vec<Recommendation> = context
        .complexes
        .iter()
        .flat_map(|complex| complex.evaluate_with(cube, &shape))
        .collect();
    rank(&mut recommendations);

    tracing::debug!(
        context = %context.name,
        evaluated = recommendations.len(),
        best = recommendations.first().map(|r| r.name.as_str()),
        "determined charts"
    );
    recommendations
}

fn rank(recommendations: &mut [Recommendation]) {
    recommendations.sort_by(|a, b| b.score.total_cmp(&a.score));
}

/// Recommendation engine bound to one context
#[derive(Debug, Clone, Default)]
pub struct RecommendationEngine {
    context: Context,
}

impl RecommendationEngine {
    /// Create an engine for `context`
    #[inline]
    #[must_use]
    pub fn new(context: Context) -> Self {
        Self { context }
    }

    /// Engine over the default context with the given thresholds
    #[must_use]
    pub fn from_config(config: &RuleConfig) -> Self {
        Self::new(Context::with_config(config))
    }

    /// Context in use
    #[inline]
    #[must_use]
    pub fn context(&self) -> &Context {
        &self.context
    }

    /// See [`determine_charts`]
    #[must_use]
    pub fn determine_charts(&self, cube: Option<&CubeModel>) -> Vec<Recommendation> {
        determine_charts(&self.context, cube)
    }

    /// Best satisfied recommendation, if any
    #[must_use]
    pub fn best(&self, cube: &CubeModel) -> Option<Recommendation> {
        self.determine_charts(Some(cube)).into_iter().find(|r| r.is_satisfied)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cubeviz_test_utils::{grid_cube, sample_cube};
    use pretty_assertions::assert_eq;

    #[test]
    fn no_cube_no_charts() {
        assert!(determine_charts(&Context::default(), None).is_empty());
        assert!(RecommendationEngine::default().determine_charts(None).is_empty());
    }

    #[test]
    fn default_context_ranks_pie_over_heatmap_for_one_axis() {
        let charts = determine_charts(&Context::default(), Some(&sample_cube()));
        let names: Vec<&str> = charts.iter().map(|r| r.name.as_str()).collect();

        assert_eq!(names, vec!["pieChart", "heatmap"]);
        assert_eq!(charts[0].score, 1.0);
        assert!(charts[0].is_satisfied);
        assert_eq!(charts[0].complex.as_deref(), Some(COMPARISON));
        assert_eq!(charts[1].score, 0.0);
        assert!(!charts[1].is_satisfied);
        assert_eq!(charts[0].multi_element_dimensions.len(), 1);
        assert_eq!(charts[0].single_element_dimensions.len(), 1);
    }

    #[test]
    fn heatmap_wins_for_two_axes() {
        let charts = determine_charts(&Context::default(), Some(&grid_cube(3, 3, |_, _| true)));
        assert_eq!(charts[0].name, ChartKind::Heatmap);
        assert_eq!(charts[1].name, ChartKind::PieChart);
    }

    #[test]
    fn equal_scores_keep_application_order() {
        let config = RuleConfig::default();
        // neither rule is satisfied by a two-axis cube, both score zero
        let rules = [
            Rule::for_kind(ChartKind::BarChart, &config),
            Rule::for_kind(ChartKind::PieChart, &config),
        ];
        let ranked = recommend(&rules, &grid_cube(2, 2, |_, _| true));
        let names: Vec<ChartKind> = ranked.iter().map(|r| r.name).collect();
        assert_eq!(names, vec![ChartKind::BarChart, ChartKind::PieChart]);
        assert!(ranked.iter().all(|r| r.complex.is_none()));
    }

    #[test]
    fn complexes_concatenate_before_ranking() {
        let config = RuleConfig::default();
        let context = Context::new(
            "all",
            "every chart",
            vec![
                Complex::comparison(&config),
                Complex::new(
                    "bars",
                    vec![
                        Rule::for_kind(ChartKind::BarChart, &config),
                        Rule::for_kind(ChartKind::GroupedStackedBar, &config),
                    ],
                ),
            ],
        );
        let charts = determine_charts(&context, Some(&grid_cube(5, 1, |_, _| true)));
        let ranked: Vec<(&str, &str)> = charts
            .iter()
            .map(|r| (r.complex.as_deref().unwrap_or(""), r.name.as_str()))
            .collect();
        assert_eq!(
            ranked,
            vec![
                ("comparison", "pieChart"),
                ("bars", "barChart"),
                ("comparison", "heatmap"),
                ("bars", "groupedStackedBar"),
            ]
        );
    }

    #[test]
    fn best_skips_unsatisfied() {
        let engine = RecommendationEngine::from_config(&RuleConfig::default());
        let best = engine.best(&sample_cube()).unwrap();
        assert_eq!(best.name, ChartKind::PieChart);

        let flat = grid_cube(1, 1, |_, _| true);
        assert!(engine.best(&flat).is_none());
    }

    #[test]
    fn large_cube_is_ranked() {
        // 22 350 observations, the diagonal left empty
        let cube = grid_cube(150, 150, |r, c| r != c);
        let started = std::time::Instant::now();
        let charts = determine_charts(&Context::default(), Some(&cube));
        let elapsed = started.elapsed();

        assert_eq!(charts[0].name, ChartKind::Heatmap);
        let expected = 0.9 * (150.0 * 149.0) / (150.0 * 150.0);
        assert!((charts[0].score - expected).abs() < 1e-9);
        assert_eq!(charts[0].multi_element_dimensions.len(), 2);
        assert!(elapsed < std::time::Duration::from_secs(2), "ranking took {elapsed:?}");
    }

    #[test]
    fn serializes_camel_case() {
        let charts = determine_charts(&Context::default(), Some(&sample_cube()));
        let json = serde_json::to_value(&charts[0]).unwrap();
        assert_eq!(json["name"], "pieChart");
        assert_eq!(json["isSatisfied"], true);
        assert_eq!(json["complex"], "comparison");
        assert!(json["multiElementDimensions"].is_array());
    }
}
