//! CubeViz Recommend
//!
//! Chart recommendation and chart data conversion for data cubes.
//!
//! # Core Concepts
//!
//! - [`Rule`]: heuristic deciding whether a chart fits a cube, and how well
//! - [`Context`]: named [`Complex`]es of rules evaluated together
//! - [`RecommendationEngine`]: ranks a context's charts for a cube
//! - [`convert`]: turns a cube into the data one chart needs
//!
//! # Example
//!
//! ```rust,ignore
//! use cubeviz_recommend::{convert, RecommendationEngine, Visual};
//!
//! let engine = RecommendationEngine::default();
//! if let Some(best) = engine.best(&cube) {
//!     let data = convert(&Visual::from(&best), &cube)?;
//! }
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod chart;
pub mod engine;
pub mod error;
pub mod kind;
pub mod rule;

// Re-exports
pub use chart::{convert, ChartData, Visual};
pub use engine::{determine_charts, recommend, Complex, Context, Recommendation, RecommendationEngine};
pub use error::ChartError;
pub use kind::ChartKind;
pub use rule::{ChartRule, DimensionShape, Rule, RuleConfig};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
