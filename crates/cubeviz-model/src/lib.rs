//! CubeViz Model
//!
//! Normalized, immutable representation of an RDF Data Cube.
//!
//! # Core Concepts
//!
//! - [`Node`]: structured graph node, the form store responses are parsed into
//! - [`CubeModel`]: dataset, structure, dimensions, measures, attributes,
//!   element indices and observations
//! - [`SelectionFilter`]: derives a narrowed cube from a selection of
//!   dimension elements
//!
//! # Example
//!
//! ```rust,ignore
//! use cubeviz_model::{CubeModel, SelectionFilter};
//!
//! let england = cube.element("http://example.org/country/england").unwrap().clone();
//! let sub_cube = SelectionFilter::sub_cube(&[england], &cube);
//! assert!(sub_cube.observations().len() <= cube.observations().len());
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod component;
pub mod cube;
pub mod error;
pub mod node;
pub mod observation;
pub mod selection;
pub mod uri;
pub mod vocab;

// Re-exports
pub use component::{
    Attribute, AttributeElement, DataStructureDefinition, Dataset, Dimension, DimensionElement,
    Measure,
};
pub use cube::{CubeModel, CubeModelBuilder};
pub use error::ModelError;
pub use node::{Literal, Node, Term};
pub use observation::{MeasureValue, Observation};
pub use selection::{AttributeFilter, SelectionFilter};
pub use uri::Uri;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
