//! Cube components: dataset, structure definition, dimensions, measures,
//! attributes and their elements

use crate::node::Node;
use crate::uri::Uri;
use serde::{Deserialize, Serialize};

macro_rules! labelled_resource {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name {
            /// Resource identifier
            pub id: Uri,
            /// Label in the preferred language, if the store has one
            #[serde(default, skip_serializing_if = "Option::is_none")]
            pub label: Option<String>,
        }

        impl $name {
            /// Create an unlabelled resource
            #[inline]
            #[must_use]
            pub fn new(id: impl Into<Uri>) -> Self {
                Self {
                    id: id.into(),
                    label: None,
                }
            }

            /// Set the label
            #[inline]
            #[must_use]
            pub fn with_label(mut self, label: impl Into<String>) -> Self {
                self.label = Some(label.into());
                self
            }

            /// Build from a structured node
            #[must_use]
            pub fn from_node(node: &Node, language: &str) -> Self {
                Self {
                    id: node.id.clone(),
                    label: node.label(language).map(str::to_string),
                }
            }

            /// Label, or the identifier's local name when unlabelled
            #[inline]
            #[must_use]
            pub fn display_label(&self) -> &str {
                self.label.as_deref().unwrap_or_else(|| self.id.local_name())
            }
        }
    };
}

labelled_resource!(
    /// Root resource of a cube (`qb:DataSet`)
    Dataset
);

labelled_resource!(
    /// Structural schema of a dataset (`qb:DataStructureDefinition`)
    DataStructureDefinition
);

labelled_resource!(
    /// Classification axis (`qb:DimensionProperty`)
    Dimension
);

labelled_resource!(
    /// Quantified property observed per data point (`qb:MeasureProperty`)
    Measure
);

labelled_resource!(
    /// Qualifying property of observations (`qb:AttributeProperty`)
    Attribute
);

/// A value along a [`Dimension`], e.g. `2001` on a year axis
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DimensionElement {
    /// Element identifier
    pub id: Uri,
    /// Display label (falls back to the identifier)
    pub label: String,
    /// Owning dimension
    pub dimension: Uri,
}

impl DimensionElement {
    /// Create an element
    #[inline]
    #[must_use]
    pub fn new(id: impl Into<Uri>, label: impl Into<String>, dimension: impl Into<Uri>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            dimension: dimension.into(),
        }
    }

    /// Build from a node fetched for `dimension`
    #[must_use]
    pub fn from_node(node: &Node, dimension: &Uri, language: &str) -> Self {
        Self {
            id: node.id.clone(),
            label: node
                .label(language)
                .map_or_else(|| node.id.to_string(), str::to_string),
            dimension: dimension.clone(),
        }
    }
}

/// A value of an [`Attribute`], e.g. a unit of measure
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AttributeElement {
    /// Element identifier
    pub id: Uri,
    /// Display label (falls back to the identifier)
    pub label: String,
    /// Owning attribute
    pub attribute: Uri,
}

impl AttributeElement {
    /// Create an element
    #[inline]
    #[must_use]
    pub fn new(id: impl Into<Uri>, label: impl Into<String>, attribute: impl Into<Uri>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            attribute: attribute.into(),
        }
    }

    /// Build from a node fetched for `attribute`
    #[must_use]
    pub fn from_node(node: &Node, attribute: &Uri, language: &str) -> Self {
        Self {
            id: node.id.clone(),
            label: node
                .label(language)
                .map_or_else(|| node.id.to_string(), str::to_string),
            attribute: attribute.clone(),
        }
    }
}
