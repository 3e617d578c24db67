//! Observations: single data points of a cube

use crate::error::ModelError;
use crate::node::{Literal, Node, Term};
use crate::uri::Uri;
use im::{OrdMap, Vector};
use serde::{Deserialize, Serialize};

/// Value of a measure on one observation
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MeasureValue {
    /// Lexical form as stored
    pub lexical: String,
    /// Datatype IRI, if typed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub datatype: Option<String>,
}

impl MeasureValue {
    /// Untyped value
    #[inline]
    #[must_use]
    pub fn new(lexical: impl Into<String>) -> Self {
        Self {
            lexical: lexical.into(),
            datatype: None,
        }
    }

    /// Typed value
    #[inline]
    #[must_use]
    pub fn typed(lexical: impl Into<String>, datatype: impl Into<String>) -> Self {
        Self {
            lexical: lexical.into(),
            datatype: Some(datatype.into()),
        }
    }

    /// Numeric interpretation of the lexical form
    #[inline]
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        self.lexical.trim().parse::<f64>().ok().filter(|v| v.is_finite())
    }
}

impl From<&Literal> for MeasureValue {
    fn from(literal: &Literal) -> Self {
        Self {
            lexical: literal.value.clone(),
            datatype: literal.datatype.clone(),
        }
    }
}

impl From<f64> for MeasureValue {
    fn from(value: f64) -> Self {
        Self::new(value.to_string())
    }
}

/// One data point: dimension coordinates, measure values and attributes
///
/// Holds at most one element per dimension.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Observation {
    /// Observation identifier
    pub id: Uri,
    dimension_elements: OrdMap<Uri, Uri>,
    measure_values: OrdMap<Uri, MeasureValue>,
    attribute_elements: OrdMap<Uri, Vector<Uri>>,
}

impl Observation {
    /// Create an observation without coordinates or values
    #[inline]
    #[must_use]
    pub fn new(id: impl Into<Uri>) -> Self {
        Self {
            id: id.into(),
            dimension_elements: OrdMap::new(),
            measure_values: OrdMap::new(),
            attribute_elements: OrdMap::new(),
        }
    }

    /// Set the element on a dimension (replaces any previous one)
    #[must_use]
    pub fn with_element(mut self, dimension: impl Into<Uri>, element: impl Into<Uri>) -> Self {
        self.dimension_elements.insert(dimension.into(), element.into());
        self
    }

    /// Set a measure value
    #[must_use]
    pub fn with_measure(mut self, measure: impl Into<Uri>, value: impl Into<MeasureValue>) -> Self {
        self.measure_values.insert(measure.into(), value.into());
        self
    }

    /// Add an attribute element
    #[must_use]
    pub fn with_attribute(mut self, attribute: impl Into<Uri>, element: impl Into<Uri>) -> Self {
        let element = element.into();
        let entry = self.attribute_elements.entry(attribute.into()).or_insert_with(Vector::new);
        if !entry.contains(&element) {
            entry.push_back(element);
        }
        self
    }

    /// Build from an Observation node
    ///
    /// Only predicates naming one of the given components are read. Literal
    /// values on dimensions and attributes are skipped, since elements are
    /// resources.
    ///
    /// # Errors
    /// [`ModelError::AmbiguousObservation`] when the node has two different
    /// elements on one dimension.
    pub fn from_node(
        node: &Node,
        dimensions: &[Uri],
        measures: &[Uri],
        attributes: &[Uri],
    ) -> Result<Self, ModelError> {
        let mut observation = Self::new(node.id.clone());

        for dimension in dimensions {
            let mut elements = node.references(dimension.as_str());
            if let Some(element) = elements.next() {
                if elements.next().is_some() {
                    return Err(ModelError::AmbiguousObservation {
                        observation: node.id.clone(),
                        dimension: dimension.clone(),
                    });
                }
                observation
                    .dimension_elements
                    .insert(dimension.clone(), element.clone());
            } else if node.literals(dimension.as_str()).next().is_some() {
                tracing::warn!(
                    observation = %node.id,
                    dimension = %dimension,
                    "skipping literal dimension value"
                );
            }
        }

        for measure in measures {
            if let Some(literal) = node.literals(measure.as_str()).next() {
                observation
                    .measure_values
                    .insert(measure.clone(), MeasureValue::from(literal));
            }
        }

        for attribute in attributes {
            for term in node.values(attribute.as_str()) {
                if let Term::Node { id } = term {
                    observation = observation.with_attribute(attribute.clone(), id.clone());
                }
            }
        }

        Ok(observation)
    }

    /// Element on a dimension
    #[inline]
    #[must_use]
    pub fn element_on(&self, dimension: &str) -> Option<&Uri> {
        self.dimension_elements.get(dimension)
    }

    /// Value of a measure
    #[inline]
    #[must_use]
    pub fn value_of(&self, measure: &str) -> Option<&MeasureValue> {
        self.measure_values.get(measure)
    }

    /// Elements carried for an attribute
    pub fn attribute_elements_of<'a>(&'a self, attribute: &str) -> impl Iterator<Item = &'a Uri> + 'a {
        self.attribute_elements
            .get(attribute)
            .into_iter()
            .flat_map(|elements| elements.iter())
    }

    /// All (dimension, element) coordinates
    pub fn coordinates(&self) -> impl Iterator<Item = (&Uri, &Uri)> {
        self.dimension_elements.iter()
    }

    /// All (measure, value) pairs
    pub fn measure_values(&self) -> impl Iterator<Item = (&Uri, &MeasureValue)> {
        self.measure_values.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const COUNTRY: &str = "http://ex/dim/country";
    const DEATHS: &str = "http://ex/measure/deaths";
    const UNIT: &str = "http://ex/attr/unit";

    fn uris(values: &[&str]) -> Vec<Uri> {
        values.iter().copied().map(Uri::from).collect()
    }

    #[test]
    fn measure_value_numeric() {
        assert_eq!(MeasureValue::new("80.000").as_f64(), Some(80.0));
        assert_eq!(MeasureValue::new(" 12 ").as_f64(), Some(12.0));
        assert_eq!(MeasureValue::new("n/a").as_f64(), None);
        assert_eq!(MeasureValue::new("NaN").as_f64(), None);
    }

    #[test]
    fn from_node_reads_declared_components_only() {
        let node = Node::new("http://ex/obs/1")
            .with(COUNTRY, Term::node("http://ex/country/en"))
            .with(DEATHS, Term::Literal(Literal::plain("80")))
            .with(UNIT, Term::node("http://ex/unit/persons"))
            .with("http://ex/other", Term::node("http://ex/ignored"));

        let obs = Observation::from_node(&node, &uris(&[COUNTRY]), &uris(&[DEATHS]), &uris(&[UNIT]))
            .unwrap();

        assert_eq!(obs.element_on(COUNTRY).unwrap(), "http://ex/country/en");
        assert_eq!(obs.value_of(DEATHS).and_then(MeasureValue::as_f64), Some(80.0));
        assert_eq!(obs.attribute_elements_of(UNIT).count(), 1);
        assert_eq!(obs.coordinates().count(), 1);
    }

    #[test]
    fn from_node_rejects_two_elements_on_one_dimension() {
        let node = Node::new("http://ex/obs/1")
            .with(COUNTRY, Term::node("http://ex/country/en"))
            .with(COUNTRY, Term::node("http://ex/country/de"));

        let err = Observation::from_node(&node, &uris(&[COUNTRY]), &[], &[]).unwrap_err();
        assert!(matches!(err, ModelError::AmbiguousObservation { .. }));
    }

    #[test]
    fn literal_dimension_values_are_skipped() {
        let node = Node::new("http://ex/obs/1").with(COUNTRY, Term::Literal(Literal::plain("en")));
        let obs = Observation::from_node(&node, &uris(&[COUNTRY]), &[], &[]).unwrap();
        assert!(obs.element_on(COUNTRY).is_none());
    }
}
