//! The normalized cube model
//!
//! [`CubeModel`] is immutable once built. It is made of persistent
//! collections, so deriving a filtered cube shares structure with its source
//! instead of copying it, and any number of readers can hold the same cube.

use crate::component::{
    Attribute, AttributeElement, DataStructureDefinition, Dataset, Dimension, DimensionElement,
    Measure,
};
use crate::error::ModelError;
use crate::observation::{MeasureValue, Observation};
use crate::uri::Uri;
use im::{HashMap, OrdMap, Vector};
use serde::Serialize;
use std::collections::HashSet;

/// A complete data cube: structure, element indices and observations
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CubeModel {
    dataset: Dataset,
    dsd: DataStructureDefinition,
    default_measure: Measure,
    measures: Vector<Measure>,
    /// Every dimension declared by the structure, in discovery order
    structure_dimensions: Vector<Dimension>,
    /// Active dimensions; equal to the structure dimensions until filtered
    dimensions: Vector<Dimension>,
    dimension_elements: OrdMap<Uri, Vector<DimensionElement>>,
    attributes: Vector<Attribute>,
    attribute_elements: OrdMap<Uri, Vector<AttributeElement>>,
    observations: Vector<Observation>,
    selection: Vector<DimensionElement>,
    /// Element identifier to every (dimension, position) it appears at
    #[serde(skip)]
    element_index: HashMap<Uri, Vector<(Uri, usize)>>,
}

impl CubeModel {
    /// Start building a cube for a dataset and its structure definition
    #[inline]
    #[must_use]
    pub fn builder(dataset: Dataset, dsd: DataStructureDefinition) -> CubeModelBuilder {
        CubeModelBuilder::new(dataset, dsd)
    }

    /// Root dataset
    #[inline]
    #[must_use]
    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    /// Structure definition
    #[inline]
    #[must_use]
    pub fn dsd(&self) -> &DataStructureDefinition {
        &self.dsd
    }

    /// Measure used for filtering and charting (first discovered)
    #[inline]
    #[must_use]
    pub fn default_measure(&self) -> &Measure {
        &self.default_measure
    }

    /// All declared measures
    #[inline]
    #[must_use]
    pub fn measures(&self) -> &Vector<Measure> {
        &self.measures
    }

    /// Active dimensions
    #[inline]
    #[must_use]
    pub fn dimensions(&self) -> &Vector<Dimension> {
        &self.dimensions
    }

    /// Every dimension declared by the structure
    #[inline]
    #[must_use]
    pub fn structure_dimensions(&self) -> &Vector<Dimension> {
        &self.structure_dimensions
    }

    /// Declared attributes
    #[inline]
    #[must_use]
    pub fn attributes(&self) -> &Vector<Attribute> {
        &self.attributes
    }

    /// Observations
    #[inline]
    #[must_use]
    pub fn observations(&self) -> &Vector<Observation> {
        &self.observations
    }

    /// Selection this cube was derived with (empty for an imported cube)
    #[inline]
    #[must_use]
    pub fn selection(&self) -> &Vector<DimensionElement> {
        &self.selection
    }

    /// Element index keyed by dimension identifier
    #[inline]
    #[must_use]
    pub fn dimension_element_index(&self) -> &OrdMap<Uri, Vector<DimensionElement>> {
        &self.dimension_elements
    }

    /// Declared dimension by identifier
    #[must_use]
    pub fn dimension(&self, id: &str) -> Option<&Dimension> {
        self.structure_dimensions.iter().find(|d| d.id == id)
    }

    /// Owning dimension of an element
    #[inline]
    #[must_use]
    pub fn dimension_of(&self, element: &DimensionElement) -> Option<&Dimension> {
        self.dimension(element.dimension.as_str())
    }

    /// Elements of a dimension, in discovery order
    pub fn elements_of<'a>(&'a self, dimension: &str) -> impl Iterator<Item = &'a DimensionElement> + 'a {
        self.dimension_elements
            .get(dimension)
            .into_iter()
            .flat_map(|elements| elements.iter())
    }

    /// Position of an element within the element list of `dimension`
    #[must_use]
    pub fn element_position(&self, dimension: &str, element: &str) -> Option<usize> {
        self.element_index
            .get(element)?
            .iter()
            .find(|(d, _)| d == dimension)
            .map(|(_, position)| *position)
    }

    /// Element of `dimension` by identifier
    #[must_use]
    pub fn element_on(&self, dimension: &str, element: &str) -> Option<&DimensionElement> {
        let position = self.element_position(dimension, element)?;
        self.dimension_elements.get(dimension)?.get(position)
    }

    /// Every dimension's element with this identifier
    ///
    /// Dimensions that share a code list hold elements with the same
    /// identifier; they come back in the order their elements were added.
    #[must_use]
    pub fn elements_named(&self, id: &str) -> Vec<&DimensionElement> {
        self.element_index
            .get(id)
            .into_iter()
            .flat_map(|positions| positions.iter())
            .filter_map(|(dimension, position)| self.dimension_elements.get(dimension)?.get(*position))
            .collect()
    }

    /// Dimension element by identifier
    ///
    /// When several dimensions hold the identifier this is the first of
    /// [`CubeModel::elements_named`]; use [`CubeModel::element_on`] to pick one.
    #[must_use]
    pub fn element(&self, id: &str) -> Option<&DimensionElement> {
        self.elements_named(id).into_iter().next()
    }

    /// Declared measure by identifier
    #[must_use]
    pub fn measure(&self, id: &str) -> Option<&Measure> {
        self.measures.iter().find(|m| m.id == id)
    }

    /// Declared attribute by identifier
    #[must_use]
    pub fn attribute(&self, id: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.id == id)
    }

    /// Elements of an attribute, in discovery order
    pub fn attribute_elements_of<'a>(&'a self, attribute: &str) -> impl Iterator<Item = &'a AttributeElement> + 'a {
        self.attribute_elements
            .get(attribute)
            .into_iter()
            .flat_map(|elements| elements.iter())
    }

    /// Resolved elements of an observation on the given dimensions
    ///
    /// Coordinates whose element is missing from the index are skipped.
    #[must_use]
    pub fn observation_elements(
        &self,
        observation: &Observation,
        dimensions: &[Dimension],
    ) -> Vec<&DimensionElement> {
        dimensions
            .iter()
            .filter_map(|d| {
                let id = observation.element_on(d.id.as_str())?;
                self.element_on(d.id.as_str(), id.as_str())
            })
            .collect()
    }

    /// Values of an observation for the given measures, in measure order
    #[must_use]
    pub fn observation_values<'a>(
        &self,
        observation: &'a Observation,
        measures: &'a [Measure],
    ) -> Vec<(&'a Measure, &'a MeasureValue)> {
        measures
            .iter()
            .filter_map(|m| observation.value_of(m.id.as_str()).map(|v| (m, v)))
            .collect()
    }

    /// Resolved attribute elements of an observation for the given attributes
    ///
    /// References the attribute index does not know are skipped.
    #[must_use]
    pub fn observation_attribute_elements(
        &self,
        observation: &Observation,
        attributes: &[Attribute],
    ) -> Vec<&AttributeElement> {
        attributes
            .iter()
            .flat_map(|a| {
                observation.attribute_elements_of(a.id.as_str()).filter_map(move |id| {
                    self.attribute_elements_of(a.id.as_str()).find(|e| e.id == *id)
                })
            })
            .collect()
    }

    /// Distinct elements the observations use on a dimension, first-seen order
    #[must_use]
    pub fn observed_elements(&self, dimension: &str) -> Vec<&Uri> {
        let mut seen = HashSet::new();
        self.observations
            .iter()
            .filter_map(|o| o.element_on(dimension))
            .filter(|element| seen.insert(*element))
            .collect()
    }

    /// Numeric value of the default measure on an observation
    #[inline]
    #[must_use]
    pub fn default_value(&self, observation: &Observation) -> Option<f64> {
        observation
            .value_of(self.default_measure.id.as_str())
            .and_then(MeasureValue::as_f64)
    }

    /// Derive a cube with new active dimensions and observations
    ///
    /// Element indices, measures and attributes are shared with `self`.
    #[must_use]
    pub(crate) fn derive(
        &self,
        selection: Vector<DimensionElement>,
        dimensions: Vector<Dimension>,
        observations: Vector<Observation>,
    ) -> Self {
        Self {
            dimensions,
            observations,
            selection,
            ..self.clone()
        }
    }
}

/// Builder for [`CubeModel`]
///
/// Validation happens once, in [`CubeModelBuilder::build`].
#[derive(Debug, Clone)]
pub struct CubeModelBuilder {
    dataset: Dataset,
    dsd: DataStructureDefinition,
    measures: Vec<Measure>,
    dimensions: Vec<Dimension>,
    dimension_elements: Vec<(Uri, Vec<DimensionElement>)>,
    attributes: Vec<Attribute>,
    attribute_elements: Vec<(Uri, Vec<AttributeElement>)>,
    observations: Vec<Observation>,
}

impl CubeModelBuilder {
    /// Create an empty builder
    #[must_use]
    pub fn new(dataset: Dataset, dsd: DataStructureDefinition) -> Self {
        Self {
            dataset,
            dsd,
            measures: Vec::new(),
            dimensions: Vec::new(),
            dimension_elements: Vec::new(),
            attributes: Vec::new(),
            attribute_elements: Vec::new(),
            observations: Vec::new(),
        }
    }

    /// Add a measure; the first one added becomes the default measure
    #[must_use]
    pub fn measure(mut self, measure: Measure) -> Self {
        self.measures.push(measure);
        self
    }

    /// Add measures
    #[must_use]
    pub fn measures(mut self, measures: impl IntoIterator<Item = Measure>) -> Self {
        self.measures.extend(measures);
        self
    }

    /// Add a dimension
    #[must_use]
    pub fn dimension(mut self, dimension: Dimension) -> Self {
        self.dimensions.push(dimension);
        self
    }

    /// Add dimensions
    #[must_use]
    pub fn dimensions(mut self, dimensions: impl IntoIterator<Item = Dimension>) -> Self {
        self.dimensions.extend(dimensions);
        self
    }

    /// Set the elements of a dimension
    #[must_use]
    pub fn dimension_elements(
        mut self,
        dimension: impl Into<Uri>,
        elements: impl IntoIterator<Item = DimensionElement>,
    ) -> Self {
        self.dimension_elements
            .push((dimension.into(), elements.into_iter().collect()));
        self
    }

    /// Add an attribute
    #[must_use]
    pub fn attribute(mut self, attribute: Attribute) -> Self {
        self.attributes.push(attribute);
        self
    }

    /// Add attributes
    #[must_use]
    pub fn attributes(mut self, attributes: impl IntoIterator<Item = Attribute>) -> Self {
        self.attributes.extend(attributes);
        self
    }

    /// Set the elements of an attribute
    #[must_use]
    pub fn attribute_elements(
        mut self,
        attribute: impl Into<Uri>,
        elements: impl IntoIterator<Item = AttributeElement>,
    ) -> Self {
        self.attribute_elements
            .push((attribute.into(), elements.into_iter().collect()));
        self
    }

    /// Add an observation
    #[must_use]
    pub fn observation(mut self, observation: Observation) -> Self {
        self.observations.push(observation);
        self
    }

    /// Add observations
    #[must_use]
    pub fn observations(mut self, observations: impl IntoIterator<Item = Observation>) -> Self {
        self.observations.extend(observations);
        self
    }

    /// Validate and assemble the cube
    ///
    /// # Errors
    /// - [`ModelError::EmptyMeasures`] without measures
    /// - [`ModelError::UnknownDimension`] when an element or observation
    ///   references an undeclared dimension
    /// - [`ModelError::UnknownMeasure`] / [`ModelError::UnknownAttribute`] for
    ///   observation values on undeclared components
    pub fn build(self) -> Result<CubeModel, ModelError> {
        let default_measure = self.measures.first().cloned().ok_or(ModelError::EmptyMeasures)?;
        let declares_dimension = |id: &Uri| self.dimensions.iter().any(|d| &d.id == id);
        let declares_measure = |id: &Uri| self.measures.iter().any(|m| &m.id == id);
        let declares_attribute = |id: &Uri| self.attributes.iter().any(|a| &a.id == id);

        let mut dimension_elements: OrdMap<Uri, Vector<DimensionElement>> = OrdMap::new();
        let mut element_index: HashMap<Uri, Vector<(Uri, usize)>> = HashMap::new();
        for (dimension, elements) in &self.dimension_elements {
            if !declares_dimension(dimension) {
                return Err(ModelError::UnknownDimension(dimension.clone()));
            }
            if let Some(stray) = elements.iter().find(|e| &e.dimension != dimension) {
                return Err(ModelError::UnknownDimension(stray.dimension.clone()));
            }
            for (position, element) in elements.iter().enumerate() {
                let positions = element_index.entry(element.id.clone()).or_insert_with(Vector::new);
                if !positions.iter().any(|(d, _)| d == dimension) {
                    positions.push_back((dimension.clone(), position));
                }
            }
            dimension_elements.insert(dimension.clone(), elements.iter().cloned().collect());
        }

        let mut attribute_elements: OrdMap<Uri, Vector<AttributeElement>> = OrdMap::new();
        for (attribute, elements) in &self.attribute_elements {
            if !declares_attribute(attribute) {
                return Err(ModelError::UnknownAttribute(attribute.clone()));
            }
            attribute_elements.insert(attribute.clone(), elements.iter().cloned().collect());
        }

        for observation in &self.observations {
            if let Some((dimension, _)) = observation.coordinates().find(|(d, _)| !declares_dimension(*d)) {
                return Err(ModelError::UnknownDimension(dimension.clone()));
            }
            if let Some((measure, _)) = observation.measure_values().find(|(m, _)| !declares_measure(*m)) {
                return Err(ModelError::UnknownMeasure(measure.clone()));
            }
        }

        let dimensions: Vector<Dimension> = self.dimensions.iter().cloned().collect();
        Ok(CubeModel {
            dataset: self.dataset,
            dsd: self.dsd,
            default_measure,
            measures: self.measures.into_iter().collect(),
            structure_dimensions: dimensions.clone(),
            dimensions,
            dimension_elements,
            attributes: self.attributes.into_iter().collect(),
            attribute_elements,
            observations: self.observations.into_iter().collect(),
            selection: Vector::new(),
            element_index,
        })
    }
}
