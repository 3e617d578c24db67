//! Narrowing a cube to a selection of dimension elements
//!
//! Filtering never touches the source cube; it derives a new [`CubeModel`]
//! that shares the source's indices.
//!
//! An observation survives [`SelectionFilter::apply`] when:
//! - on every dimension touched by the selection, its element is one of the
//!   selected elements of that dimension (AND across dimensions, OR within one)
//! - it has a value for the cube's default measure
//! - it carries the requested attribute element, when an attribute filter is
//!   given

use crate::component::{Dimension, DimensionElement};
use crate::cube::CubeModel;
use crate::observation::Observation;
use crate::uri::Uri;
use im::{OrdMap, OrdSet, Vector};
use serde::{Deserialize, Serialize};

/// Restricts observations to one element of one attribute
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeFilter {
    /// Attribute to test
    pub attribute: Uri,
    /// Required element of that attribute
    pub element: Uri,
}

impl AttributeFilter {
    /// Create a filter
    #[inline]
    #[must_use]
    pub fn new(attribute: impl Into<Uri>, element: impl Into<Uri>) -> Self {
        Self {
            attribute: attribute.into(),
            element: element.into(),
        }
    }

    /// First element of the cube's first attribute, if the cube has attributes
    #[must_use]
    pub fn default_for(cube: &CubeModel) -> Option<Self> {
        let attribute = cube.attributes().front()?;
        let element = cube.attribute_elements_of(attribute.id.as_str()).next()?;
        Some(Self::new(attribute.id.clone(), element.id.clone()))
    }

    fn admits(&self, observation: &Observation) -> bool {
        observation
            .attribute_elements_of(self.attribute.as_str())
            .any(|e| *e == self.element)
    }
}

/// Stateless selection filter over cube models
#[derive(Debug, Clone, Copy, Default)]
pub struct SelectionFilter;

impl SelectionFilter {
    /// Derive the cube restricted to `selection`
    ///
    /// The result's active dimensions are the dimensions of the selected
    /// elements in first-seen order. Element indices are not pruned.
    #[must_use]
    pub fn apply(
        selection: &[DimensionElement],
        cube: &CubeModel,
        attribute_filter: Option<&AttributeFilter>,
    ) -> CubeModel {
        let dimensions = derive_dimensions(selection, cube);
        let grouped = group_by_dimension(selection);
        let observations = select_observations(&grouped, cube, attribute_filter);

        tracing::debug!(
            selected = selection.len(),
            dimensions = dimensions.len(),
            kept = observations.len(),
            total = cube.observations().len(),
            "applied selection"
        );

        cube.derive(selection.iter().cloned().collect(), dimensions, observations)
    }

    /// [`SelectionFilter::apply`] with the cube's default attribute filter
    #[must_use]
    pub fn sub_cube(selection: &[DimensionElement], cube: &CubeModel) -> CubeModel {
        let attribute_filter = AttributeFilter::default_for(cube);
        Self::apply(selection, cube, attribute_filter.as_ref())
    }
}

/// Owning dimensions of the selected elements, deduplicated, first-seen order
///
/// An element whose dimension the cube does not declare yields a bare
/// dimension with that identifier.
#[must_use]
pub fn derive_dimensions(selection: &[DimensionElement], cube: &CubeModel) -> Vector<Dimension> {
    let mut dimensions: Vector<Dimension> = Vector::new();
    for element in selection {
        if dimensions.iter().any(|d| d.id == element.dimension) {
            continue;
        }
        let dimension = cube
            .dimension_of(element)
            .cloned()
            .unwrap_or_else(|| Dimension::new(element.dimension.clone()));
        dimensions.push_back(dimension);
    }
    dimensions
}

/// Selected element identifiers grouped by their dimension
#[must_use]
pub fn group_by_dimension(selection: &[DimensionElement]) -> OrdMap<Uri, OrdSet<Uri>> {
    selection.iter().fold(OrdMap::new(), |mut grouped, element| {
        grouped
            .entry(element.dimension.clone())
            .or_insert_with(OrdSet::new)
            .insert(element.id.clone());
        grouped
    })
}

/// Observations consistent with the grouped selection, the default measure
/// and the optional attribute filter
#[must_use]
pub fn select_observations(
    grouped: &OrdMap<Uri, OrdSet<Uri>>,
    cube: &CubeModel,
    attribute_filter: Option<&AttributeFilter>,
) -> Vector<Observation> {
    let measure = cube.default_measure().id.as_str();
    cube.observations()
        .iter()
        .filter(|o| {
            grouped.iter().all(|(dimension, selected)| {
                o.element_on(dimension.as_str())
                    .is_some_and(|element| selected.contains(element))
            })
        })
        .filter(|o| o.value_of(measure).is_some())
        .filter(|o| attribute_filter.map_or(true, |f| f.admits(o)))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::{Attribute, AttributeElement, DataStructureDefinition, Dataset, Measure};
    use pretty_assertions::assert_eq;

    const COUNTRY: &str = "http://ex/dim/country";
    const YEAR: &str = "http://ex/dim/year";
    const DEATHS: &str = "http://ex/measure/deaths";
    const BIRTHS: &str = "http://ex/measure/births";
    const UNIT: &str = "http://ex/attr/unit";

    fn germany() -> DimensionElement {
        DimensionElement::new("http://ex/country/de", "Germany", COUNTRY)
    }

    fn england() -> DimensionElement {
        DimensionElement::new("http://ex/country/en", "England", COUNTRY)
    }

    fn y2001() -> DimensionElement {
        DimensionElement::new("http://ex/year/2001", "2001", YEAR)
    }

    fn y2002() -> DimensionElement {
        DimensionElement::new("http://ex/year/2002", "2002", YEAR)
    }

    fn obs(id: &str, country: &DimensionElement, year: &DimensionElement, deaths: Option<f64>) -> Observation {
        let o = Observation::new(id)
            .with_element(COUNTRY, country.id.clone())
            .with_element(YEAR, year.id.clone())
            .with_measure(BIRTHS, 1.0);
        match deaths {
            Some(v) => o.with_measure(DEATHS, v),
            None => o,
        }
    }

    fn cube() -> CubeModel {
        CubeModel::builder(Dataset::new("http://ex/ds"), DataStructureDefinition::new("http://ex/dsd"))
            .measure(Measure::new(DEATHS))
            .measure(Measure::new(BIRTHS))
            .dimension(Dimension::new(COUNTRY).with_label("Country"))
            .dimension(Dimension::new(YEAR).with_label("Year"))
            .dimension_elements(COUNTRY, [germany(), england()])
            .dimension_elements(YEAR, [y2001(), y2002()])
            .observation(obs("http://ex/o/en-2001", &england(), &y2001(), Some(80.0)))
            .observation(obs("http://ex/o/de-2001", &germany(), &y2001(), Some(10.0)))
            .observation(obs("http://ex/o/en-2002", &england(), &y2002(), Some(70.0)))
            .observation(obs("http://ex/o/de-2002", &germany(), &y2002(), None))
            .build()
            .unwrap()
    }

    fn ids(cube: &CubeModel) -> Vec<&str> {
        cube.observations().iter().map(|o| o.id.as_str()).collect()
    }

    #[test]
    fn single_element_selection() {
        let source = cube();
        let filtered = SelectionFilter::apply(&[england()], &source, None);

        assert_eq!(ids(&filtered), vec!["http://ex/o/en-2001", "http://ex/o/en-2002"]);
        assert_eq!(filtered.dimensions().len(), 1);
        assert_eq!(filtered.dimensions()[0].label.as_deref(), Some("Country"));
        assert_eq!(filtered.selection().len(), 1);
        assert_eq!(source.observations().len(), 4);
    }

    #[test]
    fn or_within_and_across_dimensions() {
        let filtered = SelectionFilter::apply(&[england(), y2001(), germany()], &cube(), None);
        assert_eq!(ids(&filtered), vec!["http://ex/o/en-2001", "http://ex/o/de-2001"]);

        let dims: Vec<&str> = filtered.dimensions().iter().map(|d| d.id.as_str()).collect();
        assert_eq!(dims, vec![COUNTRY, YEAR]);
    }

    #[test]
    fn observations_without_default_measure_are_dropped() {
        let filtered = SelectionFilter::apply(&[germany()], &cube(), None);
        assert_eq!(ids(&filtered), vec!["http://ex/o/de-2001"]);
    }

    #[test]
    fn empty_selection_keeps_measured_observations() {
        let filtered = SelectionFilter::apply(&[], &cube(), None);
        assert_eq!(filtered.observations().len(), 3);
        assert!(filtered.dimensions().is_empty());
    }

    #[test]
    fn element_of_unknown_dimension_matches_nothing() {
        let stray = DimensionElement::new("http://ex/sex/m", "male", "http://ex/dim/sex");
        let filtered = SelectionFilter::apply(&[stray], &cube(), None);
        assert!(filtered.observations().is_empty());
        assert_eq!(filtered.dimensions()[0].id, "http://ex/dim/sex");
    }

    #[test]
    fn element_indices_are_not_pruned() {
        let filtered = SelectionFilter::apply(&[england()], &cube(), None);
        assert_eq!(filtered.elements_of(COUNTRY).count(), 2);
        assert!(filtered.element("http://ex/year/2002").is_some());
    }

    #[test]
    fn attribute_filter() {
        let persons = AttributeElement::new("http://ex/unit/persons", "persons", UNIT);
        let thousands = AttributeElement::new("http://ex/unit/thousands", "thousands", UNIT);
        let cube = CubeModel::builder(Dataset::new("ds"), DataStructureDefinition::new("dsd"))
            .measure(Measure::new(DEATHS))
            .dimension(Dimension::new(COUNTRY))
            .dimension_elements(COUNTRY, [england()])
            .attribute(Attribute::new(UNIT))
            .attribute_elements(UNIT, [persons.clone(), thousands.clone()])
            .observation(
                Observation::new("a")
                    .with_element(COUNTRY, england().id)
                    .with_measure(DEATHS, 1.0)
                    .with_attribute(UNIT, persons.id.clone()),
            )
            .observation(
                Observation::new("b")
                    .with_element(COUNTRY, england().id)
                    .with_measure(DEATHS, 2.0)
                    .with_attribute(UNIT, thousands.id.clone()),
            )
            .observation(Observation::new("c").with_element(COUNTRY, england().id).with_measure(DEATHS, 3.0))
            .build()
            .unwrap();

        let default = AttributeFilter::default_for(&cube).unwrap();
        assert_eq!(default, AttributeFilter::new(UNIT, persons.id.clone()));
        assert_eq!(ids(&SelectionFilter::sub_cube(&[england()], &cube)), vec!["a"]);

        let filter = AttributeFilter::new(UNIT, thousands.id);
        assert_eq!(ids(&SelectionFilter::apply(&[england()], &cube, Some(&filter))), vec!["b"]);
        assert_eq!(SelectionFilter::apply(&[england()], &cube, None).observations().len(), 3);
    }

    #[test]
    fn sub_cube_without_attributes_has_no_attribute_condition() {
        let source = cube();
        assert!(AttributeFilter::default_for(&source).is_none());
        assert_eq!(
            SelectionFilter::sub_cube(&[england()], &source),
            SelectionFilter::apply(&[england()], &source, None)
        );
    }

    #[test]
    fn derive_dimensions_deduplicates() {
        let dims = derive_dimensions(&[y2001(), england(), y2002(), germany()], &cube());
        let ids: Vec<&str> = dims.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec![YEAR, COUNTRY]);
    }

    #[test]
    fn group_by_dimension_collects_elements() {
        let grouped = group_by_dimension(&[england(), y2001(), germany()]);
        assert_eq!(grouped.len(), 2);
        assert_eq!(grouped.get(COUNTRY).map(OrdSet::len), Some(2));
        assert_eq!(grouped.get(YEAR).map(OrdSet::len), Some(1));
    }
}
