//! Testing utilities for the CubeViz workspace
//!
//! Shared fixtures, stores and cubes.

#![allow(missing_docs)]

pub mod scripted;

pub use scripted::{Reply, ScriptedStore};

use cubeviz_model::{
    Attribute, AttributeElement, CubeModel, DataStructureDefinition, Dataset, Dimension,
    DimensionElement, Measure, MeasureValue, Observation,
};
use cubeviz_store::{MemoryStore, RdfFormat, StoreClient};
use std::sync::Arc;

/// Births and deaths for England, France and Germany in 2001
pub const POPULATION_TTL: &str = include_str!("../fixtures/population.ttl");

const PREFIXES: &str = "\
@prefix qb: <http://purl.org/linked-data/cube#> .
@prefix ex: <http://example.org/> .
";

/// A dataset without a structure definition
pub fn dataset_only_ttl() -> String {
    format!("{PREFIXES}ex:dataset a qb:DataSet .\n")
}

/// A structure that declares a dimension but no measure
pub fn no_measures_ttl() -> String {
    format!(
        "{PREFIXES}ex:dataset a qb:DataSet ; qb:structure ex:dsd .\n\
         ex:dsd qb:component ex:cs-country .\n\
         ex:cs-country qb:dimension ex:country .\n\
         ex:country a qb:DimensionProperty .\n"
    )
}

/// A structure that declares a measure but no dimension
pub fn no_dimensions_ttl() -> String {
    format!(
        "{PREFIXES}ex:dataset a qb:DataSet ; qb:structure ex:dsd .\n\
         ex:dsd qb:component ex:cs-deaths .\n\
         ex:cs-deaths qb:measure ex:deaths .\n\
         ex:deaths a qb:MeasureProperty .\n"
    )
}

/// A complete structure without any observations
pub fn structure_only_ttl() -> String {
    format!(
        "{PREFIXES}ex:dataset a qb:DataSet ; qb:structure ex:dsd .\n\
         ex:dsd qb:component ex:cs-country , ex:cs-deaths .\n\
         ex:cs-country qb:dimension ex:country .\n\
         ex:cs-deaths qb:measure ex:deaths .\n\
         ex:country a qb:DimensionProperty .\n\
         ex:deaths a qb:MeasureProperty .\n"
    )
}

/// Identifiers used by [`POPULATION_TTL`] and [`sample_cube`]
pub mod ids {
    pub const DATASET: &str = "http://example.org/dataset";
    pub const DSD: &str = "http://example.org/dsd";
    pub const COUNTRY: &str = "http://example.org/dimension/country";
    pub const YEAR: &str = "http://example.org/dimension/year";
    pub const BIRTHS: &str = "http://example.org/measure/births";
    pub const DEATHS: &str = "http://example.org/measure/deaths";
    pub const UNIT: &str = "http://example.org/attribute/unit";
    pub const ENGLAND: &str = "http://example.org/country/england";
    pub const FRANCE: &str = "http://example.org/country/france";
    pub const GERMANY: &str = "http://example.org/country/germany";
    pub const Y2001: &str = "http://example.org/year/2001";
    pub const PERSONS: &str = "http://example.org/unit/persons";
    pub const OBS_ENGLAND: &str = "http://example.org/observation/england-2001";
    pub const OBS_FRANCE: &str = "http://example.org/observation/france-2001";
    pub const OBS_GERMANY: &str = "http://example.org/observation/germany-2001";
}

const XSD_INTEGER: &str = "http://www.w3.org/2001/XMLSchema#integer";

pub fn memory_store(turtle: &str) -> MemoryStore {
    MemoryStore::with_data(RdfFormat::Turtle, turtle.as_bytes()).expect("fixture loads")
}

pub fn memory_client(turtle: &str) -> StoreClient {
    StoreClient::connected(Arc::new(memory_store(turtle)))
}

pub fn population_client() -> StoreClient {
    memory_client(POPULATION_TTL)
}

pub fn country(id: &str, label: &str) -> DimensionElement {
    DimensionElement::new(id, label, ids::COUNTRY)
}

/// The cube an English-language import of [`POPULATION_TTL`] produces
pub fn sample_cube() -> CubeModel {
    use ids::*;

    let integer = |v: &str| MeasureValue::typed(v, XSD_INTEGER);
    let observation = |id: &str, country: &str| {
        Observation::new(id)
            .with_element(COUNTRY, country)
            .with_element(YEAR, Y2001)
            .with_attribute(UNIT, PERSONS)
    };

    CubeModel::builder(
        Dataset::new(DATASET).with_label("Births and deaths"),
        DataStructureDefinition::new(DSD).with_label("Population structure"),
    )
    .measure(Measure::new(BIRTHS).with_label("Births"))
    .measure(Measure::new(DEATHS).with_label("Deaths"))
    .dimension(Dimension::new(COUNTRY).with_label("Country"))
    .dimension(Dimension::new(YEAR).with_label("Year"))
    .attribute(Attribute::new(UNIT).with_label("Unit"))
    .dimension_elements(
        COUNTRY,
        [
            country(ENGLAND, "England"),
            country(FRANCE, "France"),
            country(GERMANY, "Germany"),
        ],
    )
    .dimension_elements(YEAR, [DimensionElement::new(Y2001, "2001", YEAR)])
    .attribute_elements(UNIT, [AttributeElement::new(PERSONS, "persons", UNIT)])
    .observation(
        observation(OBS_ENGLAND, ENGLAND)
            .with_measure(DEATHS, integer("80"))
            .with_measure(BIRTHS, integer("30")),
    )
    .observation(observation(OBS_FRANCE, FRANCE).with_measure(DEATHS, integer("5")))
    .observation(
        observation(OBS_GERMANY, GERMANY)
            .with_measure(DEATHS, integer("10"))
            .with_measure(BIRTHS, integer("25")),
    )
    .build()
    .expect("sample cube is valid")
}

/// Cube with `rows` × `cols` elements on two dimensions
///
/// Cell `(r, c)` gets an observation with value `r * cols + c` when
/// `filled(r, c)` holds. A dimension of size one is still declared.
pub fn grid_cube(rows: usize, cols: usize, filled: impl Fn(usize, usize) -> bool) -> CubeModel {
    const ROW: &str = "http://ex/dim/row";
    const COL: &str = "http://ex/dim/col";
    const VALUE: &str = "http://ex/measure/value";

    let row = |r: usize| DimensionElement::new(format!("http://ex/row/{r}"), format!("row {r}"), ROW);
    let col = |c: usize| DimensionElement::new(format!("http://ex/col/{c}"), format!("col {c}"), COL);

    let mut builder = CubeModel::builder(Dataset::new("http://ex/ds"), DataStructureDefinition::new("http://ex/dsd"))
        .measure(Measure::new(VALUE).with_label("Value"))
        .dimension(Dimension::new(ROW).with_label("Row"))
        .dimension(Dimension::new(COL).with_label("Column"))
        .dimension_elements(ROW, (0..rows).map(row))
        .dimension_elements(COL, (0..cols).map(col));

    for r in 0..rows {
        for c in 0..cols {
            if filled(r, c) {
                builder = builder.observation(
                    Observation::new(format!("http://ex/obs/{r}-{c}"))
                        .with_element(ROW, row(r).id)
                        .with_element(COL, col(c).id)
                        .with_measure(VALUE, (r * cols + c) as f64),
                );
            }
        }
    }

    builder.build().expect("grid cube is valid")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixtures_load() {
        assert!(memory_store(POPULATION_TTL).len().unwrap() > 40);
        for ttl in [dataset_only_ttl(), no_measures_ttl(), no_dimensions_ttl(), structure_only_ttl()] {
            assert!(!memory_store(&ttl).is_empty().unwrap());
        }
    }

    #[test]
    fn sample_cube_shape() {
        let cube = sample_cube();
        assert_eq!(cube.default_measure().id, ids::BIRTHS);
        assert_eq!(cube.observations().len(), 3);
        assert_eq!(cube.observed_elements(ids::COUNTRY).len(), 3);
    }

    #[test]
    fn grid_cube_fill() {
        let cube = grid_cube(2, 3, |r, c| r != c);
        assert_eq!(cube.observations().len(), 4);
        assert_eq!(cube.elements_of("http://ex/dim/col").count(), 3);
    }
}
