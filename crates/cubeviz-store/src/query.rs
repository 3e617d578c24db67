//! Query text for cube discovery
//!
//! Pure functions; each returns the SPARQL text for one import stage. The
//! text is kept byte-for-byte stable so stores see exactly the same queries
//! across releases.

use cubeviz_model::vocab::{qb, rdf};

/// Kind of structure component to look up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentKind {
    /// `qb:dimension`
    Dimension,
    /// `qb:measure`
    Measure,
    /// `qb:attribute`
    Attribute,
}

impl ComponentKind {
    /// Component property linking a component specification to its property
    #[inline]
    #[must_use]
    pub const fn predicate(self) -> &'static str {
        match self {
            Self::Dimension => qb::DIMENSION,
            Self::Measure => qb::MEASURE,
            Self::Attribute => qb::ATTRIBUTE,
        }
    }

    /// Lowercase name for logs
    #[inline]
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Dimension => "dimension",
            Self::Measure => "measure",
            Self::Attribute => "attribute",
        }
    }
}

/// Every triple in the store
#[must_use]
pub fn all_triples() -> String {
    "CONSTRUCT { ?s ?p ?o } WHERE { ?s ?p ?o . }".to_string()
}

/// All `qb:DataSet` resources with their triples
#[must_use]
pub fn datasets() -> String {
    format!(
        "CONSTRUCT {{ ?s ?p ?o }} WHERE {{ ?s <{}> <{}>. ?s ?p ?o . }} ",
        rdf::TYPE,
        qb::DATA_SET
    )
}

/// Structure definition of a dataset
#[must_use]
pub fn data_structure_definition(dataset: &str) -> String {
    format!(
        "CONSTRUCT  {{?dsd ?p ?o}}WHERE {{ <{dataset}> <{}> ?dsd . ?dsd ?p ?o . }}",
        qb::STRUCTURE
    )
}

/// Component specifications of a structure definition (SELECT form)
#[must_use]
pub fn component_specifications(dsd: &str) -> String {
    format!("SELECT ?o WHERE {{ <{dsd}> <{}> ?o }}", qb::COMPONENT)
}

/// Component properties of one kind declared by `dsd` for `dataset`
#[must_use]
pub fn components(dataset: &str, dsd: &str, kind: ComponentKind) -> String {
    format!(
        "CONSTRUCT {{?comptype ?p ?o}} WHERE {{ <{dataset}> <{structure}> <{dsd}>  . \
         <{dsd}> <{component}> ?s . ?s <{predicate}> ?comptype . ?comptype ?p ?o  .}}",
        structure = qb::STRUCTURE,
        component = qb::COMPONENT,
        predicate = kind.predicate(),
    )
}

/// Resources used by the dataset's observations on `property`
///
/// Serves both dimension elements and attribute elements.
#[must_use]
pub fn dimension_elements(property: &str, dataset: &str) -> String {
    format!(
        "CONSTRUCT {{?s ?p ?o }} WHERE {{ ?ob <{rdf_type}> <{observation}>. \
         ?ob <{data_set}> <{dataset}>. ?ob <{property}> ?s. ?s ?p ?o . }}",
        rdf_type = rdf::TYPE,
        observation = qb::OBSERVATION,
        data_set = qb::DATA_SET_PROPERTY,
    )
}

/// Observations of a dataset with their triples
#[must_use]
pub fn observations(dataset: &str) -> String {
    format!(
        "CONSTRUCT {{ ?s ?p ?o }} WHERE {{ ?s <{rdf_type}> <{observation}>. \
         ?s <{data_set}> <{dataset}>. ?s ?p ?o . }}",
        rdf_type = rdf::TYPE,
        observation = qb::OBSERVATION,
        data_set = qb::DATA_SET_PROPERTY,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn all_triples_text() {
        assert_eq!(all_triples(), "CONSTRUCT { ?s ?p ?o } WHERE { ?s ?p ?o . }");
    }

    #[test]
    fn datasets_text() {
        assert_eq!(
            datasets(),
            "CONSTRUCT { ?s ?p ?o } WHERE { ?s <http://www.w3.org/1999/02/22-rdf-syntax-ns#type> \
             <http://purl.org/linked-data/cube#DataSet>. ?s ?p ?o . } "
        );
    }

    #[test]
    fn dsd_text() {
        assert_eq!(
            data_structure_definition("http://ex/ds"),
            "CONSTRUCT  {?dsd ?p ?o}WHERE { <http://ex/ds> <http://purl.org/linked-data/cube#structure> ?dsd . ?dsd ?p ?o . }"
        );
    }

    #[test]
    fn component_specifications_text() {
        assert_eq!(
            component_specifications("http://ex/dsd"),
            "SELECT ?o WHERE { <http://ex/dsd> <http://purl.org/linked-data/cube#component> ?o }"
        );
    }

    #[test]
    fn components_text() {
        assert_eq!(
            components("http://ex/ds", "http://ex/dsd", ComponentKind::Measure),
            "CONSTRUCT {?comptype ?p ?o} WHERE { <http://ex/ds> <http://purl.org/linked-data/cube#structure> <http://ex/dsd>  . \
             <http://ex/dsd> <http://purl.org/linked-data/cube#component> ?s . \
             ?s <http://purl.org/linked-data/cube#measure> ?comptype . ?comptype ?p ?o  .}"
        );
        assert!(components("a", "b", ComponentKind::Dimension).contains("cube#dimension> ?comptype"));
        assert!(components("a", "b", ComponentKind::Attribute).contains("cube#attribute> ?comptype"));
    }

    #[test]
    fn dimension_elements_text() {
        assert_eq!(
            dimension_elements("http://ex/dim/country", "http://ex/ds"),
            "CONSTRUCT {?s ?p ?o } WHERE { ?ob <http://www.w3.org/1999/02/22-rdf-syntax-ns#type> \
             <http://purl.org/linked-data/cube#Observation>. ?ob <http://purl.org/linked-data/cube#dataSet> \
             <http://ex/ds>. ?ob <http://ex/dim/country> ?s. ?s ?p ?o . }"
        );
    }

    #[test]
    fn observations_text() {
        assert_eq!(
            observations("http://ex/ds"),
            "CONSTRUCT { ?s ?p ?o } WHERE { ?s <http://www.w3.org/1999/02/22-rdf-syntax-ns#type> \
             <http://purl.org/linked-data/cube#Observation>. ?s <http://purl.org/linked-data/cube#dataSet> \
             <http://ex/ds>. ?s ?p ?o . }"
        );
    }
}
