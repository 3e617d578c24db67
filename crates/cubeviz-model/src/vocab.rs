//! Vocabulary IRIs used by the cube model and its queries

/// RDF syntax namespace
pub mod rdf {
    /// `rdf:type`
    pub const TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";
}

/// RDF Schema namespace
pub mod rdfs {
    /// `rdfs:label`
    pub const LABEL: &str = "http://www.w3.org/2000/01/rdf-schema#label";
}

/// SKOS namespace
pub mod skos {
    /// `skos:prefLabel`
    pub const PREF_LABEL: &str = "http://www.w3.org/2004/02/skos/core#prefLabel";
}

/// RDF Data Cube namespace
pub mod qb {
    /// Namespace IRI
    pub const NS: &str = "http://purl.org/linked-data/cube#";
    /// `qb:DataSet`
    pub const DATA_SET: &str = "http://purl.org/linked-data/cube#DataSet";
    /// `qb:Observation`
    pub const OBSERVATION: &str = "http://purl.org/linked-data/cube#Observation";
    /// `qb:structure`
    pub const STRUCTURE: &str = "http://purl.org/linked-data/cube#structure";
    /// `qb:component`
    pub const COMPONENT: &str = "http://purl.org/linked-data/cube#component";
    /// `qb:dimension`
    pub const DIMENSION: &str = "http://purl.org/linked-data/cube#dimension";
    /// `qb:measure`
    pub const MEASURE: &str = "http://purl.org/linked-data/cube#measure";
    /// `qb:attribute`
    pub const ATTRIBUTE: &str = "http://purl.org/linked-data/cube#attribute";
    /// `qb:dataSet`
    pub const DATA_SET_PROPERTY: &str = "http://purl.org/linked-data/cube#dataSet";
}

/// Label predicates in lookup order
pub const LABEL_PREDICATES: [&str; 2] = [rdfs::LABEL, skos::PREF_LABEL];
