//! Structured graph nodes
//!
//! A [`Node`] groups every triple sharing one subject, in the flattened
//! JSON-LD shape: `{"@id": ..., "@type": [...], "<predicate>": [terms]}`.
//! Store responses are converted into nodes once; everything downstream reads
//! this form only.

use crate::uri::Uri;
use crate::vocab::{self, rdf};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A literal value
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Literal {
    /// Lexical form
    #[serde(rename = "@value")]
    pub value: String,
    /// Datatype IRI, absent for plain and language-tagged strings
    #[serde(rename = "@type", default, skip_serializing_if = "Option::is_none")]
    pub datatype: Option<String>,
    /// Language tag
    #[serde(rename = "@language", default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

impl Literal {
    /// Plain string literal
    #[inline]
    #[must_use]
    pub fn plain(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            datatype: None,
            language: None,
        }
    }

    /// Typed literal
    #[inline]
    #[must_use]
    pub fn typed(value: impl Into<String>, datatype: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            datatype: Some(datatype.into()),
            language: None,
        }
    }

    /// Language-tagged string
    #[inline]
    #[must_use]
    pub fn tagged(value: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            datatype: None,
            language: Some(language.into()),
        }
    }
}

/// Object of a triple
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Term {
    /// Reference to another node (IRI or blank node)
    Node {
        /// Referenced identifier
        #[serde(rename = "@id")]
        id: Uri,
    },
    /// Literal value
    Literal(Literal),
}

impl Term {
    /// Node reference term
    #[inline]
    #[must_use]
    pub fn node(id: impl Into<Uri>) -> Self {
        Self::Node { id: id.into() }
    }

    /// Referenced identifier, if this is a node reference
    #[inline]
    #[must_use]
    pub fn as_node(&self) -> Option<&Uri> {
        match self {
            Self::Node { id } => Some(id),
            Self::Literal(_) => None,
        }
    }

    /// Literal payload, if this is a literal
    #[inline]
    #[must_use]
    pub fn as_literal(&self) -> Option<&Literal> {
        match self {
            Self::Literal(literal) => Some(literal),
            Self::Node { .. } => None,
        }
    }
}

/// All triples of one subject
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    /// Subject identifier
    #[serde(rename = "@id")]
    pub id: Uri,
    /// `rdf:type` objects
    #[serde(rename = "@type", default, skip_serializing_if = "Vec::is_empty")]
    pub types: Vec<Uri>,
    /// Remaining predicates and their objects, in first-seen order per predicate
    #[serde(flatten)]
    pub properties: BTreeMap<String, Vec<Term>>,
}

impl Node {
    /// Create an empty node
    #[inline]
    #[must_use]
    pub fn new(id: impl Into<Uri>) -> Self {
        Self {
            id: id.into(),
            types: Vec::new(),
            properties: BTreeMap::new(),
        }
    }

    /// Add a triple with this node as subject
    ///
    /// `rdf:type` objects that are node references go to [`Node::types`].
    /// Duplicate values are ignored.
    pub fn push(&mut self, predicate: &str, object: Term) {
        if predicate == rdf::TYPE {
            if let Term::Node { id } = &object {
                if !self.types.contains(id) {
                    self.types.push(id.clone());
                }
                return;
            }
        }

        let values = self.properties.entry(predicate.to_string()).or_default();
        if !values.contains(&object) {
            values.push(object);
        }
    }

    /// Builder form of [`Node::push`]
    #[inline]
    #[must_use]
    pub fn with(mut self, predicate: &str, object: Term) -> Self {
        self.push(predicate, object);
        self
    }

    /// Whether the node has the given `rdf:type`
    #[inline]
    #[must_use]
    pub fn has_type(&self, class: &str) -> bool {
        self.types.iter().any(|t| t == class)
    }

    /// All objects of a predicate
    #[inline]
    #[must_use]
    pub fn values(&self, predicate: &str) -> &[Term] {
        self.properties.get(predicate).map_or(&[], Vec::as_slice)
    }

    /// Node-reference objects of a predicate
    pub fn references<'a>(&'a self, predicate: &str) -> impl Iterator<Item = &'a Uri> + 'a {
        self.values(predicate).iter().filter_map(Term::as_node)
    }

    /// Literal objects of a predicate
    pub fn literals<'a>(&'a self, predicate: &str) -> impl Iterator<Item = &'a Literal> + 'a {
        self.values(predicate).iter().filter_map(Term::as_literal)
    }

    /// Human-readable label
    ///
    /// Looks at `rdfs:label`, then `skos:prefLabel`. Within a predicate a
    /// literal tagged with `language` wins, then an untagged literal, then any
    /// other literal.
    #[must_use]
    pub fn label(&self, language: &str) -> Option<&str> {
        vocab::LABEL_PREDICATES.iter().find_map(|predicate| {
            let literals: Vec<&Literal> = self.literals(predicate).collect();
            let tagged = literals.iter().copied().find(|l| {
                l.language
                    .as_deref()
                    .is_some_and(|tag| tag.eq_ignore_ascii_case(language))
            });
            tagged
                .or_else(|| literals.iter().copied().find(|l| l.language.is_none()))
                .or_else(|| literals.first().copied())
                .map(|l| l.value.as_str())
        })
    }
}
