//! Conversion of graph responses into structured nodes
//!
//! CONSTRUCT responses arrive as N-Triples text. They are grouped by subject
//! into [`Node`]s, ordered by identifier, so "the first dataset" and similar
//! choices do not depend on the order a store happens to stream triples in.

use crate::error::StoreError;
use cubeviz_model::{Literal, Node, Term, Uri};
use oxigraph::io::{RdfFormat, RdfParser};
use oxigraph::model::{self as rdf_model, vocab::xsd};
use std::collections::BTreeMap;

/// Parse an N-Triples graph into nodes sorted by identifier
///
/// An empty graph yields no nodes.
///
/// # Errors
/// [`StoreError::Parse`] when the text is not valid N-Triples.
pub fn parse_graph(ntriples: &str) -> Result<Vec<Node>, StoreError> {
    let mut nodes: BTreeMap<Uri, Node> = BTreeMap::new();

    for quad in RdfParser::from_format(RdfFormat::NTriples).for_slice(ntriples.as_bytes()) {
        let quad = quad.map_err(|e| StoreError::Parse(e.to_string()))?;
        let Some(Term::Node { id: subject }) = convert_term(&rdf_model::Term::from(quad.subject)) else {
            continue;
        };
        let Some(object) = convert_term(&quad.object) else {
            tracing::trace!(predicate = %quad.predicate, "skipping unsupported object term");
            continue;
        };

        nodes
            .entry(subject.clone())
            .or_insert_with(|| Node::new(subject))
            .push(quad.predicate.as_str(), object);
    }

    Ok(nodes.into_values().collect())
}

/// Convert a store term into a model term
///
/// Blank nodes keep their `_:` prefix. `xsd:string` literals become plain
/// literals. Returns `None` for term kinds the model has no form for.
#[must_use]
pub fn convert_term(term: &rdf_model::Term) -> Option<Term> {
    #[allow(unreachable_patterns)]
    match term {
        rdf_model::Term::NamedNode(node) => Some(Term::node(node.as_str())),
        rdf_model::Term::BlankNode(node) => Some(Term::node(format!("_:{}", node.as_str()))),
        rdf_model::Term::Literal(literal) => Some(Term::Literal(convert_literal(literal))),
        _ => None,
    }
}

fn convert_literal(literal: &rdf_model::Literal) -> Literal {
    if let Some(language) = literal.language() {
        return Literal::tagged(literal.value(), language);
    }
    let datatype = literal.datatype();
    if datatype == xsd::STRING {
        Literal::plain(literal.value())
    } else {
        Literal::typed(literal.value(), datatype.as_str())
    }
}
