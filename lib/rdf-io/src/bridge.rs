//! Conversions between `rdf-model`'s `Term`/`Quad` and `oxrdf`'s.
//!
//! The two models don't line up one-to-one: `rdf_model::Term` is a flat
//! six-variant enum (it additionally carries `Variable` and `DefaultGraph` as
//! term variants, for query-AST reuse), while `oxrdf` spreads the same
//! concepts across `Subject`/`Term`/`GraphName` and never represents a
//! variable or the default graph as a term at all. A `Variable` has no wire
//! representation and is always a bridging error; `DefaultGraph` is only
//! meaningful in the graph position, where it maps to `oxrdf::GraphName::DefaultGraph`.
//!
//! `rdf_model::Literal`'s directional language tag
//! ([`rdf_model::BaseDirection`]) has no `oxrdf::Literal` counterpart in this
//! stack — crossing the bridge drops the direction. Round-tripping a
//! directional literal through a wire format will lose it.

use crate::error::BridgeError;
use rdf_model::{BlankNode, DefaultGraph, Literal, NamedNode, Quad, QuotedTriple, Term};

pub fn term_to_oxrdf(term: &Term) -> Result<oxrdf::Term, BridgeError> {
    match term {
        Term::NamedNode(n) => Ok(oxrdf::NamedNode::new_unchecked(n.as_str()).into()),
        Term::BlankNode(b) => Ok(oxrdf::BlankNode::new_unchecked(b.as_str()).into()),
        Term::Literal(l) => Ok(literal_to_oxrdf(l)?.into()),
        Term::QuotedTriple(t) => Ok(Box::new(triple_to_oxrdf(t)?).into()),
        Term::Variable(_) => Err(BridgeError::UnsupportedTermKind { kind: "Variable" }),
        Term::DefaultGraph(_) => Err(BridgeError::UnsupportedTermKind { kind: "DefaultGraph" }),
    }
}

pub fn subject_to_oxrdf(term: &Term) -> Result<oxrdf::Subject, BridgeError> {
    match term {
        Term::NamedNode(n) => Ok(oxrdf::NamedNode::new_unchecked(n.as_str()).into()),
        Term::BlankNode(b) => Ok(oxrdf::BlankNode::new_unchecked(b.as_str()).into()),
        Term::QuotedTriple(t) => Ok(Box::new(triple_to_oxrdf(t)?).into()),
        other => Err(BridgeError::UnsupportedTermKind { kind: other.kind_name() }),
    }
}

fn predicate_to_oxrdf(term: &Term) -> Result<oxrdf::NamedNode, BridgeError> {
    match term {
        Term::NamedNode(n) => Ok(oxrdf::NamedNode::new_unchecked(n.as_str())),
        other => Err(BridgeError::UnsupportedTermKind { kind: other.kind_name() }),
    }
}

pub fn graph_name_to_oxrdf(term: &Term) -> Result<oxrdf::GraphName, BridgeError> {
    match term {
        Term::NamedNode(n) => Ok(oxrdf::NamedNode::new_unchecked(n.as_str()).into()),
        Term::BlankNode(b) => Ok(oxrdf::BlankNode::new_unchecked(b.as_str()).into()),
        Term::DefaultGraph(_) => Ok(oxrdf::GraphName::DefaultGraph),
        other => Err(BridgeError::UnsupportedTermKind { kind: other.kind_name() }),
    }
}

fn literal_to_oxrdf(literal: &Literal) -> Result<oxrdf::Literal, BridgeError> {
    if let Some(language) = literal.language() {
        Ok(oxrdf::Literal::new_language_tagged_literal_unchecked(
            literal.value(),
            language,
        ))
    } else {
        let datatype = oxrdf::NamedNode::new_unchecked(literal.datatype().as_str());
        Ok(oxrdf::Literal::new_typed_literal(literal.value(), datatype))
    }
}

fn triple_to_oxrdf(triple: &QuotedTriple) -> Result<oxrdf::Triple, BridgeError> {
    Ok(oxrdf::Triple::new(
        subject_to_oxrdf(&triple.subject)?,
        predicate_to_oxrdf(&triple.predicate)?,
        term_to_oxrdf(&triple.object)?,
    ))
}

pub fn quad_to_oxrdf(quad: &Quad) -> Result<oxrdf::Quad, BridgeError> {
    Ok(oxrdf::Quad::new(
        subject_to_oxrdf(&quad.subject)?,
        predicate_to_oxrdf(&quad.predicate)?,
        term_to_oxrdf(&quad.object)?,
        graph_name_to_oxrdf(&quad.graph)?,
    ))
}

pub fn term_from_oxrdf(term: &oxrdf::Term) -> Term {
    match term {
        oxrdf::Term::NamedNode(n) => NamedNode::new_unchecked(n.as_str()).into(),
        oxrdf::Term::BlankNode(b) => BlankNode::new_unchecked(b.as_str()).into(),
        oxrdf::Term::Literal(l) => literal_from_oxrdf(l).into(),
        oxrdf::Term::Triple(t) => triple_from_oxrdf(t).into(),
    }
}

fn subject_from_oxrdf(subject: &oxrdf::Subject) -> Term {
    match subject {
        oxrdf::Subject::NamedNode(n) => NamedNode::new_unchecked(n.as_str()).into(),
        oxrdf::Subject::BlankNode(b) => BlankNode::new_unchecked(b.as_str()).into(),
        oxrdf::Subject::Triple(t) => triple_from_oxrdf(t).into(),
    }
}

fn literal_from_oxrdf(literal: &oxrdf::Literal) -> Literal {
    if let Some(language) = literal.language() {
        // infallible: `oxrdf::Literal` already validated this tag on construction.
        Literal::new_language_tagged(literal.value(), language).unwrap_or_else(|_| {
            Literal::new_typed(literal.value(), NamedNode::new_unchecked(literal.datatype().as_str()))
        })
    } else {
        Literal::new_typed(
            literal.value(),
            NamedNode::new_unchecked(literal.datatype().as_str()),
        )
    }
}

fn triple_from_oxrdf(triple: &oxrdf::Triple) -> QuotedTriple {
    QuotedTriple::new(
        subject_from_oxrdf(&triple.subject),
        NamedNode::new_unchecked(triple.predicate.as_str()).into(),
        term_from_oxrdf(&triple.object),
    )
}

pub fn graph_name_from_oxrdf(graph_name: &oxrdf::GraphName) -> Term {
    match graph_name {
        oxrdf::GraphName::NamedNode(n) => NamedNode::new_unchecked(n.as_str()).into(),
        oxrdf::GraphName::BlankNode(b) => BlankNode::new_unchecked(b.as_str()).into(),
        oxrdf::GraphName::DefaultGraph => DefaultGraph.into(),
    }
}

pub fn quad_from_oxrdf(quad: &oxrdf::Quad) -> Quad {
    Quad::new_unchecked(
        subject_from_oxrdf(&quad.subject),
        NamedNode::new_unchecked(quad.predicate.as_str()).into(),
        term_from_oxrdf(&quad.object),
        graph_name_from_oxrdf(&quad.graph_name),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rdf_model::vocab::xsd;

    #[test]
    fn named_node_round_trips() {
        let term: Term = NamedNode::new_unchecked("http://example.com/s").into();
        let ox = term_to_oxrdf(&term).unwrap();
        assert_eq!(term_from_oxrdf(&ox), term);
    }

    #[test]
    fn variable_has_no_wire_representation() {
        let term: Term = rdf_model::Variable::new("x").unwrap().into();
        assert!(term_to_oxrdf(&term).is_err());
    }

    #[test]
    fn directional_literal_loses_direction_on_bridge() {
        let literal = Literal::new_language_tagged_with_direction(
            "hi",
            "en",
            Some(rdf_model::BaseDirection::Ltr),
        )
        .unwrap();
        let ox = literal_to_oxrdf(&literal).unwrap();
        let back = literal_from_oxrdf(&ox);
        assert_eq!(back.value(), "hi");
        assert_eq!(back.language(), Some("en"));
        assert_eq!(back.direction(), None);
    }

    #[test]
    fn typed_literal_round_trips() {
        let literal = Literal::new_typed("42", xsd::INTEGER.clone());
        let ox = literal_to_oxrdf(&literal).unwrap();
        let back = literal_from_oxrdf(&ox);
        assert_eq!(back, literal);
    }

    #[test]
    fn default_graph_maps_both_ways() {
        let graph: Term = DefaultGraph.into();
        let ox = graph_name_to_oxrdf(&graph).unwrap();
        assert_eq!(ox, oxrdf::GraphName::DefaultGraph);
        assert_eq!(graph_name_from_oxrdf(&ox), graph);
    }

    #[test]
    fn quoted_triple_round_trips() {
        let quoted = QuotedTriple::new(
            NamedNode::new_unchecked("http://example.com/s").into(),
            NamedNode::new_unchecked("http://example.com/p").into(),
            NamedNode::new_unchecked("http://example.com/o").into(),
        );
        let term: Term = quoted.into();
        let ox = term_to_oxrdf(&term).unwrap();
        assert_eq!(term_from_oxrdf(&ox), term);
    }
}
