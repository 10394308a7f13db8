use crate::error::{QuadPosition, TermPositionError};
use crate::term::Term;
use std::fmt;

/// A quad: a triple `(subject, predicate, object)` annotated with a graph
/// identifier.
///
/// Unlike [`crate::QuotedTriple`], a `Quad` has a graph slot and is never
/// itself nested inside a [`Term`] — only `QuotedTriple`s are.
#[derive(Eq, PartialEq, Ord, PartialOrd, Debug, Clone, Hash)]
pub struct Quad {
    pub subject: Term,
    pub predicate: Term,
    pub object: Term,
    pub graph: Term,
}

impl Quad {
    /// Builds a quad, validating that every term sits in a position the data
    /// model allows:
    /// - subject: `NamedNode`, `BlankNode`, or `QuotedTriple`
    /// - predicate: `NamedNode` (or `Variable`, only legal inside query ASTs)
    /// - object: `NamedNode`, `BlankNode`, `Literal`, or `QuotedTriple`
    /// - graph: `NamedNode`, `BlankNode`, or `DefaultGraph`
    pub fn try_new(
        subject: Term,
        predicate: Term,
        object: Term,
        graph: Term,
    ) -> Result<Self, TermPositionError> {
        validate_subject(&subject)?;
        validate_predicate(&predicate)?;
        validate_object(&object)?;
        validate_graph(&graph)?;
        Ok(Self {
            subject,
            predicate,
            object,
            graph,
        })
    }

    /// Builds a quad without validating term positions.
    ///
    /// For internal callers (parsers, the changeset overlay) that already
    /// hold position-correct terms. [`Quad::try_new`] is the safe
    /// constructor and should be preferred for untrusted input.
    #[inline]
    pub fn new_unchecked(subject: Term, predicate: Term, object: Term, graph: Term) -> Self {
        Self {
            subject,
            predicate,
            object,
            graph,
        }
    }

    /// Returns a copy of this quad with the graph slot replaced.
    pub fn with_graph(&self, graph: Term) -> Self {
        Self {
            subject: self.subject.clone(),
            predicate: self.predicate.clone(),
            object: self.object.clone(),
            graph,
        }
    }
}

fn validate_subject(term: &Term) -> Result<(), TermPositionError> {
    if term.is_named_node() || term.is_blank_node() || term.is_quoted_triple() {
        Ok(())
    } else {
        Err(TermPositionError::new(QuadPosition::Subject, term.kind_name()))
    }
}

fn validate_predicate(term: &Term) -> Result<(), TermPositionError> {
    if term.is_named_node() || term.is_variable() {
        Ok(())
    } else {
        Err(TermPositionError::new(QuadPosition::Predicate, term.kind_name()))
    }
}

fn validate_object(term: &Term) -> Result<(), TermPositionError> {
    if term.is_named_node() || term.is_blank_node() || term.is_literal() || term.is_quoted_triple()
    {
        Ok(())
    } else {
        Err(TermPositionError::new(QuadPosition::Object, term.kind_name()))
    }
}

fn validate_graph(term: &Term) -> Result<(), TermPositionError> {
    if term.is_named_node() || term.is_blank_node() || term.is_default_graph() {
        Ok(())
    } else {
        Err(TermPositionError::new(QuadPosition::Graph, term.kind_name()))
    }
}

impl fmt::Display for Quad {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.subject, self.predicate, self.object)?;
        if !self.graph.is_default_graph() {
            write!(f, " {}", self.graph)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BlankNode, DefaultGraph, Literal, NamedNode};

    fn nn(s: &str) -> Term {
        NamedNode::new_unchecked(s).into()
    }

    #[test]
    fn valid_quad_is_accepted() {
        let q = Quad::try_new(nn("s"), nn("p"), nn("o"), DefaultGraph.into());
        assert!(q.is_ok());
    }

    #[test]
    fn literal_subject_is_rejected() {
        let err = Quad::try_new(Literal::new_simple("x").into(), nn("p"), nn("o"), DefaultGraph.into())
            .unwrap_err();
        assert_eq!(err.position, QuadPosition::Subject);
        assert_eq!(err.kind, "Literal");
    }

    #[test]
    fn literal_graph_is_rejected() {
        let err = Quad::try_new(nn("s"), nn("p"), nn("o"), Literal::new_simple("g").into())
            .unwrap_err();
        assert_eq!(err.position, QuadPosition::Graph);
    }

    #[test]
    fn blank_node_object_is_accepted() {
        let q = Quad::try_new(
            nn("s"),
            nn("p"),
            BlankNode::new_unchecked("o").into(),
            DefaultGraph.into(),
        );
        assert!(q.is_ok());
    }

    #[test]
    fn quad_equality_is_componentwise() {
        let a = Quad::new_unchecked(nn("s"), nn("p"), nn("o"), DefaultGraph.into());
        let b = Quad::new_unchecked(nn("s"), nn("p"), nn("o"), DefaultGraph.into());
        let c = Quad::new_unchecked(nn("s"), nn("p"), nn("different"), DefaultGraph.into());
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
