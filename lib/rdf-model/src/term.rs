use crate::blank_node::BlankNode;
use crate::literal::Literal;
use crate::named_node::NamedNode;
use crate::variable::Variable;
use std::fmt;

/// The unnamed graph. A zero-sized singleton value.
#[derive(Eq, PartialEq, Ord, PartialOrd, Debug, Clone, Copy, Hash, Default)]
pub struct DefaultGraph;

impl fmt::Display for DefaultGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("DEFAULT")
    }
}

/// An RDF-star [quoted triple](https://www.w3.org/TR/rdf12-concepts/#section-triple-terms):
/// a triple used as a term, nested in a [`Term::QuotedTriple`].
///
/// Carries only `(subject, predicate, object)` — no graph slot — which is
/// what keeps `Quad` from being self-recursive (design note 9): a `Quad`
/// embeds `Term`s, one arm of `Term` embeds a boxed `QuotedTriple`, and
/// `QuotedTriple` embeds `Term`s again, terminating the recursion through
/// the `Box` indirection rather than through `Quad` itself.
#[derive(Eq, PartialEq, Ord, PartialOrd, Debug, Clone, Hash)]
pub struct QuotedTriple {
    pub subject: Term,
    pub predicate: Term,
    pub object: Term,
}

impl QuotedTriple {
    pub fn new(subject: Term, predicate: Term, object: Term) -> Self {
        Self {
            subject,
            predicate,
            object,
        }
    }
}

impl fmt::Display for QuotedTriple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<< {} {} {} >>", self.subject, self.predicate, self.object)
    }
}

/// A tagged union over the six kinds of RDF term this library recognizes,
/// matching the data model's "tagged variant with six cases" definition:
/// `NamedNode`, `BlankNode`, `Literal`, `Variable`, `DefaultGraph`,
/// `QuotedTriple`.
///
/// All variants are immutable value types with structural equality and
/// stable hashing: `a == b` implies `hash(a) == hash(b)` for every pair, and
/// equality through `QuotedTriple` is deep (recursive).
///
/// Which variants are legal in which [`crate::Quad`] position is a property
/// of the quad, not of `Term` itself — see [`crate::Quad::try_new`].
#[derive(Eq, PartialEq, Ord, PartialOrd, Debug, Clone, Hash)]
pub enum Term {
    NamedNode(NamedNode),
    BlankNode(BlankNode),
    Literal(Literal),
    Variable(Variable),
    DefaultGraph(DefaultGraph),
    QuotedTriple(Box<QuotedTriple>),
}

impl Term {
    pub fn is_named_node(&self) -> bool {
        matches!(self, Self::NamedNode(_))
    }

    pub fn is_blank_node(&self) -> bool {
        matches!(self, Self::BlankNode(_))
    }

    pub fn is_literal(&self) -> bool {
        matches!(self, Self::Literal(_))
    }

    pub fn is_variable(&self) -> bool {
        matches!(self, Self::Variable(_))
    }

    pub fn is_default_graph(&self) -> bool {
        matches!(self, Self::DefaultGraph(_))
    }

    pub fn is_quoted_triple(&self) -> bool {
        matches!(self, Self::QuotedTriple(_))
    }

    /// A short, human-readable name of this term's kind (used in error messages).
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::NamedNode(_) => "NamedNode",
            Self::BlankNode(_) => "BlankNode",
            Self::Literal(_) => "Literal",
            Self::Variable(_) => "Variable",
            Self::DefaultGraph(_) => "DefaultGraph",
            Self::QuotedTriple(_) => "QuotedTriple",
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NamedNode(n) => n.fmt(f),
            Self::BlankNode(n) => n.fmt(f),
            Self::Literal(l) => l.fmt(f),
            Self::Variable(v) => v.fmt(f),
            Self::DefaultGraph(g) => g.fmt(f),
            Self::QuotedTriple(t) => t.fmt(f),
        }
    }
}

impl From<NamedNode> for Term {
    fn from(v: NamedNode) -> Self {
        Self::NamedNode(v)
    }
}

impl From<BlankNode> for Term {
    fn from(v: BlankNode) -> Self {
        Self::BlankNode(v)
    }
}

impl From<Literal> for Term {
    fn from(v: Literal) -> Self {
        Self::Literal(v)
    }
}

impl From<Variable> for Term {
    fn from(v: Variable) -> Self {
        Self::Variable(v)
    }
}

impl From<DefaultGraph> for Term {
    fn from(v: DefaultGraph) -> Self {
        Self::DefaultGraph(v)
    }
}

impl From<QuotedTriple> for Term {
    fn from(v: QuotedTriple) -> Self {
        Self::QuotedTriple(Box::new(v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nn(s: &str) -> Term {
        NamedNode::new_unchecked(s).into()
    }

    #[test]
    fn equal_terms_hash_equal() {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let a = nn("http://example.com/a");
        let b = nn("http://example.com/a");
        assert_eq!(a, b);

        let mut ha = DefaultHasher::new();
        a.hash(&mut ha);
        let mut hb = DefaultHasher::new();
        b.hash(&mut hb);
        assert_eq!(ha.finish(), hb.finish());
    }

    #[test]
    fn quoted_triple_equality_is_deep() {
        let t1: Term = QuotedTriple::new(nn("s"), nn("p"), nn("o")).into();
        let t2: Term = QuotedTriple::new(nn("s"), nn("p"), nn("o")).into();
        let t3: Term = QuotedTriple::new(nn("s"), nn("p"), nn("different")).into();
        assert_eq!(t1, t2);
        assert_ne!(t1, t3);
    }

    #[test]
    fn quoted_triple_display_uses_double_angle_brackets() {
        let t: Term = QuotedTriple::new(nn("http://s"), nn("http://p"), nn("http://o")).into();
        assert_eq!(t.to_string(), "<< <http://s> <http://p> <http://o> >>");
    }
}
