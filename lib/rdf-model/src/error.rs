use oxilangtag::LanguageTagParseError;
use oxiri::IriParseError;
use thiserror::Error;

/// Errors raised while constructing terms, quads, or language-tagged literals.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TermError {
    /// An IRI failed to parse or validate.
    #[error("invalid IRI: {0}")]
    InvalidIri(#[from] IriParseError),
    /// A language tag failed to parse or validate.
    #[error("invalid language tag: {0}")]
    InvalidLanguageTag(#[from] LanguageTagParseError),
    /// [`crate::TermFactory::from_term`] / [`crate::TermFactory::from_quad`] received a
    /// shape that does not match any known term kind.
    #[error("unknown term kind: {0}")]
    UnknownTermKind(String),
    /// A [`crate::Quad`] was constructed with a term in a position the data model
    /// forbids (e.g. a [`crate::Literal`] as subject).
    #[error(transparent)]
    InvalidPosition(#[from] TermPositionError),
}

/// A term was placed in a quad position whose type it does not satisfy.
///
/// See the position constraints in the data model: subject is one of
/// `NamedNode`, `BlankNode`, `QuotedTriple`; predicate is `NamedNode` (or
/// `Variable` only inside query ASTs); object is one of `NamedNode`,
/// `BlankNode`, `Literal`, `QuotedTriple`; graph is one of `NamedNode`,
/// `BlankNode`, `DefaultGraph`.
#[derive(Debug, Error, Eq, PartialEq, Clone)]
#[error("term of kind {kind} is not allowed in {position} position")]
pub struct TermPositionError {
    pub position: QuadPosition,
    pub kind: &'static str,
}

impl TermPositionError {
    pub(crate) fn new(position: QuadPosition, kind: &'static str) -> Self {
        Self { position, kind }
    }
}

/// The four slots of a [`crate::Quad`].
#[derive(Debug, Eq, PartialEq, Clone, Copy, Hash)]
pub enum QuadPosition {
    Subject,
    Predicate,
    Object,
    Graph,
}

impl std::fmt::Display for QuadPosition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Subject => "subject",
            Self::Predicate => "predicate",
            Self::Object => "object",
            Self::Graph => "graph",
        })
    }
}
