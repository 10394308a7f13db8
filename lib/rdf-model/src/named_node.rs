use oxiri::{Iri, IriParseError};
use std::cmp::Ordering;
use std::fmt;

/// An RDF [IRI](https://www.w3.org/TR/rdf11-concepts/#dfn-iri).
///
/// Compared and hashed byte-wise on the IRI string, as the data model requires.
///
/// ```
/// use rdf_model::NamedNode;
///
/// assert_eq!(
///     "<http://example.com/foo>",
///     NamedNode::new("http://example.com/foo").unwrap().to_string()
/// );
/// ```
#[derive(Eq, PartialEq, Ord, PartialOrd, Debug, Clone, Hash)]
pub struct NamedNode {
    iri: String,
}

impl NamedNode {
    /// Builds and validates an IRI.
    pub fn new(iri: impl Into<String>) -> Result<Self, IriParseError> {
        Ok(Self::new_from_iri(Iri::parse(iri.into())?))
    }

    fn new_from_iri(iri: Iri<String>) -> Self {
        Self::new_unchecked(iri.into_inner())
    }

    /// Builds an IRI without validating it.
    ///
    /// It is the caller's responsibility to ensure `iri` is a valid IRI.
    /// [`NamedNode::new`] is the safe constructor and should be preferred for untrusted data.
    #[inline]
    pub fn new_unchecked(iri: impl Into<String>) -> Self {
        Self { iri: iri.into() }
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.iri
    }

    #[inline]
    pub fn into_string(self) -> String {
        self.iri
    }
}

impl fmt::Display for NamedNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}>", escape_iri(&self.iri))
    }
}

impl PartialEq<str> for NamedNode {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == other
    }
}

impl PartialEq<&str> for NamedNode {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

impl From<Iri<String>> for NamedNode {
    fn from(iri: Iri<String>) -> Self {
        Self::new_from_iri(iri)
    }
}

/// Escapes an IRI's reserved N-Triples/Turtle/SPARQL characters (`\` and `>`) for wire output.
pub(crate) fn escape_iri(iri: &str) -> String {
    if iri.contains(['\\', '>']) {
        iri.replace('\\', "\\\\").replace('>', "\\>")
    } else {
        iri.to_owned()
    }
}

impl PartialOrd<str> for NamedNode {
    fn partial_cmp(&self, other: &str) -> Option<Ordering> {
        self.as_str().partial_cmp(other)
    }
}
