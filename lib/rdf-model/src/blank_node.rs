use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// An RDF [blank node](https://www.w3.org/TR/rdf11-concepts/#dfn-blank-node).
///
/// Identity is by `label`, not by reference: two `BlankNode`s with the same
/// label compare equal. Blank node scope (which graph or parse batch a label
/// is meaningful within) is the caller's responsibility — this type is a
/// bare label carrier, matching the data model's "scoped to producing graph"
/// note.
#[derive(Eq, PartialEq, Ord, PartialOrd, Debug, Clone, Hash)]
pub struct BlankNode {
    label: String,
}

impl BlankNode {
    /// Creates a blank node with an explicit label.
    #[inline]
    pub fn new_unchecked(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
        }
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.label
    }

    #[inline]
    pub fn into_string(self) -> String {
        self.label
    }
}

impl fmt::Display for BlankNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "_:{}", self.label)
    }
}

/// A counter-based, non-cryptographic generator of fresh blank node labels.
///
/// The data model requires blank-node label generation to be "atomic" and
/// counter-based rather than content-addressed; design note 9 additionally
/// asks that the counter be owned per-graph or per-parse-batch rather than
/// process-wide, to avoid collisions across concurrent imports. Each
/// [`crate::TermFactory`] owns one of these.
#[derive(Debug, Default)]
pub struct BlankNodeIdGenerator {
    counter: AtomicU64,
}

impl BlankNodeIdGenerator {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a fresh, unique-within-this-generator label.
    pub fn fresh(&self) -> BlankNode {
        let id = self.counter.fetch_add(1, Ordering::Relaxed);
        BlankNode::new_unchecked(format!("b{id}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_labels_are_unique() {
        let gen = BlankNodeIdGenerator::new();
        let a = gen.fresh();
        let b = gen.fresh();
        assert_ne!(a, b);
    }

    #[test]
    fn equality_is_by_label() {
        assert_eq!(
            BlankNode::new_unchecked("x"),
            BlankNode::new_unchecked("x")
        );
    }
}
