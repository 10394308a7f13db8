use crate::blank_node::{BlankNode, BlankNodeIdGenerator};
use crate::error::TermError;
use crate::literal::{BaseDirection, Literal};
use crate::named_node::NamedNode;
use crate::quad::Quad;
use crate::term::{DefaultGraph, QuotedTriple, Term};
use crate::variable::Variable;

/// The second argument to [`TermFactory::literal`]: a bare string means a
/// language tag, a `NamedNode` means a datatype, and an explicit
/// `{language, direction}` pair means a directional language-tagged literal.
#[derive(Debug, Clone)]
pub enum LiteralTag {
    None,
    Language(String),
    Datatype(NamedNode),
    DirectionalLanguage {
        language: String,
        direction: BaseDirection,
    },
}

impl From<&str> for LiteralTag {
    fn from(language: &str) -> Self {
        Self::Language(language.to_owned())
    }
}

impl From<String> for LiteralTag {
    fn from(language: String) -> Self {
        Self::Language(language)
    }
}

impl From<NamedNode> for LiteralTag {
    fn from(datatype: NamedNode) -> Self {
        Self::Datatype(datatype)
    }
}

/// A shape-agnostic term representation for interop at system boundaries:
/// externally supplied RDF/JS-style term objects (`{termType, value, ...}`)
/// and SPARQL results JSON bindings both decode through this type before
/// becoming a [`Term`].
#[derive(Debug, Clone, PartialEq)]
pub enum RawTerm {
    NamedNode {
        value: String,
    },
    BlankNode {
        value: String,
    },
    Literal {
        value: String,
        datatype: Option<String>,
        language: Option<String>,
        direction: Option<String>,
    },
    Variable {
        value: String,
    },
    DefaultGraph,
    Triple {
        subject: Box<RawTerm>,
        predicate: Box<RawTerm>,
        object: Box<RawTerm>,
    },
}

/// A shape-agnostic quad representation, the four-slot counterpart to [`RawTerm`].
#[derive(Debug, Clone, PartialEq)]
pub struct RawQuad {
    pub subject: RawTerm,
    pub predicate: RawTerm,
    pub object: RawTerm,
    pub graph: RawTerm,
}

/// The sole constructor for terms and quads.
///
/// Owns the blank-node counter design note 9 asks to be scoped per factory
/// (not process-wide), so distinct `TermFactory`s never collide on
/// auto-generated blank node labels even when used concurrently.
#[derive(Debug, Default)]
pub struct TermFactory {
    blank_node_ids: BlankNodeIdGenerator,
}

impl TermFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn named_node(&self, iri: impl Into<String>) -> Result<NamedNode, TermError> {
        Ok(NamedNode::new(iri)?)
    }

    /// Builds a blank node; with no label, generates a fresh one unique
    /// within this factory's lifetime.
    pub fn blank_node(&self, label: Option<&str>) -> BlankNode {
        match label {
            Some(label) => BlankNode::new_unchecked(label),
            None => self.blank_node_ids.fresh(),
        }
    }

    pub fn literal(&self, lexical: impl Into<String>, tag: LiteralTag) -> Result<Literal, TermError> {
        match tag {
            LiteralTag::None => Ok(Literal::new_simple(lexical)),
            LiteralTag::Datatype(datatype) => Ok(Literal::new_typed(lexical, datatype)),
            LiteralTag::Language(language) => {
                Ok(Literal::new_language_tagged(lexical, language)?)
            }
            LiteralTag::DirectionalLanguage { language, direction } => Ok(
                Literal::new_language_tagged_with_direction(lexical, language, Some(direction))?,
            ),
        }
    }

    pub fn variable(&self, name: impl Into<String>) -> Result<Variable, TermError> {
        Variable::new(name).map_err(|_| {
            TermError::UnknownTermKind("variable name must not be empty".to_owned())
        })
    }

    pub fn default_graph(&self) -> DefaultGraph {
        DefaultGraph
    }

    /// Builds a quad; an omitted graph is the default graph.
    pub fn quad(
        &self,
        subject: Term,
        predicate: Term,
        object: Term,
        graph: Option<Term>,
    ) -> Result<Quad, TermError> {
        Ok(Quad::try_new(
            subject,
            predicate,
            object,
            graph.unwrap_or_else(|| self.default_graph().into()),
        )?)
    }

    /// Converts an externally supplied term shape, recursing through
    /// `QuotedTriple`/`Triple` positions.
    pub fn from_term(&self, raw: &RawTerm) -> Result<Term, TermError> {
        Ok(match raw {
            RawTerm::NamedNode { value } => self.named_node(value.clone())?.into(),
            RawTerm::BlankNode { value } => self.blank_node(Some(value)).into(),
            RawTerm::Literal {
                value,
                datatype,
                language,
                direction,
            } => {
                let tag = match (language, datatype) {
                    (Some(language), _) => {
                        let direction = match direction.as_deref() {
                            Some("ltr") => Some(BaseDirection::Ltr),
                            Some("rtl") => Some(BaseDirection::Rtl),
                            _ => None,
                        };
                        if let Some(direction) = direction {
                            LiteralTag::DirectionalLanguage {
                                language: language.clone(),
                                direction,
                            }
                        } else {
                            LiteralTag::Language(language.clone())
                        }
                    }
                    (None, Some(datatype)) => LiteralTag::Datatype(self.named_node(datatype.clone())?),
                    (None, None) => LiteralTag::None,
                };
                self.literal(value.clone(), tag)?.into()
            }
            RawTerm::Variable { value } => self.variable(value.clone())?.into(),
            RawTerm::DefaultGraph => self.default_graph().into(),
            RawTerm::Triple {
                subject,
                predicate,
                object,
            } => QuotedTriple::new(
                self.from_term(subject)?,
                self.from_term(predicate)?,
                self.from_term(object)?,
            )
            .into(),
        })
    }

    /// Converts an externally supplied quad shape.
    pub fn from_quad(&self, raw: &RawQuad) -> Result<Quad, TermError> {
        Ok(Quad::try_new(
            self.from_term(&raw.subject)?,
            self.from_term(&raw.predicate)?,
            self.from_term(&raw.object)?,
            self.from_term(&raw.graph)?,
        )?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_node_without_label_is_fresh_each_time() {
        let factory = TermFactory::new();
        let a = factory.blank_node(None);
        let b = factory.blank_node(None);
        assert_ne!(a, b);
    }

    #[test]
    fn literal_with_string_tag_is_language() {
        let factory = TermFactory::new();
        let l = factory.literal("hi", "en".into()).unwrap();
        assert_eq!(l.language(), Some("en"));
    }

    #[test]
    fn literal_with_named_node_tag_is_datatype() {
        let factory = TermFactory::new();
        let dt = factory.named_node("http://www.w3.org/2001/XMLSchema#integer").unwrap();
        let l = factory.literal("1", dt.into()).unwrap();
        assert_eq!(l.datatype().as_str(), "http://www.w3.org/2001/XMLSchema#integer");
    }

    #[test]
    fn quad_without_graph_defaults_to_default_graph() {
        let factory = TermFactory::new();
        let s = factory.named_node("http://s").unwrap().into();
        let p = factory.named_node("http://p").unwrap().into();
        let o = factory.named_node("http://o").unwrap().into();
        let q = factory.quad(s, p, o, None).unwrap();
        assert!(q.graph.is_default_graph());
    }

    #[test]
    fn from_term_recurses_through_quoted_triples() {
        let factory = TermFactory::new();
        let raw = RawTerm::Triple {
            subject: Box::new(RawTerm::NamedNode { value: "http://s".into() }),
            predicate: Box::new(RawTerm::NamedNode { value: "http://p".into() }),
            object: Box::new(RawTerm::NamedNode { value: "http://o".into() }),
        };
        let term = factory.from_term(&raw).unwrap();
        assert!(term.is_quoted_triple());
    }

    #[test]
    fn from_term_rejects_unknown_datatype_iri() {
        let factory = TermFactory::new();
        let raw = RawTerm::Literal {
            value: "x".into(),
            datatype: Some("not an iri".into()),
            language: None,
            direction: None,
        };
        assert!(factory.from_term(&raw).is_err());
    }
}
