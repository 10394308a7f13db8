use oxiri::IriParseError;
use rdf_model::TermError;

/// The input did not lex/parse in the declared or detected format.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error(transparent)]
    Rdf(#[from] oxrdfio::ParseError),
    #[error(transparent)]
    JsonLd(#[from] oxjsonld::JsonLdParseError),
    #[error(transparent)]
    InvalidBaseIri(#[from] IriParseError),
}

/// A write failed, or a quad couldn't be bridged into the wire model.
#[derive(Debug, thiserror::Error)]
pub enum SerializeError {
    #[error("I/O error while serializing: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    InvalidIri(#[from] IriParseError),
    #[error(transparent)]
    InvalidTerm(#[from] TermError),
    #[error(transparent)]
    Bridge(#[from] BridgeError),
}

/// A term couldn't be bridged between `rdf-model`'s `Term` and `oxrdf`'s.
#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    #[error("{kind} terms have no RDF data-model representation in this position")]
    UnsupportedTermKind { kind: &'static str },
    #[error(transparent)]
    InvalidTerm(#[from] TermError),
}
