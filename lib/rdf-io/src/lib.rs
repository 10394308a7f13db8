//! Format-polymorphic RDF parsing/serialization: Turtle, TriG, N-Triples,
//! N-Quads, RDF/XML, and JSON-LD, all with RDF-star support where the wire
//! format has a variant for it, plus format detection and the "upgrade to
//! the star variant on serialize" rule.
//!
//! This crate is layer L1: it sits on [`rdf_model`] (the term/quad model)
//! and wraps `oxigraph`'s own format crates (`oxrdfio`, `oxttl`, `oxrdfxml`,
//! `oxjsonld`) rather than reimplementing any parser.

mod bridge;
pub mod error;
mod file;
mod format;
mod parse;
mod serialize;

pub use bridge::{
    graph_name_from_oxrdf, graph_name_to_oxrdf, quad_from_oxrdf, quad_to_oxrdf, subject_to_oxrdf,
    term_from_oxrdf, term_to_oxrdf,
};
pub use error::{BridgeError, ParseError, SerializeError};
pub use file::{from_file, from_file_with_format, save_to_file, IoError};
pub use format::{default_format, has_star_variant, resolve, resolve_explicit, resolve_extension, sniff};
pub use oxrdfio::RdfFormat;
pub use parse::{parse_read, parse_str, ParseOptions};
pub use serialize::{serialize, serialize_to_string, SerializeOptions};
