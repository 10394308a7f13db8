//! Parsing: turns wire bytes in a detected/declared format into
//! [`rdf_model::Quad`]s.
//!
//! [`RdfFormat::JsonLd`] is the one format `oxrdfio::RdfParser` (this crate's
//! dependency version) doesn't cover — JSON-LD is read directly through
//! `oxjsonld::JsonLdParser`, the same streaming reader `oxrdfio`'s own
//! serializer side wires up for writing.

use crate::bridge::quad_from_oxrdf;
use crate::error::ParseError;
use oxrdfio::{RdfFormat, RdfParser};
use rdf_model::{DefaultGraph, Quad, Term};
use std::io::Read;

/// Parse options shared by every format: a base IRI for resolving relative
/// IRIs, and the graph identity quads with an unspecified (default) graph
/// slot should be remapped to.
#[derive(Debug, Clone, Default)]
pub struct ParseOptions {
    pub base_iri: Option<String>,
    pub default_graph: Option<Term>,
}

impl ParseOptions {
    pub fn with_base_iri(mut self, base_iri: impl Into<String>) -> Self {
        self.base_iri = Some(base_iri.into());
        self
    }

    pub fn with_default_graph(mut self, graph: Term) -> Self {
        self.default_graph = Some(graph);
        self
    }
}

/// Parses `content` in the given format into a vector of quads.
///
/// Quads whose graph slot is unspecified land in [`DefaultGraph`] unless
/// [`ParseOptions::default_graph`] names a different target — the same
/// remapping [`rdf_graph`](../rdf_graph/index.html)'s mutable-graph contract
/// performs on `add`, offered here too since a parsed file is frequently fed
/// straight into a specific graph's identity.
pub fn parse_str(content: &str, format: RdfFormat, opts: &ParseOptions) -> Result<Vec<Quad>, ParseError> {
    parse_read(content.as_bytes(), format, opts)
}

/// Parses from a [`Read`] implementation — the streaming entry point RDF/XML
/// and JSON-LD require (§9: "push-based streaming is effectively required").
pub fn parse_read<R: Read>(
    reader: R,
    format: RdfFormat,
    opts: &ParseOptions,
) -> Result<Vec<Quad>, ParseError> {
    match format {
        RdfFormat::JsonLd { .. } => parse_json_ld(reader, opts),
        other => parse_with_oxrdfio(reader, other, opts),
    }
}

fn parse_with_oxrdfio<R: Read>(
    reader: R,
    format: RdfFormat,
    opts: &ParseOptions,
) -> Result<Vec<Quad>, ParseError> {
    let mut parser = RdfParser::from_format(format);
    if let Some(base_iri) = &opts.base_iri {
        parser = parser.with_base_iri(base_iri)?;
    }
    let mut quads = Vec::new();
    for quad in parser.parse_read(reader) {
        quads.push(quad_from_oxrdf(&quad?));
    }
    Ok(remap_default_graph(quads, opts))
}

fn parse_json_ld<R: Read>(reader: R, opts: &ParseOptions) -> Result<Vec<Quad>, ParseError> {
    let mut parser = oxjsonld::JsonLdParser::new();
    if let Some(base_iri) = &opts.base_iri {
        parser = parser.with_base_iri(base_iri.clone())?;
    }
    let mut quads = Vec::new();
    for quad in parser.for_reader(reader) {
        quads.push(quad_from_oxrdf(&quad?));
    }
    Ok(remap_default_graph(quads, opts))
}

fn remap_default_graph(quads: Vec<Quad>, opts: &ParseOptions) -> Vec<Quad> {
    let Some(target) = &opts.default_graph else {
        return quads;
    };
    quads
        .into_iter()
        .map(|quad| {
            if quad.graph == Term::from(DefaultGraph) {
                quad.with_graph(target.clone())
            } else {
                quad
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rdf_model::NamedNode;

    #[test]
    fn parses_n_triples() {
        let quads = parse_str(
            "<http://ex/s> <http://ex/p> <http://ex/o> .\n",
            RdfFormat::NTriples,
            &ParseOptions::default(),
        )
        .unwrap();
        assert_eq!(quads.len(), 1);
        assert_eq!(quads[0].graph, Term::from(DefaultGraph));
    }

    #[test]
    fn parses_turtle_star() {
        let quads = parse_str(
            "<< <http://ex/s> <http://ex/p> <http://ex/o> >> <http://ex/m> \"note\" .\n",
            RdfFormat::Turtle,
            &ParseOptions::default(),
        )
        .unwrap();
        assert_eq!(quads.len(), 1);
        assert!(quads[0].subject.is_quoted_triple());
    }

    #[test]
    fn remaps_default_graph_to_requested_identity() {
        let identity: Term = NamedNode::new_unchecked("http://ex/g").into();
        let quads = parse_str(
            "<http://ex/s> <http://ex/p> <http://ex/o> .\n",
            RdfFormat::NTriples,
            &ParseOptions::default().with_default_graph(identity.clone()),
        )
        .unwrap();
        assert_eq!(quads[0].graph, identity);
    }

    #[test]
    fn parses_json_ld() {
        let content = r#"{
            "@context": {"name": "http://schema.org/name"},
            "@id": "http://ex/s",
            "name": "Alice"
        }"#;
        let quads = parse_str(
            content,
            RdfFormat::JsonLd {
                profile: oxjsonld::JsonLdProfileSet::empty(),
            },
            &ParseOptions::default(),
        )
        .unwrap();
        assert_eq!(quads.len(), 1);
    }

    #[test]
    fn invalid_turtle_surfaces_parse_error() {
        let result = parse_str("not valid turtle @@@", RdfFormat::Turtle, &ParseOptions::default());
        assert!(result.is_err());
    }
}
