//! Textual SPARQL synthesis for the one wire operation the RDF format codec
//! can't produce: GraphDB's transactional `remove`, which goes out as a
//! synthesized `DELETE DATA { … }` body rather than an RDF payload
//! (spec.md §4.6.2's "remove quads (txn)" row, §4.6.3).
//!
//! Term rendering itself needs no new code: `rdf_model::Term`'s own
//! [`std::fmt::Display`] already renders exactly the escaping spec.md §4.6.3
//! asks for (`<iri>` with `\`/`>` escaped, `_:label`, `"lexical"` escaped
//! then `@lang`/`^^<datatype>`, `<< s p o >>` recursively) — it's the same
//! N-Triples/Turtle-star term syntax SPARQL data blocks use. This module
//! only adds the part `Display` doesn't do on its own: grouping quads by
//! graph slot into `GRAPH <iri> { … }` blocks vs. an inline default-graph
//! block.

use rdf_model::{Quad, Term};
use std::collections::BTreeMap;
use std::fmt::Write as _;

fn data_block(quads: &[Quad]) -> String {
    let mut by_graph: BTreeMap<&Term, Vec<&Quad>> = BTreeMap::new();
    for quad in quads {
        by_graph.entry(&quad.graph).or_default().push(quad);
    }
    let mut out = String::new();
    for (graph, quads) in by_graph {
        let wrap = !graph.is_default_graph();
        if wrap {
            let _ = writeln!(out, "GRAPH {graph} {{");
        }
        for quad in quads {
            let _ = writeln!(out, "  {} {} {} .", quad.subject, quad.predicate, quad.object);
        }
        if wrap {
            out.push_str("}\n");
        }
    }
    out
}

/// Synthesizes a `DELETE DATA { … }` update body for `quads`, grouped by
/// graph slot (spec.md §4.6.2 GraphDB "remove quads (txn)").
pub fn synthesize_delete_data(quads: &[Quad]) -> String {
    format!("DELETE DATA {{\n{}}}", data_block(quads))
}

/// Synthesizes an `INSERT DATA { … }` update body, for parity with
/// `synthesize_delete_data` (not required by any wire-ops row today — `add`
/// always goes out as an RDF payload — but GraphDB's `action=UPDATE` path
/// accepts it identically and a caller composing a manual update can reuse
/// this instead of hand-building `INSERT DATA` text).
pub fn synthesize_insert_data(quads: &[Quad]) -> String {
    format!("INSERT DATA {{\n{}}}", data_block(quads))
}

/// Stardog renders pseudo-IRIs of the form `stardog:context:<word>` as
/// `<stardog:context:word>` when it stringifies a query/update AST back to
/// text; those must be post-processed to strip the angle brackets before
/// wire submission (spec.md §6 "Stardog-specific syntax passthrough").
pub fn strip_stardog_context_brackets(text: &str) -> String {
    const MARKER: &str = "<stardog:context:";
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(start) = rest.find(MARKER) {
        out.push_str(&rest[..start]);
        let after_marker = &rest[start + 1..]; // skip the '<'
        match after_marker.find('>') {
            Some(end) => {
                out.push_str(&after_marker[..end]);
                rest = &after_marker[end + 1..];
            }
            None => {
                out.push_str(&rest[start..]);
                rest = "";
                break;
            }
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rdf_model::{DefaultGraph, NamedNode, QuotedTriple};

    fn nn(s: &str) -> Term {
        NamedNode::new_unchecked(s).into()
    }

    #[test]
    fn default_graph_quads_are_inline() {
        let quad = Quad::new_unchecked(nn("http://ex/s"), nn("http://ex/p"), nn("http://ex/o"), DefaultGraph.into());
        let body = synthesize_delete_data(&[quad]);
        assert!(body.contains("<http://ex/s> <http://ex/p> <http://ex/o> ."));
        assert!(!body.contains("GRAPH"));
    }

    #[test]
    fn named_graph_quads_are_wrapped() {
        let quad = Quad::new_unchecked(nn("http://ex/s"), nn("http://ex/p"), nn("http://ex/o"), nn("http://ex/g"));
        let body = synthesize_delete_data(&[quad]);
        assert!(body.contains("GRAPH <http://ex/g> {"));
    }

    #[test]
    fn quoted_triple_subject_renders_with_double_angle_brackets() {
        let quoted: Term = QuotedTriple::new(nn("http://ex/s"), nn("http://ex/p"), nn("http://ex/o")).into();
        let quad = Quad::new_unchecked(quoted, nn("http://ex/meta"), rdf_model::Literal::new_simple("note").into(), DefaultGraph.into());
        let body = synthesize_delete_data(&[quad]);
        assert!(body.contains("<< <http://ex/s> <http://ex/p> <http://ex/o> >>"));
    }

    #[test]
    fn strips_stardog_context_angle_brackets() {
        let text = "GRAPH <stardog:context:all> { ?s ?p ?o }";
        assert_eq!(strip_stardog_context_brackets(text), "GRAPH stardog:context:all { ?s ?p ?o }");
    }

    #[test]
    fn leaves_ordinary_iris_untouched() {
        let text = "GRAPH <http://ex/g> { ?s ?p ?o }";
        assert_eq!(strip_stardog_context_brackets(text), text);
    }
}
