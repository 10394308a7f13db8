//! RDF-star term/quad data model, SPARQL query preparation, format-polymorphic
//! serialization, and a `Graph` capability hierarchy spanning in-memory,
//! persistent, changeset-overlay, and HTTP-mediated transactional backends
//! (Stardog, GraphDB/RDF4J).
//!
//! This crate is the umbrella over the workspace's layered crates — it adds
//! no behavior of its own, only a single dependency and import surface for
//! applications that don't need to depend on the layers individually:
//!
//! - [`rdf_model`] (L0): [`Term`], [`Quad`], [`NamedNode`], [`Literal`],
//!   [`BlankNode`], [`Variable`], [`PrefixMap`].
//! - [`rdf_query`] (L1): SPARQL parsing and `prepareQuery`/`prepareUpdate`
//!   graph-context injection.
//! - [`rdf_io`] (L1): Turtle/TriG/N-Triples/N-Quads/RDF-XML/JSON-LD
//!   (de)serialization.
//! - [`rdf_graph`] (L2/L3): the [`Graph`] trait hierarchy, [`InMemoryGraph`],
//!   [`PersistentGraph`], [`ChangesetGraph`], and the built-in [`BgpEngine`].
//! - [`rdf_remote`] (L3): [`StardogGraph`] and [`GraphDbGraph`].

pub use rdf_graph::{
    in_transaction, BgpEngine, Bindings, ChangesetGraph, GraphError, ImmutableGraph, InMemoryGraph,
    MutableGraph, PersistentGraph, QueryOptions, ReadableGraph, TransactionOp, TransactionalGraph,
};
pub use rdf_io::{
    default_format, from_file, from_file_with_format, parse_read, parse_str, resolve, resolve_explicit,
    save_to_file, serialize, serialize_to_string, sniff, IoError, ParseOptions, RdfFormat, SerializeOptions,
};
pub use rdf_model::{
    BaseDirection, BlankNode, BlankNodeIdGenerator, DefaultGraph, Literal, NamedNode, Namespace, PrefixMap,
    Quad, QuotedTriple, Term, TermError, Variable,
};
pub use rdf_query::{
    parse_query, parse_update, prepare_query, prepare_update, stringify_query, stringify_update,
    substitute_query_bindings, substitute_update_bindings, BoundTerm, ParseError, PrepareError, Query,
    QueryKind, QuerySource, Update, UpdateSource,
};
/// The variable-to-term substitution map [`substitute_query_bindings`]/
/// [`substitute_update_bindings`] take, re-exported under its own name since
/// [`rdf_graph::Bindings`] (a query *result* row) already claims `Bindings`.
pub use rdf_query::Bindings as SubstitutionBindings;
pub use rdf_remote::{GraphDbConfig, GraphDbGraph, StardogConfig, StardogGraph};

/// The full `Graph` capability hierarchy's base trait, re-exported under the
/// data model's own name for callers that want `use rdf_graph_kit::Graph;`
/// rather than the crate-qualified [`ReadableGraph`].
pub use rdf_graph::ReadableGraph as Graph;
