//! SPARQL query/update preparation: parsing with global prefixes, graph-context
//! injection (`prepareQuery`/`prepareUpdate`), re-stringification, and binding
//! substitution.
//!
//! Built directly on `spargebra`'s AST (`Query`, `Update`): this crate adds no
//! AST of its own, only the preparation steps `spargebra` itself has no
//! opinion on.

mod error;
mod substitute;

pub use error::{ParseError, PrepareError, QueryKind, QueryShapeError};
pub use spargebra::algebra::GraphPattern;
pub use spargebra::{Query, SparqlParser, Update};
pub use substitute::{substitute_query_bindings, substitute_update_bindings, Bindings, BoundTerm};

use spargebra::algebra::QueryDataset;
use spargebra::term::{GraphName, GraphNamePattern, GroundQuadPattern, NamedNode};
use spargebra::GraphUpdateOperation;

/// Either an already-parsed AST or source text still needing a parse.
///
/// Mirrors the data model's "accepts a query value or string" contract: most
/// callers have a string, but a caller re-preparing an AST it already holds
/// (e.g. after [`substitute_query_bindings`]) can skip the round trip through
/// text.
pub enum QuerySource<'a> {
    Parsed(Query),
    Text(&'a str),
}

impl From<Query> for QuerySource<'_> {
    fn from(query: Query) -> Self {
        Self::Parsed(query)
    }
}

impl<'a> From<&'a str> for QuerySource<'a> {
    fn from(text: &'a str) -> Self {
        Self::Text(text)
    }
}

/// The update counterpart to [`QuerySource`].
pub enum UpdateSource<'a> {
    Parsed(Update),
    Text(&'a str),
}

impl From<Update> for UpdateSource<'_> {
    fn from(update: Update) -> Self {
        Self::Parsed(update)
    }
}

impl<'a> From<&'a str> for UpdateSource<'a> {
    fn from(text: &'a str) -> Self {
        Self::Text(text)
    }
}

/// A registered prefix, as handed to [`parse_query`]/[`parse_update`].
pub type Prefix<'a> = (&'a str, &'a str);

fn configured_parser<'a>(
    base_iri: Option<&str>,
    prefixes: impl IntoIterator<Item = Prefix<'a>>,
) -> Result<SparqlParser, ParseError> {
    let mut parser = SparqlParser::new();
    if let Some(base_iri) = base_iri {
        parser = parser.with_base_iri(base_iri)?;
    }
    for (name, iri) in prefixes {
        parser = parser.with_prefix(name, iri)?;
    }
    Ok(parser)
}

/// Parses a SPARQL query, configured with the given base IRI and prefixes.
///
/// RDF-star extensions (quoted triple patterns) are always available: this
/// crate depends on `spargebra`'s `rdf-star` feature unconditionally, per the
/// data model's RDF-star support.
///
/// Prefixes supplied here act as defaults: a `PREFIX` declaration inside
/// `sparql` itself shadows one of the same name passed here, since
/// `spargebra` resolves prefixes to full IRIs while parsing and an in-query
/// declaration is seen after the ones configured on the parser.
pub fn parse_query<'a>(
    sparql: &str,
    base_iri: Option<&str>,
    prefixes: impl IntoIterator<Item = Prefix<'a>>,
) -> Result<Query, ParseError> {
    Ok(configured_parser(base_iri, prefixes)?.parse_query(sparql)?)
}

/// Parses a SPARQL update, configured the same way as [`parse_query`].
pub fn parse_update<'a>(
    sparql: &str,
    base_iri: Option<&str>,
    prefixes: impl IntoIterator<Item = Prefix<'a>>,
) -> Result<Update, ParseError> {
    Ok(configured_parser(base_iri, prefixes)?.parse_update(sparql)?)
}

/// Parses (if needed), verifies the query form, and injects the receiving
/// graph's identity into the dataset's default-graph clause.
///
/// Per the data model: a `FROM` clause is never replaced, only added to
/// (union, idempotent) — a query that already names the identity graph as a
/// default graph is left exactly as it was.
pub fn prepare_query<'a>(
    source: impl Into<QuerySource<'a>>,
    expected: QueryKind,
    graph_identity: Option<&NamedNode>,
    base_iri: Option<&str>,
    prefixes: impl IntoIterator<Item = Prefix<'a>>,
) -> Result<Query, PrepareError> {
    let mut query = match source.into() {
        QuerySource::Parsed(query) => query,
        QuerySource::Text(text) => parse_query(text, base_iri, prefixes)?,
    };
    let found = QueryKind::of(&query);
    if found != expected {
        return Err(QueryShapeError::UnexpectedQueryKind { expected, found }.into());
    }
    if let Some(identity) = graph_identity {
        inject_default_graph(&mut query, identity);
    }
    Ok(query)
}

fn inject_default_graph(query: &mut Query, identity: &NamedNode) {
    let dataset = match query {
        Query::Select { dataset, .. }
        | Query::Construct { dataset, .. }
        | Query::Describe { dataset, .. }
        | Query::Ask { dataset, .. } => dataset,
    };
    let dataset = dataset.get_or_insert_with(|| QueryDataset {
        default: Vec::new(),
        named: None,
    });
    if !dataset.default.contains(identity) {
        dataset.default.push(identity.clone());
    }
}

/// Parses (if needed) and wraps every data/pattern graph slot that doesn't
/// already name a graph in the receiving graph's identity envelope.
///
/// Covers `INSERT DATA`, `DELETE DATA`, and `INSERT/DELETE WHERE` (the latter
/// two and plain `DELETE WHERE` all parse to `spargebra`'s single
/// `DeleteInsert` operation, so one pass over its `delete`/`insert` pattern
/// lists handles all three data-model cases).
pub fn prepare_update<'a>(
    source: impl Into<UpdateSource<'a>>,
    graph_identity: Option<&NamedNode>,
    base_iri: Option<&str>,
    prefixes: impl IntoIterator<Item = Prefix<'a>>,
) -> Result<Update, PrepareError> {
    let mut update = match source.into() {
        UpdateSource::Parsed(update) => update,
        UpdateSource::Text(text) => parse_update(text, base_iri, prefixes)?,
    };
    if let Some(identity) = graph_identity {
        for operation in &mut update.operations {
            envelope_operation(operation, identity);
        }
    }
    Ok(update)
}

fn envelope_operation(operation: &mut GraphUpdateOperation, identity: &NamedNode) {
    match operation {
        GraphUpdateOperation::InsertData { data } => {
            for quad in data {
                if quad.graph_name == GraphName::DefaultGraph {
                    quad.graph_name = GraphName::NamedNode(identity.clone());
                }
            }
        }
        GraphUpdateOperation::DeleteData { data } => {
            for quad in data {
                if quad.graph_name == GraphName::DefaultGraph {
                    quad.graph_name = GraphName::NamedNode(identity.clone());
                }
            }
        }
        GraphUpdateOperation::DeleteInsert { delete, insert, .. } => {
            for pattern in delete {
                envelope_ground_quad_pattern(pattern, identity);
            }
            for pattern in insert {
                if pattern.graph_name == GraphNamePattern::DefaultGraph {
                    pattern.graph_name = GraphNamePattern::NamedNode(identity.clone());
                }
            }
        }
        GraphUpdateOperation::Load { .. }
        | GraphUpdateOperation::Clear { .. }
        | GraphUpdateOperation::Create { .. }
        | GraphUpdateOperation::Drop { .. } => {}
    }
}

fn envelope_ground_quad_pattern(pattern: &mut GroundQuadPattern, identity: &NamedNode) {
    if pattern.graph_name == GraphNamePattern::DefaultGraph {
        pattern.graph_name = GraphNamePattern::NamedNode(identity.clone());
    }
}

/// Re-stringifies a query AST back into SPARQL transport text.
pub fn stringify_query(query: &Query) -> String {
    query.to_string()
}

/// Re-stringifies an update AST back into SPARQL transport text.
pub fn stringify_update(update: &Update) -> String {
    update.to_string()
}
