use oxiri::IriParseError;
use spargebra::SparqlSyntaxError;

/// The SPARQL query/update string didn't parse.
///
/// Wraps `spargebra`'s own syntax error rather than re-deriving one; this
/// crate has nothing useful to add to a parse failure beyond the location
/// spargebra already reports.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error(transparent)]
    Syntax(#[from] SparqlSyntaxError),
    #[error("invalid base IRI or prefix IRI: {0}")]
    InvalidIri(#[from] IriParseError),
}

/// A parsed query or update didn't have the shape the caller required.
#[derive(Debug, thiserror::Error)]
pub enum QueryShapeError {
    #[error("expected a {expected} query, found a {found} query")]
    UnexpectedQueryKind { expected: QueryKind, found: QueryKind },
    #[error("expected a query, found an update")]
    ExpectedQuery,
    #[error("expected an update, found a query")]
    ExpectedUpdate,
}

/// Either stage of preparation can fail to parse or fail shape verification.
#[derive(Debug, thiserror::Error)]
pub enum PrepareError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Shape(#[from] QueryShapeError),
}

/// The four SPARQL query forms `prepareQuery` can be asked to verify against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryKind {
    Select,
    Ask,
    Construct,
    Describe,
}

impl std::fmt::Display for QueryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Select => "SELECT",
            Self::Ask => "ASK",
            Self::Construct => "CONSTRUCT",
            Self::Describe => "DESCRIBE",
        })
    }
}

impl QueryKind {
    pub(crate) fn of(query: &spargebra::Query) -> Self {
        match query {
            spargebra::Query::Select { .. } => Self::Select,
            spargebra::Query::Ask { .. } => Self::Ask,
            spargebra::Query::Construct { .. } => Self::Construct,
            spargebra::Query::Describe { .. } => Self::Describe,
        }
    }
}
