use rdf_model::TermError;
use rdf_query::PrepareError;

/// Which state-machine transition a [`GraphError::Transaction`] failed on
/// (spec.md §4.6.1/§7).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionOp {
    Begin,
    Commit,
    Rollback,
}

impl std::fmt::Display for TransactionOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Begin => "begin",
            Self::Commit => "commit",
            Self::Rollback => "rollback",
        })
    }
}

/// The error taxonomy for every [`crate::ReadableGraph`]/[`crate::MutableGraph`]
/// operation, composed from the lower layers' own error types (spec.md §7).
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    /// A query-preparation step failed (parse, or wrong query-form shape).
    #[error(transparent)]
    Prepare(#[from] PrepareError),
    /// The query engine refused or failed to execute a prepared query.
    #[error("query failed: {0}")]
    Query(String),
    /// An `add`/`remove`/`update` operation failed.
    #[error("mutation failed: {0}")]
    Mutation(String),
    /// `deleteAll` was called on a `DefaultGraph`-identified graph.
    #[error("operation not supported on the default graph")]
    OperationNotSupported,
    /// A term couldn't be constructed or didn't fit its quad position.
    #[error(transparent)]
    Term(#[from] TermError),
    #[error(transparent)]
    Parse(#[from] rdf_io::ParseError),
    #[error(transparent)]
    Serialize(#[from] rdf_io::SerializeError),
    #[error(transparent)]
    Io(#[from] rdf_io::IoError),
    #[error("binding decode error: {0}")]
    BindingDecode(String),
    /// A transport-level failure reaching the backend at all (DNS, TCP,
    /// TLS, timeout) — distinct from a well-formed HTTP error response.
    #[error("connection error calling {url}: {message}")]
    Connection { url: String, message: String },
    /// The backend answered with a non-2xx status.
    #[error("{backend} returned HTTP {status}{} for {url}: {body}",
        .reason.as_deref().map(|r| format!(" ({r})")).unwrap_or_default())]
    HttpStatus {
        backend: &'static str,
        status: u16,
        reason: Option<String>,
        url: String,
        body: String,
    },
    /// A `begin`/`commit`/`rollback` transition was refused by the backend
    /// or violated the state machine (spec.md §4.6.1).
    #[error("transaction {op} failed: {message}")]
    Transaction { op: TransactionOp, message: String },
    /// `begin` was called while a transaction was already active.
    #[error("a transaction is already active on this graph handle")]
    AlreadyActive,
    /// `commit`/`rollback` was called with no active transaction.
    #[error("no active transaction on this graph handle")]
    NoActiveTransaction,
}

impl GraphError {
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query(message.into())
    }

    pub fn mutation(message: impl Into<String>) -> Self {
        Self::Mutation(message.into())
    }

    pub fn binding_decode(message: impl Into<String>) -> Self {
        Self::BindingDecode(message.into())
    }

    pub fn connection(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Connection {
            url: url.into(),
            message: message.into(),
        }
    }

    /// A GraphDB `begin` returned 2xx without a `Location` header —
    /// surfaced as a [`TransactionOp::Begin`] failure per spec.md §7's
    /// `MissingLocationHeaderError` row.
    pub fn missing_location_header(url: impl Into<String>) -> Self {
        Self::Transaction {
            op: TransactionOp::Begin,
            message: format!("backend at {} returned 2xx with no Location header", url.into()),
        }
    }
}
