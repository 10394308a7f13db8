//! The `Graph` capability hierarchy, in-memory/persistent quad stores, the
//! changeset overlay, and the built-in BGP-only query engine (spec.md §4.3,
//! §4.5, §4.7).
//!
//! This crate is layer L2/L3: it sits on [`rdf_model`] (terms/quads) and
//! [`rdf_query`] (SPARQL preparation), and wraps [`rdf_io`] for
//! serialization and file I/O. Remote backends (`rdf-remote`) implement the
//! same [`TransactionalGraph`] trait this crate defines, so callers hold a
//! single `Arc<dyn MutableGraph>`/`Box<dyn ReadableGraph>` regardless of
//! whether the concrete graph is local or remote.

mod bindings;
mod changeset;
mod engine;
pub mod error;
mod memory;
mod options;
mod persistent;
mod traits;

pub use bindings::Bindings;
pub use changeset::ChangesetGraph;
pub use engine::BgpEngine;
pub use error::{GraphError, TransactionOp};
pub use memory::InMemoryGraph;
pub use options::QueryOptions;
pub use persistent::PersistentGraph;
pub use traits::{in_transaction, ImmutableGraph, MutableGraph, ReadableGraph, TransactionalGraph};
