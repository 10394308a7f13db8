//! The `Graph` capability hierarchy (spec.md §4.3): `ReadableGraph` is the
//! base every graph implements; `MutableGraph`/`ImmutableGraph` extend it in
//! mutually exclusive directions (an in-place store vs. a value-returning
//! one); `TransactionalGraph` extends `MutableGraph` with explicit session
//! boundaries.
//!
//! Collapsed per design note 9 into `#[async_trait]` methods: synchronous
//! in-memory backends simply never hit an `.await` point, and remote
//! backends always do, but both satisfy the same `Box<dyn ReadableGraph>` /
//! `Arc<dyn MutableGraph>` trait object.

use crate::bindings::Bindings;
use crate::error::GraphError;
use crate::memory::InMemoryGraph;
use crate::options::QueryOptions;
use async_trait::async_trait;
use rdf_model::{Quad, Term};

/// The base read capability every graph implements.
#[async_trait]
pub trait ReadableGraph: Send + Sync {
    /// This graph's identity: a `NamedNode`, or [`Term::DefaultGraph`].
    fn iri(&self) -> Term;

    /// All quads in this graph.
    async fn quads(&self) -> Result<Vec<Quad>, GraphError>;

    /// Pattern match; `None` in any position means wildcard.
    async fn find(
        &self,
        subject: Option<&Term>,
        predicate: Option<&Term>,
        object: Option<&Term>,
        graph: Option<&Term>,
    ) -> Result<Vec<Quad>, GraphError>;

    async fn select(
        &self,
        query: &str,
        opts: &QueryOptions,
    ) -> Result<Vec<Bindings>, GraphError>;

    async fn ask(&self, query: &str, opts: &QueryOptions) -> Result<bool, GraphError>;

    /// Returns a fresh in-memory graph containing the result quads.
    async fn construct(
        &self,
        query: &str,
        opts: &QueryOptions,
    ) -> Result<InMemoryGraph, GraphError>;

    async fn to_string_with(&self, opts: &QueryOptions) -> Result<String, GraphError>;

    async fn save_to_file(
        &self,
        path: &std::path::Path,
        opts: &QueryOptions,
    ) -> Result<(), GraphError>;
}

/// Extends [`ReadableGraph`] with in-place mutation.
///
/// Before insertion/removal, any quad whose graph slot is
/// [`Term::DefaultGraph`] has its graph slot replaced by this graph's
/// identity (spec.md §4.3.2). A batch is staged atomically at quad
/// granularity — either the whole batch lands or none of it does.
#[async_trait]
pub trait MutableGraph: ReadableGraph {
    async fn add(&self, quads: Vec<Quad>) -> Result<(), GraphError>;

    async fn remove(&self, quads: Vec<Quad>) -> Result<(), GraphError>;

    /// Fails with [`GraphError::OperationNotSupported`] for a
    /// `DefaultGraph`-identified graph.
    async fn delete_all(&self) -> Result<(), GraphError>;

    async fn update(&self, sparql_update: &str, opts: &QueryOptions) -> Result<(), GraphError>;
}

/// Extends [`ReadableGraph`] with copy-on-write mutation: `add`/`remove`
/// return a new graph value sharing structure with the receiver where
/// possible, and never modify the receiver.
#[async_trait]
pub trait ImmutableGraph: ReadableGraph {
    type Output: ImmutableGraph;

    async fn add(&self, quads: Vec<Quad>) -> Result<Self::Output, GraphError>;

    async fn remove(&self, quads: Vec<Quad>) -> Result<Self::Output, GraphError>;
}

/// Extends [`MutableGraph`] with explicit transaction-session boundaries
/// (spec.md §4.3.4, §4.6.1).
#[async_trait]
pub trait TransactionalGraph: MutableGraph {
    async fn begin(&self) -> Result<(), GraphError>;

    async fn commit(&self) -> Result<(), GraphError>;

    async fn rollback(&self) -> Result<(), GraphError>;
}

/// Scoped transaction helper: begin, run `body`, commit on success, rollback
/// on any failure.
///
/// A rollback error is only surfaced if `body` itself succeeded — a
/// rollback following a body failure is best-effort and its error is
/// swallowed so the original failure is what the caller sees (spec.md
/// §4.3.4, §7 propagation policy).
///
/// A free function rather than a trait default method: a generic method
/// taking an arbitrary `body` closure would make `TransactionalGraph` object
/// unsafe, and nothing here needs dynamic dispatch — callers always hold a
/// concrete `StardogGraph`/`GraphDbGraph`.
pub async fn in_transaction<G, F, Fut, T>(graph: &G, body: F) -> Result<T, GraphError>
where
    G: TransactionalGraph,
    F: FnOnce(&G) -> Fut,
    Fut: std::future::Future<Output = Result<T, GraphError>>,
{
    graph.begin().await?;
    match body(graph).await {
        Ok(value) => {
            graph.commit().await?;
            Ok(value)
        }
        Err(error) => {
            let _ = graph.rollback().await;
            Err(error)
        }
    }
}
