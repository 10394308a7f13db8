//! The delta-tracking changeset overlay (spec.md §4.7).
//!
//! Wraps a readable graph's snapshot (its "base view") and accumulates
//! pending mutations without touching the underlying backend until
//! [`ChangesetGraph::apply_delta`] is called explicitly. Reads are served
//! from an internal materialized [`InMemoryGraph`] (`current`), so `add`/
//! `remove` here never reach out over the network even when the base was a
//! remote graph.

use crate::bindings::Bindings;
use crate::error::GraphError;
use crate::memory::InMemoryGraph;
use crate::options::QueryOptions;
use crate::traits::{MutableGraph, ReadableGraph};
use async_trait::async_trait;
use rdf_model::{Quad, Term};
use rustc_hash::FxHashSet;
use std::path::Path;
use std::sync::{Arc, RwLock};

#[derive(Default)]
struct Delta {
    added: FxHashSet<Quad>,
    removed: FxHashSet<Quad>,
}

/// Accumulates `added`/`removed` sets over a materialized snapshot of some
/// base graph, replayable onto any [`MutableGraph`] via [`apply_delta`](ChangesetGraph::apply_delta).
pub struct ChangesetGraph {
    identity: Term,
    current: InMemoryGraph,
    delta: Arc<RwLock<Delta>>,
    /// `true` when this overlay was constructed from a bare identity rather
    /// than an existing graph — replay remaps each quad's graph slot to the
    /// *target's* identity, so a changeset scoped to one graph can be
    /// replayed onto a differently-identified one.
    remap_graph_slot: bool,
}

impl ChangesetGraph {
    /// Wraps an existing readable graph: reads its current quads once to
    /// seed `current`, `remapGraphSlot` is `false`.
    pub async fn wrapping<G: ReadableGraph + ?Sized>(base: &G) -> Result<Self, GraphError> {
        let identity = base.iri();
        let quads = base.quads().await?;
        Ok(Self {
            identity: identity.clone(),
            current: InMemoryGraph::from_quads(identity, quads),
            delta: Arc::new(RwLock::new(Delta::default())),
            remap_graph_slot: false,
        })
    }

    /// Starts from a bare identity over an empty in-memory store;
    /// `remapGraphSlot` is `true`.
    pub fn new(identity: Term) -> Self {
        Self {
            current: InMemoryGraph::new(identity.clone()),
            identity,
            delta: Arc::new(RwLock::new(Delta::default())),
            remap_graph_slot: true,
        }
    }

    pub fn added(&self) -> Vec<Quad> {
        self.delta.read().expect("delta lock poisoned").added.iter().cloned().collect()
    }

    pub fn removed(&self) -> Vec<Quad> {
        self.delta.read().expect("delta lock poisoned").removed.iter().cloned().collect()
    }

    fn canonicalize(&self, quad: Quad) -> Quad {
        if quad.graph.is_default_graph() {
            quad.with_graph(self.identity.clone())
        } else {
            quad
        }
    }

    /// Replays the accumulated delta onto `target`: removes then adds.
    /// Tests depend only on final-state equivalence, per spec.md §4.7, not
    /// on this ordering.
    ///
    /// When `remapGraphSlot` is set, each replayed quad's graph slot is
    /// rewritten to `target.iri()` rather than kept as this overlay's own
    /// identity (spec.md §4.7 "Changeset remap" scenario).
    pub async fn apply_delta<G: MutableGraph>(&self, target: &G) -> Result<(), GraphError> {
        let (added, removed) = {
            let delta = self.delta.read().expect("delta lock poisoned");
            (
                delta.added.iter().cloned().collect::<Vec<_>>(),
                delta.removed.iter().cloned().collect::<Vec<_>>(),
            )
        };
        let target_identity = target.iri();
        let remap = |q: Quad| {
            if self.remap_graph_slot {
                q.with_graph(target_identity.clone())
            } else {
                q
            }
        };
        target.remove(removed.into_iter().map(remap).collect()).await?;
        target.add(added.into_iter().map(remap).collect()).await?;
        Ok(())
    }
}

#[async_trait]
impl ReadableGraph for ChangesetGraph {
    fn iri(&self) -> Term {
        self.identity.clone()
    }

    async fn quads(&self) -> Result<Vec<Quad>, GraphError> {
        self.current.quads().await
    }

    async fn find(
        &self,
        subject: Option<&Term>,
        predicate: Option<&Term>,
        object: Option<&Term>,
        graph: Option<&Term>,
    ) -> Result<Vec<Quad>, GraphError> {
        self.current.find(subject, predicate, object, graph).await
    }

    async fn select(&self, query: &str, opts: &QueryOptions) -> Result<Vec<Bindings>, GraphError> {
        self.current.select(query, opts).await
    }

    async fn ask(&self, query: &str, opts: &QueryOptions) -> Result<bool, GraphError> {
        self.current.ask(query, opts).await
    }

    async fn construct(&self, query: &str, opts: &QueryOptions) -> Result<InMemoryGraph, GraphError> {
        self.current.construct(query, opts).await
    }

    async fn to_string_with(&self, opts: &QueryOptions) -> Result<String, GraphError> {
        self.current.to_string_with(opts).await
    }

    async fn save_to_file(&self, path: &Path, opts: &QueryOptions) -> Result<(), GraphError> {
        self.current.save_to_file(path, opts).await
    }
}

#[async_trait]
impl MutableGraph for ChangesetGraph {
    async fn add(&self, quads: Vec<Quad>) -> Result<(), GraphError> {
        let canon: Vec<Quad> = quads.into_iter().map(|q| self.canonicalize(q)).collect();
        {
            let mut delta = self.delta.write().expect("delta lock poisoned");
            for quad in &canon {
                delta.removed.remove(quad);
                delta.added.insert(quad.clone());
            }
        }
        self.current.add(canon).await
    }

    async fn remove(&self, quads: Vec<Quad>) -> Result<(), GraphError> {
        let canon: Vec<Quad> = quads.into_iter().map(|q| self.canonicalize(q)).collect();
        {
            let mut delta = self.delta.write().expect("delta lock poisoned");
            for quad in &canon {
                if !delta.added.remove(quad) {
                    delta.removed.insert(quad.clone());
                }
            }
        }
        self.current.remove(canon).await
    }

    async fn delete_all(&self) -> Result<(), GraphError> {
        let all = self.current.quads().await?;
        self.remove(all).await
    }

    async fn update(&self, sparql_update: &str, opts: &QueryOptions) -> Result<(), GraphError> {
        use rdf_query::prepare_update;

        let identity = match &self.identity {
            Term::NamedNode(n) => Some(oxrdf::NamedNode::new_unchecked(n.as_str())),
            _ => None,
        };
        let prepared = prepare_update(sparql_update, identity.as_ref(), opts.base_iri.as_deref(), std::iter::empty())?;
        for operation in &prepared.operations {
            match operation {
                spargebra::GraphUpdateOperation::InsertData { data } => {
                    let quads = data.iter().map(rdf_io::quad_from_oxrdf).collect();
                    self.add(quads).await?;
                }
                spargebra::GraphUpdateOperation::DeleteData { data } => {
                    let quads = data.iter().map(rdf_io::quad_from_oxrdf).collect();
                    self.remove(quads).await?;
                }
                _ => {
                    return Err(GraphError::mutation(
                        "unsupported update operation in the changeset overlay's built-in engine",
                    ))
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rdf_model::{DefaultGraph, Literal, NamedNode as Nn};

    fn nn(s: &str) -> Term {
        Nn::new_unchecked(s).into()
    }

    #[tokio::test]
    async fn add_then_remove_leaves_empty_delta_and_current() {
        let base = InMemoryGraph::new(nn("http://ex/g"));
        let changeset = ChangesetGraph::wrapping(&base).await.unwrap();
        let quad = Quad::new_unchecked(
            nn("http://ex/a"),
            nn("http://ex/p"),
            Literal::new_typed("1", rdf_model::vocab::xsd::INTEGER.clone()).into(),
            DefaultGraph.into(),
        );
        changeset.add(vec![quad.clone()]).await.unwrap();
        changeset.remove(vec![quad]).await.unwrap();
        assert!(changeset.added().is_empty());
        assert!(changeset.removed().is_empty());
        assert!(changeset.quads().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn remap_applies_target_identity_at_replay() {
        let changeset = ChangesetGraph::new(nn("http://ex/g2"));
        let quad = Quad::new_unchecked(
            nn("http://ex/a"),
            nn("http://ex/p"),
            Literal::new_simple("v").into(),
            DefaultGraph.into(),
        );
        changeset.add(vec![quad]).await.unwrap();

        let target = InMemoryGraph::new(nn("http://ex/g3"));
        changeset.apply_delta(&target).await.unwrap();

        let landed = target.quads().await.unwrap();
        assert_eq!(landed.len(), 1);
        assert_eq!(landed[0].graph, nn("http://ex/g3"));
    }

    #[tokio::test]
    async fn added_and_removed_never_overlap() {
        let base = InMemoryGraph::new(nn("http://ex/g"));
        let changeset = ChangesetGraph::wrapping(&base).await.unwrap();
        let quad = Quad::new_unchecked(nn("s"), nn("p"), nn("o"), DefaultGraph.into());
        changeset.add(vec![quad.clone()]).await.unwrap();
        changeset.add(vec![quad.clone()]).await.unwrap();
        assert_eq!(changeset.added().len(), 1);
        changeset.remove(vec![quad]).await.unwrap();
        assert!(changeset.added().is_empty());
        assert_eq!(changeset.removed().len(), 1);
    }
}
