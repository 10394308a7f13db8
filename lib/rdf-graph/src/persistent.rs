//! The persistent immutable store (spec.md §4.5.2).
//!
//! A value-equality-bearing set of quads with structural sharing across
//! `add`/`remove`: every operation returns a new [`PersistentGraph`], the
//! receiver is untouched. No persistent/structural-sharing collection crate
//! (`im`, `rpds`, …) appears anywhere in the corpus this crate is grounded
//! on, so sharing is approximated with clone-on-write over an `Arc<FxHashSet<Quad>>`:
//! unmutated versions share their backing set via the `Arc`; a mutation
//! clones the whole set once and produces a fresh `Arc` around it. This is
//! documented as an explicit substitution in `DESIGN.md` — it satisfies the
//! value-equality and non-mutation contracts spec.md asks for, just not
//! sub-structural sharing within a single mutation.

use crate::bindings::Bindings;
use crate::engine::BgpEngine;
use crate::error::GraphError;
use crate::memory::InMemoryGraph;
use crate::options::QueryOptions;
use crate::traits::{ImmutableGraph, ReadableGraph};
use async_trait::async_trait;
use rdf_model::{NamedNode, PrefixMap, Quad, Term};
use rdf_query::{prepare_query, QueryKind};
use rustc_hash::FxHashSet;
use std::path::Path;
use std::sync::Arc;

/// Value-equality-bearing immutable quad set.
#[derive(Debug, Clone)]
pub struct PersistentGraph {
    identity: Term,
    prefixes: PrefixMap,
    base_iri: Option<String>,
    quads: Arc<FxHashSet<Quad>>,
}

impl PersistentGraph {
    pub fn new(identity: Term) -> Self {
        Self {
            identity,
            prefixes: PrefixMap::default(),
            base_iri: None,
            quads: Arc::new(FxHashSet::default()),
        }
    }

    pub fn from_quads(identity: Term, quads: impl IntoIterator<Item = Quad>) -> Self {
        Self {
            identity,
            prefixes: PrefixMap::default(),
            base_iri: None,
            quads: Arc::new(quads.into_iter().collect()),
        }
    }

    pub fn with_prefixes(mut self, prefixes: PrefixMap) -> Self {
        self.prefixes = prefixes;
        self
    }

    pub fn with_base_iri(mut self, base_iri: impl Into<String>) -> Self {
        self.base_iri = Some(base_iri.into());
        self
    }

    /// Returns a value sharing the same backing set but presenting a
    /// different identity.
    pub fn with_iri(&self, iri: Term) -> Self {
        Self {
            identity: iri,
            prefixes: self.prefixes.clone(),
            base_iri: self.base_iri.clone(),
            quads: Arc::clone(&self.quads),
        }
    }

    pub fn len(&self) -> usize {
        self.quads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quads.is_empty()
    }

    fn canonicalize_graph_slot(&self, quad: Quad) -> Quad {
        if quad.graph.is_default_graph() {
            quad.with_graph(self.identity.clone())
        } else {
            quad
        }
    }

    fn identity_as_named_node(&self) -> Option<NamedNode> {
        match &self.identity {
            Term::NamedNode(n) => Some(NamedNode::new_unchecked(n.as_str())),
            _ => None,
        }
    }

    fn effective_prefixes(&self, opts: &QueryOptions) -> PrefixMap {
        match &opts.prefixes {
            Some(local) => self.prefixes.merged_over(local),
            None => self.prefixes.clone(),
        }
    }
}

fn to_oxrdf_named_node(n: &NamedNode) -> oxrdf::NamedNode {
    oxrdf::NamedNode::new_unchecked(n.as_str())
}

/// Equality is value equality of the quad set alone, ignoring identity and
/// prefixes (spec.md §4.5.2: "equality of two stores = equality of their
/// quad sets").
impl PartialEq for PersistentGraph {
    fn eq(&self, other: &Self) -> bool {
        *self.quads == *other.quads
    }
}

impl Eq for PersistentGraph {}

#[async_trait]
impl ReadableGraph for PersistentGraph {
    fn iri(&self) -> Term {
        self.identity.clone()
    }

    async fn quads(&self) -> Result<Vec<Quad>, GraphError> {
        Ok(self.quads.iter().cloned().collect())
    }

    async fn find(
        &self,
        subject: Option<&Term>,
        predicate: Option<&Term>,
        object: Option<&Term>,
        graph: Option<&Term>,
    ) -> Result<Vec<Quad>, GraphError> {
        Ok(self
            .quads
            .iter()
            .filter(|quad| {
                subject.map_or(true, |s| &quad.subject == s)
                    && predicate.map_or(true, |p| &quad.predicate == p)
                    && object.map_or(true, |o| &quad.object == o)
                    && graph.map_or(true, |g| &quad.graph == g)
            })
            .cloned()
            .collect())
    }

    async fn select(&self, query: &str, opts: &QueryOptions) -> Result<Vec<Bindings>, GraphError> {
        let identity = self.identity_as_named_node();
        let oxrdf_identity = identity.as_ref().map(to_oxrdf_named_node);
        let prefixes = self.effective_prefixes(opts);
        let prepared = prepare_query(
            query,
            QueryKind::Select,
            oxrdf_identity.as_ref(),
            opts.base_iri.as_deref().or(self.base_iri.as_deref()),
            prefixes.iter(),
        )?;
        let quads = self.quads().await?;
        BgpEngine::select(&quads, &prepared)
    }

    async fn ask(&self, query: &str, opts: &QueryOptions) -> Result<bool, GraphError> {
        let identity = self.identity_as_named_node();
        let oxrdf_identity = identity.as_ref().map(to_oxrdf_named_node);
        let prefixes = self.effective_prefixes(opts);
        let prepared = prepare_query(
            query,
            QueryKind::Ask,
            oxrdf_identity.as_ref(),
            opts.base_iri.as_deref().or(self.base_iri.as_deref()),
            prefixes.iter(),
        )?;
        let quads = self.quads().await?;
        BgpEngine::ask(&quads, &prepared)
    }

    async fn construct(&self, query: &str, opts: &QueryOptions) -> Result<InMemoryGraph, GraphError> {
        let identity = self.identity_as_named_node();
        let oxrdf_identity = identity.as_ref().map(to_oxrdf_named_node);
        let prefixes = self.effective_prefixes(opts);
        let prepared = prepare_query(
            query,
            QueryKind::Construct,
            oxrdf_identity.as_ref(),
            opts.base_iri.as_deref().or(self.base_iri.as_deref()),
            prefixes.iter(),
        )?;
        let quads = self.quads().await?;
        let result = BgpEngine::construct(&quads, &prepared)?;
        Ok(InMemoryGraph::from_quads(Term::from(rdf_model::DefaultGraph), result))
    }

    async fn to_string_with(&self, opts: &QueryOptions) -> Result<String, GraphError> {
        let format = opts
            .format
            .as_deref()
            .and_then(rdf_io::resolve_explicit)
            .unwrap_or_else(rdf_io::default_format);
        let prefixes = self.effective_prefixes(opts);
        let serialize_opts = rdf_io::SerializeOptions {
            base_iri: opts.base_iri.clone().or_else(|| self.base_iri.clone()),
            prefixes: Some(prefixes),
        };
        let quads = self.quads().await?;
        Ok(rdf_io::serialize_to_string(&quads, format, &serialize_opts)?)
    }

    async fn save_to_file(&self, path: &Path, opts: &QueryOptions) -> Result<(), GraphError> {
        let prefixes = self.effective_prefixes(opts);
        let serialize_opts = rdf_io::SerializeOptions {
            base_iri: opts.base_iri.clone().or_else(|| self.base_iri.clone()),
            prefixes: Some(prefixes),
        };
        let quads = self.quads().await?;
        rdf_io::save_to_file(&quads, path, opts.format.as_deref(), &serialize_opts)?;
        Ok(())
    }
}

#[async_trait]
impl ImmutableGraph for PersistentGraph {
    type Output = PersistentGraph;

    async fn add(&self, quads: Vec<Quad>) -> Result<Self::Output, GraphError> {
        let mut next: FxHashSet<Quad> = (*self.quads).clone();
        for quad in quads {
            next.insert(self.canonicalize_graph_slot(quad));
        }
        Ok(Self {
            identity: self.identity.clone(),
            prefixes: self.prefixes.clone(),
            base_iri: self.base_iri.clone(),
            quads: Arc::new(next),
        })
    }

    async fn remove(&self, quads: Vec<Quad>) -> Result<Self::Output, GraphError> {
        let mut next: FxHashSet<Quad> = (*self.quads).clone();
        for quad in quads {
            next.remove(&self.canonicalize_graph_slot(quad));
        }
        Ok(Self {
            identity: self.identity.clone(),
            prefixes: self.prefixes.clone(),
            base_iri: self.base_iri.clone(),
            quads: Arc::new(next),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rdf_model::{DefaultGraph, NamedNode as Nn};

    fn nn(s: &str) -> Term {
        Nn::new_unchecked(s).into()
    }

    #[tokio::test]
    async fn add_is_idempotent() {
        let g = PersistentGraph::new(nn("http://ex/g"));
        let quad = Quad::new_unchecked(nn("s"), nn("p"), nn("o"), DefaultGraph.into());
        let once = g.add(vec![quad.clone()]).await.unwrap();
        let twice = once.add(vec![quad]).await.unwrap();
        assert_eq!(once, twice);
    }

    #[tokio::test]
    async fn receiver_is_unchanged_after_add() {
        let g = PersistentGraph::new(nn("http://ex/g"));
        let quad = Quad::new_unchecked(nn("s"), nn("p"), nn("o"), DefaultGraph.into());
        let _ = g.add(vec![quad]).await.unwrap();
        assert!(g.is_empty());
    }

    #[tokio::test]
    async fn equality_is_set_equality_ignoring_identity() {
        let a = PersistentGraph::from_quads(
            nn("http://ex/a"),
            vec![Quad::new_unchecked(nn("s"), nn("p"), nn("o"), DefaultGraph.into())],
        );
        let b = PersistentGraph::from_quads(
            nn("http://ex/b"),
            vec![Quad::new_unchecked(nn("s"), nn("p"), nn("o"), DefaultGraph.into())],
        );
        assert_eq!(a, b);
    }
}
