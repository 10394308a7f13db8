//! The indexed mutable in-memory store (spec.md §4.5.1).
//!
//! Set semantics (adding an equal quad is a no-op), unspecified iteration
//! order, pattern lookup on any subset of the four positions. Keeps one
//! canonical `FxHashSet<Arc<Quad>>` plus four auxiliary `FxHashMap` indices —
//! the same "small number of hash indices over an owned set" shape
//! `oxigraph::storage::memory::MemoryStorage` uses, minus its MVCC
//! versioning: this crate's ownership model is single-writer, not
//! point-in-time snapshots, so a plain `RwLock` suffices.

use crate::bindings::Bindings;
use crate::engine::BgpEngine;
use crate::error::GraphError;
use crate::options::QueryOptions;
use crate::traits::{MutableGraph, ReadableGraph};
use async_trait::async_trait;
use rdf_model::{NamedNode, PrefixMap, Quad, Term};
use rdf_query::{prepare_query, prepare_update, QueryKind};
use rustc_hash::FxHashMap;
use rustc_hash::FxHashSet;
use std::path::Path;
use std::sync::{Arc, RwLock};

#[derive(Default)]
struct Index {
    quads: FxHashSet<Arc<Quad>>,
    by_subject: FxHashMap<Term, FxHashSet<Arc<Quad>>>,
    by_predicate: FxHashMap<Term, FxHashSet<Arc<Quad>>>,
    by_object: FxHashMap<Term, FxHashSet<Arc<Quad>>>,
    by_graph: FxHashMap<Term, FxHashSet<Arc<Quad>>>,
}

impl Index {
    /// Returns `true` if the quad was newly inserted (set semantics: an
    /// equal quad already present is a no-op).
    fn insert(&mut self, quad: Quad) -> bool {
        let quad = Arc::new(quad);
        if !self.quads.insert(Arc::clone(&quad)) {
            return false;
        }
        self.by_subject
            .entry(quad.subject.clone())
            .or_default()
            .insert(Arc::clone(&quad));
        self.by_predicate
            .entry(quad.predicate.clone())
            .or_default()
            .insert(Arc::clone(&quad));
        self.by_object
            .entry(quad.object.clone())
            .or_default()
            .insert(Arc::clone(&quad));
        self.by_graph
            .entry(quad.graph.clone())
            .or_default()
            .insert(quad);
        true
    }

    fn remove(&mut self, quad: &Quad) -> bool {
        let Some(removed) = self.quads.take(quad) else {
            return false;
        };
        remove_from_index(&mut self.by_subject, &removed.subject, &removed);
        remove_from_index(&mut self.by_predicate, &removed.predicate, &removed);
        remove_from_index(&mut self.by_object, &removed.object, &removed);
        remove_from_index(&mut self.by_graph, &removed.graph, &removed);
        true
    }

    fn find(&self, s: Option<&Term>, p: Option<&Term>, o: Option<&Term>, g: Option<&Term>) -> Vec<Quad> {
        let mut candidate_sets = Vec::new();
        if let Some(s) = s {
            candidate_sets.push(self.by_subject.get(s));
        }
        if let Some(p) = p {
            candidate_sets.push(self.by_predicate.get(p));
        }
        if let Some(o) = o {
            candidate_sets.push(self.by_object.get(o));
        }
        if let Some(g) = g {
            candidate_sets.push(self.by_graph.get(g));
        }
        let smallest = candidate_sets
            .into_iter()
            .flatten()
            .min_by_key(|set| set.len());
        let source: Box<dyn Iterator<Item = &Arc<Quad>>> = match smallest {
            Some(set) => Box::new(set.iter()),
            None => Box::new(self.quads.iter()),
        };
        source
            .filter(|quad| matches_pattern(quad, s, p, o, g))
            .map(|quad| (**quad).clone())
            .collect()
    }
}

fn remove_from_index(index: &mut FxHashMap<Term, FxHashSet<Arc<Quad>>>, key: &Term, quad: &Quad) {
    if let Some(set) = index.get_mut(key) {
        set.remove(quad);
        if set.is_empty() {
            index.remove(key);
        }
    }
}

fn matches_pattern(
    quad: &Quad,
    s: Option<&Term>,
    p: Option<&Term>,
    o: Option<&Term>,
    g: Option<&Term>,
) -> bool {
    s.map_or(true, |s| &quad.subject == s)
        && p.map_or(true, |p| &quad.predicate == p)
        && o.map_or(true, |o| &quad.object == o)
        && g.map_or(true, |g| &quad.graph == g)
}

/// Indexed mutable quad store, cheap to clone (shares the underlying index
/// via `Arc`).
#[derive(Clone)]
pub struct InMemoryGraph {
    identity: Term,
    prefixes: PrefixMap,
    base_iri: Option<String>,
    index: Arc<RwLock<Index>>,
}

impl InMemoryGraph {
    pub fn new(identity: Term) -> Self {
        Self {
            identity,
            prefixes: PrefixMap::default(),
            base_iri: None,
            index: Arc::new(RwLock::new(Index::default())),
        }
    }

    pub fn from_quads(identity: Term, quads: impl IntoIterator<Item = Quad>) -> Self {
        let graph = Self::new(identity);
        {
            let mut index = graph.index.write().expect("index lock poisoned");
            for quad in quads {
                index.insert(quad);
            }
        }
        graph
    }

    pub fn with_prefixes(mut self, prefixes: PrefixMap) -> Self {
        self.prefixes = prefixes;
        self
    }

    pub fn with_base_iri(mut self, base_iri: impl Into<String>) -> Self {
        self.base_iri = Some(base_iri.into());
        self
    }

    /// Returns a view sharing this graph's storage but presenting a
    /// different identity (spec.md §4.3.1 `withIri`) — mutations through
    /// either view apply to the same underlying store.
    pub fn with_iri(&self, iri: Term) -> Self {
        Self {
            identity: iri,
            prefixes: self.prefixes.clone(),
            base_iri: self.base_iri.clone(),
            index: Arc::clone(&self.index),
        }
    }

    pub fn len(&self) -> usize {
        self.index.read().expect("index lock poisoned").quads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn identity_as_named_node(&self) -> Option<NamedNode> {
        match &self.identity {
            Term::NamedNode(n) => Some(NamedNode::new_unchecked(n.as_str())),
            _ => None,
        }
    }

    fn prepare_select(&self, query: &str, opts: &QueryOptions) -> Result<spargebra::Query, GraphError> {
        let identity = self.identity_as_named_node();
        let oxrdf_identity = identity.as_ref().map(to_oxrdf_named_node);
        let prefixes = self.effective_prefixes(opts);
        Ok(prepare_query(
            query,
            QueryKind::Select,
            oxrdf_identity.as_ref(),
            opts.base_iri.as_deref().or(self.base_iri.as_deref()),
            prefixes.iter(),
        )?)
    }

    fn effective_prefixes(&self, opts: &QueryOptions) -> PrefixMap {
        match &opts.prefixes {
            Some(local) => self.prefixes.merged_over(local),
            None => self.prefixes.clone(),
        }
    }

    fn canonicalize_graph_slot(&self, quad: Quad) -> Quad {
        if quad.graph.is_default_graph() {
            quad.with_graph(self.identity.clone())
        } else {
            quad
        }
    }
}

fn to_oxrdf_named_node(n: &NamedNode) -> oxrdf::NamedNode {
    oxrdf::NamedNode::new_unchecked(n.as_str())
}

#[async_trait]
impl ReadableGraph for InMemoryGraph {
    fn iri(&self) -> Term {
        self.identity.clone()
    }

    async fn quads(&self) -> Result<Vec<Quad>, GraphError> {
        Ok(self
            .index
            .read()
            .expect("index lock poisoned")
            .quads
            .iter()
            .map(|q| (**q).clone())
            .collect())
    }

    async fn find(
        &self,
        subject: Option<&Term>,
        predicate: Option<&Term>,
        object: Option<&Term>,
        graph: Option<&Term>,
    ) -> Result<Vec<Quad>, GraphError> {
        Ok(self
            .index
            .read()
            .expect("index lock poisoned")
            .find(subject, predicate, object, graph))
    }

    async fn select(&self, query: &str, opts: &QueryOptions) -> Result<Vec<Bindings>, GraphError> {
        let prepared = self.prepare_select(query, opts)?;
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
impl MutableGraph for InMemoryGraph {
    async fn add(&self, quads: Vec<Quad>) -> Result<(), GraphError> {
        let mut index = self.index.write().expect("index lock poisoned");
        for quad in quads {
            index.insert(self.canonicalize_graph_slot(quad));
        }
        Ok(())
    }

    async fn remove(&self, quads: Vec<Quad>) -> Result<(), GraphError> {
        let mut index = self.index.write().expect("index lock poisoned");
        for quad in &quads {
            index.remove(&self.canonicalize_graph_slot(quad.clone()));
        }
        Ok(())
    }

    async fn delete_all(&self) -> Result<(), GraphError> {
        if self.identity.is_default_graph() {
            return Err(GraphError::OperationNotSupported);
        }
        let mut index = self.index.write().expect("index lock poisoned");
        *index = Index::default();
        Ok(())
    }

    async fn update(&self, sparql_update: &str, opts: &QueryOptions) -> Result<(), GraphError> {
        let identity = self.identity_as_named_node();
        let oxrdf_identity = identity.as_ref().map(to_oxrdf_named_node);
        let prefixes = self.effective_prefixes(opts);
        let prepared = prepare_update(
            sparql_update,
            oxrdf_identity.as_ref(),
            opts.base_iri.as_deref().or(self.base_iri.as_deref()),
            prefixes.iter(),
        )?;
        apply_update(self, &prepared).await
    }
}

/// Applies the data-modifying forms (`INSERT DATA`/`DELETE DATA`) of a
/// prepared update directly against this store. `LOAD`/`CLEAR`/`CREATE`/
/// `DROP` and pattern-based `INSERT/DELETE WHERE` are outside the built-in
/// BGP-only engine's scope (spec.md's Non-goal: full SPARQL 1.1 algebra is
/// delegated to an external engine).
async fn apply_update(graph: &InMemoryGraph, update: &spargebra::Update) -> Result<(), GraphError> {
    for operation in &update.operations {
        match operation {
            spargebra::GraphUpdateOperation::InsertData { data } => {
                let quads = data.iter().map(rdf_io::quad_from_oxrdf).collect();
                graph.add(quads).await?;
            }
            spargebra::GraphUpdateOperation::DeleteData { data } => {
                let quads = data.iter().map(rdf_io::quad_from_oxrdf).collect();
                graph.remove(quads).await?;
            }
            other => {
                return Err(GraphError::mutation(format!(
                    "unsupported update operation in the built-in BGP-only reference engine: {}",
                    stringify_query_kind(other)
                )))
            }
        }
    }
    Ok(())
}

fn stringify_query_kind(operation: &spargebra::GraphUpdateOperation) -> &'static str {
    match operation {
        spargebra::GraphUpdateOperation::InsertData { .. } => "INSERT DATA",
        spargebra::GraphUpdateOperation::DeleteData { .. } => "DELETE DATA",
        spargebra::GraphUpdateOperation::DeleteInsert { .. } => "DELETE/INSERT WHERE",
        spargebra::GraphUpdateOperation::Load { .. } => "LOAD",
        spargebra::GraphUpdateOperation::Clear { .. } => "CLEAR",
        spargebra::GraphUpdateOperation::Create { .. } => "CREATE",
        spargebra::GraphUpdateOperation::Drop { .. } => "DROP",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rdf_model::{DefaultGraph, Literal, NamedNode as Nn};

    fn nn(s: &str) -> Term {
        Nn::new_unchecked(s).into()
    }

    fn graph(iri: &str) -> InMemoryGraph {
        InMemoryGraph::new(nn(iri))
    }

    #[tokio::test]
    async fn basic_add_find() {
        let g = graph("http://ex/g");
        let quad = Quad::try_new(
            nn("http://ex/a"),
            nn("http://ex/p"),
            Literal::new_simple("v").into(),
            DefaultGraph.into(),
        )
        .unwrap();
        g.add(vec![quad]).await.unwrap();
        let found = g
            .find(Some(&nn("http://ex/a")), None, None, None)
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].graph, nn("http://ex/g"));
    }

    #[tokio::test]
    async fn duplicate_add_is_a_no_op() {
        let g = graph("http://ex/g");
        let quad = Quad::new_unchecked(nn("s"), nn("p"), nn("o"), DefaultGraph.into());
        g.add(vec![quad.clone(), quad.clone()]).await.unwrap();
        assert_eq!(g.len(), 1);
    }

    #[tokio::test]
    async fn add_then_remove_restores_original_set() {
        let g = graph("http://ex/g");
        let quad = Quad::new_unchecked(nn("s"), nn("p"), nn("o"), DefaultGraph.into());
        assert_eq!(g.len(), 0);
        g.add(vec![quad.clone()]).await.unwrap();
        g.remove(vec![quad]).await.unwrap();
        assert_eq!(g.len(), 0);
    }

    #[tokio::test]
    async fn delete_all_fails_for_default_graph_identity() {
        let g = InMemoryGraph::new(DefaultGraph.into());
        let err = g.delete_all().await.unwrap_err();
        assert!(matches!(err, GraphError::OperationNotSupported));
    }

    #[tokio::test]
    async fn with_iri_aliases_the_same_storage() {
        let g = graph("http://ex/g1");
        let alias = g.with_iri(nn("http://ex/g2"));
        let quad = Quad::new_unchecked(nn("s"), nn("p"), nn("o"), DefaultGraph.into());
        alias.add(vec![quad]).await.unwrap();
        assert_eq!(g.len(), 1);
        assert_eq!(alias.iri(), nn("http://ex/g2"));
    }

    #[tokio::test]
    async fn select_star_returns_every_binding() {
        let g = graph("http://ex/g");
        g.add(vec![Quad::new_unchecked(
            nn("http://ex/a"),
            nn("http://ex/p"),
            nn("http://ex/b"),
            DefaultGraph.into(),
        )])
        .await
        .unwrap();
        let rows = g
            .select("SELECT * WHERE { ?s ?p ?o }", &QueryOptions::new())
            .await
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get("s"), Some(&nn("http://ex/a")));
    }
}
