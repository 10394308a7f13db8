//! The GraphDB/RDF4J transactional graph engine (spec.md §4.6): a
//! transaction-URL-from-`Location`-header session model, `infer=true|false`
//! query parameters, and a synthesized `DELETE DATA` body for transactional
//! removal (RDF4J's transaction protocol has no bulk "remove these quads"
//! verb; a SPARQL update does).

use crate::config::GraphDbConfig;
use crate::http::HttpClient;
use crate::results_json::{decode_ask, decode_select};
use crate::sparql_text::synthesize_delete_data;
use async_trait::async_trait;
use rdf_graph::{Bindings, GraphError, InMemoryGraph, MutableGraph, QueryOptions, ReadableGraph, TransactionOp, TransactionalGraph};
use rdf_model::{PrefixMap, Quad, Term};
use rdf_query::{prepare_query, prepare_update, stringify_query, stringify_update, QueryKind};
use std::path::Path;
use std::sync::{Arc, RwLock};

const BACKEND: &str = "graphdb";
const RESULTS_JSON_ACCEPT: &str = "application/sparql-results+json";
const CONSTRUCT_ACCEPT: &str = "application/n-triples";

/// `Active`'s session key for GraphDB is the full transaction URL GraphDB
/// handed back in the `Location` header of the `begin` response (spec.md
/// §4.6.1) — unlike Stardog's opaque transaction id, GraphDB's is itself a
/// dereferenceable resource.
#[derive(Debug, Default)]
struct TxnUrl(RwLock<Option<String>>);

impl TxnUrl {
    fn current(&self) -> Option<String> {
        self.0.read().expect("transaction-url lock poisoned").clone()
    }

    fn is_active(&self) -> bool {
        self.current().is_some()
    }

    fn activate(&self, url: String) -> Result<(), GraphError> {
        let mut guard = self.0.write().expect("transaction-url lock poisoned");
        if guard.is_some() {
            return Err(GraphError::AlreadyActive);
        }
        *guard = Some(url);
        Ok(())
    }

    fn clear(&self) -> Result<String, GraphError> {
        let mut guard = self.0.write().expect("transaction-url lock poisoned");
        guard.take().ok_or(GraphError::NoActiveTransaction)
    }
}

/// A graph backed by a single GraphDB/RDF4J repository, scoped to one named
/// graph (or the default graph) by `identity`.
#[derive(Clone)]
pub struct GraphDbGraph {
    identity: Term,
    config: Arc<GraphDbConfig>,
    http: HttpClient,
    inference_default: bool,
    txn: Arc<TxnUrl>,
    prefixes: PrefixMap,
    base_iri: Option<String>,
}

impl GraphDbGraph {
    pub fn new(identity: Term, config: GraphDbConfig) -> Self {
        Self {
            identity,
            config: Arc::new(config),
            http: HttpClient::new(BACKEND),
            inference_default: false,
            txn: Arc::new(TxnUrl::default()),
            prefixes: PrefixMap::default(),
            base_iri: None,
        }
    }

    pub fn with_inference_default(mut self, inference: bool) -> Self {
        self.inference_default = inference;
        self
    }

    pub fn with_prefixes(mut self, prefixes: PrefixMap) -> Self {
        self.prefixes = prefixes;
        self
    }

    pub fn with_base_iri(mut self, base_iri: impl Into<String>) -> Self {
        self.base_iri = Some(base_iri.into());
        self
    }

    /// Shares this graph's connection and transaction slot under a different
    /// identity (spec.md §4.3.1 `withIri`) — see [`crate::StardogGraph::with_iri`]
    /// for the aliasing rationale, identical here.
    pub fn with_iri(&self, iri: Term) -> Self {
        Self {
            identity: iri,
            config: Arc::clone(&self.config),
            http: self.http.clone(),
            inference_default: self.inference_default,
            txn: Arc::clone(&self.txn),
            prefixes: self.prefixes.clone(),
            base_iri: self.base_iri.clone(),
        }
    }

    /// Converts this graph's identity to the query-preparation layer's
    /// `NamedNode` type (`oxrdf::NamedNode`, via `spargebra::term::NamedNode`),
    /// distinct from `rdf_model::NamedNode` — the same conversion
    /// `InMemoryGraph::identity_as_named_node` performs before handing the
    /// identity to `prepare_query`/`prepare_update`.
    fn identity_as_named_node(&self) -> Option<oxrdf::NamedNode> {
        match &self.identity {
            Term::NamedNode(n) => Some(oxrdf::NamedNode::new_unchecked(n.as_str())),
            _ => None,
        }
    }

    fn repo_url(&self, path: &str) -> String {
        format!("{}/repositories/{}{}", self.config.endpoint.trim_end_matches('/'), self.config.repository, path)
    }

    fn effective_inference(&self, opts: &QueryOptions) -> bool {
        opts.reasoning.unwrap_or(self.inference_default)
    }

    fn effective_prefixes(&self, opts: &QueryOptions) -> PrefixMap {
        match &opts.prefixes {
            Some(local) => self.prefixes.merged_over(local),
            None => self.prefixes.clone(),
        }
    }

    fn canonicalize(&self, quad: Quad) -> Quad {
        if quad.graph.is_default_graph() {
            quad.with_graph(self.identity.clone())
        } else {
            quad
        }
    }

    async fn begin_wire(&self, inference: bool) -> Result<String, GraphError> {
        let url = format!("{}?infer={}", self.repo_url("/transactions"), inference);
        let response = self
            .http
            .post(&url, Vec::new(), "application/x-www-form-urlencoded", "text/plain")
            .await
            .map_err(|e| to_transaction_error(e, TransactionOp::Begin))?;
        response.location.ok_or_else(|| GraphError::missing_location_header(url))
    }

    async fn commit_wire(&self, txn_url: &str) -> Result<(), GraphError> {
        let url = format!("{txn_url}?action=COMMIT");
        self.http
            .put_empty(&url)
            .await
            .map_err(|e| to_transaction_error(e, TransactionOp::Commit))?;
        Ok(())
    }

    /// Best-effort, like Stardog's rollback: a non-2xx response is swallowed
    /// (spec.md §4.6.1).
    async fn rollback_wire(&self, txn_url: &str) {
        let _ = self.http.delete(txn_url).await;
    }

    /// Runs `op` inside a transaction: the currently-active one if there is
    /// one, else a private auto-transaction (spec.md §4.6.1, §4.6.2).
    async fn ensure_txn<F, Fut, T>(&self, op: F) -> Result<T, GraphError>
    where
        F: FnOnce(String) -> Fut,
        Fut: std::future::Future<Output = Result<T, GraphError>>,
    {
        if let Some(txn_url) = self.txn.current() {
            return op(txn_url).await;
        }
        rdf_graph::in_transaction(self, |g| async move {
            let txn_url = g.txn.current().expect("begin just succeeded");
            op(txn_url).await
        })
        .await
    }

    /// Dispatches a query's text either to the active transaction's own
    /// query action, or the repository's plain SPARQL endpoint — the latter
    /// as `GET /repositories/{repo}?query=…&infer=…`, per spec.md §4.6.2's
    /// "query (no txn)" wire-ops row.
    async fn submit_query(&self, text: &str, inference: bool, accept: &str) -> Result<String, GraphError> {
        let body = text.as_bytes().to_vec();
        let response = if let Some(txn_url) = self.txn.current() {
            let url = format!("{txn_url}?action=QUERY&infer={inference}");
            self.http.put(&url, body, "application/sparql-query", accept).await?
        } else {
            let query_param: String = url::form_urlencoded::byte_serialize(text.as_bytes()).collect();
            let url = format!("{}?query={}&infer={}", self.repo_url(""), query_param, inference);
            self.http.get(&url, accept).await?
        };
        Ok(response.body)
    }
}

fn to_transaction_error(error: GraphError, op: TransactionOp) -> GraphError {
    match error {
        GraphError::HttpStatus { status, body, .. } => GraphError::Transaction {
            op,
            message: format!("backend returned HTTP {status}: {body}"),
        },
        GraphError::Connection { message, .. } => GraphError::Transaction { op, message },
        other => other,
    }
}

fn pattern_term(term: Option<&Term>, var: &str) -> String {
    match term {
        Some(t) => t.to_string(),
        None => format!("?{var}"),
    }
}

#[async_trait]
impl ReadableGraph for GraphDbGraph {
    fn iri(&self) -> Term {
        self.identity.clone()
    }

    async fn quads(&self) -> Result<Vec<Quad>, GraphError> {
        self.find(None, None, None, None).await
    }

    /// Substitutes bound terms directly into the BGP's pattern slots rather
    /// than the source's `BIND`-of-constants idiom (spec.md §9's open
    /// question) — see [`crate::StardogGraph::find`] for the full rationale;
    /// the same decision applies identically here.
    async fn find(
        &self,
        subject: Option<&Term>,
        predicate: Option<&Term>,
        object: Option<&Term>,
        graph: Option<&Term>,
    ) -> Result<Vec<Quad>, GraphError> {
        let s = pattern_term(subject, "s");
        let p = pattern_term(predicate, "p");
        let o = pattern_term(object, "o");
        let mut projected = Vec::new();
        if subject.is_none() {
            projected.push("?s");
        }
        if predicate.is_none() {
            projected.push("?p");
        }
        if object.is_none() {
            projected.push("?o");
        }
        let pattern = match graph {
            Some(g) if g.is_default_graph() => format!("{s} {p} {o} ."),
            Some(g) => format!("GRAPH {g} {{ {s} {p} {o} }}"),
            None => {
                projected.push("?g");
                format!("GRAPH ?g {{ {s} {p} {o} }}")
            }
        };
        let query_text = format!("SELECT {} WHERE {{ {} }}", projected.join(" "), pattern);
        let body = self.submit_query(&query_text, self.inference_default, RESULTS_JSON_ACCEPT).await?;
        let rows = decode_select(&body)?;
        rows.into_iter()
            .map(|row| {
                let s_term = subject.cloned().or_else(|| row.get("s").cloned()).expect("s bound or projected");
                let p_term = predicate.cloned().or_else(|| row.get("p").cloned()).expect("p bound or projected");
                let o_term = object.cloned().or_else(|| row.get("o").cloned()).expect("o bound or projected");
                let g_term = match graph {
                    Some(g) => g.clone(),
                    None => row.get("g").cloned().unwrap_or_else(|| Term::from(rdf_model::DefaultGraph)),
                };
                Ok(Quad::new_unchecked(s_term, p_term, o_term, g_term))
            })
            .collect()
    }

    async fn select(&self, query: &str, opts: &QueryOptions) -> Result<Vec<Bindings>, GraphError> {
        let identity = self.identity_as_named_node();
        let prefixes = self.effective_prefixes(opts);
        let prepared = prepare_query(
            query,
            QueryKind::Select,
            identity.as_ref(),
            opts.base_iri.as_deref().or(self.base_iri.as_deref()),
            prefixes.iter(),
        )?;
        let body = self
            .submit_query(&stringify_query(&prepared), self.effective_inference(opts), RESULTS_JSON_ACCEPT)
            .await?;
        decode_select(&body)
    }

    async fn ask(&self, query: &str, opts: &QueryOptions) -> Result<bool, GraphError> {
        let identity = self.identity_as_named_node();
        let prefixes = self.effective_prefixes(opts);
        let prepared = prepare_query(
            query,
            QueryKind::Ask,
            identity.as_ref(),
            opts.base_iri.as_deref().or(self.base_iri.as_deref()),
            prefixes.iter(),
        )?;
        let body = self
            .submit_query(&stringify_query(&prepared), self.effective_inference(opts), RESULTS_JSON_ACCEPT)
            .await?;
        decode_ask(&body)
    }

    async fn construct(&self, query: &str, opts: &QueryOptions) -> Result<InMemoryGraph, GraphError> {
        let identity = self.identity_as_named_node();
        let prefixes = self.effective_prefixes(opts);
        let prepared = prepare_query(
            query,
            QueryKind::Construct,
            identity.as_ref(),
            opts.base_iri.as_deref().or(self.base_iri.as_deref()),
            prefixes.iter(),
        )?;
        let body = self
            .submit_query(&stringify_query(&prepared), self.effective_inference(opts), CONSTRUCT_ACCEPT)
            .await?;
        let quads = rdf_io::parse_str(&body, rdf_io::RdfFormat::NTriples, &rdf_io::ParseOptions::default())?;
        Ok(InMemoryGraph::from_quads(Term::from(rdf_model::DefaultGraph), quads))
    }

    async fn to_string_with(&self, opts: &QueryOptions) -> Result<String, GraphError> {
        let quads = self.quads().await?;
        let format = opts.format.as_deref().and_then(rdf_io::resolve_explicit).unwrap_or_else(rdf_io::default_format);
        let serialize_opts = rdf_io::SerializeOptions {
            base_iri: opts.base_iri.clone().or_else(|| self.base_iri.clone()),
            prefixes: Some(self.effective_prefixes(opts)),
        };
        Ok(rdf_io::serialize_to_string(&quads, format, &serialize_opts)?)
    }

    async fn save_to_file(&self, path: &Path, opts: &QueryOptions) -> Result<(), GraphError> {
        let quads = self.quads().await?;
        let serialize_opts = rdf_io::SerializeOptions {
            base_iri: opts.base_iri.clone().or_else(|| self.base_iri.clone()),
            prefixes: Some(self.effective_prefixes(opts)),
        };
        rdf_io::save_to_file(&quads, path, opts.format.as_deref(), &serialize_opts)?;
        Ok(())
    }
}

#[async_trait]
impl MutableGraph for GraphDbGraph {
    /// Adds via a PUT of a TriG-star (or plain TriG) payload to the
    /// transaction's `action=ADD` endpoint (spec.md §4.6.2 "add quads (txn)").
    async fn add(&self, quads: Vec<Quad>) -> Result<(), GraphError> {
        let quads: Vec<Quad> = quads.into_iter().map(|q| self.canonicalize(q)).collect();
        let payload = rdf_io::serialize(&quads, rdf_io::RdfFormat::TriG, &rdf_io::SerializeOptions::default())?;
        let http = self.http.clone();
        self.ensure_txn(move |txn_url| {
            let url = format!("{txn_url}?action=ADD");
            async move {
                http.put(&url, payload, "application/trig", "text/plain").await?;
                Ok(())
            }
        })
        .await
    }

    /// GraphDB's transaction protocol has no bulk "remove these quads"
    /// action; `remove` synthesizes a `DELETE DATA` update and submits it as
    /// `action=UPDATE` instead (spec.md §4.6.2/§4.6.3).
    async fn remove(&self, quads: Vec<Quad>) -> Result<(), GraphError> {
        let quads: Vec<Quad> = quads.into_iter().map(|q| self.canonicalize(q)).collect();
        let update_text = synthesize_delete_data(&quads);
        let http = self.http.clone();
        self.ensure_txn(move |txn_url| {
            let url = format!("{txn_url}?action=UPDATE");
            async move {
                http.put(&url, update_text.into_bytes(), "application/sparql-update", "text/plain").await?;
                Ok(())
            }
        })
        .await
    }

    async fn delete_all(&self) -> Result<(), GraphError> {
        if self.identity.is_default_graph() {
            return Err(GraphError::OperationNotSupported);
        }
        let url = format!("{}/statements?context=<{}>", self.repo_url(""), self.identity_as_named_node().expect("non-default-graph identity").as_str());
        self.http.delete(&url).await?;
        Ok(())
    }

    async fn update(&self, sparql_update: &str, opts: &QueryOptions) -> Result<(), GraphError> {
        let identity = self.identity_as_named_node();
        let prefixes = self.effective_prefixes(opts);
        let prepared = prepare_update(
            sparql_update,
            identity.as_ref(),
            opts.base_iri.as_deref().or(self.base_iri.as_deref()),
            prefixes.iter(),
        )?;
        let rendered = stringify_update(&prepared);
        let http = self.http.clone();
        self.ensure_txn(move |txn_url| {
            let url = format!("{txn_url}?action=UPDATE");
            async move {
                http.put(&url, rendered.into_bytes(), "application/sparql-update", "text/plain").await?;
                Ok(())
            }
        })
        .await
    }
}

#[async_trait]
impl TransactionalGraph for GraphDbGraph {
    async fn begin(&self) -> Result<(), GraphError> {
        if self.txn.is_active() {
            return Err(GraphError::AlreadyActive);
        }
        let txn_url = self.begin_wire(self.inference_default).await?;
        self.txn.activate(txn_url)
    }

    async fn commit(&self) -> Result<(), GraphError> {
        let txn_url = self.txn.current().ok_or(GraphError::NoActiveTransaction)?;
        self.commit_wire(&txn_url).await?;
        self.txn.clear()?;
        Ok(())
    }

    async fn rollback(&self) -> Result<(), GraphError> {
        let txn_url = self.txn.current().ok_or(GraphError::NoActiveTransaction)?;
        self.rollback_wire(&txn_url).await;
        self.txn.clear()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn txn_url_activate_then_clear_round_trips() {
        let txn = TxnUrl::default();
        txn.activate("http://ex/transactions/1".to_owned()).unwrap();
        assert!(txn.is_active());
        let cleared = txn.clear().unwrap();
        assert_eq!(cleared, "http://ex/transactions/1");
        assert!(!txn.is_active());
    }

    #[test]
    fn txn_url_activating_twice_fails() {
        let txn = TxnUrl::default();
        txn.activate("http://ex/transactions/1".to_owned()).unwrap();
        let err = txn.activate("http://ex/transactions/2".to_owned()).unwrap_err();
        assert!(matches!(err, GraphError::AlreadyActive));
    }
}
