//! The Stardog transactional graph engine (spec.md §4.6): HTTP Basic auth,
//! a session-id transaction model, `#pragma reasoning on|off` query
//! rewriting, and RDF-star-capable N-Quads/TriG-star wire payloads.

use crate::config::StardogConfig;
use crate::http::HttpClient;
use crate::results_json::{decode_ask, decode_select};
use crate::session::SessionState;
use crate::sparql_text::strip_stardog_context_brackets;
use async_trait::async_trait;
use rdf_graph::{Bindings, GraphError, InMemoryGraph, MutableGraph, QueryOptions, ReadableGraph, TransactionOp, TransactionalGraph};
use rdf_model::{PrefixMap, Quad, Term};
use rdf_query::{prepare_query, prepare_update, stringify_query, stringify_update, QueryKind};
use std::path::Path;
use std::sync::Arc;

const BACKEND: &str = "stardog";
const RESULTS_JSON_ACCEPT: &str = "application/sparql-results+json";
const CONSTRUCT_ACCEPT: &str = "application/n-triples";

/// A graph backed by a single Stardog database, scoped to one named graph
/// (or the default graph) by `identity`.
#[derive(Clone)]
pub struct StardogGraph {
    identity: Term,
    config: Arc<StardogConfig>,
    http: HttpClient,
    reasoning_default: bool,
    session: Arc<SessionState>,
    prefixes: PrefixMap,
    base_iri: Option<String>,
}

impl StardogGraph {
    pub fn new(identity: Term, config: StardogConfig) -> Self {
        let mut http = HttpClient::new(BACKEND);
        if let (Some(user), Some(pass)) = (&config.username, &config.password) {
            http = http.with_basic_auth(user.clone(), pass.clone());
        }
        Self {
            identity,
            config: Arc::new(config),
            http,
            reasoning_default: false,
            session: Arc::new(SessionState::new()),
            prefixes: PrefixMap::default(),
            base_iri: None,
        }
    }

    pub fn with_reasoning_default(mut self, reasoning: bool) -> Self {
        self.reasoning_default = reasoning;
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

    /// A view sharing this graph's connection and transaction slot but
    /// presenting a different identity (spec.md §4.3.1 `withIri`).
    ///
    /// Per the data model's own flagged-as-surprising note (§9), this is
    /// deliberate aliasing: the returned handle shares `self.session`, so
    /// mutating through one handle is visible to the other — confirmed as
    /// the intended remote-graph `withIri` contract, recorded in
    /// `DESIGN.md`.
    pub fn with_iri(&self, iri: Term) -> Self {
        Self {
            identity: iri,
            config: Arc::clone(&self.config),
            http: self.http.clone(),
            reasoning_default: self.reasoning_default,
            session: Arc::clone(&self.session),
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

    fn db_url(&self, path: &str) -> String {
        format!("{}/{}{}", self.config.endpoint.trim_end_matches('/'), self.config.database, path)
    }

    fn effective_reasoning(&self, opts: &QueryOptions) -> bool {
        opts.reasoning.unwrap_or(self.reasoning_default)
    }

    fn effective_prefixes(&self, opts: &QueryOptions) -> PrefixMap {
        match &opts.prefixes {
            Some(local) => self.prefixes.merged_over(local),
            None => self.prefixes.clone(),
        }
    }

    /// Prepends the Stardog reasoning pragma and strips the
    /// `stardog:context:` passthrough syntax (spec.md §4.6/§6).
    fn render_query_text(&self, text: String, reasoning: bool) -> String {
        let pragma = if reasoning { "#pragma reasoning on\n" } else { "#pragma reasoning off\n" };
        strip_stardog_context_brackets(&format!("{pragma}{text}"))
    }

    fn render_update_text(&self, text: String) -> String {
        strip_stardog_context_brackets(&text)
    }

    /// Dispatches a prepared query's text to the transaction endpoint if a
    /// transaction is active, else to the plain (non-transactional) query
    /// endpoint — reads don't need an auto-transaction, only mutations do
    /// (spec.md §4.6.1's auto-txn row is scoped to "any data op").
    async fn submit_query(&self, text: &str, accept: &str) -> Result<String, GraphError> {
        let body = text.as_bytes().to_vec();
        let response = if let Some(txid) = self.session.current() {
            self.http
                .post(&self.db_url(&format!("/query/tx/{txid}")), body, "application/sparql-query", accept)
                .await?
        } else {
            self.http
                .post(&self.db_url("/query"), body, "application/sparql-query", accept)
                .await?
        };
        Ok(response.body)
    }

    async fn begin_wire(&self, reasoning: bool) -> Result<String, GraphError> {
        let url = format!("{}?reasoning={}", self.db_url("/transaction/begin"), reasoning);
        let response = self
            .http
            .post(&url, Vec::new(), "text/plain", "text/plain")
            .await
            .map_err(|e| to_transaction_error(e, TransactionOp::Begin))?;
        let txid = response.body.trim().to_owned();
        if txid.is_empty() {
            return Err(GraphError::Transaction {
                op: TransactionOp::Begin,
                message: "Stardog returned an empty transaction id".to_owned(),
            });
        }
        Ok(txid)
    }

    async fn commit_wire(&self, txid: &str) -> Result<(), GraphError> {
        self.http
            .post(&self.db_url(&format!("/transaction/commit/{txid}")), Vec::new(), "text/plain", "text/plain")
            .await
            .map_err(|e| to_transaction_error(e, TransactionOp::Commit))?;
        Ok(())
    }

    /// Rollback is best-effort: a non-2xx response is swallowed (spec.md
    /// §4.6.1 "Active -> rollback -> Idle: Backend non-2xx is swallowed").
    async fn rollback_wire(&self, txid: &str) {
        let _ = self
            .http
            .post(&self.db_url(&format!("/transaction/rollback/{txid}")), Vec::new(), "text/plain", "text/plain")
            .await;
    }

    /// Runs `op` inside a transaction: the currently-active one if there is
    /// one, else a private auto-transaction that commits on success and
    /// rolls back (swallowing rollback errors) on failure (spec.md §4.6.1,
    /// §4.6.2 "Session").
    async fn ensure_session<F, Fut, T>(&self, op: F) -> Result<T, GraphError>
    where
        F: FnOnce(String) -> Fut,
        Fut: std::future::Future<Output = Result<T, GraphError>>,
    {
        if let Some(txid) = self.session.current() {
            return op(txid).await;
        }
        rdf_graph::in_transaction(self, |g| async move {
            let txid = g.session.current().expect("begin just succeeded");
            op(txid).await
        })
        .await
    }

    fn canonicalize(&self, quad: Quad) -> Quad {
        if quad.graph.is_default_graph() {
            quad.with_graph(self.identity.clone())
        } else {
            quad
        }
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

#[async_trait]
impl ReadableGraph for StardogGraph {
    fn iri(&self) -> Term {
        self.identity.clone()
    }

    async fn quads(&self) -> Result<Vec<Quad>, GraphError> {
        self.find(None, None, None, None).await
    }

    /// Builds the pattern directly into the query's BGP term slots rather
    /// than the source's `BIND`-of-constants approach (spec.md §9 flags
    /// this as an open question, not a requirement): substitution into the
    /// BGP is standard, portable SPARQL and avoids relying on a planner
    /// treating a same-named `BIND` target as a join filter. Recorded as a
    /// deliberate decision in `DESIGN.md`.
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
        let reasoning = self.reasoning_default;
        let rendered = self.render_query_text(query_text, reasoning);
        let body = self.submit_query(&rendered, RESULTS_JSON_ACCEPT).await?;
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
        let rendered = self.render_query_text(stringify_query(&prepared), self.effective_reasoning(opts));
        let body = self.submit_query(&rendered, RESULTS_JSON_ACCEPT).await?;
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
        let rendered = self.render_query_text(stringify_query(&prepared), self.effective_reasoning(opts));
        let body = self.submit_query(&rendered, RESULTS_JSON_ACCEPT).await?;
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
        let rendered = self.render_query_text(stringify_query(&prepared), self.effective_reasoning(opts));
        let body = self.submit_query(&rendered, CONSTRUCT_ACCEPT).await?;
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
impl MutableGraph for StardogGraph {
    async fn add(&self, quads: Vec<Quad>) -> Result<(), GraphError> {
        let quads: Vec<Quad> = quads.into_iter().map(|q| self.canonicalize(q)).collect();
        let format = if quads.iter().any(|q| q.subject.is_quoted_triple() || q.object.is_quoted_triple()) {
            rdf_io::RdfFormat::TriG
        } else {
            rdf_io::RdfFormat::NQuads
        };
        let content_type = if format == rdf_io::RdfFormat::TriG { "application/trig" } else { "application/n-quads" };
        let payload = rdf_io::serialize(&quads, format, &rdf_io::SerializeOptions::default())?;
        let http = self.http.clone();
        self.ensure_session(move |txid| {
            let url = self.db_url(&format!("/{txid}/add"));
            async move {
                http.post(&url, payload, content_type, "text/plain").await?;
                Ok(())
            }
        })
        .await
    }

    async fn remove(&self, quads: Vec<Quad>) -> Result<(), GraphError> {
        let quads: Vec<Quad> = quads.into_iter().map(|q| self.canonicalize(q)).collect();
        let payload = rdf_io::serialize(&quads, rdf_io::RdfFormat::NQuads, &rdf_io::SerializeOptions::default())?;
        let http = self.http.clone();
        self.ensure_session(move |txid| {
            let url = self.db_url(&format!("/{txid}/remove"));
            async move {
                http.post(&url, payload, "application/n-quads", "text/plain").await?;
                Ok(())
            }
        })
        .await
    }

    async fn delete_all(&self) -> Result<(), GraphError> {
        if self.identity.is_default_graph() {
            return Err(GraphError::OperationNotSupported);
        }
        let url = format!("{}?graph={}", self.db_url(""), self.identity);
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
        let rendered = self.render_update_text(stringify_update(&prepared));
        let http = self.http.clone();
        self.ensure_session(move |txid| {
            let url = self.db_url(&format!("/query/tx/{txid}"));
            async move {
                http.post(&url, rendered.into_bytes(), "application/sparql-update", "text/plain").await?;
                Ok(())
            }
        })
        .await
    }
}

#[async_trait]
impl TransactionalGraph for StardogGraph {
    async fn begin(&self) -> Result<(), GraphError> {
        if self.session.is_active() {
            return Err(GraphError::AlreadyActive);
        }
        let txid = self.begin_wire(self.reasoning_default).await?;
        self.session.activate(txid)
    }

    async fn commit(&self) -> Result<(), GraphError> {
        let txid = self.session.current().ok_or(GraphError::NoActiveTransaction)?;
        self.commit_wire(&txid).await?;
        self.session.clear()?;
        Ok(())
    }

    async fn rollback(&self) -> Result<(), GraphError> {
        let txid = self.session.current().ok_or(GraphError::NoActiveTransaction)?;
        self.rollback_wire(&txid).await;
        self.session.clear()?;
        Ok(())
    }
}

fn pattern_term(term: Option<&Term>, var: &str) -> String {
    match term {
        Some(t) => t.to_string(),
        None => format!("?{var}"),
    }
}
