//! Thin async HTTP client wrapper shared by the Stardog and GraphDB engines.
//!
//! Grounded on `samyama-sdk::RemoteClient` (`examples/samyama-ai-samyama-graph`):
//! a cheaply-clonable `reqwest::Client` handle plus helper methods per HTTP
//! verb, mapping transport failures to [`GraphError::Connection`] and non-2xx
//! responses to [`GraphError::HttpStatus`] — the same two-tier split the
//! teacher's own `oxhttp`-based `sparql::http::Client` makes (transport error
//! vs. "status returned but it's an error status"), just over `reqwest`
//! instead of `oxhttp`, matching this stack's own dependency (`reqwest` is
//! already a workspace dependency; `oxhttp` is not, and the rest of the pack
//! reaches for `reqwest` for exactly this kind of remote-client call).
//!
//! Transport-level retry/backoff is explicitly a Non-goal (spec.md §1):
//! this wrapper performs exactly one request per call and surfaces whatever
//! `reqwest` itself reports, including timeouts, as [`GraphError::Connection`].

use rdf_graph::GraphError;
use reqwest::header::{HeaderValue, ACCEPT, CONTENT_TYPE, LOCATION};
use reqwest::{Client, Method};

/// Backend tag used in error messages (spec.md §7: "backend tag" is part of
/// the diagnosable context every error carries).
pub type BackendTag = &'static str;

/// A completed, successful HTTP response: status already checked, body read
/// to completion (the wire payloads this crate deals with — SPARQL results,
/// RDF serializations, transaction ids — are all small enough to buffer).
pub struct HttpResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub location: Option<String>,
    pub body: String,
}

#[derive(Clone)]
pub struct HttpClient {
    backend: BackendTag,
    client: Client,
    basic_auth: Option<(String, String)>,
}

impl HttpClient {
    pub fn new(backend: BackendTag) -> Self {
        Self {
            backend,
            client: Client::new(),
            basic_auth: None,
        }
    }

    pub fn with_basic_auth(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.basic_auth = Some((username.into(), password.into()));
        self
    }

    pub async fn get(&self, url: &str, accept: &str) -> Result<HttpResponse, GraphError> {
        self.request(Method::GET, url, None, Some(accept), None).await
    }

    pub async fn post(
        &self,
        url: &str,
        body: Vec<u8>,
        content_type: &str,
        accept: &str,
    ) -> Result<HttpResponse, GraphError> {
        self.request(Method::POST, url, Some(content_type), Some(accept), Some(body))
            .await
    }

    pub async fn put(
        &self,
        url: &str,
        body: Vec<u8>,
        content_type: &str,
        accept: &str,
    ) -> Result<HttpResponse, GraphError> {
        self.request(Method::PUT, url, Some(content_type), Some(accept), Some(body))
            .await
    }

    pub async fn put_empty(&self, url: &str) -> Result<HttpResponse, GraphError> {
        self.request(Method::PUT, url, None, None, None).await
    }

    pub async fn delete(&self, url: &str) -> Result<HttpResponse, GraphError> {
        self.request(Method::DELETE, url, None, None, None).await
    }

    async fn request(
        &self,
        method: Method,
        url: &str,
        content_type: Option<&str>,
        accept: Option<&str>,
        body: Option<Vec<u8>>,
    ) -> Result<HttpResponse, GraphError> {
        let mut builder = self.client.request(method, url);
        if let Some((user, pass)) = &self.basic_auth {
            builder = builder.basic_auth(user, Some(pass));
        }
        if let Some(content_type) = content_type {
            builder = builder.header(CONTENT_TYPE, HeaderValue::from_str(content_type).map_err(|e| {
                GraphError::connection(url, format!("invalid Content-Type header: {e}"))
            })?);
        }
        if let Some(accept) = accept {
            builder = builder.header(ACCEPT, HeaderValue::from_str(accept).map_err(|e| {
                GraphError::connection(url, format!("invalid Accept header: {e}"))
            })?);
        }
        if let Some(body) = body {
            builder = builder.body(body);
        }
        let response = builder
            .send()
            .await
            .map_err(|e| GraphError::connection(url, e.to_string()))?;
        let status = response.status();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);
        let location = response
            .headers()
            .get(LOCATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);
        let body = response
            .text()
            .await
            .map_err(|e| GraphError::connection(url, e.to_string()))?;
        if !status.is_success() {
            return Err(GraphError::HttpStatus {
                backend: self.backend,
                status: status.as_u16(),
                reason: status.canonical_reason().map(str::to_owned),
                url: url.to_owned(),
                body: truncate(&body, 200),
            });
        }
        Ok(HttpResponse {
            status: status.as_u16(),
            content_type,
            location,
            body,
        })
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_owned()
    } else {
        let mut truncated: String = text.chars().take(max_chars).collect();
        truncated.push('\u{2026}');
        truncated
    }
}
