//! HTTP-mediated transactional graph backends (spec.md §4.6): [`StardogGraph`]
//! and [`GraphDbGraph`] both implement the same [`rdf_graph::TransactionalGraph`]
//! hierarchy the in-memory/persistent graphs in `rdf-graph` do, so a caller
//! holding `Arc<dyn rdf_graph::MutableGraph>` doesn't need to know whether
//! the concrete graph behind it is local or remote.
//!
//! This crate is layer L3: it sits on `rdf_model`/`rdf_query`/`rdf_io` and
//! `rdf_graph`'s shared [`rdf_graph::GraphError`] taxonomy, adding only the
//! wire protocol each backend speaks.

mod config;
mod graphdb;
mod http;
mod session;
mod sparql_text;
mod stardog;

pub mod results_json;

pub use config::{GraphDbConfig, StardogConfig};
pub use graphdb::GraphDbGraph;
pub use stardog::StardogGraph;
