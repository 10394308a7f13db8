//! Transaction state-machine scenarios against a mocked GraphDB/RDF4J HTTP
//! API (spec.md §8), mirroring `stardog_transactions.rs` but exercising the
//! transaction-URL-from-`Location`-header session model instead of an
//! opaque transaction id.

use rdf_graph::{GraphError, MutableGraph, TransactionOp, TransactionalGraph};
use rdf_model::{NamedNode, Quad};
use rdf_remote::{GraphDbConfig, GraphDbGraph};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn graph(server: &MockServer) -> GraphDbGraph {
    let config = GraphDbConfig::new(server.uri(), "myrepo");
    GraphDbGraph::new(NamedNode::new_unchecked("http://ex/g").into(), config)
}

fn txn_url(server: &MockServer) -> String {
    format!("{}/repositories/myrepo/transactions/1", server.uri())
}

fn quad() -> Quad {
    Quad::new_unchecked(
        NamedNode::new_unchecked("http://ex/s").into(),
        NamedNode::new_unchecked("http://ex/p").into(),
        NamedNode::new_unchecked("http://ex/o").into(),
        rdf_model::DefaultGraph.into(),
    )
}

#[tokio::test]
async fn begin_add_commit_round_trips() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/repositories/myrepo/transactions"))
        .respond_with(ResponseTemplate::new(201).insert_header("Location", txn_url(&server).as_str()))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/repositories/myrepo/transactions/1"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let g = graph(&server);
    g.begin().await.unwrap();
    g.add(vec![quad()]).await.unwrap();
    g.commit().await.unwrap();
}

#[tokio::test]
async fn begin_without_location_header_surfaces_missing_location_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/repositories/myrepo/transactions"))
        .respond_with(ResponseTemplate::new(201))
        .mount(&server)
        .await;

    let g = graph(&server);
    let err = g.begin().await.unwrap_err();
    assert!(matches!(err, GraphError::Transaction { op: TransactionOp::Begin, .. }));
}

#[tokio::test]
async fn commit_failure_keeps_the_handle_active() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/repositories/myrepo/transactions"))
        .respond_with(ResponseTemplate::new(201).insert_header("Location", txn_url(&server).as_str()))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/repositories/myrepo/transactions/1"))
        .respond_with(ResponseTemplate::new(500).set_body_string("internal error"))
        .mount(&server)
        .await;

    let g = graph(&server);
    g.begin().await.unwrap();
    let err = g.commit().await.unwrap_err();
    assert!(matches!(err, GraphError::Transaction { op: TransactionOp::Commit, .. }));
    let err = g.begin().await.unwrap_err();
    assert!(matches!(err, GraphError::AlreadyActive));
}

#[tokio::test]
async fn rollback_swallows_backend_failure_and_returns_to_idle() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/repositories/myrepo/transactions"))
        .respond_with(ResponseTemplate::new(201).insert_header("Location", txn_url(&server).as_str()))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/repositories/myrepo/transactions/1"))
        .respond_with(ResponseTemplate::new(500).set_body_string("internal error"))
        .mount(&server)
        .await;

    let g = graph(&server);
    g.begin().await.unwrap();
    g.rollback().await.unwrap();
    g.begin().await.unwrap();
}
