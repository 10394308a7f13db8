//! Transaction state-machine scenarios against a mocked Stardog HTTP API
//! (spec.md §8): commit failure keeps the handle `Active`, rollback swallows
//! a non-2xx response and returns to `Idle` regardless, and a mutation
//! issued outside an explicit transaction auto-wraps in a begin/commit pair
//! that rolls back (silently) on failure.

use rdf_graph::{GraphError, MutableGraph, TransactionOp, TransactionalGraph};
use rdf_model::{NamedNode, Quad};
use rdf_remote::{StardogConfig, StardogGraph};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn graph(server: &MockServer) -> StardogGraph {
    let config = StardogConfig::new(server.uri(), "mydb");
    StardogGraph::new(NamedNode::new_unchecked("http://ex/g").into(), config)
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
        .and(path("/mydb/transaction/begin"))
        .respond_with(ResponseTemplate::new(200).set_body_string("txn-1"))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/mydb/txn-1/add"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/mydb/transaction/commit/txn-1"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let g = graph(&server);
    g.begin().await.unwrap();
    g.add(vec![quad()]).await.unwrap();
    g.commit().await.unwrap();
}

#[tokio::test]
async fn commit_failure_keeps_the_handle_active() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/mydb/transaction/begin"))
        .respond_with(ResponseTemplate::new(200).set_body_string("txn-1"))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/mydb/transaction/commit/txn-1"))
        .respond_with(ResponseTemplate::new(500).set_body_string("internal error"))
        .mount(&server)
        .await;

    let g = graph(&server);
    g.begin().await.unwrap();
    let err = g.commit().await.unwrap_err();
    assert!(matches!(err, GraphError::Transaction { op: TransactionOp::Commit, .. }));

    // A transaction is still active: beginning again is rejected.
    let err = g.begin().await.unwrap_err();
    assert!(matches!(err, GraphError::AlreadyActive));
}

#[tokio::test]
async fn rollback_swallows_backend_failure_and_returns_to_idle() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/mydb/transaction/begin"))
        .respond_with(ResponseTemplate::new(200).set_body_string("txn-1"))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/mydb/transaction/rollback/txn-1"))
        .respond_with(ResponseTemplate::new(500).set_body_string("internal error"))
        .mount(&server)
        .await;

    let g = graph(&server);
    g.begin().await.unwrap();
    g.rollback().await.unwrap();

    // Idle again: a fresh begin succeeds without AlreadyActive.
    Mock::given(method("POST"))
        .and(path("/mydb/transaction/begin"))
        .respond_with(ResponseTemplate::new(200).set_body_string("txn-2"))
        .mount(&server)
        .await;
    g.begin().await.unwrap();
}

#[tokio::test]
async fn auto_transaction_rolls_back_on_mutation_failure_with_no_quad_added() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/mydb/transaction/begin"))
        .respond_with(ResponseTemplate::new(200).set_body_string("txn-9"))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/mydb/txn-9/add"))
        .respond_with(ResponseTemplate::new(500).set_body_string("store unavailable"))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/mydb/transaction/rollback/txn-9"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let g = graph(&server);
    // No explicit begin: add() auto-wraps begin/add/(rollback on failure).
    let err = g.add(vec![quad()]).await.unwrap_err();
    assert!(matches!(err, GraphError::HttpStatus { status: 500, .. }));

    // The auto-transaction rolled back and cleared: a fresh begin succeeds.
    Mock::given(method("POST"))
        .and(path("/mydb/transaction/begin"))
        .respond_with(ResponseTemplate::new(200).set_body_string("txn-10"))
        .mount(&server)
        .await;
    g.begin().await.unwrap();
}
