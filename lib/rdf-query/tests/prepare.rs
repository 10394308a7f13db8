use rdf_query::{
    prepare_query, prepare_update, stringify_query, PrepareError, QueryKind, QueryShapeError,
};
use spargebra::term::NamedNode;

fn ex(local: &str) -> NamedNode {
    NamedNode::new(format!("http://example.com/{local}")).unwrap()
}

#[test]
fn prepare_query_injects_identity_into_default_graph() {
    let query = prepare_query(
        "SELECT * WHERE { ?s ?p ?o }",
        QueryKind::Select,
        Some(&ex("g")),
        None,
        [],
    )
    .unwrap();
    assert!(stringify_query(&query).contains("FROM <http://example.com/g>"));
}

#[test]
fn prepare_query_is_idempotent_on_existing_from() {
    let query = prepare_query(
        "SELECT * FROM <http://example.com/g> WHERE { ?s ?p ?o }",
        QueryKind::Select,
        Some(&ex("g")),
        None,
        [],
    )
    .unwrap();
    let text = stringify_query(&query);
    assert_eq!(text.matches("FROM <http://example.com/g>").count(), 1);
}

#[test]
fn prepare_query_adds_second_default_graph_without_replacing_first() {
    let query = prepare_query(
        "SELECT * FROM <http://example.com/other> WHERE { ?s ?p ?o }",
        QueryKind::Select,
        Some(&ex("g")),
        None,
        [],
    )
    .unwrap();
    let text = stringify_query(&query);
    assert!(text.contains("FROM <http://example.com/other>"));
    assert!(text.contains("FROM <http://example.com/g>"));
}

#[test]
fn prepare_query_rejects_wrong_query_kind() {
    let err = prepare_query("ASK { ?s ?p ?o }", QueryKind::Select, None, None, []).unwrap_err();
    assert!(matches!(
        err,
        PrepareError::Shape(QueryShapeError::UnexpectedQueryKind {
            expected: QueryKind::Select,
            found: QueryKind::Ask,
        })
    ));
}

#[test]
fn prepare_query_honors_global_prefixes() {
    let query = prepare_query(
        "SELECT * WHERE { ?s ex:p ?o }",
        QueryKind::Select,
        None,
        None,
        [("ex", "http://example.com/")],
    )
    .unwrap();
    assert!(stringify_query(&query).contains("http://example.com/p"));
}

#[test]
fn prepare_update_wraps_insert_data_in_identity_graph() {
    let update = prepare_update(
        "INSERT DATA { <http://example.com/s> <http://example.com/p> \"o\" }",
        Some(&ex("g")),
        None,
        [],
    )
    .unwrap();
    assert!(update.to_string().contains("GRAPH <http://example.com/g>"));
}

#[test]
fn prepare_update_leaves_explicit_graph_untouched() {
    let update = prepare_update(
        "INSERT DATA { GRAPH <http://example.com/other> { <http://example.com/s> <http://example.com/p> \"o\" } }",
        Some(&ex("g")),
        None,
        [],
    )
    .unwrap();
    let text = update.to_string();
    assert!(text.contains("http://example.com/other"));
    assert!(!text.contains("http://example.com/g>"));
}
