//! End-to-end smoke test across the umbrella's re-exported surface: build a
//! quad through the term model, land it in an in-memory graph, run it
//! through SPARQL SELECT, and round-trip it through Turtle.

use rdf_graph_kit::{
    Graph, InMemoryGraph, MutableGraph, NamedNode, QueryOptions, Quad, RdfFormat, Term,
};

fn nn(iri: &str) -> Term {
    NamedNode::new(iri).unwrap().into()
}

#[tokio::test]
async fn add_select_and_serialize_round_trip() {
    let graph = InMemoryGraph::new(nn("http://ex/g"));
    let quad = Quad::try_new(
        nn("http://ex/alice"),
        nn("http://ex/knows"),
        nn("http://ex/bob"),
        rdf_graph_kit::DefaultGraph.into(),
    )
    .unwrap();
    graph.add(vec![quad]).await.unwrap();

    let rows = graph
        .select("SELECT ?o WHERE { <http://ex/alice> <http://ex/knows> ?o }", &QueryOptions::new())
        .await
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].get("o"), Some(&nn("http://ex/bob")));

    let turtle = graph
        .to_string_with(&QueryOptions::new().with_format("turtle"))
        .await
        .unwrap();
    assert!(turtle.contains("http://ex/alice"));

    let reparsed = rdf_graph_kit::parse_str(&turtle, RdfFormat::Turtle, &rdf_graph_kit::ParseOptions::default()).unwrap();
    assert_eq!(reparsed.len(), 1);
}
