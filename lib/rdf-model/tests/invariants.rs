use rdf_model::{BlankNode, DefaultGraph, Literal, NamedNode, Quad, QuotedTriple, Term};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

fn hash_of<T: Hash>(value: &T) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

fn nn(iri: &str) -> Term {
    NamedNode::new(iri).unwrap().into()
}

#[test]
fn every_term_equals_itself_and_hashes_consistently() {
    let terms: Vec<Term> = vec![
        nn("http://example.com/a"),
        BlankNode::new_unchecked("b1").into(),
        Literal::new_simple("hello").into(),
        DefaultGraph.into(),
        QuotedTriple::new(nn("http://s"), nn("http://p"), nn("http://o")).into(),
    ];
    for term in &terms {
        assert_eq!(term, term);
        assert_eq!(hash_of(term), hash_of(term));
    }
}

#[test]
fn equal_quads_hash_equal() {
    let a = Quad::new_unchecked(nn("http://s"), nn("http://p"), nn("http://o"), DefaultGraph.into());
    let b = Quad::new_unchecked(nn("http://s"), nn("http://p"), nn("http://o"), DefaultGraph.into());
    assert_eq!(a, b);
    assert_eq!(hash_of(&a), hash_of(&b));
}

#[test]
fn quoted_triple_nests_without_a_graph_slot() {
    let inner = QuotedTriple::new(nn("http://s"), nn("http://p"), nn("http://o"));
    let outer = Quad::try_new(
        Term::from(inner),
        nn("http://meta"),
        Literal::new_simple("note").into(),
        DefaultGraph.into(),
    )
    .unwrap();
    assert!(outer.subject.is_quoted_triple());
}
