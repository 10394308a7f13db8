//! The `QueryEngine` capability (spec.md §2, §4.3.1): execution of a
//! prepared query against a data source. Treated as an opaque, injectable
//! capability per the data model — full SPARQL 1.1 algebra is a Non-goal,
//! delegated to an external engine such as `spareval` in production.
//!
//! [`BgpEngine`] is the "minimal built-in BGP-only reference implementation"
//! the Non-goals section asks for, so [`crate::InMemoryGraph`]'s own tests
//! and the scenarios of spec.md §8 are self-contained. It supports basic
//! graph patterns, joins, `GRAPH` blocks, `UNION`, projection, `DISTINCT`,
//! and `LIMIT`/`OFFSET` — not filters, property paths, aggregation, or
//! `OPTIONAL`/`MINUS`.

use crate::bindings::Bindings;
use crate::error::GraphError;
use rdf_io::{quad_from_oxrdf, quad_to_oxrdf};
use rdf_model::Quad;
use spargebra::algebra::GraphPattern;
use spargebra::term::{NamedNodePattern, TermPattern, TriplePattern};
use spargebra::Query;
use std::collections::HashMap;

type Solution = HashMap<oxrdf::Variable, oxrdf::Term>;

/// Executes a prepared query's `GraphPattern`/CONSTRUCT template against a
/// slice of quads, entirely in memory.
///
/// A free function rather than a trait: this crate's injection point is
/// [`crate::memory::InMemoryGraph::with_engine`]-style composition is left
/// for a production caller to wire in a real `QueryEngine`; the reference
/// implementation here is concrete because it has exactly one backing data
/// shape (`&[Quad]`) to support.
pub struct BgpEngine;

impl BgpEngine {
    pub fn select(quads: &[Quad], query: &Query) -> Result<Vec<Bindings>, GraphError> {
        let Query::Select { pattern, .. } = query else {
            return Err(GraphError::query("expected a SELECT query"));
        };
        let ox_quads = to_oxrdf(quads)?;
        let solutions = eval(pattern, &ox_quads, None)?;
        Ok(solutions.into_iter().map(solution_to_bindings).collect())
    }

    pub fn ask(quads: &[Quad], query: &Query) -> Result<bool, GraphError> {
        let Query::Ask { pattern, .. } = query else {
            return Err(GraphError::query("expected an ASK query"));
        };
        let ox_quads = to_oxrdf(quads)?;
        Ok(!eval(pattern, &ox_quads, None)?.is_empty())
    }

    pub fn construct(quads: &[Quad], query: &Query) -> Result<Vec<Quad>, GraphError> {
        let Query::Construct {
            template, pattern, ..
        } = query
        else {
            return Err(GraphError::query("expected a CONSTRUCT query"));
        };
        let ox_quads = to_oxrdf(quads)?;
        let solutions = eval(pattern, &ox_quads, None)?;
        let mut result = Vec::new();
        for solution in &solutions {
            for triple in template {
                if let Some(bound) = instantiate_triple(triple, solution) {
                    result.push(bound);
                }
            }
        }
        Ok(result.into_iter().map(|t| quad_from_oxrdf(&t.in_graph(oxrdf::GraphName::DefaultGraph))).collect())
    }
}

fn to_oxrdf(quads: &[Quad]) -> Result<Vec<oxrdf::Quad>, GraphError> {
    quads
        .iter()
        .map(|q| quad_to_oxrdf(q).map_err(|e| GraphError::query(e.to_string())))
        .collect()
}

fn eval(
    pattern: &GraphPattern,
    quads: &[oxrdf::Quad],
    graph_ctx: Option<&oxrdf::GraphName>,
) -> Result<Vec<Solution>, GraphError> {
    match pattern {
        GraphPattern::Bgp { patterns } => Ok(eval_bgp(patterns, quads, graph_ctx)),
        GraphPattern::Join { left, right } => {
            let left_solutions = eval(left, quads, graph_ctx)?;
            let right_solutions = eval(right, quads, graph_ctx)?;
            Ok(join(&left_solutions, &right_solutions))
        }
        GraphPattern::Union { left, right } => {
            let mut solutions = eval(left, quads, graph_ctx)?;
            solutions.extend(eval(right, quads, graph_ctx)?);
            Ok(solutions)
        }
        GraphPattern::Graph { name, inner } => eval_graph(name, inner, quads),
        GraphPattern::Project { inner, variables } => {
            let solutions = eval(inner, quads, graph_ctx)?;
            Ok(solutions
                .into_iter()
                .map(|solution| {
                    variables
                        .iter()
                        .filter_map(|v| solution.get(v).map(|t| (v.clone(), t.clone())))
                        .collect()
                })
                .collect())
        }
        GraphPattern::Distinct { inner } => {
            let solutions = eval(inner, quads, graph_ctx)?;
            Ok(dedup(solutions))
        }
        GraphPattern::Reduced { inner } => eval(inner, quads, graph_ctx),
        GraphPattern::Slice {
            inner,
            start,
            length,
        } => {
            let solutions = eval(inner, quads, graph_ctx)?;
            let end = length.map(|len| start + len).unwrap_or(solutions.len());
            Ok(solutions
                .into_iter()
                .skip(*start)
                .take(end.saturating_sub(*start))
                .collect())
        }
        GraphPattern::Filter { inner, .. } => eval(inner, quads, graph_ctx),
        GraphPattern::OrderBy { inner, .. } => eval(inner, quads, graph_ctx),
        other => Err(GraphError::query(format!(
            "unsupported graph pattern in the built-in BGP-only reference engine: {other:?}"
        ))),
    }
}

fn eval_bgp(
    patterns: &[TriplePattern],
    quads: &[oxrdf::Quad],
    graph_ctx: Option<&oxrdf::GraphName>,
) -> Vec<Solution> {
    let mut solutions = vec![Solution::new()];
    for pattern in patterns {
        let mut next = Vec::new();
        for solution in &solutions {
            for quad in quads {
                if let Some(ctx) = graph_ctx {
                    if &quad.graph_name != ctx {
                        continue;
                    }
                }
                if let Some(extended) = match_triple_pattern(pattern, quad, solution) {
                    next.push(extended);
                }
            }
        }
        solutions = next;
        if solutions.is_empty() {
            break;
        }
    }
    solutions
}

fn eval_graph(
    name: &NamedNodePattern,
    inner: &GraphPattern,
    quads: &[oxrdf::Quad],
) -> Result<Vec<Solution>, GraphError> {
    match name {
        NamedNodePattern::NamedNode(node) => {
            let ctx = oxrdf::GraphName::NamedNode(node.clone());
            eval(inner, quads, Some(&ctx))
        }
        NamedNodePattern::Variable(var) => {
            let mut graphs: Vec<oxrdf::GraphName> = quads
                .iter()
                .map(|q| q.graph_name.clone())
                .filter(|g| *g != oxrdf::GraphName::DefaultGraph)
                .collect();
            graphs.sort();
            graphs.dedup();
            let mut solutions = Vec::new();
            for graph in graphs {
                for mut solution in eval(inner, quads, Some(&graph))? {
                    let term: oxrdf::Term = match &graph {
                        oxrdf::GraphName::NamedNode(n) => n.clone().into(),
                        oxrdf::GraphName::BlankNode(b) => b.clone().into(),
                        oxrdf::GraphName::DefaultGraph => continue,
                    };
                    solution.insert(var.clone(), term);
                    solutions.push(solution);
                }
            }
            Ok(solutions)
        }
    }
}

fn match_triple_pattern(
    pattern: &TriplePattern,
    quad: &oxrdf::Quad,
    base: &Solution,
) -> Option<Solution> {
    let mut solution = base.clone();
    if !match_term_pattern(&pattern.subject, &quad.subject.clone().into(), &mut solution) {
        return None;
    }
    let predicate_pattern: TermPattern = match &pattern.predicate {
        NamedNodePattern::NamedNode(n) => TermPattern::NamedNode(n.clone()),
        NamedNodePattern::Variable(v) => TermPattern::Variable(v.clone()),
    };
    if !match_term_pattern(&predicate_pattern, &quad.predicate.clone().into(), &mut solution) {
        return None;
    }
    if !match_term_pattern(&pattern.object, &quad.object.clone(), &mut solution) {
        return None;
    }
    Some(solution)
}

fn match_term_pattern(pattern: &TermPattern, value: &oxrdf::Term, solution: &mut Solution) -> bool {
    match pattern {
        TermPattern::NamedNode(n) => value == &oxrdf::Term::NamedNode(n.clone()),
        TermPattern::BlankNode(b) => value == &oxrdf::Term::BlankNode(b.clone()),
        TermPattern::Literal(l) => value == &oxrdf::Term::Literal(l.clone()),
        TermPattern::Variable(var) => match solution.get(var) {
            Some(bound) => bound == value,
            None => {
                solution.insert(var.clone(), value.clone());
                true
            }
        },
        TermPattern::Triple(inner) => match value {
            oxrdf::Term::Triple(triple) => {
                let s: oxrdf::Term = triple.subject.clone().into();
                let p: oxrdf::Term = triple.predicate.clone().into();
                let o = triple.object.clone();
                let predicate_pattern: TermPattern = match &inner.predicate {
                    NamedNodePattern::NamedNode(n) => TermPattern::NamedNode(n.clone()),
                    NamedNodePattern::Variable(v) => TermPattern::Variable(v.clone()),
                };
                match_term_pattern(&inner.subject, &s, solution)
                    && match_term_pattern(&predicate_pattern, &p, solution)
                    && match_term_pattern(&inner.object, &o, solution)
            }
            _ => false,
        },
    }
}

fn join(left: &[Solution], right: &[Solution]) -> Vec<Solution> {
    let mut result = Vec::new();
    for l in left {
        for r in right {
            if let Some(merged) = merge_compatible(l, r) {
                result.push(merged);
            }
        }
    }
    result
}

fn merge_compatible(a: &Solution, b: &Solution) -> Option<Solution> {
    let mut merged = a.clone();
    for (var, term) in b {
        match merged.get(var) {
            Some(existing) if existing != term => return None,
            _ => {
                merged.insert(var.clone(), term.clone());
            }
        }
    }
    Some(merged)
}

fn dedup(solutions: Vec<Solution>) -> Vec<Solution> {
    let mut seen: Vec<Vec<(String, String)>> = Vec::new();
    let mut result = Vec::new();
    for solution in solutions {
        let mut key: Vec<(String, String)> = solution
            .iter()
            .map(|(v, t)| (v.as_str().to_owned(), t.to_string()))
            .collect();
        key.sort();
        if !seen.contains(&key) {
            seen.push(key);
            result.push(solution);
        }
    }
    result
}

fn solution_to_bindings(solution: Solution) -> Bindings {
    solution
        .into_iter()
        .map(|(var, term)| (var.into_string(), rdf_io::term_from_oxrdf(&term)))
        .collect()
}

fn instantiate_triple(pattern: &TriplePattern, solution: &Solution) -> Option<oxrdf::Triple> {
    let subject = instantiate_term(&pattern.subject, solution)?;
    let predicate = match &pattern.predicate {
        NamedNodePattern::NamedNode(n) => n.clone(),
        NamedNodePattern::Variable(v) => match solution.get(v)? {
            oxrdf::Term::NamedNode(n) => n.clone(),
            _ => return None,
        },
    };
    let object = instantiate_term(&pattern.object, solution)?;
    Some(oxrdf::Triple::new(
        oxrdf::Subject::try_from(subject).ok()?,
        predicate,
        object,
    ))
}

fn instantiate_term(pattern: &TermPattern, solution: &Solution) -> Option<oxrdf::Term> {
    Some(match pattern {
        TermPattern::NamedNode(n) => n.clone().into(),
        TermPattern::BlankNode(b) => b.clone().into(),
        TermPattern::Literal(l) => l.clone().into(),
        TermPattern::Variable(v) => solution.get(v)?.clone(),
        TermPattern::Triple(inner) => instantiate_triple(inner, solution)?.into(),
    })
}
