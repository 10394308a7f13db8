//! `substituteBindings`: replaces variables throughout a query AST with
//! bound terms, leaving every other node structurally identical.

use oxrdf::{BlankNode, Literal, NamedNode, Variable};
use spargebra::algebra::{
    AggregateExpression, Expression, GraphPattern, OrderExpression, PropertyPathExpression,
};
use spargebra::term::{
    GraphNamePattern, GroundTermPattern, NamedNodePattern, TermPattern, TriplePattern,
};
use spargebra::{GraphUpdateOperation, Query, Update};
use std::collections::HashMap;

/// A term a [`Variable`] can be bound to.
///
/// Limited to the positions every SPARQL term pattern accepts (named node,
/// blank node, literal); a variable bound to a quoted triple is out of scope
/// here; callers with that need should substitute at the `rdf-model` level
/// before re-parsing into an AST.
#[derive(Debug, Clone, PartialEq)]
pub enum BoundTerm {
    NamedNode(NamedNode),
    BlankNode(BlankNode),
    Literal(Literal),
}

impl BoundTerm {
    fn as_expression_term(&self) -> Option<Expression> {
        match self {
            Self::NamedNode(n) => Some(Expression::NamedNode(n.clone())),
            Self::Literal(l) => Some(Expression::Literal(l.clone())),
            // blank nodes have no expression-position representation
            Self::BlankNode(_) => None,
        }
    }
}

impl From<BoundTerm> for TermPattern {
    fn from(term: BoundTerm) -> Self {
        match term {
            BoundTerm::NamedNode(n) => Self::NamedNode(n),
            BoundTerm::BlankNode(b) => Self::BlankNode(b),
            BoundTerm::Literal(l) => Self::Literal(l),
        }
    }
}

/// A set of variable-to-term bindings to substitute into a prepared query.
pub type Bindings = HashMap<Variable, BoundTerm>;

/// Replaces every bound variable in `query` with its term, everywhere a
/// variable can legally appear: triple/path patterns, `BIND`/`FILTER`
/// expressions, `GRAPH ?g { ... }` slots, `ORDER BY`, `GROUP BY`, and
/// aggregates. Variables absent from `bindings` are left untouched.
pub fn substitute_query_bindings(query: &Query, bindings: &Bindings) -> Query {
    let mut query = query.clone();
    match &mut query {
        Query::Select { pattern, .. }
        | Query::Construct { pattern, .. }
        | Query::Describe { pattern, .. }
        | Query::Ask { pattern, .. } => substitute_pattern(pattern, bindings),
    }
    if let Query::Construct { template, .. } = &mut query {
        for triple in template {
            substitute_triple_pattern(triple, bindings);
        }
    }
    query
}

fn substitute_term_pattern(term: &mut TermPattern, bindings: &Bindings) {
    if let TermPattern::Variable(var) = term {
        if let Some(bound) = bindings.get(var) {
            *term = bound.clone().into();
        }
    } else if let TermPattern::Triple(triple) = term {
        substitute_triple_pattern(triple, bindings);
    }
}

fn substitute_ground_term_pattern(term: &mut GroundTermPattern, bindings: &Bindings) {
    if let GroundTermPattern::Variable(var) = term {
        if let Some(bound) = bindings.get(var) {
            *term = match bound.clone() {
                BoundTerm::NamedNode(n) => GroundTermPattern::NamedNode(n),
                BoundTerm::BlankNode(_) => return,
                BoundTerm::Literal(l) => GroundTermPattern::Literal(l),
            };
        }
    }
}

fn substitute_triple_pattern(triple: &mut TriplePattern, bindings: &Bindings) {
    substitute_term_pattern(&mut triple.subject, bindings);
    substitute_named_node_pattern(&mut triple.predicate, bindings);
    substitute_term_pattern(&mut triple.object, bindings);
}

fn substitute_named_node_pattern(pattern: &mut NamedNodePattern, bindings: &Bindings) {
    if let NamedNodePattern::Variable(var) = pattern {
        if let Some(BoundTerm::NamedNode(n)) = bindings.get(var) {
            *pattern = NamedNodePattern::NamedNode(n.clone());
        }
    }
}

fn substitute_path(_path: &mut PropertyPathExpression, _bindings: &Bindings) {
    // property paths carry no variables of their own (only fixed predicate IRIs
    // and path operators); nothing to substitute.
}

fn substitute_expression(expr: &mut Expression, bindings: &Bindings) {
    match expr {
        Expression::Variable(var) => {
            if let Some(bound) = bindings.get(var) {
                if let Some(replacement) = bound.as_expression_term() {
                    *expr = replacement;
                }
            }
        }
        Expression::NamedNode(_) | Expression::Literal(_) => {}
        Expression::Or(a, b)
        | Expression::And(a, b)
        | Expression::Equal(a, b)
        | Expression::SameTerm(a, b)
        | Expression::Greater(a, b)
        | Expression::GreaterOrEqual(a, b)
        | Expression::Less(a, b)
        | Expression::LessOrEqual(a, b)
        | Expression::Add(a, b)
        | Expression::Subtract(a, b)
        | Expression::Multiply(a, b)
        | Expression::Divide(a, b) => {
            substitute_expression(a, bindings);
            substitute_expression(b, bindings);
        }
        Expression::In(a, list) => {
            substitute_expression(a, bindings);
            for item in list {
                substitute_expression(item, bindings);
            }
        }
        Expression::UnaryPlus(e) | Expression::UnaryMinus(e) | Expression::Not(e) => {
            substitute_expression(e, bindings);
        }
        Expression::Exists(pattern) => substitute_pattern(pattern, bindings),
        Expression::Bound(_) => {}
        Expression::If(a, b, c) => {
            substitute_expression(a, bindings);
            substitute_expression(b, bindings);
            substitute_expression(c, bindings);
        }
        Expression::Coalesce(items) => {
            for item in items {
                substitute_expression(item, bindings);
            }
        }
        Expression::FunctionCall(_, args) => {
            for arg in args {
                substitute_expression(arg, bindings);
            }
        }
    }
}

fn substitute_pattern(pattern: &mut GraphPattern, bindings: &Bindings) {
    match pattern {
        GraphPattern::Bgp { patterns } => {
            for triple in patterns {
                substitute_triple_pattern(triple, bindings);
            }
        }
        GraphPattern::Path {
            subject,
            path,
            object,
        } => {
            substitute_term_pattern(subject, bindings);
            substitute_path(path, bindings);
            substitute_term_pattern(object, bindings);
        }
        GraphPattern::Join { left, right }
        | GraphPattern::Union { left, right }
        | GraphPattern::Minus { left, right } => {
            substitute_pattern(left, bindings);
            substitute_pattern(right, bindings);
        }
        GraphPattern::LeftJoin {
            left,
            right,
            expression,
        } => {
            substitute_pattern(left, bindings);
            substitute_pattern(right, bindings);
            if let Some(expr) = expression {
                substitute_expression(expr, bindings);
            }
        }
        GraphPattern::Filter { expr, inner } => {
            substitute_expression(expr, bindings);
            substitute_pattern(inner, bindings);
        }
        GraphPattern::Graph { name, inner } => {
            substitute_named_node_pattern(name, bindings);
            substitute_pattern(inner, bindings);
        }
        GraphPattern::Extend {
            inner, expression, ..
        } => {
            // the bound variable itself is a binding target, not a substitution site
            substitute_pattern(inner, bindings);
            substitute_expression(expression, bindings);
        }
        GraphPattern::Values { .. } => {
            // VALUES rows are already ground terms; no variables to substitute.
        }
        GraphPattern::OrderBy { inner, expression } => {
            substitute_pattern(inner, bindings);
            for order in expression {
                match order {
                    OrderExpression::Asc(e) | OrderExpression::Desc(e) => {
                        substitute_expression(e, bindings);
                    }
                }
            }
        }
        GraphPattern::Project { inner, .. }
        | GraphPattern::Distinct { inner }
        | GraphPattern::Reduced { inner }
        | GraphPattern::Slice { inner, .. } => substitute_pattern(inner, bindings),
        GraphPattern::Group {
            inner, aggregates, ..
        } => {
            substitute_pattern(inner, bindings);
            for (_, aggregate) in aggregates {
                if let AggregateExpression::FunctionCall { expr, .. } = aggregate {
                    substitute_expression(expr, bindings);
                }
            }
        }
        GraphPattern::Service { name, inner, .. } => {
            substitute_named_node_pattern(name, bindings);
            substitute_pattern(inner, bindings);
        }
    }
}

fn substitute_graph_name_pattern(pattern: &mut GraphNamePattern, bindings: &Bindings) {
    if let GraphNamePattern::Variable(var) = pattern {
        if let Some(BoundTerm::NamedNode(n)) = bindings.get(var) {
            *pattern = GraphNamePattern::NamedNode(n.clone());
        }
    }
}

/// The update counterpart to [`substitute_query_bindings`]: substitutes
/// through `INSERT`/`DELETE` quad patterns and the `WHERE` pattern of a
/// `DeleteInsert` operation (`LOAD`/`CLEAR`/`CREATE`/`DROP` carry no
/// variables and pass through unchanged).
pub fn substitute_update_bindings(update: &Update, bindings: &Bindings) -> Update {
    let mut update = update.clone();
    for operation in &mut update.operations {
        if let GraphUpdateOperation::DeleteInsert {
            delete,
            insert,
            pattern,
            ..
        } = operation
        {
            for quad in delete {
                substitute_ground_term_pattern(&mut quad.subject, bindings);
                substitute_named_node_pattern(&mut quad.predicate, bindings);
                substitute_ground_term_pattern(&mut quad.object, bindings);
                substitute_graph_name_pattern(&mut quad.graph_name, bindings);
            }
            for quad in insert {
                substitute_term_pattern(&mut quad.subject, bindings);
                substitute_named_node_pattern(&mut quad.predicate, bindings);
                substitute_term_pattern(&mut quad.object, bindings);
                substitute_graph_name_pattern(&mut quad.graph_name, bindings);
            }
            substitute_pattern(pattern, bindings);
        }
    }
    update
}

#[cfg(test)]
mod tests {
    use super::*;
    use spargebra::SparqlParser;

    fn parse(sparql: &str) -> Query {
        SparqlParser::new().parse_query(sparql).unwrap()
    }

    #[test]
    fn substitutes_bound_variable_in_bgp() {
        let query = parse("SELECT * WHERE { ?s <http://example.com/p> ?o }");
        let mut bindings = Bindings::new();
        bindings.insert(
            Variable::new("s").unwrap(),
            BoundTerm::NamedNode(NamedNode::new("http://example.com/s").unwrap()),
        );
        let substituted = substitute_query_bindings(&query, &bindings);
        assert!(substituted.to_string().contains("http://example.com/s"));
        assert!(substituted.to_string().contains("?o"));
    }

    #[test]
    fn substitutes_variable_inside_filter_expression() {
        let query = parse("SELECT * WHERE { ?s ?p ?o . FILTER(?o = ?x) }");
        let mut bindings = Bindings::new();
        bindings.insert(
            Variable::new("x").unwrap(),
            BoundTerm::Literal(Literal::new_simple_literal("hello")),
        );
        let substituted = substitute_query_bindings(&query, &bindings);
        assert!(substituted.to_string().contains("\"hello\""));
    }

    #[test]
    fn unbound_variables_are_left_untouched() {
        let query = parse("SELECT * WHERE { ?s ?p ?o }");
        let bindings = Bindings::new();
        let substituted = substitute_query_bindings(&query, &bindings);
        assert_eq!(substituted, query);
    }
}
