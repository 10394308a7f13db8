//! `fromJs`/`toJs`-style value coercion, per the data model's XSD mapping
//! table: integer → `xsd:integer`, finite non-integer number → `xsd:decimal`,
//! boolean → `xsd:boolean`, date/time → `xsd:dateTime`. Terms coerce to
//! themselves (identity).

use crate::literal::Literal;
use crate::term::Term;
use crate::vocab::xsd;
use chrono::{DateTime, SecondsFormat, Utc};

/// A host-language value coercible to/from an RDF [`Term`].
///
/// Stands in for the dynamically-typed values ("JS-shaped values") the
/// source coerces through its factory; Rust's lack of a universal dynamic
/// value type means this enum enumerates exactly the cases the data model's
/// XSD mapping table names.
#[derive(Debug, Clone, PartialEq)]
pub enum JsValue {
    Null,
    Bool(bool),
    Integer(i64),
    Number(f64),
    String(String),
    DateTime(DateTime<Utc>),
    Term(Term),
}

impl JsValue {
    /// Coerces this value to a [`Term`], per the XSD mapping table.
    ///
    /// `Null` has no RDF representation and returns `None`; a [`JsValue::Term`]
    /// passes through unchanged (identity on terms, as the data model requires).
    pub fn to_term(&self) -> Option<Term> {
        match self {
            Self::Null => None,
            Self::Bool(b) => Some(Literal::new_typed(b.to_string(), xsd::BOOLEAN.clone()).into()),
            Self::Integer(i) => {
                Some(Literal::new_typed(i.to_string(), xsd::INTEGER.clone()).into())
            }
            Self::Number(n) => Some(number_to_term(*n)),
            Self::String(s) => Some(Literal::new_simple(s.clone()).into()),
            Self::DateTime(dt) => Some(
                Literal::new_typed(
                    dt.to_rfc3339_opts(SecondsFormat::AutoSi, true),
                    xsd::DATE_TIME.clone(),
                )
                .into(),
            ),
            Self::Term(t) => Some(t.clone()),
        }
    }
}

/// Finite integral numbers coerce to `xsd:integer`; finite non-integral
/// numbers coerce to `xsd:decimal`; non-finite numbers (NaN, +/-Infinity)
/// still need a datatype, so they fall back to `xsd:double` (the only XSD
/// numeric type that can represent them).
fn number_to_term(n: f64) -> Term {
    if !n.is_finite() {
        return Literal::new_typed(format_double(n), xsd::DOUBLE.clone()).into();
    }
    if n.fract() == 0.0 && n.abs() < 1e15 {
        Literal::new_typed(format!("{n:.0}"), xsd::INTEGER.clone()).into()
    } else {
        Literal::new_typed(format!("{n}"), xsd::DECIMAL.clone()).into()
    }
}

fn format_double(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_owned()
    } else if n.is_infinite() {
        if n > 0.0 { "INF".to_owned() } else { "-INF".to_owned() }
    } else {
        n.to_string()
    }
}

/// Coerces a [`Term`] back to a host value. Non-literal terms pass through
/// as [`JsValue::Term`]; literals are decoded per their datatype when it is
/// one of the XSD types this mapping understands, and left as
/// [`JsValue::String`] of their lexical form otherwise.
pub fn term_to_js(term: &Term) -> JsValue {
    let Term::Literal(literal) = term else {
        return JsValue::Term(term.clone());
    };
    let datatype = literal.datatype();
    if datatype == *xsd::BOOLEAN {
        if let Ok(b) = literal.value().parse::<bool>() {
            return JsValue::Bool(b);
        }
    } else if datatype == *xsd::INTEGER {
        if let Ok(i) = literal.value().parse::<i64>() {
            return JsValue::Integer(i);
        }
    } else if datatype == *xsd::DECIMAL || datatype == *xsd::DOUBLE || datatype == *xsd::FLOAT {
        if let Ok(f) = literal.value().parse::<f64>() {
            return JsValue::Number(f);
        }
    } else if datatype == *xsd::DATE_TIME {
        if let Ok(dt) = DateTime::parse_from_rfc3339(literal.value()) {
            return JsValue::DateTime(dt.with_timezone(&Utc));
        }
    }
    JsValue::String(literal.value().to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_maps_to_xsd_integer() {
        let term = JsValue::Integer(42).to_term().unwrap();
        assert_eq!(term.to_string(), "\"42\"^^<http://www.w3.org/2001/XMLSchema#integer>");
    }

    #[test]
    fn whole_float_maps_to_xsd_integer() {
        let term = JsValue::Number(3.0).to_term().unwrap();
        assert!(term.to_string().ends_with("XMLSchema#integer>"));
    }

    #[test]
    fn fractional_float_maps_to_xsd_decimal() {
        let term = JsValue::Number(3.5).to_term().unwrap();
        assert!(term.to_string().ends_with("XMLSchema#decimal>"));
    }

    #[test]
    fn bool_roundtrips() {
        let term = JsValue::Bool(true).to_term().unwrap();
        let back = term_to_js(&term);
        assert_eq!(back, JsValue::Bool(true));
    }

    #[test]
    fn plain_term_is_identity() {
        let t = Term::from(crate::NamedNode::new_unchecked("http://example.com"));
        let js = JsValue::Term(t.clone());
        assert_eq!(js.to_term().unwrap(), t);
    }
}
