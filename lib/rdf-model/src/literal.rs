use crate::named_node::{escape_iri, NamedNode};
use crate::vocab::{rdf, xsd};
use oxilangtag::{LanguageTag, LanguageTagParseError};
use std::fmt;

/// The base direction of a directional language-tagged string.
#[derive(Eq, PartialEq, Ord, PartialOrd, Debug, Clone, Copy, Hash)]
pub enum BaseDirection {
    Ltr,
    Rtl,
}

impl fmt::Display for BaseDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Ltr => "ltr",
            Self::Rtl => "rtl",
        })
    }
}

#[derive(Eq, PartialEq, Ord, PartialOrd, Debug, Clone, Hash)]
struct LanguageTagValue {
    tag: String,
    direction: Option<BaseDirection>,
}

/// An RDF [literal](https://www.w3.org/TR/rdf11-concepts/#dfn-literal).
///
/// A plain literal defaults to datatype `xsd:string`; a language-tagged
/// literal always has datatype `rdf:langString`, per the data model.
///
/// ```
/// use rdf_model::Literal;
/// use rdf_model::vocab::xsd;
///
/// assert_eq!("\"foo\"", Literal::new_simple("foo").to_string());
/// assert_eq!(
///     "\"1999-01-01\"^^<http://www.w3.org/2001/XMLSchema#date>",
///     Literal::new_typed("1999-01-01", xsd::DATE.clone()).to_string()
/// );
/// assert_eq!("\"foo\"@en", Literal::new_language_tagged("foo", "en").unwrap().to_string());
/// ```
#[derive(Eq, PartialEq, Ord, PartialOrd, Debug, Clone, Hash)]
pub struct Literal(LiteralContent);

#[derive(Eq, PartialEq, Ord, PartialOrd, Debug, Clone, Hash)]
enum LiteralContent {
    String(String),
    LanguageTaggedString {
        value: String,
        language: LanguageTagValue,
    },
    Typed {
        value: String,
        datatype: NamedNode,
    },
}

impl Literal {
    /// Builds a simple literal (datatype `xsd:string`).
    #[inline]
    pub fn new_simple(value: impl Into<String>) -> Self {
        Self(LiteralContent::String(value.into()))
    }

    /// Builds a literal with an explicit datatype.
    ///
    /// If `datatype` is `xsd:string`, this is equivalent to [`Literal::new_simple`].
    pub fn new_typed(value: impl Into<String>, datatype: NamedNode) -> Self {
        let value = value.into();
        if datatype == *xsd::STRING {
            Self(LiteralContent::String(value))
        } else {
            Self(LiteralContent::Typed { value, datatype })
        }
    }

    /// Builds a language-tagged literal (datatype `rdf:langString`), validating the tag.
    pub fn new_language_tagged(
        value: impl Into<String>,
        language: impl Into<String>,
    ) -> Result<Self, LanguageTagParseError> {
        Self::new_language_tagged_with_direction(value, language, None)
    }

    /// Builds a directional language-tagged literal.
    pub fn new_language_tagged_with_direction(
        value: impl Into<String>,
        language: impl Into<String>,
        direction: Option<BaseDirection>,
    ) -> Result<Self, LanguageTagParseError> {
        let mut tag = language.into();
        tag.make_ascii_lowercase();
        let tag = LanguageTag::parse(tag)?.into_inner();
        Ok(Self(LiteralContent::LanguageTaggedString {
            value: value.into(),
            language: LanguageTagValue { tag, direction },
        }))
    }

    /// The lexical form.
    #[inline]
    pub fn value(&self) -> &str {
        match &self.0 {
            LiteralContent::String(v)
            | LiteralContent::LanguageTaggedString { value: v, .. }
            | LiteralContent::Typed { value: v, .. } => v,
        }
    }

    /// The BCP47 language tag, if this is a language-tagged string.
    #[inline]
    pub fn language(&self) -> Option<&str> {
        match &self.0 {
            LiteralContent::LanguageTaggedString { language, .. } => Some(&language.tag),
            _ => None,
        }
    }

    /// The base direction, if this is a directional language-tagged string.
    #[inline]
    pub fn direction(&self) -> Option<BaseDirection> {
        match &self.0 {
            LiteralContent::LanguageTaggedString { language, .. } => language.direction,
            _ => None,
        }
    }

    /// The datatype: `rdf:langString` for language-tagged strings, `xsd:string` for
    /// plain literals, or the explicit datatype otherwise.
    pub fn datatype(&self) -> NamedNode {
        match &self.0 {
            LiteralContent::String(_) => xsd::STRING.clone(),
            LiteralContent::LanguageTaggedString { .. } => rdf::LANG_STRING.clone(),
            LiteralContent::Typed { datatype, .. } => datatype.clone(),
        }
    }

    /// True for language-tagged strings or `xsd:string`-typed literals (RDF 1.0 "plain literal").
    pub fn is_plain(&self) -> bool {
        !matches!(&self.0, LiteralContent::Typed { .. })
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\"", escape_lexical(self.value()))?;
        match &self.0 {
            LiteralContent::String(_) => Ok(()),
            LiteralContent::LanguageTaggedString { language, .. } => {
                write!(f, "@{}", language.tag)
            }
            LiteralContent::Typed { datatype, .. } => {
                write!(f, "^^<{}>", escape_iri(datatype.as_str()))
            }
        }
    }
}

/// Escapes `"`, `\`, and control characters for N-Triples/Turtle/SPARQL string literals.
pub(crate) fn escape_lexical(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_literal_datatype_defaults_to_string() {
        let l = Literal::new_simple("hi");
        assert_eq!(l.datatype(), *xsd::STRING);
        assert!(l.is_plain());
    }

    #[test]
    fn language_tagged_datatype_is_lang_string() {
        let l = Literal::new_language_tagged("hi", "en").unwrap();
        assert_eq!(l.datatype(), *rdf::LANG_STRING);
        assert_eq!(l.language(), Some("en"));
        assert!(l.is_plain());
    }

    #[test]
    fn typed_literal_roundtrips_through_display() {
        let l = Literal::new_typed("42", xsd::INTEGER.clone());
        assert_eq!(
            l.to_string(),
            "\"42\"^^<http://www.w3.org/2001/XMLSchema#integer>"
        );
    }

    #[test]
    fn xsd_string_datatype_collapses_to_simple() {
        let l = Literal::new_typed("hi", xsd::STRING.clone());
        assert!(l.is_plain());
        assert_eq!(l.to_string(), "\"hi\"");
    }
}
