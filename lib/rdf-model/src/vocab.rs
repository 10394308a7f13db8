//! Constants for the vocabularies the prefix registry pre-registers:
//! xsd, rdf, rdfs, owl, dc, dcterms, foaf, skos, vcard.

use crate::NamedNode;
use std::sync::LazyLock;

macro_rules! namespace_consts {
    ($module:ident, $base:literal, [$($name:ident => $local:literal),* $(,)?]) => {
        #[allow(missing_docs)]
        pub mod $module {
            use super::*;

            /// The namespace's IRI base.
            pub const BASE: &str = $base;

            $(
                pub static $name: LazyLock<NamedNode> =
                    LazyLock::new(|| NamedNode::new_unchecked(concat!($base, $local)));
            )*
        }
    };
}

namespace_consts!(xsd, "http://www.w3.org/2001/XMLSchema#", [
    STRING => "string",
    BOOLEAN => "boolean",
    INTEGER => "integer",
    DECIMAL => "decimal",
    DOUBLE => "double",
    FLOAT => "float",
    DATE => "date",
    DATE_TIME => "dateTime",
    DURATION => "duration",
    ANY_URI => "anyURI",
]);

namespace_consts!(rdf, "http://www.w3.org/1999/02/22-rdf-syntax-ns#", [
    TYPE => "type",
    LANG_STRING => "langString",
    FIRST => "first",
    REST => "rest",
    NIL => "nil",
]);

namespace_consts!(rdfs, "http://www.w3.org/2000/01/rdf-schema#", [
    LABEL => "label",
    COMMENT => "comment",
    SUB_CLASS_OF => "subClassOf",
]);

namespace_consts!(owl, "http://www.w3.org/2002/07/owl#", [
    CLASS => "Class",
    SAME_AS => "sameAs",
]);

namespace_consts!(dc, "http://purl.org/dc/elements/1.1/", [
    TITLE => "title",
    CREATOR => "creator",
]);

namespace_consts!(dcterms, "http://purl.org/dc/terms/", [
    CREATED => "created",
    MODIFIED => "modified",
]);

namespace_consts!(foaf, "http://xmlns.com/foaf/0.1/", [
    NAME => "name",
    PERSON => "Person",
]);

namespace_consts!(skos, "http://www.w3.org/2004/02/skos/core#", [
    CONCEPT => "Concept",
    PREF_LABEL => "prefLabel",
]);

namespace_consts!(vcard, "http://www.w3.org/2006/vcard/ns#", [
    FN_ => "fn",
    EMAIL => "email",
]);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constants_resolve() {
        assert_eq!(xsd::STRING.as_str(), "http://www.w3.org/2001/XMLSchema#string");
        assert_eq!(
            rdf::LANG_STRING.as_str(),
            "http://www.w3.org/1999/02/22-rdf-syntax-ns#langString"
        );
    }
}
