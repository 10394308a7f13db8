use crate::named_node::NamedNode;
use crate::vocab;
use std::collections::BTreeMap;

/// A mapping from short prefix label to IRI base, used to shorten IRIs on
/// output and expand CURIEs on input.
///
/// Design note 9 turns the source's mutable global registry into an
/// injected value: callers construct one (typically via [`PrefixMap::default`],
/// which pre-populates the standard vocabularies), pass it around, and the
/// query preparation layer composes it with query-local prefixes at parse
/// time (query-local prefixes win on conflict).
#[derive(Debug, Clone)]
pub struct PrefixMap {
    prefixes: BTreeMap<String, String>,
}

impl PrefixMap {
    /// An empty registry with none of the standard vocabularies pre-registered.
    pub fn empty() -> Self {
        Self {
            prefixes: BTreeMap::new(),
        }
    }

    /// Registers (or overrides) a prefix.
    pub fn register(&mut self, prefix: impl Into<String>, base_iri: impl Into<String>) {
        self.prefixes.insert(prefix.into(), base_iri.into());
    }

    /// Expands `prefix:local` against the current map.
    pub fn expand(&self, curie: &str) -> Option<NamedNode> {
        let (prefix, local) = curie.split_once(':')?;
        let base = self.prefixes.get(prefix)?;
        NamedNode::new(format!("{base}{local}")).ok()
    }

    /// Contracts an IRI to `prefix:local` using the longest matching base.
    pub fn contract(&self, iri: &str) -> Option<String> {
        self.prefixes
            .iter()
            .filter(|(_, base)| iri.starts_with(base.as_str()))
            .max_by_key(|(_, base)| base.len())
            .map(|(prefix, base)| format!("{prefix}:{}", &iri[base.len()..]))
    }

    /// Returns a dynamic IRI constructor for the given base.
    pub fn namespace(base_iri: impl Into<String>) -> Namespace {
        Namespace {
            base: base_iri.into(),
        }
    }

    /// Merges `other` over `self`; `other`'s bindings take precedence on conflict.
    ///
    /// Used by the query preparation layer to compose query-local prefixes
    /// over the global registry, per the data model's "query-local prefixes
    /// take precedence" rule.
    pub fn merged_over(&self, other: &Self) -> Self {
        let mut merged = self.clone();
        for (prefix, base) in &other.prefixes {
            merged.register(prefix.clone(), base.clone());
        }
        merged
    }

    /// Iterates over all registered `(prefix, base_iri)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.prefixes.iter().map(|(p, b)| (p.as_str(), b.as_str()))
    }
}

impl Default for PrefixMap {
    /// Pre-populated with xsd, rdf, rdfs, owl, dc, dcterms, foaf, skos, vcard.
    fn default() -> Self {
        let mut map = Self::empty();
        map.register("xsd", vocab::xsd::BASE);
        map.register("rdf", vocab::rdf::BASE);
        map.register("rdfs", vocab::rdfs::BASE);
        map.register("owl", vocab::owl::BASE);
        map.register("dc", vocab::dc::BASE);
        map.register("dcterms", vocab::dcterms::BASE);
        map.register("foaf", vocab::foaf::BASE);
        map.register("skos", vocab::skos::BASE);
        map.register("vcard", vocab::vcard::BASE);
        map
    }
}

/// A dynamic IRI constructor bound to a fixed base, returned by [`PrefixMap::namespace`].
#[derive(Debug, Clone)]
pub struct Namespace {
    base: String,
}

impl Namespace {
    /// Concatenates `local` onto this namespace's base and builds a `NamedNode`.
    pub fn get(&self, local: &str) -> Result<NamedNode, oxiri::IriParseError> {
        NamedNode::new(format!("{}{local}", self.base))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_prefixes_are_preregistered() {
        let map = PrefixMap::default();
        assert_eq!(
            map.expand("xsd:string").unwrap().as_str(),
            "http://www.w3.org/2001/XMLSchema#string"
        );
    }

    #[test]
    fn contract_picks_longest_match() {
        let mut map = PrefixMap::empty();
        map.register("ex", "http://example.com/");
        map.register("exfoo", "http://example.com/foo/");
        assert_eq!(
            map.contract("http://example.com/foo/bar").as_deref(),
            Some("exfoo:bar")
        );
    }

    #[test]
    fn local_prefixes_win_on_merge() {
        let mut global = PrefixMap::empty();
        global.register("ex", "http://global/");
        let mut local = PrefixMap::empty();
        local.register("ex", "http://local/");
        let merged = global.merged_over(&local);
        assert_eq!(merged.expand("ex:x").unwrap().as_str(), "http://local/x");
    }

    #[test]
    fn namespace_concatenates() {
        let ns = PrefixMap::namespace("http://example.com/");
        assert_eq!(ns.get("foo").unwrap().as_str(), "http://example.com/foo");
    }
}
