use rdf_model::Term;
use std::collections::BTreeMap;

/// One SPARQL result row: a mapping from variable name to the term it's
/// bound to. Variables absent from a given row (OPTIONAL-unmatched) simply
/// have no key.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Bindings {
    values: BTreeMap<String, Term>,
}

impl Bindings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, variable: impl Into<String>, term: Term) {
        self.values.insert(variable.into(), term);
    }

    pub fn get(&self, variable: &str) -> Option<&Term> {
        self.values.get(variable)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Term)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn variables(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }
}

impl FromIterator<(String, Term)> for Bindings {
    fn from_iter<I: IntoIterator<Item = (String, Term)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}
