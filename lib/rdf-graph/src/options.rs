use rdf_model::PrefixMap;

/// Options recognized across `find`/`select`/`ask`/`construct`/`toString`/
/// `saveToFile`, per the data model's `opts` table.
#[derive(Debug, Clone, Default)]
pub struct QueryOptions {
    /// Enables/overrides backend-level inference for this request.
    pub reasoning: Option<bool>,
    /// MIME type or short name, for serialize/parse.
    pub format: Option<String>,
    /// Merged over global prefixes.
    pub prefixes: Option<PrefixMap>,
    /// Resolves relative IRIs on output.
    pub base_iri: Option<String>,
}

impl QueryOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_reasoning(mut self, reasoning: bool) -> Self {
        self.reasoning = Some(reasoning);
        self
    }

    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    pub fn with_prefixes(mut self, prefixes: PrefixMap) -> Self {
        self.prefixes = Some(prefixes);
        self
    }

    pub fn with_base_iri(mut self, base_iri: impl Into<String>) -> Self {
        self.base_iri = Some(base_iri.into());
        self
    }
}
