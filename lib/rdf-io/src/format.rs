//! Format resolution: explicit option, file extension, content sniffing,
//! default — in that order, per the data model's §6 resolution table.

use oxrdfio::RdfFormat;

/// Resolves an explicit `format` option (a MIME type, a short alias like
/// `"turtle"`/`"ttl"`/`"trig"`/`"nq"`/`"n3"`/`"rdfxml"`/`"jsonld"`, or a
/// canonical format name) to an [`RdfFormat`].
///
/// Tried before file-extension mapping or content sniffing — this is
/// resolution-order step 1.
pub fn resolve_explicit(format: &str) -> Option<RdfFormat> {
    let normalized = format.trim().to_ascii_lowercase();
    match normalized.as_str() {
        "turtle" | "ttl" | "text/turtle" => Some(RdfFormat::Turtle),
        "trig" | "application/trig" => Some(RdfFormat::TriG),
        "n-triples" | "ntriples" | "nt" | "application/n-triples" => Some(RdfFormat::NTriples),
        "n-quads" | "nquads" | "nq" | "application/n-quads" => Some(RdfFormat::NQuads),
        "n3" | "text/n3" => Some(RdfFormat::N3),
        "rdfxml" | "rdf+xml" | "rdf/xml" | "xml" | "application/rdf+xml" => {
            Some(RdfFormat::RdfXml)
        }
        "jsonld" | "json-ld" | "ld+json" | "application/ld+json" => Some(RdfFormat::JsonLd {
            profile: oxjsonld::JsonLdProfileSet::empty(),
        }),
        _ => RdfFormat::from_media_type(format),
    }
}

/// Resolution-order step 2: file-extension mapping, per the data model's
/// `.ttl→turtle`, `.nq→n-quads`, `.trig→trig`, `.n3→n3`,
/// `.rdf|.rdfxml|.xml→rdf+xml`, `.jsonld→ld+json` table.
pub fn resolve_extension(path: &std::path::Path) -> Option<RdfFormat> {
    let extension = path.extension()?.to_str()?;
    match extension.to_ascii_lowercase().as_str() {
        "ttl" => Some(RdfFormat::Turtle),
        "nq" => Some(RdfFormat::NQuads),
        "trig" => Some(RdfFormat::TriG),
        "n3" => Some(RdfFormat::N3),
        "rdf" | "rdfxml" | "xml" => Some(RdfFormat::RdfXml),
        "jsonld" => Some(RdfFormat::JsonLd {
            profile: oxjsonld::JsonLdProfileSet::empty(),
        }),
        "nt" => Some(RdfFormat::NTriples),
        other => RdfFormat::from_extension(other),
    }
}

/// Resolution-order step 3: content sniffing.
///
/// - Leading `<rdf:RDF` / `<RDF` ⇒ `rdf+xml`, unless the first two
///   characters are `<<` (an RDF-star quoted-triple opener, not an XML tag).
/// - Leading `{`/`[` with a parseable `@context` ⇒ `ld+json`.
/// - Presence of `<<` and `>>` ⇒ turtle-star (plain Turtle; the star variant
///   is the same [`RdfFormat::Turtle`] — RDF-star syntax is parsed
///   unconditionally once the `rdf-star`/`rdf-12` feature is enabled).
/// - Otherwise: `None` (caller falls back to the format-resolution default).
pub fn sniff(content: &str) -> Option<RdfFormat> {
    let trimmed = content.trim_start();
    if !trimmed.starts_with("<<")
        && (trimmed.starts_with("<rdf:RDF") || trimmed.starts_with("<RDF"))
    {
        return Some(RdfFormat::RdfXml);
    }
    if (trimmed.starts_with('{') || trimmed.starts_with('['))
        && sniff_has_context(trimmed)
    {
        return Some(RdfFormat::JsonLd {
            profile: oxjsonld::JsonLdProfileSet::empty(),
        });
    }
    if trimmed.contains("<<") && trimmed.contains(">>") {
        return Some(RdfFormat::Turtle);
    }
    None
}

fn sniff_has_context(content: &str) -> bool {
    serde_json::from_str::<serde_json::Value>(content)
        .ok()
        .and_then(|value| value.get("@context").cloned())
        .is_some()
}

/// The default format when nothing else resolves: Turtle.
pub fn default_format() -> RdfFormat {
    RdfFormat::Turtle
}

/// Full resolution order: explicit option, then file extension, then content
/// sniffing, then the Turtle default.
pub fn resolve(
    explicit: Option<&str>,
    path: Option<&std::path::Path>,
    content: Option<&str>,
) -> RdfFormat {
    if let Some(format) = explicit.and_then(resolve_explicit) {
        return format;
    }
    if let Some(format) = path.and_then(resolve_extension) {
        return format;
    }
    if let Some(format) = content.and_then(sniff) {
        return format;
    }
    default_format()
}

/// Whether `format` has a dedicated RDF-star wire variant to upgrade to.
///
/// Per the data model's "RDF-star upgrade on serialization": N-Triples,
/// N-Quads, Turtle, and TriG all parse/serialize `<< s p o >>` once the
/// `rdf-12` feature is on, so the "upgrade" here is a no-op at the
/// `RdfFormat` level — these formats already are their own star variant.
/// RDF/XML and JSON-LD have no triple-term syntax at all.
pub fn has_star_variant(format: RdfFormat) -> bool {
    matches!(
        format,
        RdfFormat::NTriples | RdfFormat::NQuads | RdfFormat::Turtle | RdfFormat::TriG
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn explicit_short_alias_resolves() {
        assert_eq!(resolve_explicit("ttl"), Some(RdfFormat::Turtle));
        assert_eq!(resolve_explicit("nq"), Some(RdfFormat::NQuads));
    }

    #[test]
    fn extension_mapping_matches_table() {
        assert_eq!(
            resolve_extension(Path::new("data.ttl")),
            Some(RdfFormat::Turtle)
        );
        assert_eq!(
            resolve_extension(Path::new("data.nq")),
            Some(RdfFormat::NQuads)
        );
        assert_eq!(
            resolve_extension(Path::new("data.rdf")),
            Some(RdfFormat::RdfXml)
        );
    }

    #[test]
    fn sniff_detects_rdf_xml() {
        assert_eq!(
            sniff("  <rdf:RDF xmlns:rdf=\"...\"></rdf:RDF>"),
            Some(RdfFormat::RdfXml)
        );
    }

    #[test]
    fn sniff_does_not_mistake_quoted_triple_for_xml() {
        assert_ne!(
            sniff("<< <http://s> <http://p> <http://o> >> <http://m> \"x\" ."),
            Some(RdfFormat::RdfXml)
        );
    }

    #[test]
    fn sniff_detects_turtle_star_via_angle_brackets() {
        assert_eq!(
            sniff("<< <http://s> <http://p> <http://o> >> <http://m> \"x\" ."),
            Some(RdfFormat::Turtle)
        );
    }

    #[test]
    fn sniff_detects_json_ld_via_context() {
        assert_eq!(
            sniff(r#"{"@context": "http://schema.org", "@type": "Person"}"#),
            Some(RdfFormat::JsonLd {
                profile: oxjsonld::JsonLdProfileSet::empty()
            })
        );
    }

    #[test]
    fn resolution_order_prefers_explicit_over_extension() {
        let resolved = resolve(Some("nq"), Some(Path::new("data.ttl")), None);
        assert_eq!(resolved, RdfFormat::NQuads);
    }

    #[test]
    fn resolution_falls_back_to_turtle_default() {
        assert_eq!(resolve(None, None, None), RdfFormat::Turtle);
    }
}
