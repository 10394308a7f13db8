//! Filesystem convenience wrappers for [`crate::parse`]/[`crate::serialize`]:
//! the data model's `fromFile`/`saveToFile` factories, format-resolved from
//! the path's extension (then content sniffing) when no format is given
//! explicitly.

use crate::format::resolve;
use crate::parse::{parse_read, ParseOptions};
use crate::serialize::{serialize, SerializeOptions};
use oxrdfio::RdfFormat;
use rdf_model::Quad;
use std::fs::File;
use std::io::{BufReader, Write};
use std::path::Path;
use thiserror::Error;

/// A file read or write failed, independent of whether the content parsed.
#[derive(Debug, Error)]
pub enum IoError {
    #[error("I/O error reading/writing {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Parse(#[from] crate::error::ParseError),
    #[error(transparent)]
    Serialize(#[from] crate::error::SerializeError),
}

/// Reads and parses `path`, resolving the format via an explicit override,
/// then the file extension, then content sniffing (the same three-step
/// order [`crate::format::resolve`] implements).
pub fn from_file(path: &Path, format: Option<&str>) -> Result<Vec<Quad>, IoError> {
    let io_err = |source| IoError::Io {
        path: path.display().to_string(),
        source,
    };
    let bytes = std::fs::read(path).map_err(io_err)?;
    let sniff_sample = String::from_utf8_lossy(&bytes[..bytes.len().min(4096)]).into_owned();
    let resolved = resolve(format, Some(path), Some(&sniff_sample));
    Ok(parse_read(BufReader::new(File::open(path).map_err(io_err)?), resolved, &ParseOptions::default())?)
}

/// Serializes `quads` and writes them to `path`, resolving the format the
/// same way [`from_file`] does (explicit, then extension, then default).
pub fn save_to_file(
    quads: &[Quad],
    path: &Path,
    format: Option<&str>,
    opts: &SerializeOptions,
) -> Result<(), IoError> {
    let io_err = |source| IoError::Io {
        path: path.display().to_string(),
        source,
    };
    let resolved = resolve(format, Some(path), None);
    let bytes = serialize(quads, resolved, opts)?;
    let mut file = File::create(path).map_err(io_err)?;
    file.write_all(&bytes).map_err(io_err)?;
    Ok(())
}

/// Used when the caller already knows the format and wants to skip
/// extension/content resolution entirely.
pub fn from_file_with_format(path: &Path, format: RdfFormat) -> Result<Vec<Quad>, IoError> {
    let io_err = |source| IoError::Io {
        path: path.display().to_string(),
        source,
    };
    let file = File::open(path).map_err(io_err)?;
    Ok(parse_read(BufReader::new(file), format, &ParseOptions::default())?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rdf_model::{DefaultGraph, NamedNode};
    use tempfile::Builder;

    #[test]
    fn round_trips_through_a_ttl_file() {
        let file = Builder::new().suffix(".ttl").tempfile().unwrap();
        let quad = Quad::new_unchecked(
            NamedNode::new_unchecked("http://ex/s").into(),
            NamedNode::new_unchecked("http://ex/p").into(),
            NamedNode::new_unchecked("http://ex/o").into(),
            DefaultGraph.into(),
        );
        save_to_file(&[quad.clone()], file.path(), None, &SerializeOptions::default()).unwrap();
        let read_back = from_file(file.path(), None).unwrap();
        assert_eq!(read_back, vec![quad]);
    }

    #[test]
    fn missing_file_surfaces_io_error() {
        let result = from_file(Path::new("/nonexistent/path/data.ttl"), None);
        assert!(matches!(result, Err(IoError::Io { .. })));
    }
}
