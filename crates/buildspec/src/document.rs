//! reading documents from disk
//!
//! The format is picked from the file extension:
//! - `json` via [serde_json]
//! - `yaml` / `yml` via [serde_yaml]
//! - `hcl` via [hcl] (the body is read as an object)
//!
//! Any other extension (e.g. `xcspec`) is read as yaml, which also accepts json.
use crate::value::{UnsupportedValue, Value};
use serde::de::DeserializeOwned;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Json,
    Yaml,
    Hcl,
}

impl Format {
    pub fn for_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Format::Json,
            Some("hcl") => Format::Hcl,
            _ => Format::Yaml,
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum DocumentError {
    #[error("IO error")]
    Io(#[from] std::io::Error),
    #[error("Unable to parse json document")]
    Json(#[from] serde_json::Error),
    #[error("Unable to parse yaml document")]
    Yaml(#[from] serde_yaml::Error),
    #[error("Unable to parse hcl document")]
    Hcl(#[from] hcl::Error),
    #[error(transparent)]
    UnsupportedValue(#[from] UnsupportedValue),
}

/// Parse document text into a typed value
pub fn deserialize_str<T: DeserializeOwned>(contents: &str, format: Format) -> Result<T, DocumentError> {
    Ok(match format {
        Format::Json => serde_json::from_str(contents)?,
        Format::Yaml => serde_yaml::from_str(contents)?,
        Format::Hcl => hcl::from_str(contents)?,
    })
}

/// Read and parse a document into a typed value
pub fn deserialize_document<T: DeserializeOwned>(path: &Path) -> Result<T, DocumentError> {
    tracing::debug!(path=%path.display(), "reading document");

    let contents = std::fs::read_to_string(path)?;
    deserialize_str(&contents, Format::for_path(path))
}

/// Parse document text into the generic [Value] tree
pub fn parse_str(contents: &str, format: Format) -> Result<Value, DocumentError> {
    Ok(match format {
        Format::Json => deserialize_str::<serde_json::Value>(contents, format)?.try_into()?,
        Format::Yaml => deserialize_str::<serde_yaml::Value>(contents, format)?.try_into()?,
        Format::Hcl => deserialize_str::<hcl::Value>(contents, format)?.try_into()?,
    })
}

/// Read a document into the generic [Value] tree
pub fn read_document(path: &Path) -> Result<Value, DocumentError> {
    tracing::debug!(path=%path.display(), "reading document");

    let contents = std::fs::read_to_string(path)?;
    parse_str(&contents, Format::for_path(path))
}
