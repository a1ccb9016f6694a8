//! Startup config loading (spec §6: "TOML/JSON documents loaded at
//! startup"). `ConfigSnapshot` already derives `serde::Deserialize` with
//! the persisted layout's `camelCase` field names, so loading is just
//! picking a deserializer by file extension and running `validate`
//! before anything downstream sees the result.

use crate::validate::{validate, ValidationReport};
use std::path::Path;
use thiserror::Error;
use types::ConfigSnapshot;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: anyhow::Error,
    },
    #[error("unrecognized config file extension: {path} (expected .toml or .json)")]
    UnknownFormat { path: String },
    #[error("config failed validation: {0:?}")]
    Invalid(Vec<String>),
}

/// Loads and validates a `ConfigSnapshot` from a `.toml` or `.json` file.
/// Does not apply it to any `ConfigPlane` — the caller decides when the
/// first `apply` happens (spec §6's exit-code contract: code `1` if this
/// or the subsequent validation fails).
pub fn load_from_file(path: impl AsRef<Path>) -> Result<ConfigSnapshot, LoadError> {
    let path = path.as_ref();
    let path_str = path.display().to_string();
    let contents = std::fs::read_to_string(path).map_err(|source| LoadError::Io { path: path_str.clone(), source })?;

    let snapshot = match path.extension().and_then(|e| e.to_str()) {
        Some("toml") => toml::from_str(&contents)
            .map_err(|e| LoadError::Parse { path: path_str.clone(), source: anyhow::anyhow!(e) })?,
        Some("json") => serde_json::from_str(&contents)
            .map_err(|e| LoadError::Parse { path: path_str.clone(), source: anyhow::anyhow!(e) })?,
        _ => return Err(LoadError::UnknownFormat { path: path_str }),
    };

    let report = check(&snapshot);
    if !report.valid() {
        return Err(LoadError::Invalid(report.errors));
    }
    Ok(snapshot)
}

fn check(snapshot: &ConfigSnapshot) -> ValidationReport {
    validate(snapshot)
}
