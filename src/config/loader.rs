//! Configuration file loading

use crate::error::ParseError;
use crate::{Error, Result};
use serde::de::DeserializeOwned;
use std::path::Path;

/// Structured-text formats a configuration file may be written in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// JSON document (the default)
    Json,
    /// TOML document, selected by a `.toml` extension
    Toml,
}

impl ConfigFormat {
    /// Pick the format from the file extension
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("toml") => ConfigFormat::Toml,
            _ => ConfigFormat::Json,
        }
    }

    /// Parse raw file contents
    pub fn parse<C: DeserializeOwned>(self, bytes: &[u8]) -> std::result::Result<C, ParseError> {
        match self {
            ConfigFormat::Json => Ok(serde_json::from_slice(bytes)?),
            ConfigFormat::Toml => Ok(toml::from_str(std::str::from_utf8(bytes)?)?),
        }
    }
}

/// Read the file at `path` and parse it into the configuration type `C`.
///
/// The bytes are handed to the parser unmodified; nothing else is touched.
pub fn load_config<C: DeserializeOwned>(path: impl AsRef<Path>) -> Result<C> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|source| Error::ConfigRead {
        path: path.to_path_buf(),
        source,
    })?;

    ConfigFormat::from_path(path)
        .parse(&bytes)
        .map_err(|source| Error::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
}
