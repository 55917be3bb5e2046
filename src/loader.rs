//! Reads transcript files and parses them by suffix.

use std::fs;
use std::path::Path;

use serde_json::Value;

use crate::error::{ConverterError, Result};

/// Supported transcript encodings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    /// `.json`
    Json,
    /// `.yaml`
    Yaml,
}

impl InputFormat {
    /// Pick the format from a file's suffix, ignoring case
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .map(|ext| ext.to_string_lossy().to_lowercase())
            .unwrap_or_default();

        match extension.as_str() {
            "json" => Ok(Self::Json),
            "yaml" => Ok(Self::Yaml),
            "" => Err(ConverterError::UnsupportedFormat(format!(
                "{} has no suffix",
                path.display()
            ))),
            other => Err(ConverterError::UnsupportedFormat(format!(".{other}"))),
        }
    }

    /// Parse document text into the value tree the normalizer consumes
    pub fn parse(self, text: &str) -> Result<Value> {
        match self {
            Self::Json => Ok(serde_json::from_str(text)?),
            Self::Yaml => {
                // serde_yaml never constructs application types from tags, so
                // this is a plain data parse
                let document: serde_yaml::Value = serde_yaml::from_str(text)?;
                Ok(serde_json::to_value(document)?)
            }
        }
    }
}

/// Load one file and parse it according to its suffix
pub fn load(path: &Path) -> Result<Value> {
    let format = InputFormat::from_path(path)?;
    let text = fs::read_to_string(path)?;
    format.parse(&text)
}
