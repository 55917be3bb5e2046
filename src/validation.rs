use std::path::Path;

use crate::error::{ConverterError, Result};

/// Validation utilities for run arguments
#[derive(Debug, Copy, Clone)]
pub struct InputValidator;

impl InputValidator {
    /// The source folder must exist and be a directory
    pub fn validate_source_dir(path: &Path) -> Result<()> {
        if !path.is_dir() {
            return Err(ConverterError::DirectoryNotFound(path.to_path_buf()));
        }
        Ok(())
    }

    /// Validate database file path
    pub fn validate_database_path(path: &Path) -> Result<()> {
        if path.as_os_str().is_empty() {
            return Err(ConverterError::InvalidConfig(
                "Database path cannot be empty".to_string(),
            ));
        }

        if path.is_dir() {
            return Err(ConverterError::InvalidConfig(format!(
                "Database path is a directory: {}",
                path.display()
            )));
        }

        Ok(())
    }
}
