//! Error types for the llmd-dataset-rust library.
//!
//! This module provides custom error types using `thiserror` for the conversion
//! pipeline. Fatal errors abort a run; the rest are counted and skipped by the
//! batch converter.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while converting conversation files.
#[derive(Error, Debug)]
pub enum ConverterError {
    /// The source folder is missing or is not a directory
    #[error("Folder {} does not exist", .0.display())]
    DirectoryNotFound(PathBuf),

    /// File suffix is neither `.json` nor `.yaml`
    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    /// Malformed JSON content
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// Malformed YAML content
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// The parsed document contained no conversations
    #[error("No messages found in {}", .0.display())]
    NoMessages(PathBuf),

    /// A conversation entry did not have the shape of a message list
    #[error("Malformed conversation: {0}")]
    MalformedConversation(String),

    /// Prompt was empty or whitespace-only on a multi-message conversation
    #[error("Empty prompt generated")]
    EmptyPrompt,

    /// Database-related errors
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// The store handle was used after `close`
    #[error("Store is already closed")]
    StoreClosed,

    /// File I/O errors
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid configuration or argument
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Convenience type alias for Result with `ConverterError`
pub type Result<T> = std::result::Result<T, ConverterError>;
