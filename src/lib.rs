//! llmd dataset - Conversation Transcript Conversion
//!
//! A Rust library for turning folders of chat transcripts into rows of an
//! llmd SQLite dataset.
//!
//! # Features
//!
//! - Read JSON and YAML transcripts in several layouts
//! - Build a role-tagged prompt from every turn but the last
//! - Fingerprint prompts with SHA-256
//! - Store the final assistant reply as whitespace tokens
//! - Count and skip bad files, conversations and rows without stopping the run

/// Configuration management
pub mod config;
/// Batch conversion of a folder
pub mod converter;
/// SQLite store
pub mod db;
/// Error types
pub mod error;
/// Prompt hashing
pub mod hashing;
/// File loading and parsing
pub mod loader;
/// Logging setup and utilities
pub mod logging;
/// Metrics collection
pub mod metrics;
/// Data models and structures
pub mod models;
/// Document shape dispatch
pub mod normalizer;
/// Per-conversation processing
pub mod processor;
/// Store abstraction
pub mod repository;
/// Database schema definitions
pub mod schema;
/// Input validation
pub mod validation;

// Re-export key components for easier access
pub use converter::Converter;
pub use db::Database;
pub use error::{ConverterError, Result};
pub use models::{Conversation, Message, ProcessedRow, Role, Summary};
pub use repository::Store;
