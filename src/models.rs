//! Data models for conversation handling and storage
//!
//! This module contains the data structures used throughout the conversion
//! pipeline: messages and conversations parsed from transcript files, the
//! rows derived from them, and the run summary.

use serde_json::Value;

use crate::error::{ConverterError, Result};

/// Speaker of a message, as far as prompt building is concerned
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// "human" or "user"
    User,
    /// "assistant"
    Assistant,
    /// Any other role, including a missing one
    Unrecognized,
}

impl Role {
    /// Map a raw role string to a `Role`
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        match raw {
            "human" | "user" => Self::User,
            "assistant" => Self::Assistant,
            _ => Self::Unrecognized,
        }
    }

    /// Header line used for this role in the prompt, if it contributes at all
    #[must_use]
    pub const fn prompt_label(self) -> Option<&'static str> {
        match self {
            Self::User => Some("user"),
            Self::Assistant => Some("assistant"),
            Self::Unrecognized => None,
        }
    }
}

/// A single chat turn
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    /// Who sent the message
    pub role: Role,
    /// Message text; left empty when an unrecognized role is read from a document
    pub content: String,
}

impl Message {
    /// Create a message from a role string and content
    #[must_use]
    pub fn new(role: &str, content: &str) -> Self {
        Self {
            role: Role::parse(role),
            content: content.to_string(),
        }
    }

    /// Read a message out of a parsed document entry.
    ///
    /// Only the fields that are actually used are checked: the entry must be a
    /// mapping, and `content` must be a string, number or boolean when the role
    /// is user-like or assistant. Numbers and booleans are rendered as text.
    pub fn from_value(value: &Value) -> Result<Self> {
        let fields = value.as_object().ok_or_else(|| {
            ConverterError::MalformedConversation(format!("message is not a mapping: {value}"))
        })?;

        let role = fields
            .get("role")
            .and_then(Value::as_str)
            .map_or(Role::Unrecognized, Role::parse);

        let content = match role {
            Role::Unrecognized => String::new(),
            Role::User | Role::Assistant => fields
                .get("content")
                .and_then(content_text)
                .ok_or_else(|| {
                    ConverterError::MalformedConversation(format!(
                        "{role:?} message has no text content"
                    ))
                })?,
        };

        Ok(Self { role, content })
    }
}

fn content_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(_) | Value::Bool(_) => Some(value.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// An ordered, non-empty sequence of messages making up one dialogue
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversation {
    messages: Vec<Message>,
}

impl Conversation {
    /// Build a conversation, rejecting an empty message list
    pub fn new(messages: Vec<Message>) -> Result<Self> {
        if messages.is_empty() {
            return Err(ConverterError::MalformedConversation(
                "conversation has no messages".to_string(),
            ));
        }
        Ok(Self { messages })
    }

    /// Read a conversation out of a parsed document entry, which must be a
    /// sequence of message mappings
    pub fn from_value(value: &Value) -> Result<Self> {
        let entries = value.as_array().ok_or_else(|| {
            ConverterError::MalformedConversation(format!(
                "expected a list of messages, found {}",
                value_kind(value)
            ))
        })?;

        let messages = entries
            .iter()
            .map(Message::from_value)
            .collect::<Result<Vec<_>>>()?;

        Self::new(messages)
    }

    /// All messages in order
    #[must_use]
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Number of messages
    #[must_use]
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Always false; kept alongside `len` for API symmetry
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Every message except the last one
    #[must_use]
    pub fn history(&self) -> &[Message] {
        &self.messages[..self.messages.len() - 1]
    }

    /// The final message
    #[must_use]
    pub fn last(&self) -> &Message {
        &self.messages[self.messages.len() - 1]
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "a mapping",
    }
}

/// The derived fields of one conversation, ready to be stored
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessedRow {
    /// Prompt text the hash was computed from (not persisted)
    pub prompt: String,
    /// SHA-256 digest of the prompt
    pub prompt_hash: [u8; 32],
    /// Whitespace-separated fragments of the final assistant message
    pub gen_tokens: Vec<String>,
    /// Always equal to `gen_tokens.len()`
    pub n_gen_tokens: usize,
}

/// Database representation of a stored row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbLlmdRow {
    /// Database primary key
    pub id: i64,
    /// SHA-256 digest of the prompt
    pub prompt_hash: Vec<u8>,
    /// Generated tokens, decoded from the JSON column
    pub gen_tokens: Vec<String>,
    /// Number of generated tokens
    pub n_gen_tokens: i64,
}

/// Counts reported at the end of a conversion run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    /// Directory entries visited
    pub files_visited: usize,
    /// Conversations stored
    pub processed_count: usize,
    /// All failures: `file_errors + conversation_errors + store_errors`
    pub error_count: usize,
    /// Files that could not be loaded or held no conversations
    pub file_errors: usize,
    /// Conversations rejected by the processor
    pub conversation_errors: usize,
    /// Rows the store refused
    pub store_errors: usize,
}

impl Summary {
    pub(crate) fn record_file_error(&mut self) {
        self.file_errors += 1;
        self.error_count += 1;
    }

    pub(crate) fn record_conversation_error(&mut self) {
        self.conversation_errors += 1;
        self.error_count += 1;
    }

    pub(crate) fn record_store_error(&mut self) {
        self.store_errors += 1;
        self.error_count += 1;
    }
}
