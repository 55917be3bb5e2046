//! Structural dispatch from a parsed document to candidate conversations.
//!
//! Transcript files come in four shapes: a list of conversations, a flat list
//! of message mappings forming one conversation, a single message mapping, or
//! a mapping whose values are conversations. The shape is
//! decided once here; each candidate is validated later by the processor so
//! that a malformed entry only fails itself.

use serde_json::Value;

/// Shape of a parsed transcript document
#[derive(Debug, Clone, PartialEq)]
pub enum Document {
    /// Top-level list; every element is one conversation
    Conversations(Vec<Value>),
    /// Top-level list whose elements are all mappings; the whole list is one
    /// conversation
    MessageList(Vec<Value>),
    /// A lone message mapping (has both `role` and `content`)
    SingleMessage(Value),
    /// Any other mapping; its values, in document order, are conversations
    Keyed(Vec<(String, Value)>),
    /// Scalars and null
    Empty,
}

impl Document {
    /// Classify a parsed document
    #[must_use]
    pub fn classify(parsed: Value) -> Self {
        match parsed {
            Value::Array(items) if !items.is_empty() && items.iter().all(Value::is_object) => {
                Self::MessageList(items)
            }
            Value::Array(items) => Self::Conversations(items),
            Value::Object(fields) if fields.contains_key("content") && fields.contains_key("role") => {
                Self::SingleMessage(Value::Object(fields))
            }
            Value::Object(fields) => Self::Keyed(fields.into_iter().collect()),
            Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_) => Self::Empty,
        }
    }

    /// Flatten into conversation candidates, each of which should be a list of
    /// message mappings
    #[must_use]
    pub fn into_conversations(self) -> Vec<Value> {
        match self {
            Self::Conversations(items) => items,
            Self::MessageList(messages) => vec![Value::Array(messages)],
            Self::SingleMessage(message) => vec![Value::Array(vec![message])],
            Self::Keyed(entries) => entries.into_iter().map(|(_, value)| value).collect(),
            Self::Empty => Vec::new(),
        }
    }
}

/// Map a parsed document to its conversation candidates. An empty result means
/// no messages were found.
#[must_use]
pub fn normalize(parsed: Value) -> Vec<Value> {
    Document::classify(parsed).into_conversations()
}
