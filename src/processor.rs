//! Derives the stored fields of a single conversation.

use serde_json::Value;
use tracing::debug;

use crate::error::{ConverterError, Result};
use crate::hashing::{hash_prompt, to_hex};
use crate::models::{Conversation, Message, ProcessedRow, Role};

/// Build the prompt from every message except the last.
///
/// User-like and assistant turns are rendered as `### <role>:\n<content>\n`;
/// other roles contribute nothing.
#[must_use]
pub fn build_prompt(history: &[Message]) -> String {
    history
        .iter()
        .filter_map(|message| {
            message
                .role
                .prompt_label()
                .map(|label| format!("### {label}:\n{}\n", message.content))
        })
        .collect()
}

/// Split a response into whitespace-separated tokens, dropping empty fragments
#[must_use]
pub fn tokenize(response: &str) -> Vec<String> {
    response.split_whitespace().map(ToString::to_string).collect()
}

/// Text of the final message if the assistant sent it, otherwise empty
#[must_use]
pub fn response_text(conversation: &Conversation) -> &str {
    let last = conversation.last();
    if last.role == Role::Assistant {
        &last.content
    } else {
        ""
    }
}

/// Derive prompt hash and generated tokens for one conversation.
///
/// Fails with `EmptyPrompt` when a multi-message conversation produces a blank
/// prompt. A single-message conversation always has an empty prompt and is
/// still processed.
pub fn process(conversation: &Conversation) -> Result<ProcessedRow> {
    let prompt = build_prompt(conversation.history());
    if prompt.trim().is_empty() && conversation.len() > 1 {
        return Err(ConverterError::EmptyPrompt);
    }

    let prompt_hash = hash_prompt(&prompt);
    let gen_tokens = tokenize(response_text(conversation));
    let n_gen_tokens = gen_tokens.len();

    debug!(
        prompt_hash = %to_hex(&prompt_hash),
        n_gen_tokens,
        "Processed conversation"
    );

    Ok(ProcessedRow {
        prompt,
        prompt_hash,
        gen_tokens,
        n_gen_tokens,
    })
}

/// Validate a conversation candidate from the normalizer and process it
pub fn process_value(candidate: &Value) -> Result<ProcessedRow> {
    let conversation = Conversation::from_value(candidate)?;
    process(&conversation)
}
