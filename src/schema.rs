//! Database schema definitions
//!
//! This module provides constants for table, column and index names used with
//! rusqlite. The DDL itself lives in `migrations/`.

/// Dataset table schema
pub mod llmd {
    /// Table name
    pub const TABLE: &str = "llmd";
    /// Primary key column
    pub const ID: &str = "id";
    /// SHA-256 prompt digest column
    pub const PROMPT_HASH: &str = "prompt_hash";
    /// JSON array of generated tokens
    pub const GEN_TOKENS: &str = "gen_tokens";
    /// Generated token count column
    pub const N_GEN_TOKENS: &str = "n_gen_tokens";
    /// Index on the prompt digest
    pub const IDX_PROMPT_HASH: &str = "idx_llmd_prompt_hash";
    /// Index on the token count
    pub const IDX_N_GEN_TOKENS: &str = "idx_llmd_n_gen_tokens";
}
