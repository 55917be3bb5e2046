use metrics::{counter, histogram};
use std::time::Duration;

/// Outcome labels used on the error counter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// File could not be loaded or held no conversations
    File,
    /// Conversation rejected by the processor
    Conversation,
    /// Row refused by the store
    Store,
}

impl ErrorKind {
    const fn label(self) -> &'static str {
        match self {
            Self::File => "file",
            Self::Conversation => "conversation",
            Self::Store => "store",
        }
    }
}

/// Metric names for a conversion run.
///
/// Values go to whatever `metrics` recorder the embedding program installs;
/// with none installed every call is a no-op.
pub struct MetricsCollector {
    pub files_visited_total: &'static str,
    pub rows_stored_total: &'static str,
    pub gen_tokens_total: &'static str,
    pub errors_total: &'static str,
    pub commit_duration: &'static str,
}

impl Default for MetricsCollector {
    fn default() -> Self {
        Self {
            files_visited_total: "llmd_dataset_files_visited_total",
            rows_stored_total: "llmd_dataset_rows_stored_total",
            gen_tokens_total: "llmd_dataset_gen_tokens_total",
            errors_total: "llmd_dataset_errors_total",
            commit_duration: "llmd_dataset_commit_duration_seconds",
        }
    }
}

impl MetricsCollector {
    /// Record a visited directory entry
    pub fn record_file_visited(&self) {
        counter!(self.files_visited_total).increment(1);
    }

    /// Record a stored row and its token count
    pub fn record_row_stored(&self, n_gen_tokens: usize) {
        counter!(self.rows_stored_total).increment(1);
        counter!(self.gen_tokens_total).increment(n_gen_tokens as u64);
    }

    /// Record error metrics
    pub fn record_error(&self, kind: ErrorKind) {
        counter!(self.errors_total, "kind" => kind.label()).increment(1);
    }

    /// Record how long the final commit took
    pub fn record_commit(&self, duration: Duration) {
        histogram!(self.commit_duration).record(duration.as_secs_f64());
    }
}
