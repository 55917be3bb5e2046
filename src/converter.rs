//! Batch conversion of a folder of transcript files into the dataset store.
//!
//! Every directory entry is loaded, normalized and processed in turn. Failures
//! below the directory level are logged, counted and skipped; all stored rows
//! are committed together at the end of the run.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use serde_json::Value;
use tracing::{debug, error, info, warn};

use crate::config::DatabaseConfig;
use crate::db::Database;
use crate::error::{ConverterError, Result};
use crate::loader::load;
use crate::logging::RunTimer;
use crate::metrics::{ErrorKind, MetricsCollector};
use crate::models::Summary;
use crate::normalizer::normalize;
use crate::processor::process_value;
use crate::repository::Store;
use crate::validation::InputValidator;

/// Drives a conversion run
#[derive(Default)]
pub struct Converter {
    metrics: MetricsCollector,
}

impl Converter {
    /// Create a converter reporting to the default metric names
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Convert every file in `source_dir` into rows of the SQLite database at
    /// `db_path`.
    ///
    /// The folder is checked before the database is opened, so a missing
    /// folder leaves the database untouched.
    pub fn convert(&self, source_dir: &Path, db_path: &Path, config: &DatabaseConfig) -> Result<Summary> {
        InputValidator::validate_source_dir(source_dir)?;
        InputValidator::validate_database_path(db_path)?;

        let timer = RunTimer::start();
        let mut store = Database::open(db_path, config)?;

        // On error the store is dropped, which rolls back the open transaction
        let summary = self.convert_entries(source_dir, &mut store)?;
        store.close()?;
        timer.finish(&summary);

        info!("Conversion completed:");
        info!("Successfully processed: {} conversations", summary.processed_count);
        info!("Errors encountered: {} conversations", summary.error_count);
        info!("Database saved to: {}", db_path.display());

        Ok(summary)
    }

    /// Convert every file in `source_dir` into `store`, then commit once.
    ///
    /// The store is neither opened nor closed here.
    pub fn convert_into<S: Store>(&self, source_dir: &Path, store: &mut S) -> Result<Summary> {
        InputValidator::validate_source_dir(source_dir)?;
        self.convert_entries(source_dir, store)
    }

    /// Body of a run over an already validated folder
    fn convert_entries<S: Store>(&self, source_dir: &Path, store: &mut S) -> Result<Summary> {
        let mut summary = Summary::default();
        for path in sorted_entries(source_dir)? {
            self.convert_file(&path, store, &mut summary);
        }

        let start = Instant::now();
        store.commit()?;
        self.metrics.record_commit(start.elapsed());

        debug!(?summary, "Committed conversion run");
        Ok(summary)
    }

    fn convert_file<S: Store>(&self, path: &Path, store: &mut S, summary: &mut Summary) {
        let name = path
            .file_name()
            .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());

        info!("Processing: {}", name);
        summary.files_visited += 1;
        self.metrics.record_file_visited();

        let candidates = match load_conversations(path) {
            Ok(candidates) => candidates,
            Err(ConverterError::NoMessages(_)) => {
                warn!("No messages found in {}", path.display());
                summary.record_file_error();
                self.metrics.record_error(ErrorKind::File);
                return;
            }
            Err(e) => {
                warn!(file = %name, error = %e, "Skipping file");
                summary.record_file_error();
                self.metrics.record_error(ErrorKind::File);
                return;
            }
        };

        for (index, candidate) in candidates.iter().enumerate() {
            let row = match process_value(candidate) {
                Ok(row) => row,
                Err(ConverterError::EmptyPrompt) => {
                    warn!(file = %name, conversation = index, "Empty prompt generated");
                    summary.record_conversation_error();
                    self.metrics.record_error(ErrorKind::Conversation);
                    continue;
                }
                Err(e) => {
                    warn!(file = %name, conversation = index, error = %e, "Skipping conversation");
                    summary.record_conversation_error();
                    self.metrics.record_error(ErrorKind::Conversation);
                    continue;
                }
            };

            match store.insert(&row) {
                Ok(id) => {
                    debug!(file = %name, conversation = index, id, "Staged row");
                    summary.processed_count += 1;
                    self.metrics.record_row_stored(row.n_gen_tokens);
                }
                Err(e) => {
                    error!("Database error for {}: {}", name, e);
                    summary.record_store_error();
                    self.metrics.record_error(ErrorKind::Store);
                }
            }
        }
    }
}

/// Load one file and normalize it into conversation candidates. Finding none
/// is an error for the file.
pub fn load_conversations(path: &Path) -> Result<Vec<Value>> {
    let conversations = normalize(load(path)?);
    if conversations.is_empty() {
        return Err(ConverterError::NoMessages(path.to_path_buf()));
    }
    Ok(conversations)
}

/// Directory entries sorted by path, for a stable visiting order
fn sorted_entries(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for entry in fs::read_dir(dir)? {
        paths.push(entry?.path());
    }
    paths.sort();
    Ok(paths)
}
