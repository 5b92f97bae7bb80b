//! Batch processing
//!
//! Runs one operation sequence over many files: read tags → apply → write
//! changed fields. A file that fails to read or write is recorded and the
//! batch moves on; only cancellation stops it early.

use crate::engine::{FieldSelection, TagProcessor};
use crate::error::Result;
use crate::operation::Operation;
use crate::tags::{diff, FieldChange, TagStore};
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Progress notification, sent before each file is processed
#[derive(Debug, Clone, Copy)]
pub struct BatchProgress<'a> {
    /// 1-based index of the current file
    pub current: usize,
    pub total: usize,
    pub path: &'a Path,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileFailure {
    pub path: PathBuf,
    pub error: String,
}

/// Outcome of a batch run
#[derive(Debug, Clone)]
pub struct BatchReport {
    pub total: usize,
    /// Files whose tags were rewritten
    pub succeeded: usize,
    /// Files processed without any field change
    pub unchanged: usize,
    pub failed: Vec<FileFailure>,
    pub cancelled: bool,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl BatchReport {
    pub fn processed(&self) -> usize {
        self.succeeded + self.unchanged + self.failed.len()
    }

    pub fn is_success(&self) -> bool {
        self.failed.is_empty() && !self.cancelled
    }
}

/// Changes one file would receive
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePreview {
    pub path: PathBuf,
    pub changes: Vec<FieldChange>,
}

#[derive(Debug, Clone, Default)]
pub struct PreviewReport {
    pub previews: Vec<FilePreview>,
    pub failed: Vec<FileFailure>,
}

/// Applies an operation sequence to audio files through a [`TagStore`]
pub struct BatchProcessor {
    store: Arc<dyn TagStore>,
    processor: TagProcessor,
    selected_fields: FieldSelection,
}

impl BatchProcessor {
    pub fn new(
        store: Arc<dyn TagStore>,
        operations: Vec<Operation>,
        selected_fields: FieldSelection,
    ) -> Self {
        Self {
            store,
            processor: TagProcessor::with_operations(operations),
            selected_fields,
        }
    }

    pub fn selected_fields(&self) -> &FieldSelection {
        &self.selected_fields
    }

    /// Changes the operation sequence would make to one file
    pub fn preview_file(&self, path: &Path) -> Result<FilePreview> {
        let original = self.store.read_tags(path)?;
        let updated = self.processor.preview(&original, &self.selected_fields);
        Ok(FilePreview {
            path: path.to_path_buf(),
            changes: diff(&original, &updated),
        })
    }

    /// Apply the sequence to one file, writing only when something changed
    pub fn process_file(&self, path: &Path) -> Result<Vec<FieldChange>> {
        let original = self.store.read_tags(path)?;
        let updated = self.processor.preview(&original, &self.selected_fields);
        let changes = diff(&original, &updated);

        if !changes.is_empty() {
            self.store.write_tags(path, &original, &updated)?;
        }

        Ok(changes)
    }

    pub fn preview(&self, files: &[PathBuf], cancel: &CancellationToken) -> PreviewReport {
        let mut report = PreviewReport::default();

        for path in files {
            if cancel.is_cancelled() {
                break;
            }
            match self.preview_file(path) {
                Ok(preview) => report.previews.push(preview),
                Err(e) => {
                    warn!("Preview failed for {}: {}", path.display(), e);
                    report.failed.push(FileFailure {
                        path: path.clone(),
                        error: e.to_string(),
                    });
                }
            }
        }

        report
    }

    /// Process every file, continuing past per-file failures
    pub fn run<F>(&self, files: &[PathBuf], cancel: &CancellationToken, mut progress: F) -> BatchReport
    where
        F: FnMut(BatchProgress<'_>),
    {
        let started_at = Utc::now();
        let total = files.len();
        let mut succeeded = 0;
        let mut unchanged = 0;
        let mut failed = Vec::new();
        let mut cancelled = false;

        info!(
            "Batch started: {} files, {} operations, {} selected fields",
            total,
            self.processor.operations().len(),
            self.selected_fields.len()
        );

        for (index, path) in files.iter().enumerate() {
            if cancel.is_cancelled() {
                cancelled = true;
                info!("Batch cancelled after {} of {} files", index, total);
                break;
            }

            progress(BatchProgress {
                current: index + 1,
                total,
                path: path.as_path(),
            });

            match self.process_file(path) {
                Ok(changes) if changes.is_empty() => {
                    debug!("Unchanged: {}", path.display());
                    unchanged += 1;
                }
                Ok(changes) => {
                    debug!("Updated {} fields: {}", changes.len(), path.display());
                    succeeded += 1;
                }
                Err(e) => {
                    warn!("Failed to process {}: {}", path.display(), e);
                    failed.push(FileFailure {
                        path: path.clone(),
                        error: e.to_string(),
                    });
                }
            }
        }

        let report = BatchReport {
            total,
            succeeded,
            unchanged,
            failed,
            cancelled,
            started_at,
            finished_at: Utc::now(),
        };

        info!(
            "Batch finished: {} updated, {} unchanged, {} failed",
            report.succeeded,
            report.unchanged,
            report.failed.len()
        );

        report
    }
}
