//! Custom field discovery
//!
//! Samples the first files of a batch and counts how often each
//! non-standard field appears, so users can add them to the selection.

use crate::tags::TagStore;
use std::collections::BTreeMap;
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};
use wkmp_common::fields::is_standard_field;

/// Files inspected per scan
pub const DEFAULT_SAMPLE_SIZE: usize = 50;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldScanReport {
    /// Custom field name → number of files containing it
    pub field_counts: BTreeMap<String, usize>,
    pub files_scanned: usize,
    pub files_failed: usize,
}

impl FieldScanReport {
    /// Field names, most frequent first (ties by name)
    pub fn fields_by_frequency(&self) -> Vec<(&str, usize)> {
        let mut fields: Vec<(&str, usize)> = self
            .field_counts
            .iter()
            .map(|(name, count)| (name.as_str(), *count))
            .collect();
        fields.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        fields
    }
}

pub struct FieldScanner {
    sample_size: usize,
}

impl FieldScanner {
    pub fn new() -> Self {
        Self {
            sample_size: DEFAULT_SAMPLE_SIZE,
        }
    }

    pub fn with_sample_size(sample_size: usize) -> Self {
        Self { sample_size }
    }

    /// Count custom fields over the first `sample_size` files
    ///
    /// Unreadable files are logged and skipped.
    pub fn scan(
        &self,
        files: &[PathBuf],
        store: &dyn TagStore,
        cancel: &CancellationToken,
    ) -> FieldScanReport {
        let mut report = FieldScanReport::default();

        for path in files.iter().take(self.sample_size) {
            if cancel.is_cancelled() {
                debug!("Field scan cancelled after {} files", report.files_scanned);
                break;
            }

            match store.read_tags(path) {
                Ok(tags) => {
                    for field in tags.keys().filter(|f| !is_standard_field(f)) {
                        *report.field_counts.entry(field.to_uppercase()).or_insert(0) += 1;
                    }
                    report.files_scanned += 1;
                }
                Err(e) => {
                    warn!("Field scan skipped {}: {}", path.display(), e);
                    report.files_failed += 1;
                }
            }
        }

        report
    }
}

impl Default for FieldScanner {
    fn default() -> Self {
        Self::new()
    }
}
