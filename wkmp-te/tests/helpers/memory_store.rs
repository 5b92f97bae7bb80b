//! In-memory tag store
//!
//! Files are keyed by path; reads of unknown paths fail like a missing file.
//! Individual paths can be set to fail on read or on write.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use wkmp_te::error::{Error, Result};
use wkmp_te::tags::{diff, FieldAction, TagStore};
use wkmp_te::FieldMapping;

#[derive(Default)]
pub struct MemoryTagStore {
    files: Mutex<HashMap<PathBuf, FieldMapping>>,
    fail_reads: Mutex<HashSet<PathBuf>>,
    fail_writes: Mutex<HashSet<PathBuf>>,
    writes: Mutex<Vec<PathBuf>>,
}

impl MemoryTagStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, path: impl Into<PathBuf>, tags: FieldMapping) {
        self.files.lock().unwrap().insert(path.into(), tags);
    }

    pub fn fail_read(&self, path: impl Into<PathBuf>) {
        self.fail_reads.lock().unwrap().insert(path.into());
    }

    pub fn fail_write(&self, path: impl Into<PathBuf>) {
        self.fail_writes.lock().unwrap().insert(path.into());
    }

    pub fn tags(&self, path: impl AsRef<Path>) -> Option<FieldMapping> {
        self.files.lock().unwrap().get(path.as_ref()).cloned()
    }

    /// Paths written so far, in write order
    pub fn writes(&self) -> Vec<PathBuf> {
        self.writes.lock().unwrap().clone()
    }
}

impl TagStore for MemoryTagStore {
    fn read_tags(&self, path: &Path) -> Result<FieldMapping> {
        if self.fail_reads.lock().unwrap().contains(path) {
            return Err(Error::tag(path, "injected read failure"));
        }
        self.files
            .lock()
            .unwrap()
            .get(path)
            .cloned()
            .ok_or_else(|| Error::tag(path, "no such file"))
    }

    fn write_tags(&self, path: &Path, original: &FieldMapping, new: &FieldMapping) -> Result<()> {
        if self.fail_writes.lock().unwrap().contains(path) {
            return Err(Error::tag(path, "injected write failure"));
        }

        let mut files = self.files.lock().unwrap();
        let stored = files
            .get_mut(path)
            .ok_or_else(|| Error::tag(path, "no such file"))?;
        for change in diff(original, new) {
            match change.action() {
                FieldAction::Write(value) => {
                    stored.insert(change.field.clone(), value.to_string());
                }
                FieldAction::Delete => {
                    stored.remove(&change.field);
                }
            }
        }
        self.writes.lock().unwrap().push(path.to_path_buf());
        Ok(())
    }
}
