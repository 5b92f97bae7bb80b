//! Audio file scanner
//!
//! Recursive discovery of taggable audio files: sequential directory walk
//! following symlinks (loops are skipped), then extension + magic byte
//! verification.
//! Results are sorted so batch runs process files in a stable order.

use std::collections::HashSet;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};
use walkdir::{DirEntry, WalkDir};

/// Extensions the tag editor handles (lower-case, without dot)
pub const SUPPORTED_EXTENSIONS: [&str; 7] = ["flac", "mp3", "wav", "m4a", "aac", "ogg", "dsf"];

/// Audio file scanner errors
#[derive(Debug, Error)]
pub enum ScanError {
    /// Specified path does not exist
    #[error("Path not found: {0}")]
    PathNotFound(PathBuf),

    /// Path exists but is not a directory
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),

    /// Cannot access file
    #[error("File access error {0}: {1}")]
    FileAccessError(PathBuf, String),
}

/// Audio file scanner
pub struct FileScanner {
    ignore_patterns: Vec<String>,
    max_depth: Option<usize>,
}

impl FileScanner {
    /// Create new file scanner with default ignore patterns
    ///
    /// Ignores system files like .DS_Store, Thumbs.db, .git, etc.
    pub fn new() -> Self {
        Self {
            ignore_patterns: vec![
                ".DS_Store".to_string(),
                "Thumbs.db".to_string(),
                ".git".to_string(),
                ".svn".to_string(),
            ],
            max_depth: None,
        }
    }

    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    /// Scan directory for audio files
    pub fn scan(&self, root_path: &Path) -> Result<Vec<PathBuf>, ScanError> {
        if !root_path.exists() {
            return Err(ScanError::PathNotFound(root_path.to_path_buf()));
        }

        if !root_path.is_dir() {
            return Err(ScanError::NotADirectory(root_path.to_path_buf()));
        }

        let mut candidate_files = Vec::new();
        let mut seen = HashSet::new();

        // walkdir reports symlink loops as errors instead of descending
        let walker = WalkDir::new(root_path)
            .follow_links(true)
            .sort_by_file_name()
            .max_depth(self.max_depth.unwrap_or(usize::MAX))
            .into_iter()
            .filter_entry(|e| self.should_process_entry(e));

        for entry in walker {
            match entry {
                Ok(entry) if entry.file_type().is_file() => {
                    let path = entry.path();
                    // A file reachable through several links is scanned once
                    let canonical = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
                    if seen.insert(canonical) {
                        candidate_files.push(path.to_path_buf());
                    }
                }
                Ok(_) => {}
                Err(e) => {
                    // Continue scanning, don't abort
                    warn!("Error accessing entry: {}", e);
                }
            }
        }

        let mut audio_files: Vec<PathBuf> = candidate_files
            .iter()
            .filter_map(|path| match self.is_audio_file(path) {
                Ok(true) => Some(path.clone()),
                Ok(false) => None,
                Err(e) => {
                    warn!("Error verifying {}: {}", path.display(), e);
                    None
                }
            })
            .collect();
        audio_files.sort();

        debug!(
            "Scan complete: {} audio files from {} candidates",
            audio_files.len(),
            candidate_files.len()
        );

        Ok(audio_files)
    }

    /// Expand a mix of files and directories into audio files
    ///
    /// Directories are scanned; files are kept when their extension is
    /// supported. Duplicates are dropped, first occurrence wins.
    pub fn collect(&self, paths: &[PathBuf]) -> Result<Vec<PathBuf>, ScanError> {
        let mut seen = HashSet::new();
        let mut files = Vec::new();

        for path in paths {
            let found = if path.is_dir() {
                self.scan(path)?
            } else if path.exists() {
                if has_supported_extension(path) {
                    vec![path.clone()]
                } else {
                    warn!("Skipping unsupported file: {}", path.display());
                    Vec::new()
                }
            } else {
                return Err(ScanError::PathNotFound(path.clone()));
            };

            for file in found {
                if seen.insert(file.clone()) {
                    files.push(file);
                }
            }
        }

        Ok(files)
    }

    /// Check if entry should be processed
    fn should_process_entry(&self, entry: &DirEntry) -> bool {
        let file_name = entry.file_name().to_string_lossy();
        !self
            .ignore_patterns
            .iter()
            .any(|pattern| file_name.contains(pattern.as_str()))
    }

    fn is_audio_file(&self, path: &Path) -> Result<bool, ScanError> {
        if has_supported_extension(path) {
            return self.verify_magic_bytes(path);
        }
        Ok(false)
    }

    /// Verify file type using magic bytes
    fn verify_magic_bytes(&self, path: &Path) -> Result<bool, ScanError> {
        let mut file = File::open(path)
            .map_err(|e| ScanError::FileAccessError(path.to_path_buf(), e.to_string()))?;

        let mut buffer = [0u8; 12];
        let bytes_read = file
            .read(&mut buffer)
            .map_err(|e| ScanError::FileAccessError(path.to_path_buf(), e.to_string()))?;

        if bytes_read < 4 {
            return Ok(false);
        }

        Ok(is_audio_signature(&buffer[..bytes_read]))
    }
}

impl Default for FileScanner {
    fn default() -> Self {
        Self::new()
    }
}

/// Whether the path's extension is one of [`SUPPORTED_EXTENSIONS`]
pub fn has_supported_extension(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .is_some_and(|ext| SUPPORTED_EXTENSIONS.contains(&ext.as_str()))
}

fn is_audio_signature(header: &[u8]) -> bool {
    match header {
        // MP3 frame sync / AAC ADTS
        [0xFF, 0xFB, ..] | [0xFF, 0xF3, ..] | [0xFF, 0xF2, ..] => true,
        [0xFF, 0xF1, ..] | [0xFF, 0xF9, ..] => true,
        [b'I', b'D', b'3', ..] => true,

        [b'f', b'L', b'a', b'C', ..] => true,

        [b'O', b'g', b'g', b'S', ..] => true,

        // M4A/AAC (MP4 container)
        [_, _, _, _, b'f', b't', b'y', b'p', ..] => true,

        [b'R', b'I', b'F', b'F', _, _, _, _, b'W', b'A', b'V', b'E'] => true,

        // DSF (DSD stream file)
        [b'D', b'S', b'D', b' ', ..] => true,

        _ => false,
    }
}
