//! Error types for wkmp-te
//!
//! The transformation engine itself never fails; these cover the
//! collaborators around it (tag I/O and profiles). File discovery has its
//! own [`ScanError`](crate::scanner::ScanError).

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Tag read/write failure for a single file
    #[error("Tag error in {path}: {message}")]
    Tag { path: PathBuf, message: String },

    /// Invalid or unreadable operation profile
    #[error("Profile error: {0}")]
    Profile(String),

    /// Profile JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub fn tag(path: impl Into<PathBuf>, message: impl ToString) -> Self {
        Error::Tag {
            path: path.into(),
            message: message.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
