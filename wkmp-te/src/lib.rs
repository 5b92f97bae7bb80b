//! wkmp-te library interface
//!
//! Batch tag editing for music files: an ordered sequence of text
//! operations is applied to selected tag fields of each file.
//!
//! - [`engine`]: pure transformation of one file's tag mapping
//! - [`operation`]: operation model
//! - [`profile`]: saved operation sequences (JSON)
//! - [`tags`]: tag reader/writer collaborators (lofty)
//! - [`batch`]: per-file read → apply → write loop with partial failure
//! - [`scanner`], [`field_scanner`]: file and custom field discovery

pub mod batch;
pub mod engine;
pub mod error;
pub mod field_scanner;
pub mod operation;
pub mod profile;
pub mod scanner;
pub mod tags;
pub mod text;

pub use crate::engine::{apply, FieldMapping, FieldSelection, TagProcessor};
pub use crate::error::{Error, Result};
pub use crate::operation::{BracketPair, Operation, OperationKind, PunctuationDirection, TrimMode};
