//! Test helpers for wkmp-te integration tests
//!
//! - MemoryTagStore: in-memory [`TagStore`] with per-path failure injection
//! - fixtures: minimal real audio files for tag I/O against lofty

#![allow(dead_code)]

pub mod fixtures;
pub mod memory_store;

pub use memory_store::MemoryTagStore;

use wkmp_te::{FieldMapping, FieldSelection};

pub fn tags(pairs: &[(&str, &str)]) -> FieldMapping {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

pub fn selection(fields: &[&str]) -> FieldSelection {
    fields.iter().map(|f| f.to_string()).collect()
}
