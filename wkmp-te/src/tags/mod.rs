//! Tag reader/writer collaborators
//!
//! The engine works on flat [`FieldMapping`]s; a [`TagStore`] turns audio
//! files into mappings and writes edited mappings back. Writers only touch
//! fields whose value changed, and delete fields whose new value is empty.

mod lofty_store;

pub use lofty_store::LoftyTagStore;

use crate::engine::FieldMapping;
use crate::error::Result;
use std::path::Path;
use wkmp_common::STANDARD_FIELDS;

/// Source and sink of per-file tag mappings
pub trait TagStore: Send + Sync {
    /// Read all text tags, keys upper-cased, standard fields always present
    fn read_tags(&self, path: &Path) -> Result<FieldMapping>;

    /// Persist `new`, touching only fields that differ from `original`
    fn write_tags(&self, path: &Path, original: &FieldMapping, new: &FieldMapping) -> Result<()>;
}

/// One field whose value differs between two mappings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldChange {
    pub field: String,
    pub old: String,
    pub new: String,
}

/// What a writer does with a changed field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldAction<'a> {
    Write(&'a str),
    Delete,
}

impl FieldChange {
    pub fn action(&self) -> FieldAction<'_> {
        if self.new.is_empty() {
            FieldAction::Delete
        } else {
            FieldAction::Write(&self.new)
        }
    }
}

/// Fields whose value differs, sorted by field name
///
/// A field missing from `original` compares as empty.
pub fn diff(original: &FieldMapping, new: &FieldMapping) -> Vec<FieldChange> {
    let mut changes: Vec<FieldChange> = new
        .iter()
        .filter_map(|(field, value)| {
            let old = original.get(field).map(String::as_str).unwrap_or("");
            (old != value).then(|| FieldChange {
                field: field.clone(),
                old: old.to_string(),
                new: value.clone(),
            })
        })
        .collect();
    changes.sort_by(|a, b| a.field.cmp(&b.field));
    changes
}

/// Add every missing standard field with an empty value
pub fn ensure_standard_fields(mut tags: FieldMapping) -> FieldMapping {
    for field in STANDARD_FIELDS {
        tags.entry(field.to_string()).or_default();
    }
    tags
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(pairs: &[(&str, &str)]) -> FieldMapping {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_diff_reports_only_changes_sorted() {
        let original = tags(&[("TITLE", "a"), ("ARTIST", "b"), ("ALBUM", "c")]);
        let new = tags(&[("TITLE", "x"), ("ARTIST", "b"), ("ALBUM", "")]);

        let changes = diff(&original, &new);
        assert_eq!(changes.len(), 2);
        assert_eq!(changes[0].field, "ALBUM");
        assert_eq!(changes[0].action(), FieldAction::Delete);
        assert_eq!(changes[1].field, "TITLE");
        assert_eq!(changes[1].action(), FieldAction::Write("x"));
    }

    #[test]
    fn test_diff_missing_original_field_is_empty() {
        let changes = diff(&tags(&[]), &tags(&[("COMMENT", "n"), ("GENRE", "")]));
        assert_eq!(
            changes,
            vec![FieldChange {
                field: "COMMENT".to_string(),
                old: String::new(),
                new: "n".to_string(),
            }]
        );
    }

    #[test]
    fn test_ensure_standard_fields_keeps_existing_values() {
        let result = ensure_standard_fields(tags(&[("TITLE", "Song"), ("LYRICIST", "L")]));
        assert_eq!(result.len(), STANDARD_FIELDS.len() + 1);
        assert_eq!(result["TITLE"], "Song");
        assert_eq!(result["ARTIST"], "");
        assert_eq!(result["LYRICIST"], "L");
    }
}
