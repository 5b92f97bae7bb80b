//! Transformation engine
//!
//! Folds an operation sequence over a working copy of one file's tags.
//! Pure and synchronous: the caller's mapping is never touched and no
//! operation can fail. Cross-field reads (`source_field`) always come from
//! the original mapping, never from values edited earlier in the same pass.

use crate::operation::{Operation, OperationKind};
use crate::text;
use indexmap::IndexSet;
use std::collections::HashMap;
use tracing::trace;

/// Field name (canonically upper-case) to value
pub type FieldMapping = HashMap<String, String>;

/// Selected field names, iterated in insertion order
pub type FieldSelection = IndexSet<String>;

/// Apply `operations` in order to a copy of `original`
///
/// A selected field missing from `original` reads as `""`; it is only added
/// to the result when an operation produces a non-empty value for it.
pub fn apply(
    original: &FieldMapping,
    selected_fields: &FieldSelection,
    operations: &[Operation],
) -> FieldMapping {
    let mut working = original.clone();

    for operation in operations {
        for field in target_fields(operation, selected_fields) {
            let current = working.get(field).map(String::as_str).unwrap_or("");
            let new_value = apply_kind(&operation.kind, current, original);

            if new_value != current {
                trace!(field = %field, op = %operation.kind, "Field updated");
            }

            if new_value.is_empty() && !working.contains_key(field) {
                continue;
            }
            working.insert(field.clone(), new_value);
        }
    }

    working
}

/// Fields an operation touches, in selection order
fn target_fields<'a>(
    operation: &'a Operation,
    selected_fields: &'a FieldSelection,
) -> Box<dyn Iterator<Item = &'a String> + 'a> {
    if operation.apply_to_all {
        Box::new(selected_fields.iter())
    } else {
        Box::new(selected_fields.get(&operation.target_field).into_iter())
    }
}

/// New value for one field under one operation kind
pub fn apply_kind(kind: &OperationKind, current: &str, original: &FieldMapping) -> String {
    match kind {
        OperationKind::Replace { old_text, new_text } => {
            text::replace_literal(current, old_text, new_text)
        }

        OperationKind::InsertTextPrefix { text } => format!("{}{}", text, current),

        OperationKind::InsertTextSuffix { text } => format!("{}{}", current, text),

        OperationKind::InsertFieldPrefix { source_field, separator } => {
            match lookup(original, source_field) {
                "" => current.to_string(),
                source => format!("{}{}{}", source, separator, current),
            }
        }

        OperationKind::InsertFieldSuffix { source_field, separator } => {
            match lookup(original, source_field) {
                "" => current.to_string(),
                source => format!("{}{}{}", current, separator, source),
            }
        }

        OperationKind::InsertFieldPosition { source_field, separator, position } => {
            match lookup(original, source_field) {
                "" => current.to_string(),
                source => text::insert_at(current, *position, &format!("{}{}", separator, source)),
            }
        }

        OperationKind::DeleteRange { position, length } => {
            text::delete_range(current, *position, *length)
        }

        OperationKind::InsertPosition { text, position } => {
            text::insert_at(current, *position, text)
        }

        OperationKind::RemoveBrackets { brackets } => text::remove_brackets(current, brackets),

        OperationKind::TrimSpaces { mode } => text::trim_spaces(current, *mode),

        OperationKind::ConvertPunctuation { direction } => {
            text::convert_punctuation(current, *direction)
        }

        OperationKind::Unknown => current.to_string(),
    }
}

fn lookup<'a>(mapping: &'a FieldMapping, field: &str) -> &'a str {
    mapping.get(field).map(String::as_str).unwrap_or("")
}

/// Accumulates an operation sequence and previews it against tag mappings
#[derive(Debug, Clone, Default)]
pub struct TagProcessor {
    operations: Vec<Operation>,
}

impl TagProcessor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_operations(operations: Vec<Operation>) -> Self {
        Self { operations }
    }

    pub fn add_operation(&mut self, operation: Operation) {
        self.operations.push(operation);
    }

    pub fn clear_operations(&mut self) {
        self.operations.clear();
    }

    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    /// Result of applying the current sequence to `original`
    pub fn preview(&self, original: &FieldMapping, selected_fields: &FieldSelection) -> FieldMapping {
        apply(original, selected_fields, &self.operations)
    }
}
