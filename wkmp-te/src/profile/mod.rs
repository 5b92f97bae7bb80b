//! Operation profiles
//!
//! A profile is what gets saved and loaded: the operation sequence plus the
//! field selection it was built for. Stored as pretty-printed JSON.

pub mod legacy;

use crate::engine::FieldSelection;
use crate::error::{Error, Result};
use crate::operation::Operation;
use legacy::LegacyOperation;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;
use tracing::{debug, info};
use wkmp_common::fields::{normalize_field_name, standard_field_names};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Profile {
    pub operations: Vec<Operation>,
    pub selected_fields: Vec<String>,
    /// Non-standard fields the user added to the selection list
    pub custom_fields: Vec<String>,
}

#[derive(Default, Deserialize)]
#[serde(default)]
struct LegacyProfile {
    operations: Vec<LegacyOperation>,
    selected_fields: Vec<String>,
    custom_fields: Vec<String>,
}

impl Profile {
    /// Parse a profile, accepting both the current and the legacy layout
    pub fn from_json_str(content: &str) -> Result<Self> {
        let document: Value = serde_json::from_str(content)?;

        if legacy::is_legacy_profile(&document) {
            debug!("Converting legacy profile layout");
            let old: LegacyProfile = serde_json::from_value(document)?;
            return Ok(Self {
                operations: old.operations.into_iter().map(Operation::from).collect(),
                selected_fields: old.selected_fields,
                custom_fields: old.custom_fields,
            });
        }

        Ok(serde_json::from_value(document)?)
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Profile(format!("Cannot read {}: {}", path.display(), e)))?;
        let profile = Self::from_json_str(&content)?;
        info!(
            "Loaded profile {} ({} operations)",
            path.display(),
            profile.operations.len()
        );
        Ok(profile)
    }

    /// Write the profile atomically (temp file + rename)
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = self.to_json_string()?;
        let temp_path = path.with_extension("json.tmp");
        std::fs::write(&temp_path, content)?;
        if let Err(e) = std::fs::rename(&temp_path, path) {
            let _ = std::fs::remove_file(&temp_path);
            return Err(e.into());
        }
        Ok(())
    }

    /// Normalized, de-duplicated field selection; standard fields when empty
    pub fn selection(&self) -> FieldSelection {
        selection_from(&self.selected_fields)
    }
}

/// Build a selection from raw names, falling back to the standard fields
pub fn selection_from(fields: &[String]) -> FieldSelection {
    let selection: FieldSelection = fields
        .iter()
        .map(|f| normalize_field_name(f))
        .filter(|f| !f.is_empty())
        .collect();

    if selection.is_empty() {
        standard_field_names().into_iter().collect()
    } else {
        selection
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operation::{OperationKind, TrimMode};

    #[test]
    fn test_selection_normalizes_and_dedups() {
        let selection = selection_from(&[
            "title".to_string(),
            " Artist ".to_string(),
            "TITLE".to_string(),
            "".to_string(),
        ]);
        let fields: Vec<&str> = selection.iter().map(String::as_str).collect();
        assert_eq!(fields, vec!["TITLE", "ARTIST"]);
    }

    #[test]
    fn test_empty_selection_defaults_to_standard_fields() {
        let selection = Profile::default().selection();
        assert_eq!(selection.len(), 13);
        assert!(selection.contains("ALBUMARTIST"));
    }

    #[test]
    fn test_json_round_trip() {
        let profile = Profile {
            operations: vec![Operation::on_all_selected(OperationKind::TrimSpaces {
                mode: TrimMode::All,
            })],
            selected_fields: vec!["TITLE".to_string()],
            custom_fields: vec!["LYRICIST".to_string()],
        };
        let json = profile.to_json_string().unwrap();
        assert_eq!(Profile::from_json_str(&json).unwrap(), profile);
    }

    #[test]
    fn test_invalid_json_is_error() {
        assert!(matches!(
            Profile::from_json_str("{ not json"),
            Err(Error::Json(_))
        ));
    }
}
