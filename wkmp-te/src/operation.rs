//! Tag operation model
//!
//! An [`Operation`] pairs a target-field policy with an [`OperationKind`]
//! carrying only the parameters that kind needs. Operations are immutable
//! once built; the engine only ever borrows them.
//!
//! Serialized form (one JSON object per operation):
//!
//! ```json
//! { "target_field": "TITLE", "apply_to_all": false,
//!   "kind": "replace", "old_text": "feat.", "new_text": "ft." }
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One text transformation and the fields it targets
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Operation {
    /// Field modified when `apply_to_all` is false
    #[serde(default)]
    pub target_field: String,

    /// Apply independently to every selected field instead of `target_field`
    #[serde(default)]
    pub apply_to_all: bool,

    #[serde(flatten)]
    pub kind: OperationKind,
}

impl Operation {
    /// Operation targeting a single field
    pub fn on_field(field: impl Into<String>, kind: OperationKind) -> Self {
        Self {
            target_field: field.into(),
            apply_to_all: false,
            kind,
        }
    }

    /// Operation applied to every selected field
    pub fn on_all_selected(kind: OperationKind) -> Self {
        Self {
            target_field: String::new(),
            apply_to_all: true,
            kind,
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.apply_to_all {
            write!(f, "[all selected] {}", self.kind)
        } else {
            write!(f, "[{}] {}", self.target_field, self.kind)
        }
    }
}

/// Transformation kinds
///
/// Indices (`position`, `length`) count characters, not bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OperationKind {
    /// Literal, non-overlapping replacement of `old_text` by `new_text`
    Replace {
        old_text: String,
        #[serde(default)]
        new_text: String,
    },

    InsertTextPrefix { text: String },

    InsertTextSuffix { text: String },

    /// Prepend `source_field` (read from the original tags) and `separator`
    InsertFieldPrefix {
        source_field: String,
        #[serde(default)]
        separator: String,
    },

    /// Append `separator` and `source_field` (read from the original tags)
    InsertFieldSuffix {
        source_field: String,
        #[serde(default)]
        separator: String,
    },

    /// Splice `separator` + `source_field` at `position`, appending past the end
    InsertFieldPosition {
        source_field: String,
        #[serde(default)]
        separator: String,
        #[serde(default)]
        position: usize,
    },

    /// Remove `length` characters starting at `position`
    DeleteRange {
        #[serde(default)]
        position: usize,
        #[serde(default)]
        length: usize,
    },

    /// Splice `text` at `position`, appending past the end
    InsertPosition {
        text: String,
        #[serde(default)]
        position: usize,
    },

    /// Remove bracketed spans (delimiters included), one pass per pair
    RemoveBrackets { brackets: Vec<BracketPair> },

    TrimSpaces { mode: TrimMode },

    ConvertPunctuation { direction: PunctuationDirection },

    /// Any kind this build does not know; applied as identity
    #[serde(other)]
    Unknown,
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OperationKind::Replace { old_text, new_text } => {
                write!(f, "replace {:?} with {:?}", old_text, new_text)
            }
            OperationKind::InsertTextPrefix { text } => write!(f, "prefix text {:?}", text),
            OperationKind::InsertTextSuffix { text } => write!(f, "suffix text {:?}", text),
            OperationKind::InsertFieldPrefix { source_field, separator } => {
                write!(f, "prefix field {} (separator {:?})", source_field, separator)
            }
            OperationKind::InsertFieldSuffix { source_field, separator } => {
                write!(f, "suffix field {} (separator {:?})", source_field, separator)
            }
            OperationKind::InsertFieldPosition { source_field, separator, position } => write!(
                f,
                "insert field {} at {} (separator {:?})",
                source_field, position, separator
            ),
            OperationKind::DeleteRange { position, length } => {
                write!(f, "delete {} chars at {}", length, position)
            }
            OperationKind::InsertPosition { text, position } => {
                write!(f, "insert {:?} at {}", text, position)
            }
            OperationKind::RemoveBrackets { brackets } => {
                let pairs: Vec<String> = brackets.iter().map(|b| b.to_string()).collect();
                write!(f, "remove brackets {}", pairs.join(" "))
            }
            OperationKind::TrimSpaces { mode } => write!(f, "trim spaces ({})", mode),
            OperationKind::ConvertPunctuation { direction } => {
                write!(f, "convert punctuation ({})", direction)
            }
            OperationKind::Unknown => write!(f, "unknown operation (ignored)"),
        }
    }
}

/// Whitespace trimming sub-mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrimMode {
    /// Strip leading and trailing whitespace
    Edges,
    /// Collapse each whitespace run to a single space
    Duplicates,
    /// Collapse, then strip
    All,
}

impl fmt::Display for TrimMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TrimMode::Edges => "edges",
            TrimMode::Duplicates => "duplicates",
            TrimMode::All => "all",
        };
        f.write_str(name)
    }
}

/// Punctuation conversion direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PunctuationDirection {
    /// Full-width Chinese punctuation to ASCII
    ToEnglish,
    /// ASCII punctuation to full-width Chinese
    ToChinese,
}

impl fmt::Display for PunctuationDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PunctuationDirection::ToEnglish => "to English",
            PunctuationDirection::ToChinese => "to Chinese",
        };
        f.write_str(name)
    }
}

/// An opening/closing delimiter pair, written as a two-character string ("()")
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BracketPair {
    pub open: char,
    pub close: char,
}

impl BracketPair {
    pub const fn new(open: char, close: char) -> Self {
        Self { open, close }
    }
}

/// Rejected bracket pair string
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("bracket pair must be exactly two characters, got {0:?}")]
pub struct InvalidBracketPair(pub String);

impl FromStr for BracketPair {
    type Err = InvalidBracketPair;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        match (chars.next(), chars.next(), chars.next()) {
            (Some(open), Some(close), None) => Ok(Self { open, close }),
            _ => Err(InvalidBracketPair(s.to_string())),
        }
    }
}

impl TryFrom<String> for BracketPair {
    type Error = InvalidBracketPair;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<BracketPair> for String {
    fn from(pair: BracketPair) -> Self {
        pair.to_string()
    }
}

impl fmt::Display for BracketPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.open, self.close)
    }
}
