//! Import of profiles saved by the earlier desktop tag editor
//!
//! Those profiles stored every operation as one flat record: `op_type` held
//! the localized operation name and `new_text` doubled as the sub-mode
//! selector for space trimming and punctuation conversion. Records are
//! converted to the typed model here; anything unrecognized becomes
//! [`OperationKind::Unknown`] so it degrades to a no-op.

use crate::operation::{BracketPair, Operation, OperationKind, PunctuationDirection, TrimMode};
use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

/// One operation as written by the desktop editor
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LegacyOperation {
    pub op_type: String,
    pub target_field: String,
    pub source_field: String,
    pub text: String,
    pub old_text: String,
    pub new_text: String,
    pub position: i64,
    pub length: i64,
    pub brackets: Vec<String>,
    pub separator: String,
    pub apply_to_all: bool,
}

/// Whether a profile JSON document uses the legacy operation records
pub fn is_legacy_profile(document: &Value) -> bool {
    document
        .get("operations")
        .and_then(Value::as_array)
        .is_some_and(|ops| ops.iter().any(|op| op.get("op_type").is_some()))
}

impl From<LegacyOperation> for Operation {
    fn from(legacy: LegacyOperation) -> Self {
        let position = legacy.position.max(0) as usize;
        let length = legacy.length.max(0) as usize;

        let kind = match legacy.op_type.as_str() {
            "替换" => OperationKind::Replace {
                old_text: legacy.old_text,
                new_text: legacy.new_text,
            },
            "插入文本前缀" => OperationKind::InsertTextPrefix { text: legacy.text },
            "插入文本后缀" => OperationKind::InsertTextSuffix { text: legacy.text },
            "插入字段前缀" => OperationKind::InsertFieldPrefix {
                source_field: legacy.source_field,
                separator: legacy.separator,
            },
            "插入字段后缀" => OperationKind::InsertFieldSuffix {
                source_field: legacy.source_field,
                separator: legacy.separator,
            },
            "插入字段到位置" => OperationKind::InsertFieldPosition {
                source_field: legacy.source_field,
                separator: legacy.separator,
                position,
            },
            "删除范围" => OperationKind::DeleteRange { position, length },
            "插入到位置" => OperationKind::InsertPosition {
                text: legacy.text,
                position,
            },
            "清除括号" => OperationKind::RemoveBrackets {
                brackets: legacy
                    .brackets
                    .iter()
                    .filter_map(|b| match b.parse::<BracketPair>() {
                        Ok(pair) => Some(pair),
                        Err(e) => {
                            warn!("Skipping legacy bracket entry: {}", e);
                            None
                        }
                    })
                    .collect(),
            },
            "修剪空格" => match legacy.new_text.as_str() {
                "两端空格" => OperationKind::TrimSpaces { mode: TrimMode::Edges },
                "重复空格" => OperationKind::TrimSpaces { mode: TrimMode::Duplicates },
                "全部" => OperationKind::TrimSpaces { mode: TrimMode::All },
                other => {
                    warn!("Unknown legacy trim mode {:?}, operation ignored", other);
                    OperationKind::Unknown
                }
            },
            "转换标点" => match legacy.new_text.as_str() {
                "中文转英文" => OperationKind::ConvertPunctuation {
                    direction: PunctuationDirection::ToEnglish,
                },
                "英文转中文" => OperationKind::ConvertPunctuation {
                    direction: PunctuationDirection::ToChinese,
                },
                other => {
                    warn!("Unknown legacy punctuation mode {:?}, operation ignored", other);
                    OperationKind::Unknown
                }
            },
            other => {
                warn!("Unknown legacy operation type {:?}, operation ignored", other);
                OperationKind::Unknown
            }
        };

        Operation {
            target_field: legacy.target_field,
            apply_to_all: legacy.apply_to_all,
            kind,
        }
    }
}
