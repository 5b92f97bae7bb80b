//! Character-level string helpers used by the engine
//!
//! All offsets are character (Unicode scalar) offsets. None of these
//! functions fail: out-of-range positions append or leave the input alone.

use crate::operation::{BracketPair, PunctuationDirection, TrimMode};

/// Full-width punctuation and its ASCII counterpart
///
/// Order matters for the reverse direction: ASCII `"` and `'` alternate
/// between the opening and closing quote of their pair.
pub const PUNCTUATION_PALETTE: [(char, char); 16] = [
    ('，', ','),
    ('。', '.'),
    ('！', '!'),
    ('？', '?'),
    ('；', ';'),
    ('：', ':'),
    ('（', '('),
    ('）', ')'),
    ('【', '['),
    ('】', ']'),
    ('《', '<'),
    ('》', '>'),
    ('\u{201C}', '"'),
    ('\u{201D}', '"'),
    ('\u{2018}', '\''),
    ('\u{2019}', '\''),
];

const DOUBLE_QUOTES: (char, char) = ('\u{201C}', '\u{201D}');
const SINGLE_QUOTES: (char, char) = ('\u{2018}', '\u{2019}');

/// Byte index of the `position`-th character, or `None` past the end
fn byte_offset(s: &str, position: usize) -> Option<usize> {
    if position == 0 {
        return Some(0);
    }
    match s.char_indices().nth(position) {
        Some((idx, _)) => Some(idx),
        None if s.chars().count() == position => Some(s.len()),
        None => None,
    }
}

/// Literal replacement; an empty needle leaves the input unchanged
pub fn replace_literal(current: &str, old_text: &str, new_text: &str) -> String {
    if old_text.is_empty() {
        return current.to_string();
    }
    current.replace(old_text, new_text)
}

/// Splice `insert` at character `position`, appending when past the end
pub fn insert_at(current: &str, position: usize, insert: &str) -> String {
    let mut result = String::with_capacity(current.len() + insert.len());
    match byte_offset(current, position) {
        Some(idx) => {
            result.push_str(&current[..idx]);
            result.push_str(insert);
            result.push_str(&current[idx..]);
        }
        None => {
            result.push_str(current);
            result.push_str(insert);
        }
    }
    result
}

/// Remove up to `length` characters starting at `position`
pub fn delete_range(current: &str, position: usize, length: usize) -> String {
    current
        .chars()
        .enumerate()
        .filter(|(i, _)| *i < position || *i - position >= length)
        .map(|(_, c)| c)
        .collect()
}

/// Remove every shortest `open…close` span, one left-to-right pass per pair
///
/// A span never crosses a line break: an opener with no closer before the
/// end of its line is kept and scanning continues after it.
pub fn remove_brackets(current: &str, brackets: &[BracketPair]) -> String {
    brackets
        .iter()
        .fold(current.to_string(), |value, pair| remove_bracket_pair(&value, *pair))
}

fn remove_bracket_pair(value: &str, pair: BracketPair) -> String {
    let mut result = String::with_capacity(value.len());
    let mut rest = value;

    while let Some(open_idx) = rest.find(pair.open) {
        let after_open = open_idx + pair.open.len_utf8();
        // Search window ends just after the next line break
        let line_end = rest[after_open..]
            .find('\n')
            .map_or(rest.len(), |i| after_open + i + 1);

        match rest[after_open..line_end].find(pair.close) {
            Some(close_rel) => {
                result.push_str(&rest[..open_idx]);
                rest = &rest[after_open + close_rel + pair.close.len_utf8()..];
            }
            None => {
                result.push_str(&rest[..after_open]);
                rest = &rest[after_open..];
            }
        }
    }

    result.push_str(rest);
    result
}

/// Collapse every whitespace run to a single ASCII space
pub fn collapse_whitespace(current: &str) -> String {
    let mut result = String::with_capacity(current.len());
    let mut in_run = false;
    for c in current.chars() {
        if c.is_whitespace() {
            if !in_run {
                result.push(' ');
                in_run = true;
            }
        } else {
            result.push(c);
            in_run = false;
        }
    }
    result
}

pub fn trim_spaces(current: &str, mode: TrimMode) -> String {
    match mode {
        TrimMode::Edges => current.trim().to_string(),
        TrimMode::Duplicates => collapse_whitespace(current),
        TrimMode::All => collapse_whitespace(current).trim().to_string(),
    }
}

pub fn convert_punctuation(current: &str, direction: PunctuationDirection) -> String {
    match direction {
        PunctuationDirection::ToEnglish => current
            .chars()
            .map(|c| {
                PUNCTUATION_PALETTE
                    .iter()
                    .find(|(full, _)| *full == c)
                    .map_or(c, |(_, ascii)| *ascii)
            })
            .collect(),
        PunctuationDirection::ToChinese => {
            let mut double_open = true;
            let mut single_open = true;
            current
                .chars()
                .map(|c| match c {
                    '"' => {
                        let q = if double_open { DOUBLE_QUOTES.0 } else { DOUBLE_QUOTES.1 };
                        double_open = !double_open;
                        q
                    }
                    '\'' => {
                        let q = if single_open { SINGLE_QUOTES.0 } else { SINGLE_QUOTES.1 };
                        single_open = !single_open;
                        q
                    }
                    _ => PUNCTUATION_PALETTE
                        .iter()
                        .find(|(_, ascii)| *ascii == c)
                        .map_or(c, |(full, _)| *full),
                })
                .collect()
        }
    }
}
