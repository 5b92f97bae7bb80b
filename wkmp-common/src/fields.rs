//! Standard tag field names
//!
//! Single source of truth for the field names every WKMP tag tool treats as
//! "standard". Tag readers guarantee these keys are present (possibly empty);
//! everything else found in a file is a custom field.

/// Standard tag fields, in display order
pub const STANDARD_FIELDS: [&str; 13] = [
    "ARTIST",
    "TITLE",
    "ALBUM",
    "GENRE",
    "COMPOSER",
    "PERFORMER",
    "ALBUMARTIST",
    "DATE",
    "TRACKNUMBER",
    "TRACKTOTAL",
    "DISCNUMBER",
    "TOTALDISCS",
    "COMMENT",
];

/// Canonical form of a field name: surrounding whitespace removed, upper-cased
pub fn normalize_field_name(field_name: &str) -> String {
    field_name.trim().to_uppercase()
}

/// Whether `field_name` names a standard field
///
/// Comparison ignores case and embedded spaces, so `"Album Artist"` matches
/// `ALBUMARTIST`.
pub fn is_standard_field(field_name: &str) -> bool {
    let squashed: String = field_name
        .chars()
        .filter(|c| *c != ' ')
        .flat_map(char::to_uppercase)
        .collect();
    STANDARD_FIELDS.contains(&squashed.as_str())
}

/// Standard fields as owned strings, the default field selection
pub fn standard_field_names() -> Vec<String> {
    STANDARD_FIELDS.iter().map(|f| f.to_string()).collect()
}
