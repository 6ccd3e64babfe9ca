//! Field cleaning for tab-separated raw report lines
//!
//! Spreadsheet exports often wrap cells in quotes and pad them with
//! whitespace; every cell goes through [`clean_field`] before it is matched
//! against the schema.

/// Field separator used by raw report files
pub const FIELD_SEPARATOR: char = '\t';

fn is_quote(c: char) -> bool {
    c == '"' || c == '\''
}

/// Strip one leading and one trailing quote character and trim whitespace
///
/// # Parameters
/// * `raw` - A single cell as it appears between separators
///
/// # Returns
/// * The cleaned cell value
pub fn clean_field(raw: &str) -> String {
    let mut field = raw.trim();
    if let Some(rest) = field.strip_prefix(is_quote) {
        field = rest;
    }
    if let Some(rest) = field.strip_suffix(is_quote) {
        field = rest;
    }
    field.trim().to_string()
}

/// Split a raw line on tabs and clean every field
///
/// Trailing empty cells are dropped, so a row padded with separators by a
/// spreadsheet keeps the field count of its content.
pub fn split_fields(line: &str) -> Vec<String> {
    let mut fields: Vec<String> = line
        .trim_end()
        .split(FIELD_SEPARATOR)
        .map(clean_field)
        .collect();
    while fields.len() > 1 && fields.last().is_some_and(String::is_empty) {
        fields.pop();
    }
    fields
}
