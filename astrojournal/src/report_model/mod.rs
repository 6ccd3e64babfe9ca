//! Report model for the import stage
//!
//! Raw observation files are parsed into [`Report`]s: a header of metadata
//! fields and the ordered list of targets observed that night. Which fields
//! exist depends on the active [`Schema`].

use std::collections::BTreeMap;

// Submodules
mod date;
mod error;
mod field_cleaner;
mod parser;
mod schema;

// Re-export public types
pub use date::{DateError, ObservationDate};
pub use error::ParseWarning;
pub use field_cleaner::{clean_field, split_fields, FIELD_SEPARATOR};
pub use parser::{parse_reports, ParsedFile};
pub use schema::{ItemField, LayoutColumn, MetaField, Schema};

/// Metadata of one observation session
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportHeader {
    fields: BTreeMap<MetaField, String>,
}

impl ReportHeader {
    /// Build a header from key/value pairs; later duplicates are ignored
    pub fn from_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (MetaField, S)>,
        S: Into<String>,
    {
        let mut header = Self::default();
        for (field, value) in pairs {
            header.set(field, value.into());
        }
        header
    }

    /// Set a field unless it already has a value
    ///
    /// # Returns
    /// * `true` if the value was stored, `false` if the field was already set
    pub(crate) fn set(&mut self, field: MetaField, value: String) -> bool {
        if self.fields.contains_key(&field) {
            return false;
        }
        self.fields.insert(field, value);
        true
    }

    /// Value of a field, if the report declared it
    pub fn get(&self, field: MetaField) -> Option<&str> {
        self.fields.get(&field).map(String::as_str)
    }

    /// Value of a field, or the empty string
    pub fn value(&self, field: MetaField) -> &str {
        self.get(field).unwrap_or_default()
    }

    /// Date as written in the raw file
    pub fn date(&self) -> &str {
        self.value(MetaField::Date)
    }

    /// Declared fields in display order
    pub fn iter(&self) -> impl Iterator<Item = (MetaField, &str)> {
        self.fields.iter().map(|(field, value)| (*field, value.as_str()))
    }
}

/// One observed target
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportItem {
    fields: BTreeMap<ItemField, String>,
}

impl ReportItem {
    /// Build an item from column/value pairs
    ///
    /// Notes are escaped for LaTeX here, once: `%` becomes `\%` and `&`
    /// becomes ` and `.
    pub fn from_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (ItemField, S)>,
        S: Into<String>,
    {
        let fields = pairs
            .into_iter()
            .map(|(field, value)| {
                let value = value.into();
                match field {
                    ItemField::Notes => (field, escape_notes(&value)),
                    _ => (field, value),
                }
            })
            .collect();
        Self { fields }
    }

    /// Value of a column, if the schema has it
    pub fn get(&self, field: ItemField) -> Option<&str> {
        self.fields.get(&field).map(String::as_str)
    }

    /// Value of a column, or the empty string
    pub fn value(&self, field: ItemField) -> &str {
        self.get(field).unwrap_or_default()
    }

    /// Observed object, never empty for parsed items
    pub fn target(&self) -> &str {
        self.value(ItemField::Target)
    }

    /// Constellation
    pub fn constellation(&self) -> &str {
        self.value(ItemField::Constellation)
    }

    /// Object type
    pub fn item_type(&self) -> &str {
        self.value(ItemField::Type)
    }

    /// Magnification
    pub fn power(&self) -> &str {
        self.value(ItemField::Power)
    }

    /// Notes, already escaped for LaTeX
    pub fn notes(&self) -> &str {
        self.value(ItemField::Notes)
    }
}

fn escape_notes(notes: &str) -> String {
    notes.replace('%', "\\%").replace('&', " and ")
}

/// One observation session: a header and its items in file order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Report {
    /// Session metadata
    pub header: ReportHeader,
    /// Observed targets in file order
    pub items: Vec<ReportItem>,
}

impl Report {
    /// Create a report
    pub fn new(header: ReportHeader, items: Vec<ReportItem>) -> Self {
        Self { header, items }
    }

    /// Parsed date of the report
    pub fn date(&self) -> Result<ObservationDate, DateError> {
        ObservationDate::parse(self.header.date())
    }
}
