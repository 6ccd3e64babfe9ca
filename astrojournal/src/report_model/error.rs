//! Recoverable problems found while parsing raw reports
//!
//! None of these stop parsing: the parser logs each one, records it and
//! moves on to the next line.

use super::date::DateError;
use thiserror::Error;

/// A recoverable problem in a raw report file
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseWarning {
    /// Content found outside a report, reported once per run of such lines
    #[error("Line {line}: expected 'Date' but found unknown property [{content}]. Report discarded.")]
    ExpectedDate {
        /// 1-based line number
        line: usize,
        /// The offending line
        content: String,
    },

    /// A report started without a two-field `Date` line
    #[error("Line {line}: report started without a date [{content}]")]
    MissingDate {
        /// 1-based line number
        line: usize,
        /// The offending line
        content: String,
    },

    /// The date does not match `dd/mm/yyyy[x]`; it is kept verbatim
    #[error("Line {line}: {source}. Date kept as written")]
    InvalidDate {
        /// 1-based line number
        line: usize,
        /// Why the date was rejected
        source: DateError,
    },

    /// A key/value line whose key the active profile does not know
    #[error("Line {line}: Report {date}. Unknown property [{key}:{value}]. Property discarded.")]
    UnknownProperty {
        /// 1-based line number
        line: usize,
        /// Date of the enclosing report
        date: String,
        /// Rejected key
        key: String,
        /// Rejected value
        value: String,
    },

    /// A header key that was already set; the first value wins
    #[error("Line {line}: Report {date}. Property {key} already set. Value [{value}] discarded.")]
    DuplicateProperty {
        /// 1-based line number
        line: usize,
        /// Date of the enclosing report
        date: String,
        /// Repeated key
        key: String,
        /// Discarded value
        value: String,
    },

    /// A header line that is neither a property nor the item header
    #[error("Line {line}: Report {date}. Unknown line [{content}]. Line discarded.")]
    UnknownLine {
        /// 1-based line number
        line: usize,
        /// Date of the enclosing report
        date: String,
        /// The offending line
        content: String,
    },

    /// An item row with too few columns; item parsing stops for the report
    #[error("Line {line}: Report {date}. Malformed target [{content}], expected {expected} fields but found {found}. Target discarded.")]
    MalformedTarget {
        /// 1-based line number
        line: usize,
        /// Date of the enclosing report
        date: String,
        /// The offending line
        content: String,
        /// Column count of the active schema
        expected: usize,
        /// Column count of the row
        found: usize,
    },

    /// An item row with an empty target cell
    #[error("Line {line}: Report {date}. Target name is empty [{content}]. Target discarded.")]
    EmptyTarget {
        /// 1-based line number
        line: usize,
        /// Date of the enclosing report
        date: String,
        /// The offending line
        content: String,
    },

    /// A new `Date` line arrived before the previous report's blank line
    #[error("Line {line}: Report {date} was not terminated by a blank line. Starting a new report.")]
    UnterminatedReport {
        /// 1-based line number
        line: usize,
        /// Date of the report that was closed
        date: String,
    },
}

impl ParseWarning {
    /// Line the warning refers to
    pub fn line(&self) -> usize {
        match self {
            ParseWarning::ExpectedDate { line, .. }
            | ParseWarning::MissingDate { line, .. }
            | ParseWarning::InvalidDate { line, .. }
            | ParseWarning::UnknownProperty { line, .. }
            | ParseWarning::DuplicateProperty { line, .. }
            | ParseWarning::UnknownLine { line, .. }
            | ParseWarning::MalformedTarget { line, .. }
            | ParseWarning::EmptyTarget { line, .. }
            | ParseWarning::UnterminatedReport { line, .. } => *line,
        }
    }
}
