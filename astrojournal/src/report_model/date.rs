//! Observation dates in `dd/mm/yyyy[x]` form

use chrono::{Datelike, NaiveDate};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors produced when a report date cannot be interpreted
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DateError {
    /// The value is neither 10 nor 11 characters long
    #[error("date '{value}' must be dd/mm/yyyy with an optional suffix character")]
    WrongLength {
        /// The rejected value
        value: String,
    },

    /// Separators or digits are not where they should be
    #[error("date '{value}' is not in dd/mm/yyyy form")]
    Malformed {
        /// The rejected value
        value: String,
    },

    /// Well-formed, but the day does not exist
    #[error("date '{value}' is not a valid calendar date")]
    InvalidCalendarDate {
        /// The rejected value
        value: String,
    },
}

/// A parsed report date plus the optional character that disambiguates
/// several reports written on the same night
///
/// Ordering is by calendar date first, then by suffix, with the unsuffixed
/// date sorting before any suffixed one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ObservationDate {
    date: NaiveDate,
    suffix: Option<char>,
}

impl ObservationDate {
    /// Parse a `dd/mm/yyyy` or `dd/mm/yyyyx` value
    pub fn parse(value: &str) -> Result<Self, DateError> {
        let chars: Vec<char> = value.chars().collect();
        if chars.len() != 10 && chars.len() != 11 {
            return Err(DateError::WrongLength {
                value: value.to_string(),
            });
        }

        let malformed = || DateError::Malformed {
            value: value.to_string(),
        };
        if chars[2] != '/' || chars[5] != '/' {
            return Err(malformed());
        }

        let number = |range: std::ops::Range<usize>| -> Result<u32, DateError> {
            let digits = &chars[range];
            if !digits.iter().all(char::is_ascii_digit) {
                return Err(malformed());
            }
            digits
                .iter()
                .collect::<String>()
                .parse()
                .map_err(|_| malformed())
        };
        let day = number(0..2)?;
        let month = number(3..5)?;
        let year = number(6..10)?;

        let year = i32::try_from(year).map_err(|_| malformed())?;
        let date = NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| {
            DateError::InvalidCalendarDate {
                value: value.to_string(),
            }
        })?;

        Ok(Self {
            date,
            suffix: chars.get(10).copied(),
        })
    }

    /// Calendar date without the suffix
    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// Four digit year
    pub fn year(&self) -> i32 {
        self.date.year()
    }

    /// Month, 1 to 12
    pub fn month(&self) -> u32 {
        self.date.month()
    }

    /// Disambiguation suffix, if any
    pub fn suffix(&self) -> Option<char> {
        self.suffix
    }

    /// `yyyymmdd[x]`, used to name per-report fragment files
    pub fn file_stem(&self) -> String {
        let mut stem = self.date.format("%Y%m%d").to_string();
        if let Some(suffix) = self.suffix {
            stem.push(suffix);
        }
        stem
    }
}

impl FromStr for ObservationDate {
    type Err = DateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for ObservationDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.date.format("%d/%m/%Y"))?;
        if let Some(suffix) = self.suffix {
            write!(f, "{suffix}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_date() {
        let date = ObservationDate::parse("01/02/2020").unwrap();
        assert_eq!(date.year(), 2020);
        assert_eq!(date.month(), 2);
        assert_eq!(date.suffix(), None);
        assert_eq!(date.file_stem(), "20200201");
        assert_eq!(date.to_string(), "01/02/2020");
    }

    #[test]
    fn test_parse_suffixed_date() {
        let date: ObservationDate = "15/08/2019b".parse().unwrap();
        assert_eq!(date.suffix(), Some('b'));
        assert_eq!(date.file_stem(), "20190815b");
        assert_eq!(date.to_string(), "15/08/2019b");
    }

    #[test]
    fn test_parse_rejects_bad_values() {
        assert!(matches!(
            ObservationDate::parse("1/2/2020"),
            Err(DateError::WrongLength { .. })
        ));
        assert!(matches!(
            ObservationDate::parse("01-02-2020"),
            Err(DateError::Malformed { .. })
        ));
        assert!(matches!(
            ObservationDate::parse("aa/02/2020"),
            Err(DateError::Malformed { .. })
        ));
        assert!(matches!(
            ObservationDate::parse("31/02/2020"),
            Err(DateError::InvalidCalendarDate { .. })
        ));
    }

    #[test]
    fn test_ordering() {
        let mut dates: Vec<ObservationDate> = ["02/01/2021", "01/02/2020b", "01/02/2020", "31/12/2019"]
            .iter()
            .map(|d| d.parse().unwrap())
            .collect();
        dates.sort();
        let sorted: Vec<String> = dates.iter().map(ToString::to_string).collect();
        assert_eq!(
            sorted,
            vec!["31/12/2019", "01/02/2020", "01/02/2020b", "02/01/2021"]
        );
    }
}
