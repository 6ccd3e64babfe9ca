//! Line-oriented parser for raw observation reports
//!
//! A raw file is a sequence of records separated by blank lines. Each record
//! starts with a `Date` line, continues with `Key<TAB>Value` metadata lines,
//! then the item header line and one row per observed target.

use super::field_cleaner::split_fields;
use super::{
    ItemField, MetaField, ObservationDate, ParseWarning, Report, ReportHeader, ReportItem, Schema,
};

/// Number of fields in a metadata line
const METADATA_FIELD_COUNT: usize = 2;

/// Reports and warnings produced from one raw file
#[derive(Debug, Default)]
pub struct ParsedFile {
    /// Reports in file order
    pub reports: Vec<Report>,
    /// Recoverable problems, in line order
    pub warnings: Vec<ParseWarning>,
}

/// Parse the text of one raw report file
///
/// Never fails: malformed content is skipped and reported through
/// [`ParsedFile::warnings`], each warning also being logged.
pub fn parse_reports(text: &str, schema: &Schema) -> ParsedFile {
    let mut parser = ReportParser::new(schema);
    for (index, line) in text.lines().enumerate() {
        parser.feed(index + 1, line);
    }
    parser.finish()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// Between records
    Idle,
    /// Reading metadata lines
    Header,
    /// Reading item rows
    Items,
}

struct ReportBuilder {
    header: ReportHeader,
    items: Vec<ReportItem>,
}

struct ReportParser<'s> {
    schema: &'s Schema,
    state: State,
    current: Option<ReportBuilder>,
    expected_date_warned: bool,
    parsed: ParsedFile,
}

impl<'s> ReportParser<'s> {
    fn new(schema: &'s Schema) -> Self {
        Self {
            schema,
            state: State::Idle,
            current: None,
            expected_date_warned: false,
            parsed: ParsedFile::default(),
        }
    }

    fn feed(&mut self, line_no: usize, line: &str) {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            self.end_record();
            return;
        }
        if trimmed.starts_with('#') {
            return;
        }

        let fields = split_fields(line);
        match self.state {
            State::Idle => self.idle_line(line_no, trimmed, fields),
            State::Header => self.header_line(line_no, trimmed, fields),
            State::Items => self.item_line(line_no, trimmed, fields),
        }
    }

    fn finish(mut self) -> ParsedFile {
        self.end_record();
        self.parsed
    }

    fn idle_line(&mut self, line_no: usize, line: &str, fields: Vec<String>) {
        if line.contains(MetaField::Date.col_name()) {
            self.start_report(line_no, line, &fields);
        } else if !self.expected_date_warned {
            self.expected_date_warned = true;
            self.warn(ParseWarning::ExpectedDate {
                line: line_no,
                content: line.to_string(),
            });
        }
    }

    fn header_line(&mut self, line_no: usize, line: &str, mut fields: Vec<String>) {
        // A lone key is naked-eye shorthand, e.g. "Telescopes" with no value
        if fields.len() == 1 {
            fields.push(String::new());
        }

        if fields.len() == METADATA_FIELD_COUNT {
            if is_date_key(&fields[0]) {
                self.restart_report(line_no, line, &fields);
                return;
            }
            let date = self.current_date();
            let [key, value]: [String; 2] = match fields.try_into() {
                Ok(pair) => pair,
                Err(_) => return,
            };
            match self.schema.metadata_field(&key) {
                Some(field) => {
                    log::debug!("Report {date}: {} = [{value}]", field.col_name());
                    let stored = self
                        .current
                        .as_mut()
                        .is_some_and(|report| report.header.set(field, value.clone()));
                    if !stored {
                        self.warn(ParseWarning::DuplicateProperty {
                            line: line_no,
                            date,
                            key,
                            value,
                        });
                    }
                }
                None => self.warn(ParseWarning::UnknownProperty {
                    line: line_no,
                    date,
                    key,
                    value,
                }),
            }
        } else if self.schema.matches_item_header(&fields) {
            log::debug!("Report {}: item header found", self.current_date());
            self.state = State::Items;
        } else {
            self.warn(ParseWarning::UnknownLine {
                line: line_no,
                date: self.current_date(),
                content: line.to_string(),
            });
        }
    }

    fn item_line(&mut self, line_no: usize, line: &str, fields: Vec<String>) {
        if fields.len() == METADATA_FIELD_COUNT && is_date_key(&fields[0]) {
            self.restart_report(line_no, line, &fields);
            return;
        }

        let expected = self.schema.item_column_count();
        if fields.len() < expected {
            self.warn(ParseWarning::MalformedTarget {
                line: line_no,
                date: self.current_date(),
                content: line.to_string(),
                expected,
                found: fields.len(),
            });
            self.state = State::Header;
            return;
        }
        if fields.len() > expected {
            log::debug!(
                "Line {line_no}: ignoring {} extra fields",
                fields.len() - expected
            );
        }

        if fields[0].is_empty() {
            self.warn(ParseWarning::EmptyTarget {
                line: line_no,
                date: self.current_date(),
                content: line.to_string(),
            });
            return;
        }

        let item = ReportItem::from_pairs(
            self.schema
                .item_fields()
                .iter()
                .copied()
                .zip(fields)
                .collect::<Vec<(ItemField, String)>>(),
        );
        if let Some(report) = self.current.as_mut() {
            report.items.push(item);
        }
    }

    fn start_report(&mut self, line_no: usize, line: &str, fields: &[String]) {
        self.expected_date_warned = false;
        let mut header = ReportHeader::default();

        if fields.len() == METADATA_FIELD_COUNT && is_date_key(&fields[0]) {
            let date = fields[1].clone();
            if let Err(source) = ObservationDate::parse(&date) {
                self.warn(ParseWarning::InvalidDate {
                    line: line_no,
                    source,
                });
            }
            log::debug!("Line {line_no}: new report {date}");
            header.set(MetaField::Date, date);
        } else {
            self.warn(ParseWarning::MissingDate {
                line: line_no,
                content: line.to_string(),
            });
        }

        self.current = Some(ReportBuilder {
            header,
            items: Vec::new(),
        });
        self.state = State::Header;
    }

    fn restart_report(&mut self, line_no: usize, line: &str, fields: &[String]) {
        self.warn(ParseWarning::UnterminatedReport {
            line: line_no,
            date: self.current_date(),
        });
        self.end_record();
        self.start_report(line_no, line, fields);
    }

    fn end_record(&mut self) {
        if let Some(report) = self.current.take() {
            log::debug!(
                "Report {} parsed with {} items",
                report.header.date(),
                report.items.len()
            );
            self.parsed
                .reports
                .push(Report::new(report.header, report.items));
        }
        self.state = State::Idle;
    }

    fn current_date(&self) -> String {
        self.current
            .as_ref()
            .map(|report| report.header.date().to_string())
            .unwrap_or_default()
    }

    fn warn(&mut self, warning: ParseWarning) {
        log::warn!("{warning}");
        self.parsed.warnings.push(warning);
    }
}

fn is_date_key(key: &str) -> bool {
    key.eq_ignore_ascii_case(MetaField::Date.col_name())
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXTENDED_REPORT: &str = "Date\t01/02/2020\n\
Time\t21:00-23:00\n\
Location\tBackyard\n\
Seeing\t4/5\n\
Transparency\t3/5\n\
Telescopes\tDobson 10\"\n\
Target\tCons\tType\tPower\tNotes\n\
M31\tAnd\tGalaxy\t50x\tFaint core visible\n\
M42\tOri\tNebula\t100x\tTrapezium & nebulosity, 90% visible\n";

    #[test]
    fn test_parse_extended_report() {
        let parsed = parse_reports(EXTENDED_REPORT, &Schema::EXTENDED);
        assert!(parsed.warnings.is_empty(), "{:?}", parsed.warnings);
        assert_eq!(parsed.reports.len(), 1);

        let report = &parsed.reports[0];
        assert_eq!(report.header.date(), "01/02/2020");
        assert_eq!(report.header.value(MetaField::Seeing), "4/5");
        assert_eq!(report.header.value(MetaField::Telescopes), "Dobson 10");
        assert_eq!(report.items.len(), 2);
        assert_eq!(report.items[0].target(), "M31");
        assert_eq!(report.items[0].constellation(), "And");
        assert_eq!(report.items[0].item_type(), "Galaxy");
        assert_eq!(report.items[0].power(), "50x");
        assert_eq!(report.items[0].notes(), "Faint core visible");
        assert_eq!(
            report.items[1].notes(),
            "Trapezium  and  nebulosity, 90\\% visible"
        );
    }

    #[test]
    fn test_single_item_scenario() {
        let text = "Date\t01/02/2020\nSeeing\t4/5\nTarget\tCons\tType\tPower\tNotes\nM31\tAnd\tGalaxy\t50x\tFaint core visible\n\n";
        let parsed = parse_reports(text, &Schema::EXTENDED);
        assert!(parsed.warnings.is_empty(), "{:?}", parsed.warnings);
        assert_eq!(parsed.reports.len(), 1);

        let report = &parsed.reports[0];
        let header: Vec<(MetaField, &str)> = report.header.iter().collect();
        assert_eq!(
            header,
            vec![(MetaField::Date, "01/02/2020"), (MetaField::Seeing, "4/5")]
        );
        assert_eq!(
            report.items,
            vec![ReportItem::from_pairs([
                (ItemField::Target, "M31"),
                (ItemField::Constellation, "And"),
                (ItemField::Type, "Galaxy"),
                (ItemField::Power, "50x"),
                (ItemField::Notes, "Faint core visible"),
            ])]
        );
    }

    #[test]
    fn test_multiple_reports_separated_by_blank_lines() {
        let text = "Date\t01/02/2020\nTarget\tCons\tType\nM31\tAnd\tGalaxy\n\n\
Date\t02/02/2020\nTarget\tCons\tType\nM42\tOri\tNebula\nM43\tOri\tNebula\n";
        let parsed = parse_reports(text, &Schema::MINIMAL);
        assert_eq!(parsed.reports.len(), 2);
        assert_eq!(parsed.reports[0].items.len(), 1);
        assert_eq!(parsed.reports[1].header.date(), "02/02/2020");
        assert_eq!(parsed.reports[1].items.len(), 2);
    }

    #[test]
    fn test_short_row_is_discarded_and_earlier_items_survive() {
        let text = "Date\t01/02/2020\nTarget\tCons\tType\tPower\tNotes\n\
M31\tAnd\tGalaxy\t50x\tFaint core\n\
M32\tAnd\tGalaxy\n\
M110\tAnd\tGalaxy\t50x\tNot reached\n";
        let parsed = parse_reports(text, &Schema::EXTENDED);
        assert_eq!(parsed.reports.len(), 1);
        let targets: Vec<&str> = parsed.reports[0]
            .items
            .iter()
            .map(ReportItem::target)
            .collect();
        assert_eq!(targets, vec!["M31"]);
        assert!(matches!(
            parsed.warnings[0],
            ParseWarning::MalformedTarget {
                line: 4,
                expected: 5,
                found: 3,
                ..
            }
        ));
    }

    #[test]
    fn test_extra_fields_are_ignored() {
        let text = "Date\t01/02/2020\nTarget\tCons\tType\nM31\tAnd\tGalaxy\tspare\n";
        let parsed = parse_reports(text, &Schema::MINIMAL);
        assert!(parsed.warnings.is_empty());
        assert_eq!(parsed.reports[0].items[0].item_type(), "Galaxy");
        assert_eq!(parsed.reports[0].items[0].get(ItemField::Power), None);
    }

    #[test]
    fn test_unknown_property_is_warned_and_discarded() {
        let text = "Date\t01/02/2020\nHumidity\t80%\nSeeing\t3\nTarget\tCons\tType\tPower\n";
        let parsed = parse_reports(text, &Schema::BASIC);
        assert_eq!(parsed.reports.len(), 1);
        assert_eq!(parsed.reports[0].header.value(MetaField::Seeing), "3");
        assert_eq!(
            parsed.warnings,
            vec![ParseWarning::UnknownProperty {
                line: 2,
                date: "01/02/2020".to_string(),
                key: "Humidity".to_string(),
                value: "80%".to_string(),
            }]
        );
    }

    #[test]
    fn test_property_outside_profile_is_unknown() {
        let text = "Date\t01/02/2020\nLocation\tBackyard\n";
        let parsed = parse_reports(text, &Schema::MINIMAL);
        assert_eq!(parsed.reports[0].header.get(MetaField::Location), None);
        assert!(matches!(
            parsed.warnings[0],
            ParseWarning::UnknownProperty { .. }
        ));
    }

    #[test]
    fn test_duplicate_property_keeps_first_value() {
        let text = "Date\t01/02/2020\nSeeing\t4\nseeing\t2\n";
        let parsed = parse_reports(text, &Schema::BASIC);
        assert_eq!(parsed.reports[0].header.value(MetaField::Seeing), "4");
        assert!(matches!(
            parsed.warnings[0],
            ParseWarning::DuplicateProperty { line: 3, .. }
        ));
    }

    #[test]
    fn test_naked_eye_single_field() {
        let text = "Date\t01/02/2020\nTelescopes\nTarget\tCons\tType\tPower\nMoon\t\tMoon\t1x\n";
        let parsed = parse_reports(text, &Schema::BASIC);
        assert!(parsed.warnings.is_empty(), "{:?}", parsed.warnings);
        let report = &parsed.reports[0];
        assert_eq!(report.header.get(MetaField::Telescopes), Some(""));
        assert_eq!(report.items[0].target(), "Moon");
        assert_eq!(report.items[0].constellation(), "");
    }

    #[test]
    fn test_expected_date_warned_once_per_run() {
        let text = "Seeing\t4\nTransparency\t3\n\nfoo\n";
        let parsed = parse_reports(text, &Schema::EXTENDED);
        assert!(parsed.reports.is_empty());
        assert_eq!(parsed.warnings.len(), 1);
        assert!(matches!(
            parsed.warnings[0],
            ParseWarning::ExpectedDate { line: 1, .. }
        ));
    }

    #[test]
    fn test_comments_and_quotes() {
        let text = "# exported from a spreadsheet\n\"Date\"\t\"01/02/2020\"\n\"Target\"\t\"Cons\"\t\"Type\"\n'M31'\t'And'\t'Galaxy'\n";
        let parsed = parse_reports(text, &Schema::MINIMAL);
        assert!(parsed.warnings.is_empty(), "{:?}", parsed.warnings);
        assert_eq!(parsed.reports[0].header.date(), "01/02/2020");
        assert_eq!(parsed.reports[0].items[0].target(), "M31");
    }

    #[test]
    fn test_unterminated_report_starts_new_one() {
        let text = "Date\t01/02/2020\nTarget\tCons\tType\nM31\tAnd\tGalaxy\nDate\t03/02/2020\nTarget\tCons\tType\nM42\tOri\tNebula\n";
        let parsed = parse_reports(text, &Schema::MINIMAL);
        assert_eq!(parsed.reports.len(), 2);
        assert_eq!(parsed.reports[1].header.date(), "03/02/2020");
        assert_eq!(parsed.reports[1].items[0].target(), "M42");
        assert!(matches!(
            parsed.warnings[0],
            ParseWarning::UnterminatedReport { line: 4, .. }
        ));
    }

    #[test]
    fn test_empty_target_is_discarded() {
        let text = "Date\t01/02/2020\nTarget\tCons\tType\n\tAnd\tGalaxy\nM31\tAnd\tGalaxy\n";
        let parsed = parse_reports(text, &Schema::MINIMAL);
        assert_eq!(parsed.reports[0].items.len(), 1);
        assert!(matches!(
            parsed.warnings[0],
            ParseWarning::EmptyTarget { line: 3, .. }
        ));
    }

    #[test]
    fn test_invalid_date_is_kept() {
        let text = "Date\t2020-02-01\nTarget\tCons\tType\nM31\tAnd\tGalaxy\n";
        let parsed = parse_reports(text, &Schema::MINIMAL);
        assert_eq!(parsed.reports[0].header.date(), "2020-02-01");
        assert!(matches!(
            parsed.warnings[0],
            ParseWarning::InvalidDate { line: 1, .. }
        ));
    }

    #[test]
    fn test_report_without_items_is_legal() {
        let parsed = parse_reports("Date\t01/02/2020\nSeeing\t4\n", &Schema::BASIC);
        assert_eq!(parsed.reports.len(), 1);
        assert!(parsed.reports[0].items.is_empty());
    }

    #[test]
    fn test_crlf_line_endings() {
        let text = "Date\t01/02/2020\r\nTarget\tCons\tType\r\nM31\tAnd\tGalaxy\r\n";
        let parsed = parse_reports(text, &Schema::MINIMAL);
        assert!(parsed.warnings.is_empty(), "{:?}", parsed.warnings);
        assert_eq!(parsed.reports[0].items[0].item_type(), "Galaxy");
    }
}
