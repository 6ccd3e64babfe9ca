//! Chronological grouping: one fragment per report, newest first

use crate::report_model::{ObservationDate, Report};
use std::collections::HashMap;

/// A report with a valid date and the fragment name it is written to
#[derive(Debug, Clone)]
pub struct DatedReport<'a> {
    /// Parsed report date
    pub date: ObservationDate,
    /// The report itself
    pub report: &'a Report,
    /// Fragment file stem, `obs<yyyymmdd>[x]`, unique within the grouping
    pub fragment: String,
}

/// Order reports newest first
///
/// Reports sharing a date keep their input order. A report without a
/// usable date is logged and left out of this grouping only. Reports that
/// would share a fragment name get a numeric suffix (`obs20200201-2`).
pub fn group_by_date(reports: &[Report]) -> Vec<DatedReport<'_>> {
    let mut dated: Vec<(ObservationDate, &Report)> = reports
        .iter()
        .filter_map(|report| match report.date() {
            Ok(date) => Some((date, report)),
            Err(e) => {
                log::error!(
                    "Report [{}] left out of the journal by date: {e}",
                    report.header.date()
                );
                None
            }
        })
        .collect();

    dated.sort_by(|(a, _), (b, _)| b.cmp(a));

    let mut seen: HashMap<String, usize> = HashMap::new();
    dated
        .into_iter()
        .map(|(date, report)| {
            let stem = format!("obs{}", date.file_stem());
            let count = seen.entry(stem.clone()).or_insert(0);
            *count += 1;
            let fragment = if *count == 1 {
                stem
            } else {
                format!("{stem}-{count}")
            };
            DatedReport {
                date,
                report,
                fragment,
            }
        })
        .collect()
}
