//! LaTeX tables for the statistics appendix

use super::latex::escape;
use crate::statistics::Statistics;
use chrono::Month;

/// Stem of the statistics fragment in the by-date folder
pub const FRAGMENT_STEM: &str = "statistics";

/// Longest location name shown in the tables
const MAX_LOCATION_LEN: usize = 30;

fn table(headers: &[&str], spec: &str, rows: &[Vec<String>]) -> String {
    let header = headers
        .iter()
        .map(|h| format!("{{\\bf {h}}}"))
        .collect::<Vec<_>>()
        .join(" & ");
    let mut out = format!("\\begin{{tabular}}[t]{{{spec}}}\n\\hline\n{header} \\\\\n\\hline\n");
    for row in rows {
        out.push_str(&row.join(" & "));
        out.push_str(" \\\\\n");
    }
    out.push_str("\\hline\n\\end{tabular}\n");
    out
}

fn average(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{v:.2}"))
}

fn month_name(month: u32) -> String {
    u8::try_from(month)
        .ok()
        .and_then(|m| Month::try_from(m).ok())
        .map_or_else(|| month.to_string(), |m| m.name().to_string())
}

/// Distinct targets per type
pub fn render_type_statistics(stats: &Statistics) -> String {
    let rows: Vec<Vec<String>> = stats
        .type_counts()
        .iter()
        .map(|(item_type, count)| vec![escape(&item_type.to_uppercase()), count.to_string()])
        .collect();
    table(&["Target Type", "Count"], "ll", &rows)
}

/// Reports and average conditions per site
pub fn render_location_statistics(stats: &Statistics) -> String {
    let rows: Vec<Vec<String>> = stats
        .locations()
        .map(|location| {
            let name: String = location.name.chars().take(MAX_LOCATION_LEN).collect();
            vec![
                escape(&name.to_uppercase()),
                location.reports.to_string(),
                average(location.average_seeing()),
                average(location.average_transparency()),
                average(location.average_darkness()),
            ]
        })
        .collect();
    table(
        &["Location", "Reports", "Seeing", "Transparency", "Darkness"],
        "lrrrr",
        &rows,
    )
}

/// Reports per year
pub fn render_year_statistics(stats: &Statistics) -> String {
    let rows: Vec<Vec<String>> = stats
        .reports_per_year()
        .iter()
        .map(|(year, count)| vec![year.to_string(), count.to_string()])
        .collect();
    table(&["Year", "Reports"], "lr", &rows)
}

/// Average reports per calendar month
pub fn render_month_statistics(stats: &Statistics) -> String {
    let rows: Vec<Vec<String>> = stats
        .monthly_average()
        .iter()
        .map(|(month, avg)| vec![month_name(*month), format!("{avg:.2}")])
        .collect();
    table(&["Month", "Average reports"], "lr", &rows)
}

/// Every statistics table, separated by vertical space
pub fn render_statistics(stats: &Statistics) -> String {
    [
        render_type_statistics(stats),
        render_location_statistics(stats),
        render_year_statistics(stats),
        render_month_statistics(stats),
    ]
    .join("\\vspace{1cm}\n\n")
}
