//! Aggregate statistics over the whole journal
//!
//! Collected in one pass over the report list and rendered as an appendix
//! of the by-date and by-target journals.

use crate::report_model::{MetaField, Report};
use std::collections::{BTreeMap, HashSet};

/// Reports and sky condition readings of one observing site
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LocationStats {
    /// Site name as first spelled in the reports
    pub name: String,
    /// Number of reports written at the site
    pub reports: usize,
    seeing: Vec<f64>,
    transparency: Vec<f64>,
    darkness: Vec<f64>,
}

impl LocationStats {
    /// Mean of the readable seeing values
    pub fn average_seeing(&self) -> Option<f64> {
        mean(&self.seeing)
    }

    /// Mean of the readable transparency values
    pub fn average_transparency(&self) -> Option<f64> {
        mean(&self.transparency)
    }

    /// Mean of the readable darkness values
    pub fn average_darkness(&self) -> Option<f64> {
        mean(&self.darkness)
    }
}

/// Journal-wide counts
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Statistics {
    type_counts: BTreeMap<String, usize>,
    locations: BTreeMap<String, LocationStats>,
    reports_per_year: BTreeMap<i32, usize>,
    reports_per_month: BTreeMap<u32, usize>,
    reports: usize,
}

impl Statistics {
    /// Collect statistics from every report
    ///
    /// Types are counted once per distinct target (first mention wins,
    /// target names compared case-insensitively). Reports without a valid
    /// date still count towards locations.
    pub fn collect(reports: &[Report]) -> Self {
        let mut stats = Self::default();
        let mut seen_targets: HashSet<String> = HashSet::new();

        for report in reports {
            stats.reports += 1;

            for item in &report.items {
                let target = item.target().trim().to_lowercase();
                if !seen_targets.insert(target) {
                    continue;
                }
                let item_type = item.item_type().trim().to_lowercase();
                if !item_type.is_empty() {
                    *stats.type_counts.entry(item_type).or_insert(0) += 1;
                }
            }

            let location = report.header.value(MetaField::Location).trim();
            if !location.is_empty() {
                let entry = stats
                    .locations
                    .entry(location.to_lowercase())
                    .or_insert_with(|| LocationStats {
                        name: location.to_string(),
                        ..LocationStats::default()
                    });
                entry.reports += 1;
                let readings = [
                    (MetaField::Seeing, &mut entry.seeing),
                    (MetaField::Transparency, &mut entry.transparency),
                    (MetaField::Darkness, &mut entry.darkness),
                ];
                for (field, values) in readings {
                    if let Some(reading) = leading_number(report.header.value(field)) {
                        values.push(reading);
                    }
                }
            }

            match report.date() {
                Ok(date) => {
                    *stats.reports_per_year.entry(date.year()).or_insert(0) += 1;
                    *stats.reports_per_month.entry(date.month()).or_insert(0) += 1;
                }
                Err(e) => log::debug!("Report [{}] not counted per year: {e}", report.header.date()),
            }
        }

        stats
    }

    /// Total number of reports
    pub fn report_count(&self) -> usize {
        self.reports
    }

    /// Distinct targets per lower-cased type
    pub fn type_counts(&self) -> &BTreeMap<String, usize> {
        &self.type_counts
    }

    /// Reports per site, keyed by the site's first spelling
    pub fn location_counts(&self) -> BTreeMap<String, usize> {
        self.locations
            .values()
            .map(|location| (location.name.clone(), location.reports))
            .collect()
    }

    /// Per-site details, sorted case-insensitively by name
    pub fn locations(&self) -> impl Iterator<Item = &LocationStats> {
        self.locations.values()
    }

    /// Reports per year
    pub fn reports_per_year(&self) -> &BTreeMap<i32, usize> {
        &self.reports_per_year
    }

    /// Average number of reports in each calendar month across the
    /// observed years
    pub fn monthly_average(&self) -> BTreeMap<u32, f64> {
        let years = self.reports_per_year.len();
        if years == 0 {
            return BTreeMap::new();
        }
        self.reports_per_month
            .iter()
            .map(|(month, count)| (*month, ratio(*count, years)))
            .collect()
    }
}

#[allow(clippy::cast_precision_loss)]
fn ratio(count: usize, total: usize) -> f64 {
    count as f64 / total as f64
}

#[allow(clippy::cast_precision_loss)]
fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

/// Numeric prefix of a reading such as `4/5`, `2 - slight` or `20.4 mag`
fn leading_number(value: &str) -> Option<f64> {
    let value = value.trim();
    let end = value
        .char_indices()
        .find(|(_, c)| !(c.is_ascii_digit() || *c == '.'))
        .map_or(value.len(), |(index, _)| index);
    value[..end].parse().ok()
}
