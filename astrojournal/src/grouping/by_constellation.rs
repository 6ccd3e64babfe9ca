//! Per-constellation grouping of deep-sky objects and stars

use super::TargetKind;
use crate::catalogue;
use crate::report_model::Report;
use std::collections::{BTreeMap, BTreeSet};

/// Distinct targets seen in one constellation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstellationGroup {
    /// Constellation as written in the reports
    pub constellation: String,
    /// `(target, type)` pairs in catalogue order
    pub targets: Vec<(String, String)>,
}

impl ConstellationGroup {
    /// Fragment file stem, `const_<constellation>`
    pub fn fragment(&self) -> String {
        format!("const_{}", super::normalize_key_part(&self.constellation))
    }
}

/// Collect the distinct targets of each constellation
///
/// Solar system bodies and the Milky Way are left out, as are items with
/// no constellation. Groups come out sorted by constellation name.
pub fn group_by_constellation(reports: &[Report]) -> Vec<ConstellationGroup> {
    let mut constellations: BTreeMap<String, BTreeSet<(String, String)>> = BTreeMap::new();

    for item in reports.iter().flat_map(|report| &report.items) {
        if !TargetKind::of(item).has_constellation() {
            continue;
        }
        let constellation = item.constellation().trim();
        if constellation.is_empty() {
            log::debug!("{} has no constellation, not listed", item.target());
            continue;
        }
        constellations
            .entry(constellation.to_string())
            .or_default()
            .insert((item.target().to_string(), item.item_type().to_string()));
    }

    constellations
        .into_iter()
        .map(|(constellation, targets)| {
            let mut targets: Vec<(String, String)> = targets.into_iter().collect();
            targets.sort_by(|(a, type_a), (b, type_b)| {
                catalogue::compare_targets(a, b).then_with(|| type_a.cmp(type_b))
            });
            ConstellationGroup {
                constellation,
                targets,
            }
        })
        .collect()
}
