//! Grouping strategies
//!
//! The same report list is organised three ways before rendering:
//! chronologically, per observed target and per constellation. Each
//! strategy borrows the reports and builds its own accumulator; nothing is
//! shared between strategies, so they can run side by side.

mod by_constellation;
mod by_date;
mod by_target;

pub use by_constellation::{group_by_constellation, ConstellationGroup};
pub use by_date::{group_by_date, DatedReport};
pub use by_target::{group_by_target, GroupedTarget, Mention};

use crate::report_model::ReportItem;

/// Type names that mark a star
const STAR_TYPES: [&str; 3] = ["star", "dbl star", "mlt star"];

/// How a target is named and titled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetKind {
    /// Sun, Moon and planets, keyed by name alone
    SolarSystem,
    /// Asteroids and comets, keyed by type and name
    MinorBody,
    /// The Milky Way
    MilkyWay,
    /// Single, double and multiple stars, keyed by constellation first
    Star,
    /// Everything else: clusters, nebulae, galaxies
    DeepSky,
}

impl TargetKind {
    /// Classify an item from its target and type columns
    pub fn of(item: &ReportItem) -> Self {
        let target = item.target().trim().to_lowercase();
        let item_type = item.item_type().trim().to_lowercase();

        if item_type == "asteroid" || item_type == "comet" {
            TargetKind::MinorBody
        } else if item_type == "planet" || target == "sun" || target == "moon" {
            TargetKind::SolarSystem
        } else if target == "milky way" {
            TargetKind::MilkyWay
        } else if STAR_TYPES.contains(&item_type.as_str()) {
            TargetKind::Star
        } else {
            TargetKind::DeepSky
        }
    }

    /// Whether the target belongs in the per-constellation listing
    pub fn has_constellation(self) -> bool {
        !matches!(self, TargetKind::SolarSystem | TargetKind::MilkyWay)
    }
}

/// Lower-case a name and keep only characters safe in a file name
///
/// Whitespace and `/` are dropped; other punctuation becomes `-`.
pub fn normalize_key_part(part: &str) -> String {
    part.trim()
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '/')
        .flat_map(char::to_lowercase)
        .map(|c| {
            if c.is_alphanumeric() || c == '_' || c == '-' || c == '+' {
                c
            } else {
                '-'
            }
        })
        .collect()
}

/// File name stem of the fragment an item is grouped under
pub fn target_key(item: &ReportItem) -> String {
    let target = normalize_key_part(item.target());
    match TargetKind::of(item) {
        TargetKind::SolarSystem | TargetKind::MilkyWay => target,
        TargetKind::MinorBody => format!("{}_{target}", normalize_key_part(item.item_type())),
        TargetKind::Star => format!("{}_{target}", normalize_key_part(item.constellation())),
        TargetKind::DeepSky => format!("{target}_{}", normalize_key_part(item.constellation())),
    }
}
