//! Report profiles
//!
//! A profile decides which columns a raw report may carry. The set is closed
//! and registered statically; each profile can also be named by the aliases
//! older journals used.

use crate::report_model::Schema;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Report profile
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Profile {
    /// Date, then target, constellation and type per row
    #[serde(alias = "mini", alias = "minigen")]
    #[value(alias = "mini")]
    Minimal,
    /// Adds seeing, transparency, telescopes and magnification
    #[serde(alias = "basicgen")]
    Basic,
    /// Full session metadata and notes per target
    #[default]
    #[serde(alias = "ext", alias = "extgen")]
    #[value(alias = "ext")]
    Extended,
}

impl Profile {
    /// Column schema of the profile
    pub fn schema(self) -> &'static Schema {
        match self {
            Profile::Minimal => &Schema::MINIMAL,
            Profile::Basic => &Schema::BASIC,
            Profile::Extended => &Schema::EXTENDED,
        }
    }

    /// Canonical name
    pub fn name(self) -> &'static str {
        self.schema().name()
    }

    /// One-line description for `list-profiles`
    pub fn description(self) -> &'static str {
        match self {
            Profile::Minimal => "date only; target, constellation and type per row",
            Profile::Basic => "seeing, transparency and telescopes; adds magnification per row",
            Profile::Extended => "time, place, conditions and equipment; adds notes per row",
        }
    }

    /// Other names accepted for the profile
    pub fn aliases(self) -> &'static [&'static str] {
        match self {
            Profile::Minimal => &["mini", "minigen"],
            Profile::Basic => &["basicgen"],
            Profile::Extended => &["ext", "extgen"],
        }
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Every registered profile
pub fn get_all_profiles() -> [Profile; 3] {
    [Profile::Minimal, Profile::Basic, Profile::Extended]
}

/// Find a profile by name or alias, ignoring case
pub fn get_profile(name: &str) -> Option<Profile> {
    let mut lookup: HashMap<&'static str, Profile> = HashMap::new();
    for profile in get_all_profiles() {
        lookup.insert(profile.name(), profile);
        for alias in profile.aliases() {
            lookup.insert(*alias, profile);
        }
    }
    lookup.get(name.to_lowercase().as_str()).copied()
}

/// Error for an unknown profile name
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown profile '{0}' (expected minimal, basic or extended)")]
pub struct UnknownProfile(pub String);

impl FromStr for Profile {
    type Err = UnknownProfile;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        get_profile(s).ok_or_else(|| UnknownProfile(s.to_string()))
    }
}
