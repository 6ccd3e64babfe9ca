//! Catalogue classification and ordering of target keys
//!
//! Target keys are the lower-cased, whitespace-free file names computed by
//! the by-target grouping (`m31_and`, `ngc7000_cyg`, `jupiter`, ...). Each
//! key belongs to exactly one [`CatalogueFamily`]; families are listed in a
//! fixed order and keys inside a family are ordered by catalogue number.

use regex::Regex;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::sync::OnceLock;

/// Group of targets sharing a catalogue
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CatalogueFamily {
    /// Sun, Moon, planets, asteroids, comets and conjunctions
    SolarSystem,
    /// The Milky Way itself
    MilkyWay,
    /// Messier
    Messier,
    /// New General Catalogue
    Ngc,
    /// Index Catalogue
    Ic,
    /// Stock open clusters
    Stock,
    /// Melotte
    Melotte,
    /// Collinder
    Collinder,
    /// Perek-Kohoutek planetary nebulae
    PerekKohoutek,
    /// Barnard dark nebulae
    Barnard,
    /// Hickson Compact Groups
    Hickson,
    /// Abell
    Abell,
    /// Uppsala General Catalogue
    Ugc,
    /// Stephenson
    Steph,
    /// Stars and anything not matched above
    Unclassified,
}

impl CatalogueFamily {
    /// Every family, in output order
    pub const ALL: [CatalogueFamily; 15] = [
        CatalogueFamily::SolarSystem,
        CatalogueFamily::MilkyWay,
        CatalogueFamily::Messier,
        CatalogueFamily::Ngc,
        CatalogueFamily::Ic,
        CatalogueFamily::Stock,
        CatalogueFamily::Melotte,
        CatalogueFamily::Collinder,
        CatalogueFamily::PerekKohoutek,
        CatalogueFamily::Barnard,
        CatalogueFamily::Hickson,
        CatalogueFamily::Abell,
        CatalogueFamily::Ugc,
        CatalogueFamily::Steph,
        CatalogueFamily::Unclassified,
    ];

    /// Section title used in the by-target journal
    pub fn title(self) -> &'static str {
        match self {
            CatalogueFamily::SolarSystem => "Solar System",
            CatalogueFamily::MilkyWay => "Milky Way",
            CatalogueFamily::Messier => "Messier Catalogue",
            CatalogueFamily::Ngc => "New General Catalogue (NGC)",
            CatalogueFamily::Ic => "Index Catalogue (IC)",
            CatalogueFamily::Stock => "Stock Catalogue",
            CatalogueFamily::Melotte => "Melotte Catalogue",
            CatalogueFamily::Collinder => "Collinder Catalogue",
            CatalogueFamily::PerekKohoutek => "Perek-Kohoutek Catalogue",
            CatalogueFamily::Barnard => "Barnard Catalogue",
            CatalogueFamily::Hickson => "Hickson Compact Group Catalogue",
            CatalogueFamily::Abell => "Abell Catalogue",
            CatalogueFamily::Ugc => "Uppsala General Catalogue",
            CatalogueFamily::Steph => "Stephenson Catalogue",
            CatalogueFamily::Unclassified => "Stars and unclassified targets",
        }
    }

    /// Whether keys of this family are ordered by catalogue number
    pub fn is_numbered(self) -> bool {
        !matches!(
            self,
            CatalogueFamily::SolarSystem | CatalogueFamily::MilkyWay | CatalogueFamily::Unclassified
        )
    }

    fn pattern(self) -> Option<&'static str> {
        let pattern = match self {
            CatalogueFamily::SolarSystem => {
                r"^(sun|moon|mercury|venus|mars|asteroid|jupiter|saturn|uranus|neptune|pluto|comet)"
            }
            CatalogueFamily::MilkyWay => r"^milkyway",
            CatalogueFamily::Messier => r"^m[0-9]",
            CatalogueFamily::Ngc => r"^ngc[0-9]",
            CatalogueFamily::Ic => r"^ic[0-9]",
            CatalogueFamily::Stock => r"^stock[0-9]",
            CatalogueFamily::Melotte => r"^mel[0-9]",
            CatalogueFamily::Collinder => r"^cr[0-9]",
            CatalogueFamily::PerekKohoutek => r"^pk[0-9]",
            CatalogueFamily::Barnard => r"^(b|barnard)[0-9]",
            CatalogueFamily::Hickson => r"^hcg[0-9]",
            CatalogueFamily::Abell => r"^abell[0-9]",
            CatalogueFamily::Ugc => r"^ugc[0-9]",
            CatalogueFamily::Steph => r"^steph[0-9]",
            CatalogueFamily::Unclassified => return None,
        };
        Some(pattern)
    }
}

/// Canonical order of solar system bodies
pub const SOLAR_SYSTEM_ORDER: [&str; 12] = [
    "sun", "moon", "mercury", "venus", "mars", "asteroid", "jupiter", "saturn", "uranus", "neptune",
    "pluto", "comet",
];

/// Classification rules, evaluated in order; the first match wins
fn rules() -> &'static [(CatalogueFamily, Regex)] {
    static RULES: OnceLock<Vec<(CatalogueFamily, Regex)>> = OnceLock::new();
    RULES.get_or_init(|| {
        CatalogueFamily::ALL
            .into_iter()
            .filter_map(|family| {
                let pattern = family.pattern()?;
                match Regex::new(&format!("(?i){pattern}")) {
                    Ok(regex) => Some((family, regex)),
                    Err(e) => {
                        log::error!("Invalid catalogue pattern for {}: {e}", family.title());
                        None
                    }
                }
            })
            .collect()
    })
}

/// Determine the catalogue family of a target key
pub fn classify(key: &str) -> CatalogueFamily {
    rules()
        .iter()
        .find(|(_, regex)| regex.is_match(key))
        .map_or(CatalogueFamily::Unclassified, |(family, _)| *family)
}

/// All decimal digits of the key read as one number
///
/// Keys without digits give 0; numbers too large for `u64` saturate.
pub fn catalogue_number(key: &str) -> u64 {
    let digits: String = key.chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return 0;
    }
    digits.parse().unwrap_or(u64::MAX)
}

/// Position of a key among the canonical solar system bodies
///
/// Conjunctions and named minor bodies rank after every canonical body.
fn solar_system_rank(key: &str) -> usize {
    let key = key.to_lowercase();
    SOLAR_SYSTEM_ORDER
        .iter()
        .position(|body| *body == key)
        .unwrap_or(SOLAR_SYSTEM_ORDER.len())
}

fn compare_lexicographic(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase()).then_with(|| a.cmp(b))
}

/// Compare two keys of the same family
pub fn compare_within_family(family: CatalogueFamily, a: &str, b: &str) -> Ordering {
    match family {
        CatalogueFamily::SolarSystem => solar_system_rank(a)
            .cmp(&solar_system_rank(b))
            .then_with(|| compare_lexicographic(a, b)),
        CatalogueFamily::MilkyWay | CatalogueFamily::Unclassified => compare_lexicographic(a, b),
        _ => catalogue_number(a)
            .cmp(&catalogue_number(b))
            .then_with(|| compare_lexicographic(a, b)),
    }
}

/// Total order over target keys: by family, then within the family
///
/// # Example
/// ```
/// use astrojournal::catalogue::compare_targets;
///
/// let mut targets = vec!["M9", "M31", "M2"];
/// targets.sort_by(|a, b| compare_targets(a, b));
/// assert_eq!(targets, vec!["M2", "M9", "M31"]);
/// ```
pub fn compare_targets(a: &str, b: &str) -> Ordering {
    let family_a = classify(a);
    let family_b = classify(b);
    family_a
        .cmp(&family_b)
        .then_with(|| compare_within_family(family_a, a, b))
}

/// Sort keys in catalogue order
pub fn sort_keys<S: AsRef<str>>(keys: &mut [S]) {
    keys.sort_by(|a, b| compare_targets(a.as_ref(), b.as_ref()));
}

/// Bucket keys by family, each bucket in catalogue order
pub fn partition<I, S>(keys: I) -> BTreeMap<CatalogueFamily, Vec<String>>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut buckets: BTreeMap<CatalogueFamily, Vec<String>> = BTreeMap::new();
    for key in keys {
        let key = key.into();
        buckets.entry(classify(&key)).or_default().push(key);
    }
    for (family, bucket) in &mut buckets {
        bucket.sort_by(|a, b| compare_within_family(*family, a, b));
    }
    buckets
}
