//! Per-target grouping
//!
//! Every item is filed under its target key. The whole map is built in one
//! pass, so each target's fragment can later be rendered in one go with its
//! title and every mention available.

use super::{target_key, TargetKind};
use crate::catalogue::{self, CatalogueFamily};
use crate::report_model::{Report, ReportHeader, ReportItem};
use std::collections::BTreeMap;

/// One observation of a target: the session it was seen in and the row
#[derive(Debug, Clone, Copy)]
pub struct Mention<'a> {
    /// Header of the report the item belongs to
    pub header: &'a ReportHeader,
    /// The item row
    pub item: &'a ReportItem,
}

/// Every mention of one target
#[derive(Debug, Clone)]
pub struct GroupedTarget<'a> {
    /// Fragment file stem
    pub key: String,
    /// Naming rules that apply to this target
    pub kind: TargetKind,
    /// Catalogue family of the key
    pub family: CatalogueFamily,
    /// Mentions in report order
    pub mentions: Vec<Mention<'a>>,
}

impl GroupedTarget<'_> {
    /// Parts of the section title, unescaped
    ///
    /// Taken from the first mention: `target, type` for solar system bodies
    /// and the Milky Way, `constellation, target, type` for stars and
    /// `target, constellation, type` for everything else.
    pub fn title_parts(&self) -> Vec<&str> {
        let Some(first) = self.mentions.first() else {
            return vec![self.key.as_str()];
        };
        let item = first.item;
        let parts = match self.kind {
            TargetKind::SolarSystem | TargetKind::MinorBody | TargetKind::MilkyWay => {
                vec![item.target(), item.item_type()]
            }
            TargetKind::Star => vec![item.constellation(), item.target(), item.item_type()],
            TargetKind::DeepSky => vec![item.target(), item.constellation(), item.item_type()],
        };
        parts.into_iter().filter(|part| !part.is_empty()).collect()
    }
}

/// Group every item of every report by target key, in catalogue order
pub fn group_by_target(reports: &[Report]) -> Vec<GroupedTarget<'_>> {
    let mut targets: BTreeMap<String, GroupedTarget<'_>> = BTreeMap::new();

    for report in reports {
        for item in &report.items {
            let key = target_key(item);
            let mention = Mention {
                header: &report.header,
                item,
            };
            targets
                .entry(key)
                .or_insert_with_key(|key| GroupedTarget {
                    key: key.clone(),
                    kind: TargetKind::of(item),
                    family: catalogue::classify(key),
                    mentions: Vec::new(),
                })
                .mentions
                .push(mention);
        }
    }

    let mut grouped: Vec<GroupedTarget<'_>> = targets.into_values().collect();
    grouped.sort_by(|a, b| catalogue::compare_targets(&a.key, &b.key));
    log::debug!("Grouped {} distinct targets", grouped.len());
    grouped
}
