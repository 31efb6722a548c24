use navsweep_scanner::ResolvedLink;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// `label` resolves to a URL first claimed by `duplicate_of_label`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuplicateRecord {
    pub label: String,
    pub duplicate_of_label: String,
    pub url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DuplicateScan {
    /// Every input entry, duplicates included, in input order.
    pub all_entries: Vec<ResolvedLink>,
    pub duplicates: Vec<DuplicateRecord>,
}

/// Flag every entry whose URL was already claimed by an earlier entry.
///
/// URLs are compared as exact strings. The first claimant stays on record, so
/// every later duplicate of a URL points back to it rather than to each other.
pub fn detect_duplicates(entries: Vec<ResolvedLink>) -> DuplicateScan {
    let mut first_claimant: HashMap<&str, &str> = HashMap::new();
    let mut duplicates = Vec::new();

    for entry in &entries {
        match first_claimant.get(entry.url.as_str()) {
            Some(original) => duplicates.push(DuplicateRecord {
                label: entry.label.clone(),
                duplicate_of_label: original.to_string(),
                url: entry.url.clone(),
            }),
            None => {
                first_claimant.insert(&entry.url, &entry.label);
            }
        }
    }

    DuplicateScan {
        all_entries: entries,
        duplicates,
    }
}

/// Duplicate records of one menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuplicateGroup {
    pub menu_label: String,
    pub records: Vec<DuplicateRecord>,
}

/// Duplicates of a whole run, grouped by menu in encounter order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuplicatesSummary {
    pub groups: Vec<DuplicateGroup>,
}

impl DuplicatesSummary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a menu's records; menus without duplicates are not listed.
    ///
    /// Menus sharing a label share one group, in first-seen position.
    pub fn record(&mut self, menu_label: &str, records: &[DuplicateRecord]) {
        if records.is_empty() {
            return;
        }
        match self.groups.iter_mut().find(|g| g.menu_label == menu_label) {
            Some(group) => group.records.extend_from_slice(records),
            None => self.groups.push(DuplicateGroup {
                menu_label: menu_label.to_string(),
                records: records.to_vec(),
            }),
        }
    }

    pub fn get(&self, menu_label: &str) -> Option<&[DuplicateRecord]> {
        self.groups
            .iter()
            .find(|g| g.menu_label == menu_label)
            .map(|g| g.records.as_slice())
    }

    pub fn total(&self) -> usize {
        self.groups.iter().map(|g| g.records.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}
