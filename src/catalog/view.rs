//! Filtering and grouping of classified records
//!
//! Everything here is a read-only view over records already classified by
//! [`crate::catalog::classify`].

use crate::catalog::record::{AppRecord, DisplayState};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Subset of apps shown in the catalog
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Filter {
    /// Every discovered app
    #[default]
    All,
    /// Apps with a registered installed copy
    Installed,
    /// Apps with a deployed Start Menu shortcut
    PortableOnStartMenu,
    /// Apps with neither a shortcut nor an installed copy
    PortableNotUsed,
}

impl Filter {
    /// All filters, in menu order
    pub const ALL: [Self; 4] = [
        Self::All,
        Self::Installed,
        Self::PortableOnStartMenu,
        Self::PortableNotUsed,
    ];

    /// Whether `record` belongs to this filter's subset
    pub fn matches(self, record: &AppRecord) -> bool {
        let status = &record.status;
        match self {
            Self::All => true,
            Self::Installed => status.is_installed,
            Self::PortableOnStartMenu => status.has_shortcut,
            Self::PortableNotUsed => !status.has_shortcut && !status.is_installed,
        }
    }

    /// Menu label
    pub fn label(self) -> &'static str {
        match self {
            Self::All => "All",
            Self::Installed => "Installed",
            Self::PortableOnStartMenu => "Portable on StartMenu",
            Self::PortableNotUsed => "Portable not used",
        }
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Filter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(Self::All),
            "installed" => Ok(Self::Installed),
            "startmenu" | "shortcut" | "portable on startmenu" => Ok(Self::PortableOnStartMenu),
            "unused" | "portable not used" => Ok(Self::PortableNotUsed),
            other => Err(format!(
                "unknown filter '{other}' (expected all, installed, startmenu or unused)"
            )),
        }
    }
}

/// Apps sharing one group label
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppGroup {
    /// Group label, `None` for ungrouped apps
    pub label: Option<String>,
    /// Indices into the record slice, sorted by app name
    pub members: Vec<usize>,
}

/// Group the records passing `filter`
///
/// Named groups come first, ordered by label; ungrouped apps form a final
/// group. Labels and names compare ordinally (case-sensitive). Groups with
/// no visible members are omitted.
pub fn group_records(records: &[AppRecord], filter: Filter) -> Vec<AppGroup> {
    let mut named: BTreeMap<&str, Vec<usize>> = BTreeMap::new();
    let mut ungrouped = Vec::new();

    for (index, record) in records.iter().enumerate() {
        if !filter.matches(record) {
            continue;
        }
        match record.marker.group_label() {
            Some(label) => named.entry(label).or_default().push(index),
            None => ungrouped.push(index),
        }
    }

    let by_name = |members: &mut Vec<usize>| {
        members.sort_by(|a, b| records[*a].name().cmp(records[*b].name()));
    };

    let mut groups: Vec<AppGroup> = named
        .into_iter()
        .map(|(label, mut members)| {
            by_name(&mut members);
            AppGroup {
                label: Some(label.to_string()),
                members,
            }
        })
        .collect();

    if !ungrouped.is_empty() {
        by_name(&mut ungrouped);
        groups.push(AppGroup {
            label: None,
            members: ungrouped,
        });
    }
    groups
}

/// Number of records in each display state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusSummary {
    /// Shortcut out of date
    pub drifted: usize,
    /// Shortcut up to date
    pub synced: usize,
    /// Installed, no shortcut
    pub installed_only: usize,
    /// Neither
    pub portable_unused: usize,
}

impl StatusSummary {
    /// Count display states over `records`
    pub fn of(records: &[AppRecord]) -> Self {
        records.iter().fold(Self::default(), |mut summary, record| {
            match record.status.display_state() {
                DisplayState::Drifted => summary.drifted += 1,
                DisplayState::Synced => summary.synced += 1,
                DisplayState::InstalledOnly => summary.installed_only += 1,
                DisplayState::PortableUnused => summary.portable_unused += 1,
            }
            summary
        })
    }

    /// Total number of records counted
    pub fn total(&self) -> usize {
        self.drifted + self.synced + self.installed_only + self.portable_unused
    }
}

impl fmt::Display for StatusSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} app(s): {} out of date, {} up to date, {} installed, {} not used",
            self.total(),
            self.drifted,
            self.synced,
            self.installed_only,
            self.portable_unused
        )
    }
}
