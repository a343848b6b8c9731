//! Season/team filtering and fee sums.

use crate::constants::{ALL_SEASONS, ALL_TEAMS};
use crate::types::TransferRecord;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::{BTreeSet, HashMap};
use tracing::{debug, instrument};

/// A season or team filter: one value or the wildcard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    All,
    Specific(String),
}

impl Selector {
    /// Wildcard spellings: empty, `all`, `All Seasons`, `All Teams` (any case).
    pub fn parse(value: &str) -> Self {
        let trimmed = value.trim();
        let is_wildcard = trimmed.is_empty()
            || trimmed.eq_ignore_ascii_case("all")
            || trimmed.eq_ignore_ascii_case(ALL_SEASONS)
            || trimmed.eq_ignore_ascii_case(ALL_TEAMS);
        if is_wildcard {
            Selector::All
        } else {
            Selector::Specific(trimmed.to_string())
        }
    }

    pub fn specific(&self) -> Option<&str> {
        match self {
            Selector::All => None,
            Selector::Specific(value) => Some(value.as_str()),
        }
    }
}

impl From<Option<String>> for Selector {
    fn from(value: Option<String>) -> Self {
        value.map(|v| Selector::parse(&v)).unwrap_or(Selector::All)
    }
}

/// Sums per key, in the order keys were first seen.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Grouped {
    entries: Vec<(String, Decimal)>,
}

impl Grouped {
    pub fn add(&mut self, key: &str, amount: Decimal) {
        match self.entries.iter_mut().find(|(k, _)| k == key) {
            Some(entry) => entry.1 += amount,
            None => self.entries.push((key.to_string(), amount)),
        }
    }

    pub fn get(&self, key: &str) -> Option<Decimal> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| *v)
    }

    pub fn entries(&self) -> &[(String, Decimal)] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Result of [`aggregate`], chosen by how specific the two selectors are.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Aggregation {
    /// Both selectors were wildcards; nothing was computed.
    InsufficientSelection,
    /// One team across all seasons.
    BySeason(Grouped),
    /// One season across all teams.
    ByTeam(Grouped),
    /// One team in one season.
    Total(Decimal),
}

/// Case-insensitive substring match on the destination club. Partial names match
/// on purpose, so a short name can also hit longer club names containing it.
pub fn team_matches(to_club: &str, team: &str) -> bool {
    to_club.to_lowercase().contains(&team.to_lowercase())
}

#[instrument(skip(records), fields(records = records.len()))]
pub fn aggregate(records: &[TransferRecord], season: &Selector, team: &Selector) -> Aggregation {
    if season.specific().is_none() && team.specific().is_none() {
        return Aggregation::InsufficientSelection;
    }

    let selected: Vec<(&TransferRecord, Decimal)> = records
        .iter()
        .filter(|r| season.specific().map_or(true, |s| r.season == s))
        .filter(|r| team.specific().map_or(true, |t| team_matches(&r.to_club, t)))
        .filter_map(|r| r.fee.map(|fee| (r, fee)))
        .collect();
    debug!("{} records with fees match the selection", selected.len());

    match (season.specific(), team.specific()) {
        (None, Some(_)) => {
            let mut grouped = Grouped::default();
            for (record, fee) in selected {
                grouped.add(&record.season, fee);
            }
            Aggregation::BySeason(grouped)
        }
        (Some(_), None) => {
            let mut grouped = Grouped::default();
            for (record, fee) in selected {
                grouped.add(&record.to_club, fee);
            }
            Aggregation::ByTeam(grouped)
        }
        _ => Aggregation::Total(selected.iter().map(|(_, fee)| *fee).sum()),
    }
}

/// Values offered for selection: sorted unique seasons and non-empty destination teams.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SelectionOptions {
    pub seasons: Vec<String>,
    pub teams: Vec<String>,
}

impl SelectionOptions {
    pub fn from_records(records: &[TransferRecord]) -> Self {
        let seasons: BTreeSet<&str> = records.iter().map(|r| r.season.as_str()).collect();
        let teams: BTreeSet<&str> = records
            .iter()
            .map(|r| r.to_club.as_str())
            .filter(|t| !t.is_empty())
            .collect();
        Self {
            seasons: seasons.into_iter().map(String::from).collect(),
            teams: teams.into_iter().map(String::from).collect(),
        }
    }
}

/// Count of records per season, used for diagnostics in the CLI.
pub fn season_counts(records: &[TransferRecord]) -> HashMap<&str, usize> {
    let mut counts = HashMap::new();
    for record in records {
        *counts.entry(record.season.as_str()).or_insert(0) += 1;
    }
    counts
}
