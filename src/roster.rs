//! Rosters.
//!
//! A roster is the army list itself: a set of unit entries and an optional
//! point limit. Pricing a roster never depends on entry order.

use crate::breakdown::{checked_total, UnitCost};
use crate::engine::CostEngine;
use crate::error::CostError;
use crate::profile::{UnitProfile, WeaponProfile};
use crate::tag::Tag;
use serde::{Deserialize, Serialize};

/// One line of an army list: `count` identical models.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RosterEntry {
    /// Display name, not used for pricing.
    #[serde(default)]
    pub label: String,
    pub unit: UnitProfile,
    #[serde(default)]
    pub weapon: Option<WeaponProfile>,
    #[serde(default)]
    pub abilities: Vec<Tag>,
    pub count: u32,
}

impl RosterEntry {
    pub fn new(unit: UnitProfile, count: u32) -> Self {
        Self {
            label: String::new(),
            unit,
            weapon: None,
            abilities: Vec::new(),
            count,
        }
    }

    pub fn labelled(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn with_weapon(mut self, weapon: WeaponProfile) -> Self {
        self.weapon = Some(weapon);
        self
    }

    /// Add an ability, parsing the `name(value)` form.
    pub fn with_ability(mut self, ability: &str) -> Self {
        self.abilities.push(Tag::parse(ability));
        self
    }
}

/// An army list with an optional point limit.
///
/// # Examples
///
/// ```rust
/// use pointcost::{CostEngine, Roster, RosterEntry, UnitProfile};
///
/// let engine = CostEngine::standard();
/// let mut roster = Roster::new("Vanguard").with_limit(100);
/// roster.add(RosterEntry::new(UnitProfile::new(4, 4, 1), 10));
///
/// let summary = roster.summarize(&engine).unwrap();
/// assert_eq!(summary.total, 67); // round(6.65 × 10)
/// assert_eq!(summary.remaining(), Some(33));
/// assert!(summary.is_within_limit());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Roster {
    pub name: String,
    #[serde(default)]
    pub point_limit: Option<i64>,
    #[serde(default)]
    pub entries: Vec<RosterEntry>,
}

impl Roster {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            point_limit: None,
            entries: Vec::new(),
        }
    }

    pub fn with_limit(mut self, limit: i64) -> Self {
        self.point_limit = Some(limit);
        self
    }

    pub fn add(&mut self, entry: RosterEntry) {
        self.entries.push(entry);
    }

    /// Total points of every entry.
    pub fn total_cost(&self, engine: &CostEngine) -> Result<i64, CostError> {
        engine.roster_total_cost(&self.entries)
    }

    /// Price every entry and compare against the limit.
    pub fn summarize(&self, engine: &CostEngine) -> Result<RosterSummary, CostError> {
        let units = self
            .entries
            .iter()
            .map(|entry| engine.price_entry(entry))
            .collect::<Result<Vec<_>, _>>()?;
        let total = checked_total(units.iter().map(|unit| unit.total))?;

        tracing::debug!(roster = %self.name, total, limit = ?self.point_limit, "summarized roster");
        Ok(RosterSummary {
            name: self.name.clone(),
            units,
            total,
            limit: self.point_limit,
        })
    }

    /// Roster total, or an error if it exceeds the point limit.
    ///
    /// A roster without a limit always passes.
    pub fn check_limit(&self, engine: &CostEngine) -> Result<i64, CostError> {
        let total = self.total_cost(engine)?;
        match self.point_limit {
            Some(limit) if total > limit => {
                tracing::warn!(roster = %self.name, total, limit, "roster over point limit");
                Err(CostError::PointLimitExceeded { total, limit })
            }
            _ => Ok(total),
        }
    }
}

/// Priced roster for summary and print views.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RosterSummary {
    pub name: String,
    /// One breakdown per entry, in roster order.
    pub units: Vec<UnitCost>,
    pub total: i64,
    pub limit: Option<i64>,
}

impl RosterSummary {
    /// Points left under the limit; negative when over.
    pub fn remaining(&self) -> Option<i64> {
        self.limit.map(|limit| limit - self.total)
    }

    pub fn is_within_limit(&self) -> bool {
        self.limit.map_or(true, |limit| self.total <= limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grunts(count: u32) -> RosterEntry {
        RosterEntry::new(UnitProfile::new(4, 4, 1), count).labelled("Grunts")
    }

    #[test]
    fn test_empty_roster() {
        let engine = CostEngine::standard();
        let roster = Roster::new("Empty").with_limit(0);
        assert_eq!(roster.total_cost(&engine).unwrap(), 0);
        assert_eq!(roster.check_limit(&engine).unwrap(), 0);
    }

    #[test]
    fn test_check_limit_exceeded() {
        let engine = CostEngine::standard();
        let mut roster = Roster::new("Too Big").with_limit(10);
        roster.add(grunts(2));
        assert_eq!(
            roster.check_limit(&engine),
            Err(CostError::PointLimitExceeded {
                total: 13,
                limit: 10
            })
        );
    }

    #[test]
    fn test_no_limit_always_within() {
        let engine = CostEngine::standard();
        let mut roster = Roster::new("Open");
        roster.add(grunts(100));
        let summary = roster.summarize(&engine).unwrap();
        assert!(summary.is_within_limit());
        assert_eq!(summary.remaining(), None);
        assert_eq!(summary.units.len(), 1);
    }

    #[test]
    fn test_invalid_entry_fails_summary() {
        let engine = CostEngine::standard();
        let mut roster = Roster::new("Broken");
        roster.add(grunts(1));
        roster.add(grunts(0));
        assert_eq!(roster.summarize(&engine), Err(CostError::InvalidCount(0)));
    }

    #[test]
    fn test_roster_from_json() {
        let roster: Roster = serde_json::from_str(
            r#"{
                "name": "Raiders",
                "point_limit": 500,
                "entries": [
                    {
                        "unit": { "quality": 4, "defense": 4, "toughness": 1 },
                        "weapon": { "range": "24", "attacks": 2 },
                        "abilities": ["Fast"],
                        "count": 5
                    }
                ]
            }"#,
        )
        .unwrap();
        assert_eq!(roster.entries[0].abilities[0].name.as_str(), "fast");
        let engine = CostEngine::standard();
        // round((6.65 + 2.5 + 1.0) × 5) = round(50.75)
        assert_eq!(roster.total_cost(&engine).unwrap(), 51);
    }
}
