//! # pointcost - Deterministic Point-Cost Engine for Army Lists
//!
//! A table-driven engine that prices tabletop wargame units:
//! - **Deterministic**: same input always yields the same points
//! - **Data-driven**: every modifier lives in a swappable [`Ruleset`]
//! - **Forgiving**: unknown tags, ranges and abilities degrade to neutral
//!   values instead of failing
//!
//! ## Cost Pipeline
//!
//! ```text
//! [UnitProfile] ─┐
//! [WeaponProfile]├─> [CostEngine] ─> [UnitCost] ─> [RosterSummary]
//! [Tag abilities]┘        │
//!                    [Ruleset tables]
//! ```
//!
//! 1. **Base cost** multiplies quality, defense and toughness modifiers
//! 2. **Weapon cost** combines range, hit chance, AP and tag multipliers
//! 3. **Ability cost** scales a per-toughness constant
//! 4. **Unit total** rounds `per_model × count` once
//!
//! ## Example
//!
//! ```rust
//! use pointcost::*;
//!
//! let unit = UnitProfile::new(4, 4, 1);
//! let rifle = WeaponProfile::new("24", 2.0, 0);
//!
//! assert!((compute_base_model_cost(4, 4, 1, &TagList::new()) - 6.65).abs() < 1e-9);
//! assert_eq!(compute_unit_total_cost(&unit, Some(&rifle), &[], 1).unwrap(), 9);
//! ```
//!
//! ## Modules
//!
//! - [`engine`] - The cost engine
//! - [`ruleset`] - Tables and constants for one edition of the rules
//! - [`table`] - Lookup tables with explicit defaults
//! - [`defense`] - Defense table selection by unit flags
//! - [`hit`] - Hit-chance rules
//! - [`tag`] - Structured tags and tag parsing
//! - [`profile`] - Unit and weapon input records
//! - [`breakdown`] - Per-unit cost breakdowns
//! - [`roster`] - Army lists and point limits
//! - [`error`] - Error types

pub mod breakdown;
pub mod defense;
pub mod engine;
pub mod error;
pub mod hit;
pub mod profile;
pub mod roster;
pub mod ruleset;
pub mod table;
pub mod tag;

// Re-export main types for convenience
pub use breakdown::{CostLine, UnitCost};
pub use defense::{DefenseTables, DefenseVariant};
pub use engine::CostEngine;
pub use error::CostError;
pub use profile::{UnitProfile, WeaponProfile};
pub use roster::{Roster, RosterEntry, RosterSummary};
pub use ruleset::{CostConstants, Ruleset, ToughnessTable};
pub use table::ModifierTable;
pub use tag::{Tag, TagList, TagName};

use std::sync::OnceLock;

fn standard_engine() -> &'static CostEngine {
    static ENGINE: OnceLock<CostEngine> = OnceLock::new();
    ENGINE.get_or_init(CostEngine::standard)
}

/// Base model cost under the standard ruleset.
pub fn compute_base_model_cost(quality: u8, defense: u8, toughness: u32, flags: &TagList) -> f64 {
    standard_engine().base_model_cost(quality, defense, toughness, flags)
}

/// Weapon cost under the standard ruleset.
pub fn compute_weapon_cost(
    weapon: &WeaponProfile,
    unit_quality: u8,
    unit_flags: &TagList,
) -> Result<f64, CostError> {
    standard_engine().weapon_cost(weapon, unit_quality, unit_flags)
}

/// Ability cost under the standard ruleset.
pub fn compute_ability_cost(name: &str, toughness: u32, param: Option<i64>) -> f64 {
    standard_engine().ability_cost(name, toughness, param)
}

/// Unit total under the standard ruleset.
pub fn compute_unit_total_cost(
    unit: &UnitProfile,
    weapon: Option<&WeaponProfile>,
    abilities: &[Tag],
    count: u32,
) -> Result<i64, CostError> {
    standard_engine().unit_total_cost(unit, weapon, abilities, count)
}

/// Roster total under the standard ruleset.
pub fn compute_roster_total_cost(entries: &[RosterEntry]) -> Result<i64, CostError> {
    standard_engine().roster_total_cost(entries)
}
