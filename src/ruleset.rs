//! Rulesets.
//!
//! A [`Ruleset`] bundles every modifier table and formula constant the
//! engine reads. Tables are data, not logic: a different edition of the
//! game is a different `Ruleset` value, loaded from JSON or TOML, with no
//! change to the engine.
//!
//! Missing fields in a loaded document fall back to the standard ruleset,
//! so an override file only needs to list what it changes.

use crate::defense::DefenseTables;
use crate::error::CostError;
use crate::hit::{HitEffect, HitRule};
use crate::table::ModifierTable;
use crate::tag::TagName;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Scalar constants used by the cost formulas.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CostConstants {
    /// Multiplier in `base × quality × defense × toughness`.
    pub base_cost_factor: f64,
    /// Multiplier in `attacks × factor × range × hit × ap × tags`.
    pub weapon_cost_factor: f64,
    /// Roll target in `(target - quality) / faces`.
    pub hit_target: f64,
    pub die_faces: f64,
    /// Lower bound on any hit chance.
    pub min_hit_chance: f64,
}

impl Default for CostConstants {
    fn default() -> Self {
        Self {
            base_cost_factor: 5.0,
            weapon_cost_factor: 2.0,
            hit_target: 7.0,
            die_faces: 6.0,
            min_hit_chance: 0.1,
        }
    }
}

/// Toughness multipliers with an analytic fallback for unlisted values.
///
/// # Examples
///
/// ```rust
/// use pointcost::ruleset::Ruleset;
///
/// let toughness = &Ruleset::standard().toughness;
/// assert_eq!(toughness.modifier(3), 3.5);
/// // 4 is not listed: (4 / 3)^1.5
/// assert!((toughness.modifier(4) - (4.0f64 / 3.0).powf(1.5)).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToughnessTable {
    pub table: ModifierTable<u32>,
    pub fallback_divisor: f64,
    pub fallback_exponent: f64,
}

impl ToughnessTable {
    pub fn modifier(&self, toughness: u32) -> f64 {
        self.table.lookup(&toughness).unwrap_or_else(|| {
            tracing::trace!(toughness, "toughness not tabled, using analytic fallback");
            (f64::from(toughness) / self.fallback_divisor).powf(self.fallback_exponent)
        })
    }
}

/// The complete set of tables and constants for one edition of the rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Ruleset {
    pub name: String,
    pub version: String,
    pub constants: CostConstants,
    /// Keyed by quality value.
    pub quality: ModifierTable<u8>,
    pub defense: DefenseTables,
    pub toughness: ToughnessTable,
    /// Keyed by normalized range string (`"melee"`, `"24"`, ...).
    pub range: ModifierTable<String>,
    /// Keyed by armor-piercing value.
    pub ap: ModifierTable<i32>,
    pub hit_rules: Vec<HitRule>,
    /// Per-parameter multipliers for rated weapon tags such as `blast(x)`.
    pub rated_weapon_tags: BTreeMap<TagName, ModifierTable<i64>>,
    /// Multipliers for plain weapon tags.
    pub weapon_tags: ModifierTable<TagName>,
    /// Points per point of toughness for unit abilities. Defaults to 0.
    pub abilities: ModifierTable<TagName>,
}

impl Default for Ruleset {
    fn default() -> Self {
        Self::standard()
    }
}

fn names<'a>(entries: &'a [(&'a str, f64)]) -> impl Iterator<Item = (TagName, f64)> + 'a {
    entries.iter().map(|(name, v)| (TagName::new(name), *v))
}

impl Ruleset {
    /// The built-in standard ruleset.
    pub fn standard() -> Self {
        let defense = |values: [f64; 5]| {
            ModifierTable::from_entries([6u8, 5, 4, 3, 2].into_iter().zip(values))
        };

        Self {
            name: "standard".to_string(),
            version: "1.0".to_string(),
            constants: CostConstants::default(),
            quality: ModifierTable::from_entries([(6, 0.8), (5, 0.9), (4, 1.0), (3, 1.1), (2, 1.2)]),
            defense: DefenseTables {
                base: defense([0.8, 1.0, 1.33, 1.67, 2.0]),
                delicate: defense([0.7, 0.85, 1.1, 1.4, 1.7]),
                tough: defense([0.9, 1.15, 1.5, 1.9, 2.3]),
                regeneration: defense([1.0, 1.25, 1.65, 2.05, 2.5]),
            },
            toughness: ToughnessTable {
                table: ModifierTable::from_entries([
                    (1, 1.0),
                    (2, 2.15),
                    (3, 3.5),
                    (6, 8.0),
                    (9, 13.0),
                    (12, 18.0),
                ]),
                fallback_divisor: 3.0,
                fallback_exponent: 1.5,
            },
            range: ModifierTable::from_entries(
                [
                    ("melee", 0.6),
                    ("12", 0.65),
                    ("18", 1.0),
                    ("24", 1.25),
                    ("30", 1.45),
                    ("36", 1.55),
                ]
                .map(|(k, v)| (k.to_string(), v)),
            ),
            ap: ModifierTable::from_entries([
                (-1, 0.8),
                (0, 1.0),
                (1, 1.5),
                (2, 1.9),
                (3, 2.25),
                (4, 2.5),
                (5, 2.65),
            ]),
            hit_rules: vec![
                HitRule::new(["reliable"], HitEffect::Override(5.0 / 6.0)),
                HitRule::new(["rending"], HitEffect::Add(1.0 / 6.0)),
                HitRule::unit(["fury", "relentless"], HitEffect::Add(0.65 / 6.0)),
                HitRule::new(["impact"], HitEffect::Add(0.65 / 6.0)),
                HitRule::new(["targeting"], HitEffect::Add(0.35 / 6.0)),
                HitRule::new(["heavy"], HitEffect::Add(-0.35 / 6.0)),
            ],
            rated_weapon_tags: BTreeMap::from([
                (
                    TagName::new("blast"),
                    ModifierTable::from_entries([(2, 1.95), (3, 2.8), (6, 4.3)]),
                ),
                (
                    TagName::new("deadly"),
                    ModifierTable::from_entries([(2, 1.9), (3, 2.6), (6, 3.8)]),
                ),
            ]),
            weapon_tags: ModifierTable::from_entries(names(&[
                ("indirect", 1.2),
                ("targeting", 1.1),
                ("oneUse", 0.4),
                ("overcharge", 1.4),
                ("precise", 1.5),
                ("noRegen", 1.1),
                ("reliable", 1.0),
                ("assault", 1.0),
            ])),
            abilities: ModifierTable::from_entries_with_default(
                names(&[
                    ("ambush", 2.0),
                    ("fast", 1.0),
                    ("slow", -1.0),
                    ("immobile", -2.5),
                    ("aircraft", 3.0),
                    ("scout", 1.5),
                    ("strider", 0.5),
                    ("flying", 1.0),
                    ("stealth", 1.0),
                    ("fearless", 0.5),
                    ("furious", 0.5),
                    ("relentless", 1.0),
                    // Priced through the defense tables
                    ("delicate", 0.0),
                    ("tough", 0.0),
                    ("regeneration", 0.0),
                ]),
                0.0,
            ),
        }
    }

    /// Parse a ruleset from JSON and validate it.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use pointcost::ruleset::Ruleset;
    ///
    /// let ruleset = Ruleset::from_json_str(r#"{ "name": "house", "version": "2" }"#).unwrap();
    /// assert_eq!(ruleset.name, "house");
    /// // Everything not listed comes from the standard ruleset
    /// assert_eq!(ruleset.quality, Ruleset::standard().quality);
    /// ```
    pub fn from_json_str(content: &str) -> Result<Self, CostError> {
        let ruleset: Ruleset =
            serde_json::from_str(content).map_err(|e| CostError::Parse(e.to_string()))?;
        ruleset.validate()?;
        Ok(ruleset)
    }

    /// Parse a ruleset from TOML and validate it.
    pub fn from_toml_str(content: &str) -> Result<Self, CostError> {
        let ruleset: Ruleset =
            toml::from_str(content).map_err(|e| CostError::Parse(e.to_string()))?;
        ruleset.validate()?;
        Ok(ruleset)
    }

    /// Serialize to pretty JSON.
    pub fn to_json_string(&self) -> Result<String, CostError> {
        serde_json::to_string_pretty(self).map_err(|e| CostError::Parse(e.to_string()))
    }

    /// Check every table value and constant is usable.
    pub fn validate(&self) -> Result<(), CostError> {
        let c = &self.constants;
        for (field, value) in [
            ("base_cost_factor", c.base_cost_factor),
            ("weapon_cost_factor", c.weapon_cost_factor),
            ("hit_target", c.hit_target),
            ("die_faces", c.die_faces),
            ("min_hit_chance", c.min_hit_chance),
            ("fallback_divisor", self.toughness.fallback_divisor),
            ("fallback_exponent", self.toughness.fallback_exponent),
        ] {
            if !value.is_finite() {
                return Err(CostError::InvalidRuleset(format!(
                    "constant '{}' is not finite",
                    field
                )));
            }
        }
        if c.die_faces <= 0.0 || self.toughness.fallback_divisor <= 0.0 {
            return Err(CostError::InvalidRuleset(
                "die_faces and fallback_divisor must be positive".to_string(),
            ));
        }

        self.quality.validate("quality")?;
        self.defense.base.validate("defense.base")?;
        self.defense.delicate.validate("defense.delicate")?;
        self.defense.tough.validate("defense.tough")?;
        self.defense.regeneration.validate("defense.regeneration")?;
        self.toughness.table.validate("toughness")?;
        self.range.validate("range")?;
        self.ap.validate("ap")?;
        self.weapon_tags.validate("weapon_tags")?;
        self.abilities.validate("abilities")?;
        for (name, table) in &self.rated_weapon_tags {
            table.validate(&format!("rated_weapon_tags.{}", name))?;
        }
        if let Some(rule) = self.hit_rules.iter().find(|rule| !rule.is_finite()) {
            return Err(CostError::InvalidRuleset(format!(
                "hit rule for {:?} has a non-finite value",
                rule.any_of
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_is_valid() {
        assert!(Ruleset::standard().validate().is_ok());
    }

    #[test]
    fn test_standard_quality_table() {
        let ruleset = Ruleset::standard();
        assert_eq!(ruleset.quality.get(&2), 1.2);
        assert_eq!(ruleset.quality.get(&6), 0.8);
        assert_eq!(ruleset.quality.get(&1), 1.0);
    }

    #[test]
    fn test_json_round_trip() {
        let ruleset = Ruleset::standard();
        let json = ruleset.to_json_string().unwrap();
        let back = Ruleset::from_json_str(&json).unwrap();
        assert_eq!(back, ruleset);
    }

    #[test]
    fn test_toml_partial_override() {
        let content = r#"
            name = "long-range"
            version = "0.3"

            [range]
            default = 1.0
            entries = { melee = 0.5, "48" = 1.8 }

            [constants]
            base_cost_factor = 6.0
        "#;
        let ruleset = Ruleset::from_toml_str(content).unwrap();
        assert_eq!(ruleset.name, "long-range");
        assert_eq!(ruleset.range.get("48"), 1.8);
        assert_eq!(ruleset.range.get("24"), 1.0);
        assert_eq!(ruleset.constants.base_cost_factor, 6.0);
        assert_eq!(ruleset.constants.weapon_cost_factor, 2.0);
        assert_eq!(ruleset.ap, Ruleset::standard().ap);
    }

    #[test]
    fn test_toml_hit_rules() {
        let content = r#"
            [[hit_rules]]
            any_of = ["Sniper"]
            effect = { override = 0.9 }
        "#;
        let ruleset = Ruleset::from_toml_str(content).unwrap();
        assert_eq!(ruleset.hit_rules.len(), 1);
        assert_eq!(ruleset.hit_rules[0].any_of[0].as_str(), "sniper");
        assert_eq!(ruleset.hit_rules[0].effect, HitEffect::Override(0.9));
    }

    #[test]
    fn test_validate_rejects_non_finite_table() {
        let mut ruleset = Ruleset::standard();
        ruleset.ap.insert(6, f64::INFINITY);
        assert!(matches!(
            ruleset.validate(),
            Err(CostError::InvalidRuleset(_))
        ));
    }

    #[test]
    fn test_parse_error() {
        assert!(matches!(
            Ruleset::from_json_str("{ not json"),
            Err(CostError::Parse(_))
        ));
    }
}
