//! Cost engine module.
//!
//! Provides the [`CostEngine`] type, the main entry point for point-cost
//! calculation. It owns an immutable [`Ruleset`] and evaluates the cost
//! formulas against it:
//!
//! ```text
//! base    = 5 × quality × defense × toughness
//! weapon  = attacks × 2 × range × hit × ap × tags
//! ability = per_toughness(name) × toughness
//! unit    = round((base + weapon + Σ ability) × count)
//! roster  = Σ unit
//! ```
//!
//! Every evaluation is pure. An engine can be shared across threads by
//! reference.

use crate::breakdown::{checked_total, UnitCost};
use crate::error::{ensure_finite, CostError};
use crate::hit;
use crate::profile::{UnitProfile, WeaponProfile};
use crate::roster::RosterEntry;
use crate::ruleset::Ruleset;
use crate::tag::{Tag, TagList, TagName};

/// Evaluates cost formulas against a ruleset.
///
/// # Examples
///
/// ```rust
/// use pointcost::{CostEngine, UnitProfile, WeaponProfile};
///
/// let engine = CostEngine::standard();
/// let unit = UnitProfile::new(4, 4, 1);
/// let rifle = WeaponProfile::new("24", 2.0, 0);
///
/// assert_eq!(engine.unit_total_cost(&unit, None, &[], 1).unwrap(), 7);
/// assert_eq!(engine.unit_total_cost(&unit, Some(&rifle), &[], 1).unwrap(), 9);
/// ```
#[derive(Debug, Clone)]
pub struct CostEngine {
    ruleset: Ruleset,
}

impl CostEngine {
    /// Create an engine for a ruleset, validating it first.
    pub fn new(ruleset: Ruleset) -> Result<Self, CostError> {
        ruleset.validate()?;
        tracing::debug!(name = %ruleset.name, version = %ruleset.version, "cost engine ready");
        Ok(Self { ruleset })
    }

    /// Create an engine for the built-in standard ruleset.
    pub fn standard() -> Self {
        Self {
            ruleset: Ruleset::standard(),
        }
    }

    pub fn ruleset(&self) -> &Ruleset {
        &self.ruleset
    }

    pub fn quality_modifier(&self, quality: u8) -> f64 {
        self.ruleset.quality.get(&quality)
    }

    /// Defense modifier from the table selected by the unit's flags.
    pub fn defense_modifier(&self, defense: u8, flags: &TagList) -> f64 {
        self.ruleset.defense.modifier(defense, flags)
    }

    pub fn toughness_modifier(&self, toughness: u32) -> f64 {
        self.ruleset.toughness.modifier(toughness)
    }

    /// Range modifier. Unrecognized ranges are neutral.
    pub fn range_modifier(&self, range: &str) -> f64 {
        let key = range.trim().to_lowercase();
        self.ruleset.range.lookup(key.as_str()).unwrap_or_else(|| {
            tracing::trace!(range = %key, "unrecognized range, using table default");
            self.ruleset.range.default_value()
        })
    }

    pub fn ap_modifier(&self, ap: i32) -> f64 {
        self.ruleset.ap.get(&ap)
    }

    /// Hit chance for a unit of `quality` using a weapon with `weapon_tags`.
    pub fn hit_chance(&self, quality: u8, weapon_tags: &TagList, unit_flags: &TagList) -> f64 {
        hit::hit_chance(
            quality,
            &self.ruleset.hit_rules,
            &self.ruleset.constants,
            weapon_tags,
            unit_flags,
        )
    }

    /// Product of all weapon-tag multipliers.
    ///
    /// Rated tags (`blast(x)`, `deadly(x)`) look up their parameter; a rated
    /// tag with no parameter, or a parameter the table does not list, is
    /// neutral. Plain tags use the weapon-tag table.
    pub fn weapon_tag_modifier(&self, tags: &TagList) -> f64 {
        tags.iter().map(|tag| self.tag_multiplier(tag)).product()
    }

    fn tag_multiplier(&self, tag: &Tag) -> f64 {
        match self.ruleset.rated_weapon_tags.get(&tag.name) {
            Some(table) => tag.param.map_or(1.0, |param| table.get(&param)),
            None => self.ruleset.weapon_tags.get(&tag.name),
        }
    }

    /// Cost of one model before weapons and abilities.
    ///
    /// Never fails: unlisted quality or defense values are neutral and
    /// unlisted toughness values use the analytic fallback.
    pub fn base_model_cost(&self, quality: u8, defense: u8, toughness: u32, flags: &TagList) -> f64 {
        self.ruleset.constants.base_cost_factor
            * self.quality_modifier(quality)
            * self.defense_modifier(defense, flags)
            * self.toughness_modifier(toughness)
    }

    /// Cost of one model's weapon.
    ///
    /// # Errors
    ///
    /// `attacks` must be finite and positive.
    pub fn weapon_cost(
        &self,
        weapon: &WeaponProfile,
        unit_quality: u8,
        unit_flags: &TagList,
    ) -> Result<f64, CostError> {
        let attacks = ensure_finite("attacks", weapon.attacks)?;
        if attacks <= 0.0 {
            return Err(CostError::InvalidArgument {
                field: "attacks",
                reason: format!("must be positive, got {}", attacks),
            });
        }

        let range = self.range_modifier(&weapon.range);
        let hit = self.hit_chance(unit_quality, &weapon.tags, unit_flags);
        let ap = self.ap_modifier(weapon.ap);
        let tags = self.weapon_tag_modifier(&weapon.tags);

        Ok(attacks * self.ruleset.constants.weapon_cost_factor * range * hit * ap * tags)
    }

    /// Cost of one ability for one model.
    ///
    /// Names are matched case-insensitively; unknown names cost 0. The
    /// parameter is accepted for rated abilities but does not enter the
    /// formula: `fast(2)` costs the same as `fast`.
    pub fn ability_cost(&self, name: &str, toughness: u32, _param: Option<i64>) -> f64 {
        let name = TagName::new(name);
        let per_toughness = self.ruleset.abilities.lookup(&name).unwrap_or_else(|| {
            tracing::trace!(ability = %name, "unknown ability, no cost");
            self.ruleset.abilities.default_value()
        });
        per_toughness * f64::from(toughness)
    }

    /// Price a unit entry with a full breakdown.
    ///
    /// # Errors
    ///
    /// Fails on a zero `count`, zero toughness, or a weapon with
    /// non-finite or non-positive attacks.
    pub fn price_unit(
        &self,
        unit: &UnitProfile,
        weapon: Option<&WeaponProfile>,
        abilities: &[Tag],
        count: u32,
    ) -> Result<UnitCost, CostError> {
        if count == 0 {
            return Err(CostError::InvalidCount(count));
        }
        if unit.toughness == 0 {
            return Err(CostError::InvalidArgument {
                field: "toughness",
                reason: "must be at least 1".to_string(),
            });
        }

        let mut cost = UnitCost::new(self.base_model_cost(
            unit.quality,
            unit.defense,
            unit.toughness,
            &unit.flags,
        ));
        if let Some(weapon) = weapon {
            let points = self.weapon_cost(weapon, unit.quality, &unit.flags)?;
            cost.set_weapon(weapon_label(weapon), points);
        }
        for ability in abilities {
            let points = self.ability_cost(ability.name.as_str(), unit.toughness, ability.param);
            cost.add_ability(ability.to_string(), points);
        }
        cost.finish(count)?;

        tracing::debug!(
            per_model = cost.per_model,
            count,
            total = cost.total,
            "priced unit"
        );
        Ok(cost)
    }

    /// Total points for `count` identical models, rounded once.
    pub fn unit_total_cost(
        &self,
        unit: &UnitProfile,
        weapon: Option<&WeaponProfile>,
        abilities: &[Tag],
        count: u32,
    ) -> Result<i64, CostError> {
        Ok(self.price_unit(unit, weapon, abilities, count)?.total)
    }

    /// Sum of every entry's unit total. An empty roster costs 0.
    ///
    /// # Errors
    ///
    /// Fails on the first invalid entry, or if the sum overflows.
    pub fn roster_total_cost(&self, entries: &[RosterEntry]) -> Result<i64, CostError> {
        let totals = entries
            .iter()
            .map(|entry| self.price_entry(entry).map(|cost| cost.total))
            .collect::<Result<Vec<_>, _>>()?;
        checked_total(totals)
    }

    /// Price a single roster entry.
    pub fn price_entry(&self, entry: &RosterEntry) -> Result<UnitCost, CostError> {
        self.price_unit(
            &entry.unit,
            entry.weapon.as_ref(),
            &entry.abilities,
            entry.count,
        )
    }
}

impl Default for CostEngine {
    fn default() -> Self {
        Self::standard()
    }
}

fn weapon_label(weapon: &WeaponProfile) -> String {
    let mut label = format!("{} A{} AP({})", weapon.range_key(), weapon.attacks, weapon.ap);
    for tag in &weapon.tags {
        label.push_str(", ");
        label.push_str(&tag.to_string());
    }
    label
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-9, "{} != {}", a, b);
    }

    #[test]
    fn test_base_cost_scenario() {
        let engine = CostEngine::standard();
        assert_close(engine.base_model_cost(4, 4, 1, &TagList::new()), 6.65);
    }

    #[test]
    fn test_weapon_cost_scenario() {
        let engine = CostEngine::standard();
        let weapon = WeaponProfile::new("24", 2.0, 0);
        let cost = engine.weapon_cost(&weapon, 4, &TagList::new()).unwrap();
        assert_close(cost, 2.5);
    }

    #[test]
    fn test_range_modifier_normalizes() {
        let engine = CostEngine::standard();
        assert_eq!(engine.range_modifier(" MELEE "), 0.6);
        assert_eq!(engine.range_modifier("99"), 1.0);
        assert_eq!(engine.range_modifier("long"), 1.0);
    }

    #[test]
    fn test_rated_tag_without_param_is_neutral() {
        let engine = CostEngine::standard();
        assert_eq!(engine.weapon_tag_modifier(&TagList::parse_all(["blast"])), 1.0);
        assert_eq!(engine.weapon_tag_modifier(&TagList::parse_all(["blast(4)"])), 1.0);
        assert_eq!(engine.weapon_tag_modifier(&TagList::parse_all(["blast(3)"])), 2.8);
    }

    #[test]
    fn test_tag_modifiers_multiply() {
        let engine = CostEngine::standard();
        let tags = TagList::parse_all(["indirect", "oneUse", "assault", "mystery"]);
        assert_close(engine.weapon_tag_modifier(&tags), 1.2 * 0.4);
    }

    #[test]
    fn test_ability_cost_ignores_param() {
        let engine = CostEngine::standard();
        assert_close(engine.ability_cost("Ambush", 3, None), 6.0);
        assert_close(engine.ability_cost("fast", 1, Some(2)), 1.0);
        assert_close(engine.ability_cost("ambush", 3, Some(0)), 6.0);
        assert_close(engine.ability_cost("ambush", 3, Some(-4)), 6.0);
        assert_eq!(engine.ability_cost("tough", 6, Some(6)), 0.0);
    }

    #[test]
    fn test_huge_unit_rejected() {
        let engine = CostEngine::standard();
        let unit = UnitProfile::new(4, 4, u32::MAX);
        assert!(matches!(
            engine.price_unit(&unit, None, &[], u32::MAX),
            Err(CostError::InvalidArgument { field: "unit cost", .. })
        ));
    }

    #[test]
    fn test_zero_toughness_rejected() {
        let engine = CostEngine::standard();
        let unit = UnitProfile::new(4, 4, 0);
        assert!(matches!(
            engine.price_unit(&unit, None, &[], 1),
            Err(CostError::InvalidArgument { field: "toughness", .. })
        ));
    }

    #[test]
    fn test_negative_attacks_rejected() {
        let engine = CostEngine::standard();
        let weapon = WeaponProfile::new("12", -1.0, 0);
        assert!(engine.weapon_cost(&weapon, 4, &TagList::new()).is_err());
    }

    #[test]
    fn test_price_unit_breakdown() {
        let engine = CostEngine::standard();
        let unit = UnitProfile::new(4, 4, 1);
        let weapon = WeaponProfile::new("24", 2.0, 0).with_tag("assault");
        let abilities = [Tag::parse("fast"), Tag::parse("unknown")];
        let cost = engine.price_unit(&unit, Some(&weapon), &abilities, 2).unwrap();

        let weapon_line = cost.weapon.as_ref().unwrap();
        assert_eq!(weapon_line.label, "24 A2 AP(0), assault");
        assert_close(weapon_line.points, 2.5);
        assert_eq!(cost.abilities.len(), 2);
        assert_close(cost.abilities[0].points, 1.0);
        assert_eq!(cost.abilities[1].points, 0.0);
        assert_close(cost.per_model, 10.15);
        assert_eq!(cost.total, 20); // round(20.3)
    }
}
