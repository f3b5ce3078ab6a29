//! Hit-chance rules.
//!
//! The chance to hit starts from the unit's quality and is then adjusted by
//! tag-driven rules in stages, the way stat transforms are grouped by stack
//! rule:
//!
//! ```text
//! base = max(floor, (7 - quality) / 6)
//!   → Override rules (last matching override wins)
//!   → Additive rules (in ruleset order, cumulative)
//!   → floor clamp
//! ```
//!
//! An override therefore resets the base first and additive deltas land on
//! top of it: a `reliable` + `rending` weapon hits on `5/6 + 1/6`.

use crate::ruleset::CostConstants;
use crate::tag::{TagList, TagName};
use serde::{Deserialize, Serialize};

/// What a hit rule does when it fires.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HitEffect {
    /// Replace the hit chance with an absolute value.
    Override(f64),
    /// Add a delta (negative for penalties).
    Add(f64),
}

impl HitEffect {
    /// Stage order. Lower stages are applied first.
    pub fn stage(self) -> u8 {
        match self {
            HitEffect::Override(_) => 0,
            HitEffect::Add(_) => 1,
        }
    }

    fn apply(self, input: f64) -> f64 {
        match self {
            HitEffect::Override(value) => value,
            HitEffect::Add(delta) => input + delta,
        }
    }

    fn value(self) -> f64 {
        match self {
            HitEffect::Override(v) | HitEffect::Add(v) => v,
        }
    }
}

/// Where a hit rule looks for its trigger tags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HitScope {
    /// Weapon tags only.
    #[default]
    Weapon,
    /// Weapon tags or the wielding unit's flags.
    Unit,
}

/// A rule that fires once when any of its tags is present.
///
/// Grouping names in one rule (`fury` / `relentless`) keeps a unit that
/// carries both from being counted twice.
///
/// # Examples
///
/// ```rust
/// use pointcost::hit::{HitEffect, HitRule};
/// use pointcost::TagList;
///
/// let fury = HitRule::unit(["fury", "relentless"], HitEffect::Add(0.65 / 6.0));
/// let rending = HitRule::new(["rending"], HitEffect::Add(1.0 / 6.0));
/// let weapon_tags = TagList::new();
/// let unit_flags = TagList::parse_all(["Relentless", "rending"]);
///
/// assert!(fury.matches(&weapon_tags, &unit_flags));
/// // weapon rules ignore unit flags
/// assert!(!rending.matches(&weapon_tags, &unit_flags));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HitRule {
    /// Tag names that trigger the rule.
    pub any_of: Vec<TagName>,
    pub effect: HitEffect,
    #[serde(default)]
    pub scope: HitScope,
}

impl HitRule {
    /// A rule triggered by weapon tags.
    pub fn new<'a>(any_of: impl IntoIterator<Item = &'a str>, effect: HitEffect) -> Self {
        Self {
            any_of: any_of.into_iter().map(TagName::from).collect(),
            effect,
            scope: HitScope::Weapon,
        }
    }

    /// A rule triggered by weapon tags or unit flags.
    pub fn unit<'a>(any_of: impl IntoIterator<Item = &'a str>, effect: HitEffect) -> Self {
        Self {
            scope: HitScope::Unit,
            ..Self::new(any_of, effect)
        }
    }

    /// Whether this rule fires for the given weapon and wielder.
    pub fn matches(&self, weapon_tags: &TagList, unit_flags: &TagList) -> bool {
        self.any_of.iter().any(|name| {
            weapon_tags.contains(name.as_str())
                || (self.scope == HitScope::Unit && unit_flags.contains(name.as_str()))
        })
    }

    pub(crate) fn is_finite(&self) -> bool {
        self.effect.value().is_finite()
    }
}

/// Quality-derived hit chance before any tag adjustment.
pub fn base_hit_chance(quality: u8, constants: &CostConstants) -> f64 {
    let raw = (constants.hit_target - f64::from(quality)) / constants.die_faces;
    raw.max(constants.min_hit_chance)
}

/// Final hit chance after all matching rules and the floor clamp.
pub fn hit_chance(
    quality: u8,
    rules: &[HitRule],
    constants: &CostConstants,
    weapon_tags: &TagList,
    unit_flags: &TagList,
) -> f64 {
    let mut matching: Vec<&HitRule> = rules
        .iter()
        .filter(|rule| rule.matches(weapon_tags, unit_flags))
        .collect();
    // Stable: ruleset order is preserved inside each stage
    matching.sort_by_key(|rule| rule.effect.stage());

    let chance = matching
        .iter()
        .fold(base_hit_chance(quality, constants), |acc, rule| {
            rule.effect.apply(acc)
        });
    chance.max(constants.min_hit_chance)
}
