//! Unit and weapon profiles.
//!
//! These are the plain records a calling layer fetches from storage and
//! hands to the engine. The engine only ever reads them.

use crate::tag::{Tag, TagList};
use serde::{Deserialize, Serialize};

/// Combat statistics of a single model.
///
/// # Examples
///
/// ```rust
/// use pointcost::UnitProfile;
///
/// let unit = UnitProfile::new(4, 4, 3).with_flag("tough(3)");
/// assert!(unit.flags.contains("tough"));
///
/// let parsed: UnitProfile = serde_json::from_str(
///     r#"{ "quality": 3, "defense": 2, "toughness": 6, "flags": ["Regeneration"] }"#,
/// ).unwrap();
/// assert_eq!(parsed.toughness, 6);
/// assert!(parsed.flags.contains("regeneration"));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitProfile {
    /// Roll needed to hit; lower is better (2..=6).
    pub quality: u8,
    /// Roll needed to save; lower is better (2..=6).
    pub defense: u8,
    /// Wounds per model.
    pub toughness: u32,
    /// Traits that affect defense pricing and hit chance.
    #[serde(default)]
    pub flags: TagList,
}

impl UnitProfile {
    pub fn new(quality: u8, defense: u8, toughness: u32) -> Self {
        Self {
            quality,
            defense,
            toughness,
            flags: TagList::new(),
        }
    }

    /// Add a flag, parsing the `name(value)` form.
    pub fn with_flag(mut self, flag: &str) -> Self {
        self.flags.push(Tag::parse(flag));
        self
    }
}

/// A weapon carried by every model of a unit.
///
/// # Examples
///
/// ```rust
/// use pointcost::WeaponProfile;
///
/// let rifle = WeaponProfile::new("24", 1.0, 0).with_tag("reliable");
/// let claws = WeaponProfile::melee(3.0, 1).with_tag("rending");
/// assert_eq!(claws.range, "melee");
/// assert!(rifle.tags.contains("reliable"));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeaponProfile {
    /// `"melee"`, a tabled distance such as `"24"`, or any custom string.
    pub range: String,
    /// Attacks per model; may be fractional.
    pub attacks: f64,
    /// Armor piercing.
    #[serde(default)]
    pub ap: i32,
    #[serde(default)]
    pub tags: TagList,
}

impl WeaponProfile {
    pub fn new(range: impl Into<String>, attacks: f64, ap: i32) -> Self {
        Self {
            range: range.into(),
            attacks,
            ap,
            tags: TagList::new(),
        }
    }

    pub fn melee(attacks: f64, ap: i32) -> Self {
        Self::new("melee", attacks, ap)
    }

    /// Add a tag, parsing the `name(value)` form.
    pub fn with_tag(mut self, tag: &str) -> Self {
        self.tags.push(Tag::parse(tag));
        self
    }

    /// Range key used for table lookups.
    pub fn range_key(&self) -> String {
        self.range.trim().to_lowercase()
    }
}
