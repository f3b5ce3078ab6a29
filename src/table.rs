//! Modifier tables.
//!
//! A [`ModifierTable`] maps a small key domain (quality, AP, range, tag
//! name, ...) to a multiplicative factor or additive constant. A lookup
//! never fails: keys missing from the table return the table's `default`.

use crate::error::CostError;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt::Display;
use std::str::FromStr;

/// Neutral multiplier used as the default for most tables.
pub const NEUTRAL: f64 = 1.0;

/// A key/value lookup table with an explicit default for missing keys.
///
/// # Examples
///
/// ```rust
/// use pointcost::ModifierTable;
///
/// let quality = ModifierTable::from_entries([(4u8, 1.0), (3, 1.1), (2, 1.2)]);
/// assert_eq!(quality.get(&3), 1.1);
/// assert_eq!(quality.get(&9), 1.0); // missing key -> default
/// assert_eq!(quality.lookup(&9), None);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ModifierTable<K: Ord> {
    entries: BTreeMap<K, f64>,
    default: f64,
}

impl<K: Ord> ModifierTable<K> {
    /// Create an empty table returning `default` for every key.
    pub fn new(default: f64) -> Self {
        Self {
            entries: BTreeMap::new(),
            default,
        }
    }

    /// Create a table from entries with the neutral default of `1.0`.
    pub fn from_entries(entries: impl IntoIterator<Item = (K, f64)>) -> Self {
        Self::from_entries_with_default(entries, NEUTRAL)
    }

    /// Create a table from entries with an explicit default.
    pub fn from_entries_with_default(
        entries: impl IntoIterator<Item = (K, f64)>,
        default: f64,
    ) -> Self {
        Self {
            entries: entries.into_iter().collect(),
            default,
        }
    }

    /// Insert or replace an entry.
    pub fn insert(&mut self, key: K, value: f64) {
        self.entries.insert(key, value);
    }

    /// Value for `key`, or `None` when the key is not listed.
    pub fn lookup<Q>(&self, key: &Q) -> Option<f64>
    where
        K: std::borrow::Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.entries.get(key).copied()
    }

    /// Value for `key`, or the table default when the key is not listed.
    pub fn get<Q>(&self, key: &Q) -> f64
    where
        K: std::borrow::Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.lookup(key).unwrap_or(self.default)
    }

    /// The value returned for missing keys.
    pub fn default_value(&self) -> f64 {
        self.default
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, f64)> {
        self.entries.iter().map(|(k, v)| (k, *v))
    }

    /// Check that the default and every entry are finite.
    pub fn validate(&self, table: &str) -> Result<(), CostError>
    where
        K: Display,
    {
        if !self.default.is_finite() {
            return Err(CostError::InvalidRuleset(format!(
                "table '{}' has non-finite default {}",
                table, self.default
            )));
        }
        for (key, value) in &self.entries {
            if !value.is_finite() {
                return Err(CostError::InvalidRuleset(format!(
                    "table '{}' has non-finite value {} for key '{}'",
                    table, value, key
                )));
            }
        }
        Ok(())
    }
}

impl<K: Ord> Default for ModifierTable<K> {
    fn default() -> Self {
        Self::new(NEUTRAL)
    }
}

/// Serialized form: keys are always strings so that both JSON and TOML
/// can carry integer-keyed tables.
#[derive(Serialize, Deserialize)]
struct RawTable {
    #[serde(default = "neutral")]
    default: f64,
    #[serde(default)]
    entries: BTreeMap<String, f64>,
}

fn neutral() -> f64 {
    NEUTRAL
}

impl<K: Ord + Display> Serialize for ModifierTable<K> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        RawTable {
            default: self.default,
            entries: self
                .entries
                .iter()
                .map(|(k, v)| (k.to_string(), *v))
                .collect(),
        }
        .serialize(serializer)
    }
}

impl<'de, K> Deserialize<'de> for ModifierTable<K>
where
    K: Ord + FromStr,
    K::Err: Display,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = RawTable::deserialize(deserializer)?;
        let mut entries = BTreeMap::new();
        for (key, value) in raw.entries {
            let parsed = key
                .trim()
                .parse::<K>()
                .map_err(|e| D::Error::custom(format!("invalid table key '{}': {}", key, e)))?;
            entries.insert(parsed, value);
        }
        Ok(Self {
            entries,
            default: raw.default,
        })
    }
}
