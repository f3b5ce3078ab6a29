//! Defense modifier selection.
//!
//! A unit's defense modifier comes from exactly one of four tables. Which
//! table applies is decided by the unit's flags through a fixed priority
//! list: regeneration, then tough, then delicate, falling back to base.
//! Flags never stack.

use crate::table::ModifierTable;
use crate::tag::TagList;
use serde::{Deserialize, Serialize};

/// Which defense table a unit is priced against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DefenseVariant {
    Base,
    Delicate,
    Tough,
    Regeneration,
}

impl DefenseVariant {
    /// Flag-driven variants, highest priority first.
    pub const PRECEDENCE: [DefenseVariant; 3] = [
        DefenseVariant::Regeneration,
        DefenseVariant::Tough,
        DefenseVariant::Delicate,
    ];

    /// The unit flag that selects this variant. `Base` has none.
    pub fn flag(self) -> Option<&'static str> {
        match self {
            DefenseVariant::Base => None,
            DefenseVariant::Delicate => Some("delicate"),
            DefenseVariant::Tough => Some("tough"),
            DefenseVariant::Regeneration => Some("regeneration"),
        }
    }

    /// Pick the variant for a set of unit flags.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use pointcost::{DefenseVariant, TagList};
    ///
    /// let flags = TagList::parse_all(["delicate", "tough(3)"]);
    /// assert_eq!(DefenseVariant::select(&flags), DefenseVariant::Tough);
    /// assert_eq!(DefenseVariant::select(&TagList::new()), DefenseVariant::Base);
    /// ```
    pub fn select(flags: &TagList) -> Self {
        Self::PRECEDENCE
            .into_iter()
            .find(|variant| variant.flag().is_some_and(|flag| flags.contains(flag)))
            .unwrap_or(DefenseVariant::Base)
    }
}

/// The four defense tables, keyed by defense value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DefenseTables {
    pub base: ModifierTable<u8>,
    pub delicate: ModifierTable<u8>,
    pub tough: ModifierTable<u8>,
    pub regeneration: ModifierTable<u8>,
}

impl DefenseTables {
    /// Table for a given variant.
    pub fn table(&self, variant: DefenseVariant) -> &ModifierTable<u8> {
        match variant {
            DefenseVariant::Base => &self.base,
            DefenseVariant::Delicate => &self.delicate,
            DefenseVariant::Tough => &self.tough,
            DefenseVariant::Regeneration => &self.regeneration,
        }
    }

    /// Defense modifier for a unit, selecting the table from its flags.
    pub fn modifier(&self, defense: u8, flags: &TagList) -> f64 {
        self.table(DefenseVariant::select(flags)).get(&defense)
    }
}
