//! Cost breakdowns.
//!
//! A [`UnitCost`] is the priced form of one roster entry: the final point
//! total plus every contribution that went into it, in the order it was
//! added. Roster summaries and print views read these instead of
//! recomputing.

use crate::error::CostError;
use serde::{Deserialize, Serialize};

/// One labelled contribution to a model's cost.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostLine {
    pub label: String,
    pub points: f64,
}

/// A priced unit with full breakdown information.
///
/// # Examples
///
/// ```rust
/// use pointcost::UnitCost;
///
/// let mut cost = UnitCost::new(6.65);
/// cost.set_weapon("rifle", 2.5);
/// cost.add_ability("fast", 1.0);
/// cost.finish(5).unwrap();
///
/// assert!((cost.per_model - 10.15).abs() < 1e-9);
/// assert_eq!(cost.total, 51); // round(10.15 × 5)
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitCost {
    /// Base model cost.
    pub base: f64,
    /// Weapon contribution per model, if the unit has a weapon.
    pub weapon: Option<CostLine>,
    /// Ability contributions per model, in input order.
    pub abilities: Vec<CostLine>,
    /// Unrounded cost of one model.
    pub per_model: f64,
    pub count: u32,
    /// `round(per_model × count)`.
    pub total: i64,
}

impl UnitCost {
    /// Start a breakdown from the base model cost.
    pub fn new(base: f64) -> Self {
        Self {
            base,
            weapon: None,
            abilities: Vec::new(),
            per_model: base,
            count: 0,
            total: 0,
        }
    }

    pub fn set_weapon(&mut self, label: impl Into<String>, points: f64) {
        self.weapon = Some(CostLine {
            label: label.into(),
            points,
        });
    }

    pub fn add_ability(&mut self, label: impl Into<String>, points: f64) {
        self.abilities.push(CostLine {
            label: label.into(),
            points,
        });
    }

    /// Sum the contributions and round once for the whole unit.
    ///
    /// # Errors
    ///
    /// Fails when `per_model × count` is not finite or does not fit a
    /// point total.
    pub fn finish(&mut self, count: u32) -> Result<(), CostError> {
        let weapon = self.weapon.as_ref().map_or(0.0, |line| line.points);
        let abilities: f64 = self.abilities.iter().map(|line| line.points).sum();
        let per_model = self.base + weapon + abilities;
        let unrounded = per_model * f64::from(count);
        // i64::MAX as f64 rounds up to 2^63, which is itself out of range
        if !unrounded.is_finite() || unrounded.abs() >= i64::MAX as f64 {
            return Err(CostError::InvalidArgument {
                field: "unit cost",
                reason: format!("{} × {} is outside the point range", per_model, count),
            });
        }
        self.per_model = per_model;
        self.count = count;
        self.total = unrounded.round() as i64;
        Ok(())
    }
}

/// Add point totals, failing instead of overflowing.
pub(crate) fn checked_total(totals: impl IntoIterator<Item = i64>) -> Result<i64, CostError> {
    totals.into_iter().try_fold(0i64, |acc, total| {
        acc.checked_add(total).ok_or_else(|| CostError::InvalidArgument {
            field: "roster total",
            reason: "sum of unit totals overflows the point range".to_string(),
        })
    })
}
