//! Property tests for the cost engine.

use pointcost::*;
use proptest::prelude::*;

fn unit_strategy() -> impl Strategy<Value = UnitProfile> {
    (2u8..=6, 2u8..=6, 1u32..=12, any::<bool>()).prop_map(|(q, d, t, tough)| {
        let unit = UnitProfile::new(q, d, t);
        if tough {
            unit.with_flag("tough")
        } else {
            unit
        }
    })
}

fn weapon_strategy() -> impl Strategy<Value = Option<WeaponProfile>> {
    let ranges = prop::sample::select(vec!["melee", "12", "18", "24", "30", "36", "99"]);
    let tags = prop::sample::subsequence(
        vec!["reliable", "rending", "heavy", "deadly(3)", "blast(2)", "indirect"],
        0..=3,
    );
    prop::option::of((ranges, 1u32..=10, -1i32..=5, tags).prop_map(|(range, attacks, ap, tags)| {
        tags.into_iter()
            .fold(WeaponProfile::new(range, f64::from(attacks), ap), |w, tag| {
                w.with_tag(tag)
            })
    }))
}

fn entry_strategy() -> impl Strategy<Value = RosterEntry> {
    (unit_strategy(), weapon_strategy(), 1u32..=20).prop_map(|(unit, weapon, count)| {
        let entry = RosterEntry::new(unit, count);
        match weapon {
            Some(weapon) => entry.with_weapon(weapon),
            None => entry,
        }
    })
}

proptest! {
    #[test]
    fn base_cost_decreases_with_worse_quality(d in 2u8..=6, t in 1u32..=20) {
        let flags = TagList::new();
        for q in 2u8..6 {
            let better = compute_base_model_cost(q, d, t, &flags);
            let worse = compute_base_model_cost(q + 1, d, t, &flags);
            prop_assert!(better > worse);
        }
    }

    #[test]
    fn base_cost_always_positive(unit in unit_strategy()) {
        let cost = compute_base_model_cost(unit.quality, unit.defense, unit.toughness, &unit.flags);
        prop_assert!(cost > 0.0);
    }

    #[test]
    fn unit_total_is_rounded_product(entry in entry_strategy()) {
        let engine = CostEngine::standard();
        let single = engine
            .price_unit(&entry.unit, entry.weapon.as_ref(), &entry.abilities, 1)
            .unwrap();
        let total = engine
            .unit_total_cost(&entry.unit, entry.weapon.as_ref(), &entry.abilities, entry.count)
            .unwrap();
        prop_assert_eq!(total, (single.per_model * f64::from(entry.count)).round() as i64);
    }

    #[test]
    fn roster_total_ignores_order(entries in prop::collection::vec(entry_strategy(), 0..8)) {
        let forward = compute_roster_total_cost(&entries).unwrap();
        let mut reversed = entries.clone();
        reversed.reverse();
        prop_assert_eq!(forward, compute_roster_total_cost(&reversed).unwrap());
    }

    #[test]
    fn unknown_ability_is_free(name in "[a-z]{12}_unknown", t in 1u32..=50) {
        prop_assert_eq!(compute_ability_cost(&name, t, None), 0.0);
    }
}
