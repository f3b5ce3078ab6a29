//! Basic example: pricing a single unit
//!
//! This example demonstrates:
//! - Building unit and weapon profiles
//! - Reading the per-unit cost breakdown
//! - Rounding once for the whole unit

use pointcost::*;

fn main() -> Result<(), CostError> {
    let engine = CostEngine::standard();

    let unit = UnitProfile::new(4, 4, 1);
    let rifle = WeaponProfile::new("24", 2.0, 0).with_tag("reliable");
    let abilities = [Tag::parse("scout")];

    println!("Pricing 10 models of Q4+ D4+ T1 with a reliable rifle and scout...");
    let cost = engine.price_unit(&unit, Some(&rifle), &abilities, 10)?;

    println!("\n=== Unit Cost ===");
    println!("Base model: {:.2}", cost.base);
    if let Some(weapon) = &cost.weapon {
        println!("Weapon [{}]: {:.2}", weapon.label, weapon.points);
    }
    for line in &cost.abilities {
        println!("Ability [{}]: {:.2}", line.label, line.points);
    }
    println!("Per model: {:.2}", cost.per_model);
    println!("Total for {} models: {}", cost.count, cost.total);

    Ok(())
}
