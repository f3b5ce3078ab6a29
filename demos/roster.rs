//! Roster example: summarizing an army list against a point limit
//!
//! This example demonstrates:
//! - Loading a house ruleset from TOML
//! - Building a roster from JSON records
//! - Checking the roster against its limit

use pointcost::*;

const HOUSE_RULES: &str = r#"
name = "house"
version = "2024.1"

[range]
default = 1.0
entries = { melee = 0.6, "12" = 0.65, "18" = 1.0, "24" = 1.25, "30" = 1.45, "36" = 1.55, "48" = 1.8 }
"#;

const ROSTER: &str = r#"{
    "name": "Iron Vanguard",
    "point_limit": 250,
    "entries": [
        {
            "label": "Line Infantry",
            "unit": { "quality": 4, "defense": 4, "toughness": 1 },
            "weapon": { "range": "24", "attacks": 1, "tags": ["reliable"] },
            "count": 10
        },
        {
            "label": "Siege Walker",
            "unit": { "quality": 3, "defense": 2, "toughness": 9, "flags": ["tough(9)"] },
            "weapon": { "range": "48", "attacks": 1, "ap": 2, "tags": ["blast(3)", "indirect"] },
            "abilities": ["slow"],
            "count": 1
        }
    ]
}"#;

fn main() -> Result<(), CostError> {
    let engine = CostEngine::new(Ruleset::from_toml_str(HOUSE_RULES)?)?;
    let roster: Roster = serde_json::from_str(ROSTER).map_err(|e| CostError::Parse(e.to_string()))?;

    let summary = roster.summarize(&engine)?;
    println!("=== {} ===", summary.name);
    for (entry, cost) in roster.entries.iter().zip(&summary.units) {
        println!("{:<16} x{:<3} {:>5} pts", entry.label, cost.count, cost.total);
    }
    println!("Total: {} pts", summary.total);

    match summary.remaining() {
        Some(left) if left >= 0 => println!("{} pts left under the limit", left),
        Some(left) => println!("Over the limit by {} pts", -left),
        None => println!("No point limit"),
    }

    Ok(())
}
