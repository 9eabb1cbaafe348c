//! Installment pricing preview.
//!
//! Shows how household size, age and cremation coverage move the ideal
//! installment under one rule document.

use billing_rules::pricing::config::PriceRuleConfig;
use billing_rules::pricing::engine::PriceRuleEngine;
use billing_rules::pricing::group::{GroupComposition, HouseholdMember};

const RULES: &str = r#"{
    "base": 16000,
    "cremationCoef": 0.125,
    "group": { "neutralAt": 4, "step": 0.25, "minMap": { "1": 0.5, "2": 0.75, "3": 1.0 } },
    "age": [ { "min": 66, "coef": 1.375 }, { "min": 61, "coef": 1.25 }, { "min": 51, "coef": 1.125 } ]
}"#;

fn main() {
    println!("╔══════════════════════════════════════════╗");
    println!("║  billing-rules: Pricing Preview Example  ║");
    println!("╚══════════════════════════════════════════╝\n");

    let config = match PriceRuleConfig::from_json_str(RULES) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("invalid rules: {}", e);
            return;
        }
    };
    let engine = PriceRuleEngine::new(&config);

    // --- Scenario 1: Household size ---
    println!("━━━ Scenario 1: Household Size (oldest 40, no cremation) ━━━\n");
    for members in 1..=7 {
        let quote = engine.quote(&GroupComposition::new(members, 0, 40));
        println!(
            "  {} members  factor {:>5}  →  {}",
            members, quote.group_factor, quote.installment
        );
    }

    // --- Scenario 2: Age brackets ---
    println!("\n━━━ Scenario 2: Oldest Member Age (4 members) ━━━\n");
    for age in [40, 51, 61, 66, 80] {
        let quote = engine.quote(&GroupComposition::new(4, 0, age));
        println!(
            "  age {:>2}  factor {:>5}  →  {}",
            age, quote.age_factor, quote.installment
        );
    }

    // --- Scenario 3: A real household ---
    println!("\n━━━ Scenario 3: Household Member List ━━━\n");
    let household = [
        HouseholdMember::new(52, true),
        HouseholdMember::new(50, false),
        HouseholdMember::new(21, false),
        HouseholdMember::new(19, false),
        HouseholdMember::new(15, false),
    ];
    let quote = engine.quote(&GroupComposition::from_members(&household));
    println!("{}", quote);
}
