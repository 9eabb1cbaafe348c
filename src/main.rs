//! billing-rules CLI
//!
//! Run the billing rule engine from the command line.
//!
//! # Usage
//!
//! ```bash
//! # Quote an installment for a household of 5, oldest 52, one cremation
//! billing-rules price --config rules.json --members 5 --max-age 52 --cremations 1
//!
//! # Quote from a household member list
//! billing-rules price --config rules.json --household members.json --format json
//!
//! # Reconcile raw period postings as of February 2025
//! billing-rules reconcile --input entries.json --period 2025-02
//!
//! # Generate a random raw ledger for testing
//! billing-rules generate --start 2024-01 --periods 24
//! ```

use billing_rules::core::entry::RawEntrySet;
use billing_rules::core::period::Period;
use billing_rules::pricing::config::PriceRuleConfig;
use billing_rules::pricing::engine::PriceRuleEngine;
use billing_rules::pricing::group::{GroupComposition, HouseholdMember};
use billing_rules::reconcile::reconciler::PeriodDebtReconciler;
use billing_rules::simulation::generator::{generate_random_entries, LedgerConfig};
use chrono::Local;
use log::info;
use rust_decimal::Decimal;
use std::fs;
use std::process;

fn print_usage() {
    eprintln!(
        r#"billing-rules — installment pricing and period debt reconciliation

USAGE:
    billing-rules <COMMAND> [OPTIONS]

COMMANDS:
    price       Compute the ideal installment for a household
    reconcile   Consolidate raw period postings into a status ledger
    generate    Generate a random raw ledger (for testing)
    help        Show this message

OPTIONS (price):
    --config <FILE>       Path to JSON price rule document
    --members <N>         Household size
    --max-age <AGE>       Age of the oldest member
    --cremations <N>      Members with cremation coverage (default: 0)
    --household <FILE>    JSON member list instead of --members/--max-age/--cremations
    --format <FORMAT>     Output format: text (default) or json

OPTIONS (reconcile):
    --input <FILE>        Path to JSON array of period entries
    --period <YYYY-MM>    Reference period (default: current month)
    --format <FORMAT>     Output format: text (default) or json

OPTIONS (generate):
    --start <YYYY-MM>     First period (default: 2024-01)
    --periods <N>         Number of monthly periods (default: 24)
    --installment <AMT>   Monthly charge (default: 16000)
    --output <FILE>       Write to file instead of stdout

EXAMPLES:
    billing-rules price --config rules.json --members 5 --max-age 52 --cremations 1
    billing-rules reconcile --input entries.json --period 2025-02 --format json
    billing-rules generate --periods 12 --output entries.json"#
    );
}

fn fail(message: impl std::fmt::Display) -> ! {
    eprintln!("{}", message);
    process::exit(1);
}

fn read_file(path: &str) -> String {
    fs::read_to_string(path)
        .unwrap_or_else(|e| fail(format!("Error reading file '{}': {}", path, e)))
}

/// Value of the option at `args[*i + 1]`, advancing `i`.
fn option_value(args: &[String], i: &mut usize, what: &str) -> String {
    *i += 1;
    args.get(*i)
        .cloned()
        .unwrap_or_else(|| fail(format!("{} requires {}", args[*i - 1], what)))
}

fn parse_number<T: std::str::FromStr>(text: &str, flag: &str) -> T {
    text.parse()
        .unwrap_or_else(|_| fail(format!("{} requires a number, got '{}'", flag, text)))
}

fn parse_period(text: &str) -> Period {
    text.parse()
        .unwrap_or_else(|e| fail(format!("Invalid period '{}': {}", text, e)))
}

fn print_json<T: serde::Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => fail(format!("Error encoding JSON: {}", e)),
    }
}

fn cmd_price(args: &[String]) {
    let mut config_path = None;
    let mut household_path = None;
    let mut members: Option<u32> = None;
    let mut max_age: Option<u32> = None;
    let mut cremations = 0u32;
    let mut format = "text".to_string();
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--config" => config_path = Some(option_value(args, &mut i, "a file path")),
            "--household" => household_path = Some(option_value(args, &mut i, "a file path")),
            "--members" => {
                members = Some(parse_number(&option_value(args, &mut i, "a number"), "--members"))
            }
            "--max-age" => {
                max_age = Some(parse_number(&option_value(args, &mut i, "a number"), "--max-age"))
            }
            "--cremations" => {
                cremations = parse_number(&option_value(args, &mut i, "a number"), "--cremations")
            }
            "--format" => format = option_value(args, &mut i, "'text' or 'json'"),
            other => fail(format!("Unknown option: {}", other)),
        }
        i += 1;
    }

    let path = config_path.unwrap_or_else(|| fail("Error: --config <FILE> is required"));
    let config = PriceRuleConfig::from_json_str(&read_file(&path))
        .unwrap_or_else(|e| fail(format!("Error parsing price rules: {}", e)));

    let group = match household_path {
        Some(path) => {
            let household: Vec<HouseholdMember> = serde_json::from_str(&read_file(&path))
                .unwrap_or_else(|e| {
                    eprintln!("Error parsing household: {}", e);
                    eprintln!("Expected format:");
                    eprintln!(r#"[ {{ "age": 52, "cremation": true }}, {{ "age": 49 }} ]"#);
                    process::exit(1);
                });
            GroupComposition::from_members(&household)
        }
        None => {
            let members = members.unwrap_or_else(|| fail("Error: --members <N> is required"));
            let max_age = max_age.unwrap_or_else(|| fail("Error: --max-age <AGE> is required"));
            GroupComposition::new(members, cremations, max_age)
        }
    };

    let engine = PriceRuleEngine::new(&config);
    let quote = engine.quote(&group);
    info!("priced household {:?} at {}", group, quote.installment);

    if format == "json" {
        print_json(&quote);
    } else {
        print!("{}", quote);
    }
}

fn cmd_reconcile(args: &[String]) {
    let mut input_path = None;
    let mut period = None;
    let mut format = "text".to_string();
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--input" => input_path = Some(option_value(args, &mut i, "a file path")),
            "--period" => period = Some(parse_period(&option_value(args, &mut i, "YYYY-MM"))),
            "--format" => format = option_value(args, &mut i, "'text' or 'json'"),
            other => fail(format!("Unknown option: {}", other)),
        }
        i += 1;
    }

    let path = input_path.unwrap_or_else(|| fail("Error: --input <FILE> is required"));
    let set = RawEntrySet::from_json_str(&read_file(&path)).unwrap_or_else(|e| {
        eprintln!("Error parsing entries: {}", e);
        eprintln!("Expected format:");
        eprintln!(r#"[ {{ "period": "2025-03", "charge": 3000, "paid": 0 }} ]"#);
        process::exit(1);
    });
    if set.rejected() > 0 {
        eprintln!("Skipped {} malformed entries", set.rejected());
    }

    let reference = period.unwrap_or_else(|| Period::from_date(Local::now().date_naive()));
    let ledger = PeriodDebtReconciler::reconcile(set.entries(), reference);

    if format == "json" {
        print_json(&ledger);
    } else {
        print!("{}", ledger);
    }
}

fn cmd_generate(args: &[String]) {
    let mut config = LedgerConfig::default();
    let mut output_path: Option<String> = None;
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--start" => config.start = parse_period(&option_value(args, &mut i, "YYYY-MM")),
            "--periods" => {
                config.period_count =
                    parse_number(&option_value(args, &mut i, "a number"), "--periods")
            }
            "--installment" => {
                config.installment =
                    parse_number::<Decimal>(&option_value(args, &mut i, "an amount"), "--installment")
            }
            "--output" => output_path = Some(option_value(args, &mut i, "a file path")),
            other => fail(format!("Unknown option: {}", other)),
        }
        i += 1;
    }

    let set = generate_random_entries(&config);
    let json = serde_json::to_string_pretty(set.entries())
        .unwrap_or_else(|e| fail(format!("Error encoding JSON: {}", e)));

    if let Some(path) = output_path {
        fs::write(&path, &json)
            .unwrap_or_else(|e| fail(format!("Error writing to '{}': {}", path, e)));
        eprintln!(
            "Generated {} entries across {} periods → {}",
            set.len(),
            config.period_count,
            path
        );
    } else {
        println!("{}", json);
    }
}

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        process::exit(1);
    }

    let command = args[1].as_str();
    let rest = &args[2..];

    match command {
        "price" => cmd_price(rest),
        "reconcile" => cmd_reconcile(rest),
        "generate" => cmd_generate(rest),
        "help" | "--help" | "-h" => print_usage(),
        _ => {
            eprintln!("Unknown command: {}", command);
            print_usage();
            process::exit(1);
        }
    }
}
