//! Account status panel example.
//!
//! Reconciles a household's raw postings into a period ledger and shows
//! which periods are owed, in credit or still in the future.

use billing_rules::core::entry::RawEntrySet;
use billing_rules::core::period::Period;
use billing_rules::reconcile::reconciler::PeriodDebtReconciler;

const POSTINGS: &str = r#"[
    { "period": "2024-11", "charge": 16000, "paid": 16000 },
    { "period": "2024-12", "charge": 16000, "paid": 0 },
    { "period": "2024-12", "charge": 0, "paid": 10000 },
    { "period": "2025-01", "charge": 16000, "paid": 0 },
    { "period": "2025-01", "charge": 0, "paid": 17000 },
    { "period": "2025-02", "charge": 16000, "paid": 0 },
    { "period": "2025-03", "charge": 16000, "paid": 0, "status": "future" },
    { "period": "2025-04", "charge": 16000, "paid": 0 }
]"#;

fn main() {
    println!("╔══════════════════════════════════════════╗");
    println!("║  billing-rules: Account Status Example   ║");
    println!("╚══════════════════════════════════════════╝\n");

    let set = match RawEntrySet::from_json_str(POSTINGS) {
        Ok(set) => set,
        Err(e) => {
            eprintln!("invalid postings: {}", e);
            return;
        }
    };
    let reference = Period::new(2025, 2).unwrap_or_else(|| Period::year_start(2025));
    let ledger = PeriodDebtReconciler::reconcile(set.entries(), reference);

    println!("{}", ledger);

    println!("\nPeriods eligible for manual allocation:");
    for entry in ledger.payable_entries() {
        println!("  {}  owes {}  ({})", entry.period, entry.outstanding(), entry.status);
    }

    println!("\nFIFO order for automatic allocation:");
    for entry in ledger.outstanding_entries() {
        println!("  {}  {}", entry.period, entry.balance);
    }
}
