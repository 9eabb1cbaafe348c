//! # billing-rules
//!
//! Pure billing rule engine for subscription plans.
//!
//! Given a pricing rule document and a household's composition, the
//! engine computes the ideal recurring installment. Given the raw
//! charge/payment postings of an account, it consolidates them into one
//! ledger entry per billing period and classifies each period's status.
//!
//! Nothing here performs I/O, reads the clock or holds mutable state:
//! identical inputs always produce identical outputs.
//!
//! ## Architecture
//!
//! - **core** — Foundational types: periods, amounts, raw and ledger entries, rounding
//! - **pricing** — Rule configuration, household composition, installment engine
//! - **reconcile** — Period debt reconciliation and account summaries
//! - **simulation** — Random ledgers and households for benchmarks

pub mod core;
pub mod pricing;
pub mod reconcile;
pub mod simulation;

/// Convenience re-exports for common usage.
pub mod prelude {
    pub use crate::core::entry::{RawEntrySet, RawPeriodEntry};
    pub use crate::core::ledger::{PeriodLedgerEntry, PeriodStatus};
    pub use crate::core::period::Period;
    pub use crate::core::rounding::{round_to_increment, RoundingPolicy};
    pub use crate::pricing::config::{PriceRuleConfig, PriceRules};
    pub use crate::pricing::engine::{compute_ideal_installment, PriceBreakdown, PriceRuleEngine};
    pub use crate::pricing::group::{GroupComposition, HouseholdMember};
    pub use crate::reconcile::reconciler::{reconcile, PeriodDebtReconciler, ReconciledLedger};
    pub use crate::reconcile::summary::LedgerSummary;
}
