//! Random input generation for benchmarks and manual testing.
//!
//! Produces plausible raw ledgers (one charge per month, scattered
//! payments, occasional future markers) and random households.

use crate::core::entry::{RawEntrySet, RawPeriodEntry};
use crate::core::ledger::PeriodStatus;
use crate::core::period::Period;
use crate::pricing::group::HouseholdMember;
use rand::Rng;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

/// Configuration for generating a random raw ledger.
#[derive(Debug, Clone)]
pub struct LedgerConfig {
    /// First period charged.
    pub start: Period,
    /// Number of consecutive monthly periods.
    pub period_count: usize,
    /// Monthly charge.
    pub installment: Decimal,
    /// Maximum number of separate payment postings per period.
    pub max_payments_per_period: usize,
    /// Probability that a period receives any payment.
    pub payment_probability: f64,
    /// Probability that a charge posting carries an explicit `future` marker.
    pub future_marker_probability: f64,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            start: Period::year_start(2024),
            period_count: 24,
            installment: Decimal::from(16_000),
            max_payments_per_period: 3,
            payment_probability: 0.7,
            future_marker_probability: 0.05,
        }
    }
}

/// Generate a random raw ledger.
///
/// Payments are whole hundreds and may overshoot the installment by up
/// to 20%, so credit periods appear naturally.
pub fn generate_random_entries(config: &LedgerConfig) -> RawEntrySet {
    let mut rng = rand::thread_rng();
    let mut set = RawEntrySet::new();

    let installment_hundreds = (config.installment / Decimal::ONE_HUNDRED)
        .trunc()
        .to_u64()
        .unwrap_or(0);
    let max_hundreds = installment_hundreds.saturating_add(installment_hundreds / 5);

    for period in config.start.range(config.period_count) {
        let mut charge = RawPeriodEntry::new(period, config.installment, Decimal::ZERO);
        if rng.gen_bool(config.future_marker_probability.clamp(0.0, 1.0)) {
            charge = charge.with_status(PeriodStatus::Future);
        }
        set.add(charge);

        if !rng.gen_bool(config.payment_probability.clamp(0.0, 1.0)) {
            continue;
        }

        let postings = rng.gen_range(1..=config.max_payments_per_period.max(1));
        let mut remaining = rng.gen_range(0..=max_hundreds);
        for i in 0..postings {
            let hundreds = if i + 1 == postings {
                remaining
            } else {
                rng.gen_range(0..=remaining)
            };
            remaining -= hundreds;
            if hundreds > 0 {
                let paid = Decimal::from(hundreds) * Decimal::ONE_HUNDRED;
                set.add(RawPeriodEntry::new(period, Decimal::ZERO, paid));
            }
        }
    }

    set
}

/// Generate a household of 1..=`max_members` members aged 0..=95.
pub fn generate_random_household(max_members: usize) -> Vec<HouseholdMember> {
    let mut rng = rand::thread_rng();
    let size = rng.gen_range(1..=max_members.max(1));
    (0..size)
        .map(|_| HouseholdMember::new(rng.gen_range(0..=95), rng.gen_bool(0.3)))
        .collect()
}
