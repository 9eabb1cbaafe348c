use crate::core::entry::RawPeriodEntry;
use crate::core::ledger::{PeriodLedgerEntry, PeriodStatus};
use crate::core::period::Period;
use crate::reconcile::summary::LedgerSummary;
use log::{debug, trace};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Running totals for one period while raw entries are merged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PeriodAccumulator {
    pub charge: Decimal,
    pub paid: Decimal,
    pub balance: Decimal,
    /// Some contributing raw entry carried an explicit `future` marker.
    pub marked_future: bool,
}

impl PeriodAccumulator {
    /// Add one raw entry. Sums saturate at the `Decimal` range.
    pub fn absorb(&mut self, entry: &RawPeriodEntry) {
        self.charge = self.charge.saturating_add(entry.charge);
        self.paid = self.paid.saturating_add(entry.paid);
        self.balance = self.balance.saturating_add(entry.effective_balance());
        self.marked_future |= entry.is_marked_future();
    }
}

/// Consolidated ledger for one household at a reference period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconciledLedger {
    reference_period: Period,
    /// One entry per period, ascending.
    entries: Vec<PeriodLedgerEntry>,
    summary: LedgerSummary,
}

impl ReconciledLedger {
    pub fn reference_period(&self) -> Period {
        self.reference_period
    }

    pub fn entries(&self) -> &[PeriodLedgerEntry] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<PeriodLedgerEntry> {
        self.entries
    }

    pub fn summary(&self) -> &LedgerSummary {
        &self.summary
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up a single period.
    pub fn entry(&self, period: Period) -> Option<&PeriodLedgerEntry> {
        self.entries
            .binary_search_by(|e| e.period.cmp(&period))
            .ok()
            .map(|i| &self.entries[i])
    }

    /// Periods with a positive balance, future ones included. These are
    /// the candidates a caller may pick for manual payment allocation.
    pub fn payable_entries(&self) -> impl Iterator<Item = &PeriodLedgerEntry> {
        self.entries.iter().filter(|e| e.balance > Decimal::ZERO)
    }

    /// Periods currently owed, oldest first.
    pub fn outstanding_entries(&self) -> impl Iterator<Item = &PeriodLedgerEntry> {
        self.entries.iter().filter(|e| e.is_outstanding())
    }
}

/// Consolidates raw per-period postings into a canonical ledger.
///
/// # Status rules
///
/// Checked in order; the first that applies wins:
///
/// 1. A raw entry marked `future` keeps the period `future` unless the
///    combined balance is negative.
/// 2. Negative balance: `credit`.
/// 3. Positive balance with some payment: `partial`.
/// 4. Positive balance, nothing paid: `future` after the reference
///    period, `due` otherwise.
/// 5. Zero balance: `future` after the reference period, `paid` otherwise.
pub struct PeriodDebtReconciler;

impl PeriodDebtReconciler {
    /// Merge `entries` by period and classify each period relative to
    /// `reference` (normally the current month).
    pub fn reconcile(entries: &[RawPeriodEntry], reference: Period) -> ReconciledLedger {
        let accumulated = Self::accumulate(entries);
        let now = reference.to_number();

        // BTreeMap iteration is already ascending by period.
        let ledger_entries: Vec<PeriodLedgerEntry> = accumulated
            .into_iter()
            .map(|(period, acc)| {
                let status = Self::resolve_status(period.to_number(), now, &acc);
                trace!("{}: balance={} paid={} -> {}", period, acc.balance, acc.paid, status);
                PeriodLedgerEntry {
                    period,
                    charge: acc.charge,
                    paid: acc.paid,
                    balance: acc.balance,
                    status,
                }
            })
            .collect();

        let summary = LedgerSummary::from_entries(&ledger_entries);
        debug!(
            "reconciled {} raw entries into {} periods at {} (due {}, credit {})",
            entries.len(),
            ledger_entries.len(),
            reference,
            summary.total_due,
            summary.credit_total
        );

        ReconciledLedger {
            reference_period: reference,
            entries: ledger_entries,
            summary,
        }
    }

    /// Group raw entries by period, summing amounts.
    pub fn accumulate(entries: &[RawPeriodEntry]) -> BTreeMap<Period, PeriodAccumulator> {
        let mut by_period: BTreeMap<Period, PeriodAccumulator> = BTreeMap::new();
        for entry in entries {
            by_period.entry(entry.period).or_default().absorb(entry);
        }
        by_period
    }

    /// Status of one accumulated period, where `period` and `now` are
    /// `YYYY * 100 + MM` numbers.
    pub fn resolve_status(period: i64, now: i64, acc: &PeriodAccumulator) -> PeriodStatus {
        let in_future = period > now;

        if acc.marked_future && acc.balance >= Decimal::ZERO {
            PeriodStatus::Future
        } else if acc.balance < Decimal::ZERO {
            PeriodStatus::Credit
        } else if acc.balance > Decimal::ZERO && acc.paid > Decimal::ZERO {
            PeriodStatus::Partial
        } else if acc.balance > Decimal::ZERO {
            if in_future {
                PeriodStatus::Future
            } else {
                PeriodStatus::Due
            }
        } else if in_future {
            PeriodStatus::Future
        } else {
            PeriodStatus::Paid
        }
    }
}

/// Free-function form of [`PeriodDebtReconciler::reconcile`].
pub fn reconcile(entries: &[RawPeriodEntry], reference: Period) -> ReconciledLedger {
    PeriodDebtReconciler::reconcile(entries, reference)
}

impl std::fmt::Display for ReconciledLedger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Period Ledger (as of {}) ===", self.reference_period)?;
        writeln!(
            f,
            "{:<8} {:>12} {:>12} {:>12}  {}",
            "Period", "Charge", "Paid", "Balance", "Status"
        )?;
        for e in &self.entries {
            writeln!(
                f,
                "{:<8} {:>12} {:>12} {:>12}  {}",
                e.period.to_string(),
                e.charge.to_string(),
                e.paid.to_string(),
                e.balance.to_string(),
                e.status
            )?;
        }
        writeln!(f)?;
        write!(f, "{}", self.summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn p(text: &str) -> Period {
        text.parse().unwrap()
    }

    fn raw(period: &str, charge: Decimal, paid: Decimal) -> RawPeriodEntry {
        RawPeriodEntry::new(p(period), charge, paid)
    }

    #[test]
    fn test_merge_same_period() {
        let entries = vec![
            raw("2025-03", dec!(3000), dec!(0)),
            raw("2025-03", dec!(0), dec!(1000)),
        ];
        let ledger = reconcile(&entries, p("2025-03"));
        assert_eq!(ledger.len(), 1);

        let march = &ledger.entries()[0];
        assert_eq!(march.charge, dec!(3000));
        assert_eq!(march.paid, dec!(1000));
        assert_eq!(march.balance, dec!(2000));
        assert_eq!(march.status, PeriodStatus::Partial);
    }

    #[test]
    fn test_status_relative_to_reference() {
        let entries = vec![
            raw("2025-03", dec!(5000), dec!(0)),
            raw("2025-02", dec!(5000), dec!(0)),
            raw("2025-01", dec!(5000), dec!(5000)),
        ];
        let ledger = reconcile(&entries, p("2025-02"));
        let statuses: Vec<(String, PeriodStatus)> = ledger
            .entries()
            .iter()
            .map(|e| (e.period.to_string(), e.status))
            .collect();

        assert_eq!(
            statuses,
            vec![
                ("2025-01".to_string(), PeriodStatus::Paid),
                ("2025-02".to_string(), PeriodStatus::Due),
                ("2025-03".to_string(), PeriodStatus::Future),
            ]
        );
    }

    #[test]
    fn test_future_zero_balance_period() {
        let ledger = reconcile(&[raw("2025-06", dec!(0), dec!(0))], p("2025-02"));
        assert_eq!(ledger.entries()[0].status, PeriodStatus::Future);
    }

    #[test]
    fn test_past_zero_balance_is_paid_without_marker() {
        let ledger = reconcile(&[raw("2024-11", dec!(4000), dec!(4000))], p("2025-02"));
        assert_eq!(ledger.entries()[0].status, PeriodStatus::Paid);
    }

    #[test]
    fn test_pure_credit_period() {
        let ledger = reconcile(&[raw("2025-01", dec!(0), dec!(2500))], p("2025-02"));
        let entry = &ledger.entries()[0];
        assert_eq!(entry.balance, dec!(-2500));
        assert_eq!(entry.status, PeriodStatus::Credit);
        assert_eq!(ledger.summary().credit_total, dec!(2500));
    }

    #[test]
    fn test_sticky_future_marker() {
        // A past period explicitly marked future stays future while it nets >= 0.
        let entries = vec![
            raw("2025-01", dec!(5000), dec!(0)).with_status(PeriodStatus::Future),
            raw("2025-01", dec!(0), dec!(5000)),
        ];
        let ledger = reconcile(&entries, p("2025-02"));
        assert_eq!(ledger.entries()[0].status, PeriodStatus::Future);
        assert_eq!(ledger.entries()[0].balance, Decimal::ZERO);

        let partially_paid = vec![
            raw("2025-01", dec!(5000), dec!(1000)).with_status(PeriodStatus::Future),
        ];
        let ledger = reconcile(&partially_paid, p("2025-02"));
        assert_eq!(ledger.entries()[0].status, PeriodStatus::Future);
        assert_eq!(ledger.summary().total_due, Decimal::ZERO);
        assert_eq!(ledger.summary().future_total, dec!(4000));
    }

    #[test]
    fn test_credit_overrides_future_marker() {
        let entries = vec![
            raw("2025-05", dec!(5000), dec!(0)).with_status(PeriodStatus::Future),
            raw("2025-05", dec!(0), dec!(6000)),
        ];
        let ledger = reconcile(&entries, p("2025-02"));
        let entry = &ledger.entries()[0];
        assert_eq!(entry.balance, dec!(-1000));
        assert_eq!(entry.status, PeriodStatus::Credit);
    }

    #[test]
    fn test_explicit_balances_are_summed() {
        let entries = vec![
            raw("2025-01", dec!(5000), dec!(0)).with_balance(dec!(4500)),
            raw("2025-01", dec!(0), dec!(1000)),
        ];
        let ledger = reconcile(&entries, p("2025-02"));
        let entry = &ledger.entries()[0];
        // 4500 explicit + (0 - 1000) derived
        assert_eq!(entry.balance, dec!(3500));
        assert_eq!(entry.status, PeriodStatus::Partial);
    }

    #[test]
    fn test_non_sticky_markers_are_ignored() {
        let entries = vec![raw("2025-01", dec!(3000), dec!(3000)).with_status(PeriodStatus::Partial)];
        let ledger = reconcile(&entries, p("2025-02"));
        assert_eq!(ledger.entries()[0].status, PeriodStatus::Paid);
    }

    #[test]
    fn test_summary_excludes_future() {
        let entries = vec![
            raw("2025-01", dec!(5000), dec!(0)),
            raw("2025-02", dec!(5000), dec!(2000)),
            raw("2025-03", dec!(5000), dec!(0)),
            raw("2025-04", dec!(5000), dec!(0)),
        ];
        let ledger = reconcile(&entries, p("2025-02"));
        let summary = ledger.summary();
        assert_eq!(summary.total_due, dec!(8000));
        assert_eq!(summary.due_count, 2);
        assert_eq!(summary.future_total, dec!(10000));
    }

    #[test]
    fn test_entry_lookup_and_views() {
        let entries = vec![
            raw("2025-03", dec!(5000), dec!(0)),
            raw("2024-12", dec!(5000), dec!(5000)),
            raw("2025-01", dec!(5000), dec!(0)),
            raw("2025-02", dec!(5000), dec!(6000)),
        ];
        let ledger = reconcile(&entries, p("2025-02"));

        assert_eq!(ledger.reference_period(), p("2025-02"));
        assert_eq!(ledger.entry(p("2025-01")).map(|e| e.status), Some(PeriodStatus::Due));
        assert!(ledger.entry(p("2025-07")).is_none());

        let payable: Vec<String> = ledger.payable_entries().map(|e| e.period.to_string()).collect();
        assert_eq!(payable, vec!["2025-01", "2025-03"]);

        let outstanding: Vec<String> =
            ledger.outstanding_entries().map(|e| e.period.to_string()).collect();
        assert_eq!(outstanding, vec!["2025-01"]);
    }

    #[test]
    fn test_near_max_charges_in_one_period_saturate() {
        let huge = dec!(50000000000000000000000000000);
        let entries = vec![raw("2025-01", huge, dec!(0)), raw("2025-01", huge, dec!(0))];
        let ledger = reconcile(&entries, p("2025-02"));

        let entry = &ledger.entries()[0];
        assert_eq!(entry.charge, Decimal::MAX);
        assert_eq!(entry.balance, Decimal::MAX);
        assert_eq!(entry.status, PeriodStatus::Due);
        assert_eq!(ledger.summary().total_due, Decimal::MAX);
        assert_eq!(ledger.summary().total_charged, Decimal::MAX);
    }

    #[test]
    fn test_near_max_payments_saturate_to_credit() {
        let huge = dec!(50000000000000000000000000000);
        let entries = vec![
            raw("2025-01", dec!(0), huge),
            raw("2025-01", dec!(0), huge),
            raw("2025-02", Decimal::MIN, Decimal::MAX),
        ];
        let ledger = reconcile(&entries, p("2025-02"));

        assert_eq!(ledger.entries()[0].balance, Decimal::MIN);
        assert_eq!(ledger.entries()[0].status, PeriodStatus::Credit);
        assert_eq!(ledger.entries()[1].balance, Decimal::MIN);
        assert_eq!(ledger.summary().credit_total, Decimal::MAX);
    }

    #[test]
    fn test_empty_input() {
        let ledger = reconcile(&[], p("2025-02"));
        assert!(ledger.is_empty());
        assert_eq!(ledger.summary(), &LedgerSummary::default());
    }

    #[test]
    fn test_inputs_not_mutated() {
        let entries = vec![raw("2025-03", dec!(3000), dec!(0))];
        let before = entries.clone();
        let _ = reconcile(&entries, p("2025-02"));
        assert_eq!(entries, before);
    }
}
