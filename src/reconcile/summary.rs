use crate::core::ledger::{PeriodLedgerEntry, PeriodStatus};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Account-level totals derived from a reconciled ledger.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerSummary {
    /// Sum of positive balances outside future periods.
    pub total_due: Decimal,
    /// Sum of `|balance|` over periods in credit.
    pub credit_total: Decimal,
    /// Number of periods counted in `total_due`.
    pub due_count: usize,
    /// Positive balances of future periods (not yet owed).
    pub future_total: Decimal,
    pub total_charged: Decimal,
    pub total_paid: Decimal,
    pub period_count: usize,
}

impl LedgerSummary {
    /// Totals over `entries`. Sums saturate at the `Decimal` range.
    pub fn from_entries(entries: &[PeriodLedgerEntry]) -> Self {
        let mut summary = LedgerSummary {
            period_count: entries.len(),
            ..Default::default()
        };

        for entry in entries {
            summary.total_charged = summary.total_charged.saturating_add(entry.charge);
            summary.total_paid = summary.total_paid.saturating_add(entry.paid);

            if entry.balance > Decimal::ZERO {
                if entry.status == PeriodStatus::Future {
                    summary.future_total = summary.future_total.saturating_add(entry.balance);
                } else {
                    summary.total_due = summary.total_due.saturating_add(entry.balance);
                    summary.due_count += 1;
                }
            } else if entry.balance < Decimal::ZERO {
                summary.credit_total = summary.credit_total.saturating_add(entry.balance.abs());
            }
        }

        summary
    }

    /// Due amount minus available credit, floored at zero.
    pub fn net_due(&self) -> Decimal {
        (self.total_due - self.credit_total).max(Decimal::ZERO)
    }

    /// Share of charges already paid, 0.0 when nothing was charged.
    pub fn paid_ratio(&self) -> f64 {
        if self.total_charged <= Decimal::ZERO {
            return 0.0;
        }
        match self.total_paid.checked_div(self.total_charged) {
            Some(ratio) => ratio.to_f64().unwrap_or(0.0),
            None => {
                let paid = self.total_paid.to_f64().unwrap_or(0.0);
                let charged = self.total_charged.to_f64().unwrap_or(1.0);
                paid / charged
            }
        }
    }
}

impl std::fmt::Display for LedgerSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Account Summary ===")?;
        writeln!(f, "Periods:        {}", self.period_count)?;
        writeln!(f, "Total Charged:  {}", self.total_charged)?;
        writeln!(f, "Total Paid:     {}", self.total_paid)?;
        writeln!(f, "Paid Ratio:     {:.1}%", self.paid_ratio() * 100.0)?;
        writeln!(f, "Total Due:      {} ({} periods)", self.total_due, self.due_count)?;
        writeln!(f, "Credit:         {}", self.credit_total)?;
        writeln!(f, "Future Charges: {}", self.future_total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::period::Period;
    use approx::assert_relative_eq;
    use rust_decimal_macros::dec;

    fn entry(month: u32, charge: Decimal, paid: Decimal, status: PeriodStatus) -> PeriodLedgerEntry {
        PeriodLedgerEntry {
            period: Period::new(2025, month).unwrap(),
            charge,
            paid,
            balance: charge - paid,
            status,
        }
    }

    #[test]
    fn test_summary_totals() {
        let entries = vec![
            entry(1, dec!(5000), dec!(5000), PeriodStatus::Paid),
            entry(2, dec!(5000), dec!(0), PeriodStatus::Due),
            entry(3, dec!(5000), dec!(2000), PeriodStatus::Partial),
            entry(4, dec!(0), dec!(1500), PeriodStatus::Credit),
            entry(5, dec!(5000), dec!(0), PeriodStatus::Future),
        ];
        let summary = LedgerSummary::from_entries(&entries);

        assert_eq!(summary.period_count, 5);
        assert_eq!(summary.total_due, dec!(8000));
        assert_eq!(summary.due_count, 2);
        assert_eq!(summary.credit_total, dec!(1500));
        assert_eq!(summary.future_total, dec!(5000));
        assert_eq!(summary.total_charged, dec!(20000));
        assert_eq!(summary.total_paid, dec!(8500));
        assert_eq!(summary.net_due(), dec!(6500));
        assert_relative_eq!(summary.paid_ratio(), 0.425, epsilon = 1e-9);
    }

    #[test]
    fn test_empty_summary() {
        let summary = LedgerSummary::from_entries(&[]);
        assert_eq!(summary, LedgerSummary::default());
        assert_eq!(summary.paid_ratio(), 0.0);
        assert_eq!(summary.net_due(), Decimal::ZERO);
    }

    #[test]
    fn test_credit_exceeding_due_floors_net() {
        let entries = vec![
            entry(1, dec!(1000), dec!(0), PeriodStatus::Due),
            entry(2, dec!(0), dec!(4000), PeriodStatus::Credit),
        ];
        let summary = LedgerSummary::from_entries(&entries);
        assert_eq!(summary.net_due(), Decimal::ZERO);
        assert_relative_eq!(summary.paid_ratio(), 4.0, epsilon = 1e-9);
    }

    #[test]
    fn test_totals_saturate_at_decimal_range() {
        let huge = dec!(50000000000000000000000000000);
        let entries = vec![
            entry(1, huge, dec!(0), PeriodStatus::Due),
            entry(2, huge, dec!(0), PeriodStatus::Due),
            entry(3, dec!(0), huge, PeriodStatus::Credit),
            entry(4, dec!(0), huge, PeriodStatus::Credit),
        ];
        let summary = LedgerSummary::from_entries(&entries);
        assert_eq!(summary.total_due, Decimal::MAX);
        assert_eq!(summary.due_count, 2);
        assert_eq!(summary.credit_total, Decimal::MAX);
        assert_eq!(summary.total_charged, Decimal::MAX);
        assert_eq!(summary.net_due(), Decimal::ZERO);
        assert_relative_eq!(summary.paid_ratio(), 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_paid_ratio_with_tiny_charge() {
        let summary = LedgerSummary {
            total_charged: dec!(0.0000000000000000000000000001),
            total_paid: dec!(50000000000000000000000000000),
            ..Default::default()
        };
        assert!(summary.paid_ratio().is_finite());
        assert!(summary.paid_ratio() > 1e50);
    }
}
