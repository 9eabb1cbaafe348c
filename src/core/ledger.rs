use crate::core::period::Period;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors arising from reading a status marker.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StatusError {
    #[error("unknown period status: {0}")]
    Unknown(String),
}

/// Derived state of one billing period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PeriodStatus {
    /// Accepted from upstream records; never produced by reconciliation.
    Open,
    /// Past or current period with an unpaid balance and no payment.
    Due,
    /// Some payment received, balance still owed.
    Partial,
    /// Period after the reference month, or explicitly marked upstream.
    Future,
    /// Overpaid: negative balance.
    Credit,
    /// Settled exactly.
    Paid,
}

impl PeriodStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PeriodStatus::Open => "open",
            PeriodStatus::Due => "due",
            PeriodStatus::Partial => "partial",
            PeriodStatus::Future => "future",
            PeriodStatus::Credit => "credit",
            PeriodStatus::Paid => "paid",
        }
    }
}

impl FromStr for PeriodStatus {
    type Err = StatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "open" => Ok(PeriodStatus::Open),
            "due" => Ok(PeriodStatus::Due),
            "partial" => Ok(PeriodStatus::Partial),
            "future" => Ok(PeriodStatus::Future),
            "credit" => Ok(PeriodStatus::Credit),
            "paid" => Ok(PeriodStatus::Paid),
            other => Err(StatusError::Unknown(other.to_string())),
        }
    }
}

impl fmt::Display for PeriodStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One consolidated period in a reconciled ledger.
///
/// `balance` is `charge - paid` unless upstream records carried explicit
/// balances, in which case it is their sum. Positive means owed,
/// negative means credit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodLedgerEntry {
    pub period: Period,
    pub charge: Decimal,
    pub paid: Decimal,
    pub balance: Decimal,
    pub status: PeriodStatus,
}

impl PeriodLedgerEntry {
    /// Amount still owed for this period (zero for credit or settled).
    pub fn outstanding(&self) -> Decimal {
        self.balance.max(Decimal::ZERO)
    }

    /// A positive balance in a period that is not in the future.
    pub fn is_outstanding(&self) -> bool {
        self.balance > Decimal::ZERO && self.status != PeriodStatus::Future
    }
}
