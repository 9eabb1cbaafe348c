//! Foundational types: periods, amounts, raw entries, ledger entries, rounding.

pub mod amount;
pub mod entry;
pub mod ledger;
pub mod period;
pub mod rounding;
