//! Period debt reconciliation: merge raw postings into a status ledger.

pub mod reconciler;
pub mod summary;
