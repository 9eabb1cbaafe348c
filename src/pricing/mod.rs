//! Installment pricing from configurable household rules.

pub mod config;
pub mod engine;
pub mod group;
