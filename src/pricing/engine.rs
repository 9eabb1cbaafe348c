use crate::core::rounding::RoundingPolicy;
use crate::pricing::config::{PriceRuleConfig, PriceRules};
use crate::pricing::group::GroupComposition;
use log::{debug, warn};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Every intermediate of an installment computation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceBreakdown {
    /// Household size after normalization (at least one).
    pub member_count: u32,
    pub group_factor: Decimal,
    pub age_factor: Decimal,
    pub cremation_cost: Decimal,
    /// Unrounded `base * group_factor * age_factor + cremation_cost`.
    pub subtotal: Decimal,
    /// `subtotal` rounded by the engine's rounding policy.
    pub installment: Decimal,
}

/// Computes the ideal recurring installment for a household.
///
/// Built once per rule configuration; defaults are applied at
/// construction so every quote evaluates the same resolved rules. The
/// engine holds no mutable state and never fails.
///
/// # Algorithm
///
/// 1. `n = max(1, member_count)`.
/// 2. Group factor: the `minMap` override for `n` if present, otherwise
///    `1 + (n - neutral_at) * step`.
/// 3. Age factor: the first tier (by `min` descending) with
///    `min <= max_age`, otherwise 1.
/// 4. `cremation_cost = base * cremation_coef * cremation_count`.
/// 5. `subtotal = base * group_factor * age_factor + cremation_cost`.
/// 6. Round to the nearest 500.
///
/// Arithmetic saturates at the `Decimal` range instead of overflowing, so
/// an absurd rule document still prices to a finite multiple of 500.
///
/// # Examples
///
/// ```
/// use billing_rules::pricing::config::PriceRuleConfig;
/// use billing_rules::pricing::engine::PriceRuleEngine;
/// use billing_rules::pricing::group::GroupComposition;
/// use rust_decimal_macros::dec;
///
/// let config = PriceRuleConfig::from_json_str(
///     r#"{ "base": 16000, "group": { "neutralAt": 4, "step": 0.25 } }"#,
/// ).unwrap();
/// let engine = PriceRuleEngine::new(&config);
///
/// assert_eq!(engine.ideal_installment(&GroupComposition::new(4, 0, 40)), dec!(16000));
/// assert_eq!(engine.ideal_installment(&GroupComposition::new(5, 0, 40)), dec!(20000));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceRuleEngine {
    rules: PriceRules,
    rounding: RoundingPolicy,
}

impl PriceRuleEngine {
    pub fn new(config: &PriceRuleConfig) -> Self {
        Self::from_rules(config.resolve())
    }

    pub fn from_rules(rules: PriceRules) -> Self {
        Self {
            rules,
            rounding: RoundingPolicy::default(),
        }
    }

    /// Replace the rounding policy (500 by default).
    pub fn with_rounding(mut self, rounding: RoundingPolicy) -> Self {
        self.rounding = rounding;
        self
    }

    pub fn rules(&self) -> &PriceRules {
        &self.rules
    }

    pub fn rounding(&self) -> RoundingPolicy {
        self.rounding
    }

    /// Household-size multiplier. Deliberately unclamped: small
    /// households may be cheaper than the neutral size.
    pub fn group_factor(&self, member_count: u32) -> Decimal {
        let n = member_count.max(1);
        match self.rules.min_map.get(&n) {
            Some(factor) => *factor,
            None => Decimal::ONE.saturating_add(
                Decimal::from(n)
                    .saturating_sub(self.rules.neutral_at)
                    .saturating_mul(self.rules.step),
            ),
        }
    }

    /// Oldest-member multiplier.
    pub fn age_factor(&self, max_age: u32) -> Decimal {
        let age = Decimal::from(max_age);
        self.rules
            .age_tiers
            .iter()
            .find(|tier| tier.min <= age)
            .map(|tier| tier.coef)
            .unwrap_or(Decimal::ONE)
    }

    pub fn cremation_cost(&self, cremation_count: u32) -> Decimal {
        self.rules
            .base
            .saturating_mul(self.rules.cremation_coef)
            .saturating_mul(Decimal::from(cremation_count))
    }

    /// Full computation with intermediates, for previews.
    pub fn quote(&self, group: &GroupComposition) -> PriceBreakdown {
        let member_count = group.priced_members();
        let group_factor = self.group_factor(member_count);
        let age_factor = self.age_factor(group.max_age);
        let cremation_cost = self.cremation_cost(group.cremation_count);

        let subtotal = self
            .rules
            .base
            .saturating_mul(group_factor)
            .saturating_mul(age_factor)
            .saturating_add(cremation_cost);
        if subtotal == Decimal::MAX || subtotal == Decimal::MIN {
            warn!("installment subtotal saturated at {} for {:?}", subtotal, group);
        }
        let installment = self.rounding.round(subtotal);

        debug!(
            "quote: n={} group_factor={} age_factor={} cremation_cost={} subtotal={} installment={}",
            member_count, group_factor, age_factor, cremation_cost, subtotal, installment
        );

        PriceBreakdown {
            member_count,
            group_factor,
            age_factor,
            cremation_cost,
            subtotal,
            installment,
        }
    }

    /// The rounded installment for a household.
    pub fn ideal_installment(&self, group: &GroupComposition) -> Decimal {
        self.quote(group).installment
    }
}

impl Default for PriceRuleEngine {
    fn default() -> Self {
        Self::from_rules(PriceRules::default())
    }
}

/// One-shot form of [`PriceRuleEngine::ideal_installment`].
pub fn compute_ideal_installment(config: &PriceRuleConfig, group: &GroupComposition) -> Decimal {
    PriceRuleEngine::new(config).ideal_installment(group)
}

impl std::fmt::Display for PriceBreakdown {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Installment Quote ===")?;
        writeln!(f, "Members:        {}", self.member_count)?;
        writeln!(f, "Group Factor:   {}", self.group_factor)?;
        writeln!(f, "Age Factor:     {}", self.age_factor)?;
        writeln!(f, "Cremation Cost: {}", self.cremation_cost)?;
        writeln!(f, "Subtotal:       {}", self.subtotal)?;
        writeln!(f, "Installment:    {}", self.installment)
    }
}
