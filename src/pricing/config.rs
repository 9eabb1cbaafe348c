use crate::core::amount::{decimal_from_value, lenient_decimal};
use log::warn;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use thiserror::Error;

/// Default household size treated as factor 1.0.
pub const DEFAULT_NEUTRAL_AT: Decimal = Decimal::ONE;

/// Errors arising from decoding a rule document.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// One age bracket: households whose oldest member is at least `min`
/// years old are priced with `coef`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgeTier {
    pub min: Decimal,
    pub coef: Decimal,
}

impl AgeTier {
    pub fn new(min: Decimal, coef: Decimal) -> Self {
        Self { min, coef }
    }
}

/// Household-size rules, as received.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupRuleConfig {
    #[serde(
        default,
        deserialize_with = "lenient_decimal",
        skip_serializing_if = "Option::is_none"
    )]
    pub neutral_at: Option<Decimal>,
    #[serde(
        default,
        deserialize_with = "lenient_decimal",
        skip_serializing_if = "Option::is_none"
    )]
    pub step: Option<Decimal>,
    /// Exact household size -> factor override.
    #[serde(default, deserialize_with = "lenient_min_map")]
    pub min_map: BTreeMap<u32, Decimal>,
}

/// Pricing rules exactly as the backend resource provides them.
///
/// Every field is optional and decodes leniently: a field that is
/// missing, `null` or non-numeric stays `None` (or empty) and picks up its
/// default in [`PriceRuleConfig::resolve`]. Decoding a JSON object never
/// fails.
///
/// # Examples
///
/// ```
/// use billing_rules::pricing::config::PriceRuleConfig;
/// use rust_decimal_macros::dec;
///
/// let config = PriceRuleConfig::from_json_str(r#"{
///     "base": 16000,
///     "cremationCoef": 0.125,
///     "group": { "neutralAt": 4, "step": 0.25, "minMap": { "1": 0.5 } },
///     "age": [ { "min": 66, "coef": 1.375 } ]
/// }"#).unwrap();
///
/// let rules = config.resolve();
/// assert_eq!(rules.base, dec!(16000));
/// assert_eq!(rules.min_map[&1], dec!(0.5));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceRuleConfig {
    #[serde(
        default,
        deserialize_with = "lenient_decimal",
        skip_serializing_if = "Option::is_none"
    )]
    pub base: Option<Decimal>,
    #[serde(
        default,
        deserialize_with = "lenient_decimal",
        skip_serializing_if = "Option::is_none"
    )]
    pub cremation_coef: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient_group")]
    pub group: GroupRuleConfig,
    #[serde(default, deserialize_with = "lenient_age_tiers")]
    pub age: Vec<AgeTier>,
}

fn lenient_group<'de, D>(deserializer: D) -> Result<GroupRuleConfig, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(v @ Value::Object(_)) => serde_json::from_value(v).unwrap_or_default(),
        _ => GroupRuleConfig::default(),
    })
}

fn lenient_min_map<'de, D>(deserializer: D) -> Result<BTreeMap<u32, Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    let Some(Value::Object(map)) = value else {
        return Ok(BTreeMap::new());
    };

    Ok(map
        .iter()
        .filter_map(|(size, factor)| {
            let size: u32 = size.trim().parse().ok().filter(|n| *n > 0)?;
            Some((size, decimal_from_value(factor)?))
        })
        .collect())
}

fn lenient_age_tiers<'de, D>(deserializer: D) -> Result<Vec<AgeTier>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    let Some(Value::Array(items)) = value else {
        return Ok(Vec::new());
    };

    Ok(items
        .iter()
        .filter_map(|item| {
            let min = decimal_from_value(item.get("min")?)?;
            let coef = decimal_from_value(item.get("coef")?)?;
            Some(AgeTier::new(min, coef))
        })
        .collect())
}

impl PriceRuleConfig {
    /// Decode a rule document. Fails only on malformed JSON syntax.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let value: Value = serde_json::from_str(json)?;
        Ok(Self::from_value(value))
    }

    /// Decode an already-parsed rule document. A non-object yields the
    /// all-default configuration.
    pub fn from_value(value: Value) -> Self {
        match value {
            v @ Value::Object(_) => serde_json::from_value(v).unwrap_or_default(),
            _ => Self::default(),
        }
    }

    /// Apply defaults once, producing the rules the engine evaluates.
    ///
    /// Age tiers come back sorted by `min` descending with duplicate
    /// minimums removed (the first one listed is kept).
    pub fn resolve(&self) -> PriceRules {
        let mut age_tiers: Vec<AgeTier> = Vec::with_capacity(self.age.len());
        for tier in &self.age {
            if age_tiers.iter().any(|t| t.min == tier.min) {
                warn!("dropping duplicate age tier with min {}", tier.min);
                continue;
            }
            age_tiers.push(tier.clone());
        }
        age_tiers.sort_by(|a, b| b.min.cmp(&a.min));

        PriceRules {
            base: self.base.unwrap_or(Decimal::ZERO),
            cremation_coef: self.cremation_coef.unwrap_or(Decimal::ZERO),
            neutral_at: self.group.neutral_at.unwrap_or(DEFAULT_NEUTRAL_AT),
            step: self.group.step.unwrap_or(Decimal::ZERO),
            min_map: self.group.min_map.clone(),
            age_tiers,
        }
    }
}

/// Pricing rules with every default applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PriceRules {
    pub base: Decimal,
    pub cremation_coef: Decimal,
    pub neutral_at: Decimal,
    pub step: Decimal,
    pub min_map: BTreeMap<u32, Decimal>,
    /// Sorted by `min` descending, unique `min`.
    pub age_tiers: Vec<AgeTier>,
}

impl Default for PriceRules {
    fn default() -> Self {
        PriceRuleConfig::default().resolve()
    }
}
