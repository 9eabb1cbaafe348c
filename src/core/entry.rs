use crate::core::amount::{lenient_decimal, lenient_decimal_or_zero};
use crate::core::ledger::PeriodStatus;
use crate::core::period::Period;
use log::warn;
use rust_decimal::Decimal;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use thiserror::Error;

/// Errors arising from decoding a raw entry document.
#[derive(Debug, Error)]
pub enum EntryError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("expected a JSON array of period entries, got {0}")]
    NotAnArray(&'static str),
}

/// A single charge/payment posting for a billing period, as received.
///
/// The same period may appear many times (one posting per charge or
/// payment). Amounts decode leniently: missing or non-numeric `charge`
/// and `paid` read as zero, a non-numeric `balance` reads as absent and
/// an unrecognised `status` is ignored.
///
/// # Examples
///
/// ```
/// use billing_rules::core::entry::RawPeriodEntry;
/// use rust_decimal_macros::dec;
///
/// let entry = RawPeriodEntry::new("2025-03".parse().unwrap(), dec!(3000), dec!(1000));
/// assert_eq!(entry.effective_balance(), dec!(2000));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawPeriodEntry {
    pub period: Period,
    #[serde(default, deserialize_with = "lenient_decimal_or_zero")]
    pub charge: Decimal,
    #[serde(default, deserialize_with = "lenient_decimal_or_zero")]
    pub paid: Decimal,
    #[serde(
        default,
        deserialize_with = "lenient_decimal",
        skip_serializing_if = "Option::is_none"
    )]
    pub balance: Option<Decimal>,
    #[serde(
        default,
        deserialize_with = "lenient_status",
        skip_serializing_if = "Option::is_none"
    )]
    pub status: Option<PeriodStatus>,
}

fn lenient_status<'de, D>(deserializer: D) -> Result<Option<PeriodStatus>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => s.parse().ok(),
        _ => None,
    })
}

impl RawPeriodEntry {
    pub fn new(period: Period, charge: Decimal, paid: Decimal) -> Self {
        Self {
            period,
            charge,
            paid,
            balance: None,
            status: None,
        }
    }

    /// Set an explicit balance that overrides `charge - paid`.
    pub fn with_balance(mut self, balance: Decimal) -> Self {
        self.balance = Some(balance);
        self
    }

    /// Set the upstream status marker.
    pub fn with_status(mut self, status: PeriodStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// The explicit balance if given, otherwise `charge - paid`
    /// (saturating at the `Decimal` range).
    pub fn effective_balance(&self) -> Decimal {
        self.balance.unwrap_or_else(|| self.charge.saturating_sub(self.paid))
    }

    pub fn is_marked_future(&self) -> bool {
        self.status == Some(PeriodStatus::Future)
    }
}

/// A batch of raw entries for one household, ready for reconciliation.
///
/// Serializes as a bare JSON array of entries. Deserializing follows
/// [`RawEntrySet::from_value`], so malformed elements are skipped rather
/// than failing the document.
#[derive(Debug, Clone, Default)]
pub struct RawEntrySet {
    entries: Vec<RawPeriodEntry>,
    rejected: usize,
}

impl RawEntrySet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode a JSON array of entries.
    ///
    /// Elements that cannot be read as an entry (most commonly because
    /// `period` is missing or not `YYYY-MM`) are skipped, logged and
    /// counted in [`RawEntrySet::rejected`]. Only a syntax error or a
    /// non-array document fails the whole decode.
    pub fn from_json_str(json: &str) -> Result<Self, EntryError> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_value(value)
    }

    pub fn from_value(value: Value) -> Result<Self, EntryError> {
        let items = match value {
            Value::Array(items) => items,
            Value::Object(_) => return Err(EntryError::NotAnArray("an object")),
            Value::String(_) => return Err(EntryError::NotAnArray("a string")),
            Value::Number(_) => return Err(EntryError::NotAnArray("a number")),
            Value::Bool(_) => return Err(EntryError::NotAnArray("a boolean")),
            Value::Null => return Err(EntryError::NotAnArray("null")),
        };

        let mut set = Self::new();
        for (index, item) in items.into_iter().enumerate() {
            match serde_json::from_value::<RawPeriodEntry>(item) {
                Ok(entry) => set.add(entry),
                Err(e) => {
                    warn!("skipping period entry #{}: {}", index, e);
                    set.rejected += 1;
                }
            }
        }
        Ok(set)
    }

    pub fn add(&mut self, entry: RawPeriodEntry) {
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[RawPeriodEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of elements dropped while decoding.
    pub fn rejected(&self) -> usize {
        self.rejected
    }

    /// All distinct periods referenced, ascending.
    pub fn periods(&self) -> Vec<Period> {
        let mut periods: Vec<Period> = self.entries.iter().map(|e| e.period).collect();
        periods.sort();
        periods.dedup();
        periods
    }
}

impl Serialize for RawEntrySet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.entries.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for RawEntrySet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Self::from_value(value).map_err(de::Error::custom)
    }
}

impl FromIterator<RawPeriodEntry> for RawEntrySet {
    fn from_iter<T: IntoIterator<Item = RawPeriodEntry>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().collect(),
            rejected: 0,
        }
    }
}
