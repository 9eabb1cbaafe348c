use chrono::Datelike;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors arising from parsing a billing period.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PeriodError {
    #[error("period must have the form YYYY-MM, got {0:?}")]
    Malformed(String),
    #[error("month must be between 1 and 12, got {month} in {text:?}")]
    MonthOutOfRange { text: String, month: u32 },
}

/// A calendar-month billing bucket, written `YYYY-MM`.
///
/// Ordering follows the calendar, which is also the ordering of the
/// `YYYY-MM` text and of [`Period::to_number`].
///
/// # Examples
///
/// ```
/// use billing_rules::core::period::Period;
///
/// let march: Period = "2025-03".parse().unwrap();
/// assert_eq!(march.to_number(), 202503);
/// assert_eq!(march.to_string(), "2025-03");
/// assert!(march > "2025-02".parse().unwrap());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Period {
    year: i32,
    month: u32,
}

impl Period {
    /// Create a period; `None` if `month` is outside 1..=12.
    pub fn new(year: i32, month: u32) -> Option<Self> {
        (1..=12).contains(&month).then_some(Self { year, month })
    }

    /// January of `year`.
    pub fn year_start(year: i32) -> Self {
        Self { year, month: 1 }
    }

    /// The period containing a calendar date.
    pub fn from_date(date: impl Datelike) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    /// Comparable integer form: `YYYY * 100 + MM`.
    pub fn to_number(&self) -> i64 {
        i64::from(self.year) * 100 + i64::from(self.month)
    }

    /// The following calendar month.
    pub fn next(&self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    /// Iterate `count` consecutive periods starting at `self`.
    pub fn range(self, count: usize) -> impl Iterator<Item = Period> {
        std::iter::successors(Some(self), |p| Some(p.next())).take(count)
    }
}

/// `period_to_number("YYYY-MM") = YYYY * 100 + MM`.
pub fn period_to_number(text: &str) -> Result<i64, PeriodError> {
    Ok(text.parse::<Period>()?.to_number())
}

impl FromStr for Period {
    type Err = PeriodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || PeriodError::Malformed(s.to_string());

        let (year, month) = s.split_once('-').ok_or_else(malformed)?;
        if year.len() != 4 || month.len() != 2 {
            return Err(malformed());
        }
        if !year.bytes().chain(month.bytes()).all(|b| b.is_ascii_digit()) {
            return Err(malformed());
        }

        let year: i32 = year.parse().map_err(|_| malformed())?;
        let month: u32 = month.parse().map_err(|_| malformed())?;

        Self::new(year, month).ok_or_else(|| PeriodError::MonthOutOfRange {
            text: s.to_string(),
            month,
        })
    }
}

impl TryFrom<String> for Period {
    type Error = PeriodError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Period> for String {
    fn from(period: Period) -> Self {
        period.to_string()
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_parse_and_display() {
        let p: Period = "2025-03".parse().unwrap();
        assert_eq!(p.year(), 2025);
        assert_eq!(p.month(), 3);
        assert_eq!(format!("{}", p), "2025-03");
    }

    #[test]
    fn test_period_to_number() {
        assert_eq!(period_to_number("2025-03").unwrap(), 202503);
        assert_eq!(period_to_number("1999-12").unwrap(), 199912);
    }

    #[test]
    fn test_rejects_malformed() {
        for text in ["2025-3", "25-03", "2025/03", "2025-03-01", "abcd-ef", "", "2025-+3"] {
            assert!(
                matches!(text.parse::<Period>(), Err(PeriodError::Malformed(_))),
                "{text:?} should be malformed"
            );
        }
    }

    #[test]
    fn test_rejects_month_out_of_range() {
        assert!(matches!(
            "2025-13".parse::<Period>(),
            Err(PeriodError::MonthOutOfRange { month: 13, .. })
        ));
        assert!(matches!(
            "2025-00".parse::<Period>(),
            Err(PeriodError::MonthOutOfRange { month: 0, .. })
        ));
    }

    #[test]
    fn test_ordering_matches_numbers() {
        let a: Period = "2024-12".parse().unwrap();
        let b: Period = "2025-01".parse().unwrap();
        assert!(a < b);
        assert!(a.to_number() < b.to_number());
        assert!(a.to_string() < b.to_string());
    }

    #[test]
    fn test_next_wraps_year() {
        let dec: Period = "2024-12".parse().unwrap();
        assert_eq!(dec.next().to_string(), "2025-01");
        let periods: Vec<String> = dec.range(3).map(|p| p.to_string()).collect();
        assert_eq!(periods, vec!["2024-12", "2025-01", "2025-02"]);
    }

    #[test]
    fn test_from_date() {
        let date = NaiveDate::from_ymd_opt(2025, 2, 17).unwrap();
        assert_eq!(Period::from_date(date).to_string(), "2025-02");
    }

    #[test]
    fn test_serde_as_string() {
        let p: Period = serde_json::from_str("\"2025-07\"").unwrap();
        assert_eq!(p, Period::new(2025, 7).unwrap());
        assert_eq!(serde_json::to_string(&p).unwrap(), "\"2025-07\"");
        assert!(serde_json::from_str::<Period>("\"July\"").is_err());
    }
}
