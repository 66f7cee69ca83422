//! Calendar month keys (`YYYY-MM`) and month bucketing.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Month key parsing errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MonthError {
    /// Input is not `YYYY-MM` or names a month outside 1..=12.
    #[error("invalid month '{0}', expected YYYY-MM")]
    Invalid(String),
}

/// A calendar month, serialized as `YYYY-MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthKey {
    year: i32,
    month: u32,
}

impl MonthKey {
    /// Builds a key, returning `None` when `month` is not 1..=12.
    #[must_use]
    pub fn new(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(|_| Self { year, month })
    }

    /// The month a date falls in.
    #[must_use]
    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// Year component.
    #[must_use]
    pub const fn year(self) -> i32 {
        self.year
    }

    /// Month component, 1..=12.
    #[must_use]
    pub const fn month(self) -> u32 {
        self.month
    }

    /// First day of the month.
    #[must_use]
    pub fn first_day(self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or(NaiveDate::MIN)
    }

    /// The following month.
    #[must_use]
    pub const fn next(self) -> Self {
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

    /// The preceding month.
    #[must_use]
    pub const fn previous(self) -> Self {
        if self.month == 1 {
            Self {
                year: self.year - 1,
                month: 12,
            }
        } else {
            Self {
                year: self.year,
                month: self.month - 1,
            }
        }
    }

    /// Last day of the month.
    #[must_use]
    pub fn last_day(self) -> NaiveDate {
        self.next()
            .first_day()
            .pred_opt()
            .unwrap_or_else(|| self.first_day())
    }

    /// Number of days in the month.
    #[must_use]
    pub fn days(self) -> u32 {
        self.last_day().day()
    }

    /// Half-open date range `[first_day, next.first_day)` for range queries.
    #[must_use]
    pub fn range(self) -> (NaiveDate, NaiveDate) {
        (self.first_day(), self.next().first_day())
    }

    /// True when `date` falls inside this month.
    #[must_use]
    pub fn contains(self, date: NaiveDate) -> bool {
        Self::of(date) == self
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for MonthKey {
    type Err = MonthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || MonthError::Invalid(s.to_string());
        let (year, month) = s.trim().split_once('-').ok_or_else(invalid)?;
        if year.len() != 4 || month.len() != 2 {
            return Err(invalid());
        }
        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| invalid())?;
        Self::new(year, month).ok_or_else(invalid)
    }
}

impl Serialize for MonthKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for MonthKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Sums dated amounts into month buckets.
#[must_use]
pub fn bucket_by_month<I>(rows: I) -> BTreeMap<MonthKey, Decimal>
where
    I: IntoIterator<Item = (NaiveDate, Decimal)>,
{
    let mut buckets = BTreeMap::new();
    for (date, amount) in rows {
        *buckets.entry(MonthKey::of(date)).or_insert(Decimal::ZERO) += amount;
    }
    buckets
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[rstest]
    #[case("2026-01", 2026, 1)]
    #[case("1999-12", 1999, 12)]
    #[case(" 2026-07 ", 2026, 7)]
    fn test_parse_valid(#[case] input: &str, #[case] year: i32, #[case] month: u32) {
        let key: MonthKey = input.parse().unwrap();
        assert_eq!((key.year(), key.month()), (year, month));
    }

    #[rstest]
    #[case("2026-13")]
    #[case("2026-00")]
    #[case("2026-1")]
    #[case("26-01")]
    #[case("2026/01")]
    #[case("")]
    fn test_parse_invalid(#[case] input: &str) {
        assert!(input.parse::<MonthKey>().is_err());
    }

    #[test]
    fn test_display_pads() {
        assert_eq!(MonthKey::new(2026, 3).unwrap().to_string(), "2026-03");
    }

    #[test]
    fn test_next_and_previous_wrap_years() {
        let dec_2025 = MonthKey::new(2025, 12).unwrap();
        let jan_2026 = MonthKey::new(2026, 1).unwrap();
        assert_eq!(dec_2025.next(), jan_2026);
        assert_eq!(jan_2026.previous(), dec_2025);
    }

    #[rstest]
    #[case(2026, 1, 31)]
    #[case(2026, 2, 28)]
    #[case(2024, 2, 29)]
    #[case(2026, 4, 30)]
    #[case(2026, 12, 31)]
    fn test_days_in_month(#[case] year: i32, #[case] month: u32, #[case] days: u32) {
        assert_eq!(MonthKey::new(year, month).unwrap().days(), days);
    }

    #[test]
    fn test_range_is_half_open() {
        let key = MonthKey::new(2026, 12).unwrap();
        assert_eq!(key.range(), (date(2026, 12, 1), date(2027, 1, 1)));
        assert!(key.contains(date(2026, 12, 31)));
        assert!(!key.contains(date(2027, 1, 1)));
    }

    #[test]
    fn test_serde_as_string() {
        let key = MonthKey::new(2026, 5).unwrap();
        assert_eq!(serde_json::to_string(&key).unwrap(), "\"2026-05\"");
        let back: MonthKey = serde_json::from_str("\"2026-05\"").unwrap();
        assert_eq!(back, key);
        assert!(serde_json::from_str::<MonthKey>("\"May\"").is_err());
    }

    #[test]
    fn test_bucket_by_month() {
        let buckets = bucket_by_month([
            (date(2026, 1, 3), dec!(10)),
            (date(2026, 1, 31), dec!(5.5)),
            (date(2026, 2, 1), dec!(7)),
        ]);
        assert_eq!(buckets.len(), 2);
        assert_eq!(buckets[&MonthKey::new(2026, 1).unwrap()], dec!(15.5));
        assert_eq!(buckets[&MonthKey::new(2026, 2).unwrap()], dec!(7));
    }
}
