use chrono::{Datelike, Month, NaiveDate};
use num_traits::FromPrimitive;
use std::cmp::Ordering;
use std::convert::TryFrom;
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, ErrorKind, Result};

/// Number of days of `month` in `year` (proleptic Gregorian, so year -4 is a
/// leap year). Returns 0 only if the month lies outside the representable
/// date range.
pub fn days_of_month(month: &Month, year: i32) -> u32 {
    (28..=31)
        .rev()
        .find(|&day| NaiveDate::from_ymd_opt(year, month.number_from_month(), day).is_some())
        .unwrap_or(0)
}

/// A displayed calendar page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearMonth {
    year: i32,
    month: Month,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Result<Self> {
        let index = Month::from_u32(month).ok_or_else(|| {
            Error::new(
                ErrorKind::InvalidYearMonth,
                &format!("month {} is not within 1..=12", month),
            )
        })?;

        YearMonth::from_month(year, index)
    }

    pub fn from_month(year: i32, month: Month) -> Result<Self> {
        if NaiveDate::from_ymd_opt(year, month.number_from_month(), 1).is_none() {
            return Err(Error::new(
                ErrorKind::InvalidYearMonth,
                &format!("{}-{:02} is outside the supported date range", year, month.number_from_month()),
            ));
        }

        Ok(YearMonth { year, month })
    }

    pub fn of<T: Datelike>(date: &T) -> Self {
        // Any existing date lies in a representable month.
        YearMonth {
            year: date.year(),
            month: Month::from_u32(date.month()).unwrap_or(Month::January),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> Month {
        self.month
    }

    pub fn month_number(&self) -> u32 {
        self.month.number_from_month()
    }

    pub fn length(&self) -> u32 {
        days_of_month(&self.month, self.year)
    }

    pub fn first_day(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month_number(), 1)
            .unwrap_or(NaiveDate::MIN)
    }

    pub fn last_day(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month_number(), self.length())
            .unwrap_or(NaiveDate::MAX)
    }

    pub fn day(&self, day: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month_number(), day)
    }

    pub fn contains(&self, date: &NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month_number()
    }

    pub fn checked_add_months(&self, months: i32) -> Option<Self> {
        let index = i64::from(self.year) * 12 + i64::from(self.month_number() - 1) + i64::from(months);
        let year = i32::try_from(index.div_euclid(12)).ok()?;
        let month = index.rem_euclid(12) as u32 + 1;

        YearMonth::new(year, month).ok()
    }

    pub fn checked_add_years(&self, years: i32) -> Option<Self> {
        let year = self.year.checked_add(years)?;
        YearMonth::from_month(year, self.month).ok()
    }

    pub fn next(&self) -> Option<Self> {
        self.checked_add_months(1)
    }

    pub fn prev(&self) -> Option<Self> {
        self.checked_add_months(-1)
    }

    pub fn with_month(&self, month: Month) -> Option<Self> {
        YearMonth::from_month(self.year, month).ok()
    }

    pub fn with_year(&self, year: i32) -> Option<Self> {
        YearMonth::from_month(year, self.month).ok()
    }
}

impl<T: Datelike> From<&T> for YearMonth {
    fn from(date: &T) -> Self {
        YearMonth::of(date)
    }
}

impl PartialOrd for YearMonth {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for YearMonth {
    fn cmp(&self, other: &Self) -> Ordering {
        self.year
            .cmp(&other.year)
            .then(self.month_number().cmp(&other.month_number()))
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{:02}", self.year, self.month_number())
    }
}

impl FromStr for YearMonth {
    type Err = Error;

    /// Parses `YYYY-MM`, the format written by `Display`.
    fn from_str(s: &str) -> Result<Self> {
        let invalid = || {
            Error::new(
                ErrorKind::InvalidYearMonth,
                &format!("'{}' is not of the form YYYY-MM", s),
            )
        };

        let (year, month) = s.trim().rsplit_once('-').ok_or_else(invalid)?;
        let year = year.parse::<i32>().map_err(|_| invalid())?;
        let month = month.parse::<u32>().map_err(|_| invalid())?;

        YearMonth::new(year, month)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_year_month() {
        assert_eq!("2024-02".parse::<YearMonth>().unwrap(), YearMonth::new(2024, 2).unwrap());
        assert_eq!("-0004-12".parse::<YearMonth>().unwrap(), YearMonth::new(-4, 12).unwrap());
        assert!("2024".parse::<YearMonth>().is_err());
        assert!("2024-13".parse::<YearMonth>().is_err());
        assert!("twenty-02".parse::<YearMonth>().is_err());
    }

    #[test]
    fn february_lengths() {
        assert_eq!(YearMonth::new(2024, 2).unwrap().length(), 29);
        assert_eq!(YearMonth::new(2023, 2).unwrap().length(), 28);
        assert_eq!(YearMonth::new(1900, 2).unwrap().length(), 28);
        assert_eq!(YearMonth::new(2000, 2).unwrap().length(), 29);
        assert_eq!(YearMonth::new(0, 2).unwrap().length(), 29);
        assert_eq!(YearMonth::new(-4, 2).unwrap().length(), 29);
        assert_eq!(YearMonth::new(-1, 2).unwrap().length(), 28);
        assert_eq!(YearMonth::new(-100, 2).unwrap().length(), 28);
    }

    #[test]
    fn invalid_month_rejected() {
        assert!(YearMonth::new(2024, 0).is_err());
        assert!(YearMonth::new(2024, 13).is_err());
        assert!(YearMonth::new(i32::MAX, 1).is_err());
    }

    #[test]
    fn navigation_wraps_years() {
        let dec = YearMonth::new(2023, 12).unwrap();
        assert_eq!(dec.next(), Some(YearMonth::new(2024, 1).unwrap()));

        let jan = YearMonth::new(0, 1).unwrap();
        assert_eq!(jan.prev(), Some(YearMonth::new(-1, 12).unwrap()));

        let mar = YearMonth::new(2024, 3).unwrap();
        assert_eq!(mar.checked_add_months(-27), Some(YearMonth::new(2021, 12).unwrap()));
        assert_eq!(mar.checked_add_months(22), Some(YearMonth::new(2026, 1).unwrap()));
    }

    #[test]
    fn navigation_past_range_is_none() {
        let last = YearMonth::of(&NaiveDate::MAX);
        assert_eq!(last.next(), None);
        assert_eq!(last.checked_add_years(1), None);

        let first = YearMonth::of(&NaiveDate::MIN);
        assert_eq!(first.prev(), None);
        assert_eq!(first.checked_add_years(-1), None);
    }

    #[test]
    fn ordering_by_year_then_month() {
        let a = YearMonth::new(-1, 12).unwrap();
        let b = YearMonth::new(0, 1).unwrap();
        let c = YearMonth::new(0, 2).unwrap();
        assert!(a < b && b < c);
    }
}
