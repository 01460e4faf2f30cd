use chrono::{Datelike, Duration, NaiveDate, Weekday};
use itertools::Itertools;

use crate::error::{Error, ErrorKind, Result};

/// Convention for numbering the weeks of a year. The week-based year starts
/// with the first week that has at least `minimal_days_in_first_week` days
/// in the new calendar year.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeekNumberRule {
    first_day_of_week: Weekday,
    minimal_days_in_first_week: u8,
}

impl WeekNumberRule {
    /// ISO-8601: weeks start on Monday, week 1 contains the first Thursday.
    pub const ISO: WeekNumberRule = WeekNumberRule {
        first_day_of_week: Weekday::Mon,
        minimal_days_in_first_week: 4,
    };

    /// Weeks start on Sunday, week 1 contains January 1st.
    pub const SUNDAY_START: WeekNumberRule = WeekNumberRule {
        first_day_of_week: Weekday::Sun,
        minimal_days_in_first_week: 1,
    };

    pub fn new(first_day_of_week: Weekday, minimal_days_in_first_week: u8) -> Self {
        WeekNumberRule {
            first_day_of_week,
            minimal_days_in_first_week: minimal_days_in_first_week.clamp(1, 7),
        }
    }

    pub fn first_day_of_week(&self) -> Weekday {
        self.first_day_of_week
    }

    pub fn minimal_days_in_first_week(&self) -> u8 {
        self.minimal_days_in_first_week
    }

    /// First day of week 1 of the week-based `year`.
    fn start_of_year(&self, year: i32) -> Option<NaiveDate> {
        let jan1 = NaiveDate::from_ymd_opt(year, 1, 1)?;
        let offset = days_after(self.first_day_of_week, jan1.weekday());
        let week_start = jan1.checked_sub_signed(Duration::days(offset as i64))?;

        if 7 - offset >= self.minimal_days_in_first_week as u32 {
            Some(week_start)
        } else {
            week_start.checked_add_signed(Duration::days(7))
        }
    }

    /// Week of the week-based year `date` falls into. `None` only if the
    /// computation leaves the representable date range.
    pub fn week_of_week_based_year(&self, date: &NaiveDate) -> Option<u32> {
        let start = self.start_of_year(date.year())?;

        let start = if *date < start {
            self.start_of_year(date.year().checked_sub(1)?)?
        } else {
            match date.year().checked_add(1).and_then(|y| self.start_of_year(y)) {
                Some(next) if *date >= next => next,
                _ => start,
            }
        };

        Some((date.signed_duration_since(start).num_days() / 7) as u32 + 1)
    }
}

impl Default for WeekNumberRule {
    fn default() -> Self {
        WeekNumberRule::ISO
    }
}

/// Number of days `day` lies after `first` in a week starting at `first`.
pub fn days_after(first: Weekday, day: Weekday) -> u32 {
    (day.num_days_from_monday() + 7 - first.num_days_from_monday()) % 7
}

/// Week number for the display row starting at `first_date_of_row`.
///
/// When the seven days of the row disagree, `require_unanimous` yields no
/// number at all; otherwise the number held by at least four of the days
/// wins. Rows at the ends of the date range fall back to week 1.
pub fn compute_week_number(
    first_date_of_row: NaiveDate,
    rule: &WeekNumberRule,
    require_unanimous: bool,
) -> Option<u32> {
    let days: Option<Vec<NaiveDate>> = (0..7)
        .map(|offset| first_date_of_row.checked_add_signed(Duration::days(offset)))
        .collect();

    match days {
        Some(days) => majority_week_number(&days, rule, require_unanimous).unwrap_or(Some(1)),
        None => {
            log::debug!(
                "Week row starting {} exceeds the date range, using week 1",
                first_date_of_row
            );
            Some(1)
        }
    }
}

/// Majority-rules week number for exactly seven consecutive days.
pub fn majority_week_number(
    days: &[NaiveDate],
    rule: &WeekNumberRule,
    require_unanimous: bool,
) -> Result<Option<u32>> {
    let consecutive = days
        .iter()
        .tuple_windows()
        .all(|(a, b)| a.succ_opt().as_ref() == Some(b));

    if days.len() != 7 || !consecutive {
        return Err(Error::new(
            ErrorKind::InvalidWeekRange,
            &format!("got {} days", days.len()),
        ));
    }

    let weeks: Option<Vec<u32>> = days
        .iter()
        .map(|day| rule.week_of_week_based_year(day))
        .collect();

    let weeks = match weeks {
        Some(weeks) => weeks,
        None => {
            log::debug!("Week number of {} exceeds the date range, using week 1", days[0]);
            return Ok(Some(1));
        }
    };

    let counts = weeks.iter().copied().counts();

    if counts.len() == 1 {
        Ok(Some(weeks[0]))
    } else if require_unanimous {
        Ok(None)
    } else {
        Ok(counts
            .into_iter()
            .max_by_key(|&(_, count)| count)
            .map(|(week, _)| week))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn iso_weeks_match_chrono() {
        let mut day = date(2019, 12, 1);
        while day < date(2026, 2, 1) {
            assert_eq!(
                WeekNumberRule::ISO.week_of_week_based_year(&day),
                Some(day.iso_week().week()),
                "{}",
                day
            );
            day = day.succ_opt().unwrap();
        }
    }

    #[test]
    fn sunday_start_weeks() {
        let rule = WeekNumberRule::SUNDAY_START;
        // 2022-01-01 is a Saturday: week 1 is just that day.
        assert_eq!(rule.week_of_week_based_year(&date(2022, 1, 1)), Some(1));
        assert_eq!(rule.week_of_week_based_year(&date(2022, 1, 2)), Some(2));
        // 2021-12-26 is a Sunday and belongs to week 1 of 2022.
        assert_eq!(rule.week_of_week_based_year(&date(2021, 12, 26)), Some(1));
        assert_eq!(rule.week_of_week_based_year(&date(2021, 12, 25)), Some(52));
    }

    #[test]
    fn row_within_one_week_for_every_start_day() {
        let monday = date(2024, 3, 4);
        for shift in 0..7 {
            let first = monday + Duration::days(shift);
            let rule = WeekNumberRule::new(first.weekday(), 4);
            let expected = rule.week_of_week_based_year(&first);

            assert!(expected.is_some());
            assert_eq!(compute_week_number(first, &rule, true), expected);
            assert_eq!(compute_week_number(first, &rule, false), expected);
        }
    }

    #[test]
    fn row_crossing_a_week_boundary() {
        // Sunday 2024-03-03 is ISO week 9, the following six days week 10.
        let first = date(2024, 3, 3);
        assert_eq!(compute_week_number(first, &WeekNumberRule::ISO, true), None);
        assert_eq!(compute_week_number(first, &WeekNumberRule::ISO, false), Some(10));

        // Thursday start: Thu..Sun are week 9, Mon..Wed week 10.
        let first = date(2024, 2, 29);
        assert_eq!(compute_week_number(first, &WeekNumberRule::ISO, false), Some(9));
    }

    #[test]
    fn year_end_row_uses_majority() {
        // Sunday 2020-12-27 (ISO week 52) followed by Mon..Sat of week 53.
        let first = date(2020, 12, 27);
        assert_eq!(compute_week_number(first, &WeekNumberRule::ISO, false), Some(53));
    }

    #[test]
    fn extreme_dates_fall_back_to_week_one() {
        let near_end = NaiveDate::MAX - Duration::days(3);
        assert_eq!(compute_week_number(near_end, &WeekNumberRule::ISO, false), Some(1));

        assert_eq!(compute_week_number(NaiveDate::MIN, &WeekNumberRule::ISO, true), Some(1));
    }

    #[test]
    fn non_week_ranges_are_rejected() {
        let days: Vec<NaiveDate> = (0..6).map(|i| date(2024, 1, 1) + Duration::days(i)).collect();
        assert!(majority_week_number(&days, &WeekNumberRule::ISO, false).is_err());

        let mut days: Vec<NaiveDate> = (0..7).map(|i| date(2024, 1, 1) + Duration::days(i)).collect();
        days[3] = date(2024, 5, 5);
        assert!(majority_week_number(&days, &WeekNumberRule::ISO, false).is_err());
    }
}
