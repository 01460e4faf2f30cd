use chrono::{Datelike, NaiveDate, Weekday};

use crate::color::Color;

/// Decides which dates may be selected.
pub trait VetoPolicy {
    fn is_date_allowed(&self, date: &NaiveDate) -> bool;

    fn date_range_limits(&self) -> Option<DateRangeLimits> {
        None
    }
}

impl<F: Fn(&NaiveDate) -> bool> VetoPolicy for F {
    fn is_date_allowed(&self, date: &NaiveDate) -> bool {
        self(date)
    }
}

/// Supplies decorations for dates without affecting whether they can be
/// selected.
pub trait HighlightPolicy {
    fn highlight_info(&self, date: &NaiveDate) -> Option<HighlightInfo>;
}

impl<F: Fn(&NaiveDate) -> Option<HighlightInfo>> HighlightPolicy for F {
    fn highlight_info(&self, date: &NaiveDate) -> Option<HighlightInfo> {
        self(date)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HighlightInfo {
    pub background: Option<Color>,
    pub text: Option<Color>,
    pub tooltip: Option<String>,
}

impl HighlightInfo {
    pub fn new() -> Self {
        HighlightInfo::default()
    }

    pub fn background(mut self, color: Color) -> Self {
        self.background = Some(color);
        self
    }

    pub fn text(mut self, color: Color) -> Self {
        self.text = Some(color);
        self
    }

    pub fn tooltip(mut self, tooltip: &str) -> Self {
        self.tooltip = Some(tooltip.to_owned());
        self
    }
}

/// Allows only dates within an inclusive range. Either end may be open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRangeLimits {
    pub first: Option<NaiveDate>,
    pub last: Option<NaiveDate>,
}

impl DateRangeLimits {
    pub fn new(first: Option<NaiveDate>, last: Option<NaiveDate>) -> Self {
        DateRangeLimits { first, last }
    }
}

impl VetoPolicy for DateRangeLimits {
    fn is_date_allowed(&self, date: &NaiveDate) -> bool {
        self.first.map_or(true, |first| *date >= first)
            && self.last.map_or(true, |last| *date <= last)
    }

    fn date_range_limits(&self) -> Option<DateRangeLimits> {
        Some(*self)
    }
}

/// Vetoes every date falling on one of the given weekdays.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeekdayVeto(pub Vec<Weekday>);

impl VetoPolicy for WeekdayVeto {
    fn is_date_allowed(&self, date: &NaiveDate) -> bool {
        !self.0.contains(&date.weekday())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn range_limits_are_inclusive() {
        let limits = DateRangeLimits::new(Some(date(2024, 2, 10)), Some(date(2024, 2, 20)));
        assert!(!limits.is_date_allowed(&date(2024, 2, 9)));
        assert!(limits.is_date_allowed(&date(2024, 2, 10)));
        assert!(limits.is_date_allowed(&date(2024, 2, 20)));
        assert!(!limits.is_date_allowed(&date(2024, 2, 21)));
        assert_eq!(limits.date_range_limits(), Some(limits));

        let open = DateRangeLimits::new(None, Some(date(2024, 1, 1)));
        assert!(open.is_date_allowed(&date(-4000, 1, 1)));
    }

    #[test]
    fn closures_are_policies() {
        let no_13th = |d: &NaiveDate| d.day() != 13;
        assert!(!no_13th.is_date_allowed(&date(2024, 9, 13)));
        assert_eq!(no_13th.date_range_limits(), None);

        let weekend = WeekdayVeto(vec![Weekday::Sat, Weekday::Sun]);
        assert!(!weekend.is_date_allowed(&date(2024, 2, 17)));
        assert!(weekend.is_date_allowed(&date(2024, 2, 16)));
    }
}
