use chrono::{Datelike, Duration, NaiveDate, Weekday};

use crate::color::{Color, ColorArea};
use crate::month::YearMonth;
use crate::settings::DatePickerSettings;
use crate::week::{compute_week_number, days_after};

pub const COLUMNS: usize = 7;
pub const ROWS: usize = 6;
pub const CELLS: usize = COLUMNS * ROWS;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellKind {
    Blank,
    Normal,
    Highlighted,
    Vetoed,
}

/// One of the 42 slots of a month grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateCell {
    pub date: Option<NaiveDate>,
    pub text: String,
    pub kind: CellKind,
    pub enabled: bool,
    pub selected: bool,
    pub today: bool,
    pub background: Color,
    pub foreground: Color,
    pub border: Option<Color>,
    pub tooltip: Option<String>,
}

impl DateCell {
    fn blank(settings: &DatePickerSettings) -> Self {
        DateCell {
            date: None,
            text: String::new(),
            kind: CellKind::Blank,
            enabled: false,
            selected: false,
            today: false,
            background: settings.color(ColorArea::BackgroundOverallCalendarPanel),
            foreground: settings.color(ColorArea::CalendarTextNormalDates),
            border: None,
            tooltip: None,
        }
    }

    fn of_date(date: NaiveDate, settings: &DatePickerSettings, selected: Option<&NaiveDate>) -> Self {
        let mut cell = DateCell {
            date: Some(date),
            text: date.day().to_string(),
            kind: CellKind::Normal,
            enabled: true,
            selected: false,
            today: false,
            background: settings.color(ColorArea::CalendarBackgroundNormalDates),
            foreground: settings.color(ColorArea::CalendarTextNormalDates),
            border: None,
            tooltip: None,
        };

        if !settings.is_date_allowed(&date) {
            cell.kind = CellKind::Vetoed;
            cell.enabled = false;
            cell.background = settings.color(ColorArea::CalendarBackgroundVetoedDates);
            cell.foreground = settings.color(ColorArea::CalendarTextVetoedDates);
        } else if let Some(info) = settings.highlight_info(&date) {
            cell.kind = CellKind::Highlighted;
            cell.background = info.background.unwrap_or_else(|| {
                settings.color(ColorArea::CalendarDefaultBackgroundHighlightedDates)
            });
            cell.foreground = info
                .text
                .unwrap_or_else(|| settings.color(ColorArea::CalendarDefaultTextHighlightedDates));
            cell.tooltip = info.tooltip;
        }

        if selected == Some(&date) {
            cell.selected = true;
            cell.background = settings.color(ColorArea::CalendarBackgroundSelectedDate);
            cell.border = Some(settings.color(ColorArea::CalendarBorderSelectedDate));
        }

        cell
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeekRow {
    pub week_number: Option<u32>,
}

impl WeekRow {
    pub fn label(&self) -> String {
        self.week_number.map(|w| w.to_string()).unwrap_or_default()
    }
}

/// Everything needed to paint one month page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    pub year_month: YearMonth,
    pub first_day_of_week: Weekday,
    pub month_label: String,
    pub year_label: String,
    pub weekday_labels: Vec<String>,
    pub cells: Vec<DateCell>,
    pub weeks: Vec<WeekRow>,
}

impl Grid {
    pub fn rows(&self) -> std::slice::Chunks<'_, DateCell> {
        self.cells.chunks(COLUMNS)
    }

    pub fn cell_of(&self, date: &NaiveDate) -> Option<&DateCell> {
        self.cells.iter().find(|cell| cell.date.as_ref() == Some(date))
    }

    pub fn mark_today(&mut self, today: &NaiveDate) {
        for cell in self.cells.iter_mut() {
            cell.today = cell.date.as_ref() == Some(today);
        }
    }
}

/// First day of week used for the grid layout. Displayed week numbers
/// bring their own first day of week unless told not to.
pub fn resolve_effective_first_day_of_week(settings: &DatePickerSettings) -> Weekday {
    if settings.week_numbers_displayed() && settings.week_numbers_override_first_day_of_week() {
        settings.week_number_rule().first_day_of_week()
    } else {
        settings.first_day_of_week()
    }
}

/// Lays out `year_month` on 42 cells starting at the effective first day of
/// week. Blank cells pad the grid before the first and after the last day
/// of the month.
pub fn compute_grid(
    year_month: &YearMonth,
    settings: &DatePickerSettings,
    selected: Option<&NaiveDate>,
) -> Grid {
    let first_day_of_week = resolve_effective_first_day_of_week(settings);
    let offset = days_after(first_day_of_week, year_month.first_day().weekday()) as usize;
    let length = year_month.length() as usize;
    let translations = settings.translations();

    let cells: Vec<DateCell> = (0..CELLS)
        .map(|slot| {
            if slot < offset || slot >= offset + length {
                DateCell::blank(settings)
            } else {
                match year_month.day((slot - offset + 1) as u32) {
                    Some(date) => DateCell::of_date(date, settings, selected),
                    None => DateCell::blank(settings),
                }
            }
        })
        .collect();

    let weeks = (0..ROWS)
        .map(|row| {
            let row_slots = row * COLUMNS..(row + 1) * COLUMNS;
            let in_month = row_slots.start < offset + length && row_slots.end > offset;

            let week_number = if settings.week_numbers_displayed() && in_month {
                let shift = (row * COLUMNS) as i64 - offset as i64;
                match year_month.first_day().checked_add_signed(Duration::days(shift)) {
                    Some(first) => compute_week_number(
                        first,
                        &settings.week_number_rule(),
                        settings.week_numbers_require_unanimous(),
                    ),
                    None => Some(1),
                }
            } else {
                None
            };

            WeekRow { week_number }
        })
        .collect();

    let mut weekday = first_day_of_week;
    let weekday_labels = (0..COLUMNS)
        .map(|_| {
            let label = translations.weekdays[weekday.num_days_from_monday() as usize].clone();
            weekday = weekday.succ();
            label
        })
        .collect();

    Grid {
        year_month: *year_month,
        first_day_of_week,
        month_label: translations.months[year_month.month_number() as usize - 1].clone(),
        year_label: year_month.year().to_string(),
        weekday_labels,
        cells,
        weeks,
    }
}
