use serde_with::DeserializeFromStr;
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, ErrorKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, DeserializeFromStr)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const RED: Color = Color::rgb(255, 0, 0);
    pub const GREEN: Color = Color::rgb(0, 255, 0);
    pub const LIGHT_GRAY: Color = Color::rgb(192, 192, 192);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color { r, g, b }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl FromStr for Color {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s.strip_prefix('#').unwrap_or(s);

        if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(Error::new(
                ErrorKind::ColorParse,
                &format!("'{}' is not of the form #rrggbb", s),
            ));
        }

        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16);
        match (channel(0), channel(2), channel(4)) {
            (Ok(r), Ok(g), Ok(b)) => Ok(Color::rgb(r, g, b)),
            _ => Err(Error::new(ErrorKind::ColorParse, s)),
        }
    }
}

/// Every area of the calendar and the date picker text field that carries a
/// configurable color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, DeserializeFromStr)]
pub enum ColorArea {
    BackgroundOverallCalendarPanel,
    BackgroundMonthAndYearMenuLabels,
    BackgroundTodayLabel,
    BackgroundClearLabel,
    BackgroundTopLeftLabelAboveWeekNumbers,
    CalendarBackgroundNormalDates,
    CalendarBackgroundSelectedDate,
    CalendarBorderSelectedDate,
    CalendarBackgroundVetoedDates,
    CalendarDefaultBackgroundHighlightedDates,
    CalendarDefaultTextHighlightedDates,
    CalendarTextNormalDates,
    CalendarTextVetoedDates,
    CalendarTextWeekdays,
    CalendarBackgroundWeekdayLabels,
    CalendarTextWeekNumbers,
    CalendarBackgroundWeekNumberLabels,
    TextMonthAndYearMenuLabels,
    TextTodayLabel,
    TextClearLabel,
    DatePickerTextValidDate,
    DatePickerTextInvalidDate,
    DatePickerTextVetoedDate,
    DatePickerTextDisabled,
    TextFieldBackgroundValidDate,
    TextFieldBackgroundInvalidDate,
    TextFieldBackgroundVetoedDate,
    TextFieldBackgroundDisallowedEmptyDate,
    TextFieldBackgroundDisabled,
}

impl ColorArea {
    pub const ALL: [ColorArea; 29] = [
        ColorArea::BackgroundOverallCalendarPanel,
        ColorArea::BackgroundMonthAndYearMenuLabels,
        ColorArea::BackgroundTodayLabel,
        ColorArea::BackgroundClearLabel,
        ColorArea::BackgroundTopLeftLabelAboveWeekNumbers,
        ColorArea::CalendarBackgroundNormalDates,
        ColorArea::CalendarBackgroundSelectedDate,
        ColorArea::CalendarBorderSelectedDate,
        ColorArea::CalendarBackgroundVetoedDates,
        ColorArea::CalendarDefaultBackgroundHighlightedDates,
        ColorArea::CalendarDefaultTextHighlightedDates,
        ColorArea::CalendarTextNormalDates,
        ColorArea::CalendarTextVetoedDates,
        ColorArea::CalendarTextWeekdays,
        ColorArea::CalendarBackgroundWeekdayLabels,
        ColorArea::CalendarTextWeekNumbers,
        ColorArea::CalendarBackgroundWeekNumberLabels,
        ColorArea::TextMonthAndYearMenuLabels,
        ColorArea::TextTodayLabel,
        ColorArea::TextClearLabel,
        ColorArea::DatePickerTextValidDate,
        ColorArea::DatePickerTextInvalidDate,
        ColorArea::DatePickerTextVetoedDate,
        ColorArea::DatePickerTextDisabled,
        ColorArea::TextFieldBackgroundValidDate,
        ColorArea::TextFieldBackgroundInvalidDate,
        ColorArea::TextFieldBackgroundVetoedDate,
        ColorArea::TextFieldBackgroundDisallowedEmptyDate,
        ColorArea::TextFieldBackgroundDisabled,
    ];

    /// Name of the area in config files.
    pub fn name(&self) -> &'static str {
        use ColorArea::*;
        match self {
            BackgroundOverallCalendarPanel => "background_overall_calendar_panel",
            BackgroundMonthAndYearMenuLabels => "background_month_and_year_menu_labels",
            BackgroundTodayLabel => "background_today_label",
            BackgroundClearLabel => "background_clear_label",
            BackgroundTopLeftLabelAboveWeekNumbers => "background_top_left_label_above_week_numbers",
            CalendarBackgroundNormalDates => "calendar_background_normal_dates",
            CalendarBackgroundSelectedDate => "calendar_background_selected_date",
            CalendarBorderSelectedDate => "calendar_border_selected_date",
            CalendarBackgroundVetoedDates => "calendar_background_vetoed_dates",
            CalendarDefaultBackgroundHighlightedDates => "calendar_default_background_highlighted_dates",
            CalendarDefaultTextHighlightedDates => "calendar_default_text_highlighted_dates",
            CalendarTextNormalDates => "calendar_text_normal_dates",
            CalendarTextVetoedDates => "calendar_text_vetoed_dates",
            CalendarTextWeekdays => "calendar_text_weekdays",
            CalendarBackgroundWeekdayLabels => "calendar_background_weekday_labels",
            CalendarTextWeekNumbers => "calendar_text_week_numbers",
            CalendarBackgroundWeekNumberLabels => "calendar_background_week_number_labels",
            TextMonthAndYearMenuLabels => "text_month_and_year_menu_labels",
            TextTodayLabel => "text_today_label",
            TextClearLabel => "text_clear_label",
            DatePickerTextValidDate => "date_picker_text_valid_date",
            DatePickerTextInvalidDate => "date_picker_text_invalid_date",
            DatePickerTextVetoedDate => "date_picker_text_vetoed_date",
            DatePickerTextDisabled => "date_picker_text_disabled",
            TextFieldBackgroundValidDate => "text_field_background_valid_date",
            TextFieldBackgroundInvalidDate => "text_field_background_invalid_date",
            TextFieldBackgroundVetoedDate => "text_field_background_vetoed_date",
            TextFieldBackgroundDisallowedEmptyDate => "text_field_background_disallowed_empty_date",
            TextFieldBackgroundDisabled => "text_field_background_disabled",
        }
    }

    pub fn default_color(&self) -> Color {
        use ColorArea::*;
        match self {
            BackgroundOverallCalendarPanel
            | BackgroundMonthAndYearMenuLabels
            | BackgroundTodayLabel
            | BackgroundClearLabel
            | BackgroundTopLeftLabelAboveWeekNumbers
            | CalendarBackgroundNormalDates
            | TextFieldBackgroundValidDate
            | TextFieldBackgroundInvalidDate
            | TextFieldBackgroundVetoedDate => Color::WHITE,
            CalendarBackgroundSelectedDate => Color::rgb(163, 184, 204),
            CalendarBorderSelectedDate => Color::rgb(99, 130, 191),
            CalendarBackgroundVetoedDates => Color::LIGHT_GRAY,
            CalendarDefaultBackgroundHighlightedDates => Color::GREEN,
            CalendarBackgroundWeekdayLabels | CalendarBackgroundWeekNumberLabels => {
                Color::rgb(184, 207, 229)
            }
            DatePickerTextInvalidDate => Color::RED,
            DatePickerTextDisabled => Color::rgb(109, 109, 109),
            TextFieldBackgroundDisallowedEmptyDate => Color::rgb(255, 175, 175),
            TextFieldBackgroundDisabled => Color::rgb(240, 240, 240),
            CalendarDefaultTextHighlightedDates
            | CalendarTextNormalDates
            | CalendarTextVetoedDates
            | CalendarTextWeekdays
            | CalendarTextWeekNumbers
            | TextMonthAndYearMenuLabels
            | TextTodayLabel
            | TextClearLabel
            | DatePickerTextValidDate
            | DatePickerTextVetoedDate => Color::BLACK,
        }
    }
}

impl fmt::Display for ColorArea {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for ColorArea {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ColorArea::ALL
            .iter()
            .find(|area| area.name() == s)
            .copied()
            .ok_or_else(|| {
                Error::new(
                    ErrorKind::ColorParse,
                    &format!("unknown color area '{}'", s),
                )
            })
    }
}
