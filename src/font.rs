use once_cell::sync::Lazy;
use serde::Deserialize;
use serde_with::DeserializeFromStr;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, ErrorKind};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Font {
    pub family: String,
    pub size: u16,
    #[serde(default)]
    pub bold: bool,
    #[serde(default)]
    pub strikethrough: bool,
}

impl Font {
    pub fn new(family: &str, size: u16) -> Self {
        Font {
            family: family.to_owned(),
            size,
            bold: false,
            strikethrough: false,
        }
    }

    pub fn bold(mut self, bold: bool) -> Self {
        self.bold = bold;
        self
    }

    pub fn strikethrough(mut self, strikethrough: bool) -> Self {
        self.strikethrough = strikethrough;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, DeserializeFromStr)]
pub enum FontArea {
    TextFieldValidDate,
    TextFieldInvalidDate,
    TextFieldVetoedDate,
    CalendarDates,
    CalendarWeekdayLabels,
    CalendarWeekNumberLabels,
    MonthAndYearMenuLabels,
    TodayLabel,
    ClearLabel,
}

static DEFAULT_FONTS: Lazy<HashMap<FontArea, Font>> = Lazy::new(|| {
    let base = Font::new("SansSerif", 12);

    let mut fonts = HashMap::new();
    fonts.insert(FontArea::TextFieldValidDate, base.clone());
    fonts.insert(FontArea::TextFieldInvalidDate, base.clone());
    fonts.insert(FontArea::TextFieldVetoedDate, base.clone().strikethrough(true));
    fonts.insert(FontArea::CalendarDates, base.clone());
    fonts.insert(FontArea::CalendarWeekdayLabels, base.clone());
    fonts.insert(FontArea::CalendarWeekNumberLabels, base.clone());
    fonts.insert(FontArea::MonthAndYearMenuLabels, base.clone().bold(true));
    fonts.insert(FontArea::TodayLabel, base.clone());
    fonts.insert(FontArea::ClearLabel, base);
    fonts
});

impl FontArea {
    pub const ALL: [FontArea; 9] = [
        FontArea::TextFieldValidDate,
        FontArea::TextFieldInvalidDate,
        FontArea::TextFieldVetoedDate,
        FontArea::CalendarDates,
        FontArea::CalendarWeekdayLabels,
        FontArea::CalendarWeekNumberLabels,
        FontArea::MonthAndYearMenuLabels,
        FontArea::TodayLabel,
        FontArea::ClearLabel,
    ];

    /// Name of the area in config files.
    pub fn name(&self) -> &'static str {
        use FontArea::*;
        match self {
            TextFieldValidDate => "text_field_valid_date",
            TextFieldInvalidDate => "text_field_invalid_date",
            TextFieldVetoedDate => "text_field_vetoed_date",
            CalendarDates => "calendar_dates",
            CalendarWeekdayLabels => "calendar_weekday_labels",
            CalendarWeekNumberLabels => "calendar_week_number_labels",
            MonthAndYearMenuLabels => "month_and_year_menu_labels",
            TodayLabel => "today_label",
            ClearLabel => "clear_label",
        }
    }

    pub fn default_font(&self) -> &'static Font {
        // The table is filled for every variant.
        &DEFAULT_FONTS[self]
    }
}

impl fmt::Display for FontArea {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for FontArea {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FontArea::ALL
            .iter()
            .find(|area| area.name() == s)
            .copied()
            .ok_or_else(|| {
                Error::new(
                    ErrorKind::ConfigParse,
                    &format!("unknown font area '{}'", s),
                )
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn area_names_parse() {
        for area in FontArea::ALL.iter() {
            assert_eq!(area.name().parse::<FontArea>().unwrap(), *area);
        }
        assert!("calendar".parse::<FontArea>().is_err());
    }

    #[test]
    fn vetoed_text_is_struck_through() {
        assert!(FontArea::TextFieldVetoedDate.default_font().strikethrough);
        assert!(!FontArea::TextFieldValidDate.default_font().strikethrough);
        assert!(FontArea::MonthAndYearMenuLabels.default_font().bold);
    }
}
