use chrono::Weekday;
use serde::Deserialize;
use serde_with::{serde_as, DisplayFromStr};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::io;
use std::iter::FromIterator;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::color::{Color, ColorArea};
use crate::error::{Error, ErrorKind, Result};
use crate::font::{Font, FontArea};
use crate::locale::Locale;
use crate::settings::{DatePickerSettings, Visibility};
use crate::week::WeekNumberRule;

const CONFIG_PATH_ENV_VAR: &str = "CALPICK_CONFIG_FILE";

pub(crate) fn find_configfile_locations() -> io::Result<Vec<PathBuf>> {
    let config_env = env::var(CONFIG_PATH_ENV_VAR).ok().map(PathBuf::from);

    configfile_locations(config_env, dirs::config_dir(), dirs::home_dir())
}

fn configfile_locations(
    config_env: Option<PathBuf>,
    config_dir: Option<PathBuf>,
    home: Option<PathBuf>,
) -> io::Result<Vec<PathBuf>> {
    if home.is_none() && config_dir.is_none() {
        return Err(io::Error::new(
            io::ErrorKind::Other,
            "Unable to find home directory",
        ));
    }

    let mut locations = Vec::new();

    if let Some(path) = config_env {
        locations.push(path);
    }

    if let Some(dir) = config_dir {
        locations.push(PathBuf::from_iter(
            [dir.as_path(), Path::new("calpick"), Path::new("config.toml")].iter(),
        ));
    }

    if let Some(home) = home {
        locations.push(home.join(".calpick.toml"));
    }

    Ok(locations)
}

/// Loads the configuration from `configfile` if given, otherwise from the
/// first existing default location. Without any file the defaults apply.
pub fn load_suitable_config(configfile: Option<&Path>) -> Result<Config> {
    if let Some(path) = configfile {
        return Config::from_file(path);
    }

    for location in find_configfile_locations()? {
        if location.is_file() {
            log::info!("Using config file {}", location.display());
            return Config::from_file(&location);
        }
    }

    log::info!("No config file found, using defaults");
    Ok(Config::default())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeekNumberRuleName {
    Iso,
    SundayFirst,
    Locale,
}

impl WeekNumberRuleName {
    /// `None` stands for the locale's own rule.
    pub fn rule(&self) -> Option<WeekNumberRule> {
        match self {
            WeekNumberRuleName::Iso => Some(WeekNumberRule::ISO),
            WeekNumberRuleName::SundayFirst => Some(WeekNumberRule::SUNDAY_START),
            WeekNumberRuleName::Locale => None,
        }
    }
}

/// Settings read from the config file. Absent entries keep the defaults of
/// the settings they are applied to.
#[serde_as]
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub locale: Option<Locale>,
    #[serde_as(as = "Option<DisplayFromStr>")]
    pub first_day_of_week: Option<Weekday>,
    pub week_numbers_displayed: Option<bool>,
    pub week_number_rule: Option<WeekNumberRuleName>,
    pub week_numbers_override_first_day_of_week: Option<bool>,
    pub week_numbers_require_unanimous: Option<bool>,
    pub allow_empty_dates: Option<bool>,
    pub colors: HashMap<ColorArea, Color>,
    pub fonts: HashMap<FontArea, Font>,
    pub visible: Option<Visibility>,
}

impl Config {
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|err| {
            Error::from(err).with_msg(&format!("Could not read {}", path.display()))
        })?;

        content.parse()
    }

    /// Fresh settings for the configured locale with everything else
    /// applied.
    pub fn settings(&self) -> DatePickerSettings {
        let mut settings = DatePickerSettings::new(self.locale.clone().unwrap_or_default());
        self.apply(&mut settings);
        settings
    }

    pub fn apply(&self, settings: &mut DatePickerSettings) {
        if let Some(locale) = &self.locale {
            if locale != settings.locale() {
                settings.set_locale(locale.clone());
            }
        }

        if let Some(weekday) = self.first_day_of_week {
            settings.set_first_day_of_week(Some(weekday));
        }
        if let Some(rule) = &self.week_number_rule {
            settings.set_week_number_rule(rule.rule());
        }
        if let Some(displayed) = self.week_numbers_displayed {
            settings.set_week_numbers_displayed(displayed);
        }
        if let Some(will_override) = self.week_numbers_override_first_day_of_week {
            settings.set_week_numbers_override_first_day_of_week(will_override);
        }
        if let Some(unanimous) = self.week_numbers_require_unanimous {
            settings.set_week_numbers_require_unanimous(unanimous);
        }
        if let Some(allow) = self.allow_empty_dates {
            settings.set_allow_empty_dates(allow);
        }

        for (area, color) in self.colors.iter() {
            log::debug!("Configured color {:?} = {}", area, color);
            settings.set_color(*area, Some(*color));
        }

        for (area, font) in self.fonts.iter() {
            settings.set_font(*area, Some(font.clone()));
        }

        if let Some(visibility) = self.visible {
            settings.set_visibility(visibility);
        }
    }
}

impl FromStr for Config {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|err| Error::new(ErrorKind::ConfigParse, &err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::compute_grid;
    use crate::month::YearMonth;
    use chrono::NaiveDate;

    #[test]
    fn parse_full_config() {
        let config: Config = r##"
            locale = "de-DE"
            first_day_of_week = "Sun"
            week_numbers_displayed = true
            week_number_rule = "sunday_first"
            week_numbers_override_first_day_of_week = false
            allow_empty_dates = false

            [colors]
            calendar_background_selected_date = "#102030"
            date_picker_text_invalid_date = "#aa0000"

            [fonts]
            calendar_dates = { family = "Mono", size = 10, bold = true }

            [visible]
            clear_button = false
        "##
        .parse()
        .unwrap();

        assert_eq!(config.locale, Some(Locale::new("de", Some("DE"))));
        assert_eq!(config.first_day_of_week, Some(Weekday::Sun));
        assert_eq!(config.week_number_rule, Some(WeekNumberRuleName::SundayFirst));
        assert_eq!(
            config.colors.get(&ColorArea::CalendarBackgroundSelectedDate),
            Some(&Color::rgb(0x10, 0x20, 0x30))
        );

        let visible = config.visible.unwrap();
        assert!(!visible.clear_button);
        assert!(visible.today_button);

        let settings = config.settings();
        assert_eq!(settings.translations().today, "Heute");
        assert_eq!(settings.first_day_of_week(), Weekday::Sun);
        assert_eq!(settings.week_number_rule(), WeekNumberRule::SUNDAY_START);
        assert!(settings.week_numbers_displayed());
        assert!(!settings.week_numbers_override_first_day_of_week());
        assert!(!settings.allow_empty_dates());
        assert!(!settings.visibility().clear_button);
        assert_eq!(
            settings.color(ColorArea::CalendarBackgroundSelectedDate),
            Color::rgb(0x10, 0x20, 0x30)
        );
        assert_eq!(
            settings.color(ColorArea::DatePickerTextInvalidDate),
            Color::rgb(0xaa, 0, 0)
        );
        assert_eq!(
            settings.font(FontArea::CalendarDates),
            &Font::new("Mono", 10).bold(true)
        );
        assert_eq!(
            settings.font(FontArea::TodayLabel),
            FontArea::TodayLabel.default_font()
        );
    }

    #[test]
    fn configured_colors_reach_the_grid() {
        let config: Config = "[colors]\ncalendar_background_selected_date = \"#102030\""
            .parse()
            .unwrap();
        let settings = config.settings();

        let selected = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
        let grid = compute_grid(&YearMonth::of(&selected), &settings, Some(&selected));
        assert_eq!(
            grid.cell_of(&selected).unwrap().background,
            Color::rgb(0x10, 0x20, 0x30)
        );
    }

    #[test]
    fn every_area_name_is_a_valid_key() {
        let colors: String = ColorArea::ALL
            .iter()
            .map(|area| format!("{} = \"#010203\"\n", area))
            .collect();
        let fonts: String = FontArea::ALL
            .iter()
            .map(|area| format!("{} = {{ family = \"Serif\", size = 9 }}\n", area))
            .collect();

        let config: Config = format!("[colors]\n{}[fonts]\n{}", colors, fonts)
            .parse()
            .unwrap();
        assert_eq!(config.colors.len(), ColorArea::ALL.len());
        assert_eq!(config.fonts.len(), FontArea::ALL.len());
    }

    #[test]
    fn empty_config_keeps_defaults() {
        let config: Config = "".parse().unwrap();
        let settings = config.settings();
        let defaults = DatePickerSettings::default();

        assert_eq!(settings.locale(), defaults.locale());
        assert_eq!(settings.week_number_rule(), defaults.week_number_rule());
        assert_eq!(
            settings.format_date(&NaiveDate::from_ymd_opt(2024, 2, 1).unwrap()),
            "February 1, 2024"
        );
    }

    #[test]
    fn locale_rule_follows_locale() {
        let config: Config = "week_number_rule = \"locale\"\nlocale = \"fr-FR\"".parse().unwrap();
        assert_eq!(config.settings().week_number_rule(), WeekNumberRule::ISO);
    }

    #[test]
    fn invalid_entries_are_rejected() {
        for text in [
            "colors = { no_such_area = \"#000000\" }",
            "colors = { calendar_text_normal_dates = \"red\" }",
            "colors = { CalendarTextNormalDates = \"#000000\" }",
            "fonts = { calendar = { family = \"Mono\", size = 10 } }",
            "fonts = { calendar_dates = { family = \"Mono\" } }",
            "first_day_of_week = \"Someday\"",
            "week_number_rule = \"lunar\"",
            "tick_rate = 500",
        ]
        .iter()
        {
            let err = text.parse::<Config>().unwrap_err();
            assert!(matches!(err.kind, ErrorKind::ConfigParse), "{}", text);
        }
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let err = load_suitable_config(Some(Path::new("/nonexistent/calpick.toml"))).unwrap_err();
        assert!(matches!(err.kind, ErrorKind::IOError(_)));
    }

    #[test]
    fn env_location_comes_first() {
        let locations = configfile_locations(
            Some(PathBuf::from("/tmp/calpick-test.toml")),
            Some(PathBuf::from("/home/user/.config")),
            Some(PathBuf::from("/home/user")),
        )
        .unwrap();

        assert_eq!(
            locations,
            vec![
                PathBuf::from("/tmp/calpick-test.toml"),
                PathBuf::from("/home/user/.config/calpick/config.toml"),
                PathBuf::from("/home/user/.calpick.toml"),
            ]
        );
    }

    #[test]
    fn locations_need_a_home() {
        assert!(configfile_locations(Some(PathBuf::from("/tmp/a.toml")), None, None).is_err());

        let locations = configfile_locations(None, None, Some(PathBuf::from("/root"))).unwrap();
        assert_eq!(locations, vec![PathBuf::from("/root/.calpick.toml")]);
    }
}
