use chrono::{Datelike, NaiveDate, Weekday};
use serde::Deserialize;
use std::collections::HashMap;
use std::fmt::{self, Write};

use crate::border::{default_borders, CalendarBorderProperties};
use crate::color::{Color, ColorArea};
use crate::error::{Error, ErrorKind, Result};
use crate::font::{Font, FontArea};
use crate::locale::Locale;
use crate::policy::{DateRangeLimits, HighlightInfo, HighlightPolicy, VetoPolicy};
use crate::week::WeekNumberRule;

const ISO_DATE_FORMAT: &str = "%Y-%m-%d";

/// The two kinds of component a settings object can belong to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParentKind {
    DatePicker,
    CalendarPanel,
}

/// Hook a parent registers when it takes ownership of a settings object.
pub trait SettingsParent {
    /// Called synchronously after a setting affecting the display changed.
    fn redraw(&self, settings: &DatePickerSettings);

    /// Date currently selected in the parent, used to validate new veto
    /// policies.
    fn selected_date(&self) -> Option<NaiveDate>;
}

struct Parent {
    kind: ParentKind,
    hook: Box<dyn SettingsParent>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Visibility {
    pub today_button: bool,
    pub clear_button: bool,
    pub month_menu_button: bool,
    pub year_menu_button: bool,
    pub next_month_button: bool,
    pub previous_month_button: bool,
    pub next_year_button: bool,
    pub previous_year_button: bool,
}

impl Default for Visibility {
    fn default() -> Self {
        Visibility {
            today_button: true,
            clear_button: true,
            month_menu_button: true,
            year_menu_button: true,
            next_month_button: true,
            previous_month_button: true,
            next_year_button: true,
            previous_year_button: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Translations {
    pub months: [String; 12],
    pub short_months: [String; 12],
    /// Monday first.
    pub weekdays: [String; 7],
    pub today: String,
    pub clear: String,
}

impl Translations {
    pub fn of(locale: &Locale) -> Self {
        let data = locale.data();
        Translations {
            months: data.months.map(str::to_owned),
            short_months: data.short_months.map(str::to_owned),
            weekdays: data.weekdays.map(str::to_owned),
            today: data.today.to_owned(),
            clear: data.clear.to_owned(),
        }
    }
}

/// All display and behavior options of a date picker or calendar panel.
///
/// A settings object belongs to at most one parent for its whole lifetime.
/// Every change affecting the display is forwarded to the parent's
/// [`SettingsParent::redraw`] hook right away.
pub struct DatePickerSettings {
    parent: Option<Parent>,
    suppress_redraw: bool,

    locale: Locale,
    first_day_of_week: Weekday,
    week_number_rule: WeekNumberRule,
    week_numbers_displayed: bool,
    week_numbers_override_first_day_of_week: bool,
    week_numbers_require_unanimous: bool,

    colors: HashMap<ColorArea, Color>,
    fonts: HashMap<FontArea, Font>,
    border_properties: Vec<CalendarBorderProperties>,
    border_properties_custom: bool,

    translations: Translations,
    format_common_era: String,
    format_before_common_era: String,
    parse_formats: Vec<String>,

    visibility: Visibility,
    allow_empty_dates: bool,
    allow_keyboard_editing: bool,
    enable_month_menu: bool,
    enable_year_menu: bool,

    veto_policy: Option<Box<dyn VetoPolicy>>,
    highlight_policy: Option<Box<dyn HighlightPolicy>>,
}

impl Default for DatePickerSettings {
    fn default() -> Self {
        DatePickerSettings::new(Locale::default())
    }
}

impl fmt::Debug for DatePickerSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatePickerSettings")
            .field("parent", &self.parent_kind())
            .field("locale", &self.locale)
            .field("first_day_of_week", &self.first_day_of_week)
            .field("week_number_rule", &self.week_number_rule)
            .field("week_numbers_displayed", &self.week_numbers_displayed)
            .field("veto_policy", &self.veto_policy.is_some())
            .field("highlight_policy", &self.highlight_policy.is_some())
            .finish()
    }
}

impl DatePickerSettings {
    pub fn new(locale: Locale) -> Self {
        let data = locale.data();

        DatePickerSettings {
            parent: None,
            suppress_redraw: false,
            first_day_of_week: locale.first_day_of_week(),
            week_number_rule: locale.week_number_rule(),
            week_numbers_displayed: false,
            week_numbers_override_first_day_of_week: true,
            week_numbers_require_unanimous: false,
            colors: ColorArea::ALL
                .iter()
                .map(|area| (*area, area.default_color()))
                .collect(),
            fonts: HashMap::new(),
            border_properties: default_borders(
                false,
                ColorArea::CalendarBackgroundWeekdayLabels.default_color(),
            ),
            border_properties_custom: false,
            translations: Translations::of(&locale),
            format_common_era: data.date_format.to_owned(),
            format_before_common_era: ISO_DATE_FORMAT.to_owned(),
            parse_formats: data.parse_formats.iter().map(|f| f.to_string()).collect(),
            visibility: Visibility::default(),
            allow_empty_dates: true,
            allow_keyboard_editing: true,
            enable_month_menu: true,
            enable_year_menu: true,
            veto_policy: None,
            highlight_policy: None,
            locale,
        }
    }

    /// Registers the single parent of these settings. Fails if a parent of
    /// either kind has been attached before.
    pub fn attach_parent(&mut self, kind: ParentKind, hook: Box<dyn SettingsParent>) -> Result<()> {
        if let Some(parent) = &self.parent {
            return Err(Error::new(
                ErrorKind::ParentAlreadyAttached,
                &format!(
                    "cannot attach to a {:?}, already attached to a {:?}",
                    kind, parent.kind
                ),
            ));
        }

        log::debug!("Settings attached to {:?}", kind);
        self.parent = Some(Parent { kind, hook });
        Ok(())
    }

    pub fn parent_kind(&self) -> Option<ParentKind> {
        self.parent.as_ref().map(|parent| parent.kind)
    }

    /// Deep copy without parent and without veto or highlight policy.
    pub fn copy(&self) -> Self {
        DatePickerSettings {
            parent: None,
            suppress_redraw: false,
            locale: self.locale.clone(),
            first_day_of_week: self.first_day_of_week,
            week_number_rule: self.week_number_rule,
            week_numbers_displayed: self.week_numbers_displayed,
            week_numbers_override_first_day_of_week: self.week_numbers_override_first_day_of_week,
            week_numbers_require_unanimous: self.week_numbers_require_unanimous,
            colors: self.colors.clone(),
            fonts: self.fonts.clone(),
            border_properties: self.border_properties.clone(),
            border_properties_custom: self.border_properties_custom,
            translations: self.translations.clone(),
            format_common_era: self.format_common_era.clone(),
            format_before_common_era: self.format_before_common_era.clone(),
            parse_formats: self.parse_formats.clone(),
            visibility: self.visibility,
            allow_empty_dates: self.allow_empty_dates,
            allow_keyboard_editing: self.allow_keyboard_editing,
            enable_month_menu: self.enable_month_menu,
            enable_year_menu: self.enable_year_menu,
            veto_policy: None,
            highlight_policy: None,
        }
    }

    fn redraw(&self) {
        if self.suppress_redraw {
            return;
        }

        if let Some(parent) = &self.parent {
            log::debug!("Redrawing {:?}", parent.kind);
            parent.hook.redraw(self);
        }
    }

    /// Runs `f` with redraws suppressed and redraws once afterwards.
    fn batch<F: FnOnce(&mut Self)>(&mut self, f: F) {
        let suppressed = self.suppress_redraw;
        self.suppress_redraw = true;
        f(self);
        self.suppress_redraw = suppressed;
        self.redraw();
    }

    fn require_parent(&self, operation: &str) -> Result<&Parent> {
        self.parent.as_ref().ok_or_else(|| {
            Error::new(
                ErrorKind::NoParent,
                &format!("{} needs the settings to be attached to a parent first", operation),
            )
        })
    }

    /* Locale */

    pub fn locale(&self) -> &Locale {
        &self.locale
    }

    /// Switches the locale and resets every locale derived default:
    /// translations, date formats, first day of week and week number rule.
    /// The parent is redrawn once at the end.
    pub fn set_locale(&mut self, locale: Locale) {
        self.batch(|settings| {
            settings.locale = locale;
            settings.set_translations(None);
            settings.set_format_for_dates_common_era(None);
            settings.set_format_for_dates_before_common_era(None);
            settings.set_formats_for_parsing(None);
            settings.set_first_day_of_week(None);
            settings.set_week_number_rule(None);
        });
    }

    /* Week layout */

    pub fn first_day_of_week(&self) -> Weekday {
        self.first_day_of_week
    }

    /// `None` restores the locale's first day of week.
    pub fn set_first_day_of_week(&mut self, first_day_of_week: Option<Weekday>) {
        self.first_day_of_week = first_day_of_week.unwrap_or_else(|| self.locale.first_day_of_week());
        self.redraw();
    }

    pub fn week_number_rule(&self) -> WeekNumberRule {
        self.week_number_rule
    }

    /// `None` restores the locale's week number rule.
    pub fn set_week_number_rule(&mut self, rule: Option<WeekNumberRule>) {
        self.week_number_rule = rule.unwrap_or_else(|| self.locale.week_number_rule());
        self.redraw();
    }

    pub fn week_numbers_displayed(&self) -> bool {
        self.week_numbers_displayed
    }

    pub fn set_week_numbers_displayed(&mut self, displayed: bool) {
        self.week_numbers_displayed = displayed;
        if !self.border_properties_custom {
            self.border_properties = self.default_border_properties();
        }
        self.redraw();
    }

    pub fn week_numbers_override_first_day_of_week(&self) -> bool {
        self.week_numbers_override_first_day_of_week
    }

    pub fn set_week_numbers_override_first_day_of_week(&mut self, will_override: bool) {
        self.week_numbers_override_first_day_of_week = will_override;
        self.redraw();
    }

    pub fn week_numbers_require_unanimous(&self) -> bool {
        self.week_numbers_require_unanimous
    }

    pub fn set_week_numbers_require_unanimous(&mut self, unanimous: bool) {
        self.week_numbers_require_unanimous = unanimous;
        self.redraw();
    }

    /* Colors, fonts, borders */

    pub fn color(&self, area: ColorArea) -> Color {
        self.colors
            .get(&area)
            .copied()
            .unwrap_or_else(|| area.default_color())
    }

    /// `None` restores the default color of `area`.
    pub fn set_color(&mut self, area: ColorArea, color: Option<Color>) {
        self.colors
            .insert(area, color.unwrap_or_else(|| area.default_color()));

        if area == ColorArea::CalendarBackgroundWeekdayLabels && !self.border_properties_custom {
            self.border_properties = self.default_border_properties();
        }
        self.redraw();
    }

    pub fn font(&self, area: FontArea) -> &Font {
        self.fonts.get(&area).unwrap_or_else(|| area.default_font())
    }

    /// `None` restores the default font of `area`.
    pub fn set_font(&mut self, area: FontArea, font: Option<Font>) {
        match font {
            Some(font) => self.fonts.insert(area, font),
            None => self.fonts.remove(&area),
        };
        self.redraw();
    }

    pub fn border_properties(&self) -> &[CalendarBorderProperties] {
        &self.border_properties
    }

    pub fn border_properties_custom(&self) -> bool {
        self.border_properties_custom
    }

    /// `None` restores the default border set, which then again follows the
    /// week number visibility.
    pub fn set_border_properties(&mut self, borders: Option<Vec<CalendarBorderProperties>>) {
        match borders {
            Some(borders) => {
                self.border_properties = borders;
                self.border_properties_custom = true;
            }
            None => {
                self.border_properties = self.default_border_properties();
                self.border_properties_custom = false;
            }
        }
        self.redraw();
    }

    fn default_border_properties(&self) -> Vec<CalendarBorderProperties> {
        default_borders(
            self.week_numbers_displayed,
            self.color(ColorArea::CalendarBackgroundWeekdayLabels),
        )
    }

    /* Translations and formats */

    pub fn translations(&self) -> &Translations {
        &self.translations
    }

    /// `None` restores the locale's translations.
    pub fn set_translations(&mut self, translations: Option<Translations>) {
        self.translations = translations.unwrap_or_else(|| Translations::of(&self.locale));
        self.redraw();
    }

    pub fn set_month_names(&mut self, months: Option<[String; 12]>) {
        self.translations.months = months.unwrap_or_else(|| Translations::of(&self.locale).months);
        self.redraw();
    }

    pub fn set_weekday_names(&mut self, weekdays: Option<[String; 7]>) {
        self.translations.weekdays =
            weekdays.unwrap_or_else(|| Translations::of(&self.locale).weekdays);
        self.redraw();
    }

    pub fn set_today_text(&mut self, today: Option<&str>) {
        self.translations.today = today
            .map(str::to_owned)
            .unwrap_or_else(|| self.locale.data().today.to_owned());
        self.redraw();
    }

    pub fn set_clear_text(&mut self, clear: Option<&str>) {
        self.translations.clear = clear
            .map(str::to_owned)
            .unwrap_or_else(|| self.locale.data().clear.to_owned());
        self.redraw();
    }

    pub fn format_for_dates_common_era(&self) -> &str {
        &self.format_common_era
    }

    /// `None` restores the locale's display pattern.
    pub fn set_format_for_dates_common_era(&mut self, format: Option<&str>) {
        self.format_common_era = format.unwrap_or(self.locale.data().date_format).to_owned();
        self.redraw();
    }

    pub fn format_for_dates_before_common_era(&self) -> &str {
        &self.format_before_common_era
    }

    /// `None` restores the ISO-8601 pattern with signed years.
    pub fn set_format_for_dates_before_common_era(&mut self, format: Option<&str>) {
        self.format_before_common_era = format.unwrap_or(ISO_DATE_FORMAT).to_owned();
        self.redraw();
    }

    pub fn formats_for_parsing(&self) -> &[String] {
        &self.parse_formats
    }

    /// Parse patterns only affect text entry, so no redraw is triggered.
    pub fn set_formats_for_parsing(&mut self, formats: Option<Vec<String>>) {
        self.parse_formats = formats.unwrap_or_else(|| {
            self.locale
                .data()
                .parse_formats
                .iter()
                .map(|f| f.to_string())
                .collect()
        });
    }

    /// Formats `date` for display. Dates before year 1 use the before common
    /// era pattern. An unusable pattern falls back to ISO-8601.
    pub fn format_date(&self, date: &NaiveDate) -> String {
        let pattern = if date.year() >= 1 {
            &self.format_common_era
        } else {
            &self.format_before_common_era
        };

        let mut text = String::new();
        if write!(text, "{}", date.format(pattern)).is_err() {
            log::warn!("Unusable date format '{}', falling back to ISO-8601", pattern);
            text.clear();
            // The ISO pattern is always valid.
            let _ = write!(text, "{}", date.format(ISO_DATE_FORMAT));
        }
        text
    }

    /// Parses `text` with the display patterns first, then the parse patterns.
    pub fn parse_date(&self, text: &str) -> Option<NaiveDate> {
        let text = text.trim();

        std::iter::once(&self.format_common_era)
            .chain(std::iter::once(&self.format_before_common_era))
            .chain(self.parse_formats.iter())
            .find_map(|pattern| NaiveDate::parse_from_str(text, pattern).ok())
    }

    /* Behavior */

    pub fn visibility(&self) -> &Visibility {
        &self.visibility
    }

    pub fn set_visibility(&mut self, visibility: Visibility) {
        self.visibility = visibility;
        self.redraw();
    }

    pub fn allow_empty_dates(&self) -> bool {
        self.allow_empty_dates
    }

    pub fn set_allow_empty_dates(&mut self, allow: bool) {
        self.allow_empty_dates = allow;
        self.redraw();
    }

    pub fn allow_keyboard_editing(&self) -> bool {
        self.allow_keyboard_editing
    }

    pub fn set_allow_keyboard_editing(&mut self, allow: bool) {
        self.allow_keyboard_editing = allow;
    }

    pub fn enable_month_menu(&self) -> bool {
        self.enable_month_menu
    }

    pub fn set_enable_month_menu(&mut self, enable: bool) {
        self.enable_month_menu = enable;
        self.redraw();
    }

    pub fn enable_year_menu(&self) -> bool {
        self.enable_year_menu
    }

    pub fn set_enable_year_menu(&mut self, enable: bool) {
        self.enable_year_menu = enable;
        self.redraw();
    }

    /* Policies */

    /// Installs (or with `None` removes) the veto policy. Requires a parent,
    /// whose selected date is checked against the new policy: the result
    /// tells whether that date is still allowed. The selection itself is
    /// left untouched.
    pub fn set_veto_policy(&mut self, policy: Option<Box<dyn VetoPolicy>>) -> Result<bool> {
        let selected = self.require_parent("set_veto_policy")?.hook.selected_date();

        self.veto_policy = policy;
        self.redraw();

        Ok(selected.map_or(true, |date| self.is_date_allowed(&date)))
    }

    /// Restricts selectable dates to `first..=last`, replacing any veto
    /// policy. Requires a parent, like [`Self::set_veto_policy`].
    pub fn set_date_range_limits(
        &mut self,
        first: Option<NaiveDate>,
        last: Option<NaiveDate>,
    ) -> Result<bool> {
        self.require_parent("set_date_range_limits")?;
        self.set_veto_policy(Some(Box::new(DateRangeLimits::new(first, last))))
    }

    pub fn date_range_limits(&self) -> Option<DateRangeLimits> {
        self.veto_policy
            .as_ref()
            .and_then(|policy| policy.date_range_limits())
    }

    pub fn has_veto_policy(&self) -> bool {
        self.veto_policy.is_some()
    }

    pub fn is_date_allowed(&self, date: &NaiveDate) -> bool {
        self.veto_policy
            .as_ref()
            .map_or(true, |policy| policy.is_date_allowed(date))
    }

    pub fn set_highlight_policy(&mut self, policy: Option<Box<dyn HighlightPolicy>>) {
        self.highlight_policy = policy;
        self.redraw();
    }

    pub fn has_highlight_policy(&self) -> bool {
        self.highlight_policy.is_some()
    }

    pub fn highlight_info(&self, date: &NaiveDate) -> Option<HighlightInfo> {
        self.highlight_policy
            .as_ref()
            .and_then(|policy| policy.highlight_info(date))
    }
}
