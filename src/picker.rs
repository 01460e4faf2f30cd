use chrono::{Local, NaiveDate};
use std::cell::{Ref, RefCell};
use std::rc::Rc;

use crate::color::{Color, ColorArea};
use crate::error::Result;
use crate::font::{Font, FontArea};
use crate::month::YearMonth;
use crate::panel::{CalendarCommand, CalendarState, CalendarView};
use crate::settings::{DatePickerSettings, ParentKind, SettingsParent};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextStatus {
    Valid,
    Invalid,
    Vetoed,
    DisallowedEmpty,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextFieldStyle {
    pub foreground: Color,
    pub background: Color,
    pub font: Font,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateChangeEvent {
    pub old: Option<NaiveDate>,
    pub new: Option<NaiveDate>,
}

pub trait DateChangeListener {
    fn date_changed(&mut self, event: &DateChangeEvent);
}

impl<F: FnMut(&DateChangeEvent)> DateChangeListener for F {
    fn date_changed(&mut self, event: &DateChangeEvent) {
        self(event)
    }
}

struct PickerState {
    date: Option<NaiveDate>,
    text: String,
    status: TextStatus,
    style: TextFieldStyle,
    enabled: bool,
    today: NaiveDate,
    popup: Option<CalendarState>,
    /// Set while the picker writes its own text field.
    skip_text_handler: bool,
    listeners: Vec<Box<dyn DateChangeListener>>,
}

impl PickerState {
    fn new(settings: &DatePickerSettings, today: NaiveDate) -> Self {
        let mut state = PickerState {
            date: None,
            text: String::new(),
            status: TextStatus::Valid,
            style: TextFieldStyle {
                foreground: settings.color(ColorArea::DatePickerTextValidDate),
                background: settings.color(ColorArea::TextFieldBackgroundValidDate),
                font: settings.font(FontArea::TextFieldValidDate).clone(),
            },
            enabled: true,
            today,
            popup: None,
            skip_text_handler: false,
            listeners: Vec::new(),
        };
        state.refresh(settings);
        state
    }

    /// Writes the text field the way the toolkit would: the change handler
    /// runs afterwards, but is told to ignore this write.
    fn write_text(&mut self, settings: &DatePickerSettings, text: String) {
        self.skip_text_handler = true;
        self.text = text;
        self.text_changed(settings);
        self.skip_text_handler = false;
    }

    fn formatted(&self, settings: &DatePickerSettings) -> String {
        self.date
            .map(|date| settings.format_date(&date))
            .unwrap_or_default()
    }

    fn set_date(&mut self, settings: &DatePickerSettings, date: Option<NaiveDate>) -> bool {
        match &date {
            Some(date) if !settings.is_date_allowed(date) => {
                log::debug!("Refusing to set vetoed date {}", date);
                return false;
            }
            None if !settings.allow_empty_dates() => {
                log::debug!("Refusing to clear the date, empty dates are not allowed");
                return false;
            }
            _ => {}
        }

        let event = DateChangeEvent {
            old: self.date,
            new: date,
        };
        self.date = date;

        let text = self.formatted(settings);
        self.write_text(settings, text);
        self.status = TextStatus::Valid;
        self.apply_style(settings);

        for listener in self.listeners.iter_mut() {
            listener.date_changed(&event);
        }

        if let Some(popup) = self.popup.as_mut() {
            popup.select(settings, date);
        }

        true
    }

    /// Change handler of the text field.
    fn text_changed(&mut self, settings: &DatePickerSettings) {
        if self.skip_text_handler {
            return;
        }

        let text = self.text.trim();
        let (status, parsed) = if text.is_empty() {
            if settings.allow_empty_dates() {
                (TextStatus::Valid, None)
            } else {
                (TextStatus::DisallowedEmpty, self.date)
            }
        } else {
            match settings.parse_date(text) {
                Some(date) if settings.is_date_allowed(&date) => (TextStatus::Valid, Some(date)),
                Some(_) => (TextStatus::Vetoed, self.date),
                None => (TextStatus::Invalid, self.date),
            }
        };

        self.status = status;
        if parsed != self.date {
            let event = DateChangeEvent {
                old: self.date,
                new: parsed,
            };
            self.date = parsed;
            for listener in self.listeners.iter_mut() {
                listener.date_changed(&event);
            }
        }
        self.apply_style(settings);
    }

    /// Focus left the text field: the text is rewritten in the display
    /// format of the last valid date, and the status follows that date.
    fn commit_text(&mut self, settings: &DatePickerSettings) {
        let text = self.formatted(settings);
        if text != self.text {
            self.write_text(settings, text);
        }

        self.status = match &self.date {
            Some(date) if !settings.is_date_allowed(date) => TextStatus::Vetoed,
            None if !settings.allow_empty_dates() => TextStatus::DisallowedEmpty,
            _ => TextStatus::Valid,
        };
        self.apply_style(settings);
    }

    fn apply_style(&mut self, settings: &DatePickerSettings) {
        let (foreground, background, font) = if !self.enabled {
            (
                ColorArea::DatePickerTextDisabled,
                ColorArea::TextFieldBackgroundDisabled,
                FontArea::TextFieldValidDate,
            )
        } else {
            match self.status {
                TextStatus::Valid => (
                    ColorArea::DatePickerTextValidDate,
                    ColorArea::TextFieldBackgroundValidDate,
                    FontArea::TextFieldValidDate,
                ),
                TextStatus::Invalid => (
                    ColorArea::DatePickerTextInvalidDate,
                    ColorArea::TextFieldBackgroundInvalidDate,
                    FontArea::TextFieldInvalidDate,
                ),
                TextStatus::Vetoed => (
                    ColorArea::DatePickerTextVetoedDate,
                    ColorArea::TextFieldBackgroundVetoedDate,
                    FontArea::TextFieldVetoedDate,
                ),
                TextStatus::DisallowedEmpty => (
                    ColorArea::DatePickerTextValidDate,
                    ColorArea::TextFieldBackgroundDisallowedEmptyDate,
                    FontArea::TextFieldValidDate,
                ),
            }
        };

        self.style = TextFieldStyle {
            foreground: settings.color(foreground),
            background: settings.color(background),
            font: settings.font(font).clone(),
        };
    }

    /// Brings the text field in line with changed settings.
    fn refresh(&mut self, settings: &DatePickerSettings) {
        if self.date.is_none() && !settings.allow_empty_dates() {
            let today = self.today;
            if !self.set_date(settings, Some(today)) {
                log::warn!("Empty dates are not allowed, but today ({}) is vetoed", today);
            }
        }

        if self.status == TextStatus::Valid {
            let text = self.formatted(settings);
            if text != self.text {
                self.write_text(settings, text);
            }
        }

        // A new veto policy may reject the current date.
        if let Some(date) = &self.date {
            if !settings.is_date_allowed(date) {
                self.status = TextStatus::Vetoed;
            } else if self.status == TextStatus::Vetoed && settings.parse_date(&self.text) == Some(*date) {
                self.status = TextStatus::Valid;
            }
        }
        self.apply_style(settings);

        if let Some(popup) = self.popup.as_mut() {
            popup.redraw(settings);
        }
    }
}

struct PickerHook(Rc<RefCell<PickerState>>);

impl SettingsParent for PickerHook {
    fn redraw(&self, settings: &DatePickerSettings) {
        self.0.borrow_mut().refresh(settings);
    }

    fn selected_date(&self) -> Option<NaiveDate> {
        self.0.borrow().date
    }
}

/// A text field for dates with a popup calendar.
pub struct DatePicker {
    settings: DatePickerSettings,
    state: Rc<RefCell<PickerState>>,
}

impl DatePicker {
    pub fn new(settings: DatePickerSettings) -> Result<Self> {
        DatePicker::with_today(settings, Local::now().date_naive())
    }

    pub fn with_today(mut settings: DatePickerSettings, today: NaiveDate) -> Result<Self> {
        let state = Rc::new(RefCell::new(PickerState::new(&settings, today)));
        settings.attach_parent(ParentKind::DatePicker, Box::new(PickerHook(Rc::clone(&state))))?;

        Ok(DatePicker { settings, state })
    }

    pub fn settings(&self) -> &DatePickerSettings {
        &self.settings
    }

    /// Every change made through the returned reference redraws the picker.
    pub fn settings_mut(&mut self) -> &mut DatePickerSettings {
        &mut self.settings
    }

    pub fn add_date_change_listener(&mut self, listener: Box<dyn DateChangeListener>) {
        self.state.borrow_mut().listeners.push(listener);
    }

    pub fn date(&self) -> Option<NaiveDate> {
        self.state.borrow().date
    }

    pub fn text(&self) -> String {
        self.state.borrow().text.clone()
    }

    pub fn text_status(&self) -> TextStatus {
        self.state.borrow().status
    }

    pub fn text_style(&self) -> TextFieldStyle {
        self.state.borrow().style.clone()
    }

    /// Sets the date and rewrites the text field. Vetoed dates, and empty
    /// dates when those are not allowed, are refused.
    pub fn set_date(&mut self, date: Option<NaiveDate>) -> bool {
        self.state.borrow_mut().set_date(&self.settings, date)
    }

    /// The user edited the text field.
    pub fn text_changed(&mut self, text: &str) {
        if !self.settings.allow_keyboard_editing() {
            log::debug!("Ignoring keyboard input, editing is disabled");
            return;
        }

        let mut state = self.state.borrow_mut();
        state.text = text.to_owned();
        state.text_changed(&self.settings);
    }

    pub fn commit_text(&mut self) {
        self.state.borrow_mut().commit_text(&self.settings);
    }

    pub fn is_enabled(&self) -> bool {
        self.state.borrow().enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        let mut state = self.state.borrow_mut();
        state.enabled = enabled;
        if !enabled {
            state.popup = None;
        }
        state.apply_style(&self.settings);
    }

    /// Opens the popup calendar on the month of the current date, or of
    /// today if there is none.
    pub fn open_popup(&mut self) {
        let mut state = self.state.borrow_mut();
        if !state.enabled {
            return;
        }

        let shown = YearMonth::of(&state.date.unwrap_or(state.today));
        let popup = CalendarState::new(&self.settings, shown, state.date, state.today);
        state.popup = Some(popup);
    }

    pub fn close_popup(&mut self) {
        self.state.borrow_mut().popup = None;
    }

    pub fn is_popup_open(&self) -> bool {
        self.state.borrow().popup.is_some()
    }

    pub fn popup_view(&self) -> Option<Ref<'_, CalendarView>> {
        Ref::filter_map(self.state.borrow(), |state| {
            state.popup.as_ref().map(|popup| popup.view())
        })
        .ok()
    }

    /// Forwards `command` to the open popup. A date picked there becomes the
    /// picker's date and closes the popup.
    pub fn execute_popup(&mut self, command: CalendarCommand) -> bool {
        let mut state = self.state.borrow_mut();

        let picked = match state.popup.as_mut() {
            Some(popup) => {
                if popup.execute(&self.settings, command) {
                    Some(popup.selected())
                } else {
                    None
                }
            }
            None => return false,
        };

        match picked {
            Some(date) => {
                if state.set_date(&self.settings, date) {
                    state.popup = None;
                    return true;
                }

                let current = state.date;
                if let Some(popup) = state.popup.as_mut() {
                    popup.select(&self.settings, current);
                }
                false
            }
            None => false,
        }
    }

    pub fn set_today(&mut self, today: NaiveDate) {
        let mut state = self.state.borrow_mut();
        state.today = today;
        if let Some(popup) = state.popup.as_mut() {
            popup.set_today(&self.settings, today);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::locale::Locale;
    use chrono::{Datelike, Month, Weekday};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn picker() -> DatePicker {
        DatePicker::with_today(DatePickerSettings::default(), date(2024, 2, 15)).unwrap()
    }

    fn recording(picker: &mut DatePicker) -> Rc<RefCell<Vec<DateChangeEvent>>> {
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&events);
        picker.add_date_change_listener(Box::new(move |event: &DateChangeEvent| {
            sink.borrow_mut().push(*event)
        }));
        events
    }

    #[test]
    fn set_date_writes_text_once() {
        let mut picker = picker();
        let events = recording(&mut picker);

        assert!(picker.set_date(Some(date(2024, 2, 1))));
        assert_eq!(picker.text(), "February 1, 2024");
        assert_eq!(picker.text_status(), TextStatus::Valid);
        // Writing the text field must not feed back into a second event.
        assert_eq!(events.borrow().len(), 1);

        assert!(picker.set_date(Some(date(2024, 2, 1))));
        assert_eq!(events.borrow().len(), 2);
    }

    #[test]
    fn typing_updates_date_and_status() {
        let mut picker = picker();
        let events = recording(&mut picker);

        picker.text_changed("March 3, 2024");
        assert_eq!(picker.date(), Some(date(2024, 3, 3)));
        assert_eq!(picker.text(), "March 3, 2024");
        assert_eq!(events.borrow().len(), 1);

        picker.text_changed("Marsh 3");
        assert_eq!(picker.text_status(), TextStatus::Invalid);
        assert_eq!(picker.date(), Some(date(2024, 3, 3)));
        assert_eq!(picker.text_style().foreground, Color::RED);

        picker.commit_text();
        assert_eq!(picker.text(), "March 3, 2024");
        assert_eq!(picker.text_status(), TextStatus::Valid);
    }

    #[test]
    fn vetoed_text_keeps_last_date() {
        let mut picker = picker();
        picker
            .settings_mut()
            .set_veto_policy(Some(Box::new(|d: &NaiveDate| d.weekday() != Weekday::Sun)))
            .unwrap();

        picker.text_changed("2024-02-18");
        assert_eq!(picker.text_status(), TextStatus::Vetoed);
        assert_eq!(picker.date(), None);
        assert!(picker.text_style().font.strikethrough);
        assert!(!picker.set_date(Some(date(2024, 2, 18))));
    }

    #[test]
    fn empty_dates_can_be_disallowed() {
        let mut picker = picker();
        picker.settings_mut().set_allow_empty_dates(false);
        assert_eq!(picker.date(), Some(date(2024, 2, 15)));
        assert!(!picker.set_date(None));

        picker.text_changed("");
        assert_eq!(picker.text_status(), TextStatus::DisallowedEmpty);
        assert_eq!(
            picker.text_style().background,
            ColorArea::TextFieldBackgroundDisallowedEmptyDate.default_color()
        );
        picker.commit_text();
        assert_eq!(picker.text(), "February 15, 2024");
    }

    #[test]
    fn new_veto_policy_marks_current_date() {
        let mut picker = picker();
        picker.set_date(Some(date(2024, 2, 15)));

        let allowed = picker
            .settings_mut()
            .set_date_range_limits(Some(date(2024, 3, 1)), None)
            .unwrap();
        assert!(!allowed);
        assert_eq!(picker.date(), Some(date(2024, 2, 15)));
        assert_eq!(picker.text_status(), TextStatus::Vetoed);

        picker.settings_mut().set_veto_policy(None).unwrap();
        assert_eq!(picker.text_status(), TextStatus::Valid);
    }

    #[test]
    fn commit_keeps_vetoed_status_of_current_date() {
        let mut picker = picker();
        picker.set_date(Some(date(2024, 2, 15)));
        picker
            .settings_mut()
            .set_date_range_limits(Some(date(2024, 3, 1)), None)
            .unwrap();

        picker.commit_text();
        assert_eq!(picker.date(), Some(date(2024, 2, 15)));
        assert_eq!(picker.text(), "February 15, 2024");
        assert_eq!(picker.text_status(), TextStatus::Vetoed);
        assert!(picker.text_style().font.strikethrough);

        // Invalid text typed over a vetoed date reverts to it, still vetoed.
        picker.text_changed("Febr");
        assert_eq!(picker.text_status(), TextStatus::Invalid);
        picker.commit_text();
        assert_eq!(picker.text(), "February 15, 2024");
        assert_eq!(picker.text_status(), TextStatus::Vetoed);
    }

    #[test]
    fn commit_reformats_valid_text() {
        let mut picker = picker();
        let events = recording(&mut picker);

        picker.text_changed("2024-02-20");
        assert_eq!(picker.date(), Some(date(2024, 2, 20)));
        assert_eq!(picker.text(), "2024-02-20");

        picker.commit_text();
        assert_eq!(picker.text(), "February 20, 2024");
        assert_eq!(picker.text_status(), TextStatus::Valid);
        assert_eq!(events.borrow().len(), 1);
    }

    #[test]
    fn locale_change_reformats_text() {
        let mut picker = picker();
        picker.set_date(Some(date(2024, 2, 1)));
        picker.settings_mut().set_locale(Locale::new("de", Some("DE")));
        assert_eq!(picker.text(), "01.02.2024");

        picker.text_changed("29.02.2024");
        assert_eq!(picker.date(), Some(date(2024, 2, 29)));
    }

    #[test]
    fn popup_picks_a_date_and_closes() {
        let mut picker = picker();
        let events = recording(&mut picker);

        picker.open_popup();
        assert_eq!(
            picker.popup_view().unwrap().grid.year_month,
            YearMonth::new(2024, 2).unwrap()
        );

        picker.execute_popup(CalendarCommand::PickMonth(Month::April));
        let index = picker
            .popup_view()
            .unwrap()
            .grid
            .cells
            .iter()
            .position(|c| c.date == Some(date(2024, 4, 10)))
            .unwrap();

        assert!(picker.execute_popup(CalendarCommand::ClickCell(index)));
        assert!(!picker.is_popup_open());
        assert_eq!(picker.date(), Some(date(2024, 4, 10)));
        assert_eq!(picker.text(), "April 10, 2024");
        assert_eq!(events.borrow().len(), 1);
    }

    #[test]
    fn popup_clear_respects_allow_empty() {
        let mut picker = picker();
        picker.set_date(Some(date(2024, 2, 1)));

        picker.settings_mut().set_allow_empty_dates(false);
        picker.open_popup();
        assert!(!picker.execute_popup(CalendarCommand::Clear));
        assert_eq!(picker.date(), Some(date(2024, 2, 1)));
        assert!(picker.is_popup_open());
        assert!(picker.popup_view().unwrap().grid.cells.iter().any(|c| c.selected));

        picker.settings_mut().set_allow_empty_dates(true);
        assert!(picker.execute_popup(CalendarCommand::Clear));
        assert_eq!(picker.date(), None);
        assert_eq!(picker.text(), "");
    }

    #[test]
    fn disabled_picker_has_no_popup() {
        let mut picker = picker();
        picker.set_enabled(false);
        picker.open_popup();
        assert!(!picker.is_popup_open());
        assert!(picker.popup_view().is_none());
        assert_eq!(
            picker.text_style().foreground,
            ColorArea::DatePickerTextDisabled.default_color()
        );
    }
}
