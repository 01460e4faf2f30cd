use chrono::{Local, Month, NaiveDate};
use std::cell::{Ref, RefCell};
use std::rc::Rc;

use crate::border::CalendarBorderProperties;
use crate::error::Result;
use crate::grid::{compute_grid, Grid};
use crate::month::YearMonth;
use crate::settings::{DatePickerSettings, ParentKind, SettingsParent, Visibility};

/// User commands a calendar reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalendarCommand {
    NextMonth,
    PreviousMonth,
    NextYear,
    PreviousYear,
    PickMonth(Month),
    PickYear(i32),
    ClickCell(usize),
    Today,
    Clear,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearMonthChangeEvent {
    pub old: YearMonth,
    pub new: YearMonth,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionChangeEvent {
    pub old: Option<NaiveDate>,
    pub new: Option<NaiveDate>,
}

pub trait CalendarListener {
    fn year_month_changed(&mut self, _event: &YearMonthChangeEvent) {}

    /// Fired on every selection, including reselection of the same date.
    fn selected_date_changed(&mut self, _event: &SelectionChangeEvent) {}
}

/// Rendered model of a calendar: the month grid plus the surrounding
/// labels and buttons.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarView {
    pub grid: Grid,
    pub today_label: String,
    pub today_enabled: bool,
    pub clear_label: String,
    pub visibility: Visibility,
    pub month_menu_enabled: bool,
    pub year_menu_enabled: bool,
    pub borders: Vec<CalendarBorderProperties>,
}

impl CalendarView {
    fn build(
        settings: &DatePickerSettings,
        displayed: &YearMonth,
        selected: Option<&NaiveDate>,
        today: &NaiveDate,
    ) -> Self {
        let mut grid = compute_grid(displayed, settings, selected);
        grid.mark_today(today);

        let translations = settings.translations();

        CalendarView {
            grid,
            today_label: format!("{}: {}", translations.today, settings.format_date(today)),
            today_enabled: settings.is_date_allowed(today),
            clear_label: translations.clear.clone(),
            visibility: *settings.visibility(),
            month_menu_enabled: settings.enable_month_menu(),
            year_menu_enabled: settings.enable_year_menu(),
            borders: settings.border_properties().to_vec(),
        }
    }
}

/// Displayed page, selection and rendered view of one calendar. Shared by
/// the independent panel and the date picker popup.
pub(crate) struct CalendarState {
    displayed: YearMonth,
    selected: Option<NaiveDate>,
    today: NaiveDate,
    view: CalendarView,
    listeners: Vec<Box<dyn CalendarListener>>,
}

impl CalendarState {
    pub(crate) fn new(
        settings: &DatePickerSettings,
        displayed: YearMonth,
        selected: Option<NaiveDate>,
        today: NaiveDate,
    ) -> Self {
        CalendarState {
            view: CalendarView::build(settings, &displayed, selected.as_ref(), &today),
            displayed,
            selected,
            today,
            listeners: Vec::new(),
        }
    }

    pub(crate) fn displayed(&self) -> YearMonth {
        self.displayed
    }

    pub(crate) fn selected(&self) -> Option<NaiveDate> {
        self.selected
    }

    pub(crate) fn view(&self) -> &CalendarView {
        &self.view
    }

    pub(crate) fn redraw(&mut self, settings: &DatePickerSettings) {
        self.view = CalendarView::build(settings, &self.displayed, self.selected.as_ref(), &self.today);
    }

    pub(crate) fn set_today(&mut self, settings: &DatePickerSettings, today: NaiveDate) {
        self.today = today;
        self.redraw(settings);
    }

    fn display(&mut self, settings: &DatePickerSettings, target: Option<YearMonth>) {
        let target = match target {
            Some(target) => target,
            None => {
                log::debug!("Ignoring navigation past the supported date range from {}", self.displayed);
                return;
            }
        };

        let event = YearMonthChangeEvent {
            old: self.displayed,
            new: target,
        };
        self.displayed = target;

        if event.old != event.new {
            for listener in self.listeners.iter_mut() {
                listener.year_month_changed(&event);
            }
        }

        self.redraw(settings);
    }

    /// Selects `date` and shows its month. Vetoed dates are refused.
    pub(crate) fn select(&mut self, settings: &DatePickerSettings, date: Option<NaiveDate>) -> bool {
        if let Some(date) = &date {
            if !settings.is_date_allowed(date) {
                log::debug!("Refusing to select vetoed date {}", date);
                return false;
            }
        }

        let event = SelectionChangeEvent {
            old: self.selected,
            new: date,
        };
        self.selected = date;

        for listener in self.listeners.iter_mut() {
            listener.selected_date_changed(&event);
        }

        match date {
            Some(date) if !self.displayed.contains(&date) => {
                self.display(settings, Some(YearMonth::of(&date)))
            }
            _ => self.redraw(settings),
        }

        true
    }

    /// Runs `command`. Returns whether it selected a date (or cleared the
    /// selection).
    pub(crate) fn execute(&mut self, settings: &DatePickerSettings, command: CalendarCommand) -> bool {
        use CalendarCommand::*;

        match command {
            NextMonth => self.display(settings, self.displayed.next()),
            PreviousMonth => self.display(settings, self.displayed.prev()),
            NextYear => self.display(settings, self.displayed.checked_add_years(1)),
            PreviousYear => self.display(settings, self.displayed.checked_add_years(-1)),
            PickMonth(month) => self.display(settings, self.displayed.with_month(month)),
            PickYear(year) => self.display(settings, self.displayed.with_year(year)),
            ClickCell(index) => {
                let date = self
                    .view
                    .grid
                    .cells
                    .get(index)
                    .filter(|cell| cell.enabled)
                    .and_then(|cell| cell.date);

                return match date {
                    Some(date) => self.select(settings, Some(date)),
                    None => false,
                };
            }
            Today => {
                let today = self.today;
                if settings.is_date_allowed(&today) {
                    return self.select(settings, Some(today));
                }
                self.display(settings, Some(YearMonth::of(&today)));
            }
            Clear => return self.select(settings, None),
        }

        false
    }
}

struct PanelHook(Rc<RefCell<CalendarState>>);

impl SettingsParent for PanelHook {
    fn redraw(&self, settings: &DatePickerSettings) {
        self.0.borrow_mut().redraw(settings);
    }

    fn selected_date(&self) -> Option<NaiveDate> {
        self.0.borrow().selected()
    }
}

/// A calendar shown on its own, without a text field.
pub struct CalendarPanel {
    settings: DatePickerSettings,
    state: Rc<RefCell<CalendarState>>,
}

impl CalendarPanel {
    pub fn new(settings: DatePickerSettings) -> Result<Self> {
        CalendarPanel::with_today(settings, Local::now().date_naive())
    }

    /// Panel whose notion of "today" is `today`, showing today's month.
    pub fn with_today(mut settings: DatePickerSettings, today: NaiveDate) -> Result<Self> {
        let state = Rc::new(RefCell::new(CalendarState::new(
            &settings,
            YearMonth::of(&today),
            None,
            today,
        )));

        settings.attach_parent(ParentKind::CalendarPanel, Box::new(PanelHook(Rc::clone(&state))))?;

        Ok(CalendarPanel { settings, state })
    }

    pub fn settings(&self) -> &DatePickerSettings {
        &self.settings
    }

    /// Every change made through the returned reference redraws the panel.
    pub fn settings_mut(&mut self) -> &mut DatePickerSettings {
        &mut self.settings
    }

    pub fn add_listener(&mut self, listener: Box<dyn CalendarListener>) {
        self.state.borrow_mut().listeners.push(listener);
    }

    pub fn view(&self) -> Ref<'_, CalendarView> {
        Ref::map(self.state.borrow(), |state| state.view())
    }

    pub fn displayed_year_month(&self) -> YearMonth {
        self.state.borrow().displayed()
    }

    pub fn selected_date(&self) -> Option<NaiveDate> {
        self.state.borrow().selected()
    }

    pub fn set_displayed_year_month(&mut self, year_month: YearMonth) {
        self.state.borrow_mut().display(&self.settings, Some(year_month));
    }

    /// Selects `date` unless it is vetoed. Returns whether the selection was
    /// applied.
    pub fn set_selected_date(&mut self, date: Option<NaiveDate>) -> bool {
        self.state.borrow_mut().select(&self.settings, date)
    }

    pub fn set_today(&mut self, today: NaiveDate) {
        self.state.borrow_mut().set_today(&self.settings, today);
    }

    pub fn execute(&mut self, command: CalendarCommand) -> bool {
        self.state.borrow_mut().execute(&self.settings, command)
    }
}
