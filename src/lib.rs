pub mod border;
pub mod color;
pub mod config;
pub mod error;
pub mod font;
pub mod grid;
pub mod locale;
pub mod month;
pub mod panel;
pub mod picker;
pub mod policy;
pub mod render;
pub mod settings;
pub mod week;

pub use error::{Error, ErrorKind, Result};
pub use grid::{compute_grid, resolve_effective_first_day_of_week, Grid};
pub use month::YearMonth;
pub use panel::{CalendarCommand, CalendarPanel, CalendarView};
pub use picker::DatePicker;
pub use settings::{DatePickerSettings, ParentKind, SettingsParent};
pub use week::{compute_week_number, WeekNumberRule};
