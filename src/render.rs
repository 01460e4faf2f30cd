use std::fmt::Write;
use termion::color::{Bg, Fg, Rgb};
use termion::style;

use crate::color::Color;
use crate::grid::{CellKind, DateCell};
use crate::panel::CalendarView;

const CELL_WIDTH: usize = 4;

fn fit_label(label: &str) -> String {
    let label: String = label.chars().take(CELL_WIDTH - 1).collect();
    format!("{:>width$} ", label, width = CELL_WIDTH - 1)
}

fn plain_cell(cell: &DateCell) -> String {
    match cell.date {
        None => " ".repeat(CELL_WIDTH),
        Some(_) if cell.selected => format!("[{:>2}]", cell.text),
        Some(_) => {
            let marker = if cell.today {
                '*'
            } else if cell.kind == CellKind::Vetoed {
                'x'
            } else {
                ' '
            };
            format!("{}{:>2} ", marker, cell.text)
        }
    }
}

fn rgb(color: Color) -> Rgb {
    Rgb(color.r, color.g, color.b)
}

fn ansi_cell(cell: &DateCell) -> String {
    if cell.date.is_none() {
        return plain_cell(cell);
    }

    let text = plain_cell(cell);
    if cell.selected || cell.today {
        format!(
            "{}{}{}{}{}",
            Bg(rgb(cell.background)),
            Fg(rgb(cell.foreground)),
            style::Bold,
            text,
            style::Reset
        )
    } else {
        format!(
            "{}{}{}{}",
            Bg(rgb(cell.background)),
            Fg(rgb(cell.foreground)),
            text,
            style::Reset
        )
    }
}

fn header(view: &CalendarView) -> String {
    let visibility = &view.visibility;
    let title = format!("{} {}", view.grid.month_label, view.grid.year_label);

    [
        (visibility.previous_year_button, "<<"),
        (visibility.previous_month_button, "<"),
        (true, title.as_str()),
        (visibility.next_month_button, ">"),
        (visibility.next_year_button, ">>"),
    ]
    .iter()
    .filter(|(shown, _)| *shown)
    .map(|(_, part)| *part)
    .collect::<Vec<_>>()
    .join(" ")
}

fn footer(view: &CalendarView) -> Option<String> {
    let mut parts = Vec::new();
    if view.visibility.today_button {
        if view.today_enabled {
            parts.push(view.today_label.clone());
        } else {
            parts.push(format!("({})", view.today_label));
        }
    }
    if view.visibility.clear_button {
        parts.push(view.clear_label.clone());
    }

    if parts.is_empty() {
        None
    } else {
        Some(parts.join("  "))
    }
}

fn render_with(view: &CalendarView, paint: impl Fn(&DateCell) -> String) -> String {
    let grid = &view.grid;
    let week_column = grid.weeks.iter().any(|week| week.week_number.is_some());

    let mut out = String::new();
    let _ = writeln!(out, "{}", header(view));

    let mut labels = String::new();
    if week_column {
        labels.push_str("   |");
    }
    for label in grid.weekday_labels.iter() {
        labels.push_str(&fit_label(label));
    }
    let _ = writeln!(out, "{}", labels.trim_end());

    for (row, week) in grid.rows().zip(grid.weeks.iter()) {
        if row.iter().all(|cell| cell.date.is_none()) {
            continue;
        }

        let mut line = String::new();
        if week_column {
            let _ = write!(line, "{:>3}|", week.label());
        }
        for cell in row {
            line.push_str(&paint(cell));
        }
        let _ = writeln!(out, "{}", line.trim_end());
    }

    if let Some(footer) = footer(view) {
        let _ = writeln!(out, "{}", footer);
    }

    out
}

/// Renders `view` as plain text. Today is marked with `*`, vetoed dates with
/// `x`, and the selected date is bracketed.
pub fn render_text(view: &CalendarView) -> String {
    render_with(view, plain_cell)
}

/// Like [`render_text`], with each date painted in its cell colors.
pub fn render_ansi(view: &CalendarView) -> String {
    render_with(view, ansi_cell)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::panel::{CalendarCommand, CalendarPanel};
    use crate::policy::WeekdayVeto;
    use crate::settings::{DatePickerSettings, Visibility};
    use chrono::{NaiveDate, Weekday};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn panel() -> CalendarPanel {
        let mut settings = DatePickerSettings::default();
        settings.set_first_day_of_week(Some(Weekday::Mon));
        CalendarPanel::with_today(settings, date(2024, 2, 15)).unwrap()
    }

    #[test]
    fn february_2024() {
        let mut panel = panel();
        panel.set_selected_date(Some(date(2024, 2, 1)));

        let text = render_text(&panel.view());
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "<< < February 2024 > >>");
        assert_eq!(lines[1], " Mo  Tu  We  Th  Fr  Sa  Su");
        assert_eq!(lines[2], "            [ 1]  2   3   4");
        assert_eq!(lines[3], "  5   6   7   8   9  10  11");
        assert_eq!(lines[4], " 12  13  14 *15  16  17  18");
        assert_eq!(lines[6], " 26  27  28  29");
        assert_eq!(lines[7], "Today: February 15, 2024  Clear");
        assert_eq!(lines.len(), 8);
    }

    #[test]
    fn vetoed_dates_and_week_column() {
        let mut panel = panel();
        panel
            .settings_mut()
            .set_veto_policy(Some(Box::new(WeekdayVeto(vec![Weekday::Sat, Weekday::Sun]))))
            .unwrap();
        panel.settings_mut().set_week_numbers_displayed(true);

        let text = render_text(&panel.view());
        let lines: Vec<&str> = text.lines().collect();

        // Week numbers bring the locale's Sunday start with them.
        assert_eq!(lines[1], "   | Su  Mo  Tu  We  Th  Fr  Sa");
        assert_eq!(lines[2], format!("  5|{}  1   2 x 3", " ".repeat(16)));
        assert_eq!(lines[3], "  6|x 4   5   6   7   8   9 x10");
        assert_eq!(lines[6], "  9|x25  26  27  28  29");
    }

    #[test]
    fn hidden_buttons_are_left_out() {
        let mut panel = panel();
        panel.settings_mut().set_visibility(Visibility {
            today_button: false,
            clear_button: false,
            next_year_button: false,
            previous_year_button: false,
            ..Visibility::default()
        });
        panel.execute(CalendarCommand::NextMonth);

        let text = render_text(&panel.view());
        assert_eq!(text.lines().next(), Some("< March 2024 >"));
        assert!(!text.contains("Today"));
    }

    #[test]
    fn ansi_output_keeps_layout() {
        let panel = panel();
        let ansi = render_ansi(&panel.view());
        assert!(ansi.contains("\x1b[48;2;"));
        assert!(ansi.contains("*15 "));
    }
}
