extern crate calpick as lib;

use chrono::{NaiveDate, Weekday};
use flexi_logger::{FileSpec, Logger};
use lib::locale::Locale;
use lib::month::YearMonth;
use lib::panel::CalendarPanel;
use lib::policy::WeekdayVeto;
use lib::render::{render_ansi, render_text};
use std::path::PathBuf;
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
#[structopt(
    name = "calpick",
    author = "Julian Bigge <j.reedts@gmail.com>",
    about = "Calpick - print a month of the date picker calendar."
)]
pub struct Args {
    #[structopt(
        name = "CONFIG",
        short = "c",
        long = "config",
        help = "path to config file",
        parse(from_os_str)
    )]
    pub configfile: Option<PathBuf>,

    #[structopt(short = "l", long = "locale", help = "locale, e.g. en-US or de_DE")]
    pub locale: Option<Locale>,

    #[structopt(short = "m", long = "month", help = "month to show as YYYY-MM")]
    pub month: Option<YearMonth>,

    #[structopt(short = "s", long = "select", help = "date to select as YYYY-MM-DD")]
    pub select: Option<NaiveDate>,

    #[structopt(short = "w", long = "week-numbers", help = "show week numbers")]
    pub week_numbers: bool,

    #[structopt(long = "veto-weekends", help = "disallow saturdays and sundays")]
    pub veto_weekends: bool,

    #[structopt(long = "color", help = "paint dates in their calendar colors")]
    pub color: bool,

    #[structopt(long = "log-file", help = "path to log file", parse(from_os_str))]
    pub log_file: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::from_args();

    const DEFAULT_LOG_LEVEL: &'static str = if cfg!(debug_assertions) {
        "debug"
    } else {
        "info"
    };

    let mut logger = Logger::try_with_env_or_str(DEFAULT_LOG_LEVEL)?;

    if let Some(log_file) = args.log_file {
        logger = logger
            .log_to_file(FileSpec::try_from(log_file)?)
            .print_message();
    }

    logger.start()?;

    let mut config = lib::config::load_suitable_config(args.configfile.as_deref())?;
    if let Some(locale) = args.locale {
        config.locale = Some(locale);
    }

    let mut settings = config.settings();
    if args.week_numbers {
        settings.set_week_numbers_displayed(true);
    }

    let mut panel = CalendarPanel::new(settings)?;

    if args.veto_weekends {
        panel
            .settings_mut()
            .set_veto_policy(Some(Box::new(WeekdayVeto(vec![Weekday::Sat, Weekday::Sun]))))?;
    }

    if let Some(date) = args.select {
        if !panel.set_selected_date(Some(date)) {
            log::warn!("{} is not allowed and stays unselected", date);
        }
    }

    if let Some(year_month) = args.month {
        panel.set_displayed_year_month(year_month);
    }

    let view = panel.view();
    if args.color {
        print!("{}", render_ansi(&view));
    } else {
        print!("{}", render_text(&view));
    }

    Ok(())
}
