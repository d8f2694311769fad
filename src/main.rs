use anyhow::Context;
use evcal::access::can_view;
use evcal::{
    assign, default_view, load_events, Clock, FixedClock, MonthGrid, MonthView, OutOfRangeError,
    SystemClock, UserName,
};
use lexopt::{Arg, Parser, ValueExt};
use std::path::PathBuf;
use thiserror::Error;
use time::{Date, Month};
use tracing_subscriber::EnvFilter;

#[derive(Clone, Debug, Eq, PartialEq)]
enum Command {
    Run {
        month: Option<(i32, Month)>,
        events: Option<PathBuf>,
        user: Option<UserName>,
    },
    Help,
    Version,
}

impl Command {
    fn from_parser(mut parser: Parser) -> Result<Command, lexopt::Error> {
        let mut month = None;
        let mut events = None;
        let mut user = None;
        while let Some(arg) = parser.next()? {
            match arg {
                Arg::Short('h') | Arg::Long("help") => return Ok(Command::Help),
                Arg::Short('V') | Arg::Long("version") => return Ok(Command::Version),
                Arg::Short('e') | Arg::Long("events") => {
                    events = Some(PathBuf::from(parser.value()?));
                }
                Arg::Short('u') | Arg::Long("user") => {
                    user = Some(UserName::new(parser.value()?.string()?));
                }
                Arg::Value(value) if month.is_none() => {
                    month = Some(value.parse_with(parse_year_month)?);
                }
                _ => return Err(arg.unexpected()),
            }
        }
        Ok(Command::Run {
            month,
            events,
            user,
        })
    }

    fn run(self) -> anyhow::Result<()> {
        match self {
            Command::Run {
                month,
                events,
                user,
            } => {
                let (grid, today) = select_month(month, &SystemClock)?;
                let mut records = match events {
                    Some(path) => {
                        let json = std::fs::read_to_string(&path)
                            .with_context(|| format!("failed to read {}", path.display()))?;
                        load_events(&json).with_context(|| {
                            format!("failed to parse events in {}", path.display())
                        })?
                    }
                    None => Vec::new(),
                };
                if let Some(user) = user {
                    records.retain(|ev| can_view(ev, &user));
                }
                let agenda = assign(&grid, &records);
                print!("{}", MonthView::new(&agenda).today(today));
                Ok(())
            }
            Command::Help => {
                println!("Usage: evcal [-e FILE] [-u USER] [YYYY-MM]");
                println!();
                println!("Show a month of events; defaults to the current month");
                println!();
                println!("Options:");
                println!("  -e, --events FILE Read events from a JSON array of stored event records");
                println!("  -u, --user USER   Only show events USER created or attends");
                println!("  -h, --help        Display this help message and exit");
                println!("  -V, --version     Show the program version and exit");
                Ok(())
            }
            Command::Version => {
                println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
                Ok(())
            }
        }
    }
}

/// The grid to show and the date to highlight, reading the clock once
fn select_month(
    month: Option<(i32, Month)>,
    clock: &dyn Clock,
) -> Result<(MonthGrid, Date), OutOfRangeError> {
    let today = clock.today();
    let grid = match month {
        Some((year, month)) => MonthGrid::new(year, month)?,
        None => default_view(&FixedClock(today)),
    };
    Ok((grid, today))
}

#[derive(Clone, Copy, Debug, Eq, Error, PartialEq)]
#[error("expected a month in the form YYYY-MM")]
struct YearMonthError;

fn parse_year_month(s: &str) -> Result<(i32, Month), YearMonthError> {
    let (year, month) = s.rsplit_once('-').ok_or(YearMonthError)?;
    let year = year.parse::<i32>().map_err(|_| YearMonthError)?;
    let month = month
        .parse::<u8>()
        .ok()
        .and_then(|m| Month::try_from(m).ok())
        .ok_or(YearMonthError)?;
    Ok((year, month))
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
    Command::from_parser(Parser::from_env())?.run()
}
