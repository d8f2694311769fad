//! Plain-text rendering of a month agenda: a grid of day numbers followed by
//! the events of each day.

use crate::assign::{CellEvents, MonthAgenda};
use crate::grid::{DayCell, DAYS_IN_WEEK};
use crate::occurrence::Occurrence;
use std::fmt::{self, Write};
use time::Date;

static HEADER: &str = " Su  Mo  Tu  We  Th  Fr  Sa";

/// Number of columns per day of week
const DAY_WIDTH: usize = 4;

/// Width of the day grid in columns
const MAIN_WIDTH: usize = DAY_WIDTH * DAYS_IN_WEEK;

/// Columns taken up by the date at the start of each agenda line
const AGENDA_INDENT: usize = 8;

#[derive(Clone, Copy, Debug)]
pub struct MonthView<'a> {
    agenda: &'a MonthAgenda<'a>,
    today: Option<Date>,
}

impl<'a> MonthView<'a> {
    pub fn new(agenda: &'a MonthAgenda<'a>) -> Self {
        MonthView {
            agenda,
            today: None,
        }
    }

    /// Highlight `date` in the grid
    pub fn today(mut self, date: Date) -> Self {
        self.today = Some(date);
        self
    }

    fn write_grid(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let grid = self.agenda.grid();
        let title = format!("{} {}", grid.month(), grid.year());
        write_line(f, &format!("{title:^width$}", width = MAIN_WIDTH))?;
        write_line(f, HEADER)?;
        for (week, cells) in self.agenda.weeks() {
            if week.is_blank() {
                continue;
            }
            let mut line = String::with_capacity(MAIN_WIDTH);
            for (cell, events) in week.cells().iter().zip(cells) {
                match cell {
                    DayCell::Blank => line.push_str(&" ".repeat(DAY_WIDTH)),
                    DayCell::Day(date) => self.show_day(&mut line, *date, events)?,
                }
            }
            write_line(f, &line)?;
        }
        Ok(())
    }

    fn show_day(&self, line: &mut String, date: Date, events: &CellEvents<'_>) -> fmt::Result {
        if self.today == Some(date) {
            write!(line, "[{:2}]", date.day())
        } else if events.is_empty() {
            write!(line, " {:2} ", date.day())
        } else {
            write!(line, " {:2}*", date.day())
        }
    }

    fn write_agenda(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (cell, events) in self.agenda.iter() {
            let Some(date) = cell.date() else {
                continue;
            };
            for (i, occ) in events.iter().enumerate() {
                if std::mem::replace(&mut first, false) {
                    writeln!(f)?;
                }
                let mut line = if i == 0 {
                    let weekday = date.weekday().to_string();
                    format!(
                        "{:2} {}  ",
                        date.day(),
                        weekday.get(..3).unwrap_or(&weekday)
                    )
                } else {
                    " ".repeat(AGENDA_INDENT)
                };
                show_occurrence(&mut line, occ)?;
                write_line(f, &line)?;
            }
        }
        Ok(())
    }
}

impl fmt::Display for MonthView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_grid(f)?;
        self.write_agenda(f)
    }
}

// Multi-day events are drawn as a bar ("==") that is labelled only on its
// first day.
fn show_occurrence(line: &mut String, occ: &Occurrence<'_>) -> fmt::Result {
    line.push_str(if occ.multi_day { "==" } else { "--" });
    let label = occ.label();
    if !label.is_empty() {
        write!(line, " {label}")?;
    }
    Ok(())
}

fn write_line(f: &mut fmt::Formatter<'_>, s: &str) -> fmt::Result {
    writeln!(f, "{}", s.trim_end())
}
