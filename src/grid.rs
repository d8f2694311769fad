//! Fixed 6×7 month grids with leading and trailing blank cells.

use std::array;
use std::iter::successors;
use thiserror::Error;
use time::{Date, Duration, Month, Weekday, Weekday::*};

pub const DAYS_IN_WEEK: usize = 7;

pub const WEEKS_IN_GRID: usize = 6;

/// Number of cells in every month grid.  Six weeks always suffice: at most
/// six leading blanks plus at most 31 days is 37.
pub const GRID_CELLS: usize = DAYS_IN_WEEK * WEEKS_IN_GRID;

pub trait WeekdayExt {
    /// Sunday-first column index, 0 through 6
    fn index0(&self) -> u8;
}

impl WeekdayExt for Weekday {
    fn index0(&self) -> u8 {
        self.number_days_from_sunday()
    }
}

/// Inverse of [`WeekdayExt::index0`]
pub fn weekday_from_index0(index: u8) -> Option<Weekday> {
    let wd = match index {
        0 => Sunday,
        1 => Monday,
        2 => Tuesday,
        3 => Wednesday,
        4 => Thursday,
        5 => Friday,
        6 => Saturday,
        _ => return None,
    };
    Some(wd)
}

/// Converts a zero-based month number (January = 0) into a `Month`
pub fn month_from_index0(index: u8) -> Option<Month> {
    index
        .checked_add(1)
        .and_then(|n| Month::try_from(n).ok())
}

#[derive(Copy, Clone, Debug, Eq, Error, PartialEq)]
#[error("{month} {year} cannot be represented on the calendar")]
pub struct OutOfRangeError {
    pub year: i32,
    pub month: Month,
}

/// Number of days in the given month.
pub fn days_in_month(year: i32, month: Month) -> Result<u8, OutOfRangeError> {
    let first = Date::from_calendar_date(year, month, 1)
        .map_err(|_| OutOfRangeError { year, month })?;
    Ok(month_length(first))
}

/// Number of days in the month that `date` falls in
pub fn days_in_month_of(date: Date) -> u8 {
    month_length(first_of_month(date))
}

fn first_of_month(date: Date) -> Date {
    date - Duration::days(i64::from(date.day()) - 1)
}

// Day 32 of a month always spills into the following month; the day-of-month
// it lands on is how many days short of 32 the month is.
fn month_length(first: Date) -> u8 {
    match first.checked_add(Duration::days(31)) {
        Some(overflow) => 32 - overflow.day(),
        // There is no "day 32" at the very end of time, so count instead.
        None => iter_month(first).last().map_or(1, Date::day),
    }
}

fn iter_month(first: Date) -> impl Iterator<Item = Date> {
    let month = first.month();
    successors(Some(first), move |d| {
        d.next_day().filter(|tomorrow| tomorrow.month() == month)
    })
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum DayCell {
    Blank,
    Day(Date),
}

impl DayCell {
    pub fn date(self) -> Option<Date> {
        match self {
            DayCell::Blank => None,
            DayCell::Day(date) => Some(date),
        }
    }

    pub fn is_blank(self) -> bool {
        self == DayCell::Blank
    }
}

/// One row of a month grid, Sunday first
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Week([DayCell; DAYS_IN_WEEK]);

impl Week {
    pub fn cells(&self) -> &[DayCell; DAYS_IN_WEEK] {
        &self.0
    }

    pub fn get(&self, wd: Weekday) -> DayCell {
        self.0
            .get(usize::from(wd.index0()))
            .copied()
            .unwrap_or(DayCell::Blank)
    }

    /// Iterates over the non-blank days of the week together with their
    /// weekdays
    pub fn enumerate(&self) -> EnumerateWeek<'_> {
        EnumerateWeek::new(self)
    }

    pub fn is_blank(&self) -> bool {
        self.0.iter().all(|cell| cell.is_blank())
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EnumerateWeek<'a> {
    week: &'a Week,
    next_weekday: Option<Weekday>,
}

impl<'a> EnumerateWeek<'a> {
    fn new(week: &'a Week) -> Self {
        EnumerateWeek {
            week,
            next_weekday: Some(Sunday),
        }
    }
}

impl Iterator for EnumerateWeek<'_> {
    type Item = (Weekday, Date);

    fn next(&mut self) -> Option<(Weekday, Date)> {
        loop {
            let wd = self.next_weekday?;
            self.next_weekday = match wd.next() {
                Sunday => None,
                wd2 => Some(wd2),
            };
            if let DayCell::Day(date) = self.week.get(wd) {
                return Some((wd, date));
            }
        }
    }
}

/// The day cells shown for one month: leading blanks up to the weekday of
/// the 1st, one cell per day, then trailing blanks out to 42 cells.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MonthGrid {
    first: Date,
    days: u8,
    weeks: [Week; WEEKS_IN_GRID],
}

impl MonthGrid {
    pub fn new(year: i32, month: Month) -> Result<MonthGrid, OutOfRangeError> {
        let first = Date::from_calendar_date(year, month, 1)
            .map_err(|_| OutOfRangeError { year, month })?;
        Ok(MonthGrid::from_first(first))
    }

    /// The grid for the month containing `date`
    pub fn containing(date: Date) -> MonthGrid {
        MonthGrid::from_first(first_of_month(date))
    }

    fn from_first(first: Date) -> MonthGrid {
        let leading = usize::from(first.weekday().index0());
        let mut cells = [DayCell::Blank; GRID_CELLS];
        for (slot, date) in cells.iter_mut().skip(leading).zip(iter_month(first)) {
            *slot = DayCell::Day(date);
        }
        let weeks = array::from_fn(|w| Week(array::from_fn(|d| cells[w * DAYS_IN_WEEK + d])));
        MonthGrid {
            first,
            days: month_length(first),
            weeks,
        }
    }

    pub fn year(&self) -> i32 {
        self.first.year()
    }

    pub fn month(&self) -> Month {
        self.first.month()
    }

    pub fn first_date(&self) -> Date {
        self.first
    }

    pub fn days_in_month(&self) -> u8 {
        self.days
    }

    pub fn leading_blanks(&self) -> u8 {
        self.first.weekday().index0()
    }

    pub fn trailing_blanks(&self) -> usize {
        GRID_CELLS - usize::from(self.leading_blanks()) - usize::from(self.days)
    }

    pub fn weeks(&self) -> &[Week; WEEKS_IN_GRID] {
        &self.weeks
    }

    /// All 42 cells in row-major order
    pub fn cells(&self) -> impl Iterator<Item = DayCell> + '_ {
        self.weeks.iter().flat_map(|w| w.cells().iter().copied())
    }

    pub fn dates(&self) -> impl Iterator<Item = Date> + '_ {
        self.cells().filter_map(DayCell::date)
    }

    /// The grid for the previous month, or `None` at the beginning of time
    pub fn previous_month(&self) -> Option<MonthGrid> {
        self.first.previous_day().map(MonthGrid::containing)
    }

    /// The grid for the next month, or `None` at the end of time
    pub fn next_month(&self) -> Option<MonthGrid> {
        self.first
            .checked_add(Duration::days(i64::from(self.days)))
            .map(MonthGrid::from_first)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    const KNOWN_LENGTHS: [u8; 12] = [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];

    fn is_leap(year: i32) -> bool {
        (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
    }

    #[test]
    fn test_days_in_month_matches_gregorian() {
        for year in [1900, 1999, 2000, 2023, 2024, 2100] {
            let mut month = Month::January;
            for expected in KNOWN_LENGTHS {
                let expected = if month == Month::February && is_leap(year) {
                    29
                } else {
                    expected
                };
                assert_eq!(
                    days_in_month(year, month),
                    Ok(expected),
                    "{month} {year}"
                );
                month = month.next();
            }
        }
    }

    #[test]
    fn test_february_lengths() {
        assert_eq!(days_in_month(2024, Month::February), Ok(29));
        assert_eq!(days_in_month(2023, Month::February), Ok(28));
        assert_eq!(days_in_month_of(date!(2024 - 02 - 17)), 29);
    }

    #[test]
    fn test_every_grid_has_42_cells() {
        for year in 1990..2040 {
            let mut month = Month::January;
            for _ in 0..12 {
                let grid = MonthGrid::new(year, month).expect("month should be in range");
                let cells = grid.cells().collect::<Vec<_>>();
                assert_eq!(cells.len(), GRID_CELLS);
                let days = cells.iter().filter(|c| !c.is_blank()).count();
                assert_eq!(days, usize::from(grid.days_in_month()));
                let leading = cells.iter().take_while(|c| c.is_blank()).count();
                assert_eq!(
                    leading,
                    usize::from(grid.first_date().weekday().index0()),
                    "{month} {year}"
                );
                assert_eq!(
                    leading + days + grid.trailing_blanks(),
                    GRID_CELLS,
                    "{month} {year}"
                );
                month = month.next();
            }
        }
    }

    #[test]
    fn test_february_2024() {
        let grid = MonthGrid::new(2024, Month::February).expect("month should be in range");
        assert_eq!(grid.leading_blanks(), 4);
        assert_eq!(grid.days_in_month(), 29);
        assert_eq!(grid.cells().count(), 42);
        assert_eq!(grid.trailing_blanks(), 9);
        let first_row = grid.weeks()[0];
        assert_eq!(first_row.get(Wednesday), DayCell::Blank);
        assert_eq!(first_row.get(Thursday), DayCell::Day(date!(2024 - 02 - 01)));
        let mut iter = first_row.enumerate();
        assert_eq!(iter.next(), Some((Thursday, date!(2024 - 02 - 01))));
        assert_eq!(iter.next(), Some((Friday, date!(2024 - 02 - 02))));
        assert_eq!(iter.next(), Some((Saturday, date!(2024 - 02 - 03))));
        assert_eq!(iter.next(), None);
        assert!(grid.weeks()[5].is_blank());
    }

    #[test]
    fn test_days_ascend_in_row_major_order() {
        let grid = MonthGrid::new(2023, Month::October).expect("month should be in range");
        assert_eq!(grid.leading_blanks(), 0);
        let days = grid.dates().map(|d| d.day()).collect::<Vec<_>>();
        assert_eq!(days, (1..=31).collect::<Vec<_>>());
        assert_eq!(
            grid.weeks()[4].get(Tuesday),
            DayCell::Day(date!(2023 - 10 - 31))
        );
        assert_eq!(grid.weeks()[4].get(Wednesday), DayCell::Blank);
    }

    #[test]
    fn test_containing_and_neighbors() {
        let grid = MonthGrid::containing(date!(2024 - 12 - 25));
        assert_eq!((grid.year(), grid.month()), (2024, Month::December));
        let next = grid.next_month().expect("January 2025 should exist");
        assert_eq!((next.year(), next.month()), (2025, Month::January));
        let prev = next.previous_month().expect("December 2024 should exist");
        assert_eq!(prev, grid);
    }

    #[test]
    fn test_index_conversions() {
        assert_eq!(weekday_from_index0(0), Some(Sunday));
        assert_eq!(weekday_from_index0(6), Some(Saturday));
        assert_eq!(weekday_from_index0(7), None);
        assert_eq!(month_from_index0(0), Some(Month::January));
        assert_eq!(month_from_index0(11), Some(Month::December));
        assert_eq!(month_from_index0(12), None);
        assert_eq!(month_from_index0(u8::MAX), None);
    }
}
