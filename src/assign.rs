//! Distributes event occurrences over the cells of a month grid.

use crate::event::EventRecord;
use crate::grid::{DayCell, MonthGrid, Week, DAYS_IN_WEEK};
use crate::occurrence::{occurrences_on, Occurrence};
use time::Date;
use tracing::trace;

/// The occurrences drawn in one day cell
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct CellEvents<'a> {
    /// Spans of multi-day events, in event order
    pub multi_day: Vec<Occurrence<'a>>,
    /// Everything else: untimed events first, then by start time.  Events
    /// with equal times keep their event order.
    pub single_day: Vec<Occurrence<'a>>,
}

impl<'a> CellEvents<'a> {
    fn for_date(events: &'a [EventRecord], date: Date) -> CellEvents<'a> {
        let (multi_day, mut single_day): (Vec<_>, Vec<_>) = occurrences_on(events, date)
            .into_iter()
            .partition(|occ| occ.multi_day);
        single_day.sort_by_key(|occ| occ.event.start_time);
        CellEvents {
            multi_day,
            single_day,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.multi_day.is_empty() && self.single_day.is_empty()
    }

    pub fn len(&self) -> usize {
        self.multi_day.len() + self.single_day.len()
    }

    /// Multi-day spans followed by single-day occurrences, in drawing order
    pub fn iter(&self) -> impl Iterator<Item = &Occurrence<'a>> {
        self.multi_day.iter().chain(&self.single_day)
    }
}

/// A month grid together with the occurrences in each of its cells
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MonthAgenda<'a> {
    grid: &'a MonthGrid,
    cells: Vec<CellEvents<'a>>,
}

impl<'a> MonthAgenda<'a> {
    pub fn grid(&self) -> &'a MonthGrid {
        self.grid
    }

    /// Every cell of the grid in row-major order, blank cells included
    pub fn iter(&self) -> impl Iterator<Item = (DayCell, &CellEvents<'a>)> {
        self.grid.cells().zip(&self.cells)
    }

    /// The grid's rows, each paired with the events of its seven cells
    pub fn weeks(&self) -> impl Iterator<Item = (&'a Week, &[CellEvents<'a>])> {
        self.grid.weeks().iter().zip(self.cells.chunks(DAYS_IN_WEEK))
    }

    /// The events of the cell showing `date`, or `None` if the date is not
    /// part of this month
    pub fn on(&self, date: Date) -> Option<&CellEvents<'a>> {
        self.iter()
            .find(|(cell, _)| cell.date() == Some(date))
            .map(|(_, events)| events)
    }
}

/// Works out which events are drawn in which cell of `grid`.  Blank cells
/// get no events.
pub fn assign<'a>(grid: &'a MonthGrid, events: &'a [EventRecord]) -> MonthAgenda<'a> {
    let cells = grid
        .cells()
        .map(|cell| match cell {
            DayCell::Blank => CellEvents::default(),
            DayCell::Day(date) => CellEvents::for_date(events, date),
        })
        .collect::<Vec<_>>();
    trace!(
        year = grid.year(),
        month = %grid.month(),
        events = events.len(),
        occurrences = cells.iter().map(CellEvents::len).sum::<usize>(),
        "assigned events to month grid"
    );
    MonthAgenda { grid, cells }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::UserName;
    use crate::grid::GRID_CELLS;
    use crate::recurrence::{MonthlyRule, Ordinal, Recurrence};
    use time::macros::{date, time};
    use time::{Month, Weekday::*};

    fn event(id: &str, start: Date) -> EventRecord {
        EventRecord::new(id, id, UserName::new("alice"), start)
    }

    fn names<'a>(occs: &[Occurrence<'a>]) -> Vec<&'a str> {
        occs.iter().map(|o| o.event.name.as_str()).collect()
    }

    fn sample_events() -> Vec<EventRecord> {
        vec![
            event("trip", date!(2024 - 03 - 10)).end_date(date!(2024 - 03 - 12)),
            event("standup", date!(2024 - 03 - 01))
                .times(time!(9:30), None)
                .recurrence(Recurrence::Weekly { weekday: Monday }),
            event("birthday", date!(2024 - 03 - 11)),
            event("lunch", date!(2024 - 03 - 11)).times(time!(12:00), None),
            event("early", date!(2024 - 03 - 11)).times(time!(7:15), None),
            event("review", date!(2024 - 01 - 01)).recurrence(Recurrence::Monthly(
                MonthlyRule::ByWeekday {
                    ordinal: Ordinal::Last,
                    weekday: Friday,
                },
            )),
            event("dinner", date!(2024 - 03 - 11)).times(time!(12:00), None),
        ]
    }

    #[test]
    fn test_cell_partition_and_order() {
        let grid = MonthGrid::new(2024, Month::March).expect("month should be in range");
        let events = sample_events();
        let agenda = assign(&grid, &events);
        let monday = agenda.on(date!(2024 - 03 - 11)).expect("date is in March");
        assert_eq!(names(&monday.multi_day), ["trip"]);
        assert_eq!(
            names(&monday.single_day),
            ["birthday", "early", "standup", "lunch", "dinner"]
        );
        let friday = agenda.on(date!(2024 - 03 - 29)).expect("date is in March");
        assert!(friday.multi_day.is_empty());
        assert_eq!(names(&friday.single_day), ["review"]);
        let sunday = agenda.on(date!(2024 - 03 - 10)).expect("date is in March");
        assert_eq!(names(&sunday.multi_day), ["trip"]);
        assert!(sunday.single_day.is_empty());
        assert_eq!(agenda.on(date!(2024 - 04 - 01)), None);
    }

    #[test]
    fn test_blank_cells_are_empty() {
        let grid = MonthGrid::new(2024, Month::March).expect("month should be in range");
        let events = [event("daily", date!(2000 - 01 - 01)).recurrence(Recurrence::Daily)];
        let agenda = assign(&grid, &events);
        assert_eq!(agenda.iter().count(), GRID_CELLS);
        for (cell, cell_events) in agenda.iter() {
            assert_eq!(cell.is_blank(), cell_events.is_empty());
        }
        assert_eq!(agenda.weeks().count(), 6);
        assert!(agenda.weeks().all(|(_, cells)| cells.len() == 7));
    }

    #[test]
    fn test_no_events() {
        let grid = MonthGrid::new(2024, Month::March).expect("month should be in range");
        let agenda = assign(&grid, &[]);
        assert!(agenda.iter().all(|(_, events)| events.is_empty()));
    }

    #[test]
    fn test_assign_is_idempotent() {
        let grid = MonthGrid::new(2024, Month::March).expect("month should be in range");
        let events = sample_events();
        assert_eq!(assign(&grid, &events), assign(&grid, &events));
    }

    #[test]
    fn test_iter_draws_spans_first() {
        let grid = MonthGrid::new(2024, Month::March).expect("month should be in range");
        let events = sample_events();
        let agenda = assign(&grid, &events);
        let tuesday = agenda.on(date!(2024 - 03 - 12)).expect("date is in March");
        let order = tuesday
            .iter()
            .map(|o| o.event.name.as_str())
            .collect::<Vec<_>>();
        assert_eq!(order, ["trip"]);
        assert_eq!(tuesday.len(), 1);
    }
}
