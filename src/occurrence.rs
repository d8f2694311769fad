//! Which events occur on a given date.

use crate::event::EventRecord;
use time::Date;

/// An event showing up on a specific date
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Occurrence<'a> {
    pub event: &'a EventRecord,
    pub date: Date,
    /// Set for non-recurring events spanning more than one date, which are
    /// drawn as a continuous bar rather than a single-day marker
    pub multi_day: bool,
}

impl Occurrence<'_> {
    /// Multi-day bars carry the event's name only on their first date.
    pub fn shows_label(&self) -> bool {
        !self.multi_day || self.date == self.event.start_date()
    }

    /// The text drawn for this occurrence: the name, preceded by the start
    /// time for timed events.  Continuation dates of multi-day bars get an
    /// empty label.
    pub fn label(&self) -> String {
        if !self.shows_label() {
            return String::new();
        }
        match self.event.start_time {
            Some(t) if !self.multi_day => {
                format!("{:02}:{:02} {}", t.hour(), t.minute(), self.event.name)
            }
            _ => self.event.name.clone(),
        }
    }
}

/// The occurrence of `event` on `date`, if there is one
pub fn occurrence_on(event: &EventRecord, date: Date) -> Option<Occurrence<'_>> {
    event.occurs_on(date).then(|| Occurrence {
        event,
        date,
        multi_day: event.is_multi_day(),
    })
}

/// Every event in `events` that occurs on `date`, in input order
pub fn occurrences_on(events: &[EventRecord], date: Date) -> Vec<Occurrence<'_>> {
    events
        .iter()
        .filter_map(|ev| occurrence_on(ev, date))
        .collect()
}
