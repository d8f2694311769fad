use crate::grid::MonthGrid;
use time::{Date, OffsetDateTime};
use tracing::debug;

/// Source of the current date
pub trait Clock {
    fn today(&self) -> Date;
}

/// Reads the date from the system clock in the local time zone
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> Date {
        match OffsetDateTime::now_local() {
            Ok(now) => now.date(),
            Err(e) => {
                // The local offset is indeterminate on Unix once other
                // threads are running.
                debug!(error = %e, "failed to determine local offset; using UTC");
                OffsetDateTime::now_utc().date()
            }
        }
    }
}

/// A clock stuck on one date
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct FixedClock(pub Date);

impl Clock for FixedClock {
    fn today(&self) -> Date {
        self.0
    }
}

/// The month shown when no month has been asked for: the one containing
/// today
pub fn default_view<C: Clock + ?Sized>(clock: &C) -> MonthGrid {
    MonthGrid::containing(clock.today())
}
