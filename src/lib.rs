//! Month-view event calendar.
//!
//! A month is laid out as a fixed grid of 6 weeks × 7 days ([`MonthGrid`]),
//! and each day cell is filled with the events occurring on it
//! ([`assign`]).  Events are plain records ([`EventRecord`]) that may repeat
//! weekly, on alternate weeks of the month, or monthly by date or by
//! weekday; see [`Recurrence`].  Everything here is a pure function of its
//! inputs.

pub mod access;
pub mod assign;
pub mod clock;
pub mod event;
pub mod fields;
pub mod grid;
pub mod occurrence;
pub mod recurrence;
pub mod render;

pub use crate::assign::{assign, CellEvents, MonthAgenda};
pub use crate::clock::{default_view, Clock, FixedClock, SystemClock};
pub use crate::event::{EventRecord, UserName};
pub use crate::fields::{load_events, EventFields, FieldError, RuleShapeError, StoredEvent};
pub use crate::grid::{days_in_month, DayCell, MonthGrid, OutOfRangeError, Week};
pub use crate::occurrence::{occurrences_on, Occurrence};
pub use crate::recurrence::{DateSpan, Frequency, MonthlyRule, Ordinal, Recurrence, WeekPair};
pub use crate::render::MonthView;
