//! Recurrence rules and the predicate deciding whether a rule produces an
//! occurrence on a given date.

use crate::grid::days_in_month_of;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use time::{Date, Weekday};

/// The recurrence kind named on a stored event record
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Frequency {
    None,
    Daily,
    Weekly,
    BiWeekly,
    Monthly,
}

impl Frequency {
    pub fn as_str(self) -> &'static str {
        match self {
            Frequency::None => "NONE",
            Frequency::Daily => "DAILY",
            Frequency::Weekly => "WEEKLY",
            Frequency::BiWeekly => "BIWEEKLY",
            Frequency::Monthly => "MONTHLY",
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Frequency {
    type Err = UnknownValue;

    fn from_str(s: &str) -> Result<Frequency, UnknownValue> {
        match s.trim().to_ascii_uppercase().as_str() {
            "NONE" => Ok(Frequency::None),
            "DAILY" => Ok(Frequency::Daily),
            "WEEKLY" => Ok(Frequency::Weekly),
            "BIWEEKLY" | "BI-WEEKLY" | "BI_WEEKLY" => Ok(Frequency::BiWeekly),
            "MONTHLY" => Ok(Frequency::Monthly),
            _ => Err(UnknownValue::new("frequency", s)),
        }
    }
}

#[derive(Clone, Debug, Eq, Error, PartialEq)]
#[error("unrecognized {kind} {value:?}")]
pub struct UnknownValue {
    pub kind: &'static str,
    pub value: String,
}

impl UnknownValue {
    pub(crate) fn new(kind: &'static str, value: &str) -> UnknownValue {
        UnknownValue {
            kind,
            value: value.to_owned(),
        }
    }
}

/// Which weeks of the month a bi-weekly event falls in
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum WeekPair {
    FirstThird,
    SecondFourth,
}

impl WeekPair {
    /// Whether the `n`th occurrence of a weekday within its month belongs
    /// to this pair
    pub fn contains(self, n: u8) -> bool {
        match self {
            WeekPair::FirstThird => n == 1 || n == 3,
            WeekPair::SecondFourth => n == 2 || n == 4,
        }
    }
}

impl FromStr for WeekPair {
    type Err = UnknownValue;

    fn from_str(s: &str) -> Result<WeekPair, UnknownValue> {
        match s.trim().to_ascii_lowercase().as_str() {
            "1st and 3rd" | "first_third" => Ok(WeekPair::FirstThird),
            "2nd and 4th" | "second_fourth" => Ok(WeekPair::SecondFourth),
            _ => Err(UnknownValue::new("bi-weekly schedule", s)),
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Ordinal {
    First,
    Second,
    Third,
    Fourth,
    Last,
}

impl Ordinal {
    fn matches(self, date: Date) -> bool {
        let n = match self {
            Ordinal::First => 1,
            Ordinal::Second => 2,
            Ordinal::Third => 3,
            Ordinal::Fourth => 4,
            Ordinal::Last => return date.day() + 7 > days_in_month_of(date),
        };
        ordinal_in_month(date) == n
    }
}

impl FromStr for Ordinal {
    type Err = UnknownValue;

    fn from_str(s: &str) -> Result<Ordinal, UnknownValue> {
        match s.trim().to_ascii_lowercase().as_str() {
            "1st" | "first" => Ok(Ordinal::First),
            "2nd" | "second" => Ok(Ordinal::Second),
            "3rd" | "third" => Ok(Ordinal::Third),
            "4th" | "fourth" => Ok(Ordinal::Fourth),
            "last" => Ok(Ordinal::Last),
            _ => Err(UnknownValue::new("monthly schedule", s)),
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum MonthlyRule {
    /// The same day of every month.  Months too short to contain `day` are
    /// skipped.
    ByDate { day: u8 },
    /// The `ordinal`th `weekday` of every month
    ByWeekday { ordinal: Ordinal, weekday: Weekday },
}

impl MonthlyRule {
    fn matches(self, date: Date) -> bool {
        match self {
            MonthlyRule::ByDate { day } => date.day() == day,
            MonthlyRule::ByWeekday { ordinal, weekday } => {
                date.weekday() == weekday && ordinal.matches(date)
            }
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Recurrence {
    /// A single date, or a multi-day span when the event has an end date
    None,
    Daily,
    Weekly {
        weekday: Weekday,
    },
    BiWeekly {
        pair: WeekPair,
        weekday: Weekday,
    },
    Monthly(MonthlyRule),
    /// A record that declared the given frequency without the parameters
    /// it needs.  Never matches.
    Unresolved(Frequency),
}

impl Recurrence {
    pub fn frequency(&self) -> Frequency {
        match self {
            Recurrence::None => Frequency::None,
            Recurrence::Daily => Frequency::Daily,
            Recurrence::Weekly { .. } => Frequency::Weekly,
            Recurrence::BiWeekly { .. } => Frequency::BiWeekly,
            Recurrence::Monthly(_) => Frequency::Monthly,
            Recurrence::Unresolved(freq) => *freq,
        }
    }

    pub fn is_recurring(&self) -> bool {
        self.frequency() != Frequency::None
    }

    /// Whether the rule, bounded by `span`, produces an occurrence on `date`
    pub fn matches(&self, span: DateSpan, date: Date) -> bool {
        if !span.contains(date) {
            return false;
        }
        match *self {
            Recurrence::None => span.end.is_some() || date == span.start,
            Recurrence::Daily => true,
            Recurrence::Weekly { weekday } => date.weekday() == weekday,
            Recurrence::BiWeekly { pair, weekday } => {
                date.weekday() == weekday && pair.contains(ordinal_in_month(date))
            }
            Recurrence::Monthly(rule) => rule.matches(date),
            Recurrence::Unresolved(_) => false,
        }
    }
}

/// The inclusive date range an event is active in.  An absent end means the
/// event continues indefinitely.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct DateSpan {
    pub start: Date,
    pub end: Option<Date>,
}

impl DateSpan {
    pub fn new(start: Date, end: Option<Date>) -> DateSpan {
        DateSpan { start, end }
    }

    pub fn contains(self, date: Date) -> bool {
        date >= self.start
            && match self.end {
                Some(end) => date <= end,
                None => true,
            }
    }

    /// True if the span ends on a different date than it starts
    pub fn is_multi_day(self) -> bool {
        self.end.is_some_and(|end| end != self.start)
    }
}

/// How many times `date`'s weekday has occurred in its month up to and
/// including `date`
pub fn ordinal_in_month(date: Date) -> u8 {
    date.day().div_ceil(7)
}
