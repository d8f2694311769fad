//! Calendar event records as handed over by the event store.

use crate::recurrence::{DateSpan, Frequency, Recurrence};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};
use time::{Date, Time};

/// Identifier of a registered user.  Names compare, and hash, without
/// regard to ASCII case; the spelling given is kept for display.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(transparent)]
pub struct UserName(String);

impl UserName {
    pub fn new<S: Into<String>>(name: S) -> UserName {
        UserName(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// User names are unique regardless of case.
    pub fn is(&self, other: &UserName) -> bool {
        self.0.eq_ignore_ascii_case(&other.0)
    }
}

impl PartialEq for UserName {
    fn eq(&self, other: &UserName) -> bool {
        self.is(other)
    }
}

impl Eq for UserName {}

impl Hash for UserName {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for b in self.0.bytes() {
            state.write_u8(b.to_ascii_lowercase());
        }
        state.write_u8(0xff);
    }
}

impl fmt::Display for UserName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for UserName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EventRecord {
    pub id: String,
    pub name: String,
    pub created_by: UserName,
    pub span: DateSpan,
    pub start_time: Option<Time>,
    pub end_time: Option<Time>,
    pub recurrence: Recurrence,
    /// Everyone the event is visible to, creator first
    pub attendees: Vec<UserName>,
    pub shared: bool,
    pub location: Option<String>,
    pub description: Option<String>,
}

impl EventRecord {
    /// Creates a private, untimed, single-date event attended only by its
    /// creator
    pub fn new<I, N>(id: I, name: N, created_by: UserName, start: Date) -> EventRecord
    where
        I: Into<String>,
        N: Into<String>,
    {
        EventRecord {
            id: id.into(),
            name: name.into(),
            attendees: vec![created_by.clone()],
            created_by,
            span: DateSpan::new(start, None),
            start_time: None,
            end_time: None,
            recurrence: Recurrence::None,
            shared: false,
            location: None,
            description: None,
        }
    }

    pub fn end_date(mut self, end: Date) -> EventRecord {
        self.span.end = Some(end);
        self
    }

    pub fn times(mut self, start: Time, end: Option<Time>) -> EventRecord {
        self.start_time = Some(start);
        self.end_time = end;
        self
    }

    pub fn recurrence(mut self, recurrence: Recurrence) -> EventRecord {
        self.recurrence = recurrence;
        self
    }

    /// Shares the event with the given users in addition to its creator
    pub fn shared_with<I: IntoIterator<Item = UserName>>(mut self, users: I) -> EventRecord {
        for user in users {
            if !self.has_attendee(&user) {
                self.attendees.push(user);
            }
        }
        self.shared = true;
        self
    }

    pub fn start_date(&self) -> Date {
        self.span.start
    }

    pub fn frequency(&self) -> Frequency {
        self.recurrence.frequency()
    }

    pub fn is_all_day(&self) -> bool {
        self.start_time.is_none()
    }

    /// A non-recurring event whose end date differs from its start date
    pub fn is_multi_day(&self) -> bool {
        self.recurrence == Recurrence::None && self.span.is_multi_day()
    }

    pub fn occurs_on(&self, date: Date) -> bool {
        self.recurrence.matches(self.span, date)
    }

    pub fn has_attendee(&self, user: &UserName) -> bool {
        self.attendees.iter().any(|a| a.is(user))
    }

    pub fn is_created_by(&self, user: &UserName) -> bool {
        self.created_by.is(user)
    }
}
