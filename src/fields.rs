//! The flat, loosely-typed event record exchanged with the event store, and
//! its conversion into [`EventRecord`].
//!
//! The store keeps every recurrence parameter as an optional field on one
//! record (`weeklyDay`, `biWeeklySchedule`, `monthlyType`, ...) and the
//! event form sends empty strings for anything it left unset.  Conversion
//! folds those fields into a single [`Recurrence`] value.  A record whose
//! recurrence parameters are missing or unreadable is still converted, with
//! [`Recurrence::Unresolved`], so that it simply never shows up on the
//! calendar instead of failing the whole load.

use crate::event::{EventRecord, UserName};
use crate::grid::weekday_from_index0;
use crate::recurrence::{DateSpan, Frequency, MonthlyRule, Ordinal, Recurrence, WeekPair};
use serde::{Deserialize, Deserializer, Serialize};
use std::iter::successors;
use thiserror::Error;
use time::{format_description::FormatItem, macros::format_description, Date, Time, Weekday};
use tracing::{debug, warn};

static YMD_FMT: &[FormatItem<'_>] = format_description!("[year]-[month]-[day]");

static HM_FMT: &[FormatItem<'_>] = format_description!("[hour]:[minute]");

static HMS_FMT: &[FormatItem<'_>] = format_description!("[hour]:[minute]:[second]");

/// A field the form may send as a string, a number, or a boolean
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Flag(bool),
    Number(i64),
    Text(String),
}

impl FieldValue {
    fn text(&self) -> Option<String> {
        match self {
            FieldValue::Flag(b) => Some(b.to_string()),
            FieldValue::Number(n) => Some(n.to_string()),
            FieldValue::Text(s) => non_empty(Some(s)).map(str::to_owned),
        }
    }

    fn number(&self) -> Option<i64> {
        match self {
            FieldValue::Flag(_) => None,
            FieldValue::Number(n) => Some(*n),
            FieldValue::Text(s) => s.trim().parse().ok(),
        }
    }

    fn flag(&self) -> bool {
        match self {
            FieldValue::Flag(b) => *b,
            FieldValue::Number(n) => *n != 0,
            FieldValue::Text(s) => {
                let s = s.trim();
                s.eq_ignore_ascii_case("true") || s.eq_ignore_ascii_case("on")
            }
        }
    }
}

/// A reference to a user, either by bare name or as a stored user record
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(untagged)]
pub enum UserRef {
    Name(String),
    Record {
        #[serde(rename = "userName")]
        user_name: String,
    },
}

impl UserRef {
    pub fn into_user_name(self) -> UserName {
        match self {
            UserRef::Name(name) | UserRef::Record { user_name: name } => {
                UserName::new(name.trim())
            }
        }
    }
}

/// Attendees as submitted (a comma-joined list of names) or as stored (a
/// list of user records)
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Attendees {
    Joined(String),
    Listed(Vec<UserRef>),
}

impl Attendees {
    pub fn into_users(self) -> Vec<UserName> {
        match self {
            Attendees::Joined(s) => s
                .split(',')
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .map(UserName::new)
                .collect(),
            Attendees::Listed(refs) => refs.into_iter().map(UserRef::into_user_name).collect(),
        }
    }
}

/// The create/update payload for an event
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EventFields {
    pub name: String,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub all_day: Option<FieldValue>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    #[serde(deserialize_with = "deserialize_frequency")]
    pub frequency: Option<Frequency>,
    pub weekly_day: Option<FieldValue>,
    pub bi_weekly_schedule: Option<String>,
    pub bi_weekly_day: Option<FieldValue>,
    pub monthly_type: Option<String>,
    pub monthly_date: Option<FieldValue>,
    pub monthly_schedule: Option<String>,
    pub monthly_day: Option<FieldValue>,
    pub location: Option<String>,
    pub description: Option<String>,
    pub shared: Option<FieldValue>,
    pub attendees: Option<Attendees>,
}

impl EventFields {
    /// Converts the payload into an event record owned by `created_by`.
    ///
    /// Missing or unreadable recurrence parameters do not make this fail;
    /// the record gets [`Recurrence::Unresolved`] instead.
    pub fn into_record(self, id: String, created_by: UserName) -> Result<EventRecord, FieldError> {
        let name = self.name.trim().to_owned();
        if name.is_empty() {
            return Err(FieldError::MissingName);
        }
        let start = parse_date("startDate", self.start_date.as_deref())?
            .ok_or(FieldError::MissingStartDate)?;
        let end = parse_date("endDate", self.end_date.as_deref())?;
        if let Some(end) = end {
            if end < start {
                return Err(FieldError::EndBeforeStart { start, end });
            }
        }
        let all_day = self.all_day.as_ref().is_some_and(FieldValue::flag);
        let start_time = if all_day {
            None
        } else {
            parse_time("startTime", self.start_time.as_deref())?
        };
        let end_time = if start_time.is_some() {
            parse_time("endTime", self.end_time.as_deref())?
        } else {
            None
        };
        let frequency = self.frequency.unwrap_or(Frequency::None);
        let recurrence = self.recurrence(frequency).unwrap_or_else(|e| {
            warn!(event = %id, error = %e, "event recurrence cannot be resolved and will never match");
            Recurrence::Unresolved(frequency)
        });
        let shared = self.shared.as_ref().is_some_and(FieldValue::flag);
        let mut attendees = vec![created_by.clone()];
        if shared {
            for user in self.attendees.into_iter().flat_map(Attendees::into_users) {
                if !attendees.iter().any(|a| a.is(&user)) {
                    attendees.push(user);
                }
            }
        }
        Ok(EventRecord {
            id,
            name,
            created_by,
            span: DateSpan::new(start, end),
            start_time,
            end_time,
            recurrence,
            attendees,
            shared,
            location: non_empty(self.location.as_deref()).map(str::to_owned),
            description: non_empty(self.description.as_deref()).map(str::to_owned),
        })
    }

    /// Builds the recurrence rule for `frequency` out of the matching
    /// parameter fields
    pub fn recurrence(&self, frequency: Frequency) -> Result<Recurrence, RuleShapeError> {
        let missing = |field: &'static str| RuleShapeError { frequency, field };
        match frequency {
            Frequency::None => Ok(Recurrence::None),
            Frequency::Daily => Ok(Recurrence::Daily),
            Frequency::Weekly => {
                let weekday = parse_weekday(self.weekly_day.as_ref())
                    .ok_or_else(|| missing("weeklyDay"))?;
                Ok(Recurrence::Weekly { weekday })
            }
            Frequency::BiWeekly => {
                let pair = non_empty(self.bi_weekly_schedule.as_deref())
                    .and_then(|s| s.parse::<WeekPair>().ok())
                    .ok_or_else(|| missing("biWeeklySchedule"))?;
                let weekday = parse_weekday(self.bi_weekly_day.as_ref())
                    .ok_or_else(|| missing("biWeeklyDay"))?;
                Ok(Recurrence::BiWeekly { pair, weekday })
            }
            Frequency::Monthly => {
                let kind = non_empty(self.monthly_type.as_deref()).map(str::to_ascii_lowercase);
                match kind.as_deref() {
                    Some("date" | "bydate" | "by date") => {
                        let day = self
                            .monthly_date
                            .as_ref()
                            .and_then(FieldValue::number)
                            .and_then(|n| u8::try_from(n).ok())
                            .filter(|d| (1..=31).contains(d))
                            .ok_or_else(|| missing("monthlyDate"))?;
                        Ok(Recurrence::Monthly(MonthlyRule::ByDate { day }))
                    }
                    Some("day" | "weekday" | "byweekday" | "by day") => {
                        let ordinal = non_empty(self.monthly_schedule.as_deref())
                            .and_then(|s| s.parse::<Ordinal>().ok())
                            .ok_or_else(|| missing("monthlySchedule"))?;
                        let weekday = parse_weekday(self.monthly_day.as_ref())
                            .ok_or_else(|| missing("monthlyDay"))?;
                        Ok(Recurrence::Monthly(MonthlyRule::ByWeekday { ordinal, weekday }))
                    }
                    _ => Err(missing("monthlyType")),
                }
            }
        }
    }
}

/// An event record as kept by the store: the payload plus its identity
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredEvent {
    #[serde(alias = "_id")]
    pub id: String,
    pub created_by: UserRef,
    #[serde(flatten)]
    pub fields: EventFields,
}

impl StoredEvent {
    pub fn into_record(self) -> Result<EventRecord, FieldError> {
        self.fields
            .into_record(self.id, self.created_by.into_user_name())
    }
}

/// Parses a JSON array of stored events.  Records that cannot be read or
/// converted are logged and skipped; only input that is not an array is an
/// error.
pub fn load_events(json: &str) -> Result<Vec<EventRecord>, serde_json::Error> {
    let stored: Vec<serde_json::Value> = serde_json::from_str(json)?;
    let total = stored.len();
    let records = stored
        .into_iter()
        .enumerate()
        .filter_map(|(index, value)| {
            let ev = match serde_json::from_value::<StoredEvent>(value) {
                Ok(ev) => ev,
                Err(e) => {
                    warn!(index, error = %e, "skipping malformed event record");
                    return None;
                }
            };
            let id = ev.id.clone();
            match ev.into_record() {
                Ok(record) => Some(record),
                Err(e) => {
                    warn!(event = %id, error = %e, "skipping unreadable event");
                    None
                }
            }
        })
        .collect::<Vec<_>>();
    debug!(total, loaded = records.len(), "loaded events");
    Ok(records)
}

#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum FieldError {
    #[error("event name is required")]
    MissingName,
    #[error("start date is required")]
    MissingStartDate,
    #[error("invalid {field} {value:?}; expected YYYY-MM-DD")]
    InvalidDate { field: &'static str, value: String },
    #[error("invalid {field} {value:?}; expected HH:MM")]
    InvalidTime { field: &'static str, value: String },
    #[error("end date {end} is before start date {start}")]
    EndBeforeStart { start: Date, end: Date },
}

/// A recurring event is missing a parameter its frequency requires
#[derive(Clone, Copy, Debug, Eq, Error, PartialEq)]
#[error("{frequency} event has no valid {field}")]
pub struct RuleShapeError {
    pub frequency: Frequency,
    pub field: &'static str,
}

// The form sends "" for an unset frequency and may use any letter case.
fn deserialize_frequency<'de, D>(deserializer: D) -> Result<Option<Frequency>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    non_empty(value.as_deref())
        .map(|s| s.parse::<Frequency>().map_err(serde::de::Error::custom))
        .transpose()
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}

// Stored dates may carry a time suffix ("2024-03-10T00:00:00.000Z"); only the
// calendar date is significant.
fn parse_date(field: &'static str, value: Option<&str>) -> Result<Option<Date>, FieldError> {
    let Some(value) = non_empty(value) else {
        return Ok(None);
    };
    let ymd = value.split_once('T').map_or(value, |(ymd, _)| ymd);
    match Date::parse(ymd, &YMD_FMT) {
        Ok(d) => Ok(Some(d)),
        Err(_) => Err(FieldError::InvalidDate {
            field,
            value: value.to_owned(),
        }),
    }
}

fn parse_time(field: &'static str, value: Option<&str>) -> Result<Option<Time>, FieldError> {
    let Some(value) = non_empty(value) else {
        return Ok(None);
    };
    match Time::parse(value, &HM_FMT).or_else(|_| Time::parse(value, &HMS_FMT)) {
        Ok(t) => Ok(Some(t)),
        Err(_) => Err(FieldError::InvalidTime {
            field,
            value: value.to_owned(),
        }),
    }
}

// Accepts a Sunday-first index ("3", 3) or a day name, full or abbreviated
fn parse_weekday(value: Option<&FieldValue>) -> Option<Weekday> {
    let value = value?;
    if let Some(n) = value.number() {
        return u8::try_from(n).ok().and_then(weekday_from_index0);
    }
    let text = value.text()?.to_ascii_lowercase();
    successors(Some(Weekday::Sunday), |wd| Some(wd.next()))
        .take(7)
        .find(|wd| {
            let name = wd.to_string().to_ascii_lowercase();
            name == text || name.get(..3) == Some(text.as_str())
        })
}
