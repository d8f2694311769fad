//! Who may see, change, and leave an event.

use crate::event::{EventRecord, UserName};
use std::fmt;
use thiserror::Error;

#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum AccessError {
    #[error("only the creator of an event may {0} it")]
    NotCreator(Action),
    #[error("the creator of an event cannot be removed from it")]
    RemovingCreator,
    #[error("you are not authorized to remove {0} from this event")]
    RemovingOther(UserName),
    #[error("{0} is not attending this event")]
    NotAttending(UserName),
    #[error("you cannot add yourself to your own event")]
    AddingSelf,
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Action {
    Edit,
    Delete,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Edit => f.write_str("edit"),
            Action::Delete => f.write_str("delete"),
        }
    }
}

pub fn can_view(event: &EventRecord, user: &UserName) -> bool {
    event.has_attendee(user)
}

/// The events `user` created or was invited to, in store order
pub fn visible_to<'a>(
    events: &'a [EventRecord],
    user: &'a UserName,
) -> impl Iterator<Item = &'a EventRecord> {
    events.iter().filter(move |ev| can_view(ev, user))
}

pub fn check_edit(event: &EventRecord, user: &UserName) -> Result<(), AccessError> {
    check_creator(event, user, Action::Edit)
}

pub fn check_delete(event: &EventRecord, user: &UserName) -> Result<(), AccessError> {
    check_creator(event, user, Action::Delete)
}

fn check_creator(event: &EventRecord, user: &UserName, action: Action) -> Result<(), AccessError> {
    if event.is_created_by(user) {
        Ok(())
    } else {
        Err(AccessError::NotCreator(action))
    }
}

/// The creator may remove any other attendee; everyone else may only remove
/// themselves.
pub fn check_remove_attendee(
    event: &EventRecord,
    acting: &UserName,
    attendee: &UserName,
) -> Result<(), AccessError> {
    if event.is_created_by(attendee) {
        Err(AccessError::RemovingCreator)
    } else if !event.is_created_by(acting) && !acting.is(attendee) {
        Err(AccessError::RemovingOther(attendee.clone()))
    } else if !event.has_attendee(attendee) {
        Err(AccessError::NotAttending(attendee.clone()))
    } else {
        Ok(())
    }
}

/// Returns the attendee list with `attendee` taken out
pub fn remove_attendee(
    event: &EventRecord,
    acting: &UserName,
    attendee: &UserName,
) -> Result<Vec<UserName>, AccessError> {
    check_remove_attendee(event, acting, attendee)?;
    Ok(event
        .attendees
        .iter()
        .filter(|a| !a.is(attendee))
        .cloned()
        .collect())
}

pub fn check_new_attendee(creator: &UserName, candidate: &UserName) -> Result<(), AccessError> {
    if creator.is(candidate) {
        Err(AccessError::AddingSelf)
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    fn user(name: &str) -> UserName {
        UserName::new(name)
    }

    fn party() -> EventRecord {
        EventRecord::new("p1", "Party", user("alice"), date!(2024 - 07 - 04))
            .shared_with([user("bob"), user("carol")])
    }

    #[test]
    fn test_visibility() {
        let events = [
            party(),
            EventRecord::new("p2", "Dentist", user("alice"), date!(2024 - 07 - 05)),
            EventRecord::new("p3", "Gym", user("bob"), date!(2024 - 07 - 05)),
        ];
        let bob = user("bob");
        let ids = visible_to(&events, &bob)
            .map(|ev| ev.id.as_str())
            .collect::<Vec<_>>();
        assert_eq!(ids, ["p1", "p3"]);
        let dave = user("dave");
        assert_eq!(visible_to(&events, &dave).count(), 0);
    }

    #[test]
    fn test_only_creator_edits_and_deletes() {
        let ev = party();
        assert_eq!(check_edit(&ev, &user("Alice")), Ok(()));
        assert_eq!(check_delete(&ev, &user("alice")), Ok(()));
        assert_eq!(
            check_edit(&ev, &user("bob")),
            Err(AccessError::NotCreator(Action::Edit))
        );
        assert_eq!(
            check_delete(&ev, &user("bob")),
            Err(AccessError::NotCreator(Action::Delete))
        );
    }

    #[test]
    fn test_attendee_removal_rules() {
        let ev = party();
        assert_eq!(
            remove_attendee(&ev, &user("bob"), &user("bob")),
            Ok(vec![user("alice"), user("carol")])
        );
        assert_eq!(
            remove_attendee(&ev, &user("alice"), &user("carol")),
            Ok(vec![user("alice"), user("bob")])
        );
        assert_eq!(
            check_remove_attendee(&ev, &user("bob"), &user("carol")),
            Err(AccessError::RemovingOther(user("carol")))
        );
        assert_eq!(
            check_remove_attendee(&ev, &user("alice"), &user("alice")),
            Err(AccessError::RemovingCreator)
        );
        assert_eq!(
            check_remove_attendee(&ev, &user("alice"), &user("dave")),
            Err(AccessError::NotAttending(user("dave")))
        );
    }

    #[test]
    fn test_cannot_invite_self() {
        assert_eq!(
            check_new_attendee(&user("alice"), &user("ALICE")),
            Err(AccessError::AddingSelf)
        );
        assert_eq!(check_new_attendee(&user("alice"), &user("bob")), Ok(()));
    }
}
