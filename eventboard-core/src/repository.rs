//! Operations over a loaded event collection.
//!
//! Nothing here touches storage: the caller loads the collection, applies
//! one of these, and saves the result. Ids are normalized once through
//! [`AsEventId`] before any comparison.

use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::error::{EventError, EventResult};
use crate::event::{Event, EventDraft};
use crate::id::{AsEventId, EventId};

/// How `create` picks the id of a new event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IdAssignment {
    /// `last.id + 1` when the collection holds more than one event, else `1`.
    ///
    /// A collection with exactly one event hands out `1` again, which
    /// duplicates the existing id when that event is `1`. Kept because
    /// existing documents were numbered this way.
    #[default]
    Legacy,
    /// One past the largest stored id, or `1` for an empty collection.
    MaxPlusOne,
}

impl IdAssignment {
    pub fn next_id(self, events: &[Event]) -> EventId {
        match self {
            IdAssignment::Legacy => events
                .last()
                .filter(|_| events.len() > 1)
                .map_or(EventId::FIRST, |last| last.id.next()),
            IdAssignment::MaxPlusOne => events
                .iter()
                .map(|e| e.id)
                .max()
                .map_or(EventId::FIRST, EventId::next),
        }
    }
}

const RSVP_NAME_REQUIRED: &str = "Name required";

fn position(events: &[Event], id: &impl AsEventId) -> Option<usize> {
    let id = id.as_event_id()?;
    events.iter().position(|e| e.id == id)
}

fn position_or_not_found<I: AsEventId + Display>(events: &[Event], id: &I) -> EventResult<usize> {
    position(events, id).ok_or_else(|| EventError::not_found(id))
}

/// First event whose id equals `id` after normalization.
pub fn find_by_id(events: &[Event], id: impl AsEventId) -> Option<&Event> {
    position(events, &id).map(|index| &events[index])
}

/// Validate `draft` and append it as a new event with no RSVPs.
pub fn create(events: &mut Vec<Event>, draft: EventDraft, ids: IdAssignment) -> EventResult<Event> {
    let fields = draft.validate()?;
    let event = Event::new(ids.next_id(events), fields);
    events.push(event.clone());
    Ok(event)
}

/// Replace name, date and description of an existing event.
pub fn update<I: AsEventId + Display>(
    events: &mut [Event],
    id: I,
    draft: EventDraft,
) -> EventResult<Event> {
    let index = position_or_not_found(events, &id)?;
    let fields = draft.validate()?;

    let event = &mut events[index];
    event.apply(fields);
    Ok(event.clone())
}

/// Remove an event and hand it back.
pub fn remove<I: AsEventId + Display>(events: &mut Vec<Event>, id: I) -> EventResult<Event> {
    let index = position_or_not_found(events, &id)?;
    Ok(events.remove(index))
}

/// Record `name` as attending.
pub fn add_rsvp<I: AsEventId + Display>(
    events: &mut [Event],
    id: I,
    name: Option<String>,
) -> EventResult<Event> {
    let index = position_or_not_found(events, &id)?;
    let name = name
        .filter(|n| !n.is_empty())
        .ok_or_else(|| EventError::validation(RSVP_NAME_REQUIRED))?;

    let event = &mut events[index];
    event.rsvps.push(name);
    Ok(event.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(id: i64, name: &str) -> Event {
        Event::new(
            EventId::new(id),
            EventDraft::new(name, "2024-01-01", "desc").validate().unwrap(),
        )
    }

    fn draft(name: &str) -> EventDraft {
        EventDraft::new(name, "2024-01-01", "d")
    }

    #[test]
    fn test_find_by_id_accepts_text_and_numbers() {
        let events = vec![event(1, "a"), event(2, "b")];

        assert_eq!(find_by_id(&events, 2).map(|e| e.name.as_str()), Some("b"));
        assert_eq!(find_by_id(&events, "2").map(|e| e.name.as_str()), Some("b"));
        assert_eq!(find_by_id(&events, "2.0").map(|e| e.name.as_str()), Some("b"));
        assert!(find_by_id(&events, "3").is_none());
        assert!(find_by_id(&events, "two").is_none());
    }

    #[test]
    fn test_find_by_id_returns_first_duplicate() {
        let events = vec![event(1, "first"), event(1, "second")];
        assert_eq!(find_by_id(&events, 1).unwrap().name, "first");
    }

    #[test]
    fn test_create_on_empty_collection_assigns_one() {
        let mut events = Vec::new();
        let created = create(&mut events, draft("A"), IdAssignment::Legacy).unwrap();

        assert_eq!(created.id, EventId::new(1));
        assert!(created.rsvps.is_empty());
        assert_eq!(events, vec![created]);
    }

    #[test]
    fn test_legacy_create_on_single_event_restarts_at_one() {
        // Known collision: one stored event means the next id is 1 again.
        let mut events = vec![event(1, "A")];
        let created = create(&mut events, draft("B"), IdAssignment::Legacy).unwrap();

        assert_eq!(created.id, EventId::new(1));
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].id, events[1].id);
    }

    #[test]
    fn test_legacy_create_uses_last_id_with_two_or_more() {
        let mut events = vec![event(1, "A"), event(5, "B"), event(3, "C")];
        let created = create(&mut events, draft("D"), IdAssignment::Legacy).unwrap();

        assert_eq!(created.id, EventId::new(4));
    }

    #[test]
    fn test_max_plus_one_never_reuses_ids() {
        let mut events = Vec::new();
        for name in ["A", "B", "C"] {
            create(&mut events, draft(name), IdAssignment::MaxPlusOne).unwrap();
        }
        let ids: Vec<i64> = events.iter().map(|e| e.id.get()).collect();
        assert_eq!(ids, vec![1, 2, 3]);

        let mut events = vec![event(1, "A"), event(5, "B"), event(3, "C")];
        let created = create(&mut events, draft("D"), IdAssignment::MaxPlusOne).unwrap();
        assert_eq!(created.id, EventId::new(6));
    }

    #[test]
    fn test_create_rejects_missing_fields() {
        let mut events = vec![event(1, "A")];
        let err = create(&mut events, EventDraft::default(), IdAssignment::Legacy).unwrap_err();

        assert!(matches!(err, EventError::Validation { .. }));
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn test_update_overwrites_fields_only() {
        let mut events = vec![event(1, "A"), event(2, "B")];
        events[1].rsvps.push("Ana".into());

        let updated = update(&mut events, "2", EventDraft::new("B2", "2025-02-02", "new")).unwrap();

        assert_eq!(updated.id, EventId::new(2));
        assert_eq!(updated.name, "B2");
        assert_eq!(updated.date, "2025-02-02");
        assert_eq!(updated.description, "new");
        assert_eq!(updated.rsvps, vec!["Ana".to_string()]);
        assert_eq!(events[1], updated);
    }

    #[test]
    fn test_update_missing_id_leaves_collection_unchanged() {
        let mut events = vec![event(1, "A")];
        let before = events.clone();

        let err = update(&mut events, 9, draft("Z")).unwrap_err();

        assert!(matches!(err, EventError::NotFound { ref id } if id == "9"));
        assert_eq!(events, before);
    }

    #[test]
    fn test_update_checks_existence_before_fields() {
        let mut events = vec![event(1, "A")];
        let err = update(&mut events, 9, EventDraft::default()).unwrap_err();
        assert!(matches!(err, EventError::NotFound { .. }));

        let err = update(&mut events, 1, EventDraft::default()).unwrap_err();
        assert!(matches!(err, EventError::Validation { .. }));
        assert_eq!(events[0].name, "A");
    }

    #[test]
    fn test_remove_returns_event_and_shrinks_by_one() {
        let mut events = vec![event(1, "A"), event(2, "B"), event(3, "C")];

        let removed = remove(&mut events, "2").unwrap();

        assert_eq!(removed.name, "B");
        assert_eq!(events.len(), 2);
        assert!(find_by_id(&events, 2).is_none());
    }

    #[test]
    fn test_remove_missing_id() {
        let mut events = vec![event(1, "A")];
        assert!(matches!(
            remove(&mut events, 4),
            Err(EventError::NotFound { .. })
        ));
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn test_add_rsvp_initializes_absent_list() {
        let mut events: Vec<Event> = serde_json::from_str(
            r#"[{"id": 1, "name": "A", "date": "2024-01-01", "description": "d"}]"#,
        )
        .unwrap();

        let updated = add_rsvp(&mut events, "1", Some("Ana".into())).unwrap();

        assert_eq!(updated.rsvps, vec!["Ana".to_string()]);
        assert_eq!(events[0].rsvps, vec!["Ana".to_string()]);
    }

    #[test]
    fn test_add_rsvp_appends_in_order() {
        let mut events = vec![event(1, "A")];
        add_rsvp(&mut events, 1, Some("Ana".into())).unwrap();
        add_rsvp(&mut events, 1, Some("Bo".into())).unwrap();

        assert_eq!(events[0].rsvps, vec!["Ana".to_string(), "Bo".to_string()]);
    }

    #[test]
    fn test_add_rsvp_errors() {
        let mut events = vec![event(1, "A")];

        assert!(matches!(
            add_rsvp(&mut events, 2, Some("Ana".into())),
            Err(EventError::NotFound { .. })
        ));
        assert!(matches!(
            add_rsvp(&mut events, 1, Some(String::new())),
            Err(EventError::Validation { .. })
        ));
        assert!(matches!(
            add_rsvp(&mut events, 1, None),
            Err(EventError::Validation { .. })
        ));
        assert!(events[0].rsvps.is_empty());
    }
}
