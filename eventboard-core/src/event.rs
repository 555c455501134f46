//! Event records and client-submitted event input.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::error::{EventError, EventResult};
use crate::id::EventId;

/// A stored event.
///
/// Field order here is the field order in the saved document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    /// Free text, never parsed.
    #[serde(default, deserialize_with = "null_as_default")]
    pub date: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    /// Attendee names in the order they responded.
    /// Legacy records without the field load as empty.
    #[serde(default, deserialize_with = "null_as_default")]
    pub rsvps: Vec<String>,

    /// Fields we don't model, kept so hand edits survive a rewrite.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Event {
    pub fn new(id: EventId, fields: EventFields) -> Self {
        Event {
            id,
            name: fields.name,
            date: fields.date,
            description: fields.description,
            rsvps: Vec::new(),
            extra: Map::new(),
        }
    }

    /// Overwrite the editable fields, leaving id and RSVPs alone.
    pub fn apply(&mut self, fields: EventFields) {
        self.name = fields.name;
        self.date = fields.date;
        self.description = fields.description;
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Event fields as submitted by a client, before validation.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct EventDraft {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Validated event fields: all three present and non-empty.
#[derive(Debug, Clone, PartialEq)]
pub struct EventFields {
    pub name: String,
    pub date: String,
    pub description: String,
}

const FIELDS_REQUIRED: &str = "Name, date, and description are required";

impl EventDraft {
    pub fn new(
        name: impl Into<String>,
        date: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        EventDraft {
            name: Some(name.into()),
            date: Some(date.into()),
            description: Some(description.into()),
        }
    }

    /// Names of the fields that are absent or empty.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("name", &self.name),
            ("date", &self.date),
            ("description", &self.description),
        ]
        .into_iter()
        .filter(|(_, value)| !is_present(value.as_deref()))
        .map(|(field, _)| field)
        .collect()
    }

    pub fn validate(self) -> EventResult<EventFields> {
        if !self.missing_fields().is_empty() {
            return Err(EventError::validation(FIELDS_REQUIRED));
        }

        Ok(EventFields {
            name: self.name.unwrap_or_default(),
            date: self.date.unwrap_or_default(),
            description: self.description.unwrap_or_default(),
        })
    }
}

/// Whitespace counts as present; only absent or `""` is missing.
fn is_present(value: Option<&str>) -> bool {
    value.is_some_and(|v| !v.is_empty())
}
