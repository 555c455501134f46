//! Event ids and the single place where client-supplied ids are normalized.
//!
//! Ids are stored as JSON numbers, but they arrive from path segments and
//! form fields as text. Every lookup goes through [`AsEventId`], so `"7"`,
//! `" 7 "`, `"7.0"` and `7` all address the same event.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, de};

/// Integer id of an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct EventId(i64);

impl EventId {
    pub const FIRST: EventId = EventId(1);

    pub fn new(value: i64) -> Self {
        EventId(value)
    }

    pub fn get(self) -> i64 {
        self.0
    }

    pub fn next(self) -> EventId {
        EventId(self.0.saturating_add(1))
    }

    fn from_f64(value: f64) -> Option<EventId> {
        let in_range = value >= i64::MIN as f64 && value <= i64::MAX as f64;
        (value.is_finite() && value.fract() == 0.0 && in_range).then(|| EventId(value as i64))
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// Hand-edited documents sometimes carry ids as "3" or 3.0.
impl<'de> Deserialize<'de> for EventId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Int(i64),
            Float(f64),
            Text(String),
        }

        let id = match RawId::deserialize(deserializer)? {
            RawId::Int(n) => Some(EventId(n)),
            RawId::Float(f) => EventId::from_f64(f),
            RawId::Text(s) => s.as_event_id(),
        };

        id.ok_or_else(|| de::Error::custom("event id must be an integer"))
    }
}

/// Anything that can address an event.
///
/// Returns `None` when the value can never match a stored id, which callers
/// report as "not found".
pub trait AsEventId {
    fn as_event_id(&self) -> Option<EventId>;
}

impl AsEventId for EventId {
    fn as_event_id(&self) -> Option<EventId> {
        Some(*self)
    }
}

impl AsEventId for i64 {
    fn as_event_id(&self) -> Option<EventId> {
        Some(EventId(*self))
    }
}

impl AsEventId for i32 {
    fn as_event_id(&self) -> Option<EventId> {
        Some(EventId(i64::from(*self)))
    }
}

impl AsEventId for u32 {
    fn as_event_id(&self) -> Option<EventId> {
        Some(EventId(i64::from(*self)))
    }
}

impl AsEventId for u64 {
    fn as_event_id(&self) -> Option<EventId> {
        i64::try_from(*self).ok().map(EventId)
    }
}

impl AsEventId for str {
    fn as_event_id(&self) -> Option<EventId> {
        let trimmed = self.trim();
        if let Ok(n) = trimmed.parse::<i64>() {
            return Some(EventId(n));
        }
        trimmed.parse::<f64>().ok().and_then(EventId::from_f64)
    }
}

impl AsEventId for String {
    fn as_event_id(&self) -> Option<EventId> {
        self.as_str().as_event_id()
    }
}

impl<T: AsEventId + ?Sized> AsEventId for &T {
    fn as_event_id(&self) -> Option<EventId> {
        (**self).as_event_id()
    }
}
