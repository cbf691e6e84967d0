use std::fmt;

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};

/// Identifier of a timeline event (e.g. `$abc123`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(String);

impl EventId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Creates a locally unique id for events sent from this client.
    pub fn generate() -> Self {
        Self(format!("$local-{}", uuid::Uuid::new_v4().simple()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier of a room (e.g. `!room:example.org`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomId(String);

impl RoomId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A message in a room timeline.
///
/// Events are compared by identity (`event_id`), never by content.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatEvent {
    pub event_id: EventId,
    pub room_id: RoomId,
    pub sender: String,
    pub body: String,
    pub origin_server_ts: DateTime<Utc>,
    /// Root of the thread this event replies in, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thread_root: Option<EventId>,
}

impl ChatEvent {
    pub fn new(
        event_id: EventId,
        room_id: RoomId,
        sender: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            event_id,
            room_id,
            sender: sender.into(),
            body: body.into(),
            origin_server_ts: Utc::now(),
            thread_root: None,
        }
    }

    /// Marks this event as a reply inside the thread rooted at `root`.
    #[must_use]
    pub fn in_thread(mut self, root: EventId) -> Self {
        self.thread_root = Some(root);
        self
    }

    #[must_use]
    pub fn at(mut self, ts: DateTime<Utc>) -> Self {
        self.origin_server_ts = ts;
        self
    }

    pub fn is_same_event(&self, other: &ChatEvent) -> bool {
        self.event_id == other.event_id
    }

    /// Local `HH:MM` rendering of the origin timestamp.
    pub fn short_time(&self) -> String {
        self.origin_server_ts
            .with_timezone(&Local)
            .format("%H:%M")
            .to_string()
    }
}
