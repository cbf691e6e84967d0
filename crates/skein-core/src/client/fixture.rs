//! JSON fixture format for the in-memory client.
//!
//! ```json
//! {
//!   "rooms": [{
//!     "room_id": "!dev:example.org",
//!     "name": "dev",
//!     "events": [{ "event_id": "$root", "sender": "@a:x", "body": "hi", "ts": "2024-05-01T10:00:00Z" }],
//!     "threads": [{ "root": "$root", "ready_after_ms": 800, "replies": [] }]
//!   }]
//! }
//! ```

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{ChatEvent, EventId, RoomId};

/// Bundled fixture used when no other fixture is configured.
pub const DEMO_FIXTURE: &str = include_str!("demo.json");

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Fixture {
    #[serde(default)]
    pub rooms: Vec<FixtureRoom>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixtureRoom {
    pub room_id: RoomId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub events: Vec<FixtureEvent>,
    #[serde(default)]
    pub threads: Vec<FixtureThread>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixtureEvent {
    pub event_id: EventId,
    pub sender: String,
    pub body: String,
    pub ts: DateTime<Utc>,
}

impl FixtureEvent {
    pub fn into_event(self, room_id: &RoomId) -> ChatEvent {
        ChatEvent::new(self.event_id, room_id.clone(), self.sender, self.body).at(self.ts)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixtureThread {
    /// Id of an event in the room's `events` list.
    pub root: EventId,
    #[serde(default)]
    pub replies: Vec<FixtureEvent>,
    /// When set, replies are withheld until this much time has elapsed and
    /// the thread then announces `ready`. Otherwise it is loaded up front.
    #[serde(default)]
    pub ready_after_ms: Option<u64>,
}

impl Fixture {
    /// # Errors
    /// Returns an error if the JSON does not match the fixture format.
    pub fn parse(contents: &str) -> Result<Self> {
        serde_json::from_str(contents).context("Failed to parse fixture")
    }

    /// # Errors
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read fixture {}", path.display()))?;
        Self::parse(&contents).with_context(|| format!("Invalid fixture {}", path.display()))
    }

    /// # Errors
    /// Never fails for the bundled fixture; kept fallible like `parse`.
    pub fn demo() -> Result<Self> {
        Self::parse(DEMO_FIXTURE)
    }
}
