use serde::{Deserialize, Serialize};

use super::RoomId;

/// Room metadata the panel passes through to the composer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    pub room_id: RoomId,
    pub name: String,
}

impl Room {
    pub fn new(room_id: RoomId, name: impl Into<String>) -> Self {
        Self {
            room_id,
            name: name.into(),
        }
    }

    /// Display name, falling back to the room id when unnamed.
    pub fn display_name(&self) -> &str {
        if self.name.trim().is_empty() {
            self.room_id.as_str()
        } else {
            &self.name
        }
    }
}
