//! Permalinks to rooms and events (matrix.to style).

use anyhow::{Context, Result};
use url::Url;

use crate::model::{EventId, RoomId};

pub const DEFAULT_PERMALINK_BASE: &str = "https://matrix.to";

/// Builds shareable links scoped to one room.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermalinkCreator {
    base: Url,
    room_id: RoomId,
}

impl PermalinkCreator {
    /// # Errors
    /// Returns an error if `base` is not an absolute URL.
    pub fn new(base: &str, room_id: RoomId) -> Result<Self> {
        let base = Url::parse(base).with_context(|| format!("Invalid permalink base: {base}"))?;
        Ok(Self { base, room_id })
    }

    pub fn room_id(&self) -> &RoomId {
        &self.room_id
    }

    pub fn for_room(&self) -> String {
        self.with_fragment(&format!("/{}", self.room_id))
    }

    pub fn for_event(&self, event_id: &EventId) -> String {
        self.with_fragment(&format!("/{}/{}", self.room_id, event_id))
    }

    fn with_fragment(&self, fragment: &str) -> String {
        let mut url = self.base.clone();
        url.set_fragment(Some(fragment));
        url.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn creator() -> PermalinkCreator {
        PermalinkCreator::new(DEFAULT_PERMALINK_BASE, RoomId::new("!abc:example.org")).unwrap()
    }

    #[test]
    fn test_room_link() {
        assert_eq!(creator().for_room(), "https://matrix.to/#/!abc:example.org");
    }

    #[test]
    fn test_event_link() {
        let link = creator().for_event(&EventId::new("$ev1"));
        assert_eq!(link, "https://matrix.to/#/!abc:example.org/$ev1");
    }

    #[test]
    fn test_custom_base() {
        let creator =
            PermalinkCreator::new("https://chat.example.org/", RoomId::new("!r:x")).unwrap();
        assert_eq!(creator.for_room(), "https://chat.example.org/#/!r:x");
    }

    #[test]
    fn test_rejects_relative_base() {
        assert!(PermalinkCreator::new("not a url", RoomId::new("!r:x")).is_err());
    }
}
