//! Interactive thread panel.

use std::path::Path;
use std::rc::Rc;

use anyhow::{Context, Result};
use skein_core::client::MemoryClient;
use skein_core::config::Config;
use skein_core::model::{ChatEvent, EventId, RoomId};

pub fn run(
    config: &Config,
    fixture: Option<&Path>,
    room: Option<&str>,
    event: Option<&str>,
) -> Result<()> {
    let client = super::load_client(config, fixture)?;
    let source = pick_source(&client, room, event)?;
    tracing::info!(room = %source.room_id, event = %source.event_id, "opening thread view");

    skein_tui::run_thread_view(config, Rc::new(client), source).context("thread view failed")
}

/// Resolves the event the panel opens on.
fn pick_source(client: &MemoryClient, room: Option<&str>, event: Option<&str>) -> Result<ChatEvent> {
    let room_id = match room {
        Some(id) => {
            let room_id = RoomId::new(id);
            anyhow::ensure!(
                client.room_ids().contains(&room_id),
                "Room '{id}' not found"
            );
            room_id
        }
        None => match event {
            // without --room, search every room for the event
            Some(id) => {
                let event_id = EventId::new(id);
                client
                    .room_ids()
                    .into_iter()
                    .find(|room_id| client.event(room_id, &event_id).is_some())
                    .with_context(|| format!("Event '{id}' not found in any room"))?
            }
            None => client
                .room_ids()
                .into_iter()
                .next()
                .context("Fixture has no rooms")?,
        },
    };

    match event {
        Some(id) => client
            .event(&room_id, &EventId::new(id))
            .with_context(|| format!("Event '{id}' not found in room '{room_id}'")),
        None => client
            .thread_roots(&room_id)
            .into_iter()
            .next()
            .or_else(|| client.room_events(&room_id).into_iter().next())
            .with_context(|| format!("Room '{room_id}' has no events")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_source_is_first_thread_root() {
        let client = MemoryClient::demo().unwrap();
        let source = pick_source(&client, None, None).unwrap();
        assert_eq!(source.event_id, EventId::new("$kickoff"));
    }

    #[test]
    fn test_event_without_room_searches_all_rooms() {
        let client = MemoryClient::demo().unwrap();
        let source = pick_source(&client, None, Some("$icons")).unwrap();
        assert_eq!(source.room_id, RoomId::new("!design:example.org"));
    }

    #[test]
    fn test_unknown_room_is_error() {
        let client = MemoryClient::demo().unwrap();
        let err = pick_source(&client, Some("!nope:example.org"), None).unwrap_err();
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn test_unknown_event_is_error() {
        let client = MemoryClient::demo().unwrap();
        let err = pick_source(&client, None, Some("$missing")).unwrap_err();
        assert!(err.to_string().contains("$missing"));
    }
}
