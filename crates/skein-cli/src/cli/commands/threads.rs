//! Non-interactive thread listing.

use std::path::Path;

use anyhow::Result;
use skein_core::config::Config;
use skein_tui::common::text::{single_line, truncate_with_ellipsis};

const BODY_WIDTH: usize = 48;

pub fn list(config: &Config, fixture: Option<&Path>) -> Result<()> {
    let client = super::load_client(config, fixture)?;

    let rooms = client.rooms();
    if rooms.is_empty() {
        println!("No rooms found.");
        return Ok(());
    }

    for room in rooms {
        println!("{}  {}", room.display_name(), room.room_id);

        let roots = client.thread_roots(&room.room_id);
        if roots.is_empty() {
            println!("  (no threads)");
            continue;
        }

        for root in roots {
            let Some(thread) = client.thread(&room.room_id, &root.event_id) else {
                continue;
            };
            let status = if thread.is_ready() {
                format!("{} replies", thread.timeline().len())
            } else {
                "pending".to_string()
            };
            println!(
                "  {}  {}  {}  {}",
                root.event_id,
                status,
                root.sender,
                truncate_with_ellipsis(&single_line(&root.body), BODY_WIDTH)
            );
        }
    }

    Ok(())
}
