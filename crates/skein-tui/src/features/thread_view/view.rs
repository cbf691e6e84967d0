//! Panel view model.
//!
//! `panel_view` projects the panel state into plain props for the card frame,
//! the root tile, the message list and the composer. It never mutates state;
//! `render` turns the props into widgets.

use skein_core::actions::RightPanelPhase;
use skein_core::model::{ChatEvent, RoomId, Thread};
use skein_core::permalinks::PermalinkCreator;

use super::state::ThreadViewState;

pub const PANEL_TITLE: &str = "Thread";
pub const EMPTY_TIMELINE_PLACEHOLDER: &str = "No replies yet";

/// How an event tile is laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TileShape {
    /// Notification-style tile: gutter timestamp, sender header, body.
    Notif,
    /// Compact two-row tile used for previews.
    FileGrid,
}

/// Message list layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimelineLayout {
    /// Consecutive messages from one sender share a header.
    Group,
}

/// Card frame around the panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseCardProps {
    pub title: &'static str,
    pub previous_phase: RightPanelPhase,
    /// The message list scrolls itself; the card adds no scroll container.
    pub with_scroll_container: bool,
    pub close_hint: String,
}

#[derive(Debug, Clone)]
pub struct EventTileProps {
    pub event: ChatEvent,
    pub tile_shape: TileShape,
    pub show_read_receipts: bool,
    pub enable_flair: bool,
    pub permalink: Option<String>,
}

#[derive(Debug, Clone)]
pub struct TimelinePanelProps {
    pub events: Vec<ChatEvent>,
    pub manage_read_receipts: bool,
    pub manage_read_markers: bool,
    pub show_url_preview: bool,
    pub tile_shape: TileShape,
    pub always_show_timestamps: bool,
    pub layout: TimelineLayout,
    pub hide_threaded_messages: bool,
    /// Shown instead of the list when there are no events.
    pub empty: &'static str,
    pub scroll_offset: usize,
}

#[derive(Debug, Clone)]
pub struct ComposerProps {
    pub room_id: Option<RoomId>,
    pub room_name: Option<String>,
    pub reply_to: Option<ChatEvent>,
    pub show_reply_preview: bool,
    pub compact: bool,
    pub permalinks: Option<PermalinkCreator>,
}

/// Everything the renderer needs for one frame.
#[derive(Debug, Clone)]
pub struct PanelView {
    pub card: BaseCardProps,
    /// Present only while a thread is bound.
    pub root: Option<EventTileProps>,
    /// Present only while a thread is bound.
    pub timeline: Option<TimelinePanelProps>,
    pub composer: ComposerProps,
}

pub fn panel_view(state: &ThreadViewState, close_hint: &str) -> PanelView {
    let thread = state.current_thread.as_ref();
    PanelView {
        card: BaseCardProps {
            title: PANEL_TITLE,
            previous_phase: RightPanelPhase::RoomSummary,
            with_scroll_container: false,
            close_hint: close_hint.to_string(),
        },
        root: thread.map(|t| root_tile(t, state.permalinks.as_ref())),
        timeline: thread.map(|t| timeline_props(t, state)),
        composer: composer_props(state, thread),
    }
}

/// Single-tile renderer props, for previewing one event in isolation.
pub fn event_tile(event: &ChatEvent, permalinks: Option<&PermalinkCreator>) -> EventTileProps {
    EventTileProps {
        event: event.clone(),
        tile_shape: TileShape::FileGrid,
        show_read_receipts: false,
        enable_flair: false,
        permalink: permalinks.map(|p| p.for_event(&event.event_id)),
    }
}

fn root_tile(thread: &Thread, permalinks: Option<&PermalinkCreator>) -> EventTileProps {
    event_tile(thread.root(), permalinks)
}

fn timeline_props(thread: &Thread, state: &ThreadViewState) -> TimelinePanelProps {
    TimelinePanelProps {
        events: thread.timeline().events().to_vec(),
        manage_read_receipts: false,
        manage_read_markers: false,
        show_url_preview: false,
        tile_shape: TileShape::Notif,
        always_show_timestamps: true,
        layout: TimelineLayout::Group,
        hide_threaded_messages: false,
        empty: EMPTY_TIMELINE_PLACEHOLDER,
        scroll_offset: state.scroll_offset,
    }
}

fn composer_props(state: &ThreadViewState, thread: Option<&Thread>) -> ComposerProps {
    ComposerProps {
        room_id: state.room.as_ref().map(|r| r.room_id.clone()),
        room_name: state.room.as_ref().map(|r| r.display_name().to_string()),
        reply_to: thread.and_then(Thread::reply_to),
        show_reply_preview: false,
        compact: true,
        permalinks: state.permalinks.clone(),
    }
}
