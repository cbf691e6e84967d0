//! Thread panel state.

use std::mem;

use skein_core::model::{ChatEvent, Room, Thread};
use skein_core::permalinks::PermalinkCreator;

use super::binding::BindingId;
use crate::common::ResizeNotifier;

/// State owned by the thread panel for its whole lifetime.
#[derive(Debug, Default)]
pub struct ThreadViewState {
    /// Event the panel is configured to show. Commands and source changes
    /// compare against this to decide whether to rebind.
    pub source: Option<ChatEvent>,

    /// Thread handle the panel currently renders. Replaced, never merged.
    pub current_thread: Option<Thread>,

    /// Subscription whose signals the reducer accepts.
    pub live_binding: Option<BindingId>,

    pub room: Option<Room>,
    pub permalinks: Option<PermalinkCreator>,
    pub resize: ResizeNotifier,

    /// Rows scrolled up from the bottom of the message list.
    pub scroll_offset: usize,

    render_requested: bool,
    render_count: u64,
}

impl ThreadViewState {
    pub fn new(
        source: Option<ChatEvent>,
        room: Option<Room>,
        permalinks: Option<PermalinkCreator>,
    ) -> Self {
        Self {
            source,
            room,
            permalinks,
            ..Self::default()
        }
    }

    pub fn is_bound(&self) -> bool {
        self.current_thread.is_some()
    }

    /// Clears the bound thread and stops accepting its signals.
    pub fn clear_thread(&mut self) {
        self.current_thread = None;
        self.live_binding = None;
        self.scroll_offset = 0;
        self.request_render();
    }

    pub fn request_render(&mut self) {
        self.render_requested = true;
        self.render_count += 1;
    }

    /// Returns whether a render was requested since the last call.
    pub fn take_render_request(&mut self) -> bool {
        mem::take(&mut self.render_requested)
    }

    /// Total number of render requests, for tests and diagnostics.
    pub fn render_count(&self) -> u64 {
        self.render_count
    }

    /// Records the panel size. A change resets the message list to the
    /// bottom, since wrapped rows no longer line up with the old offset.
    pub fn observe_resize(&mut self, width: u16, height: u16) -> bool {
        if !self.resize.observe(width, height) {
            return false;
        }
        self.scroll_offset = 0;
        tracing::trace!(width, height, generation = self.resize.generation(), "panel resized");
        self.request_render();
        true
    }

    pub fn scroll_up(&mut self, rows: usize) {
        self.scroll_offset = self.scroll_offset.saturating_add(rows);
    }

    pub fn scroll_down(&mut self, rows: usize) {
        self.scroll_offset = self.scroll_offset.saturating_sub(rows);
    }
}
