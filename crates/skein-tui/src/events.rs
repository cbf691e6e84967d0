//! UI event types.
//!
//! Everything that can change the panel arrives as a `UiEvent`: terminal
//! input, dispatcher actions forwarded by the command listener, thread
//! signals forwarded by the live subscription, and results of effects the
//! runtime executed.

use crossterm::event::Event as CrosstermEvent;
use skein_core::actions::Action;
use skein_core::model::{ChatEvent, EventId, ThreadSignal, ThreadUpdate};

use crate::thread_view::BindingId;

/// Thread-related events.
#[derive(Debug, Clone)]
pub enum ThreadUiEvent {
    /// A signal fired on the handle a subscription is attached to.
    ///
    /// `binding` names the subscription that forwarded it; the reducer drops
    /// signals from any subscription other than the live one.
    Signal {
        binding: BindingId,
        signal: ThreadSignal,
        update: ThreadUpdate,
    },
}

/// Composer events.
#[derive(Debug, Clone)]
pub enum ComposerUiEvent {
    ReplySent { event_id: EventId },
    ReplyFailed { error: String },
}

/// Events processed by the reducer.
#[derive(Debug, Clone)]
pub enum UiEvent {
    /// Timer tick.
    Tick,

    /// Emitted once per loop iteration with the current terminal size.
    Frame { width: u16, height: u16 },

    /// Terminal input event (key, paste, resize).
    Terminal(CrosstermEvent),

    /// Action delivered by the application dispatcher.
    Action(Action),

    /// Thread subscription events.
    Thread(ThreadUiEvent),

    /// The host changed the panel's source event.
    SourceChanged(ChatEvent),

    /// Composer results.
    Composer(ComposerUiEvent),
}
