//! UI effect types.
//!
//! Effects are commands returned by the reducer that the runtime executes.
//! Binding a thread attaches listeners to an SDK object, so it is an effect
//! too: the reducer decides *when* to rebind, the runtime does it.

use skein_core::actions::Action;
use skein_core::model::{ChatEvent, EventId, RoomId};

/// Direction for stepping through thread roots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Next,
    Previous,
}

/// Effects returned by the reducer for the runtime to execute.
#[derive(Debug, Clone)]
pub enum UiEffect {
    /// Quit the application.
    Quit,

    /// The panel's close control was used.
    Close,

    /// Release the current thread and bind the one `source` belongs to.
    RebindThread { source: ChatEvent },

    /// Broadcast an action on the application dispatcher.
    DispatchAction(Action),

    /// Navigate to the neighbouring thread root in the panel's room.
    NavigateThread { step: Step },

    /// Post a reply into the bound thread.
    SendReply {
        room_id: RoomId,
        thread_id: EventId,
        body: String,
    },
}
