//! Actions carried by the application dispatcher.

use std::fmt;

use crate::model::{ChatEvent, RoomId};

/// Phases of the right-hand panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RightPanelPhase {
    RoomSummary,
    RoomMemberList,
    FilePanel,
    NotificationPanel,
    ThreadPanel,
    ThreadView,
}

impl RightPanelPhase {
    pub fn label(self) -> &'static str {
        match self {
            RightPanelPhase::RoomSummary => "Room info",
            RightPanelPhase::RoomMemberList => "People",
            RightPanelPhase::FilePanel => "Files",
            RightPanelPhase::NotificationPanel => "Notifications",
            RightPanelPhase::ThreadPanel => "Threads",
            RightPanelPhase::ThreadView => "Thread",
        }
    }
}

impl fmt::Display for RightPanelPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Request to switch the right panel, optionally anchored at an event.
#[derive(Debug, Clone)]
pub struct NavigationCommand {
    pub phase: RightPanelPhase,
    pub event: Option<ChatEvent>,
}

impl NavigationCommand {
    pub fn new(phase: RightPanelPhase, event: Option<ChatEvent>) -> Self {
        Self { phase, event }
    }

    /// Shorthand for "show the thread rooted at `event`".
    pub fn thread_view(event: ChatEvent) -> Self {
        Self::new(RightPanelPhase::ThreadView, Some(event))
    }
}

/// Everything that travels over the dispatcher.
#[derive(Debug, Clone)]
pub enum Action {
    /// Switch the right panel phase.
    SetRightPanelPhase(NavigationCommand),
    /// Switch the main view to another room.
    ViewRoom { room_id: RoomId },
}

impl From<NavigationCommand> for Action {
    fn from(command: NavigationCommand) -> Self {
        Action::SetRightPanelPhase(command)
    }
}
