//! Command listener.
//!
//! The panel registers one handler on the application dispatcher while it is
//! mounted. The handler only forwards actions into the UI inbox; deciding
//! what an action means for the panel happens in the reducer
//! ([`handle_action`]).

use std::fmt;
use std::rc::Rc;

use skein_core::actions::{Action, RightPanelPhase};
use skein_core::dispatcher::{Dispatcher, DispatcherRef};

use super::state::ThreadViewState;
use super::update::retarget;
use crate::effects::UiEffect;
use crate::events::UiEvent;
use crate::runtime::inbox::UiEventSender;

/// Dispatcher registration held by a mounted panel. Unregisters on drop.
pub struct CommandRegistration {
    dispatcher: Rc<Dispatcher<Action>>,
    token: Option<DispatcherRef>,
}

impl CommandRegistration {
    pub fn register(dispatcher: &Rc<Dispatcher<Action>>, inbox: &UiEventSender) -> Self {
        let inbox = inbox.clone();
        let token = dispatcher.register(move |action: &Action| {
            if inbox.send(UiEvent::Action(action.clone())).is_err() {
                tracing::debug!("inbox closed, dropping action");
            }
        });
        tracing::debug!(%token, "thread panel registered with dispatcher");
        Self {
            dispatcher: Rc::clone(dispatcher),
            token: Some(token),
        }
    }

    pub fn token(&self) -> Option<DispatcherRef> {
        self.token
    }

    /// Returns `false` if already unregistered.
    pub fn unregister(&mut self) -> bool {
        let Some(token) = self.token.take() else {
            return false;
        };
        let removed = self.dispatcher.unregister(token);
        tracing::debug!(%token, removed, "thread panel unregistered from dispatcher");
        removed
    }
}

impl Drop for CommandRegistration {
    fn drop(&mut self) {
        self.unregister();
    }
}

impl fmt::Debug for CommandRegistration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandRegistration")
            .field("token", &self.token)
            .finish_non_exhaustive()
    }
}

/// Reacts to an action delivered by the dispatcher.
///
/// Only thread-view navigation carrying an event concerns the panel; a
/// command for the event already configured is a no-op.
pub fn handle_action(state: &mut ThreadViewState, action: &Action) -> Vec<UiEffect> {
    let Action::SetRightPanelPhase(command) = action else {
        tracing::trace!(?action, "ignoring unrelated action");
        return vec![];
    };
    if command.phase != RightPanelPhase::ThreadView {
        tracing::trace!(phase = %command.phase, "ignoring navigation to another phase");
        return vec![];
    }
    let Some(event) = &command.event else {
        tracing::trace!("ignoring thread navigation without an event");
        return vec![];
    };
    retarget(state, event)
}
