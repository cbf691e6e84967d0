//! Panel session: everything the runtime owns except the terminal.
//!
//! Holds the state, the binding controller, the dispatcher registration and
//! the inbox, and executes the reducer's effects against the client. Kept
//! separate from [`super::TuiRuntime`] so the whole lifecycle can be driven
//! without a TTY.

use std::fmt;
use std::rc::Rc;
use std::time::Duration;

use anyhow::Result;
use skein_core::actions::{Action, NavigationCommand};
use skein_core::client::{MemoryClient, RoomLookup, ThreadLookup};
use skein_core::config::Config;
use skein_core::dispatcher::Dispatcher;
use skein_core::model::{ChatEvent, EventId};
use skein_core::permalinks::PermalinkCreator;

use super::inbox::{self, UiEventReceiver, UiEventSender};
use crate::effects::{Step, UiEffect};
use crate::events::{ComposerUiEvent, UiEvent};
use crate::state::AppState;
use crate::thread_view::{CommandRegistration, ThreadBindingController, ThreadViewState};
use crate::update;

/// Upper bound on inbox drain rounds per `pump`, in case effects keep
/// feeding the inbox.
const MAX_PUMP_ROUNDS: usize = 64;

pub struct PanelSession {
    pub state: AppState,
    client: Rc<MemoryClient>,
    dispatcher: Rc<Dispatcher<Action>>,
    binding: ThreadBindingController,
    commands: Option<CommandRegistration>,
    inbox_tx: UiEventSender,
    inbox_rx: UiEventReceiver,
}

impl PanelSession {
    /// Creates an unmounted panel anchored at `source`.
    ///
    /// # Errors
    /// Returns an error if the configured permalink base is not a valid URL.
    pub fn new(
        config: Config,
        client: Rc<MemoryClient>,
        dispatcher: Rc<Dispatcher<Action>>,
        source: ChatEvent,
    ) -> Result<Self> {
        let room = client.room(&source.room_id);
        let permalinks = PermalinkCreator::new(&config.permalink_base, source.room_id.clone())?;
        let thread_view = ThreadViewState::new(Some(source), room, Some(permalinks));

        let (inbox_tx, inbox_rx) = inbox::channel();
        let lookup: Rc<dyn ThreadLookup> = Rc::clone(&client) as Rc<dyn ThreadLookup>;
        let binding = ThreadBindingController::new(lookup, inbox_tx.clone());

        Ok(Self {
            state: AppState::new(config, thread_view),
            client,
            dispatcher,
            binding,
            commands: None,
            inbox_tx,
            inbox_rx,
        })
    }

    /// Registers with the dispatcher and binds the initial thread.
    pub fn mount(&mut self) {
        if self.commands.is_some() {
            return;
        }
        self.commands = Some(CommandRegistration::register(
            &self.dispatcher,
            &self.inbox_tx,
        ));
        if let Some(source) = self.state.thread_view.source.clone() {
            self.binding.bind(&mut self.state.thread_view, &source);
        }
        tracing::info!(
            source = ?self.state.thread_view.source.as_ref().map(|e| &e.event_id),
            bound = self.binding.is_bound(),
            "thread panel mounted"
        );
    }

    /// Releases the thread subscription and the dispatcher registration.
    ///
    /// Anything already queued in the inbox is discarded, so a command
    /// forwarded before unmount cannot rebind the panel afterwards.
    pub fn unmount(&mut self) {
        let was_mounted = self.commands.take().is_some();
        self.binding.unbind(&mut self.state.thread_view);
        let mut discarded = 0;
        while self.inbox_rx.try_recv().is_ok() {
            discarded += 1;
        }
        if was_mounted {
            tracing::info!(discarded, "thread panel unmounted");
        }
    }

    pub fn is_mounted(&self) -> bool {
        self.commands.is_some()
    }

    /// Sender for pushing events from outside, e.g. a source change.
    pub fn inbox(&self) -> UiEventSender {
        self.inbox_tx.clone()
    }

    pub fn dispatcher(&self) -> &Rc<Dispatcher<Action>> {
        &self.dispatcher
    }

    pub fn client(&self) -> &Rc<MemoryClient> {
        &self.client
    }

    pub fn binding(&self) -> &ThreadBindingController {
        &self.binding
    }

    /// Lets the client hydrate threads whose load delay has passed.
    pub fn advance_clock(&mut self, elapsed: Duration) -> usize {
        self.client.hydrate_due(elapsed)
    }

    pub fn collect_inbox_events(&mut self, events: &mut Vec<UiEvent>) {
        while let Ok(event) = self.inbox_rx.try_recv() {
            events.push(event);
        }
    }

    /// Reduces one event and executes the resulting effects.
    pub fn dispatch_event(&mut self, event: UiEvent) {
        let effects = update::update(&mut self.state, event);
        self.execute_effects(effects);
    }

    /// Drains the inbox until it stays empty. Returns the number of events
    /// processed.
    pub fn pump(&mut self) -> usize {
        let mut processed = 0;
        for _ in 0..MAX_PUMP_ROUNDS {
            let mut events = Vec::new();
            self.collect_inbox_events(&mut events);
            if events.is_empty() {
                break;
            }
            processed += events.len();
            for event in events {
                self.dispatch_event(event);
            }
        }
        processed
    }

    fn execute_effects(&mut self, effects: Vec<UiEffect>) {
        for effect in effects {
            self.execute_effect(effect);
        }
    }

    fn execute_effect(&mut self, effect: UiEffect) {
        if !self.is_mounted()
            && matches!(
                effect,
                UiEffect::RebindThread { .. } | UiEffect::NavigateThread { .. }
            )
        {
            tracing::trace!(?effect, "panel unmounted, ignoring retarget");
            return;
        }
        match effect {
            UiEffect::Quit => {
                self.state.should_quit = true;
            }
            UiEffect::Close => {
                self.unmount();
                self.state.should_quit = true;
            }
            UiEffect::RebindThread { source } => {
                self.binding.rebind(&mut self.state.thread_view, &source);
            }
            UiEffect::DispatchAction(action) => {
                let delivered = self.dispatcher.dispatch(&action);
                tracing::trace!(?action, delivered, "action dispatched");
            }
            UiEffect::NavigateThread { step } => {
                if let Some(target) = self.neighbour_root(step) {
                    self.dispatcher
                        .dispatch(&Action::from(NavigationCommand::thread_view(target)));
                }
            }
            UiEffect::SendReply {
                room_id,
                thread_id,
                body,
            } => {
                let result =
                    self.client
                        .send_reply(&room_id, &thread_id, &self.state.config.user_id, &body);
                let event = match result {
                    Ok(sent) => ComposerUiEvent::ReplySent {
                        event_id: sent.event_id,
                    },
                    Err(err) => ComposerUiEvent::ReplyFailed {
                        error: format!("{err:#}"),
                    },
                };
                self.dispatch_event(UiEvent::Composer(event));
            }
        }
    }

    /// The thread root after (or before) the one the panel targets, wrapping
    /// around the room's list of roots.
    fn neighbour_root(&self, step: Step) -> Option<ChatEvent> {
        let source = self.state.thread_view.source.as_ref()?;
        let roots = self.client.thread_roots(&source.room_id);
        if roots.is_empty() {
            return None;
        }
        let current: &EventId = source.thread_root.as_ref().unwrap_or(&source.event_id);
        let index = roots.iter().position(|root| &root.event_id == current);
        let target = match (index, step) {
            (Some(i), Step::Next) => (i + 1) % roots.len(),
            (Some(i), Step::Previous) => (i + roots.len() - 1) % roots.len(),
            (None, Step::Next) => 0,
            (None, Step::Previous) => roots.len() - 1,
        };
        roots.into_iter().nth(target)
    }
}

impl Drop for PanelSession {
    fn drop(&mut self) {
        self.unmount();
    }
}

impl fmt::Debug for PanelSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PanelSession")
            .field("mounted", &self.is_mounted())
            .field("binding", &self.binding)
            .finish_non_exhaustive()
    }
}
