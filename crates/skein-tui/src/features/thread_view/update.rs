//! Thread panel reducer.

use skein_core::model::{ChatEvent, ThreadUpdate};

use super::state::ThreadViewState;
use crate::effects::UiEffect;
use crate::events::ThreadUiEvent;

/// Applies a thread update to the panel.
///
/// `NewHandle` replaces the current thread outright. `RefreshOnly` keeps the
/// handle and only asks for a render, since the renderer re-reads the
/// timeline and reply-to pointer off the handle anyway.
pub fn apply(state: &mut ThreadViewState, update: ThreadUpdate) {
    if let ThreadUpdate::NewHandle(thread) = update {
        state.current_thread = Some(thread);
    }
    state.request_render();
}

pub fn handle_thread_event(state: &mut ThreadViewState, event: ThreadUiEvent) -> Vec<UiEffect> {
    match event {
        ThreadUiEvent::Signal {
            binding,
            signal,
            update,
        } => {
            if state.live_binding != Some(binding) {
                tracing::trace!(%binding, %signal, "dropping signal from released subscription");
                return vec![];
            }
            tracing::trace!(%binding, %signal, "thread signal");
            apply(state, update);
            vec![]
        }
    }
}

/// Handles the host changing the panel's source event.
pub fn handle_source_changed(state: &mut ThreadViewState, source: &ChatEvent) -> Vec<UiEffect> {
    retarget(state, source)
}

/// Points the panel at `event`, unless it is already configured for it.
pub(super) fn retarget(state: &mut ThreadViewState, event: &ChatEvent) -> Vec<UiEffect> {
    if state
        .source
        .as_ref()
        .is_some_and(|current| current.is_same_event(event))
    {
        tracing::trace!(event = %event.event_id, "panel already targets event");
        return vec![];
    }
    tracing::debug!(event = %event.event_id, "retargeting thread panel");
    state.source = Some(event.clone());
    vec![UiEffect::RebindThread {
        source: event.clone(),
    }]
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;
    use std::time::Duration;

    use skein_core::client::{MemoryClient, ThreadLookup};
    use skein_core::model::{EventId, RoomId, Thread, ThreadSignal};
    use tokio::sync::mpsc;

    use super::*;
    use crate::events::UiEvent;
    use crate::thread_view::ThreadBindingController;

    fn event(id: &str) -> ChatEvent {
        ChatEvent::new(EventId::new(id), RoomId::new("!r:x"), "@a:x", id)
    }

    #[test]
    fn test_new_handle_replaces_thread() {
        let mut state = ThreadViewState::default();
        let a = Thread::new(event("$a"));
        let b = Thread::new(event("$b"));

        apply(&mut state, ThreadUpdate::NewHandle(a));
        apply(&mut state, ThreadUpdate::NewHandle(b.clone()));

        assert!(state.current_thread.unwrap().ptr_eq(&b));
    }

    #[test]
    fn test_refresh_only_keeps_thread_and_requests_render() {
        let mut state = ThreadViewState::default();
        let a = Thread::new(event("$a"));
        apply(&mut state, ThreadUpdate::NewHandle(a.clone()));
        state.take_render_request();
        let before = state.render_count();

        apply(&mut state, ThreadUpdate::RefreshOnly);

        assert!(state.current_thread.as_ref().unwrap().ptr_eq(&a));
        assert!(state.take_render_request());
        assert_eq!(state.render_count(), before + 1);
    }

    #[test]
    fn test_bare_ready_is_refresh_only() {
        let client = Rc::new(MemoryClient::new());
        let thread = client.add_thread(event("$a"), Vec::new(), Some(Duration::MAX));
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut controller =
            ThreadBindingController::new(Rc::clone(&client) as Rc<dyn ThreadLookup>, tx);
        let mut state = ThreadViewState::default();
        controller.bind(&mut state, &event("$a"));

        thread.emit(ThreadSignal::Ready, None);

        let Ok(UiEvent::Thread(signal)) = rx.try_recv() else {
            panic!("expected a forwarded signal");
        };
        assert!(matches!(
            signal,
            ThreadUiEvent::Signal {
                update: ThreadUpdate::RefreshOnly,
                ..
            }
        ));
        handle_thread_event(&mut state, signal);
        assert!(state.current_thread.unwrap().ptr_eq(&thread));
    }

    #[test]
    fn test_stale_binding_signal_is_dropped() {
        let client = Rc::new(MemoryClient::new());
        let a = client.add_thread(event("$a"), Vec::new(), None);
        let b = client.add_thread(event("$b"), Vec::new(), None);
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut controller =
            ThreadBindingController::new(Rc::clone(&client) as Rc<dyn ThreadLookup>, tx);
        let mut state = ThreadViewState::default();

        controller.bind(&mut state, &event("$a"));
        a.emit(ThreadSignal::Update, Some(a.clone()));
        // Signal from A is still queued when the panel moves to B.
        controller.rebind(&mut state, &event("$b"));

        let Ok(UiEvent::Thread(stale)) = rx.try_recv() else {
            panic!("expected the queued signal");
        };
        handle_thread_event(&mut state, stale);

        assert!(state.current_thread.unwrap().ptr_eq(&b));
    }

    #[test]
    fn test_source_change_to_same_event_is_noop() {
        let mut state = ThreadViewState::new(Some(event("$a")), None, None);
        assert!(handle_source_changed(&mut state, &event("$a")).is_empty());

        let effects = handle_source_changed(&mut state, &event("$b"));
        assert!(matches!(
            effects.as_slice(),
            [UiEffect::RebindThread { source }] if source.event_id == EventId::new("$b")
        ));
    }
}
