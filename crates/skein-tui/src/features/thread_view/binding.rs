//! Thread binding controller.
//!
//! Keeps exactly one live subscription, matching the panel's current target.
//!
//! A subscription attaches two listeners to a [`Thread`]: a persistent one
//! for `Update` and a one-shot one for `Ready`. Both forward into the UI
//! inbox tagged with the subscription's [`BindingId`], so the reducer can drop
//! signals that were queued before a rebind. Dropping the subscription
//! detaches both listeners from the handle they were registered on.

use std::fmt;
use std::rc::Rc;

use skein_core::client::ThreadLookup;
use skein_core::emitter::ListenerId;
use skein_core::model::{ChatEvent, Thread, ThreadSignal, ThreadUpdate};

use super::state::ThreadViewState;
use super::update;
use crate::events::{ThreadUiEvent, UiEvent};
use crate::runtime::inbox::UiEventSender;

/// Identifies one subscription for the lifetime of the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BindingId(u64);

impl fmt::Display for BindingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "binding-{}", self.0)
    }
}

/// Listener registrations on one thread handle.
///
/// Released on drop. Detaching from a handle that has since been disposed
/// is best-effort and never panics.
pub struct ThreadSubscription {
    binding: BindingId,
    thread: Thread,
    update_listener: ListenerId,
    ready_listener: ListenerId,
}

impl ThreadSubscription {
    /// Registers the `Update` and one-shot `Ready` listeners on `thread`.
    pub fn attach(thread: &Thread, binding: BindingId, inbox: &UiEventSender) -> Self {
        let update_listener = thread.on(
            ThreadSignal::Update,
            forwarder(binding, ThreadSignal::Update, inbox.clone()),
        );
        let ready_listener = thread.once(
            ThreadSignal::Ready,
            forwarder(binding, ThreadSignal::Ready, inbox.clone()),
        );
        tracing::debug!(%binding, thread = %thread.id(), "thread subscription attached");
        Self {
            binding,
            thread: thread.clone(),
            update_listener,
            ready_listener,
        }
    }

    pub fn binding(&self) -> BindingId {
        self.binding
    }

    pub fn thread(&self) -> &Thread {
        &self.thread
    }
}

impl Drop for ThreadSubscription {
    fn drop(&mut self) {
        let update_removed = self
            .thread
            .remove_listener(ThreadSignal::Update, self.update_listener);
        // The ready listener is gone already if `Ready` fired while attached.
        let ready_removed = self
            .thread
            .remove_listener(ThreadSignal::Ready, self.ready_listener);
        tracing::debug!(
            binding = %self.binding,
            thread = %self.thread.id(),
            update_removed,
            ready_removed,
            disposed = self.thread.is_disposed(),
            "thread subscription released"
        );
    }
}

impl fmt::Debug for ThreadSubscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ThreadSubscription")
            .field("binding", &self.binding)
            .field("thread", self.thread.id())
            .finish_non_exhaustive()
    }
}

fn forwarder(
    binding: BindingId,
    signal: ThreadSignal,
    inbox: UiEventSender,
) -> impl Fn(Option<Thread>) + 'static {
    move |payload| {
        let event = UiEvent::Thread(ThreadUiEvent::Signal {
            binding,
            signal,
            update: ThreadUpdate::from(payload),
        });
        if inbox.send(event).is_err() {
            tracing::debug!(%binding, %signal, "inbox closed, dropping thread signal");
        }
    }
}

/// Owns the subscribe/unsubscribe lifecycle for one thread at a time.
pub struct ThreadBindingController {
    lookup: Rc<dyn ThreadLookup>,
    inbox: UiEventSender,
    subscription: Option<ThreadSubscription>,
    next_binding: u64,
}

impl ThreadBindingController {
    pub fn new(lookup: Rc<dyn ThreadLookup>, inbox: UiEventSender) -> Self {
        Self {
            lookup,
            inbox,
            subscription: None,
            next_binding: 1,
        }
    }

    /// Resolves the thread for `source` and subscribes to it.
    ///
    /// Returns `false` when the event has no thread; the panel then stays
    /// unbound and shows its empty state. Any live subscription is released
    /// first so the controller never holds two.
    pub fn bind(&mut self, state: &mut ThreadViewState, source: &ChatEvent) -> bool {
        if self.subscription.is_some() {
            self.unbind(state);
        }

        let Some(thread) = self.lookup.thread_for_event(source) else {
            tracing::debug!(event = %source.event_id, "no thread for source event");
            return false;
        };

        let binding = BindingId(self.next_binding);
        self.next_binding += 1;
        self.subscription = Some(ThreadSubscription::attach(&thread, binding, &self.inbox));
        state.live_binding = Some(binding);

        // Reflect whatever the handle already holds without waiting for a signal.
        update::apply(state, ThreadUpdate::NewHandle(thread));
        true
    }

    /// Releases the live subscription and clears the bound thread. Idempotent.
    pub fn unbind(&mut self, state: &mut ThreadViewState) {
        let released = self.subscription.take().is_some();
        if released || state.current_thread.is_some() || state.live_binding.is_some() {
            state.clear_thread();
        }
    }

    /// The only path that changes the live thread.
    pub fn rebind(&mut self, state: &mut ThreadViewState, source: &ChatEvent) -> bool {
        self.unbind(state);
        self.bind(state, source)
    }

    pub fn is_bound(&self) -> bool {
        self.subscription.is_some()
    }

    pub fn binding(&self) -> Option<BindingId> {
        self.subscription.as_ref().map(ThreadSubscription::binding)
    }

    pub fn bound_thread(&self) -> Option<&Thread> {
        self.subscription.as_ref().map(ThreadSubscription::thread)
    }
}

impl fmt::Debug for ThreadBindingController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ThreadBindingController")
            .field("subscription", &self.subscription)
            .field("next_binding", &self.next_binding)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use skein_core::client::MemoryClient;
    use skein_core::model::{EventId, RoomId};
    use tokio::sync::mpsc;

    use super::*;
    use crate::runtime::inbox::UiEventReceiver;

    fn event(id: &str) -> ChatEvent {
        ChatEvent::new(EventId::new(id), RoomId::new("!r:x"), "@a:x", id)
    }

    fn pending() -> Option<Duration> {
        Some(Duration::from_secs(60))
    }

    fn reply(root: &str, id: &str) -> ChatEvent {
        event(id).in_thread(EventId::new(root))
    }

    struct Fixture {
        client: Rc<MemoryClient>,
        controller: ThreadBindingController,
        state: ThreadViewState,
        rx: UiEventReceiver,
    }

    fn fixture() -> Fixture {
        let client = Rc::new(MemoryClient::new());
        let (tx, rx) = mpsc::unbounded_channel();
        let lookup: Rc<dyn ThreadLookup> = Rc::clone(&client) as Rc<dyn ThreadLookup>;
        Fixture {
            client,
            controller: ThreadBindingController::new(lookup, tx),
            state: ThreadViewState::default(),
            rx,
        }
    }

    fn listeners(thread: &Thread) -> (usize, usize) {
        (
            thread.listener_count(ThreadSignal::Update),
            thread.listener_count(ThreadSignal::Ready),
        )
    }

    #[test]
    fn test_bind_attaches_both_listeners_and_applies_handle() {
        let mut f = fixture();
        let thread = f.client.add_thread(event("$a"), Vec::new(), pending());

        assert!(f.controller.bind(&mut f.state, &event("$a")));

        assert_eq!(listeners(&thread), (1, 1));
        assert!(f.state.current_thread.as_ref().unwrap().ptr_eq(&thread));
        assert_eq!(f.state.live_binding, f.controller.binding());
        assert!(f.state.take_render_request());
    }

    #[test]
    fn test_bind_without_thread_stays_unbound() {
        let mut f = fixture();
        assert!(!f.controller.bind(&mut f.state, &event("$none")));
        assert!(!f.controller.is_bound());
        assert!(f.state.current_thread.is_none());
    }

    #[test]
    fn test_rebind_releases_previous_thread() {
        let mut f = fixture();
        let a = f.client.add_thread(event("$a"), Vec::new(), pending());
        let b = f.client.add_thread(event("$b"), Vec::new(), pending());

        f.controller.bind(&mut f.state, &event("$a"));
        f.controller.rebind(&mut f.state, &event("$b"));

        assert_eq!(listeners(&a), (0, 0));
        assert_eq!(listeners(&b), (1, 1));
        assert!(f.controller.bound_thread().unwrap().ptr_eq(&b));
    }

    #[test]
    fn test_single_subscription_across_sequences() {
        let mut f = fixture();
        let threads: Vec<Thread> = ["$a", "$b", "$c"]
            .iter()
            .map(|id| f.client.add_thread(event(id), Vec::new(), pending()))
            .collect();

        let sequence = ["$a", "$b", "$b", "$c", "$a", "$none", "$c"];
        for id in sequence {
            f.controller.rebind(&mut f.state, &event(id));
            let attached: usize = threads.iter().map(|t| listeners(t).0).sum();
            assert!(attached <= 1, "more than one subscription after {id}");
        }
        f.controller.bind(&mut f.state, &event("$a"));
        let attached: usize = threads.iter().map(|t| listeners(t).0).sum();
        assert_eq!(attached, 1);

        f.controller.unbind(&mut f.state);
        for thread in &threads {
            assert_eq!(listeners(thread), (0, 0));
        }
    }

    #[test]
    fn test_bind_by_reply_resolves_thread() {
        let mut f = fixture();
        let thread = f.client.add_thread(event("$a"), vec![reply("$a", "$a1")], None);

        assert!(f.controller.bind(&mut f.state, &reply("$a", "$a1")));
        assert!(f.controller.bound_thread().unwrap().ptr_eq(&thread));
        assert_eq!(f.state.current_thread.as_ref().unwrap().timeline().len(), 1);
    }

    #[test]
    fn test_signals_are_tagged_with_binding() {
        let mut f = fixture();
        let thread = f.client.add_thread(event("$a"), Vec::new(), pending());
        f.controller.bind(&mut f.state, &event("$a"));
        let binding = f.controller.binding().unwrap();

        thread.add_reply(reply("$a", "$a1"));

        let Ok(UiEvent::Thread(ThreadUiEvent::Signal {
            binding: tagged,
            signal,
            update,
        })) = f.rx.try_recv()
        else {
            panic!("expected a thread signal");
        };
        assert_eq!(tagged, binding);
        assert_eq!(signal, ThreadSignal::Update);
        assert!(matches!(update, ThreadUpdate::NewHandle(h) if h.ptr_eq(&thread)));
    }

    #[test]
    fn test_ready_reaches_controller_once() {
        let mut f = fixture();
        let thread = f.client.add_thread(event("$a"), Vec::new(), pending());
        f.controller.bind(&mut f.state, &event("$a"));

        assert!(thread.mark_ready());
        // A misbehaving SDK emitting again finds no controller listener.
        assert_eq!(thread.emit(ThreadSignal::Ready, None), 0);

        let ready_signals = std::iter::from_fn(|| f.rx.try_recv().ok())
            .filter(|ev| {
                matches!(
                    ev,
                    UiEvent::Thread(ThreadUiEvent::Signal {
                        signal: ThreadSignal::Ready,
                        ..
                    })
                )
            })
            .count();
        assert_eq!(ready_signals, 1);
        assert_eq!(listeners(&thread), (1, 0));
    }

    #[test]
    fn test_unbind_disposed_handle_does_not_panic() {
        let mut f = fixture();
        let thread = f.client.add_thread(event("$a"), Vec::new(), None);
        f.controller.bind(&mut f.state, &event("$a"));

        thread.dispose();
        f.controller.unbind(&mut f.state);

        assert!(!f.controller.is_bound());
        assert!(f.state.current_thread.is_none());
        assert!(f.state.live_binding.is_none());
    }

    #[test]
    fn test_unbind_is_idempotent() {
        let mut f = fixture();
        f.client.add_thread(event("$a"), Vec::new(), None);
        f.controller.bind(&mut f.state, &event("$a"));

        f.controller.unbind(&mut f.state);
        f.controller.unbind(&mut f.state);
        assert!(!f.controller.is_bound());
    }

    #[test]
    fn test_dropping_subscription_detaches() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let thread = Thread::new(event("$a"));
        let subscription = ThreadSubscription::attach(&thread, BindingId(7), &tx);
        assert_eq!(listeners(&thread), (1, 1));
        assert_eq!(subscription.binding().to_string(), "binding-7");

        drop(subscription);
        assert_eq!(listeners(&thread), (0, 0));
    }
}
