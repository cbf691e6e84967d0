//! SDK-owned thread handle.
//!
//! A `Thread` is a cheap-clone handle to mutable state owned by the client:
//! the thread's timeline, its reply-to pointer, and a signal emitter shared by
//! every observer of the thread (the main timeline, thread panels, ...).
//! Observers only ever add and remove their own listener ids.

use std::cell::{Cell, Ref, RefCell};
use std::fmt;
use std::rc::Rc;

use super::{ChatEvent, EventId, RoomId};
use crate::emitter::{EventEmitter, ListenerId};

/// Signals emitted by a thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ThreadSignal {
    /// Thread content changed. Fires repeatedly.
    Update,
    /// Initial data finished loading. Fires at most once per thread.
    Ready,
}

impl ThreadSignal {
    pub fn name(self) -> &'static str {
        match self {
            ThreadSignal::Update => "Thread.update",
            ThreadSignal::Ready => "Thread.ready",
        }
    }
}

impl fmt::Display for ThreadSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// What a thread signal means for an observer holding a handle.
///
/// Signals may carry the handle or fire bare. A bare signal still means
/// "something changed": observers keep their handle and re-read its fields.
#[derive(Debug, Clone)]
pub enum ThreadUpdate {
    /// Replace the held handle with this one.
    NewHandle(Thread),
    /// Keep the held handle; its fields changed in place.
    RefreshOnly,
}

impl From<Option<Thread>> for ThreadUpdate {
    fn from(payload: Option<Thread>) -> Self {
        match payload {
            Some(thread) => ThreadUpdate::NewHandle(thread),
            None => ThreadUpdate::RefreshOnly,
        }
    }
}

/// Ordered replies of a thread (root excluded), oldest first.
#[derive(Debug, Clone, Default)]
pub struct TimelineSet {
    events: Vec<ChatEvent>,
}

impl TimelineSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[ChatEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn last(&self) -> Option<&ChatEvent> {
        self.events.last()
    }

    pub fn contains(&self, event_id: &EventId) -> bool {
        self.events.iter().any(|e| &e.event_id == event_id)
    }

    /// Inserts by origin timestamp, after events with an equal timestamp.
    ///
    /// Returns `false` if an event with the same id is already present.
    pub fn insert(&mut self, event: ChatEvent) -> bool {
        if self.contains(&event.event_id) {
            return false;
        }
        let at = self
            .events
            .partition_point(|e| e.origin_server_ts <= event.origin_server_ts);
        self.events.insert(at, event);
        true
    }
}

struct ThreadInner {
    root: ChatEvent,
    timeline: RefCell<TimelineSet>,
    reply_to: RefCell<Option<ChatEvent>>,
    emitter: EventEmitter<ThreadSignal, Option<Thread>>,
    ready: Cell<bool>,
    disposed: Cell<bool>,
}

/// Handle to a thread rooted at one event.
#[derive(Clone)]
pub struct Thread {
    inner: Rc<ThreadInner>,
}

impl Thread {
    /// Creates a thread with no loaded replies.
    pub fn new(root: ChatEvent) -> Self {
        Self {
            inner: Rc::new(ThreadInner {
                root,
                timeline: RefCell::new(TimelineSet::new()),
                reply_to: RefCell::new(None),
                emitter: EventEmitter::new(),
                ready: Cell::new(false),
                disposed: Cell::new(false),
            }),
        }
    }

    /// Thread id (the root event id).
    pub fn id(&self) -> &EventId {
        &self.inner.root.event_id
    }

    pub fn room_id(&self) -> &RoomId {
        &self.inner.root.room_id
    }

    pub fn root(&self) -> &ChatEvent {
        &self.inner.root
    }

    pub fn timeline(&self) -> Ref<'_, TimelineSet> {
        self.inner.timeline.borrow()
    }

    pub fn reply_to(&self) -> Option<ChatEvent> {
        self.inner.reply_to.borrow().clone()
    }

    /// Moves the reply-to pointer in place without emitting.
    pub fn set_reply_to(&self, event: Option<ChatEvent>) {
        *self.inner.reply_to.borrow_mut() = event;
    }

    pub fn is_ready(&self) -> bool {
        self.inner.ready.get()
    }

    pub fn is_disposed(&self) -> bool {
        self.inner.disposed.get()
    }

    /// Returns true if both handles point at the same SDK object.
    pub fn ptr_eq(&self, other: &Thread) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    /// Appends a reply without emitting (used while hydrating).
    ///
    /// The newest reply becomes the reply-to target.
    pub fn push_reply(&self, event: ChatEvent) -> bool {
        if self.is_disposed() {
            return false;
        }
        let inserted = self.inner.timeline.borrow_mut().insert(event);
        if inserted {
            let latest = self.inner.timeline.borrow().last().cloned();
            self.set_reply_to(latest);
        }
        inserted
    }

    /// Appends a reply and emits `Update` with this handle as payload.
    pub fn add_reply(&self, event: ChatEvent) -> bool {
        let inserted = self.push_reply(event);
        if inserted {
            self.emit(ThreadSignal::Update, Some(self.clone()));
        }
        inserted
    }

    /// Marks initial data as loaded and emits `Ready` the first time only.
    pub fn mark_ready(&self) -> bool {
        if self.is_disposed() || self.inner.ready.replace(true) {
            return false;
        }
        self.emit(ThreadSignal::Ready, Some(self.clone()));
        true
    }

    pub fn on(&self, signal: ThreadSignal, listener: impl Fn(Option<Thread>) + 'static) -> ListenerId {
        self.inner.emitter.on(signal, listener)
    }

    pub fn once(&self, signal: ThreadSignal, listener: impl Fn(Option<Thread>) + 'static) -> ListenerId {
        self.inner.emitter.once(signal, listener)
    }

    /// Best-effort detach. Returns `false` when nothing was removed,
    /// including when the handle has already been disposed.
    pub fn remove_listener(&self, signal: ThreadSignal, id: ListenerId) -> bool {
        if self.is_disposed() {
            return false;
        }
        self.inner.emitter.remove_listener(signal, id)
    }

    pub fn listener_count(&self, signal: ThreadSignal) -> usize {
        self.inner.emitter.listener_count(signal)
    }

    /// Raw emission, as the SDK does it. Payload may be bare.
    pub fn emit(&self, signal: ThreadSignal, payload: Option<Thread>) -> usize {
        if self.is_disposed() {
            return 0;
        }
        tracing::trace!(thread = %self.id(), %signal, "emit");
        self.inner.emitter.emit(signal, payload)
    }

    /// Tears the handle down: drops every listener and stops emitting.
    pub fn dispose(&self) {
        if self.inner.disposed.replace(true) {
            return;
        }
        let dropped = self.inner.emitter.remove_all_listeners();
        tracing::debug!(thread = %self.id(), dropped, "thread disposed");
    }
}

impl fmt::Debug for Thread {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Thread")
            .field("id", self.id())
            .field("replies", &self.timeline().len())
            .field("ready", &self.is_ready())
            .field("disposed", &self.is_disposed())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;

    fn event(id: &str, minute: u32) -> ChatEvent {
        ChatEvent::new(
            EventId::new(id),
            RoomId::new("!r:example.org"),
            "@alice:example.org",
            format!("message {id}"),
        )
        .at(Utc.with_ymd_and_hms(2024, 5, 1, 10, minute, 0).unwrap())
    }

    fn thread() -> Thread {
        Thread::new(event("$root", 0))
    }

    #[test]
    fn test_timeline_insert_orders_by_timestamp() {
        let mut timeline = TimelineSet::new();
        timeline.insert(event("$b", 2));
        timeline.insert(event("$a", 1));
        timeline.insert(event("$c", 3));

        let ids: Vec<&str> = timeline.events().iter().map(|e| e.event_id.as_str()).collect();
        assert_eq!(ids, ["$a", "$b", "$c"]);
    }

    #[test]
    fn test_timeline_rejects_duplicates() {
        let mut timeline = TimelineSet::new();
        assert!(timeline.insert(event("$a", 1)));
        assert!(!timeline.insert(event("$a", 1)));
        assert_eq!(timeline.len(), 1);
    }

    #[test]
    fn test_add_reply_updates_reply_to_and_emits_update() {
        let thread = thread();
        let seen = Rc::new(Cell::new(0));
        let sink = Rc::clone(&seen);
        let expected = thread.clone();
        thread.on(ThreadSignal::Update, move |payload| {
            assert!(payload.is_some_and(|t| t.ptr_eq(&expected)));
            sink.set(sink.get() + 1);
        });

        assert!(thread.add_reply(event("$r1", 1)));
        assert_eq!(seen.get(), 1);
        assert_eq!(thread.reply_to().unwrap().event_id.as_str(), "$r1");
    }

    #[test]
    fn test_mark_ready_emits_once() {
        let thread = thread();
        let seen = Rc::new(Cell::new(0));
        let sink = Rc::clone(&seen);
        thread.on(ThreadSignal::Ready, move |_| sink.set(sink.get() + 1));

        assert!(thread.mark_ready());
        assert!(!thread.mark_ready());
        assert_eq!(seen.get(), 1);
        assert!(thread.is_ready());
    }

    #[test]
    fn test_dispose_drops_listeners_and_silences_emits() {
        let thread = thread();
        let id = thread.on(ThreadSignal::Update, |_| panic!("must not fire"));
        thread.dispose();

        assert_eq!(thread.listener_count(ThreadSignal::Update), 0);
        assert!(!thread.remove_listener(ThreadSignal::Update, id));
        assert_eq!(thread.emit(ThreadSignal::Update, None), 0);
        assert!(!thread.add_reply(event("$late", 5)));
    }

    #[test]
    fn test_ptr_eq_distinguishes_handles_with_same_root() {
        let a = thread();
        let b = thread();
        assert!(a.ptr_eq(&a.clone()));
        assert!(!a.ptr_eq(&b));
        assert_eq!(a.id(), b.id());
    }

    #[test]
    fn test_thread_update_from_payload() {
        assert!(matches!(ThreadUpdate::from(None), ThreadUpdate::RefreshOnly));
        assert!(matches!(
            ThreadUpdate::from(Some(thread())),
            ThreadUpdate::NewHandle(_)
        ));
    }
}
