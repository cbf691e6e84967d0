//! Signal emitter shared between an SDK object and its observers.
//!
//! Listeners are registered per signal and identified by a [`ListenerId`].
//! Removal is explicit: dropping the observer does not detach its listener.
//!
//! Emission snapshots the matching listeners before invoking any of them, so a
//! listener may add or remove listeners (including itself) while running.
//! One-shot listeners are unregistered before the snapshot is invoked.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

/// Identifies one listener registration on an emitter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

impl fmt::Display for ListenerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

type Listener<P> = Rc<dyn Fn(P)>;

struct Registration<S, P> {
    id: ListenerId,
    signal: S,
    once: bool,
    listener: Listener<P>,
}

/// Single-threaded emitter keyed by signal `S`, delivering payload `P`.
pub struct EventEmitter<S, P> {
    registrations: RefCell<Vec<Registration<S, P>>>,
    next_id: Cell<u64>,
}

impl<S, P> Default for EventEmitter<S, P>
where
    S: Copy + Eq,
    P: Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<S, P> EventEmitter<S, P>
where
    S: Copy + Eq,
    P: Clone,
{
    pub fn new() -> Self {
        Self {
            registrations: RefCell::new(Vec::new()),
            next_id: Cell::new(0),
        }
    }

    /// Registers a listener that stays attached until removed.
    pub fn on(&self, signal: S, listener: impl Fn(P) + 'static) -> ListenerId {
        self.register(signal, false, Rc::new(listener))
    }

    /// Registers a listener that is detached the first time `signal` fires.
    pub fn once(&self, signal: S, listener: impl Fn(P) + 'static) -> ListenerId {
        self.register(signal, true, Rc::new(listener))
    }

    fn register(&self, signal: S, once: bool, listener: Listener<P>) -> ListenerId {
        let id = ListenerId(self.next_id.get());
        self.next_id.set(self.next_id.get().wrapping_add(1));
        self.registrations.borrow_mut().push(Registration {
            id,
            signal,
            once,
            listener,
        });
        id
    }

    /// Removes a listener.
    ///
    /// Returns `false` when nothing matched (already removed, one-shot already
    /// fired, or registered under a different signal).
    pub fn remove_listener(&self, signal: S, id: ListenerId) -> bool {
        let mut registrations = self.registrations.borrow_mut();
        let before = registrations.len();
        registrations.retain(|r| !(r.id == id && r.signal == signal));
        registrations.len() != before
    }

    /// Removes every listener, returning how many were attached.
    pub fn remove_all_listeners(&self) -> usize {
        let mut registrations = self.registrations.borrow_mut();
        let count = registrations.len();
        registrations.clear();
        count
    }

    pub fn listener_count(&self, signal: S) -> usize {
        self.registrations
            .borrow()
            .iter()
            .filter(|r| r.signal == signal)
            .count()
    }

    /// Delivers `payload` to every listener of `signal`.
    ///
    /// Returns the number of listeners invoked.
    pub fn emit(&self, signal: S, payload: P) -> usize {
        let listeners: Vec<Listener<P>> = {
            let mut registrations = self.registrations.borrow_mut();
            let snapshot = registrations
                .iter()
                .filter(|r| r.signal == signal)
                .map(|r| Rc::clone(&r.listener))
                .collect();
            registrations.retain(|r| !(r.once && r.signal == signal));
            snapshot
        };

        for listener in &listeners {
            listener(payload.clone());
        }
        listeners.len()
    }
}

impl<S, P> fmt::Debug for EventEmitter<S, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventEmitter")
            .field("listeners", &self.registrations.borrow().len())
            .finish_non_exhaustive()
    }
}
