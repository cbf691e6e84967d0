//! Process-wide action dispatcher.
//!
//! A broadcast registry: every registered handler sees every dispatched
//! action, in no guaranteed order. Handlers are identified by the
//! [`DispatcherRef`] token returned from `register` and must be unregistered
//! explicitly when their owner goes away.
//!
//! The dispatcher is a plain value. Whoever owns the application's lifetime
//! creates one and passes it by reference to the components that need it.

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

/// Registration token returned by [`Dispatcher::register`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DispatcherRef(u64);

impl fmt::Display for DispatcherRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ID_{}", self.0)
    }
}

type Handler<A> = Rc<dyn Fn(&A)>;

pub struct Dispatcher<A> {
    handlers: RefCell<BTreeMap<DispatcherRef, Handler<A>>>,
    next_id: Cell<u64>,
}

impl<A> Default for Dispatcher<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A> Dispatcher<A> {
    pub fn new() -> Self {
        Self {
            handlers: RefCell::new(BTreeMap::new()),
            next_id: Cell::new(1),
        }
    }

    pub fn register(&self, handler: impl Fn(&A) + 'static) -> DispatcherRef {
        let token = DispatcherRef(self.next_id.get());
        self.next_id.set(self.next_id.get() + 1);
        self.handlers.borrow_mut().insert(token, Rc::new(handler));
        tracing::trace!(%token, "dispatcher handler registered");
        token
    }

    /// Returns `false` if the token was not registered.
    pub fn unregister(&self, token: DispatcherRef) -> bool {
        let removed = self.handlers.borrow_mut().remove(&token).is_some();
        tracing::trace!(%token, removed, "dispatcher handler unregistered");
        removed
    }

    pub fn is_registered(&self, token: DispatcherRef) -> bool {
        self.handlers.borrow().contains_key(&token)
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.borrow().len()
    }

    /// Delivers `action` to every handler registered at the time of the call.
    pub fn dispatch(&self, action: &A) -> usize {
        let handlers: Vec<Handler<A>> = self.handlers.borrow().values().map(Rc::clone).collect();
        for handler in &handlers {
            handler(action);
        }
        handlers.len()
    }
}

impl<A> fmt::Debug for Dispatcher<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("handlers", &self.handler_count())
            .finish_non_exhaustive()
    }
}
