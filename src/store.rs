//! Observable values shared by explicit handle
//!
//! A `Store` is handed to whoever needs to read a piece of shared state
//! (theme mode, gravity flag). Readers get `get` and `subscribe`; writing is
//! crate-private so only the owning provider mutates it.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;

/// Token returned by `Store::subscribe`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener<T> = Box<dyn FnMut(&T)>;

pub struct Store<T> {
    value: RefCell<T>,
    listeners: RefCell<Vec<(SubscriptionId, Listener<T>)>>,
    next_id: Cell<u64>,
    pending: RefCell<VecDeque<T>>,
    notifying: Cell<bool>,
}

impl<T: std::fmt::Debug> std::fmt::Debug for Store<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("value", &self.value.borrow())
            .field("listeners", &self.listeners.borrow().len())
            .finish()
    }
}

impl<T: Clone + PartialEq> Store<T> {
    pub fn new(value: T) -> Self {
        Self {
            value: RefCell::new(value),
            listeners: RefCell::new(Vec::new()),
            next_id: Cell::new(1),
            pending: RefCell::new(VecDeque::new()),
            notifying: Cell::new(false),
        }
    }

    pub fn get(&self) -> T {
        self.value.borrow().clone()
    }

    /// Register a listener called after every change
    pub fn subscribe(&self, listener: impl FnMut(&T) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.listeners.borrow_mut().push((id, Box::new(listener)));
        id
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut listeners = self.listeners.borrow_mut();
        let before = listeners.len();
        listeners.retain(|(sid, _)| *sid != id);
        listeners.len() != before
    }

    /// Replace the value, notifying listeners if it changed.
    ///
    /// A `set` from inside a listener is queued and delivered once the
    /// current round of listeners has finished.
    pub(crate) fn set(&self, value: T) {
        if *self.value.borrow() == value {
            return;
        }
        *self.value.borrow_mut() = value.clone();
        self.pending.borrow_mut().push_back(value);
        if self.notifying.replace(true) {
            return;
        }

        loop {
            let Some(value) = self.pending.borrow_mut().pop_front() else {
                break;
            };
            // Listeners run detached so they may read the store or subscribe again
            let mut running = self.listeners.take();
            for (_, listener) in running.iter_mut() {
                listener(&value);
            }
            let mut listeners = self.listeners.borrow_mut();
            let added = std::mem::take(&mut *listeners);
            *listeners = running;
            listeners.extend(added);
        }
        self.notifying.set(false);
    }

    pub(crate) fn update(&self, f: impl FnOnce(&T) -> T) -> T {
        let next = f(&self.value.borrow());
        self.set(next.clone());
        next
    }
}
