//! Observable fields
//!
//! A value with an explicit subscription list. Listeners are called in the
//! order they subscribed, only when the value actually changes, and receive
//! the new and previous values. Listeners never get a handle to the owner,
//! so a notification cannot re-enter the field that raised it.

use std::fmt;

/// Handle returned by [`Observable::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener<T> = Box<dyn FnMut(&T, &T)>;

/// Value with change notification and a remembered initial value
pub struct Observable<T> {
    value: T,
    initial: T,
    listeners: Vec<(SubscriptionId, Listener<T>)>,
    next_id: u64,
}

impl<T: Clone + PartialEq> Observable<T> {
    pub fn new(value: T) -> Self {
        Self {
            initial: value.clone(),
            value,
            listeners: Vec::new(),
            next_id: 0,
        }
    }

    /// Current value
    pub fn get(&self) -> &T {
        &self.value
    }

    /// Value restored by [`Observable::reset`]
    pub fn initial(&self) -> &T {
        &self.initial
    }

    /// Set the value, notifying listeners if it changed. Returns whether it changed.
    pub fn set(&mut self, value: T) -> bool {
        if value == self.value {
            return false;
        }
        let old = std::mem::replace(&mut self.value, value);
        for (_, listener) in &mut self.listeners {
            listener(&self.value, &old);
        }
        true
    }

    /// Restore the initial value (notifies like `set`)
    pub fn reset(&mut self) -> bool {
        let initial = self.initial.clone();
        self.set(initial)
    }

    /// Register a listener called with `(new, old)` on every change
    pub fn subscribe(&mut self, listener: impl FnMut(&T, &T) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Remove a listener. Returns false if it was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sid, _)| *sid != id);
        self.listeners.len() != before
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

impl<T: Copy + PartialEq> Observable<T> {
    /// Current value by copy
    pub fn value(&self) -> T {
        self.value
    }
}

impl<T: fmt::Debug> fmt::Debug for Observable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observable")
            .field("value", &self.value)
            .field("initial", &self.initial)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
