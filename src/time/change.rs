//! Change events and explicit observer registration.

use std::fmt;

/// A single field change: emitted only when `old != new`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyChange<T> {
    /// Name of the field that changed.
    pub field: &'static str,
    /// Value before the write.
    pub old: T,
    /// Value after the write.
    pub new: T,
}

impl<T: PartialEq> PropertyChange<T> {
    /// Build a change event, or `None` when the write is a no-op.
    pub fn between(field: &'static str, old: T, new: T) -> Option<Self> {
        if old == new {
            None
        } else {
            Some(Self { field, old, new })
        }
    }
}

/// Handle returned by [`Listeners::subscribe`].
pub type SubscriptionId = u64;

type Callback<E> = Box<dyn FnMut(&E)>;

/// An explicit list of subscribers for events of type `E`.
///
/// Owners call [`Listeners::notify`] themselves after a mutation; nothing is
/// wired up implicitly.
pub struct Listeners<E> {
    next_id: SubscriptionId,
    callbacks: Vec<(SubscriptionId, Callback<E>)>,
}

impl<E> Listeners<E> {
    /// Create an empty subscriber list.
    pub fn new() -> Self {
        Self {
            next_id: 1,
            callbacks: Vec::new(),
        }
    }

    /// Register a callback and return its subscription handle.
    pub fn subscribe(&mut self, callback: impl FnMut(&E) + 'static) -> SubscriptionId {
        let id = self.next_id;
        self.next_id += 1;
        self.callbacks.push((id, Box::new(callback)));
        id
    }

    /// Remove a subscription. Returns `false` if the handle was unknown.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.callbacks.len();
        self.callbacks.retain(|(sid, _)| *sid != id);
        self.callbacks.len() != before
    }

    /// Deliver an event to every subscriber in registration order.
    pub fn notify(&mut self, event: &E) {
        for (_, callback) in self.callbacks.iter_mut() {
            callback(event);
        }
    }

    /// Number of active subscriptions.
    pub fn len(&self) -> usize {
        self.callbacks.len()
    }

    /// Whether there are no subscribers.
    pub fn is_empty(&self) -> bool {
        self.callbacks.is_empty()
    }
}

impl<E> Default for Listeners<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> fmt::Debug for Listeners<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listeners")
            .field("subscribers", &self.callbacks.len())
            .finish()
    }
}
