//! Change-notification plumbing shared by the grid and the search engine.
//!
//! A [`Listeners`] list holds synchronous callbacks and channel senders.
//! Every committed mutation of the owning object is followed by exactly one
//! [`emit`](Listeners::emit); callbacks run in subscription order before the
//! mutating call returns. Drivers that prefer polling can take a
//! [`channel`](Listeners::channel) instead of registering a callback.

use std::fmt;
use std::sync::mpsc::{self, Receiver, Sender};

/// Handle returned by [`Listeners::subscribe`], used to unsubscribe.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

enum Sink<E> {
    Callback(Box<dyn FnMut(&E)>),
    Channel(Sender<E>),
}

/// An ordered list of event sinks.
pub struct Listeners<E> {
    sinks: Vec<(ListenerId, Sink<E>)>,
    next_id: u64,
}

impl<E> Listeners<E> {
    /// Create an empty listener list.
    pub fn new() -> Self {
        Self {
            sinks: Vec::new(),
            next_id: 0,
        }
    }

    /// Register a callback invoked synchronously on every event.
    pub fn subscribe<F>(&mut self, f: F) -> ListenerId
    where
        F: FnMut(&E) + 'static,
    {
        self.push(Sink::Callback(Box::new(f)))
    }

    /// Remove a previously registered sink. Returns `false` if `id` is
    /// unknown (already removed, or a channel whose receiver was dropped).
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.sinks.len();
        self.sinks.retain(|(sid, _)| *sid != id);
        self.sinks.len() != before
    }

    /// Number of registered sinks.
    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    /// Whether nobody is listening.
    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }

    fn push(&mut self, sink: Sink<E>) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.sinks.push((id, sink));
        id
    }
}

impl<E: Clone> Listeners<E> {
    /// Open a channel that receives a clone of every subsequent event.
    ///
    /// The sender is dropped on the first emit after the receiver goes away.
    pub fn channel(&mut self) -> Receiver<E> {
        let (tx, rx) = mpsc::channel();
        self.push(Sink::Channel(tx));
        rx
    }

    /// Deliver `event` to every sink, in subscription order.
    pub fn emit(&mut self, event: &E) {
        self.sinks.retain_mut(|(_, sink)| match sink {
            Sink::Callback(f) => {
                f(event);
                true
            }
            Sink::Channel(tx) => tx.send(event.clone()).is_ok(),
        });
    }

    /// Like [`emit`](Self::emit), but only builds the event when at least
    /// one sink is registered. Event payloads are full state snapshots, so
    /// this skips the copy for unobserved objects.
    pub fn emit_with(&mut self, make: impl FnOnce() -> E) {
        if self.sinks.is_empty() {
            return;
        }
        let event = make();
        self.emit(&event);
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
            .field("len", &self.sinks.len())
            .finish()
    }
}
