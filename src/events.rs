//! Ordered change notifications for reconciler consumers.
//!
//! Each subscriber gets its own unbounded channel. Events are pushed to every
//! live channel in the order the reconciler produces them, so a consumer never
//! observes a load result before the `Loading` transition that preceded it.
//! Channels whose receiver was dropped are pruned on the next publish.

use crate::types::{LoadState, TaskRecord};
use std::sync::{Mutex, PoisonError};
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};

/// Observable state transitions of a reconciler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskEvent {
    /// The load lifecycle moved to a new state.
    LoadStateChanged(LoadState),
    /// The snapshot was replaced; carries the new snapshot.
    TasksChanged(Vec<TaskRecord>),
    /// A task was created, edited or toggled.
    TaskUpdated(TaskRecord),
    TaskDeleted(i64),
    /// The remote could not be read. Carries a user-facing message.
    RemoteFetchFailed(String),
}

/// Fan-out of [`TaskEvent`]s to any number of subscribers.
pub struct EventBus {
    subscribers: Mutex<Vec<UnboundedSender<TaskEvent>>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            subscribers: Mutex::new(Vec::new()),
        }
    }

    /// Open a new ordered stream of events.
    pub fn subscribe(&self) -> UnboundedReceiver<TaskEvent> {
        let (tx, rx) = unbounded_channel();
        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(tx);
        rx
    }

    /// Deliver `event` to every live subscriber.
    pub fn publish(&self, event: TaskEvent) {
        let mut subs = self
            .subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        subs.retain(|tx| tx.send(event.clone()).is_ok());
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
