//! Pending-event queue built on crossbeam-channel.
//!
//! The dispatcher owns the [`EventQueue`]. Listeners only ever get an
//! [`Emitter`], which can append to the tail of the queue but cannot
//! pop, inspect or reorder it.

use crossbeam_channel::{unbounded, Receiver, Sender};
use serde::{Deserialize, Serialize};

/// Where a pending event came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Origin {
    /// Decoded from the record with this index (0-based)
    Record(usize),
    /// Emitted by a listener while the queue was draining
    Emitted,
}

/// An event waiting in the queue
#[derive(Debug)]
pub struct Pending<E> {
    pub event: E,
    pub origin: Origin,
}

/// Appends events to the tail of the dispatcher's queue.
///
/// This is a thin wrapper around crossbeam's Sender. `emit` never
/// calls back into the dispatcher; the event is handled after
/// everything already queued.
pub struct Emitter<E> {
    inner: Sender<Pending<E>>,
}

impl<E> Clone for Emitter<E> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<E> Emitter<E> {
    /// Queue an event for processing after all currently pending events.
    ///
    /// If the queue has been dropped (the run is over), the event is
    /// silently discarded.
    pub fn emit(&self, event: E) {
        let _ = self.inner.send(Pending {
            event,
            origin: Origin::Emitted,
        });
    }

    /// An emitter whose events go nowhere.
    ///
    /// Useful for driving a listener directly in tests.
    pub fn detached() -> Self {
        let (sender, _receiver) = unbounded();
        Self { inner: sender }
    }
}

/// FIFO queue of pending events, owned by the dispatcher.
pub struct EventQueue<E> {
    sender: Sender<Pending<E>>,
    receiver: Receiver<Pending<E>>,
}

impl<E> EventQueue<E> {
    /// Create an empty, unbounded queue.
    pub fn new() -> Self {
        let (sender, receiver) = unbounded();
        Self { sender, receiver }
    }

    /// Get an append-only handle to this queue
    pub fn emitter(&self) -> Emitter<E> {
        Emitter {
            inner: self.sender.clone(),
        }
    }

    /// Push an event decoded from a record onto the tail
    pub fn push_record(&self, event: E, record: usize) {
        // The queue holds its own receiver, so this cannot disconnect
        let _ = self.sender.send(Pending {
            event,
            origin: Origin::Record(record),
        });
    }

    /// Pop the head of the queue without blocking
    pub fn pop(&self) -> Option<Pending<E>> {
        self.receiver.try_recv().ok()
    }

    /// Number of pending events
    pub fn len(&self) -> usize {
        self.receiver.len()
    }

    /// Whether the queue is drained
    pub fn is_empty(&self) -> bool {
        self.receiver.is_empty()
    }
}

impl<E> Default for EventQueue<E> {
    fn default() -> Self {
        Self::new()
    }
}
