use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};

use crate::api::types::PendingEvent;

/// Multi-producer / single-consumer FIFO of pending events.
///
/// Platform threads push touch, orientation and game events at any time;
/// the stepping thread drains everything once per frame. Pushing never blocks
/// for longer than a `VecDeque::push_back`.
pub struct EventQueue {
    events: Mutex<VecDeque<PendingEvent>>,
    capacity: usize,
    dropped: AtomicU64,
}

impl EventQueue {
    pub fn new(capacity: usize) -> Self {
        Self {
            events: Mutex::new(VecDeque::with_capacity(capacity.min(64))),
            capacity,
            dropped: AtomicU64::new(0),
        }
    }

    /// Push a new event. Returns false if the queue was full and the event was dropped.
    pub fn push(&self, event: PendingEvent) -> bool {
        let mut events = self.events.lock().unwrap_or_else(PoisonError::into_inner);
        if events.len() >= self.capacity {
            drop(events);
            let total = self.dropped.fetch_add(1, Ordering::Relaxed) + 1;
            log::warn!(
                "event queue full ({} pending), dropping {} ({} dropped so far)",
                self.capacity,
                event.operation(),
                total
            );
            return false;
        }
        events.push_back(event);
        true
    }

    /// Remove all pending events in arrival order.
    pub fn drain(&self) -> Vec<PendingEvent> {
        let mut events = self.events.lock().unwrap_or_else(PoisonError::into_inner);
        events.drain(..).collect()
    }

    /// Discard everything still pending.
    pub fn clear(&self) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    pub fn len(&self) -> usize {
        self.events.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Events rejected because the queue was full.
    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }
}

impl std::fmt::Debug for EventQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventQueue")
            .field("len", &self.len())
            .field("capacity", &self.capacity)
            .field("dropped", &self.dropped())
            .finish()
    }
}
