use super::{Responder, Waiter};

/// Result of offering a waiter to the queue.
pub enum Admission<R> {
    /// Stored until the next snapshot.
    Queued,
    /// Stored in the slot of an abandoned waiter, which is handed back.
    Evicted(Waiter<R>),
    /// No room and nothing to evict; the waiter is handed back.
    Full(Waiter<R>),
}

/// Fixed-capacity list of waiters, released together on each snapshot.
pub struct WaitQueue<R> {
    waiters: Vec<Waiter<R>>,
    capacity: usize,
}

impl<R: Responder> WaitQueue<R> {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            waiters: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Queue a waiter, evicting at most one abandoned waiter when full.
    pub fn admit(&mut self, waiter: Waiter<R>) -> Admission<R> {
        if self.waiters.len() < self.capacity {
            self.waiters.push(waiter);
            return Admission::Queued;
        }

        match self.waiters.iter().position(Waiter::is_abandoned) {
            Some(slot) => Admission::Evicted(std::mem::replace(&mut self.waiters[slot], waiter)),
            None => Admission::Full(waiter),
        }
    }

    /// Remove every waiter in insertion order.
    pub fn drain(&mut self) -> std::vec::Drain<'_, Waiter<R>> {
        self.waiters.drain(..)
    }

    pub fn len(&self) -> usize {
        self.waiters.len()
    }
}
