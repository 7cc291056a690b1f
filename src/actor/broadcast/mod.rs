//! Long-poll broadcast state.
//!
//! Holds the current [`Snapshot`] and the clients waiting for the next one.
//! A client names the version it already has:
//!
//! | Client version      | Outcome                                  |
//! |---------------------|------------------------------------------|
//! | older than current  | current snapshot, immediately            |
//! | equal to current    | queued until the next snapshot           |
//! | newer than current  | `400 Invalid version value.`             |
//!
//! The queue is bounded. When it is full, one abandoned waiter is failed with
//! `408` to make room; if none is abandoned the newcomer gets `503`.
//!
//! `Broadcaster` does no I/O and takes no locks. It is owned by a single actor
//! task which serializes every call.

mod queue;
mod snapshot;

#[cfg(test)]
pub(crate) mod testing;

pub use queue::{Admission, WaitQueue};
pub use snapshot::{Snapshot, Version};

use thiserror::Error;

/// Default number of clients allowed to wait at once.
pub const DEFAULT_QUEUE_CAPACITY: usize = 100;

/// Transport-side handle of one pending request.
///
/// Sending consumes the responder, so each request is answered exactly once.
pub trait Responder: Send + 'static {
    fn send(self, reply: Reply<'_>);

    /// Whether the caller is presumed gone. Only consulted when the queue is
    /// full.
    ///
    /// Transports that cannot observe disconnects may answer with a
    /// heuristic such as request age; a caller still connected can then be
    /// evicted.
    fn is_abandoned(&self) -> bool;
}

/// What a responder is asked to send.
#[derive(Debug)]
pub enum Reply<'a> {
    Snapshot(&'a Snapshot),
    Reject(Rejection),
}

/// Per-request failures. They never affect other clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("Invalid version value.")]
    InvalidVersion,

    #[error("Client cancelled the request?")]
    Cancelled,

    #[error("Too many pending requests.")]
    TooManyPending,

    #[error("Server is shutting down.")]
    ShuttingDown,
}

impl Rejection {
    /// HTTP status code reported to the client.
    pub const fn status(self) -> u16 {
        match self {
            Self::InvalidVersion => 400,
            Self::Cancelled => 408,
            Self::TooManyPending | Self::ShuttingDown => 503,
        }
    }
}

/// A request for the snapshot after `requested`.
pub struct Waiter<R> {
    responder: R,
    requested: Version,
}

impl<R: Responder> Waiter<R> {
    pub fn new(responder: R, requested: Version) -> Self {
        Self {
            responder,
            requested,
        }
    }

    pub fn requested(&self) -> Version {
        self.requested
    }

    pub fn is_abandoned(&self) -> bool {
        self.responder.is_abandoned()
    }

    /// Give the responder back, e.g. when the actor is no longer running.
    pub fn into_responder(self) -> R {
        self.responder
    }

    fn reply(self, reply: Reply<'_>) {
        self.responder.send(reply);
    }
}

/// What `submit` did with a request. Used for logging and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Answered with the current snapshot.
    Served,
    /// Waiting for the next snapshot.
    Queued,
    /// Waiting, after an abandoned waiter was failed to make room.
    QueuedAfterEviction,
    /// Answered with an error.
    Rejected(Rejection),
}

/// Current snapshot plus the bounded queue of waiting clients.
pub struct Broadcaster<R> {
    current: Snapshot,
    queue: WaitQueue<R>,
}

impl<R: Responder> Broadcaster<R> {
    /// Start with an empty version-zero snapshot and no waiters.
    pub fn new(capacity: usize) -> Self {
        Self {
            current: Snapshot::empty(),
            queue: WaitQueue::with_capacity(capacity),
        }
    }

    pub fn current(&self) -> &Snapshot {
        &self.current
    }

    /// Number of clients waiting for the next snapshot.
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Answer or queue a request.
    pub fn submit(&mut self, waiter: Waiter<R>) -> Outcome {
        let current = self.current.version();
        let requested = waiter.requested();

        if current > requested {
            waiter.reply(Reply::Snapshot(&self.current));
            return Outcome::Served;
        }
        if current < requested {
            return reject(waiter, Rejection::InvalidVersion);
        }

        match self.queue.admit(waiter) {
            Admission::Queued => Outcome::Queued,
            Admission::Evicted(stale) => {
                stale.reply(Reply::Reject(Rejection::Cancelled));
                Outcome::QueuedAfterEviction
            }
            Admission::Full(waiter) => reject(waiter, Rejection::TooManyPending),
        }
    }

    /// Replace the current snapshot and release every waiter with it.
    ///
    /// Returns the number of released waiters.
    pub fn publish(&mut self, snapshot: Snapshot) -> usize {
        self.current = snapshot;

        let mut released = 0;
        for waiter in self.queue.drain() {
            waiter.reply(Reply::Snapshot(&self.current));
            released += 1;
        }
        released
    }

    /// Fail every remaining waiter. Returns how many were failed.
    pub fn shutdown(&mut self) -> usize {
        let mut failed = 0;
        for waiter in self.queue.drain() {
            waiter.reply(Reply::Reject(Rejection::ShuttingDown));
            failed += 1;
        }
        failed
    }
}

fn reject<R: Responder>(waiter: Waiter<R>, rejection: Rejection) -> Outcome {
    waiter.reply(Reply::Reject(rejection));
    Outcome::Rejected(rejection)
}
