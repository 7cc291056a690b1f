//! In-memory responder for exercising the broadcast logic without HTTP.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::mpsc;

use super::{Reply, Responder, Version, Waiter};

/// What a probe received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Received {
    Body(String),
    Status(u16, String),
}

/// Responder that forwards its reply over a channel.
pub(crate) struct Probe {
    id: usize,
    tx: mpsc::UnboundedSender<(usize, Received)>,
    abandoned: Arc<AtomicBool>,
}

impl Responder for Probe {
    fn send(self, reply: Reply<'_>) {
        let received = match reply {
            Reply::Snapshot(snapshot) => {
                Received::Body(String::from_utf8_lossy(snapshot.body()).into_owned())
            }
            Reply::Reject(rejection) => Received::Status(rejection.status(), rejection.to_string()),
        };
        let _ = self.tx.send((self.id, received));
    }

    fn is_abandoned(&self) -> bool {
        self.abandoned.load(Ordering::SeqCst)
    }
}

/// Hands out numbered probes and collects their replies.
pub(crate) struct Probes {
    next_id: usize,
    tx: mpsc::UnboundedSender<(usize, Received)>,
    rx: mpsc::UnboundedReceiver<(usize, Received)>,
}

impl Probes {
    pub(crate) fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self { next_id: 0, tx, rx }
    }

    /// New waiter for `version`, with a switch to mark it abandoned.
    pub(crate) fn waiter(&mut self, version: i64) -> (usize, Waiter<Probe>, Arc<AtomicBool>) {
        let id = self.next_id;
        self.next_id += 1;
        let abandoned = Arc::new(AtomicBool::new(false));
        let probe = Probe {
            id,
            tx: self.tx.clone(),
            abandoned: Arc::clone(&abandoned),
        };
        (id, Waiter::new(probe, Version::new(version)), abandoned)
    }

    /// Reply already delivered, if any.
    pub(crate) fn try_next(&mut self) -> Option<(usize, Received)> {
        self.rx.try_recv().ok()
    }

    /// Wait for the next reply.
    pub(crate) async fn next(&mut self) -> Option<(usize, Received)> {
        self.rx.recv().await
    }

    /// Every reply delivered so far.
    pub(crate) fn drain(&mut self) -> Vec<(usize, Received)> {
        std::iter::from_fn(|| self.try_next()).collect()
    }
}
