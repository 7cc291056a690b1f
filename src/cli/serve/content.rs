//! `/content` long-poll requests.
//!
//! The request is parsed on the server thread and then handed to the
//! preview actor as a [`Waiter`]. The server thread never waits for the
//! answer: the actor sends it whenever the request is released.

use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use tiny_http::Request;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use super::response;
use crate::actor::PreviewMsg;
use crate::actor::broadcast::{Rejection, Reply, Responder, Version, Waiter};
use crate::debug;

/// Reply writes still running on the blocking pool.
///
/// Tokio cancels blocking tasks that have not started when its runtime is
/// dropped, and a dropped tiny_http request answers a bare 500. The actor
/// thread flushes this before dropping the runtime.
#[derive(Clone, Default)]
pub struct PendingReplies(Arc<Mutex<Vec<JoinHandle<()>>>>);

impl PendingReplies {
    fn track(&self, handle: JoinHandle<()>) {
        let mut handles = self.0.lock();
        handles.retain(|handle| !handle.is_finished());
        handles.push(handle);
    }

    /// Wait until every tracked reply has been written.
    pub async fn flush(&self) {
        loop {
            let handles = std::mem::take(&mut *self.0.lock());
            if handles.is_empty() {
                return;
            }
            for handle in handles {
                let _ = handle.await;
            }
        }
    }
}

/// A pending `/content` request.
pub struct HttpResponder {
    request: Request,
    accepted_at: Instant,
    stale_after: Duration,
    replies: PendingReplies,
}

impl HttpResponder {
    pub fn new(request: Request, stale_after: Duration, replies: PendingReplies) -> Self {
        Self {
            request,
            accepted_at: Instant::now(),
            stale_after,
            replies,
        }
    }
}

impl Responder for HttpResponder {
    fn send(self, reply: Reply<'_>) {
        let response = match reply {
            Reply::Snapshot(snapshot) => response::shared_body(snapshot.body()).boxed(),
            Reply::Reject(rejection) => {
                response::status_line(rejection.status(), &rejection.to_string()).boxed()
            }
        };

        // Socket writes must not stall the actor loop
        let request = self.request;
        let finish = move || {
            if let Err(e) = request.respond(response) {
                debug!("serve"; "failed to answer /content: {}", e);
            }
        };
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => self.replies.track(handle.spawn_blocking(finish)),
            Err(_) => finish(),
        }
    }

    /// Age-based guess: tiny_http never reports a closed connection, so a
    /// request older than `stale_after` is presumed gone even if the tab is
    /// still open.
    fn is_abandoned(&self) -> bool {
        self.accepted_at.elapsed() >= self.stale_after
    }
}

/// Everything the server thread needs to hand `/content` requests over.
pub struct ContentRoute {
    pub tx: mpsc::Sender<PreviewMsg<HttpResponder>>,
    pub stale_after: Duration,
    pub replies: PendingReplies,
}

impl ContentRoute {
    /// Hand a `/content` request to the preview actor.
    pub fn submit(&self, request: Request) {
        let version = requested_version(request.url());
        let responder = HttpResponder::new(request, self.stale_after, self.replies.clone());
        let waiter = Waiter::new(responder, version);

        if let Err(mpsc::error::SendError(msg)) = self.tx.blocking_send(PreviewMsg::Content(waiter))
        {
            // Actor already stopped
            if let PreviewMsg::Content(waiter) = msg {
                waiter
                    .into_responder()
                    .send(Reply::Reject(Rejection::ShuttingDown));
            }
        }
    }
}

/// Version the client already has, from `?version=N`.
///
/// Missing or malformed values count as 0, which asks for whatever is
/// current.
pub fn requested_version(url: &str) -> Version {
    let query = url.split_once('?').map_or("", |(_, query)| query);
    url::form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key == "version")
        .map_or(Version::ZERO, |(_, value)| Version::parse(&value))
}
