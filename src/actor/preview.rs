//! Preview Actor - owns the watched file and the waiting clients.
//!
//! Every loop iteration checks the file and then waits for whichever comes
//! first: an incoming request or the poll interval. All snapshot and queue
//! mutation happens inside this loop, so no locks are needed and a published
//! snapshot reaches every queued waiter before the next request is looked at.

use std::time::Duration;

use crossbeam::channel::Receiver;
use tokio::sync::mpsc;

use super::broadcast::{Broadcaster, Outcome, Rejection, Reply, Responder, Waiter};
use super::messages::PreviewMsg;
use super::watch::FileWatcher;
use crate::logger::{status_error, status_success};

/// Default interval between modification time checks.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

pub struct PreviewActor<R> {
    rx: mpsc::Receiver<PreviewMsg<R>>,
    watcher: FileWatcher,
    broadcaster: Broadcaster<R>,
    poll_interval: Duration,
    shutdown_rx: Option<Receiver<()>>,
    /// Last reported watch error, to avoid repeating it every tick
    last_error: Option<String>,
}

impl<R: Responder> PreviewActor<R> {
    pub fn new(rx: mpsc::Receiver<PreviewMsg<R>>, watcher: FileWatcher, capacity: usize) -> Self {
        Self {
            rx,
            watcher,
            broadcaster: Broadcaster::new(capacity),
            poll_interval: DEFAULT_POLL_INTERVAL,
            shutdown_rx: None,
            last_error: None,
        }
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Set shutdown signal receiver.
    pub fn with_shutdown_signal(mut self, rx: Receiver<()>) -> Self {
        self.shutdown_rx = Some(rx);
        self
    }

    /// Run the actor event loop until shutdown or until all senders are gone.
    pub async fn run(mut self) {
        loop {
            if self.shutdown_requested() {
                crate::debug!("preview"; "shutdown signal received");
                break;
            }

            self.poll_file();

            tokio::select! {
                msg = self.rx.recv() => match msg {
                    Some(PreviewMsg::Content(waiter)) => self.handle_content(waiter),
                    Some(PreviewMsg::Shutdown) | None => break,
                },
                _ = tokio::time::sleep(self.poll_interval) => {}
            }
        }

        let mut failed = self.broadcaster.shutdown();

        // Requests still buffered in the channel are owed an answer too
        self.rx.close();
        while let Ok(msg) = self.rx.try_recv() {
            if let PreviewMsg::Content(waiter) = msg {
                waiter
                    .into_responder()
                    .send(Reply::Reject(Rejection::ShuttingDown));
                failed += 1;
            }
        }
        crate::debug!("preview"; "stopped, {} pending request(s) failed", failed);
    }

    fn shutdown_requested(&self) -> bool {
        self.shutdown_rx
            .as_ref()
            .is_some_and(|rx| rx.try_recv().is_ok())
    }

    fn poll_file(&mut self) {
        match self.watcher.poll() {
            Ok(Some(snapshot)) => {
                let version = snapshot.version();
                let bytes = snapshot.html().len();
                let released = self.broadcaster.publish(snapshot);
                self.last_error = None;
                status_success(&format!(
                    "rendered {} (version {}, {} bytes, {} waiting)",
                    self.watcher.path().display(),
                    version,
                    bytes,
                    released
                ));
            }
            Ok(None) => {}
            Err(e) => {
                let detail = format!("{:#}", anyhow::Error::from(e));
                if self.last_error.as_deref() != Some(detail.as_str()) {
                    status_error("render failed, serving last good version", &detail);
                    self.last_error = Some(detail);
                }
            }
        }
    }

    fn handle_content(&mut self, waiter: Waiter<R>) {
        let requested = waiter.requested();
        let outcome = self.broadcaster.submit(waiter);
        match outcome {
            Outcome::Rejected(rejection) => {
                crate::debug!(
                    "preview";
                    "version {} rejected (current {}): {}",
                    requested,
                    self.broadcaster.current().version(),
                    rejection
                );
            }
            Outcome::QueuedAfterEviction => {
                crate::debug!(
                    "preview";
                    "evicted an abandoned waiter, {} waiting",
                    self.broadcaster.pending()
                );
            }
            Outcome::Queued => {
                crate::debug!("preview"; "{} waiting", self.broadcaster.pending());
            }
            Outcome::Served => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use std::fs::{self, File};
    use std::path::Path;
    use std::time::{Duration, SystemTime};

    use tempfile::TempDir;

    use super::*;
    use crate::actor::broadcast::testing::{Probes, Received};
    use crate::actor::broadcast::{Version, DEFAULT_QUEUE_CAPACITY};
    use crate::convert::Autolinks;

    const TICK: Duration = Duration::from_millis(20);
    const WAIT: Duration = Duration::from_secs(5);

    /// Write `content` with a fixed mtime, returning that mtime in nanoseconds.
    fn touch(path: &Path, content: &str, secs: u64) -> i64 {
        let mtime = SystemTime::UNIX_EPOCH + Duration::from_secs(secs);
        fs::write(path, content).unwrap();
        File::options()
            .write(true)
            .open(path)
            .unwrap()
            .set_modified(mtime)
            .unwrap();
        secs as i64 * 1_000_000_000
    }

    fn body(nanos: i64, markdown_line: &str) -> Received {
        Received::Body(format!(
            "{}\n<div style=max-width:50em><p>{markdown_line}\n</p></div>\n",
            Version::new(nanos)
        ))
    }

    #[tokio::test]
    async fn test_long_poll_cycle() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("notes");
        let v1 = touch(&path, "one", 100);

        let (tx, rx) = mpsc::channel(8);
        let watcher = FileWatcher::new(&path, Autolinks::none());
        let actor = PreviewActor::new(rx, watcher, DEFAULT_QUEUE_CAPACITY).with_poll_interval(TICK);
        let handle = tokio::spawn(actor.run());

        let mut probes = Probes::new();

        // A fresh client gets the current rendering right away.
        let (first, waiter, _) = probes.waiter(0);
        tx.send(PreviewMsg::Content(waiter)).await.ok().unwrap();
        let reply = tokio::time::timeout(WAIT, probes.next()).await.unwrap();
        assert_eq!(reply, Some((first, body(v1, "one"))));

        // An up-to-date client waits for the next change.
        let (second, waiter, _) = probes.waiter(v1);
        tx.send(PreviewMsg::Content(waiter)).await.ok().unwrap();
        tokio::time::sleep(TICK * 3).await;
        assert_eq!(probes.try_next(), None);

        let v2 = touch(&path, "two", 200);
        let reply = tokio::time::timeout(WAIT, probes.next()).await.unwrap();
        assert_eq!(reply, Some((second, body(v2, "two"))));

        tx.send(PreviewMsg::Shutdown).await.ok().unwrap();
        tokio::time::timeout(WAIT, handle).await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn test_shutdown_fails_waiters() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("notes");
        let v1 = touch(&path, "one", 100);

        let (tx, rx) = mpsc::channel(8);
        let watcher = FileWatcher::new(&path, Autolinks::none());
        let actor = PreviewActor::new(rx, watcher, DEFAULT_QUEUE_CAPACITY).with_poll_interval(TICK);
        let handle = tokio::spawn(actor.run());

        let mut probes = Probes::new();
        let (id, waiter, _) = probes.waiter(0);
        tx.send(PreviewMsg::Content(waiter)).await.ok().unwrap();
        tokio::time::timeout(WAIT, probes.next()).await.unwrap();

        let (waiting, waiter, _) = probes.waiter(v1);
        assert_ne!(id, waiting);
        tx.send(PreviewMsg::Content(waiter)).await.ok().unwrap();
        drop(tx);

        tokio::time::timeout(WAIT, handle).await.unwrap().unwrap();
        assert_eq!(
            probes.try_next(),
            Some((waiting, Received::Status(503, "Server is shutting down.".into())))
        );
    }

    #[tokio::test]
    async fn test_buffered_requests_answered_on_shutdown() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("notes");
        touch(&path, "one", 100);

        let (tx, rx) = mpsc::channel(8);
        let watcher = FileWatcher::new(&path, Autolinks::none());
        let actor = PreviewActor::new(rx, watcher, DEFAULT_QUEUE_CAPACITY).with_poll_interval(TICK);

        // Queued before the actor runs, behind the shutdown message
        let mut probes = Probes::new();
        tx.send(PreviewMsg::Shutdown).await.ok().unwrap();
        let (first, waiter, _) = probes.waiter(0);
        tx.send(PreviewMsg::Content(waiter)).await.ok().unwrap();
        let (second, waiter, _) = probes.waiter(0);
        tx.send(PreviewMsg::Content(waiter)).await.ok().unwrap();

        tokio::time::timeout(WAIT, tokio::spawn(actor.run()))
            .await
            .unwrap()
            .unwrap();

        let shutting_down = Received::Status(503, "Server is shutting down.".into());
        assert_eq!(
            probes.drain(),
            [(first, shutting_down.clone()), (second, shutting_down)]
        );
        assert!(tx.is_closed());
    }

    #[tokio::test]
    async fn test_shutdown_signal_stops_actor() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("notes");
        touch(&path, "one", 100);

        let (_tx, rx) = mpsc::channel::<PreviewMsg<crate::actor::broadcast::testing::Probe>>(8);
        let (shutdown_tx, shutdown_rx) = crossbeam::channel::unbounded();
        let watcher = FileWatcher::new(&path, Autolinks::none());
        let actor = PreviewActor::new(rx, watcher, 4)
            .with_poll_interval(TICK)
            .with_shutdown_signal(shutdown_rx);
        let handle = tokio::spawn(actor.run());

        shutdown_tx.send(()).unwrap();
        tokio::time::timeout(WAIT, handle).await.unwrap().unwrap();
    }
}
