//! Server lifecycle management.

use crate::{
    actor::{PreviewActor, PreviewMsg, watch::FileWatcher},
    config::ServeConfig,
    core::register_server,
    log,
};
use anyhow::{Context, Result};
use crossbeam::channel::{Receiver, Sender};
use std::{
    net::SocketAddr,
    sync::Arc,
    thread::{self, JoinHandle},
    time::Duration,
};
use tiny_http::Server;
use tokio::sync::mpsc;

use super::content::{HttpResponder, PendingReplies};

/// Maximum number of port binding attempts.
const MAX_PORT_RETRIES: u16 = 10;

/// Bind to the specified interface and port, with automatic port retry.
pub fn bind_with_retry(
    interface: std::net::IpAddr,
    base_port: u16,
) -> Result<(Server, SocketAddr)> {
    let mut offset = 0;
    loop {
        let port = base_port.saturating_add(offset);
        let addr = SocketAddr::new(interface, port);

        match Server::http(addr) {
            Ok(server) => {
                if offset > 0 {
                    log!("serve"; "port {} in use, using {} instead", base_port, port);
                }
                return Ok((server, addr));
            }
            Err(_) if offset + 1 < MAX_PORT_RETRIES => offset += 1,
            Err(e) => {
                return Err(anyhow::anyhow!(
                    "Failed to bind after {} attempts (ports {}-{}): {}",
                    MAX_PORT_RETRIES,
                    base_port,
                    port,
                    e
                ));
            }
        }
    }
}

/// Register server for graceful shutdown.
///
/// When Ctrl+C is pressed, the handler set up in main() unblocks the server
/// and notifies the actor.
pub fn register_server_for_shutdown(server: Arc<Server>, shutdown_tx: Sender<()>) {
    register_server(server, shutdown_tx);
}

/// Spawn the preview actor on its own tokio runtime thread.
pub fn spawn_actor(
    rx: mpsc::Receiver<PreviewMsg<HttpResponder>>,
    watcher: FileWatcher,
    serve: &ServeConfig,
    shutdown_rx: Receiver<()>,
    replies: PendingReplies,
) -> Result<JoinHandle<()>> {
    let rt = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
        .context("Failed to create tokio runtime")?;

    let actor = PreviewActor::new(rx, watcher, serve.queue_capacity)
        .with_poll_interval(serve.poll_period())
        .with_shutdown_signal(shutdown_rx);

    Ok(thread::spawn(move || {
        rt.block_on(async {
            actor.run().await;
            // Unstarted blocking tasks are cancelled when the runtime drops
            replies.flush().await;
        });
    }))
}

/// Wait for the actor to shut down gracefully (max 2 seconds).
pub fn wait_for_shutdown(handle: JoinHandle<()>) {
    for _ in 0..40 {
        if handle.is_finished() {
            let _ = handle.join();
            return;
        }
        thread::sleep(Duration::from_millis(50));
    }
    log!("serve"; "preview actor did not stop in time");
}
