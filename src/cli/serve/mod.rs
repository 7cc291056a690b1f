//! Live preview server.
//!
//! | Route                 | Response                                   |
//! |-----------------------|--------------------------------------------|
//! | `/`, `/preview`       | preview page (embedded)                    |
//! | `/content?version=N`  | long-poll: `"<version>\n<html>"` or error  |
//! | anything else         | 404                                        |
//!
//! The request loop only routes; `/content` requests are owned and answered
//! by the preview actor.

mod content;
mod lifecycle;
mod response;

use crate::{
    actor::watch::FileWatcher,
    cli::ServeArgs,
    config::{BasimarkConfig, cfg},
    debug, log,
};
use anyhow::Result;
use content::{ContentRoute, PendingReplies};
use crossbeam::channel;
use std::sync::Arc;
use tiny_http::{Request, Server};
use tokio::sync::mpsc;

/// Requests buffered between the server thread and the actor.
const CHANNEL_CAPACITY: usize = 256;

/// Watch `args`' file and serve its preview until Ctrl+C.
pub fn serve(args: &ServeArgs, config: &BasimarkConfig) -> Result<()> {
    let path = args.watched_file();
    let autolinks = config.convert.autolinks(&args.autolinks)?;
    debug!("serve"; "autolink prefixes: {:?}", autolinks.prefixes());

    let mut watcher = FileWatcher::new(&path, autolinks);
    if let Some(item) = &args.item {
        watcher = watcher.with_item(item.as_str());
    }

    if !path.exists() {
        log!("watch"; "{} does not exist yet, waiting for it", path.display());
    }

    let title = page_title(&path, args.item.as_deref());
    bind_server()?.run(watcher, title)
}

/// Title shown by the preview page.
fn page_title(path: &std::path::Path, item: Option<&str>) -> String {
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    match item.filter(|item| !item.is_empty()) {
        Some(item) => format!("{name} #{item}"),
        None => name,
    }
}

/// Bound server ready to accept requests
pub struct BoundServer {
    server: Arc<Server>,
    shutdown_rx: channel::Receiver<()>,
}

/// Bind the HTTP server without starting the request loop
pub fn bind_server() -> Result<BoundServer> {
    let config = cfg();
    let (server, addr) = lifecycle::bind_with_retry(config.serve.interface, config.serve.port)?;
    let server = Arc::new(server);

    let (shutdown_tx, shutdown_rx) = channel::unbounded::<()>();
    lifecycle::register_server_for_shutdown(Arc::clone(&server), shutdown_tx);

    log!("serve"; "preview available at http://{}/preview", addr);

    Ok(BoundServer {
        server,
        shutdown_rx,
    })
}

impl BoundServer {
    /// Start the actor and the request loop (blocking).
    pub fn run(self, watcher: FileWatcher, title: String) -> Result<()> {
        let config = cfg();
        let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);
        let replies = PendingReplies::default();

        let actor =
            lifecycle::spawn_actor(rx, watcher, &config.serve, self.shutdown_rx, replies.clone())?;
        let content = ContentRoute {
            tx,
            stale_after: config.serve.stale_timeout(),
            replies,
        };
        run_request_loop(&self.server, &content, &title);

        // Closing the channel stops the actor even without Ctrl+C
        drop(content);
        lifecycle::wait_for_shutdown(actor);
        Ok(())
    }
}

fn run_request_loop(server: &Server, content: &ContentRoute, title: &str) {
    for request in server.incoming_requests() {
        if let Err(e) = handle_request(request, content, title) {
            log!("serve"; "request error: {e}");
        }
    }
}

/// Handle a single HTTP request
fn handle_request(request: Request, content: &ContentRoute, title: &str) -> Result<()> {
    if crate::core::is_shutdown() {
        return response::respond_unavailable(request);
    }

    match Route::of(request.url()) {
        Route::Preview => response::respond_preview(request, title),
        Route::Content => {
            content.submit(request);
            Ok(())
        }
        Route::NotFound => response::respond_not_found(request),
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Route {
    Preview,
    Content,
    NotFound,
}

impl Route {
    fn of(url: &str) -> Self {
        let path = url.split_once('?').map_or(url, |(path, _)| path);
        match path {
            "/" | "/preview" => Self::Preview,
            "/content" => Self::Content,
            _ => Self::NotFound,
        }
    }
}
