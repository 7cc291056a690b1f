//! HTTP response handlers.

use std::io::Cursor;
use std::sync::Arc;

use anyhow::Result;
use tiny_http::{Header, Method, Request, Response, StatusCode};

use crate::embed::serve::{PREVIEW_HTML, PreviewVars};

/// Content types used by the preview server.
pub mod mime {
    pub const HTML: &str = "text/html; charset=utf-8";
    pub const PLAIN: &str = "text/plain; charset=utf-8";
}

/// Respond with the live preview page.
pub fn respond_preview(request: Request, title: &str) -> Result<()> {
    if is_head_request(&request) {
        return send_head(request, 200, mime::HTML);
    }
    let body = PREVIEW_HTML.render(&PreviewVars {
        title: title.to_owned(),
    });
    send_body(request, 200, mime::HTML, body.into_bytes())
}

/// Respond with 404 Not Found.
pub fn respond_not_found(request: Request) -> Result<()> {
    if is_head_request(&request) {
        return send_head(request, 404, mime::PLAIN);
    }
    send_body(request, 404, mime::PLAIN, b"404 Not Found\n".to_vec())
}

/// Respond with 503 Service Unavailable (server shutting down).
pub fn respond_unavailable(request: Request) -> Result<()> {
    send_body(request, 503, mime::PLAIN, b"Server is shutting down.\n".to_vec())
}

/// Build a long-poll reply around a shared snapshot body, without copying it.
pub fn shared_body(body: &Arc<[u8]>) -> Response<Cursor<Arc<[u8]>>> {
    let length = body.len();
    Response::new(
        StatusCode(200),
        vec![
            make_header("Content-Type", mime::PLAIN),
            make_header("Cache-Control", "no-store"),
        ],
        Cursor::new(Arc::clone(body)),
        Some(length),
        None,
    )
}

/// Build a one-line plain text error reply.
pub fn status_line(status: u16, message: &str) -> Response<Cursor<Vec<u8>>> {
    Response::from_data(format!("{message}\n").into_bytes())
        .with_status_code(StatusCode(status))
        .with_header(make_header("Content-Type", mime::PLAIN))
        .with_header(make_header("Cache-Control", "no-store"))
}

fn is_head_request(request: &Request) -> bool {
    request.method() == &Method::Head
}

fn send_head(request: Request, status: u16, content_type: &'static str) -> Result<()> {
    let response =
        Response::empty(StatusCode(status)).with_header(make_header("Content-Type", content_type));
    request.respond(response)?;
    Ok(())
}

fn send_body(
    request: Request,
    status: u16,
    content_type: &'static str,
    body: Vec<u8>,
) -> Result<()> {
    let response = Response::from_data(body)
        .with_status_code(StatusCode(status))
        .with_header(make_header("Content-Type", content_type));
    request.respond(response)?;
    Ok(())
}

fn make_header(key: &'static str, value: &'static str) -> Header {
    // Both parts are static ASCII
    Header::from_bytes(key, value).unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shared_body_does_not_copy() {
        let body: Arc<[u8]> = Arc::from(&b"42\n<p>x</p>"[..]);
        let response = shared_body(&body);

        assert_eq!(response.status_code().0, 200);
        assert_eq!(response.data_length(), Some(body.len()));
        assert_eq!(Arc::strong_count(&body), 2);

        drop(response);
        assert_eq!(Arc::strong_count(&body), 1);
    }

    #[test]
    fn test_status_line() {
        let response = status_line(503, "Too many pending requests.");
        assert_eq!(response.status_code().0, 503);
        assert_eq!(
            response.data_length(),
            Some("Too many pending requests.\n".len())
        );
    }
}
