//! Actor Message Definitions
//!
//! ```text
//! HTTP thread --Content--> PreviewActor --Reply--> Responder
//! ```

use super::broadcast::Waiter;

/// Messages to the Preview Actor
pub enum PreviewMsg<R> {
    /// Long-poll request for the snapshot after the waiter's version
    Content(Waiter<R>),
    /// Fail pending waiters and stop
    Shutdown,
}
