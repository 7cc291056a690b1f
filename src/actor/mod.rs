//! Actor System for Live Preview
//!
//! A single actor owns everything that changes while serving:
//!
//! ```text
//! HTTP threads --PreviewMsg--> PreviewActor --Reply--> Responder
//!                                 |    ^
//!                         publish |    | poll (mtime)
//!                                 v    |
//!                          Broadcaster  FileWatcher
//! ```
//!
//! # Module Structure
//!
//! - `messages` - Message types sent to the actor
//! - `watch` - Modification-time polling and rendering of the file
//! - `broadcast` - Current snapshot and the bounded waiter queue
//! - `preview` - Event loop tying the two together

pub mod broadcast;
pub mod messages;
pub mod preview;
pub mod watch;

pub use messages::PreviewMsg;
pub use preview::PreviewActor;
