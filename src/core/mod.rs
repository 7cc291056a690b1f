//! Process-wide state shared by the server thread and the actor runtime.

mod state;

pub use state::{is_shutdown, register_server, setup_shutdown_handler};
