//! Configuration section definitions.
//!
//! Each module corresponds to a section in `basimark.toml`:
//!
//! | Module    | TOML Section | Purpose                               |
//! |-----------|--------------|---------------------------------------|
//! | `convert` | `[convert]`  | Autolink prefixes                     |
//! | `serve`   | `[serve]`    | Preview server and long-poll limits   |

mod convert;
mod serve;

pub use convert::ConvertConfig;
pub use serve::ServeConfig;
