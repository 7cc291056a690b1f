//! Global config handle.
//!
//! Uses `arc-swap` for lock-free reads from the server thread and the
//! actor runtime.

use crate::config::BasimarkConfig;
use arc_swap::ArcSwap;
use std::sync::{Arc, LazyLock};

/// Global config storage.
pub static CONFIG: LazyLock<ArcSwap<BasimarkConfig>> =
    LazyLock::new(|| ArcSwap::from_pointee(BasimarkConfig::default()));

#[inline]
pub fn cfg() -> Arc<BasimarkConfig> {
    CONFIG.load_full()
}

#[inline]
pub fn init_config(config: BasimarkConfig) -> Arc<BasimarkConfig> {
    let arc = Arc::new(config);
    CONFIG.store(Arc::clone(&arc));
    arc
}
