//! `[serve]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [serve]
//! interface = "127.0.0.1"     # Network interface (127.0.0.1 = localhost only)
//! port = 8080                 # HTTP port number
//! poll_interval = 1000        # Milliseconds between file checks
//! queue_capacity = 100        # Clients allowed to wait at once
//! stale_after = 120           # Seconds before a waiting client counts as gone
//! ```
//!
//! Use `interface = "0.0.0.0"` to make the preview reachable from the LAN.

use std::net::{IpAddr, Ipv4Addr};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::actor::broadcast::DEFAULT_QUEUE_CAPACITY;
use crate::actor::preview::DEFAULT_POLL_INTERVAL;

/// Preview server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServeConfig {
    /// Network interface to bind.
    pub interface: IpAddr,

    /// HTTP port number.
    pub port: u16,

    /// Milliseconds between modification time checks.
    pub poll_interval: u64,

    /// Maximum number of clients waiting for the next version.
    pub queue_capacity: usize,

    /// Seconds after which a waiting client may be evicted to make room.
    ///
    /// The HTTP server cannot see disconnects, so a long wait stands in for
    /// a cancelled request.
    pub stale_after: u64,
}

impl Default for ServeConfig {
    fn default() -> Self {
        Self {
            interface: IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1)),
            port: 8080,
            poll_interval: DEFAULT_POLL_INTERVAL.as_millis() as u64,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            stale_after: 120,
        }
    }
}

impl ServeConfig {
    pub fn poll_period(&self) -> Duration {
        Duration::from_millis(self.poll_interval)
    }

    pub fn stale_timeout(&self) -> Duration {
        Duration::from_secs(self.stale_after)
    }

    /// Collect problems instead of stopping at the first one.
    pub(crate) fn validate(&self, problems: &mut Vec<String>) {
        if self.poll_interval == 0 {
            problems.push("serve.poll_interval must be greater than 0".into());
        }
        if self.queue_capacity == 0 {
            problems.push("serve.queue_capacity must be greater than 0".into());
        }
        if self.stale_after == 0 {
            problems.push("serve.stale_after must be greater than 0".into());
        }
    }
}

#[cfg(test)]
mod tests {
    use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
    use std::time::Duration;

    use crate::config::test_parse_config;

    #[test]
    fn test_serve_config() {
        let config = test_parse_config(
            "[serve]\ninterface = \"0.0.0.0\"\nport = 9000\npoll_interval = 250\nqueue_capacity = 8\nstale_after = 30",
        );

        assert_eq!(
            config.serve.interface,
            IpAddr::V4(Ipv4Addr::new(0, 0, 0, 0))
        );
        assert_eq!(config.serve.port, 9000);
        assert_eq!(config.serve.poll_period(), Duration::from_millis(250));
        assert_eq!(config.serve.queue_capacity, 8);
        assert_eq!(config.serve.stale_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_serve_config_defaults() {
        let config = test_parse_config("");

        assert_eq!(
            config.serve.interface,
            IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1))
        );
        assert_eq!(config.serve.port, 8080);
        assert_eq!(config.serve.poll_period(), Duration::from_secs(1));
        assert_eq!(config.serve.queue_capacity, 100);
        assert_eq!(config.serve.stale_timeout(), Duration::from_secs(120));
    }

    #[test]
    fn test_serve_config_ipv6() {
        let config = test_parse_config("[serve]\ninterface = \"::1\"");
        assert_eq!(
            config.serve.interface,
            IpAddr::V6(Ipv6Addr::new(0, 0, 0, 0, 0, 0, 0, 1))
        );
    }

    #[test]
    fn test_serve_config_partial_override() {
        let config = test_parse_config("[serve]\nport = 3000");

        assert_eq!(config.serve.port, 3000);
        assert_eq!(config.serve.queue_capacity, 100);
    }

    #[test]
    fn test_serve_config_zero_values_rejected() {
        let config =
            test_parse_config("[serve]\npoll_interval = 0\nqueue_capacity = 0\nstale_after = 0");
        let mut problems = Vec::new();
        config.serve.validate(&mut problems);
        assert_eq!(problems.len(), 3);
        assert!(problems[1].contains("queue_capacity"));
    }
}
