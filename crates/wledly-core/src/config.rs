// ── Runtime configuration ──
//
// These types describe *how* to talk to controllers: timeouts and the
// discovery service name. They never touch disk. The CLI (or any other
// host) builds a `RuntimeConfig` and hands it in.

use std::time::Duration;

use wledly_api::{RequestTimeouts, TransportConfig};

/// mDNS service WLED firmware advertises.
pub const WLED_SERVICE: &str = "_wled._tcp.local.";

/// Configuration for one plugin instance.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Per-operation request bounds.
    pub timeouts: RequestTimeouts,
    /// TCP connect bound. Requests are still capped by `timeouts`.
    pub connect_timeout: Duration,
    /// How long a discovery scan collects responses.
    pub scan_timeout: Duration,
    /// mDNS service type to query.
    pub service: String,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            timeouts: RequestTimeouts::default(),
            connect_timeout: Duration::from_secs(2),
            scan_timeout: Duration::from_secs(4),
            service: WLED_SERVICE.into(),
        }
    }
}

impl RuntimeConfig {
    pub fn transport(&self) -> TransportConfig {
        TransportConfig {
            connect_timeout: self.connect_timeout,
            timeouts: self.timeouts,
        }
    }
}
