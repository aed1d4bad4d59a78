// Shared transport configuration for building reqwest::Client instances.
//
// Every DeviceClient in a process can share one reqwest::Client; the
// per-operation bounds live in RequestTimeouts and are applied per request
// rather than on the client, so one slow call never changes another's bound.

use std::time::Duration;

const USER_AGENT: &str = concat!("wledly/", env!("CARGO_PKG_VERSION"));

/// Per-operation request bounds.
///
/// Defaults follow how critical each call is: the online probe has to be
/// snappy, the rest get a little more room on congested Wi-Fi.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestTimeouts {
    /// `GET /json/info`
    pub info: Duration,
    /// `GET /json/state`
    pub state: Duration,
    /// `POST /json/state`
    pub command: Duration,
    /// `GET /presets.json`
    pub presets: Duration,
    /// `is_online()` and the registry's name probe.
    pub probe: Duration,
}

impl Default for RequestTimeouts {
    fn default() -> Self {
        Self {
            info: Duration::from_millis(1500),
            state: Duration::from_millis(1500),
            command: Duration::from_millis(1500),
            presets: Duration::from_millis(1500),
            probe: Duration::from_millis(500),
        }
    }
}

impl RequestTimeouts {
    /// Use one bound for everything except the probe.
    pub fn uniform(request: Duration, probe: Duration) -> Self {
        Self {
            info: request,
            state: request,
            command: request,
            presets: request,
            probe,
        }
    }
}

/// Shared transport configuration for building HTTP clients.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// Upper bound on establishing the TCP connection. Request timeouts
    /// still cap the total.
    pub connect_timeout: Duration,
    pub timeouts: RequestTimeouts,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(2),
            timeouts: RequestTimeouts::default(),
        }
    }
}

impl TransportConfig {
    /// Build a `reqwest::Client` from this config.
    ///
    /// Idle connections are not kept: each command is a single request and
    /// devices are cheap to reconnect to.
    pub fn build_client(&self) -> Result<reqwest::Client, crate::error::Error> {
        reqwest::Client::builder()
            .connect_timeout(self.connect_timeout)
            .pool_max_idle_per_host(0)
            .user_agent(USER_AGENT)
            .build()
            .map_err(crate::error::Error::ClientBuild)
    }
}
