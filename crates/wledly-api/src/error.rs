use thiserror::Error;

/// Top-level error type for the `wledly-api` crate.
///
/// Every request against a device fails in exactly one of these ways.
/// `wledly-core` maps them into per-device dispatch outcomes.
#[derive(Debug, Error)]
pub enum Error {
    // ── Transport ───────────────────────────────────────────────────
    /// Connection refused, DNS failure, reset mid-body, etc.
    #[error("Device at {address} is unreachable: {source}")]
    Unreachable {
        address: String,
        #[source]
        source: reqwest::Error,
    },

    /// The per-request bound elapsed before the device answered.
    #[error("Request to {address} timed out after {timeout_ms}ms")]
    Timeout { address: String, timeout_ms: u64 },

    /// Failed to construct the underlying HTTP client.
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ── Device API ──────────────────────────────────────────────────
    /// The device answered with a non-2xx status.
    #[error("Device at {address} returned HTTP {status}")]
    HttpStatus { address: String, status: u16 },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Unexpected response from {address}: {message}")]
    Deserialization {
        address: String,
        message: String,
        body: String,
    },
}
