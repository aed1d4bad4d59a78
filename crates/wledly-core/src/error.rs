// ── Core error types ──
//
// Errors surfaced by wledly-core. Device-level failures are normally
// captured as per-device dispatch outcomes; only caller/input problems and
// persistence failures are returned as request-level errors.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Device errors ────────────────────────────────────────────────
    #[error("Cannot reach controller at {address}: {reason}")]
    Unreachable { address: String, reason: String },

    #[error("Controller at {address} timed out after {timeout_ms}ms")]
    Timeout { address: String, timeout_ms: u64 },

    #[error("Controller at {address} returned HTTP {status}")]
    HttpError { address: String, status: u16 },

    #[error("Controller at {address} sent an unexpected response: {message}")]
    InvalidResponse { address: String, message: String },

    // ── Caller errors ────────────────────────────────────────────────
    #[error("Unknown controller: {id}")]
    InvalidTarget { id: String },

    #[error("Invalid command: {message}")]
    InvalidCommand { message: String },

    #[error("No controllers to send to")]
    NoTargets,

    // ── Persistence ──────────────────────────────────────────────────
    #[error("Controller list could not be persisted: {message}")]
    Persistence { message: String },

    // ── Discovery ────────────────────────────────────────────────────
    #[error("mDNS query failed: {message}")]
    Discovery { message: String },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<wledly_api::Error> for CoreError {
    fn from(err: wledly_api::Error) -> Self {
        match err {
            wledly_api::Error::Unreachable { address, source } => CoreError::Unreachable {
                address,
                reason: source.to_string(),
            },
            wledly_api::Error::Timeout {
                address,
                timeout_ms,
            } => CoreError::Timeout {
                address,
                timeout_ms,
            },
            wledly_api::Error::HttpStatus { address, status } => {
                CoreError::HttpError { address, status }
            }
            wledly_api::Error::Deserialization {
                address,
                message,
                body: _,
            } => CoreError::InvalidResponse { address, message },
            wledly_api::Error::InvalidUrl(e) => CoreError::InvalidCommand {
                message: format!("invalid controller address: {e}"),
            },
            wledly_api::Error::ClientBuild(e) => CoreError::Internal(e.to_string()),
        }
    }
}
