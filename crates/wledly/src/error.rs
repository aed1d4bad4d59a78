//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text and stable exit codes.

use miette::Diagnostic;
use thiserror::Error;

use wledly_config::ConfigError;
use wledly_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const NOT_FOUND: i32 = 4;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
    pub const DISPATCH: i32 = 9;
    pub const PERSISTENCE: i32 = 10;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Device ───────────────────────────────────────────────────────
    #[error("Could not reach controller at {address}")]
    #[diagnostic(
        code(wledly::connection_failed),
        help(
            "Check that the controller is powered and on this network.\n\
             Reason: {reason}"
        )
    )]
    ConnectionFailed { address: String, reason: String },

    #[error("Controller at {address} did not answer within {timeout_ms}ms")]
    #[diagnostic(
        code(wledly::timeout),
        help("Raise the bound with --timeout-ms or check the controller's Wi-Fi signal.")
    )]
    Timeout { address: String, timeout_ms: u64 },

    #[error("Controller at {address} rejected the request: {message}")]
    #[diagnostic(code(wledly::device_error))]
    DeviceError { address: String, message: String },

    #[error("{failed} of {total} controllers failed")]
    #[diagnostic(
        code(wledly::dispatch_failed),
        help("Run with -v to see which controllers failed and why.")
    )]
    DispatchFailed { failed: usize, total: usize },

    // ── Registry ─────────────────────────────────────────────────────
    #[error("Controller '{identifier}' not found")]
    #[diagnostic(
        code(wledly::not_found),
        help("Run: wledly controllers list to see registered controllers")
    )]
    NotFound { identifier: String },

    #[error("No controllers to send to")]
    #[diagnostic(
        code(wledly::no_targets),
        help(
            "Name controllers explicitly or pass --all.\n\
             Register controllers with: wledly controllers add <address>  or  wledly scan --add"
        )
    )]
    NoTargets,

    #[error("Controller list was not saved: {message}")]
    #[diagnostic(
        code(wledly::persistence),
        help("The change was rolled back. Check permissions on the settings file.")
    )]
    Persistence { message: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(wledly::validation))]
    Validation { field: String, reason: String },

    #[error("Destructive operation '{action}' requires confirmation")]
    #[diagnostic(
        code(wledly::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Configuration error: {0}")]
    #[diagnostic(
        code(wledly::config),
        help("Inspect the effective configuration with: wledly config show")
    )]
    Config(String),

    #[error("Config file already exists at {path}")]
    #[diagnostic(code(wledly::config_exists), help("Pass --force to overwrite it."))]
    ConfigExists { path: String },

    // ── Other ────────────────────────────────────────────────────────
    #[error("Discovery failed: {message}")]
    #[diagnostic(code(wledly::discovery))]
    Discovery { message: String },

    #[error("Internal error: {0}")]
    #[diagnostic(code(wledly::internal))]
    Internal(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::DispatchFailed { .. } => exit_code::DISPATCH,
            Self::NotFound { .. } | Self::NoTargets => exit_code::NOT_FOUND,
            Self::Persistence { .. } => exit_code::PERSISTENCE,
            Self::Validation { .. } | Self::NonInteractiveRequiresYes { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Unreachable { address, reason } => {
                CliError::ConnectionFailed { address, reason }
            }

            CoreError::Timeout {
                address,
                timeout_ms,
            } => CliError::Timeout {
                address,
                timeout_ms,
            },

            CoreError::HttpError { address, status } => CliError::DeviceError {
                address,
                message: format!("HTTP {status}"),
            },

            CoreError::InvalidResponse { address, message } => {
                CliError::DeviceError { address, message }
            }

            CoreError::InvalidTarget { id } => CliError::NotFound { identifier: id },

            CoreError::InvalidCommand { message } => CliError::Validation {
                field: "command".into(),
                reason: message,
            },

            CoreError::NoTargets => CliError::NoTargets,

            CoreError::Persistence { message } => CliError::Persistence { message },

            CoreError::Discovery { message } => CliError::Discovery { message },

            CoreError::Config { message } => CliError::Config(message),

            CoreError::Internal(message) => CliError::Internal(message),
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            ConfigError::Io(e) => CliError::Io(e),
            other => CliError::Config(other.to_string()),
        }
    }
}
