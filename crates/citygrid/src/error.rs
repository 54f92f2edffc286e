//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text and a process exit code.

use miette::Diagnostic;
use thiserror::Error;

use citygrid_config::ConfigError;
use citygrid_core::{CONNECTION_ERROR_MESSAGE, CoreError};

pub mod exit_code {
    #[allow(dead_code)]
    pub const SUCCESS: i32 = 0;
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const CONNECTION: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not reach the backend at {url} ({reason})")]
    #[diagnostic(
        code(citygrid::connection_failed),
        help(
            "Failed to connect to the backend server. Make sure the Flask server is running.\n\
             Point elsewhere with --backend-url or: citygrid config set backend.url <URL>"
        )
    )]
    ConnectionFailed { url: String, reason: String },

    #[error("Request timed out after {seconds}s")]
    #[diagnostic(
        code(citygrid::timeout),
        help("Increase the timeout with --timeout or check that the backend is responsive.")
    )]
    Timeout { seconds: u64 },

    // ── Resources ────────────────────────────────────────────────────
    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(citygrid::not_found),
        help("Run: citygrid {list_command} to see what exists")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    // ── Backend ──────────────────────────────────────────────────────
    #[error("Backend error: {message}")]
    #[diagnostic(code(citygrid::api_error))]
    Api {
        message: String,
        status: Option<u16>,
    },

    #[error("Simulation failed: {message}")]
    #[diagnostic(
        code(citygrid::simulation_failed),
        help("Check the reading values and that the backend accepts POST /simulate.")
    )]
    Simulation { message: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(citygrid::validation))]
    Validation { field: String, reason: String },

    #[error("'{action}' needs confirmation")]
    #[diagnostic(
        code(citygrid::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error(transparent)]
    #[diagnostic(
        code(citygrid::config),
        help("Inspect the file with: citygrid config show")
    )]
    Config(#[from] ConfigError),

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    #[diagnostic(code(citygrid::io))]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON: {0}")]
    #[diagnostic(code(citygrid::json), help("Check the JSON input and try again."))]
    Json(#[from] serde_json::Error),

    #[error("YAML output failed: {0}")]
    #[diagnostic(code(citygrid::yaml))]
    Yaml(#[from] serde_yaml::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } | Self::Timeout { .. } => exit_code::CONNECTION,
            Self::NotFound { .. } | Self::Api {
                status: Some(404), ..
            } => exit_code::NOT_FOUND,
            Self::Validation { .. } | Self::NonInteractiveRequiresYes { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Connection { url, reason } => CliError::ConnectionFailed { url, reason },

            CoreError::Timeout { timeout_secs } => CliError::Timeout {
                seconds: timeout_secs,
            },

            CoreError::NotConnected => CliError::ConnectionFailed {
                url: "(stopped)".into(),
                reason: CONNECTION_ERROR_MESSAGE.into(),
            },

            CoreError::DeviceNotFound { identifier } => CliError::NotFound {
                resource_type: "device".into(),
                identifier,
                list_command: "devices list".into(),
            },

            CoreError::VlanNotFound { id } => CliError::NotFound {
                resource_type: "VLAN".into(),
                identifier: id.to_string(),
                list_command: "vlans list".into(),
            },

            CoreError::DuplicateVlan { id, existing } => CliError::Validation {
                field: "vlan".into(),
                reason: format!("id {id} is already used by '{existing}'"),
            },

            CoreError::InvalidRules { message } => CliError::Validation {
                field: "rules".into(),
                reason: message,
            },

            CoreError::ValidationFailed { message } => CliError::Validation {
                field: "input".into(),
                reason: message,
            },

            CoreError::Simulation { message } => CliError::Simulation { message },

            CoreError::Api { message, status } => CliError::Api { message, status },

            CoreError::Config { message } => CliError::Validation {
                field: "backend url".into(),
                reason: message,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_by_category() {
        let conn: CliError = CoreError::Connection {
            url: "http://localhost:5000/api/devices".into(),
            reason: "refused".into(),
        }
        .into();
        assert_eq!(conn.exit_code(), exit_code::CONNECTION);

        let missing: CliError = CoreError::VlanNotFound { id: 99 }.into();
        assert_eq!(missing.exit_code(), exit_code::NOT_FOUND);

        let bad: CliError = CoreError::InvalidRules {
            message: "empty".into(),
        }
        .into();
        assert_eq!(bad.exit_code(), exit_code::USAGE);

        let api: CliError = CoreError::Api {
            message: "HTTP 500".into(),
            status: Some(500),
        }
        .into();
        assert_eq!(api.exit_code(), exit_code::GENERAL);
    }
}
