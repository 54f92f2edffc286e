// ── Core error types ──
//
// User-facing errors from citygrid-core. Consumers never see HTTP status
// codes or JSON parse failures directly. The `From<citygrid_api::Error>`
// impl translates transport-layer errors into domain-appropriate variants.

use thiserror::Error;

use crate::model::VlanId;

/// Banner text shown whenever a poll cycle cannot reach the backend.
pub const CONNECTION_ERROR_MESSAGE: &str =
    "Failed to connect to the backend server. Make sure the Flask server is running.";

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error(
        "Failed to connect to the backend server. Make sure the Flask server is running. ({reason})"
    )]
    Connection { url: String, reason: String },

    #[error("Backend request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    #[error("Remote sync is not running")]
    NotConnected,

    // ── Data errors ──────────────────────────────────────────────────
    #[error("Device not found: {identifier}")]
    DeviceNotFound { identifier: String },

    #[error("VLAN not found: {id}")]
    VlanNotFound { id: VlanId },

    #[error("VLAN id {id} is already in use by '{existing}'")]
    DuplicateVlan { id: VlanId, existing: String },

    #[error("Invalid rules: {message}")]
    InvalidRules { message: String },

    #[error("Validation failed: {message}")]
    ValidationFailed { message: String },

    // ── Operation errors ─────────────────────────────────────────────
    #[error("Simulation failed: {message}")]
    Simulation { message: String },

    // ── API errors (wrapped, not exposed raw) ────────────────────────
    #[error("API error: {message}")]
    Api {
        message: String,
        /// HTTP status code (if applicable).
        status: Option<u16>,
    },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl CoreError {
    /// Whether this error means the backend could not be reached.
    pub fn is_connection(&self) -> bool {
        matches!(self, Self::Connection { .. } | Self::Timeout { .. })
    }

    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::DeviceNotFound { .. } | Self::VlanNotFound { .. }
        ) || matches!(self, Self::Api { status: Some(404), .. })
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<citygrid_api::Error> for CoreError {
    fn from(err: citygrid_api::Error) -> Self {
        match err {
            citygrid_api::Error::Transport(ref e) => {
                if e.is_connect() || e.is_timeout() || e.is_request() {
                    CoreError::Connection {
                        url: e.url().map(ToString::to_string).unwrap_or_default(),
                        reason: e.to_string(),
                    }
                } else {
                    CoreError::Api {
                        message: e.to_string(),
                        status: e.status().map(|s| s.as_u16()),
                    }
                }
            }
            citygrid_api::Error::Timeout { timeout_secs } => CoreError::Timeout { timeout_secs },
            citygrid_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            citygrid_api::Error::ClientBuild(message) => CoreError::Config { message },
            citygrid_api::Error::Status { status, body } => CoreError::Api {
                message: if body.is_empty() {
                    format!("HTTP {status}")
                } else {
                    format!("HTTP {status}: {body}")
                },
                status: Some(status),
            },
            citygrid_api::Error::Deserialization { message, body: _ } => CoreError::Api {
                message: format!("Unexpected response: {message}"),
                status: None,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_errors_become_api_errors() {
        let err = CoreError::from(citygrid_api::Error::Status {
            status: 404,
            body: String::new(),
        });
        assert!(matches!(err, CoreError::Api { status: Some(404), .. }));
        assert!(err.is_not_found());
        assert!(!err.is_connection());
    }

    #[test]
    fn connection_message_names_the_backend() {
        let err = CoreError::Connection {
            url: "http://localhost:5000/api/devices".into(),
            reason: "connection refused".into(),
        };
        assert!(err.to_string().starts_with(CONNECTION_ERROR_MESSAGE));
    }
}
