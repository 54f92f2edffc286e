// ── Runtime sync configuration ──
//
// Describes how to reach the assignment backend. The CLI and the TUI build
// a `SyncConfig` from their config layer and hand it in; core never reads
// config files.

use std::time::Duration;

use citygrid_api::{DEFAULT_BASE_URL, TlsMode, TransportConfig};
use url::Url;

use crate::error::CoreError;

/// The local development backend.
pub const DEFAULT_BACKEND_URL: &str = DEFAULT_BASE_URL;

/// TLS verification strategy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// Bundled root store (strict).
    #[default]
    SystemDefaults,
    /// Skip verification (self-signed lab backends).
    DangerAcceptInvalid,
}

/// Configuration for polling a single backend.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Base URL including the `/api` prefix.
    pub url: Url,
    pub tls: TlsVerification,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Seconds between poll cycles. 0 = no background polling.
    pub poll_interval_secs: u64,
}

impl SyncConfig {
    /// Defaults: strict TLS, 10 s timeout, 5 s polling.
    pub fn new(url: Url) -> Self {
        Self {
            url,
            tls: TlsVerification::default(),
            timeout: Duration::from_secs(10),
            poll_interval_secs: 5,
        }
    }

    /// Parse `url`, or use the local development backend when `None`.
    pub fn parse(url: Option<&str>) -> Result<Self, CoreError> {
        let raw = url.unwrap_or(DEFAULT_BACKEND_URL);
        let url = Url::parse(raw).map_err(|e| CoreError::Config {
            message: format!("invalid backend URL '{raw}': {e}"),
        })?;
        Ok(Self::new(url))
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_poll_interval(mut self, secs: u64) -> Self {
        self.poll_interval_secs = secs;
        self
    }

    pub(crate) fn transport(&self) -> TransportConfig {
        let tls = match self.tls {
            TlsVerification::SystemDefaults => TlsMode::System,
            TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
        };
        TransportConfig::default()
            .with_timeout(self.timeout)
            .with_tls(tls)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn parse_defaults_to_local_backend() {
        let config = SyncConfig::parse(None).unwrap();
        assert_eq!(config.url.as_str(), "http://localhost:5000/api");
        assert_eq!(config.poll_interval_secs, 5);
        assert_eq!(config.timeout, Duration::from_secs(10));
    }

    #[test]
    fn parse_rejects_garbage() {
        let err = SyncConfig::parse(Some("not a url")).unwrap_err();
        assert!(matches!(err, CoreError::Config { .. }));
    }
}
