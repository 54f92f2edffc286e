//! Shared configuration for the citygrid CLI and TUI.
//!
//! One TOML file, layered under `CITYGRID_*` environment variables, and
//! translation to `citygrid_core::SyncConfig`. Both binaries depend on this
//! crate; the CLI adds flag-aware overrides on top.

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use citygrid_core::{SyncConfig, TlsVerification};

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("could not determine a config directory for this platform")]
    NoConfigDir,

    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration shared by CLI and TUI.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub backend: Backend,

    #[serde(default)]
    pub defaults: Defaults,

    #[serde(default)]
    pub tui: TuiSettings,

    /// Broker settings echoed on the Settings screen. Nothing connects to it.
    #[serde(default)]
    pub mqtt: Mqtt,
}

/// Where the VLAN assignment backend lives.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Backend {
    /// Base URL including the `/api` prefix.
    #[serde(default = "default_url")]
    pub url: String,

    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// 0 disables background polling.
    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u64,

    /// Accept self-signed certificates.
    #[serde(default)]
    pub insecure: bool,
}

impl Default for Backend {
    fn default() -> Self {
        Self {
            url: default_url(),
            timeout_secs: default_timeout(),
            poll_interval_secs: default_poll_interval(),
            insecure: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct TuiSettings {
    #[serde(default = "default_tick_rate")]
    pub tick_rate_ms: u64,

    #[serde(default = "default_frame_rate")]
    pub frame_rate_ms: u64,

    /// Chance per link per frame of drawing a traffic pulse.
    #[serde(default = "default_pulse_probability")]
    pub pulse_probability: f64,

    /// Fixed seed for node placement; random when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Default for TuiSettings {
    fn default() -> Self {
        Self {
            tick_rate_ms: default_tick_rate(),
            frame_rate_ms: default_frame_rate(),
            pulse_probability: default_pulse_probability(),
            seed: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Mqtt {
    #[serde(default = "default_broker")]
    pub broker: String,

    #[serde(default = "default_mqtt_port")]
    pub port: u16,

    #[serde(default = "default_topic")]
    pub topic: String,
}

impl Default for Mqtt {
    fn default() -> Self {
        Self {
            broker: default_broker(),
            port: default_mqtt_port(),
            topic: default_topic(),
        }
    }
}

fn default_url() -> String {
    citygrid_core::config::DEFAULT_BACKEND_URL.into()
}
fn default_timeout() -> u64 {
    10
}
fn default_poll_interval() -> u64 {
    5
}
fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}
fn default_tick_rate() -> u64 {
    250
}
fn default_frame_rate() -> u64 {
    33
}
fn default_pulse_probability() -> f64 {
    0.3
}
fn default_broker() -> String {
    "localhost".into()
}
fn default_mqtt_port() -> u16 {
    1883
}
fn default_topic() -> String {
    "smartcity/#".into()
}

/// Keys accepted by [`Config::set`], in display order.
pub const SETTABLE_KEYS: &[&str] = &[
    "backend.url",
    "backend.timeout_secs",
    "backend.poll_interval_secs",
    "backend.insecure",
    "defaults.output",
    "defaults.color",
    "tui.tick_rate_ms",
    "tui.frame_rate_ms",
    "tui.pulse_probability",
    "tui.seed",
    "mqtt.broker",
    "mqtt.port",
    "mqtt.topic",
];

impl Config {
    /// Assign one dotted key from its string form.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        match key {
            "backend.url" => {
                SyncConfig::parse(Some(value)).map_err(|e| invalid(key, e))?;
                self.backend.url = value.to_owned();
            }
            "backend.timeout_secs" => self.backend.timeout_secs = parse_value(key, value)?,
            "backend.poll_interval_secs" => {
                self.backend.poll_interval_secs = parse_value(key, value)?;
            }
            "backend.insecure" => self.backend.insecure = parse_value(key, value)?,
            "defaults.output" => {
                one_of(key, value, &["table", "json", "json-compact", "yaml", "plain"])?;
                self.defaults.output = value.to_owned();
            }
            "defaults.color" => {
                one_of(key, value, &["auto", "always", "never"])?;
                self.defaults.color = value.to_owned();
            }
            "tui.tick_rate_ms" => self.tui.tick_rate_ms = parse_value(key, value)?,
            "tui.frame_rate_ms" => self.tui.frame_rate_ms = parse_value(key, value)?,
            "tui.pulse_probability" => {
                let p: f64 = parse_value(key, value)?;
                if !(0.0..=1.0).contains(&p) {
                    return Err(invalid(key, "must be between 0 and 1"));
                }
                self.tui.pulse_probability = p;
            }
            "tui.seed" => {
                self.tui.seed = match value {
                    "" | "none" => None,
                    v => Some(parse_value(key, v)?),
                };
            }
            "mqtt.broker" => self.mqtt.broker = value.to_owned(),
            "mqtt.port" => self.mqtt.port = parse_value(key, value)?,
            "mqtt.topic" => self.mqtt.topic = value.to_owned(),
            other => {
                return Err(ConfigError::Validation {
                    field: other.to_owned(),
                    reason: format!("unknown key, expected one of: {}", SETTABLE_KEYS.join(", ")),
                });
            }
        }
        Ok(())
    }
}

fn parse_value<T>(key: &str, value: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value.parse().map_err(|e| invalid(key, e))
}

fn one_of(key: &str, value: &str, allowed: &[&str]) -> Result<(), ConfigError> {
    if allowed.contains(&value) {
        Ok(())
    } else {
        Err(invalid(key, format!("expected one of: {}", allowed.join(", "))))
    }
}

fn invalid(key: &str, reason: impl std::fmt::Display) -> ConfigError {
    ConfigError::Validation {
        field: key.to_owned(),
        reason: reason.to_string(),
    }
}

// ── Paths ───────────────────────────────────────────────────────────

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", "citygrid")
}

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    project_dirs().map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("citygrid");
    p
}

/// Directory for the TUI log file.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    project_dirs()
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or(ConfigError::NoConfigDir)
}

// ── Loading ─────────────────────────────────────────────────────────

/// Load from the canonical path plus environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Defaults, then `path` (if it exists), then `CITYGRID_*` variables with
/// `__` separating sections (`CITYGRID_BACKEND__URL`).
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("CITYGRID_").split("__"));

    Ok(figment.extract()?)
}

/// Load config, falling back to defaults on any error.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Saving ──────────────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<PathBuf, ConfigError> {
    let path = config_path();
    save_config_to(&path, cfg)?;
    Ok(path)
}

pub fn save_config_to(path: &Path, cfg: &Config) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Translation ─────────────────────────────────────────────────────

impl Backend {
    /// Build a `SyncConfig` for the TUI: polling on, values as configured.
    pub fn to_sync_config(&self) -> Result<SyncConfig, ConfigError> {
        let mut sync = SyncConfig::parse(Some(&self.url))
            .map_err(|e| invalid("backend.url", e))?
            .with_timeout(Duration::from_secs(self.timeout_secs))
            .with_poll_interval(self.poll_interval_secs);
        if self.insecure {
            sync.tls = TlsVerification::DangerAcceptInvalid;
        }
        Ok(sync)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use figment::Jail;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn defaults_without_file() {
        Jail::expect_with(|_jail| {
            let cfg = load_config_from(Path::new("missing.toml")).map_err(|e| e.to_string())?;
            assert_eq!(cfg, Config::default());
            assert_eq!(cfg.backend.url, "http://localhost:5000/api");
            assert_eq!(cfg.tui.tick_rate_ms, 250);
            assert_eq!(cfg.mqtt.topic, "smartcity/#");
            Ok(())
        });
    }

    #[test]
    fn file_then_env_layering() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "config.toml",
                r#"
                [backend]
                url = "http://grid.local:5000/api"
                poll_interval_secs = 15

                [tui]
                seed = 7
                "#,
            )?;
            jail.set_env("CITYGRID_BACKEND__POLL_INTERVAL_SECS", "2");

            let cfg = load_config_from(Path::new("config.toml")).map_err(|e| e.to_string())?;
            assert_eq!(cfg.backend.url, "http://grid.local:5000/api");
            assert_eq!(cfg.backend.poll_interval_secs, 2);
            assert_eq!(cfg.backend.timeout_secs, 10);
            assert_eq!(cfg.tui.seed, Some(7));
            Ok(())
        });
    }

    #[test]
    fn save_creates_parent_and_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let mut cfg = Config::default();
        cfg.set("mqtt.port", "8883").unwrap();
        cfg.set("tui.seed", "42").unwrap();

        save_config_to(&path, &cfg).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("port = 8883"));

        let parsed: Config = toml::from_str(&text).unwrap();
        assert_eq!(parsed, cfg);
    }

    #[test]
    fn set_validates_values() {
        let mut cfg = Config::default();
        assert!(cfg.set("defaults.output", "xml").is_err());
        assert!(cfg.set("tui.pulse_probability", "1.5").is_err());
        assert!(cfg.set("backend.url", "nope").is_err());
        assert!(cfg.set("backend.colour", "x").is_err());

        cfg.set("backend.insecure", "true").unwrap();
        cfg.set("tui.seed", "none").unwrap();
        assert!(cfg.backend.insecure);
        assert_eq!(cfg.tui.seed, None);
    }

    #[test]
    fn backend_to_sync_config() {
        let backend = Backend {
            url: "https://grid.example/api".into(),
            timeout_secs: 3,
            poll_interval_secs: 0,
            insecure: true,
        };
        let sync = backend.to_sync_config().unwrap();
        assert_eq!(sync.url.as_str(), "https://grid.example/api");
        assert_eq!(sync.timeout, Duration::from_secs(3));
        assert_eq!(sync.poll_interval_secs, 0);
        assert_eq!(sync.tls, TlsVerification::DangerAcceptInvalid);
    }
}
