//! CLI configuration: thin wrapper around `citygrid_config`.
//!
//! Adds `GlobalOpts`-aware resolution on top of the shared loader, so flags
//! (--backend-url, --timeout, --output, ...) override file and env values.

use std::path::PathBuf;
use std::time::Duration;

use clap::ValueEnum;

use citygrid_core::{SyncConfig, TlsVerification};

use crate::cli::{ColorMode, GlobalOpts, OutputFormat};
use crate::error::CliError;

pub use citygrid_config::{Config, config_path, save_config_to};

/// The file `--config` names, else the platform default.
pub fn config_file(global: &GlobalOpts) -> PathBuf {
    global.config.clone().unwrap_or_else(config_path)
}

/// Load config for this invocation. A missing file yields defaults.
pub fn load(global: &GlobalOpts) -> Result<Config, CliError> {
    Ok(citygrid_config::load_config_from(&config_file(global))?)
}

/// Fill `--output` / `--color` from `[defaults]` when not given.
pub fn apply_defaults(global: &mut GlobalOpts, cfg: &Config) -> Result<(), CliError> {
    if global.output.is_none() {
        global.output = Some(
            OutputFormat::from_str(&cfg.defaults.output, true).map_err(|reason| {
                CliError::Validation {
                    field: "defaults.output".into(),
                    reason,
                }
            })?,
        );
    }
    if global.color.is_none() {
        global.color = Some(ColorMode::from_str(&cfg.defaults.color, true).map_err(
            |reason| CliError::Validation {
                field: "defaults.color".into(),
                reason,
            },
        )?);
    }
    Ok(())
}

/// Translate `[backend]` + global flags into a one-shot `SyncConfig`.
///
/// Flag overrides take priority. Polling is off; commands fetch once.
pub fn resolve_sync_config(global: &GlobalOpts, cfg: &Config) -> Result<SyncConfig, CliError> {
    let url = global.backend_url.as_deref().unwrap_or(&cfg.backend.url);
    let timeout = global.timeout.unwrap_or(cfg.backend.timeout_secs);

    let mut sync = SyncConfig::parse(Some(url))?
        .with_timeout(Duration::from_secs(timeout))
        .with_poll_interval(0);
    if global.insecure || cfg.backend.insecure {
        sync.tls = TlsVerification::DangerAcceptInvalid;
    }
    Ok(sync)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use clap::Parser;

    use super::*;
    use crate::cli::Cli;

    fn global(args: &[&str]) -> GlobalOpts {
        let mut argv = vec!["citygrid"];
        argv.extend_from_slice(args);
        argv.push("check");
        Cli::try_parse_from(argv).unwrap().global
    }

    #[test]
    fn flags_override_file() {
        let mut cfg = Config::default();
        cfg.backend.url = "http://file.local/api".into();
        cfg.backend.timeout_secs = 30;

        let sync = resolve_sync_config(
            &global(&["--backend-url", "http://flag.local/api", "-k"]),
            &cfg,
        )
        .unwrap();
        assert_eq!(sync.url.as_str(), "http://flag.local/api");
        assert_eq!(sync.timeout, Duration::from_secs(30));
        assert_eq!(sync.tls, TlsVerification::DangerAcceptInvalid);
        assert_eq!(sync.poll_interval_secs, 0);
    }

    #[test]
    fn defaults_fill_missing_output() {
        let mut cfg = Config::default();
        cfg.defaults.output = "json-compact".into();

        let mut g = global(&[]);
        apply_defaults(&mut g, &cfg).unwrap();
        assert!(matches!(g.output, Some(OutputFormat::JsonCompact)));

        let mut g = global(&["-o", "yaml"]);
        apply_defaults(&mut g, &cfg).unwrap();
        assert!(matches!(g.output, Some(OutputFormat::Yaml)));
    }
}
