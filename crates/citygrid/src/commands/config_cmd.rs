//! Config subcommand handlers.

use std::io::IsTerminal;

use dialoguer::{Input, Select};

use citygrid_config::ConfigError;
use citygrid_core::SyncConfig;

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config::{self, Config};
use crate::error::CliError;
use crate::output;

// ── Helpers ─────────────────────────────────────────────────────────

/// Map a dialoguer / interactive I/O failure into CliError.
fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

fn detail(cfg: &Config) -> String {
    let seed = cfg
        .tui
        .seed
        .map_or_else(|| "random".to_owned(), |s| s.to_string());
    [
        "[backend]".to_owned(),
        format!("  url                 {}", cfg.backend.url),
        format!("  timeout_secs        {}", cfg.backend.timeout_secs),
        format!("  poll_interval_secs  {}", cfg.backend.poll_interval_secs),
        format!("  insecure            {}", cfg.backend.insecure),
        "[defaults]".to_owned(),
        format!("  output              {}", cfg.defaults.output),
        format!("  color               {}", cfg.defaults.color),
        "[tui]".to_owned(),
        format!("  tick_rate_ms        {}", cfg.tui.tick_rate_ms),
        format!("  frame_rate_ms       {}", cfg.tui.frame_rate_ms),
        format!("  pulse_probability   {}", cfg.tui.pulse_probability),
        format!("  seed                {seed}"),
        "[mqtt]".to_owned(),
        format!("  broker              {}", cfg.mqtt.broker),
        format!("  port                {}", cfg.mqtt.port),
        format!("  topic               {}", cfg.mqtt.topic),
    ]
    .join("\n")
}

/// Guided setup: backend URL, poll interval, default output.
fn wizard(mut cfg: Config) -> Result<Config, CliError> {
    let url: String = Input::new()
        .with_prompt("Backend URL")
        .default(cfg.backend.url.clone())
        .validate_with(|s: &String| {
            SyncConfig::parse(Some(s))
                .map(|_| ())
                .map_err(|e| e.to_string())
        })
        .interact_text()
        .map_err(prompt_err)?;
    cfg.set("backend.url", &url)?;

    let poll: u64 = Input::new()
        .with_prompt("Poll interval (seconds)")
        .default(cfg.backend.poll_interval_secs)
        .interact_text()
        .map_err(prompt_err)?;
    cfg.backend.poll_interval_secs = poll;

    let formats = ["table", "json", "yaml", "plain"];
    let current = formats
        .iter()
        .position(|f| *f == cfg.defaults.output)
        .unwrap_or_default();
    let choice = Select::new()
        .with_prompt("Default output format")
        .items(&formats)
        .default(current)
        .interact()
        .map_err(prompt_err)?;
    if let Some(format) = formats.get(choice) {
        cfg.set("defaults.output", format)?;
    }

    Ok(cfg)
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: ConfigArgs, global: &GlobalOpts, cfg: Config) -> Result<(), CliError> {
    let path = config::config_file(global);

    match args.command {
        ConfigCommand::Show => {
            let out = output::render_single(&global.output_format(), &cfg, detail, |c| {
                c.backend.url.clone()
            })?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ConfigCommand::Path => {
            output::print_output(&path.display().to_string(), global.quiet);
            Ok(())
        }

        ConfigCommand::Init { force } => {
            if path.exists() && !force {
                return Err(CliError::Validation {
                    field: "config".into(),
                    reason: format!("{} already exists (use --force to overwrite)", path.display()),
                });
            }

            let cfg = if global.yes || !std::io::stdin().is_terminal() {
                Config::default()
            } else {
                eprintln!("citygrid configuration");
                eprintln!("  Config path: {}\n", path.display());
                wizard(Config::default())?
            };

            config::save_config_to(&path, &cfg)?;
            tracing::info!(path = %path.display(), "config written");
            if !global.quiet {
                eprintln!("Configuration written to {}", path.display());
            }
            Ok(())
        }

        ConfigCommand::Set { key, value } => {
            let mut cfg = cfg;
            cfg.set(&key, &value).map_err(|e| match e {
                ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
                other => other.into(),
            })?;
            config::save_config_to(&path, &cfg)?;
            if !global.quiet {
                eprintln!("Set {key} = {value}");
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detail_shows_every_section() {
        let text = detail(&Config::default());
        for section in ["[backend]", "[defaults]", "[tui]", "[mqtt]"] {
            assert!(text.contains(section), "missing {section}");
        }
        assert!(text.contains("seed                random"));
    }
}
