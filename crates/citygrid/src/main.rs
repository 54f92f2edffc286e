mod cli;
mod commands;
mod config;
mod error;
mod output;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Command};
use crate::error::CliError;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_tracing(cli.global.verbose);

    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    // stdout carries command output; diagnostics go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let Cli {
        mut global,
        command,
    } = cli;

    let cfg = config::load(&global)?;
    config::apply_defaults(&mut global, &cfg)?;

    match command {
        Command::Config(args) => commands::config_cmd::handle(args, &global, cfg),

        Command::Completions(args) => {
            use clap::CommandFactory;
            use clap_complete::generate;

            let mut cmd = Cli::command();
            generate(args.shell, &mut cmd, "citygrid", &mut std::io::stdout());
            Ok(())
        }

        cmd if cmd.needs_backend() => {
            let sync = config::resolve_sync_config(&global, &cfg)?;
            tracing::debug!(command = ?cmd, url = %sync.url, "dispatching backend command");
            commands::dispatch_remote(cmd, sync, &global).await
        }

        cmd => {
            tracing::debug!(command = ?cmd, "dispatching dataset command");
            commands::dispatch_local(cmd, &global)
        }
    }
}
