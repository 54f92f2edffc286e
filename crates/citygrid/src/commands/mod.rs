//! Command dispatch: bridges CLI args -> core -> output formatting.

pub mod check;
pub mod config_cmd;
pub mod devices;
pub mod links;
pub mod live;
pub mod rules;
pub mod simulate;
pub mod stats;
pub mod topology;
pub mod util;
pub mod vlans;

use citygrid_core::{NetworkStore, SyncConfig};

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a command that works on the built-in city dataset.
pub fn dispatch_local(cmd: Command, global: &GlobalOpts) -> Result<(), CliError> {
    let store = NetworkStore::seeded(global.seed);
    match cmd {
        Command::Devices(args) => devices::handle(&store, args, global),
        Command::Vlans(args) => vlans::handle(&store, args, global),
        Command::Links(args) => links::handle(&store, &args, global),
        Command::Topology(args) => topology::handle(&store, &args, global),
        Command::Stats(args) => stats::handle(&store, &args, global),
        Command::Check => check::handle(&store, global),
        other => Err(CliError::Validation {
            field: "command".into(),
            reason: format!("{other:?} is not a dataset command"),
        }),
    }
}

/// Dispatch a command that talks to the backend.
pub async fn dispatch_remote(
    cmd: Command,
    sync: SyncConfig,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Live(args) => live::handle(sync, args, global).await,
        Command::Rules(args) => rules::handle(sync, args, global).await,
        Command::Simulate(args) => simulate::handle(sync, args, global).await,
        other => Err(CliError::Validation {
            field: "command".into(),
            reason: format!("{other:?} does not talk to the backend"),
        }),
    }
}
