//! Clap derive structures for the `citygrid` CLI.
//!
//! Defines the complete command tree, global flags, and shared value enums.
//! Only depends on clap so the build script can include it for man pages.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// citygrid -- inspect the smart-city network from the command line
#[derive(Debug, Parser)]
#[command(
    name = "citygrid",
    version,
    about = "Inspect the smart-city VLAN network from the command line",
    long_about = "Browse the smart-city network's devices, VLANs and links, chart\n\
        their status, and talk to the VLAN assignment backend: live readings,\n\
        rules and simulated devices.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Backend base URL, including the /api prefix
    #[arg(long, short = 'b', env = "CITYGRID_BACKEND_URL", global = true)]
    pub backend_url: Option<String>,

    /// Config file to use instead of the platform default
    #[arg(long, env = "CITYGRID_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Output format [default: from config, else table]
    #[arg(long, short = 'o', env = "CITYGRID_OUTPUT", global = true)]
    pub output: Option<OutputFormat>,

    /// When to use color output [default: from config, else auto]
    #[arg(long, global = true)]
    pub color: Option<ColorMode>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', env = "CITYGRID_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds [default: from config, else 10]
    #[arg(long, env = "CITYGRID_TIMEOUT", global = true)]
    pub timeout: Option<u64>,

    /// Seed for topology node placement (reproducible coordinates)
    #[arg(long, env = "CITYGRID_SEED", global = true)]
    pub seed: Option<u64>,
}

impl GlobalOpts {
    pub fn output_format(&self) -> OutputFormat {
        self.output.clone().unwrap_or(OutputFormat::Table)
    }

    pub fn color_mode(&self) -> ColorMode {
        self.color.clone().unwrap_or(ColorMode::Auto)
    }
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Filter Enums ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum StatusArg {
    Online,
    Offline,
    Warning,
    Maintenance,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum TypeArg {
    Router,
    Switch,
    #[value(alias = "ap")]
    AccessPoint,
    Sensor,
    Camera,
    Controller,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Browse the device inventory
    #[command(alias = "dev", alias = "d")]
    Devices(DevicesArgs),

    /// Browse VLAN networks
    #[command(alias = "v")]
    Vlans(VlansArgs),

    /// List links between devices
    Links(LinksArgs),

    /// Nodes and links as drawn on the topology canvas
    #[command(alias = "topo")]
    Topology(TopologyArgs),

    /// Chart data: status distribution, traffic trend, VLAN usage
    Stats(StatsArgs),

    /// Report inconsistencies in the network dataset
    Check,

    /// Live readings and assignments from the backend
    Live(LiveArgs),

    /// View, replace and try out VLAN assignment rules
    Rules(RulesArgs),

    /// Send a simulated device reading to the backend
    #[command(alias = "sim")]
    Simulate(SimulateArgs),

    /// Manage CLI configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

impl Command {
    /// Whether this command talks to the backend.
    pub fn needs_backend(&self) -> bool {
        matches!(self, Self::Live(_) | Self::Rules(_) | Self::Simulate(_))
    }
}

// ── Devices ──────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct DevicesArgs {
    #[command(subcommand)]
    pub command: DevicesCommand,
}

#[derive(Debug, Subcommand)]
pub enum DevicesCommand {
    /// List devices, optionally filtered
    #[command(alias = "ls")]
    List(DeviceFilterArgs),

    /// Show one device
    Get {
        /// Device ID (e.g. dev-001)
        device: String,
    },
}

#[derive(Debug, Args)]
pub struct DeviceFilterArgs {
    /// Case-insensitive match on name or location, or substring of IP
    #[arg(long, short = 's')]
    pub search: Option<String>,

    /// Only devices with this status
    #[arg(long, value_enum)]
    pub status: Option<StatusArg>,

    /// Only devices on this VLAN
    #[arg(long)]
    pub vlan: Option<u32>,

    /// Only devices of this type
    #[arg(long = "type", short = 't', value_enum)]
    pub device_type: Option<TypeArg>,
}

// ── VLANs ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct VlansArgs {
    #[command(subcommand)]
    pub command: VlansCommand,
}

#[derive(Debug, Subcommand)]
pub enum VlansCommand {
    /// List VLAN networks
    #[command(alias = "ls")]
    List,

    /// Show one VLAN and its member devices
    Get {
        /// VLAN ID
        id: u32,
    },
}

// ── Links & Topology ─────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct LinksArgs {
    /// Links visible with this VLAN selected (cross-VLAN links included)
    #[arg(long)]
    pub vlan: Option<u32>,
}

#[derive(Debug, Args)]
pub struct TopologyArgs {
    /// Select a VLAN, as the canvas filter chips do
    #[arg(long)]
    pub vlan: Option<u32>,
}

// ── Stats ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct StatsArgs {
    /// Which chart to show; overview when omitted
    #[arg(value_enum)]
    pub view: Option<StatsView>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum StatsView {
    /// Device status distribution
    Status,
    /// 24-hour traffic trend per series
    Traffic,
    /// Device count per VLAN
    Vlans,
}

// ── Live ─────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct LiveArgs {
    #[command(subcommand)]
    pub command: LiveCommand,
}

#[derive(Debug, Subcommand)]
pub enum LiveCommand {
    /// Latest reading for every device the backend has seen
    Devices {
        /// Case-insensitive match on id or name
        #[arg(long, short = 's')]
        search: Option<String>,

        /// Only this category (Traffic, Environment, Security, ...)
        #[arg(long)]
        category: Option<String>,
    },

    /// Devices grouped by assigned VLAN
    Vlans,

    /// Counts, per-VLAN and per-category breakdown, recent activity
    Overview,
}

// ── Rules ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct RulesArgs {
    #[command(subcommand)]
    pub command: RulesCommand,
}

#[derive(Debug, Subcommand)]
pub enum RulesCommand {
    /// Show the backend's rule table
    Get,

    /// Replace the backend's rule table from a JSON file
    Set {
        /// JSON file, or `-` for stdin
        #[arg(value_name = "FILE|-")]
        source: String,
    },

    /// Preview which VLAN a reading would land on
    Eval(EvalArgs),
}

#[derive(Debug, Args)]
pub struct EvalArgs {
    /// Device name (keywords like "traffic" pick a VLAN first)
    #[arg(long)]
    pub name: Option<String>,

    #[arg(long)]
    pub temperature: Option<f64>,

    #[arg(long)]
    pub traffic: Option<f64>,

    #[arg(long)]
    pub air_quality: Option<f64>,

    /// Use the backend's factory rules instead of fetching
    #[arg(long)]
    pub offline: bool,
}

// ── Simulate ─────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct SimulateArgs {
    /// Device name
    #[arg(long)]
    pub name: String,

    /// Device kind
    #[arg(
        long = "type",
        short = 't',
        default_value = "sensor",
        value_parser = ["sensor", "traffic", "environment", "security"]
    )]
    pub kind: String,

    /// Temperature reading, 0-50 [default: 25]
    #[arg(long)]
    pub temperature: Option<f64>,

    /// Traffic level, 0-100 [default: 50]
    #[arg(long)]
    pub traffic: Option<f64>,

    /// Air quality index, 0-300 [default: 100]
    #[arg(long)]
    pub air_quality: Option<f64>,

    /// Location label
    #[arg(long, default_value = "City Center")]
    pub location: String,

    /// Device ID; the backend generates one when omitted
    #[arg(long)]
    pub device_id: Option<String>,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Display the resolved configuration
    Show,

    /// Print the config file path
    Path,

    /// Create a config file (guided unless --yes)
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Set a configuration value
    Set {
        /// Dotted key, e.g. "backend.url" or "tui.seed"
        key: String,

        /// Value to set
        value: String,
    },
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
