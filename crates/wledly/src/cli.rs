//! Clap derive structures for the `wledly` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// wledly -- drive groups of WLED controllers from one place
#[derive(Debug, Parser)]
#[command(
    name = "wledly",
    version,
    about = "Control groups of WLED lighting controllers",
    long_about = "Keep a list of WLED controllers per installation, find new ones\n\
        on the LAN over mDNS, and switch power or presets on many of them\n\
        at once. Every controller is contacted concurrently; one dead\n\
        device never holds up the rest.",
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
    /// Installation whose controller list to use
    #[arg(long, short = 'i', env = "WLEDLY_INSTALLATION", global = true)]
    pub installation: Option<String>,

    /// Controller list file (overrides the installation's location)
    #[arg(long, env = "WLEDLY_SETTINGS", global = true, value_name = "PATH")]
    pub settings: Option<PathBuf>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "WLEDLY_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Per-request timeout in milliseconds (overrides config)
    #[arg(long, env = "WLEDLY_TIMEOUT_MS", global = true, value_name = "MS")]
    pub timeout_ms: Option<u64>,
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

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage registered controllers
    #[command(alias = "ctl", alias = "c")]
    Controllers(ControllersArgs),

    /// Find controllers on the local network
    Scan(ScanArgs),

    /// Switch controllers on, off, or toggle them
    #[command(alias = "pw")]
    Power(PowerArgs),

    /// Activate a preset on controllers
    #[command(alias = "ps")]
    Preset(PresetArgs),

    /// List the presets stored on one controller
    Presets(ControllerRef),

    /// Show firmware and capability info for one controller
    Info(ControllerRef),

    /// Manage CLI configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Controllers ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ControllersArgs {
    #[command(subcommand)]
    pub command: ControllersCommand,
}

#[derive(Debug, Subcommand)]
pub enum ControllersCommand {
    /// List registered controllers
    #[command(alias = "ls")]
    List {
        /// Check which controllers are reachable
        #[arg(long)]
        probe: bool,
    },

    /// Register a controller by address
    Add {
        /// Host or host:port (default port 80)
        address: String,

        /// Name to use if the device doesn't report one
        #[arg(long, short = 'n')]
        name: Option<String>,
    },

    /// Unregister a controller
    #[command(alias = "rm")]
    Remove {
        /// Controller ID, address, or name
        controller: String,
    },
}

/// A single controller, by ID, address, or name.
#[derive(Debug, Args)]
pub struct ControllerRef {
    /// Controller ID, address, or name
    pub controller: String,
}

// ── Discovery ────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ScanArgs {
    /// How long to listen for answers, in milliseconds
    #[arg(long = "scan-ms", value_name = "MS")]
    pub scan_ms: Option<u64>,

    /// Register every newly found controller
    #[arg(long)]
    pub add: bool,
}

// ── Dispatch ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum PowerState {
    On,
    Off,
    Toggle,
}

/// Which controllers a command goes to.
#[derive(Debug, Args)]
pub struct TargetArgs {
    /// Controller IDs, addresses, or names
    pub controllers: Vec<String>,

    /// Target every registered controller
    #[arg(long, short = 'a', conflicts_with = "controllers")]
    pub all: bool,
}

#[derive(Debug, Args)]
pub struct PowerArgs {
    /// Desired power state
    pub state: PowerState,

    #[command(flatten)]
    pub targets: TargetArgs,
}

#[derive(Debug, Args)]
pub struct PresetArgs {
    /// Preset slot (1-250) then controller IDs, addresses, or names.
    /// With --map every value is a controller.
    #[arg(value_name = "PRESET|CONTROLLER")]
    pub values: Vec<String>,

    /// Target every registered controller
    #[arg(long, short = 'a')]
    pub all: bool,

    /// Per-controller preset, as CONTROLLER=PRESET (repeatable)
    #[arg(long, short = 'm', value_name = "CONTROLLER=PRESET")]
    pub map: Vec<String>,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print config and settings file locations
    Path,

    /// Show the effective configuration
    Show,

    /// Write a config file with default values
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
