//! Clap derive structures for the `nicsync` CLI.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// nicsync -- keep Mellanox priority/VLAN tagging where it belongs
#[derive(Debug, Parser)]
#[command(
    name = "nicsync",
    version,
    about = "Reconcile Mellanox adapter priority and VLAN tagging settings",
    long_about = "Detects the Mellanox adapter on this host, works out whether its driver \
        exposes *PriorityVLANTag as an advanced property or only in the registry, \
        and converges the setting to its desired value.\n\n\
        Run `nicsync monitor` to keep correcting drift until interrupted.",
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
    /// Config file (defaults to the platform config directory)
    #[arg(long, env = "NICSYNC_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// PowerShell executable (overrides executor.powershell)
    #[arg(long, global = true)]
    pub powershell: Option<PathBuf>,

    /// Output format
    #[arg(long, short = 'o', default_value = "plain", global = true)]
    pub output: OutputFormat,

    /// Log line format on stderr
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable lines (default)
    Plain,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

// ── Commands ─────────────────────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Converge the adapter once and exit
    Reconcile(ReconcileArgs),

    /// Converge on an interval until Ctrl-C
    #[command(alias = "watch")]
    Monitor(MonitorArgs),

    /// Show the adapter, its generation and the current value without changing anything
    Detect,

    /// Set the HNS SDNRemoteArpMacAddress value and restart hns if needed
    RemoteArp,

    /// Print the name of the process with the given id
    ProcessName(ProcessNameArgs),

    /// Forcefully terminate every process with the given image name
    KillProcess(KillProcessArgs),

    /// Inspect or create the configuration file
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Debug, Args)]
pub struct ReconcileArgs {
    /// Re-read the value after writing and fail on mismatch
    #[arg(long)]
    pub verify: bool,
}

#[derive(Debug, Args)]
pub struct MonitorArgs {
    /// Seconds between cycles (zero or negative uses the default of 30)
    #[arg(long, short = 'i', allow_negative_numbers = true)]
    pub interval: Option<i64>,

    /// Run the remote-ARP setter before the first cycle
    #[arg(long)]
    pub remote_arp: bool,

    /// Re-read values after writing and count mismatches as failures
    #[arg(long)]
    pub verify: bool,
}

#[derive(Debug, Args)]
pub struct ProcessNameArgs {
    /// Process id
    pub pid: u32,
}

#[derive(Debug, Args)]
pub struct KillProcessArgs {
    /// Image name, e.g. azure-vnet.exe
    pub image: String,
}

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the effective configuration (file and environment merged)
    Show,

    /// Print the config file path
    Path,

    /// Write a config file with default values
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
