//! Command dispatch: bridges CLI args -> core operations -> output formatting.

pub mod config_cmd;
pub mod detect;
pub mod monitor;
pub mod process;
pub mod reconcile;
pub mod remote_arp;

use nicsync_core::{HostShell, RuntimeConfig};

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a host-bound command to the appropriate handler.
pub async fn dispatch(
    cmd: Command,
    shell: &HostShell,
    runtime: RuntimeConfig,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Reconcile(args) => reconcile::handle(shell, runtime, args, global).await,
        Command::Monitor(args) => monitor::handle(shell, runtime, args, global).await,
        Command::Detect => detect::handle(shell, global).await,
        Command::RemoteArp => remote_arp::handle(shell, global).await,
        Command::ProcessName(args) => process::name(shell, args, global).await,
        Command::KillProcess(args) => process::kill(shell, args, global).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => Ok(()),
    }
}
