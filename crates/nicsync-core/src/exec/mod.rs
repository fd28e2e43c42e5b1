//! Command execution seam.
//!
//! Everything nicsync learns about the host comes through
//! [`CommandExecutor`]: a command string goes in, raw stdout comes out.
//! The executor does not retry, trim or parse; those belong to
//! [`HostShell`](crate::query::HostShell).

mod mock;
mod process;

use async_trait::async_trait;

use crate::error::ExecError;

pub use mock::{Invocation, MockExecutor};
pub use process::ProcessExecutor;

/// Which interpreter a command was addressed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellKind {
    /// The OS command shell (`cmd /c` on Windows, `sh -c` elsewhere).
    System,
    /// PowerShell, for structured query and management commands.
    PowerShell,
}

/// Runs command strings on the host.
#[async_trait]
pub trait CommandExecutor: Send + Sync {
    /// Run `command` through the OS command shell.
    async fn run_shell(&self, command: &str) -> Result<String, ExecError>;

    /// Run `command` through PowerShell.
    async fn run_powershell(&self, command: &str) -> Result<String, ExecError>;
}
