// Process-backed executor.
//
// Spawns one child per command with piped stdout/stderr and no stdin.
// The timeout is enforced here; a timed-out child is killed when its
// handle is dropped.

use std::ffi::OsStr;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, trace};

use super::CommandExecutor;
use crate::config::ExecutorConfig;
use crate::error::ExecError;

#[cfg(windows)]
const SYSTEM_SHELL: (&str, &str) = ("cmd", "/c");
#[cfg(not(windows))]
const SYSTEM_SHELL: (&str, &str) = ("sh", "-c");

/// Executes commands as child processes.
#[derive(Debug, Clone, Default)]
pub struct ProcessExecutor {
    config: ExecutorConfig,
}

impl ProcessExecutor {
    pub fn new(config: ExecutorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ExecutorConfig {
        &self.config
    }

    async fn run<S: AsRef<OsStr>>(&self, program: S, args: &[&str]) -> Result<String, ExecError> {
        let program_name = program.as_ref().to_string_lossy().into_owned();

        let mut cmd = Command::new(program);
        cmd.args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let child = cmd.spawn().map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                ExecError::InterpreterNotFound {
                    program: program_name.clone(),
                }
            } else {
                ExecError::Spawn {
                    program: program_name.clone(),
                    source,
                }
            }
        })?;

        let waited = match self.config.timeout {
            Some(limit) => tokio::time::timeout(limit, child.wait_with_output())
                .await
                .map_err(|_| ExecError::Timeout { limit })?,
            None => child.wait_with_output().await,
        };
        let output = waited.map_err(|source| ExecError::Spawn {
            program: program_name,
            source,
        })?;

        if !output.status.success() {
            return Err(ExecError::Failed {
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_owned(),
            });
        }

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        trace!(bytes = stdout.len(), "command output captured");
        Ok(stdout)
    }
}

#[async_trait]
impl CommandExecutor for ProcessExecutor {
    async fn run_shell(&self, command: &str) -> Result<String, ExecError> {
        debug!(%command, "shell");
        let (shell, flag) = SYSTEM_SHELL;
        self.run(shell, &[flag, command]).await
    }

    async fn run_powershell(&self, command: &str) -> Result<String, ExecError> {
        debug!(%command, "powershell");
        self.run(
            &self.config.powershell,
            &["-NoProfile", "-NonInteractive", "-Command", command],
        )
        .await
    }
}
