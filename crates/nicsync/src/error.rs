//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text and a stable exit code.

use miette::Diagnostic;
use thiserror::Error;

use nicsync_config::ConfigError;
use nicsync_core::{CoreError, ExecError, QueryError};

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const CONFIG: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const COMMAND_FAILED: i32 = 5;
    pub const VERIFICATION: i32 = 6;
    pub const INTERPRETER: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Host ─────────────────────────────────────────────────────────
    #[error("Could not start '{program}'")]
    #[diagnostic(
        code(nicsync::interpreter_not_found),
        help(
            "nicsync drives the host through PowerShell.\n\
             Set executor.powershell in the config file, NICSYNC_EXECUTOR__POWERSHELL, \
             or pass --powershell."
        )
    )]
    InterpreterNotFound { program: String },

    #[error("{message}")]
    #[diagnostic(
        code(nicsync::command_failed),
        help("Run with -vv to see each command as it is issued. Most writes need an elevated shell.")
    )]
    CommandFailed { message: String },

    #[error("{message}")]
    #[diagnostic(
        code(nicsync::timeout),
        help("Raise executor.timeout_secs (0 disables the limit).")
    )]
    Timeout { message: String },

    #[error("{message}")]
    #[diagnostic(code(nicsync::not_found))]
    NotFound { message: String },

    #[error("{message}")]
    #[diagnostic(
        code(nicsync::verification_failed),
        help("The driver accepted the write but reports a different value. Check for a pending reboot or driver update.")
    )]
    Verification { message: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(nicsync::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Configuration file already exists at {path}")]
    #[diagnostic(
        code(nicsync::config_exists),
        help("Pass --force to overwrite it.")
    )]
    ConfigExists { path: String },

    #[error(transparent)]
    #[diagnostic(
        code(nicsync::config),
        help("Check the file printed by `nicsync config path` and any NICSYNC_* variables.")
    )]
    Config(#[from] ConfigError),

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Failed to render JSON: {0}")]
    #[diagnostic(code(nicsync::json))]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::InterpreterNotFound { .. } => exit_code::INTERPRETER,
            Self::CommandFailed { .. } => exit_code::COMMAND_FAILED,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Verification { .. } => exit_code::VERIFICATION,
            Self::Validation { .. } => exit_code::USAGE,
            Self::ConfigExists { .. } | Self::Config(_) => exit_code::CONFIG,
            Self::Io(_) | Self::Json(_) => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

fn exec_source(err: &CoreError) -> Option<&ExecError> {
    match err.root() {
        CoreError::Query {
            source: QueryError::Exec(source),
            ..
        }
        | CoreError::Apply { source, .. }
        | CoreError::Restart { source, .. } => Some(source),
        _ => None,
    }
}

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        if let Some(ExecError::InterpreterNotFound { program }) = exec_source(&err) {
            return Self::InterpreterNotFound {
                program: program.clone(),
            };
        }
        let timed_out = matches!(exec_source(&err), Some(ExecError::Timeout { .. }));

        // The full message keeps the adapter attribution from `Convergence`.
        let message = err.to_string();
        match err.root() {
            _ if timed_out => Self::Timeout { message },
            CoreError::NotFound { .. } => Self::NotFound { message },
            CoreError::Verification { .. } => Self::Verification { message },
            CoreError::InvalidInput { field, reason } => Self::Validation {
                field: (*field).to_owned(),
                reason: reason.clone(),
            },
            _ => Self::CommandFailed { message },
        }
    }
}

#[cfg(test)]
mod tests {
    use nicsync_core::{Resource, Step};

    use super::*;

    #[test]
    fn missing_interpreter_is_surfaced_through_wrappers() {
        let core = CoreError::Query {
            step: Step::AdapterLookup,
            source: QueryError::Exec(ExecError::InterpreterNotFound {
                program: "pwsh".into(),
            }),
        };

        let err = CliError::from(core);
        assert!(matches!(err, CliError::InterpreterNotFound { ref program } if program == "pwsh"));
        assert_eq!(err.exit_code(), exit_code::INTERPRETER);
    }

    #[test]
    fn not_found_keeps_adapter_context() {
        let core = CoreError::Convergence {
            adapter: "Ethernet 3".into(),
            source: Box::new(CoreError::NotFound {
                resource: Resource::Device,
                criteria: "*Mellanox*".into(),
            }),
        };

        let err = CliError::from(core);
        assert_eq!(err.exit_code(), exit_code::NOT_FOUND);
        assert!(err.to_string().contains("Ethernet 3"));
    }

    #[test]
    fn timeouts_map_to_their_own_code() {
        let core = CoreError::Restart {
            step: Step::ServiceRestart,
            target: "hns".into(),
            source: ExecError::Timeout {
                limit: std::time::Duration::from_secs(60),
            },
        };

        assert_eq!(CliError::from(core).exit_code(), exit_code::TIMEOUT);
    }
}
