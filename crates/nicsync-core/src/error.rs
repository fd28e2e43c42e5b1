// ── Core error types ──
//
// Three layers, innermost first: `ExecError` is what the command
// transport reports, `QueryError` adds the parse failures of the typed
// query layer, and `CoreError` records which reconciliation step failed.
// Consumers never see raw process handles or exit statuses.

use std::time::Duration;

use strum::Display;
use thiserror::Error;

// ── Executor ─────────────────────────────────────────────────────────

/// Failure of a single command invocation.
#[derive(Debug, Error)]
pub enum ExecError {
    /// The shell or script interpreter could not be located.
    #[error("interpreter '{program}' not found")]
    InterpreterNotFound { program: String },

    /// The process could not be started or its output could not be read.
    #[error("failed to run '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The command ran and exited unsuccessfully. `stderr` is captured verbatim.
    #[error("command failed ({status}): {stderr}")]
    Failed { status: String, stderr: String },

    /// The command exceeded the executor's time limit and was killed.
    #[error("command timed out after {limit:?}")]
    Timeout { limit: Duration },
}

impl ExecError {
    /// Returns `true` if a later attempt could plausibly succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Failed { .. } | Self::Timeout { .. })
    }
}

// ── Query ────────────────────────────────────────────────────────────

/// Failure of a typed query: either the command failed or its output
/// did not have the expected shape.
#[derive(Debug, Error)]
pub enum QueryError {
    #[error(transparent)]
    Exec(#[from] ExecError),

    #[error("expected {expected}, got '{output}'")]
    Parse {
        expected: &'static str,
        output: String,
    },

    /// A lookup that must identify a single entry matched several.
    #[error("expected one entry, got {count}: {entries}")]
    Ambiguous { count: usize, entries: String },
}

// ── Steps and resources ──────────────────────────────────────────────

/// A single step of a reconciliation, used to attribute failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Step {
    #[strum(to_string = "adapter lookup")]
    AdapterLookup,
    #[strum(to_string = "generation probe")]
    GenerationProbe,
    #[strum(to_string = "property read")]
    PropertyRead,
    #[strum(to_string = "property write")]
    PropertyWrite,
    #[strum(to_string = "device lookup")]
    DeviceLookup,
    #[strum(to_string = "driver lookup")]
    DriverLookup,
    #[strum(to_string = "registry key probe")]
    KeyProbe,
    #[strum(to_string = "registry read")]
    RegistryRead,
    #[strum(to_string = "registry write")]
    RegistryWrite,
    #[strum(to_string = "adapter restart")]
    AdapterRestart,
    #[strum(to_string = "service restart")]
    ServiceRestart,
    #[strum(to_string = "verification read")]
    VerificationRead,
    #[strum(to_string = "process lookup")]
    ProcessLookup,
    #[strum(to_string = "process kill")]
    ProcessKill,
}

/// Kinds of host resource that can legitimately be absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Resource {
    #[strum(to_string = "network adapter")]
    Adapter,
    #[strum(to_string = "network device")]
    Device,
    #[strum(to_string = "driver registry key")]
    DriverKey,
    #[strum(to_string = "process")]
    Process,
}

// ── Core ─────────────────────────────────────────────────────────────

/// Unified error type for reconciliation.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A read step failed (command error or unparseable output).
    #[error("{step} failed: {source}")]
    Query {
        step: Step,
        #[source]
        source: QueryError,
    },

    /// An expected resource is absent. This is a steady state (hardware
    /// not present), not a transient fault.
    #[error("no {resource} found matching '{criteria}'")]
    NotFound { resource: Resource, criteria: String },

    /// A resolution step returned nothing usable for an identifier that
    /// a previous step did produce.
    #[error("could not resolve {resource} for '{identifier}'")]
    Resolution {
        resource: Resource,
        identifier: String,
    },

    /// A write command failed.
    #[error("{step} failed for '{target}': {source}")]
    Apply {
        step: Step,
        target: String,
        #[source]
        source: ExecError,
    },

    /// A value read back after an apply does not match what was written.
    #[error("'{target}' reads '{observed}' after apply, expected '{expected}'")]
    Verification {
        target: String,
        expected: String,
        observed: String,
    },

    /// An adapter or service restart failed after a successful write.
    #[error("{step} failed for '{target}': {source}")]
    Restart {
        step: Step,
        target: String,
        #[source]
        source: ExecError,
    },

    /// Rejected input that cannot be safely substituted into a command.
    #[error("invalid {field}: {reason}")]
    InvalidInput { field: &'static str, reason: String },

    /// Any of the above, attributed to the adapter being converged.
    #[error("convergence failed for adapter '{adapter}': {source}")]
    Convergence {
        adapter: String,
        #[source]
        source: Box<CoreError>,
    },
}

impl CoreError {
    pub(crate) fn query(step: Step) -> impl FnOnce(QueryError) -> Self {
        move |source| Self::Query { step, source }
    }

    pub(crate) fn convergence(adapter: &str) -> impl FnOnce(Self) -> Self {
        move |source| Self::Convergence {
            adapter: adapter.to_owned(),
            source: Box::new(source),
        }
    }

    /// The innermost error, unwrapping any `Convergence` attribution.
    pub fn root(&self) -> &Self {
        match self {
            Self::Convergence { source, .. } => source.root(),
            other => other,
        }
    }

    /// Returns `true` if this is an expected-absence error.
    pub fn is_not_found(&self) -> bool {
        matches!(self.root(), Self::NotFound { .. })
    }

    /// The step that failed, if the error carries one.
    pub fn step(&self) -> Option<Step> {
        match self.root() {
            Self::Query { step, .. } | Self::Apply { step, .. } | Self::Restart { step, .. } => {
                Some(*step)
            }
            Self::Verification { .. } => Some(Step::VerificationRead),
            _ => None,
        }
    }
}
