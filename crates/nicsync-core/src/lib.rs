//! Reconciliation engine between the host's command interface and the
//! `nicsync` CLI.
//!
//! This crate owns the decision logic for keeping a host's network adapter
//! and registry settings at their desired values:
//!
//! - **[`CommandExecutor`]**: The seam to the OS. [`ProcessExecutor`] runs
//!   commands as child processes; [`MockExecutor`] scripts replies for tests.
//!
//! - **[`HostShell`]**: Typed queries over an executor. The only layer that
//!   parses command output; everything above it works on typed values.
//!
//! - **[`Reconciler`]**: One observe-decide-act pass: resolve the adapter,
//!   [`classify`](classify::classify) its generation, then run the matching
//!   [`Converger`] action. Nothing is re-applied when state already matches.
//!
//! - **[`Monitor`]**: Background loop that re-runs the reconciler on an
//!   interval until its `CancellationToken` fires, absorbing failures.
//!
//! - **[`OneShotSetter`]**: Sets a registry value once per instance and
//!   restarts the dependent service.

pub mod classify;
pub mod commands;
pub mod config;
pub mod converge;
pub mod error;
pub mod exec;
pub mod host;
pub mod model;
pub mod monitor;
pub mod oneshot;
pub mod policy;
pub mod query;
pub mod reconciler;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::{ExecutorConfig, MonitorConfig, ReconcileConfig, RuntimeConfig};
pub use converge::Converger;
pub use error::{CoreError, ExecError, QueryError, Resource, Step};
pub use exec::{CommandExecutor, Invocation, MockExecutor, ProcessExecutor, ShellKind};
pub use model::{
    AdapterGeneration, AdapterName, Outcome, PropertyObservation, ReconcileReport,
    RegistryLocation,
};
pub use monitor::{Monitor, MonitorReport};
pub use oneshot::{OneShotSetter, SetterOutcome};
pub use policy::{AdapterPolicy, RegistryPolicy};
pub use query::HostShell;
pub use reconciler::Reconciler;
