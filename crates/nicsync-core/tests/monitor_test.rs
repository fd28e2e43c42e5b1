#![allow(clippy::unwrap_used)]
// Monitor timing and cancellation, on tokio's paused clock.

mod common;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use common::*;
use nicsync_core::{
    CommandExecutor, ExecError, HostShell, MockExecutor, Monitor, MonitorConfig, Outcome,
    ReconcileConfig, Reconciler,
};
use tokio_util::sync::CancellationToken;

fn monitor(shell: HostShell) -> Monitor {
    let reconciler = Reconciler::new(shell, policy(), ReconcileConfig::default());
    Monitor::new(reconciler, MonitorConfig::default())
}

#[tokio::test(start_paused = true)]
async fn cancelled_before_start_runs_no_cycles() {
    let (mock, shell) = host();
    let cancel = CancellationToken::new();
    cancel.cancel();

    let report = monitor(shell).run(cancel).await;

    assert_eq!(report.cycles, 0);
    assert!(mock.calls().is_empty());
}

#[tokio::test(start_paused = true)]
async fn first_cycle_waits_one_interval() {
    let (mock, shell) = host();
    let cancel = CancellationToken::new();
    let handle = monitor(shell).spawn(cancel.clone());

    tokio::time::sleep(Duration::from_secs(29)).await;
    assert_eq!(mock.count(&adapter_lookup()), 0);

    tokio::time::sleep(Duration::from_secs(16)).await;
    cancel.cancel();
    let report = handle.await.unwrap();

    assert_eq!(report.cycles, 1);
    assert_eq!(report.last_outcome, Some(Outcome::NoAdapter));
    assert!(report.last_cycle_at.is_some());
}

#[tokio::test(start_paused = true)]
async fn failing_cycles_do_not_stop_the_loop() {
    let (mock, shell) = host();
    mock.fail(&adapter_lookup(), "WinRM cannot complete the operation");
    let cancel = CancellationToken::new();
    let handle = monitor(shell).spawn(cancel.clone());

    tokio::time::sleep(Duration::from_secs(95)).await;
    cancel.cancel();
    let report = handle.await.unwrap();

    assert_eq!(report.cycles, 3);
    assert_eq!(report.failures, 3);
    assert_eq!(report.last_outcome, None);
    assert_eq!(mock.count(&adapter_lookup()), 3);
}

#[tokio::test(start_paused = true)]
async fn drift_is_corrected_on_a_later_cycle() {
    let (mock, shell) = host();
    direct_host(&mock, &["3", "1", "3"]);
    let cancel = CancellationToken::new();
    let handle = monitor(shell).spawn(cancel.clone());

    tokio::time::sleep(Duration::from_secs(95)).await;
    cancel.cancel();
    let report = handle.await.unwrap();

    assert_eq!(report.cycles, 3);
    assert_eq!(report.failures, 0);
    assert_eq!(report.last_outcome, Some(Outcome::Unchanged));
    assert_eq!(mock.count(PROPERTY_WRITE), 1);
}

#[tokio::test(start_paused = true)]
async fn custom_interval_is_honoured() {
    let (mock, shell) = host();
    let reconciler = Reconciler::new(shell, policy(), ReconcileConfig::default());
    let monitor = Monitor::new(reconciler, MonitorConfig::from_secs(Some(5)));
    assert_eq!(monitor.interval(), Duration::from_secs(5));

    let cancel = CancellationToken::new();
    let handle = monitor.spawn(cancel.clone());
    tokio::time::sleep(Duration::from_secs(22)).await;
    cancel.cancel();

    assert_eq!(handle.await.unwrap().cycles, 4);
    assert_eq!(mock.count(&adapter_lookup()), 4);
}

/// Cancels `token` as soon as a command containing `needle` is issued.
struct CancelMidCycle {
    inner: MockExecutor,
    token: CancellationToken,
    needle: String,
}

#[async_trait]
impl CommandExecutor for CancelMidCycle {
    async fn run_shell(&self, command: &str) -> Result<String, ExecError> {
        self.inner.run_shell(command).await
    }

    async fn run_powershell(&self, command: &str) -> Result<String, ExecError> {
        if command.contains(&self.needle) {
            self.token.cancel();
        }
        self.inner.run_powershell(command).await
    }
}

#[tokio::test(start_paused = true)]
async fn cycle_in_flight_completes_after_cancellation() {
    let cancel = CancellationToken::new();
    let exec = Arc::new(CancelMidCycle {
        inner: MockExecutor::new(),
        token: cancel.clone(),
        needle: generation_probe(),
    });
    direct_host(&exec.inner, &["1"]);
    let shell = HostShell::new(exec.clone());

    let report = monitor(shell).run(cancel).await;

    assert_eq!(report.cycles, 1);
    assert_eq!(report.last_outcome, Some(Outcome::Applied));
    assert_eq!(exec.inner.count(PROPERTY_WRITE), 1);
    assert_eq!(exec.inner.count(&adapter_lookup()), 1);
}
