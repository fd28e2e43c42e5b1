//! Long-running monitor, stopped by Ctrl-C.

use std::fmt::Write as _;

use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use nicsync_core::{
    AdapterPolicy, HostShell, Monitor, MonitorConfig, MonitorReport, OneShotSetter, Reconciler,
    RuntimeConfig,
};

use crate::cli::{GlobalOpts, MonitorArgs};
use crate::error::CliError;
use crate::output;

pub async fn handle(
    shell: &HostShell,
    mut runtime: RuntimeConfig,
    args: MonitorArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    if let Some(secs) = args.interval {
        runtime.monitor = MonitorConfig::from_secs(Some(secs));
    }
    runtime.reconcile.verify_after_apply |= args.verify;

    if runtime.remote_arp_on_start || args.remote_arp {
        // Not fatal: the monitor is still useful without it.
        match OneShotSetter::sdn_remote_arp().ensure(shell).await {
            Ok(outcome) => info!(%outcome, "remote ARP setter finished"),
            Err(e) => warn!(error = %e, "remote ARP setter failed"),
        }
    }

    let cancel = CancellationToken::new();
    let signal = cancel.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("interrupt received, stopping after the current cycle");
                signal.cancel();
            }
            Err(e) => warn!(error = %e, "cannot listen for Ctrl-C"),
        }
    });

    let reconciler = Reconciler::new(shell.clone(), AdapterPolicy::default(), runtime.reconcile);
    let report = Monitor::new(reconciler, runtime.monitor).run(cancel).await;

    let out = output::render(global.output, &report, describe)?;
    output::print_output(&out, global.quiet);
    Ok(())
}

fn describe(report: &MonitorReport) -> String {
    let mut line = format!(
        "monitor stopped after {} cycle(s), {} failed",
        report.cycles, report.failures
    );
    if let Some(outcome) = report.last_outcome {
        let _ = write!(line, "; last outcome: {outcome}");
    }
    line
}
