//! One-shot reconciliation.

use nicsync_core::{AdapterPolicy, HostShell, Outcome, ReconcileReport, Reconciler, RuntimeConfig};

use crate::cli::{GlobalOpts, ReconcileArgs};
use crate::error::CliError;
use crate::output;

pub async fn handle(
    shell: &HostShell,
    mut runtime: RuntimeConfig,
    args: ReconcileArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    runtime.reconcile.verify_after_apply |= args.verify;
    let policy = AdapterPolicy::default();
    let pattern = policy.description_pattern.clone();

    let reconciler = Reconciler::new(shell.clone(), policy, runtime.reconcile);
    let report = reconciler.reconcile_once().await?;

    let out = output::render(global.output, &report, |r| describe(r, &pattern))?;
    output::print_output(&out, global.quiet);
    Ok(())
}

/// One-line summary of a report.
pub fn describe(report: &ReconcileReport, pattern: &str) -> String {
    match (&report.adapter, report.generation) {
        (Some(adapter), Some(generation)) => {
            let what = match report.outcome {
                Outcome::Unchanged => "already converged",
                Outcome::Applied => "value written",
                Outcome::AppliedAndRestarted => "value written, adapter restarted",
                Outcome::Verified => "value written and verified",
                Outcome::NoAdapter => "no adapter",
            };
            format!("{adapter} ({generation}): {what}")
        }
        _ => format!("no adapter matches '{pattern}'"),
    }
}
