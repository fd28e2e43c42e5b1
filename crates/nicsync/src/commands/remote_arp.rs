use serde::Serialize;

use nicsync_core::{HostShell, OneShotSetter, SetterOutcome};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

#[derive(Debug, Serialize)]
struct RemoteArpResult<'a> {
    key: &'a str,
    value: &'a str,
    desired: &'a str,
    outcome: SetterOutcome,
}

pub async fn handle(shell: &HostShell, global: &GlobalOpts) -> Result<(), CliError> {
    let setter = OneShotSetter::sdn_remote_arp();
    let outcome = setter.ensure(shell).await?;

    let policy = setter.policy();
    let result = RemoteArpResult {
        key: &policy.key_path,
        value: &policy.value_name,
        desired: &policy.desired,
        outcome,
    };
    let out = output::render(global.output, &result, |r| match r.outcome {
        SetterOutcome::Skipped => format!("{} not present, {} not set", r.key, r.value),
        SetterOutcome::AlreadySet | SetterOutcome::AlreadyApplied => {
            format!("{} already {}", r.value, r.desired)
        }
        SetterOutcome::Applied => {
            format!("{} set to {}, {} restarted", r.value, r.desired, policy.service)
        }
    })?;
    output::print_output(&out, global.quiet);
    Ok(())
}
