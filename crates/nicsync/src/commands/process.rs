//! Process helpers used when diagnosing CNI plugin hosts.

use serde::Serialize;

use nicsync_core::HostShell;
use nicsync_core::host;

use crate::cli::{GlobalOpts, KillProcessArgs, ProcessNameArgs};
use crate::error::CliError;
use crate::output;

#[derive(Debug, Serialize)]
struct ProcessInfo {
    pid: u32,
    name: String,
}

pub async fn name(
    shell: &HostShell,
    args: ProcessNameArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let name = host::process_name(shell, args.pid).await?;

    let info = ProcessInfo {
        pid: args.pid,
        name,
    };
    let out = output::render(global.output, &info, |i| i.name.clone())?;
    output::print_output(&out, global.quiet);
    Ok(())
}

pub async fn kill(
    shell: &HostShell,
    args: KillProcessArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    host::kill_process_by_name(shell, &args.image).await?;

    let out = output::render(
        global.output,
        &serde_json::json!({ "killed": args.image }),
        |_| format!("killed {}", args.image),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}
