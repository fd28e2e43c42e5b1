// ── Host utilities ──
//
// One-shot OS queries with no reconciliation semantics.

use tracing::{debug, warn};

use crate::commands;
use crate::error::{CoreError, QueryError, Resource, Step};
use crate::query::HostShell;

/// Operating system the binary was built for, e.g. `windows`.
pub fn os_info() -> &'static str {
    std::env::consts::OS
}

/// Whether process queries work on this host (probes our own PID).
pub async fn process_supported(shell: &HostShell) -> Result<(), CoreError> {
    shell
        .text(&commands::process_exists(std::process::id()))
        .await
        .map(drop)
        .map_err(CoreError::query(Step::ProcessLookup))
}

/// Extract the `Name` field from `Get-Process | Format-List` output.
pub fn parse_process_name(listing: &str) -> Option<&str> {
    listing
        .lines()
        .filter(|line| line.contains("Name"))
        .find_map(|line| {
            let (key, value) = line.split_once(':')?;
            (key.trim() == "Name").then(|| value.trim())
        })
        .filter(|name| !name.is_empty())
}

/// Name of the running process with id `pid`.
pub async fn process_name(shell: &HostShell, pid: u32) -> Result<String, CoreError> {
    let listing = shell
        .text(&commands::process_details(pid))
        .await
        .map_err(|e| {
            debug!(pid, error = %e, "process is not running");
            CoreError::query(Step::ProcessLookup)(e)
        })?;

    if listing.is_empty() {
        return Err(CoreError::NotFound {
            resource: Resource::Process,
            criteria: pid.to_string(),
        });
    }

    parse_process_name(&listing)
        .map(str::to_owned)
        .ok_or_else(|| {
            CoreError::query(Step::ProcessLookup)(QueryError::Parse {
                expected: "a 'Name : value' line",
                output: listing.clone(),
            })
        })
}

/// Forcefully terminate every process with image name `image`.
pub async fn kill_process_by_name(shell: &HostShell, image: &str) -> Result<(), CoreError> {
    let valid = !image.is_empty()
        && image
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'));
    if !valid {
        return Err(CoreError::InvalidInput {
            field: "process image name",
            reason: format!("'{image}' may only contain letters, digits, '.', '-' and '_'"),
        });
    }

    shell
        .shell(&commands::kill_process(image))
        .await
        .map(drop)
        .map_err(|source| {
            warn!(%image, error = %source, "taskkill failed");
            CoreError::Apply {
                step: Step::ProcessKill,
                target: image.to_owned(),
                source,
            }
        })
}
