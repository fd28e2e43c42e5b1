// ── Runtime configuration ──
//
// These types describe *how* nicsync runs: which interpreter to call,
// how long a command may take, how often the monitor ticks. They never
// touch disk; `nicsync-config` builds them from files and environment.

use std::path::PathBuf;
use std::time::Duration;

use crate::policy::DEFAULT_MONITOR_INTERVAL;

/// How commands are executed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutorConfig {
    /// PowerShell executable, resolved through `PATH` when not absolute.
    pub powershell: PathBuf,
    /// Per-command time limit. `None` waits indefinitely.
    pub timeout: Option<Duration>,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            powershell: PathBuf::from("powershell.exe"),
            timeout: Some(Duration::from_secs(60)),
        }
    }
}

/// Reconciliation behaviour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReconcileConfig {
    /// Re-read the value after an apply and fail on mismatch.
    ///
    /// Off by default: a direct property write is trusted as final.
    pub verify_after_apply: bool,
}

/// Monitor loop timing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonitorConfig {
    pub interval: Duration,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            interval: DEFAULT_MONITOR_INTERVAL,
        }
    }
}

impl MonitorConfig {
    /// Positive `secs` overrides the default; zero, negative or absent does not.
    pub fn from_secs(secs: Option<i64>) -> Self {
        let interval = secs
            .filter(|s| *s > 0)
            .and_then(|s| u64::try_from(s).ok())
            .map_or(DEFAULT_MONITOR_INTERVAL, Duration::from_secs);
        Self { interval }
    }
}

/// Everything the CLI hands to the core.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RuntimeConfig {
    pub executor: ExecutorConfig,
    pub reconcile: ReconcileConfig,
    pub monitor: MonitorConfig,
    /// Run the remote-ARP one-shot setter before the monitor loop starts.
    pub remote_arp_on_start: bool,
}
