// ── One-shot idempotent setter ──
//
// Sets a registry value once per setter lifetime and restarts the
// dependent service so it takes effect. The "already done" flag lives on
// the setter instance; the whole check-then-set sequence holds its lock,
// so concurrent callers run one at a time and at most one restart is
// issued.

use serde::Serialize;
use strum::Display;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::error::{CoreError, Step};
use crate::policy::RegistryPolicy;
use crate::query::HostShell;

/// What a call to [`OneShotSetter::ensure`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SetterOutcome {
    /// An earlier call already succeeded; no commands were issued.
    AlreadyApplied,
    /// The key does not exist (service not installed); will retry next call.
    Skipped,
    /// The value was already correct; flag set without writing.
    AlreadySet,
    /// The value was written and the service restarted.
    Applied,
}

/// Applies a [`RegistryPolicy`] at most once per instance.
#[derive(Debug)]
pub struct OneShotSetter {
    policy: RegistryPolicy,
    applied: Mutex<bool>,
}

impl OneShotSetter {
    pub fn new(policy: RegistryPolicy) -> Self {
        Self {
            policy,
            applied: Mutex::new(false),
        }
    }

    /// Setter for the HNS `SDNRemoteArpMacAddress` value.
    pub fn sdn_remote_arp() -> Self {
        Self::new(RegistryPolicy::sdn_remote_arp())
    }

    pub fn policy(&self) -> &RegistryPolicy {
        &self.policy
    }

    pub async fn is_applied(&self) -> bool {
        *self.applied.lock().await
    }

    /// Forget a previous success so the next call checks the host again.
    pub async fn reset(&self) {
        *self.applied.lock().await = false;
    }

    /// Make sure the value is in place. Errors leave the flag unset.
    pub async fn ensure(&self, shell: &HostShell) -> Result<SetterOutcome, CoreError> {
        let mut applied = self.applied.lock().await;
        if *applied {
            return Ok(SetterOutcome::AlreadyApplied);
        }

        let policy = &self.policy;
        let present = shell
            .key_exists(&policy.key_path)
            .await
            .map_err(CoreError::query(Step::KeyProbe))?;
        if !present {
            debug!(key = %policy.key_path, "registry key absent, skipping");
            return Ok(SetterOutcome::Skipped);
        }

        let current = shell
            .registry_string(&policy.key_path, &policy.value_name)
            .await
            .map_err(CoreError::query(Step::RegistryRead))?;
        if current == policy.desired {
            debug!(value = %policy.value_name, "already set");
            *applied = true;
            return Ok(SetterOutcome::AlreadySet);
        }

        shell
            .set_registry_string(&policy.key_path, &policy.value_name, &policy.desired)
            .await
            .map_err(|source| {
                warn!(value = %policy.value_name, error = %source, "failed to set registry value");
                CoreError::Apply {
                    step: Step::RegistryWrite,
                    target: format!("{}\\{}", policy.key_path, policy.value_name),
                    source,
                }
            })?;
        info!(
            value = %policy.value_name,
            service = %policy.service,
            "registry value set, restarting service"
        );

        shell
            .restart_service(&policy.service)
            .await
            .map_err(|source| {
                warn!(service = %policy.service, error = %source, "failed to restart service");
                CoreError::Restart {
                    step: Step::ServiceRestart,
                    target: policy.service.clone(),
                    source,
                }
            })?;

        *applied = true;
        Ok(SetterOutcome::Applied)
    }
}
