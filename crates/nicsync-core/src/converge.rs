// ── Convergence actions ──
//
// One action per adapter generation. Both read before they write and
// return `Outcome::Unchanged` without touching the host when the value
// already matches. Only the legacy action restarts the adapter, and only
// after a confirmed mismatch and a successful write.
//
// Errors are attributed to the adapter via `CoreError::Convergence`.

use tracing::{debug, info, warn};

use crate::config::ReconcileConfig;
use crate::error::{CoreError, Resource, Step};
use crate::model::{AdapterName, Outcome, PropertyObservation, RegistryLocation};
use crate::policy::AdapterPolicy;
use crate::query::HostShell;

/// Applies an [`AdapterPolicy`] to a single adapter.
#[derive(Debug, Clone, Copy)]
pub struct Converger<'a> {
    shell: &'a HostShell,
    policy: &'a AdapterPolicy,
    config: ReconcileConfig,
}

impl<'a> Converger<'a> {
    pub fn new(shell: &'a HostShell, policy: &'a AdapterPolicy, config: ReconcileConfig) -> Self {
        Self {
            shell,
            policy,
            config,
        }
    }

    // ── Direct-property generation ───────────────────────────────────

    /// Read the advanced property and pair it with the desired value.
    pub async fn observe(&self, adapter: &AdapterName) -> Result<PropertyObservation, CoreError> {
        let current = self
            .shell
            .advanced_property(adapter, &self.policy.keyword)
            .await
            .map_err(CoreError::query(Step::PropertyRead))?;

        Ok(PropertyObservation {
            adapter: adapter.clone(),
            property: self.policy.keyword.clone(),
            current,
            desired: self.policy.desired,
        })
    }

    /// Converge an adapter whose driver exposes the keyword directly.
    ///
    /// A successful write is final unless `verify_after_apply` is set.
    pub async fn converge_direct(&self, adapter: &AdapterName) -> Result<Outcome, CoreError> {
        self.direct(adapter)
            .await
            .map_err(CoreError::convergence(adapter.as_str()))
    }

    async fn direct(&self, adapter: &AdapterName) -> Result<Outcome, CoreError> {
        let observation = self.observe(adapter).await?;
        if observation.is_converged() {
            info!(
                adapter = %adapter,
                keyword = %observation.property,
                value = observation.current,
                "already at desired value, skipping"
            );
            return Ok(Outcome::Unchanged);
        }

        self.shell
            .set_advanced_property(adapter, &self.policy.keyword, self.policy.desired)
            .await
            .map_err(|source| CoreError::Apply {
                step: Step::PropertyWrite,
                target: adapter.to_string(),
                source,
            })?;
        info!(
            adapter = %adapter,
            keyword = %observation.property,
            from = observation.current,
            to = observation.desired,
            "advanced property set"
        );

        if !self.config.verify_after_apply {
            return Ok(Outcome::Applied);
        }

        let observed = self
            .shell
            .advanced_property(adapter, &self.policy.keyword)
            .await
            .map_err(CoreError::query(Step::VerificationRead))?;
        verify(adapter.as_str(), self.policy.desired, Some(observed))
    }

    // ── Legacy generation ────────────────────────────────────────────

    /// Resolve the driver registry key of the device backing `adapter`.
    ///
    /// Device id, then driver binding, then path; each step needs the
    /// previous one's result.
    pub async fn resolve_location(
        &self,
        adapter: &AdapterName,
    ) -> Result<RegistryLocation, CoreError> {
        debug!(adapter = %adapter, "looking up backing PnP device");

        let device_id = self
            .shell
            .device_id(adapter)
            .await
            .map_err(CoreError::query(Step::DeviceLookup))?
            .ok_or_else(|| CoreError::NotFound {
                resource: Resource::Device,
                criteria: adapter.to_string(),
            })?;

        debug!(%device_id, "device found, reading driver binding");
        let driver_key = self
            .shell
            .driver_key(&device_id)
            .await
            .map_err(CoreError::query(Step::DriverLookup))?
            .ok_or_else(|| CoreError::Resolution {
                resource: Resource::DriverKey,
                identifier: device_id.clone(),
            })?;

        Ok(RegistryLocation::new(
            &self.policy.registry_prefix,
            device_id,
            driver_key,
        ))
    }

    /// Converge an adapter whose keyword lives only in the driver registry key.
    ///
    /// Writes the value as a string (creating it if needed) and restarts
    /// the adapter so the driver re-reads its configuration.
    pub async fn converge_legacy(&self, adapter: &AdapterName) -> Result<Outcome, CoreError> {
        self.legacy(adapter)
            .await
            .map_err(CoreError::convergence(adapter.as_str()))
    }

    async fn legacy(&self, adapter: &AdapterName) -> Result<Outcome, CoreError> {
        let location = self.resolve_location(adapter).await?;
        let keyword = &self.policy.keyword;
        let desired = self.policy.desired;

        let current = self
            .shell
            .registry_integer(&location.path, keyword)
            .await
            .map_err(CoreError::query(Step::RegistryRead))?;
        if current == Some(desired) {
            info!(
                adapter = %adapter,
                path = %location.path,
                value = desired,
                "already at desired value, skipping"
            );
            return Ok(Outcome::Unchanged);
        }

        self.shell
            .create_registry_string(&location.path, keyword, &desired.to_string())
            .await
            .map_err(|source| CoreError::Apply {
                step: Step::RegistryWrite,
                target: location.path.clone(),
                source,
            })?;
        info!(
            adapter = %adapter,
            path = %location.path,
            %keyword,
            from = ?current,
            to = desired,
            "driver registry value written, restarting adapter"
        );

        self.shell
            .restart_adapter(adapter)
            .await
            .map_err(|source| CoreError::Restart {
                step: Step::AdapterRestart,
                target: adapter.to_string(),
                source,
            })?;
        info!(adapter = %adapter, value = desired, "legacy adapter restarted with new value");

        if !self.config.verify_after_apply {
            return Ok(Outcome::AppliedAndRestarted);
        }

        let observed = self
            .shell
            .registry_integer(&location.path, keyword)
            .await
            .map_err(CoreError::query(Step::VerificationRead))?;
        verify(&location.path, desired, observed)
    }
}

fn verify(target: &str, expected: i64, observed: Option<i64>) -> Result<Outcome, CoreError> {
    if observed == Some(expected) {
        return Ok(Outcome::Verified);
    }
    warn!(%target, expected, ?observed, "value did not stick after apply");
    Err(CoreError::Verification {
        target: target.to_owned(),
        expected: expected.to_string(),
        observed: observed.map_or_else(|| "<absent>".to_owned(), |v| v.to_string()),
    })
}
