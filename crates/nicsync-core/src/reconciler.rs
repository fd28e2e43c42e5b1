// ── Reconciler ──
//
// One observe-decide-act pass: find the adapter, classify it, run the
// matching convergence action. Errors are logged and returned, never
// retried here; the monitor loop is the retry boundary.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::classify::classify;
use crate::config::ReconcileConfig;
use crate::converge::Converger;
use crate::error::{CoreError, Step};
use crate::model::{AdapterGeneration, AdapterName, ReconcileReport};
use crate::policy::AdapterPolicy;
use crate::query::HostShell;

/// Drives convergence of one [`AdapterPolicy`].
///
/// Cheaply cloneable via `Arc<ReconcilerInner>`, so the same instance can
/// be handed to a background monitor and used for on-demand passes.
#[derive(Debug, Clone)]
pub struct Reconciler {
    inner: Arc<ReconcilerInner>,
}

#[derive(Debug)]
struct ReconcilerInner {
    shell: HostShell,
    policy: AdapterPolicy,
    config: ReconcileConfig,
}

impl Reconciler {
    pub fn new(shell: HostShell, policy: AdapterPolicy, config: ReconcileConfig) -> Self {
        Self {
            inner: Arc::new(ReconcilerInner {
                shell,
                policy,
                config,
            }),
        }
    }

    pub fn shell(&self) -> &HostShell {
        &self.inner.shell
    }

    pub fn policy(&self) -> &AdapterPolicy {
        &self.inner.policy
    }

    fn converger(&self) -> Converger<'_> {
        Converger::new(&self.inner.shell, &self.inner.policy, self.inner.config)
    }

    /// Name of the first adapter matching the policy's description pattern.
    pub async fn resolve_adapter(&self) -> Result<Option<AdapterName>, CoreError> {
        self.inner
            .shell
            .adapter_name(&self.inner.policy.description_pattern)
            .await
            .map_err(CoreError::query(Step::AdapterLookup))
    }

    /// Whether a matching adapter is present. Lookup failures count as absent.
    pub async fn has_matching_adapter(&self) -> bool {
        match self.resolve_adapter().await {
            Ok(Some(adapter)) => {
                info!(adapter = %adapter, "matching adapter present");
                true
            }
            Ok(None) => {
                debug!(
                    pattern = %self.inner.policy.description_pattern,
                    "no adapter matches description"
                );
                false
            }
            Err(e) => {
                warn!(error = %e, "adapter lookup failed");
                false
            }
        }
    }

    /// Detect the generation of `adapter` without converging it.
    pub async fn generation(&self, adapter: &AdapterName) -> Result<AdapterGeneration, CoreError> {
        classify(&self.inner.shell, adapter, &self.inner.policy.keyword).await
    }

    /// Resolve the adapter and converge it. No adapter is not an error.
    pub async fn reconcile_once(&self) -> Result<ReconcileReport, CoreError> {
        let adapter = match self.resolve_adapter().await {
            Ok(Some(adapter)) => adapter,
            Ok(None) => {
                debug!(
                    pattern = %self.inner.policy.description_pattern,
                    "no adapter found, nothing to do"
                );
                return Ok(ReconcileReport::no_adapter());
            }
            Err(e) => {
                warn!(error = %e, "adapter lookup failed");
                return Err(e);
            }
        };
        self.reconcile_adapter(&adapter).await
    }

    /// Classify `adapter` and run exactly one convergence action on it.
    pub async fn reconcile_adapter(
        &self,
        adapter: &AdapterName,
    ) -> Result<ReconcileReport, CoreError> {
        let result = self.dispatch(adapter).await;
        if let Err(ref e) = result {
            warn!(adapter = %adapter, error = %e, "reconciliation failed");
        }
        result
    }

    async fn dispatch(&self, adapter: &AdapterName) -> Result<ReconcileReport, CoreError> {
        let generation = self.generation(adapter).await?;
        let converger = self.converger();

        let outcome = match generation {
            AdapterGeneration::DirectProperty => converger.converge_direct(adapter).await?,
            AdapterGeneration::Legacy => converger.converge_legacy(adapter).await?,
        };
        debug!(adapter = %adapter, %generation, %outcome, "reconciliation complete");

        Ok(ReconcileReport {
            adapter: Some(adapter.clone()),
            generation: Some(generation),
            outcome,
        })
    }
}
