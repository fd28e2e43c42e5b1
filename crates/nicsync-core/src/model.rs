// ── Observations and outcomes ──
//
// Values produced fresh by each query and consumed immediately by the
// convergence decision. Nothing here is cached between cycles.

use std::fmt;

use serde::Serialize;
use strum::Display;

/// Name of a network interface as reported by the adapter list.
///
/// Never empty: an empty lookup result is represented as `None` by the
/// query layer, not as an empty name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct AdapterName(String);

impl AdapterName {
    /// Trims `name`, returning `None` if nothing remains.
    pub fn new(name: impl AsRef<str>) -> Option<Self> {
        let trimmed = name.as_ref().trim();
        (!trimmed.is_empty()).then(|| Self(trimmed.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AdapterName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Which mechanism controls the priority/VLAN setting on this adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AdapterGeneration {
    /// The keyword is an advanced property of the adapter (driver v4 and up).
    DirectProperty,
    /// The keyword lives only in the driver's registry key (driver v3).
    Legacy,
}

/// Current vs. desired value of one adapter property.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PropertyObservation {
    pub adapter: AdapterName,
    pub property: String,
    pub current: i64,
    pub desired: i64,
}

impl PropertyObservation {
    pub fn is_converged(&self) -> bool {
        self.current == self.desired
    }
}

/// Registry key holding a legacy adapter's driver configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegistryLocation {
    /// PnP instance id of the device.
    pub device_id: String,
    /// Driver binding, e.g. `{4d36e972-e325-11ce-bfc1-08002be10318}\0001`.
    pub driver_key: String,
    /// `prefix + driver_key`.
    pub path: String,
}

impl RegistryLocation {
    pub fn new(prefix: &str, device_id: String, driver_key: String) -> Self {
        let path = format!("{prefix}{driver_key}");
        Self {
            device_id,
            driver_key,
            path,
        }
    }
}

/// Result of one reconciliation that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Outcome {
    /// No adapter matched the description pattern; nothing to do.
    NoAdapter,
    /// Observed state already matched.
    Unchanged,
    /// A write was issued and reported success.
    Applied,
    /// A write was issued and the adapter restarted to pick it up.
    AppliedAndRestarted,
    /// A write was issued and a re-read confirmed the desired value.
    Verified,
}

impl Outcome {
    /// Whether this outcome involved a mutation of host state.
    pub fn changed(self) -> bool {
        matches!(
            self,
            Self::Applied | Self::AppliedAndRestarted | Self::Verified
        )
    }
}

/// What a single reconciliation saw and did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReconcileReport {
    pub adapter: Option<AdapterName>,
    pub generation: Option<AdapterGeneration>,
    pub outcome: Outcome,
}

impl ReconcileReport {
    pub(crate) fn no_adapter() -> Self {
        Self {
            adapter: None,
            generation: None,
            outcome: Outcome::NoAdapter,
        }
    }
}
