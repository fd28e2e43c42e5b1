// ── Desired-state policy ──
//
// The desired values are compiled in. The policy structs exist so the
// reconciliation code is not welded to one adapter family, but nothing
// outside this crate's constructors fills them from configuration.

use std::time::Duration;

/// Advanced-property keyword controlling 802.1p priority and VLAN tagging.
pub const PRIORITY_VLAN_TAG_KEYWORD: &str = "*PriorityVLANTag";

/// `3` = packet priority and VLAN enabled (NDIS standardized INF keyword).
pub const DESIRED_PRIORITY_VLAN_TAG: i64 = 3;

/// Wildcard matched against adapter and PnP device descriptions.
pub const MELLANOX_DESCRIPTION_PATTERN: &str = "*Mellanox*";

/// Network driver class key; the device's driver binding is appended.
pub const DRIVER_CLASS_REGISTRY_PREFIX: &str = r"HKLM:\System\CurrentControlSet\Control\Class\";

/// Host Networking Service state key.
pub const HNS_STATE_KEY: &str = r"HKLM:\SYSTEM\CurrentControlSet\Services\hns\State";

/// Registry value that makes HNS answer VLAN-tagged ARP requests from inside the VM.
pub const SDN_REMOTE_ARP_MAC_VALUE: &str = "SDNRemoteArpMacAddress";

pub const SDN_REMOTE_ARP_MAC_ADDRESS: &str = "12-34-56-78-9a-bc";

pub const HNS_SERVICE_NAME: &str = "hns";

/// Interval between monitor cycles when none (or a non-positive one) is configured.
pub const DEFAULT_MONITOR_INTERVAL: Duration = Duration::from_secs(30);

/// Which adapters to converge and to what value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdapterPolicy {
    /// `-like` wildcard matched against interface and device descriptions.
    pub description_pattern: String,
    /// Advanced-property / registry keyword.
    pub keyword: String,
    pub desired: i64,
    /// Prefix the driver key suffix is appended to (legacy generation).
    pub registry_prefix: String,
}

impl Default for AdapterPolicy {
    fn default() -> Self {
        Self {
            description_pattern: MELLANOX_DESCRIPTION_PATTERN.into(),
            keyword: PRIORITY_VLAN_TAG_KEYWORD.into(),
            desired: DESIRED_PRIORITY_VLAN_TAG,
            registry_prefix: DRIVER_CLASS_REGISTRY_PREFIX.into(),
        }
    }
}

impl AdapterPolicy {
    /// Same adapter selection, different desired value.
    pub fn with_desired(mut self, desired: i64) -> Self {
        self.desired = desired;
        self
    }
}

/// A registry value set once per process, followed by a service restart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryPolicy {
    pub key_path: String,
    pub value_name: String,
    pub desired: String,
    /// Service restarted after a write so the change takes effect.
    pub service: String,
}

impl RegistryPolicy {
    /// The HNS remote-ARP MAC address needed for multitenancy.
    pub fn sdn_remote_arp() -> Self {
        Self {
            key_path: HNS_STATE_KEY.into(),
            value_name: SDN_REMOTE_ARP_MAC_VALUE.into(),
            desired: SDN_REMOTE_ARP_MAC_ADDRESS.into(),
            service: HNS_SERVICE_NAME.into(),
        }
    }
}
