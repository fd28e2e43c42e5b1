// Shared fixtures for the nicsync-core integration tests.
//
// Responses are keyed on the exact command strings from `commands`, so a
// fixture can never accidentally answer a different query.
#![allow(dead_code, clippy::unwrap_used)]

use std::sync::Arc;

use nicsync_core::commands;
use nicsync_core::policy::{
    DRIVER_CLASS_REGISTRY_PREFIX, MELLANOX_DESCRIPTION_PATTERN, PRIORITY_VLAN_TAG_KEYWORD,
};
use nicsync_core::{AdapterName, AdapterPolicy, HostShell, MockExecutor};

pub const ADAPTER: &str = "Ethernet 3";
pub const DEVICE_ID: &str = r"PCI\VEN_15B3&DEV_1003&SUBSYS_000615B3&REV_00\5&2A5E5C4&0&0";
pub const DRIVER_KEY: &str = r"{4d36e972-e325-11ce-bfc1-08002be10318}\0007";

pub const PROPERTY_WRITE: &str = "Set-NetAdapterAdvancedProperty";
pub const REGISTRY_WRITE: &str = "New-ItemProperty";
pub const ADAPTER_RESTART: &str = "Restart-NetAdapter";

pub fn host() -> (Arc<MockExecutor>, HostShell) {
    let mock = Arc::new(MockExecutor::new());
    let shell = HostShell::new(mock.clone());
    (mock, shell)
}

pub fn adapter() -> AdapterName {
    AdapterName::new(ADAPTER).unwrap()
}

pub fn policy() -> AdapterPolicy {
    AdapterPolicy::default()
}

pub fn registry_path() -> String {
    format!("{DRIVER_CLASS_REGISTRY_PREFIX}{DRIVER_KEY}")
}

// ── Command strings ─────────────────────────────────────────────────

pub fn adapter_lookup() -> String {
    commands::adapter_by_description(MELLANOX_DESCRIPTION_PATTERN)
}

pub fn generation_probe() -> String {
    commands::advanced_property_owner(ADAPTER, PRIORITY_VLAN_TAG_KEYWORD)
}

pub fn property_read() -> String {
    commands::advanced_property_value(ADAPTER, PRIORITY_VLAN_TAG_KEYWORD)
}

pub fn device_lookup() -> String {
    commands::adapter_device_id(ADAPTER)
}

pub fn driver_lookup() -> String {
    commands::device_driver_key(DEVICE_ID)
}

pub fn registry_read() -> String {
    commands::registry_value(&registry_path(), PRIORITY_VLAN_TAG_KEYWORD)
}

// ── Scenarios ───────────────────────────────────────────────────────

/// Adapter present and exposing the keyword; property reads return `values` in turn.
pub fn direct_host(mock: &MockExecutor, values: &[&str]) {
    mock.respond(&adapter_lookup(), &format!("{ADAPTER}\r\n"))
        .respond(&generation_probe(), ADAPTER)
        .respond_seq(&property_read(), values);
}

/// Adapter present without the keyword; registry reads return `values` in turn.
pub fn legacy_host(mock: &MockExecutor, values: &[&str]) {
    mock.respond(&adapter_lookup(), ADAPTER)
        .respond(&generation_probe(), "")
        .respond(&device_lookup(), DEVICE_ID)
        .respond(&driver_lookup(), DRIVER_KEY)
        .respond_seq(&registry_read(), values);
}

/// Index of the first recorded command containing `needle`.
pub fn position(mock: &MockExecutor, needle: &str) -> Option<usize> {
    mock.calls().iter().position(|c| c.command.contains(needle))
}
