// ── PowerShell command templates ──
//
// Every query and write nicsync issues is built here. Substituted values
// are always placed inside double quotes and escaped, so a value taken
// from a previous query cannot break out of its argument.

/// Escape `value` for use inside a double-quoted PowerShell string.
///
/// The backtick is PowerShell's escape character; `"` and `$` would
/// otherwise end the string or start an interpolation. The tokenizer also
/// takes the typographic quotes U+201C, U+201D and U+201E as `"`.
pub fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        if matches!(ch, '`' | '"' | '$' | '\u{201C}' | '\u{201D}' | '\u{201E}') {
            out.push('`');
        }
        out.push(ch);
    }
    out
}

// ── Adapters ─────────────────────────────────────────────────────────

/// Names of adapters whose interface description matches `pattern`.
pub fn adapter_by_description(pattern: &str) -> String {
    format!(
        r#"Get-NetAdapter | Where-Object {{ $_.InterfaceDescription -like "{}" }} | Select-Object -ExpandProperty Name"#,
        escape(pattern)
    )
}

/// The adapter name if `adapter` exposes `keyword` as an advanced property.
pub fn advanced_property_owner(adapter: &str, keyword: &str) -> String {
    format!(
        r#"Get-NetAdapterAdvancedProperty | Where-Object {{ $_.RegistryKeyword -like "{}" -and $_.Name -eq "{}" }} | Select-Object -ExpandProperty Name"#,
        escape(keyword),
        escape(adapter)
    )
}

/// Current registry value of advanced property `keyword` on `adapter`.
pub fn advanced_property_value(adapter: &str, keyword: &str) -> String {
    format!(
        r#"Get-NetAdapterAdvancedProperty | Where-Object {{ $_.RegistryKeyword -like "{}" -and $_.Name -eq "{}" }} | Select-Object -ExpandProperty RegistryValue"#,
        escape(keyword),
        escape(adapter)
    )
}

pub fn set_advanced_property(adapter: &str, keyword: &str, value: i64) -> String {
    format!(
        r#"Set-NetAdapterAdvancedProperty -Name "{}" -RegistryKeyword "{}" -RegistryValue {value}"#,
        escape(adapter),
        escape(keyword)
    )
}

pub fn restart_adapter(adapter: &str) -> String {
    format!(r#"Restart-NetAdapter -Name "{}""#, escape(adapter))
}

// ── PnP devices ──────────────────────────────────────────────────────

/// PnP instance id of the device backing `adapter`.
pub fn adapter_device_id(adapter: &str) -> String {
    format!(
        r#"Get-NetAdapter -Name "{}" | Select-Object -ExpandProperty PnPDeviceID"#,
        escape(adapter)
    )
}

/// Driver binding (`DEVPKEY_Device_Driver`) of the device `device_id`.
pub fn device_driver_key(device_id: &str) -> String {
    format!(
        r#"Get-PnpDeviceProperty -InstanceId "{}" | Where-Object KeyName -EQ "DEVPKEY_Device_Driver" | Select-Object -ExpandProperty Data"#,
        escape(device_id)
    )
}

// ── Registry ─────────────────────────────────────────────────────────

/// Current value of `name` under `path`; empty output when the value is absent.
pub fn registry_value(path: &str, name: &str) -> String {
    let name = escape(name);
    format!(
        r#"Get-ItemProperty -Path "{}" -Name "{name}" -ErrorAction SilentlyContinue | Select-Object -ExpandProperty "{name}""#,
        escape(path)
    )
}

/// Create (or overwrite) a string-typed value. The value may not exist yet.
pub fn new_registry_string(path: &str, name: &str, value: &str) -> String {
    format!(
        r#"New-ItemProperty -Path "{}" -Name "{}" -Value "{}" -PropertyType String -Force"#,
        escape(path),
        escape(name),
        escape(value)
    )
}

/// Overwrite an existing value.
pub fn set_registry_value(path: &str, name: &str, value: &str) -> String {
    format!(
        r#"Set-ItemProperty -Path "{}" -Name "{}" -Value "{}""#,
        escape(path),
        escape(name),
        escape(value)
    )
}

pub fn test_path(path: &str) -> String {
    format!(r#"Test-Path -Path "{}""#, escape(path))
}

// ── Services and processes ───────────────────────────────────────────

pub fn restart_service(name: &str) -> String {
    format!(r#"Restart-Service -Name "{}""#, escape(name))
}

pub fn process_details(pid: u32) -> String {
    format!("Get-Process -Id {pid} | Format-List")
}

pub fn process_exists(pid: u32) -> String {
    format!("Get-Process -Id {pid}")
}

/// System-shell command. `image` must already be validated by the caller.
pub fn kill_process(image: &str) -> String {
    format!("taskkill /IM {image} /F")
}
