//! Typed host queries.
//!
//! [`HostShell`] is the only place that interprets command output. Each
//! query issues exactly one command, trims the result and parses it into
//! a typed value; callers above this layer never see raw text.
//!
//! Empty output from a lookup means "no such resource" and is returned as
//! `None`. It is never an error: callers branch on the option, and a
//! failed command surfaces as [`QueryError`] instead.

use std::sync::Arc;

use tracing::debug;

use crate::commands;
use crate::error::{ExecError, QueryError};
use crate::exec::CommandExecutor;
use crate::model::AdapterName;

// ── Parsing ──────────────────────────────────────────────────────────

/// Parse trimmed output as a signed integer.
pub fn parse_integer(output: &str) -> Result<i64, QueryError> {
    let trimmed = output.trim();
    trimmed.parse().map_err(|_| QueryError::Parse {
        expected: "an integer",
        output: trimmed.to_owned(),
    })
}

/// Parse PowerShell's `True` / `False`, case-insensitively.
pub fn parse_bool(output: &str) -> Result<bool, QueryError> {
    let trimmed = output.trim();
    if trimmed.eq_ignore_ascii_case("true") {
        Ok(true)
    } else if trimmed.eq_ignore_ascii_case("false") {
        Ok(false)
    } else {
        Err(QueryError::Parse {
            expected: "True or False",
            output: trimmed.to_owned(),
        })
    }
}

// ── HostShell ────────────────────────────────────────────────────────

/// Typed query interface over a [`CommandExecutor`].
///
/// Cheaply cloneable; clones share the executor.
#[derive(Clone)]
pub struct HostShell {
    exec: Arc<dyn CommandExecutor>,
}

impl std::fmt::Debug for HostShell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HostShell").finish_non_exhaustive()
    }
}

impl HostShell {
    pub fn new(exec: Arc<dyn CommandExecutor>) -> Self {
        Self { exec }
    }

    pub fn executor(&self) -> &Arc<dyn CommandExecutor> {
        &self.exec
    }

    // ── Primitive queries ────────────────────────────────────────────

    /// Run a PowerShell query and return its trimmed output.
    pub async fn text(&self, command: &str) -> Result<String, QueryError> {
        let out = self.exec.run_powershell(command).await?;
        Ok(out.trim().to_owned())
    }

    /// Run a lookup; empty output is `None`. Multiple matches yield the first.
    pub async fn lookup(&self, command: &str) -> Result<Option<String>, QueryError> {
        let out = self.exec.run_powershell(command).await?;
        let mut lines = out.lines().map(str::trim).filter(|l| !l.is_empty());
        let first = lines.next().map(str::to_owned);
        let extra = lines.count();
        if extra > 0 {
            debug!(extra, selected = ?first, "lookup matched several entries, using the first");
        }
        Ok(first)
    }

    /// Run a lookup that must match at most one entry.
    pub async fn unique(&self, command: &str) -> Result<Option<String>, QueryError> {
        let out = self.exec.run_powershell(command).await?;
        let entries: Vec<&str> = out.lines().map(str::trim).filter(|l| !l.is_empty()).collect();
        match entries.as_slice() {
            [] => Ok(None),
            [one] => Ok(Some((*one).to_owned())),
            many => Err(QueryError::Ambiguous {
                count: many.len(),
                entries: many.join(", "),
            }),
        }
    }

    pub async fn integer(&self, command: &str) -> Result<i64, QueryError> {
        let out = self.exec.run_powershell(command).await?;
        parse_integer(&out)
    }

    pub async fn boolean(&self, command: &str) -> Result<bool, QueryError> {
        let out = self.exec.run_powershell(command).await?;
        parse_bool(&out)
    }

    /// Run a mutating PowerShell command, discarding its output.
    pub async fn apply(&self, command: &str) -> Result<(), ExecError> {
        self.exec.run_powershell(command).await.map(drop)
    }

    /// Run a command through the OS shell and return trimmed output.
    pub async fn shell(&self, command: &str) -> Result<String, ExecError> {
        let out = self.exec.run_shell(command).await?;
        Ok(out.trim().to_owned())
    }

    // ── Adapters ─────────────────────────────────────────────────────

    pub async fn adapter_name(&self, pattern: &str) -> Result<Option<AdapterName>, QueryError> {
        let found = self.lookup(&commands::adapter_by_description(pattern)).await?;
        Ok(found.and_then(AdapterName::new))
    }

    /// `Some(name)` if `adapter` exposes `keyword` as an advanced property.
    pub async fn advanced_property_owner(
        &self,
        adapter: &AdapterName,
        keyword: &str,
    ) -> Result<Option<AdapterName>, QueryError> {
        let found = self
            .lookup(&commands::advanced_property_owner(adapter.as_str(), keyword))
            .await?;
        Ok(found.and_then(AdapterName::new))
    }

    pub async fn advanced_property(
        &self,
        adapter: &AdapterName,
        keyword: &str,
    ) -> Result<i64, QueryError> {
        self.integer(&commands::advanced_property_value(adapter.as_str(), keyword))
            .await
    }

    pub async fn set_advanced_property(
        &self,
        adapter: &AdapterName,
        keyword: &str,
        value: i64,
    ) -> Result<(), ExecError> {
        self.apply(&commands::set_advanced_property(adapter.as_str(), keyword, value))
            .await
    }

    pub async fn restart_adapter(&self, adapter: &AdapterName) -> Result<(), ExecError> {
        self.apply(&commands::restart_adapter(adapter.as_str())).await
    }

    // ── PnP devices ──────────────────────────────────────────────────

    /// PnP device of `adapter`. More than one id is an error, never a pick.
    pub async fn device_id(&self, adapter: &AdapterName) -> Result<Option<String>, QueryError> {
        self.unique(&commands::adapter_device_id(adapter.as_str()))
            .await
    }

    pub async fn driver_key(&self, device_id: &str) -> Result<Option<String>, QueryError> {
        self.lookup(&commands::device_driver_key(device_id)).await
    }

    // ── Registry ─────────────────────────────────────────────────────

    /// Integer registry value; `None` when the value does not exist yet.
    pub async fn registry_integer(
        &self,
        path: &str,
        name: &str,
    ) -> Result<Option<i64>, QueryError> {
        let out = self.text(&commands::registry_value(path, name)).await?;
        if out.is_empty() {
            return Ok(None);
        }
        parse_integer(&out).map(Some)
    }

    /// String registry value; empty when the value does not exist yet.
    pub async fn registry_string(&self, path: &str, name: &str) -> Result<String, QueryError> {
        self.text(&commands::registry_value(path, name)).await
    }

    pub async fn create_registry_string(
        &self,
        path: &str,
        name: &str,
        value: &str,
    ) -> Result<(), ExecError> {
        self.apply(&commands::new_registry_string(path, name, value))
            .await
    }

    pub async fn set_registry_string(
        &self,
        path: &str,
        name: &str,
        value: &str,
    ) -> Result<(), ExecError> {
        self.apply(&commands::set_registry_value(path, name, value))
            .await
    }

    pub async fn key_exists(&self, path: &str) -> Result<bool, QueryError> {
        self.boolean(&commands::test_path(path)).await
    }

    // ── Services ─────────────────────────────────────────────────────

    pub async fn restart_service(&self, name: &str) -> Result<(), ExecError> {
        self.apply(&commands::restart_service(name)).await
    }
}
