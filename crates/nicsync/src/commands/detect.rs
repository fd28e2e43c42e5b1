//! Read-only inspection of the host.

use std::fmt::Write as _;

use serde::Serialize;
use tracing::debug;

use nicsync_core::host;
use nicsync_core::{
    AdapterGeneration, AdapterName, AdapterPolicy, Converger, HostShell, PropertyObservation,
    ReconcileConfig, Reconciler, RegistryLocation,
};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

#[derive(Debug, Serialize)]
struct Detection {
    os: &'static str,
    process_queries: bool,
    pattern: String,
    adapter: Option<AdapterName>,
    generation: Option<AdapterGeneration>,
    /// Direct-property adapters only.
    property: Option<PropertyObservation>,
    /// Legacy adapters only.
    registry: Option<RegistryLocation>,
}

pub async fn handle(shell: &HostShell, global: &GlobalOpts) -> Result<(), CliError> {
    let reconciler = Reconciler::new(
        shell.clone(),
        AdapterPolicy::default(),
        ReconcileConfig::default(),
    );
    let policy = reconciler.policy();
    let process_queries = match host::process_supported(shell).await {
        Ok(()) => true,
        Err(e) => {
            debug!(error = %e, "process queries unavailable");
            false
        }
    };

    let adapter = reconciler.resolve_adapter().await?;

    let mut detection = Detection {
        os: host::os_info(),
        process_queries,
        pattern: policy.description_pattern.clone(),
        adapter: adapter.clone(),
        generation: None,
        property: None,
        registry: None,
    };

    if let Some(ref adapter) = adapter {
        let generation = reconciler.generation(adapter).await?;
        let converger = Converger::new(shell, policy, ReconcileConfig::default());
        match generation {
            AdapterGeneration::DirectProperty => {
                detection.property = Some(converger.observe(adapter).await?);
            }
            AdapterGeneration::Legacy => {
                detection.registry = Some(converger.resolve_location(adapter).await?);
            }
        }
        detection.generation = Some(generation);
    }

    let out = output::render(global.output, &detection, describe)?;
    output::print_output(&out, global.quiet);
    Ok(())
}

fn describe(d: &Detection) -> String {
    let mut out = format!("os: {}\nprocess queries: {}\n", d.os, d.process_queries);
    let Some(ref adapter) = d.adapter else {
        let _ = write!(out, "adapter: none matching '{}'", d.pattern);
        return out;
    };
    let _ = writeln!(out, "adapter: {adapter}");
    if let Some(generation) = d.generation {
        let _ = writeln!(out, "generation: {generation}");
    }
    if let Some(ref p) = d.property {
        let state = if p.is_converged() { "converged" } else { "drifted" };
        let _ = write!(
            out,
            "{}: {} (desired {}, {state})",
            p.property, p.current, p.desired
        );
    }
    if let Some(ref r) = d.registry {
        let _ = write!(out, "device: {}\nregistry key: {}", r.device_id, r.path);
    }
    out
}
