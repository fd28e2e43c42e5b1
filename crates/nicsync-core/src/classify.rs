// ── Adapter generation classifier ──
//
// Evaluated on every cycle. A driver update can move an adapter from one
// generation to the other between two ticks.

use tracing::debug;

use crate::error::{CoreError, Step};
use crate::model::{AdapterGeneration, AdapterName};
use crate::query::HostShell;

/// Decide which generation `adapter` belongs to by probing for `keyword`
/// among its advanced properties.
pub async fn classify(
    shell: &HostShell,
    adapter: &AdapterName,
    keyword: &str,
) -> Result<AdapterGeneration, CoreError> {
    let owner = shell
        .advanced_property_owner(adapter, keyword)
        .await
        .map_err(CoreError::query(Step::GenerationProbe))?;

    let generation = if owner.is_some() {
        AdapterGeneration::DirectProperty
    } else {
        AdapterGeneration::Legacy
    };
    debug!(adapter = %adapter, %generation, "adapter generation detected");
    Ok(generation)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::exec::MockExecutor;

    fn adapter() -> AdapterName {
        AdapterName::new("Ethernet 3").unwrap()
    }

    #[tokio::test]
    async fn non_empty_probe_means_direct_property() {
        let mock = Arc::new(MockExecutor::new());
        mock.respond("ExpandProperty Name", "Ethernet 3");
        let shell = HostShell::new(mock.clone());

        let generation = classify(&shell, &adapter(), "*PriorityVLANTag").await.unwrap();
        assert_eq!(generation, AdapterGeneration::DirectProperty);
    }

    #[tokio::test]
    async fn empty_probe_means_legacy() {
        let mock = Arc::new(MockExecutor::new());
        let shell = HostShell::new(mock.clone());

        let generation = classify(&shell, &adapter(), "*PriorityVLANTag").await.unwrap();
        assert_eq!(generation, AdapterGeneration::Legacy);
    }

    #[tokio::test]
    async fn probe_is_not_memoized() {
        let mock = Arc::new(MockExecutor::new());
        mock.respond_seq("Get-NetAdapterAdvancedProperty", &["", "Ethernet 3"]);
        let shell = HostShell::new(mock.clone());

        let first = classify(&shell, &adapter(), "*PriorityVLANTag").await.unwrap();
        let second = classify(&shell, &adapter(), "*PriorityVLANTag").await.unwrap();

        assert_eq!(first, AdapterGeneration::Legacy);
        assert_eq!(second, AdapterGeneration::DirectProperty);
        assert_eq!(mock.calls().len(), 2);
    }

    #[tokio::test]
    async fn probe_failure_names_the_step() {
        let mock = Arc::new(MockExecutor::new());
        mock.fail("Get-NetAdapterAdvancedProperty", "Invalid class");
        let shell = HostShell::new(mock.clone());

        let err = classify(&shell, &adapter(), "*PriorityVLANTag").await.unwrap_err();
        assert_eq!(err.step(), Some(Step::GenerationProbe));
    }
}
