//! In-memory shared store adapter.

use std::sync::Arc;

use parking_lot::{RwLock, RwLockUpgradableReadGuard};
use tracing::{debug, warn};

use scopebind_application::ports::{
    Mutator, SharedStore, StoreError, StoreTarget, StoreTransaction,
};
use scopebind_domain::{
    DataSources, InstanceSelector, Resources, StoreSnapshot, VariableValues,
    VariableValuesByInstance,
};

#[derive(Debug, Default)]
struct StoreState {
    data_sources: Arc<DataSources>,
    resources: Arc<Resources>,
    variable_values: Arc<VariableValuesByInstance>,
    selected_instance: Option<InstanceSelector>,
    version: u64,
}

/// Process-local [`SharedStore`].
///
/// Each collection sits behind its own `Arc`. Readers clone the `Arc`;
/// writers replace it, so a snapshot taken before a write never changes
/// and pointer comparison tells whether anything was written since.
///
/// Transactions are serialized. A mutator must not call back into the
/// store it runs in.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    state: RwLock<StoreState>,
}

impl InMemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store holding `snapshot`.
    #[must_use]
    pub fn from_snapshot(snapshot: StoreSnapshot) -> Self {
        Self {
            state: RwLock::new(StoreState {
                data_sources: Arc::new(snapshot.data_sources),
                resources: Arc::new(snapshot.resources),
                variable_values: Arc::new(snapshot.variable_values),
                selected_instance: snapshot.selected_instance,
                version: 0,
            }),
        }
    }

    /// Copies the whole store out.
    #[must_use]
    pub fn snapshot(&self) -> StoreSnapshot {
        let state = self.state.read();
        StoreSnapshot {
            data_sources: state.data_sources.as_ref().clone(),
            resources: state.resources.as_ref().clone(),
            variable_values: state.variable_values.as_ref().clone(),
            selected_instance: state.selected_instance.clone(),
        }
    }

    /// Number of committed transactions.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.state.read().version
    }

    /// Changes the selected instance.
    pub fn select(&self, selector: Option<InstanceSelector>) {
        debug!(selector = ?selector.as_ref().map(ToString::to_string), "selected instance");
        self.state.write().selected_instance = selector;
    }

    /// Publishes the live values visible at `selector`.
    pub fn set_variable_values(&self, selector: &InstanceSelector, values: VariableValues) {
        let mut state = self.state.write();
        let mut next = state.variable_values.as_ref().clone();
        next.insert(selector.key(), values);
        state.variable_values = Arc::new(next);
    }
}

impl SharedStore for InMemoryStore {
    fn data_sources(&self) -> Arc<DataSources> {
        Arc::clone(&self.state.read().data_sources)
    }

    fn resources(&self) -> Arc<Resources> {
        Arc::clone(&self.state.read().resources)
    }

    fn variable_values(&self) -> Arc<VariableValuesByInstance> {
        Arc::clone(&self.state.read().variable_values)
    }

    fn selected_instance(&self) -> Option<InstanceSelector> {
        self.state.read().selected_instance.clone()
    }

    fn transact(&self, targets: &[StoreTarget], mutator: &mut Mutator<'_>) -> Result<u64, StoreError> {
        let state = self.state.upgradable_read();

        let mut data_sources = targets
            .contains(&StoreTarget::DataSources)
            .then(|| state.data_sources.as_ref().clone());
        let mut resources = targets
            .contains(&StoreTarget::Resources)
            .then(|| state.resources.as_ref().clone());

        let mut tx = StoreTransaction::new(data_sources.as_mut(), resources.as_mut());
        if let Err(error) = mutator(&mut tx) {
            warn!(%error, "transaction rolled back");
            return Err(error);
        }

        let mut state = RwLockUpgradableReadGuard::upgrade(state);
        if let Some(next) = data_sources {
            state.data_sources = Arc::new(next);
        }
        if let Some(next) = resources {
            state.resources = Arc::new(next);
        }
        state.version += 1;
        debug!(version = state.version, ?targets, "transaction committed");
        Ok(state.version)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use scopebind_domain::{Resource, ResourceMethod, Variable, string_literal};
    use serde_json::json;

    fn resource(id: &str) -> Resource {
        Resource {
            id: id.into(),
            name: id.into(),
            url: string_literal("https://example.com"),
            method: ResourceMethod::Get,
            headers: Vec::new(),
            body: string_literal(""),
        }
    }

    #[test]
    fn test_transaction_writes_all_targets() {
        let store = InMemoryStore::new();
        let version = store
            .transact(
                &[StoreTarget::DataSources, StoreTarget::Resources],
                &mut |tx| {
                    tx.resources()?.insert("r".into(), resource("r"));
                    tx.data_sources()?
                        .insert("v".into(), Variable::resource("v", "v", "i", "r"));
                    Ok(())
                },
            )
            .unwrap();

        assert_eq!(version, 1);
        assert_eq!(store.version(), 1);
        assert!(store.resources().contains_key("r"));
        assert!(store.data_sources().contains_key("v"));
    }

    #[test]
    fn test_failed_mutator_writes_nothing() {
        let store = InMemoryStore::new();
        let before = store.resources();

        let error = store
            .transact(
                &[StoreTarget::DataSources, StoreTarget::Resources],
                &mut |tx| {
                    tx.resources()?.insert("r".into(), resource("r"));
                    Err(StoreError::Rejected("halfway".into()))
                },
            )
            .unwrap_err();

        assert_eq!(error, StoreError::Rejected("halfway".into()));
        assert!(Arc::ptr_eq(&before, &store.resources()));
        assert!(store.resources().is_empty());
        assert_eq!(store.version(), 0);
    }

    #[test]
    fn test_untargeted_write_rolls_back() {
        let store = InMemoryStore::new();
        let error = store
            .transact(&[StoreTarget::Resources], &mut |tx| {
                tx.resources()?.insert("r".into(), resource("r"));
                tx.data_sources()?
                    .insert("v".into(), Variable::resource("v", "v", "i", "r"));
                Ok(())
            })
            .unwrap_err();

        assert_eq!(error, StoreError::NotTargeted(StoreTarget::DataSources));
        assert!(store.resources().is_empty());
    }

    #[test]
    fn test_untouched_collections_keep_identity() {
        let store = InMemoryStore::new();
        let declarations = store.data_sources();
        let values = store.variable_values();
        store
            .transact(&[StoreTarget::Resources], &mut |tx| {
                tx.resources()?.insert("r".into(), resource("r"));
                Ok(())
            })
            .unwrap();

        assert!(Arc::ptr_eq(&declarations, &store.data_sources()));
        assert!(Arc::ptr_eq(&values, &store.variable_values()));
    }

    #[test]
    fn test_snapshot_round_trip_and_selection() {
        let selector = InstanceSelector::new(["a", "root"]).unwrap();
        let store = InMemoryStore::new();
        store.select(Some(selector.clone()));
        store.set_variable_values(
            &selector,
            VariableValues::from([("x".to_string(), json!(1))]),
        );

        let restored = InMemoryStore::from_snapshot(store.snapshot());
        assert_eq!(restored.selected_instance(), Some(selector.clone()));
        assert_eq!(
            restored.variable_values().get(&selector.key()).unwrap().get("x"),
            Some(&json!(1))
        );
    }

    #[test]
    fn test_concurrent_transactions_all_land() {
        let store = Arc::new(InMemoryStore::new());
        let handles: Vec<_> = (0..8)
            .map(|n| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || {
                    store
                        .transact(&[StoreTarget::Resources], &mut |tx| {
                            let id = format!("r{n}");
                            tx.resources()?.insert(id.clone(), resource(&id));
                            Ok(())
                        })
                        .unwrap();
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(store.resources().len(), 8);
        assert_eq!(store.version(), 8);
    }
}
