//! In-memory port implementations for unit tests.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use scopebind_domain::{
    DataSources, InstanceSelector, Resources, StoreSnapshot, VariableValuesByInstance,
};

use crate::ports::{IdGenerator, Mutator, SharedStore, StoreError, StoreTarget, StoreTransaction};

/// Store over a mutex, with switchable rejection and a transaction log.
pub struct MockStore {
    state: Mutex<MockState>,
    pub reject: Mutex<bool>,
    pub transactions: Mutex<Vec<Vec<StoreTarget>>>,
}

struct MockState {
    data_sources: Arc<DataSources>,
    resources: Arc<Resources>,
    variable_values: Arc<VariableValuesByInstance>,
    selected: Option<InstanceSelector>,
    version: u64,
}

impl MockStore {
    pub fn new(snapshot: StoreSnapshot) -> Self {
        Self {
            state: Mutex::new(MockState {
                data_sources: Arc::new(snapshot.data_sources),
                resources: Arc::new(snapshot.resources),
                variable_values: Arc::new(snapshot.variable_values),
                selected: snapshot.selected_instance,
                version: 0,
            }),
            reject: Mutex::new(false),
            transactions: Mutex::new(Vec::new()),
        }
    }

    pub fn select(&self, selector: Option<InstanceSelector>) {
        self.state.lock().unwrap().selected = selector;
    }

    pub fn set_values(&self, values: VariableValuesByInstance) {
        self.state.lock().unwrap().variable_values = Arc::new(values);
    }
}

impl SharedStore for MockStore {
    fn data_sources(&self) -> Arc<DataSources> {
        Arc::clone(&self.state.lock().unwrap().data_sources)
    }

    fn resources(&self) -> Arc<Resources> {
        Arc::clone(&self.state.lock().unwrap().resources)
    }

    fn variable_values(&self) -> Arc<VariableValuesByInstance> {
        Arc::clone(&self.state.lock().unwrap().variable_values)
    }

    fn selected_instance(&self) -> Option<InstanceSelector> {
        self.state.lock().unwrap().selected.clone()
    }

    fn transact(&self, targets: &[StoreTarget], mutator: &mut Mutator<'_>) -> Result<u64, StoreError> {
        self.transactions.lock().unwrap().push(targets.to_vec());
        let mut state = self.state.lock().unwrap();
        let mut data_sources = state.data_sources.as_ref().clone();
        let mut resources = state.resources.as_ref().clone();
        let mut tx = StoreTransaction::new(
            targets.contains(&StoreTarget::DataSources).then_some(&mut data_sources),
            targets.contains(&StoreTarget::Resources).then_some(&mut resources),
        );
        mutator(&mut tx)?;
        if *self.reject.lock().unwrap() {
            return Err(StoreError::Rejected("mock rejection".into()));
        }
        state.data_sources = Arc::new(data_sources);
        state.resources = Arc::new(resources);
        state.version += 1;
        Ok(state.version)
    }
}

/// Ids `id-1`, `id-2`, ...
#[derive(Default)]
pub struct SequentialIds(AtomicU64);

impl IdGenerator for SequentialIds {
    fn generate(&self) -> String {
        format!("id-{}", self.0.fetch_add(1, Ordering::Relaxed) + 1)
    }
}
