//! Shared store port.
//!
//! The store owns declarations, resources and live values. Readers get
//! `Arc` snapshots that can be compared by pointer to detect change; the
//! only way to write is [`SharedStore::transact`].

use std::fmt;
use std::sync::Arc;

use scopebind_domain::{DataSources, InstanceSelector, Resources, VariableValuesByInstance};

/// A collection a transaction may write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreTarget {
    /// Variable declarations.
    DataSources,
    /// Resource definitions.
    Resources,
}

impl fmt::Display for StoreTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DataSources => f.write_str("dataSources"),
            Self::Resources => f.write_str("resources"),
        }
    }
}

/// Errors raised by store transactions.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// The mutator touched a collection it did not declare.
    #[error("collection `{0}` is not part of this transaction")]
    NotTargeted(StoreTarget),

    /// The transaction was refused and nothing was written.
    #[error("transaction rejected: {0}")]
    Rejected(String),
}

/// Mutable view over the collections a transaction declared.
///
/// Changes made through it are applied together when the mutator
/// succeeds, and dropped when it fails.
#[derive(Debug)]
pub struct StoreTransaction<'a> {
    data_sources: Option<&'a mut DataSources>,
    resources: Option<&'a mut Resources>,
}

impl<'a> StoreTransaction<'a> {
    /// Wraps working copies of the targeted collections.
    #[must_use]
    pub const fn new(
        data_sources: Option<&'a mut DataSources>,
        resources: Option<&'a mut Resources>,
    ) -> Self {
        Self {
            data_sources,
            resources,
        }
    }

    /// Variable declarations.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotTargeted`] if the transaction did not
    /// declare [`StoreTarget::DataSources`].
    pub fn data_sources(&mut self) -> Result<&mut DataSources, StoreError> {
        self.data_sources
            .as_deref_mut()
            .ok_or(StoreError::NotTargeted(StoreTarget::DataSources))
    }

    /// Resource definitions.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotTargeted`] if the transaction did not
    /// declare [`StoreTarget::Resources`].
    pub fn resources(&mut self) -> Result<&mut Resources, StoreError> {
        self.resources
            .as_deref_mut()
            .ok_or(StoreError::NotTargeted(StoreTarget::Resources))
    }
}

/// Mutator run inside [`SharedStore::transact`].
pub type Mutator<'m> = dyn FnMut(&mut StoreTransaction<'_>) -> Result<(), StoreError> + 'm;

/// Port for the collaboratively synced application store.
pub trait SharedStore: Send + Sync {
    /// Current variable declarations.
    fn data_sources(&self) -> Arc<DataSources>;

    /// Current resource definitions.
    fn resources(&self) -> Arc<Resources>;

    /// Current live values per instance selector.
    fn variable_values(&self) -> Arc<VariableValuesByInstance>;

    /// The selected instance, if any.
    fn selected_instance(&self) -> Option<InstanceSelector>;

    /// Applies `mutator` to the `targets` collections atomically.
    ///
    /// Either every change the mutator made is published, or none is.
    /// Returns the store version after the write.
    ///
    /// # Errors
    ///
    /// Returns the mutator's error, or a store-specific rejection. In both
    /// cases the store is unchanged.
    fn transact(&self, targets: &[StoreTarget], mutator: &mut Mutator<'_>) -> Result<u64, StoreError>;
}
