//! Port definitions (interfaces)
//!
//! Ports define the boundaries between the application core and external systems.
//! Each port is a trait that can be implemented by adapters in the infrastructure layer.

mod id_generator;
mod snapshot_repository;
mod store;

pub use id_generator::IdGenerator;
pub use snapshot_repository::{SnapshotError, SnapshotRepository};
pub use store::{Mutator, SharedStore, StoreError, StoreTarget, StoreTransaction};
