//! Adapter implementations for application ports.

mod in_memory_store;
mod uuid_id_generator;

pub use in_memory_store::InMemoryStore;
pub use uuid_id_generator::UuidIdGenerator;
