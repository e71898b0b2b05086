//! Snapshot repository port
//!
//! Defines the interface for loading and saving whole-store snapshots.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use scopebind_domain::StoreSnapshot;

/// Errors that can occur during snapshot operations.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    /// Snapshot file not found.
    #[error("Snapshot not found: {}", .0.display())]
    NotFound(PathBuf),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Repository trait for store snapshot persistence.
#[async_trait]
pub trait SnapshotRepository: Send + Sync {
    /// Loads a snapshot.
    ///
    /// # Errors
    /// Returns `SnapshotError::NotFound` if the file doesn't exist.
    async fn load(&self, path: &Path) -> Result<StoreSnapshot, SnapshotError>;

    /// Saves a snapshot, replacing any previous content.
    ///
    /// # Errors
    /// Returns an error if the file cannot be written.
    async fn save(&self, path: &Path, snapshot: &StoreSnapshot) -> Result<(), SnapshotError>;
}
