//! File-based snapshot repository implementation.
//!
//! A snapshot is one JSON document holding every store collection.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tracing::{debug, warn};

use scopebind_application::ports::{SnapshotError, SnapshotRepository};
use scopebind_domain::StoreSnapshot;

use crate::serialization::{from_json_bytes, to_json_stable_bytes};

/// Snapshot repository over `tokio::fs`.
///
/// Saves go to a sibling `.tmp` file first and are renamed into place.
/// A failed save removes the temporary file.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileSnapshotRepository;

impl FileSnapshotRepository {
    /// Creates a new file-based snapshot repository.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn temp_path(path: &Path) -> PathBuf {
        let mut name = path.file_name().unwrap_or_default().to_os_string();
        name.push(".tmp");
        path.with_file_name(name)
    }
}

#[async_trait]
impl SnapshotRepository for FileSnapshotRepository {
    async fn load(&self, path: &Path) -> Result<StoreSnapshot, SnapshotError> {
        let content = fs::read(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                SnapshotError::NotFound(path.to_path_buf())
            } else {
                SnapshotError::Io(e)
            }
        })?;

        let snapshot: StoreSnapshot = from_json_bytes(&content)
            .map_err(|e| SnapshotError::Serialization(e.to_string()))?;

        debug!(
            path = %path.display(),
            variables = snapshot.data_sources.len(),
            resources = snapshot.resources.len(),
            "loaded snapshot"
        );
        Ok(snapshot)
    }

    async fn save(&self, path: &Path, snapshot: &StoreSnapshot) -> Result<(), SnapshotError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await?;
        }

        let content = to_json_stable_bytes(snapshot)
            .map_err(|e| SnapshotError::Serialization(e.to_string()))?;

        let temp = Self::temp_path(path);
        let written = match fs::write(&temp, &content).await {
            Ok(()) => fs::rename(&temp, path).await,
            Err(e) => Err(e),
        };
        if let Err(e) = written {
            if let Err(cleanup) = fs::remove_file(&temp).await {
                warn!(
                    path = %temp.display(),
                    error = %cleanup,
                    "failed to remove temporary snapshot"
                );
            }
            return Err(e.into());
        }

        debug!(path = %path.display(), bytes = content.len(), "saved snapshot");
        Ok(())
    }
}
