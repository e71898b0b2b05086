//! File-backed persistence adapters.

mod settings_loader;
mod snapshot_repository;

pub use settings_loader::{ERROR_PLACEHOLDER_ENV, LOG_ENV, SettingsError, SettingsLoader};
pub use snapshot_repository::FileSnapshotRepository;
