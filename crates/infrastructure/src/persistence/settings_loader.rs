//! Settings loading.
//!
//! Settings come from an optional JSON file, then environment overrides,
//! then validation.

use std::collections::BTreeMap;
use std::path::Path;

use tokio::fs;
use tracing::debug;

use scopebind_domain::{DomainError, EditorSettings};

use crate::serialization::{SerializationError, from_json_bytes};

/// Overrides [`EditorSettings::log_filter`].
pub const LOG_ENV: &str = "SCOPEBIND_LOG";

/// Overrides [`EditorSettings::evaluation_error_placeholder`].
pub const ERROR_PLACEHOLDER_ENV: &str = "SCOPEBIND_ERROR_PLACEHOLDER";

/// Errors that can occur while loading settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    /// The settings file could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The settings file is not valid settings JSON.
    #[error("invalid settings file: {0}")]
    Parse(#[from] SerializationError),

    /// A setting has an unusable value.
    #[error(transparent)]
    Invalid(#[from] DomainError),
}

/// Loads [`EditorSettings`].
#[derive(Debug, Clone, Default)]
pub struct SettingsLoader {
    overrides: BTreeMap<&'static str, String>,
}

impl SettingsLoader {
    /// Creates a loader without environment overrides.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a loader taking overrides from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        let mut loader = Self::new();
        for name in [LOG_ENV, ERROR_PLACEHOLDER_ENV] {
            if let Ok(value) = std::env::var(name) {
                loader = loader.with_override(name, value);
            }
        }
        loader
    }

    /// Adds an override as if `name` were set in the environment.
    ///
    /// Unknown names are ignored at load time.
    #[must_use]
    pub fn with_override(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.overrides.insert(name, value.into());
        self
    }

    /// Loads settings from `path`, or defaults when there is no file.
    ///
    /// # Errors
    /// - Returns error if the file exists but cannot be read or parsed
    /// - Returns error if the resulting settings fail validation
    pub async fn load(&self, path: Option<&Path>) -> Result<EditorSettings, SettingsError> {
        let mut settings = match path {
            Some(path) => match fs::read(path).await {
                Ok(content) => from_json_bytes(&content)?,
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                    debug!(path = %path.display(), "settings file missing, using defaults");
                    EditorSettings::default()
                }
                Err(e) => return Err(e.into()),
            },
            None => EditorSettings::default(),
        };

        if let Some(filter) = self.overrides.get(LOG_ENV) {
            settings.log_filter.clone_from(filter);
        }
        if let Some(placeholder) = self.overrides.get(ERROR_PLACEHOLDER_ENV) {
            settings.evaluation_error_placeholder.clone_from(placeholder);
        }

        settings.validate()?;
        Ok(settings)
    }
}
