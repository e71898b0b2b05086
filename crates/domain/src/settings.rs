//! Editor Settings Domain Model
//!
//! Defines the tunables of the resource editor engine.

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

/// Settings for the resource editor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorSettings {
    /// Name given to the draft of a new resource.
    #[serde(default)]
    pub default_resource_name: String,

    /// Text shown in place of an expression that failed to evaluate.
    #[serde(default = "default_evaluation_error_placeholder")]
    pub evaluation_error_placeholder: String,

    /// Default tracing filter directive.
    #[serde(default = "default_log_filter")]
    pub log_filter: String,

    /// Whether the body field is hidden while the method is `get`.
    #[serde(default = "default_hide_body_for_get")]
    pub hide_body_for_get: bool,
}

fn default_evaluation_error_placeholder() -> String {
    "#error".to_string()
}

fn default_log_filter() -> String {
    "info".to_string()
}

const fn default_hide_body_for_get() -> bool {
    true
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            default_resource_name: String::new(),
            evaluation_error_placeholder: default_evaluation_error_placeholder(),
            log_filter: default_log_filter(),
            hide_body_for_get: default_hide_body_for_get(),
        }
    }
}

impl EditorSettings {
    /// Checks that every setting is usable.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidSetting`] for an empty placeholder or
    /// log filter.
    pub fn validate(&self) -> DomainResult<()> {
        if self.evaluation_error_placeholder.is_empty() {
            return Err(DomainError::InvalidSetting {
                name: "evaluationErrorPlaceholder",
                reason: "must not be empty".to_string(),
            });
        }
        if self.log_filter.trim().is_empty() {
            return Err(DomainError::InvalidSetting {
                name: "logFilter",
                reason: "must not be empty".to_string(),
            });
        }
        Ok(())
    }
}
