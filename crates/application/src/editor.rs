//! Resource editing session.
//!
//! A [`ResourceEditor`] owns the draft for one open form. Nothing it does
//! reaches the shared store except [`ResourceEditor::save`].

use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use scopebind_domain::{
    DomainError, DraftField, EditorSettings, Resource, ResourceDraft, Scope, Variable,
};

use crate::expression::{compute_expression, humanize, is_literal};
use crate::ports::{IdGenerator, SharedStore};
use crate::scope::ScopeMemo;
use crate::use_cases::{CommitError, CommitResource, CommitResourceInput, CommitResourceOutput};

/// Errors raised by an editing session.
#[derive(Debug, thiserror::Error)]
pub enum EditorError {
    /// The variable to edit does not exist.
    #[error("variable not found: {0}")]
    VariableNotFound(String),

    /// The variable to edit is not a resource variable.
    #[error("variable `{0}` is not a resource")]
    NotAResource(String),

    /// The resource referenced by the variable does not exist.
    #[error("resource not found: {0}")]
    ResourceNotFound(String),

    /// A draft mutation was rejected.
    #[error(transparent)]
    Draft(#[from] DomainError),

    /// Saving failed.
    #[error(transparent)]
    Commit(#[from] CommitError),
}

/// How a field is presented.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum FieldBinding {
    /// A literal the user edits directly.
    Literal {
        /// Decoded value.
        value: Value,
    },
    /// A read-only value computed from an expression.
    Expression {
        /// Expression source.
        expression: String,
        /// Evaluated value, or the error placeholder.
        value: Value,
    },
}

impl FieldBinding {
    /// The value to display.
    #[must_use]
    pub const fn value(&self) -> &Value {
        match self {
            Self::Literal { value } | Self::Expression { value, .. } => value,
        }
    }

    /// Whether the raw value can be edited in place.
    #[must_use]
    pub const fn is_editable(&self) -> bool {
        matches!(self, Self::Literal { .. })
    }
}

type CloseCallback = Box<dyn FnOnce() + Send>;

/// An open resource form.
pub struct ResourceEditor<S: SharedStore + ?Sized, G: IdGenerator + ?Sized> {
    store: Arc<S>,
    commit: CommitResource<S, G>,
    settings: EditorSettings,
    variable: Option<Variable>,
    resource: Option<Resource>,
    draft: ResourceDraft,
    memo: ScopeMemo,
    on_close: Option<CloseCallback>,
}

impl<S: SharedStore + ?Sized, G: IdGenerator + ?Sized> ResourceEditor<S, G> {
    /// Opens a form.
    ///
    /// With `variable_id` the form edits that resource variable and its
    /// resource; without it the form starts from defaults.
    ///
    /// # Errors
    /// - Returns error if the variable does not exist or is not a resource
    /// - Returns error if the referenced resource does not exist
    pub fn open(
        store: Arc<S>,
        ids: Arc<G>,
        settings: EditorSettings,
        variable_id: Option<&str>,
    ) -> Result<Self, EditorError> {
        let (variable, resource, draft) = match variable_id {
            Some(id) => {
                let variable = store
                    .data_sources()
                    .get(id)
                    .cloned()
                    .ok_or_else(|| EditorError::VariableNotFound(id.to_string()))?;
                let resource_id = variable
                    .resource_id()
                    .ok_or_else(|| EditorError::NotAResource(id.to_string()))?;
                let resource = store
                    .resources()
                    .get(resource_id)
                    .cloned()
                    .ok_or_else(|| EditorError::ResourceNotFound(resource_id.to_string()))?;
                let draft = ResourceDraft::from_resource(&variable.name, &resource);
                (Some(variable), Some(resource), draft)
            }
            None => (None, None, ResourceDraft::new(settings.default_resource_name.clone())),
        };
        debug!(variable_id = ?variable_id, "opened resource editor");

        Ok(Self {
            commit: CommitResource::new(Arc::clone(&store), ids),
            store,
            settings,
            variable,
            resource,
            draft,
            memo: ScopeMemo::new(),
            on_close: None,
        })
    }

    /// Registers a callback fired by [`ResourceEditor::close`].
    #[must_use]
    pub fn on_close(mut self, callback: impl FnOnce() + Send + 'static) -> Self {
        self.on_close = Some(Box::new(callback));
        self
    }

    /// The current draft.
    #[must_use]
    pub const fn draft(&self) -> &ResourceDraft {
        &self.draft
    }

    /// The variable being edited, if any.
    #[must_use]
    pub const fn variable(&self) -> Option<&Variable> {
        self.variable.as_ref()
    }

    /// Whether the form edits an existing resource.
    #[must_use]
    pub const fn is_editing(&self) -> bool {
        self.variable.is_some()
    }

    /// Replaces a scalar field.
    pub fn set_field(&mut self, field: DraftField) {
        self.draft = self.draft.set_field(field);
    }

    /// Replaces the header at `index`.
    ///
    /// # Errors
    /// Returns error if `index` is out of range; the draft is unchanged.
    pub fn set_header(
        &mut self,
        index: usize,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<(), EditorError> {
        self.draft = self.draft.set_header(index, name, value)?;
        Ok(())
    }

    /// Appends a blank header.
    pub fn add_header(&mut self) {
        self.draft = self.draft.add_header();
    }

    /// Removes the header at `index`.
    ///
    /// # Errors
    /// Returns error if `index` is out of range; the draft is unchanged.
    pub fn remove_header(&mut self, index: usize) -> Result<(), EditorError> {
        self.draft = self.draft.remove_header(index)?;
        Ok(())
    }

    /// Whether the body field is shown.
    #[must_use]
    pub const fn body_visible(&self) -> bool {
        !self.settings.hide_body_for_get || self.draft.body_visible()
    }

    /// Variables visible to the form's expressions.
    ///
    /// The edited variable is never part of its own scope.
    pub fn scope(&mut self) -> Arc<Scope> {
        let values = self.store.variable_values();
        let declarations = self.store.data_sources();
        let selector = self.store.selected_instance();
        let exclude = self.variable.as_ref().map(|variable| variable.id.as_str());
        self.memo
            .scope(&values, &declarations, selector.as_ref(), exclude)
    }

    /// Binds an arbitrary expression string.
    pub fn bind(&mut self, expression: &str) -> FieldBinding {
        let scope = self.scope();
        let value = compute_expression(
            expression,
            &scope,
            &self.settings.evaluation_error_placeholder,
        );
        if is_literal(expression) {
            FieldBinding::Literal { value }
        } else {
            FieldBinding::Expression {
                expression: expression.to_string(),
                value,
            }
        }
    }

    /// Binds the URL field.
    pub fn bind_url(&mut self) -> FieldBinding {
        let url = self.draft.url.clone();
        self.bind(&url)
    }

    /// Binds the body field, or `None` while it is hidden.
    pub fn bind_body(&mut self) -> Option<FieldBinding> {
        if !self.body_visible() {
            return None;
        }
        let body = self.draft.body.clone();
        Some(self.bind(&body))
    }

    /// Binds the value of the header at `index`.
    pub fn bind_header(&mut self, index: usize) -> Option<FieldBinding> {
        let value = self.draft.headers.get(index)?.value.clone();
        Some(self.bind(&value))
    }

    /// Rewrites an expression with display names for its variables.
    pub fn label(&mut self, expression: &str) -> String {
        humanize(expression, &self.scope().aliases)
    }

    /// Commits the draft.
    ///
    /// Returns `Ok(None)` and writes nothing when no instance is selected.
    /// After a successful save, later saves update the same pair.
    ///
    /// # Errors
    /// Returns error if the store rejects the transaction.
    pub fn save(&mut self) -> Result<Option<CommitResourceOutput>, EditorError> {
        let output = self.commit.execute(CommitResourceInput {
            draft: self.draft.clone(),
            existing_variable: self.variable.clone(),
            existing_resource: self.resource.clone(),
            target: self.store.selected_instance(),
        })?;
        if let Some(committed) = &output {
            self.variable = Some(committed.variable.clone());
            self.resource = Some(committed.resource.clone());
        }
        Ok(output)
    }

    /// Closes the form, discarding unsaved edits.
    pub fn close(mut self) {
        debug!(dirty = self.is_dirty(), "closing resource editor");
        if let Some(callback) = self.on_close.take() {
            callback();
        }
    }

    /// Whether the draft differs from what was loaded or last saved.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        match (&self.variable, &self.resource) {
            (Some(variable), Some(resource)) => {
                self.draft != ResourceDraft::from_resource(&variable.name, resource)
            }
            _ => self.draft != ResourceDraft::new(self.settings.default_resource_name.clone()),
        }
    }
}

impl<S: SharedStore + ?Sized, G: IdGenerator + ?Sized> fmt::Debug for ResourceEditor<S, G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceEditor")
            .field("variable", &self.variable)
            .field("draft", &self.draft)
            .field("memo", &self.memo)
            .finish_non_exhaustive()
    }
}
