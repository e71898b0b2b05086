//! Commit resource use case.

use std::sync::Arc;

use tracing::{info, warn};

use scopebind_domain::{InstanceSelector, Resource, ResourceDraft, Variable};

use crate::ports::{IdGenerator, SharedStore, StoreError, StoreTarget};

/// Errors that can occur while committing a resource.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommitError {
    /// The variable being edited is not a resource variable.
    #[error("variable `{0}` is not a resource")]
    NotAResource(String),

    /// The store refused the transaction; nothing was written.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Input for committing a resource.
#[derive(Debug, Clone)]
pub struct CommitResourceInput {
    /// The edited form state.
    pub draft: ResourceDraft,
    /// The variable being edited, in edit mode.
    pub existing_variable: Option<Variable>,
    /// The resource being edited, in edit mode.
    pub existing_resource: Option<Resource>,
    /// The instance selected at commit time.
    pub target: Option<InstanceSelector>,
}

/// Output from committing a resource.
#[derive(Debug, Clone, PartialEq)]
pub struct CommitResourceOutput {
    /// The written variable declaration.
    pub variable: Variable,
    /// The written resource.
    pub resource: Resource,
    /// Store version after the write.
    pub version: u64,
}

/// Use case for writing a resource and its variable in one transaction.
pub struct CommitResource<S: SharedStore + ?Sized, G: IdGenerator + ?Sized> {
    store: Arc<S>,
    ids: Arc<G>,
}

impl<S: SharedStore + ?Sized, G: IdGenerator + ?Sized> CommitResource<S, G> {
    /// Creates a new `CommitResource` use case.
    #[must_use]
    pub const fn new(store: Arc<S>, ids: Arc<G>) -> Self {
        Self { store, ids }
    }

    /// Writes the draft as a resource plus its resource variable.
    ///
    /// Ids of the edited pair are reused; fresh ids are drawn only for
    /// records that do not exist yet. An edited variable keeps its scope
    /// instance, a new one is placed on the target instance. Returns
    /// `Ok(None)` without touching the store when nothing is selected.
    ///
    /// # Errors
    /// - Returns error if the edited variable is not a resource variable
    /// - Returns error if the store rejects the transaction, in which case
    ///   neither record was written
    pub fn execute(
        &self,
        input: CommitResourceInput,
    ) -> Result<Option<CommitResourceOutput>, CommitError> {
        let Some(target) = input.target else {
            warn!(name = %input.draft.name, "no instance selected, resource not saved");
            return Ok(None);
        };

        if let Some(variable) = &input.existing_variable
            && !variable.is_resource()
        {
            return Err(CommitError::NotAResource(variable.id.clone()));
        }

        let variable_id = input
            .existing_variable
            .as_ref()
            .map_or_else(|| self.ids.generate(), |variable| variable.id.clone());
        let resource_id = input
            .existing_resource
            .as_ref()
            .map(|resource| resource.id.clone())
            .or_else(|| {
                input
                    .existing_variable
                    .as_ref()
                    .and_then(Variable::resource_id)
                    .map(str::to_string)
            })
            .unwrap_or_else(|| self.ids.generate());
        let scope_instance_id = input.existing_variable.as_ref().map_or_else(
            || target.instance_id().to_string(),
            |variable| variable.scope_instance_id.clone(),
        );

        let draft = input.draft;
        let resource = Resource {
            id: resource_id.clone(),
            name: draft.name.clone(),
            url: draft.url,
            method: draft.method,
            headers: draft.headers,
            body: draft.body,
        };
        let variable = Variable::resource(variable_id, draft.name, scope_instance_id, resource_id);

        let version = self.store.transact(
            &[StoreTarget::DataSources, StoreTarget::Resources],
            &mut |tx| {
                tx.resources()?.insert(resource.id.clone(), resource.clone());
                tx.data_sources()?.insert(variable.id.clone(), variable.clone());
                Ok(())
            },
        )?;

        info!(
            variable_id = %variable.id,
            resource_id = %resource.id,
            version,
            "committed resource"
        );
        Ok(Some(CommitResourceOutput {
            variable,
            resource,
            version,
        }))
    }
}
