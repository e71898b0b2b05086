//! Scope memoization.

use std::sync::Arc;

use scopebind_domain::{DataSources, InstanceSelector, Scope, VariableValuesByInstance};

use super::build_scope;

struct Entry {
    values: Arc<VariableValuesByInstance>,
    declarations: Arc<DataSources>,
    selector: Option<InstanceSelector>,
    exclude: Option<String>,
    scope: Arc<Scope>,
}

/// Caches the last built scope.
///
/// The store hands out `Arc` snapshots and replaces them on every write,
/// so the inputs are compared by pointer rather than by content.
#[derive(Default)]
pub struct ScopeMemo {
    last: Option<Entry>,
    builds: u64,
}

impl ScopeMemo {
    /// Creates an empty memo.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the scope for the given inputs, rebuilding only if one of
    /// them changed since the previous call.
    pub fn scope(
        &mut self,
        values: &Arc<VariableValuesByInstance>,
        declarations: &Arc<DataSources>,
        selector: Option<&InstanceSelector>,
        exclude: Option<&str>,
    ) -> Arc<Scope> {
        if let Some(entry) = &self.last
            && Arc::ptr_eq(&entry.values, values)
            && Arc::ptr_eq(&entry.declarations, declarations)
            && entry.selector.as_ref() == selector
            && entry.exclude.as_deref() == exclude
        {
            return Arc::clone(&entry.scope);
        }

        let scope = Arc::new(build_scope(selector, values, declarations, exclude));
        self.builds += 1;
        self.last = Some(Entry {
            values: Arc::clone(values),
            declarations: Arc::clone(declarations),
            selector: selector.cloned(),
            exclude: exclude.map(str::to_string),
            scope: Arc::clone(&scope),
        });
        scope
    }

    /// How many times a scope was actually built.
    #[must_use]
    pub const fn builds(&self) -> u64 {
        self.builds
    }
}

impl std::fmt::Debug for ScopeMemo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScopeMemo")
            .field("cached", &self.last.is_some())
            .field("builds", &self.builds)
            .finish()
    }
}
