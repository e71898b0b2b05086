//! Scope construction.

use tracing::debug;

use scopebind_domain::{DataSources, InstanceSelector, Scope, VariableValuesByInstance};

use crate::expression::encode_variable_id;

/// Builds the scope visible at `selector`.
///
/// Every live value recorded for the exact selector becomes a scope entry
/// keyed by the encoded variable id, with the declaration's name as its
/// alias. Values without a declaration and values of resource variables
/// are skipped, so a resource never evaluates against another resource.
/// `exclude` removes the variable being edited from the result.
///
/// An absent selector, or one with no recorded values, gives an empty
/// scope.
#[must_use]
pub fn build_scope(
    selector: Option<&InstanceSelector>,
    values: &VariableValuesByInstance,
    declarations: &DataSources,
    exclude: Option<&str>,
) -> Scope {
    let mut scope = Scope::new();
    let Some(selector) = selector else {
        return scope;
    };
    let Some(visible) = values.get(&selector.key()) else {
        return scope;
    };

    for (variable_id, value) in visible {
        let Some(declaration) = declarations.get(variable_id) else {
            continue;
        };
        if declaration.is_resource() {
            continue;
        }
        scope.insert(
            encode_variable_id(variable_id),
            value.clone(),
            declaration.name.clone(),
        );
    }

    if let Some(excluded) = exclude {
        scope.remove(&encode_variable_id(excluded));
    }

    debug!(selector = %selector, variables = scope.len(), "built scope");
    scope
}
