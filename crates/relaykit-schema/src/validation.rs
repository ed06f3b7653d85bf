//! Authorization query validation.
//!
//! A read-only pass over the full selection tree of a parsed query document,
//! executed before resolution. Field metadata is checked per selection node;
//! violations accumulate across the whole tree, and any error means
//! resolution is skipped for the query as a whole.

use async_graphql_parser::types::{
    DocumentOperations, ExecutableDocument, OperationType, Selection, SelectionSet,
};
use tracing::debug;

use crate::context::UserContext;
use crate::schema::{Schema, TypeLookup};

/// The kind of a validation violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationCode {
    /// The selected field is not part of the schema.
    CouldNotResolve,
    /// The user does not meet the field's authentication or role
    /// requirements.
    NotAuthorized,
}

impl ValidationCode {
    /// The wire form of the code.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CouldNotResolve => "could-not-resolve",
            Self::NotAuthorized => "not-authorized",
        }
    }
}

/// A single validation violation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub code: ValidationCode,
    pub message: String,
    /// Path of field names from the operation root to the violating node.
    pub path: Vec<String>,
}

impl ValidationError {
    fn could_not_resolve(path: Vec<String>) -> Self {
        Self {
            message: format!("This query could not be resolved: {}", path.join(".")),
            code: ValidationCode::CouldNotResolve,
            path,
        }
    }

    fn not_authorized(path: Vec<String>) -> Self {
        Self {
            message: "You are not authorized to run this query.".to_string(),
            code: ValidationCode::NotAuthorized,
            path,
        }
    }
}

/// The validation pass enforcing per-field authentication and role
/// requirements.
pub struct AuthorizationValidator;

impl AuthorizationValidator {
    /// Validates every operation of a parsed query document against the
    /// schema's field metadata and the request's user context.
    ///
    /// Traversal is depth-first in selection order; all violations in the
    /// document are reported together. An empty result means the query may
    /// be resolved.
    #[must_use]
    pub fn validate(
        schema: &Schema,
        document: &ExecutableDocument,
        user: &UserContext,
    ) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        let operations: Vec<_> = match &document.operations {
            DocumentOperations::Single(operation) => vec![&operation.node],
            DocumentOperations::Multiple(operations) => {
                operations.values().map(|op| &op.node).collect()
            }
        };

        for operation in operations {
            let root = match operation.ty {
                OperationType::Query => Some(TypeLookup::Bound(schema.query())),
                OperationType::Mutation => schema.mutation().map(TypeLookup::Bound),
                OperationType::Subscription => None,
            };
            walk_selection_set(
                schema,
                document,
                root,
                &operation.selection_set.node,
                &mut Vec::new(),
                user,
                &mut errors,
            );
        }

        if !errors.is_empty() {
            debug!(violations = errors.len(), "query validation failed");
        }
        errors
    }
}

fn walk_selection_set(
    schema: &Schema,
    document: &ExecutableDocument,
    container: Option<TypeLookup<'_>>,
    selection_set: &SelectionSet,
    path: &mut Vec<String>,
    user: &UserContext,
    errors: &mut Vec<ValidationError>,
) {
    for selection in &selection_set.items {
        match &selection.node {
            Selection::Field(field) => {
                let name = field.node.name.node.as_str();

                // introspection selections carry no field metadata
                if name.starts_with("__") {
                    continue;
                }

                path.push(name.to_string());

                let Some(resolved) = container.and_then(|c| c.field(name)) else {
                    errors.push(ValidationError::could_not_resolve(path.clone()));
                    path.pop();
                    continue;
                };
                let (type_ref, metadata) = resolved;

                if metadata.auth_check_enabled
                    && metadata.auth_required
                    && !user.is_authenticated
                {
                    errors.push(ValidationError::not_authorized(path.clone()));
                }
                if metadata.requires_roles()
                    && !user.has_all_roles(metadata.required_roles.iter().map(String::as_str))
                {
                    errors.push(ValidationError::not_authorized(path.clone()));
                }

                if !field.node.selection_set.node.items.is_empty() {
                    let child = schema.lookup_type(&type_ref.innermost().name);
                    walk_selection_set(
                        schema,
                        document,
                        child,
                        &field.node.selection_set.node,
                        path,
                        user,
                        errors,
                    );
                }

                path.pop();
            }
            Selection::FragmentSpread(spread) => {
                let name = &spread.node.fragment_name.node;
                let Some(fragment) = document.fragments.get(name) else {
                    path.push(name.to_string());
                    errors.push(ValidationError::could_not_resolve(path.clone()));
                    path.pop();
                    continue;
                };
                let condition = fragment.node.type_condition.node.on.node.as_str();
                walk_selection_set(
                    schema,
                    document,
                    schema.lookup_type(condition),
                    &fragment.node.selection_set.node,
                    path,
                    user,
                    errors,
                );
            }
            Selection::InlineFragment(inline) => {
                let scope = match &inline.node.type_condition {
                    Some(condition) => schema.lookup_type(condition.node.on.node.as_str()),
                    None => container,
                };
                walk_selection_set(
                    schema,
                    document,
                    scope,
                    &inline.node.selection_set.node,
                    path,
                    user,
                    errors,
                );
            }
        }
    }
}
