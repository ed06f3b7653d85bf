//! Schema fields with bound resolvers.
//!
//! A [`FieldDefinition`] is the assembled form of a root field: its result
//! type, arguments, authentication metadata and the resolver the convention
//! binder wired to it.

use std::fmt;
use std::sync::Arc;

use relaykit_core::{FieldMetadata, ModelValue, SchemaTypeRef};

use crate::context::ResolveContext;
use crate::error::SchemaError;

/// Result type for resolver invocations.
pub type ResolverResult<T> = Result<T, SchemaError>;

/// A bound resolver: the full resolution pipeline of one field, from raw
/// argument values to the wrapped result value.
pub type Resolver = Arc<dyn Fn(&ResolveContext) -> ResolverResult<ModelValue> + Send + Sync>;

/// An argument accepted by a field.
#[derive(Debug, Clone, PartialEq)]
pub struct Argument {
    pub name: String,
    pub type_ref: SchemaTypeRef,
    /// Whether the argument must be supplied.
    pub required: bool,
    pub description: Option<String>,
}

impl Argument {
    /// Creates an optional argument.
    pub fn new(name: impl Into<String>, type_ref: SchemaTypeRef) -> Self {
        Self {
            name: name.into(),
            type_ref,
            required: false,
            description: None,
        }
    }

    /// Marks the argument required.
    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Attaches a description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// A root field produced by the convention binder.
#[derive(Clone)]
pub struct FieldDefinition {
    /// The schema-surface field name.
    pub name: String,
    /// The field's result type.
    pub type_ref: SchemaTypeRef,
    pub description: Option<String>,
    pub arguments: Vec<Argument>,
    /// Authentication/authorization metadata read by the validation pass.
    pub metadata: FieldMetadata,
    resolver: Option<Resolver>,
}

impl FieldDefinition {
    /// Creates a field with default metadata, no arguments and no resolver.
    ///
    /// Fields without a resolver (the node `id`, for example) are resolved
    /// by the host executor from the parent instance.
    pub fn new(name: impl Into<String>, type_ref: SchemaTypeRef) -> Self {
        Self {
            name: name.into(),
            type_ref,
            description: None,
            arguments: Vec::new(),
            metadata: FieldMetadata::default(),
            resolver: None,
        }
    }

    /// Binds a resolver to the field.
    #[must_use]
    pub fn with_resolver(mut self, resolver: Resolver) -> Self {
        self.resolver = Some(resolver);
        self
    }

    /// Replaces the field's arguments.
    #[must_use]
    pub fn with_arguments(mut self, arguments: Vec<Argument>) -> Self {
        self.arguments = arguments;
        self
    }

    /// Replaces the field's metadata.
    #[must_use]
    pub fn with_metadata(mut self, metadata: FieldMetadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// Attaches a description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Looks up an argument by name.
    #[must_use]
    pub fn argument(&self, name: &str) -> Option<&Argument> {
        self.arguments.iter().find(|a| a.name == name)
    }

    /// Whether a resolver is bound to the field.
    #[must_use]
    pub fn has_resolver(&self) -> bool {
        self.resolver.is_some()
    }

    /// Runs the field's resolution pipeline.
    ///
    /// # Errors
    ///
    /// Propagates resolver failures; fails when the field has no bound
    /// resolver.
    pub fn resolve(&self, ctx: &ResolveContext) -> ResolverResult<ModelValue> {
        let resolver = self
            .resolver
            .as_ref()
            .ok_or_else(|| SchemaError::resolver(format!("{} has no bound resolver", self.name)))?;
        resolver(ctx)
    }
}

impl fmt::Debug for FieldDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDefinition")
            .field("name", &self.name)
            .field("type_ref", &self.type_ref)
            .field("arguments", &self.arguments)
            .field("metadata", &self.metadata)
            .finish_non_exhaustive()
    }
}

/// A root object type: a named set of bound fields.
#[derive(Debug, Clone, Default)]
pub struct ObjectTypeDef {
    pub name: String,
    pub fields: Vec<FieldDefinition>,
}

impl ObjectTypeDef {
    /// Creates an empty root type.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    /// Adds a field.
    #[must_use]
    pub fn with_field(mut self, field: FieldDefinition) -> Self {
        self.fields.push(field);
        self
    }

    /// Looks up a field by schema-surface name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldDefinition> {
        self.fields.iter().find(|f| f.name == name)
    }
}

#[cfg(test)]
mod tests {
    use relaykit_core::{ScalarKind, SchemaTypeRef};

    use super::*;
    use crate::context::UserContext;

    #[test]
    fn test_field_resolution() {
        let field = FieldDefinition::new("answer", SchemaTypeRef::scalar(ScalarKind::Int))
            .with_resolver(Arc::new(|_| Ok(ModelValue::Int(42))));
        let ctx = ResolveContext::new(UserContext::anonymous());
        assert_eq!(field.resolve(&ctx).unwrap(), ModelValue::Int(42));
    }

    #[test]
    fn test_resolving_without_resolver_fails() {
        let field = FieldDefinition::new("id", SchemaTypeRef::scalar(ScalarKind::Id));
        let ctx = ResolveContext::new(UserContext::anonymous());
        assert!(!field.has_resolver());
        assert!(matches!(
            field.resolve(&ctx),
            Err(SchemaError::Resolver(_))
        ));
    }

    #[test]
    fn test_field_lookup_on_root_type() {
        let root = ObjectTypeDef::new("Query").with_field(FieldDefinition::new(
            "viewer",
            SchemaTypeRef::named("Viewer", relaykit_core::TypeKind::NodeObject),
        ));
        assert!(root.field("viewer").is_some());
        assert!(root.field("missing").is_none());
    }
}
