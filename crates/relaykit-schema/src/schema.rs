//! Schema assembly.
//!
//! Composes the bound root types and every synthesized descriptor into one
//! schema value. Building snapshots the type registry by schema-surface
//! name, so the validation pass can resolve any selection against either a
//! bound container (with its auth metadata) or a plain descriptor.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use relaykit_core::{
    FieldDescriptor, FieldMetadata, SchemaType, SchemaTypeRef, TypeKind, TypeRegistry,
};

use crate::config::SchemaConfig;
use crate::error::SchemaError;
use crate::fields::ObjectTypeDef;
use crate::types::node_interface;

/// A fully assembled schema: the bound roots plus every reachable type
/// descriptor, keyed by schema-surface name.
#[derive(Debug)]
pub struct Schema {
    config: SchemaConfig,
    query: ObjectTypeDef,
    mutation: Option<ObjectTypeDef>,
    containers: HashMap<String, ObjectTypeDef>,
    types: HashMap<String, Arc<SchemaType>>,
}

/// A resolved type during selection-tree traversal: either a bound
/// container carrying field resolvers and metadata, or a plain descriptor.
#[derive(Debug, Clone, Copy)]
pub enum TypeLookup<'a> {
    Bound(&'a ObjectTypeDef),
    Descriptor(&'a SchemaType),
}

impl<'a> TypeLookup<'a> {
    /// Looks up a field's result type and metadata by schema-surface name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<(&'a SchemaTypeRef, &'a FieldMetadata)> {
        match self {
            Self::Bound(def) => def
                .field(name)
                .map(|field| (&field.type_ref, &field.metadata)),
            Self::Descriptor(ty) => ty
                .field(name)
                .map(|field| (&field.type_ref, &field.metadata)),
        }
    }
}

impl Schema {
    /// Starts building a schema.
    #[must_use]
    pub fn builder() -> SchemaBuilder {
        SchemaBuilder::new()
    }

    /// The schema configuration.
    #[must_use]
    pub fn config(&self) -> &SchemaConfig {
        &self.config
    }

    /// The query root.
    #[must_use]
    pub fn query(&self) -> &ObjectTypeDef {
        &self.query
    }

    /// The mutation root, if any.
    #[must_use]
    pub fn mutation(&self) -> Option<&ObjectTypeDef> {
        self.mutation.as_ref()
    }

    /// Looks up a bound container by type name.
    #[must_use]
    pub fn container(&self, name: &str) -> Option<&ObjectTypeDef> {
        self.containers.get(name)
    }

    /// Looks up a type descriptor by schema-surface name.
    #[must_use]
    pub fn type_by_name(&self, name: &str) -> Option<&Arc<SchemaType>> {
        self.types.get(name)
    }

    /// Resolves a type for selection traversal: bound containers win over
    /// plain descriptors, their fields carry the declared auth metadata.
    #[must_use]
    pub fn lookup_type(&self, name: &str) -> Option<TypeLookup<'_>> {
        if let Some(container) = self.containers.get(name) {
            return Some(TypeLookup::Bound(container));
        }
        self.types
            .get(name)
            .map(|ty| TypeLookup::Descriptor(ty.as_ref()))
    }

    /// All known type names.
    pub fn type_names(&self) -> impl Iterator<Item = &str> {
        self.types.keys().map(String::as_str)
    }
}

/// Builder for [`Schema`].
#[derive(Default)]
pub struct SchemaBuilder {
    config: SchemaConfig,
    query: Option<ObjectTypeDef>,
    mutation: Option<ObjectTypeDef>,
    containers: Vec<ObjectTypeDef>,
}

impl SchemaBuilder {
    /// Creates a builder with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the configuration.
    #[must_use]
    pub fn with_config(mut self, config: SchemaConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the query root.
    #[must_use]
    pub fn with_query(mut self, query: ObjectTypeDef) -> Self {
        self.query = Some(query);
        self
    }

    /// Sets the mutation root.
    #[must_use]
    pub fn with_mutation(mut self, mutation: ObjectTypeDef) -> Self {
        self.mutation = Some(mutation);
        self
    }

    /// Adds a bound container type (a viewer, typically).
    #[must_use]
    pub fn with_container(mut self, container: ObjectTypeDef) -> Self {
        self.containers.push(container);
        self
    }

    /// Assembles the schema.
    ///
    /// # Errors
    ///
    /// Fails on invalid configuration, a missing query root, or when two
    /// structurally different types share one schema-surface name.
    pub fn build(self, registry: &TypeRegistry) -> Result<Schema, SchemaError> {
        self.config.validate()?;
        let query = self
            .query
            .ok_or_else(|| SchemaError::Configuration("a query root is required".to_string()))?;

        node_interface(registry);

        let mut types: HashMap<String, Arc<SchemaType>> = HashMap::new();
        for ty in registry.snapshot() {
            match types.get(&ty.name) {
                Some(existing) if **existing != *ty => {
                    return Err(SchemaError::NameCollision(ty.name.clone()));
                }
                Some(_) => {}
                None => {
                    types.insert(ty.name.clone(), ty);
                }
            }
        }

        let mut containers = HashMap::new();
        for container in self.containers {
            let descriptor = Arc::new(container_descriptor(&container, TypeKind::NodeObject));
            if let Some(existing) = types.get(&container.name) {
                if **existing != *descriptor {
                    return Err(SchemaError::NameCollision(container.name.clone()));
                }
            }
            types.insert(container.name.clone(), descriptor);
            containers.insert(container.name.clone(), container);
        }

        debug!(
            types = types.len(),
            containers = containers.len(),
            query = %query.name,
            "schema assembled"
        );

        Ok(Schema {
            config: self.config,
            query,
            mutation: self.mutation,
            containers,
            types,
        })
    }
}

/// Derives the plain descriptor of a bound container, keeping per-field
/// metadata so nested selections stay checked.
fn container_descriptor(def: &ObjectTypeDef, kind: TypeKind) -> SchemaType {
    let mut ty = SchemaType::new(&def.name, kind);
    ty.fields = def
        .fields
        .iter()
        .map(|field| FieldDescriptor {
            name: field.name.clone(),
            type_ref: field.type_ref.clone(),
            metadata: field.metadata.clone(),
        })
        .collect();
    ty
}
