//! Registry for synthesized schema types.
//!
//! Derived type descriptors are cached process-wide, keyed by their
//! deterministic canonical name. Lookups are idempotent: a name already
//! synthesized is returned as-is and never rebuilt, and concurrent first
//! access from parallel requests still runs exactly one synthesis.

use std::sync::{Arc, LazyLock};

use dashmap::DashMap;
use tracing::trace;

use crate::descriptor::SchemaType;
use crate::error::CoreError;

static GLOBAL: LazyLock<TypeRegistry> = LazyLock::new(TypeRegistry::new);

/// Cache of synthesized type descriptors, keyed by canonical name.
#[derive(Debug, Default)]
pub struct TypeRegistry {
    types: DashMap<String, Arc<SchemaType>>,
}

impl TypeRegistry {
    /// Creates a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            types: DashMap::new(),
        }
    }

    /// The process-wide registry instance.
    ///
    /// Populated on first use and read-mostly thereafter; descriptors live
    /// for the process lifetime.
    #[must_use]
    pub fn global() -> &'static TypeRegistry {
        &GLOBAL
    }

    /// Looks up a cached descriptor by canonical name.
    #[must_use]
    pub fn get(&self, canonical: &str) -> Option<Arc<SchemaType>> {
        self.types.get(canonical).map(|entry| entry.value().clone())
    }

    /// Returns the cached descriptor for the canonical name, synthesizing it
    /// with `build` when absent.
    ///
    /// The insert-if-absent discipline guarantees `build` runs at most once
    /// per name, even under concurrent first access. `build` runs while the
    /// cache shard is locked and must not call back into the registry;
    /// synthesize nested descriptors first and only assemble inside `build`.
    pub fn get_or_synthesize(
        &self,
        canonical: &str,
        build: impl FnOnce() -> SchemaType,
    ) -> Arc<SchemaType> {
        if let Some(existing) = self.get(canonical) {
            trace!(canonical, "type cache hit");
            return existing;
        }

        self.types
            .entry(canonical.to_string())
            .or_insert_with(|| {
                trace!(canonical, "synthesizing type");
                Arc::new(build())
            })
            .value()
            .clone()
    }

    /// Registers a descriptor under a canonical name.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::NameCollision`] when a structurally different
    /// descriptor is already cached under the name.
    pub fn register(&self, canonical: &str, ty: SchemaType) -> Result<Arc<SchemaType>, CoreError> {
        if let Some(existing) = self.get(canonical) {
            if *existing != ty {
                return Err(CoreError::name_collision(canonical));
            }
            return Ok(existing);
        }

        Ok(self
            .types
            .entry(canonical.to_string())
            .or_insert_with(|| Arc::new(ty))
            .value()
            .clone())
    }

    /// Whether a canonical name is cached.
    #[must_use]
    pub fn contains(&self, canonical: &str) -> bool {
        self.types.contains_key(canonical)
    }

    /// Number of cached descriptors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Whether the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// All cached descriptors, in no particular order.
    #[must_use]
    pub fn snapshot(&self) -> Vec<Arc<SchemaType>> {
        self.types.iter().map(|entry| entry.value().clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::descriptor::TypeKind;

    #[test]
    fn test_synthesis_runs_once_per_name() {
        let registry = TypeRegistry::new();
        let calls = AtomicUsize::new(0);

        let first = registry.get_or_synthesize("WrapperFoo", || {
            calls.fetch_add(1, Ordering::SeqCst);
            SchemaType::new("WrapperFoo", TypeKind::Object)
        });
        let second = registry.get_or_synthesize("WrapperFoo", || {
            calls.fetch_add(1, Ordering::SeqCst);
            SchemaType::new("WrapperFoo", TypeKind::Object)
        });

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_register_same_structure_is_idempotent() {
        let registry = TypeRegistry::new();
        let ty = SchemaType::new("Order", TypeKind::Object);
        registry.register("Order", ty.clone()).unwrap();
        let again = registry.register("Order", ty).unwrap();
        assert_eq!(again.name, "Order");
    }

    #[test]
    fn test_register_different_structure_collides() {
        let registry = TypeRegistry::new();
        registry
            .register("Order", SchemaType::new("Order", TypeKind::Object))
            .unwrap();
        let collision = registry.register("Order", SchemaType::new("Order", TypeKind::Input));
        assert!(matches!(collision, Err(CoreError::NameCollision { .. })));
    }
}
