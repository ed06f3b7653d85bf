//! Enumeration type synthesis from declared enums.

use std::sync::Arc;

use relaykit_core::{EnumModel, SchemaType, TypeKind, TypeRegistry, canonical_name};

/// Builds the enumeration type of a declared enum, one value per declared
/// enum value in declaration order.
pub fn enumeration_type(registry: &TypeRegistry, model: &EnumModel) -> Arc<SchemaType> {
    let canonical = canonical_name("EnumerationType", &model.name);

    registry.get_or_synthesize(&canonical, || {
        let mut ty = SchemaType::new(&model.name, TypeKind::Enum);
        ty.values = model.values.clone();
        ty
    })
}
