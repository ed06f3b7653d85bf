//! Mutation input type synthesis.
//!
//! Every flavor mirrors the entity's declared members through the input
//! synthesis of the core, which retypes id members to opaque strings and
//! records the native id kind for later decoding.

use std::sync::Arc;

use relaykit_core::{
    FieldDescriptor, IdHandling, ModelType, ScalarKind, SchemaType, SchemaTypeRef, TypeKind,
    TypeRegistry, canonical_name, input_fields, input_type,
};

/// The plain input type of an entity (`<entity>Input`).
pub fn input_type_def(registry: &TypeRegistry, model: &ModelType) -> Arc<SchemaType> {
    input_type(registry, model, IdHandling::Preserve)
}

/// The add-mutation input type (`add<Entity>Input`): the id member is
/// omitted, new entities have no id yet.
pub fn add_input_type(registry: &TypeRegistry, model: &ModelType) -> Arc<SchemaType> {
    input_type(registry, model, IdHandling::Omit)
}

/// The update-mutation input type (`update<Entity>Input`).
pub fn update_input_type(registry: &TypeRegistry, model: &ModelType) -> Arc<SchemaType> {
    let canonical = canonical_name("UpdateInputType", &model.name);

    if let Some(existing) = registry.get(&canonical) {
        return existing;
    }

    let synthesis = input_fields(registry, model, IdHandling::Preserve);

    registry.get_or_synthesize(&canonical, move || {
        let mut ty = SchemaType::new(format!("update{}Input", model.name), TypeKind::Input);
        ty.fields.push(FieldDescriptor::new(
            "clientMutationId",
            SchemaTypeRef::scalar(ScalarKind::String).nullable(),
        ));
        ty.fields.extend(synthesis.fields);
        ty.id_origin = synthesis.id_origin;
        ty
    })
}

/// The simple-update input type: like the update input but without a
/// `clientMutationId` field.
pub fn simple_update_input_type(registry: &TypeRegistry, model: &ModelType) -> Arc<SchemaType> {
    let canonical = canonical_name("SimpleUpdateInputType", &model.name);

    if let Some(existing) = registry.get(&canonical) {
        return existing;
    }

    let synthesis = input_fields(registry, model, IdHandling::Preserve);

    registry.get_or_synthesize(&canonical, move || {
        let mut ty = SchemaType::new(format!("update{}Input", model.name), TypeKind::Input);
        ty.fields = synthesis.fields;
        ty.id_origin = synthesis.id_origin;
        ty
    })
}

/// The delete-mutation input type (`delete<Entity>Input`): just the target
/// id and the client mutation id.
pub fn delete_input_type(registry: &TypeRegistry, model: &ModelType) -> Arc<SchemaType> {
    let canonical = canonical_name("DeleteInputType", &model.name);

    registry.get_or_synthesize(&canonical, || {
        SchemaType::new(format!("delete{}Input", model.name), TypeKind::Input)
            .with_field(FieldDescriptor::new(
                "id",
                SchemaTypeRef::scalar(ScalarKind::Id),
            ))
            .with_field(FieldDescriptor::new(
                "clientMutationId",
                SchemaTypeRef::scalar(ScalarKind::String).nullable(),
            ))
    })
}
