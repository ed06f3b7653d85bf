//! Mutation payload type synthesis.

use std::sync::Arc;

use relaykit_core::{
    FieldDescriptor, ModelType, ScalarKind, SchemaType, SchemaTypeRef, TypeKind, TypeRegistry,
    canonical_name,
};

use super::connection::edge_type;

fn client_mutation_id_field() -> FieldDescriptor {
    FieldDescriptor::new(
        "clientMutationId",
        SchemaTypeRef::scalar(ScalarKind::String).nullable(),
    )
}

/// Builds the payload type of an add mutation: the viewer, the changed
/// object wrapped in an edge, and the relayed client mutation id.
pub fn add_payload_type(
    registry: &TypeRegistry,
    model: &ModelType,
    viewer_type_name: &str,
) -> Arc<SchemaType> {
    let canonical = canonical_name("AddPayloadType", &model.name);

    if let Some(existing) = registry.get(&canonical) {
        return existing;
    }

    let edge = edge_type(registry, model);

    registry.get_or_synthesize(&canonical, move || {
        SchemaType::new(format!("add{}Payload", model.name), TypeKind::Object)
            .with_field(FieldDescriptor::new(
                "viewer",
                SchemaTypeRef::named(viewer_type_name, TypeKind::NodeObject),
            ))
            .with_field(FieldDescriptor::new(
                "changedObjectEdge",
                SchemaTypeRef::named(&edge.name, TypeKind::Object),
            ))
            .with_field(client_mutation_id_field())
    })
}

/// Builds the payload type of an update mutation: the changed object and
/// the relayed client mutation id.
pub fn update_payload_type(registry: &TypeRegistry, model: &ModelType) -> Arc<SchemaType> {
    let canonical = canonical_name("UpdatePayloadType", &model.name);

    registry.get_or_synthesize(&canonical, || {
        SchemaType::new(format!("update{}Payload", model.name), TypeKind::Object)
            .with_field(FieldDescriptor::new(
                "changedObject",
                SchemaTypeRef::named(&model.name, TypeKind::NodeObject),
            ))
            .with_field(client_mutation_id_field())
    })
}

/// Builds the payload type of a delete mutation: the viewer, the outcome
/// flag, the deleted id and the relayed client mutation id.
pub fn delete_payload_type(
    registry: &TypeRegistry,
    model: &ModelType,
    viewer_type_name: &str,
) -> Arc<SchemaType> {
    let canonical = canonical_name("DeletePayloadType", &model.name);

    registry.get_or_synthesize(&canonical, || {
        SchemaType::new(format!("delete{}Payload", model.name), TypeKind::Object)
            .with_field(FieldDescriptor::new(
                "viewer",
                SchemaTypeRef::named(viewer_type_name, TypeKind::NodeObject),
            ))
            .with_field(FieldDescriptor::new(
                "ok",
                SchemaTypeRef::scalar(ScalarKind::Boolean),
            ))
            .with_field(FieldDescriptor::new(
                "id",
                SchemaTypeRef::scalar(ScalarKind::Id),
            ))
            .with_field(client_mutation_id_field())
    })
}

#[cfg(test)]
mod tests {
    use relaykit_core::MemberType;

    use super::*;

    fn order_model() -> ModelType {
        ModelType::new("Order")
            .with_member("Id", MemberType::Uuid)
            .with_member("Name", MemberType::String)
    }

    #[test]
    fn test_add_payload_shape() {
        let registry = TypeRegistry::new();
        let ty = add_payload_type(&registry, &order_model(), "Viewer");

        assert_eq!(ty.name, "addOrderPayload");
        assert_eq!(ty.field("viewer").unwrap().type_ref.name, "Viewer");
        assert_eq!(
            ty.field("changedObjectEdge").unwrap().type_ref.name,
            "OrderEdge"
        );
        assert!(ty.field("clientMutationId").is_some());
    }

    #[test]
    fn test_update_payload_shape() {
        let registry = TypeRegistry::new();
        let ty = update_payload_type(&registry, &order_model());

        assert_eq!(ty.name, "updateOrderPayload");
        assert_eq!(ty.field("changedObject").unwrap().type_ref.name, "Order");
        assert!(ty.field("viewer").is_none());
    }

    #[test]
    fn test_delete_payload_shape() {
        let registry = TypeRegistry::new();
        let ty = delete_payload_type(&registry, &order_model(), "Viewer");

        assert_eq!(ty.name, "deleteOrderPayload");
        assert!(ty.field("ok").is_some());
        assert!(ty.field("id").is_some());
        assert!(ty.field("viewer").is_some());
        assert!(ty.field("clientMutationId").is_some());
    }
}
