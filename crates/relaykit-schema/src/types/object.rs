//! Object and node-object type synthesis.
//!
//! Entity types are registered through a worklist over the reachable model
//! graph: nested object members and list items queue their own types, so
//! circular references between models terminate.

use std::collections::{HashSet, VecDeque};
use std::sync::Arc;

use tracing::debug;

use relaykit_core::{
    FieldDescriptor, MemberType, ModelType, ScalarKind, SchemaType, SchemaTypeRef, TypeKind,
    TypeRegistry, canonical_name, classify, to_first_lower,
};

use super::connection::connection_type;
use super::enumeration::enumeration_type;

/// The shared Node capability type, exposing only the global `id`.
pub fn node_interface(registry: &TypeRegistry) -> Arc<SchemaType> {
    registry.get_or_synthesize("Node", || {
        SchemaType::new("Node", TypeKind::Object).with_field(FieldDescriptor::new(
            "id",
            SchemaTypeRef::scalar(ScalarKind::Id),
        ))
    })
}

/// Builds the object type of a model.
///
/// Fields are derived purely from the model's declared members; an id
/// member, if any, becomes a plain scalar field rather than a node identity.
pub fn object_type(registry: &TypeRegistry, model: &ModelType) -> Arc<SchemaType> {
    let canonical = canonical_name("ObjectType", &model.name);
    if let Some(existing) = registry.get(&canonical) {
        return existing;
    }

    register_reachable(registry, model);
    registry.get_or_synthesize(&canonical, || {
        debug!(type_name = %model.name, "synthesizing object type");
        object_descriptor(model)
    })
}

/// Builds the node object type of a model.
///
/// Prepends the protocol-level `id` field, computed at resolve time from the
/// entity name and its native id; foreign-key members surface as global ids,
/// and list members of node-shaped items surface as connection fields.
pub fn node_object_type(registry: &TypeRegistry, model: &ModelType) -> Arc<SchemaType> {
    let canonical = canonical_name("NodeObjectType", &model.name);
    if let Some(existing) = registry.get(&canonical) {
        return existing;
    }

    register_reachable(registry, model);
    registry
        .get(&canonical)
        .unwrap_or_else(|| registry.get_or_synthesize(&canonical, || node_object_descriptor(model)))
}

/// Registers descriptors for every model reachable from `root`, including
/// `root` itself, breadth-first with cycle protection.
fn register_reachable(registry: &TypeRegistry, root: &ModelType) {
    let mut visited: HashSet<String> = HashSet::new();
    let mut pending: VecDeque<Arc<ModelType>> = VecDeque::new();

    visited.insert(root.name.clone());
    register_single(registry, root, &mut visited, &mut pending);

    while let Some(model) = pending.pop_front() {
        register_single(registry, &model, &mut visited, &mut pending);
    }
}

fn register_single(
    registry: &TypeRegistry,
    model: &ModelType,
    visited: &mut HashSet<String>,
    pending: &mut VecDeque<Arc<ModelType>>,
) {
    // queue referenced models and synthesize auxiliary connection and
    // enumeration types
    for member in &model.members {
        let target = match member.ty.unwrap_nullable() {
            MemberType::Object(target) => Some(target),
            MemberType::Enum(declared) => {
                enumeration_type(registry, declared);
                None
            }
            MemberType::List(item) => match item.unwrap_nullable() {
                MemberType::Object(target) => {
                    if target.has_id() {
                        connection_type(registry, target);
                    }
                    Some(target)
                }
                MemberType::Enum(declared) => {
                    enumeration_type(registry, declared);
                    None
                }
                _ => None,
            },
            _ => None,
        };

        if let Some(target) = target {
            if visited.insert(target.name.clone()) {
                pending.push_back(target.clone());
            }
        }
    }

    if model.has_id() {
        let canonical = canonical_name("NodeObjectType", &model.name);
        registry.get_or_synthesize(&canonical, || {
            debug!(type_name = %model.name, "synthesizing node object type");
            node_object_descriptor(model)
        });
    } else {
        let canonical = canonical_name("ObjectType", &model.name);
        registry.get_or_synthesize(&canonical, || {
            debug!(type_name = %model.name, "synthesizing object type");
            object_descriptor(model)
        });
    }
}

fn object_descriptor(model: &ModelType) -> SchemaType {
    let mut ty = SchemaType::new(&model.name, TypeKind::Object);
    for member in &model.members {
        let field_name = to_first_lower(&member.name);

        if member.name.ends_with("Id") && !model.is_id_member_name(&member.name) {
            // foreign keys surface as globally unique ids
            ty.fields.push(FieldDescriptor::new(
                field_name,
                SchemaTypeRef::scalar(ScalarKind::Id),
            ));
            continue;
        }

        ty.fields
            .push(FieldDescriptor::new(field_name, classify(&member.ty)));
    }
    ty
}

fn node_object_descriptor(model: &ModelType) -> SchemaType {
    let mut ty = SchemaType::new(&model.name, TypeKind::NodeObject).with_field(
        FieldDescriptor::new("id", SchemaTypeRef::scalar(ScalarKind::Id)),
    );

    for member in &model.members {
        // the declared id member is covered by the node id field
        if member.name == "Id" {
            continue;
        }

        let field_name = to_first_lower(&member.name);

        if member.name.ends_with("Id") {
            ty.fields.push(FieldDescriptor::new(
                field_name,
                SchemaTypeRef::scalar(ScalarKind::Id),
            ));
            continue;
        }

        if let MemberType::List(item) = member.ty.unwrap_nullable() {
            if let MemberType::Object(item_model) = item.unwrap_nullable() {
                if item_model.has_id() {
                    // list members of node items auto-wrap as connections
                    ty.fields.push(FieldDescriptor::new(
                        field_name,
                        SchemaTypeRef::named(
                            format!("{}Connection", item_model.name),
                            TypeKind::Connection,
                        ),
                    ));
                    continue;
                }
            }
        }

        ty.fields
            .push(FieldDescriptor::new(field_name, classify(&member.ty)));
    }
    ty
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order_model() -> ModelType {
        let item = ModelType::new("OrderItem")
            .with_member("Id", MemberType::Int)
            .with_member("Quantity", MemberType::Int);
        ModelType::new("Order")
            .with_member("Id", MemberType::Uuid)
            .with_member("CustomerId", MemberType::Uuid)
            .with_member("Name", MemberType::String)
            .with_member(
                "Items",
                MemberType::List(Box::new(MemberType::Object(Arc::new(item)))),
            )
    }

    #[test]
    fn test_node_object_type_prepends_node_id() {
        let registry = TypeRegistry::new();
        let ty = node_object_type(&registry, &order_model());

        assert_eq!(ty.name, "Order");
        assert_eq!(ty.kind, TypeKind::NodeObject);
        assert_eq!(ty.fields[0].name, "id");
        assert_eq!(ty.fields[0].type_ref.kind, TypeKind::Scalar(ScalarKind::Id));
        // the declared Id member is not repeated
        assert_eq!(ty.fields.iter().filter(|f| f.name == "id").count(), 1);
    }

    #[test]
    fn test_node_object_type_globalizes_foreign_keys() {
        let registry = TypeRegistry::new();
        let ty = node_object_type(&registry, &order_model());
        let fk = ty.field("customerId").unwrap();
        assert_eq!(fk.type_ref.kind, TypeKind::Scalar(ScalarKind::Id));
    }

    #[test]
    fn test_node_object_type_wraps_node_lists_as_connections() {
        let registry = TypeRegistry::new();
        let ty = node_object_type(&registry, &order_model());
        let items = ty.field("items").unwrap();
        assert_eq!(items.type_ref.name, "OrderItemConnection");
        assert_eq!(items.type_ref.kind, TypeKind::Connection);

        // the referenced item and connection types are registered alongside
        assert!(registry.contains("NodeObjectTypeOrderItem"));
        assert!(registry.contains("ConnectionTypeOrderItem"));
        assert!(registry.contains("EdgeTypeOrderItem"));
    }

    #[test]
    fn test_circular_models_terminate() {
        // two models referencing each other through lists
        let mut left = ModelType::new("Left").with_member("Id", MemberType::Int);
        let right = Arc::new(
            ModelType::new("Right")
                .with_member("Id", MemberType::Int)
                .with_member(
                    "Lefts",
                    MemberType::List(Box::new(MemberType::Object(Arc::new(left.clone())))),
                ),
        );
        left = left.with_member(
            "Rights",
            MemberType::List(Box::new(MemberType::Object(right))),
        );

        let registry = TypeRegistry::new();
        let ty = node_object_type(&registry, &left);
        assert_eq!(ty.name, "Left");
        assert!(registry.contains("NodeObjectTypeRight"));
    }

    #[test]
    fn test_object_type_keeps_id_as_plain_scalar() {
        let registry = TypeRegistry::new();
        let model = ModelType::new("Address")
            .with_member("City", MemberType::String)
            .with_member("CountryId", MemberType::Int);
        let ty = object_type(&registry, &model);

        assert_eq!(ty.kind, TypeKind::Object);
        assert!(ty.field("city").is_some());
        // foreign keys still surface as ids
        assert_eq!(
            ty.field("countryId").unwrap().type_ref.kind,
            TypeKind::Scalar(ScalarKind::Id)
        );
    }

    #[test]
    fn test_node_interface_exposes_only_id() {
        let registry = TypeRegistry::new();
        let node = node_interface(&registry);
        assert_eq!(node.name, "Node");
        assert_eq!(node.fields.len(), 1);
        assert_eq!(node.fields[0].name, "id");
    }
}
