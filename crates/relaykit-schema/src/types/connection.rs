//! Connection, edge and page-info type synthesis.

use std::sync::Arc;

use tracing::debug;

use relaykit_core::{
    FieldDescriptor, ModelType, ScalarKind, SchemaType, SchemaTypeRef, TypeKind, TypeRegistry,
    canonical_name, classify, is_simple, to_first_lower,
};

use super::order_by::order_by_type;
use crate::fields::Argument;

/// The shared page-info type carried by every connection.
pub fn page_info_type(registry: &TypeRegistry) -> Arc<SchemaType> {
    registry.get_or_synthesize("PageInfo", || {
        SchemaType::new("PageInfo", TypeKind::Object)
            .with_field(FieldDescriptor::new(
                "startCursor",
                SchemaTypeRef::scalar(ScalarKind::Id).nullable(),
            ))
            .with_field(FieldDescriptor::new(
                "endCursor",
                SchemaTypeRef::scalar(ScalarKind::Id).nullable(),
            ))
            .with_field(FieldDescriptor::new(
                "hasPreviousPage",
                SchemaTypeRef::scalar(ScalarKind::Boolean),
            ))
            .with_field(FieldDescriptor::new(
                "hasNextPage",
                SchemaTypeRef::scalar(ScalarKind::Boolean),
            ))
    })
}

/// Builds the edge type of an entity: a cursor plus the node itself.
pub fn edge_type(registry: &TypeRegistry, model: &ModelType) -> Arc<SchemaType> {
    let canonical = canonical_name("EdgeType", &model.name);

    registry.get_or_synthesize(&canonical, || {
        SchemaType::new(format!("{}Edge", model.name), TypeKind::Object)
            .with_field(FieldDescriptor::new(
                "cursor",
                SchemaTypeRef::scalar(ScalarKind::Id),
            ))
            .with_field(FieldDescriptor::new(
                "node",
                SchemaTypeRef::named(&model.name, TypeKind::NodeObject),
            ))
    })
}

/// Builds the connection type of an entity, with a `count` field in
/// addition to the edges and page info.
pub fn connection_type(registry: &TypeRegistry, model: &ModelType) -> Arc<SchemaType> {
    let canonical = canonical_name("ConnectionType", &model.name);

    if let Some(existing) = registry.get(&canonical) {
        return existing;
    }

    // edge and page-info types are synthesized before taking the cache entry
    let edge = edge_type(registry, model);
    page_info_type(registry);

    registry.get_or_synthesize(&canonical, move || {
        debug!(type_name = %model.name, "synthesizing connection type");

        SchemaType::new(format!("{}Connection", model.name), TypeKind::Connection)
            .with_field(FieldDescriptor::new(
                "edges",
                SchemaTypeRef::list(SchemaTypeRef::named(&edge.name, TypeKind::Object)),
            ))
            .with_field(FieldDescriptor::new(
                "pageInfo",
                SchemaTypeRef::named("PageInfo", TypeKind::Object),
            ))
            .with_field(FieldDescriptor::new(
                "count",
                SchemaTypeRef::scalar(ScalarKind::Float),
            ))
    })
}

/// Builds the argument list of a connection field: the paging quartet and
/// `orderBy`, one optional scalar filter per simple member of the entity,
/// and any caller-declared extra arguments.
pub fn connection_arguments(
    registry: &TypeRegistry,
    model: &ModelType,
    extra: &[Argument],
) -> Vec<Argument> {
    let mut arguments = vec![
        Argument::new("after", SchemaTypeRef::scalar(ScalarKind::Id).nullable()),
        Argument::new("first", SchemaTypeRef::scalar(ScalarKind::Int).nullable()),
        Argument::new("before", SchemaTypeRef::scalar(ScalarKind::Id).nullable()),
        Argument::new("last", SchemaTypeRef::scalar(ScalarKind::Int).nullable()),
    ];

    let additions: Vec<String> = extra.iter().map(|argument| argument.name.clone()).collect();
    let order_by = order_by_type(registry, model, &additions);
    arguments.push(Argument::new(
        "orderBy",
        SchemaTypeRef::named(&order_by.name, TypeKind::Enum).nullable(),
    ));

    for member in model.members.iter().filter(|member| is_simple(&member.ty)) {
        arguments.push(Argument::new(
            to_first_lower(&member.name),
            classify(&member.ty).nullable(),
        ));
    }

    arguments.extend(extra.iter().cloned());
    arguments
}

#[cfg(test)]
mod tests {
    use relaykit_core::MemberType;

    use super::*;

    fn order_model() -> ModelType {
        ModelType::new("Order")
            .with_member("Id", MemberType::Uuid)
            .with_member("Name", MemberType::String)
            .with_member("Items", MemberType::List(Box::new(MemberType::String)))
    }

    #[test]
    fn test_connection_type_shape() {
        let registry = TypeRegistry::new();
        let ty = connection_type(&registry, &order_model());

        assert_eq!(ty.name, "OrderConnection");
        assert_eq!(ty.kind, TypeKind::Connection);
        assert_eq!(ty.field("edges").unwrap().type_ref.name, "[OrderEdge]");
        assert_eq!(ty.field("pageInfo").unwrap().type_ref.name, "PageInfo");
        assert_eq!(
            ty.field("count").unwrap().type_ref.kind,
            TypeKind::Scalar(ScalarKind::Float)
        );
        assert!(registry.contains("EdgeTypeOrder"));
        assert!(registry.contains("PageInfo"));
    }

    #[test]
    fn test_edge_type_shape() {
        let registry = TypeRegistry::new();
        let ty = edge_type(&registry, &order_model());
        assert_eq!(ty.name, "OrderEdge");
        assert_eq!(ty.field("node").unwrap().type_ref.name, "Order");
        assert!(ty.field("cursor").is_some());
    }

    #[test]
    fn test_connection_arguments() {
        let registry = TypeRegistry::new();
        let extra = vec![Argument::new(
            "search",
            SchemaTypeRef::scalar(ScalarKind::String).nullable(),
        )];
        let arguments = connection_arguments(&registry, &order_model(), &extra);

        let names: Vec<&str> = arguments.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["after", "first", "before", "last", "orderBy", "id", "name", "search"]
        );

        let order_by = arguments.iter().find(|a| a.name == "orderBy").unwrap();
        assert_eq!(order_by.type_ref.name, "orderByOrder");

        // the extra argument extends the order-by enumeration
        let order_by_ty = registry.get("OrderByTypeOrder").unwrap();
        assert!(order_by_ty.values.contains(&"SEARCH_ASC".to_string()));
    }
}
