//! Virtual type synthesis.
//!
//! Builds derived type descriptors that exist only for naming or identity
//! purposes: input variants of domain types (ids retyped to opaque strings)
//! and flat additions types that extend order-by enumerations with
//! caller-supplied sortable names. All synthesized descriptors are cached by
//! canonical name through the [`TypeRegistry`].

use std::sync::Arc;

use tracing::debug;

use crate::classify::classify;
use crate::descriptor::{FieldDescriptor, ScalarKind, SchemaType, SchemaTypeRef, TypeKind};
use crate::identification::IdKind;
use crate::model::{MemberType, ModelType};
use crate::naming::{canonical_name, to_first_lower};
use crate::registry::TypeRegistry;

/// How the source type's id member is treated during input synthesis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdHandling {
    /// The id member is kept, retyped to an opaque string id.
    Preserve,
    /// The id member is dropped entirely. Used for add mutations, where no
    /// id exists yet.
    Omit,
}

/// The outcome of converting a model type's members to their input shape.
#[derive(Debug, Clone)]
pub struct InputSynthesis {
    /// The converted field descriptors.
    pub fields: Vec<FieldDescriptor>,
    /// The native kind of the original id member, recorded so the clone
    /// engine can decode incoming opaque ids later.
    pub id_origin: Option<IdKind>,
}

/// Converts a model type's declared members into their wire-input shape.
///
/// The id member (and any other member ending in `Id`) becomes an opaque
/// string id; list item types are recursively converted through
/// [`input_type`]; everything else keeps its classified shape.
pub fn input_fields(
    registry: &TypeRegistry,
    model: &ModelType,
    handling: IdHandling,
) -> InputSynthesis {
    let mut fields = Vec::new();
    let mut id_origin = None;

    for member in &model.members {
        let field_name = to_first_lower(&member.name);

        if member.name.ends_with("Id") {
            if model.is_id_member_name(&member.name) {
                if handling == IdHandling::Preserve {
                    id_origin = member.ty.id_kind();
                    fields.push(FieldDescriptor::new(
                        field_name,
                        SchemaTypeRef::scalar(ScalarKind::Id).nullable(),
                    ));
                }
            } else {
                // foreign keys travel as opaque ids too
                fields.push(FieldDescriptor::new(
                    field_name,
                    SchemaTypeRef::scalar(ScalarKind::Id).nullable(),
                ));
            }
            continue;
        }

        if let MemberType::List(item) = member.ty.unwrap_nullable() {
            if let MemberType::Object(item_model) = item.unwrap_nullable() {
                let item_input = input_type(registry, item_model, IdHandling::Preserve);
                fields.push(FieldDescriptor::new(
                    field_name,
                    SchemaTypeRef::list(SchemaTypeRef::named(&item_input.name, TypeKind::Input)),
                ));
            } else {
                fields.push(FieldDescriptor::new(field_name, classify(&member.ty)));
            }
            continue;
        }

        fields.push(FieldDescriptor::new(field_name, classify(&member.ty)));
    }

    InputSynthesis { fields, id_origin }
}

/// Returns the cached input descriptor for a model type, synthesizing it on
/// first reference.
///
/// The descriptor is named `<typeName>Input` (first-lowered) for
/// [`IdHandling::Preserve`] and `add<TypeName>Input` for
/// [`IdHandling::Omit`], carries a leading `clientMutationId` field, and is
/// cached under the matching canonical name.
pub fn input_type(
    registry: &TypeRegistry,
    model: &ModelType,
    handling: IdHandling,
) -> Arc<SchemaType> {
    let base = match handling {
        IdHandling::Preserve => "InputType",
        IdHandling::Omit => "AddInputType",
    };
    let canonical = canonical_name(base, &model.name);

    if let Some(existing) = registry.get(&canonical) {
        return existing;
    }

    // Convert members (and synthesize nested item inputs) before taking the
    // cache entry: the registry must not be re-entered from inside it.
    let synthesis = input_fields(registry, model, handling);

    registry.get_or_synthesize(&canonical, move || {
        debug!(type_name = %model.name, ?handling, "synthesizing input type");

        let name = match handling {
            IdHandling::Preserve => to_first_lower(&format!("{}Input", model.name)),
            IdHandling::Omit => format!("add{}Input", model.name),
        };

        let mut ty = SchemaType::new(name, TypeKind::Input);
        ty.fields.push(FieldDescriptor::new(
            "clientMutationId",
            SchemaTypeRef::scalar(ScalarKind::String).nullable(),
        ));
        ty.fields.extend(synthesis.fields);
        ty.id_origin = synthesis.id_origin;
        ty
    })
}

/// Returns the cached additions descriptor for a model type: a small flat
/// type with one string field per caller-supplied name, used to extend an
/// order-by enumeration with extra sortable names.
pub fn additions_type<S: AsRef<str>>(
    registry: &TypeRegistry,
    model_name: &str,
    names: &[S],
) -> Arc<SchemaType> {
    let canonical = format!("{model_name}Addition");

    registry.get_or_synthesize(&canonical, || {
        debug!(type_name = %model_name, count = names.len(), "synthesizing additions type");

        let mut ty = SchemaType::new(&canonical, TypeKind::Object);
        ty.fields = names
            .iter()
            .map(|name| {
                FieldDescriptor::new(name.as_ref(), SchemaTypeRef::scalar(ScalarKind::String))
            })
            .collect();
        ty
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::TypeKind;

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
    fn test_input_type_retypes_ids_to_opaque_strings() {
        let registry = TypeRegistry::new();
        let input = input_type(&registry, &order_model(), IdHandling::Preserve);

        assert_eq!(input.name, "orderInput");
        assert_eq!(input.kind, TypeKind::Input);
        assert_eq!(input.id_origin, Some(IdKind::Uuid));
        assert_eq!(input.fields[0].name, "clientMutationId");

        let id = input.field("id").unwrap();
        assert_eq!(id.type_ref.kind, TypeKind::Scalar(ScalarKind::Id));
        let fk = input.field("customerId").unwrap();
        assert_eq!(fk.type_ref.kind, TypeKind::Scalar(ScalarKind::Id));
    }

    #[test]
    fn test_input_type_omits_id_for_add() {
        let registry = TypeRegistry::new();
        let input = input_type(&registry, &order_model(), IdHandling::Omit);

        assert_eq!(input.name, "addOrderInput");
        assert!(input.field("id").is_none());
        assert_eq!(input.id_origin, None);
        // foreign keys stay
        assert!(input.field("customerId").is_some());
    }

    #[test]
    fn test_input_type_converts_list_items_recursively() {
        let registry = TypeRegistry::new();
        let input = input_type(&registry, &order_model(), IdHandling::Preserve);

        let items = input.field("items").unwrap();
        assert_eq!(items.type_ref.kind, TypeKind::List);
        assert_eq!(items.type_ref.innermost().name, "orderItemInput");
        // the nested item input is cached by its own canonical name
        assert!(registry.contains("InputTypeOrderItem"));
    }

    #[test]
    fn test_input_type_is_cached() {
        let registry = TypeRegistry::new();
        let model = order_model();
        let first = input_type(&registry, &model, IdHandling::Preserve);
        let second = input_type(&registry, &model, IdHandling::Preserve);
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_additions_type() {
        let registry = TypeRegistry::new();
        let additions = additions_type(&registry, "Order", &["relevance", "popularity"]);

        assert_eq!(additions.name, "OrderAddition");
        assert_eq!(additions.fields.len(), 2);
        assert_eq!(
            additions.field("relevance").unwrap().type_ref.kind,
            TypeKind::Scalar(ScalarKind::String)
        );
    }
}
