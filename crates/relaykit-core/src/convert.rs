//! Input transform and clone/mapping engine.
//!
//! Translates a materialized wire-input instance into a domain instance:
//! opaque global ids are decoded back to their native kinds, list members
//! are cloned item by item, and everything else is copied. Mapping is
//! best-effort, not a strict contract match: members the destination does
//! not declare (or declares read-only) are silently skipped.

use tracing::warn;

use crate::error::CoreError;
use crate::identification::{GlobalId, LocalId};
use crate::model::{MemberType, ModelType};
use crate::synth::IdHandling;
use crate::value::{ModelInstance, ModelValue};

/// Clones a source instance onto the shape of a target model type.
///
/// The id member, when present and not omitted, is decoded from its opaque
/// wire form to the target's native id kind. Other `...Id` members are
/// decoded the same way but fall back to the zero/default id value when
/// decoding fails. A `Null` list member stays `Null`; populated lists are
/// cloned item by item through the same engine.
///
/// # Errors
///
/// Returns [`CoreError::UnsupportedIdType`] when the target's id member has
/// no decodable native kind, or [`CoreError::Decode`] when the id member's
/// opaque value is malformed.
pub fn clone_as(
    source: &ModelInstance,
    target: &ModelType,
    handling: IdHandling,
) -> Result<ModelInstance, CoreError> {
    let mut clone = ModelInstance::new(&target.name);

    for (name, value) in source.fields() {
        let Some(dest) = target.member(name) else {
            continue;
        };
        if dest.read_only {
            continue;
        }

        if target.is_id_member_name(name) {
            if handling == IdHandling::Omit {
                continue;
            }
            match value {
                ModelValue::String(opaque) => {
                    let kind = target.id_kind()?;
                    let id = GlobalId::to_local_id(opaque, kind)?;
                    clone.set_field(name, id.into());
                }
                other => clone.set_field(name, other.clone()),
            }
            continue;
        }

        if name.ends_with("Id") {
            clone.set_field(name, clone_foreign_key(&target.name, name, &dest.ty, value));
            continue;
        }

        if let MemberType::List(item_ty) = dest.ty.unwrap_nullable() {
            clone.set_field(name, clone_list(item_ty, value)?);
            continue;
        }

        clone.set_field(name, value.clone());
    }

    Ok(clone)
}

/// Decodes a foreign-key member to the destination's native id kind,
/// falling back to the zero/default id value on decode failure.
fn clone_foreign_key(
    type_name: &str,
    member: &str,
    dest_ty: &MemberType,
    value: &ModelValue,
) -> ModelValue {
    let Some(kind) = dest_ty.id_kind() else {
        return value.clone();
    };

    match value {
        ModelValue::String(opaque) => match GlobalId::to_local_id(opaque, kind) {
            Ok(id) => id.into(),
            Err(error) => {
                warn!(type_name, member, %error, "foreign key decode failed, using default");
                LocalId::zero(kind).into()
            }
        },
        other => other.clone(),
    }
}

fn clone_list(item_ty: &MemberType, value: &ModelValue) -> Result<ModelValue, CoreError> {
    match value {
        ModelValue::Null => Ok(ModelValue::Null),
        ModelValue::List(items) => {
            let cloned = items
                .iter()
                .map(|item| match (item, item_ty.unwrap_nullable()) {
                    (ModelValue::Object(instance), MemberType::Object(item_model)) => {
                        clone_as(instance, item_model, IdHandling::Preserve)
                            .map(ModelValue::Object)
                    }
                    (other, _) => Ok(other.clone()),
                })
                .collect::<Result<Vec<_>, CoreError>>()?;
            Ok(ModelValue::List(cloned))
        }
        other => Ok(other.clone()),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use uuid::Uuid;

    use super::*;
    use crate::identification::IdKind;

    fn item_model() -> Arc<ModelType> {
        Arc::new(
            ModelType::new("OrderItem")
                .with_member("Id", MemberType::Int)
                .with_member("Quantity", MemberType::Int),
        )
    }

    fn model_b() -> ModelType {
        ModelType::new("ModelB")
            .with_member("Id", MemberType::Uuid)
            .with_member("CustomerId", MemberType::Uuid)
            .with_member("Name", MemberType::String)
            .with_member(
                "Items",
                MemberType::List(Box::new(MemberType::Object(item_model()))),
            )
    }

    #[test]
    fn test_decodes_primary_id_to_native_uuid() {
        let uuid = Uuid::parse_str("0a25a77b-d43f-4744-8095-ff5567797082").unwrap();
        let source = ModelInstance::new("modelBInput")
            .with_field("Id", ModelValue::String(GlobalId::encode("ModelB", uuid)))
            .with_field("Name", ModelValue::String("b".into()));

        let clone = clone_as(&source, &model_b(), IdHandling::Preserve).unwrap();
        assert_eq!(clone.field("Id"), Some(&ModelValue::Uuid(uuid)));
        assert_eq!(clone.field("Name"), Some(&ModelValue::String("b".into())));
    }

    #[test]
    fn test_omit_drops_primary_id() {
        let source = ModelInstance::new("addModelBInput")
            .with_field("Id", ModelValue::String("whatever".into()))
            .with_field("Name", ModelValue::String("b".into()));

        let clone = clone_as(&source, &model_b(), IdHandling::Omit).unwrap();
        assert!(clone.field("Id").is_none());
        assert!(clone.field("Name").is_some());
    }

    #[test]
    fn test_malformed_primary_id_fails() {
        let source =
            ModelInstance::new("modelBInput").with_field("Id", ModelValue::String("%%%".into()));
        assert!(matches!(
            clone_as(&source, &model_b(), IdHandling::Preserve),
            Err(CoreError::Decode(_))
        ));
    }

    #[test]
    fn test_foreign_key_decode_falls_back_to_default() {
        let source = ModelInstance::new("modelBInput")
            .with_field("CustomerId", ModelValue::String("not base64".into()));

        let clone = clone_as(&source, &model_b(), IdHandling::Preserve).unwrap();
        assert_eq!(
            clone.field("CustomerId"),
            Some(&ModelValue::from(LocalId::zero(IdKind::Uuid)))
        );
    }

    #[test]
    fn test_foreign_key_decodes_when_valid() {
        let customer = Uuid::parse_str("1b35a77b-d43f-4744-8095-ff5567797082").unwrap();
        let source = ModelInstance::new("modelBInput").with_field(
            "CustomerId",
            ModelValue::String(GlobalId::encode("Customer", customer)),
        );

        let clone = clone_as(&source, &model_b(), IdHandling::Preserve).unwrap();
        assert_eq!(clone.field("CustomerId"), Some(&ModelValue::Uuid(customer)));
    }

    #[test]
    fn test_null_list_stays_null() {
        let source = ModelInstance::new("modelBInput").with_field("Items", ModelValue::Null);
        let clone = clone_as(&source, &model_b(), IdHandling::Preserve).unwrap();
        assert_eq!(clone.field("Items"), Some(&ModelValue::Null));
    }

    #[test]
    fn test_list_is_cloned_item_by_item() {
        let item = ModelInstance::new("orderItemInput")
            .with_field("Id", ModelValue::String(GlobalId::encode("OrderItem", 3)))
            .with_field("Quantity", ModelValue::Int(2));
        let source = ModelInstance::new("modelBInput")
            .with_field("Items", ModelValue::List(vec![ModelValue::Object(item)]));

        let clone = clone_as(&source, &model_b(), IdHandling::Preserve).unwrap();
        let ModelValue::List(items) = clone.field("Items").unwrap() else {
            panic!("expected a list");
        };
        let cloned = items[0].as_instance().unwrap();
        assert_eq!(cloned.type_name(), "OrderItem");
        assert_eq!(cloned.field("Id"), Some(&ModelValue::Int(3)));
        assert_eq!(cloned.field("Quantity"), Some(&ModelValue::Int(2)));
    }

    #[test]
    fn test_unknown_members_are_skipped() {
        let source =
            ModelInstance::new("modelBInput").with_field("Ghost", ModelValue::String("x".into()));
        let clone = clone_as(&source, &model_b(), IdHandling::Preserve).unwrap();
        assert!(clone.field("Ghost").is_none());
    }

    #[test]
    fn test_read_only_members_are_skipped() {
        let target = ModelType::new("Report")
            .with_member("Id", MemberType::Int)
            .with_read_only_member("Total", MemberType::Int);
        let source = ModelInstance::new("reportInput")
            .with_field("Id", ModelValue::String(GlobalId::encode("Report", 1)))
            .with_field("Total", ModelValue::Int(9));

        let clone = clone_as(&source, &target, IdHandling::Preserve).unwrap();
        assert!(clone.field("Total").is_none());
        assert_eq!(clone.field("Id"), Some(&ModelValue::Int(1)));
    }
}
