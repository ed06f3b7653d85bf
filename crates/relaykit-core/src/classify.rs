//! Type classification and mapping.
//!
//! Maps a member's declared type onto a schema type reference. The mapping is
//! pure and deterministic: repeated calls on the same shape yield
//! structurally identical references.

use crate::descriptor::{ScalarKind, SchemaTypeRef, TypeKind};
use crate::model::MemberType;

/// Classifies a member's declared type into a schema type reference.
///
/// Scalars map to their scalar kinds, enums to named enum types, nullable
/// layers unwrap and recurse, lists recurse on their item, and object
/// references become node objects when the target type has a discoverable id
/// member, plain objects otherwise.
#[must_use]
pub fn classify(ty: &MemberType) -> SchemaTypeRef {
    match ty {
        MemberType::Boolean => SchemaTypeRef::scalar(ScalarKind::Boolean),
        MemberType::Int => SchemaTypeRef::scalar(ScalarKind::Int),
        MemberType::Float | MemberType::Decimal => SchemaTypeRef::scalar(ScalarKind::Float),
        MemberType::String => SchemaTypeRef::scalar(ScalarKind::String),
        MemberType::Uuid => SchemaTypeRef::scalar(ScalarKind::Id),
        MemberType::DateTime => SchemaTypeRef::scalar(ScalarKind::DateTime),
        MemberType::Enum(model) => SchemaTypeRef::named(&model.name, TypeKind::Enum),
        MemberType::Nullable(inner) => classify(inner).nullable(),
        MemberType::List(item) => SchemaTypeRef::list(classify(item)),
        MemberType::Object(model) => {
            if model.has_id() {
                SchemaTypeRef::named(&model.name, TypeKind::NodeObject)
            } else {
                SchemaTypeRef::named(&model.name, TypeKind::Object)
            }
        }
    }
}

/// Whether a member type is simple: a scalar or enum shape, through any
/// nullable layer.
///
/// Simple members drive filter-argument and order-by synthesis on
/// connection fields.
#[must_use]
pub fn is_simple(ty: &MemberType) -> bool {
    match ty {
        MemberType::Boolean
        | MemberType::Int
        | MemberType::Float
        | MemberType::Decimal
        | MemberType::String
        | MemberType::Uuid
        | MemberType::DateTime
        | MemberType::Enum(_) => true,
        MemberType::Nullable(inner) => is_simple(inner),
        MemberType::List(_) | MemberType::Object(_) => false,
    }
}
