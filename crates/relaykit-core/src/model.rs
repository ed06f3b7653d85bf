//! Domain model descriptors.
//!
//! A [`ModelType`] describes the shape of a plain domain class: its name and
//! the members declared directly on it. Inherited members are never listed,
//! which keeps input models that extend domain models free of duplicate-name
//! conflicts. Descriptors are plain data; the classifier and synthesizer
//! derive schema types from them without any runtime introspection.

use std::sync::Arc;

use crate::error::CoreError;
use crate::identification::IdKind;

/// Describes an enum declared on a domain model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumModel {
    /// The enum's type name.
    pub name: String,
    /// The enum's values, in declaration order.
    pub values: Vec<String>,
}

impl EnumModel {
    /// Creates an enum model from a name and its values.
    pub fn new(name: impl Into<String>, values: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            name: name.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }
}

/// The declared type of a model member.
#[derive(Debug, Clone, PartialEq)]
pub enum MemberType {
    Boolean,
    Int,
    Float,
    Decimal,
    String,
    Uuid,
    DateTime,
    Enum(Arc<EnumModel>),
    /// An optional value; unwrapped and recursed by the classifier.
    Nullable(Box<MemberType>),
    /// An ordered collection of items.
    List(Box<MemberType>),
    /// A reference to another model type.
    Object(Arc<ModelType>),
}

impl MemberType {
    /// Unwraps a `Nullable` layer, if any.
    #[must_use]
    pub fn unwrap_nullable(&self) -> &MemberType {
        match self {
            Self::Nullable(inner) => inner.unwrap_nullable(),
            other => other,
        }
    }

    /// Returns the id kind this member type corresponds to, if it is one.
    #[must_use]
    pub fn id_kind(&self) -> Option<IdKind> {
        match self.unwrap_nullable() {
            Self::Int => Some(IdKind::Int),
            Self::Uuid => Some(IdKind::Uuid),
            _ => None,
        }
    }
}

/// A member declared directly on a model type.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelMember {
    /// The declared member name, e.g. `Id` or `CustomerOrders`.
    pub name: String,
    /// The member's declared type.
    pub ty: MemberType,
    /// Read-only members are skipped as clone/mapping destinations.
    pub read_only: bool,
}

/// Describes the shape of a domain model type.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelType {
    /// The type's name, e.g. `Order`.
    pub name: String,
    /// The members declared directly on the type.
    pub members: Vec<ModelMember>,
}

impl ModelType {
    /// Creates an empty model type with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            members: Vec::new(),
        }
    }

    /// Adds a member.
    #[must_use]
    pub fn with_member(mut self, name: impl Into<String>, ty: MemberType) -> Self {
        self.members.push(ModelMember {
            name: name.into(),
            ty,
            read_only: false,
        });
        self
    }

    /// Adds a read-only member.
    #[must_use]
    pub fn with_read_only_member(mut self, name: impl Into<String>, ty: MemberType) -> Self {
        self.members.push(ModelMember {
            name: name.into(),
            ty,
            read_only: true,
        });
        self
    }

    /// Looks up a declared member by name.
    #[must_use]
    pub fn member(&self, name: &str) -> Option<&ModelMember> {
        self.members.iter().find(|m| m.name == name)
    }

    /// The name of the id member: a member literally named `Id`, else
    /// `<TypeName>Id`.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::MissingIdProperty`] when neither exists.
    pub fn id_member_name(&self) -> Result<&str, CoreError> {
        Ok(&self.id_member()?.name)
    }

    /// The id member itself.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::MissingIdProperty`] when the type has no id
    /// member.
    pub fn id_member(&self) -> Result<&ModelMember, CoreError> {
        if let Some(member) = self.member("Id") {
            return Ok(member);
        }
        if let Some(member) = self.member(&format!("{}Id", self.name)) {
            return Ok(member);
        }
        Err(CoreError::missing_id_property(&self.name))
    }

    /// Whether the type has a discoverable id member.
    #[must_use]
    pub fn has_id(&self) -> bool {
        self.id_member().is_ok()
    }

    /// The native id kind of the id member.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::MissingIdProperty`] without an id member, or
    /// [`CoreError::UnsupportedIdType`] when the id member's type is not a
    /// supported id kind.
    pub fn id_kind(&self) -> Result<IdKind, CoreError> {
        let member = self.id_member()?;
        member
            .ty
            .id_kind()
            .ok_or_else(|| CoreError::unsupported_id_type(format!("{:?}", member.ty)))
    }

    /// Whether a member name designates this type's id member.
    #[must_use]
    pub fn is_id_member_name(&self, name: &str) -> bool {
        name == "Id" || name == format!("{}Id", self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_member_named_id() {
        let model = ModelType::new("Order")
            .with_member("Id", MemberType::Uuid)
            .with_member("Name", MemberType::String);
        assert_eq!(model.id_member_name().unwrap(), "Id");
        assert_eq!(model.id_kind().unwrap(), IdKind::Uuid);
    }

    #[test]
    fn test_id_member_named_type_name_id() {
        let model = ModelType::new("Order").with_member("OrderId", MemberType::Int);
        assert_eq!(model.id_member_name().unwrap(), "OrderId");
        assert_eq!(model.id_kind().unwrap(), IdKind::Int);
    }

    #[test]
    fn test_missing_id_member() {
        let model = ModelType::new("Order").with_member("Name", MemberType::String);
        assert!(!model.has_id());
        assert!(matches!(
            model.id_member_name(),
            Err(CoreError::MissingIdProperty { .. })
        ));
    }

    #[test]
    fn test_nullable_id_kind() {
        let nullable = MemberType::Nullable(Box::new(MemberType::Int));
        assert_eq!(nullable.id_kind(), Some(IdKind::Int));
        assert_eq!(MemberType::String.id_kind(), None);
    }

    #[test]
    fn test_unsupported_id_kind() {
        let model = ModelType::new("Order").with_member("Id", MemberType::String);
        assert!(matches!(
            model.id_kind(),
            Err(CoreError::UnsupportedIdType(_))
        ));
    }
}
