//! Schema type descriptors.
//!
//! Schema types are plain data: a name, a kind, and field descriptors. No
//! nominal types are generated at runtime; derived shapes become descriptors
//! cached by canonical name, which preserves the idempotent-sharing property
//! without dynamic class generation.

use std::collections::BTreeSet;

use crate::identification::IdKind;

/// The scalar kinds the schema surface knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarKind {
    Boolean,
    Int,
    Float,
    String,
    /// Opaque or native id scalar.
    Id,
    DateTime,
}

impl ScalarKind {
    /// The scalar's schema-surface name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Boolean => "Boolean",
            Self::Int => "Int",
            Self::Float => "Float",
            Self::String => "String",
            Self::Id => "ID",
            Self::DateTime => "DateTime",
        }
    }
}

/// The kind of a schema type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeKind {
    Scalar(ScalarKind),
    Enum,
    Object,
    /// An object exposing a global identifier through the `Node` capability.
    NodeObject,
    Input,
    List,
    Connection,
}

/// A reference to a schema type: its name and kind, plus nullability and,
/// for lists, the item reference.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaTypeRef {
    pub name: String,
    pub kind: TypeKind,
    pub nullable: bool,
    /// Item reference for list types.
    pub item: Option<Box<SchemaTypeRef>>,
}

impl SchemaTypeRef {
    /// A non-null scalar reference.
    #[must_use]
    pub fn scalar(kind: ScalarKind) -> Self {
        Self {
            name: kind.name().to_string(),
            kind: TypeKind::Scalar(kind),
            nullable: false,
            item: None,
        }
    }

    /// A non-null reference to a named type.
    pub fn named(name: impl Into<String>, kind: TypeKind) -> Self {
        Self {
            name: name.into(),
            kind,
            nullable: false,
            item: None,
        }
    }

    /// A list reference wrapping an item reference.
    #[must_use]
    pub fn list(item: SchemaTypeRef) -> Self {
        Self {
            name: format!("[{}]", item.name),
            kind: TypeKind::List,
            nullable: false,
            item: Some(Box::new(item)),
        }
    }

    /// Marks the reference nullable.
    #[must_use]
    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    /// The innermost named reference: unwraps list layers.
    #[must_use]
    pub fn innermost(&self) -> &SchemaTypeRef {
        match &self.item {
            Some(item) => item.innermost(),
            None => self,
        }
    }
}

/// Per-field authentication/authorization metadata.
///
/// This is the explicit side-table attached to produced fields at assembly
/// time; the validation pass only ever reads it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldMetadata {
    /// Whether the authentication check is turned on for this field at all.
    pub auth_check_enabled: bool,
    /// Whether an authenticated user is required.
    pub auth_required: bool,
    /// Roles the user must all carry to access the field.
    pub required_roles: BTreeSet<String>,
}

impl Default for FieldMetadata {
    fn default() -> Self {
        Self {
            auth_check_enabled: false,
            auth_required: true,
            required_roles: BTreeSet::new(),
        }
    }
}

impl FieldMetadata {
    /// Metadata with the authentication check enabled and the given
    /// requirement.
    #[must_use]
    pub fn with_authentication(auth_required: bool) -> Self {
        Self {
            auth_check_enabled: true,
            auth_required,
            required_roles: BTreeSet::new(),
        }
    }

    /// Adds required roles.
    #[must_use]
    pub fn with_roles(mut self, roles: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.required_roles.extend(roles.into_iter().map(Into::into));
        self
    }

    /// Whether any roles are required.
    #[must_use]
    pub fn requires_roles(&self) -> bool {
        !self.required_roles.is_empty()
    }

    /// Whether the given user roles satisfy the requirements.
    #[must_use]
    pub fn can_access<'a>(&self, user_roles: impl IntoIterator<Item = &'a str> + Clone) -> bool {
        self.required_roles
            .iter()
            .all(|required| user_roles.clone().into_iter().any(|role| role == required.as_str()))
    }
}

/// A field on a schema type.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDescriptor {
    /// The schema-surface field name (first character lowered).
    pub name: String,
    /// The field's result type.
    pub type_ref: SchemaTypeRef,
    /// Authentication/authorization metadata.
    pub metadata: FieldMetadata,
}

impl FieldDescriptor {
    /// Creates a field with default metadata.
    pub fn new(name: impl Into<String>, type_ref: SchemaTypeRef) -> Self {
        Self {
            name: name.into(),
            type_ref,
            metadata: FieldMetadata::default(),
        }
    }
}

/// A schema type descriptor: name, kind and fields.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaType {
    /// The schema-surface type name.
    pub name: String,
    pub kind: TypeKind,
    pub fields: Vec<FieldDescriptor>,
    /// Enum values, for `TypeKind::Enum` descriptors.
    pub values: Vec<String>,
    /// For input descriptors: the native kind of the origin id member,
    /// recorded for later decoding. `None` when the id member was omitted or
    /// its kind is not decodable.
    pub id_origin: Option<IdKind>,
}

impl SchemaType {
    /// Creates a descriptor without fields.
    pub fn new(name: impl Into<String>, kind: TypeKind) -> Self {
        Self {
            name: name.into(),
            kind,
            fields: Vec::new(),
            values: Vec::new(),
            id_origin: None,
        }
    }

    /// Adds a field.
    #[must_use]
    pub fn with_field(mut self, field: FieldDescriptor) -> Self {
        self.fields.push(field);
        self
    }

    /// Looks up a field by schema-surface name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }
}
