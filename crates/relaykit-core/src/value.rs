//! Dynamic model values.
//!
//! Wire inputs and domain objects are both carried as [`ModelInstance`]
//! values: an ordered field map keyed by the declared member name. The
//! clone/mapping engine translates between the two shapes, and resolvers
//! return [`ModelValue`]s for the host executor to serialize.

use indexmap::IndexMap;
use serde::{Serialize, Serializer};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use uuid::Uuid;

use crate::error::CoreError;
use crate::identification::{GlobalId, LocalId};
use crate::naming::to_first_lower;

/// A dynamic value held by a model instance field.
#[derive(Debug, Clone, PartialEq)]
pub enum ModelValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    Uuid(Uuid),
    DateTime(OffsetDateTime),
    List(Vec<ModelValue>),
    Object(ModelInstance),
}

impl ModelValue {
    /// Returns the contained string, if this is a string value.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(value) => Some(value),
            _ => None,
        }
    }

    /// Returns the contained instance, if this is an object value.
    #[must_use]
    pub fn as_instance(&self) -> Option<&ModelInstance> {
        match self {
            Self::Object(instance) => Some(instance),
            _ => None,
        }
    }

    /// Returns the contained integer, if this is an integer value.
    #[must_use]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(value) => Some(*value),
            _ => None,
        }
    }

    /// A short name for the value's shape, used in mismatch errors.
    #[must_use]
    pub fn shape_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "boolean",
            Self::Int(_) => "integer",
            Self::Float(_) => "float",
            Self::String(_) => "string",
            Self::Uuid(_) => "uuid",
            Self::DateTime(_) => "datetime",
            Self::List(_) => "list",
            Self::Object(_) => "object",
        }
    }
}

impl From<LocalId> for ModelValue {
    fn from(id: LocalId) -> Self {
        match id {
            LocalId::Int(value) => Self::Int(i64::from(value)),
            LocalId::Uuid(value) => Self::Uuid(value),
        }
    }
}

impl Serialize for ModelValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Self::Null => serializer.serialize_none(),
            Self::Bool(value) => serializer.serialize_bool(*value),
            Self::Int(value) => serializer.serialize_i64(*value),
            Self::Float(value) => serializer.serialize_f64(*value),
            Self::String(value) => serializer.serialize_str(value),
            Self::Uuid(value) => serializer.collect_str(value),
            Self::DateTime(value) => {
                let text = value.format(&Rfc3339).map_err(serde::ser::Error::custom)?;
                serializer.serialize_str(&text)
            }
            Self::List(items) => serializer.collect_seq(items),
            Self::Object(instance) => instance.serialize(serializer),
        }
    }
}

/// A dynamic instance of a model type.
///
/// Fields are keyed by the declared member name and keep insertion order.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelInstance {
    type_name: String,
    fields: IndexMap<String, ModelValue>,
}

impl ModelInstance {
    /// Creates an empty instance of the named type.
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            fields: IndexMap::new(),
        }
    }

    /// The name of the type this instance belongs to.
    #[must_use]
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Sets a field value.
    pub fn set_field(&mut self, name: impl Into<String>, value: ModelValue) {
        self.fields.insert(name.into(), value);
    }

    /// Builder-style variant of [`Self::set_field`].
    #[must_use]
    pub fn with_field(mut self, name: impl Into<String>, value: ModelValue) -> Self {
        self.set_field(name, value);
        self
    }

    /// Looks up a field value by declared member name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&ModelValue> {
        self.fields.get(name)
    }

    /// Looks up a string field value.
    #[must_use]
    pub fn string_field(&self, name: &str) -> Option<&str> {
        self.field(name).and_then(ModelValue::as_str)
    }

    /// Iterates over the fields in insertion order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &ModelValue)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Finds the instance's id member value by the id discovery rule:
    /// a field literally named `Id`, else `<TypeName>Id`.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::MissingIdProperty`] when neither field exists, or
    /// [`CoreError::TypeMismatch`] when the value is not an id shape.
    pub fn local_id(&self) -> Result<LocalId, CoreError> {
        let (name, value) = self
            .field("Id")
            .map(|value| ("Id".to_string(), value))
            .or_else(|| {
                let name = format!("{}Id", self.type_name);
                self.field(&name).map(|value| (name, value))
            })
            .ok_or_else(|| CoreError::missing_id_property(&self.type_name))?;

        match value {
            ModelValue::Int(id) => {
                i32::try_from(*id)
                    .map(LocalId::Int)
                    .map_err(|_| CoreError::TypeMismatch {
                        type_name: self.type_name.clone(),
                        member: name.clone(),
                        expected: "a 32-bit integer id".to_string(),
                        actual: "integer".to_string(),
                    })
            }
            ModelValue::Uuid(id) => Ok(LocalId::Uuid(*id)),
            other => Err(CoreError::TypeMismatch {
                type_name: self.type_name.clone(),
                member: name,
                expected: "an id value".to_string(),
                actual: other.shape_name().to_string(),
            }),
        }
    }

    /// The instance's protocol-unique global id.
    ///
    /// # Errors
    ///
    /// Propagates the id discovery errors of [`Self::local_id`].
    pub fn global_id(&self) -> Result<String, CoreError> {
        Ok(GlobalId::encode(&self.type_name, self.local_id()?))
    }
}

impl Serialize for ModelInstance {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_map(
            self.fields
                .iter()
                .map(|(name, value)| (to_first_lower(name), value)),
        )
    }
}
