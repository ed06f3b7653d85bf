use thiserror::Error;

/// Core error types for relaykit operations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A global id could not be decoded (malformed base64, non-UTF-8 payload
    /// or missing `#` separator).
    #[error("Invalid global id: {0}")]
    Decode(String),

    /// An id was requested as a native type that the codec does not support.
    #[error("The type {0} as an id type is not supported")]
    UnsupportedIdType(String),

    /// A model type has no member named `Id` or `<TypeName>Id`.
    #[error("Could not find any id member on {type_name}")]
    MissingIdProperty { type_name: String },

    /// Two structurally different type descriptors were registered under the
    /// same canonical name.
    #[error("A different type is already registered under the name {name}")]
    NameCollision { name: String },

    /// A member value does not match the shape its descriptor declares.
    #[error("The {member} member of {type_name} is of type {actual} and cannot be used as {expected}")]
    TypeMismatch {
        type_name: String,
        member: String,
        expected: String,
        actual: String,
    },
}

impl CoreError {
    /// Create a new Decode error.
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode(message.into())
    }

    /// Create a new UnsupportedIdType error.
    pub fn unsupported_id_type(requested: impl Into<String>) -> Self {
        Self::UnsupportedIdType(requested.into())
    }

    /// Create a new MissingIdProperty error.
    pub fn missing_id_property(type_name: impl Into<String>) -> Self {
        Self::MissingIdProperty {
            type_name: type_name.into(),
        }
    }

    /// Create a new NameCollision error.
    pub fn name_collision(name: impl Into<String>) -> Self {
        Self::NameCollision { name: name.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        assert_eq!(
            CoreError::decode("bad payload").to_string(),
            "Invalid global id: bad payload"
        );
        assert_eq!(
            CoreError::missing_id_property("Order").to_string(),
            "Could not find any id member on Order"
        );
        assert_eq!(
            CoreError::unsupported_id_type("i128").to_string(),
            "The type i128 as an id type is not supported"
        );
    }
}
