use thiserror::Error;

use relaykit_core::CoreError;

/// Errors raised while assembling a schema or resolving its fields.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// A container member's function value does not belong to its declared
    /// binding kind.
    #[error("The member {member} does not match its declared {kind} binding")]
    AmbiguousMemberShape { member: String, kind: String },

    /// Two container members produce the same field name.
    #[error("Duplicate member name: {0}")]
    DuplicateMember(String),

    /// Two structurally different types share one schema name.
    #[error("A different type named {0} is already part of the schema")]
    NameCollision(String),

    /// A resolver was invoked without a required argument.
    #[error("Missing required argument: {0}")]
    MissingArgument(String),

    /// An argument value has the wrong shape.
    #[error("Invalid argument {name}: {message}")]
    InvalidArgument { name: String, message: String },

    /// Invalid configuration values.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A caller-supplied business function failed.
    #[error("Resolver error: {0}")]
    Resolver(String),

    /// A core operation failed.
    #[error(transparent)]
    Core(#[from] CoreError),
}

impl SchemaError {
    /// Create a new AmbiguousMemberShape error.
    pub fn ambiguous_member(member: impl Into<String>, kind: impl Into<String>) -> Self {
        Self::AmbiguousMemberShape {
            member: member.into(),
            kind: kind.into(),
        }
    }

    /// Create a new MissingArgument error.
    pub fn missing_argument(name: impl Into<String>) -> Self {
        Self::MissingArgument(name.into())
    }

    /// Create a new InvalidArgument error.
    pub fn invalid_argument(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Create a new Resolver error.
    pub fn resolver(message: impl Into<String>) -> Self {
        Self::Resolver(message.into())
    }
}
