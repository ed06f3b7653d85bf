//! Global identification of entities.
//!
//! Every node in the graph carries an opaque id that is unique across all
//! entity types. The id is the base64 encoding of `<EntityName>#<LocalId>`,
//! where the local id is the entity's native id (a 32-bit integer or a UUID).
//! Encoding is deterministic; the entity name must not contain `#`.

use std::fmt;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::Serialize;
use uuid::Uuid;

use crate::error::CoreError;

/// The native id kinds the codec can decode into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IdKind {
    /// 32-bit integer ids.
    Int,
    /// UUID ids.
    Uuid,
}

impl fmt::Display for IdKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int => write!(f, "Int"),
            Self::Uuid => write!(f, "Uuid"),
        }
    }
}

/// A decoded native id value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LocalId {
    /// 32-bit integer id.
    Int(i32),
    /// UUID id.
    Uuid(Uuid),
}

impl LocalId {
    /// Returns the kind of this id value.
    #[must_use]
    pub fn kind(&self) -> IdKind {
        match self {
            Self::Int(_) => IdKind::Int,
            Self::Uuid(_) => IdKind::Uuid,
        }
    }

    /// The zero/default value for an id kind, used as the lenient fallback
    /// when a foreign-key id fails to decode.
    #[must_use]
    pub fn zero(kind: IdKind) -> Self {
        match kind {
            IdKind::Int => Self::Int(0),
            IdKind::Uuid => Self::Uuid(Uuid::nil()),
        }
    }
}

impl fmt::Display for LocalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(value) => write!(f, "{value}"),
            Self::Uuid(value) => write!(f, "{value}"),
        }
    }
}

impl Serialize for LocalId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

impl From<i32> for LocalId {
    fn from(value: i32) -> Self {
        Self::Int(value)
    }
}

impl From<Uuid> for LocalId {
    fn from(value: Uuid) -> Self {
        Self::Uuid(value)
    }
}

/// Codec for protocol-unique opaque ids.
pub struct GlobalId;

impl GlobalId {
    /// Encodes an entity name and a local id into an opaque global id.
    ///
    /// The entity name must not contain `#`; the local id is rendered
    /// through its `Display` form.
    pub fn encode(entity_name: &str, id: impl fmt::Display) -> String {
        STANDARD.encode(format!("{entity_name}#{id}"))
    }

    /// Decodes an opaque global id into its entity name and local id text.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Decode`] on malformed base64, non-UTF-8 payloads
    /// or a missing `#` separator.
    pub fn decompose(global_id: &str) -> Result<(String, String), CoreError> {
        let bytes = STANDARD
            .decode(global_id)
            .map_err(|e| CoreError::decode(format!("{global_id}: {e}")))?;
        let decoded = String::from_utf8(bytes)
            .map_err(|_| CoreError::decode(format!("{global_id}: payload is not UTF-8")))?;

        let (entity_name, id) = decoded
            .split_once('#')
            .ok_or_else(|| CoreError::decode(format!("{global_id}: missing separator")))?;

        Ok((entity_name.to_string(), id.to_string()))
    }

    /// Returns the entity name half of a global id.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Decode`] when the id cannot be decomposed.
    pub fn to_entity_name(global_id: &str) -> Result<String, CoreError> {
        Ok(Self::decompose(global_id)?.0)
    }

    /// Decodes a global id and parses its local id half as the given kind.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Decode`] when the id cannot be decomposed or the
    /// local id text does not parse as the requested kind.
    pub fn to_local_id(global_id: &str, kind: IdKind) -> Result<LocalId, CoreError> {
        let (_, id) = Self::decompose(global_id)?;

        match kind {
            IdKind::Int => id
                .parse::<i32>()
                .map(LocalId::Int)
                .map_err(|_| CoreError::decode(format!("{id} is not a 32-bit integer id"))),
            IdKind::Uuid => Uuid::parse_str(&id)
                .map(LocalId::Uuid)
                .map_err(|_| CoreError::decode(format!("{id} is not a UUID id"))),
        }
    }
}
