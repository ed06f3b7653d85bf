//! # relaykit-core
//!
//! Core building blocks for deriving Relay-style graph APIs from plain
//! domain model descriptions.
//!
//! This crate provides the leaf components the schema layer composes:
//!
//! - Global-identifier codec giving every node a protocol-unique opaque id
//! - Model descriptors and a deterministic type classifier
//! - Virtual-type synthesis with a canonical-name descriptor cache
//! - The input clone/mapping engine translating wire inputs into domain
//!   instances
//! - Cursor-connection and mutation-payload models
//!
//! ## Overview
//!
//! Domain types are described as [`ModelType`] values: a name plus the
//! members declared directly on the type. The classifier maps member shapes
//! onto schema type references, and the synthesizer derives the auxiliary
//! descriptors (input variants, additions types) a schema needs, cached
//! process-wide by canonical name. All operations are synchronous and
//! CPU-bound; per-request values (connections, payloads, parameters) are
//! owned by the resolving operation that creates them.
//!
//! ## Modules
//!
//! - [`identification`] - Opaque global id encode/decode
//! - [`model`] - Domain model descriptors
//! - [`value`] - Dynamic model instances and values
//! - [`classify`] - Member shape classification
//! - [`descriptor`] - Schema type descriptors and field metadata
//! - [`registry`] - Canonical-name descriptor cache
//! - [`synth`] - Input and additions type synthesis
//! - [`convert`] - Wire-input clone/mapping engine
//! - [`connection`] - Cursor connections and edges
//! - [`parameters`] - Paging/sorting parameter input
//! - [`payload`] - Mutation payload models
//! - [`error`] - Error types for core operations

pub mod classify;
pub mod connection;
pub mod convert;
pub mod descriptor;
pub mod error;
pub mod identification;
pub mod model;
pub mod naming;
pub mod parameters;
pub mod payload;
pub mod registry;
pub mod synth;
pub mod value;

// Re-export main types
pub use classify::{classify, is_simple};
pub use connection::{Connection, Edge, NodeIdentity, PageInfo};
pub use convert::clone_as;
pub use descriptor::{
    FieldDescriptor, FieldMetadata, ScalarKind, SchemaType, SchemaTypeRef, TypeKind,
};
pub use error::CoreError;
pub use identification::{GlobalId, IdKind, LocalId};
pub use model::{EnumModel, MemberType, ModelMember, ModelType};
pub use naming::{canonical_name, to_first_lower};
pub use parameters::{Direction, Parameters};
pub use payload::{AddPayload, DeletePayload, UpdatePayload};
pub use registry::TypeRegistry;
pub use synth::{IdHandling, InputSynthesis, additions_type, input_fields, input_type};
pub use value::{ModelInstance, ModelValue};

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
