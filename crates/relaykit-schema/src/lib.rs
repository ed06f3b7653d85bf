//! # relaykit-schema
//!
//! Relay-style schema assembly on top of `relaykit-core`.
//!
//! This crate composes the core building blocks into concrete schema
//! surfaces. It supports:
//!
//! - Object, node, connection, input, payload, enumeration and order-by
//!   type synthesis from model descriptions
//! - A convention field binder turning declared container members into
//!   schema fields wired to caller-supplied resolver functions
//! - A query-validation pass enforcing per-field authentication and role
//!   requirements before resolution
//!
//! ## Overview
//!
//! The host describes its domain as model types, binds its business
//! functions through [`ViewerBinder`] and [`MutationBinder`], and assembles
//! a [`Schema`]. Query execution stays external: the schema exposes bound
//! resolvers and type descriptors, and [`AuthorizationValidator`] walks a
//! parsed query document before the host resolves it.
//!
//! ## Modules
//!
//! - [`config`] - Configuration options
//! - [`context`] - User and resolve contexts
//! - [`fields`] - Bound field and root type definitions
//! - [`types`] - Schema type synthesis
//! - [`binder`] - Convention field binder
//! - [`schema`] - Schema assembly
//! - [`validation`] - Authorization query validation
//! - [`error`] - Error types for schema operations

pub mod binder;
pub mod config;
pub mod context;
pub mod error;
pub mod fields;
pub mod schema;
pub mod types;
pub mod validation;

// Re-export main types
pub use binder::{
    BindingKind, ConnectionFn, DeleteFn, FieldByIdFn, FieldShape, ListFn, MemberBinding,
    MutationBinder, MutationFn, PlainFieldFn, ViewerBinder,
};
pub use config::SchemaConfig;
pub use context::{ResolveContext, UserContext};
pub use error::SchemaError;
pub use fields::{Argument, FieldDefinition, ObjectTypeDef, Resolver, ResolverResult};
pub use schema::{Schema, SchemaBuilder, TypeLookup};
pub use validation::{AuthorizationValidator, ValidationCode, ValidationError};

/// Result type for schema operations.
pub type Result<T> = std::result::Result<T, SchemaError>;
