//! Execution context.
//!
//! The host supplies a [`UserContext`] per request; resolvers receive a
//! [`ResolveContext`] carrying the user plus the resolved argument values of
//! the field being executed.

use std::collections::BTreeSet;

use indexmap::IndexMap;

use relaykit_core::{ModelInstance, ModelValue};

use crate::error::SchemaError;

/// The caller identity of a request, as established by the host.
///
/// Consumed by the authorization validation pass and available to resolvers
/// to deliver user-specific data.
#[derive(Debug, Clone, Default)]
pub struct UserContext {
    /// Whether the current user is authenticated.
    pub is_authenticated: bool,

    /// The id of the current user, if authenticated.
    pub user_id: Option<String>,

    /// The name of the current user.
    pub user_name: String,

    /// The role names of the current user.
    pub roles: BTreeSet<String>,
}

impl UserContext {
    /// An unauthenticated user context.
    #[must_use]
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// An authenticated user context.
    pub fn authenticated(
        user_id: impl Into<String>,
        user_name: impl Into<String>,
        roles: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            is_authenticated: true,
            user_id: Some(user_id.into()),
            user_name: user_name.into(),
            roles: roles.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns `true` if the user has a specific role.
    #[must_use]
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.contains(role)
    }

    /// Returns `true` if the user has every one of the given roles.
    pub fn has_all_roles<'a>(&self, roles: impl IntoIterator<Item = &'a str>) -> bool {
        roles.into_iter().all(|role| self.has_role(role))
    }
}

/// Per-field execution context handed to resolvers.
///
/// Constructed by the host executor for every resolved field; owns the
/// field's argument values for the duration of the call.
#[derive(Debug, Clone)]
pub struct ResolveContext {
    /// The caller identity of the request.
    pub user: UserContext,

    /// Request id for tracing and correlation.
    pub request_id: Option<String>,

    arguments: IndexMap<String, ModelValue>,
}

impl ResolveContext {
    /// Creates a context for the given user with no arguments.
    #[must_use]
    pub fn new(user: UserContext) -> Self {
        Self {
            user,
            request_id: None,
            arguments: IndexMap::new(),
        }
    }

    /// Attaches a request id.
    #[must_use]
    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = Some(request_id.into());
        self
    }

    /// Adds an argument value.
    #[must_use]
    pub fn with_argument(mut self, name: impl Into<String>, value: ModelValue) -> Self {
        self.arguments.insert(name.into(), value);
        self
    }

    /// Looks up an argument value.
    #[must_use]
    pub fn argument(&self, name: &str) -> Option<&ModelValue> {
        self.arguments.get(name)
    }

    /// Looks up a string argument.
    #[must_use]
    pub fn string_argument(&self, name: &str) -> Option<&str> {
        self.argument(name).and_then(ModelValue::as_str)
    }

    /// Looks up an integer argument, narrowed to `i32`.
    #[must_use]
    pub fn int_argument(&self, name: &str) -> Option<i32> {
        self.argument(name)
            .and_then(ModelValue::as_int)
            .and_then(|value| i32::try_from(value).ok())
    }

    /// Looks up an object argument, failing when it is missing or not an
    /// object.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::MissingArgument`] or
    /// [`SchemaError::InvalidArgument`].
    pub fn instance_argument(&self, name: &str) -> Result<&ModelInstance, SchemaError> {
        let value = self
            .argument(name)
            .ok_or_else(|| SchemaError::missing_argument(name))?;
        value
            .as_instance()
            .ok_or_else(|| SchemaError::invalid_argument(name, "expected an input object"))
    }
}
