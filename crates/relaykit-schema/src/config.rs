//! Schema configuration.
//!
//! Configuration can be specified in the host's TOML configuration under a
//! `[schema]` section.
//!
//! # Example Configuration
//!
//! ```toml
//! [schema]
//! query_type_name = "Query"
//! mutation_type_name = "Mutation"
//! default_auth_required = true
//! ```

use serde::{Deserialize, Serialize};

use crate::error::SchemaError;

/// Schema assembly configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemaConfig {
    /// Name of the query root type.
    /// Default: "Query"
    #[serde(default = "default_query_type_name")]
    pub query_type_name: String,

    /// Name of the mutation root type.
    /// Default: "Mutation"
    #[serde(default = "default_mutation_type_name")]
    pub mutation_type_name: String,

    /// Whether fields that enable the authentication check without an
    /// explicit requirement demand an authenticated user.
    /// Default: true
    #[serde(default = "default_auth_required")]
    pub default_auth_required: bool,
}

fn default_query_type_name() -> String {
    "Query".to_string()
}

fn default_mutation_type_name() -> String {
    "Mutation".to_string()
}

fn default_auth_required() -> bool {
    true
}

impl Default for SchemaConfig {
    fn default() -> Self {
        Self {
            query_type_name: default_query_type_name(),
            mutation_type_name: default_mutation_type_name(),
            default_auth_required: default_auth_required(),
        }
    }
}

impl SchemaConfig {
    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration values are invalid.
    pub fn validate(&self) -> Result<(), SchemaError> {
        for (label, name) in [
            ("query_type_name", &self.query_type_name),
            ("mutation_type_name", &self.mutation_type_name),
        ] {
            if name.is_empty() {
                return Err(SchemaError::Configuration(format!(
                    "{label} must not be empty"
                )));
            }
            if !name.chars().next().is_some_and(char::is_alphabetic)
                || !name.chars().all(|c| c.is_alphanumeric() || c == '_')
            {
                return Err(SchemaError::Configuration(format!(
                    "{label} is not a valid type name: {name}"
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SchemaConfig::default();
        assert_eq!(config.query_type_name, "Query");
        assert_eq!(config.mutation_type_name, "Mutation");
        assert!(config.default_auth_required);
        config.validate().unwrap();
    }

    #[test]
    fn test_parses_partial_toml() {
        let config: SchemaConfig = toml::from_str("query_type_name = \"Root\"").unwrap();
        assert_eq!(config.query_type_name, "Root");
        assert_eq!(config.mutation_type_name, "Mutation");
    }

    #[test]
    fn test_rejects_invalid_type_names() {
        let config = SchemaConfig {
            query_type_name: "9lives".to_string(),
            ..SchemaConfig::default()
        };
        assert!(config.validate().is_err());

        let config = SchemaConfig {
            mutation_type_name: String::new(),
            ..SchemaConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
