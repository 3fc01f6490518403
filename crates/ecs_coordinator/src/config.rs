//! Coordinator configuration.

use ecs_component::{MAX_COMPONENTS, MAX_ENTITIES};
use serde::{Deserialize, Serialize};

use crate::error::CoordinatorError;

/// The environment variable overriding [`CoordinatorConfig::max_entities`].
pub const MAX_ENTITIES_ENV: &str = "ECS_MAX_ENTITIES";

/// The environment variable overriding
/// [`CoordinatorConfig::max_component_types`].
pub const MAX_COMPONENT_TYPES_ENV: &str = "ECS_MAX_COMPONENT_TYPES";

/// Per-coordinator ceilings. Both may only lower the compile-time limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoordinatorConfig {
    /// Number of entity handles in the pool (at most [`MAX_ENTITIES`]).
    pub max_entities: usize,
    /// Number of component types that may be registered (at most
    /// [`MAX_COMPONENTS`]).
    pub max_component_types: usize,
}

impl CoordinatorConfig {
    /// Create a config using the compile-time limits.
    #[must_use]
    pub fn new() -> Self {
        Self {
            max_entities: MAX_ENTITIES,
            max_component_types: MAX_COMPONENTS,
        }
    }

    /// Override the entity ceiling.
    #[must_use]
    pub fn with_max_entities(mut self, max_entities: usize) -> Self {
        self.max_entities = max_entities;
        self
    }

    /// Override the component type ceiling.
    #[must_use]
    pub fn with_max_component_types(mut self, max_component_types: usize) -> Self {
        self.max_component_types = max_component_types;
        self
    }

    /// Build a config from `ECS_MAX_ENTITIES` and `ECS_MAX_COMPONENT_TYPES`,
    /// falling back to the compile-time limits for unset variables.
    ///
    /// # Errors
    ///
    /// Returns [`CoordinatorError::InvalidConfig`] if a variable is not a
    /// number or the result fails [`CoordinatorConfig::validate`].
    pub fn from_env() -> Result<Self, CoordinatorError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Like [`CoordinatorConfig::from_env`], reading variables through
    /// `lookup`.
    ///
    /// # Errors
    ///
    /// Same as [`CoordinatorConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, CoordinatorError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let parse = |key: &str, fallback: usize| -> Result<usize, CoordinatorError> {
            match lookup(key) {
                Some(raw) => raw.trim().parse().map_err(|_| {
                    CoordinatorError::InvalidConfig(format!("{key}={raw:?} is not a number"))
                }),
                None => Ok(fallback),
            }
        };

        let config = Self {
            max_entities: parse(MAX_ENTITIES_ENV, MAX_ENTITIES)?,
            max_component_types: parse(MAX_COMPONENT_TYPES_ENV, MAX_COMPONENTS)?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Check both ceilings are non-zero and within the compile-time limits.
    ///
    /// # Errors
    ///
    /// Returns [`CoordinatorError::InvalidConfig`] naming the bad field.
    pub fn validate(&self) -> Result<(), CoordinatorError> {
        if self.max_entities == 0 || self.max_entities > MAX_ENTITIES {
            return Err(CoordinatorError::InvalidConfig(format!(
                "max_entities must be in 1..={MAX_ENTITIES}, got {}",
                self.max_entities
            )));
        }
        if self.max_component_types == 0 || self.max_component_types > MAX_COMPONENTS {
            return Err(CoordinatorError::InvalidConfig(format!(
                "max_component_types must be in 1..={MAX_COMPONENTS}, got {}",
                self.max_component_types
            )));
        }
        Ok(())
    }
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self::new()
    }
}
