//! Coordinator error types.

use ecs_component::EcsError;
use ecs_system::SystemError;

/// Any precondition violation reported through the coordinator.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoordinatorError {
    /// Entity or component misuse.
    #[error(transparent)]
    Component(#[from] EcsError),

    /// System misuse.
    #[error(transparent)]
    System(#[from] SystemError),

    /// A configured ceiling is zero, above its hard limit, or unparsable.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}
