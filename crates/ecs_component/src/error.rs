//! Precondition violations raised by the entity pool and component stores.

use crate::entity::Entity;

/// Misuse of the entity or component API.
///
/// None of these are transient: each one means the host application broke a
/// contract. They are reported before any state is mutated.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EcsError {
    /// Every handle in the pool is already live.
    #[error("entity limit reached: {max} entities are already alive")]
    EntityLimitReached {
        /// The pool capacity.
        max: usize,
    },

    /// The handle lies outside the pool.
    #[error("{entity} is out of range (capacity {max})")]
    EntityOutOfRange {
        /// The offending handle.
        entity: Entity,
        /// The pool capacity.
        max: usize,
    },

    /// The handle is in range but not currently alive.
    #[error("{0} is not alive")]
    EntityNotAlive(Entity),

    /// The component type was used before `register_type`.
    #[error("component '{0}' was not registered before use")]
    ComponentNotRegistered(&'static str),

    /// The component type was registered twice.
    #[error("component '{0}' is already registered")]
    ComponentAlreadyRegistered(&'static str),

    /// No bit position is left in the signature.
    #[error("component limit reached: {max} component types are already registered")]
    ComponentLimitReached {
        /// The number of available bit positions.
        max: usize,
    },

    /// Attach is not an upsert.
    #[error("{entity} already has a '{component}' component")]
    DuplicateComponent {
        /// The entity that already holds the component.
        entity: Entity,
        /// The component type name.
        component: &'static str,
    },

    /// The entity holds no value in this store.
    #[error("{entity} has no '{component}' component")]
    MissingComponent {
        /// The entity that was queried.
        entity: Entity,
        /// The component type name.
        component: &'static str,
    },

    /// A store holds one slot per possible entity and cannot grow past it.
    #[error("store for '{component}' is full ({capacity} slots)")]
    StoreFull {
        /// The component type name.
        component: &'static str,
        /// The number of slots in the store.
        capacity: usize,
    },
}
