//! # ecs_coordinator
//!
//! The facade consumers use to drive the ECS runtime. A [`Coordinator`]
//! owns the entity pool, the component manager, and the system registry, and
//! keeps them consistent: after every call, each system's working set is
//! exactly the set of live entities whose signature contains the system's
//! requirement.
//!
//! ## Usage
//!
//! ```rust
//! use std::collections::BTreeSet;
//!
//! use ecs_coordinator::{Component, Components, Coordinator, Entity, System};
//!
//! #[derive(Debug, Clone, Copy)]
//! struct Position { x: f32, y: f32 }
//! impl Component for Position {}
//!
//! #[derive(Debug, Clone, Copy)]
//! struct Velocity { dx: f32, dy: f32 }
//! impl Component for Velocity {}
//!
//! struct Movement;
//! impl System for Movement {
//!     fn update(&mut self, entities: &BTreeSet<Entity>, components: &mut Components<'_>) {
//!         for &entity in entities {
//!             let velocity = *components.get::<Velocity>(entity).unwrap();
//!             let position = components.get_mut::<Position>(entity).unwrap();
//!             position.x += velocity.dx;
//!             position.y += velocity.dy;
//!         }
//!     }
//! }
//!
//! # fn main() -> Result<(), ecs_coordinator::CoordinatorError> {
//! let mut coordinator = Coordinator::new();
//! let position = coordinator.register_component::<Position>()?;
//! let velocity = coordinator.register_component::<Velocity>()?;
//! coordinator.register_system_with_signature(
//!     Movement,
//!     position.signature() | velocity.signature(),
//! )?;
//!
//! let e = coordinator.create_entity()?;
//! coordinator.attach(e, Position { x: 0.0, y: 0.0 })?;
//! coordinator.attach(e, Velocity { dx: 1.0, dy: 0.5 })?;
//! coordinator.update_systems();
//!
//! assert_eq!(coordinator.get::<Position>(e)?.x, 1.0);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod coordinator;
pub mod error;

pub use config::CoordinatorConfig;
pub use coordinator::Coordinator;
pub use error::CoordinatorError;

pub use ecs_component::{
    Component, ComponentManager, ComponentType, Components, EcsError, Entity, MAX_COMPONENTS,
    MAX_ENTITIES, Signature,
};
pub use ecs_system::{System, SystemError};
