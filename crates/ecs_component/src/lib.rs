//! # ecs_component
//!
//! The "E" and "C" of the ECS runtime: entity handles, component signatures,
//! and densely packed component storage.
//!
//! This crate provides:
//!
//! - [`Entity`] and [`EntityManager`]: recyclable handles from a FIFO pool,
//!   each with its own [`Signature`].
//! - [`Signature`] and [`ComponentType`]: fixed-width component bitsets.
//! - [`Component`]: the marker trait for component data.
//! - [`ComponentStore`]: a packed array with O(1) swap-remove.
//! - [`ComponentManager`]: type registration and type-erased store access.
//! - [`Components`]: the value-only view systems receive.
//! - [`EcsError`]: the precondition violations all of the above report.

pub mod component;
pub mod entity;
pub mod error;
pub mod manager;
pub mod signature;
pub mod store;
pub mod view;

pub use component::Component;
pub use entity::{Entity, EntityManager, MAX_ENTITIES};
pub use error::EcsError;
pub use manager::ComponentManager;
pub use signature::{ComponentType, MAX_COMPONENTS, Signature, SignatureBits};
pub use store::{ComponentStore, ErasedStore};
pub use view::Components;
