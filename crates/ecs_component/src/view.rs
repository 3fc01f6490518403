//! The component access handed to systems.
//!
//! A [`Components`] view can read and modify component values but cannot
//! change which components an entity holds. Attaching and detaching stay
//! with the owner of the [`ComponentManager`], which keeps signatures in
//! step.
//!
//! ```compile_fail
//! use ecs_component::{Component, ComponentManager, Components, Entity};
//!
//! struct Velocity(f32);
//! impl Component for Velocity {}
//!
//! let mut manager = ComponentManager::new();
//! let mut view = Components::new(&mut manager);
//! view.detach::<Velocity>(Entity::from_raw(0));
//! ```

use crate::component::Component;
use crate::entity::Entity;
use crate::error::EcsError;
use crate::manager::ComponentManager;
use crate::signature::ComponentType;
use crate::store::ComponentStore;

/// Value-level access to every component store.
#[derive(Debug)]
pub struct Components<'a> {
    manager: &'a mut ComponentManager,
}

impl<'a> Components<'a> {
    /// Wrap `manager` for the duration of one system update.
    pub fn new(manager: &'a mut ComponentManager) -> Self {
        Self { manager }
    }

    /// Returns `entity`'s `T`.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::ComponentNotRegistered`] or
    /// [`EcsError::MissingComponent`].
    pub fn get<T: Component>(&self, entity: Entity) -> Result<&T, EcsError> {
        self.manager.get::<T>(entity)
    }

    /// Returns `entity`'s `T` mutably.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::ComponentNotRegistered`] or
    /// [`EcsError::MissingComponent`].
    pub fn get_mut<T: Component>(&mut self, entity: Entity) -> Result<&mut T, EcsError> {
        self.manager.get_mut::<T>(entity)
    }

    /// Returns `true` if `entity` holds a `T`.
    #[must_use]
    pub fn has<T: Component>(&self, entity: Entity) -> bool {
        self.manager.has::<T>(entity)
    }

    /// Returns the bit position assigned to `T`.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::ComponentNotRegistered`] if `T` is unknown.
    pub fn component_type<T: Component>(&self) -> Result<ComponentType, EcsError> {
        self.manager.component_type::<T>()
    }

    /// Returns `T`'s store, read-only.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::ComponentNotRegistered`] if `T` is unknown.
    pub fn store<T: Component>(&self) -> Result<&ComponentStore<T>, EcsError> {
        self.manager.store::<T>()
    }
}
