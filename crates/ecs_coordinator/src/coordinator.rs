//! The single entry point of the ECS runtime.
//!
//! The [`Coordinator`] exclusively owns the entity pool, the component
//! manager, and the system registry, and sequences every cross-manager
//! mutation so an entity's signature agrees with its stored components and
//! its system memberships after each call.
//!
//! ## Mutation Order
//!
//! - attach / detach: component store → entity signature → system
//!   membership. A store error aborts before the signature is touched.
//! - destroy: entity pool (signature cleared, handle freed) → every
//!   component store → every system working set.

use std::collections::BTreeSet;

use ecs_component::{
    Component, ComponentManager, ComponentType, Entity, EntityManager, Signature,
};
use ecs_system::{System, SystemRegistry};
use tracing::{debug, warn};

use crate::config::CoordinatorConfig;
use crate::error::CoordinatorError;

/// Log a precondition violation before handing it back to the caller.
fn report<T>(op: &'static str, result: Result<T, CoordinatorError>) -> Result<T, CoordinatorError> {
    result.inspect_err(|err| warn!(op, %err, "precondition violated"))
}

/// Facade over the entity, component, and system managers.
#[derive(Debug)]
pub struct Coordinator {
    config: CoordinatorConfig,
    entities: EntityManager,
    components: ComponentManager,
    systems: SystemRegistry,
}

impl Coordinator {
    /// Create a coordinator using the compile-time limits.
    #[must_use]
    pub fn new() -> Self {
        let config = CoordinatorConfig::default();
        Self {
            config,
            entities: EntityManager::with_capacity(config.max_entities),
            components: ComponentManager::with_limits(
                config.max_component_types,
                config.max_entities,
            ),
            systems: SystemRegistry::new(),
        }
    }

    /// Create a coordinator with lowered ceilings.
    ///
    /// # Errors
    ///
    /// Returns [`CoordinatorError::InvalidConfig`] if `config` fails
    /// validation.
    pub fn with_config(config: CoordinatorConfig) -> Result<Self, CoordinatorError> {
        config.validate()?;
        debug!(
            max_entities = config.max_entities,
            max_component_types = config.max_component_types,
            "coordinator configured"
        );
        Ok(Self {
            config,
            entities: EntityManager::with_capacity(config.max_entities),
            components: ComponentManager::with_limits(
                config.max_component_types,
                config.max_entities,
            ),
            systems: SystemRegistry::new(),
        })
    }

    /// Returns the active configuration.
    #[must_use]
    pub fn config(&self) -> &CoordinatorConfig {
        &self.config
    }

    // -- Entities --

    /// Take a fresh entity with an empty signature.
    ///
    /// Systems with an empty requirement pick the entity up immediately.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::EntityLimitReached`](ecs_component::EcsError) if
    /// every handle is alive.
    pub fn create_entity(&mut self) -> Result<Entity, CoordinatorError> {
        let entity = report("create_entity", self.entities.create_entity().map_err(Into::into))?;
        self.systems
            .handle_entity_signature_changed(entity, Signature::EMPTY);
        Ok(entity)
    }

    /// Destroy `entity`, dropping all of its components and memberships.
    ///
    /// # Errors
    ///
    /// Returns an error if `entity` is out of range or not alive; nothing is
    /// modified in that case.
    pub fn destroy_entity(&mut self, entity: Entity) -> Result<(), CoordinatorError> {
        report(
            "destroy_entity",
            self.entities.destroy_entity(entity).map_err(Into::into),
        )?;
        self.components.notify_entity_destroyed(entity);
        self.systems.notify_entity_destroyed(entity);
        Ok(())
    }

    /// Returns `true` if `entity` is alive.
    #[must_use]
    pub fn is_alive(&self, entity: Entity) -> bool {
        self.entities.is_alive(entity)
    }

    /// Returns the number of live entities.
    #[must_use]
    pub fn living_count(&self) -> usize {
        self.entities.living_count()
    }

    /// Returns `entity`'s current signature.
    ///
    /// # Errors
    ///
    /// Returns an error if `entity` is out of range.
    pub fn signature(&self, entity: Entity) -> Result<Signature, CoordinatorError> {
        Ok(self.entities.signature(entity)?)
    }

    // -- Components --

    /// Register component type `T`.
    ///
    /// # Errors
    ///
    /// Returns an error if `T` is already registered or no bit position is
    /// left.
    pub fn register_component<T: Component>(&mut self) -> Result<ComponentType, CoordinatorError> {
        report(
            "register_component",
            self.components.register_type::<T>().map_err(Into::into),
        )
    }

    /// Returns the bit position assigned to `T`.
    ///
    /// # Errors
    ///
    /// Returns an error if `T` is not registered.
    pub fn component_type<T: Component>(&self) -> Result<ComponentType, CoordinatorError> {
        Ok(self.components.component_type::<T>()?)
    }

    /// Attach `value` to `entity` and update its system memberships.
    ///
    /// # Errors
    ///
    /// Returns an error if `entity` is not alive, `T` is not registered, or
    /// `entity` already has a `T`. State is unchanged on error.
    pub fn attach<T: Component>(&mut self, entity: Entity, value: T) -> Result<(), CoordinatorError> {
        report("attach", self.try_attach(entity, value))
    }

    fn try_attach<T: Component>(&mut self, entity: Entity, value: T) -> Result<(), CoordinatorError> {
        self.entities.check_alive(entity)?;
        let ty = self.components.component_type::<T>()?;
        self.components.attach(entity, value)?;

        let signature = self.entities.signature(entity)?.with(ty);
        self.entities.set_signature(entity, signature)?;
        self.systems.handle_entity_signature_changed(entity, signature);
        debug!(
            entity = entity.id(),
            component = T::type_name(),
            %signature,
            "component attached"
        );
        Ok(())
    }

    /// Detach and return `entity`'s `T`, updating its system memberships.
    ///
    /// # Errors
    ///
    /// Returns an error if `entity` is not alive, `T` is not registered, or
    /// `entity` has no `T`. State is unchanged on error.
    pub fn detach<T: Component>(&mut self, entity: Entity) -> Result<T, CoordinatorError> {
        report("detach", self.try_detach(entity))
    }

    fn try_detach<T: Component>(&mut self, entity: Entity) -> Result<T, CoordinatorError> {
        self.entities.check_alive(entity)?;
        let ty = self.components.component_type::<T>()?;
        let value = self.components.detach::<T>(entity)?;

        let signature = self.entities.signature(entity)?.without(ty);
        self.entities.set_signature(entity, signature)?;
        self.systems.handle_entity_signature_changed(entity, signature);
        debug!(
            entity = entity.id(),
            component = T::type_name(),
            %signature,
            "component detached"
        );
        Ok(value)
    }

    /// Returns `entity`'s `T`.
    ///
    /// # Errors
    ///
    /// Returns an error if `T` is not registered or `entity` has no `T`.
    pub fn get<T: Component>(&self, entity: Entity) -> Result<&T, CoordinatorError> {
        Ok(self.components.get::<T>(entity)?)
    }

    /// Returns `entity`'s `T` mutably.
    ///
    /// # Errors
    ///
    /// Returns an error if `T` is not registered or `entity` has no `T`.
    pub fn get_mut<T: Component>(&mut self, entity: Entity) -> Result<&mut T, CoordinatorError> {
        Ok(self.components.get_mut::<T>(entity)?)
    }

    /// Returns `true` if `entity` holds a `T`.
    #[must_use]
    pub fn has<T: Component>(&self, entity: Entity) -> bool {
        self.components.has::<T>(entity)
    }

    /// Read-only access to the component manager.
    ///
    /// Mutations that change an entity's component set go through
    /// [`Coordinator::attach`] and [`Coordinator::detach`].
    #[must_use]
    pub fn components(&self) -> &ComponentManager {
        &self.components
    }

    // -- Systems --

    /// Register `system` with an empty requirement, so it matches every live
    /// entity.
    ///
    /// # Errors
    ///
    /// Returns an error if `S` is already registered.
    pub fn register_system<S: System>(&mut self, system: S) -> Result<&mut S, CoordinatorError> {
        self.register_system_with_signature(system, Signature::EMPTY)
    }

    /// Register `system` with `required` and seed its working set from the
    /// live entities.
    ///
    /// # Errors
    ///
    /// Returns an error if `S` is already registered.
    pub fn register_system_with_signature<S: System>(
        &mut self,
        system: S,
        required: Signature,
    ) -> Result<&mut S, CoordinatorError> {
        report(
            "register_system",
            self.systems
                .register(system, required)
                .map(|_| ())
                .map_err(Into::into),
        )?;
        self.systems.refresh::<S, _>(self.entities.living())?;
        Ok(self.systems.get_mut::<S>()?)
    }

    /// Replace `S`'s requirement and rebuild its working set from the live
    /// entities.
    ///
    /// # Errors
    ///
    /// Returns an error if `S` is not registered.
    pub fn set_system_signature<S: System>(&mut self, required: Signature) -> Result<(), CoordinatorError> {
        report(
            "set_system_signature",
            self.systems.set_signature::<S>(required).map_err(Into::into),
        )?;
        self.systems.refresh::<S, _>(self.entities.living())?;
        Ok(())
    }

    /// Returns `S`'s working set.
    ///
    /// # Errors
    ///
    /// Returns an error if `S` is not registered.
    pub fn system_entities<S: System>(&self) -> Result<&BTreeSet<Entity>, CoordinatorError> {
        Ok(self.systems.entities::<S>()?)
    }

    /// Returns `S`'s required signature.
    ///
    /// # Errors
    ///
    /// Returns an error if `S` is not registered.
    pub fn system_signature<S: System>(&self) -> Result<Signature, CoordinatorError> {
        Ok(self.systems.signature::<S>()?)
    }

    /// Returns the `S` instance.
    ///
    /// # Errors
    ///
    /// Returns an error if `S` is not registered.
    pub fn system<S: System>(&self) -> Result<&S, CoordinatorError> {
        Ok(self.systems.get::<S>()?)
    }

    /// Returns the `S` instance mutably.
    ///
    /// # Errors
    ///
    /// Returns an error if `S` is not registered.
    pub fn system_mut<S: System>(&mut self) -> Result<&mut S, CoordinatorError> {
        Ok(self.systems.get_mut::<S>()?)
    }

    /// Run `S` once over its working set.
    ///
    /// # Errors
    ///
    /// Returns an error if `S` is not registered.
    pub fn update_system<S: System>(&mut self) -> Result<(), CoordinatorError> {
        Ok(self.systems.update::<S>(&mut self.components)?)
    }

    /// Run every system once, in registration order.
    pub fn update_systems(&mut self) {
        self.systems.update_all(&mut self.components);
    }
}

impl Default for Coordinator {
    fn default() -> Self {
        Self::new()
    }
}
