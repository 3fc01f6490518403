//! System registry: owns system instances and their working sets.
//!
//! Each registered system has a required [`Signature`] and the set of
//! entities whose signature contains it. Membership is only recomputed per
//! entity, when the coordinator reports a signature change.

use std::any::{Any, TypeId};
use std::collections::{BTreeSet, HashMap};
use std::fmt;

use ecs_component::{ComponentManager, Components, Entity, Signature};
use tracing::{debug, trace};

use crate::error::SystemError;
use crate::system::System;

/// Object-safe downcasting for stored systems.
trait AnySystem: System {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<S: System> AnySystem for S {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// One registered system.
struct SystemEntry {
    name: &'static str,
    /// Component types an entity must hold to be in `entities`.
    required: Signature,
    /// The working set.
    entities: BTreeSet<Entity>,
    system: Box<dyn AnySystem>,
}

impl SystemEntry {
    /// Insert or remove `entity` depending on whether it matches.
    fn evaluate(&mut self, entity: Entity, signature: Signature) {
        if signature.contains_all(self.required) {
            if self.entities.insert(entity) {
                trace!(system = self.name, entity = entity.id(), "entity joined");
            }
        } else if self.entities.remove(&entity) {
            trace!(system = self.name, entity = entity.id(), "entity left");
        }
    }
}

/// Registry of all systems, iterated in registration order.
#[derive(Default)]
pub struct SystemRegistry {
    entries: Vec<SystemEntry>,
    by_type: HashMap<TypeId, usize>,
}

impl SystemRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            by_type: HashMap::new(),
        }
    }

    /// Register `system` with the given required signature and return it.
    ///
    /// The working set starts empty.
    ///
    /// # Errors
    ///
    /// Returns [`SystemError::SystemAlreadyRegistered`] if `S` is known.
    pub fn register<S: System>(
        &mut self,
        system: S,
        required: Signature,
    ) -> Result<&mut S, SystemError> {
        let name = system.name();
        if self.by_type.contains_key(&TypeId::of::<S>()) {
            return Err(SystemError::SystemAlreadyRegistered(name));
        }

        let index = self.entries.len();
        self.entries.push(SystemEntry {
            name,
            required,
            entities: BTreeSet::new(),
            system: Box::new(system),
        });
        self.by_type.insert(TypeId::of::<S>(), index);
        debug!(system = name, %required, "system registered");

        self.entries[index]
            .system
            .as_any_mut()
            .downcast_mut::<S>()
            .ok_or(SystemError::SystemNotRegistered(name))
    }

    /// Overwrite `S`'s required signature.
    ///
    /// Existing membership is left as is until each entity's next signature
    /// change.
    ///
    /// # Errors
    ///
    /// Returns [`SystemError::SystemNotRegistered`] if `S` is unknown.
    pub fn set_signature<S: System>(&mut self, required: Signature) -> Result<(), SystemError> {
        let entry = self.entry_mut::<S>()?;
        entry.required = required;
        debug!(system = entry.name, %required, "system signature set");
        Ok(())
    }

    /// Returns `S`'s required signature.
    ///
    /// # Errors
    ///
    /// Returns [`SystemError::SystemNotRegistered`] if `S` is unknown.
    pub fn signature<S: System>(&self) -> Result<Signature, SystemError> {
        Ok(self.entry::<S>()?.required)
    }

    /// Returns `S`'s working set.
    ///
    /// # Errors
    ///
    /// Returns [`SystemError::SystemNotRegistered`] if `S` is unknown.
    pub fn entities<S: System>(&self) -> Result<&BTreeSet<Entity>, SystemError> {
        Ok(&self.entry::<S>()?.entities)
    }

    /// Returns the `S` instance.
    ///
    /// # Errors
    ///
    /// Returns [`SystemError::SystemNotRegistered`] if `S` is unknown.
    pub fn get<S: System>(&self) -> Result<&S, SystemError> {
        self.entry::<S>()?
            .system
            .as_any()
            .downcast_ref::<S>()
            .ok_or(SystemError::SystemNotRegistered(std::any::type_name::<S>()))
    }

    /// Returns the `S` instance mutably.
    ///
    /// # Errors
    ///
    /// Returns [`SystemError::SystemNotRegistered`] if `S` is unknown.
    pub fn get_mut<S: System>(&mut self) -> Result<&mut S, SystemError> {
        self.entry_mut::<S>()?
            .system
            .as_any_mut()
            .downcast_mut::<S>()
            .ok_or(SystemError::SystemNotRegistered(std::any::type_name::<S>()))
    }

    /// Returns `true` if `S` has been registered.
    #[must_use]
    pub fn is_registered<S: System>(&self) -> bool {
        self.by_type.contains_key(&TypeId::of::<S>())
    }

    /// Returns the number of registered systems.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no system is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the registered system names ([`System::name`]) in
    /// registration order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|entry| entry.name)
    }

    /// Re-evaluate `entity` against every system.
    ///
    /// The entity ends up in exactly the working sets whose required
    /// signature is contained in `signature`.
    pub fn handle_entity_signature_changed(&mut self, entity: Entity, signature: Signature) {
        for entry in &mut self.entries {
            entry.evaluate(entity, signature);
        }
    }

    /// Remove `entity` from every working set.
    pub fn notify_entity_destroyed(&mut self, entity: Entity) {
        for entry in &mut self.entries {
            entry.entities.remove(&entity);
        }
    }

    /// Rebuild `S`'s working set from scratch.
    ///
    /// `living` must yield every live entity with its current signature.
    ///
    /// # Errors
    ///
    /// Returns [`SystemError::SystemNotRegistered`] if `S` is unknown.
    pub fn refresh<S, I>(&mut self, living: I) -> Result<(), SystemError>
    where
        S: System,
        I: IntoIterator<Item = (Entity, Signature)>,
    {
        let entry = self.entry_mut::<S>()?;
        let required = entry.required;
        entry.entities = living
            .into_iter()
            .filter(|(_, signature)| signature.contains_all(required))
            .map(|(entity, _)| entity)
            .collect();
        debug!(
            system = entry.name,
            members = entry.entities.len(),
            "working set rebuilt"
        );
        Ok(())
    }

    /// Run `S` once over its working set.
    ///
    /// # Errors
    ///
    /// Returns [`SystemError::SystemNotRegistered`] if `S` is unknown.
    pub fn update<S: System>(&mut self, components: &mut ComponentManager) -> Result<(), SystemError> {
        let SystemEntry {
            system, entities, ..
        } = self.entry_mut::<S>()?;
        system.update(entities, &mut Components::new(components));
        Ok(())
    }

    /// Run every system once, in registration order.
    pub fn update_all(&mut self, components: &mut ComponentManager) {
        for SystemEntry {
            name,
            system,
            entities,
            ..
        } in &mut self.entries
        {
            trace!(system = *name, members = entities.len(), "updating system");
            system.update(entities, &mut Components::new(components));
        }
    }

    fn entry<S: System>(&self) -> Result<&SystemEntry, SystemError> {
        self.by_type
            .get(&TypeId::of::<S>())
            .map(|&index| &self.entries[index])
            .ok_or(SystemError::SystemNotRegistered(std::any::type_name::<S>()))
    }

    fn entry_mut<S: System>(&mut self) -> Result<&mut SystemEntry, SystemError> {
        let index = *self
            .by_type
            .get(&TypeId::of::<S>())
            .ok_or(SystemError::SystemNotRegistered(std::any::type_name::<S>()))?;
        Ok(&mut self.entries[index])
    }
}

impl fmt::Debug for SystemRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.entries.iter().map(|entry| {
                (entry.name, entry.required.bits(), entry.entities.len())
            }))
            .finish()
    }
}
