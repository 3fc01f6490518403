//! Component type registration and type-erased store access.
//!
//! The [`ComponentManager`] assigns every registered component type a bit
//! position and owns one [`ComponentStore`] per type. Stores are held behind
//! [`ErasedStore`] so entity destruction can be forwarded to all of them
//! without knowing their element types.

use std::any::TypeId;
use std::collections::HashMap;
use std::fmt;

use tracing::debug;

use crate::component::Component;
use crate::entity::{Entity, MAX_ENTITIES};
use crate::error::EcsError;
use crate::signature::{ComponentType, MAX_COMPONENTS, Signature};
use crate::store::{ComponentStore, ErasedStore};

/// Owns every component store and the type-to-bit assignment.
pub struct ComponentManager {
    /// Rust type to assigned bit position.
    types: HashMap<TypeId, ComponentType>,
    /// Stores indexed by bit position.
    stores: Vec<Box<dyn ErasedStore>>,
    max_types: usize,
    store_capacity: usize,
}

impl ComponentManager {
    /// Create a manager accepting up to [`MAX_COMPONENTS`] types, each with
    /// room for [`MAX_ENTITIES`] values.
    #[must_use]
    pub fn new() -> Self {
        Self::with_limits(MAX_COMPONENTS, MAX_ENTITIES)
    }

    /// Create a manager with lower ceilings. Both are clamped to the global
    /// constants.
    #[must_use]
    pub fn with_limits(max_types: usize, store_capacity: usize) -> Self {
        let max_types = max_types.min(MAX_COMPONENTS);
        Self {
            types: HashMap::with_capacity(max_types),
            stores: Vec::with_capacity(max_types),
            max_types,
            store_capacity: store_capacity.min(MAX_ENTITIES),
        }
    }

    /// Register `T`, assigning it the next free bit position.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::ComponentAlreadyRegistered`] if `T` is known, or
    /// [`EcsError::ComponentLimitReached`] if no bit position is left.
    pub fn register_type<T: Component>(&mut self) -> Result<ComponentType, EcsError> {
        if self.types.contains_key(&TypeId::of::<T>()) {
            return Err(EcsError::ComponentAlreadyRegistered(T::type_name()));
        }
        let limit = EcsError::ComponentLimitReached {
            max: self.max_types,
        };
        if self.stores.len() >= self.max_types {
            return Err(limit);
        }
        let bit = u8::try_from(self.stores.len()).map_err(|_| limit.clone())?;
        let ty = ComponentType::new(bit).ok_or(limit)?;

        self.types.insert(TypeId::of::<T>(), ty);
        self.stores
            .push(Box::new(ComponentStore::<T>::with_capacity(self.store_capacity)));
        debug!(component = T::type_name(), bit, "component type registered");
        Ok(ty)
    }

    /// Returns `true` if `T` has been registered.
    #[must_use]
    pub fn is_registered<T: Component>(&self) -> bool {
        self.types.contains_key(&TypeId::of::<T>())
    }

    /// Returns the number of registered types.
    #[must_use]
    pub fn registered_count(&self) -> usize {
        self.stores.len()
    }

    /// Returns the bit position assigned to `T`.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::ComponentNotRegistered`] if `T` is unknown.
    pub fn component_type<T: Component>(&self) -> Result<ComponentType, EcsError> {
        self.types
            .get(&TypeId::of::<T>())
            .copied()
            .ok_or(EcsError::ComponentNotRegistered(T::type_name()))
    }

    /// Returns a signature with only `T`'s bit set.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::ComponentNotRegistered`] if `T` is unknown.
    pub fn signature_of<T: Component>(&self) -> Result<Signature, EcsError> {
        self.component_type::<T>().map(ComponentType::signature)
    }

    /// Returns `T`'s store.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::ComponentNotRegistered`] if `T` is unknown.
    pub fn store<T: Component>(&self) -> Result<&ComponentStore<T>, EcsError> {
        let ty = self.component_type::<T>()?;
        self.stores[usize::from(ty.bit())]
            .as_any()
            .downcast_ref::<ComponentStore<T>>()
            .ok_or(EcsError::ComponentNotRegistered(T::type_name()))
    }

    /// Returns `T`'s store mutably.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::ComponentNotRegistered`] if `T` is unknown.
    pub fn store_mut<T: Component>(&mut self) -> Result<&mut ComponentStore<T>, EcsError> {
        let ty = self.component_type::<T>()?;
        self.stores[usize::from(ty.bit())]
            .as_any_mut()
            .downcast_mut::<ComponentStore<T>>()
            .ok_or(EcsError::ComponentNotRegistered(T::type_name()))
    }

    /// Attach `value` to `entity` in `T`'s store.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::ComponentNotRegistered`] or any error of
    /// [`ComponentStore::attach`].
    pub fn attach<T: Component>(&mut self, entity: Entity, value: T) -> Result<(), EcsError> {
        self.store_mut::<T>()?.attach(entity, value)
    }

    /// Detach and return `entity`'s `T`.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::ComponentNotRegistered`] or
    /// [`EcsError::MissingComponent`].
    pub fn detach<T: Component>(&mut self, entity: Entity) -> Result<T, EcsError> {
        self.store_mut::<T>()?.detach(entity)
    }

    /// Returns `entity`'s `T`.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::ComponentNotRegistered`] or
    /// [`EcsError::MissingComponent`].
    pub fn get<T: Component>(&self, entity: Entity) -> Result<&T, EcsError> {
        self.store::<T>()?.get(entity)
    }

    /// Returns `entity`'s `T` mutably.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::ComponentNotRegistered`] or
    /// [`EcsError::MissingComponent`].
    pub fn get_mut<T: Component>(&mut self, entity: Entity) -> Result<&mut T, EcsError> {
        self.store_mut::<T>()?.get_mut(entity)
    }

    /// Returns `true` if `entity` holds a `T`. Unregistered types hold
    /// nothing.
    #[must_use]
    pub fn has<T: Component>(&self, entity: Entity) -> bool {
        self.store::<T>().is_ok_and(|store| store.contains(entity))
    }

    /// Drop `entity`'s value from every store that has one.
    pub fn notify_entity_destroyed(&mut self, entity: Entity) {
        for store in &mut self.stores {
            store.notify_entity_destroyed(entity);
        }
    }
}

impl Default for ComponentManager {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ComponentManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentManager")
            .field(
                "stores",
                &self
                    .stores
                    .iter()
                    .map(|store| store.component_name())
                    .collect::<Vec<_>>(),
            )
            .field("max_types", &self.max_types)
            .field("store_capacity", &self.store_capacity)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq)]
    struct Position {
        x: f32,
        y: f32,
    }
    impl Component for Position {
        fn type_name() -> &'static str {
            "Position"
        }
    }

    #[derive(Debug, Clone, Copy, PartialEq)]
    struct Velocity {
        dx: f32,
        dy: f32,
    }
    impl Component for Velocity {
        fn type_name() -> &'static str {
            "Velocity"
        }
    }

    /// One distinct component type per `N`.
    struct Slot<const N: usize>;
    impl<const N: usize> Component for Slot<N> {}

    fn e(id: u32) -> Entity {
        Entity::from_raw(id)
    }

    #[test]
    fn test_bit_positions_are_monotonic() {
        let mut manager = ComponentManager::new();
        let p = manager.register_type::<Position>().unwrap();
        let v = manager.register_type::<Velocity>().unwrap();
        assert_eq!(p.bit(), 0);
        assert_eq!(v.bit(), 1);
        assert_eq!(manager.component_type::<Velocity>(), Ok(v));
        assert_eq!(manager.signature_of::<Velocity>().unwrap().bits(), 0b10);
        assert_eq!(manager.registered_count(), 2);
    }

    #[test]
    fn test_duplicate_registration() {
        let mut manager = ComponentManager::new();
        manager.register_type::<Position>().unwrap();
        assert_eq!(
            manager.register_type::<Position>(),
            Err(EcsError::ComponentAlreadyRegistered("Position"))
        );
        assert_eq!(manager.registered_count(), 1);
    }

    #[test]
    fn test_unregistered_type_errors() {
        let mut manager = ComponentManager::new();
        let err = EcsError::ComponentNotRegistered("Position");
        assert_eq!(manager.component_type::<Position>(), Err(err.clone()));
        assert_eq!(
            manager.attach(e(0), Position { x: 0.0, y: 0.0 }),
            Err(err.clone())
        );
        assert_eq!(manager.detach::<Position>(e(0)), Err(err.clone()));
        assert_eq!(manager.get::<Position>(e(0)).err(), Some(err));
        assert!(!manager.has::<Position>(e(0)));
    }

    #[test]
    fn test_typed_operations_reach_the_right_store() {
        let mut manager = ComponentManager::new();
        manager.register_type::<Position>().unwrap();
        manager.register_type::<Velocity>().unwrap();

        manager.attach(e(1), Position { x: 1.0, y: 2.0 }).unwrap();
        manager.attach(e(1), Velocity { dx: 3.0, dy: 4.0 }).unwrap();
        manager.get_mut::<Velocity>(e(1)).unwrap().dx = 5.0;

        assert_eq!(manager.get::<Position>(e(1)).unwrap().y, 2.0);
        assert_eq!(manager.get::<Velocity>(e(1)).unwrap().dx, 5.0);
        assert_eq!(manager.store::<Position>().unwrap().len(), 1);

        assert_eq!(
            manager.detach::<Velocity>(e(1)).unwrap(),
            Velocity { dx: 5.0, dy: 4.0 }
        );
        assert!(!manager.has::<Velocity>(e(1)));
        assert!(manager.has::<Position>(e(1)));
    }

    #[test]
    fn test_notify_destroyed_purges_every_store() {
        let mut manager = ComponentManager::new();
        manager.register_type::<Position>().unwrap();
        manager.register_type::<Velocity>().unwrap();

        manager.attach(e(0), Position { x: 0.0, y: 0.0 }).unwrap();
        manager.attach(e(0), Velocity { dx: 0.0, dy: 0.0 }).unwrap();
        manager.attach(e(1), Position { x: 1.0, y: 1.0 }).unwrap();

        manager.notify_entity_destroyed(e(0));

        assert!(!manager.has::<Position>(e(0)));
        assert!(!manager.has::<Velocity>(e(0)));
        assert!(manager.store::<Velocity>().unwrap().is_empty());
        assert_eq!(manager.store::<Position>().unwrap().entities(), &[e(1)]);
    }

    macro_rules! register_slots {
        ($manager:expr, $($n:literal)*) => {
            $( $manager.register_type::<Slot<$n>>().unwrap(); )*
        };
    }

    #[test]
    fn test_component_ceiling() {
        let mut manager = ComponentManager::new();
        register_slots!(manager,
            0 1 2 3 4 5 6 7 8 9 10 11 12 13 14 15
            16 17 18 19 20 21 22 23 24 25 26 27 28 29 30 31);
        assert_eq!(manager.registered_count(), MAX_COMPONENTS);
        assert_eq!(
            manager.component_type::<Slot<31>>().unwrap().bit(),
            (MAX_COMPONENTS - 1) as u8
        );
        assert_eq!(
            manager.register_type::<Position>(),
            Err(EcsError::ComponentLimitReached {
                max: MAX_COMPONENTS
            })
        );
        assert!(!manager.is_registered::<Position>());
    }

    #[test]
    fn test_lower_configured_ceiling() {
        let mut manager = ComponentManager::with_limits(1, 16);
        manager.register_type::<Position>().unwrap();
        assert_eq!(
            manager.register_type::<Velocity>(),
            Err(EcsError::ComponentLimitReached { max: 1 })
        );
        assert_eq!(manager.store::<Position>().unwrap().capacity(), 16);
    }
}
