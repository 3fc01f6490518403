//! Densely packed per-type component storage.
//!
//! A [`ComponentStore`] keeps every value of one component type in a single
//! contiguous array with no holes. Two inverse maps, entity to slot and slot
//! to entity, let an arbitrary entity's value be removed in O(1) by moving
//! the last value into the freed slot.

use std::any::Any;
use std::collections::HashMap;

use crate::component::Component;
use crate::entity::{Entity, MAX_ENTITIES};
use crate::error::EcsError;

/// The type-erased face of a [`ComponentStore`].
///
/// The component manager holds heterogeneous stores behind this trait. Only
/// entity destruction is dispatched dynamically; typed access goes through a
/// checked downcast.
pub trait ErasedStore: Any {
    /// Drop the entity's value if it has one. A no-op otherwise.
    fn notify_entity_destroyed(&mut self, entity: Entity);

    /// The stored component's type name.
    fn component_name(&self) -> &'static str;

    /// Upcast for downcasting to the concrete store.
    fn as_any(&self) -> &dyn Any;

    /// Upcast for downcasting to the concrete store.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// Dense storage for all values of component type `T`.
#[derive(Debug)]
pub struct ComponentStore<T: Component> {
    /// Packed values. `values[i]` belongs to `index_to_entity[i]`.
    values: Vec<T>,
    /// Slot to owning entity, parallel to `values`.
    index_to_entity: Vec<Entity>,
    /// Owning entity to slot.
    entity_to_index: HashMap<Entity, usize>,
    capacity: usize,
}

impl<T: Component> ComponentStore<T> {
    /// Create an empty store with one slot per possible entity.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(MAX_ENTITIES)
    }

    /// Create an empty store holding at most `capacity` values.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            values: Vec::with_capacity(capacity),
            index_to_entity: Vec::with_capacity(capacity),
            entity_to_index: HashMap::with_capacity(capacity),
            capacity,
        }
    }

    /// Append `value` for `entity` at the end of the packed array.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::DuplicateComponent`] if the entity already has a
    /// value here, or [`EcsError::StoreFull`] if every slot is used.
    pub fn attach(&mut self, entity: Entity, value: T) -> Result<(), EcsError> {
        if self.entity_to_index.contains_key(&entity) {
            return Err(EcsError::DuplicateComponent {
                entity,
                component: T::type_name(),
            });
        }
        if self.values.len() == self.capacity {
            return Err(EcsError::StoreFull {
                component: T::type_name(),
                capacity: self.capacity,
            });
        }

        let index = self.values.len();
        self.values.push(value);
        self.index_to_entity.push(entity);
        self.entity_to_index.insert(entity, index);
        Ok(())
    }

    /// Remove and return the entity's value.
    ///
    /// The last value is moved into the freed slot so the array stays packed.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::MissingComponent`] if the entity has no value here.
    pub fn detach(&mut self, entity: Entity) -> Result<T, EcsError> {
        let index = self
            .entity_to_index
            .remove(&entity)
            .ok_or(EcsError::MissingComponent {
                entity,
                component: T::type_name(),
            })?;

        let removed = self.values.swap_remove(index);
        self.index_to_entity.swap_remove(index);

        // When the removed slot was the last one nothing moved.
        if let Some(&moved) = self.index_to_entity.get(index) {
            self.entity_to_index.insert(moved, index);
            debug_assert_eq!(self.entity_to_index.get(&moved), Some(&index));
        }
        debug_assert_eq!(self.entity_to_index.len(), self.values.len());

        Ok(removed)
    }

    /// Returns the entity's value.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::MissingComponent`] if the entity has no value here.
    pub fn get(&self, entity: Entity) -> Result<&T, EcsError> {
        let index = self.index_of(entity)?;
        Ok(&self.values[index])
    }

    /// Returns the entity's value mutably.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::MissingComponent`] if the entity has no value here.
    pub fn get_mut(&mut self, entity: Entity) -> Result<&mut T, EcsError> {
        let index = self.index_of(entity)?;
        Ok(&mut self.values[index])
    }

    /// Returns `true` if the entity has a value here.
    #[must_use]
    pub fn contains(&self, entity: Entity) -> bool {
        self.entity_to_index.contains_key(&entity)
    }

    /// Returns the number of stored values.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if no values are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Returns the maximum number of values.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// The packed values, in slot order.
    #[must_use]
    pub fn values(&self) -> &[T] {
        &self.values
    }

    /// The owning entities, in slot order.
    #[must_use]
    pub fn entities(&self) -> &[Entity] {
        &self.index_to_entity
    }

    /// Iterate over `(entity, value)` pairs in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (Entity, &T)> {
        self.index_to_entity.iter().copied().zip(self.values.iter())
    }

    /// Iterate mutably over `(entity, value)` pairs in slot order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Entity, &mut T)> {
        self.index_to_entity
            .iter()
            .copied()
            .zip(self.values.iter_mut())
    }

    /// Checks that the two maps are exact inverses over the packed range.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        self.values.len() == self.index_to_entity.len()
            && self.entity_to_index.len() == self.index_to_entity.len()
            && self
                .index_to_entity
                .iter()
                .enumerate()
                .all(|(index, entity)| self.entity_to_index.get(entity) == Some(&index))
    }

    fn index_of(&self, entity: Entity) -> Result<usize, EcsError> {
        self.entity_to_index
            .get(&entity)
            .copied()
            .ok_or(EcsError::MissingComponent {
                entity,
                component: T::type_name(),
            })
    }
}

impl<T: Component> Default for ComponentStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Component> ErasedStore for ComponentStore<T> {
    fn notify_entity_destroyed(&mut self, entity: Entity) {
        if self.contains(entity) {
            // Presence was just checked, so detach cannot fail.
            let _ = self.detach(entity);
        }
    }

    fn component_name(&self) -> &'static str {
        T::type_name()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
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

    fn pos(v: f32) -> Position {
        Position { x: v, y: -v }
    }

    struct Tag;
    impl Component for Tag {}

    fn e(id: u32) -> Entity {
        Entity::from_raw(id)
    }

    #[test]
    fn test_attach_then_get() {
        let mut store = ComponentStore::<Position>::new();
        store.attach(e(7), pos(1.0)).unwrap();
        assert_eq!(*store.get(e(7)).unwrap(), pos(1.0));
        assert_eq!(store.len(), 1);
        assert!(store.contains(e(7)));
    }

    #[test]
    fn test_attach_is_not_an_upsert() {
        let mut store = ComponentStore::<Position>::new();
        store.attach(e(1), pos(1.0)).unwrap();
        assert_eq!(
            store.attach(e(1), pos(2.0)),
            Err(EcsError::DuplicateComponent {
                entity: e(1),
                component: "Position"
            })
        );
        assert_eq!(*store.get(e(1)).unwrap(), pos(1.0));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_detach_moves_last_into_hole() {
        let mut store = ComponentStore::<Position>::new();
        for id in 0..4 {
            store.attach(e(id), pos(id as f32)).unwrap();
        }

        assert_eq!(store.detach(e(1)).unwrap(), pos(1.0));

        assert_eq!(store.entities(), &[e(0), e(3), e(2)]);
        assert_eq!(store.values(), &[pos(0.0), pos(3.0), pos(2.0)]);
        assert_eq!(*store.get(e(3)).unwrap(), pos(3.0));
        assert!(store.is_consistent());
    }

    #[test]
    fn test_detach_keeps_maps_inverse_under_churn() {
        let mut store = ComponentStore::<Position>::with_capacity(64);
        for id in 0..64 {
            store.attach(e(id), pos(id as f32)).unwrap();
        }
        // Remove from the front, the back, and the middle in turn.
        for id in [0, 63, 31, 1, 62, 32, 2, 61] {
            assert_eq!(store.detach(e(id)).unwrap(), pos(id as f32));
            assert!(store.is_consistent());
        }
        assert_eq!(store.len(), 56);
        for id in [3, 30, 33, 60] {
            assert_eq!(*store.get(e(id)).unwrap(), pos(id as f32));
        }
    }

    #[test]
    fn test_detach_last_inserted() {
        let mut store = ComponentStore::<Position>::new();
        store.attach(e(0), pos(0.0)).unwrap();
        store.attach(e(1), pos(1.0)).unwrap();

        store.detach(e(1)).unwrap();
        assert_eq!(store.entities(), &[e(0)]);
        assert!(store.is_consistent());
    }

    #[test]
    fn test_detach_only_element() {
        let mut store = ComponentStore::<Position>::new();
        store.attach(e(9), pos(9.0)).unwrap();
        store.detach(e(9)).unwrap();
        assert!(store.is_empty());
        assert!(!store.contains(e(9)));
        assert!(store.is_consistent());
    }

    #[test]
    fn test_missing_component_errors() {
        let mut store = ComponentStore::<Position>::new();
        let missing = EcsError::MissingComponent {
            entity: e(3),
            component: "Position",
        };
        assert_eq!(store.detach(e(3)), Err(missing.clone()));
        assert_eq!(store.get(e(3)).err(), Some(missing.clone()));
        assert_eq!(store.get_mut(e(3)).err(), Some(missing));
    }

    #[test]
    fn test_get_mut_writes_through() {
        let mut store = ComponentStore::<Position>::new();
        store.attach(e(2), pos(2.0)).unwrap();
        store.get_mut(e(2)).unwrap().x = 42.0;
        assert_eq!(store.get(e(2)).unwrap().x, 42.0);
    }

    #[test]
    fn test_store_full() {
        let mut store = ComponentStore::<Position>::with_capacity(1);
        store.attach(e(0), pos(0.0)).unwrap();
        assert_eq!(
            store.attach(e(1), pos(1.0)),
            Err(EcsError::StoreFull {
                component: "Position",
                capacity: 1
            })
        );
    }

    #[test]
    fn test_notify_destroyed_is_unconditional() {
        let mut store = ComponentStore::<Position>::new();
        store.attach(e(0), pos(0.0)).unwrap();

        store.notify_entity_destroyed(e(5));
        assert_eq!(store.len(), 1);

        store.notify_entity_destroyed(e(0));
        assert!(store.is_empty());
    }

    #[test]
    fn test_density_under_churn() {
        let mut store = ComponentStore::<Position>::new();
        let mut expected = HashMap::new();

        for round in 0u32..500 {
            let id = (round * 7) % 37;
            if store.contains(e(id)) {
                store.detach(e(id)).unwrap();
                expected.remove(&id);
            } else {
                store.attach(e(id), pos(round as f32)).unwrap();
                expected.insert(id, pos(round as f32));
            }

            assert!(store.is_consistent());
            assert_eq!(store.len(), expected.len());
            assert_eq!(store.values().len(), store.entities().len());
        }

        for (id, value) in &expected {
            assert_eq!(store.get(e(*id)).unwrap(), value);
        }
    }

    #[test]
    fn test_iter_pairs_entities_with_values() {
        let mut store = ComponentStore::<Position>::new();
        store.attach(e(4), pos(4.0)).unwrap();
        store.attach(e(8), pos(8.0)).unwrap();

        for (_, value) in store.iter_mut() {
            value.y = 0.0;
        }

        let pairs: Vec<(Entity, f32)> = store.iter().map(|(ent, p)| (ent, p.x + p.y)).collect();
        assert_eq!(pairs, vec![(e(4), 4.0), (e(8), 8.0)]);
    }

    #[test]
    fn test_erased_downcast() {
        let mut boxed: Box<dyn ErasedStore> = Box::new(ComponentStore::<Position>::new());
        assert_eq!(boxed.component_name(), "Position");
        assert!(
            boxed
                .as_any_mut()
                .downcast_mut::<ComponentStore<Position>>()
                .is_some()
        );
        assert!(boxed.as_any().downcast_ref::<ComponentStore<Tag>>().is_none());
    }
}
