//! Entity handles and the entity pool.
//!
//! An [`Entity`] is a small integer handle with no inherent data. The
//! [`EntityManager`] hands handles out of a FIFO free list and owns each
//! handle's [`Signature`].

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::EcsError;
use crate::signature::Signature;

/// Maximum number of entities that can be alive at the same time.
pub const MAX_ENTITIES: usize = 5000;

/// An entity handle in `[0, capacity)`.
///
/// Handles are recycled after destruction and carry no generation, so a
/// stale copy of a destroyed handle aliases whichever entity reuses it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Entity(u32);

impl Entity {
    /// Create an entity from a raw index.
    #[must_use]
    pub const fn from_raw(index: u32) -> Self {
        Self(index)
    }

    /// Returns the raw index.
    #[must_use]
    pub const fn id(self) -> u32 {
        self.0
    }

    /// Returns the index as a `usize`, for table lookups.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for Entity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Entity({})", self.0)
    }
}

/// Owns the pool of entity handles and one signature per handle.
///
/// Destroyed handles go to the back of the free list, so a handle is only
/// reissued after every other free handle has been issued once.
#[derive(Debug)]
pub struct EntityManager {
    available: VecDeque<Entity>,
    signatures: Vec<Signature>,
    alive: Vec<bool>,
    living: usize,
}

impl EntityManager {
    /// Create a pool holding [`MAX_ENTITIES`] handles.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(MAX_ENTITIES)
    }

    /// Create a pool holding `capacity` handles, clamped to [`MAX_ENTITIES`].
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.min(MAX_ENTITIES);
        Self {
            available: (0..capacity as u32).map(Entity).collect(),
            signatures: vec![Signature::EMPTY; capacity],
            alive: vec![false; capacity],
            living: 0,
        }
    }

    /// Take the next free handle.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::EntityLimitReached`] if every handle is alive.
    pub fn create_entity(&mut self) -> Result<Entity, EcsError> {
        let entity = self
            .available
            .pop_front()
            .ok_or(EcsError::EntityLimitReached {
                max: self.capacity(),
            })?;
        self.alive[entity.index()] = true;
        self.living += 1;
        debug!(entity = entity.id(), living = self.living, "entity created");
        Ok(entity)
    }

    /// Clear the entity's signature and return its handle to the pool.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::EntityOutOfRange`] or [`EcsError::EntityNotAlive`]
    /// without touching the pool.
    pub fn destroy_entity(&mut self, entity: Entity) -> Result<(), EcsError> {
        self.check_alive(entity)?;
        self.signatures[entity.index()].reset();
        self.alive[entity.index()] = false;
        self.available.push_back(entity);
        self.living -= 1;
        debug!(entity = entity.id(), living = self.living, "entity destroyed");
        Ok(())
    }

    /// Overwrite a live entity's signature.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::EntityOutOfRange`] for a handle outside the pool,
    /// or [`EcsError::EntityNotAlive`] for a free one.
    pub fn set_signature(&mut self, entity: Entity, signature: Signature) -> Result<(), EcsError> {
        self.check_alive(entity)?;
        self.signatures[entity.index()] = signature;
        Ok(())
    }

    /// Returns the entity's signature.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::EntityOutOfRange`] for a handle outside the pool.
    pub fn signature(&self, entity: Entity) -> Result<Signature, EcsError> {
        self.check_range(entity)?;
        Ok(self.signatures[entity.index()])
    }

    /// Returns `true` if the handle is currently alive.
    #[must_use]
    pub fn is_alive(&self, entity: Entity) -> bool {
        self.alive.get(entity.index()).copied().unwrap_or(false)
    }

    /// Returns [`EcsError::EntityNotAlive`] unless the handle is alive.
    ///
    /// # Errors
    ///
    /// Also returns [`EcsError::EntityOutOfRange`] for a handle outside the
    /// pool.
    pub fn check_alive(&self, entity: Entity) -> Result<(), EcsError> {
        self.check_range(entity)?;
        if self.alive[entity.index()] {
            Ok(())
        } else {
            Err(EcsError::EntityNotAlive(entity))
        }
    }

    /// Returns the number of live entities.
    #[must_use]
    pub fn living_count(&self) -> usize {
        self.living
    }

    /// Returns the number of handles in the pool.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.signatures.len()
    }

    /// Iterate over live entities and their signatures, in handle order.
    pub fn living(&self) -> impl Iterator<Item = (Entity, Signature)> + '_ {
        self.alive
            .iter()
            .zip(&self.signatures)
            .enumerate()
            .filter(|(_, (alive, _))| **alive)
            .map(|(index, (_, signature))| (Entity(index as u32), *signature))
    }

    fn check_range(&self, entity: Entity) -> Result<(), EcsError> {
        if entity.index() < self.capacity() {
            Ok(())
        } else {
            Err(EcsError::EntityOutOfRange {
                entity,
                max: self.capacity(),
            })
        }
    }
}

impl Default for EntityManager {
    fn default() -> Self {
        Self::new()
    }
}
