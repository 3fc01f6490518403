//! The [`System`] trait.

use std::collections::BTreeSet;

use ecs_component::{Components, Entity};

/// A processing unit driven by the registry.
///
/// A system keeps no per-entity state of its own. On each update it receives
/// its working set, every entity whose signature contains the system's
/// required signature, and pulls component data from the
/// [`Components`] view. The view edits values only; attaching and
/// detaching go through the owner of the component manager.
///
/// # Examples
///
/// ```rust
/// use std::collections::BTreeSet;
///
/// use ecs_component::{Component, Components, Entity};
/// use ecs_system::System;
///
/// struct Health(f32);
/// impl Component for Health {}
///
/// #[derive(Default)]
/// struct Regenerate;
///
/// impl System for Regenerate {
///     fn update(&mut self, entities: &BTreeSet<Entity>, components: &mut Components<'_>) {
///         for &entity in entities {
///             if let Ok(health) = components.get_mut::<Health>(entity) {
///                 health.0 += 1.0;
///             }
///         }
///     }
/// }
/// ```
pub trait System: 'static {
    /// A human-readable name used in errors and logs.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Run the system once over its working set.
    fn update(&mut self, entities: &BTreeSet<Entity>, components: &mut Components<'_>);
}
