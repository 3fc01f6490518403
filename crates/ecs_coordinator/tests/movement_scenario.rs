//! Position / Velocity / Movement walkthrough against the public facade.

use std::collections::BTreeSet;

use ecs_coordinator::{Component, Components, Coordinator, Entity, MAX_ENTITIES, System};

#[derive(Debug, Clone, Copy, PartialEq)]
struct Position {
    x: f32,
    y: f32,
}
impl Component for Position {}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Velocity {
    dx: f32,
    dy: f32,
}
impl Component for Velocity {}

#[derive(Default)]
struct Movement;
impl System for Movement {
    fn update(&mut self, entities: &BTreeSet<Entity>, components: &mut Components<'_>) {
        for &entity in entities {
            let velocity = *components.get::<Velocity>(entity).unwrap();
            let position = components.get_mut::<Position>(entity).unwrap();
            position.x += velocity.dx;
            position.y += velocity.dy;
        }
    }
}

fn members(coordinator: &Coordinator) -> Vec<Entity> {
    coordinator
        .system_entities::<Movement>()
        .unwrap()
        .iter()
        .copied()
        .collect()
}

#[test]
fn test_movement_scenario() {
    let mut coordinator = Coordinator::new();
    let position = coordinator.register_component::<Position>().unwrap();
    let velocity = coordinator.register_component::<Velocity>().unwrap();
    assert_eq!(position.bit(), 0);
    assert_eq!(velocity.bit(), 1);

    coordinator
        .register_system_with_signature(Movement, position.signature() | velocity.signature())
        .unwrap();

    let e0 = coordinator.create_entity().unwrap();
    let e1 = coordinator.create_entity().unwrap();
    let e2 = coordinator.create_entity().unwrap();

    for (i, &e) in [e0, e1, e2].iter().enumerate() {
        coordinator
            .attach(
                e,
                Position {
                    x: i as f32,
                    y: 0.0,
                },
            )
            .unwrap();
    }
    for &e in &[e0, e1] {
        coordinator.attach(e, Velocity { dx: 1.0, dy: 1.0 }).unwrap();
    }
    assert_eq!(members(&coordinator), vec![e0, e1]);

    coordinator.detach::<Velocity>(e0).unwrap();
    assert_eq!(members(&coordinator), vec![e1]);

    coordinator.update_systems();
    assert_eq!(
        *coordinator.get::<Position>(e0).unwrap(),
        Position { x: 0.0, y: 0.0 }
    );
    assert_eq!(
        *coordinator.get::<Position>(e1).unwrap(),
        Position { x: 2.0, y: 1.0 }
    );

    coordinator.destroy_entity(e1).unwrap();
    assert!(members(&coordinator).is_empty());
    assert!(!coordinator.has::<Position>(e1));

    // e1 becomes reissuable once the untouched handles are used up.
    let mut reissued = None;
    for _ in 0..MAX_ENTITIES - 2 {
        let e = coordinator.create_entity().unwrap();
        if e == e1 {
            reissued = Some(e);
            break;
        }
    }
    assert_eq!(reissued, Some(e1));
    assert!(coordinator.signature(e1).unwrap().is_empty());
    assert_eq!(coordinator.living_count(), MAX_ENTITIES);
}
