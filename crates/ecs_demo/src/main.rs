//! # ecs_demo
//!
//! Drives a [`Coordinator`] through a few ticks of a small movement world.
//!
//! Limits come from `ECS_MAX_ENTITIES` / `ECS_MAX_COMPONENT_TYPES`; log
//! verbosity from `RUST_LOG`.

use std::collections::BTreeSet;

use anyhow::Result;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use ecs_coordinator::{Component, Components, Coordinator, CoordinatorConfig, Entity, System};

const TICKS: u32 = 5;

/// Added to every velocity once per tick.
const GRAVITY: f32 = -0.5;

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

/// Pulls every velocity down a little.
struct Gravity;

impl System for Gravity {
    fn name(&self) -> &'static str {
        "gravity"
    }

    fn update(&mut self, entities: &BTreeSet<Entity>, components: &mut Components<'_>) {
        for &entity in entities {
            if let Ok(velocity) = components.get_mut::<Velocity>(entity) {
                velocity.dy += GRAVITY;
            }
        }
    }
}

/// Integrates velocity into position.
struct Movement;

impl System for Movement {
    fn name(&self) -> &'static str {
        "movement"
    }

    fn update(&mut self, entities: &BTreeSet<Entity>, components: &mut Components<'_>) {
        for &entity in entities {
            let Ok(&Velocity { dx, dy }) = components.get::<Velocity>(entity) else {
                continue;
            };
            if let Ok(position) = components.get_mut::<Position>(entity) {
                position.x += dx;
                position.y += dy;
            }
        }
    }
}

/// Logs every position it sees and counts how often it ran.
#[derive(Default)]
struct Report {
    runs: u32,
}

impl System for Report {
    fn name(&self) -> &'static str {
        "report"
    }

    fn update(&mut self, entities: &BTreeSet<Entity>, components: &mut Components<'_>) {
        self.runs += 1;
        for &entity in entities {
            if let Ok(Position { x, y }) = components.get::<Position>(entity) {
                debug!(entity = entity.id(), x, y, "position");
            }
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("ecs_demo=info".parse()?))
        .init();

    let config = CoordinatorConfig::from_env()?;
    let mut coordinator = Coordinator::with_config(config)?;
    info!(
        max_entities = config.max_entities,
        max_component_types = config.max_component_types,
        "ecs demo starting"
    );

    let position = coordinator.register_component::<Position>()?;
    let velocity = coordinator.register_component::<Velocity>()?;

    coordinator.register_system_with_signature(Gravity, velocity.signature())?;
    coordinator.register_system_with_signature(Movement, position.signature() | velocity.signature())?;
    coordinator.register_system_with_signature(Report::default(), position.signature())?;

    let mut movers = Vec::new();
    for i in 0..3u8 {
        let entity = coordinator.create_entity()?;
        coordinator.attach(
            entity,
            Position {
                x: f32::from(i),
                y: 10.0,
            },
        )?;
        coordinator.attach(entity, Velocity { dx: 1.0, dy: 0.0 })?;
        movers.push(entity);
    }

    let anchor = coordinator.create_entity()?;
    coordinator.attach(anchor, Position { x: -5.0, y: 0.0 })?;

    info!(
        living = coordinator.living_count(),
        moving = coordinator.system_entities::<Movement>()?.len(),
        "world populated"
    );

    for tick in 0..TICKS {
        if tick == 2 {
            // The first mover stops; the last one leaves the world.
            let stopped = coordinator.detach::<Velocity>(movers[0])?;
            info!(entity = movers[0].id(), ?stopped, "mover stopped");
            coordinator.destroy_entity(movers[2])?;
            info!(entity = movers[2].id(), "mover destroyed");
        }

        coordinator.update_systems();
        info!(
            tick,
            moving = coordinator.system_entities::<Movement>()?.len(),
            "tick complete"
        );
    }

    for &entity in movers.iter().take(2).chain(std::iter::once(&anchor)) {
        let Position { x, y } = *coordinator.get::<Position>(entity)?;
        info!(entity = entity.id(), x, y, "final position");
    }
    info!(
        report_runs = coordinator.system::<Report>()?.runs,
        living = coordinator.living_count(),
        "ecs demo finished"
    );

    Ok(())
}
