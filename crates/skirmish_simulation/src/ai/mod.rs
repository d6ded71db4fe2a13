//! AI decision-making module
//!
//! Enemy FSM: Guard / Patrol / Chase / Dead.
//! Perception: overlap-sphere запросы к `SpatialIndex` (snapshot начала тика).

use bevy::prelude::*;

pub mod components;
pub mod perception;
pub mod systems;

// Re-export основных типов
pub use components::{EnemyConfig, EnemyController, EnemyState};
pub use perception::{find_hostile, refresh_spatial_index, SpatialEntry, SpatialIndex};
pub use systems::{
    chase_step, enemy_behavior_tick, guard_step, patrol_step, pick_patrol_waypoint, ChaseOutcome,
};

use crate::SimulationSet;

/// AI Plugin
///
/// Регистрирует enemy FSM в FixedUpdate (фаза Decide).
/// Snapshot мира к этому моменту уже снят в фазе Sense (NavigationPlugin).
pub struct AIPlugin;

impl Plugin for AIPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            FixedUpdate,
            systems::enemy_behavior_tick.in_set(SimulationSet::Decide),
        );
    }
}
