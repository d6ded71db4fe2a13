//! Combat module (animation-driven combat architecture)
//!
//! ECS ответственность:
//! - Game state: CombatStats, AttackProfile, cooldowns (в контроллерах)
//! - Combat rules: damage roll, крит, защита
//! - Events: DamageDealt, EntityDied, ProjectileLaunched
//!
//! Внешний animation слой:
//! - проигрывает Attack/Skill клипы
//! - шлёт HitSignal в момент удара → resolve_hit_signals

use bevy::prelude::*;

use crate::SimulationSet;

pub mod damage;
pub mod hit;

#[cfg(test)]
mod damage_tests;

// Re-export основных типов
pub use damage::{despawn_after_timeout, DamageDealt, DamageResolver, DespawnAfter, EntityDied};
pub use hit::{is_facing_target, resolve_hit_signals, HitKind, HitSignal, KnockbackSkill, ProjectileLaunched};

/// Combat Plugin
///
/// Порядок выполнения (внутри общего SimulationSet):
/// 1. resolve_hit_signals: HitSignal → facing check → DamageResolver (Resolve)
/// 2. despawn_after_timeout: уборка трупов после grace-задержки (Cleanup)
pub struct CombatPlugin;

impl Plugin for CombatPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<DamageDealt>()
            .add_event::<EntityDied>()
            .add_event::<HitSignal>()
            .add_event::<ProjectileLaunched>();

        app.add_systems(
            FixedUpdate,
            (
                resolve_hit_signals.in_set(SimulationSet::Resolve),
                despawn_after_timeout.in_set(SimulationSet::Cleanup),
            ),
        );
    }
}
