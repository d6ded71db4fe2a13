//! Damage resolution + death cleanup
//!
//! Формула:
//! - core = uniform [min_damage, max_damage)
//! - крит: core × critical_multiplier
//! - truncate → i64
//! - final = max(dmg - defence, 0), health clamp'ится в 0
//!
//! Решение о крите принимает вызывающий (FSM / player approach), не resolver.

use bevy::prelude::*;
use rand::Rng;

use crate::components::{AttackProfile, CombatStats};

/// Событие: урон нанесен
///
/// Генерируется после применения damage к CombatStats.
/// Используется для UI, звуков, телеметрии.
#[derive(Event, Debug, Clone)]
pub struct DamageDealt {
    pub attacker: Entity,
    pub target: Entity,
    pub damage: u32,
    pub critical: bool,
    pub target_died: bool,
}

/// Событие: entity умер (health == 0)
#[derive(Event, Debug, Clone)]
pub struct EntityDied {
    pub entity: Entity,
    pub killer: Option<Entity>,
}

/// Компонент: деспавн entity после grace-задержки (death animation)
///
/// Явный countdown, уменьшается на delta каждый тик.
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub struct DespawnAfter {
    pub remaining: f32,
}

/// Stateless resolver, общий для врагов и игрока
pub struct DamageResolver;

impl DamageResolver {
    /// Бросок урона атакующего (до защиты)
    pub fn roll_damage<R: Rng + ?Sized>(
        profile: &AttackProfile,
        is_critical: bool,
        rng: &mut R,
    ) -> i64 {
        // Пустой диапазон → gen_range паникует, берём нижнюю границу
        let mut core_damage = if profile.max_damage > profile.min_damage {
            rng.gen_range(profile.min_damage..profile.max_damage)
        } else {
            profile.min_damage
        };

        if is_critical {
            core_damage *= profile.critical_multiplier;
        }

        core_damage as i64
    }

    /// Урон после защиты (никогда не отрицательный)
    pub fn mitigate(raw_damage: i64, defence: u32) -> u32 {
        (raw_damage - i64::from(defence)).clamp(0, i64::from(u32::MAX)) as u32
    }

    /// Полный резолв одного попадания: roll → crit → truncate → defence → apply
    ///
    /// Возвращает нанесённый урон.
    pub fn resolve<R: Rng + ?Sized>(
        attacker: &AttackProfile,
        is_critical: bool,
        defender: &mut CombatStats,
        rng: &mut R,
    ) -> u32 {
        let raw = Self::roll_damage(attacker, is_critical, rng);
        let damage = Self::mitigate(raw, defender.defence());
        defender.apply_damage(damage);

        if is_critical {
            crate::logger::log(&format!("💢 Critical hit! raw damage {}", raw));
        }

        damage
    }
}

/// Система: countdown DespawnAfter → despawn
pub fn despawn_after_timeout(
    mut commands: Commands,
    mut query: Query<(Entity, &mut DespawnAfter)>,
    time: Res<Time<Fixed>>,
) {
    let delta = time.delta_secs();

    for (entity, mut despawn_after) in query.iter_mut() {
        despawn_after.remaining -= delta;

        if despawn_after.remaining <= 0.0 {
            crate::logger::log(&format!("⚰️ Despawning entity {:?} (grace period over)", entity));
            commands.entity(entity).despawn();
        }
    }
}
