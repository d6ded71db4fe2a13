//! Hit signals (animation → ECS damage application)
//!
//! Атака в два шага:
//! 1. FSM / player поднимает триггер `Attack` / `Skill` (AnimationTriggered)
//! 2. Animation слой в середине клипа шлёт `HitSignal` → здесь проверяем facing и
//!    вызываем DamageResolver
//!
//! Цель могла уйти из поля зрения между шагами: такой hit молча игнорируется.

use bevy::prelude::*;

use crate::combat::{DamageDealt, DamageResolver, EntityDied};
use crate::components::{
    AnimationTrigger, AnimationTriggered, AttackProfile, AttackTarget, CombatStats, NavigationAgent,
};
use crate::config::SimulationSettings;
use crate::DeterministicRng;

/// Какое действие анимация завершила
#[derive(Debug, Clone, Copy, PartialEq, Eq, Reflect)]
pub enum HitKind {
    /// Обычный удар
    Strike,
    /// Пинок с отбрасыванием (нужен KnockbackSkill)
    KickOff,
    /// Бросок снаряда (урон считает внешний projectile слой)
    ThrowRock,
}

/// Event: момент попадания из animation слоя
#[derive(Event, Debug, Clone, Copy)]
pub struct HitSignal {
    pub attacker: Entity,
    pub kind: HitKind,
}

/// Event: снаряд запущен в цель (спавн и полёт: внешний слой)
#[derive(Event, Debug, Clone, Copy)]
pub struct ProjectileLaunched {
    pub thrower: Entity,
    pub target: Entity,
    pub origin: Vec3,
}

/// Умение отбрасывать цель (KickOff)
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub struct KnockbackSkill {
    /// Скорость, которую получает цель (м/с)
    pub kick_force: f32,
}

impl Default for KnockbackSkill {
    fn default() -> Self {
        Self { kick_force: 25.0 }
    }
}

/// Смотрит ли `transform` на точку (dot(forward, direction) >= threshold)
pub fn is_facing_target(transform: &Transform, target: Vec3, dot_threshold: f32) -> bool {
    let to_target = (target - transform.translation).normalize_or_zero();
    if to_target == Vec3::ZERO {
        // Цель в той же точке: считаем что смотрим
        return true;
    }

    let forward: Vec3 = *transform.forward();
    forward.dot(to_target) >= dot_threshold
}

/// Система: резолв HitSignal → урон / knockback / снаряд
pub fn resolve_hit_signals(
    mut hits: EventReader<HitSignal>,
    attackers: Query<(&Transform, &AttackTarget, &AttackProfile, Option<&KnockbackSkill>)>,
    transforms: Query<&Transform>,
    mut stats: Query<&mut CombatStats>,
    mut navigation: Query<&mut NavigationAgent>,
    settings: Res<SimulationSettings>,
    mut rng: ResMut<DeterministicRng>,
    mut damage_events: EventWriter<DamageDealt>,
    mut died_events: EventWriter<EntityDied>,
    mut triggers: EventWriter<AnimationTriggered>,
    mut projectiles: EventWriter<ProjectileLaunched>,
) {
    for hit in hits.read() {
        let Ok((attacker_transform, attack_target, profile, knockback)) = attackers.get(hit.attacker) else {
            continue;
        };

        let Some(target) = attack_target.get() else {
            continue;
        };

        let Ok(target_transform) = transforms.get(target) else {
            continue;
        };

        // Мёртвые не бьют (анимация могла доиграть после смерти)
        if !stats.get(hit.attacker).map(|s| s.is_alive()).unwrap_or(false) {
            continue;
        }

        if hit.kind == HitKind::ThrowRock {
            projectiles.write(ProjectileLaunched {
                thrower: hit.attacker,
                target,
                origin: attacker_transform.translation,
            });
            crate::logger::log(&format!("🪨 {:?} threw a rock at {:?}", hit.attacker, target));
            continue;
        }

        if !is_facing_target(
            attacker_transform,
            target_transform.translation,
            settings.facing_dot_threshold,
        ) {
            crate::logger::log(&format!(
                "↪️ Hit from {:?} ignored: not facing {:?}",
                hit.attacker, target
            ));
            continue;
        }

        if hit.kind == HitKind::KickOff {
            if let (Some(skill), Ok(mut target_nav)) = (knockback, navigation.get_mut(target)) {
                let direction = (target_transform.translation - attacker_transform.translation)
                    .normalize_or_zero();
                target_nav.halt();
                target_nav.velocity = direction * skill.kick_force;
                triggers.write(AnimationTriggered {
                    entity: target,
                    trigger: AnimationTrigger::Dizzy,
                });
            }
        }

        // Крит "потребляется" попаданием
        let is_critical = match stats.get_mut(hit.attacker) {
            Ok(mut attacker_stats) => std::mem::take(&mut attacker_stats.critical_pending),
            Err(_) => false,
        };

        let Ok(mut defender) = stats.get_mut(target) else {
            continue;
        };

        let was_alive = defender.is_alive();
        let damage = DamageResolver::resolve(profile, is_critical, &mut defender, &mut rng.rng);
        let target_died = was_alive && !defender.is_alive();

        damage_events.write(DamageDealt {
            attacker: hit.attacker,
            target,
            damage,
            critical: is_critical,
            target_died,
        });

        crate::logger::log(&format!(
            "💥 {:?} → {:?}: {} damage (crit: {}, HP: {})",
            hit.attacker,
            target,
            damage,
            is_critical,
            defender.health()
        ));

        if target_died {
            died_events.write(EntityDied {
                entity: target,
                killer: Some(hit.attacker),
            });
            crate::logger::log_info(&format!("☠️ Entity {:?} killed by {:?}", target, hit.attacker));
        }
    }
}
