//! Headless stand-ins для внешних коллабораторов
//!
//! В игре destination исполняет navmesh агент, а HitSignal шлёт animation слой
//! в середине клипа. Для headless симуляции (тесты, CLI демо): простейшие замены:
//! - `steer_navigation_agents`: прямолинейное движение к destination со скоростью speed
//! - `instant_hit_signals`: триггер Attack/Skill сразу превращается в HitSignal
//!
//! Обе системы живут в фазах, где в игре отработал бы внешний слой.

use bevy::prelude::*;

use crate::combat::{resolve_hit_signals, HitKind, HitSignal, KnockbackSkill};
use crate::components::{AnimationTrigger, AnimationTriggered, NavigationAgent};
use crate::player::tick_player_combat;
use crate::SimulationSet;

/// Затухание knockback скорости за тик
const KNOCKBACK_DAMPING: f32 = 0.8;

/// Ниже этой скорости knockback считается погашенным (м/с)
const KNOCKBACK_REST_SPEED: f32 = 0.05;

/// Система: интеграция NavigationAgent → Transform (headless режим, без navmesh)
///
/// - stopped: гасим остаточную скорость (knockback скользит и затухает)
/// - иначе идём к destination, останавливаемся на stopping_distance
pub fn steer_navigation_agents(
    mut agents: Query<(&mut Transform, &mut NavigationAgent)>,
    time: Res<Time<Fixed>>,
) {
    let delta = time.delta_secs();

    for (mut transform, mut nav) in agents.iter_mut() {
        if nav.stopped {
            if nav.velocity.length() > KNOCKBACK_REST_SPEED {
                transform.translation += nav.velocity * delta;
                nav.velocity *= KNOCKBACK_DAMPING;
            } else {
                nav.velocity = Vec3::ZERO;
            }
            continue;
        }

        let Some(destination) = nav.destination else {
            nav.velocity = Vec3::ZERO;
            continue;
        };

        let to_destination = destination - transform.translation;
        let distance = to_destination.length();
        if distance <= nav.stopping_distance || distance <= f32::EPSILON {
            nav.velocity = Vec3::ZERO;
            continue;
        }

        let direction = to_destination / distance;
        let step = (nav.speed * delta).min(distance);
        transform.translation += direction * step;
        nav.velocity = direction * nav.speed;

        // Агент поворачивается по ходу движения (только yaw)
        let heading = Vec3::new(direction.x, 0.0, direction.z);
        if heading.length_squared() > f32::EPSILON {
            transform.look_to(heading, Vec3::Y);
        }
    }
}

/// Система: Attack / Skill триггер → мгновенный HitSignal
///
/// С KnockbackSkill: Attack → KickOff, Skill → ThrowRock; без него оба: Strike.
pub fn instant_hit_signals(
    mut triggers: EventReader<AnimationTriggered>,
    skills: Query<(), With<KnockbackSkill>>,
    mut hits: EventWriter<HitSignal>,
) {
    for triggered in triggers.read() {
        let has_knockback = skills.contains(triggered.entity);

        let kind = match (triggered.trigger, has_knockback) {
            (AnimationTrigger::Attack, true) => HitKind::KickOff,
            (AnimationTrigger::Skill, true) => HitKind::ThrowRock,
            (AnimationTrigger::Attack | AnimationTrigger::Skill, false) => HitKind::Strike,
            _ => continue,
        };

        hits.write(HitSignal {
            attacker: triggered.entity,
            kind,
        });
    }
}

/// Plugin: headless замены navmesh агента и animation слоя
///
/// Добавляется поверх SimulationPlugin только там, где настоящих коллабораторов нет.
pub struct HeadlessCollaboratorsPlugin;

impl Plugin for HeadlessCollaboratorsPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            FixedUpdate,
            instant_hit_signals
                .in_set(SimulationSet::Resolve)
                .before(resolve_hit_signals),
        )
        .add_systems(
            FixedUpdate,
            // Скорость игрока публикуется уже по velocity этого тика
            steer_navigation_agents
                .in_set(SimulationSet::Cleanup)
                .before(tick_player_combat),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::ecs::system::RunSystemOnce;
    use std::time::Duration;

    fn world_with_tick(delta: f32) -> World {
        let mut world = World::new();
        let mut time = Time::<Fixed>::from_seconds(f64::from(delta));
        time.advance_by(Duration::from_secs_f32(delta));
        world.insert_resource(time);
        world
    }

    #[test]
    fn test_agent_moves_toward_destination() {
        let mut world = world_with_tick(0.5);
        let mut nav = NavigationAgent::new(2.0, 0.5);
        nav.set_destination(Vec3::new(10.0, 0.0, 0.0));
        let agent = world.spawn((Transform::default(), nav)).id();

        let _ = world.run_system_once(steer_navigation_agents);

        let transform = world.get::<Transform>(agent).copied().unwrap_or_default();
        assert!((transform.translation.x - 1.0).abs() < 1e-5);
        let nav = world.get::<NavigationAgent>(agent).copied().unwrap_or_default();
        assert_eq!(nav.velocity, Vec3::new(2.0, 0.0, 0.0));
    }

    #[test]
    fn test_agent_stops_at_stopping_distance() {
        let mut world = world_with_tick(0.5);
        let mut nav = NavigationAgent::new(2.0, 1.0);
        nav.set_destination(Vec3::new(0.8, 0.0, 0.0));
        let agent = world.spawn((Transform::default(), nav)).id();

        let _ = world.run_system_once(steer_navigation_agents);

        assert_eq!(world.get::<Transform>(agent).map(|t| t.translation), Some(Vec3::ZERO));
    }

    #[test]
    fn test_stopped_agent_only_slides_with_knockback() {
        let mut world = world_with_tick(0.5);
        let mut nav = NavigationAgent::new(2.0, 0.5);
        nav.set_destination(Vec3::new(10.0, 0.0, 0.0));
        nav.halt();
        nav.velocity = Vec3::new(0.0, 0.0, -4.0);
        let agent = world.spawn((Transform::default(), nav)).id();

        let _ = world.run_system_once(steer_navigation_agents);

        let translation = world.get::<Transform>(agent).map(|t| t.translation);
        assert_eq!(translation, Some(Vec3::new(0.0, 0.0, -2.0)));
        let velocity = world.get::<NavigationAgent>(agent).map(|n| n.velocity);
        assert_eq!(velocity, Some(Vec3::new(0.0, 0.0, -4.0) * KNOCKBACK_DAMPING));
    }
}
