//! Enemy FSM systems (perception → transition → navigation intent → attack triggers).
//!
//! Логика состояний вынесена в `*_step` функции над обычными `&mut` ссылками:
//! система только раскладывает query и пишет events.

use bevy::prelude::*;
use rand::Rng;

use crate::ai::{find_hostile, EnemyController, EnemyState, SpatialIndex};
use crate::combat::DespawnAfter;
use crate::components::{
    AnimationFlags, AnimationTrigger, AnimationTriggered, AttackProfile, AttackTarget,
    CollisionShape, CombatStats, NavigationAgent,
};
use crate::config::SimulationSettings;
use crate::navigation::NavMeshQuery;
use crate::DeterministicRng;

/// Результат одного тика погони
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChaseOutcome {
    /// Переход в другое состояние (цель потеряна)
    pub next_state: Option<EnemyState>,
    /// Поднять триггер ближней атаки
    pub attack: bool,
    /// Поднять триггер skill-атаки
    pub skill: bool,
}

/// GUARD: вернуться к anchor, на месте довернуться к guard orientation
pub fn guard_step(
    controller: &mut EnemyController,
    transform: &mut Transform,
    nav: &mut NavigationAgent,
    turn_blend: f32,
) {
    controller.chasing = false;

    let anchor = controller.guard_anchor;
    if transform.translation != anchor {
        nav.resume();
        nav.set_destination(anchor);
    }

    if transform.translation.distance(anchor) <= nav.stopping_distance {
        controller.walking = false;
        transform.rotation = transform
            .rotation
            .slerp(controller.guard_orientation, turn_blend);
    } else {
        controller.walking = true;
    }
}

/// Случайный waypoint в квадрате ±range вокруг anchor на текущей высоте
///
/// Недостижимая точка → текущая позиция агента.
pub fn pick_patrol_waypoint<R: Rng + ?Sized>(
    anchor: Vec3,
    position: Vec3,
    range: f32,
    navmesh: &NavMeshQuery,
    rng: &mut R,
) -> Vec3 {
    // NaN / бесконечность / ширина диапазона > f32::MAX: gen_range бы запаниковал
    if !(range * 2.0).is_finite() {
        return position;
    }

    // gen_range паникует на пустом диапазоне
    let (offset_x, offset_z) = if range > 0.0 {
        (rng.gen_range(-range..range), rng.gen_range(-range..range))
    } else {
        (0.0, 0.0)
    };

    let candidate = Vec3::new(anchor.x + offset_x, position.y, anchor.z + offset_z);
    navmesh
        .sample_reachable(candidate, range)
        .unwrap_or(position)
}

/// PATROL: пол-скорости, идём к waypoint, по прибытии берём новый
pub fn patrol_step<R: Rng + ?Sized>(
    controller: &mut EnemyController,
    position: Vec3,
    nav: &mut NavigationAgent,
    speed_factor: f32,
    navmesh: &NavMeshQuery,
    rng: &mut R,
) {
    controller.chasing = false;
    nav.set_speed_factor(speed_factor);

    let waypoint = match controller.patrol_target {
        Some(waypoint) => waypoint,
        None => {
            let waypoint = pick_patrol_waypoint(
                controller.guard_anchor,
                position,
                controller.patrol_range,
                navmesh,
                rng,
            );
            controller.patrol_target = Some(waypoint);
            waypoint
        }
    };

    if waypoint.distance(position) <= nav.stopping_distance {
        controller.walking = false;
        controller.patrol_target = Some(pick_patrol_waypoint(
            controller.guard_anchor,
            position,
            controller.patrol_range,
            navmesh,
            rng,
        ));
    } else {
        controller.walking = true;
        nav.resume();
        nav.set_destination(waypoint);
    }
}

/// CHASE: идём к цели, в радиусе атаки: стоп и атака по cooldown'у
///
/// `target_position`: позиция цели из snapshot'а тика (None: цель пропала).
#[allow(clippy::too_many_arguments)]
pub fn chase_step<R: Rng + ?Sized>(
    controller: &mut EnemyController,
    target: &mut AttackTarget,
    transform: &mut Transform,
    nav: &mut NavigationAgent,
    profile: &AttackProfile,
    stats: &mut CombatStats,
    target_position: Option<Vec3>,
    rng: &mut R,
) -> ChaseOutcome {
    controller.walking = false;
    controller.chasing = true;
    nav.set_speed_factor(1.0);

    let Some(target_position) = target_position else {
        // Цель потеряна: стоим где стоим, возвращаемся к посту / патрулю
        controller.following = false;
        nav.set_destination(transform.translation);
        target.clear();
        return ChaseOutcome {
            next_state: Some(controller.resting_state()),
            ..Default::default()
        };
    };

    controller.following = true;
    nav.resume();
    nav.set_destination(target_position);

    let distance = transform.translation.distance(target_position);
    let in_attack_range = profile.in_attack_range(distance);
    let in_skill_range = profile.in_skill_range(distance);

    let mut outcome = ChaseOutcome::default();
    if in_attack_range || in_skill_range {
        controller.following = false;
        nav.halt();

        if controller.can_attack() {
            controller.attack_cooldown = profile.cool_down;
            // Крит бросается один раз на цикл cooldown'а
            stats.critical_pending = profile.roll_critical(rng);
            transform.look_at(target_position, Vec3::Y);

            outcome.attack = in_attack_range;
            outcome.skill = in_skill_range;
        }
    }

    outcome
}

/// Система: один тик поведения всех врагов
///
/// Приоритеты:
/// 1. health == 0 → Dead (терминально)
/// 2. perception нашёл цель → Chase
/// 3. логика текущего состояния
///
/// Cooldown убывает каждый тик в любом состоянии (кроме frozen).
pub fn enemy_behavior_tick(
    mut commands: Commands,
    mut enemies: Query<(
        Entity,
        &mut EnemyController,
        &mut EnemyState,
        &mut Transform,
        &mut NavigationAgent,
        &mut AnimationFlags,
        &mut CombatStats,
        &AttackProfile,
        &mut AttackTarget,
        &mut CollisionShape,
    )>,
    index: Res<SpatialIndex>,
    navmesh: Res<NavMeshQuery>,
    settings: Res<SimulationSettings>,
    mut rng: ResMut<DeterministicRng>,
    mut triggers: EventWriter<AnimationTriggered>,
    time: Res<Time<Fixed>>,
) {
    let delta = time.delta_secs();

    for (
        entity,
        mut controller,
        mut state,
        mut transform,
        mut nav,
        mut flags,
        mut stats,
        profile,
        mut target,
        mut collision,
    ) in enemies.iter_mut()
    {
        // Encounter закончился: только публикуем флаги
        if controller.frozen {
            controller.publish_flags(&mut flags, stats.critical_pending);
            continue;
        }

        if !stats.is_alive() && *state != EnemyState::Dead {
            crate::log(&format!("💀 {:?} {:?} → Dead", entity, *state));
            *state = EnemyState::Dead;
            controller.dead = true;
        }

        if *state != EnemyState::Dead {
            match find_hostile(
                &index,
                transform.translation,
                controller.sight_radius,
                entity,
                controller.hostile_faction,
            ) {
                Some(found) => {
                    if *state != EnemyState::Chase {
                        crate::log(&format!(
                            "⚔️ {:?} {:?} → Chase (target {:?})",
                            entity, *state, found
                        ));
                        *state = EnemyState::Chase;
                    }
                    target.set(Some(found));
                }
                None => target.clear(),
            }
        }

        match *state {
            EnemyState::Guard => {
                guard_step(&mut controller, &mut transform, &mut nav, settings.guard_turn_blend);
            }
            EnemyState::Patrol => {
                let position = transform.translation;
                patrol_step(
                    &mut controller,
                    position,
                    &mut nav,
                    settings.patrol_speed_factor,
                    &navmesh,
                    &mut rng.rng,
                );
            }
            EnemyState::Chase => {
                let target_position = target.get().and_then(|t| index.position_of(t));
                let outcome = chase_step(
                    &mut controller,
                    &mut target,
                    &mut transform,
                    &mut nav,
                    profile,
                    &mut stats,
                    target_position,
                    &mut rng.rng,
                );

                if let Some(next_state) = outcome.next_state {
                    crate::log(&format!("🔍 {:?} lost target: Chase → {:?}", entity, next_state));
                    *state = next_state;
                }

                if outcome.attack || outcome.skill {
                    if stats.critical_pending {
                        triggers.write(AnimationTriggered {
                            entity,
                            trigger: AnimationTrigger::Critical,
                        });
                    }
                    if outcome.attack {
                        triggers.write(AnimationTriggered {
                            entity,
                            trigger: AnimationTrigger::Attack,
                        });
                    }
                    if outcome.skill {
                        triggers.write(AnimationTriggered {
                            entity,
                            trigger: AnimationTrigger::Skill,
                        });
                    }
                }
            }
            EnemyState::Dead => {
                collision.disable();

                if !controller.despawn_scheduled {
                    controller.despawn_scheduled = true;
                    nav.halt();
                    commands.entity(entity).insert(DespawnAfter {
                        remaining: settings.corpse_despawn_delay,
                    });
                    triggers.write(AnimationTriggered {
                        entity,
                        trigger: AnimationTrigger::Death,
                    });
                    crate::log(&format!(
                        "⚰️ {:?} despawn scheduled in {:.1}s",
                        entity, settings.corpse_despawn_delay
                    ));
                }
            }
        }

        controller.publish_flags(&mut flags, stats.critical_pending);
        controller.attack_cooldown -= delta;
    }
}
