//! Player systems: intents, approach polling, death detection, bookkeeping.

use bevy::prelude::*;

use crate::ai::SpatialIndex;
use crate::components::{
    AnimationFlags, AnimationTrigger, AnimationTriggered, AttackProfile, AttackTarget, CombatStats,
    NavigationAgent,
};
use crate::encounter::{EncounterCoordinator, EncounterEnded};
use crate::player::{ApproachStatus, AttackApproach, PlayerCombat, PlayerIntent};
use crate::DeterministicRng;

/// Система: новый игрок → coordinator.register_player
pub fn register_players(
    added: Query<Entity, Added<PlayerCombat>>,
    mut coordinator: ResMut<EncounterCoordinator>,
) {
    for entity in added.iter() {
        coordinator.register_player(entity);
        crate::log(&format!("🎮 Player {:?} registered", entity));
    }
}

/// Система: PlayerIntent → навигация / новая AttackApproach
///
/// Новый intent всегда отменяет текущий подход (cancel-and-restart).
pub fn process_player_intents(
    mut intents: EventReader<PlayerIntent>,
    mut players: Query<(
        Entity,
        &mut PlayerCombat,
        &mut Transform,
        &mut NavigationAgent,
        &mut CombatStats,
        &AttackProfile,
        &mut AttackTarget,
    )>,
    index: Res<SpatialIndex>,
    mut rng: ResMut<DeterministicRng>,
) {
    for intent in intents.read() {
        for (entity, mut combat, mut transform, mut nav, mut stats, profile, mut target) in
            players.iter_mut()
        {
            match *intent {
                PlayerIntent::MoveTo(point) => {
                    let position = transform.translation;
                    combat.cancel_approach(position, &mut nav);

                    if combat.dead {
                        continue;
                    }

                    nav.stopping_distance = combat.default_stopping_distance;
                    nav.resume();
                    nav.set_destination(point);
                }
                PlayerIntent::Attack(enemy) => {
                    if combat.dead || enemy == entity {
                        continue;
                    }

                    let Some(enemy_position) = index.position_of(enemy) else {
                        crate::log(&format!(
                            "❓ Player {:?}: attack target {:?} is gone, intent ignored",
                            entity, enemy
                        ));
                        continue;
                    };

                    let position = transform.translation;
                    combat.cancel_approach(position, &mut nav);

                    target.set(Some(enemy));
                    stats.critical_pending = profile.roll_critical(&mut rng.rng);
                    combat.approach = Some(AttackApproach::start(
                        enemy,
                        enemy_position,
                        &mut transform,
                        &mut nav,
                        profile,
                    ));
                }
            }
        }
    }
}

/// Система: один poll AttackApproach за тик
pub fn poll_attack_approach(
    mut players: Query<(
        Entity,
        &mut PlayerCombat,
        &Transform,
        &mut NavigationAgent,
        &mut AnimationFlags,
        &CombatStats,
        &AttackProfile,
    )>,
    index: Res<SpatialIndex>,
    mut triggers: EventWriter<AnimationTriggered>,
) {
    for (entity, mut combat, transform, mut nav, mut flags, stats, profile) in players.iter_mut() {
        let Some(mut approach) = combat.approach else {
            continue;
        };

        if combat.dead {
            combat.cancel_approach(transform.translation, &mut nav);
            continue;
        }

        let target_position = index.position_of(approach.target);
        match approach.poll(transform.translation, target_position, &mut nav, profile) {
            ApproachStatus::Closing => {
                combat.approach = Some(approach);
            }
            ApproachStatus::TargetLost => {
                combat.cancel_approach(transform.translation, &mut nav);
                crate::log(&format!("👻 Player {:?} lost attack target", entity));
            }
            ApproachStatus::InRange => {
                combat.approach = None;

                // На cooldown'е подход просто завершается
                if !combat.can_attack() {
                    continue;
                }

                combat.attack_cooldown = profile.cool_down;
                flags.critical = stats.critical_pending;
                if stats.critical_pending {
                    triggers.write(AnimationTriggered {
                        entity,
                        trigger: AnimationTrigger::Critical,
                    });
                }
                triggers.write(AnimationTriggered {
                    entity,
                    trigger: AnimationTrigger::Attack,
                });
                crate::log(&format!(
                    "🗡️ Player {:?} attacks {:?} after {} polls",
                    entity, approach.target, approach.polls
                ));
            }
        }
    }
}

/// Система: health == 0 → dead, один раз доложить coordinator'у
pub fn detect_player_death(
    mut players: Query<(Entity, &mut PlayerCombat, &CombatStats, &Transform, &mut NavigationAgent)>,
    mut coordinator: ResMut<EncounterCoordinator>,
    mut ended: EventWriter<EncounterEnded>,
) {
    for (entity, mut combat, stats, transform, mut nav) in players.iter_mut() {
        combat.dead = !stats.is_alive();
        if !combat.dead || combat.death_reported {
            continue;
        }

        combat.death_reported = true;
        combat.cancel_approach(transform.translation, &mut nav);
        crate::log_info(&format!("💀 Player {:?} died", entity));

        if let Some(observers) = coordinator.broadcast_end_of_encounter() {
            ended.write(EncounterEnded { observers });
        }
    }
}

/// Система: animation outputs (speed = |velocity|², critical, dead) + cooldown
///
/// Крит снимается hit resolver'ом, поэтому флаг публикуется заново каждый тик.
pub fn tick_player_combat(
    mut players: Query<(&mut PlayerCombat, &NavigationAgent, &CombatStats, &mut AnimationFlags)>,
    time: Res<Time<Fixed>>,
) {
    let delta = time.delta_secs();

    for (mut combat, nav, stats, mut flags) in players.iter_mut() {
        flags.speed = nav.velocity.length_squared();
        flags.critical = stats.critical_pending;
        flags.dead = combat.dead;
        combat.attack_cooldown -= delta;
    }
}
