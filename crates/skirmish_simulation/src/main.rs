//! Headless симуляция skirmish'а
//!
//! Игрок атакует голема, патрульный враг подтягивается на шум.
//! Опционально: путь к JSON с SimulationSettings первым аргументом.

use std::time::Duration;

use anyhow::Context;
use bevy::prelude::*;

use skirmish_simulation::{
    enemy_bundle, init_logger, log_info, player_bundle, run_fixed_tick, AttackProfile,
    CombatStats, EncounterCoordinator, EnemyConfig, EnemyState, HeadlessCollaboratorsPlugin,
    KnockbackSkill, NavigationAgent, PlayerIntent, SimulationPlugin, SimulationSettings,
};

const MAX_TICKS: u32 = 3600;

fn main() -> anyhow::Result<()> {
    let settings = match std::env::args().nth(1) {
        Some(path) => SimulationSettings::load(&path)
            .with_context(|| format!("failed to load settings from {path}"))?,
        None => SimulationSettings::default(),
    };

    init_logger();
    log_info(&format!(
        "Starting skirmish headless simulation (seed: {}, {} Hz)",
        settings.seed, settings.tick_hz
    ));

    let tick = Duration::from_secs_f64(1.0 / settings.tick_hz);

    let mut app = App::new();
    app.insert_resource(settings)
        .add_plugins((SimulationPlugin, HeadlessCollaboratorsPlugin));

    let player = app
        .world_mut()
        .spawn(player_bundle(
            Transform::default(),
            CombatStats::new(100, 2),
            AttackProfile {
                min_damage: 10.0,
                max_damage: 18.0,
                attack_range: 1.6,
                cool_down: 0.8,
                ..Default::default()
            },
            NavigationAgent::new(5.0, 0.3),
        ))
        .id();

    let golem = app
        .world_mut()
        .spawn((
            enemy_bundle(
                Transform::from_xyz(0.0, 0.0, -6.0),
                &EnemyConfig {
                    sight_radius: 8.0,
                    is_guard_post: true,
                    ..Default::default()
                },
                CombatStats::new(120, 4),
                AttackProfile {
                    min_damage: 12.0,
                    max_damage: 20.0,
                    attack_range: 1.8,
                    skill_range: 5.0,
                    cool_down: 2.0,
                    ..Default::default()
                },
                NavigationAgent::new(2.5, 0.5),
            ),
            KnockbackSkill::default(),
        ))
        .id();

    app.world_mut().spawn(enemy_bundle(
        Transform::from_xyz(9.0, 0.0, 0.0),
        &EnemyConfig::default(),
        CombatStats::new(40, 1),
        AttackProfile::default(),
        NavigationAgent::new(3.5, 0.5),
    ));

    app.world_mut().send_event(PlayerIntent::Attack(golem));

    for tick_index in 0..MAX_TICKS {
        // Attack intent игрока раз в секунду, пока голем жив
        if tick_index > 0 && tick_index % 60 == 0 && app.world().get_entity(golem).is_ok() {
            app.world_mut().send_event(PlayerIntent::Attack(golem));
        }

        run_fixed_tick(&mut app, tick);

        if tick_index % 60 == 0 {
            let player_health = app.world().get::<CombatStats>(player).map(|s| s.health());
            let golem_state = app.world().get::<EnemyState>(golem).copied();
            log_info(&format!(
                "Tick {}: player HP {:?}, golem {:?}",
                tick_index, player_health, golem_state
            ));
        }

        let encounter_over = app.world().resource::<EncounterCoordinator>().is_terminated();
        if encounter_over || app.world().get_entity(golem).is_err() {
            log_info(&format!("Simulation finished at tick {}", tick_index));
            break;
        }
    }

    Ok(())
}
