//! Тесты детерминизма
//!
//! Все броски (урон, крит, patrol waypoints) идут через DeterministicRng:
//! одинаковый seed → идентичный мир.

use std::time::Duration;

use bevy::prelude::*;
use skirmish_simulation::*;

const TICK: Duration = Duration::from_millis(250);

/// Запускает skirmish (игрок + патрульные враги) и возвращает snapshot мира
fn run_simulation(seed: u64, enemy_count: usize, tick_count: usize) -> Vec<u8> {
    let mut app = create_headless_app(seed);
    app.add_plugins((SimulationPlugin, HeadlessCollaboratorsPlugin));

    app.world_mut().spawn(player_bundle(
        Transform::default(),
        CombatStats::new(200, 2),
        AttackProfile::default(),
        NavigationAgent::new(4.0, 0.3),
    ));

    for i in 0..enemy_count {
        let angle = i as f32 * std::f32::consts::TAU / enemy_count as f32;
        app.world_mut().spawn(enemy_bundle(
            Transform::from_xyz(angle.cos() * 12.0, 0.0, angle.sin() * 12.0),
            &EnemyConfig {
                sight_radius: 4.0,
                patrol_range: 10.0,
                ..Default::default()
            },
            CombatStats::new(40, 1),
            AttackProfile {
                critical_chance: 0.3,
                ..Default::default()
            },
            NavigationAgent::new(3.0, 0.5),
        ));
    }

    for _ in 0..tick_count {
        run_fixed_tick(&mut app, TICK);
    }

    let mut snapshot = world_snapshot::<Transform>(app.world_mut());
    snapshot.extend(world_snapshot::<CombatStats>(app.world_mut()));
    snapshot.extend(world_snapshot::<EnemyController>(app.world_mut()));
    snapshot
}

#[test]
fn test_determinism_same_seed() {
    const SEED: u64 = 12345;

    let snapshot1 = run_simulation(SEED, 6, 400);
    let snapshot2 = run_simulation(SEED, 6, 400);

    assert_eq!(
        snapshot1, snapshot2,
        "Симуляция с одинаковым seed ({}) дала разные результаты!",
        SEED
    );
}

#[test]
fn test_determinism_multiple_runs() {
    const SEED: u64 = 42;

    let snapshots: Vec<_> = (0..4).map(|_| run_simulation(SEED, 4, 200)).collect();

    for (i, snapshot) in snapshots.iter().enumerate().skip(1) {
        assert_eq!(
            snapshots[0], *snapshot,
            "Прогон {} дал результат отличный от прогона 0",
            i
        );
    }
}

#[test]
fn test_different_seeds_diverge() {
    // Патрульные точки зависят от seed
    let snapshot1 = run_simulation(1, 4, 40);
    let snapshot2 = run_simulation(2, 4, 40);

    assert_ne!(snapshot1, snapshot2);
}
