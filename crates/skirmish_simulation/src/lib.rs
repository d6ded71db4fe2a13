//! Skirmish Simulation Core
//!
//! ECS-симуляция на Bevy 0.16: поведение врагов, боевая математика,
//! протокол завершения encounter'а.
//!
//! HYBRID ARCHITECTURE:
//! - ECS = strategic layer (AI state machine, combat rules, encounter lifecycle)
//! - Внешние коллабораторы = tactical layer (navmesh, физика, анимация, ввод)
//!
//! Ядро общается с tactical layer только через intent-компоненты
//! (`NavigationAgent`, `AnimationFlags`), events (`AnimationTriggered`, `HitSignal`,
//! `PlayerIntent`) и resources (`SpatialIndex`, `NavMeshQuery`).

use std::time::Duration;

use bevy::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

// Публичные модули
pub mod actor;
pub mod ai;
pub mod combat;
pub mod components;
pub mod config;
pub mod encounter;
pub mod headless;
pub mod logger;
pub mod navigation;
pub mod player;

// Re-export базовых типов для удобства
pub use actor::{enemy_bundle, player_bundle};
pub use ai::{find_hostile, AIPlugin, EnemyConfig, EnemyController, EnemyState, SpatialIndex};
pub use combat::{
    CombatPlugin, DamageDealt, DamageResolver, DespawnAfter, EntityDied, HitKind, HitSignal,
    KnockbackSkill, ProjectileLaunched,
};
pub use components::*;
pub use config::{ConfigError, SimulationSettings};
pub use encounter::{EncounterCoordinator, EncounterEnded, EncounterObserver, EncounterPlugin};
pub use headless::HeadlessCollaboratorsPlugin;
pub use logger::{init_logger, log, log_error, log_info, log_warning};
pub use navigation::{NavMeshQuery, NavigationPlugin, OpenGround, ReachabilitySampler, WalkableArea};
pub use player::{AttackApproach, PlayerCombat, PlayerIntent, PlayerPlugin};

/// Порядок фаз одного simulation тика (FixedUpdate)
///
/// Фазы выполняются строго последовательно (`chain`), поэтому два набора систем
/// никогда не мутируют одно и то же состояние одновременно.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SimulationSet {
    /// Snapshot мира (spatial index) + регистрация observers
    Sense,
    /// Player intents + poll attack approach
    Intent,
    /// Enemy state machine
    Decide,
    /// Hit signals → урон
    Resolve,
    /// Смерть игрока → broadcast → доставка observers
    Notify,
    /// Grace таймеры, despawn
    Cleanup,
}

/// Главный plugin симуляции (объединяет все подсистемы)
///
/// Берёт `SimulationSettings` из мира, если их вставили до плагина,
/// иначе использует значения по умолчанию.
pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        let settings = app
            .world()
            .get_resource::<SimulationSettings>()
            .cloned()
            .unwrap_or_default();

        app
            // Fixed timestep для simulation tick
            .insert_resource(Time::<Fixed>::from_hz(settings.tick_hz))
            // Детерминистичный RNG (все броски: урон, крит, waypoints)
            .insert_resource(DeterministicRng::new(settings.seed))
            .insert_resource(settings)
            .add_event::<AnimationTriggered>()
            .configure_sets(
                FixedUpdate,
                (
                    SimulationSet::Sense,
                    SimulationSet::Intent,
                    SimulationSet::Decide,
                    SimulationSet::Resolve,
                    SimulationSet::Notify,
                    SimulationSet::Cleanup,
                )
                    .chain(),
            )
            // Подсистемы (ECS strategic layer)
            .add_plugins((
                NavigationPlugin,
                CombatPlugin,
                AIPlugin,
                PlayerPlugin,
                EncounterPlugin,
            ));
    }
}

/// Детерминистичный RNG resource (seeded)
#[derive(Resource)]
pub struct DeterministicRng {
    pub rng: ChaCha8Rng,
    pub seed: u64,
}

impl DeterministicRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }
}

/// Создаёт minimal Bevy App для headless симуляции
///
/// Settings с заданным seed вставляются до `SimulationPlugin`, так что плагин их подхватит.
pub fn create_headless_app(seed: u64) -> App {
    let mut app = App::new();
    init_logger();
    app.add_plugins(MinimalPlugins).insert_resource(SimulationSettings {
        seed,
        ..Default::default()
    });

    app
}

/// Один fixed тик без реального времени: сдвигаем `Time<Fixed>` на `delta` и гоняем FixedUpdate
///
/// Для тестов и пошаговых демо, где важна точная длина тика.
pub fn run_fixed_tick(app: &mut App, delta: Duration) {
    app.world_mut().resource_mut::<Time<Fixed>>().advance_by(delta);
    app.world_mut().run_schedule(FixedUpdate);
}

/// Snapshot мира для сравнения детерминизма
/// (упрощённая версия: Debug-представление компонентов в порядке Entity ID)
pub fn world_snapshot<T: Component>(world: &mut World) -> Vec<u8>
where
    T: std::fmt::Debug,
{
    let mut snapshot = Vec::new();

    let mut query = world.query::<(Entity, &T)>();
    let mut entities: Vec<_> = query.iter(world).collect();

    // Сортируем по Entity ID для детерминизма
    entities.sort_by_key(|(entity, _)| entity.index());

    for (entity, component) in entities {
        snapshot.extend_from_slice(&entity.index().to_le_bytes());
        snapshot.extend_from_slice(format!("{:?}", component).as_bytes());
    }

    snapshot
}
