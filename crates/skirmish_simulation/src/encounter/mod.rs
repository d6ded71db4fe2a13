//! Encounter lifecycle: реестр observers + однократный broadcast конца боя
//!
//! Поток:
//! 1. Контроллеры регистрируются при появлении компонента (`Added<T>`) и
//!    снимаются при удалении (`RemovedComponents<T>`)
//! 2. Смерть игрока → `EncounterCoordinator::broadcast_end_of_encounter`
//!    (первый вызов возвращает observers, остальные подавляются)
//! 3. `EncounterEnded` event → `deliver_encounter_end::<T>` вызывает
//!    `EncounterObserver::on_encounter_end` у каждого observer'а
//!
//! Coordinator хранит только Entity: конкретные типы контроллеров ему неизвестны.

use bevy::ecs::component::Mutable;
use bevy::prelude::*;

use crate::ai::EnemyController;
use crate::components::{AnimationTrigger, AnimationTriggered, AttackTarget};
use crate::SimulationSet;

/// Capability: реакция на конец encounter'а
pub trait EncounterObserver {
    fn on_encounter_end(&mut self);
}

/// Event: encounter закончился, список observers в порядке регистрации
#[derive(Event, Debug, Clone, PartialEq, Eq)]
pub struct EncounterEnded {
    pub observers: Vec<Entity>,
}

/// Фаза доставки EncounterEnded (внутри SimulationSet::Notify, после детекции смерти)
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EncounterDelivery;

/// Resource: реестр observers одного encounter'а
///
/// Живёт столько же, сколько App: создаётся EncounterPlugin'ом при старте симуляции.
#[derive(Resource, Debug, Default)]
pub struct EncounterCoordinator {
    observers: Vec<Entity>,
    player: Option<Entity>,
    terminated: bool,
    suppressed_broadcasts: u32,
}

impl EncounterCoordinator {
    /// Повторная регистрация: no-op
    pub fn register(&mut self, observer: Entity) {
        if !self.observers.contains(&observer) {
            self.observers.push(observer);
        }
    }

    pub fn unregister(&mut self, observer: Entity) {
        self.observers.retain(|&registered| registered != observer);
    }

    pub fn register_player(&mut self, player: Entity) {
        self.player = Some(player);
    }

    pub fn player(&self) -> Option<Entity> {
        self.player
    }

    pub fn observers(&self) -> &[Entity] {
        &self.observers
    }

    pub fn is_terminated(&self) -> bool {
        self.terminated
    }

    pub fn suppressed_broadcasts(&self) -> u32 {
        self.suppressed_broadcasts
    }

    /// Конец encounter'а: первый вызов возвращает observers, остальные: None
    pub fn broadcast_end_of_encounter(&mut self) -> Option<Vec<Entity>> {
        if self.terminated {
            self.suppressed_broadcasts += 1;
            crate::log_warning(&format!(
                "🔁 Duplicate end-of-encounter broadcast suppressed ({} so far)",
                self.suppressed_broadcasts
            ));
            return None;
        }

        self.terminated = true;
        crate::log_info(&format!(
            "🏁 Encounter over: notifying {} observers",
            self.observers.len()
        ));
        Some(self.observers.clone())
    }
}

/// Система: новые observers → реестр
pub fn register_encounter_observers<T: Component>(
    added: Query<Entity, Added<T>>,
    mut coordinator: ResMut<EncounterCoordinator>,
) {
    for entity in added.iter() {
        coordinator.register(entity);
    }
}

/// Система: удалённые observers (despawn / remove) → из реестра
pub fn unregister_encounter_observers<T: Component>(
    mut removed: RemovedComponents<T>,
    mut coordinator: ResMut<EncounterCoordinator>,
) {
    for entity in removed.read() {
        coordinator.unregister(entity);
    }
}

/// Система: доставка EncounterEnded до каждого observer'а типа `T`
///
/// Цель атаки observer'а сбрасывается вместе с заморозкой.
pub fn deliver_encounter_end<T>(
    mut ended: EventReader<EncounterEnded>,
    mut observers: Query<(&mut T, Option<&mut AttackTarget>)>,
    mut triggers: EventWriter<AnimationTriggered>,
) where
    T: Component<Mutability = Mutable> + EncounterObserver,
{
    for event in ended.read() {
        for &entity in &event.observers {
            let Ok((mut observer, target)) = observers.get_mut(entity) else {
                continue;
            };

            observer.on_encounter_end();
            if let Some(mut target) = target {
                target.clear();
            }
            triggers.write(AnimationTriggered {
                entity,
                trigger: AnimationTrigger::Win,
            });
        }
    }
}

/// Encounter plugin: coordinator + регистрация/доставка для EnemyController
pub struct EncounterPlugin;

impl Plugin for EncounterPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<EncounterCoordinator>()
            .add_event::<EncounterEnded>()
            .configure_sets(FixedUpdate, EncounterDelivery.in_set(SimulationSet::Notify))
            .add_systems(
                FixedUpdate,
                (
                    unregister_encounter_observers::<EnemyController>,
                    register_encounter_observers::<EnemyController>,
                )
                    .chain()
                    .in_set(SimulationSet::Sense),
            )
            .add_systems(
                FixedUpdate,
                deliver_encounter_end::<EnemyController>.in_set(EncounterDelivery),
            );
    }
}
