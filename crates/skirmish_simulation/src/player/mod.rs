//! Player combat controller
//!
//! Не state machine: два intent'а от input слоя.
//! - `MoveTo(point)`: отменяет текущий подход, идём в точку
//! - `Attack(entity)`: бросок крита + новая `AttackApproach` задача
//!
//! Урон применяется тем же facing-validated HitSignal путём, что и у врагов.

use bevy::prelude::*;

pub mod approach;
pub mod systems;

pub use approach::{ApproachStatus, AttackApproach};
pub use systems::{
    detect_player_death, poll_attack_approach, process_player_intents, register_players,
    tick_player_combat,
};

use crate::components::{AnimationFlags, AttackProfile, AttackTarget, NavigationAgent, Player};
use crate::encounter::EncounterDelivery;
use crate::SimulationSet;

/// Event: команда игрока (уже переведённая из pointer → world)
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub enum PlayerIntent {
    MoveTo(Vec3),
    Attack(Entity),
}

/// Runtime состояние игрока
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
#[require(Player, AttackTarget, AttackProfile, NavigationAgent, AnimationFlags)]
pub struct PlayerCombat {
    /// < 0: можно атаковать
    pub attack_cooldown: f32,
    /// Stopping distance для обычного move-to (approach её подменяет)
    pub default_stopping_distance: f32,
    pub dead: bool,
    /// Смерть уже доложена coordinator'у
    pub death_reported: bool,
    pub approach: Option<AttackApproach>,
}

impl Default for PlayerCombat {
    fn default() -> Self {
        Self::new(NavigationAgent::default().stopping_distance)
    }
}

impl PlayerCombat {
    pub fn new(default_stopping_distance: f32) -> Self {
        Self {
            attack_cooldown: 0.0,
            default_stopping_distance,
            dead: false,
            death_reported: false,
            approach: None,
        }
    }

    pub fn can_attack(&self) -> bool {
        self.attack_cooldown < 0.0
    }

    /// Отменить текущий подход (если есть) с синхронной остановкой движения
    pub fn cancel_approach(&mut self, position: Vec3, nav: &mut NavigationAgent) {
        if let Some(approach) = self.approach.take() {
            approach.cancel(position, nav);
        }
    }
}

/// Player plugin
///
/// Порядок внутри тика:
/// - Sense: регистрация игрока в coordinator
/// - Intent: intents → poll approach
/// - Notify: детекция смерти (до доставки EncounterEnded)
/// - Cleanup: animation speed + cooldown
pub struct PlayerPlugin;

impl Plugin for PlayerPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<PlayerIntent>()
            .add_systems(FixedUpdate, register_players.in_set(SimulationSet::Sense))
            .add_systems(
                FixedUpdate,
                (process_player_intents, poll_attack_approach)
                    .chain()
                    .in_set(SimulationSet::Intent),
            )
            .add_systems(
                FixedUpdate,
                detect_player_death
                    .in_set(SimulationSet::Notify)
                    .before(EncounterDelivery),
            )
            .add_systems(FixedUpdate, tick_player_combat.in_set(SimulationSet::Cleanup));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_player_cannot_attack_immediately() {
        let combat = PlayerCombat::new(0.3);
        assert!(!combat.can_attack());
        assert_eq!(combat.default_stopping_distance, 0.3);
        assert!(combat.approach.is_none());
    }

    #[test]
    fn test_cancel_without_approach_keeps_navigation() {
        let mut combat = PlayerCombat::default();
        let mut nav = NavigationAgent::default();
        nav.set_destination(Vec3::X);

        combat.cancel_approach(Vec3::ZERO, &mut nav);

        assert!(!nav.stopped);
        assert_eq!(nav.destination, Some(Vec3::X));
    }

    #[test]
    fn test_cancel_with_approach_halts() {
        let mut combat = PlayerCombat::default();
        combat.approach = Some(AttackApproach {
            target: Entity::from_raw(1),
            polls: 2,
        });
        let mut nav = NavigationAgent::default();

        combat.cancel_approach(Vec3::ONE, &mut nav);

        assert!(combat.approach.is_none());
        assert!(nav.stopped);
        assert_eq!(nav.destination, Some(Vec3::ONE));
    }
}
