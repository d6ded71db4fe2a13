//! Actor domain: сборка entity врага и игрока
//!
//! Содержит:
//! - enemy_bundle (Actor + EnemyController + начальное состояние)
//! - player_bundle (Actor + PlayerCombat)
//! - ActorDefinition (data definition целиком, JSON → bundle)
//!
//! Bundle'ы работают и с `Commands::spawn`, и с `World::spawn`.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::ai::{EnemyConfig, EnemyController};
use crate::components::{
    Actor, AnimationFlags, AttackProfile, AttackTarget, CollisionShape, CombatStats,
    NavigationAgent, Player, ENEMY_FACTION, PLAYER_FACTION,
};
use crate::config::{AttackData, CharacterData, ConfigError};
use crate::player::PlayerCombat;

/// Враг: guard anchor и orientation снимаются с `transform`
pub fn enemy_bundle(
    transform: Transform,
    config: &EnemyConfig,
    stats: CombatStats,
    profile: AttackProfile,
    navigation: NavigationAgent,
) -> impl Bundle {
    let controller = EnemyController::new(config, &transform);
    let state = controller.resting_state();

    (
        Actor {
            faction_id: ENEMY_FACTION,
        },
        transform,
        stats,
        profile,
        navigation,
        controller,
        state,
        AttackTarget::default(),
        AnimationFlags::default(),
        CollisionShape::default(),
    )
}

/// Игрок: stopping distance навигации запоминается как default для move-to
pub fn player_bundle(
    transform: Transform,
    stats: CombatStats,
    profile: AttackProfile,
    navigation: NavigationAgent,
) -> impl Bundle {
    (
        Actor {
            faction_id: PLAYER_FACTION,
        },
        Player,
        PlayerCombat::new(navigation.stopping_distance),
        transform,
        stats,
        profile,
        navigation,
        AttackTarget::default(),
        AnimationFlags::default(),
        CollisionShape::default(),
    )
}

/// Полное описание актора из data слоя
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActorDefinition {
    pub character: CharacterData,
    pub attack: AttackData,
    #[serde(default = "default_move_speed")]
    pub move_speed: f32,
    #[serde(default = "default_stopping_distance")]
    pub stopping_distance: f32,
    /// Только для врагов
    #[serde(default)]
    pub enemy: EnemyConfig,
}

fn default_move_speed() -> f32 {
    NavigationAgent::default().nominal_speed
}

fn default_stopping_distance() -> f32 {
    NavigationAgent::default().stopping_distance
}

impl ActorDefinition {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let definition: Self = serde_json::from_str(json)?;
        definition.resolve()?;
        Ok(definition)
    }

    /// Валидированные stats + profile (заодно проверяется EnemyConfig)
    pub fn resolve(&self) -> Result<(CombatStats, AttackProfile), ConfigError> {
        self.enemy.validate()?;
        Ok((self.character.to_stats()?, self.attack.to_profile()?))
    }

    pub fn navigation(&self) -> NavigationAgent {
        NavigationAgent::new(self.move_speed, self.stopping_distance)
    }

    pub fn enemy_bundle(&self, transform: Transform) -> Result<impl Bundle, ConfigError> {
        let (stats, profile) = self.resolve()?;
        Ok(enemy_bundle(transform, &self.enemy, stats, profile, self.navigation()))
    }

    pub fn player_bundle(&self, transform: Transform) -> Result<impl Bundle, ConfigError> {
        let (stats, profile) = self.resolve()?;
        Ok(player_bundle(transform, stats, profile, self.navigation()))
    }
}
