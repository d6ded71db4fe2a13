//! Enemy FSM components (state, config, runtime controller).

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::components::{
    AnimationFlags, AttackProfile, AttackTarget, NavigationAgent, PLAYER_FACTION,
};
use crate::config::ProfileError;
use crate::encounter::EncounterObserver;

/// Верхняя граница радиусов врага (метры)
pub const MAX_ENEMY_RADIUS: f32 = 10_000.0;

/// Состояния врага
///
/// Переходы:
/// - любое (кроме Dead) → Chase, если perception нашёл цель
/// - Chase → Guard / Patrol, если цель потеряна (тот же тик)
/// - любое → Dead при health == 0 (терминально)
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Reflect)]
#[reflect(Component)]
pub enum EnemyState {
    /// Стоим на посту, возвращаемся на guard anchor
    #[default]
    Guard,
    /// Бродим по случайным waypoints вокруг anchor
    Patrol,
    /// Преследуем и атакуем цель
    Chase,
    /// Мёртв, ждём despawn
    Dead,
}

/// Параметры врага (data definition, читается при спавне)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyConfig {
    /// Радиус обзора perception
    pub sight_radius: f32,
    /// true: враг стоит на посту (Guard), false: патрулирует
    pub is_guard_post: bool,
    /// Полуразмер квадрата патруля вокруг anchor
    pub patrol_range: f32,
    /// Фракция, которую враг считает целью
    pub hostile_faction: u64,
}

impl Default for EnemyConfig {
    fn default() -> Self {
        Self {
            sight_radius: 10.0,
            is_guard_post: false,
            patrol_range: 8.0,
            hostile_faction: PLAYER_FACTION,
        }
    }
}

impl EnemyConfig {
    /// Радиусы конечные, неотрицательные и не больше `MAX_ENEMY_RADIUS`
    pub fn validate(&self) -> Result<(), ProfileError> {
        for (field, value) in [
            ("sight_radius", self.sight_radius),
            ("patrol_range", self.patrol_range),
        ] {
            if !value.is_finite() {
                return Err(ProfileError::NotFinite { field, value });
            }
            if value < 0.0 {
                return Err(ProfileError::Negative { field, value });
            }
            if value > MAX_ENEMY_RADIUS {
                return Err(ProfileError::TooLarge {
                    field,
                    value,
                    max: MAX_ENEMY_RADIUS,
                });
            }
        }

        Ok(())
    }
}

/// Runtime состояние врага (поведенческий контроллер)
///
/// Текущая цель хранится в общем `AttackTarget` (его же читает hit resolver).
/// Флаги walking / chasing / following публикуются в `AnimationFlags` каждый тик.
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
#[require(EnemyState, AttackTarget, AttackProfile, NavigationAgent, AnimationFlags)]
pub struct EnemyController {
    pub sight_radius: f32,
    pub is_guard_post: bool,
    pub patrol_range: f32,
    pub hostile_faction: u64,

    /// Позиция спавна (не меняется)
    pub guard_anchor: Vec3,
    /// Поворот при спавне (не меняется)
    pub guard_orientation: Quat,
    pub patrol_target: Option<Vec3>,
    /// < 0: можно атаковать
    pub attack_cooldown: f32,

    pub walking: bool,
    pub chasing: bool,
    pub following: bool,
    pub dead: bool,
    pub win: bool,
    /// Encounter закончился: логика больше не тикает
    pub frozen: bool,
    pub despawn_scheduled: bool,
}

impl EnemyController {
    /// Anchor и orientation фиксируются по Transform спавна
    pub fn new(config: &EnemyConfig, spawn: &Transform) -> Self {
        Self {
            sight_radius: config.sight_radius,
            is_guard_post: config.is_guard_post,
            patrol_range: config.patrol_range,
            hostile_faction: config.hostile_faction,
            guard_anchor: spawn.translation,
            guard_orientation: spawn.rotation,
            patrol_target: None,
            attack_cooldown: 0.0,
            walking: false,
            chasing: false,
            following: false,
            dead: false,
            win: false,
            frozen: false,
            despawn_scheduled: false,
        }
    }

    /// Куда возвращаемся без цели (и с чего начинаем)
    pub fn resting_state(&self) -> EnemyState {
        if self.is_guard_post {
            EnemyState::Guard
        } else {
            EnemyState::Patrol
        }
    }

    pub fn can_attack(&self) -> bool {
        self.attack_cooldown < 0.0
    }

    /// Записать флаги в AnimationFlags
    pub fn publish_flags(&self, flags: &mut AnimationFlags, critical: bool) {
        flags.walking = self.walking;
        flags.chasing = self.chasing;
        flags.following = self.following;
        flags.critical = critical;
        flags.dead = self.dead;
        flags.win = self.win;
    }
}

impl EncounterObserver for EnemyController {
    fn on_encounter_end(&mut self) {
        self.win = true;
        self.frozen = true;
        self.walking = false;
        self.chasing = false;
    }
}
