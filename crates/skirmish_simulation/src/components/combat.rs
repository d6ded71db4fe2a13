//! Combat компоненты: AttackProfile, AttackTarget

use bevy::prelude::*;
use rand::Rng;

/// Статический профиль атаки персонажа (приходит из AttackData при спавне)
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub struct AttackProfile {
    /// Нижняя граница damage roll (включительно)
    pub min_damage: f32,
    /// Верхняя граница damage roll (исключительно)
    pub max_damage: f32,
    pub critical_multiplier: f32,
    /// Шанс крита [0, 1]
    pub critical_chance: f32,
    /// Секунды между атаками
    pub cool_down: f32,
    /// Дистанция ближней атаки
    pub attack_range: f32,
    /// Дистанция skill-атаки (обычно больше attack_range)
    pub skill_range: f32,
}

impl Default for AttackProfile {
    fn default() -> Self {
        Self {
            min_damage: 5.0,
            max_damage: 10.0,
            critical_multiplier: 2.0,
            critical_chance: 0.2,
            cool_down: 1.0,
            attack_range: 1.5,
            skill_range: 0.0,
        }
    }
}

impl AttackProfile {
    pub fn in_attack_range(&self, distance: f32) -> bool {
        distance <= self.attack_range
    }

    pub fn in_skill_range(&self, distance: f32) -> bool {
        distance <= self.skill_range
    }

    /// Бросок крита: один раз на цикл cooldown'а, не каждый тик
    pub fn roll_critical<R: Rng + ?Sized>(&self, rng: &mut R) -> bool {
        rng.gen::<f32>() < self.critical_chance
    }
}

/// Текущая цель атаки (общая для врагов и игрока)
///
/// Hit signal резолвится против этой цели. None: любой hit игнорируется.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Eq, Reflect)]
#[reflect(Component)]
pub struct AttackTarget(pub Option<Entity>);

impl AttackTarget {
    pub fn get(&self) -> Option<Entity> {
        self.0
    }

    pub fn set(&mut self, target: Option<Entity>) {
        self.0 = target;
    }

    pub fn clear(&mut self) {
        self.0 = None;
    }
}
