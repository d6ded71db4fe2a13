//! Animation intent: булевы флаги + одноразовые триггеры
//!
//! Ядро только пишет флаги/триггеры. Проигрывание и blending: внешний слой,
//! состояние анимации обратно не читается.

use bevy::prelude::*;

/// Флаги анимации, публикуются каждый тик
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct AnimationFlags {
    pub walking: bool,
    pub chasing: bool,
    pub following: bool,
    pub critical: bool,
    pub dead: bool,
    pub win: bool,
    /// Квадрат скорости (blend-параметр игрока)
    pub speed: f32,
}

/// Одноразовые триггеры анимации
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect)]
pub enum AnimationTrigger {
    Attack,
    Skill,
    Dizzy,
    Win,
    Death,
    Critical,
}

/// Event: триггер анимации для entity
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnimationTriggered {
    pub entity: Entity,
    pub trigger: AnimationTrigger,
}
