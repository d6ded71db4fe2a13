//! Базовые компоненты акторов: Actor, CombatStats

use bevy::prelude::*;

use crate::components::CollisionShape;

/// Фракция игрока (perception врагов ищет именно её)
pub const PLAYER_FACTION: u64 = 1;

/// Фракция врагов по умолчанию
pub const ENEMY_FACTION: u64 = 2;

/// Актор (игрок, враг): базовый компонент для живых существ
///
/// Автоматически добавляет CombatStats, CollisionShape, Transform через Required Components.
#[derive(Component, Debug, Clone, Default, Reflect)]
#[reflect(Component)]
#[require(CombatStats, CollisionShape, Transform)]
pub struct Actor {
    /// Тег фракции (perception сравнивает его с hostile_faction)
    pub faction_id: u64,
}

/// Боевые характеристики актора
///
/// Инвариант: 0 ≤ current_health ≤ max_health.
/// current_health == 0: смерть, терминально (регенерации в ядре нет).
/// Ядро меняет health только через DamageResolver (`heal` оставлен внешнему слою).
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Reflect)]
#[reflect(Component)]
pub struct CombatStats {
    pub max_health: u32,
    pub current_health: u32,
    pub base_defence: u32,
    /// Может временно отличаться от base_defence (эффекты живут вне ядра)
    pub current_defence: u32,
    /// Крит для текущей атаки: ставится при старте атаки, снимается при попадании
    pub critical_pending: bool,
}

impl Default for CombatStats {
    fn default() -> Self {
        Self::new(100, 0)
    }
}

impl CombatStats {
    pub fn new(max_health: u32, defence: u32) -> Self {
        Self {
            max_health,
            current_health: max_health,
            base_defence: defence,
            current_defence: defence,
            critical_pending: false,
        }
    }

    pub fn health(&self) -> u32 {
        self.current_health
    }

    pub fn defence(&self) -> u32 {
        self.current_defence
    }

    pub fn is_alive(&self) -> bool {
        self.current_health > 0
    }

    /// Health clamp'ится в 0, отрицательного здоровья не бывает
    pub fn apply_damage(&mut self, amount: u32) {
        self.current_health = self.current_health.saturating_sub(amount);
    }

    /// API для внешних коллабораторов (зелья, скрипты уровня): ядро само не лечит.
    ///
    /// Мёртвого не поднимает: health == 0 терминально.
    pub fn heal(&mut self, amount: u32) {
        if !self.is_alive() {
            return;
        }

        self.current_health = self.current_health.saturating_add(amount).min(self.max_health);
    }
}
