//! ECS Components для игровых entity
//!
//! Организация по доменам:
//! - actor: базовые характеристики (faction, CombatStats)
//! - combat: профиль атаки и текущая цель (AttackProfile, AttackTarget)
//! - movement: навигационный intent и коллайдер (NavigationAgent, CollisionShape)
//! - animation: флаги и триггеры для внешнего animation слоя
//! - player: player control marker (Player)

pub mod actor;
pub mod animation;
pub mod combat;
pub mod movement;
pub mod player;

// Re-exports для удобного импорта
pub use actor::*;
pub use animation::*;
pub use combat::*;
pub use movement::*;
pub use player::*;
