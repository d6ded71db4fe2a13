//! Player control marker component

use bevy::prelude::Component;

/// Marker component для player-controlled entity
///
/// Акторы БЕЗ этого компонента управляются AI systems.
/// Player получает команды через `PlayerIntent` events (move-to / attack).
///
/// # Single-player
/// Обычно только один entity имеет этот компонент; его смерть заканчивает encounter.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Player;
