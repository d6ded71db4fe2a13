//! Perception: spatial index + поиск враждебной цели
//!
//! `SpatialIndex`: snapshot позиций/коллайдеров, снятый в начале тика (SimulationSet::Sense).
//! Все агенты в тике читают один и тот же snapshot, даже если кто-то уже
//! поменял свой Transform.

use bevy::prelude::*;

use crate::components::{Actor, CollisionShape};

/// Запись spatial index'а: один живой коллайдер
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpatialEntry {
    pub entity: Entity,
    pub faction_id: u64,
    pub position: Vec3,
    pub radius: f32,
}

/// Resource: overlap-sphere примитив над snapshot'ом мира
///
/// Записи отсортированы по Entity: порядок детерминирован, но НЕ nearest-first.
#[derive(Resource, Debug, Default)]
pub struct SpatialIndex {
    entries: Vec<SpatialEntry>,
}

impl SpatialIndex {
    /// Пересобрать snapshot (выключенные коллайдеры отбрасываются)
    pub fn rebuild(&mut self, entries: impl IntoIterator<Item = SpatialEntry>) {
        self.entries.clear();
        self.entries.extend(entries);
        self.entries.sort_by_key(|entry| entry.entity);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Коллайдеры, пересекающие сферу (center, radius)
    pub fn query_within(&self, center: Vec3, radius: f32) -> impl Iterator<Item = &SpatialEntry> {
        self.entries
            .iter()
            .filter(move |entry| entry.position.distance(center) <= radius + entry.radius)
    }

    /// Позиция entity на начало тика (None: entity нет или коллайдер выключен)
    pub fn position_of(&self, entity: Entity) -> Option<Vec3> {
        self.entries
            .iter()
            .find(|entry| entry.entity == entity)
            .map(|entry| entry.position)
    }
}

/// Первая враждебная цель в радиусе
///
/// `observer` никогда не возвращается. Побочных эффектов нет.
pub fn find_hostile(
    index: &SpatialIndex,
    origin: Vec3,
    radius: f32,
    observer: Entity,
    hostile_faction: u64,
) -> Option<Entity> {
    index
        .query_within(origin, radius)
        .filter(|entry| entry.entity != observer)
        .find(|entry| entry.faction_id == hostile_faction)
        .map(|entry| entry.entity)
}

/// Система: snapshot Transform + CollisionShape → SpatialIndex
pub fn refresh_spatial_index(
    actors: Query<(Entity, &Actor, &Transform, &CollisionShape)>,
    mut index: ResMut<SpatialIndex>,
) {
    index.rebuild(
        actors
            .iter()
            .filter(|(_, _, _, shape)| shape.enabled)
            .map(|(entity, actor, transform, shape)| SpatialEntry {
                entity,
                faction_id: actor.faction_id,
                position: transform.translation,
                radius: shape.radius,
            }),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{ENEMY_FACTION, PLAYER_FACTION};
    use bevy::ecs::system::RunSystemOnce;

    fn entry(index: u32, faction_id: u64, position: Vec3) -> SpatialEntry {
        SpatialEntry {
            entity: Entity::from_raw(index),
            faction_id,
            position,
            radius: 0.5,
        }
    }

    #[test]
    fn test_find_hostile_respects_faction_and_radius() {
        let mut index = SpatialIndex::default();
        index.rebuild([
            entry(1, ENEMY_FACTION, Vec3::ZERO),
            entry(2, ENEMY_FACTION, Vec3::new(2.0, 0.0, 0.0)),
            entry(3, PLAYER_FACTION, Vec3::new(5.0, 0.0, 0.0)),
        ]);

        let observer = Entity::from_raw(1);

        // 5.0 <= 4.0 + 0.5? нет
        assert_eq!(find_hostile(&index, Vec3::ZERO, 4.0, observer, PLAYER_FACTION), None);
        // 5.0 <= 4.5 + 0.5: коллайдер касается сферы
        assert_eq!(
            find_hostile(&index, Vec3::ZERO, 4.5, observer, PLAYER_FACTION),
            Some(Entity::from_raw(3))
        );
    }

    #[test]
    fn test_find_hostile_never_returns_observer() {
        let mut index = SpatialIndex::default();
        index.rebuild([entry(7, PLAYER_FACTION, Vec3::ZERO)]);

        let observer = Entity::from_raw(7);
        assert_eq!(find_hostile(&index, Vec3::ZERO, 10.0, observer, PLAYER_FACTION), None);
    }

    #[test]
    fn test_entries_kept_in_entity_order() {
        let mut index = SpatialIndex::default();
        index.rebuild([
            entry(9, PLAYER_FACTION, Vec3::new(1.0, 0.0, 0.0)),
            entry(4, PLAYER_FACTION, Vec3::new(3.0, 0.0, 0.0)),
        ]);

        // Не ближайший, а первый по Entity
        let found = find_hostile(&index, Vec3::ZERO, 10.0, Entity::from_raw(1), PLAYER_FACTION);
        assert_eq!(found, Some(Entity::from_raw(4)));
    }

    #[test]
    fn test_position_of_missing_entity() {
        let mut index = SpatialIndex::default();
        index.rebuild([entry(1, ENEMY_FACTION, Vec3::ONE)]);

        assert_eq!(index.position_of(Entity::from_raw(1)), Some(Vec3::ONE));
        assert_eq!(index.position_of(Entity::from_raw(2)), None);
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn test_disabled_colliders_not_indexed() {
        let mut world = World::new();
        world.init_resource::<SpatialIndex>();

        let alive = world
            .spawn((
                Actor { faction_id: PLAYER_FACTION },
                Transform::default(),
                CollisionShape::default(),
            ))
            .id();
        let mut corpse_shape = CollisionShape::default();
        corpse_shape.disable();
        world.spawn((
            Actor { faction_id: PLAYER_FACTION },
            Transform::default(),
            corpse_shape,
        ));

        let _ = world.run_system_once(refresh_spatial_index);

        let index = world.resource::<SpatialIndex>();
        assert_eq!(index.len(), 1);
        assert_eq!(index.position_of(alive), Some(Vec3::ZERO));
    }
}
