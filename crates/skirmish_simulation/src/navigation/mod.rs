//! Navigation collaborator boundary
//!
//! Ядро не считает пути. Оно:
//! - пишет intent в `NavigationAgent` (destination / speed / stopped)
//! - спрашивает у navmesh "ближайшая достижимая точка" через `NavMeshQuery`
//!
//! Реальный navmesh живёт во внешнем слое и подключается через `ReachabilitySampler`.

use bevy::prelude::*;

use crate::ai::{refresh_spatial_index, SpatialIndex};
use crate::SimulationSet;

/// Запрос к navmesh: ближайшая достижимая точка в пределах `max_radius`
///
/// None: в радиусе нет проходимой поверхности.
pub trait ReachabilitySampler: Send + Sync + 'static {
    fn sample_reachable(&self, point: Vec3, max_radius: f32) -> Option<Vec3>;
}

/// Открытая местность: любая точка достижима как есть
#[derive(Debug, Clone, Copy, Default)]
pub struct OpenGround;

impl ReachabilitySampler for OpenGround {
    fn sample_reachable(&self, point: Vec3, _max_radius: f32) -> Option<Vec3> {
        Some(point)
    }
}

/// Проходимый прямоугольник (XZ, axis-aligned)
///
/// Точка внутри возвращается как есть, снаружи: проекция на границу,
/// если до неё не дальше `max_radius`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WalkableArea {
    pub min: Vec2,
    pub max: Vec2,
}

impl WalkableArea {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self {
            min: min.min(max),
            max: min.max(max),
        }
    }

    pub fn contains(&self, point: Vec3) -> bool {
        let flat = Vec2::new(point.x, point.z);
        flat.cmpge(self.min).all() && flat.cmple(self.max).all()
    }
}

impl ReachabilitySampler for WalkableArea {
    fn sample_reachable(&self, point: Vec3, max_radius: f32) -> Option<Vec3> {
        let flat = Vec2::new(point.x, point.z);
        let clamped = flat.clamp(self.min, self.max);

        if flat.distance(clamped) <= max_radius {
            Some(Vec3::new(clamped.x, point.y, clamped.y))
        } else {
            None
        }
    }
}

/// Resource: доступ к navmesh для ядра
#[derive(Resource)]
pub struct NavMeshQuery {
    sampler: Box<dyn ReachabilitySampler>,
}

impl Default for NavMeshQuery {
    fn default() -> Self {
        Self::new(OpenGround)
    }
}

impl NavMeshQuery {
    pub fn new(sampler: impl ReachabilitySampler) -> Self {
        Self {
            sampler: Box::new(sampler),
        }
    }

    pub fn sample_reachable(&self, point: Vec3, max_radius: f32) -> Option<Vec3> {
        self.sampler.sample_reachable(point, max_radius)
    }
}

/// Navigation plugin: NavMeshQuery + SpatialIndex (snapshot в начале тика)
///
/// `init_resource` не перетирает NavMeshQuery, вставленный до плагина.
pub struct NavigationPlugin;

impl Plugin for NavigationPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<NavMeshQuery>()
            .init_resource::<SpatialIndex>()
            .add_systems(FixedUpdate, refresh_spatial_index.in_set(SimulationSet::Sense));
    }
}
