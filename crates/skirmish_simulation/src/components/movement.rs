//! Movement компоненты: навигационный intent, коллайдер

use bevy::prelude::*;

/// Навигационный агент (выполняется внешним NavigationAgent / navmesh)
///
/// Архитектура:
/// - ECS системы пишут intent: destination, speed, stopped, stopping_distance
/// - Внешний слой двигает Transform и пишет обратно velocity
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub struct NavigationAgent {
    /// Куда идти (None: цели ещё не было)
    pub destination: Option<Vec3>,
    /// Текущая скорость (patrol режет её вдвое)
    pub speed: f32,
    /// Номинальная скорость, снятая при спавне
    pub nominal_speed: f32,
    /// true: движение приостановлено (isStopped)
    pub stopped: bool,
    pub stopping_distance: f32,
    /// Фактическая скорость (пишет внешний агент или knockback)
    pub velocity: Vec3,
}

impl Default for NavigationAgent {
    fn default() -> Self {
        Self::new(3.5, 0.5)
    }
}

impl NavigationAgent {
    pub fn new(nominal_speed: f32, stopping_distance: f32) -> Self {
        Self {
            destination: None,
            speed: nominal_speed,
            nominal_speed,
            stopped: false,
            stopping_distance,
            velocity: Vec3::ZERO,
        }
    }

    pub fn set_destination(&mut self, target: Vec3) {
        self.destination = Some(target);
    }

    pub fn resume(&mut self) {
        self.stopped = false;
    }

    pub fn halt(&mut self) {
        self.stopped = true;
    }

    /// Скорость как доля номинальной
    pub fn set_speed_factor(&mut self, factor: f32) {
        self.speed = self.nominal_speed * factor;
    }
}

/// Коллайдер актора (для perception overlap-запросов)
///
/// Мёртвые акторы выключают коллайдер и обнуляют радиус: perception их больше не видит.
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub struct CollisionShape {
    pub enabled: bool,
    pub radius: f32,
}

impl Default for CollisionShape {
    fn default() -> Self {
        Self {
            enabled: true,
            radius: 0.5,
        }
    }
}

impl CollisionShape {
    pub fn disable(&mut self) {
        self.enabled = false;
        self.radius = 0.0;
    }
}
