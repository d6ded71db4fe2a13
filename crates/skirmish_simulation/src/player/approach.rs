//! AttackApproach: отменяемая задача "подойти и ударить"
//!
//! Не корутина: явный объект с прогрессом, контроллер игрока poll'ит его раз в тик.
//! Отмена (новый move-to, смерть, пропавшая цель) синхронно останавливает движение.

use bevy::prelude::*;

use crate::components::{AttackProfile, NavigationAgent};

/// Результат одного poll'а
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApproachStatus {
    /// Ещё далеко, destination обновлён на live позицию цели
    Closing,
    /// В радиусе атаки, движение остановлено
    InRange,
    /// Цели больше нет в мире
    TargetLost,
}

/// Задача подхода к цели
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub struct AttackApproach {
    pub target: Entity,
    /// Сколько раз задачу уже poll'или
    pub polls: u32,
}

impl AttackApproach {
    /// Старт: движение возобновлено, stopping distance = attack range, разворот к цели
    pub fn start(
        target: Entity,
        target_position: Vec3,
        transform: &mut Transform,
        nav: &mut NavigationAgent,
        profile: &AttackProfile,
    ) -> Self {
        nav.resume();
        nav.stopping_distance = profile.attack_range;
        transform.look_at(target_position, Vec3::Y);

        Self { target, polls: 0 }
    }

    pub fn poll(
        &mut self,
        position: Vec3,
        target_position: Option<Vec3>,
        nav: &mut NavigationAgent,
        profile: &AttackProfile,
    ) -> ApproachStatus {
        self.polls += 1;

        let Some(target_position) = target_position else {
            return ApproachStatus::TargetLost;
        };

        if position.distance(target_position) > profile.attack_range {
            nav.set_destination(target_position);
            return ApproachStatus::Closing;
        }

        nav.halt();
        ApproachStatus::InRange
    }

    /// Отмена: стоп + destination = текущая позиция
    pub fn cancel(self, position: Vec3, nav: &mut NavigationAgent) {
        nav.halt();
        nav.set_destination(position);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile() -> AttackProfile {
        AttackProfile {
            attack_range: 2.0,
            ..Default::default()
        }
    }

    #[test]
    fn test_start_configures_navigation() {
        let mut transform = Transform::default();
        let mut nav = NavigationAgent::new(5.0, 0.5);
        nav.halt();
        let target_position = Vec3::new(6.0, 0.0, 0.0);

        let approach = AttackApproach::start(
            Entity::from_raw(4),
            target_position,
            &mut transform,
            &mut nav,
            &profile(),
        );

        assert_eq!(approach.polls, 0);
        assert!(!nav.stopped);
        assert_eq!(nav.stopping_distance, 2.0);
        assert!(crate::combat::is_facing_target(&transform, target_position, 0.99));
    }

    #[test]
    fn test_poll_closes_then_reaches_range() {
        let mut nav = NavigationAgent::new(5.0, 0.5);
        let mut approach = AttackApproach {
            target: Entity::from_raw(4),
            polls: 0,
        };
        let target_position = Vec3::new(6.0, 0.0, 0.0);

        let status = approach.poll(Vec3::ZERO, Some(target_position), &mut nav, &profile());
        assert_eq!(status, ApproachStatus::Closing);
        assert_eq!(nav.destination, Some(target_position));
        assert!(!nav.stopped);

        let status = approach.poll(Vec3::new(4.5, 0.0, 0.0), Some(target_position), &mut nav, &profile());
        assert_eq!(status, ApproachStatus::InRange);
        assert!(nav.stopped);
        assert_eq!(approach.polls, 2);
    }

    #[test]
    fn test_poll_reports_lost_target() {
        let mut nav = NavigationAgent::default();
        let mut approach = AttackApproach {
            target: Entity::from_raw(4),
            polls: 0,
        };

        assert_eq!(
            approach.poll(Vec3::ZERO, None, &mut nav, &profile()),
            ApproachStatus::TargetLost
        );
    }

    #[test]
    fn test_cancel_halts_in_place() {
        let mut nav = NavigationAgent::default();
        nav.set_destination(Vec3::new(10.0, 0.0, 10.0));
        let approach = AttackApproach {
            target: Entity::from_raw(4),
            polls: 3,
        };

        approach.cancel(Vec3::new(1.0, 0.0, 2.0), &mut nav);

        assert!(nav.stopped);
        assert_eq!(nav.destination, Some(Vec3::new(1.0, 0.0, 2.0)));
    }
}
