//! Конфигурация симуляции + data definitions персонажей
//!
//! - `SimulationSettings`: Resource с глобальными параметрами тика (seed, частота, задержки)
//! - `definitions`: CharacterData / AttackData (внешние данные → CombatStats / AttackProfile)
//!
//! Ошибки типизированы только здесь: во время тика ядро ничего не "фейлит".

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod definitions;

pub use definitions::{AttackData, CharacterData, ProfileError};

/// Ошибки загрузки/валидации конфигурации
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("tick rate must be positive, got {0}")]
    InvalidTickRate(f64),

    #[error("{field} must be within [{min}, {max}], got {value}")]
    OutOfRange {
        field: &'static str,
        value: f32,
        min: f32,
        max: f32,
    },

    #[error(transparent)]
    Profile(#[from] ProfileError),
}

/// Глобальные параметры симуляции
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationSettings {
    /// Seed для DeterministicRng
    pub seed: u64,
    /// Частота FixedUpdate (Hz)
    pub tick_hz: f64,
    /// Сколько секунд труп остаётся в мире (death animation)
    pub corpse_despawn_delay: f32,
    /// Порог dot(forward, to_target) для "смотрит на цель"
    pub facing_dot_threshold: f32,
    /// Множитель скорости в патруле
    pub patrol_speed_factor: f32,
    /// Доля поворота к guard orientation за тик
    pub guard_turn_blend: f32,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            seed: 42,
            tick_hz: 60.0,
            corpse_despawn_delay: 2.0,
            facing_dot_threshold: 0.5,
            patrol_speed_factor: 0.5,
            guard_turn_blend: 0.01,
        }
    }
}

impl SimulationSettings {
    /// Парсинг + валидация из JSON (отсутствующие поля берутся из Default)
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn load(path: impl AsRef<std::path::Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.tick_hz > 0.0) {
            return Err(ConfigError::InvalidTickRate(self.tick_hz));
        }

        check_range("corpse_despawn_delay", self.corpse_despawn_delay, 0.0, f32::MAX)?;
        check_range("facing_dot_threshold", self.facing_dot_threshold, -1.0, 1.0)?;
        check_range("patrol_speed_factor", self.patrol_speed_factor, 0.0, 1.0)?;
        check_range("guard_turn_blend", self.guard_turn_blend, 0.0, 1.0)?;

        Ok(())
    }
}

fn check_range(field: &'static str, value: f32, min: f32, max: f32) -> Result<(), ConfigError> {
    // NaN тоже отбрасываем
    if value >= min && value <= max {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            field,
            value,
            min,
            max,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let settings = SimulationSettings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.corpse_despawn_delay, 2.0);
        assert_eq!(settings.patrol_speed_factor, 0.5);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings = SimulationSettings::from_json(r#"{ "seed": 7, "tick_hz": 30.0 }"#)
            .expect("valid settings");
        assert_eq!(settings.seed, 7);
        assert_eq!(settings.tick_hz, 30.0);
        assert_eq!(settings.facing_dot_threshold, 0.5);
    }

    #[test]
    fn test_invalid_tick_rate_rejected() {
        let err = SimulationSettings::from_json(r#"{ "tick_hz": 0.0 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidTickRate(_)));
    }

    #[test]
    fn test_out_of_range_field_rejected() {
        let err = SimulationSettings::from_json(r#"{ "patrol_speed_factor": 1.5 }"#).unwrap_err();
        match err {
            ConfigError::OutOfRange { field, .. } => assert_eq!(field, "patrol_speed_factor"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_malformed_json_rejected() {
        let err = SimulationSettings::from_json("{ seed: ").unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));
    }
}
