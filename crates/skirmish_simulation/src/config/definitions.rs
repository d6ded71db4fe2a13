//! Data definitions персонажей (внешний data collaborator)
//!
//! Читаются один раз при спавне, дальше ядро работает только с
//! `CombatStats` / `AttackProfile`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::components::{AttackProfile, CombatStats};

/// Ошибки валидации data definitions
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProfileError {
    #[error("min damage {min} exceeds max damage {max}")]
    DamageBounds { min: f32, max: f32 },

    #[error("critical chance must be within [0, 1], got {0}")]
    CriticalChance(f32),

    #[error("{field} must be non-negative, got {value}")]
    Negative { field: &'static str, value: f32 },

    #[error("{field} must be finite, got {value}")]
    NotFinite { field: &'static str, value: f32 },

    #[error("{field} exceeds {max}, got {value}")]
    TooLarge { field: &'static str, value: f32, max: f32 },

    #[error("current health {current} exceeds max health {max}")]
    HealthAboveMax { current: u32, max: u32 },
}

/// Характеристики персонажа
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharacterData {
    pub max_health: u32,
    /// None: спавнимся с полным здоровьем
    #[serde(default)]
    pub current_health: Option<u32>,
    pub base_defence: u32,
}

impl CharacterData {
    pub fn to_stats(&self) -> Result<CombatStats, ProfileError> {
        let mut stats = CombatStats::new(self.max_health, self.base_defence);

        if let Some(current) = self.current_health {
            if current > self.max_health {
                return Err(ProfileError::HealthAboveMax {
                    current,
                    max: self.max_health,
                });
            }
            stats.current_health = current;
        }

        Ok(stats)
    }
}

/// Параметры атаки персонажа
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttackData {
    pub min_damage: f32,
    pub max_damage: f32,
    pub critical_multiplier: f32,
    pub critical_chance: f32,
    pub cool_down: f32,
    pub attack_range: f32,
    #[serde(default)]
    pub skill_range: f32,
}

impl AttackData {
    pub fn to_profile(&self) -> Result<AttackProfile, ProfileError> {
        if self.min_damage > self.max_damage {
            return Err(ProfileError::DamageBounds {
                min: self.min_damage,
                max: self.max_damage,
            });
        }

        if !(0.0..=1.0).contains(&self.critical_chance) {
            return Err(ProfileError::CriticalChance(self.critical_chance));
        }

        for (field, value) in [
            ("min_damage", self.min_damage),
            ("critical_multiplier", self.critical_multiplier),
            ("cool_down", self.cool_down),
            ("attack_range", self.attack_range),
            ("skill_range", self.skill_range),
        ] {
            if !(value >= 0.0) {
                return Err(ProfileError::Negative { field, value });
            }
        }

        Ok(AttackProfile {
            min_damage: self.min_damage,
            max_damage: self.max_damage,
            critical_multiplier: self.critical_multiplier,
            critical_chance: self.critical_chance,
            cool_down: self.cool_down,
            attack_range: self.attack_range,
            skill_range: self.skill_range,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slime_attack() -> AttackData {
        AttackData {
            min_damage: 4.0,
            max_damage: 8.0,
            critical_multiplier: 1.5,
            critical_chance: 0.1,
            cool_down: 2.0,
            attack_range: 1.2,
            skill_range: 0.0,
        }
    }

    #[test]
    fn test_attack_data_to_profile() {
        let profile = slime_attack().to_profile().expect("valid profile");
        assert_eq!(profile.min_damage, 4.0);
        assert_eq!(profile.cool_down, 2.0);
        assert_eq!(profile.attack_range, 1.2);
    }

    #[test]
    fn test_attack_data_rejects_inverted_bounds() {
        let data = AttackData {
            min_damage: 10.0,
            max_damage: 5.0,
            ..slime_attack()
        };
        assert_eq!(
            data.to_profile(),
            Err(ProfileError::DamageBounds { min: 10.0, max: 5.0 })
        );
    }

    #[test]
    fn test_attack_data_rejects_bad_critical_chance() {
        let data = AttackData {
            critical_chance: 1.2,
            ..slime_attack()
        };
        assert_eq!(data.to_profile(), Err(ProfileError::CriticalChance(1.2)));
    }

    #[test]
    fn test_attack_data_rejects_negative_cooldown() {
        let data = AttackData {
            cool_down: -1.0,
            ..slime_attack()
        };
        assert!(matches!(
            data.to_profile(),
            Err(ProfileError::Negative { field: "cool_down", .. })
        ));
    }

    #[test]
    fn test_character_data_from_json() {
        let data: CharacterData =
            serde_json::from_str(r#"{ "max_health": 50, "current_health": 20, "base_defence": 3 }"#)
                .expect("valid json");
        let stats = data.to_stats().expect("valid stats");
        assert_eq!(stats.health(), 20);
        assert_eq!(stats.max_health, 50);
        assert_eq!(stats.defence(), 3);
    }

    #[test]
    fn test_character_data_rejects_health_above_max() {
        let data = CharacterData {
            max_health: 10,
            current_health: Some(11),
            base_defence: 0,
        };
        assert_eq!(
            data.to_stats(),
            Err(ProfileError::HealthAboveMax { current: 11, max: 10 })
        );
    }
}
