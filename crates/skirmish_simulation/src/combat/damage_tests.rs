//! Tests for damage resolution and hit facing.

#[cfg(test)]
mod tests {
    use bevy::prelude::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use crate::combat::{is_facing_target, DamageResolver};
    use crate::components::{AttackProfile, CombatStats};

    fn fixed_profile(damage: f32, multiplier: f32) -> AttackProfile {
        AttackProfile {
            min_damage: damage,
            max_damage: damage,
            critical_multiplier: multiplier,
            critical_chance: 0.0,
            ..Default::default()
        }
    }

    #[test]
    fn test_non_critical_hit_minus_defence() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let attacker = fixed_profile(10.0, 2.0);
        let mut defender = CombatStats::new(100, 3);

        let damage = DamageResolver::resolve(&attacker, false, &mut defender, &mut rng);

        // 10 - 3 = 7
        assert_eq!(damage, 7);
        assert_eq!(defender.health(), 93);
    }

    #[test]
    fn test_critical_hit_applies_multiplier_before_defence() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let attacker = fixed_profile(10.0, 2.0);
        let mut defender = CombatStats::new(100, 3);

        let damage = DamageResolver::resolve(&attacker, true, &mut defender, &mut rng);

        // 10 × 2 - 3 = 17
        assert_eq!(damage, 17);
        assert_eq!(defender.health(), 83);
    }

    #[test]
    fn test_defence_above_damage_deals_nothing() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let attacker = fixed_profile(4.0, 1.0);
        let mut defender = CombatStats::new(20, 10);

        let damage = DamageResolver::resolve(&attacker, false, &mut defender, &mut rng);

        assert_eq!(damage, 0);
        assert_eq!(defender.health(), 20);
    }

    #[test]
    fn test_overkill_clamps_health_to_zero() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let attacker = fixed_profile(20.0, 1.0);
        let mut defender = CombatStats::new(100, 0);
        defender.current_health = 5;

        let damage = DamageResolver::resolve(&attacker, false, &mut defender, &mut rng);

        assert_eq!(damage, 20);
        assert_eq!(defender.health(), 0);
        assert!(!defender.is_alive());
    }

    #[test]
    fn test_fractional_damage_is_truncated() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let attacker = fixed_profile(7.9, 1.5); // 11.85 → 11
        let mut defender = CombatStats::new(100, 1);

        assert_eq!(DamageResolver::roll_damage(&attacker, false, &mut rng), 7);
        assert_eq!(DamageResolver::roll_damage(&attacker, true, &mut rng), 11);

        let damage = DamageResolver::resolve(&attacker, true, &mut defender, &mut rng);
        assert_eq!(damage, 10);
    }

    #[test]
    fn test_roll_stays_inside_half_open_range() {
        let mut rng = ChaCha8Rng::seed_from_u64(99);
        let attacker = AttackProfile {
            min_damage: 5.0,
            max_damage: 10.0,
            ..Default::default()
        };

        for _ in 0..500 {
            let raw = DamageResolver::roll_damage(&attacker, false, &mut rng);
            assert!((5..10).contains(&raw), "raw = {}", raw);
        }
    }

    #[test]
    fn test_health_drop_matches_returned_damage() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let attacker = AttackProfile {
            min_damage: 3.0,
            max_damage: 30.0,
            critical_multiplier: 1.7,
            ..Default::default()
        };

        for round in 0..200 {
            let mut defender = CombatStats::new(60, 4);
            let before = defender.health();
            let damage = DamageResolver::resolve(&attacker, round % 3 == 0, &mut defender, &mut rng);
            assert_eq!(defender.health(), before.saturating_sub(damage));
        }
    }

    #[test]
    fn test_mitigate_never_negative() {
        assert_eq!(DamageResolver::mitigate(-5, 0), 0);
        assert_eq!(DamageResolver::mitigate(3, 3), 0);
        assert_eq!(DamageResolver::mitigate(12, 2), 10);
    }

    #[test]
    fn test_facing_target() {
        // Bevy forward = -Z
        let transform = Transform::from_xyz(0.0, 0.0, 0.0);

        assert!(is_facing_target(&transform, Vec3::new(0.0, 0.0, -5.0), 0.5));
        assert!(!is_facing_target(&transform, Vec3::new(0.0, 0.0, 5.0), 0.5));
        // 90° в сторону: dot = 0 < 0.5
        assert!(!is_facing_target(&transform, Vec3::new(5.0, 0.0, 0.0), 0.5));
        // Та же точка: считаем что смотрим
        assert!(is_facing_target(&transform, Vec3::ZERO, 0.5));
    }
}
