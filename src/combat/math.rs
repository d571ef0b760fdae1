//! Combat Math
//!
//! Pure damage formulas shared by melee, skills and enemy attacks.
//! Nothing here touches the ECS; every random decision goes through an
//! injected RNG so callers (and tests) control both branches of a roll.

use rand::Rng;

/// Chance for a player hit to be critical (20%)
pub const CRIT_CHANCE: f32 = 0.2;

/// Damage multiplier applied to critical hits
pub const CRIT_MULTIPLIER: f32 = 1.5;

/// Minimum damage any resolved attack deals after defense
pub const MIN_DAMAGE: f32 = 1.0;

/// Result of a damage roll
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DamageRoll {
    /// Whole-number damage amount
    pub amount: f32,
    /// Whether the roll was a critical hit
    pub is_critical: bool,
}

/// Roll a critical hit check.
/// Returns true if the roll succeeds (random value < crit_chance).
pub fn roll_crit<R: Rng>(crit_chance: f32, rng: &mut R) -> bool {
    rng.gen::<f32>() < crit_chance
}

/// Roll outgoing damage for an attack.
///
/// The non-critical amount is `floor(base_attack + attack_bonus)`; a critical
/// multiplies the power by [`CRIT_MULTIPLIER`] before flooring.
pub fn roll_damage<R: Rng>(base_attack: f32, attack_bonus: f32, rng: &mut R) -> DamageRoll {
    let power = (base_attack + attack_bonus).max(0.0);

    if roll_crit(CRIT_CHANCE, rng) {
        DamageRoll {
            amount: (power * CRIT_MULTIPLIER).floor(),
            is_critical: true,
        }
    } else {
        DamageRoll {
            amount: power.floor(),
            is_critical: false,
        }
    }
}

/// Damage taken by a defender: `max(1, attacker_power - defender_defense)`.
pub fn resolve_incoming_damage(attacker_power: f32, defender_defense: f32) -> f32 {
    (attacker_power - defender_defense).max(MIN_DAMAGE)
}

/// Apply damage to a health pool, clamping at zero.
/// Returns the amount actually removed.
pub fn apply_damage_to_pool(current: &mut f32, amount: f32) -> f32 {
    debug_assert!(amount >= 0.0, "damage cannot be negative, got {}", amount);

    let before = *current;
    *current = (*current - amount.max(0.0)).max(0.0);
    before - *current
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::mock::StepRng;

    /// Always produces 0.0 from gen::<f32>() - every crit roll succeeds
    fn always_crit() -> StepRng {
        StepRng::new(0, 0)
    }

    /// Produces values just under 1.0 - every crit roll fails
    fn never_crit() -> StepRng {
        StepRng::new(u64::MAX, 0)
    }

    #[test]
    fn test_non_critical_roll_is_attack_power() {
        let roll = roll_damage(20.0, 0.0, &mut never_crit());
        assert_eq!(roll.amount, 20.0);
        assert!(!roll.is_critical);
    }

    #[test]
    fn test_critical_roll_is_floored() {
        let roll = roll_damage(20.0, 5.0, &mut always_crit());
        assert!(roll.is_critical);
        assert_eq!(roll.amount, 37.0, "floor(25 * 1.5) = 37");
    }

    #[test]
    fn test_damage_floor_of_one() {
        assert_eq!(resolve_incoming_damage(5.0, 100.0), 1.0);
        assert_eq!(resolve_incoming_damage(0.0, 0.0), 1.0);
        assert_eq!(resolve_incoming_damage(30.0, 20.0), 10.0);
    }

    #[test]
    fn test_pool_clamps_at_zero() {
        let mut health = 15.0;
        let removed = apply_damage_to_pool(&mut health, 40.0);
        assert_eq!(health, 0.0);
        assert_eq!(removed, 15.0);
    }
}
