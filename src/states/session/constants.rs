//! Session Constants
//!
//! Centralized location for the tuning numbers of the combat loop.

// ============================================================================
// Timing
// ============================================================================

/// Rate of the fixed tick that counts down skill and attack cooldowns
pub const FIXED_TICKS_PER_SECOND: f32 = 60.0;

/// Interval between fps samples in seconds
pub const FPS_SAMPLE_INTERVAL: f32 = 1.0;

// ============================================================================
// Player Movement
// ============================================================================

/// Walking speed in units per second
pub const BASE_MOVE_SPEED: f32 = 8.0;

/// Sprint speed multiplier (15 units/s when sprinting)
pub const SPRINT_MULTIPLIER: f32 = 1.875;

/// Energy drained per second while sprinting
pub const SPRINT_ENERGY_DRAIN: f32 = 10.0;

/// Energy regenerated per second while not sprinting
pub const ENERGY_REGEN: f32 = 5.0;

/// Upward velocity applied by a jump or double jump
pub const JUMP_VELOCITY: f32 = 12.0;

/// Downward acceleration in units per second squared
pub const GRAVITY: f32 = 30.0;

/// Height of the player's origin when standing on the ground plane
pub const GROUND_HEIGHT: f32 = 1.5;

// ============================================================================
// Player Combat
// ============================================================================

/// Starting health and energy
pub const PLAYER_BASE_HEALTH: f32 = 100.0;
pub const PLAYER_BASE_ENERGY: f32 = 100.0;

/// Unarmed attack power
pub const PLAYER_BASE_ATTACK: f32 = 20.0;

/// Unarmored defense
pub const PLAYER_BASE_DEFENSE: f32 = 0.0;

/// Radius of the melee sweep around the player
pub const MELEE_RANGE: f32 = 5.0;

/// Minimum time between melee swings in seconds
pub const ATTACK_COOLDOWN_SECS: f32 = 0.3;

/// Hits within this many seconds of each other extend the combo
pub const COMBO_WINDOW_SECS: f32 = 2.0;

/// Score awarded per kill
pub const KILL_SCORE: u32 = 100;

/// Chance that a kill drops one item from the enemy's loot table
pub const DROP_CHANCE: f32 = 0.5;

/// Range at which the interact key reaches an NPC
pub const NPC_INTERACT_RANGE: f32 = 5.0;

/// Number of skill slots on the skill bar
pub const SKILL_SLOTS: usize = 3;

// ============================================================================
// Enemy AI
// ============================================================================

/// Patrol moves at this fraction of the enemy's chase speed
pub const PATROL_SPEED_FACTOR: f32 = 0.5;

/// Distance at which a patrol waypoint counts as reached
pub const PATROL_ARRIVAL_EPSILON: f32 = 2.0;

/// A chasing enemy gives up once the player is farther than
/// `detection_range * LEASH_FACTOR`
pub const LEASH_FACTOR: f32 = 1.25;

/// Seconds between enemy strikes while in ATTACK
pub const ENEMY_ATTACK_INTERVAL: f32 = 1.0;

/// Dead enemies sink at this many units per second
pub const CORPSE_SINK_SPEED: f32 = 0.5;

/// Corpses are despawned once they sink below this height
pub const CORPSE_DESPAWN_HEIGHT: f32 = -5.0;

/// Radius of the ring the stock roster is spawned on
pub const SPAWN_RING_RADIUS: f32 = 20.0;

/// Maximum offset of the random second patrol waypoint
pub const PATROL_SPREAD: f32 = 10.0;

// ============================================================================
// Particles
// ============================================================================

/// Number of slots in the particle ring buffer
pub const PARTICLE_CAPACITY: usize = 1000;

/// Initial particle size
pub const PARTICLE_START_SIZE: f32 = 0.5;

/// Particle speed in units per tick
pub const PARTICLE_SPEED: f32 = 0.3;

/// Random spread added to each axis of an emission direction
pub const PARTICLE_SPREAD: f32 = 0.15;

/// Per-tick decay of particle velocity and size
pub const PARTICLE_DECAY: f32 = 0.95;

/// Particles smaller than this are recycled
pub const PARTICLE_MIN_SIZE: f32 = 0.01;

/// Particles farther than this from the origin are recycled
pub const PARTICLE_WORLD_BOUND: f32 = 50.0;

/// Particles emitted by a normal melee hit
pub const HIT_PARTICLES: usize = 10;

/// Particles emitted by a critical melee hit
pub const CRIT_HIT_PARTICLES: usize = 20;

/// Particles emitted by a double jump
pub const DOUBLE_JUMP_PARTICLES: usize = 15;

/// Particles emitted per frame while sprinting
pub const SPRINT_TRAIL_PARTICLES: usize = 2;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sprint_speed_matches_light_skill_speed() {
        assert_eq!(BASE_MOVE_SPEED * SPRINT_MULTIPLIER, 15.0);
    }

    #[test]
    fn test_leash_is_outside_detection() {
        assert!(LEASH_FACTOR > 1.0, "leash must leave a dead zone past detection range");
    }

    #[test]
    fn test_decay_shrinks() {
        assert!(PARTICLE_DECAY > 0.0 && PARTICLE_DECAY < 1.0);
        assert!(PARTICLE_MIN_SIZE < PARTICLE_START_SIZE);
    }

    #[test]
    fn test_attack_cooldown_is_whole_ticks() {
        let ticks = ATTACK_COOLDOWN_SECS * FIXED_TICKS_PER_SECOND;
        assert!((ticks - ticks.round()).abs() < 1e-3);
    }
}
