//! Session Components and Resources
//!
//! Entity state for the player, enemies and NPCs, plus the per-session
//! resources shared by the frame phases.

use bevy::prelude::*;
use rand::prelude::*;
use serde::{Deserialize, Serialize};

use crate::combat::elements::Element;
use crate::combat::events::EnemyId;
use crate::combat::math::apply_damage_to_pool;
use super::constants::*;
use super::enemy_config::EnemyConfig;

// ============================================================================
// Resources
// ============================================================================

/// Seedable random source for everything the session rolls.
///
/// Implements [`RngCore`], so it can be handed to any function that takes
/// an injected `Rng`.
#[derive(Resource)]
pub struct GameRng {
    rng: StdRng,
    /// The seed used to initialize this RNG (if deterministic)
    pub seed: Option<u64>,
}

impl GameRng {
    /// Create a new GameRng with a specific seed for deterministic behavior
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            seed: Some(seed),
        }
    }

    /// Create a new GameRng with random entropy (non-deterministic)
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
            seed: None,
        }
    }

    pub fn from_optional_seed(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::from_seed(seed),
            None => Self::from_entropy(),
        }
    }

    /// Generate a random f32 in the range [0.0, 1.0)
    pub fn random_f32(&mut self) -> f32 {
        self.rng.gen()
    }

    /// Generate a random f32 in the given range
    pub fn random_range(&mut self, min: f32, max: f32) -> f32 {
        min + self.random_f32() * (max - min)
    }

    /// Pick a uniformly random element of a slice
    pub fn choose<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        items.choose(&mut self.rng)
    }
}

impl Default for GameRng {
    fn default() -> Self {
        Self::from_entropy()
    }
}

impl RngCore for GameRng {
    fn next_u32(&mut self) -> u32 {
        self.rng.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.rng.next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.rng.fill_bytes(dest)
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.rng.try_fill_bytes(dest)
    }
}

/// Session time in seconds. Its presence marks a live session: every core
/// system is gated on it, and teardown removes it.
#[derive(Resource, Debug, Default, Clone, Copy)]
pub struct SessionClock {
    pub elapsed: f32,
}

/// Score and combo tracking
#[derive(Resource, Debug, Default, Clone, PartialEq)]
pub struct ScoreBoard {
    pub score: u32,
    pub combo: u32,
    pub max_combo: u32,
    pub kills: u32,
    /// Session time of the last hit that counted toward the combo
    pub last_hit_at: Option<f32>,
}

impl ScoreBoard {
    /// Register a landed hit at session time `now` and return the new combo.
    /// A hit within [`COMBO_WINDOW_SECS`] of the previous one extends the
    /// combo; otherwise the combo restarts at 1.
    pub fn register_hit(&mut self, now: f32) -> u32 {
        let chained = self
            .last_hit_at
            .map_or(false, |last| now - last <= COMBO_WINDOW_SECS);

        self.combo = if chained { self.combo + 1 } else { 1 };
        self.max_combo = self.max_combo.max(self.combo);
        self.last_hit_at = Some(now);
        self.combo
    }

    pub fn register_kill(&mut self) {
        self.kills += 1;
        self.score += KILL_SCORE;
    }

    /// Drop a combo whose window has lapsed
    pub fn expire_combo(&mut self, now: f32) {
        if let Some(last) = self.last_hit_at {
            if now - last > COMBO_WINDOW_SECS {
                self.combo = 0;
            }
        }
    }
}

/// Flattened equipment bonuses supplied by the inventory collaborator.
/// Replaced wholesale whenever equipment changes.
#[derive(Resource, Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CombatStatModifiers {
    pub attack_bonus: f32,
    pub defense_bonus: f32,
    pub speed_bonus: f32,
    pub max_health_bonus: f32,
    pub max_energy_bonus: f32,
}

/// Hands out session-unique enemy ids
#[derive(Resource, Debug, Default)]
pub struct EnemyIdAllocator {
    next: u32,
}

impl EnemyIdAllocator {
    pub fn allocate(&mut self) -> EnemyId {
        let id = EnemyId(self.next);
        self.next += 1;
        id
    }
}

// ============================================================================
// Player
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum MovementMode {
    #[default]
    Normal,
    Sprint,
}

/// The player avatar's simulation state
#[derive(Component, Clone, Debug)]
pub struct PlayerState {
    pub position: Vec3,
    pub velocity: Vec3,
    /// Heading in radians; forward is `(sin(facing), 0, cos(facing))`
    pub facing: f32,
    pub health: f32,
    pub max_health: f32,
    pub energy: f32,
    pub max_energy: f32,
    pub grounded: bool,
    pub double_jump_available: bool,
    pub movement_mode: MovementMode,
    /// Fixed ticks until the next melee swing is allowed
    pub attack_cooldown: u32,
    pub base_attack: f32,
    pub base_defense: f32,
    /// Max health and energy before equipment bonuses
    pub base_max_health: f32,
    pub base_max_energy: f32,
    pub element: Option<Element>,
    pub element_mastery: f32,
    /// Set once when health reaches zero
    pub defeated: bool,
}

impl PlayerState {
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            velocity: Vec3::ZERO,
            facing: 0.0,
            health: PLAYER_BASE_HEALTH,
            max_health: PLAYER_BASE_HEALTH,
            energy: PLAYER_BASE_ENERGY,
            max_energy: PLAYER_BASE_ENERGY,
            grounded: true,
            double_jump_available: true,
            movement_mode: MovementMode::Normal,
            attack_cooldown: 0,
            base_attack: PLAYER_BASE_ATTACK,
            base_defense: PLAYER_BASE_DEFENSE,
            base_max_health: PLAYER_BASE_HEALTH,
            base_max_energy: PLAYER_BASE_ENERGY,
            element: None,
            element_mastery: 0.0,
            defeated: false,
        }
    }

    pub fn with_element(mut self, element: Option<Element>, mastery: f32) -> Self {
        self.element = element;
        self.element_mastery = mastery.max(0.0);
        self
    }

    pub fn is_alive(&self) -> bool {
        !self.defeated && self.health > 0.0
    }

    /// Unit vector the player is facing
    pub fn forward(&self) -> Vec3 {
        Vec3::new(self.facing.sin(), 0.0, self.facing.cos())
    }

    /// Remove health, clamping at zero. Returns the amount removed.
    pub fn take_damage(&mut self, amount: f32) -> f32 {
        apply_damage_to_pool(&mut self.health, amount)
    }

    /// Restore health up to max. Returns the amount restored.
    pub fn heal(&mut self, amount: f32) -> f32 {
        let before = self.health;
        self.health = (self.health + amount.max(0.0)).min(self.max_health);
        self.health - before
    }

    /// Recompute max pools from equipment bonuses and clamp current values
    pub fn apply_stat_modifiers(&mut self, modifiers: &CombatStatModifiers) {
        self.max_health = (self.base_max_health + modifiers.max_health_bonus).max(1.0);
        self.max_energy = (self.base_max_energy + modifiers.max_energy_bonus).max(0.0);
        self.health = self.health.clamp(0.0, self.max_health);
        self.energy = self.energy.clamp(0.0, self.max_energy);
    }
}

// ============================================================================
// Enemies
// ============================================================================

/// Enemy AI states
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum AiState {
    /// Walking the patrol route at reduced speed
    #[default]
    Patrol,
    /// Running straight at the player
    Chase,
    /// Standing in range and striking on a timer
    Attack,
    /// Reserved; the default policy never enters it
    Retreat,
    /// Terminal
    Dead,
}

/// A live enemy in the session
#[derive(Component, Clone, Debug)]
pub struct Enemy {
    pub id: EnemyId,
    /// Config key (e.g. "swordsman")
    pub kind: String,
    pub config: EnemyConfig,
    pub health: f32,
    pub state: AiState,
    pub position: Vec3,
    pub facing: f32,
    pub patrol_points: Vec<Vec3>,
    pub patrol_index: usize,
    /// Seconds until the next strike is allowed
    pub attack_timer: f32,
    /// Index into the boss phase table
    pub phase: usize,
    /// Current attack power (base attack times the phase multiplier)
    pub attack_power: f32,
    /// Current chase speed (base speed times the phase multiplier)
    pub move_speed: f32,
}

/// Result of applying damage to an enemy
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DamageOutcome {
    /// Health actually removed
    pub applied: f32,
    /// True only for the hit that moved the enemy into DEAD
    pub killed: bool,
}

impl Enemy {
    pub fn new(
        id: EnemyId,
        kind: impl Into<String>,
        config: EnemyConfig,
        position: Vec3,
        patrol_points: Vec<Vec3>,
    ) -> Self {
        Self {
            id,
            kind: kind.into(),
            health: config.max_health,
            attack_power: config.attack,
            move_speed: config.move_speed,
            config,
            state: AiState::Patrol,
            position,
            facing: 0.0,
            patrol_points,
            patrol_index: 0,
            attack_timer: 0.0,
            phase: 0,
        }
    }

    pub fn is_dead(&self) -> bool {
        self.state == AiState::Dead
    }

    pub fn health_percent(&self) -> f32 {
        if self.config.max_health <= 0.0 {
            return 0.0;
        }
        self.health / self.config.max_health * 100.0
    }

    /// Apply damage and enter DEAD immediately if health reaches zero.
    ///
    /// Returns `None` for an enemy that is already dead: the terminal state
    /// accepts no further damage, so a kill can only be reported once.
    pub fn apply_damage(&mut self, amount: f32) -> Option<DamageOutcome> {
        if self.is_dead() {
            return None;
        }

        let applied = apply_damage_to_pool(&mut self.health, amount);
        let killed = self.health <= 0.0;
        if killed {
            self.state = AiState::Dead;
        }

        Some(DamageOutcome { applied, killed })
    }
}

// ============================================================================
// NPCs and markers
// ============================================================================

/// A non-hostile character the player can talk to
#[derive(Component, Clone, Debug)]
pub struct Npc {
    pub id: String,
    pub name: String,
    pub position: Vec3,
}

/// Marker component for every entity spawned by a session.
/// Used for cleanup when the session is torn down.
#[derive(Component)]
pub struct SessionEntity;

/// Horizontal (XZ-plane) distance between two points
pub fn horizontal_distance(a: Vec3, b: Vec3) -> f32 {
    Vec2::new(a.x - b.x, a.z - b.z).length()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_combo_chains_inside_window() {
        let mut score = ScoreBoard::default();
        assert_eq!(score.register_hit(0.0), 1);
        assert_eq!(score.register_hit(1.5), 2);
        assert_eq!(score.register_hit(3.0), 3);
        assert_eq!(score.register_hit(5.5), 1, "2.5s gap breaks the combo");
        assert_eq!(score.max_combo, 3);
    }

    #[test]
    fn test_heal_clamps_to_max() {
        let mut player = PlayerState::new(Vec3::ZERO);
        player.take_damage(30.0);
        assert_eq!(player.heal(100.0), 30.0);
        assert_eq!(player.health, player.max_health);
    }

    #[test]
    fn test_stat_modifiers_shrink_clamps_health() {
        let mut player = PlayerState::new(Vec3::ZERO);
        player.apply_stat_modifiers(&CombatStatModifiers {
            max_health_bonus: 50.0,
            ..default()
        });
        player.health = 150.0;
        player.apply_stat_modifiers(&CombatStatModifiers::default());
        assert_eq!(player.max_health, 100.0);
        assert_eq!(player.health, 100.0);
    }

    #[test]
    fn test_enemy_ids_are_unique() {
        let mut allocator = EnemyIdAllocator::default();
        let a = allocator.allocate();
        let b = allocator.allocate();
        assert_ne!(a, b);
    }
}
