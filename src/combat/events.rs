//! Combat events
//!
//! Outbound notifications raised by the session loop. The combat log, the
//! quest hooks and the presentation layer all consume these; the loop never
//! calls its collaborators directly.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::elements::ElementReaction;

/// Opaque enemy identity, unique for the lifetime of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EnemyId(pub u32);

impl fmt::Display for EnemyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Event fired once per successful player hit on an enemy
#[derive(Event, Debug, Clone)]
pub struct DamageEvent {
    /// Enemy receiving the damage
    pub target: EnemyId,
    /// Rolled damage of the hit. On a killing blow this may exceed the
    /// health the target had left.
    pub amount: f32,
    /// Whether this was a critical hit
    pub is_critical: bool,
    /// Skill that caused the damage (None for melee)
    pub skill_id: Option<String>,
    /// Where the hit landed, for floating damage numbers
    pub world_position: Vec3,
}

impl DamageEvent {
    pub fn is_skill_sourced(&self) -> bool {
        self.skill_id.is_some()
    }
}

/// Event fired when an enemy attack lands on the player
#[derive(Event, Debug, Clone)]
pub struct PlayerDamagedEvent {
    pub attacker: EnemyId,
    /// Damage that reached the player's health
    pub amount: f32,
    /// Damage soaked by absorb modifiers
    pub absorbed: f32,
    pub world_position: Vec3,
}

/// Event fired exactly once per enemy, at the transition into DEAD
#[derive(Event, Debug, Clone)]
pub struct EnemyKilledEvent {
    pub enemy: EnemyId,
    /// Config key of the enemy (e.g. "swordsman")
    pub kind: String,
    pub is_boss: bool,
    pub world_position: Vec3,
}

/// Event fired after a skill passes its activation checks
#[derive(Event, Debug, Clone)]
pub struct SkillUsedEvent {
    pub skill_id: String,
    /// Loadout slot the skill was fired from
    pub slot: usize,
}

/// Request for the inventory collaborator to grant an item
#[derive(Event, Debug, Clone)]
pub struct ItemDropRequest {
    pub item_id: String,
    /// Enemy whose loot table produced the item
    pub source: EnemyId,
    pub world_position: Vec3,
}

/// Request for the inventory collaborator to consume an item.
/// The heal/energy effect itself is applied externally.
#[derive(Event, Debug, Clone)]
pub struct ItemConsumeRequest {
    pub item_id: String,
}

/// Event fired when the player talks to an NPC
#[derive(Event, Debug, Clone)]
pub struct NpcTalkedToEvent {
    pub npc_id: String,
}

/// Event fired when a boss crosses a phase threshold downward
#[derive(Event, Debug, Clone)]
pub struct BossPhaseChangedEvent {
    pub enemy: EnemyId,
    /// Index into the boss phase table
    pub phase: usize,
    /// Health percentage threshold that was crossed
    pub threshold: f32,
    /// Special ability unlocked by this phase, if any
    pub ability: Option<String>,
}

/// Event fired when a player hit triggers an element reaction
#[derive(Event, Debug, Clone)]
pub struct ElementReactionEvent {
    pub target: EnemyId,
    pub reaction: ElementReaction,
    pub damage: f32,
    pub world_position: Vec3,
}

/// Event fired when a timed modifier lands on the player
#[derive(Event, Debug, Clone)]
pub struct ModifierAppliedEvent {
    /// Display name of the modifier source (usually the skill name)
    pub source: String,
    pub description: String,
    /// Duration in seconds
    pub duration: f32,
}

/// Event fired when a timed modifier runs out
#[derive(Event, Debug, Clone)]
pub struct ModifierExpiredEvent {
    pub source: String,
}

/// Event fired once when the player's health reaches zero
#[derive(Event, Debug, Clone)]
pub struct PlayerDefeatedEvent {
    pub world_position: Vec3,
}

/// Event fired when the inventory toggle intent is pressed
#[derive(Event, Debug, Clone, Copy)]
pub struct InventoryToggledEvent;
