//! Session configuration
//!
//! Describes one play session: who spawns where, which skills are slotted
//! and how the RNG is seeded. Both the graphical and headless modes build a
//! [`SessionConfig`] and hand it to `setup_session`.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::f32::consts::TAU;

use crate::combat::elements::Element;
use super::components::GameRng;
use super::constants::{GROUND_HEIGHT, PATROL_SPREAD, SPAWN_RING_RADIUS};

/// One enemy in the starting roster
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnemySpawn {
    /// Enemy kind, a key of the enemy definitions
    pub kind: String,
    pub position: [f32; 3],
    /// Patrol waypoints, visited in order and looped
    #[serde(default)]
    pub patrol: Vec<[f32; 3]>,
}

impl EnemySpawn {
    pub fn position(&self) -> Vec3 {
        Vec3::from_array(self.position)
    }

    pub fn patrol_points(&self) -> Vec<Vec3> {
        self.patrol.iter().copied().map(Vec3::from_array).collect()
    }
}

/// An NPC placed in the scene
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NpcSpawn {
    pub id: String,
    pub name: String,
    pub position: [f32; 3],
}

/// Everything needed to start a session
#[derive(Resource, Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    #[serde(default)]
    pub enemies: Vec<EnemySpawn>,
    #[serde(default)]
    pub npcs: Vec<NpcSpawn>,
    /// Skill ids for the three slots; empty uses the skill file's default loadout
    #[serde(default)]
    pub loadout: Vec<String>,
    #[serde(default = "default_player_spawn")]
    pub player_spawn: [f32; 3],
    #[serde(default)]
    pub player_element: Option<Element>,
    #[serde(default)]
    pub element_mastery: f32,
    /// Item consumed by the quick-item key
    #[serde(default)]
    pub quick_item: Option<String>,
    /// Random seed for deterministic sessions
    #[serde(default)]
    pub random_seed: Option<u64>,
}

fn default_player_spawn() -> [f32; 3] {
    [0.0, GROUND_HEIGHT, 0.0]
}

impl Default for SessionConfig {
    fn default() -> Self {
        let kinds: Vec<String> = ["swordsman", "spearman", "archer", "elite"]
            .into_iter()
            .map(String::from)
            .collect();

        Self {
            enemies: ring_roster(&kinds, &mut GameRng::from_seed(7)),
            npcs: vec![NpcSpawn {
                id: "elder_wang".to_string(),
                name: "Elder Wang".to_string(),
                position: [4.0, GROUND_HEIGHT, 6.0],
            }],
            loadout: Vec::new(),
            player_spawn: default_player_spawn(),
            player_element: Some(Element::Fire),
            element_mastery: 80.0,
            quick_item: Some("health_potion_small".to_string()),
            random_seed: None,
        }
    }
}

impl SessionConfig {
    pub fn player_spawn(&self) -> Vec3 {
        Vec3::from_array(self.player_spawn)
    }
}

/// Place enemies evenly on a ring around the origin.
///
/// Each enemy patrols between its spawn point and a random point within
/// [`PATROL_SPREAD`] of it.
pub fn ring_roster(kinds: &[String], rng: &mut GameRng) -> Vec<EnemySpawn> {
    let count = kinds.len().max(1) as f32;

    kinds
        .iter()
        .enumerate()
        .map(|(i, kind)| {
            let angle = i as f32 / count * TAU;
            let spawn = [
                angle.cos() * SPAWN_RING_RADIUS,
                GROUND_HEIGHT,
                angle.sin() * SPAWN_RING_RADIUS,
            ];
            let wander = [
                spawn[0] + rng.random_range(-PATROL_SPREAD, PATROL_SPREAD),
                GROUND_HEIGHT,
                spawn[2] + rng.random_range(-PATROL_SPREAD, PATROL_SPREAD),
            ];
            EnemySpawn {
                kind: kind.clone(),
                position: spawn,
                patrol: vec![spawn, wander],
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ring_roster_is_on_radius() {
        let kinds = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        let roster = ring_roster(&kinds, &mut GameRng::from_seed(1));
        assert_eq!(roster.len(), 3);
        for spawn in &roster {
            let p = spawn.position();
            let radius = Vec2::new(p.x, p.z).length();
            assert!((radius - SPAWN_RING_RADIUS).abs() < 1e-3);
            assert_eq!(spawn.patrol.len(), 2);
        }
    }

    #[test]
    fn test_roster_is_deterministic_for_seed() {
        let kinds = vec!["a".to_string(), "b".to_string()];
        let first = ring_roster(&kinds, &mut GameRng::from_seed(99));
        let second = ring_roster(&kinds, &mut GameRng::from_seed(99));
        assert_eq!(first, second);
    }
}
