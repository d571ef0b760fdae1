//! JSON configuration parsing for headless mode
//!
//! Parses JSON session configurations and converts them to the game's
//! [`SessionConfig`] format.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::combat::elements::Element;
use crate::states::session::components::GameRng;
use crate::states::session::constants::SKILL_SLOTS;
use crate::states::session::config::{ring_roster, EnemySpawn, NpcSpawn, SessionConfig};
use crate::states::session::enemy_config::EnemyDefinitions;
use crate::states::session::skill_config::SkillDefinitions;

/// Kind spawned when `include_boss` is set
pub const BOSS_KIND: &str = "boss_litianxiong";

/// Headless session configuration loaded from JSON
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeadlessSessionConfig {
    /// Enemy kinds placed on a ring around the player
    #[serde(default = "default_enemies")]
    pub enemies: Vec<String>,
    /// Add the boss to the roster
    #[serde(default)]
    pub include_boss: bool,
    /// Skill ids for the three slots (empty uses the default loadout)
    #[serde(default)]
    pub loadout: Vec<String>,
    #[serde(default)]
    pub player_element: Option<Element>,
    #[serde(default)]
    pub element_mastery: f32,
    /// NPCs placed in the scene
    #[serde(default)]
    pub npcs: Vec<NpcSpawn>,
    /// Custom output path for the session log (optional)
    #[serde(default)]
    pub output_path: Option<String>,
    /// Maximum session duration in seconds (default: 300)
    #[serde(default = "default_max_duration")]
    pub max_duration_secs: f32,
    /// Random seed for deterministic session reproduction
    #[serde(default)]
    pub random_seed: Option<u64>,
}

fn default_enemies() -> Vec<String> {
    ["swordsman", "spearman", "archer"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_max_duration() -> f32 {
    300.0
}

impl Default for HeadlessSessionConfig {
    fn default() -> Self {
        Self {
            enemies: default_enemies(),
            include_boss: false,
            loadout: Vec::new(),
            player_element: None,
            element_mastery: 0.0,
            npcs: Vec::new(),
            output_path: None,
            max_duration_secs: default_max_duration(),
            random_seed: None,
        }
    }
}

impl HeadlessSessionConfig {
    /// Load configuration from a JSON file
    pub fn load_from_file(path: &Path) -> Result<Self, String> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file: {}", e))?;
        Self::parse(&contents)
    }

    pub fn parse(contents: &str) -> Result<Self, String> {
        serde_json::from_str(contents).map_err(|e| format!("Failed to parse JSON: {}", e))
    }

    /// Every kind in the roster, boss last
    pub fn roster_kinds(&self) -> Vec<String> {
        let mut kinds = self.enemies.clone();
        if self.include_boss {
            kinds.push(BOSS_KIND.to_string());
        }
        kinds
    }

    /// Validate the configuration against the loaded definitions
    pub fn validate(
        &self,
        enemies: &EnemyDefinitions,
        skills: &SkillDefinitions,
    ) -> Result<(), String> {
        let kinds = self.roster_kinds();
        if kinds.is_empty() {
            return Err("the roster must name at least one enemy".to_string());
        }

        for kind in &kinds {
            if enemies.get(kind).is_none() {
                return Err(format!(
                    "Unknown enemy kind: '{}'. Valid kinds: {}",
                    kind,
                    enemies.kinds().join(", ")
                ));
            }
        }

        if self.loadout.len() > SKILL_SLOTS {
            return Err(format!(
                "loadout has {} skills, at most {} fit",
                self.loadout.len(),
                SKILL_SLOTS
            ));
        }
        for skill_id in &self.loadout {
            if skills.get(skill_id).is_none() {
                return Err(format!("Unknown skill: '{}'", skill_id));
            }
        }

        if self.max_duration_secs <= 0.0 {
            return Err("max_duration_secs must be positive".to_string());
        }
        if self.element_mastery < 0.0 {
            return Err("element_mastery must be non-negative".to_string());
        }

        Ok(())
    }

    /// Convert to the game's SessionConfig format
    pub fn to_session_config(&self) -> SessionConfig {
        // The roster is laid out with its own stream so that it does not
        // shift the session's combat rolls.
        let mut layout_rng = GameRng::from_seed(self.random_seed.unwrap_or(0));
        let enemies: Vec<EnemySpawn> = ring_roster(&self.roster_kinds(), &mut layout_rng);

        SessionConfig {
            enemies,
            npcs: self.npcs.clone(),
            loadout: self.loadout.clone(),
            player_element: self.player_element,
            element_mastery: self.element_mastery,
            random_seed: self.random_seed,
            ..SessionConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_json_fills_defaults() {
        let config = HeadlessSessionConfig::parse("{}").unwrap();
        assert_eq!(config.enemies, default_enemies());
        assert_eq!(config.max_duration_secs, 300.0);
        assert!(config.random_seed.is_none());
    }

    #[test]
    fn test_boss_is_appended_last() {
        let config = HeadlessSessionConfig::parse(
            r#"{ "enemies": ["swordsman"], "include_boss": true, "random_seed": 3 }"#,
        )
        .unwrap();
        let session = config.to_session_config();
        assert_eq!(session.enemies.len(), 2);
        assert_eq!(session.enemies[1].kind, BOSS_KIND);
        assert_eq!(session.random_seed, Some(3));
    }

    #[test]
    fn test_unknown_element_is_rejected() {
        assert!(HeadlessSessionConfig::parse(r#"{ "player_element": "Wood" }"#).is_err());
    }
}
