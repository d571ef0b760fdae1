//! Data-Driven Enemy Configuration
//!
//! Enemy stats, loot tables and boss phase tables are defined in
//! `assets/config/enemies.ron`, keyed by enemy kind.
//!
//! ## Usage
//! ```ignore
//! fn my_system(enemies: Res<EnemyDefinitions>) {
//!     if let Some(def) = enemies.get("swordsman") {
//!         println!("Swordsman detection range: {}", def.detection_range);
//!     }
//! }
//! ```

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::combat::elements::Element;

/// Default path of the enemy definitions file
pub const ENEMIES_CONFIG_PATH: &str = "assets/config/enemies.ron";

/// One row of a boss phase table.
///
/// Multipliers are relative to the enemy's base stats, not compounding.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BossPhase {
    /// Health percentage (0-100) at or below which this phase begins
    pub threshold: f32,
    /// Attack power multiplier while in this phase
    pub attack_multiplier: f32,
    /// Move speed multiplier while in this phase
    pub speed_multiplier: f32,
    /// Special ability unlocked on entering this phase
    #[serde(default)]
    pub ability: Option<String>,
}

/// Static configuration of an enemy kind
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EnemyConfig {
    /// Display name
    pub name: String,
    pub max_health: f32,
    pub attack: f32,
    /// Not applied to player melee or skill hits, which land at full value
    pub defense: f32,
    /// Chase speed in units per second
    pub move_speed: f32,
    /// Distance at which the enemy stops chasing and starts striking
    pub attack_range: f32,
    /// Distance at which a patrolling enemy notices the player
    pub detection_range: f32,
    /// Item ids; a kill may drop one of them
    #[serde(default)]
    pub loot: Vec<String>,
    /// Element the enemy is infused with, used for reactions
    #[serde(default)]
    pub element: Option<Element>,
    /// Boss phase table, highest threshold first. Empty for regular enemies.
    #[serde(default)]
    pub boss_phases: Vec<BossPhase>,
}

impl EnemyConfig {
    pub fn is_boss(&self) -> bool {
        !self.boss_phases.is_empty()
    }

    /// Check the config for values the AI cannot work with
    pub fn validate(&self) -> Result<(), String> {
        if self.max_health <= 0.0 {
            return Err(format!("{}: max_health must be positive", self.name));
        }
        if self.attack < 0.0 || self.defense < 0.0 || self.move_speed < 0.0 {
            return Err(format!("{}: attack, defense and move_speed must be non-negative", self.name));
        }
        if self.attack_range <= 0.0 || self.detection_range < self.attack_range {
            return Err(format!(
                "{}: detection_range ({}) must be at least attack_range ({})",
                self.name, self.detection_range, self.attack_range
            ));
        }
        for pair in self.boss_phases.windows(2) {
            if pair[1].threshold >= pair[0].threshold {
                return Err(format!(
                    "{}: boss phase thresholds must be strictly descending",
                    self.name
                ));
            }
        }
        Ok(())
    }
}

/// Root structure for the enemies.ron file
#[derive(Debug, Serialize, Deserialize)]
pub struct EnemiesConfig {
    pub enemies: HashMap<String, EnemyConfig>,
}

/// Resource containing all enemy definitions
#[derive(Resource, Debug, Clone, Default)]
pub struct EnemyDefinitions {
    definitions: HashMap<String, EnemyConfig>,
}

impl EnemyDefinitions {
    pub fn new(config: EnemiesConfig) -> Self {
        Self {
            definitions: config.enemies,
        }
    }

    /// Look up an enemy kind
    pub fn get(&self, kind: &str) -> Option<&EnemyConfig> {
        self.definitions.get(kind)
    }

    /// Insert or replace a definition
    pub fn insert(&mut self, kind: impl Into<String>, config: EnemyConfig) {
        self.definitions.insert(kind.into(), config);
    }

    /// All defined kinds, sorted for stable iteration
    pub fn kinds(&self) -> Vec<&str> {
        let mut kinds: Vec<&str> = self.definitions.keys().map(String::as_str).collect();
        kinds.sort_unstable();
        kinds
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// Validate every definition
    pub fn validate(&self) -> Result<(), String> {
        for kind in self.kinds() {
            if let Some(config) = self.definitions.get(kind) {
                config.validate()?;
            }
        }
        Ok(())
    }

    /// Loot ids that the given predicate does not recognize, as (kind, item) pairs
    pub fn unknown_loot(&self, is_known: impl Fn(&str) -> bool) -> Vec<(String, String)> {
        let mut unknown = Vec::new();
        for kind in self.kinds() {
            if let Some(config) = self.definitions.get(kind) {
                for item in &config.loot {
                    if !is_known(item) {
                        unknown.push((kind.to_string(), item.clone()));
                    }
                }
            }
        }
        unknown
    }
}

/// Parse enemy definitions from RON text
pub fn parse_enemy_definitions(contents: &str) -> Result<EnemyDefinitions, String> {
    let config: EnemiesConfig =
        ron::from_str(contents).map_err(|e| format!("Failed to parse enemy definitions: {}", e))?;
    let definitions = EnemyDefinitions::new(config);
    definitions.validate()?;
    Ok(definitions)
}

/// Load enemy definitions from assets/config/enemies.ron
pub fn load_enemy_definitions() -> Result<EnemyDefinitions, String> {
    let contents = std::fs::read_to_string(ENEMIES_CONFIG_PATH)
        .map_err(|e| format!("Failed to read {}: {}", ENEMIES_CONFIG_PATH, e))?;

    let definitions = parse_enemy_definitions(&contents)
        .map_err(|e| format!("{}: {}", ENEMIES_CONFIG_PATH, e))?;

    info!(
        "Loaded {} enemy definitions from {}",
        definitions.len(),
        ENEMIES_CONFIG_PATH
    );

    Ok(definitions)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"(
        enemies: {
            "bandit": (
                name: "Bandit",
                max_health: 60.0,
                attack: 8.0,
                defense: 2.0,
                move_speed: 5.0,
                attack_range: 3.0,
                detection_range: 12.0,
                loot: ["iron_ore"],
            ),
        },
    )"#;

    #[test]
    fn test_parse_minimal_enemy() {
        let defs = parse_enemy_definitions(SAMPLE).unwrap();
        let bandit = defs.get("bandit").unwrap();
        assert_eq!(bandit.max_health, 60.0);
        assert!(bandit.element.is_none());
        assert!(!bandit.is_boss());
    }

    #[test]
    fn test_ascending_phases_rejected() {
        let mut defs = parse_enemy_definitions(SAMPLE).unwrap();
        let mut boss = defs.get("bandit").unwrap().clone();
        boss.boss_phases = vec![
            BossPhase { threshold: 33.0, attack_multiplier: 1.0, speed_multiplier: 1.0, ability: None },
            BossPhase { threshold: 66.0, attack_multiplier: 1.3, speed_multiplier: 1.2, ability: None },
        ];
        defs.insert("boss", boss);
        assert!(defs.validate().is_err());
    }
}
