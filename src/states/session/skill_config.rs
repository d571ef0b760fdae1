//! Data-Driven Skill Configuration
//!
//! Skills are defined in `assets/config/skills.ron`, keyed by skill id.
//! Cooldowns are authored in seconds; the skill bar converts them to fixed
//! ticks when a skill is slotted.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::constants::FIXED_TICKS_PER_SECOND;
use super::modifiers::ModifierKind;

/// Default path of the skill definitions file
pub const SKILLS_CONFIG_PATH: &str = "assets/config/skills.ron";

/// What a skill does once its activation checks pass
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum SkillEffect {
    /// Flat damage to every living enemy within `range` of the player.
    /// Bypasses enemy defense.
    AreaDamage { damage: f32 },
    /// Move the player `range` units along their facing
    Teleport,
    /// Apply a timed modifier to the player
    Buff {
        kind: ModifierKind,
        value: f32,
        duration: f32,
    },
    /// Restore player health immediately
    Heal { amount: f32 },
}

/// Complete skill configuration loaded from RON
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SkillConfig {
    /// Display name of the skill
    pub name: String,
    /// Energy deducted on activation
    pub energy_cost: f32,
    /// Cooldown after activation in seconds
    pub cooldown: f32,
    /// Area radius for damage skills, distance for teleports
    #[serde(default)]
    pub range: f32,
    pub effect: SkillEffect,
    /// RGB color of the activation burst (0.0-1.0 range)
    #[serde(default = "default_particle_color")]
    pub particle_color: [f32; 3],
    /// Particles emitted on activation
    #[serde(default)]
    pub particle_count: usize,
}

fn default_particle_color() -> [f32; 3] {
    [1.0, 1.0, 1.0]
}

impl SkillConfig {
    /// Cooldown expressed in fixed ticks
    pub fn cooldown_ticks(&self) -> u32 {
        (self.cooldown.max(0.0) * FIXED_TICKS_PER_SECOND).round() as u32
    }

    pub fn particle_color(&self) -> Color {
        let [r, g, b] = self.particle_color;
        Color::srgb(r, g, b)
    }

    pub fn is_damage(&self) -> bool {
        matches!(self.effect, SkillEffect::AreaDamage { .. })
    }

    /// Check the config for values activation cannot work with
    pub fn validate(&self) -> Result<(), String> {
        if self.energy_cost < 0.0 {
            return Err(format!("{}: energy_cost must be non-negative", self.name));
        }
        if self.cooldown < 0.0 {
            return Err(format!("{}: cooldown must be non-negative", self.name));
        }
        match &self.effect {
            SkillEffect::AreaDamage { damage } if *damage <= 0.0 || self.range <= 0.0 => Err(
                format!("{}: area damage needs positive damage and range", self.name),
            ),
            SkillEffect::Teleport if self.range <= 0.0 => {
                Err(format!("{}: teleport needs a positive range", self.name))
            }
            SkillEffect::Buff { duration, .. } if *duration <= 0.0 => {
                Err(format!("{}: buff duration must be positive", self.name))
            }
            _ => Ok(()),
        }
    }
}

/// Root structure for the skills.ron file
#[derive(Debug, Serialize, Deserialize)]
pub struct SkillsConfig {
    pub skills: HashMap<String, SkillConfig>,
    /// Skill ids slotted when a session does not name its own loadout
    #[serde(default)]
    pub default_loadout: Vec<String>,
}

/// Resource containing all skill definitions
#[derive(Resource, Debug, Clone, Default)]
pub struct SkillDefinitions {
    definitions: HashMap<String, SkillConfig>,
    default_loadout: Vec<String>,
}

impl SkillDefinitions {
    pub fn new(config: SkillsConfig) -> Self {
        Self {
            definitions: config.skills,
            default_loadout: config.default_loadout,
        }
    }

    /// Look up a skill by id
    pub fn get(&self, skill_id: &str) -> Option<&SkillConfig> {
        self.definitions.get(skill_id)
    }

    pub fn insert(&mut self, skill_id: impl Into<String>, config: SkillConfig) {
        self.definitions.insert(skill_id.into(), config);
    }

    pub fn default_loadout(&self) -> &[String] {
        &self.default_loadout
    }

    /// All skill ids, sorted
    pub fn skill_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.definitions.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    pub fn validate(&self) -> Result<(), String> {
        for id in self.skill_ids() {
            if let Some(config) = self.definitions.get(id) {
                config.validate()?;
            }
        }
        let missing: Vec<&String> = self
            .default_loadout
            .iter()
            .filter(|id| !self.definitions.contains_key(id.as_str()))
            .collect();
        if !missing.is_empty() {
            return Err(format!("Default loadout names unknown skills: {:?}", missing));
        }
        Ok(())
    }
}

/// Parse skill definitions from RON text
pub fn parse_skill_definitions(contents: &str) -> Result<SkillDefinitions, String> {
    let config: SkillsConfig =
        ron::from_str(contents).map_err(|e| format!("Failed to parse skill definitions: {}", e))?;
    let definitions = SkillDefinitions::new(config);
    definitions.validate()?;
    Ok(definitions)
}

/// Load skill definitions from assets/config/skills.ron
pub fn load_skill_definitions() -> Result<SkillDefinitions, String> {
    let contents = std::fs::read_to_string(SKILLS_CONFIG_PATH)
        .map_err(|e| format!("Failed to read {}: {}", SKILLS_CONFIG_PATH, e))?;

    let definitions = parse_skill_definitions(&contents)
        .map_err(|e| format!("{}: {}", SKILLS_CONFIG_PATH, e))?;

    info!(
        "Loaded {} skill definitions from {}",
        definitions.len(),
        SKILLS_CONFIG_PATH
    );

    Ok(definitions)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cooldown_ticks_at_sixty_hz() {
        let config = SkillConfig {
            name: "Test Palm".to_string(),
            energy_cost: 30.0,
            cooldown: 5.0,
            range: 5.0,
            effect: SkillEffect::AreaDamage { damage: 50.0 },
            particle_color: [1.0, 0.84, 0.0],
            particle_count: 30,
        };
        assert_eq!(config.cooldown_ticks(), 300);
        assert!(config.is_damage());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_teleport_without_range_is_invalid() {
        let config = SkillConfig {
            name: "Blink".to_string(),
            energy_cost: 10.0,
            cooldown: 1.0,
            range: 0.0,
            effect: SkillEffect::Teleport,
            particle_color: default_particle_color(),
            particle_count: 0,
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_parse_buff_effect() {
        let defs = parse_skill_definitions(
            r#"(
                skills: {
                    "golden_bell": (
                        name: "Golden Bell",
                        energy_cost: 40.0,
                        cooldown: 10.0,
                        effect: Buff(kind: DefenseBonus, value: 30.0, duration: 10.0),
                    ),
                },
                default_loadout: ["golden_bell"],
            )"#,
        )
        .unwrap();
        let bell = defs.get("golden_bell").unwrap();
        assert_eq!(
            bell.effect,
            SkillEffect::Buff { kind: ModifierKind::DefenseBonus, value: 30.0, duration: 10.0 }
        );
        assert_eq!(defs.default_loadout(), ["golden_bell".to_string()]);
    }
}
