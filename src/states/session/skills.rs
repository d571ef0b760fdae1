//! Skill System
//!
//! Three loadout slots, each holding a [`SkillInstance`]. A slot can fire
//! only when its cooldown is zero and the player has the energy for it;
//! anything else is refused and the intent is dropped. Cooldowns live in
//! fixed ticks and are counted down in `FixedUpdate`, independent of the
//! render frame rate.

use bevy::prelude::*;
use smallvec::SmallVec;
use std::fmt;

use crate::combat::events::{EnemyId, ModifierAppliedEvent, SkillUsedEvent};
use super::components::*;
use super::constants::{FIXED_TICKS_PER_SECOND, SKILL_SLOTS};
use super::hit_resolution::{land_hit, Hit, HitEvents};
use super::input::FrameIntents;
use super::modifiers::{ModifierStack, TimedModifier};
use super::particles::ParticleBurst;
use super::skill_config::{SkillConfig, SkillDefinitions, SkillEffect};

/// A skill slotted on the bar
#[derive(Clone, Debug)]
pub struct SkillInstance {
    pub skill_id: String,
    pub config: SkillConfig,
    /// Fixed ticks remaining before the skill can fire again
    pub current_cooldown: u32,
}

impl SkillInstance {
    pub fn new(skill_id: impl Into<String>, config: SkillConfig) -> Self {
        Self {
            skill_id: skill_id.into(),
            config,
            current_cooldown: 0,
        }
    }

    pub fn is_ready(&self) -> bool {
        self.current_cooldown == 0
    }

    /// Remaining cooldown in seconds, for display
    pub fn cooldown_secs(&self) -> f32 {
        self.current_cooldown as f32 / FIXED_TICKS_PER_SECOND
    }
}

/// Why an activation attempt did nothing
#[derive(Clone, Debug, PartialEq)]
pub enum ActivationRefusal {
    EmptySlot,
    OnCooldown { remaining: u32 },
    InsufficientEnergy { needed: f32, available: f32 },
    PlayerDefeated,
}

impl fmt::Display for ActivationRefusal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActivationRefusal::EmptySlot => write!(f, "slot is empty"),
            ActivationRefusal::OnCooldown { remaining } => {
                write!(f, "on cooldown for {} more ticks", remaining)
            }
            ActivationRefusal::InsufficientEnergy { needed, available } => {
                write!(f, "needs {:.0} energy, has {:.0}", needed, available)
            }
            ActivationRefusal::PlayerDefeated => write!(f, "player is defeated"),
        }
    }
}

/// The player's skill loadout
#[derive(Resource, Clone, Debug, Default)]
pub struct SkillBar {
    slots: [Option<SkillInstance>; SKILL_SLOTS],
}

impl SkillBar {
    /// Build the bar from skill ids. An empty list falls back to the
    /// definitions' default loadout; unknown ids leave their slot empty.
    pub fn from_loadout(skill_ids: &[String], definitions: &SkillDefinitions) -> Self {
        let ids = if skill_ids.is_empty() {
            definitions.default_loadout()
        } else {
            skill_ids
        };

        if ids.len() > SKILL_SLOTS {
            warn!(
                "Loadout names {} skills, only the first {} are slotted",
                ids.len(),
                SKILL_SLOTS
            );
        }

        let mut bar = Self::default();
        for (slot, id) in ids.iter().take(SKILL_SLOTS).enumerate() {
            match definitions.get(id) {
                Some(config) => bar.slots[slot] = Some(SkillInstance::new(id.clone(), config.clone())),
                None => warn!("Unknown skill '{}' in loadout slot {}, left empty", id, slot + 1),
            }
        }
        bar
    }

    pub fn slot(&self, index: usize) -> Option<&SkillInstance> {
        self.slots.get(index).and_then(Option::as_ref)
    }

    pub fn slot_mut(&mut self, index: usize) -> Option<&mut SkillInstance> {
        self.slots.get_mut(index).and_then(Option::as_mut)
    }

    pub fn is_ready(&self, index: usize) -> bool {
        self.slot(index).is_some_and(SkillInstance::is_ready)
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, Option<&SkillInstance>)> {
        self.slots.iter().enumerate().map(|(i, s)| (i, s.as_ref()))
    }

    /// Check and commit an activation of `index`.
    ///
    /// On success the energy cost is deducted and the cooldown set; on
    /// refusal neither the bar nor `energy` is touched.
    pub fn try_activate(
        &mut self,
        index: usize,
        energy: &mut f32,
    ) -> Result<&SkillInstance, ActivationRefusal> {
        let skill = self.slot_mut(index).ok_or(ActivationRefusal::EmptySlot)?;

        if skill.current_cooldown > 0 {
            return Err(ActivationRefusal::OnCooldown {
                remaining: skill.current_cooldown,
            });
        }
        if *energy < skill.config.energy_cost {
            return Err(ActivationRefusal::InsufficientEnergy {
                needed: skill.config.energy_cost,
                available: *energy,
            });
        }

        *energy -= skill.config.energy_cost;
        skill.current_cooldown = skill.config.cooldown_ticks();
        Ok(&*skill)
    }

    /// Advance every cooldown by one fixed tick, flooring at zero
    pub fn tick(&mut self) {
        for skill in self.slots.iter_mut().flatten() {
            skill.current_cooldown = skill.current_cooldown.saturating_sub(1);
        }
    }
}

/// Fixed-rate countdown of skill and melee cooldowns.
pub fn tick_cooldowns(mut bar: ResMut<SkillBar>, mut players: Query<&mut PlayerState>) {
    bar.tick();
    for mut player in players.iter_mut() {
        player.attack_cooldown = player.attack_cooldown.saturating_sub(1);
    }
}

/// Fire every skill slot whose intent edge is set this frame.
#[allow(clippy::too_many_arguments)]
pub fn activate_skills(
    intents: Res<FrameIntents>,
    mut bar: ResMut<SkillBar>,
    mut players: Query<(&mut PlayerState, &mut ModifierStack)>,
    mut enemies: Query<&mut Enemy>,
    mut used_events: EventWriter<SkillUsedEvent>,
    mut applied_events: EventWriter<ModifierAppliedEvent>,
    mut hit_events: HitEvents,
) {
    let Ok((mut player, mut modifiers)) = players.get_single_mut() else {
        return;
    };

    for slot in (0..SKILL_SLOTS).filter(|&i| intents.skill_slots[i]) {
        if !player.is_alive() {
            debug!("Skill slot {} refused: {}", slot + 1, ActivationRefusal::PlayerDefeated);
            break;
        }

        let skill = match bar.try_activate(slot, &mut player.energy) {
            Ok(skill) => skill.clone(),
            Err(refusal) => {
                debug!("Skill slot {} refused: {}", slot + 1, refusal);
                continue;
            }
        };

        used_events.send(SkillUsedEvent {
            skill_id: skill.skill_id.clone(),
            slot,
        });

        let config = &skill.config;
        match &config.effect {
            SkillEffect::AreaDamage { damage } => {
                let origin = player.position;
                let mut struck: SmallVec<[EnemyId; 8]> = SmallVec::new();
                for mut enemy in enemies.iter_mut() {
                    if enemy.is_dead() || horizontal_distance(origin, enemy.position) > config.range {
                        continue;
                    }
                    let hit = Hit {
                        amount: *damage,
                        is_critical: false,
                        skill_id: Some(skill.skill_id.as_str()),
                    };
                    if land_hit(&mut enemy, hit, &mut hit_events).is_some() {
                        struck.push(enemy.id);
                    }
                }
                debug!("{} hit {} enemies", config.name, struck.len());
            }
            SkillEffect::Teleport => {
                let forward = player.forward();
                player.position += forward * config.range;
            }
            SkillEffect::Buff {
                kind,
                value,
                duration,
            } => {
                modifiers.apply(TimedModifier {
                    source: config.name.clone(),
                    kind: *kind,
                    value: *value,
                    remaining: *duration,
                });
                applied_events.send(ModifierAppliedEvent {
                    source: config.name.clone(),
                    description: kind.describe(*value),
                    duration: *duration,
                });
            }
            SkillEffect::Heal { amount } => {
                player.heal(*amount);
            }
        }

        if config.particle_count > 0 {
            hit_events.particles.send(ParticleBurst::upward(
                player.position,
                config.particle_color(),
                config.particle_count,
            ));
        }
    }
}
