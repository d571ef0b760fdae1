//! Headless pilot
//!
//! Stands in for the keyboard when no one is playing: each frame it looks at
//! the player and the living enemies and writes the [`FrameIntents`] a
//! reasonable player would. Runs in the input phase, so the rest of the frame
//! cannot tell it from `sample_player_input`.

use bevy::prelude::*;

use crate::states::session::components::{horizontal_distance, Enemy, PlayerState, SessionClock};
use crate::states::session::constants::MELEE_RANGE;
use crate::states::session::input::FrameIntents;
use crate::states::session::skill_config::SkillEffect;
use crate::states::session::skills::SkillBar;

/// Stop closing in once this near the target
const APPROACH_DISTANCE: f32 = MELEE_RANGE * 0.6;

/// Sprint toward targets farther than this
const SPRINT_DISTANCE: f32 = 10.0;

/// Keep this much energy in reserve for skills when deciding to sprint
const SPRINT_ENERGY_FLOOR: f32 = 40.0;

/// Seconds between two skill activations
const SKILL_SPACING: f32 = 0.5;

/// Heal below this fraction of max health
const HEAL_BELOW: f32 = 0.5;

/// Everything the pilot looks at to decide a frame
pub struct PilotContext<'a> {
    pub player: &'a PlayerState,
    /// Positions of living enemies
    pub enemies: &'a [Vec3],
    pub skills: &'a SkillBar,
    pub now: f32,
    /// Session time of the pilot's last skill, if any
    pub last_skill_at: Option<f32>,
}

/// What the pilot remembers between frames
#[derive(Resource, Debug, Default)]
pub struct PilotMemory {
    pub last_skill_at: Option<f32>,
}

/// Decide this frame's intents.
pub fn decide_intents(ctx: &PilotContext) -> FrameIntents {
    let mut intents = FrameIntents::default();
    let player = ctx.player;
    if !player.is_alive() {
        return intents;
    }

    let Some((target, distance)) = ctx
        .enemies
        .iter()
        .map(|&p| (p, horizontal_distance(player.position, p)))
        .min_by(|a, b| a.1.total_cmp(&b.1))
    else {
        return intents;
    };

    if distance > APPROACH_DISTANCE {
        let offset = target - player.position;
        // Screen-up is world -Z
        intents.move_axis = Vec2::new(offset.x, -offset.z).normalize_or_zero();
        intents.sprint = distance > SPRINT_DISTANCE && player.energy > SPRINT_ENERGY_FLOOR;
    }

    intents.attack = distance <= MELEE_RANGE && player.attack_cooldown == 0;

    let rested = ctx
        .last_skill_at
        .map_or(true, |last| ctx.now - last >= SKILL_SPACING);
    if rested {
        if let Some(slot) = pick_skill(ctx, distance) {
            intents.skill_slots[slot] = true;
        }
    }

    intents
}

/// First ready, affordable skill that fits the situation
fn pick_skill(ctx: &PilotContext, distance: f32) -> Option<usize> {
    let player = ctx.player;
    let health_fraction = player.health / player.max_health.max(1.0);

    ctx.skills.iter().find_map(|(slot, skill)| {
        let skill = skill?;
        if !skill.is_ready() || player.energy < skill.config.energy_cost {
            return None;
        }
        let useful = match &skill.config.effect {
            SkillEffect::AreaDamage { .. } => distance <= skill.config.range,
            SkillEffect::Heal { .. } => health_fraction < HEAL_BELOW,
            SkillEffect::Buff { .. } => distance <= MELEE_RANGE * 2.0,
            SkillEffect::Teleport => {
                distance > SPRINT_DISTANCE && distance - skill.config.range > APPROACH_DISTANCE
            }
        };
        useful.then_some(slot)
    })
}

/// Write the pilot's intents for this frame.
pub fn pilot_intents(
    clock: Res<SessionClock>,
    bar: Res<SkillBar>,
    mut memory: ResMut<PilotMemory>,
    mut intents: ResMut<FrameIntents>,
    players: Query<&PlayerState>,
    enemies: Query<&Enemy>,
) {
    let Ok(player) = players.get_single() else {
        *intents = FrameIntents::default();
        return;
    };

    let living: Vec<Vec3> = enemies
        .iter()
        .filter(|e| !e.is_dead())
        .map(|e| e.position)
        .collect();

    let decided = decide_intents(&PilotContext {
        player,
        enemies: &living,
        skills: &bar,
        now: clock.elapsed,
        last_skill_at: memory.last_skill_at,
    });

    if decided.skill_slots.iter().any(|&s| s) {
        memory.last_skill_at = Some(clock.elapsed);
    }
    *intents = decided;
}
