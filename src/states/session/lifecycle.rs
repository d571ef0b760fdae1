//! Session lifecycle
//!
//! `setup_session` builds the whole simulation context from a
//! [`SessionConfig`]; `teardown_session` removes every piece of it. The
//! session clock is inserted last and removed first, and every core system
//! (including the fixed-rate cooldown timer) is gated on it, so nothing can
//! touch session state after teardown.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::camera::CameraRig;
use crate::combat::log::{CombatLog, CombatLogEventType};
use super::components::*;
use super::config::SessionConfig;
use super::constants::FPS_SAMPLE_INTERVAL;
use super::enemy_ai::spawn_enemy;
use super::enemy_config::EnemyDefinitions;
use super::input::FrameIntents;
use super::modifiers::ModifierStack;
use super::particles::ParticlePool;
use super::skill_config::SkillDefinitions;
use super::skills::SkillBar;

/// Frames-per-second sampler, published once per interval
#[derive(Resource, Debug)]
pub struct FpsSampler {
    timer: Timer,
    frames: u32,
    /// Frames counted over the last full interval
    pub fps: f32,
}

impl Default for FpsSampler {
    fn default() -> Self {
        Self {
            timer: Timer::from_seconds(FPS_SAMPLE_INTERVAL, TimerMode::Repeating),
            frames: 0,
            fps: 0.0,
        }
    }
}

/// How a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionOutcome {
    /// Every enemy is dead
    Cleared,
    /// The player's health reached zero
    Defeated,
    /// The time limit ran out
    Timeout,
    /// The player quit
    Aborted,
}

impl SessionOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionOutcome::Cleared => "cleared",
            SessionOutcome::Defeated => "defeated",
            SessionOutcome::Timeout => "timeout",
            SessionOutcome::Aborted => "aborted",
        }
    }
}

/// Decide whether the session is over. Defeat wins over a simultaneous clear.
pub fn session_outcome<'a>(
    player: &PlayerState,
    enemies: impl IntoIterator<Item = &'a Enemy>,
) -> Option<SessionOutcome> {
    if !player.is_alive() {
        return Some(SessionOutcome::Defeated);
    }
    let mut any = false;
    for enemy in enemies {
        if !enemy.is_dead() {
            return None;
        }
        any = true;
    }
    any.then_some(SessionOutcome::Cleared)
}

/// Build the session: player, enemies, NPCs and per-session resources.
pub fn setup_session(
    mut commands: Commands,
    config: Res<SessionConfig>,
    enemy_definitions: Res<EnemyDefinitions>,
    skill_definitions: Res<SkillDefinitions>,
    equipment: Res<CombatStatModifiers>,
    mut combat_log: ResMut<CombatLog>,
) {
    let rng = GameRng::from_optional_seed(config.random_seed);

    let mut player = PlayerState::new(config.player_spawn())
        .with_element(config.player_element, config.element_mastery);
    player.apply_stat_modifiers(&equipment);
    let spawn_point = player.position;
    commands.spawn((player, ModifierStack::default(), SessionEntity));

    let mut allocator = EnemyIdAllocator::default();
    let spawned = config
        .enemies
        .iter()
        .filter_map(|spawn| spawn_enemy(&mut commands, &mut allocator, &enemy_definitions, spawn))
        .count();

    for npc in &config.npcs {
        commands.spawn((
            Npc {
                id: npc.id.clone(),
                name: npc.name.clone(),
                position: Vec3::from_array(npc.position),
            },
            SessionEntity,
        ));
    }

    combat_log.clear();
    combat_log.log(
        CombatLogEventType::SessionEvent,
        format!("Session started with {} enemies", spawned),
    );
    info!(
        "Session started: {} enemies, {} NPCs, seed {:?}",
        spawned,
        config.npcs.len(),
        rng.seed
    );

    commands.insert_resource(SkillBar::from_loadout(&config.loadout, &skill_definitions));
    commands.insert_resource(ParticlePool::default());
    commands.insert_resource(ScoreBoard::default());
    commands.insert_resource(FrameIntents::default());
    commands.insert_resource(CameraRig::looking_at(spawn_point));
    commands.insert_resource(FpsSampler::default());
    commands.insert_resource(allocator);
    commands.insert_resource(rng);
    commands.insert_resource(SessionClock::default());
}

/// Despawn every session entity and drop the per-session resources.
pub fn teardown_session(mut commands: Commands, entities: Query<Entity, With<SessionEntity>>) {
    commands.remove_resource::<SessionClock>();

    let mut count = 0;
    for entity in entities.iter() {
        commands.entity(entity).despawn_recursive();
        count += 1;
    }

    commands.remove_resource::<SkillBar>();
    commands.remove_resource::<ParticlePool>();
    commands.remove_resource::<ScoreBoard>();
    commands.remove_resource::<CameraRig>();
    commands.remove_resource::<FpsSampler>();
    commands.remove_resource::<EnemyIdAllocator>();
    commands.remove_resource::<GameRng>();

    info!("Session torn down ({} entities despawned)", count);
}

/// Advance session time and let lapsed combos drop.
pub fn tick_session_clock(
    time: Res<Time>,
    mut clock: ResMut<SessionClock>,
    mut combat_log: ResMut<CombatLog>,
    mut score: ResMut<ScoreBoard>,
) {
    clock.elapsed += time.delta_secs();
    combat_log.session_time = clock.elapsed;
    score.expire_combo(clock.elapsed);
}

/// Count frames and publish the rate once per interval.
pub fn sample_fps(time: Res<Time>, mut sampler: ResMut<FpsSampler>) {
    sampler.frames += 1;
    sampler.timer.tick(time.delta());
    if sampler.timer.just_finished() {
        let elapsed = sampler.timer.duration().as_secs_f32().max(f32::EPSILON);
        sampler.fps = sampler.frames as f32 / elapsed;
        sampler.frames = 0;
    }
}
