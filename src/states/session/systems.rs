//! Frame Scheduler
//!
//! This module provides a stable API for the session simulation systems.
//! Both graphical and headless modes import from here rather than directly
//! from internal modules.
//!
//! ## Frame Phases
//!
//! Session systems run in seven ordered phases each frame:
//!
//! 1. **Input** - Session clock, intent sampling (keyboard or pilot), fps sample
//! 2. **Movement** - Equipment stats, player movement, jump and gravity, modifier expiry
//! 3. **Actions** - Interactions, melee hit detection, skill activation
//! 4. **EnemyAi** - Enemy state machines and strikes, corpse sink, spawns
//! 5. **Resolution** - Kill scoring and loot, combat log, quest hooks
//! 6. **Particles** - Burst emission and particle integration
//! 7. **Camera** - Follow camera
//!
//! Skill and melee cooldowns tick separately in `FixedUpdate` at 60 Hz.
//!
//! ## Usage
//!
//! ```ignore
//! use crate::states::session::systems;
//!
//! systems::configure_frame_phases(&mut app);
//! systems::add_core_session_systems(&mut app, in_state(GameState::Playing));
//! ```

use bevy::prelude::*;

// === Phase 1: Input ===
pub use super::input::sample_player_input;
pub use super::lifecycle::{sample_fps, tick_session_clock};

// === Phase 2: Movement ===
pub use super::modifiers::update_modifiers;
pub use super::player::{apply_jump_and_gravity, apply_stat_modifiers, move_player};

// === Phase 3: Actions ===
pub use super::hit_resolution::resolve_player_attack;
pub use super::input::handle_interactions;
pub use super::skills::activate_skills;

// === Phase 4: Enemy AI ===
pub use super::enemy_ai::{advance_enemy_ai, process_spawn_requests, sink_corpses};

// === Phase 5: Resolution ===
pub use super::hit_resolution::resolve_kills;
pub use crate::combat::systems::{forward_quest_hooks, record_combat_log, record_session_log};

// === Phase 6: Particles ===
pub use super::particles::{emit_particle_bursts, integrate_particles};

// === Phase 7: Camera ===
pub use crate::camera::follow_player;

// === Fixed tick ===
pub use super::skills::tick_cooldowns;

use super::components::SessionClock;
use super::constants::FIXED_TICKS_PER_SECOND;

/// System set labels for frame phase ordering.
///
/// Use these to slot custom systems (an input source, a renderer sync)
/// into the frame at the right point.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FramePhase {
    Input,
    Movement,
    Actions,
    EnemyAi,
    Resolution,
    Particles,
    Camera,
}

/// Configures the ordering between frame phases and the fixed tick rate.
///
/// Call this once during app setup before adding session systems.
pub fn configure_frame_phases(app: &mut App) {
    app.insert_resource(Time::<Fixed>::from_hz(FIXED_TICKS_PER_SECOND as f64));
    app.configure_sets(
        Update,
        (
            FramePhase::Input,
            FramePhase::Movement,
            FramePhase::Actions,
            FramePhase::EnemyAi,
            FramePhase::Resolution,
            FramePhase::Particles,
            FramePhase::Camera,
        )
            .chain(),
    );
}

/// Adds the core session systems to the app.
///
/// Intent sampling is not included: the graphical build adds
/// `sample_player_input`, the headless build adds its pilot, both in
/// [`FramePhase::Input`] after `tick_session_clock`.
///
/// Every system is also gated on the session clock existing, so the loop
/// is inert before setup and after teardown.
pub fn add_core_session_systems<M>(app: &mut App, run_condition: impl Condition<M> + Clone)
where
    M: 'static,
{
    let live = resource_exists::<SessionClock>;

    app.add_systems(
        FixedUpdate,
        tick_cooldowns.run_if(run_condition.clone()).run_if(live),
    );

    // Phase 1: Input
    app.add_systems(
        Update,
        (tick_session_clock, sample_fps)
            .chain()
            .in_set(FramePhase::Input)
            .run_if(run_condition.clone())
            .run_if(live),
    );

    // Phase 2: Movement
    app.add_systems(
        Update,
        (apply_stat_modifiers, move_player, apply_jump_and_gravity, update_modifiers)
            .chain()
            .in_set(FramePhase::Movement)
            .run_if(run_condition.clone())
            .run_if(live),
    );

    // Phase 3: Actions
    app.add_systems(
        Update,
        (handle_interactions, resolve_player_attack, activate_skills)
            .chain()
            .in_set(FramePhase::Actions)
            .run_if(run_condition.clone())
            .run_if(live),
    );

    // Phase 4: Enemy AI
    app.add_systems(
        Update,
        (advance_enemy_ai, sink_corpses, process_spawn_requests)
            .chain()
            .in_set(FramePhase::EnemyAi)
            .run_if(run_condition.clone())
            .run_if(live),
    );

    // Phase 5: Resolution
    app.add_systems(
        Update,
        (resolve_kills, record_combat_log, record_session_log, forward_quest_hooks)
            .chain()
            .in_set(FramePhase::Resolution)
            .run_if(run_condition.clone())
            .run_if(live),
    );

    // Phase 6: Particles
    app.add_systems(
        Update,
        (emit_particle_bursts, integrate_particles)
            .chain()
            .in_set(FramePhase::Particles)
            .run_if(run_condition.clone())
            .run_if(live),
    );

    // Phase 7: Camera
    app.add_systems(
        Update,
        follow_player
            .in_set(FramePhase::Camera)
            .run_if(run_condition)
            .run_if(live),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_phases_are_distinct() {
        let phases = [
            FramePhase::Input,
            FramePhase::Movement,
            FramePhase::Actions,
            FramePhase::EnemyAi,
            FramePhase::Resolution,
            FramePhase::Particles,
            FramePhase::Camera,
        ];
        for (i, a) in phases.iter().enumerate() {
            for b in &phases[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }
}
