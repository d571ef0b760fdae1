//! Play Session - the combat and AI simulation core
//!
//! One session is a player fighting a roster of enemies on an open field.
//! Everything that changes per frame lives in ECS components and resources;
//! the systems that advance it are stable functions scheduled in ordered
//! [`systems::FramePhase`]s.
//!
//! ## Flow
//! 1. `setup_session`: spawns the player, enemies and NPCs from `SessionConfig`
//!    and inserts the per-session resources
//! 2. Each frame, in order:
//!    - intents are sampled (keyboard or headless pilot)
//!    - the player moves, sprints and jumps
//!    - melee and skills resolve against enemies
//!    - enemy state machines advance and strike back
//!    - kills are scored and loot rolled; the combat log and quest hooks
//!      receive the frame's events
//!    - particles are emitted and integrated, the camera follows
//! 3. `teardown_session`: despawns everything the session spawned
//!
//! Skill and melee cooldowns count down in `FixedUpdate` at 60 Hz.

pub mod components;
pub mod config;
pub mod constants;
pub mod enemy_ai;
pub mod enemy_config;
pub mod hit_resolution;
pub mod input;
pub mod item_config;
pub mod lifecycle;
pub mod modifiers;
pub mod particles;
pub mod player;
pub mod skill_config;
pub mod skills;
pub mod snapshot;
pub mod systems;

pub use components::*;
pub use config::{EnemySpawn, NpcSpawn, SessionConfig};
pub use enemy_ai::SpawnEnemyRequest;
pub use input::FrameIntents;
pub use lifecycle::{session_outcome, setup_session, teardown_session, FpsSampler, SessionOutcome};
pub use modifiers::{ModifierKind, ModifierStack, TimedModifier};
pub use particles::{ParticleBurst, ParticlePool};
pub use skills::{ActivationRefusal, SkillBar, SkillInstance};
pub use snapshot::{restore_session, snapshot_session, SessionSnapshot};

use bevy::prelude::*;

use enemy_config::{load_enemy_definitions, EnemyDefinitions};
use item_config::{load_item_catalog, ItemCatalog};
use skill_config::{load_skill_definitions, SkillDefinitions};

/// Registers the session events and the resources that outlive a session.
///
/// Scheduling is separate: call `systems::configure_frame_phases` and
/// `systems::add_core_session_systems` with the run condition of the build.
pub struct SessionPlugin;

impl Plugin for SessionPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<ParticleBurst>()
            .add_event::<SpawnEnemyRequest>()
            .init_resource::<FrameIntents>()
            .init_resource::<CombatStatModifiers>()
            .init_resource::<SessionConfig>();
    }
}

/// Load every definition file and cross-check loot against the catalog.
pub fn load_session_content() -> Result<(EnemyDefinitions, SkillDefinitions, ItemCatalog), String> {
    let enemies = load_enemy_definitions()?;
    let skills = load_skill_definitions()?;
    let items = load_item_catalog()?;

    let unknown = enemies.unknown_loot(|item_id| items.contains(item_id));
    if !unknown.is_empty() {
        return Err(format!("Enemy loot names unknown items: {:?}", unknown));
    }

    Ok((enemies, skills, items))
}

/// Bevy plugin loading skill, enemy and item definitions at startup
pub struct SessionContentPlugin;

impl Plugin for SessionContentPlugin {
    fn build(&self, app: &mut App) {
        match load_session_content() {
            Ok((enemies, skills, items)) => {
                app.insert_resource(enemies)
                    .insert_resource(skills)
                    .insert_resource(items);
            }
            Err(e) => {
                // Bundled content must always load
                panic!("Failed to load session content: {}", e);
            }
        }
    }
}
