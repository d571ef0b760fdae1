//! Combat system
//!
//! Implements the combat rules shared by every session:
//! - Damage formulas and critical rolls
//! - Element reactions
//! - Outbound combat events and the quest hook seam
//! - Combat logging

use bevy::prelude::*;

pub mod elements;
pub mod events;
pub mod hooks;
pub mod log;
pub mod math;
pub mod systems;

use events::*;

/// Plugin registering combat events and the combat log.
///
/// The systems consuming them run inside the session frame phases, see
/// `states::session::systems`.
pub struct CombatPlugin;

impl Plugin for CombatPlugin {
    fn build(&self, app: &mut App) {
        app
            // Combat events
            .add_event::<DamageEvent>()
            .add_event::<PlayerDamagedEvent>()
            .add_event::<EnemyKilledEvent>()
            .add_event::<SkillUsedEvent>()
            .add_event::<ItemDropRequest>()
            .add_event::<ItemConsumeRequest>()
            .add_event::<NpcTalkedToEvent>()
            .add_event::<BossPhaseChangedEvent>()
            .add_event::<ElementReactionEvent>()
            .add_event::<ModifierAppliedEvent>()
            .add_event::<ModifierExpiredEvent>()
            .add_event::<PlayerDefeatedEvent>()
            .add_event::<InventoryToggledEvent>()
            // Resources
            .init_resource::<log::CombatLog>()
            .init_resource::<hooks::SessionHooks>();
    }
}
