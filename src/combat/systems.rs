//! Combat systems
//!
//! Consumers of the combat events: the combat log and the quest hooks.

use bevy::prelude::*;

use super::events::*;
use super::hooks::SessionHooks;
use super::log::{CombatLog, CombatLogEventType};
use crate::states::session::Enemy;

fn enemy_name(enemies: &Query<&Enemy>, id: EnemyId) -> String {
    enemies
        .iter()
        .find(|e| e.id == id)
        .map(|e| format!("{} {}", e.config.name, id))
        .unwrap_or_else(|| format!("Enemy {}", id))
}

/// Record hits, kills and skill use in the combat log
pub fn record_combat_log(
    mut combat_log: ResMut<CombatLog>,
    enemies: Query<&Enemy>,
    mut damage_events: EventReader<DamageEvent>,
    mut taken_events: EventReader<PlayerDamagedEvent>,
    mut killed_events: EventReader<EnemyKilledEvent>,
    mut skill_events: EventReader<SkillUsedEvent>,
    mut reaction_events: EventReader<ElementReactionEvent>,
    mut phase_events: EventReader<BossPhaseChangedEvent>,
) {
    for event in skill_events.read() {
        combat_log.log(
            CombatLogEventType::Skill,
            format!("Player uses {} (slot {})", event.skill_id, event.slot + 1),
        );
    }

    for event in reaction_events.read() {
        let message = format!(
            "{} on {} for {:.0}",
            event.reaction.name(),
            enemy_name(&enemies, event.target),
            event.damage
        );
        combat_log.log(CombatLogEventType::Reaction, message);
    }

    for event in damage_events.read() {
        let source = event.skill_id.as_deref().unwrap_or("Attack");
        let crit = if event.is_critical { " (Critical)" } else { "" };
        let message = format!(
            "Player's {} hits {} for {:.0}{}",
            source,
            enemy_name(&enemies, event.target),
            event.amount,
            crit
        );
        combat_log.log(CombatLogEventType::Damage, message);
    }

    for event in phase_events.read() {
        let ability = event
            .ability
            .as_deref()
            .map(|a| format!(", unlocking {}", a))
            .unwrap_or_default();
        let message = format!(
            "{} enters phase {} below {:.0}% health{}",
            enemy_name(&enemies, event.enemy),
            event.phase + 1,
            event.threshold,
            ability
        );
        combat_log.log(CombatLogEventType::BossPhase, message);
    }

    for event in killed_events.read() {
        let message = format!("{} has been slain", enemy_name(&enemies, event.enemy));
        combat_log.log(CombatLogEventType::Kill, message);
    }

    for event in taken_events.read() {
        let absorbed = if event.absorbed > 0.0 {
            format!(" ({:.0} absorbed)", event.absorbed)
        } else {
            String::new()
        };
        let message = format!(
            "{} hits Player for {:.0}{}",
            enemy_name(&enemies, event.attacker),
            event.amount,
            absorbed
        );
        combat_log.log(CombatLogEventType::DamageTaken, message);
    }
}

/// Record loot, buffs, NPC talks and defeat in the combat log
pub fn record_session_log(
    mut combat_log: ResMut<CombatLog>,
    mut drop_events: EventReader<ItemDropRequest>,
    mut consume_events: EventReader<ItemConsumeRequest>,
    mut npc_events: EventReader<NpcTalkedToEvent>,
    mut applied_events: EventReader<ModifierAppliedEvent>,
    mut expired_events: EventReader<ModifierExpiredEvent>,
    mut defeated_events: EventReader<PlayerDefeatedEvent>,
) {
    for event in drop_events.read() {
        combat_log.log(
            CombatLogEventType::Loot,
            format!("Enemy {} dropped {}", event.source, event.item_id),
        );
    }
    for event in consume_events.read() {
        combat_log.log(CombatLogEventType::Loot, format!("Player uses {}", event.item_id));
    }
    for event in npc_events.read() {
        combat_log.log(CombatLogEventType::Npc, format!("Player talks to {}", event.npc_id));
    }
    for event in applied_events.read() {
        combat_log.log(
            CombatLogEventType::Buff,
            format!("{}: {} for {:.0}s", event.source, event.description, event.duration),
        );
    }
    for event in expired_events.read() {
        combat_log.log(CombatLogEventType::Buff, format!("{} fades", event.source));
    }
    for _ in defeated_events.read() {
        combat_log.log(CombatLogEventType::SessionEvent, "Player has been defeated".to_string());
    }
}

/// Forward kills, skill uses and NPC talks to the injected quest hooks
pub fn forward_quest_hooks(
    hooks: Res<SessionHooks>,
    mut killed_events: EventReader<EnemyKilledEvent>,
    mut skill_events: EventReader<SkillUsedEvent>,
    mut npc_events: EventReader<NpcTalkedToEvent>,
) {
    for event in killed_events.read() {
        hooks.0.on_enemy_killed(&event.kind);
    }
    for event in skill_events.read() {
        hooks.0.on_skill_used(&event.skill_id);
    }
    for event in npc_events.read() {
        hooks.0.on_npc_talked_to(&event.npc_id);
    }
}
