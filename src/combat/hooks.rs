//! Quest hooks
//!
//! The session owner hands the combat core a [`QuestHooks`] implementation at
//! construction time. The core forwards kills, skill uses and NPC talks to it
//! and never queries quest state back.

use bevy::prelude::*;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Callback interface for the quest/dialogue collaborator
pub trait QuestHooks: Send + Sync {
    /// An enemy of the given kind died
    fn on_enemy_killed(&self, kind: &str);
    /// A skill was activated
    fn on_skill_used(&self, skill_id: &str);
    /// The player talked to an NPC
    fn on_npc_talked_to(&self, npc_id: &str);
}

/// Hooks that ignore every notification
#[derive(Debug, Default, Clone, Copy)]
pub struct NoQuestHooks;

impl QuestHooks for NoQuestHooks {
    fn on_enemy_killed(&self, _kind: &str) {}
    fn on_skill_used(&self, _skill_id: &str) {}
    fn on_npc_talked_to(&self, _npc_id: &str) {}
}

/// Resource holding the injected hooks
#[derive(Resource, Clone)]
pub struct SessionHooks(pub Arc<dyn QuestHooks>);

impl SessionHooks {
    pub fn new(hooks: Arc<dyn QuestHooks>) -> Self {
        Self(hooks)
    }
}

impl Default for SessionHooks {
    fn default() -> Self {
        Self(Arc::new(NoQuestHooks))
    }
}

/// Counts of everything reported through [`QuestHooks`]
#[derive(Debug, Default, Clone, PartialEq)]
pub struct QuestProgress {
    /// Kills per enemy kind
    pub kills: HashMap<String, u32>,
    /// Activations per skill id
    pub skills_used: HashMap<String, u32>,
    /// NPCs talked to, in order
    pub npcs_talked_to: Vec<String>,
}

impl QuestProgress {
    pub fn total_kills(&self) -> u32 {
        self.kills.values().sum()
    }
}

/// Thread-safe tally used by the headless runner and tests
#[derive(Debug, Default)]
pub struct QuestTally {
    progress: Mutex<QuestProgress>,
}

impl QuestTally {
    pub fn snapshot(&self) -> QuestProgress {
        match self.progress.lock() {
            Ok(progress) => progress.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    fn update(&self, f: impl FnOnce(&mut QuestProgress)) {
        match self.progress.lock() {
            Ok(mut progress) => f(&mut progress),
            Err(poisoned) => f(&mut poisoned.into_inner()),
        }
    }
}

impl QuestHooks for QuestTally {
    fn on_enemy_killed(&self, kind: &str) {
        self.update(|p| *p.kills.entry(kind.to_string()).or_insert(0) += 1);
    }

    fn on_skill_used(&self, skill_id: &str) {
        self.update(|p| *p.skills_used.entry(skill_id.to_string()).or_insert(0) += 1);
    }

    fn on_npc_talked_to(&self, npc_id: &str) {
        self.update(|p| p.npcs_talked_to.push(npc_id.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tally_counts_each_notification() {
        let tally = QuestTally::default();
        tally.on_enemy_killed("swordsman");
        tally.on_enemy_killed("swordsman");
        tally.on_enemy_killed("archer");
        tally.on_skill_used("dragon_palm");
        tally.on_npc_talked_to("elder_wang");

        let progress = tally.snapshot();
        assert_eq!(progress.kills.get("swordsman"), Some(&2));
        assert_eq!(progress.total_kills(), 3);
        assert_eq!(progress.skills_used.get("dragon_palm"), Some(&1));
        assert_eq!(progress.npcs_talked_to, vec!["elder_wang".to_string()]);
    }
}
