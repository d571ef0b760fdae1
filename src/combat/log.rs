//! Combat logging
//!
//! Records all combat events for display and post-session analysis.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// A single entry in the combat log
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CombatLogEntry {
    /// Timestamp in session time (seconds since session start)
    pub timestamp: f32,
    /// The type of event
    pub event_type: CombatLogEventType,
    /// Human-readable description of the event
    pub message: String,
}

/// Types of combat log events for filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CombatLogEventType {
    /// Damage dealt by the player
    Damage,
    /// Damage taken by the player
    DamageTaken,
    /// Skill activated
    Skill,
    /// Enemy died
    Kill,
    /// Item dropped or consumed
    Loot,
    /// Boss entered a new phase
    BossPhase,
    /// Element reaction triggered
    Reaction,
    /// Timed modifier applied or expired
    Buff,
    /// NPC interaction
    Npc,
    /// Session event (start, end, spawns)
    SessionEvent,
}

/// Summary of the session written alongside the log
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionMetadata {
    /// Why the session ended ("cleared", "defeated", "timeout", "aborted")
    pub outcome: String,
    pub duration_secs: f32,
    pub score: u32,
    pub max_combo: u32,
    pub enemies_killed: usize,
    pub enemies_total: usize,
    pub final_health: f32,
    pub final_energy: f32,
    pub random_seed: Option<u64>,
}

#[derive(Serialize)]
struct SavedLog<'a> {
    metadata: &'a SessionMetadata,
    entries: &'a [CombatLogEntry],
}

/// The combat log resource storing all events
#[derive(Resource, Default)]
pub struct CombatLog {
    /// All log entries in chronological order
    pub entries: Vec<CombatLogEntry>,
    /// Current session time
    pub session_time: f32,
}

impl CombatLog {
    /// Clear the log for a new session
    pub fn clear(&mut self) {
        self.entries.clear();
        self.session_time = 0.0;
    }

    /// Add a new entry to the log
    pub fn log(&mut self, event_type: CombatLogEventType, message: String) {
        self.entries.push(CombatLogEntry {
            timestamp: self.session_time,
            event_type,
            message,
        });
    }

    /// Get entries filtered by event type
    pub fn filter_by_type(&self, event_type: CombatLogEventType) -> Vec<&CombatLogEntry> {
        self.entries
            .iter()
            .filter(|e| e.event_type == event_type)
            .collect()
    }

    /// Get only HP-changing events (damage dealt and taken)
    pub fn hp_changes_only(&self) -> Vec<&CombatLogEntry> {
        self.entries
            .iter()
            .filter(|e| {
                matches!(
                    e.event_type,
                    CombatLogEventType::Damage | CombatLogEventType::DamageTaken
                )
            })
            .collect()
    }

    /// Get the last N entries
    pub fn recent(&self, count: usize) -> Vec<&CombatLogEntry> {
        self.entries.iter().rev().take(count).rev().collect()
    }

    /// Number of kill entries
    pub fn kill_count(&self) -> usize {
        self.filter_by_type(CombatLogEventType::Kill).len()
    }

    /// Serialize the log and its metadata as pretty JSON.
    pub fn to_json(&self, metadata: &SessionMetadata) -> Result<String, String> {
        serde_json::to_string_pretty(&SavedLog {
            metadata,
            entries: &self.entries,
        })
        .map_err(|e| format!("Failed to serialize combat log: {}", e))
    }

    /// Write the log to `output_path`, or to a timestamped file under
    /// `session_logs/` when no path is given. Returns the path written.
    pub fn save_to_file(
        &self,
        metadata: &SessionMetadata,
        output_path: Option<&str>,
    ) -> Result<String, String> {
        let path = match output_path {
            Some(path) => path.to_string(),
            None => {
                std::fs::create_dir_all("session_logs")
                    .map_err(|e| format!("Failed to create session_logs: {}", e))?;
                let stamp = std::time::SystemTime::now()
                    .duration_since(std::time::UNIX_EPOCH)
                    .map(|d| d.as_secs())
                    .unwrap_or(0);
                format!("session_logs/session_{}.json", stamp)
            }
        };

        let contents = self.to_json(metadata)?;
        std::fs::write(&path, contents).map_err(|e| format!("Failed to write {}: {}", path, e))?;
        Ok(path)
    }
}
