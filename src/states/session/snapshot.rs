//! Session snapshot
//!
//! The subset of session state the persistence collaborator stores. The
//! core only produces and consumes the value; where it is written is not its
//! concern.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use super::components::{CombatStatModifiers, PlayerState, ScoreBoard};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub health: f32,
    pub max_health: f32,
    pub energy: f32,
    pub max_energy: f32,
    pub position: [f32; 3],
    pub score: u32,
    pub combo: u32,
}

pub fn snapshot_session(player: &PlayerState, score: &ScoreBoard) -> SessionSnapshot {
    SessionSnapshot {
        health: player.health,
        max_health: player.max_health,
        energy: player.energy,
        max_energy: player.max_energy,
        position: player.position.to_array(),
        score: score.score,
        combo: score.combo,
    }
}

/// Restore a snapshot into live state at session time `now`.
///
/// Pools are clamped to the restored maxima, so a hand-edited or stale
/// snapshot cannot break the health invariant. The base maxima are derived
/// by taking the current equipment bonus off the stored maxima, and a
/// restored combo gets a fresh window starting at `now`.
pub fn restore_session(
    snapshot: &SessionSnapshot,
    equipment: &CombatStatModifiers,
    now: f32,
    player: &mut PlayerState,
    score: &mut ScoreBoard,
) {
    player.base_max_health = snapshot.max_health - equipment.max_health_bonus;
    player.base_max_energy = snapshot.max_energy - equipment.max_energy_bonus;
    player.apply_stat_modifiers(equipment);
    player.health = snapshot.health.clamp(0.0, player.max_health);
    player.energy = snapshot.energy.clamp(0.0, player.max_energy);
    player.position = Vec3::from_array(snapshot.position);
    player.defeated = player.health <= 0.0;
    score.score = snapshot.score;
    score.combo = snapshot.combo;
    score.max_combo = score.max_combo.max(snapshot.combo);
    score.last_hit_at = (snapshot.combo > 0).then_some(now);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> SessionSnapshot {
        SessionSnapshot {
            health: 500.0,
            max_health: 120.0,
            energy: -3.0,
            max_energy: 100.0,
            position: [1.0, 1.5, -2.0],
            score: 300,
            combo: 2,
        }
    }

    #[test]
    fn test_restore_clamps_pools() {
        let mut player = PlayerState::new(Vec3::ZERO);
        let mut score = ScoreBoard::default();
        restore_session(&snapshot(), &CombatStatModifiers::default(), 0.0, &mut player, &mut score);

        assert_eq!(player.health, 120.0);
        assert_eq!(player.energy, 0.0);
        assert_eq!(player.position, Vec3::new(1.0, 1.5, -2.0));
        assert_eq!(score.score, 300);
        assert_eq!(snapshot_session(&player, &score).max_health, 120.0);
    }

    #[test]
    fn test_restored_maxima_survive_equipment_refresh() {
        let equipment = CombatStatModifiers {
            max_health_bonus: 20.0,
            max_energy_bonus: 10.0,
            ..Default::default()
        };
        let mut player = PlayerState::new(Vec3::ZERO);
        let mut score = ScoreBoard::default();
        restore_session(&snapshot(), &equipment, 0.0, &mut player, &mut score);

        assert_eq!(player.base_max_health, 100.0);
        assert_eq!(player.base_max_energy, 90.0);

        player.apply_stat_modifiers(&equipment);
        assert_eq!(player.max_health, 120.0);
        assert_eq!(player.max_energy, 100.0);

        // Unequipping drops only the bonus
        player.apply_stat_modifiers(&CombatStatModifiers::default());
        assert_eq!(player.max_health, 100.0);
        assert_eq!(player.max_energy, 90.0);
    }

    #[test]
    fn test_restored_combo_expires() {
        let mut player = PlayerState::new(Vec3::ZERO);
        let mut score = ScoreBoard::default();
        restore_session(&snapshot(), &CombatStatModifiers::default(), 10.0, &mut player, &mut score);

        assert_eq!(score.last_hit_at, Some(10.0));
        score.expire_combo(11.0);
        assert_eq!(score.combo, 2);
        score.expire_combo(13.0);
        assert_eq!(score.combo, 0);
    }

    #[test]
    fn test_restored_zero_combo_has_no_window() {
        let mut player = PlayerState::new(Vec3::ZERO);
        let mut score = ScoreBoard {
            last_hit_at: Some(4.0),
            ..Default::default()
        };
        let stored = SessionSnapshot {
            combo: 0,
            ..snapshot()
        };
        restore_session(&stored, &CombatStatModifiers::default(), 5.0, &mut player, &mut score);

        assert_eq!(score.combo, 0);
        assert_eq!(score.last_hit_at, None);
        assert_eq!(score.register_hit(5.5), 1);
    }
}
