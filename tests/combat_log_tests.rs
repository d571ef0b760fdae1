//! Combat log queries and the event-to-log system

use bevy::prelude::*;
use wuxiasim::combat::events::{
    DamageEvent, EnemyId, EnemyKilledEvent, PlayerDamagedEvent, SkillUsedEvent,
};
use wuxiasim::combat::log::SessionMetadata;
use wuxiasim::combat::systems::record_combat_log;
use wuxiasim::combat::CombatPlugin;
use wuxiasim::{CombatLog, CombatLogEventType};

fn sample_log() -> CombatLog {
    let mut log = CombatLog::default();
    log.log(CombatLogEventType::SessionEvent, "Session started".to_string());
    log.session_time = 1.0;
    log.log(CombatLogEventType::Damage, "Player's Attack hits #1 for 20".to_string());
    log.session_time = 1.5;
    log.log(CombatLogEventType::DamageTaken, "#1 hits Player for 10".to_string());
    log.session_time = 2.0;
    log.log(CombatLogEventType::Kill, "#1 has been slain".to_string());
    log
}

fn metadata() -> SessionMetadata {
    SessionMetadata {
        outcome: "cleared".to_string(),
        duration_secs: 2.0,
        score: 100,
        max_combo: 1,
        enemies_killed: 1,
        enemies_total: 1,
        final_health: 90.0,
        final_energy: 100.0,
        random_seed: Some(3),
    }
}

#[test]
fn test_queries_over_entries() {
    let log = sample_log();

    assert_eq!(log.filter_by_type(CombatLogEventType::Damage).len(), 1);
    assert_eq!(log.hp_changes_only().len(), 2);
    assert_eq!(log.kill_count(), 1);

    let recent = log.recent(2);
    assert_eq!(recent.len(), 2);
    assert_eq!(recent[0].event_type, CombatLogEventType::DamageTaken);
    assert_eq!(recent[1].timestamp, 2.0);

    assert_eq!(log.recent(50).len(), 4);
}

#[test]
fn test_clear_resets_time() {
    let mut log = sample_log();
    log.clear();
    assert!(log.entries.is_empty());
    assert_eq!(log.session_time, 0.0);
}

#[test]
fn test_json_export_carries_metadata() {
    let json = sample_log().to_json(&metadata()).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();

    assert_eq!(value["metadata"]["outcome"], "cleared");
    assert_eq!(value["metadata"]["random_seed"], 3);
    assert_eq!(value["entries"].as_array().unwrap().len(), 4);
    assert_eq!(value["entries"][3]["event_type"], "Kill");
}

#[test]
fn test_save_to_explicit_path() {
    let path = std::env::temp_dir().join("wuxiasim_combat_log_test.json");
    let path_str = path.to_string_lossy().to_string();

    let written = sample_log().save_to_file(&metadata(), Some(&path_str)).unwrap();
    assert_eq!(written, path_str);
    let contents = std::fs::read_to_string(&path).unwrap();
    assert!(contents.contains("has been slain"));
    let _ = std::fs::remove_file(&path);
}

#[test]
fn test_events_are_recorded() {
    let mut app = App::new();
    app.add_plugins((MinimalPlugins, CombatPlugin))
        .add_systems(Update, record_combat_log);

    let world = app.world_mut();
    world.send_event(SkillUsedEvent {
        skill_id: "dragon_palm".to_string(),
        slot: 0,
    });
    world.send_event(DamageEvent {
        target: EnemyId(4),
        amount: 30.0,
        is_critical: true,
        skill_id: None,
        world_position: Vec3::ZERO,
    });
    world.send_event(PlayerDamagedEvent {
        attacker: EnemyId(4),
        amount: 0.0,
        absorbed: 12.0,
        world_position: Vec3::ZERO,
    });
    world.send_event(EnemyKilledEvent {
        enemy: EnemyId(4),
        kind: "swordsman".to_string(),
        is_boss: false,
        world_position: Vec3::ZERO,
    });
    app.update();

    let log = app.world().resource::<CombatLog>();
    let skill = log.filter_by_type(CombatLogEventType::Skill);
    assert_eq!(skill.len(), 1);
    assert_eq!(skill[0].message, "Player uses dragon_palm (slot 1)");

    let damage = log.filter_by_type(CombatLogEventType::Damage);
    assert_eq!(damage[0].message, "Player's Attack hits Enemy #4 for 30 (Critical)");

    let taken = log.filter_by_type(CombatLogEventType::DamageTaken);
    assert!(taken[0].message.ends_with("(12 absorbed)"));

    assert_eq!(log.kill_count(), 1);
}
