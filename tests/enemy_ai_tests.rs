//! Enemy state machine and boss phases against the shipped enemy data

use bevy::prelude::*;
use wuxiasim::combat::events::EnemyId;
use wuxiasim::states::session::enemy_ai::{advance_enemy, check_boss_phase};
use wuxiasim::states::session::enemy_config::load_enemy_definitions;
use wuxiasim::states::session::{AiState, Enemy};

fn spawn(kind: &str) -> Enemy {
    let definitions = load_enemy_definitions().expect("enemies.ron should load");
    let config = definitions.get(kind).expect("kind exists").clone();
    // No patrol route, so a patrolling enemy stands still
    Enemy::new(EnemyId(1), kind, config, Vec3::ZERO, Vec::new())
}

#[test]
fn test_swordsman_notices_chases_and_strikes() {
    let mut enemy = spawn("swordsman");

    assert!(advance_enemy(&mut enemy, Vec3::new(20.0, 0.0, 0.0), 0.1).is_none());
    assert_eq!(enemy.state, AiState::Patrol);

    assert!(advance_enemy(&mut enemy, Vec3::new(10.0, 0.0, 0.0), 0.1).is_none());
    assert_eq!(enemy.state, AiState::Chase);
    assert!(enemy.position.x > 0.0, "a chasing enemy closes in");

    let player = enemy.position + Vec3::new(2.0, 0.0, 0.0);
    let strike = advance_enemy(&mut enemy, player, 0.1).expect("first strike is immediate");
    assert_eq!(enemy.state, AiState::Attack);
    assert_eq!(strike.attacker, EnemyId(1));
    assert_eq!(strike.power, 10.0);

    // One strike per second
    assert!(advance_enemy(&mut enemy, player, 0.5).is_none());
    assert!(advance_enemy(&mut enemy, player, 0.5).is_some());
}

#[test]
fn test_chase_leash_prevents_flicker() {
    let mut enemy = spawn("swordsman");
    advance_enemy(&mut enemy, Vec3::new(10.0, 0.0, 0.0), 0.0);
    assert_eq!(enemy.state, AiState::Chase);

    // Past detection range but inside the leash
    let player = enemy.position + Vec3::new(17.0, 0.0, 0.0);
    advance_enemy(&mut enemy, player, 0.0);
    assert_eq!(enemy.state, AiState::Chase);

    let player = enemy.position + Vec3::new(19.0, 0.0, 0.0);
    advance_enemy(&mut enemy, player, 0.0);
    assert_eq!(enemy.state, AiState::Patrol);
}

#[test]
fn test_attack_falls_back_to_chase() {
    let mut enemy = spawn("swordsman");
    advance_enemy(&mut enemy, Vec3::new(10.0, 0.0, 0.0), 0.0);
    advance_enemy(&mut enemy, Vec3::new(1.0, 0.0, 0.0), 0.0);
    assert_eq!(enemy.state, AiState::Attack);

    advance_enemy(&mut enemy, Vec3::new(8.0, 0.0, 0.0), 0.0);
    assert_eq!(enemy.state, AiState::Chase);
}

#[test]
fn test_kill_is_reported_once() {
    let mut enemy = spawn("swordsman");
    let kills = (0..5)
        .filter_map(|_| enemy.apply_damage(20.0))
        .filter(|outcome| outcome.killed)
        .count();

    assert_eq!(kills, 1);
    assert_eq!(enemy.state, AiState::Dead);
    assert!(enemy.apply_damage(20.0).is_none());
    assert!(advance_enemy(&mut enemy, Vec3::new(1.0, 0.0, 0.0), 1.0).is_none());
}

#[test]
fn test_boss_phases_fire_once_each() {
    let mut boss = spawn("boss_litianxiong");

    boss.apply_damage(175.0);
    let changes = check_boss_phase(&mut boss);
    assert_eq!(changes.len(), 1);
    assert_eq!(changes[0].phase, 1);
    assert_eq!(changes[0].ability.as_deref(), Some("Sword Qi"));
    assert!((boss.attack_power - 39.0).abs() < 1e-3);

    assert!(check_boss_phase(&mut boss).is_empty());

    boss.apply_damage(200.0);
    let changes = check_boss_phase(&mut boss);
    assert_eq!(changes.len(), 1);
    assert_eq!(changes[0].phase, 2);
    assert!((boss.attack_power - 48.0).abs() < 1e-3);
    assert!((boss.move_speed - 12.0).abs() < 1e-3);
}

#[test]
fn test_heavy_hit_crosses_two_phases() {
    let mut boss = spawn("boss_litianxiong");
    boss.apply_damage(400.0);

    let phases: Vec<usize> = check_boss_phase(&mut boss).iter().map(|c| c.phase).collect();
    assert_eq!(phases, vec![1, 2]);
    assert_eq!(boss.phase, 2);
}

#[test]
fn test_dead_boss_changes_no_phase() {
    let mut boss = spawn("boss_litianxiong");
    let outcome = boss.apply_damage(1000.0).unwrap();
    assert!(outcome.killed);
    assert_eq!(outcome.applied, 500.0);
    assert!(check_boss_phase(&mut boss).is_empty());
    assert_eq!(boss.phase, 0);
}
