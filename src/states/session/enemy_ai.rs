//! Enemy AI State Machine
//!
//! Each living enemy runs `PATROL -> CHASE -> ATTACK` against the player's
//! position. DEAD is terminal: it is entered the moment damage drops health
//! to zero (see [`Enemy::apply_damage`]) and the AI never evaluates a dead
//! enemy again.
//!
//! Chase has a leash: an enemy starts chasing below `detection_range` but
//! only returns to patrol beyond `detection_range * LEASH_FACTOR`, so a
//! player standing on the boundary does not make it flicker between states.

use bevy::prelude::*;
use smallvec::SmallVec;

use crate::combat::events::{EnemyId, PlayerDamagedEvent, PlayerDefeatedEvent};
use crate::combat::math::resolve_incoming_damage;
use super::components::*;
use super::config::EnemySpawn;
use super::constants::*;
use super::enemy_config::EnemyDefinitions;
use super::modifiers::ModifierStack;

/// A strike an enemy lands this tick, before the player's defense
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnemyStrike {
    pub attacker: EnemyId,
    pub power: f32,
}

/// A boss phase transition produced by a damage application
#[derive(Clone, Debug, PartialEq)]
pub struct BossPhaseChange {
    pub phase: usize,
    pub threshold: f32,
    pub ability: Option<String>,
}

/// Request to add an enemy to a running session
#[derive(Event, Clone, Debug)]
pub struct SpawnEnemyRequest {
    pub spawn: EnemySpawn,
}

/// Advance one enemy by `dt` seconds.
///
/// Transitions are evaluated first, then the current state acts, so an enemy
/// that notices the player this tick also starts moving toward them this tick.
/// Returns a strike when an attacking enemy's timer fires.
pub fn advance_enemy(enemy: &mut Enemy, player_position: Vec3, dt: f32) -> Option<EnemyStrike> {
    if enemy.is_dead() {
        return None;
    }

    enemy.attack_timer = (enemy.attack_timer - dt).max(0.0);

    let distance = horizontal_distance(enemy.position, player_position);
    enemy.state = next_state(enemy, distance);

    match enemy.state {
        AiState::Patrol => {
            patrol(enemy, dt);
            None
        }
        AiState::Chase => {
            let speed = enemy.move_speed;
            step_toward(enemy, player_position, speed * dt);
            None
        }
        AiState::Attack => {
            face_toward(enemy, player_position);
            if enemy.attack_timer <= 0.0 {
                enemy.attack_timer = ENEMY_ATTACK_INTERVAL;
                Some(EnemyStrike {
                    attacker: enemy.id,
                    power: enemy.attack_power,
                })
            } else {
                None
            }
        }
        AiState::Retreat | AiState::Dead => None,
    }
}

/// Pick the state for this tick from the current state and player distance
fn next_state(enemy: &Enemy, distance: f32) -> AiState {
    let config = &enemy.config;

    match enemy.state {
        AiState::Patrol if distance < config.detection_range => AiState::Chase,
        AiState::Chase if distance < config.attack_range => AiState::Attack,
        AiState::Chase if distance > config.detection_range * LEASH_FACTOR => AiState::Patrol,
        AiState::Attack if distance > config.attack_range => AiState::Chase,
        AiState::Retreat => AiState::Patrol,
        state => state,
    }
}

fn patrol(enemy: &mut Enemy, dt: f32) {
    let Some(&waypoint) = enemy.patrol_points.get(enemy.patrol_index) else {
        return;
    };

    if horizontal_distance(enemy.position, waypoint) < PATROL_ARRIVAL_EPSILON {
        enemy.patrol_index = (enemy.patrol_index + 1) % enemy.patrol_points.len();
        return;
    }

    let speed = enemy.move_speed * PATROL_SPEED_FACTOR;
    step_toward(enemy, waypoint, speed * dt);
}

/// Move along the XZ plane toward `target` without overshooting it
fn step_toward(enemy: &mut Enemy, target: Vec3, max_step: f32) {
    let offset = Vec3::new(target.x - enemy.position.x, 0.0, target.z - enemy.position.z);
    let distance = offset.length();
    if distance <= f32::EPSILON {
        return;
    }

    let step = max_step.min(distance);
    enemy.position += offset / distance * step;
    enemy.facing = offset.x.atan2(offset.z);
}

fn face_toward(enemy: &mut Enemy, target: Vec3) {
    let dx = target.x - enemy.position.x;
    let dz = target.z - enemy.position.z;
    if dx != 0.0 || dz != 0.0 {
        enemy.facing = dx.atan2(dz);
    }
}

/// Apply any boss phase thresholds the enemy's health has crossed.
///
/// Thresholds only fire downward and at most once each; a single heavy hit
/// can cross several. Multipliers are applied to the base stats.
pub fn check_boss_phase(enemy: &mut Enemy) -> SmallVec<[BossPhaseChange; 2]> {
    let mut changes = SmallVec::new();
    if enemy.is_dead() {
        return changes;
    }

    let percent = enemy.health_percent();
    while let Some(next) = enemy.config.boss_phases.get(enemy.phase + 1) {
        if percent > next.threshold {
            break;
        }
        enemy.phase += 1;
        enemy.attack_power = enemy.config.attack * next.attack_multiplier;
        enemy.move_speed = enemy.config.move_speed * next.speed_multiplier;
        changes.push(BossPhaseChange {
            phase: enemy.phase,
            threshold: next.threshold,
            ability: next.ability.clone(),
        });
    }

    changes
}

/// Resolve an enemy strike against the player: defense, then absorb shields,
/// then health. Returns (damage to health, damage absorbed).
pub fn resolve_strike(
    strike: EnemyStrike,
    player: &mut PlayerState,
    modifiers: &mut ModifierStack,
    equipment: &CombatStatModifiers,
) -> (f32, f32) {
    let defense = player.base_defense + equipment.defense_bonus + modifiers.defense_bonus();
    let damage = resolve_incoming_damage(strike.power, defense);
    let (through, absorbed) = modifiers.absorb_damage(damage);
    let dealt = player.take_damage(through);
    (dealt, absorbed)
}

/// Advance every living enemy and apply their strikes to the player.
pub fn advance_enemy_ai(
    time: Res<Time>,
    equipment: Res<CombatStatModifiers>,
    mut players: Query<(&mut PlayerState, &mut ModifierStack)>,
    mut enemies: Query<&mut Enemy>,
    mut damaged_events: EventWriter<PlayerDamagedEvent>,
    mut defeated_events: EventWriter<PlayerDefeatedEvent>,
) {
    let dt = time.delta_secs();
    let Ok((mut player, mut modifiers)) = players.get_single_mut() else {
        return;
    };

    for mut enemy in enemies.iter_mut() {
        let Some(strike) = advance_enemy(&mut enemy, player.position, dt) else {
            continue;
        };
        if !player.is_alive() {
            continue;
        }

        let (dealt, absorbed) = resolve_strike(strike, &mut player, &mut modifiers, &equipment);
        damaged_events.send(PlayerDamagedEvent {
            attacker: strike.attacker,
            amount: dealt,
            absorbed,
            world_position: player.position,
        });

        if player.health <= 0.0 && !player.defeated {
            player.defeated = true;
            info!("Player defeated by {} {}", enemy.config.name, enemy.id);
            defeated_events.send(PlayerDefeatedEvent {
                world_position: player.position,
            });
        }
    }
}

/// Sink dead enemies into the ground and despawn them once out of sight.
pub fn sink_corpses(
    time: Res<Time>,
    mut commands: Commands,
    mut enemies: Query<(Entity, &mut Enemy)>,
) {
    let dt = time.delta_secs();

    for (entity, mut enemy) in enemies.iter_mut() {
        if !enemy.is_dead() {
            continue;
        }
        enemy.position.y -= CORPSE_SINK_SPEED * dt;
        if enemy.position.y < CORPSE_DESPAWN_HEIGHT {
            commands.entity(entity).despawn_recursive();
        }
    }
}

/// Spawn an enemy from a roster entry.
///
/// Unknown kinds fail closed: nothing is spawned and a warning is logged.
pub fn spawn_enemy(
    commands: &mut Commands,
    allocator: &mut EnemyIdAllocator,
    definitions: &EnemyDefinitions,
    spawn: &EnemySpawn,
) -> Option<EnemyId> {
    let Some(config) = definitions.get(&spawn.kind) else {
        warn!("Unknown enemy kind '{}', spawn skipped", spawn.kind);
        return None;
    };

    let id = allocator.allocate();
    let mut patrol = spawn.patrol_points();
    if patrol.is_empty() {
        patrol.push(spawn.position());
    }

    commands.spawn((
        Enemy::new(id, spawn.kind.clone(), config.clone(), spawn.position(), patrol),
        SessionEntity,
    ));
    debug!("Spawned {} {} at {:?}", config.name, id, spawn.position);
    Some(id)
}

/// Handle spawn requests raised during the session.
pub fn process_spawn_requests(
    mut commands: Commands,
    mut requests: EventReader<SpawnEnemyRequest>,
    mut allocator: ResMut<EnemyIdAllocator>,
    definitions: Res<EnemyDefinitions>,
) {
    for request in requests.read() {
        spawn_enemy(&mut commands, &mut allocator, &definitions, &request.spawn);
    }
}
