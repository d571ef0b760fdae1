//! Player movement and physics
//!
//! Horizontal movement, the sprint energy economy, jumping with a single
//! double-jump charge, and gravity. All integration is scaled by frame delta
//! time so the avatar moves the same distance at any frame rate.

use bevy::prelude::*;

use super::components::*;
use super::constants::*;
use super::input::FrameIntents;
use super::modifiers::ModifierStack;
use super::particles::ParticleBurst;

/// What a jump step did, for effects
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum JumpOutcome {
    None,
    Jumped,
    DoubleJumped,
    Landed,
}

/// Advance horizontal movement and the sprint energy economy by `dt`.
///
/// `direction` is the raw world-space input direction; it is normalized so
/// diagonals are not faster. Sprint only applies while moving with energy
/// left; without it, energy regenerates toward max.
pub fn integrate_movement(
    player: &mut PlayerState,
    direction: Vec3,
    sprint_held: bool,
    speed_bonus: f32,
    speed_multiplier: f32,
    dt: f32,
) {
    let direction = Vec3::new(direction.x, 0.0, direction.z).normalize_or_zero();
    let moving = direction != Vec3::ZERO;

    let sprinting = sprint_held && moving && player.energy > 0.0;
    if sprinting {
        player.movement_mode = MovementMode::Sprint;
        player.energy = (player.energy - SPRINT_ENERGY_DRAIN * dt).max(0.0);
    } else {
        player.movement_mode = MovementMode::Normal;
        player.energy = (player.energy + ENERGY_REGEN * dt).min(player.max_energy);
    }

    if !moving {
        player.velocity.x = 0.0;
        player.velocity.z = 0.0;
        return;
    }

    let sprint_factor = if sprinting { SPRINT_MULTIPLIER } else { 1.0 };
    let speed = ((BASE_MOVE_SPEED * sprint_factor + speed_bonus) * speed_multiplier).max(0.0);

    player.velocity.x = direction.x * speed;
    player.velocity.z = direction.z * speed;
    player.position.x += direction.x * speed * dt;
    player.position.z += direction.z * speed * dt;
    player.facing = direction.x.atan2(direction.z);
}

/// Advance the jump state and vertical motion by `dt`.
pub fn integrate_jump(player: &mut PlayerState, jump_pressed: bool, dt: f32) -> JumpOutcome {
    let mut outcome = JumpOutcome::None;

    if jump_pressed {
        if player.grounded {
            player.velocity.y = JUMP_VELOCITY;
            player.grounded = false;
            outcome = JumpOutcome::Jumped;
        } else if player.double_jump_available {
            player.velocity.y = JUMP_VELOCITY;
            player.double_jump_available = false;
            outcome = JumpOutcome::DoubleJumped;
        }
    }

    if !player.grounded {
        player.velocity.y -= GRAVITY * dt;
        player.position.y += player.velocity.y * dt;

        if player.position.y <= GROUND_HEIGHT {
            player.position.y = GROUND_HEIGHT;
            player.velocity.y = 0.0;
            player.grounded = true;
            player.double_jump_available = true;
            outcome = JumpOutcome::Landed;
        }
    }

    outcome
}

/// Move the player from this frame's intents.
pub fn move_player(
    time: Res<Time>,
    intents: Res<FrameIntents>,
    equipment: Res<CombatStatModifiers>,
    mut players: Query<(&mut PlayerState, &ModifierStack)>,
    mut bursts: EventWriter<ParticleBurst>,
) {
    let dt = time.delta_secs();

    for (mut player, modifiers) in players.iter_mut() {
        if !player.is_alive() {
            continue;
        }

        integrate_movement(
            &mut player,
            intents.world_direction(),
            intents.sprint,
            equipment.speed_bonus,
            modifiers.speed_multiplier(),
            dt,
        );

        if player.movement_mode == MovementMode::Sprint {
            bursts.send(ParticleBurst {
                origin: player.position,
                direction: -player.forward(),
                color: Color::srgb(0.53, 0.81, 0.92),
                count: SPRINT_TRAIL_PARTICLES,
            });
        }
    }
}

/// Jumping and gravity.
pub fn apply_jump_and_gravity(
    time: Res<Time>,
    intents: Res<FrameIntents>,
    mut players: Query<&mut PlayerState>,
    mut bursts: EventWriter<ParticleBurst>,
) {
    let dt = time.delta_secs();

    for mut player in players.iter_mut() {
        let jump = intents.jump && player.is_alive();
        if integrate_jump(&mut player, jump, dt) == JumpOutcome::DoubleJumped {
            bursts.send(ParticleBurst::upward(
                player.position,
                Color::WHITE,
                DOUBLE_JUMP_PARTICLES,
            ));
        }
    }
}

/// Keep max pools in line with the latest equipment snapshot.
pub fn apply_stat_modifiers(
    equipment: Res<CombatStatModifiers>,
    mut players: Query<&mut PlayerState>,
) {
    if !equipment.is_changed() {
        return;
    }
    for mut player in players.iter_mut() {
        player.apply_stat_modifiers(&equipment);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player() -> PlayerState {
        PlayerState::new(Vec3::new(0.0, GROUND_HEIGHT, 0.0))
    }

    #[test]
    fn test_diagonal_is_not_faster() {
        let mut straight = player();
        let mut diagonal = player();
        integrate_movement(&mut straight, Vec3::new(0.0, 0.0, -1.0), false, 0.0, 1.0, 1.0);
        integrate_movement(&mut diagonal, Vec3::new(1.0, 0.0, -1.0), false, 0.0, 1.0, 1.0);

        let a = Vec2::new(straight.position.x, straight.position.z).length();
        let b = Vec2::new(diagonal.position.x, diagonal.position.z).length();
        assert!((a - b).abs() < 1e-4, "straight {} vs diagonal {}", a, b);
        assert!((a - BASE_MOVE_SPEED).abs() < 1e-4);
    }

    #[test]
    fn test_sprint_stops_at_zero_energy() {
        let mut p = player();
        p.energy = 1.0;
        integrate_movement(&mut p, Vec3::X, true, 0.0, 1.0, 0.5);
        assert_eq!(p.energy, 0.0);
        assert_eq!(p.movement_mode, MovementMode::Sprint);

        integrate_movement(&mut p, Vec3::X, true, 0.0, 1.0, 0.1);
        assert_eq!(p.movement_mode, MovementMode::Normal, "no sprint on an empty pool");
        assert!(p.energy > 0.0, "energy regenerates while not sprinting");
    }

    #[test]
    fn test_single_double_jump_per_airtime() {
        let mut p = player();
        assert_eq!(integrate_jump(&mut p, true, 1.0 / 60.0), JumpOutcome::Jumped);
        assert_eq!(integrate_jump(&mut p, true, 1.0 / 60.0), JumpOutcome::DoubleJumped);
        assert_eq!(integrate_jump(&mut p, true, 1.0 / 60.0), JumpOutcome::None);

        let mut outcome = JumpOutcome::None;
        for _ in 0..200 {
            outcome = integrate_jump(&mut p, false, 1.0 / 60.0);
            if outcome == JumpOutcome::Landed {
                break;
            }
        }
        assert_eq!(outcome, JumpOutcome::Landed);
        assert_eq!(p.position.y, GROUND_HEIGHT);
        assert!(p.double_jump_available);
    }

    #[test]
    fn test_facing_follows_heading() {
        let mut p = player();
        integrate_movement(&mut p, Vec3::X, false, 0.0, 1.0, 0.1);
        assert!((p.forward() - Vec3::X).length() < 1e-5);
    }
}
