//! Rendering Systems
//!
//! Everything the graphical build draws. The session core never touches
//! `Transform` or meshes; this module reads the simulation state after the
//! frame phases have run and mirrors it into the scene.
//! - `hud`: health, energy, skill bar, score and floating damage numbers

pub mod hud;

use bevy::prelude::*;

use crate::camera::MainCamera;
use crate::states::session::components::{AiState, Enemy, Npc, PlayerState, SessionClock};
use crate::states::session::particles::ParticlePool;
use crate::states::session::systems::FramePhase;
use crate::states::GameState;

/// Side length of the ground plane
const GROUND_SIZE: f32 = 120.0;

/// Plugin for scene meshes, particle drawing and the HUD
pub struct RenderingPlugin;

impl Plugin for RenderingPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, setup_scene)
            .add_systems(
                Update,
                (
                    attach_player_mesh,
                    attach_enemy_meshes,
                    attach_npc_meshes,
                    sync_actor_transforms,
                    draw_particles,
                )
                    .chain()
                    .after(FramePhase::Camera)
                    .run_if(in_state(GameState::Playing))
                    .run_if(resource_exists::<SessionClock>),
            )
            .add_plugins(hud::HudPlugin);
    }
}

/// Camera, light and ground. These outlive sessions.
fn setup_scene(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    commands.spawn((
        Camera3d::default(),
        Transform::from_xyz(0.0, 10.0, 15.0).looking_at(Vec3::ZERO, Vec3::Y),
        MainCamera,
    ));

    commands.spawn((
        DirectionalLight {
            illuminance: 18000.0,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_xyz(10.0, 20.0, 8.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));

    commands.insert_resource(AmbientLight {
        color: Color::srgb(0.35, 0.35, 0.4),
        brightness: 300.0,
    });

    // Packed-earth courtyard
    commands.spawn((
        Mesh3d(meshes.add(Plane3d::default().mesh().size(GROUND_SIZE, GROUND_SIZE))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: Color::srgb(0.36, 0.31, 0.24),
            perceptual_roughness: 0.95,
            ..default()
        })),
    ));
}

/// Body color for an enemy kind
fn enemy_color(enemy: &Enemy) -> Color {
    if enemy.config.is_boss() {
        return Color::srgb(0.75, 0.1, 0.1);
    }
    match enemy.kind.as_str() {
        "swordsman" => Color::srgb(0.55, 0.55, 0.6),
        "spearman" => Color::srgb(0.45, 0.35, 0.25),
        "archer" => Color::srgb(0.3, 0.5, 0.3),
        "elite" => Color::srgb(0.45, 0.2, 0.55),
        _ => Color::srgb(0.5, 0.5, 0.5),
    }
}

fn attach_player_mesh(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    players: Query<(Entity, &PlayerState), Added<PlayerState>>,
) {
    for (entity, player) in players.iter() {
        commands.entity(entity).insert((
            Mesh3d(meshes.add(Capsule3d::new(0.5, 2.0))),
            MeshMaterial3d(materials.add(StandardMaterial {
                base_color: Color::srgb(0.95, 0.9, 0.8),
                perceptual_roughness: 0.5,
                metallic: 0.2,
                ..default()
            })),
            Transform::from_translation(player.position),
        ));
    }
}

fn attach_enemy_meshes(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    enemies: Query<(Entity, &Enemy), Added<Enemy>>,
) {
    for (entity, enemy) in enemies.iter() {
        let scale = if enemy.config.is_boss() { 1.6 } else { 1.0 };
        commands.entity(entity).insert((
            Mesh3d(meshes.add(Capsule3d::new(0.5 * scale, 1.8 * scale))),
            MeshMaterial3d(materials.add(StandardMaterial {
                base_color: enemy_color(enemy),
                perceptual_roughness: 0.6,
                ..default()
            })),
            Transform::from_translation(enemy.position),
        ));
    }
}

fn attach_npc_meshes(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    npcs: Query<(Entity, &Npc), Added<Npc>>,
) {
    for (entity, npc) in npcs.iter() {
        commands.entity(entity).insert((
            Mesh3d(meshes.add(Cylinder::new(0.5, 2.0))),
            MeshMaterial3d(materials.add(StandardMaterial {
                base_color: Color::srgb(0.85, 0.7, 0.3),
                ..default()
            })),
            Transform::from_translation(npc.position),
        ));
    }
}

/// Mirror simulation positions and headings onto transforms.
fn sync_actor_transforms(
    mut players: Query<(&PlayerState, &mut Transform), Without<Enemy>>,
    mut enemies: Query<(&Enemy, &mut Transform), Without<PlayerState>>,
) {
    for (player, mut transform) in players.iter_mut() {
        transform.translation = player.position;
        transform.rotation = Quat::from_rotation_y(player.facing);
    }
    for (enemy, mut transform) in enemies.iter_mut() {
        transform.translation = enemy.position;
        transform.rotation = if enemy.state == AiState::Dead {
            // Corpses topple over while they sink
            Quat::from_rotation_y(enemy.facing) * Quat::from_rotation_x(std::f32::consts::FRAC_PI_2)
        } else {
            Quat::from_rotation_y(enemy.facing)
        };
    }
}

/// Draw every occupied particle slot as a gizmo sphere.
fn draw_particles(pool: Res<ParticlePool>, mut gizmos: Gizmos) {
    for slot in pool.slots().iter().filter(|s| s.occupied) {
        gizmos.sphere(slot.position, slot.size, slot.color);
    }
}
