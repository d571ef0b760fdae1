//! Camera follow
//!
//! The [`CameraRig`] trails the player at a fixed offset with exponential
//! smoothing and looks at the player. The rig is plain session state so the
//! headless build advances it too; the graphical build copies it onto the
//! [`MainCamera`] transform.

use bevy::prelude::*;
use bevy::transform::TransformSystem;

use crate::states::session::PlayerState;

/// Smoothing applied per 1/60 s step
pub const CAMERA_SMOOTHING: f32 = 0.1;

/// Offset from the player the camera settles at
pub const CAMERA_OFFSET: Vec3 = Vec3::new(0.0, 10.0, 15.0);

/// Plugin for the graphical camera
pub struct CameraPlugin;

impl Plugin for CameraPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<CameraSettings>().add_systems(
            PostUpdate,
            (camera_zoom, sync_main_camera)
                .chain()
                .before(TransformSystem::TransformPropagate),
        );
    }
}

/// Follow-camera state
#[derive(Resource, Debug, Clone, Copy)]
pub struct CameraRig {
    pub position: Vec3,
    /// Point the camera looks at
    pub target: Vec3,
    pub offset: Vec3,
    /// Fraction of the remaining distance closed per 1/60 s
    pub smoothing: f32,
}

impl Default for CameraRig {
    fn default() -> Self {
        Self {
            position: CAMERA_OFFSET,
            target: Vec3::ZERO,
            offset: CAMERA_OFFSET,
            smoothing: CAMERA_SMOOTHING,
        }
    }
}

impl CameraRig {
    /// Rig already settled behind a point
    pub fn looking_at(target: Vec3) -> Self {
        Self {
            position: target + CAMERA_OFFSET,
            target,
            ..default()
        }
    }

    /// Move toward `target + offset` and look at `target`.
    ///
    /// The per-step factor is rescaled by `dt` so the camera converges at the
    /// same speed regardless of frame rate.
    pub fn follow(&mut self, target: Vec3, dt: f32) {
        let factor = 1.0 - (1.0 - self.smoothing.clamp(0.0, 1.0)).powf(dt * 60.0);
        self.position = self.position.lerp(target + self.offset, factor);
        self.target = target;
    }

    pub fn transform(&self) -> Transform {
        Transform::from_translation(self.position).looking_at(self.target, Vec3::Y)
    }
}

/// User-adjustable camera distance
#[derive(Resource)]
pub struct CameraSettings {
    /// Multiplier on the follow offset
    pub zoom: f32,
    pub zoom_min: f32,
    pub zoom_max: f32,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            zoom: 1.0,
            zoom_min: 0.5,
            zoom_max: 2.5,
        }
    }
}

/// Marker component for the main 3D game camera
#[derive(Component)]
pub struct MainCamera;

/// Trail the player. Part of the session's camera phase.
pub fn follow_player(
    time: Res<Time>,
    mut rig: ResMut<CameraRig>,
    players: Query<&PlayerState>,
) {
    let Ok(player) = players.get_single() else {
        return;
    };
    rig.follow(player.position, time.delta_secs());
}

fn camera_zoom(
    keyboard: Res<ButtonInput<KeyCode>>,
    time: Res<Time>,
    mut settings: ResMut<CameraSettings>,
    rig: Option<ResMut<CameraRig>>,
) {
    let step = time.delta_secs();
    if keyboard.pressed(KeyCode::Equal) || keyboard.pressed(KeyCode::NumpadAdd) {
        settings.zoom = (settings.zoom - step).max(settings.zoom_min);
    }
    if keyboard.pressed(KeyCode::Minus) || keyboard.pressed(KeyCode::NumpadSubtract) {
        settings.zoom = (settings.zoom + step).min(settings.zoom_max);
    }

    if let Some(mut rig) = rig {
        let offset = CAMERA_OFFSET * settings.zoom;
        if rig.offset != offset {
            rig.offset = offset;
        }
    }
}

fn sync_main_camera(
    rig: Option<Res<CameraRig>>,
    mut cameras: Query<&mut Transform, With<MainCamera>>,
) {
    let Some(rig) = rig else {
        return;
    };
    for mut transform in cameras.iter_mut() {
        *transform = rig.transform();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_follow_converges() {
        let mut rig = CameraRig::default();
        let target = Vec3::new(10.0, 0.0, -4.0);
        for _ in 0..600 {
            rig.follow(target, 1.0 / 60.0);
        }
        assert!((rig.position - (target + CAMERA_OFFSET)).length() < 1e-3);
    }

    #[test]
    fn test_follow_is_frame_rate_independent() {
        let target = Vec3::new(20.0, 0.0, 0.0);
        let mut fast = CameraRig::default();
        let mut slow = CameraRig::default();
        for _ in 0..4 {
            fast.follow(target, 1.0 / 120.0);
        }
        for _ in 0..2 {
            slow.follow(target, 1.0 / 60.0);
        }
        assert!((fast.position - slow.position).length() < 1e-3);
    }

    #[test]
    fn test_one_step_at_sixty_hz_closes_ten_percent() {
        let mut rig = CameraRig::looking_at(Vec3::ZERO);
        rig.follow(Vec3::new(10.0, 0.0, 0.0), 1.0 / 60.0);
        assert!((rig.position.x - 1.0).abs() < 1e-4);
    }
}
