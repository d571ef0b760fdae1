//! Settings
//!
//! User preferences for the window, the HUD and the key bindings, stored as
//! RON next to the executable.

use bevy::prelude::*;
use bevy::window::{MonitorSelection, PresentMode, PrimaryWindow, WindowMode};
use serde::{Deserialize, Serialize};
use std::{fs, io};

use crate::keybindings::Keybindings;

/// Settings file, relative to the working directory
pub const SETTINGS_PATH: &str = "settings.ron";

/// Player preferences
#[derive(Resource, Clone, Debug, Serialize, Deserialize)]
pub struct GameSettings {
    #[serde(default)]
    pub window: WindowSettings,
    #[serde(default = "default_true")]
    pub vsync: bool,
    /// Health, energy, skill bar and score overlay
    #[serde(default = "default_true")]
    pub show_hud: bool,
    /// Floating numbers over damaged enemies
    #[serde(default = "default_true")]
    pub show_damage_numbers: bool,
    #[serde(default)]
    pub keybindings: Keybindings,
}

fn default_true() -> bool {
    true
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct WindowSettings {
    pub width: f32,
    pub height: f32,
    pub borderless_fullscreen: bool,
}

impl Default for WindowSettings {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 720.0,
            borderless_fullscreen: false,
        }
    }
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            window: WindowSettings::default(),
            vsync: true,
            show_hud: true,
            show_damage_numbers: true,
            keybindings: Keybindings::default(),
        }
    }
}

impl GameSettings {
    /// Read `settings.ron`. A missing or unreadable file yields the defaults.
    pub fn load() -> Self {
        match fs::read_to_string(SETTINGS_PATH) {
            Ok(contents) => Self::parse(&contents).unwrap_or_else(|e| {
                warn!("Ignoring malformed {}: {}", SETTINGS_PATH, e);
                Self::default()
            }),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Self::default(),
            Err(e) => {
                warn!("Could not read {}: {}", SETTINGS_PATH, e);
                Self::default()
            }
        }
    }

    pub fn parse(contents: &str) -> Result<Self, ron::error::SpannedError> {
        ron::from_str(contents)
    }

    pub fn save(&self) -> Result<(), String> {
        let contents = ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .map_err(|e| e.to_string())?;
        fs::write(SETTINGS_PATH, contents).map_err(|e| e.to_string())
    }

    /// Primary window built from these settings
    pub fn primary_window(&self, title: &str) -> Window {
        Window {
            title: title.to_string(),
            resolution: (self.window.width, self.window.height).into(),
            resizable: true,
            mode: if self.window.borderless_fullscreen {
                WindowMode::BorderlessFullscreen(MonitorSelection::Current)
            } else {
                WindowMode::Windowed
            },
            present_mode: self.present_mode(),
            ..default()
        }
    }

    pub fn present_mode(&self) -> PresentMode {
        if self.vsync {
            PresentMode::AutoVsync
        } else {
            PresentMode::AutoNoVsync
        }
    }
}

/// Inserts the loaded settings and keeps the window, the bindings and the
/// file on disk in step with them.
pub struct SettingsPlugin {
    pub settings: GameSettings,
}

impl Plugin for SettingsPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(self.settings.clone())
            .insert_resource(self.settings.keybindings.clone())
            .add_systems(Update, (toggle_overlays, apply_settings_change).chain());
    }
}

/// F1 toggles the HUD, F2 the floating damage numbers
fn toggle_overlays(keyboard: Res<ButtonInput<KeyCode>>, mut settings: ResMut<GameSettings>) {
    if keyboard.just_pressed(KeyCode::F1) {
        settings.show_hud = !settings.show_hud;
    }
    if keyboard.just_pressed(KeyCode::F2) {
        settings.show_damage_numbers = !settings.show_damage_numbers;
    }
}

fn apply_settings_change(
    settings: Res<GameSettings>,
    mut keybindings: ResMut<Keybindings>,
    mut windows: Query<&mut Window, With<PrimaryWindow>>,
) {
    if !settings.is_changed() || settings.is_added() {
        return;
    }

    *keybindings = settings.keybindings.clone();
    if let Ok(mut window) = windows.get_single_mut() {
        window.present_mode = settings.present_mode();
    }
    match settings.save() {
        Ok(()) => debug!("Saved {}", SETTINGS_PATH),
        Err(e) => error!("Failed to save {}: {}", SETTINGS_PATH, e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_settings_fill_defaults() {
        let settings = GameSettings::parse("(vsync: false)").unwrap();
        assert!(!settings.vsync);
        assert!(settings.show_hud);
        assert_eq!(settings.window, WindowSettings::default());
    }

    #[test]
    fn test_settings_round_trip() {
        let mut settings = GameSettings::default();
        settings.show_damage_numbers = false;
        let text = ron::ser::to_string_pretty(&settings, ron::ser::PrettyConfig::default()).unwrap();
        let parsed = GameSettings::parse(&text).unwrap();
        assert!(!parsed.show_damage_numbers);
    }
}
