//! Keybinding system for remappable controls
//!
//! Maps keyboard keys to player actions. Bindings are saved with the rest
//! of the settings; the input mapper reads them every frame.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// All possible actions that can be bound to keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameAction {
    // Movement
    MoveForward,
    MoveBackward,
    MoveLeft,
    MoveRight,
    Sprint,
    Jump,

    // Combat
    Attack,
    Skill1,
    Skill2,
    Skill3,

    // World
    Interact,
    UseQuickItem,
    ToggleInventory,

    // Session
    EndSession,
    RestartSession,
}

impl GameAction {
    pub fn all() -> [GameAction; 15] {
        [
            GameAction::MoveForward,
            GameAction::MoveBackward,
            GameAction::MoveLeft,
            GameAction::MoveRight,
            GameAction::Sprint,
            GameAction::Jump,
            GameAction::Attack,
            GameAction::Skill1,
            GameAction::Skill2,
            GameAction::Skill3,
            GameAction::Interact,
            GameAction::UseQuickItem,
            GameAction::ToggleInventory,
            GameAction::EndSession,
            GameAction::RestartSession,
        ]
    }

    /// The skill-slot action for a zero-based slot index
    pub fn skill_slot(index: usize) -> Option<GameAction> {
        match index {
            0 => Some(GameAction::Skill1),
            1 => Some(GameAction::Skill2),
            2 => Some(GameAction::Skill3),
            _ => None,
        }
    }
}

/// Keys the settings file can name: (key, serialized id, display label)
const KEY_TABLE: &[(KeyCode, &str, &str)] = &[
    (KeyCode::Escape, "Escape", "ESC"),
    (KeyCode::Enter, "Enter", "ENTER"),
    (KeyCode::Space, "Space", "SPACE"),
    (KeyCode::Tab, "Tab", "TAB"),
    (KeyCode::ShiftLeft, "ShiftLeft", "L-SHIFT"),
    (KeyCode::ShiftRight, "ShiftRight", "R-SHIFT"),
    (KeyCode::ControlLeft, "ControlLeft", "L-CTRL"),
    (KeyCode::KeyA, "KeyA", "A"),
    (KeyCode::KeyB, "KeyB", "B"),
    (KeyCode::KeyC, "KeyC", "C"),
    (KeyCode::KeyD, "KeyD", "D"),
    (KeyCode::KeyE, "KeyE", "E"),
    (KeyCode::KeyF, "KeyF", "F"),
    (KeyCode::KeyG, "KeyG", "G"),
    (KeyCode::KeyH, "KeyH", "H"),
    (KeyCode::KeyI, "KeyI", "I"),
    (KeyCode::KeyJ, "KeyJ", "J"),
    (KeyCode::KeyK, "KeyK", "K"),
    (KeyCode::KeyL, "KeyL", "L"),
    (KeyCode::KeyM, "KeyM", "M"),
    (KeyCode::KeyN, "KeyN", "N"),
    (KeyCode::KeyO, "KeyO", "O"),
    (KeyCode::KeyP, "KeyP", "P"),
    (KeyCode::KeyQ, "KeyQ", "Q"),
    (KeyCode::KeyR, "KeyR", "R"),
    (KeyCode::KeyS, "KeyS", "S"),
    (KeyCode::KeyT, "KeyT", "T"),
    (KeyCode::KeyU, "KeyU", "U"),
    (KeyCode::KeyV, "KeyV", "V"),
    (KeyCode::KeyW, "KeyW", "W"),
    (KeyCode::KeyX, "KeyX", "X"),
    (KeyCode::KeyY, "KeyY", "Y"),
    (KeyCode::KeyZ, "KeyZ", "Z"),
    (KeyCode::Digit1, "Digit1", "1"),
    (KeyCode::Digit2, "Digit2", "2"),
    (KeyCode::Digit3, "Digit3", "3"),
    (KeyCode::Digit4, "Digit4", "4"),
    (KeyCode::Digit5, "Digit5", "5"),
    (KeyCode::F1, "F1", "F1"),
    (KeyCode::F2, "F2", "F2"),
    (KeyCode::F3, "F3", "F3"),
    (KeyCode::F4, "F4", "F4"),
    (KeyCode::ArrowUp, "ArrowUp", "↑"),
    (KeyCode::ArrowDown, "ArrowDown", "↓"),
    (KeyCode::ArrowLeft, "ArrowLeft", "←"),
    (KeyCode::ArrowRight, "ArrowRight", "→"),
];

fn key_id(key: KeyCode) -> Option<&'static str> {
    KEY_TABLE.iter().find(|(k, _, _)| *k == key).map(|(_, id, _)| *id)
}

fn key_from_id(id: &str) -> Result<KeyCode, String> {
    KEY_TABLE
        .iter()
        .find(|(_, known, _)| *known == id)
        .map(|(key, _, _)| *key)
        .ok_or_else(|| format!("unsupported key '{}'", id))
}

/// On-disk form of a binding: key ids from [`KEY_TABLE`]
#[derive(Serialize, Deserialize)]
struct KeyBindingRepr {
    primary: String,
    #[serde(default)]
    secondary: Option<String>,
}

/// Primary key plus an optional alternative
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "KeyBindingRepr", into = "KeyBindingRepr")]
pub struct KeyBinding {
    pub primary: KeyCode,
    pub secondary: Option<KeyCode>,
}

impl TryFrom<KeyBindingRepr> for KeyBinding {
    type Error = String;

    fn try_from(repr: KeyBindingRepr) -> Result<Self, Self::Error> {
        Ok(Self {
            primary: key_from_id(&repr.primary)?,
            secondary: repr.secondary.as_deref().map(key_from_id).transpose()?,
        })
    }
}

impl From<KeyBinding> for KeyBindingRepr {
    fn from(binding: KeyBinding) -> Self {
        let id = |key: KeyCode| key_id(key).unwrap_or("Escape").to_string();
        Self {
            primary: id(binding.primary),
            secondary: binding.secondary.map(id),
        }
    }
}

impl KeyBinding {
    pub fn new(primary: KeyCode) -> Self {
        Self {
            primary,
            secondary: None,
        }
    }

    pub fn with_secondary(primary: KeyCode, secondary: KeyCode) -> Self {
        Self {
            primary,
            secondary: Some(secondary),
        }
    }

    fn keys(&self) -> impl Iterator<Item = KeyCode> {
        std::iter::once(self.primary).chain(self.secondary)
    }
}

/// Complete keybindings configuration
#[derive(Debug, Clone, Resource, Serialize, Deserialize)]
pub struct Keybindings {
    bindings: HashMap<GameAction, KeyBinding>,
}

impl Default for Keybindings {
    fn default() -> Self {
        Self::create_defaults()
    }
}

impl Keybindings {
    /// Create default keybindings
    pub fn create_defaults() -> Self {
        let mut bindings = HashMap::new();

        bindings.insert(GameAction::MoveForward, KeyBinding::with_secondary(KeyCode::KeyW, KeyCode::ArrowUp));
        bindings.insert(GameAction::MoveBackward, KeyBinding::with_secondary(KeyCode::KeyS, KeyCode::ArrowDown));
        bindings.insert(GameAction::MoveLeft, KeyBinding::with_secondary(KeyCode::KeyA, KeyCode::ArrowLeft));
        bindings.insert(GameAction::MoveRight, KeyBinding::with_secondary(KeyCode::KeyD, KeyCode::ArrowRight));
        bindings.insert(GameAction::Sprint, KeyBinding::with_secondary(KeyCode::ShiftLeft, KeyCode::ShiftRight));
        bindings.insert(GameAction::Jump, KeyBinding::new(KeyCode::Space));

        // Left mouse button also attacks, see the input mapper
        bindings.insert(GameAction::Attack, KeyBinding::new(KeyCode::KeyJ));
        bindings.insert(GameAction::Skill1, KeyBinding::new(KeyCode::Digit1));
        bindings.insert(GameAction::Skill2, KeyBinding::new(KeyCode::Digit2));
        bindings.insert(GameAction::Skill3, KeyBinding::new(KeyCode::Digit3));

        bindings.insert(GameAction::Interact, KeyBinding::new(KeyCode::KeyE));
        bindings.insert(GameAction::UseQuickItem, KeyBinding::new(KeyCode::KeyQ));
        bindings.insert(GameAction::ToggleInventory, KeyBinding::new(KeyCode::KeyI));

        bindings.insert(GameAction::EndSession, KeyBinding::new(KeyCode::Escape));
        bindings.insert(GameAction::RestartSession, KeyBinding::new(KeyCode::KeyR));

        Self { bindings }
    }

    /// Get the binding for an action
    pub fn get(&self, action: GameAction) -> Option<&KeyBinding> {
        self.bindings.get(&action)
    }

    /// Check if an action is currently held
    pub fn action_pressed(&self, action: GameAction, keyboard: &ButtonInput<KeyCode>) -> bool {
        self.get(action)
            .is_some_and(|binding| binding.keys().any(|key| keyboard.pressed(key)))
    }

    /// Check if an action was just pressed this frame
    pub fn action_just_pressed(&self, action: GameAction, keyboard: &ButtonInput<KeyCode>) -> bool {
        self.get(action)
            .is_some_and(|binding| binding.keys().any(|key| keyboard.just_pressed(key)))
    }

    /// Short label for a key
    pub fn key_name(key: KeyCode) -> &'static str {
        KEY_TABLE
            .iter()
            .find(|(k, _, _)| *k == key)
            .map_or("???", |(_, _, label)| *label)
    }

    /// Label shown next to an action, e.g. "W / ↑"
    pub fn binding_display(&self, action: GameAction) -> String {
        match self.get(action) {
            Some(binding) => {
                let primary = Self::key_name(binding.primary);
                match binding.secondary {
                    Some(secondary) => format!("{} / {}", primary, Self::key_name(secondary)),
                    None => primary.to_string(),
                }
            }
            None => "Unbound".to_string(),
        }
    }
}
