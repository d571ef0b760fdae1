//! Input Mapper
//!
//! Turns raw keyboard and mouse state into the frame's [`FrameIntents`].
//! Held actions (movement, sprint) are level-triggered; everything else is
//! an edge that is true for exactly one frame. The headless pilot writes the
//! same resource, so nothing downstream knows where intents came from.

use bevy::prelude::*;

use crate::combat::events::{InventoryToggledEvent, ItemConsumeRequest, NpcTalkedToEvent};
use crate::keybindings::{GameAction, Keybindings};
use super::components::*;
use super::config::SessionConfig;
use super::constants::{NPC_INTERACT_RANGE, SKILL_SLOTS};
use super::item_config::ItemCatalog;

/// Everything the player asked for this frame
#[derive(Resource, Clone, Debug, Default, PartialEq)]
pub struct FrameIntents {
    /// x = strafe right, y = forward; not normalized
    pub move_axis: Vec2,
    pub sprint: bool,
    pub jump: bool,
    pub attack: bool,
    pub skill_slots: [bool; SKILL_SLOTS],
    pub toggle_inventory: bool,
    pub interact: bool,
    pub use_quick_item: bool,
}

impl FrameIntents {
    /// World-space movement direction on the XZ plane (forward is -Z)
    pub fn world_direction(&self) -> Vec3 {
        Vec3::new(self.move_axis.x, 0.0, -self.move_axis.y)
    }
}

/// Map the current key and mouse state to intents.
pub fn map_intents(
    bindings: &Keybindings,
    keyboard: &ButtonInput<KeyCode>,
    mouse: &ButtonInput<MouseButton>,
) -> FrameIntents {
    let held = |action: GameAction| bindings.action_pressed(action, keyboard);
    let edge = |action: GameAction| bindings.action_just_pressed(action, keyboard);

    let mut move_axis = Vec2::ZERO;
    if held(GameAction::MoveForward) {
        move_axis.y += 1.0;
    }
    if held(GameAction::MoveBackward) {
        move_axis.y -= 1.0;
    }
    if held(GameAction::MoveLeft) {
        move_axis.x -= 1.0;
    }
    if held(GameAction::MoveRight) {
        move_axis.x += 1.0;
    }

    let mut skill_slots = [false; SKILL_SLOTS];
    for (index, pressed) in skill_slots.iter_mut().enumerate() {
        *pressed = GameAction::skill_slot(index).is_some_and(edge);
    }

    FrameIntents {
        move_axis,
        sprint: held(GameAction::Sprint),
        jump: edge(GameAction::Jump),
        attack: edge(GameAction::Attack) || mouse.just_pressed(MouseButton::Left),
        skill_slots,
        toggle_inventory: edge(GameAction::ToggleInventory),
        interact: edge(GameAction::Interact),
        use_quick_item: edge(GameAction::UseQuickItem),
    }
}

/// Sample this frame's intents from the keyboard and mouse.
pub fn sample_player_input(
    bindings: Res<Keybindings>,
    keyboard: Res<ButtonInput<KeyCode>>,
    mouse: Res<ButtonInput<MouseButton>>,
    mut intents: ResMut<FrameIntents>,
) {
    *intents = map_intents(&bindings, &keyboard, &mouse);
}

/// Handle the non-combat intents: talking, quick item, inventory.
pub fn handle_interactions(
    intents: Res<FrameIntents>,
    config: Res<SessionConfig>,
    catalog: Res<ItemCatalog>,
    players: Query<&PlayerState>,
    npcs: Query<&Npc>,
    mut talked_events: EventWriter<NpcTalkedToEvent>,
    mut consume_requests: EventWriter<ItemConsumeRequest>,
    mut inventory_events: EventWriter<InventoryToggledEvent>,
) {
    if intents.toggle_inventory {
        inventory_events.send(InventoryToggledEvent);
    }

    let Ok(player) = players.get_single() else {
        return;
    };
    if !player.is_alive() {
        return;
    }

    if intents.interact {
        let nearest = npcs
            .iter()
            .map(|npc| (horizontal_distance(player.position, npc.position), npc))
            .filter(|(distance, _)| *distance < NPC_INTERACT_RANGE)
            .min_by(|a, b| a.0.total_cmp(&b.0));

        if let Some((_, npc)) = nearest {
            info!("Talking to {}", npc.name);
            talked_events.send(NpcTalkedToEvent {
                npc_id: npc.id.clone(),
            });
        }
    }

    if intents.use_quick_item {
        match config.quick_item.as_deref() {
            Some(item_id) if catalog.get(item_id).is_some_and(|item| item.is_consumable()) => {
                consume_requests.send(ItemConsumeRequest {
                    item_id: item_id.to_string(),
                });
            }
            Some(item_id) => warn!("Quick item '{}' is not a known consumable, ignored", item_id),
            None => debug!("No quick item configured"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(keys: &[KeyCode]) -> ButtonInput<KeyCode> {
        let mut keyboard = ButtonInput::default();
        for key in keys {
            keyboard.press(*key);
        }
        keyboard
    }

    #[test]
    fn test_diagonal_axis_and_edges() {
        let keyboard = press(&[KeyCode::KeyW, KeyCode::KeyD, KeyCode::Digit2, KeyCode::ShiftLeft]);
        let intents = map_intents(&Keybindings::default(), &keyboard, &ButtonInput::default());
        assert_eq!(intents.move_axis, Vec2::new(1.0, 1.0));
        assert!(intents.sprint);
        assert_eq!(intents.skill_slots, [false, true, false]);
        assert!(!intents.attack);
    }

    #[test]
    fn test_mouse_click_attacks() {
        let mut mouse = ButtonInput::default();
        mouse.press(MouseButton::Left);
        let intents = map_intents(&Keybindings::default(), &press(&[]), &mouse);
        assert!(intents.attack);
    }

    #[test]
    fn test_forward_maps_to_negative_z() {
        let intents = FrameIntents {
            move_axis: Vec2::new(0.0, 1.0),
            ..default()
        };
        assert_eq!(intents.world_direction(), Vec3::new(0.0, 0.0, -1.0));
    }
}
