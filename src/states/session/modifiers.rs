//! Timed Modifier Stack
//!
//! Every buff on the player (speed, defense, attack, absorb shields) is a
//! [`TimedModifier`] in the player's [`ModifierStack`]. Modifiers tick down
//! by frame delta time and are removed the moment they reach zero, so no
//! effect kind needs its own expiry code.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::combat::events::ModifierExpiredEvent;
use super::components::PlayerState;

/// Types of timed modifier
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum ModifierKind {
    /// Multiplies movement speed (value = multiplier, e.g. 2.0)
    SpeedMultiplier,
    /// Adds flat defense (value = bonus)
    DefenseBonus,
    /// Adds flat attack power (value = bonus)
    AttackBonus,
    /// Soaks incoming damage until depleted (value = remaining shield)
    Absorb,
}

impl ModifierKind {
    pub fn describe(&self, value: f32) -> String {
        match self {
            ModifierKind::SpeedMultiplier => format!("speed x{:.1}", value),
            ModifierKind::DefenseBonus => format!("+{:.0} defense", value),
            ModifierKind::AttackBonus => format!("+{:.0} attack", value),
            ModifierKind::Absorb => format!("absorbs {:.0} damage", value),
        }
    }
}

/// A modifier with a remaining lifetime
#[derive(Clone, Debug, PartialEq)]
pub struct TimedModifier {
    /// Name of whatever applied the modifier (a skill name)
    pub source: String,
    pub kind: ModifierKind,
    pub value: f32,
    /// Seconds left before removal
    pub remaining: f32,
}

/// All modifiers active on the player
#[derive(Component, Clone, Debug, Default)]
pub struct ModifierStack {
    pub modifiers: Vec<TimedModifier>,
}

impl ModifierStack {
    /// Add a modifier. Re-applying the same source and kind refreshes the
    /// existing entry instead of stacking a second copy.
    pub fn apply(&mut self, modifier: TimedModifier) {
        if let Some(existing) = self
            .modifiers
            .iter_mut()
            .find(|m| m.source == modifier.source && m.kind == modifier.kind)
        {
            *existing = modifier;
        } else {
            self.modifiers.push(modifier);
        }
    }

    /// Advance every modifier by `dt` seconds and return the ones that expired
    pub fn tick(&mut self, dt: f32) -> SmallVec<[TimedModifier; 4]> {
        for modifier in self.modifiers.iter_mut() {
            modifier.remaining -= dt;
        }

        let mut expired = SmallVec::new();
        self.modifiers.retain(|m| {
            if m.remaining > 0.0 {
                true
            } else {
                expired.push(m.clone());
                false
            }
        });
        expired
    }

    /// Product of all active speed multipliers (1.0 when none)
    pub fn speed_multiplier(&self) -> f32 {
        self.modifiers
            .iter()
            .filter(|m| m.kind == ModifierKind::SpeedMultiplier)
            .map(|m| m.value)
            .product()
    }

    pub fn defense_bonus(&self) -> f32 {
        self.sum_of(ModifierKind::DefenseBonus)
    }

    pub fn attack_bonus(&self) -> f32 {
        self.sum_of(ModifierKind::AttackBonus)
    }

    /// Remaining absorb across all shields
    pub fn absorb_remaining(&self) -> f32 {
        self.sum_of(ModifierKind::Absorb)
    }

    fn sum_of(&self, kind: ModifierKind) -> f32 {
        self.modifiers
            .iter()
            .filter(|m| m.kind == kind)
            .map(|m| m.value)
            .sum()
    }

    /// Soak damage with absorb shields, oldest first.
    /// Returns (damage that gets through, damage absorbed). Depleted shields are removed.
    pub fn absorb_damage(&mut self, damage: f32) -> (f32, f32) {
        let mut remaining = damage;
        let mut absorbed = 0.0;

        for modifier in self
            .modifiers
            .iter_mut()
            .filter(|m| m.kind == ModifierKind::Absorb)
        {
            if remaining <= 0.0 {
                break;
            }
            let soaked = modifier.value.min(remaining);
            modifier.value -= soaked;
            remaining -= soaked;
            absorbed += soaked;
        }

        self.modifiers
            .retain(|m| m.kind != ModifierKind::Absorb || m.value > 0.0);

        (remaining, absorbed)
    }

    pub fn is_empty(&self) -> bool {
        self.modifiers.is_empty()
    }
}

/// Tick down the player's modifiers and announce the ones that expire.
pub fn update_modifiers(
    time: Res<Time>,
    mut players: Query<&mut ModifierStack, With<PlayerState>>,
    mut expired_events: EventWriter<ModifierExpiredEvent>,
) {
    let dt = time.delta_secs();

    for mut stack in players.iter_mut() {
        if stack.is_empty() {
            continue;
        }
        for modifier in stack.tick(dt) {
            debug!("{} ({:?}) expired", modifier.source, modifier.kind);
            expired_events.send(ModifierExpiredEvent {
                source: modifier.source,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn modifier(source: &str, kind: ModifierKind, value: f32, remaining: f32) -> TimedModifier {
        TimedModifier {
            source: source.to_string(),
            kind,
            value,
            remaining,
        }
    }

    #[test]
    fn test_expiry_removes_at_zero() {
        let mut stack = ModifierStack::default();
        stack.apply(modifier("Swift Step", ModifierKind::SpeedMultiplier, 2.0, 1.0));
        stack.apply(modifier("Golden Bell", ModifierKind::DefenseBonus, 30.0, 3.0));

        assert!(stack.tick(0.5).is_empty());
        let expired = stack.tick(0.5);
        assert_eq!(expired.len(), 1);
        assert_eq!(expired[0].source, "Swift Step");
        assert_eq!(stack.speed_multiplier(), 1.0);
        assert_eq!(stack.defense_bonus(), 30.0);
    }

    #[test]
    fn test_reapply_refreshes() {
        let mut stack = ModifierStack::default();
        stack.apply(modifier("Golden Bell", ModifierKind::DefenseBonus, 30.0, 1.0));
        stack.apply(modifier("Golden Bell", ModifierKind::DefenseBonus, 30.0, 10.0));
        assert_eq!(stack.modifiers.len(), 1);
        assert_eq!(stack.modifiers[0].remaining, 10.0);
    }

    #[test]
    fn test_absorb_soaks_then_breaks() {
        let mut stack = ModifierStack::default();
        stack.apply(modifier("Iron Shirt", ModifierKind::Absorb, 25.0, 10.0));

        assert_eq!(stack.absorb_damage(10.0), (0.0, 10.0));
        assert_eq!(stack.absorb_remaining(), 15.0);

        assert_eq!(stack.absorb_damage(40.0), (25.0, 15.0));
        assert!(stack.is_empty(), "depleted shield should be removed");
    }
}
