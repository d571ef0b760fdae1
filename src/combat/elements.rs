//! Elemental reactions
//!
//! Table-driven lookup over unordered element pairs. The player carries an
//! element and an element mastery; enemies may carry an element in their
//! config. When the two react, the hit's damage is replaced by the reaction
//! damage.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// The four martial elements
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Element {
    Fire,
    Water,
    Thunder,
    Earth,
}

impl Element {
    pub fn name(&self) -> &'static str {
        match self {
            Element::Fire => "Fire",
            Element::Water => "Water",
            Element::Thunder => "Thunder",
            Element::Earth => "Earth",
        }
    }

    pub fn all() -> [Element; 4] {
        [Element::Fire, Element::Water, Element::Thunder, Element::Earth]
    }
}

/// Reactions produced by two different elements meeting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ElementReaction {
    /// Fire + Water
    Vaporize,
    /// Fire + Thunder
    Overload,
    /// Water + Thunder
    ElectroCharged,
    /// Earth + anything
    Crystallize,
}

impl ElementReaction {
    pub fn name(&self) -> &'static str {
        match self {
            ElementReaction::Vaporize => "Vaporize",
            ElementReaction::Overload => "Overload",
            ElementReaction::ElectroCharged => "Electro-Charged",
            ElementReaction::Crystallize => "Crystallize",
        }
    }

    /// Base damage multiplier before the mastery bonus
    pub fn multiplier(&self) -> f32 {
        match self {
            ElementReaction::Vaporize => 2.0,
            ElementReaction::Overload => 1.5,
            ElementReaction::ElectroCharged => 1.3,
            ElementReaction::Crystallize => 0.8,
        }
    }

    /// Crystallize ignores element mastery
    pub fn scales_with_mastery(&self) -> bool {
        !matches!(self, ElementReaction::Crystallize)
    }

    /// Particle color and count for the reaction burst
    pub fn particle_burst(&self) -> (Color, usize) {
        match self {
            ElementReaction::Vaporize => (Color::srgb(1.0, 0.39, 0.28), 80),
            ElementReaction::Overload => (Color::srgb(1.0, 0.55, 0.0), 100),
            ElementReaction::ElectroCharged => (Color::srgb(0.93, 0.51, 0.93), 60),
            ElementReaction::Crystallize => (Color::srgb(1.0, 0.84, 0.0), 40),
        }
    }
}

/// Outcome of a successful reaction lookup
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReactionResult {
    pub reaction: ElementReaction,
    /// Floored reaction damage
    pub damage: f32,
}

/// Which reaction, if any, two elements produce. Symmetric in its arguments.
pub fn reaction_between(a: Element, b: Element) -> Option<ElementReaction> {
    use Element::*;

    match (a, b) {
        (Earth, _) | (_, Earth) => Some(ElementReaction::Crystallize),
        (Fire, Water) | (Water, Fire) => Some(ElementReaction::Vaporize),
        (Fire, Thunder) | (Thunder, Fire) => Some(ElementReaction::Overload),
        (Water, Thunder) | (Thunder, Water) => Some(ElementReaction::ElectroCharged),
        _ => None,
    }
}

/// Resolve an element reaction for a hit.
///
/// `mastery_bonus = 1 + element_mastery / 100` applies to every reaction
/// except Crystallize. Returns `None` for pairs that do not react.
pub fn apply_element_reaction(
    trigger: Element,
    target: Element,
    base_damage: f32,
    element_mastery: f32,
) -> Option<ReactionResult> {
    let reaction = reaction_between(trigger, target)?;

    let mut multiplier = reaction.multiplier();
    if reaction.scales_with_mastery() {
        multiplier *= 1.0 + element_mastery / 100.0;
    }

    Some(ReactionResult {
        reaction,
        damage: (base_damage * multiplier).floor(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vaporize_scales_with_mastery() {
        let result = apply_element_reaction(Element::Fire, Element::Water, 50.0, 100.0).unwrap();
        assert_eq!(result.reaction, ElementReaction::Vaporize);
        // 50 * 2.0 * 2.0
        assert_eq!(result.damage, 200.0);
    }

    #[test]
    fn test_crystallize_ignores_mastery() {
        let result = apply_element_reaction(Element::Thunder, Element::Earth, 50.0, 200.0).unwrap();
        assert_eq!(result.reaction, ElementReaction::Crystallize);
        assert_eq!(result.damage, 40.0);
    }

    #[test]
    fn test_same_element_does_not_react() {
        assert!(apply_element_reaction(Element::Fire, Element::Fire, 50.0, 0.0).is_none());
        assert!(apply_element_reaction(Element::Water, Element::Water, 50.0, 0.0).is_none());
    }

    #[test]
    fn test_earth_pairs_with_itself() {
        assert_eq!(
            reaction_between(Element::Earth, Element::Earth),
            Some(ElementReaction::Crystallize)
        );
    }
}
