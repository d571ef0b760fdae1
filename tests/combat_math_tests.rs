//! Damage formulas and element reactions as the session applies them

use rand::rngs::mock::StepRng;
use wuxiasim::combat::elements::{apply_element_reaction, Element, ElementReaction};
use wuxiasim::combat::math::{apply_damage_to_pool, resolve_incoming_damage, roll_damage};

#[test]
fn test_player_hit_on_fresh_swordsman() {
    let mut health = 100.0;

    // StepRng(MAX, 0) rolls just under 1.0: never a crit
    let roll = roll_damage(20.0, 0.0, &mut StepRng::new(u64::MAX, 0));
    assert!(!roll.is_critical);
    apply_damage_to_pool(&mut health, roll.amount);
    assert_eq!(health, 80.0);

    let crit = roll_damage(20.0, 0.0, &mut StepRng::new(0, 0));
    assert!(crit.is_critical);
    assert_eq!(crit.amount, 30.0);
    apply_damage_to_pool(&mut health, crit.amount);
    assert_eq!(health, 50.0);
}

#[test]
fn test_attack_bonus_adds_before_flooring() {
    let roll = roll_damage(20.0, 0.7, &mut StepRng::new(u64::MAX, 0));
    assert_eq!(roll.amount, 20.0);
}

#[test]
fn test_incoming_damage_never_below_one() {
    assert_eq!(resolve_incoming_damage(10.0, 50.0), 1.0);
    assert_eq!(resolve_incoming_damage(30.0, 5.0), 25.0);
}

#[test]
fn test_overload_and_electro_charged() {
    let overload = apply_element_reaction(Element::Thunder, Element::Fire, 40.0, 0.0).unwrap();
    assert_eq!(overload.reaction, ElementReaction::Overload);
    assert_eq!(overload.damage, 60.0);

    let charged = apply_element_reaction(Element::Water, Element::Thunder, 10.0, 50.0).unwrap();
    assert_eq!(charged.reaction, ElementReaction::ElectroCharged);
    // floor(10 * 1.3 * 1.5) = 19
    assert_eq!(charged.damage, 19.0);
}

#[test]
fn test_earth_always_crystallizes() {
    for other in Element::all() {
        let result = apply_element_reaction(other, Element::Earth, 100.0, 300.0).unwrap();
        assert_eq!(result.reaction, ElementReaction::Crystallize);
        assert_eq!(result.damage, 80.0);
    }
}

#[test]
fn test_reaction_is_symmetric() {
    use Element::*;

    let reacting = [(Fire, Water), (Fire, Thunder), (Water, Thunder)];

    for a in Element::all() {
        for b in Element::all() {
            let forward = apply_element_reaction(a, b, 25.0, 20.0);
            let backward = apply_element_reaction(b, a, 25.0, 20.0);
            assert_eq!(forward, backward, "{:?} on {:?}", a, b);

            let expected = a == Earth
                || b == Earth
                || reacting.contains(&(a, b))
                || reacting.contains(&(b, a));
            assert_eq!(forward.is_some(), expected, "{:?} on {:?}", a, b);
        }
    }
}
