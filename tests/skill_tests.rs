//! Skill bar activation, cooldowns and energy against the shipped skill data

use wuxiasim::states::session::skill_config::load_skill_definitions;
use wuxiasim::states::session::{ActivationRefusal, SkillBar};

fn default_bar() -> SkillBar {
    let definitions = load_skill_definitions().expect("skills.ron should load");
    SkillBar::from_loadout(&[], &definitions)
}

#[test]
fn test_default_loadout_fills_three_slots() {
    let bar = default_bar();
    let ids: Vec<&str> = bar
        .iter()
        .filter_map(|(_, s)| s.map(|s| s.skill_id.as_str()))
        .collect();
    assert_eq!(ids, vec!["dragon_palm", "lingbo_step", "sword_qi"]);
}

#[test]
fn test_activation_spends_energy_and_starts_cooldown() {
    let mut bar = default_bar();
    let mut energy = 100.0;

    let skill = bar.try_activate(0, &mut energy).expect("ready and affordable");
    assert_eq!(skill.skill_id, "dragon_palm");
    assert_eq!(skill.current_cooldown, 300);
    assert_eq!(energy, 70.0);

    for _ in 0..150 {
        bar.tick();
    }
    assert_eq!(
        bar.try_activate(0, &mut energy).unwrap_err(),
        ActivationRefusal::OnCooldown { remaining: 150 }
    );
    assert_eq!(energy, 70.0, "a refused activation costs nothing");

    for _ in 0..150 {
        bar.tick();
    }
    assert!(bar.is_ready(0));
    assert!(bar.try_activate(0, &mut energy).is_ok());
    assert_eq!(energy, 40.0);
}

#[test]
fn test_insufficient_energy_leaves_state_untouched() {
    let mut bar = default_bar();
    let mut energy = 10.0;

    let refusal = bar.try_activate(2, &mut energy).unwrap_err();
    assert_eq!(
        refusal,
        ActivationRefusal::InsufficientEnergy {
            needed: 25.0,
            available: 10.0
        }
    );
    assert_eq!(energy, 10.0);
    assert!(bar.is_ready(2));
}

#[test]
fn test_cooldown_floors_at_zero() {
    let mut bar = default_bar();
    let mut energy = 100.0;
    bar.try_activate(1, &mut energy).unwrap();

    for _ in 0..1000 {
        bar.tick();
    }
    assert_eq!(bar.slot(1).unwrap().current_cooldown, 0);
}

#[test]
fn test_out_of_range_slot_is_empty() {
    let mut bar = default_bar();
    let mut energy = 100.0;
    assert_eq!(
        bar.try_activate(5, &mut energy).unwrap_err(),
        ActivationRefusal::EmptySlot
    );
}

#[test]
fn test_activation_over_cooldown_and_energy_grid() {
    let cost = 30.0;

    for cooldown in [0, 1, 150, 300] {
        for start in [0.0, cost - 0.1, cost, 100.0] {
            let mut bar = default_bar();
            bar.slot_mut(0).unwrap().current_cooldown = cooldown;
            let full = bar.slot(0).unwrap().config.cooldown_ticks();
            let mut energy = start;

            let accepted = bar.try_activate(0, &mut energy).is_ok();
            let remaining = bar.slot(0).unwrap().current_cooldown;

            if cooldown == 0 && start >= cost {
                assert!(accepted, "cooldown {} energy {}", cooldown, start);
                assert_eq!(energy, start - cost);
                assert_eq!(remaining, full);
            } else {
                assert!(!accepted, "cooldown {} energy {}", cooldown, start);
                assert_eq!(energy, start);
                assert_eq!(remaining, cooldown);
            }
        }
    }
}
