//! Hit Resolution
//!
//! Player melee, the shared damage path used by melee and skills, and the
//! kill aftermath (score, loot roll, drop request).

use bevy::ecs::system::SystemParam;
use bevy::prelude::*;

use crate::combat::elements::apply_element_reaction;
use crate::combat::events::{
    BossPhaseChangedEvent, DamageEvent, ElementReactionEvent, EnemyKilledEvent, ItemDropRequest,
};
use crate::combat::math::roll_damage;
use super::components::*;
use super::constants::*;
use super::enemy_ai::check_boss_phase;
use super::enemy_config::EnemyDefinitions;
use super::input::FrameIntents;
use super::item_config::ItemCatalog;
use super::modifiers::ModifierStack;
use super::particles::ParticleBurst;

/// Event writers every damage source needs
#[derive(SystemParam)]
pub struct HitEvents<'w> {
    pub damage: EventWriter<'w, DamageEvent>,
    pub killed: EventWriter<'w, EnemyKilledEvent>,
    pub boss_phase: EventWriter<'w, BossPhaseChangedEvent>,
    pub reactions: EventWriter<'w, ElementReactionEvent>,
    pub particles: EventWriter<'w, ParticleBurst>,
}

/// Damage landing on one enemy
#[derive(Clone, Debug)]
pub struct Hit<'a> {
    pub amount: f32,
    pub is_critical: bool,
    /// Skill that caused the hit, None for melee
    pub skill_id: Option<&'a str>,
}

/// Apply a hit to an enemy and raise the resulting events.
///
/// Death is checked immediately after the damage lands. Returns `None` if
/// the enemy was already dead, in which case nothing is emitted.
pub fn land_hit(enemy: &mut Enemy, hit: Hit, events: &mut HitEvents) -> Option<DamageOutcome> {
    let outcome = enemy.apply_damage(hit.amount)?;

    events.damage.send(DamageEvent {
        target: enemy.id,
        amount: hit.amount,
        is_critical: hit.is_critical,
        skill_id: hit.skill_id.map(str::to_string),
        world_position: enemy.position,
    });

    for change in check_boss_phase(enemy) {
        info!(
            "{} {} enters phase {} at {:.0}% health",
            enemy.config.name, enemy.id, change.phase, change.threshold
        );
        events.boss_phase.send(BossPhaseChangedEvent {
            enemy: enemy.id,
            phase: change.phase,
            threshold: change.threshold,
            ability: change.ability,
        });
    }

    if outcome.killed {
        events.killed.send(EnemyKilledEvent {
            enemy: enemy.id,
            kind: enemy.kind.clone(),
            is_boss: enemy.config.is_boss(),
            world_position: enemy.position,
        });
    }

    Some(outcome)
}

/// Melee cooldown in fixed ticks
pub fn attack_cooldown_ticks() -> u32 {
    (ATTACK_COOLDOWN_SECS * FIXED_TICKS_PER_SECOND).round() as u32
}

/// Resolve the attack intent: every living enemy within melee range takes a
/// rolled hit, possibly replaced by an element reaction.
#[allow(clippy::too_many_arguments)]
pub fn resolve_player_attack(
    clock: Res<SessionClock>,
    intents: Res<FrameIntents>,
    equipment: Res<CombatStatModifiers>,
    mut rng: ResMut<GameRng>,
    mut score: ResMut<ScoreBoard>,
    mut players: Query<(&mut PlayerState, &ModifierStack)>,
    mut enemies: Query<&mut Enemy>,
    mut events: HitEvents,
) {
    if !intents.attack {
        return;
    }
    let Ok((mut player, modifiers)) = players.get_single_mut() else {
        return;
    };
    if !player.is_alive() || player.attack_cooldown > 0 {
        return;
    }
    player.attack_cooldown = attack_cooldown_ticks();

    let attack_bonus = equipment.attack_bonus + modifiers.attack_bonus();

    for mut enemy in enemies.iter_mut() {
        if enemy.is_dead() || horizontal_distance(player.position, enemy.position) > MELEE_RANGE {
            continue;
        }

        let roll = roll_damage(player.base_attack, attack_bonus, &mut *rng);
        let mut amount = roll.amount;

        if let (Some(trigger), Some(target)) = (player.element, enemy.config.element) {
            if let Some(result) =
                apply_element_reaction(trigger, target, amount, player.element_mastery)
            {
                amount = result.damage;
                let (color, count) = result.reaction.particle_burst();
                events.particles.send(ParticleBurst::upward(enemy.position, color, count));
                events.reactions.send(ElementReactionEvent {
                    target: enemy.id,
                    reaction: result.reaction,
                    damage: result.damage,
                    world_position: enemy.position,
                });
            }
        }

        let hit = Hit {
            amount,
            is_critical: roll.is_critical,
            skill_id: None,
        };
        if land_hit(&mut enemy, hit, &mut events).is_none() {
            continue;
        }

        score.register_hit(clock.elapsed);

        let burst = if roll.is_critical {
            ParticleBurst::upward(enemy.position, Color::srgb(1.0, 0.0, 0.0), CRIT_HIT_PARTICLES)
        } else {
            ParticleBurst::upward(enemy.position, Color::srgb(0.0, 1.0, 1.0), HIT_PARTICLES)
        };
        events.particles.send(burst);
    }
}

/// Score each kill and roll its loot.
///
/// Loot ids missing from the item catalog fail closed: the drop is skipped
/// and logged, the kill still counts.
pub fn resolve_kills(
    mut kills: EventReader<EnemyKilledEvent>,
    mut score: ResMut<ScoreBoard>,
    mut rng: ResMut<GameRng>,
    definitions: Res<EnemyDefinitions>,
    catalog: Res<ItemCatalog>,
    mut drops: EventWriter<ItemDropRequest>,
) {
    for kill in kills.read() {
        score.register_kill();

        let Some(config) = definitions.get(&kill.kind) else {
            warn!("No definition for killed enemy kind '{}', loot skipped", kill.kind);
            continue;
        };
        if rng.random_f32() >= DROP_CHANCE {
            continue;
        }
        let Some(item_id) = rng.choose(&config.loot) else {
            continue;
        };
        if !catalog.contains(item_id) {
            warn!("{} {} rolled unknown item '{}', drop skipped", config.name, kill.enemy, item_id);
            continue;
        }

        drops.send(ItemDropRequest {
            item_id: item_id.clone(),
            source: kill.enemy,
            world_position: kill.world_position,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::events::EnemyId;
    use crate::states::session::enemy_config::load_enemy_definitions;
    use bevy::ecs::system::RunSystemOnce;

    fn world_with(kind: &str) -> World {
        let definitions = load_enemy_definitions().unwrap();
        let config = definitions.get(kind).unwrap().clone();

        let mut world = World::new();
        world.init_resource::<Events<DamageEvent>>();
        world.init_resource::<Events<EnemyKilledEvent>>();
        world.init_resource::<Events<BossPhaseChangedEvent>>();
        world.init_resource::<Events<ElementReactionEvent>>();
        world.init_resource::<Events<ParticleBurst>>();
        world.spawn(Enemy::new(EnemyId(1), kind, config, Vec3::ZERO, Vec::new()));
        world
    }

    fn melee(
        In(amount): In<f32>,
        mut enemies: Query<&mut Enemy>,
        mut events: HitEvents,
    ) -> Option<DamageOutcome> {
        let mut enemy = enemies.single_mut();
        let hit = Hit {
            amount,
            is_critical: false,
            skill_id: None,
        };
        land_hit(&mut enemy, hit, &mut events)
    }

    fn damage_amounts(world: &World) -> Vec<f32> {
        world
            .resource::<Events<DamageEvent>>()
            .iter_current_update_events()
            .map(|event| event.amount)
            .collect()
    }

    #[test]
    fn test_attack_cooldown_is_eighteen_ticks() {
        assert_eq!(attack_cooldown_ticks(), 18);
    }

    #[test]
    fn test_killing_blow_reports_rolled_amount() {
        // Elite: 200 health
        let mut world = world_with("elite");

        let first = world.run_system_once_with(150.0, melee).unwrap().unwrap();
        assert_eq!(first.applied, 150.0);
        assert!(!first.killed);

        let last = world.run_system_once_with(80.0, melee).unwrap().unwrap();
        assert_eq!(last.applied, 50.0);
        assert!(last.killed);

        assert_eq!(damage_amounts(&world), vec![150.0, 80.0]);
        assert_eq!(
            world.resource::<Events<EnemyKilledEvent>>().iter_current_update_events().count(),
            1
        );
    }

    #[test]
    fn test_enemy_defense_does_not_reduce_hits() {
        let mut world = world_with("boss_litianxiong");
        let defense = world.query::<&Enemy>().single(&world).config.defense;
        assert!(defense > 0.0);

        let outcome = world.run_system_once_with(40.0, melee).unwrap().unwrap();
        assert_eq!(outcome.applied, 40.0);
        assert_eq!(world.query::<&Enemy>().single(&world).health, 460.0);
    }

    #[test]
    fn test_corpse_takes_no_hits() {
        let mut world = world_with("swordsman");
        world.run_system_once_with(500.0, melee).unwrap();

        assert!(world.run_system_once_with(20.0, melee).unwrap().is_none());
        assert_eq!(damage_amounts(&world), vec![500.0]);
    }
}
