//! Full frame loop on a minimal app: kills, corpses and teardown

use bevy::ecs::system::RunSystemOnce;
use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use std::time::Duration;
use wuxiasim::combat::events::{DamageEvent, EnemyKilledEvent, ItemDropRequest, SkillUsedEvent};
use wuxiasim::combat::CombatPlugin;
use wuxiasim::states::session::skill_config::{load_skill_definitions, SkillDefinitions};
use wuxiasim::states::session::systems::{self, tick_session_clock, FramePhase};
use wuxiasim::states::session::{
    load_session_content, setup_session, teardown_session, Enemy, EnemySpawn, FpsSampler,
    FrameIntents, ParticlePool, PlayerState, ScoreBoard, SessionClock, SessionConfig,
    SessionPlugin, SkillBar,
};

/// Buttons held down for the coming frames
#[derive(Resource, Default)]
struct Held {
    attack: bool,
    palm: bool,
}

#[derive(Resource, Default)]
struct Tally {
    hits: usize,
    hits_on_corpse: usize,
    kills: usize,
    drops: usize,
    skills_used: usize,
}

fn press_held(held: Res<Held>, mut intents: ResMut<FrameIntents>) {
    *intents = FrameIntents::default();
    intents.attack = held.attack;
    intents.skill_slots[0] = held.palm;
}

fn count_events(
    mut tally: ResMut<Tally>,
    mut damage: EventReader<DamageEvent>,
    mut kills: EventReader<EnemyKilledEvent>,
    mut drops: EventReader<ItemDropRequest>,
    mut skills: EventReader<SkillUsedEvent>,
) {
    let dead_before = tally.kills > 0;
    for _ in damage.read() {
        tally.hits += 1;
        if dead_before {
            tally.hits_on_corpse += 1;
        }
    }
    tally.kills += kills.read().count();
    tally.drops += drops.read().count();
    tally.skills_used += skills.read().count();
}

fn lone_swordsman(seed: u64) -> SessionConfig {
    SessionConfig {
        enemies: vec![EnemySpawn {
            kind: "swordsman".to_string(),
            position: [2.0, 1.5, 0.0],
            patrol: Vec::new(),
        }],
        npcs: Vec::new(),
        player_element: None,
        random_seed: Some(seed),
        ..SessionConfig::default()
    }
}

fn build_app(config: SessionConfig) -> App {
    let (enemies, skills, items) = load_session_content().unwrap();

    let mut app = App::new();
    app.add_plugins(MinimalPlugins)
        .add_plugins((CombatPlugin, SessionPlugin))
        .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_secs_f64(
            1.0 / 60.0,
        )))
        .insert_resource(config)
        .insert_resource(enemies)
        .insert_resource(skills)
        .insert_resource(items)
        .init_resource::<Held>()
        .init_resource::<Tally>();

    systems::configure_frame_phases(&mut app);
    systems::add_core_session_systems(&mut app, || true);

    app.add_systems(Startup, setup_session)
        .add_systems(
            Update,
            press_held
                .in_set(FramePhase::Input)
                .after(tick_session_clock)
                .run_if(resource_exists::<SessionClock>),
        )
        .add_systems(Update, count_events.after(FramePhase::Particles));

    app.finish();
    app.cleanup();
    app
}

fn run_frames(app: &mut App, frames: usize) {
    for _ in 0..frames {
        app.update();
    }
}

fn hold(app: &mut App, attack: bool, palm: bool) {
    let mut held = app.world_mut().resource_mut::<Held>();
    held.attack = attack;
    held.palm = palm;
}

fn enemy_count(app: &mut App) -> usize {
    let world = app.world_mut();
    world.query::<&Enemy>().iter(world).count()
}

#[test]
fn test_held_attack_kills_swordsman_once() {
    let mut app = build_app(lone_swordsman(7));
    app.update();
    hold(&mut app, true, false);

    // 18-tick swing cadence: five swings fit well inside 150 frames
    run_frames(&mut app, 150);

    let tally = app.world().resource::<Tally>();
    assert_eq!(tally.kills, 1);
    assert!((4..=5).contains(&tally.hits), "swings landed: {}", tally.hits);
    assert_eq!(tally.hits_on_corpse, 0);
    assert!(tally.drops <= 1);

    let score = app.world().resource::<ScoreBoard>();
    assert_eq!(score.kills, 1);
    assert!(score.score >= 100);
}

#[test]
fn test_palm_after_killing_swing_spares_corpse() {
    let mut app = build_app(lone_swordsman(11));
    app.update();

    {
        let world = app.world_mut();
        let mut enemies = world.query::<&mut Enemy>();
        enemies.single_mut(world).health = 10.0;
    }

    // Swing and palm land in the same actions phase, swing first
    hold(&mut app, true, true);
    app.update();
    hold(&mut app, true, false);
    run_frames(&mut app, 60);

    let tally = app.world().resource::<Tally>();
    assert_eq!(tally.skills_used, 1);
    assert_eq!(tally.hits, 1);
    assert_eq!(tally.kills, 1);
    assert_eq!(tally.hits_on_corpse, 0);
    assert!(tally.drops <= 1);
    assert_eq!(app.world().resource::<ScoreBoard>().kills, 1);
}

#[test]
fn test_teardown_leaves_nothing_running() {
    let mut app = build_app(lone_swordsman(3));
    run_frames(&mut app, 10);

    assert!(app.world().contains_resource::<SessionClock>());
    assert_eq!(enemy_count(&mut app), 1);

    app.world_mut().run_system_once(teardown_session).unwrap();
    run_frames(&mut app, 10);

    let world = app.world();
    assert!(!world.contains_resource::<SessionClock>());
    assert!(!world.contains_resource::<SkillBar>());
    assert!(!world.contains_resource::<ParticlePool>());
    assert!(!world.contains_resource::<FpsSampler>());
    assert!(!world.contains_resource::<ScoreBoard>());
    assert_eq!(enemy_count(&mut app), 0);
    {
        let world = app.world_mut();
        assert_eq!(world.query::<&PlayerState>().iter(world).count(), 0);
    }

    // Stray state left behind must not be ticked by the fixed-rate timer
    let definitions: SkillDefinitions = load_skill_definitions().unwrap();
    let mut bar = SkillBar::from_loadout(&[], &definitions);
    bar.slot_mut(0).unwrap().current_cooldown = 120;
    let mut player = PlayerState::new(Vec3::ZERO);
    player.attack_cooldown = 9;
    app.world_mut().insert_resource(bar);
    app.world_mut().spawn(player);

    run_frames(&mut app, 30);

    let world = app.world_mut();
    assert_eq!(world.resource::<SkillBar>().slot(0).unwrap().current_cooldown, 120);
    assert_eq!(world.query::<&PlayerState>().single(world).attack_cooldown, 9);
}
