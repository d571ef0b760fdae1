//! Headless session execution
//!
//! Runs a session without any graphical output, driven by the pilot, with
//! a fixed 1/60 s frame step so seeded runs are reproducible.

use bevy::log::LogPlugin;
use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use std::sync::Arc;
use std::time::Duration;

use crate::combat::hooks::{QuestProgress, QuestTally, SessionHooks};
use crate::combat::log::{CombatLog, CombatLogEventType, SessionMetadata};
use crate::combat::CombatPlugin;
use crate::states::session::systems::{self, tick_session_clock, FramePhase};
use crate::states::session::{
    load_session_content, session_outcome, setup_session, snapshot_session, teardown_session,
    Enemy, PlayerState, ScoreBoard, SessionClock, SessionOutcome, SessionPlugin, SessionSnapshot,
};

use super::config::HeadlessSessionConfig;
use super::pilot::{pilot_intents, PilotMemory};

/// Seconds per simulated frame
const FRAME_STEP: f64 = 1.0 / 60.0;

/// Result of a completed headless session
///
/// This struct provides programmatic access to session results for testing and analysis.
#[derive(Debug, Clone)]
pub struct SessionReport {
    pub outcome: SessionOutcome,
    /// Session time when the outcome was decided
    pub duration_secs: f32,
    /// Player state at the end
    pub snapshot: SessionSnapshot,
    pub enemies_killed: usize,
    pub enemies_total: usize,
    /// Everything the quest hooks were told
    pub quest_progress: QuestProgress,
    pub max_combo: u32,
    /// Random seed used (if deterministic mode)
    pub random_seed: Option<u64>,
    /// Where the session log was written, if it was
    pub log_path: Option<String>,
}

impl SessionReport {
    fn metadata(&self) -> SessionMetadata {
        SessionMetadata {
            outcome: self.outcome.as_str().to_string(),
            duration_secs: self.duration_secs,
            score: self.snapshot.score,
            max_combo: self.max_combo,
            enemies_killed: self.enemies_killed,
            enemies_total: self.enemies_total,
            final_health: self.snapshot.health,
            final_energy: self.snapshot.energy,
            random_seed: self.random_seed,
        }
    }
}

/// Resource to track headless session state
#[derive(Resource)]
pub struct HeadlessSessionState {
    /// Session time after which the run ends as a timeout
    pub max_duration: f32,
    pub enemies_total: usize,
    pub random_seed: Option<u64>,
    /// Populated when the session ends
    pub report: Option<SessionReport>,
}

fn headless_session_complete(state: Res<HeadlessSessionState>) -> bool {
    state.report.is_some()
}

/// Build an app that runs one piloted session.
///
/// The app is finished and ready for `update()`; the first update runs
/// session setup.
pub fn build_headless_app(
    config: &HeadlessSessionConfig,
    hooks: SessionHooks,
    with_logging: bool,
) -> Result<App, String> {
    let (enemy_definitions, skill_definitions, item_catalog) = load_session_content()?;
    config.validate(&enemy_definitions, &skill_definitions)?;
    let session_config = config.to_session_config();

    let mut app = App::new();
    // Minimal plugins - no window, no rendering
    app.add_plugins(MinimalPlugins);
    if with_logging {
        app.add_plugins(LogPlugin::default());
    }
    app.add_plugins((CombatPlugin, SessionPlugin));

    app.insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_secs_f64(
        FRAME_STEP,
    )))
    .insert_resource(HeadlessSessionState {
        max_duration: config.max_duration_secs,
        enemies_total: session_config.enemies.len(),
        random_seed: config.random_seed,
        report: None,
    })
    .insert_resource(session_config)
    .insert_resource(enemy_definitions)
    .insert_resource(skill_definitions)
    .insert_resource(item_catalog)
    .insert_resource(hooks)
    .init_resource::<PilotMemory>();

    systems::configure_frame_phases(&mut app);
    // Core systems always run in headless mode
    systems::add_core_session_systems(&mut app, || true);

    app.add_systems(Startup, setup_session)
        .add_systems(
            Update,
            pilot_intents
                .in_set(FramePhase::Input)
                .after(tick_session_clock)
                .run_if(resource_exists::<SessionClock>),
        )
        .add_systems(
            Update,
            headless_check_session_end
                .after(FramePhase::Resolution)
                .run_if(resource_exists::<SessionClock>)
                .run_if(not(headless_session_complete)),
        )
        .add_systems(
            PostUpdate,
            teardown_session
                .run_if(headless_session_complete)
                .run_if(resource_exists::<SessionClock>),
        );

    app.finish();
    app.cleanup();
    Ok(app)
}

/// Decide whether the session is over (cleared, defeated or timed out)
fn headless_check_session_end(
    clock: Res<SessionClock>,
    score: Res<ScoreBoard>,
    mut combat_log: ResMut<CombatLog>,
    mut state: ResMut<HeadlessSessionState>,
    players: Query<&PlayerState>,
    enemies: Query<&Enemy>,
) {
    let Ok(player) = players.get_single() else {
        return;
    };

    let outcome = session_outcome(player, enemies.iter()).or_else(|| {
        (clock.elapsed >= state.max_duration).then_some(SessionOutcome::Timeout)
    });
    let Some(outcome) = outcome else {
        return;
    };

    combat_log.log(
        CombatLogEventType::SessionEvent,
        format!("Session ended: {}", outcome.as_str()),
    );
    info!(
        "Session ended after {:.1}s: {} ({} kills, score {})",
        clock.elapsed,
        outcome.as_str(),
        score.kills,
        score.score
    );

    state.report = Some(SessionReport {
        outcome,
        duration_secs: clock.elapsed,
        snapshot: snapshot_session(player, &score),
        enemies_killed: score.kills as usize,
        enemies_total: state.enemies_total,
        quest_progress: QuestProgress::default(),
        max_combo: score.max_combo,
        random_seed: state.random_seed,
        log_path: None,
    });
}

/// Step the app until the session reports an outcome.
///
/// Gives up with an error if no outcome arrives within a few frames past the
/// configured time limit.
pub fn drive_to_completion(app: &mut App) -> Result<SessionReport, String> {
    let max_duration = app.world().resource::<HeadlessSessionState>().max_duration;
    let frame_budget = (max_duration as f64 / FRAME_STEP).ceil() as u64 + 10;

    for _ in 0..frame_budget {
        app.update();
        if let Some(report) = &app.world().resource::<HeadlessSessionState>().report {
            return Ok(report.clone());
        }
    }

    Err(format!(
        "Session did not end within {} frames",
        frame_budget
    ))
}

/// Run a piloted session in memory and return its report. Writes nothing.
pub fn simulate_session(config: &HeadlessSessionConfig) -> Result<SessionReport, String> {
    let tally = Arc::new(QuestTally::default());
    let mut app = build_headless_app(config, SessionHooks::new(tally.clone()), false)?;

    let mut report = drive_to_completion(&mut app)?;
    report.quest_progress = tally.snapshot();
    Ok(report)
}

/// Run a headless session with the given configuration and save its log
pub fn run_headless_session(config: HeadlessSessionConfig) -> Result<SessionReport, String> {
    println!("Starting headless session simulation...");
    println!("  Enemies: {:?}", config.roster_kinds());
    println!("  Loadout: {:?}", config.loadout);
    println!("  Max duration: {:.0}s", config.max_duration_secs);
    if let Some(seed) = config.random_seed {
        println!("  Seed: {}", seed);
    }

    let tally = Arc::new(QuestTally::default());
    let mut app = build_headless_app(&config, SessionHooks::new(tally.clone()), true)?;

    let mut report = drive_to_completion(&mut app)?;
    report.quest_progress = tally.snapshot();

    let combat_log = app.world().resource::<CombatLog>();
    match combat_log.save_to_file(&report.metadata(), config.output_path.as_deref()) {
        Ok(path) => {
            println!("Session complete. Log saved to: {}", path);
            report.log_path = Some(path);
        }
        Err(e) => {
            eprintln!("Failed to save session log: {}", e);
        }
    }

    println!(
        "  Outcome: {} after {:.1}s, {}/{} enemies killed, score {}",
        report.outcome.as_str(),
        report.duration_secs,
        report.enemies_killed,
        report.enemies_total,
        report.snapshot.score
    );

    Ok(report)
}
