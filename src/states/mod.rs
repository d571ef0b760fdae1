//! Game state management
//!
//! Defines the graphical build's states and the transitions between them.
//! The headless runner drives a session without these states.

use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts};

use crate::combat::log::{CombatLog, CombatLogEventType};
use crate::keybindings::{GameAction, Keybindings};

pub mod session;

use session::systems::FramePhase;
use session::{
    session_outcome, setup_session, snapshot_session, teardown_session, Enemy, PlayerState,
    ScoreBoard, SessionClock, SessionOutcome, SessionSnapshot,
};

/// The core game states of the graphical build
#[derive(States, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GameState {
    /// A live session
    #[default]
    Playing,
    /// Session over; summary on screen until restart
    Ended,
}

/// How the last session went, shown on the end screen
#[derive(Resource, Debug, Clone)]
pub struct SessionSummary {
    pub outcome: SessionOutcome,
    pub snapshot: SessionSnapshot,
    pub kills: u32,
    pub max_combo: u32,
    pub duration_secs: f32,
}

/// Plugin for managing game states and transitions
pub struct StatesPlugin;

impl Plugin for StatesPlugin {
    fn build(&self, app: &mut App) {
        app.init_state::<GameState>()
            .add_systems(OnEnter(GameState::Playing), setup_session)
            .add_systems(OnExit(GameState::Playing), teardown_session)
            .add_systems(
                Update,
                check_session_end
                    .after(FramePhase::Resolution)
                    .run_if(in_state(GameState::Playing))
                    .run_if(resource_exists::<SessionClock>),
            )
            .add_systems(
                Update,
                (end_screen_ui, restart_on_key).run_if(in_state(GameState::Ended)),
            )
            .add_systems(OnExit(GameState::Ended), |mut commands: Commands| {
                commands.remove_resource::<SessionSummary>();
            });
    }
}

/// Leave `Playing` when the player quits, dies or clears the field.
fn check_session_end(
    mut commands: Commands,
    keyboard: Res<ButtonInput<KeyCode>>,
    keybindings: Res<Keybindings>,
    clock: Res<SessionClock>,
    score: Res<ScoreBoard>,
    mut combat_log: ResMut<CombatLog>,
    mut next_state: ResMut<NextState<GameState>>,
    players: Query<&PlayerState>,
    enemies: Query<&Enemy>,
) {
    let Ok(player) = players.get_single() else {
        return;
    };

    let outcome = if keybindings.action_just_pressed(GameAction::EndSession, &keyboard) {
        Some(SessionOutcome::Aborted)
    } else {
        session_outcome(player, enemies.iter())
    };
    let Some(outcome) = outcome else {
        return;
    };

    combat_log.log(
        CombatLogEventType::SessionEvent,
        format!("Session ended: {}", outcome.as_str()),
    );
    info!(
        "Session ended after {:.1}s: {} (score {}, {} kills)",
        clock.elapsed,
        outcome.as_str(),
        score.score,
        score.kills
    );

    commands.insert_resource(SessionSummary {
        outcome,
        snapshot: snapshot_session(player, &score),
        kills: score.kills,
        max_combo: score.max_combo,
        duration_secs: clock.elapsed,
    });
    next_state.set(GameState::Ended);
}

fn restart_on_key(
    keyboard: Res<ButtonInput<KeyCode>>,
    keybindings: Res<Keybindings>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    if keybindings.action_just_pressed(GameAction::RestartSession, &keyboard) {
        next_state.set(GameState::Playing);
    }
}

// ============================================================================
// End screen (egui)
// ============================================================================

fn end_screen_ui(
    mut contexts: EguiContexts,
    summary: Option<Res<SessionSummary>>,
    keybindings: Res<Keybindings>,
    mut next_state: ResMut<NextState<GameState>>,
    mut exit_events: EventWriter<AppExit>,
) {
    let Some(summary) = summary else {
        return;
    };
    let ctx = contexts.ctx_mut();

    let (title, color) = match summary.outcome {
        SessionOutcome::Cleared => ("VICTORY", egui::Color32::from_rgb(230, 204, 153)),
        SessionOutcome::Defeated => ("DEFEATED", egui::Color32::from_rgb(200, 70, 60)),
        SessionOutcome::Timeout => ("TIME UP", egui::Color32::from_rgb(180, 180, 180)),
        SessionOutcome::Aborted => ("SESSION ENDED", egui::Color32::from_rgb(180, 180, 180)),
    };

    egui::CentralPanel::default()
        .frame(egui::Frame::none().fill(egui::Color32::from_rgba_unmultiplied(10, 10, 16, 220)))
        .show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.add_space(140.0);
                ui.heading(egui::RichText::new(title).size(64.0).color(color));
                ui.add_space(30.0);

                let stat = |ui: &mut egui::Ui, label: &str, value: String| {
                    ui.label(
                        egui::RichText::new(format!("{}: {}", label, value))
                            .size(22.0)
                            .color(egui::Color32::from_rgb(220, 210, 190)),
                    );
                };
                stat(ui, "Score", summary.snapshot.score.to_string());
                stat(ui, "Kills", summary.kills.to_string());
                stat(ui, "Best combo", summary.max_combo.to_string());
                stat(ui, "Time", format!("{:.1}s", summary.duration_secs));
                stat(
                    ui,
                    "Health",
                    format!("{:.0} / {:.0}", summary.snapshot.health, summary.snapshot.max_health),
                );

                ui.add_space(40.0);
                let button_size = egui::vec2(280.0, 56.0);

                let restart_label = format!(
                    "FIGHT AGAIN ({})",
                    keybindings.binding_display(GameAction::RestartSession)
                );
                if ui
                    .add_sized(
                        button_size,
                        egui::Button::new(egui::RichText::new(restart_label).size(24.0)),
                    )
                    .clicked()
                {
                    next_state.set(GameState::Playing);
                }

                ui.add_space(10.0);

                if ui
                    .add_sized(
                        button_size,
                        egui::Button::new(egui::RichText::new("EXIT").size(24.0)),
                    )
                    .clicked()
                {
                    info!("Exit button pressed - quitting application");
                    exit_events.send(AppExit::Success);
                }
            });
        });
}
