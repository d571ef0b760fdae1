//! WuxiaSim - combat and AI simulation core of a wuxia action RPG
//!
//! Runs the graphical game by default, or a piloted headless session with
//! `--headless <CONFIG>`.

use bevy::prelude::*;
use bevy_egui::EguiPlugin;

use wuxiasim::camera::CameraPlugin;
use wuxiasim::cli;
use wuxiasim::combat::CombatPlugin;
use wuxiasim::headless::{run_headless_session, HeadlessSessionConfig};
use wuxiasim::rendering::RenderingPlugin;
use wuxiasim::settings::{GameSettings, SettingsPlugin};
use wuxiasim::states::session::systems::{self, tick_session_clock, FramePhase};
use wuxiasim::states::session::{SessionContentPlugin, SessionPlugin};
use wuxiasim::states::{GameState, StatesPlugin};

fn main() {
    let args = cli::parse_args();

    if let Some(config_path) = args.headless {
        let mut config = match HeadlessSessionConfig::load_from_file(&config_path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("{}", e);
                std::process::exit(1);
            }
        };

        // Command-line flags override the config file
        if let Some(output) = args.output {
            config.output_path = Some(output.to_string_lossy().into_owned());
        }
        if let Some(max_duration) = args.max_duration {
            config.max_duration_secs = max_duration;
        }
        if args.seed.is_some() {
            config.random_seed = args.seed;
        }

        if let Err(e) = run_headless_session(config) {
            eprintln!("Headless session failed: {}", e);
            std::process::exit(1);
        }
        return;
    }

    run_graphical();
}

fn run_graphical() {
    let settings = GameSettings::load();

    let mut app = App::new();
    app
        // Bevy default plugins with window settings from the settings file
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(settings.primary_window("WuxiaSim")),
            ..default()
        }))
        // Our game plugins
        .add_plugins((
            EguiPlugin,
            CombatPlugin,
            SessionPlugin,
            SessionContentPlugin,
            StatesPlugin,
            CameraPlugin,
            RenderingPlugin,
            SettingsPlugin { settings },
        ));

    systems::configure_frame_phases(&mut app);
    systems::add_core_session_systems(&mut app, in_state(GameState::Playing));
    app.add_systems(
        Update,
        systems::sample_player_input
            .in_set(FramePhase::Input)
            .after(tick_session_clock)
            .run_if(in_state(GameState::Playing))
            .run_if(resource_exists::<wuxiasim::states::session::SessionClock>),
    );

    app.run();
}
