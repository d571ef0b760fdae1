//! Headless mode for agentic testing
//!
//! Runs a play session without any graphical output. A pilot stands in for
//! the keyboard, time advances in fixed 1/60 s steps, and the run ends with a
//! [`SessionReport`] and a JSON session log.
//!
//! ## Usage
//!
//! ```bash
//! cargo run --release -- --headless demos/headless_session.json
//! ```
//!
//! ## JSON Configuration
//!
//! ```json
//! {
//!   "enemies": ["swordsman", "spearman", "archer"],
//!   "include_boss": true,
//!   "loadout": ["dragon_palm", "lingbo_step", "sword_qi"],
//!   "player_element": "Fire",
//!   "element_mastery": 80.0,
//!   "max_duration_secs": 120,
//!   "random_seed": 42
//! }
//! ```

pub mod config;
pub mod pilot;
pub mod runner;

pub use config::HeadlessSessionConfig;
pub use runner::{run_headless_session, simulate_session, SessionReport};
