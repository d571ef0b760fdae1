//! WuxiaSim - combat and AI simulation core of a wuxia action RPG
//!
//! A player fights a roster of swordsmen, spearmen, archers and bosses on an
//! open field with melee, sprinting, double jumps, element reactions and a
//! three-slot skill bar. The simulation runs identically in the graphical
//! build and in headless mode.
//!
//! This library exposes the core game modules for testing and reuse.

pub mod camera;
pub mod cli;
pub mod combat;
pub mod headless;
pub mod keybindings;
pub mod rendering;
pub mod settings;
pub mod states;

// Re-export commonly used types
pub use combat::log::{CombatLog, CombatLogEventType};
pub use headless::{HeadlessSessionConfig, SessionReport};
pub use states::session::{SessionConfig, SessionOutcome};
