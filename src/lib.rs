//! Rope Dots - a connect-the-dots puzzle
//!
//! Core modules:
//! - `sim`: Pure puzzle logic (coordinate parsing, level catalog, tap sequencing, rope queue)
//! - `session`: Level flow and event handling on top of `sim`
//! - `presenter`: The UI collaborator the session drives
//! - `settings`: Animation timing and easing
//! - `demo`: Headless host that plays levels without a renderer

pub mod demo;
pub mod easing;
pub mod presenter;
pub mod rope;
pub mod session;
pub mod settings;
pub mod sim;

pub use easing::Easing;
pub use presenter::Presenter;
pub use session::{GameSession, LevelError, Screen, SessionEvent};
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Fixed host step for the headless loop (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Seconds for one rope to grow
    pub const DEFAULT_ROPE_ANIMATE_TIME: f32 = 0.4;
    /// Seconds for screen fades
    pub const DEFAULT_FADE_ANIMATION_TIME: f32 = 0.3;

    /// Bundled level catalog, relative to the crate root
    pub const LEVEL_DATA_PATH: &str = "assets/level_data.json";

    /// Demo autoplayer: seconds between taps (faster than a rope animates)
    pub const DEMO_TAP_INTERVAL: f32 = 0.15;
    /// Demo autoplayer: chance that a tap goes to a random point
    pub const DEMO_MISTAKE_CHANCE: f64 = 0.2;
    /// Give up on a level after this many host steps
    pub const MAX_LEVEL_STEPS: u32 = 60 * 60 * 5;
}
