//! Wavy Trip - An endless-runner strip simulation
//!
//! Core modules:
//! - `sim`: Deterministic simulation (strip maintenance, combo scoring, session lifecycle)
//! - `config`: Data-driven strip layout and tuning
//! - `economy`: Score/coin sinks the simulation credits into
//! - `highscores`: Leaderboard of finished runs
//! - `autopilot`: Demo AI and a stand-in collision source for headless runs

pub mod autopilot;
pub mod config;
pub mod economy;
pub mod error;
pub mod highscores;
pub mod sim;

#[cfg(target_arch = "wasm32")]
pub mod web;

pub use config::{GameConfig, PlayerTuning, ShakeTuning, StripConfig};
pub use economy::{Ledger, RewardSink};
pub use error::ConfigError;
pub use highscores::HighScores;

/// Game configuration constants
pub mod consts {
    /// Per-frame simulation timestep used by headless hosts (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Strip maintenance period (seconds), independent of frame rate
    pub const MAINTENANCE_PERIOD: f32 = 0.5;
    /// A segment this far behind the reference is retired
    pub const RETIRE_LAG: f32 = 20.0;
    /// A score pickup this far behind the reference counts as missed
    pub const MISS_MARGIN: f32 = 1.0;

    /// Delay between the fatal hit and the GameOver phase
    pub const DEATH_DELAY: f32 = 0.1;

    /// Player defaults
    pub const PLAYER_SPEED: f32 = 10.0;
    pub const PLAYER_SPEED_FACTOR: f32 = 40.0;
    pub const PLAYER_SPEED_LIMIT: f32 = 25.0;

    /// Camera shake defaults
    pub const SHAKE_DURATION: f32 = 0.1;
    pub const SHAKE_AMOUNT: f32 = 0.2;
    pub const SHAKE_DECREASE_FACTOR: f32 = 0.3;
}
