//! Sky Hopper - A kiosk-mode vertical platform jumper
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, collisions, platform field, camera)
//! - `game`: Session state machine and frame orchestration
//! - `input`: Keyboard/pointer/touch translation into movement intents
//! - `renderer`: 2D raster drawing of the scene and HUD
//! - `records`: Player identity and session history types
//! - `persistence`: Key-value storage backing identity, history and high score
//! - `platform`: Browser bindings (canvas, localStorage)
//! - `tuning`: Data-driven game balance

pub mod game;
pub mod input;
pub mod persistence;
pub mod platform;
pub mod records;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use game::{Game, LoopDirective};
pub use records::{CompletionStatus, GameResult, Identity};
pub use settings::Settings;
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Logical canvas size (portrait, for a kiosk totem)
    pub const CANVAS_WIDTH: f32 = 480.0;
    pub const CANVAS_HEIGHT: f32 = 800.0;

    /// Countdown cadence before a session starts
    pub const COUNTDOWN_INTERVAL_MS: i32 = 1000;

    /// Points per derived level in the history log
    pub const POINTS_PER_LEVEL: u32 = 500;

    /// Storage keys
    pub const IDENTITY_KEY: &str = "gameUser";
    pub const HISTORY_KEY: &str = "gameHistory";
    pub const HIGH_SCORE_KEY: &str = "maxScore";
    pub const TUNING_KEY: &str = "sky_hopper_tuning";
    pub const SETTINGS_KEY: &str = "sky_hopper_settings";
}

/// Level shown in the history log for a final score
#[inline]
pub fn level_for_score(score: u32) -> u32 {
    score / consts::POINTS_PER_LEVEL + 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_for_score() {
        assert_eq!(level_for_score(0), 1);
        assert_eq!(level_for_score(499), 1);
        assert_eq!(level_for_score(500), 2);
        assert_eq!(level_for_score(3000), 7);
    }
}
