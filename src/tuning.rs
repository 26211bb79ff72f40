//! Data-driven game balance
//!
//! Every gameplay number lives here so a kiosk operator can rebalance the
//! game by dropping a JSON blob into storage. Missing fields take the
//! default value, malformed JSON falls back to the defaults entirely.

use serde::{Deserialize, Serialize};

use crate::consts::{CANVAS_HEIGHT, CANVAS_WIDTH};

/// Gameplay tuning values (units are pixels and pixels/tick)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Playable area
    pub width: f32,
    pub height: f32,

    // === Player ===
    pub player_radius: f32,
    /// Added to vertical velocity every tick
    pub gravity: f32,
    /// Vertical velocity applied on every landing (negative = up)
    pub bounce_impulse: f32,
    /// Horizontal step per tick while a direction is held
    pub move_speed: f32,

    // === Platforms ===
    pub platform_width: f32,
    pub platform_height: f32,
    /// Vertical gap between consecutive platforms
    pub platform_spacing: f32,
    /// Distance of the start platform above the bottom edge
    pub start_platform_offset: f32,
    /// Platforms in the initial ladder, start platform included
    pub ladder_len: usize,
    /// Platforms added per spawn batch
    pub spawn_batch: usize,
    /// Keep platforms generated this far above the camera
    pub spawn_margin: f32,
    /// Drop platforms this far below the visible window
    pub prune_margin: f32,
    /// Below-window distance at which the player counts as fallen
    pub fall_margin: f32,
    /// Extra depth below a platform's top that still counts as a landing
    pub landing_slack: f32,

    // === Scoring ===
    pub landing_score: u32,
    pub target_score: u32,

    // === Difficulty ===
    pub base_speed: f32,
    pub speed_increment: f32,
    pub milestones_per_step: u32,

    /// Countdown length in seconds
    pub countdown_secs: u32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            width: CANVAS_WIDTH,
            height: CANVAS_HEIGHT,

            player_radius: 15.0,
            gravity: 0.85,
            bounce_impulse: -23.0,
            move_speed: 3.0,

            platform_width: 100.0,
            platform_height: 20.0,
            platform_spacing: 80.0,
            start_platform_offset: 100.0,
            ladder_len: 20,
            spawn_batch: 3,
            spawn_margin: 200.0,
            prune_margin: 100.0,
            fall_margin: 100.0,
            landing_slack: 10.0,

            landing_score: 30,
            target_score: 3000,

            base_speed: 0.25,
            speed_increment: 0.05,
            milestones_per_step: 12,

            countdown_secs: 3,
        }
    }
}

impl Tuning {
    /// Parse tuning from JSON, falling back to defaults on error
    pub fn from_json(json: &str) -> Self {
        match serde_json::from_str::<Tuning>(json) {
            Ok(tuning) => tuning.sanitized(),
            Err(e) => {
                log::warn!("Ignoring malformed tuning ({}), using defaults", e);
                Self::default()
            }
        }
    }

    /// Clamp values that would break the simulation
    fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        let positive = |v: f32| v.is_finite() && v > 0.0;

        if !positive(self.platform_width) || !positive(self.platform_height) {
            self.platform_width = defaults.platform_width;
            self.platform_height = defaults.platform_height;
        }
        if !positive(self.width) || !positive(self.height) || self.width <= self.platform_width {
            self.width = defaults.width;
            self.height = defaults.height;
        }

        // Rungs closer than a platform's thickness overlap
        let min_spacing = self.platform_height.max(1.0);
        self.platform_spacing = if self.platform_spacing.is_finite() {
            self.platform_spacing.max(min_spacing)
        } else {
            defaults.platform_spacing
        };

        self.spawn_margin = if self.spawn_margin.is_finite() {
            self.spawn_margin.clamp(0.0, self.height * 4.0)
        } else {
            defaults.spawn_margin
        };
        for (value, default) in [
            (&mut self.prune_margin, defaults.prune_margin),
            (&mut self.fall_margin, defaults.fall_margin),
            (&mut self.landing_slack, defaults.landing_slack),
        ] {
            if !value.is_finite() || *value < 0.0 {
                *value = default;
            }
        }

        self.ladder_len = self.ladder_len.max(1);
        self.spawn_batch = self.spawn_batch.max(1);
        self.milestones_per_step = self.milestones_per_step.max(1);
        self.countdown_secs = self.countdown_secs.max(1);
        self
    }

    /// Y coordinate of the start platform's top edge
    #[inline]
    pub fn start_platform_y(&self) -> f32 {
        self.height - self.start_platform_offset
    }

    /// Player spawn point, resting above the start platform
    #[inline]
    pub fn player_start(&self) -> (f32, f32) {
        (self.width / 2.0, self.height - 150.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{"gravity": 1.0, "target_score": 600}"#);
        assert_eq!(tuning.gravity, 1.0);
        assert_eq!(tuning.target_score, 600);
        assert_eq!(tuning.bounce_impulse, -23.0);
        assert_eq!(tuning.ladder_len, 20);
    }

    #[test]
    fn test_malformed_json_uses_defaults() {
        assert_eq!(Tuning::from_json("{not json"), Tuning::default());
    }

    #[test]
    fn test_degenerate_values_are_clamped() {
        let tuning = Tuning::from_json(r#"{"spawn_batch": 0, "platform_spacing": -5.0}"#);
        assert_eq!(tuning.spawn_batch, 1);
        assert_eq!(tuning.platform_spacing, 20.0);
    }

    #[test]
    fn test_tiny_spacing_and_margins_are_clamped() {
        let tuning = Tuning::from_json(
            r#"{"platform_spacing": 0.00001, "spawn_margin": 1e30, "height": -4.0, "prune_margin": -1.0}"#,
        );
        assert_eq!(tuning.platform_spacing, tuning.platform_height);
        assert_eq!(tuning.height, 800.0);
        assert_eq!(tuning.spawn_margin, 3200.0);
        assert_eq!(tuning.prune_margin, 100.0);
    }
}
