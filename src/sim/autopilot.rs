//! Demo/attract-mode autopilot
//!
//! Picks a platform to aim for and holds left/right toward it. Rising, it
//! aims for the lowest platform above the player that the bounce can still
//! reach; falling, it aims for the nearest platform below.

use super::state::{GameState, Platform};
use super::tick::TickInput;
use crate::tuning::Tuning;

/// Choose held directions for the next tick
pub fn steer(state: &GameState, tuning: &Tuning) -> TickInput {
    let Some(target) = pick_target(state, tuning) else {
        return TickInput::default();
    };

    let center = target.x + target.width / 2.0;
    let dx = center - state.player.pos.x;
    // Deadband so the player doesn't jitter around the target
    let deadband = tuning.move_speed;
    TickInput {
        left: dx < -deadband,
        right: dx > deadband,
    }
}

fn pick_target<'a>(state: &'a GameState, tuning: &Tuning) -> Option<&'a Platform> {
    let player = &state.player;
    let bottom = player.bottom();
    let platforms = state.field.platforms();

    if player.is_falling() {
        return platforms
            .iter()
            .filter(|p| p.top() >= bottom)
            .min_by(|a, b| a.top().total_cmp(&b.top()));
    }

    // Apex height still available from the current upward velocity
    let rise = if tuning.gravity > 0.0 {
        player.vel_y * player.vel_y / (2.0 * tuning.gravity)
    } else {
        f32::INFINITY
    };
    let apex_bottom = bottom - rise;

    platforms
        .iter()
        .filter(|p| p.top() < bottom && p.top() > apex_bottom)
        .max_by(|a, b| a.top().total_cmp(&b.top()))
        .or_else(|| {
            platforms
                .iter()
                .filter(|p| p.top() >= bottom)
                .min_by(|a, b| a.top().total_cmp(&b.top()))
        })
}
