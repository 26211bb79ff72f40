//! Scroll speed as a step function of milestones reached

use crate::tuning::Tuning;

/// Scroll speed for a milestone count
///
/// `base + floor(milestones / step) * increment`, so it never decreases as
/// milestones accumulate.
pub fn scroll_speed(milestones: u32, tuning: &Tuning) -> f32 {
    let steps = milestones / tuning.milestones_per_step.max(1);
    tuning.base_speed + steps as f32 * tuning.speed_increment
}
