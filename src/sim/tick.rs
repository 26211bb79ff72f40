//! Fixed-order simulation tick
//!
//! Core game loop step: move, fall, land, scroll, generate, then report
//! whether the session hit a terminal condition.

use super::camera;
use super::collision::{find_landing, land};
use super::difficulty::scroll_speed;
use super::state::GameState;
use crate::tuning::Tuning;

/// Held movement intents for a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    pub left: bool,
    pub right: bool,
}

/// What the orchestrator should do after a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Keep playing
    Continue,
    /// Player dropped below the view (session lost)
    FellOff,
    /// Score reached the target (session won)
    ReachedTarget,
}

/// Advance the session by one frame
pub fn tick(state: &mut GameState, input: &TickInput, tuning: &Tuning) -> TickOutcome {
    state.time_ticks += 1;

    // Horizontal movement from held directions
    let player = &mut state.player;
    if input.left && player.pos.x > player.radius {
        player.pos.x -= tuning.move_speed;
    }
    if input.right && player.pos.x < tuning.width - player.radius {
        player.pos.x += tuning.move_speed;
    }

    // Gravity and integration
    player.vel_y += tuning.gravity;
    player.pos.y += player.vel_y;

    // Landing (auto-bounce, no jump input)
    player.on_ground = false;
    if let Some(index) = find_landing(player, state.field.platforms(), tuning.landing_slack) {
        let platform = state.field.platforms()[index];
        land(player, &platform, tuning.bounce_impulse);

        if !platform.id.is_start() && state.last_scored != Some(platform.id) {
            state.score += tuning.landing_score;
            state.milestones += 1;
            state.last_scored = Some(platform.id);
            log::debug!(
                "Landed on platform {} (score {}, milestones {})",
                platform.id.0,
                state.score,
                state.milestones
            );
        }
    }

    // Camera and difficulty
    state.camera_y = camera::follow(state.camera_y, state.player.pos.y, tuning.height);
    state.speed = scroll_speed(state.milestones, tuning);

    // Field scroll, generation and recycling
    state.field.scroll(state.speed);
    state.field.spawn_ahead(state.camera_y, tuning, &mut state.rng);
    state.field.prune(state.camera_y, tuning);

    // Terminal checks (falling off wins ties)
    if camera::fell_below(
        state.camera_y,
        state.player.pos.y,
        tuning.height,
        tuning.fall_margin,
    ) {
        return TickOutcome::FellOff;
    }
    if state.score >= tuning.target_score {
        return TickOutcome::ReachedTarget;
    }

    TickOutcome::Continue
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::PlatformId;
    use glam::Vec2;

    fn state() -> GameState {
        GameState::new(12345, &Tuning::default())
    }

    #[test]
    fn test_first_tick_lands_on_start_without_scoring() {
        let tuning = Tuning::default();
        let mut state = state();

        // Player starts 35px above the start platform's top: falls until landing
        let mut landed = false;
        for _ in 0..20 {
            assert_eq!(tick(&mut state, &TickInput::default(), &tuning), TickOutcome::Continue);
            if state.player.on_ground {
                landed = true;
                break;
            }
        }
        assert!(landed);
        assert_eq!(state.player.vel_y, -23.0);
        assert_eq!(state.score, 0);
        assert_eq!(state.milestones, 0);
        assert_eq!(state.last_scored, None);
    }

    #[test]
    fn test_horizontal_movement_respects_walls() {
        let tuning = Tuning::default();
        let mut state = state();
        state.player.pos.x = 16.0;
        tick(&mut state, &TickInput { left: true, right: false }, &tuning);
        assert_eq!(state.player.pos.x, 13.0);
        // Already past the wall: no further movement
        tick(&mut state, &TickInput { left: true, right: false }, &tuning);
        assert_eq!(state.player.pos.x, 13.0);

        state.player.pos.x = 466.0;
        tick(&mut state, &TickInput { left: false, right: true }, &tuning);
        assert_eq!(state.player.pos.x, 466.0);
    }

    #[test]
    fn test_same_platform_never_double_scores() {
        let tuning = Tuning::default();
        let mut state = state();
        state.field.clear();
        let id = state.field.spawn(190.0, 700.0, &tuning);
        // Freeze the field (no scroll, no new platforms) so the player keeps
        // bouncing on the same one
        let tuning = Tuning {
            base_speed: 0.0,
            spawn_margin: -10_000.0,
            ..tuning
        };

        let mut landings = 0;
        for _ in 0..400 {
            tick(&mut state, &TickInput::default(), &tuning);
            if state.player.on_ground {
                landings += 1;
            }
        }
        assert!(landings >= 2, "expected repeated landings, got {landings}");
        assert_eq!(state.score, 30);
        assert_eq!(state.milestones, 1);
        assert_eq!(state.last_scored, Some(id));
    }

    #[test]
    fn test_alternating_platforms_score_each_time() {
        let tuning = Tuning {
            base_speed: 0.0,
            ..Tuning::default()
        };
        let mut state = state();
        state.field.clear();
        let a = state.field.spawn(190.0, 700.0, &tuning);
        let b = state.field.spawn(190.0, 690.0, &tuning);

        // First landing scans `a` first
        state.player.pos = Vec2::new(240.0, 680.0);
        state.player.vel_y = 5.0;
        tick(&mut state, &TickInput::default(), &tuning);
        assert_eq!(state.last_scored, Some(a));
        assert_eq!(state.score, 30);

        // Landing on `b` next scores again
        state.field.clear();
        let b_again = state.field.spawn(190.0, 690.0, &tuning);
        assert_ne!(b_again, b);
        state.player.pos = Vec2::new(240.0, 670.0);
        state.player.vel_y = 5.0;
        tick(&mut state, &TickInput::default(), &tuning);
        assert_eq!(state.last_scored, Some(b_again));
        assert_eq!(state.score, 60);
        assert_eq!(state.milestones, 2);
    }

    #[test]
    fn test_falling_off_ends() {
        let tuning = Tuning::default();
        let mut state = state();
        state.field.clear();
        state.player.pos.y = 899.0;
        state.player.vel_y = 2.0;
        assert_eq!(tick(&mut state, &TickInput::default(), &tuning), TickOutcome::FellOff);
    }

    #[test]
    fn test_reaching_target_wins() {
        let tuning = Tuning::default();
        let mut state = state();
        state.score = 2970;
        state.field.clear();
        state.field.spawn(190.0, 700.0, &tuning);
        state.player.pos = Vec2::new(240.0, 680.0);
        state.player.vel_y = 5.0;
        assert_eq!(
            tick(&mut state, &TickInput::default(), &tuning),
            TickOutcome::ReachedTarget
        );
        assert_eq!(state.score, 3000);
    }

    #[test]
    fn test_twelfth_milestone_bumps_speed() {
        let tuning = Tuning::default();
        let mut state = state();
        state.milestones = 10;
        state.field.clear();
        state.field.spawn(190.0, 700.0, &tuning);
        state.player.pos = Vec2::new(240.0, 680.0);
        state.player.vel_y = 5.0;
        tick(&mut state, &TickInput::default(), &tuning);
        assert_eq!(state.milestones, 11);
        assert_eq!(state.speed, 0.25);

        state.field.clear();
        state.field.spawn(190.0, 700.0, &tuning);
        state.player.pos = Vec2::new(240.0, 680.0);
        state.player.vel_y = 5.0;
        tick(&mut state, &TickInput::default(), &tuning);
        assert_eq!(state.milestones, 12);
        assert_eq!(state.speed, scroll_speed(12, &tuning));
        assert!((state.speed - 0.30).abs() < 1e-6);
    }

    #[test]
    fn test_start_platform_id_reserved() {
        let state = state();
        assert_eq!(state.field.platforms()[0].id, PlatformId::START);
        assert!(state.field.platforms()[1..].iter().all(|p| !p.id.is_start()));
    }

    #[test]
    fn test_determinism() {
        let tuning = Tuning::default();
        let mut a = GameState::new(99999, &tuning);
        let mut b = GameState::new(99999, &tuning);
        let inputs = [
            TickInput { left: true, right: false },
            TickInput::default(),
            TickInput { left: false, right: true },
        ];

        for i in 0..600 {
            let input = inputs[i % inputs.len()];
            let oa = tick(&mut a, &input, &tuning);
            let ob = tick(&mut b, &input, &tuning);
            assert_eq!(oa, ob);
            if oa != TickOutcome::Continue {
                break;
            }
        }
        assert_eq!(a.player, b.player);
        assert_eq!(a.field.platforms(), b.field.platforms());
        assert_eq!(a.score, b.score);
    }
}
