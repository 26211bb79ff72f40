//! 2D scene rendering
//!
//! Presentation only: draws the camera-translated platform field and player
//! plus fixed-position HUD text and phase overlays onto any
//! [`RenderSurface`]. Backends are the software [`PixelSurface`] and the
//! browser canvas in `platform::web`.

pub mod pixels;

use glam::Vec2;

pub use pixels::{PixelSurface, Rgba8};

use crate::sim::GameState;

/// Linear RGBA color
pub type Color = [f32; 4];

/// Colors for game elements
pub mod colors {
    use super::Color;

    pub const SKY: Color = [0.75, 0.89, 0.98, 1.0];
    pub const PLATFORM: Color = [0.29, 0.33, 0.41, 1.0];
    pub const PLAYER: Color = [0.96, 0.40, 0.40, 1.0];
    pub const HUD_TEXT: Color = [0.18, 0.22, 0.28, 1.0];
    pub const OVERLAY_TEXT: Color = [1.0, 1.0, 1.0, 1.0];
    pub const DIM: Color = [0.0, 0.0, 0.0, 0.5];
    pub const WIN: Color = [0.13, 0.77, 0.37, 0.9];
}

/// A drawable 2D raster target in logical pixels
pub trait RenderSurface {
    /// Logical size (width, height)
    fn size(&self) -> (f32, f32);
    fn clear(&mut self, color: Color);
    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32, color: Color);
    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color);
    /// Left-aligned text with its baseline at `y`
    fn fill_text(&mut self, text: &str, x: f32, y: f32, color: Color);
}

/// Full-screen message drawn over the scene
#[derive(Debug, Clone, PartialEq)]
pub enum Overlay {
    None,
    /// Waiting for a start command
    Title { high_score: u32, target: u32 },
    Countdown(u32),
    Paused,
    Won { score: u32 },
    Ended { score: u32 },
}

/// Draw one frame
pub fn render_frame(
    surface: &mut dyn RenderSurface,
    state: Option<&GameState>,
    overlay: &Overlay,
    show_hud: bool,
) {
    surface.clear(colors::SKY);

    if let Some(state) = state {
        draw_scene(surface, state);
        if show_hud {
            draw_hud(surface, state);
        }
    }

    draw_overlay(surface, overlay);
}

/// Platforms and player, translated by the camera
fn draw_scene(surface: &mut dyn RenderSurface, state: &GameState) {
    let offset = -state.camera_y;
    let (_, height) = surface.size();

    for platform in state.field.platforms() {
        let y = platform.y + offset;
        if y > height || y + platform.height < 0.0 {
            continue;
        }
        surface.fill_rect(platform.x, y, platform.width, platform.height, colors::PLATFORM);
    }

    let player = &state.player;
    surface.fill_circle(
        Vec2::new(player.pos.x, player.pos.y + offset),
        player.radius,
        colors::PLAYER,
    );
}

/// HUD text formatting for score and speed
pub fn hud_lines(state: &GameState) -> [String; 2] {
    [
        format!("Score: {}", state.score),
        format!("Speed: {:.2}x", state.speed),
    ]
}

fn draw_hud(surface: &mut dyn RenderSurface, state: &GameState) {
    let [score, speed] = hud_lines(state);
    surface.fill_text(&score, 10.0, 30.0, colors::HUD_TEXT);
    surface.fill_text(&speed, 10.0, 50.0, colors::HUD_TEXT);
}

fn draw_overlay(surface: &mut dyn RenderSurface, overlay: &Overlay) {
    let (width, height) = surface.size();
    let cx = width / 2.0 - 80.0;
    let cy = height / 2.0;

    match overlay {
        Overlay::None => {}
        Overlay::Title { high_score, target } => {
            surface.fill_rect(0.0, 0.0, width, height, colors::DIM);
            surface.fill_text("Sky Hopper", cx, cy - 40.0, colors::OVERLAY_TEXT);
            surface.fill_text(
                &format!("Reach {} points!", target),
                cx,
                cy,
                colors::OVERLAY_TEXT,
            );
            surface.fill_text(
                &format!("Record: {}", high_score),
                cx,
                cy + 30.0,
                colors::OVERLAY_TEXT,
            );
        }
        Overlay::Countdown(n) => {
            surface.fill_rect(0.0, 0.0, width, height, colors::DIM);
            surface.fill_text(&n.to_string(), width / 2.0 - 10.0, cy, colors::OVERLAY_TEXT);
            surface.fill_text("Get ready...", cx, cy + 40.0, colors::OVERLAY_TEXT);
        }
        Overlay::Paused => {
            surface.fill_rect(0.0, 0.0, width, height, colors::DIM);
            surface.fill_text("Paused", cx, cy, colors::OVERLAY_TEXT);
        }
        Overlay::Won { score } => {
            surface.fill_rect(0.0, 0.0, width, height, colors::WIN);
            surface.fill_text("You reached the goal!", cx, cy, colors::OVERLAY_TEXT);
            surface.fill_text(
                &format!("Final score: {}", score),
                cx,
                cy + 30.0,
                colors::OVERLAY_TEXT,
            );
        }
        Overlay::Ended { score } => {
            surface.fill_rect(0.0, 0.0, width, height, colors::DIM);
            surface.fill_text("Game over", cx, cy, colors::OVERLAY_TEXT);
            surface.fill_text(
                &format!("Final score: {}", score),
                cx,
                cy + 30.0,
                colors::OVERLAY_TEXT,
            );
        }
    }
}

/// CSS color string for canvas fill styles
pub fn css_color(color: Color) -> String {
    let [r, g, b, a] = color;
    format!(
        "rgba({}, {}, {}, {})",
        (r.clamp(0.0, 1.0) * 255.0).round() as u8,
        (g.clamp(0.0, 1.0) * 255.0).round() as u8,
        (b.clamp(0.0, 1.0) * 255.0).round() as u8,
        a.clamp(0.0, 1.0)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::Tuning;

    #[test]
    fn test_scene_is_camera_translated() {
        let tuning = Tuning::default();
        let mut state = GameState::new(3, &tuning);
        state.camera_y = -100.0;
        let mut surface = PixelSurface::new(480, 800);

        render_frame(&mut surface, Some(&state), &Overlay::None, true);

        // Start platform top at world y=700 shows at screen y=800 (off the bottom)
        assert_eq!(surface.pixel(240, 795), Some(Rgba8::from_color(colors::SKY)));
        // Player at world y=650 shows at screen y=750
        assert_eq!(surface.pixel(240, 750), Some(Rgba8::from_color(colors::PLAYER)));
        assert_eq!(surface.texts(), ["Score: 0", "Speed: 0.25x"]);
    }

    #[test]
    fn test_hud_hidden() {
        let state = GameState::new(3, &Tuning::default());
        let mut surface = PixelSurface::new(480, 800);
        render_frame(&mut surface, Some(&state), &Overlay::None, false);
        assert!(surface.texts().is_empty());
    }

    #[test]
    fn test_overlay_without_session() {
        let mut surface = PixelSurface::new(480, 800);
        render_frame(&mut surface, None, &Overlay::Countdown(2), true);
        assert_eq!(surface.texts()[0], "2");
    }

    #[test]
    fn test_css_color() {
        assert_eq!(css_color([1.0, 0.0, 0.5, 1.0]), "rgba(255, 0, 128, 1)");
    }
}
