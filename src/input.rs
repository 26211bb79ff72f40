//! Input translation
//!
//! Normalizes keyboard, pointer and touch events into held left/right
//! intents or direct horizontal positioning of the player.

use crate::settings::InputSources;
use crate::sim::{Player, TickInput};
use crate::tuning::Tuning;

/// Keys the game reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Left,
    Right,
    Other,
}

impl Key {
    /// Map a DOM `KeyboardEvent.code`
    pub fn from_code(code: &str) -> Self {
        match code {
            "ArrowLeft" => Key::Left,
            "ArrowRight" => Key::Right,
            _ => Key::Other,
        }
    }
}

/// A raw input event (coordinates are relative to the displayed canvas)
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    KeyDown(Key),
    KeyUp(Key),
    /// Pointer moved to `x` on a canvas displayed `display_width` wide
    PointerMove { x: f32, display_width: f32 },
    TouchStart { x: f32, display_width: f32 },
    /// Touch end or cancel
    TouchEnd,
}

/// Accumulated intent state
#[derive(Debug, Clone, Default)]
pub struct InputTranslator {
    sources: InputSources,
    intent: TickInput,
}

impl InputTranslator {
    pub fn new(sources: InputSources) -> Self {
        Self {
            sources,
            intent: TickInput::default(),
        }
    }

    /// Current held directions
    pub fn intent(&self) -> TickInput {
        self.intent
    }

    /// Release everything (session boundaries)
    pub fn reset(&mut self) {
        self.intent = TickInput::default();
    }

    /// Apply one event. Pointer positioning needs a live player.
    pub fn apply(&mut self, event: InputEvent, player: Option<&mut Player>, tuning: &Tuning) {
        match event {
            InputEvent::KeyDown(key) if self.sources.keyboard => match key {
                Key::Left => self.intent.left = true,
                Key::Right => self.intent.right = true,
                Key::Other => {}
            },
            InputEvent::KeyUp(key) if self.sources.keyboard => match key {
                Key::Left => self.intent.left = false,
                Key::Right => self.intent.right = false,
                Key::Other => {}
            },
            InputEvent::PointerMove { x, display_width } if self.sources.pointer => {
                if let Some(player) = player {
                    player.pos.x = pointer_to_player_x(x, display_width, player.radius, tuning);
                }
            }
            InputEvent::TouchStart { x, display_width } if self.sources.touch => {
                // Halves of the screen are mutually exclusive
                let left = x < display_width / 2.0;
                self.intent.left = left;
                self.intent.right = !left;
            }
            InputEvent::TouchEnd if self.sources.touch => {
                self.intent.left = false;
                self.intent.right = false;
            }
            _ => {}
        }
    }
}

/// Map a pointer x on the displayed canvas to a clamped player x
pub fn pointer_to_player_x(x: f32, display_width: f32, radius: f32, tuning: &Tuning) -> f32 {
    let scale = if display_width > 0.0 {
        tuning.width / display_width
    } else {
        1.0
    };
    (x * scale).clamp(radius, tuning.width - radius)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player() -> Player {
        Player::new(&Tuning::default())
    }

    #[test]
    fn test_keyboard_holds() {
        let tuning = Tuning::default();
        let mut input = InputTranslator::default();
        input.apply(InputEvent::KeyDown(Key::from_code("ArrowLeft")), None, &tuning);
        input.apply(InputEvent::KeyDown(Key::from_code("ArrowRight")), None, &tuning);
        assert_eq!(input.intent(), TickInput { left: true, right: true });

        input.apply(InputEvent::KeyUp(Key::Left), None, &tuning);
        assert_eq!(input.intent(), TickInput { left: false, right: true });

        input.apply(InputEvent::KeyDown(Key::from_code("Space")), None, &tuning);
        assert_eq!(input.intent(), TickInput { left: false, right: true });
    }

    #[test]
    fn test_touch_halves_are_exclusive() {
        let tuning = Tuning::default();
        let mut input = InputTranslator::default();
        input.apply(InputEvent::KeyDown(Key::Right), None, &tuning);
        input.apply(
            InputEvent::TouchStart { x: 100.0, display_width: 480.0 },
            None,
            &tuning,
        );
        assert_eq!(input.intent(), TickInput { left: true, right: false });

        input.apply(
            InputEvent::TouchStart { x: 240.0, display_width: 480.0 },
            None,
            &tuning,
        );
        assert_eq!(input.intent(), TickInput { left: false, right: true });

        input.apply(InputEvent::TouchEnd, None, &tuning);
        assert_eq!(input.intent(), TickInput::default());
    }

    #[test]
    fn test_pointer_positions_and_clamps() {
        let tuning = Tuning::default();
        let mut input = InputTranslator::default();
        let mut p = player();

        input.apply(
            InputEvent::PointerMove { x: 100.0, display_width: 480.0 },
            Some(&mut p),
            &tuning,
        );
        assert_eq!(p.pos.x, 100.0);

        // Canvas shown at half size maps proportionally
        input.apply(
            InputEvent::PointerMove { x: 100.0, display_width: 240.0 },
            Some(&mut p),
            &tuning,
        );
        assert_eq!(p.pos.x, 200.0);

        input.apply(
            InputEvent::PointerMove { x: -50.0, display_width: 480.0 },
            Some(&mut p),
            &tuning,
        );
        assert_eq!(p.pos.x, 15.0);

        input.apply(
            InputEvent::PointerMove { x: 900.0, display_width: 480.0 },
            Some(&mut p),
            &tuning,
        );
        assert_eq!(p.pos.x, 465.0);
        assert_eq!(input.intent(), TickInput::default());
    }

    #[test]
    fn test_disabled_sources_are_ignored() {
        let tuning = Tuning::default();
        let mut input = InputTranslator::new(InputSources {
            keyboard: false,
            pointer: false,
            touch: true,
        });
        let mut p = player();
        input.apply(InputEvent::KeyDown(Key::Left), None, &tuning);
        input.apply(
            InputEvent::PointerMove { x: 10.0, display_width: 480.0 },
            Some(&mut p),
            &tuning,
        );
        assert_eq!(input.intent(), TickInput::default());
        assert_eq!(p.pos.x, 240.0);
    }
}
