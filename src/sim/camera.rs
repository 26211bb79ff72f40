//! Upward-only scrolling camera

/// Follow the player upward, never scrolling back down
///
/// The camera's top edge tracks the player's height minus half a screen and
/// only ever decreases, with no easing.
#[inline]
pub fn follow(camera_y: f32, player_y: f32, view_height: f32) -> f32 {
    camera_y.min(player_y - view_height / 2.0)
}

/// Whether the player dropped past the bottom of the view plus a margin
#[inline]
pub fn fell_below(camera_y: f32, player_y: f32, view_height: f32, margin: f32) -> bool {
    player_y > camera_y + view_height + margin
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_follow_only_moves_up() {
        assert_eq!(follow(0.0, 650.0, 800.0), 0.0);
        assert_eq!(follow(0.0, 300.0, 800.0), -100.0);
        // Player falls back down: camera stays put
        assert_eq!(follow(-100.0, 600.0, 800.0), -100.0);
    }

    #[test]
    fn test_fell_below() {
        assert!(!fell_below(0.0, 900.0, 800.0, 100.0));
        assert!(fell_below(0.0, 900.5, 800.0, 100.0));
        assert!(fell_below(-1000.0, 0.0, 800.0, 100.0));
    }
}
