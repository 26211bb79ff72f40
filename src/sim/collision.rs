//! Landing detection between the player and platforms
//!
//! The player circle is approximated by its bounding square. A landing only
//! counts while the player is falling and its bottom edge sits inside a
//! tolerance band just below the platform's top edge (platform height plus
//! a configurable slack). At high scroll speeds this lets the player land
//! while already partly sunk into a platform, which is kept as-is.

use super::state::{Platform, Player};

/// Whether the falling player is landing on this platform
pub fn landing_on(player: &Player, platform: &Platform, slack: f32) -> bool {
    let overlaps_x = player.pos.x + player.radius > platform.left()
        && player.pos.x - player.radius < platform.right();
    let bottom = player.bottom();
    let in_band = bottom > platform.top() && bottom < platform.top() + platform.height + slack;

    player.is_falling() && overlaps_x && in_band
}

/// Index of the first platform (in scan order) the player lands on
///
/// No closest-platform resolution: the first match wins.
pub fn find_landing(player: &Player, platforms: &[Platform], slack: f32) -> Option<usize> {
    platforms.iter().position(|p| landing_on(player, p, slack))
}

/// Rest the player on a platform and apply the auto-bounce impulse
pub fn land(player: &mut Player, platform: &Platform, bounce_impulse: f32) {
    player.pos.y = platform.top() - player.radius;
    player.vel_y = bounce_impulse;
    player.on_ground = true;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::PlatformId;
    use glam::Vec2;

    fn platform(id: u32, x: f32, y: f32) -> Platform {
        Platform {
            id: PlatformId(id),
            x,
            y,
            width: 100.0,
            height: 20.0,
        }
    }

    fn falling_at(x: f32, y: f32) -> Player {
        Player {
            pos: Vec2::new(x, y),
            radius: 15.0,
            vel_y: 5.0,
            on_ground: false,
        }
    }

    #[test]
    fn test_landing_inside_band() {
        let p = platform(1, 100.0, 500.0);
        // Bottom edge at 505: just below the top
        assert!(landing_on(&falling_at(150.0, 490.0), &p, 10.0));
        // Bottom edge at 529: still inside height + slack
        assert!(landing_on(&falling_at(150.0, 514.0), &p, 10.0));
    }

    #[test]
    fn test_no_landing_outside_band() {
        let p = platform(1, 100.0, 500.0);
        // Bottom exactly on the top edge is not yet a landing
        assert!(!landing_on(&falling_at(150.0, 485.0), &p, 10.0));
        // Bottom at 530 is past the band
        assert!(!landing_on(&falling_at(150.0, 515.0), &p, 10.0));
        // Wider slack accepts it
        assert!(landing_on(&falling_at(150.0, 515.0), &p, 20.0));
    }

    #[test]
    fn test_no_landing_while_rising() {
        let p = platform(1, 100.0, 500.0);
        let mut player = falling_at(150.0, 490.0);
        player.vel_y = -3.0;
        assert!(!landing_on(&player, &p, 10.0));
        player.vel_y = 0.0;
        assert!(!landing_on(&player, &p, 10.0));
    }

    #[test]
    fn test_horizontal_overlap_uses_bounding_square() {
        let p = platform(1, 100.0, 500.0);
        // Right edge of the square at 100.5 grazes the platform's left edge
        assert!(landing_on(&falling_at(85.5, 490.0), &p, 10.0));
        assert!(!landing_on(&falling_at(85.0, 490.0), &p, 10.0));
        assert!(!landing_on(&falling_at(215.0, 490.0), &p, 10.0));
    }

    #[test]
    fn test_first_match_wins() {
        let platforms = [
            platform(1, 0.0, 100.0),
            platform(2, 100.0, 505.0),
            platform(3, 100.0, 500.0),
        ];
        let player = falling_at(150.0, 496.0);
        assert_eq!(find_landing(&player, &platforms, 10.0), Some(1));
    }

    #[test]
    fn test_land_snaps_and_bounces() {
        let p = platform(1, 100.0, 500.0);
        let mut player = falling_at(150.0, 495.0);
        land(&mut player, &p, -23.0);
        assert_eq!(player.pos.y, 485.0);
        assert_eq!(player.vel_y, -23.0);
        assert!(player.on_ground);
    }
}
