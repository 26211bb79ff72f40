//! Session state and core simulation types
//!
//! Everything a single play session mutates lives in [`GameState`]. The
//! orchestrator builds a fresh one for every session, so a restart can never
//! leak score, speed or platforms from the previous run.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::generator::PlatformField;
use crate::tuning::Tuning;

/// Stable platform identifier (unique within a session)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlatformId(pub u32);

impl PlatformId {
    /// The platform the player starts on (never scores)
    pub const START: PlatformId = PlatformId(0);

    #[inline]
    pub fn is_start(self) -> bool {
        self == Self::START
    }
}

/// An axis-aligned platform rectangle (y is the top edge, growing downward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Platform {
    pub id: PlatformId,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Platform {
    #[inline]
    pub fn left(&self) -> f32 {
        self.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.y
    }
}

/// The bouncing player ball
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    pub radius: f32,
    /// Vertical velocity (positive = falling)
    pub vel_y: f32,
    /// Landed this tick
    pub on_ground: bool,
}

impl Player {
    pub fn new(tuning: &Tuning) -> Self {
        let (x, y) = tuning.player_start();
        Self {
            pos: Vec2::new(x, y),
            radius: tuning.player_radius,
            vel_y: 0.0,
            on_ground: false,
        }
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.radius
    }

    #[inline]
    pub fn is_falling(&self) -> bool {
        self.vel_y > 0.0
    }
}

/// Per-session game state (owned by the orchestrator)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Session seed for reproducible platform layouts
    pub seed: u64,
    pub player: Player,
    pub field: PlatformField,
    /// Camera top edge in world space (only ever decreases)
    pub camera_y: f32,
    pub score: u32,
    /// Distinct platforms landed on (start platform excluded)
    pub milestones: u32,
    /// Current downward scroll of the platform field per tick
    pub speed: f32,
    /// Last platform that awarded points
    pub last_scored: Option<PlatformId>,
    /// Ticks simulated this session
    pub time_ticks: u64,
    #[serde(skip, default = "default_rng")]
    pub(crate) rng: Pcg32,
}

fn default_rng() -> Pcg32 {
    Pcg32::seed_from_u64(0)
}

impl GameState {
    /// Create a fresh session: player on the start platform, initial ladder
    pub fn new(seed: u64, tuning: &Tuning) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let field = PlatformField::initialize(tuning, &mut rng);
        Self {
            seed,
            player: Player::new(tuning),
            field,
            camera_y: 0.0,
            score: 0,
            milestones: 0,
            speed: tuning.base_speed,
            last_scored: None,
            time_ticks: 0,
            rng,
        }
    }

    /// Bottom edge of the visible window in world space
    #[inline]
    pub fn camera_bottom(&self, tuning: &Tuning) -> f32 {
        self.camera_y + tuning.height
    }
}
