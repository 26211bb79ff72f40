//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One fixed step per display frame
//! - Seeded RNG only
//! - Stable iteration order (platform insertion order)
//! - No rendering, storage or platform dependencies

pub mod autopilot;
pub mod camera;
pub mod collision;
pub mod difficulty;
pub mod generator;
pub mod state;
pub mod tick;

pub use collision::{find_landing, land, landing_on};
pub use difficulty::scroll_speed;
pub use generator::PlatformField;
pub use state::{GameState, Platform, PlatformId, Player};
pub use tick::{TickInput, TickOutcome, tick};
