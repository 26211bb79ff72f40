//! Procedural platform field
//!
//! Platforms are generated in a vertical ladder above the start platform,
//! topped up ahead of the camera as the player climbs, and pruned once they
//! scroll out below the visible window. Ids come from a monotonic counter so
//! a batch spawned within a single tick never collides.

use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::state::{Platform, PlatformId};
use crate::tuning::Tuning;

/// Upper bound on batches stacked by a single `spawn_ahead` call
const MAX_BATCHES_PER_CALL: usize = 1024;

/// Live platforms in insertion order (collision scans in this order)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlatformField {
    platforms: Vec<Platform>,
    next_id: u32,
}

impl PlatformField {
    /// Empty field (ids start after the reserved start id)
    pub fn empty() -> Self {
        Self {
            platforms: Vec::new(),
            next_id: PlatformId::START.0 + 1,
        }
    }

    /// Start platform centered under the player, then a ladder going up
    pub fn initialize(tuning: &Tuning, rng: &mut Pcg32) -> Self {
        let mut field = Self::empty();
        let start_y = tuning.start_platform_y();

        field.platforms.push(Platform {
            id: PlatformId::START,
            x: tuning.width / 2.0 - tuning.platform_width / 2.0,
            y: start_y,
            width: tuning.platform_width,
            height: tuning.platform_height,
        });

        for i in 1..tuning.ladder_len {
            let x = random_x(tuning, rng);
            field.spawn(x, start_y - i as f32 * tuning.platform_spacing, tuning);
        }

        log::debug!("Initialized ladder of {} platforms", field.len());
        field
    }

    /// Allocate the next platform id
    fn next_platform_id(&mut self) -> PlatformId {
        let id = PlatformId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Add a platform at the given position with a fresh id
    pub fn spawn(&mut self, x: f32, y: f32, tuning: &Tuning) -> PlatformId {
        let id = self.next_platform_id();
        self.platforms.push(Platform {
            id,
            x,
            y,
            width: tuning.platform_width,
            height: tuning.platform_height,
        });
        id
    }

    /// Highest platform (smallest y), if any
    pub fn top(&self) -> Option<f32> {
        self.platforms.iter().map(|p| p.y).reduce(f32::min)
    }

    /// Top up the field so no ungenerated gap opens above the camera
    ///
    /// Whenever the highest platform sits below `camera_y - spawn_margin`, a
    /// batch is stacked above it at the regular spacing. The number of
    /// batches is bounded by the distance to cover, so spacing too small to
    /// move the top in f32 cannot spin forever. Returns the number of
    /// platforms added.
    pub fn spawn_ahead(&mut self, camera_y: f32, tuning: &Tuning, rng: &mut Pcg32) -> usize {
        let limit = camera_y - tuning.spawn_margin;
        // An empty field restarts from the bottom of the view
        let anchor = camera_y + tuning.height;

        let step = tuning.platform_spacing * tuning.spawn_batch as f32;
        let needed = if step > 0.0 {
            ((self.top().unwrap_or(anchor) - limit) / step).ceil().max(0.0)
        } else {
            0.0
        };
        let max_batches = (needed as usize)
            .saturating_add(1)
            .min(MAX_BATCHES_PER_CALL);

        let mut spawned = 0;
        for _ in 0..max_batches {
            let top = self.top().unwrap_or(anchor);
            if top <= limit {
                break;
            }
            for i in 0..tuning.spawn_batch {
                let x = random_x(tuning, rng);
                let y = top - tuning.platform_spacing - i as f32 * tuning.platform_spacing;
                self.spawn(x, y, tuning);
                spawned += 1;
            }
        }

        if spawned > 0 {
            log::debug!("Spawned {} platforms above camera {:.1}", spawned, camera_y);
        }
        if self.top().is_some_and(|top| top > limit) {
            log::warn!(
                "Platform field still short of {:.1} after {} batches",
                limit,
                max_batches
            );
        }
        spawned
    }

    /// Remove platforms that scrolled below the visible window
    pub fn prune(&mut self, camera_y: f32, tuning: &Tuning) -> usize {
        let cutoff = camera_y + tuning.height + tuning.prune_margin;
        let before = self.platforms.len();
        self.platforms.retain(|p| p.y < cutoff);
        before - self.platforms.len()
    }

    /// Translate every platform downward
    pub fn scroll(&mut self, dy: f32) {
        for platform in &mut self.platforms {
            platform.y += dy;
        }
    }

    pub fn platforms(&self) -> &[Platform] {
        &self.platforms
    }

    pub fn get(&self, id: PlatformId) -> Option<&Platform> {
        self.platforms.iter().find(|p| p.id == id)
    }

    pub fn len(&self) -> usize {
        self.platforms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.platforms.is_empty()
    }

    pub fn clear(&mut self) {
        self.platforms.clear();
    }
}

/// Uniform x inside the playable width
fn random_x(tuning: &Tuning, rng: &mut Pcg32) -> f32 {
    rng.random_range(0.0..tuning.width - tuning.platform_width)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use std::collections::HashSet;

    fn rng() -> Pcg32 {
        Pcg32::seed_from_u64(42)
    }

    #[test]
    fn test_initial_ladder_shape() {
        let tuning = Tuning::default();
        let field = PlatformField::initialize(&tuning, &mut rng());

        assert_eq!(field.len(), 20);
        let start = field.platforms()[0];
        assert_eq!(start.id, PlatformId::START);
        assert_eq!(start.x, 190.0);
        assert_eq!(start.y, 700.0);

        for (i, p) in field.platforms().iter().enumerate().skip(1) {
            assert_eq!(p.y, 700.0 - i as f32 * 80.0);
            assert!(p.x >= 0.0 && p.x < 380.0);
            assert_eq!(p.width, 100.0);
            assert_eq!(p.height, 20.0);
        }
        assert_eq!(field.top(), Some(700.0 - 19.0 * 80.0));
    }

    #[test]
    fn test_same_seed_same_layout() {
        let tuning = Tuning::default();
        let a = PlatformField::initialize(&tuning, &mut rng());
        let b = PlatformField::initialize(&tuning, &mut rng());
        assert_eq!(a.platforms(), b.platforms());
    }

    #[test]
    fn test_spawn_ahead_adds_batch_with_distinct_ids() {
        let tuning = Tuning::default();
        let mut rng = rng();
        let mut field = PlatformField::empty();
        field.spawn(0.0, 100.0, &tuning);

        // Top at 100, camera at 0: limit is -200, so one batch reaches -140
        // and a second one is needed to pass the limit.
        let spawned = field.spawn_ahead(0.0, &tuning, &mut rng);
        assert_eq!(spawned, 6);
        assert!(field.top().unwrap() <= -200.0);

        let ids: HashSet<_> = field.platforms().iter().map(|p| p.id).collect();
        assert_eq!(ids.len(), field.len());
    }

    #[test]
    fn test_spawn_ahead_noop_when_far_enough() {
        let tuning = Tuning::default();
        let mut field = PlatformField::initialize(&tuning, &mut rng());
        assert_eq!(field.spawn_ahead(0.0, &tuning, &mut rng()), 0);
        assert_eq!(field.len(), 20);
    }

    #[test]
    fn test_spawn_ahead_from_empty_field() {
        let tuning = Tuning::default();
        let mut field = PlatformField::empty();
        let spawned = field.spawn_ahead(-500.0, &tuning, &mut rng());
        assert!(spawned > 0);
        assert!(field.top().unwrap() <= -700.0);
    }

    #[test]
    fn test_spawn_ahead_terminates_with_vanishing_spacing() {
        // Spacing below f32 resolution at y=700 never moves the top
        let tuning = Tuning {
            platform_spacing: 0.00001,
            ..Tuning::default()
        };
        let mut rng = rng();
        let mut field = PlatformField::initialize(&tuning, &mut rng);
        let spawned = field.spawn_ahead(0.0, &tuning, &mut rng);
        assert!(spawned <= MAX_BATCHES_PER_CALL * tuning.spawn_batch);
        assert_eq!(field.len(), tuning.ladder_len + spawned);
    }

    #[test]
    fn test_prune_removes_below_window() {
        let tuning = Tuning::default();
        let mut field = PlatformField::empty();
        let keep = field.spawn(0.0, 899.0, &tuning);
        field.spawn(0.0, 900.0, &tuning);
        field.spawn(0.0, 1500.0, &tuning);

        assert_eq!(field.prune(0.0, &tuning), 2);
        assert_eq!(field.len(), 1);
        assert!(field.get(keep).is_some());
    }

    #[test]
    fn test_scroll_moves_everything_down() {
        let tuning = Tuning::default();
        let mut field = PlatformField::initialize(&tuning, &mut rng());
        let before: Vec<f32> = field.platforms().iter().map(|p| p.y).collect();
        field.scroll(0.5);
        for (p, y) in field.platforms().iter().zip(before) {
            assert_eq!(p.y, y + 0.5);
        }
    }
}
