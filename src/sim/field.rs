//! The moving obstacle field
//!
//! Spawn, advance, cull, score-on-pass, and collision testing. All pure
//! queries and in-place mutations over well-formed state - no failure cases.
//!
//! Invariant: the deque is ordered by x ascending (spawn order equals
//! position order), so the oldest obstacle is always at the front and can be
//! culled in O(1).

use std::collections::VecDeque;

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::state::{Avatar, Obstacle};
use crate::consts::*;
use crate::tuning::Tuning;

/// Ordered set of gap obstacles plus the per-run geometry they share
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObstacleField {
    /// Front = leftmost = oldest
    pub obstacles: VecDeque<Obstacle>,
    /// Tick at which the most recent spawn happened
    pub last_spawn_tick: u64,
    /// Gap height, fixed for the run
    pub gap_height: f32,
    /// Obstacle width, fixed for the run
    pub width: f32,
    /// Ticks between spawns, fixed for the run
    pub spawn_interval_ticks: u64,
}

impl ObstacleField {
    /// Empty field with geometry frozen from the tuning. The gap height is
    /// clamped so a gap always fits between the margins and always admits
    /// the avatar, whatever the tuning says.
    pub fn new(tuning: &Tuning) -> Self {
        let max_gap = GROUND_Y - BOTTOM_MARGIN - TOP_MARGIN - GAP_TOP_SLACK;
        Self {
            obstacles: VecDeque::new(),
            last_spawn_tick: 0,
            gap_height: tuning.gap_height.clamp(AVATAR_RADIUS * 2.0, max_gap),
            width: tuning.obstacle_width,
            spawn_interval_ticks: tuning.spawn_interval_ticks,
        }
    }

    /// Reset for a new run: drop everything and seed the initial obstacles
    /// marching in from the right edge
    pub fn reseed<R: Rng>(&mut self, rng: &mut R) {
        self.obstacles.clear();
        self.last_spawn_tick = 0;
        for i in 0..INITIAL_OBSTACLES {
            self.spawn(FIELD_WIDTH + i as f32 * INITIAL_OBSTACLE_SPACING, rng);
        }
    }

    /// Append an obstacle at `x` with a uniformly random gap offset. The
    /// bounds guarantee the gap sits fully inside the playable band: below
    /// the top margin, above the ground margin.
    pub fn spawn<R: Rng>(&mut self, x: f32, rng: &mut R) {
        let min_top = TOP_MARGIN + GAP_TOP_SLACK;
        let max_top = GROUND_Y - BOTTOM_MARGIN - self.gap_height;
        let gap_top = rng.random_range(min_top..=max_top);
        self.obstacles.push_back(Obstacle {
            x,
            gap_top,
            passed: false,
        });
    }

    /// Move every obstacle left by `speed`, cull obstacles fully off-field,
    /// and spawn a new one once the spawn interval has elapsed.
    pub fn advance<R: Rng>(&mut self, speed: f32, now_tick: u64, rng: &mut R) {
        for obstacle in &mut self.obstacles {
            obstacle.x -= speed;
        }
        while self
            .obstacles
            .front()
            .is_some_and(|o| o.x < -self.width - CULL_SLACK)
        {
            self.obstacles.pop_front();
        }
        if now_tick - self.last_spawn_tick > self.spawn_interval_ticks {
            self.last_spawn_tick = now_tick;
            // Seeded obstacles start beyond the spawn point; never spawn
            // behind them or the deque's x ordering breaks
            let mut x = FIELD_WIDTH + SPAWN_LEAD;
            if let Some(back) = self.obstacles.back() {
                x = x.max(back.x + INITIAL_OBSTACLE_SPACING);
            }
            self.spawn(x, rng);
        }
    }

    /// Mark every unpassed obstacle whose trailing edge has crossed the
    /// avatar and return how many were newly passed. This is the sole
    /// scoring mechanism; each obstacle contributes at most once.
    pub fn score_passes(&mut self, avatar_x: f32) -> u32 {
        let mut passes = 0;
        for obstacle in &mut self.obstacles {
            if !obstacle.passed && obstacle.x + self.width < avatar_x {
                obstacle.passed = true;
                passes += 1;
            }
        }
        passes
    }

    /// True if the avatar is outside the vertical field bounds or overlaps
    /// an obstacle without fitting inside its gap. Boundary checks come
    /// first; the first hit short-circuits.
    pub fn collides_with(&self, avatar: &Avatar) -> bool {
        if avatar.top() < 0.0 {
            return true;
        }
        if avatar.bottom() > GROUND_Y {
            return true;
        }
        for obstacle in &self.obstacles {
            let overlaps_x =
                AVATAR_X + avatar.radius > obstacle.x && AVATAR_X - avatar.radius < obstacle.x + self.width;
            if overlaps_x
                && (avatar.top() < obstacle.gap_top
                    || avatar.bottom() > obstacle.gap_top + self.gap_height)
            {
                return true;
            }
        }
        false
    }

    /// Nearest obstacle whose trailing edge is still ahead of `x`
    /// (front of the deque is leftmost, so the first match is the nearest)
    pub fn next_ahead(&self, x: f32) -> Option<&Obstacle> {
        self.obstacles.iter().find(|o| o.x + self.width >= x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn field() -> ObstacleField {
        ObstacleField::new(&Tuning::default())
    }

    fn avatar_at(y: f32) -> Avatar {
        Avatar {
            y,
            ..Avatar::default()
        }
    }

    #[test]
    fn ceiling_and_ground_collide_even_with_empty_field() {
        let field = field();
        assert!(field.collides_with(&avatar_at(-20.0)));
        assert!(field.collides_with(&avatar_at(AVATAR_RADIUS - 1.0)));
        assert!(field.collides_with(&avatar_at(GROUND_Y + 1.0)));
        assert!(field.collides_with(&avatar_at(GROUND_Y - AVATAR_RADIUS + 1.0)));
        assert!(!field.collides_with(&avatar_at(FIELD_HEIGHT / 2.0)));
    }

    #[test]
    fn avatar_inside_gap_does_not_collide() {
        let mut field = field();
        field.obstacles.push_back(Obstacle {
            x: AVATAR_X - 10.0,
            gap_top: 200.0,
            passed: false,
        });
        // Centered in the gap
        assert!(!field.collides_with(&avatar_at(200.0 + field.gap_height / 2.0)));
        // Poking above the gap top
        assert!(field.collides_with(&avatar_at(200.0 + AVATAR_RADIUS - 1.0)));
        // Poking below the gap bottom
        assert!(field.collides_with(&avatar_at(200.0 + field.gap_height - AVATAR_RADIUS + 1.0)));
    }

    #[test]
    fn obstacle_outside_horizontal_extent_never_collides() {
        let mut field = field();
        field.obstacles.push_back(Obstacle {
            x: AVATAR_X + 100.0,
            gap_top: 200.0,
            passed: false,
        });
        // Would collide vertically, but there is no horizontal overlap
        assert!(!field.collides_with(&avatar_at(450.0)));
    }

    #[test]
    fn passes_are_counted_exactly_once() {
        let mut field = field();
        field.obstacles.push_back(Obstacle {
            x: AVATAR_X - field.width - 1.0,
            gap_top: 200.0,
            passed: false,
        });
        field.obstacles.push_back(Obstacle {
            x: AVATAR_X + 50.0,
            gap_top: 200.0,
            passed: false,
        });
        assert_eq!(field.score_passes(AVATAR_X), 1);
        assert_eq!(field.score_passes(AVATAR_X), 0);
        // The second obstacle drifts behind and scores once
        for o in &mut field.obstacles {
            o.x -= 200.0;
        }
        assert_eq!(field.score_passes(AVATAR_X), 1);
        assert_eq!(field.score_passes(AVATAR_X), 0);
    }

    #[test]
    fn advance_culls_oldest_and_keeps_order() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut field = field();
        field.reseed(&mut rng);
        assert_eq!(field.obstacles.len(), INITIAL_OBSTACLES);

        let mut now = 0;
        for _ in 0..2000 {
            now += 1;
            field.advance(3.0, now, &mut rng);
            let xs: Vec<f32> = field.obstacles.iter().map(|o| o.x).collect();
            assert!(xs.windows(2).all(|w| w[0] < w[1]), "order violated: {xs:?}");
            assert!(
                field
                    .obstacles
                    .front()
                    .is_none_or(|o| o.x >= -field.width - CULL_SLACK)
            );
        }
        // Steady state: spawns keep replacing culled obstacles
        assert!(!field.obstacles.is_empty());
    }

    #[test]
    fn spawn_respects_interval() {
        let mut rng = Pcg32::seed_from_u64(5);
        let mut field = field();
        let interval = field.spawn_interval_ticks;
        for now in 1..=interval {
            field.advance(0.0, now, &mut rng);
            assert!(field.obstacles.is_empty());
        }
        field.advance(0.0, interval + 1, &mut rng);
        assert_eq!(field.obstacles.len(), 1);
        assert_eq!(field.last_spawn_tick, interval + 1);
    }

    #[test]
    fn first_scheduled_spawn_stays_ahead_of_seeded_obstacles() {
        let mut rng = Pcg32::seed_from_u64(7);
        let mut field = field();
        field.reseed(&mut rng);
        // At base speed the rearmost seeded obstacle is still beyond the
        // spawn point when the first scheduled spawn fires
        let mut now = 0;
        for _ in 0..=field.spawn_interval_ticks {
            now += 1;
            field.advance(BASE_SPEED, now, &mut rng);
        }
        assert_eq!(field.obstacles.len(), INITIAL_OBSTACLES + 1);
        let xs: Vec<f32> = field.obstacles.iter().map(|o| o.x).collect();
        assert!(xs.windows(2).all(|w| w[0] < w[1]), "order violated: {xs:?}");
    }

    #[test]
    fn oversized_gap_tuning_is_clamped_to_the_playable_band() {
        let mut rng = Pcg32::seed_from_u64(9);
        let tuning = Tuning {
            gap_height: 10_000.0,
            ..Tuning::default()
        };
        let mut field = ObstacleField::new(&tuning);
        assert_eq!(
            field.gap_height,
            GROUND_Y - BOTTOM_MARGIN - TOP_MARGIN - GAP_TOP_SLACK
        );
        // Spawning must not panic and the gap must still fit the band
        field.spawn(FIELD_WIDTH, &mut rng);
        let o = field.obstacles[0];
        assert!(o.gap_top >= TOP_MARGIN);
        assert!(o.gap_top + field.gap_height <= GROUND_Y - BOTTOM_MARGIN);

        let tiny = ObstacleField::new(&Tuning {
            gap_height: 1.0,
            ..Tuning::default()
        });
        assert_eq!(tiny.gap_height, AVATAR_RADIUS * 2.0);
    }

    proptest! {
        #[test]
        fn gap_always_fits_playable_band(seed in any::<u64>()) {
            let mut rng = Pcg32::seed_from_u64(seed);
            let mut field = field();
            for i in 0..32 {
                field.spawn(FIELD_WIDTH + i as f32 * 10.0, &mut rng);
            }
            for o in &field.obstacles {
                prop_assert!(o.gap_top >= TOP_MARGIN);
                prop_assert!(o.gap_top + field.gap_height <= GROUND_Y - BOTTOM_MARGIN);
            }
        }

        #[test]
        fn out_of_band_positions_always_collide(y in -500.0f32..1100.0) {
            let field = field();
            let avatar = avatar_at(y);
            if avatar.top() < 0.0 || avatar.bottom() > GROUND_Y {
                prop_assert!(field.collides_with(&avatar));
            } else {
                prop_assert!(!field.collides_with(&avatar));
            }
        }
    }
}
