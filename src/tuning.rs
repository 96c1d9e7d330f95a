//! Data-driven game balance
//!
//! All balance knobs live in one serde struct so a host can override them
//! from JSON without recompiling. Field geometry stays in `consts` - a run's
//! obstacle geometry is copied out of the tuning at start and frozen for the
//! duration of that run.

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Gameplay balance knobs
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Physics (per-tick units) ===
    /// Downward acceleration added to vertical velocity every tick
    pub gravity: f32,
    /// Velocity a flap sets (negative = upward), overriding the current fall
    pub flap_impulse: f32,

    // === Obstacles ===
    /// Vertical size of the passable gap
    pub gap_height: f32,
    /// Horizontal size of each obstacle
    pub obstacle_width: f32,
    /// Ticks between spawns
    pub spawn_interval_ticks: u64,

    // === Speed ramp ===
    /// Leftward obstacle speed at score 0
    pub base_speed: f32,
    /// Extra speed per point scored
    pub speed_per_point: f32,
    /// Maximum extra speed from the ramp
    pub speed_cap_delta: f32,

    // === Interrupt handling ===
    /// Collision-free ticks granted after a revival
    pub grace_ticks: u32,
    /// Seconds to answer a question before the run restarts
    pub question_time_secs: u32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            gravity: GRAVITY,
            flap_impulse: FLAP_IMPULSE,
            gap_height: GAP_HEIGHT,
            obstacle_width: OBSTACLE_WIDTH,
            spawn_interval_ticks: SPAWN_INTERVAL_TICKS,
            base_speed: BASE_SPEED,
            speed_per_point: SPEED_PER_POINT,
            speed_cap_delta: SPEED_CAP_DELTA,
            grace_ticks: GRACE_TICKS,
            question_time_secs: QUESTION_TIME_SECS,
        }
    }
}

impl Tuning {
    /// Parse tuning overrides from JSON. Missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let tuning: Tuning = serde_json::from_str(json)?;
        log::info!("Loaded tuning overrides");
        Ok(tuning)
    }

    /// Obstacle speed for the given score: ramps linearly, capped.
    pub fn speed_for_score(&self, score: u32) -> f32 {
        self.base_speed + (score as f32 * self.speed_per_point).min(self.speed_cap_delta)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn speed_ramp_is_linear_then_capped() {
        let tuning = Tuning::default();
        assert_eq!(tuning.speed_for_score(0), BASE_SPEED);
        assert_eq!(tuning.speed_for_score(10), BASE_SPEED + 0.5);
        // Cap kicks in at 44 points with default numbers
        assert_eq!(tuning.speed_for_score(44), BASE_SPEED + SPEED_CAP_DELTA);
        assert_eq!(tuning.speed_for_score(1000), BASE_SPEED + SPEED_CAP_DELTA);
    }

    #[test]
    fn speed_is_monotonic_in_score() {
        let tuning = Tuning::default();
        let mut prev = tuning.speed_for_score(0);
        for score in 1..200 {
            let speed = tuning.speed_for_score(score);
            assert!(speed >= prev);
            prev = speed;
        }
    }

    #[test]
    fn partial_json_override_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{"gravity": 0.5, "grace_ticks": 60}"#).unwrap();
        assert_eq!(tuning.gravity, 0.5);
        assert_eq!(tuning.grace_ticks, 60);
        assert_eq!(tuning.gap_height, GAP_HEIGHT);
        assert_eq!(tuning.question_time_secs, QUESTION_TIME_SECS);
    }

    #[test]
    fn invalid_json_is_an_error() {
        assert!(Tuning::from_json("{not json").is_err());
    }
}
