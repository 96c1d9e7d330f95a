//! Checkpoint capture and restore
//!
//! Two checkpoint slots drive revival:
//! - the *rolling* checkpoint, overwritten every tick just before that
//!   tick's physics runs, so it always reflects a known-safe prior frame;
//! - the *crash* checkpoint, frozen from the rolling one the instant a
//!   collision is detected (or from live state if no tick has run yet).
//!   Revival restores the crash checkpoint, never the rolling one.
//!
//! Snapshots are value copies: the obstacle list is cloned, not referenced,
//! since the live list keeps mutating.

use serde::{Deserialize, Serialize};

use super::field::ObstacleField;
use super::state::{Avatar, RunState};

/// The minimal state needed to resume a run after an interrupt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Checkpoint {
    pub avatar: Avatar,
    /// Deep copy of the obstacle list and its spawn clock
    pub field: ObstacleField,
    pub elapsed_ticks: u64,
    pub score: u32,
}

impl Checkpoint {
    /// Value-copy every mutable field out of the live state
    pub fn capture(state: &RunState) -> Self {
        Self {
            avatar: state.avatar,
            field: state.field.clone(),
            elapsed_ticks: state.elapsed_ticks,
            score: state.score,
        }
    }

    /// Overwrite the live state from this checkpoint's copy
    pub fn restore(&self, state: &mut RunState) {
        state.avatar = self.avatar;
        state.field = self.field.clone();
        state.elapsed_ticks = self.elapsed_ticks;
        state.score = self.score;
    }
}

/// Holds the rolling and crash checkpoint slots
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CheckpointStore {
    rolling: Option<Checkpoint>,
    crash: Option<Checkpoint>,
}

impl CheckpointStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the rolling checkpoint; call once per tick before physics
    pub fn record(&mut self, state: &RunState) {
        self.rolling = Some(Checkpoint::capture(state));
    }

    /// Freeze the crash checkpoint at the moment of collision: the last
    /// pre-tick snapshot, or the live state when no tick has run yet
    pub fn freeze_crash(&mut self, state: &RunState) {
        self.crash = Some(
            self.rolling
                .clone()
                .unwrap_or_else(|| Checkpoint::capture(state)),
        );
    }

    /// Consume the crash checkpoint (cleared once revival has used it)
    pub fn take_crash(&mut self) -> Option<Checkpoint> {
        self.crash.take()
    }

    /// Drop both slots; called when a new run starts
    pub fn clear(&mut self) {
        self.rolling = None;
        self.crash = None;
    }

    pub fn rolling(&self) -> Option<&Checkpoint> {
        self.rolling.as_ref()
    }

    pub fn crash(&self) -> Option<&Checkpoint> {
        self.crash.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::sim::state::Obstacle;
    use crate::tuning::Tuning;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn populated_state() -> RunState {
        let mut rng = Pcg32::seed_from_u64(41);
        let mut state = RunState::new(&Tuning::default());
        state.field.reseed(&mut rng);
        state.avatar.y = 123.0;
        state.avatar.vy = -2.5;
        state.elapsed_ticks = 777;
        state.score = 9;
        state
    }

    #[test]
    fn round_trip_reproduces_state_exactly() {
        let original = populated_state();
        let checkpoint = Checkpoint::capture(&original);

        let mut live = original.clone();
        live.avatar.y = 0.0;
        live.avatar.vy = 99.0;
        live.score = 0;
        live.elapsed_ticks = 0;
        live.field.obstacles.clear();
        live.field.last_spawn_tick = 4242;

        checkpoint.restore(&mut live);
        assert_eq!(live.avatar, original.avatar);
        assert_eq!(live.field, original.field);
        assert_eq!(live.elapsed_ticks, original.elapsed_ticks);
        assert_eq!(live.score, original.score);
        assert_eq!(live.field.obstacles.len(), INITIAL_OBSTACLES);
    }

    #[test]
    fn snapshot_is_a_value_copy_not_a_reference() {
        let mut state = populated_state();
        let checkpoint = Checkpoint::capture(&state);
        let frozen_x = checkpoint.field.obstacles[0].x;

        // Live list keeps mutating; the checkpoint must not follow
        state.field.obstacles[0].x -= 500.0;
        state.field.obstacles.push_back(Obstacle {
            x: 2000.0,
            gap_top: 200.0,
            passed: false,
        });
        assert_eq!(checkpoint.field.obstacles[0].x, frozen_x);
        assert_eq!(checkpoint.field.obstacles.len(), INITIAL_OBSTACLES);
    }

    #[test]
    fn crash_freeze_prefers_rolling_over_live() {
        let mut store = CheckpointStore::new();
        let mut state = populated_state();

        store.record(&state);
        state.avatar.y = GROUND_Y + 50.0; // the fatal frame
        store.freeze_crash(&state);

        let crash = store.take_crash().unwrap();
        assert_eq!(crash.avatar.y, 123.0);
        assert!(store.take_crash().is_none());
    }

    #[test]
    fn crash_freeze_falls_back_to_live_state() {
        let mut store = CheckpointStore::new();
        let state = populated_state();
        store.freeze_crash(&state);
        assert_eq!(store.crash().unwrap().avatar, state.avatar);
    }

    #[test]
    fn clear_drops_both_slots() {
        let mut store = CheckpointStore::new();
        let state = populated_state();
        store.record(&state);
        store.freeze_crash(&state);
        store.clear();
        assert!(store.rolling().is_none());
        assert!(store.crash().is_none());
    }
}
