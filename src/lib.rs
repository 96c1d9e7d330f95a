//! Flappy Math - an arithmetic-gated flappy arcade game core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, obstacles, questions, run state machine)
//! - `present`: Presentation adapter seam (rendering/audio collaborators)
//! - `tuning`: Data-driven game balance

pub mod present;
pub mod sim;
pub mod tuning;

pub use present::{Frame, Presenter, SoundEvent};
pub use sim::{InputEvent, RunController, RunPhase, Tier};
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Playfield dimensions (world units)
    pub const FIELD_WIDTH: f32 = 900.0;
    pub const FIELD_HEIGHT: f32 = 600.0;
    /// Height of the ground band at the bottom of the field
    pub const GROUND_BAND: f32 = 68.0;
    /// Y coordinate of the ground surface (collision floor)
    pub const GROUND_Y: f32 = FIELD_HEIGHT - GROUND_BAND;

    /// Avatar defaults - horizontal position is fixed, only y moves
    pub const AVATAR_X: f32 = 220.0;
    pub const AVATAR_RADIUS: f32 = 18.0;

    /// Physics defaults (per-tick units)
    pub const GRAVITY: f32 = 0.42;
    pub const FLAP_IMPULSE: f32 = -7.4;

    /// Obstacle defaults
    pub const GAP_HEIGHT: f32 = 150.0;
    pub const OBSTACLE_WIDTH: f32 = 78.0;
    /// Ticks between obstacle spawns
    pub const SPAWN_INTERVAL_TICKS: u64 = 132;
    /// How far past the right edge new obstacles appear
    pub const SPAWN_LEAD: f32 = 40.0;
    /// How far past the left edge obstacles survive before culling
    pub const CULL_SLACK: f32 = 50.0;
    /// Initial field seeding at run start
    pub const INITIAL_OBSTACLES: usize = 3;
    pub const INITIAL_OBSTACLE_SPACING: f32 = 260.0;

    /// Speed ramp: base + min(cap, score * per_point)
    pub const BASE_SPEED: f32 = 2.6;
    pub const SPEED_PER_POINT: f32 = 0.05;
    pub const SPEED_CAP_DELTA: f32 = 2.2;

    /// Vertical band reserved at the top, plus extra slack before the first
    /// legal gap top
    pub const TOP_MARGIN: f32 = 54.0;
    pub const GAP_TOP_SLACK: f32 = 40.0;
    /// Vertical band reserved above the ground
    pub const BOTTOM_MARGIN: f32 = 108.0;

    /// Post-revival window during which collision checks are suppressed
    pub const GRACE_TICKS: u32 = 45;
    /// Seconds allowed to answer a question before the run restarts
    pub const QUESTION_TIME_SECS: u32 = 30;
    /// Attempts to avoid repeating the previous question before accepting it
    pub const QUESTION_RETRY_LIMIT: u32 = 50;
}
