//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Input through an explicit event queue, drained before physics
//! - No rendering or platform dependencies

pub mod checkpoint;
pub mod controller;
pub mod field;
pub mod questions;
pub mod state;

pub use checkpoint::{Checkpoint, CheckpointStore};
pub use controller::{ActiveQuestion, InputEvent, QuestionTimer, RunController};
pub use field::ObstacleField;
pub use questions::{choices, Op, Question, QuestionGen, Tier, CHOICE_COUNT};
pub use state::{spawn_confetti, Avatar, Obstacle, Particle, RunPhase, RunState};
