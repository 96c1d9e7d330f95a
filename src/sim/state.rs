//! Run state and core simulation types
//!
//! Everything that must survive a checkpoint round-trip lives here.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::field::ObstacleField;
use crate::consts::*;
use crate::tuning::Tuning;

/// Current phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum RunPhase {
    /// No run in progress
    #[default]
    Idle,
    /// Active simulation
    Running,
    /// Simulation frozen by the player
    Paused,
    /// Simulation frozen by a collision; a question is on screen
    AwaitingAnswer,
    /// Run ended for good
    GameOver,
}

/// The player's avatar. Horizontal position is fixed at [`AVATAR_X`];
/// only the vertical axis is simulated.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Avatar {
    pub y: f32,
    pub vy: f32,
    pub radius: f32,
}

impl Default for Avatar {
    fn default() -> Self {
        Self {
            y: FIELD_HEIGHT / 2.0,
            vy: 0.0,
            radius: AVATAR_RADIUS,
        }
    }
}

impl Avatar {
    /// Re-center vertically and kill all momentum
    pub fn reset(&mut self) {
        self.y = FIELD_HEIGHT / 2.0;
        self.vy = 0.0;
    }

    /// Gravity integration, applied once per simulated tick
    pub fn integrate(&mut self, gravity: f32) {
        self.vy += gravity;
        self.y += self.vy;
    }

    /// Flap: velocity override, not additive, so a flap feels the same
    /// regardless of how fast the avatar was falling
    pub fn flap(&mut self, impulse: f32) {
        self.vy = impulse;
    }

    pub fn top(&self) -> f32 {
        self.y - self.radius
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.radius
    }
}

/// A single gap obstacle. The gap spans `gap_top .. gap_top + gap_height`
/// where the gap height is fixed per run and held by the field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    /// Left edge, world units; decreases as the field advances
    pub x: f32,
    /// Top of the passable gap
    pub gap_top: f32,
    /// Whether this obstacle has already been scored
    pub passed: bool,
}

/// A confetti particle for visual feedback (not gameplay-affecting)
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Remaining lifetime in ticks
    pub life: f32,
    pub radius: f32,
}

/// Spawn a confetti burst at `at`, in the original's velocity spread
pub fn spawn_confetti<R: Rng>(particles: &mut Vec<Particle>, at: Vec2, count: usize, rng: &mut R) {
    for _ in 0..count {
        particles.push(Particle {
            pos: at,
            vel: Vec2::new(
                rng.random_range(-1.0..1.0) * 3.2,
                rng.random_range(-1.0..1.0) * 3.2 - 1.6,
            ),
            life: rng.random_range(45.0..70.0),
            radius: rng.random_range(2.2..4.6),
        });
    }
}

/// Complete per-run state, owned exclusively by the run controller
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunState {
    pub phase: RunPhase,
    pub score: u32,
    pub elapsed_ticks: u64,
    /// Post-revival window: decremented each tick, and collision checks
    /// resume on the tick that drains it to zero
    pub grace_ticks: u32,
    pub avatar: Avatar,
    pub field: ObstacleField,
    /// Visual confetti (render-only, excluded from checkpoints)
    #[serde(skip)]
    pub particles: Vec<Particle>,
}

impl RunState {
    /// Fresh idle state with an empty field shaped by the tuning
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            phase: RunPhase::Idle,
            score: 0,
            elapsed_ticks: 0,
            grace_ticks: 0,
            avatar: Avatar::default(),
            field: ObstacleField::new(tuning),
            particles: Vec::new(),
        }
    }

    /// Advance and cull confetti (original drift numbers)
    pub fn update_particles(&mut self) {
        for p in &mut self.particles {
            p.vel.y += 0.08;
            p.pos += p.vel;
            p.life -= 1.0;
        }
        self.particles.retain(|p| p.life > 0.0);
    }
}
