//! Presentation seam
//!
//! The simulation never draws or plays anything itself. Each tick it exposes
//! a borrowed [`Frame`] snapshot and a drained list of [`SoundEvent`]s; a
//! [`Presenter`] implementation turns those into pixels and audio. The
//! headless binary uses [`NullPresenter`].

use std::collections::VecDeque;

use crate::sim::{ActiveQuestion, Avatar, Obstacle, Particle, RunPhase};

/// Audio cues emitted by the simulation, drained by the host once per tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEvent {
    Flap,
    Score,
    Crash,
    CorrectAnswer,
    WrongAnswer,
    Pause,
    Resume,
}

/// Read-only view of everything a renderer needs for one frame
#[derive(Debug)]
pub struct Frame<'a> {
    pub phase: RunPhase,
    pub score: u32,
    pub avatar: &'a Avatar,
    pub obstacles: &'a VecDeque<Obstacle>,
    pub particles: &'a [Particle],
    /// Present only while a question gates the run
    pub question: Option<&'a ActiveQuestion>,
    /// Seconds left on the question timer, if one is running
    pub question_secs_left: Option<u32>,
}

/// Output adapter: anything that can show a frame and play a cue
pub trait Presenter {
    fn render(&mut self, frame: &Frame<'_>);
    fn play_sound(&mut self, sound: SoundEvent);
}

/// Discards everything; for headless runs and tests
#[derive(Debug, Default)]
pub struct NullPresenter;

impl Presenter for NullPresenter {
    fn render(&mut self, _frame: &Frame<'_>) {}
    fn play_sound(&mut self, _sound: SoundEvent) {}
}
