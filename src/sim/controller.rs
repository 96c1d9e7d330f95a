//! Run controller: the state machine orchestrating a run
//!
//! Owns all run state explicitly - avatar, field, checkpoints, question
//! generator, timer, RNG - and exposes total transition functions: an
//! inapplicable event or call is a silent no-op, never an error.
//!
//! Input arrives through an explicit event queue drained once per tick,
//! before physics, so ordering is deterministic. The question timeout is a
//! separate coarse clock fed by the host once per second; its countdown is a
//! cancellable abstraction and every transition that ends the question phase
//! cancels it, so a resolved question's timer can never fire into a new run.

use std::collections::VecDeque;

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::checkpoint::CheckpointStore;
use super::questions::{choices, Question, QuestionGen, Tier, CHOICE_COUNT};
use super::state::{spawn_confetti, RunPhase, RunState};
use crate::consts::AVATAR_X;
use crate::present::{Frame, SoundEvent};
use crate::tuning::Tuning;

/// Discrete input events delivered by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    Flap,
    PauseToggle,
    /// The value of the selected answer choice
    Answer(i64),
    Restart,
}

/// The question currently gating the run, with its shuffled choices
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveQuestion {
    pub question: Question,
    pub choices: [i64; CHOICE_COUNT],
}

/// Cancellable countdown for the question interrupt.
///
/// Cancellation is idempotent, and a cancelled timer never reports expiry.
#[derive(Debug, Clone, Default)]
pub struct QuestionTimer {
    remaining_secs: Option<u32>,
}

impl QuestionTimer {
    pub fn start(&mut self, secs: u32) {
        self.remaining_secs = Some(secs);
    }

    pub fn cancel(&mut self) {
        self.remaining_secs = None;
    }

    pub fn is_running(&self) -> bool {
        matches!(self.remaining_secs, Some(n) if n > 0)
    }

    pub fn remaining(&self) -> Option<u32> {
        self.remaining_secs
    }

    /// One coarse clock beat. Returns true exactly once, on the beat that
    /// exhausts the countdown.
    pub fn second_elapsed(&mut self) -> bool {
        match self.remaining_secs {
            Some(n) if n > 0 => {
                self.remaining_secs = Some(n - 1);
                n == 1
            }
            _ => false,
        }
    }
}

/// Orchestrates the run lifecycle: Idle, Running, Paused, AwaitingAnswer,
/// GameOver. All mutation of [`RunState`] goes through here.
pub struct RunController {
    state: RunState,
    tier: Tier,
    tuning: Tuning,
    checkpoints: CheckpointStore,
    questions: QuestionGen,
    timer: QuestionTimer,
    active_question: Option<ActiveQuestion>,
    events: VecDeque<InputEvent>,
    sounds: Vec<SoundEvent>,
    rng: Pcg32,
}

impl RunController {
    pub fn new(seed: u64, tier: Tier, tuning: Tuning) -> Self {
        Self {
            state: RunState::new(&tuning),
            tier,
            tuning,
            checkpoints: CheckpointStore::new(),
            questions: QuestionGen::new(),
            timer: QuestionTimer::default(),
            active_question: None,
            events: VecDeque::new(),
            sounds: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Start (or fully restart) a run: cancel any in-flight question timer,
    /// reset all owned state, reseed the field, enter Running.
    pub fn start(&mut self) {
        self.timer.cancel();
        self.active_question = None;
        self.checkpoints.clear();
        self.state.score = 0;
        self.state.elapsed_ticks = 0;
        self.state.grace_ticks = 0;
        self.state.avatar.reset();
        self.state.field = super::field::ObstacleField::new(&self.tuning);
        self.state.field.reseed(&mut self.rng);
        self.state.particles.clear();
        self.state.phase = RunPhase::Running;
    }

    /// Queue a discrete input event for the next tick
    pub fn push_event(&mut self, event: InputEvent) {
        self.events.push_back(event);
    }

    /// One simulation step. Queued events are applied first (deterministic
    /// ordering: input before physics); the step itself only runs in the
    /// Running phase - Paused and AwaitingAnswer frames are render-only.
    pub fn tick(&mut self) {
        let was_running = self.state.phase == RunPhase::Running;
        while let Some(event) = self.events.pop_front() {
            self.apply_event(event);
        }

        // Simulate only if the run was live both before and after input:
        // a frame that just revived, restarted, or paused is render-only
        if !was_running || self.state.phase != RunPhase::Running {
            return;
        }

        // Known-safe snapshot before this tick's physics can kill the run
        self.checkpoints.record(&self.state);

        self.state.elapsed_ticks += 1;
        let speed = self.tuning.speed_for_score(self.state.score);
        let now = self.state.elapsed_ticks;
        self.state.field.advance(speed, now, &mut self.rng);
        self.state.avatar.integrate(self.tuning.gravity);

        let passes = self.state.field.score_passes(AVATAR_X);
        for _ in 0..passes {
            self.state.score += 1;
            self.sounds.push(SoundEvent::Score);
            let at = Vec2::new(AVATAR_X, self.state.avatar.y);
            spawn_confetti(&mut self.state.particles, at, 8, &mut self.rng);
        }

        self.state.update_particles();

        if self.state.grace_ticks > 0 {
            self.state.grace_ticks -= 1;
        }
        // Collision checks resume on the tick that drains the window
        if self.state.grace_ticks == 0 && self.state.field.collides_with(&self.state.avatar) {
            self.crash();
        }
    }

    fn apply_event(&mut self, event: InputEvent) {
        match event {
            InputEvent::Flap => {
                // Only meaningful mid-run; everywhere else it is dropped
                if self.state.phase == RunPhase::Running {
                    self.state.avatar.flap(self.tuning.flap_impulse);
                    self.sounds.push(SoundEvent::Flap);
                    let at = Vec2::new(AVATAR_X - 10.0, self.state.avatar.y + 6.0);
                    spawn_confetti(&mut self.state.particles, at, 2, &mut self.rng);
                }
            }
            InputEvent::PauseToggle => match self.state.phase {
                RunPhase::Running => self.pause(),
                RunPhase::Paused => self.resume(),
                _ => {}
            },
            InputEvent::Answer(value) => self.resolve_answer(value),
            InputEvent::Restart => self.start(),
        }
    }

    /// Collision interrupt: freeze simulation, capture the crash
    /// checkpoint, and gate the run behind a question. Ignored when a
    /// question is already pending or the run is over, so overlapping
    /// triggers within one frame produce a single interrupt.
    pub fn crash(&mut self) {
        if matches!(
            self.state.phase,
            RunPhase::AwaitingAnswer | RunPhase::GameOver
        ) {
            return;
        }
        self.sounds.push(SoundEvent::Crash);
        let at = Vec2::new(AVATAR_X, self.state.avatar.y);
        spawn_confetti(&mut self.state.particles, at, 18, &mut self.rng);

        self.checkpoints.freeze_crash(&self.state);
        self.state.phase = RunPhase::AwaitingAnswer;

        let question = self.questions.generate(self.tier, &mut self.rng);
        let choices = choices(&question, &mut self.rng);
        self.active_question = Some(ActiveQuestion { question, choices });
        self.timer.start(self.tuning.question_time_secs);
    }

    fn resolve_answer(&mut self, value: i64) {
        if self.state.phase != RunPhase::AwaitingAnswer {
            return;
        }
        let Some(active) = &self.active_question else {
            return;
        };
        if value == active.question.answer {
            self.sounds.push(SoundEvent::CorrectAnswer);
            self.revive();
        } else {
            self.sounds.push(SoundEvent::WrongAnswer);
            self.timer.cancel();
            self.start();
        }
    }

    /// Correct answer: restore the crash checkpoint, then re-center the
    /// avatar with zero velocity (resuming straight into the crash position
    /// would be unfair) and open the grace window.
    fn revive(&mut self) {
        self.timer.cancel();
        self.active_question = None;
        if let Some(checkpoint) = self.checkpoints.take_crash() {
            checkpoint.restore(&mut self.state);
        }
        self.state.avatar.reset();
        self.state.particles.clear();
        self.state.grace_ticks = self.tuning.grace_ticks;
        self.state.phase = RunPhase::Running;
    }

    /// Coarse question-timeout clock, fed by the host roughly once per
    /// second. Runs independently of tick suspension; expiry restarts the
    /// run exactly like a wrong answer.
    pub fn question_second_elapsed(&mut self) {
        if self.timer.second_elapsed() && self.state.phase == RunPhase::AwaitingAnswer {
            self.sounds.push(SoundEvent::WrongAnswer);
            self.timer.cancel();
            self.start();
        }
    }

    pub fn pause(&mut self) {
        if self.state.phase == RunPhase::Running {
            self.state.phase = RunPhase::Paused;
            self.sounds.push(SoundEvent::Pause);
        }
    }

    pub fn resume(&mut self) {
        if self.state.phase == RunPhase::Paused {
            self.state.phase = RunPhase::Running;
            self.sounds.push(SoundEvent::Resume);
        }
    }

    /// Put the run down for good. The host's exit hook; the simulation
    /// never reaches this on its own.
    pub fn end_run(&mut self) {
        self.timer.cancel();
        self.active_question = None;
        self.state.phase = RunPhase::GameOver;
    }

    /// Read-only view for the presentation adapter
    pub fn frame(&self) -> Frame<'_> {
        Frame {
            phase: self.state.phase,
            score: self.state.score,
            avatar: &self.state.avatar,
            obstacles: &self.state.field.obstacles,
            particles: &self.state.particles,
            question: self.active_question.as_ref(),
            question_secs_left: self.timer.remaining(),
        }
    }

    /// Drain sound notifications accumulated since the last call
    pub fn drain_sounds(&mut self) -> Vec<SoundEvent> {
        std::mem::take(&mut self.sounds)
    }

    pub fn state(&self) -> &RunState {
        &self.state
    }

    pub fn active_question(&self) -> Option<&ActiveQuestion> {
        self.active_question.as_ref()
    }
}
