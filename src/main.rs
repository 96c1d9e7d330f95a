//! Flappy Math entry point
//!
//! Headless demo: a simple autopilot plays a run, gets interrupted by
//! arithmetic questions on collision, and answers them, logging every phase
//! transition. Exercises the full simulation loop without a renderer.

use flappy_math::consts::*;
use flappy_math::present::NullPresenter;
use flappy_math::sim::{InputEvent, RunController, RunPhase, Tier};
use flappy_math::{Presenter, SoundEvent, Tuning};

/// How long the demo runs, in simulated ticks (60 ticks per second)
const DEMO_TICKS: u64 = 60 * 120;

struct LogPresenter {
    inner: NullPresenter,
}

impl Presenter for LogPresenter {
    fn render(&mut self, frame: &flappy_math::Frame<'_>) {
        self.inner.render(frame);
    }

    fn play_sound(&mut self, sound: SoundEvent) {
        log::debug!("sound: {sound:?}");
    }
}

fn load_tuning() -> Tuning {
    let Some(path) = std::env::args().nth(1) else {
        return Tuning::default();
    };
    match std::fs::read_to_string(&path) {
        Ok(text) => match Tuning::from_json(&text) {
            Ok(tuning) => tuning,
            Err(e) => {
                log::warn!("Bad tuning file {path}: {e}");
                Tuning::default()
            }
        },
        Err(e) => {
            log::warn!("Cannot read tuning file {path}: {e}");
            Tuning::default()
        }
    }
}

/// Flap whenever the avatar is falling below the next gap's center. The
/// small offset keeps the rise arc inside the gap.
fn autopilot(rc: &RunController) -> bool {
    let state = rc.state();
    let target = state
        .field
        .next_ahead(AVATAR_X - AVATAR_RADIUS)
        .map(|o| o.gap_top + state.field.gap_height / 2.0)
        .unwrap_or(FIELD_HEIGHT / 2.0);
    state.avatar.y > target + 12.0 && state.avatar.vy > 0.0
}

fn main() {
    env_logger::init();
    log::info!("Flappy Math (headless demo) starting...");

    let tuning = load_tuning();
    let mut rc = RunController::new(0xF1A9, Tier::AdditionSubtraction, tuning);
    let mut presenter = LogPresenter {
        inner: NullPresenter,
    };

    rc.start();
    let mut last_phase = RunPhase::Idle;
    let mut questions_answered = 0u32;

    for tick in 0..DEMO_TICKS {
        if rc.state().phase == RunPhase::Running && autopilot(&rc) {
            rc.push_event(InputEvent::Flap);
        }
        rc.tick();

        // The host clock beats once per simulated second
        if tick % 60 == 59 {
            rc.question_second_elapsed();
        }

        let phase = rc.state().phase;
        if phase != last_phase {
            log::info!(
                "tick {tick}: {last_phase:?} -> {phase:?} (score {})",
                rc.state().score
            );
            last_phase = phase;
        }

        if phase == RunPhase::AwaitingAnswer {
            if let Some(active) = rc.active_question() {
                let answer = active.question.answer;
                log::info!(
                    "question: {} choices {:?}",
                    active.question.text,
                    active.choices
                );
                rc.push_event(InputEvent::Answer(answer));
                questions_answered += 1;
            }
        }

        presenter.render(&rc.frame());
        for sound in rc.drain_sounds() {
            presenter.play_sound(sound);
        }
    }

    rc.end_run();
    log::info!(
        "demo over: score {}, {} questions answered over {} ticks",
        rc.state().score,
        questions_answered,
        rc.state().elapsed_ticks
    );
}
