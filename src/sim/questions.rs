//! Arithmetic question generation
//!
//! Two difficulty tiers: addition/subtraction with small operands, and
//! multiplication/division. Division is built backwards from divisor and
//! quotient so the result is always an exact integer. The generator avoids
//! repeating the immediately preceding question by structural key; when the
//! retry bound runs out it accepts the repeat rather than failing the run.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::QUESTION_RETRY_LIMIT;

/// Number of answer choices shown per question
pub const CHOICE_COUNT: usize = 4;

/// Difficulty tier, determining the operator set and numeric ranges
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tier {
    /// + and - with operands in 0..=10, results never negative
    AdditionSubtraction,
    /// x with operands in 0..=10, / with divisor and quotient in 1..=10
    MultiplicationDivision,
}

/// Arithmetic operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Op {
    Add,
    Sub,
    Mul,
    Div,
}

impl Op {
    pub fn symbol(self) -> char {
        match self {
            Op::Add => '+',
            Op::Sub => '-',
            Op::Mul => '\u{00d7}',
            Op::Div => '\u{00f7}',
        }
    }
}

/// A generated question. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub tier: Tier,
    pub op: Op,
    pub a: i64,
    pub b: i64,
    pub answer: i64,
    /// Display text, e.g. `3 + 4 = ?`
    pub text: String,
    /// Structural key (operator + operands) used to detect immediate repeats
    pub key: String,
}

impl Question {
    /// Build a question from operands. For subtraction the operands are
    /// swapped if needed so the result is never negative; for division `a`
    /// is the dividend and `b` the divisor.
    pub fn build(tier: Tier, op: Op, mut a: i64, mut b: i64) -> Self {
        if op == Op::Sub && b > a {
            std::mem::swap(&mut a, &mut b);
        }
        let answer = match op {
            Op::Add => a + b,
            Op::Sub => a - b,
            Op::Mul => a * b,
            Op::Div => a / b,
        };
        let sym = op.symbol();
        Self {
            tier,
            op,
            a,
            b,
            answer,
            text: format!("{a} {sym} {b} = ?"),
            key: format!("{sym}:{a}:{b}"),
        }
    }
}

/// Question generator tracking the previously asked question's key
#[derive(Debug, Clone, Default)]
pub struct QuestionGen {
    last_key: Option<String>,
}

impl QuestionGen {
    pub fn new() -> Self {
        Self::default()
    }

    /// Produce a question for the tier, retrying up to the bound to avoid
    /// repeating the previous question. Exhausting the bound accepts the
    /// repeat - graceful degradation, never a failure.
    pub fn generate<R: Rng>(&mut self, tier: Tier, rng: &mut R) -> Question {
        for _ in 0..QUESTION_RETRY_LIMIT {
            let q = roll(tier, rng);
            if self.last_key.as_deref() != Some(q.key.as_str()) {
                self.last_key = Some(q.key.clone());
                return q;
            }
        }
        let q = roll(tier, rng);
        self.last_key = Some(q.key.clone());
        q
    }
}

fn roll<R: Rng>(tier: Tier, rng: &mut R) -> Question {
    match tier {
        Tier::AdditionSubtraction => {
            let op = if rng.random_bool(0.5) { Op::Add } else { Op::Sub };
            let a = rng.random_range(0..=10);
            let b = rng.random_range(0..=10);
            Question::build(tier, op, a, b)
        }
        Tier::MultiplicationDivision => {
            if rng.random_bool(0.5) {
                let a = rng.random_range(0..=10);
                let b = rng.random_range(0..=10);
                Question::build(tier, Op::Mul, a, b)
            } else {
                let divisor = rng.random_range(1..=10);
                let quotient = rng.random_range(1..=10);
                Question::build(tier, Op::Div, divisor * quotient, divisor)
            }
        }
    }
}

/// Inclusive bounds a choice must fall within for the question's operator
fn choice_bounds(q: &Question) -> (i64, i64) {
    match q.op {
        Op::Add | Op::Sub => (0, 20),
        Op::Mul => (0, 100),
        Op::Div => (1, 10),
    }
}

fn pick<R: Rng, const N: usize>(rng: &mut R, xs: [i64; N]) -> i64 {
    xs[rng.random_range(0..N)]
}

/// If the correct answer fell out of the set (must not happen given
/// seeding, but guarded), overwrite a random slot with it.
fn ensure_answer<R: Rng>(picks: &mut [i64], answer: i64, rng: &mut R) {
    if !picks.contains(&answer) {
        let slot = rng.random_range(0..picks.len());
        picks[slot] = answer;
    }
}

/// Produce exactly [`CHOICE_COUNT`] distinct choices including the correct
/// answer, in shuffled order so the answer's position is unpredictable.
pub fn choices<R: Rng>(q: &Question, rng: &mut R) -> [i64; CHOICE_COUNT] {
    let (lo, hi) = choice_bounds(q);
    let mut picks: Vec<i64> = vec![q.answer];
    let push = |picks: &mut Vec<i64>, v: i64| {
        if (lo..=hi).contains(&v) && !picks.contains(&v) {
            picks.push(v);
        }
    };

    // Plausible distractors first: near misses and related wrong operations
    for _ in 0..30 {
        if picks.len() >= CHOICE_COUNT {
            break;
        }
        match q.op {
            Op::Add | Op::Sub => {
                push(&mut picks, q.answer + pick(rng, [-3, -2, -1, 1, 2, 3]));
                push(&mut picks, (q.answer - pick(rng, [1, 2, 3])).abs());
                push(&mut picks, q.answer + pick(rng, [4, 5]));
            }
            Op::Mul => {
                push(
                    &mut picks,
                    q.answer + pick(rng, [-10, -5, -4, -3, -2, -1, 1, 2, 3, 4, 5, 10]),
                );
                push(&mut picks, q.a * (q.b - 1));
                push(&mut picks, (q.a + 1) * q.b);
            }
            Op::Div => {
                push(&mut picks, q.answer + pick(rng, [-3, -2, -1, 1, 2, 3]));
                push(&mut picks, (q.answer + pick(rng, [-4, 4])).clamp(1, 10));
            }
        }
    }

    // Top up with uniform in-range values until the set is full
    while picks.len() < CHOICE_COUNT {
        push(&mut picks, rng.random_range(lo..=hi));
    }
    picks.truncate(CHOICE_COUNT);

    ensure_answer(&mut picks, q.answer, rng);

    // Fisher-Yates so the answer position is not predictable
    for i in (1..picks.len()).rev() {
        let j = rng.random_range(0..=i);
        picks.swap(i, j);
    }

    [picks[0], picks[1], picks[2], picks[3]]
}
