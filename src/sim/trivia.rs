//! Trivia interrupt sub-state machine
//!
//! A pausable interrupt triggered by monotonic progress checkpoints:
//! `Running -> AwaitingAnswer -> ShowingFeedback -> Running`. While a question
//! is up the engine freezes all physics and spawners; only the feedback
//! countdown advances. Answers are idempotent-after-first-call and a silent
//! no-op when no question is active.

use rand::seq::SliceRandom;
use rand_pcg::Pcg32;
use serde::Serialize;

use crate::consts::TRIVIA_FEEDBACK_TICKS;

/// A static trivia record from a planet's question bank.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct TriviaQuestion {
    pub question: &'static str,
    pub answers: [&'static str; 4],
    pub correct: usize,
    pub fact: &'static str,
}

/// A per-session permutation of a question bank.
///
/// Freshly shuffled on construction and on every reset; questions are
/// consumed index-sequentially so none repeats before the pool exhausts.
#[derive(Debug, Clone)]
pub struct TriviaDeck {
    bank: &'static [TriviaQuestion],
    order: Vec<usize>,
    next: usize,
}

impl TriviaDeck {
    /// Shuffle `bank` with a session-salted RNG stream. The salt keeps the
    /// main simulation RNG reproducible across resets while question order
    /// still differs between sessions.
    pub fn shuffled(bank: &'static [TriviaQuestion], seed: u64, session: u64) -> Self {
        let mut rng = Pcg32::new(seed, session.wrapping_mul(2) | 1);
        let mut order: Vec<usize> = (0..bank.len()).collect();
        order.shuffle(&mut rng);
        Self {
            bank,
            order,
            next: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.bank.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bank.is_empty()
    }

    /// Draw the next question, wrapping to the start once the pool exhausts.
    pub fn draw(&mut self) -> Option<&'static TriviaQuestion> {
        if self.bank.is_empty() {
            return None;
        }
        let q = &self.bank[self.order[self.next]];
        self.next = (self.next + 1) % self.order.len();
        Some(q)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Running,
    AwaitingAnswer,
    ShowingFeedback,
}

/// Outcome of an accepted answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TriviaOutcome {
    pub correct: bool,
}

/// The interrupt state machine owned by the engine.
#[derive(Debug, Clone)]
pub struct TriviaState {
    deck: TriviaDeck,
    phase: Phase,
    current: Option<&'static TriviaQuestion>,
    answered: Option<usize>,
    correct: bool,
    feedback_ticks: f32,
    next_checkpoint: u32,
    checkpoint_step: u32,
}

impl TriviaState {
    pub fn new(bank: &'static [TriviaQuestion], seed: u64, session: u64, step: u32) -> Self {
        Self {
            deck: TriviaDeck::shuffled(bank, seed, session),
            phase: Phase::Running,
            current: None,
            answered: None,
            correct: false,
            feedback_ticks: 0.0,
            next_checkpoint: step,
            checkpoint_step: step,
        }
    }

    /// True while the engine must freeze physics and spawners.
    pub fn active(&self) -> bool {
        self.phase != Phase::Running
    }

    /// True while a question is displayed (awaiting answer or feedback).
    pub fn showing(&self) -> bool {
        self.active()
    }

    pub fn awaiting_answer(&self) -> bool {
        self.phase == Phase::AwaitingAnswer
    }

    pub fn current(&self) -> Option<&'static TriviaQuestion> {
        self.current
    }

    pub fn answered(&self) -> Option<usize> {
        self.answered
    }

    pub fn was_correct(&self) -> bool {
        self.correct
    }

    pub fn feedback_remaining(&self) -> f32 {
        self.feedback_ticks
    }

    /// Fire at most once per threshold crossing. Progress metrics are
    /// monotonic, so a crossing advances the checkpoint exactly one step even
    /// if the same frame's state is read twice.
    pub fn maybe_trigger(&mut self, progress: u32) -> bool {
        if self.checkpoint_step == 0 || self.active() || self.deck.is_empty() {
            return false;
        }
        if progress < self.next_checkpoint {
            return false;
        }
        self.next_checkpoint += self.checkpoint_step;
        self.current = self.deck.draw();
        self.answered = None;
        self.correct = false;
        self.phase = Phase::AwaitingAnswer;
        true
    }

    /// Record an answer. Returns `None` (silent no-op) when no question is
    /// active or an answer was already recorded.
    pub fn answer(&mut self, index: usize) -> Option<TriviaOutcome> {
        if self.phase != Phase::AwaitingAnswer || self.answered.is_some() {
            return None;
        }
        let question = self.current?;
        self.answered = Some(index);
        self.correct = index == question.correct;
        self.phase = Phase::ShowingFeedback;
        self.feedback_ticks = TRIVIA_FEEDBACK_TICKS;
        Some(TriviaOutcome {
            correct: self.correct,
        })
    }

    /// Advance the feedback countdown. Returns true on the tick the machine
    /// resumes the simulation.
    pub fn tick(&mut self, dt: f32) -> bool {
        if self.phase != Phase::ShowingFeedback {
            return false;
        }
        self.feedback_ticks -= dt;
        if self.feedback_ticks <= 0.0 {
            self.feedback_ticks = 0.0;
            self.phase = Phase::Running;
            self.current = None;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BANK: &[TriviaQuestion] = &[
        TriviaQuestion {
            question: "q0",
            answers: ["a", "b", "c", "d"],
            correct: 1,
            fact: "f0",
        },
        TriviaQuestion {
            question: "q1",
            answers: ["a", "b", "c", "d"],
            correct: 2,
            fact: "f1",
        },
        TriviaQuestion {
            question: "q2",
            answers: ["a", "b", "c", "d"],
            correct: 0,
            fact: "f2",
        },
    ];

    #[test]
    fn test_deck_no_repeat_before_exhaustion() {
        let mut deck = TriviaDeck::shuffled(BANK, 42, 0);
        let mut seen = Vec::new();
        for _ in 0..BANK.len() {
            seen.push(deck.draw().unwrap().question);
        }
        seen.sort_unstable();
        seen.dedup();
        assert_eq!(seen.len(), BANK.len());
    }

    #[test]
    fn test_deck_reshuffle_differs_across_sessions() {
        // Not guaranteed for every seed, but stable for this one
        let order = |session| {
            let mut deck = TriviaDeck::shuffled(BANK, 42, session);
            (0..BANK.len())
                .map(|_| deck.draw().unwrap().question)
                .collect::<Vec<_>>()
        };
        let runs: Vec<_> = (0..8).map(order).collect();
        assert!(runs.iter().any(|r| r != &runs[0]));
    }

    #[test]
    fn test_trigger_once_per_crossing() {
        let mut trivia = TriviaState::new(BANK, 1, 0, 10);
        assert!(!trivia.maybe_trigger(9));
        assert!(trivia.maybe_trigger(10));
        // Same frame read twice - no re-trigger
        assert!(!trivia.maybe_trigger(10));
        trivia.answer(0);
        while !trivia.tick(1.0) {}
        // Still below the next checkpoint
        assert!(!trivia.maybe_trigger(15));
        assert!(trivia.maybe_trigger(20));
    }

    #[test]
    fn test_answer_idempotent_after_first_call() {
        let mut trivia = TriviaState::new(BANK, 1, 0, 10);
        trivia.maybe_trigger(10);
        let correct_index = trivia.current().unwrap().correct;
        let first = trivia.answer(correct_index);
        assert!(first.unwrap().correct);
        // Second answer is a silent no-op
        assert!(trivia.answer(0).is_none());
        assert!(trivia.was_correct());
    }

    #[test]
    fn test_answer_without_question_is_noop() {
        let mut trivia = TriviaState::new(BANK, 1, 0, 10);
        assert!(trivia.answer(0).is_none());
    }

    #[test]
    fn test_feedback_countdown_resumes() {
        let mut trivia = TriviaState::new(BANK, 1, 0, 10);
        trivia.maybe_trigger(10);
        trivia.answer(3);
        assert!(trivia.active());
        let mut ticks = 0;
        while !trivia.tick(1.0) {
            ticks += 1;
            assert!(ticks < 1_000, "feedback never expired");
        }
        assert!(!trivia.active());
        assert!(trivia.current().is_none());
    }

    #[test]
    fn test_no_trigger_while_active() {
        let mut trivia = TriviaState::new(BANK, 1, 0, 10);
        assert!(trivia.maybe_trigger(10));
        assert!(!trivia.maybe_trigger(20));
    }
}
