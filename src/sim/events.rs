//! Terminal-boundary events
//!
//! The engine never touches the persistence store mid-tick. Instead it queues
//! events at well-defined boundaries (session start, trivia answers, game
//! over / victory) for the shell to drain and forward to the collaborators.

use serde::Serialize;

use super::planet::{PlanetId, Terminal};

/// An event the presentation/persistence shell reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum GameEvent {
    SessionStarted {
        planet: PlanetId,
        session: u64,
    },
    TriviaAnswered {
        correct: bool,
    },
    /// Emitted exactly once when the session reaches a terminal state.
    /// `stardust` is the full session total including any victory bonus.
    SessionEnded {
        planet: PlanetId,
        outcome: Terminal,
        score: u64,
        stardust: u32,
    },
}
