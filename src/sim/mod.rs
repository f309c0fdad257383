//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Frame-unit timestep only (dt = 1.0 is one 60 fps frame)
//! - Seeded RNG only
//! - Tick-counted timers, never wall-clock waits
//! - No rendering or platform dependencies beyond the `DrawSurface` trait

pub mod collision;
pub mod engine;
pub mod events;
pub mod particles;
pub mod planet;
pub mod spawner;
pub mod state;
pub mod trivia;

pub use collision::{circle_aabb_overlap, circles_overlap, Aabb};
pub use engine::{Engine, EngineError, Snapshot, TriviaView};
pub use events::GameEvent;
pub use particles::{Particle, Particles};
pub use planet::{Planet, PlanetId, PlanetProfile, PlanetStats, Terminal};
pub use spawner::{SpawnClock, WeightedTable};
pub use state::{Action, Core, InputState, Player, StatusEffects};
pub use trivia::{TriviaDeck, TriviaQuestion, TriviaState};
