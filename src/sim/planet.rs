//! The planet plugin seam
//!
//! Each minigame is the same engine pattern parameterized differently: a
//! force model, a spawner vocabulary, a collision resolver, and terminal
//! conditions. The `Planet` trait is that capability set; the generic
//! `Engine` drives it in a fixed order every tick.

use serde::{Deserialize, Serialize};

use super::engine::PlanetStatsView;
use super::state::Core;
use super::trivia::TriviaQuestion;
use crate::surface::DrawSurface;

/// Closed set of implemented planets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PlanetId {
    BlackHole,
    StormRider,
    MachSurfer,
    PressureDrop,
}

impl PlanetId {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlanetId::BlackHole => "black_hole",
            PlanetId::StormRider => "storm_rider",
            PlanetId::MachSurfer => "mach_surfer",
            PlanetId::PressureDrop => "pressure_drop",
        }
    }
}

/// How a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Terminal {
    Victory,
    Defeat,
}

/// Static engine-facing tuning for one planet.
#[derive(Debug, Clone, Copy)]
pub struct PlanetProfile {
    pub id: PlanetId,
    /// Session stardust cap (collectibles + trivia combined)
    pub stardust_cap: u32,
    /// Combo multiplier ceiling
    pub combo_ceiling: f32,
    /// Progress units between trivia checkpoints (0 disables trivia)
    pub trivia_step: u32,
    pub trivia_bank: &'static [TriviaQuestion],
}

/// Per-planet metrics exposed through the snapshot.
pub type PlanetStats = PlanetStatsView;

/// One planet minigame: entity vocabulary, force model, resolver, terminals.
///
/// The engine owns the shared `Core`; the plugin owns its entity lists and
/// planet-specific meters. Split borrows keep both sides mutable at once.
pub trait Planet {
    fn profile(&self) -> PlanetProfile;

    /// Rebuild plugin state for a fresh session.
    fn reset(&mut self, core: &mut Core);

    /// Apply the planet's field forces and integrate the player. All output
    /// magnitudes must be clamped here; unclamped forces are the canonical
    /// source of runaway/NaN bugs.
    fn apply_forces(&mut self, core: &mut Core, dt: f32);

    /// Advance spawn clocks, appending new entities.
    fn spawn(&mut self, core: &mut Core, dt: f32);

    /// Resolve player/entity interactions: collect, damage, deliver, or
    /// pass-by - exactly one per entity, gated by lifecycle flags.
    fn resolve_collisions(&mut self, core: &mut Core, dt: f32);

    /// Check victory/defeat. The engine latches the first `Some` and freezes.
    fn check_terminal(&self, core: &Core) -> Option<Terminal>;

    /// Monotonic progress metric driving trivia checkpoints.
    fn trivia_progress(&self, core: &Core) -> u32;

    /// Hook for planet-specific trivia rewards (e.g. carry capacity boost).
    fn on_trivia_result(&mut self, _core: &mut Core, _correct: bool) {}

    /// One-time stardust bonus granted on victory, exempt from the cap.
    fn victory_bonus(&self, _core: &Core) -> u32 {
        0
    }

    /// Constant per-tick pull applied to particles (singularity, descent).
    fn particle_gravity(&self, _core: &Core) -> glam::Vec2 {
        glam::Vec2::ZERO
    }

    fn stats(&self, core: &Core) -> PlanetStats;

    /// Stateless draw of the current frame. Pure read, no gameplay effects.
    fn draw(&self, core: &Core, surface: &mut dyn DrawSurface);
}
