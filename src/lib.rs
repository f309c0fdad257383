//! OrbitQuest - planet-themed arcade simulation engines
//!
//! Core modules:
//! - `sim`: generic deterministic engine (state, spawners, collisions, trivia)
//! - `planets`: the four planet plugins with distinct force models
//! - `surface`: immediate-mode 2D draw boundary
//! - `audio`: fire-and-forget sound sink boundary
//! - `progress`: stardust/unlock/high-score persistence boundary
//! - `hub`: Mission Control catalog and unlock gating

pub mod audio;
pub mod hub;
pub mod planets;
pub mod progress;
pub mod settings;
pub mod sim;
pub mod surface;

pub use progress::{ProgressRecord, ProgressStore};
pub use sim::{Engine, EngineError, Snapshot};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Nominal timestep: `dt = 1.0` is one 60 fps frame. All per-tick
    /// magnitudes are tuned against this unit and scale linearly with it.
    pub const NOMINAL_DT: f32 = 1.0;
    /// Maximum update steps per animation frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 4;

    /// Trivia feedback duration (ticks, ~2.5 seconds)
    pub const TRIVIA_FEEDBACK_TICKS: f32 = 150.0;
    /// Stardust granted for a correct trivia answer
    pub const TRIVIA_STARDUST: u32 = 10;
    /// Score granted for a correct trivia answer
    pub const TRIVIA_SCORE: u64 = 250;
    /// Shield duration granted for a correct trivia answer (ticks)
    pub const TRIVIA_SHIELD_TICKS: f32 = 300.0;

    /// Combo decay per tick (multiplier drifts back toward 1.0)
    pub const COMBO_DECAY: f32 = 0.002;
    /// Combo floor - never decays below this
    pub const COMBO_FLOOR: f32 = 1.0;
}

/// Browser bootstrap: panic messages and `log` output to the console.
/// The page shell calls this once before constructing engines.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen::prelude::wasm_bindgen]
pub fn init_browser() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
    log::info!("OrbitQuest core ready");
}

/// Entropy for a fresh run when the shell has no seed to replay.
#[cfg(target_arch = "wasm32")]
pub fn browser_seed() -> u64 {
    js_sys::Date::now() as u64
}

/// Clamp a velocity's magnitude into `[min, max]` without changing direction.
///
/// A zero vector stays zero: it has no direction to grow along, so a positive
/// `min` cannot apply and the vector is returned unchanged.
#[inline]
pub fn clamp_speed(vel: Vec2, min: f32, max: f32) -> Vec2 {
    let speed = vel.length();
    if speed < 1e-6 {
        return vel;
    }
    let clamped = speed.clamp(min, max);
    vel * (clamped / speed)
}

/// Move a scalar toward a target by at most `max_delta`.
#[inline]
pub fn approach(current: f32, target: f32, max_delta: f32) -> f32 {
    let delta = (target - current).clamp(-max_delta, max_delta);
    current + delta
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_speed_bounds() {
        let v = clamp_speed(Vec2::new(100.0, 0.0), 1.0, 5.0);
        assert!((v.length() - 5.0).abs() < 1e-4);

        let v = clamp_speed(Vec2::new(0.1, 0.0), 1.0, 5.0);
        assert!((v.length() - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_clamp_speed_zero_stays_zero() {
        let v = clamp_speed(Vec2::ZERO, 1.0, 5.0);
        assert_eq!(v, Vec2::ZERO);
    }

    #[test]
    fn test_approach() {
        assert_eq!(approach(0.0, 10.0, 3.0), 3.0);
        assert_eq!(approach(9.0, 10.0, 3.0), 10.0);
        assert_eq!(approach(10.0, 0.0, 4.0), 6.0);
    }
}
