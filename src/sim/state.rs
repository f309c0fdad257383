//! Shared simulation state
//!
//! Everything the generic engine owns regardless of planet: the player probe,
//! timed status effects, input intent, score/combo/stardust accounting, and
//! the seeded RNG. Mutated only inside `update()`; rebuilt by `reset()`.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::events::GameEvent;
use super::particles::Particles;
use crate::audio::SoundEvent;
use crate::clamp_speed;
use crate::consts::{COMBO_DECAY, COMBO_FLOOR};

/// Logical input actions surfaced by the shell.
///
/// The core is agnostic to physical devices; the caller maps keys/buttons to
/// these before forwarding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    Rise,
    Fall,
    Left,
    Right,
    Primary,
}

/// Input intent recorded by the setters, observed by the next `update()`.
///
/// Setters may be called at arbitrary times between frames; there is no
/// concurrent writer, so no torn reads.
#[derive(Debug, Clone, Default)]
pub struct InputState {
    /// Pointer position in logical game coordinates (pre-scaled by caller)
    pub pointer: Option<Vec2>,
    pub rise: bool,
    pub fall: bool,
    pub left: bool,
    pub right: bool,
    pub primary: bool,
}

impl InputState {
    pub fn set(&mut self, action: Action, pressed: bool) {
        match action {
            Action::Rise => self.rise = pressed,
            Action::Fall => self.fall = pressed,
            Action::Left => self.left = pressed,
            Action::Right => self.right = pressed,
            Action::Primary => self.primary = pressed,
        }
    }

    /// Vertical intent: -1 (rise), +1 (fall), 0 (none/both)
    pub fn vertical_axis(&self) -> f32 {
        (self.fall as i8 - self.rise as i8) as f32
    }

    /// Horizontal intent: -1 (left), +1 (right), 0 (none/both)
    pub fn horizontal_axis(&self) -> f32 {
        (self.right as i8 - self.left as i8) as f32
    }
}

/// Timed status effects, tick-counted.
///
/// Buff expiry is owned by the engine state and decremented inside `update()`,
/// never scheduled against wall-clock timers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatusEffects {
    pub shield_ticks: f32,
    pub magnet_ticks: f32,
    pub slow_ticks: f32,
    pub carry_boost_ticks: f32,
}

impl StatusEffects {
    pub fn tick(&mut self, dt: f32) {
        self.shield_ticks = (self.shield_ticks - dt).max(0.0);
        self.magnet_ticks = (self.magnet_ticks - dt).max(0.0);
        self.slow_ticks = (self.slow_ticks - dt).max(0.0);
        self.carry_boost_ticks = (self.carry_boost_ticks - dt).max(0.0);
    }

    pub fn shield_active(&self) -> bool {
        self.shield_ticks > 0.0
    }

    pub fn magnet_active(&self) -> bool {
        self.magnet_ticks > 0.0
    }

    pub fn carry_boost_active(&self) -> bool {
        self.carry_boost_ticks > 0.0
    }
}

/// The player probe. One per engine instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    /// Hull integrity 0-100 (BlackHole, PressureDrop)
    pub hull: f32,
    /// Heat accumulator 0-100 (PressureDrop)
    pub temperature: f32,
    /// Remaining lives (StormRider, MachSurfer)
    pub lives: u8,
    pub effects: StatusEffects,
}

impl Player {
    pub fn new(pos: Vec2) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            radius: 14.0,
            hull: 100.0,
            temperature: 0.0,
            lives: 3,
            effects: StatusEffects::default(),
        }
    }

    /// Accelerate toward a target point, then clamp speed to `[0, max_speed]`.
    pub fn steer_toward(&mut self, target: Vec2, accel: f32, max_speed: f32, dt: f32) {
        let to_target = target - self.pos;
        if to_target.length() > 2.0 {
            self.vel += to_target.normalize() * accel * dt;
        } else {
            // Close enough - bleed off velocity so the probe settles
            self.vel *= 0.85_f32.powf(dt);
        }
        self.vel = clamp_speed(self.vel, 0.0, max_speed);
    }

    /// Integrate position and clamp it into the playfield.
    pub fn integrate(&mut self, dt: f32, width: f32, height: f32) {
        self.pos += self.vel * dt;
        self.clamp_to_bounds(width, height);
    }

    /// Silently clamp position to the playfield (continuous-control system:
    /// out-of-bounds is clamped every tick, never rejected).
    pub fn clamp_to_bounds(&mut self, width: f32, height: f32) {
        let r = self.radius;
        self.pos.x = self.pos.x.clamp(r, width - r);
        self.pos.y = self.pos.y.clamp(r, height - r);
    }
}

/// Session stardust accounting.
///
/// Collectibles and trivia bonuses share one capped pool per session; the
/// one-time victory bonus is tracked separately and exempt from the cap.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Stardust {
    earned: u32,
    bonus: u32,
    cap: u32,
}

impl Stardust {
    pub fn new(cap: u32) -> Self {
        Self {
            earned: 0,
            bonus: 0,
            cap,
        }
    }

    /// Award capped session stardust. Returns the amount actually granted.
    pub fn award(&mut self, amount: u32) -> u32 {
        let granted = amount.min(self.cap.saturating_sub(self.earned));
        self.earned += granted;
        granted
    }

    /// Award the one-time terminal bonus (exempt from the session cap).
    pub fn award_bonus(&mut self, amount: u32) {
        self.bonus += amount;
    }

    pub fn session(&self) -> u32 {
        self.earned
    }

    pub fn total(&self) -> u32 {
        self.earned + self.bonus
    }

    pub fn cap(&self) -> u32 {
        self.cap
    }
}

/// State shared by every planet engine.
#[derive(Debug, Clone)]
pub struct Core {
    pub width: f32,
    pub height: f32,
    pub seed: u64,
    /// Reset counter; salts the trivia deck shuffle so repeat sessions differ
    pub session: u64,
    pub rng: Pcg32,
    pub ticks: u64,
    pub input: InputState,
    pub player: Player,
    pub score: u64,
    /// Combo multiplier: decays toward 1.0, clamped to the planet ceiling
    pub combo: f32,
    combo_ceiling: f32,
    pub stardust: Stardust,
    pub is_game_over: bool,
    pub victory: bool,
    pub particles: Particles,
    pub(crate) events: Vec<GameEvent>,
    pub(crate) cues: Vec<SoundEvent>,
}

impl Core {
    pub fn new(
        width: f32,
        height: f32,
        seed: u64,
        session: u64,
        stardust_cap: u32,
        combo_ceiling: f32,
        max_particles: usize,
    ) -> Self {
        Self {
            width,
            height,
            seed,
            session,
            rng: Pcg32::seed_from_u64(seed),
            ticks: 0,
            input: InputState::default(),
            player: Player::new(Vec2::new(width / 2.0, height / 2.0)),
            score: 0,
            combo: COMBO_FLOOR,
            combo_ceiling,
            stardust: Stardust::new(stardust_cap),
            is_game_over: false,
            victory: false,
            particles: Particles::new(max_particles),
            events: Vec::new(),
            cues: Vec::new(),
        }
    }

    /// Add to score with the current combo multiplier applied.
    pub fn score_with_combo(&mut self, base: u64) {
        self.score += (base as f32 * self.combo) as u64;
    }

    /// Bump the combo, clamped to the planet ceiling.
    pub fn bump_combo(&mut self, amount: f32) {
        self.combo = (self.combo + amount).min(self.combo_ceiling);
    }

    /// Reset the combo to the floor (missed trivia, crash).
    pub fn break_combo(&mut self) {
        self.combo = COMBO_FLOOR;
    }

    pub fn combo_ceiling(&self) -> f32 {
        self.combo_ceiling
    }

    /// Decay combo and tick status effects. Called once per update.
    pub fn tick_effects(&mut self, dt: f32) {
        self.combo = (self.combo - COMBO_DECAY * dt).max(COMBO_FLOOR);
        self.player.effects.tick(dt);
    }

    /// Queue a fire-and-forget sound cue (flushed to the sink after the tick).
    pub fn cue(&mut self, sound: SoundEvent) {
        self.cues.push(sound);
    }

    pub(crate) fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stardust_cap_enforced() {
        let mut s = Stardust::new(80);
        assert_eq!(s.award(50), 50);
        assert_eq!(s.award(50), 30);
        assert_eq!(s.award(50), 0);
        assert_eq!(s.session(), 80);
    }

    #[test]
    fn test_stardust_bonus_exempt_from_cap() {
        let mut s = Stardust::new(60);
        s.award(100);
        s.award_bonus(5000);
        assert_eq!(s.session(), 60);
        assert_eq!(s.total(), 5060);
    }

    #[test]
    fn test_combo_clamps_to_ceiling() {
        let mut core = Core::new(800.0, 600.0, 1, 0, 100, 6.0, 128);
        for _ in 0..100 {
            core.bump_combo(0.5);
        }
        assert!((core.combo - 6.0).abs() < f32::EPSILON);
        core.break_combo();
        assert!((core.combo - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_combo_decays_to_floor() {
        let mut core = Core::new(800.0, 600.0, 1, 0, 100, 6.0, 128);
        core.bump_combo(1.0);
        for _ in 0..10_000 {
            core.tick_effects(1.0);
        }
        assert!((core.combo - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_player_clamped_to_bounds() {
        let mut p = Player::new(Vec2::new(10.0, 10.0));
        p.vel = Vec2::new(-100.0, -100.0);
        p.integrate(1.0, 800.0, 600.0);
        assert!(p.pos.x >= p.radius);
        assert!(p.pos.y >= p.radius);

        p.pos = Vec2::new(790.0, 590.0);
        p.vel = Vec2::new(100.0, 100.0);
        p.integrate(1.0, 800.0, 600.0);
        assert!(p.pos.x <= 800.0 - p.radius);
        assert!(p.pos.y <= 600.0 - p.radius);
    }

    #[test]
    fn test_status_effects_expire() {
        let mut fx = StatusEffects {
            shield_ticks: 2.0,
            ..Default::default()
        };
        assert!(fx.shield_active());
        fx.tick(1.0);
        assert!(fx.shield_active());
        fx.tick(1.0);
        assert!(!fx.shield_active());
        fx.tick(1.0);
        assert_eq!(fx.shield_ticks, 0.0);
    }

    #[test]
    fn test_input_axes() {
        let mut input = InputState::default();
        input.set(Action::Rise, true);
        assert_eq!(input.vertical_axis(), -1.0);
        input.set(Action::Fall, true);
        assert_eq!(input.vertical_axis(), 0.0);
        input.set(Action::Right, true);
        assert_eq!(input.horizontal_axis(), 1.0);
    }
}
