//! Generic simulation engine
//!
//! One engine instance per minigame session. The caller drives it with
//! `update(dt)` then `draw(surface)` once per animation frame; input setters
//! record intent between frames. The trivia interrupt and terminal states are
//! data-flag checks at the top of `update()` - drawing keeps working so the
//! UI never freezes visually.

use std::fmt;

use glam::Vec2;
use serde::Serialize;

use super::events::GameEvent;
use super::planet::{Planet, PlanetId, Terminal};
use super::state::{Action, Core};
use super::trivia::TriviaState;
use crate::audio::{AudioSink, NullAudio, SoundEvent};
use crate::consts::{NOMINAL_DT, TRIVIA_SCORE, TRIVIA_SHIELD_TICKS, TRIVIA_STARDUST};
use crate::surface::{Color, DrawSurface};

/// Default particle pool size; the settings layer may lower it.
pub const DEFAULT_PARTICLE_CAP: usize = 256;

/// Construction failures. The one guarded input class: all spatial math
/// scales against the playfield dimensions, so zero/negative/non-finite
/// dimensions fail fast instead of poisoning every position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EngineError {
    BadDimensions { width: f32, height: f32 },
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::BadDimensions { width, height } => write!(
                f,
                "playfield dimensions must be positive and finite, got {}x{}",
                width, height
            ),
        }
    }
}

impl std::error::Error for EngineError {}

/// Read-only trivia view for the presentation layer.
#[derive(Debug, Clone, Serialize)]
pub struct TriviaView {
    pub question: &'static str,
    pub answers: [&'static str; 4],
    /// Index the player picked, once recorded
    pub answered: Option<usize>,
    /// Whether the recorded answer was correct
    pub correct: Option<bool>,
    /// Explanatory fact, revealed with feedback
    pub fact: Option<&'static str>,
    /// Ticks until auto-resume (feedback phase only)
    pub feedback_remaining: f32,
}

/// Per-planet metrics surfaced through the snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum PlanetStatsView {
    BlackHole {
        rescued: u32,
        lost: u32,
        carried: u32,
        capacity: u32,
        wave: u32,
    },
    StormRider {
        distance: f32,
        dodged: u32,
        survived_ticks: u64,
        speed: f32,
    },
    MachSurfer {
        distance: f32,
        speed: f32,
        is_supersonic: bool,
        booms: u32,
    },
    PressureDrop {
        depth: f32,
        layer: &'static str,
        hazard_multiplier: f32,
    },
}

/// Throttle-friendly state snapshot polled by the presentation layer.
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub planet: PlanetId,
    pub ticks: u64,
    pub score: u64,
    pub combo: f32,
    pub stardust_session: u32,
    pub stardust_total: u32,
    pub stardust_cap: u32,
    pub hull: f32,
    pub temperature: f32,
    pub lives: u8,
    pub shield_active: bool,
    pub is_paused: bool,
    pub show_trivia: bool,
    pub trivia: Option<TriviaView>,
    pub is_game_over: bool,
    pub victory: bool,
    pub stats: PlanetStatsView,
}

/// A planet minigame engine.
pub struct Engine<P: Planet> {
    pub core: Core,
    pub planet: P,
    trivia: TriviaState,
    audio: Box<dyn AudioSink>,
    particle_cap: usize,
}

impl<P: Planet> Engine<P> {
    /// Build a fresh session. Fails fast on bad dimensions.
    pub fn new(width: f32, height: f32, seed: u64, planet: P) -> Result<Self, EngineError> {
        Self::with_particle_cap(width, height, seed, planet, DEFAULT_PARTICLE_CAP)
    }

    pub fn with_particle_cap(
        width: f32,
        height: f32,
        seed: u64,
        mut planet: P,
        particle_cap: usize,
    ) -> Result<Self, EngineError> {
        if !(width.is_finite() && height.is_finite()) || width <= 0.0 || height <= 0.0 {
            return Err(EngineError::BadDimensions { width, height });
        }
        let profile = planet.profile();
        let mut core = Core::new(
            width,
            height,
            seed,
            0,
            profile.stardust_cap,
            profile.combo_ceiling,
            particle_cap,
        );
        planet.reset(&mut core);
        let trivia = TriviaState::new(profile.trivia_bank, seed, 0, profile.trivia_step);
        core.push_event(GameEvent::SessionStarted {
            planet: profile.id,
            session: 0,
        });
        log::info!("{}: session 0 started (seed {})", profile.id.as_str(), seed);
        Ok(Self {
            core,
            planet,
            trivia,
            audio: Box::new(NullAudio),
            particle_cap,
        })
    }

    /// Replace the audio sink (defaults to silence).
    pub fn set_audio(&mut self, sink: Box<dyn AudioSink>) {
        self.audio = sink;
    }

    /// Reinitialize as if newly constructed, discarding all in-flight
    /// entities, timers and trivia state. The trivia deck is reshuffled with
    /// a session-salted stream so repeat sessions differ.
    pub fn reset(&mut self) {
        let profile = self.planet.profile();
        let session = self.core.session + 1;
        self.core = Core::new(
            self.core.width,
            self.core.height,
            self.core.seed,
            session,
            profile.stardust_cap,
            profile.combo_ceiling,
            self.particle_cap,
        );
        self.planet.reset(&mut self.core);
        self.trivia = TriviaState::new(
            profile.trivia_bank,
            self.core.seed,
            session,
            profile.trivia_step,
        );
        self.core.push_event(GameEvent::SessionStarted {
            planet: profile.id,
            session,
        });
        log::info!("{}: session {} started", profile.id.as_str(), session);
    }

    /// Record pointer intent (logical coordinates, pre-scaled by the caller).
    /// Rejected after game over.
    pub fn set_pointer(&mut self, x: f32, y: f32) {
        if self.core.is_game_over {
            return;
        }
        self.core.input.pointer = Some(Vec2::new(x, y));
    }

    /// Record a logical action edge. Rejected after game over.
    pub fn set_action(&mut self, action: Action, pressed: bool) {
        if self.core.is_game_over {
            return;
        }
        self.core.input.set(action, pressed);
    }

    /// Advance one nominal frame.
    pub fn step(&mut self) {
        self.update(NOMINAL_DT);
    }

    /// Advance the simulation by `dt` frame units.
    ///
    /// No-op once game over. While a trivia question is up, everything except
    /// the feedback countdown is frozen.
    pub fn update(&mut self, dt: f32) {
        if !dt.is_finite() || dt <= 0.0 {
            return;
        }
        if self.core.is_game_over {
            return;
        }
        if self.trivia.active() {
            self.trivia.tick(dt);
            self.flush_cues();
            return;
        }

        self.core.ticks += 1;
        self.core.tick_effects(dt);

        self.planet.apply_forces(&mut self.core, dt);
        self.planet.spawn(&mut self.core, dt);
        self.planet.resolve_collisions(&mut self.core, dt);

        let gravity = self.planet.particle_gravity(&self.core);
        self.core.particles.update(dt, 0.98, gravity);

        let progress = self.planet.trivia_progress(&self.core);
        if self.trivia.maybe_trigger(progress) {
            self.core.cue(SoundEvent::Ping);
        }

        if let Some(outcome) = self.planet.check_terminal(&self.core) {
            self.finish(outcome);
        }

        self.flush_cues();
    }

    /// Record a trivia answer. Silent no-op when no question is active or an
    /// answer was already recorded; the presentation layer may race input
    /// against the state machine.
    pub fn answer_trivia(&mut self, index: usize) {
        if self.core.is_game_over {
            return;
        }
        let Some(outcome) = self.trivia.answer(index) else {
            return;
        };
        if outcome.correct {
            self.core.stardust.award(TRIVIA_STARDUST);
            self.core.score += TRIVIA_SCORE;
            let shield = &mut self.core.player.effects.shield_ticks;
            *shield = shield.max(TRIVIA_SHIELD_TICKS);
            self.core.cue(SoundEvent::TriviaCorrect);
        } else {
            self.core.break_combo();
            self.core.cue(SoundEvent::TriviaWrong);
        }
        self.planet.on_trivia_result(&mut self.core, outcome.correct);
        self.core.push_event(GameEvent::TriviaAnswered {
            correct: outcome.correct,
        });
        self.flush_cues();
    }

    /// Render the current frame. Pure read of state; drawing keeps working
    /// through trivia pauses and after game over (death frame).
    pub fn draw(&self, surface: &mut dyn DrawSurface) {
        self.planet.draw(&self.core, surface);
        if self.trivia.showing() {
            // Dim the field; the presentation layer renders the question card
            surface.fill_rect(
                Vec2::ZERO,
                Vec2::new(self.core.width, self.core.height),
                Color::BLACK.with_alpha(0.55),
            );
        }
    }

    /// Read-only snapshot for the presentation layer.
    pub fn snapshot(&self) -> Snapshot {
        let trivia = self.trivia.current().map(|q| {
            let answered = self.trivia.answered();
            TriviaView {
                question: q.question,
                answers: q.answers,
                answered,
                correct: answered.map(|_| self.trivia.was_correct()),
                fact: answered.map(|_| q.fact),
                feedback_remaining: self.trivia.feedback_remaining(),
            }
        });
        Snapshot {
            planet: self.planet.profile().id,
            ticks: self.core.ticks,
            score: self.core.score,
            combo: self.core.combo,
            stardust_session: self.core.stardust.session(),
            stardust_total: self.core.stardust.total(),
            stardust_cap: self.core.stardust.cap(),
            hull: self.core.player.hull,
            temperature: self.core.player.temperature,
            lives: self.core.player.lives,
            shield_active: self.core.player.effects.shield_active(),
            is_paused: self.trivia.active(),
            show_trivia: self.trivia.showing(),
            trivia,
            is_game_over: self.core.is_game_over,
            victory: self.core.victory,
            stats: self.planet.stats(&self.core),
        }
    }

    /// Drain queued terminal-boundary events for the shell to settle.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.core.events)
    }

    fn finish(&mut self, outcome: Terminal) {
        let profile = self.planet.profile();
        self.core.is_game_over = true;
        self.core.victory = outcome == Terminal::Victory;
        if self.core.victory {
            let bonus = self.planet.victory_bonus(&self.core);
            self.core.stardust.award_bonus(bonus);
            self.core.cue(SoundEvent::Victory);
        } else {
            self.core.cue(SoundEvent::GameOver);
        }
        self.core.push_event(GameEvent::SessionEnded {
            planet: profile.id,
            outcome,
            score: self.core.score,
            stardust: self.core.stardust.total(),
        });
        log::info!(
            "{}: session {} over ({:?}, score {}, stardust {})",
            profile.id.as_str(),
            self.core.session,
            outcome,
            self.core.score,
            self.core.stardust.total()
        );
    }

    fn flush_cues(&mut self) {
        for cue in self.core.cues.drain(..) {
            self.audio.play(cue);
        }
    }
}
