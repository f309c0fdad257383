//! Pressure drop
//!
//! A probe descending through Venus's atmosphere. The scroll rate grows with
//! depth up to a cap; each atmosphere layer multiplies how fast the hull
//! heats. Coolant keeps the temperature down - at 100 the hull itself starts
//! to cook until cooling or a shield intervenes. Touchdown wins.

use glam::Vec2;
use rand::Rng;

use crate::audio::SoundEvent;
use crate::sim::collision::circles_overlap;
use crate::sim::engine::PlanetStatsView;
use crate::sim::planet::{Planet, PlanetId, PlanetProfile, Terminal};
use crate::sim::spawner::{SpawnClock, WeightedTable};
use crate::sim::state::Core;
use crate::sim::trivia::TriviaQuestion;
use crate::surface::{Color, DrawSurface};

/// Descent rate (px/tick): base, growth per depth unit, hard cap
const BASE_DESCENT: f32 = 2.0;
const DESCENT_PER_DEPTH: f32 = 1.0 / 6_000.0;
const MAX_DESCENT: f32 = 5.0;

/// Heat accumulation per tick at hazard multiplier 1.0
const TEMP_RATE: f32 = 0.03;
/// Hull drain per tick while cooking (temperature at 100, no shield)
const OVERHEAT_DRAIN: f32 = 0.5;
/// Degrees removed by one coolant cell
const COOLANT_RELIEF: f32 = 18.0;

/// Horizontal handling
const STRAFE_ACCEL: f32 = 0.4;
const MAX_STRAFE_SPEED: f32 = 5.0;

const HIT_COOLDOWN: f32 = 50.0;
const ACID_DAMAGE: f32 = 15.0;
pub const TOUCHDOWN_DEPTH: f32 = 15_000.0;

pub const STARDUST_CAP: u32 = 60;

/// Atmosphere layers: (depth floor, name, hazard multiplier)
pub const LAYERS: &[(f32, &str, f32)] = &[
    (0.0, "Upper Haze", 0.5),
    (3_000.0, "Sulfur Veil", 1.0),
    (7_000.0, "Furnace Shelf", 1.8),
    (12_000.0, "Surface Approach", 2.6),
];

/// What rises past the descending probe. Rarity tracks reward value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SinkKind {
    /// Common: temperature relief
    Coolant,
    /// Uncommon: score and stardust
    ResearchPod,
    /// Rare: timed shield
    ShieldCore,
}

#[derive(Debug, Clone)]
pub struct SinkPickup {
    pub pos: Vec2,
    pub kind: SinkKind,
    pub collected: bool,
}

#[derive(Debug, Clone)]
pub struct AcidCloud {
    pub pos: Vec2,
    pub radius: f32,
    pub sway: f32,
}

/// The pressure drop minigame plugin.
pub struct PressureDrop {
    pub pickups: Vec<SinkPickup>,
    pub clouds: Vec<AcidCloud>,
    pub depth: f32,
    pub coolant_collected: u32,
    hit_cooldown: f32,
    pickup_clock: SpawnClock,
    hazard_clock: SpawnClock,
    pickup_table: WeightedTable<SinkKind>,
}

impl PressureDrop {
    pub fn new() -> Self {
        Self {
            pickups: Vec::new(),
            clouds: Vec::new(),
            depth: 0.0,
            coolant_collected: 0,
            hit_cooldown: 0.0,
            pickup_clock: SpawnClock::new(70.0, 32.0, 300.0),
            hazard_clock: SpawnClock::new(110.0, 40.0, 250.0),
            pickup_table: WeightedTable::new(&[
                (SinkKind::Coolant, 60),
                (SinkKind::ResearchPod, 30),
                (SinkKind::ShieldCore, 10),
            ]),
        }
    }

    fn player_y(core: &Core) -> f32 {
        core.height * 0.3
    }

    /// Descent rate grows with depth, capped.
    pub fn descent_rate(&self) -> f32 {
        (BASE_DESCENT + self.depth * DESCENT_PER_DEPTH).min(MAX_DESCENT)
    }

    /// Current atmosphere layer for the present depth.
    pub fn layer(&self) -> (&'static str, f32) {
        let mut current = (LAYERS[0].1, LAYERS[0].2);
        for &(floor, name, mult) in LAYERS {
            if self.depth >= floor {
                current = (name, mult);
            }
        }
        current
    }
}

impl Default for PressureDrop {
    fn default() -> Self {
        Self::new()
    }
}

impl Planet for PressureDrop {
    fn profile(&self) -> PlanetProfile {
        PlanetProfile {
            id: PlanetId::PressureDrop,
            stardust_cap: STARDUST_CAP,
            combo_ceiling: 5.0,
            trivia_step: 3_000,
            trivia_bank: TRIVIA_BANK,
        }
    }

    fn reset(&mut self, core: &mut Core) {
        self.pickups.clear();
        self.clouds.clear();
        self.depth = 0.0;
        self.coolant_collected = 0;
        self.hit_cooldown = 0.0;
        self.pickup_clock.rearm();
        self.hazard_clock.rearm();
        core.player.pos = Vec2::new(core.width / 2.0, Self::player_y(core));
        core.player.vel = Vec2::ZERO;
        core.player.hull = 100.0;
        core.player.temperature = 0.0;
    }

    fn apply_forces(&mut self, core: &mut Core, dt: f32) {
        self.hit_cooldown = (self.hit_cooldown - dt).max(0.0);

        let rate = self.descent_rate();
        self.depth += rate * dt;

        // Heat tracks the layer's hazard multiplier
        let (_, hazard) = self.layer();
        core.player.temperature = (core.player.temperature + TEMP_RATE * hazard * dt).min(100.0);

        // Cooking: at 100 with no shield, the hull drains every tick until
        // cooling or shielding intervenes
        if core.player.temperature >= 100.0 && !core.player.effects.shield_active() {
            core.player.hull = (core.player.hull - OVERHEAT_DRAIN * dt).max(0.0);
        }

        // Horizontal control; vertical position is fixed, the world rises
        let axis = core.input.horizontal_axis();
        core.player.vel.x += axis * STRAFE_ACCEL * dt;
        if let Some(target) = core.input.pointer {
            let dx = (target.x - core.player.pos.x).clamp(-1.0, 1.0);
            core.player.vel.x += dx * STRAFE_ACCEL * dt;
        }
        core.player.vel.x = core.player.vel.x.clamp(-MAX_STRAFE_SPEED, MAX_STRAFE_SPEED);
        core.player.vel.x *= 0.94_f32.powf(dt);
        core.player.vel.y = 0.0;
        core.player.pos.y = Self::player_y(core);
        core.player.integrate(dt, core.width, core.height);

        // World scrolls up past the probe
        for p in &mut self.pickups {
            p.pos.y -= rate * dt;
        }
        for c in &mut self.clouds {
            c.pos.y -= rate * dt;
            c.pos.x += c.sway * dt;
        }
    }

    fn spawn(&mut self, core: &mut Core, dt: f32) {
        let progress = self.depth;
        let spawn_y = core.height + 50.0;
        if self.pickup_clock.tick(dt, progress) {
            let kind = self.pickup_table.pick(&mut core.rng);
            let x = core.rng.random_range(30.0..core.width - 30.0);
            self.pickups.push(SinkPickup {
                pos: Vec2::new(x, spawn_y),
                kind,
                collected: false,
            });
        }
        if self.hazard_clock.tick(dt, progress) {
            let x = core.rng.random_range(40.0..core.width - 40.0);
            self.clouds.push(AcidCloud {
                pos: Vec2::new(x, spawn_y),
                radius: core.rng.random_range(24.0..44.0),
                sway: core.rng.random_range(-0.5..0.5),
            });
        }
    }

    fn resolve_collisions(&mut self, core: &mut Core, _dt: f32) {
        let player = core.player.pos;
        let player_r = core.player.radius;

        for p in &mut self.pickups {
            if p.collected || !circles_overlap(player, player_r, p.pos, 10.0) {
                continue;
            }
            p.collected = true;
            match p.kind {
                SinkKind::Coolant => {
                    core.player.temperature = (core.player.temperature - COOLANT_RELIEF).max(0.0);
                    self.coolant_collected += 1;
                    core.stardust.award(1);
                    core.score_with_combo(10);
                    core.bump_combo(0.1);
                }
                SinkKind::ResearchPod => {
                    core.stardust.award(2);
                    core.score_with_combo(40);
                    core.bump_combo(0.3);
                }
                SinkKind::ShieldCore => {
                    let shield = &mut core.player.effects.shield_ticks;
                    *shield = shield.max(420.0);
                }
            }
            core.cue(SoundEvent::Collect);
            let pos = p.pos;
            core.particles.burst(&mut core.rng, pos, 1, 8, 2.0);
        }
        self.pickups.retain(|p| !p.collected && p.pos.y > -40.0);

        let mut struck = false;
        for c in &self.clouds {
            if !struck
                && self.hit_cooldown <= 0.0
                && circles_overlap(player, player_r, c.pos, c.radius)
                && !core.player.effects.shield_active()
            {
                struck = true;
                core.player.hull = (core.player.hull - ACID_DAMAGE).max(0.0);
                core.break_combo();
                core.cue(SoundEvent::Crash);
                core.particles.burst(&mut core.rng, player, 4, 12, 2.5);
            }
        }
        if struck {
            self.hit_cooldown = HIT_COOLDOWN;
        }
        self.clouds.retain(|c| c.pos.y > -60.0);
    }

    fn check_terminal(&self, core: &Core) -> Option<Terminal> {
        if self.depth >= TOUCHDOWN_DEPTH {
            return Some(Terminal::Victory);
        }
        if core.player.hull <= 0.0 {
            return Some(Terminal::Defeat);
        }
        None
    }

    fn trivia_progress(&self, _core: &Core) -> u32 {
        self.depth as u32
    }

    fn on_trivia_result(&mut self, core: &mut Core, correct: bool) {
        if correct {
            // Flash-cool the hull as well as the usual shield bundle
            core.player.temperature = (core.player.temperature - COOLANT_RELIEF).max(0.0);
        }
    }

    fn stats(&self, _core: &Core) -> PlanetStatsView {
        let (layer, hazard_multiplier) = self.layer();
        PlanetStatsView::PressureDrop {
            depth: self.depth,
            layer,
            hazard_multiplier,
        }
    }

    fn particle_gravity(&self, _core: &Core) -> Vec2 {
        // Everything not held down drifts upward past the probe
        Vec2::new(0.0, -0.04)
    }

    fn draw(&self, core: &Core, surface: &mut dyn DrawSurface) {
        // Thicker, hotter haze the deeper we go
        let (_, hazard) = self.layer();
        let heat = (hazard / 2.6).clamp(0.0, 1.0);
        surface.clear(Color::rgb(0.5 + 0.3 * heat, 0.4 - 0.1 * heat, 0.25 - 0.1 * heat));
        surface.radial_gradient(
            Vec2::new(core.width / 2.0, core.height),
            0.0,
            core.height,
            Color::rgba(1.0, 0.5, 0.2, 0.25 * heat),
            Color::rgba(0.0, 0.0, 0.0, 0.0),
        );

        for c in &self.clouds {
            surface.fill_circle(c.pos, c.radius, Color::rgba(0.75, 0.75, 0.3, 0.8));
            surface.fill_circle(
                c.pos + Vec2::new(c.radius * 0.4, -c.radius * 0.3),
                c.radius * 0.6,
                Color::rgba(0.7, 0.7, 0.25, 0.8),
            );
        }

        for p in &self.pickups {
            match p.kind {
                SinkKind::Coolant => surface.fill_circle(p.pos, 7.0, Color::rgb(0.4, 0.8, 1.0)),
                SinkKind::ResearchPod => {
                    surface.fill_rect(
                        p.pos - Vec2::new(6.0, 6.0),
                        Vec2::new(12.0, 12.0),
                        Color::rgb(0.9, 0.9, 0.95),
                    );
                }
                SinkKind::ShieldCore => {
                    surface.stroke_circle(p.pos, 9.0, 2.0, Color::rgb(0.3, 0.9, 0.9))
                }
            }
        }

        for part in core.particles.iter() {
            let alpha = part.life.clamp(0.0, 1.0);
            surface.fill_circle(
                part.pos,
                part.size,
                Color::rgb(1.0, 0.8, 0.5).with_alpha(alpha),
            );
        }

        // The bathysphere
        let p = core.player.pos;
        let r = core.player.radius;
        surface.fill_circle(p, r, Color::rgb(0.85, 0.8, 0.75));
        surface.stroke_circle(p, r, 2.0, Color::rgb(0.4, 0.35, 0.3));
        if core.player.effects.shield_active() {
            surface.stroke_circle(p, r + 6.0, 2.0, Color::rgba(0.3, 0.9, 0.9, 0.8));
        }

        // Temperature bar runs hot along the right edge
        let bar_h = core.height * 0.4;
        let filled = bar_h * (core.player.temperature / 100.0);
        surface.stroke_rect(
            Vec2::new(core.width - 26.0, 40.0),
            Vec2::new(12.0, bar_h),
            1.0,
            Color::WHITE,
        );
        surface.fill_rect(
            Vec2::new(core.width - 26.0, 40.0 + bar_h - filled),
            Vec2::new(12.0, filled),
            Color::rgb(1.0, 0.3 + 0.5 * (1.0 - heat), 0.2),
        );

        let (layer_name, _) = self.layer();
        super::black_hole::draw_hud(
            core,
            surface,
            &[
                format!("DEPTH {:.0}/{:.0}", self.depth, TOUCHDOWN_DEPTH),
                format!("HULL {:.0}", core.player.hull),
                format!("TEMP {:.0}", core.player.temperature),
                layer_name.to_string(),
            ],
        );
    }
}

/// Question bank (external content table).
pub static TRIVIA_BANK: &[TriviaQuestion] = &[
    TriviaQuestion {
        question: "Which planet is the hottest in the solar system?",
        answers: ["Mercury", "Venus", "Mars", "Jupiter"],
        correct: 1,
        fact: "Venus's CO2 greenhouse keeps its surface near 465 C, hotter than Mercury.",
    },
    TriviaQuestion {
        question: "What are Venus's clouds made of?",
        answers: ["Water vapor", "Sulfuric acid", "Ammonia", "Dust"],
        correct: 1,
        fact: "Thick sulfuric-acid cloud decks hide the surface completely.",
    },
    TriviaQuestion {
        question: "How strong is the pressure at Venus's surface?",
        answers: ["Like Earth's", "About 90x Earth's", "Half of Earth's", "Nearly zero"],
        correct: 1,
        fact: "Standing on Venus feels like being 900 m deep in Earth's ocean.",
    },
    TriviaQuestion {
        question: "Which way does Venus rotate?",
        answers: ["Same as Earth", "Backwards (retrograde)", "It doesn't", "Sideways like Uranus"],
        correct: 1,
        fact: "On Venus the Sun rises in the west - the planet spins backwards, slowly.",
    },
    TriviaQuestion {
        question: "How long did the toughest landers survive on Venus?",
        answers: ["A few years", "About two hours", "Ten minutes", "A month"],
        correct: 1,
        fact: "Soviet Venera landers lasted at most ~2 hours before the heat won.",
    },
    TriviaQuestion {
        question: "A day on Venus compared to its year is...",
        answers: ["Much shorter", "Longer than its year", "Exactly equal", "Unknown"],
        correct: 1,
        fact: "Venus rotates once in 243 Earth days but orbits the Sun in 225.",
    },
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::Engine;

    fn engine() -> Engine<PressureDrop> {
        Engine::new(800.0, 600.0, 23, PressureDrop::new()).unwrap()
    }

    #[test]
    fn test_descent_rate_grows_and_caps() {
        let mut pd = PressureDrop::new();
        assert_eq!(pd.descent_rate(), BASE_DESCENT);
        pd.depth = 6_000.0;
        assert!(pd.descent_rate() > BASE_DESCENT);
        pd.depth = 1_000_000.0;
        assert_eq!(pd.descent_rate(), MAX_DESCENT);
    }

    #[test]
    fn test_layer_lookup() {
        let mut pd = PressureDrop::new();
        assert_eq!(pd.layer().0, "Upper Haze");
        pd.depth = 3_500.0;
        assert_eq!(pd.layer().0, "Sulfur Veil");
        pd.depth = 13_000.0;
        assert_eq!(pd.layer(), ("Surface Approach", 2.6));
    }

    #[test]
    fn test_overheat_drains_hull_until_cooled() {
        let mut e = engine();
        e.core.player.temperature = 100.0;
        let hull_before = e.core.player.hull;
        e.step();
        assert!(e.core.player.hull < hull_before);
        // Coolant pulls the temperature back under the line
        e.planet.pickups.push(SinkPickup {
            pos: e.core.player.pos,
            kind: SinkKind::Coolant,
            collected: false,
        });
        e.step();
        assert!(e.core.player.temperature < 100.0);
        let hull_after_cooling = e.core.player.hull;
        e.step();
        // No longer cooking (temperature re-rises slowly, far from 100)
        assert_eq!(e.core.player.hull, hull_after_cooling);
    }

    #[test]
    fn test_shield_stops_overheat_drain() {
        let mut e = engine();
        e.core.player.temperature = 100.0;
        e.core.player.effects.shield_ticks = 50.0;
        let hull = e.core.player.hull;
        e.step();
        assert_eq!(e.core.player.hull, hull);
    }

    #[test]
    fn test_overheat_runs_hull_to_game_over() {
        let mut e = engine();
        e.core.player.temperature = 100.0;
        e.core.player.hull = 1.0;
        for _ in 0..10 {
            e.step();
            if e.core.is_game_over {
                break;
            }
        }
        assert!(e.core.is_game_over);
        assert!(!e.core.victory);
    }

    #[test]
    fn test_touchdown_wins() {
        let mut e = engine();
        e.planet.depth = TOUCHDOWN_DEPTH - 1.0;
        e.step();
        assert!(e.core.is_game_over);
        assert!(e.core.victory);
    }

    #[test]
    fn test_acid_cloud_damage_respects_shield() {
        let mut e = engine();
        e.planet.clouds.push(AcidCloud {
            pos: e.core.player.pos,
            radius: 30.0,
            sway: 0.0,
        });
        e.core.player.effects.shield_ticks = 100.0;
        e.step();
        assert_eq!(e.core.player.hull, 100.0);

        e.core.player.effects.shield_ticks = 0.0;
        e.planet.clouds.push(AcidCloud {
            pos: e.core.player.pos,
            radius: 30.0,
            sway: 0.0,
        });
        e.step();
        assert_eq!(e.core.player.hull, 100.0 - ACID_DAMAGE);
    }
}
