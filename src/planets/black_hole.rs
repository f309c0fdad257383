//! Black hole rescue
//!
//! A singularity sits at the center of the field. Astronauts, stardust motes
//! and shield cells drift in from the edges and are dragged toward the event
//! horizon; the player ferries astronauts to the rescue station before they
//! (or the player) cross it. Debris shares the field and punishes careless
//! routing.

use glam::Vec2;
use rand::Rng;

use crate::audio::SoundEvent;
use crate::clamp_speed;
use crate::sim::collision::circles_overlap;
use crate::sim::engine::PlanetStatsView;
use crate::sim::planet::{Planet, PlanetId, PlanetProfile, Terminal};
use crate::sim::spawner::{SpawnClock, WeightedTable};
use crate::sim::state::Core;
use crate::sim::trivia::TriviaQuestion;
use crate::surface::{Color, DrawSurface};

/// Gravity well geometry
const PULL_RADIUS: f32 = 260.0;
const EVENT_HORIZON: f32 = 36.0;
/// Pull strength: base, per-wave increase, hard cap
const BASE_PULL: f32 = 0.055;
const PULL_PER_WAVE: f32 = 0.008;
const MAX_PULL: f32 = 0.16;

/// Player handling
const PLAYER_ACCEL: f32 = 0.32;
const PLAYER_MAX_SPEED: f32 = 4.6;
/// Invulnerability window after a debris hit (ticks)
const HIT_COOLDOWN: f32 = 45.0;
const DEBRIS_DAMAGE: f32 = 20.0;

/// Rescue loop
const BASE_CARRY_CAPACITY: u32 = 3;
const CARRY_BOOST_BONUS: u32 = 2;
const STATION_RADIUS: f32 = 46.0;
pub const RESCUE_GOAL: u32 = 50;
pub const MAX_LOST: u32 = 5;

const DRIFTER_RADIUS: f32 = 10.0;
const DEBRIS_RADIUS: f32 = 12.0;

/// Session stardust cap for this planet
pub const STARDUST_CAP: u32 = 150;

/// What drifts in from the edges. Rarity tracks reward value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriftKind {
    /// Common: the rescue objective
    Astronaut,
    /// Uncommon: session stardust
    Mote,
    /// Rare: timed shield
    ShieldCell,
}

#[derive(Debug, Clone)]
pub struct Drifter {
    pub pos: Vec2,
    pub vel: Vec2,
    pub kind: DriftKind,
    /// Scored/picked exactly once; gates removal
    pub collected: bool,
}

#[derive(Debug, Clone)]
pub struct Debris {
    pub pos: Vec2,
    pub vel: Vec2,
}

/// The black hole minigame plugin.
pub struct BlackHole {
    pub drifters: Vec<Drifter>,
    pub debris: Vec<Debris>,
    /// Astronauts on board, waiting for delivery
    pub carried: u32,
    pub rescued: u32,
    pub lost: u32,
    pub has_escaped: bool,
    hit_cooldown: f32,
    drifter_clock: SpawnClock,
    hazard_clock: SpawnClock,
    drift_table: WeightedTable<DriftKind>,
}

impl BlackHole {
    pub fn new() -> Self {
        Self {
            drifters: Vec::new(),
            debris: Vec::new(),
            carried: 0,
            rescued: 0,
            lost: 0,
            has_escaped: false,
            hit_cooldown: 0.0,
            drifter_clock: SpawnClock::new(110.0, 38.0, 1.0),
            hazard_clock: SpawnClock::new(170.0, 60.0, 0.8),
            drift_table: WeightedTable::new(&[
                (DriftKind::Astronaut, 60),
                (DriftKind::Mote, 30),
                (DriftKind::ShieldCell, 10),
            ]),
        }
    }

    fn center(core: &Core) -> Vec2 {
        Vec2::new(core.width / 2.0, core.height / 2.0)
    }

    /// Rescue station, tucked into the calm corner outside the pull radius.
    fn station(core: &Core) -> Vec2 {
        Vec2::new(core.width * 0.14, core.height * 0.18)
    }

    /// Difficulty wave; the pull tightens as rescues accumulate.
    pub fn wave(&self) -> u32 {
        self.rescued / 10
    }

    fn pull_strength(&self) -> f32 {
        (BASE_PULL + self.wave() as f32 * PULL_PER_WAVE).min(MAX_PULL)
    }

    pub fn carry_capacity(&self, core: &Core) -> u32 {
        if core.player.effects.carry_boost_active() {
            BASE_CARRY_CAPACITY + CARRY_BOOST_BONUS
        } else {
            BASE_CARRY_CAPACITY
        }
    }

    /// Spawn on a ring just inside the field edge, drifting loosely inward.
    fn spawn_point(core: &mut Core) -> (Vec2, Vec2) {
        let center = Self::center(core);
        let ring = core.width.min(core.height) * 0.48;
        let angle = core.rng.random_range(0.0..std::f32::consts::TAU);
        let pos = center + Vec2::new(angle.cos(), angle.sin()) * ring;
        let inward = (center - pos).normalize();
        let skew = core.rng.random_range(-0.6..0.6);
        let tangent = Vec2::new(-inward.y, inward.x);
        let speed = core.rng.random_range(0.4..1.0);
        let vel = (inward + tangent * skew).normalize() * speed;
        (pos, vel)
    }

    fn offscreen(core: &Core, pos: Vec2) -> bool {
        pos.x < -60.0 || pos.x > core.width + 60.0 || pos.y < -60.0 || pos.y > core.height + 60.0
    }
}

impl Default for BlackHole {
    fn default() -> Self {
        Self::new()
    }
}

impl Planet for BlackHole {
    fn profile(&self) -> PlanetProfile {
        PlanetProfile {
            id: PlanetId::BlackHole,
            stardust_cap: STARDUST_CAP,
            combo_ceiling: 8.0,
            trivia_step: 10,
            trivia_bank: TRIVIA_BANK,
        }
    }

    fn reset(&mut self, core: &mut Core) {
        self.drifters.clear();
        self.debris.clear();
        self.carried = 0;
        self.rescued = 0;
        self.lost = 0;
        self.has_escaped = false;
        self.hit_cooldown = 0.0;
        self.drifter_clock.rearm();
        self.hazard_clock.rearm();
        // Probe starts beside the station, outside the pull
        core.player.pos = Self::station(core) + Vec2::new(40.0, 30.0);
        core.player.vel = Vec2::ZERO;
    }

    fn apply_forces(&mut self, core: &mut Core, dt: f32) {
        self.hit_cooldown = (self.hit_cooldown - dt).max(0.0);

        let center = Self::center(core);
        let k = self.pull_strength();

        // Player: steer toward pointer intent, then feel the well
        if let Some(target) = core.input.pointer {
            core.player
                .steer_toward(target, PLAYER_ACCEL, PLAYER_MAX_SPEED, dt);
        }
        attract(k, center, core.player.pos, &mut core.player.vel, dt);
        core.player.vel = clamp_speed(core.player.vel, 0.0, PLAYER_MAX_SPEED);
        core.player.integrate(dt, core.width, core.height);

        // Entities feel the same field
        for d in &mut self.drifters {
            attract(k, center, d.pos, &mut d.vel, dt);
            d.vel = clamp_speed(d.vel, 0.0, 3.2);
            d.pos += d.vel * dt;
        }
        for d in &mut self.debris {
            attract(k, center, d.pos, &mut d.vel, dt);
            d.vel = clamp_speed(d.vel, 0.0, 3.6);
            d.pos += d.vel * dt;
        }
    }

    fn spawn(&mut self, core: &mut Core, dt: f32) {
        let progress = self.rescued as f32;
        if self.drifter_clock.tick(dt, progress) {
            let kind = self.drift_table.pick(&mut core.rng);
            let (pos, vel) = Self::spawn_point(core);
            self.drifters.push(Drifter {
                pos,
                vel,
                kind,
                collected: false,
            });
        }
        if self.hazard_clock.tick(dt, progress) {
            let (pos, vel) = Self::spawn_point(core);
            self.debris.push(Debris {
                pos,
                vel: vel * 1.4,
            });
        }
    }

    fn resolve_collisions(&mut self, core: &mut Core, _dt: f32) {
        let center = Self::center(core);
        let station = Self::station(core);
        let player = core.player.pos;
        let player_r = core.player.radius;
        let capacity = self.carry_capacity(core);

        // Drifters: collect, fall into the hole, or drift away
        let mut consumed = Vec::new();
        for (i, d) in self.drifters.iter_mut().enumerate() {
            if d.collected {
                consumed.push(i);
                continue;
            }
            if circles_overlap(player, player_r, d.pos, DRIFTER_RADIUS) {
                match d.kind {
                    DriftKind::Astronaut => {
                        if self.carried < capacity {
                            d.collected = true;
                            self.carried += 1;
                            core.score_with_combo(25);
                            core.bump_combo(0.25);
                            core.cue(SoundEvent::Collect);
                            let pos = d.pos;
                            core.particles.burst(&mut core.rng, pos, 2, 8, 2.0);
                        }
                        // At capacity: leave them drifting, come back later
                    }
                    DriftKind::Mote => {
                        d.collected = true;
                        core.stardust.award(1);
                        core.score_with_combo(10);
                        core.bump_combo(0.1);
                        core.cue(SoundEvent::Collect);
                    }
                    DriftKind::ShieldCell => {
                        d.collected = true;
                        let shield = &mut core.player.effects.shield_ticks;
                        *shield = shield.max(360.0);
                        core.cue(SoundEvent::Collect);
                    }
                }
            } else if d.pos.distance(center) <= EVENT_HORIZON {
                if d.kind == DriftKind::Astronaut {
                    self.lost += 1;
                    core.break_combo();
                    core.cue(SoundEvent::Crash);
                    let pos = d.pos;
                    core.particles.burst(&mut core.rng, pos, 4, 10, 2.5);
                }
                consumed.push(i);
            } else if Self::offscreen(core, d.pos) {
                consumed.push(i);
            }
        }
        for i in consumed.into_iter().rev() {
            self.drifters.remove(i);
        }

        // Debris: damage with an invulnerability window. A hit while carrying
        // ejects one passenger back into the field instead of destroying it
        // (drop-one-passenger penalty; preserved pending product review).
        let mut ejected: Option<Vec2> = None;
        let mut debris = std::mem::take(&mut self.debris);
        debris.retain(|d| {
            if d.pos.distance(center) <= EVENT_HORIZON || Self::offscreen(core, d.pos) {
                return false;
            }
            if circles_overlap(player, player_r, d.pos, DEBRIS_RADIUS) {
                if core.player.effects.shield_active() {
                    // Shield suppresses damage only; the rock shatters
                    core.cue(SoundEvent::Collect);
                    core.particles.burst(&mut core.rng, d.pos, 5, 6, 2.0);
                    return false;
                }
                if self.hit_cooldown <= 0.0 {
                    self.hit_cooldown = HIT_COOLDOWN;
                    core.player.hull = (core.player.hull - DEBRIS_DAMAGE).max(0.0);
                    core.break_combo();
                    core.cue(SoundEvent::Crash);
                    core.particles.burst(&mut core.rng, d.pos, 4, 12, 3.0);
                    if self.carried > 0 {
                        self.carried -= 1;
                        ejected = Some(d.pos);
                    }
                    return false;
                }
            }
            true
        });
        self.debris = debris;
        if let Some(from) = ejected {
            let away = (from - center).normalize_or(Vec2::X);
            self.drifters.push(Drifter {
                pos: from + away * 20.0,
                vel: away * 1.2,
                kind: DriftKind::Astronaut,
                collected: false,
            });
        }

        // Delivery: batch-score everyone on board
        if self.carried > 0 && circles_overlap(player, player_r, station, STATION_RADIUS) {
            let delivered = self.carried;
            self.carried = 0;
            self.rescued += delivered;
            core.score_with_combo(150 * delivered as u64);
            core.stardust.award(2 * delivered);
            core.bump_combo(0.5);
            core.cue(SoundEvent::LevelUp);
            core.particles.ring(&mut core.rng, station, STATION_RADIUS, 3, 18);
            if self.rescued >= RESCUE_GOAL {
                self.has_escaped = true;
            }
        }
    }

    fn check_terminal(&self, core: &Core) -> Option<Terminal> {
        if self.rescued >= RESCUE_GOAL {
            return Some(Terminal::Victory);
        }
        if core.player.pos.distance(Self::center(core)) < EVENT_HORIZON {
            // Lethal zone, not damage: the shield does not apply
            return Some(Terminal::Defeat);
        }
        if core.player.hull <= 0.0 || self.lost >= MAX_LOST {
            return Some(Terminal::Defeat);
        }
        None
    }

    fn trivia_progress(&self, _core: &Core) -> u32 {
        self.rescued
    }

    fn on_trivia_result(&mut self, core: &mut Core, correct: bool) {
        if correct {
            let boost = &mut core.player.effects.carry_boost_ticks;
            *boost = boost.max(900.0);
        }
    }

    fn victory_bonus(&self, core: &Core) -> u32 {
        5000 + (core.score / 50) as u32
    }

    fn stats(&self, core: &Core) -> PlanetStatsView {
        PlanetStatsView::BlackHole {
            rescued: self.rescued,
            lost: self.lost,
            carried: self.carried,
            capacity: self.carry_capacity(core),
            wave: self.wave(),
        }
    }

    fn draw(&self, core: &Core, surface: &mut dyn DrawSurface) {
        let center = Self::center(core);
        let station = Self::station(core);

        surface.clear(Color::rgb(0.02, 0.01, 0.05));

        // The well: glow out to the pull radius, hard black core
        surface.radial_gradient(
            center,
            EVENT_HORIZON,
            PULL_RADIUS,
            Color::rgba(0.35, 0.1, 0.5, 0.6),
            Color::rgba(0.0, 0.0, 0.0, 0.0),
        );
        surface.fill_circle(center, EVENT_HORIZON, Color::BLACK);
        surface.stroke_circle(center, EVENT_HORIZON + 2.0, 2.0, Color::rgb(0.8, 0.4, 1.0));
        surface.stroke_circle(
            center,
            PULL_RADIUS,
            1.0,
            Color::rgba(0.5, 0.3, 0.7, 0.25),
        );

        // Rescue station
        surface.stroke_circle(station, STATION_RADIUS, 3.0, Color::rgb(0.3, 0.9, 0.5));
        surface.text(
            station + Vec2::new(-22.0, 4.0),
            12.0,
            Color::rgb(0.3, 0.9, 0.5),
            "RESCUE",
        );

        for d in &self.debris {
            surface.fill_circle(d.pos, DEBRIS_RADIUS, Color::rgb(0.45, 0.4, 0.38));
        }
        for d in &self.drifters {
            match d.kind {
                DriftKind::Astronaut => {
                    surface.fill_circle(d.pos, DRIFTER_RADIUS, Color::rgb(0.95, 0.95, 1.0));
                    surface.stroke_circle(d.pos, DRIFTER_RADIUS + 2.0, 1.0, Color::rgb(0.6, 0.8, 1.0));
                }
                DriftKind::Mote => {
                    surface.fill_circle(d.pos, 4.0, Color::rgb(1.0, 0.9, 0.3));
                }
                DriftKind::ShieldCell => {
                    surface.stroke_circle(d.pos, DRIFTER_RADIUS, 2.0, Color::rgb(0.3, 0.9, 0.9));
                }
            }
        }

        for p in core.particles.iter() {
            let alpha = p.life.clamp(0.0, 1.0);
            surface.fill_circle(p.pos, p.size, palette(p.color).with_alpha(alpha));
        }

        // Player probe: a triangle nosing along its velocity
        let dir = core.player.vel.normalize_or(Vec2::X);
        let side = Vec2::new(-dir.y, dir.x);
        let p = core.player.pos;
        let r = core.player.radius;
        surface.fill_polygon(
            &[p + dir * r, p - dir * r * 0.7 + side * r * 0.7, p - dir * r * 0.7 - side * r * 0.7],
            Color::rgb(0.9, 0.85, 0.7),
        );
        if core.player.effects.shield_active() {
            surface.stroke_circle(p, r + 6.0, 2.0, Color::rgba(0.3, 0.9, 0.9, 0.8));
        }

        draw_hud(core, surface, &[
            format!("RESCUED {}/{}", self.rescued, RESCUE_GOAL),
            format!("ABOARD {}", self.carried),
            format!("LOST {}/{}", self.lost, MAX_LOST),
            format!("HULL {:.0}", core.player.hull),
        ]);
    }

}

/// Radial attractor: `k * (1 - dist/pull_radius)` toward the center, applied
/// only inside the annulus between the horizon and the pull radius.
fn attract(k: f32, center: Vec2, pos: Vec2, vel: &mut Vec2, dt: f32) {
    let to_center = center - pos;
    let dist = to_center.length();
    if dist > EVENT_HORIZON && dist < PULL_RADIUS {
        let strength = k * (1.0 - dist / PULL_RADIUS);
        *vel += to_center.normalize() * strength * dt;
    }
}

fn palette(index: u32) -> Color {
    match index {
        0 => Color::WHITE,
        2 => Color::rgb(0.6, 0.8, 1.0),
        3 => Color::rgb(0.3, 0.9, 0.5),
        4 => Color::rgb(1.0, 0.5, 0.2),
        5 => Color::rgb(0.45, 0.4, 0.38),
        _ => Color::rgb(1.0, 0.9, 0.3),
    }
}

/// Shared HUD strip along the top edge.
pub(crate) fn draw_hud(core: &Core, surface: &mut dyn DrawSurface, extra: &[String]) {
    let mut x = 12.0;
    let mut put = |surface: &mut dyn DrawSurface, s: &str| {
        surface.text(Vec2::new(x, 20.0), 14.0, Color::WHITE, s);
        x += 12.0 * s.len() as f32 + 18.0;
    };
    put(surface, &format!("SCORE {}", core.score));
    put(surface, &format!("x{:.1}", core.combo));
    put(
        surface,
        &format!("STARDUST {}/{}", core.stardust.session(), core.stardust.cap()),
    );
    for s in extra {
        put(surface, s);
    }
}

/// Question bank (external content table; answers index into `answers`).
pub static TRIVIA_BANK: &[TriviaQuestion] = &[
    TriviaQuestion {
        question: "What marks the point of no return around a black hole?",
        answers: ["The photon belt", "The event horizon", "The accretion rim", "The ergo line"],
        correct: 1,
        fact: "Inside the event horizon, escape velocity exceeds the speed of light.",
    },
    TriviaQuestion {
        question: "What powers the bright disk around many black holes?",
        answers: ["Burning hydrogen", "Infalling matter heating up", "Starlight reflection", "Magnetic sparks"],
        correct: 1,
        fact: "Friction in the accretion disk heats gas to millions of degrees.",
    },
    TriviaQuestion {
        question: "What is at the center of the Milky Way?",
        answers: ["A neutron star", "A supermassive black hole", "A white dwarf", "Empty space"],
        correct: 1,
        fact: "Sagittarius A* has about four million times the Sun's mass.",
    },
    TriviaQuestion {
        question: "What happens to time near a strong gravity well?",
        answers: ["It speeds up", "It slows down", "It stops everywhere", "Nothing changes"],
        correct: 1,
        fact: "Clocks deeper in a gravity well tick slower - gravitational time dilation.",
    },
    TriviaQuestion {
        question: "What is 'spaghettification'?",
        answers: ["A cooking method", "Tidal stretching near a singularity", "Orbit decay", "Light bending"],
        correct: 1,
        fact: "Tidal forces stretch objects radially as they fall toward the singularity.",
    },
    TriviaQuestion {
        question: "How do astronomers photograph a black hole?",
        answers: ["X-ray film", "Linking radio telescopes worldwide", "Space probes", "They cannot"],
        correct: 1,
        fact: "The Event Horizon Telescope imaged M87* by combining dishes across Earth.",
    },
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::Engine;

    fn engine() -> Engine<BlackHole> {
        Engine::new(800.0, 600.0, 42, BlackHole::new()).unwrap()
    }

    #[test]
    fn test_delivery_completes_rescue_goal() {
        let mut e = engine();
        e.planet.rescued = RESCUE_GOAL - 1;
        e.planet.carried = 1;
        let station = BlackHole::station(&e.core);
        e.core.player.pos = station;
        let score_before = e.core.score;
        e.step();
        assert!(e.core.is_game_over);
        assert!(e.core.victory);
        assert!(e.planet.has_escaped);
        assert_eq!(e.planet.rescued, RESCUE_GOAL);
        assert!(e.core.score > score_before);
        // Bonus is 5000 + score/50, exactly once, outside the session cap
        let expected_bonus = 5000 + (e.core.score / 50) as u32;
        assert_eq!(
            e.core.stardust.total(),
            e.core.stardust.session() + expected_bonus
        );
        // Further updates cannot re-award
        let total = e.core.stardust.total();
        e.step();
        assert_eq!(e.core.stardust.total(), total);
    }

    #[test]
    fn test_debris_hit_ejects_one_passenger() {
        let mut e = engine();
        e.planet.carried = 2;
        e.core.player.pos = Vec2::new(120.0, 420.0);
        e.planet.debris.push(Debris {
            pos: e.core.player.pos,
            vel: Vec2::ZERO,
        });
        let astronauts_before = e
            .planet
            .drifters
            .iter()
            .filter(|d| d.kind == DriftKind::Astronaut)
            .count();
        e.step();
        assert_eq!(e.planet.carried, 1);
        assert_eq!(e.core.player.hull, 100.0 - DEBRIS_DAMAGE);
        // The passenger went back into the world, not into the void
        let astronauts_after = e
            .planet
            .drifters
            .iter()
            .filter(|d| d.kind == DriftKind::Astronaut)
            .count();
        assert_eq!(astronauts_after, astronauts_before + 1);
    }

    #[test]
    fn test_shield_suppresses_damage_not_collection() {
        let mut e = engine();
        e.core.player.effects.shield_ticks = 100.0;
        e.core.player.pos = Vec2::new(120.0, 420.0);
        e.planet.debris.push(Debris {
            pos: e.core.player.pos,
            vel: Vec2::ZERO,
        });
        e.planet.drifters.push(Drifter {
            pos: e.core.player.pos,
            vel: Vec2::ZERO,
            kind: DriftKind::Mote,
            collected: false,
        });
        e.step();
        assert_eq!(e.core.player.hull, 100.0);
        assert!(e.planet.debris.is_empty());
        // Collection still went through
        assert_eq!(e.core.stardust.session(), 1);
    }

    #[test]
    fn test_event_horizon_is_lethal_even_with_shield() {
        let mut e = engine();
        e.core.player.effects.shield_ticks = 1_000.0;
        e.core.player.pos = BlackHole::center(&e.core);
        e.step();
        assert!(e.core.is_game_over);
        assert!(!e.core.victory);
    }

    #[test]
    fn test_lost_rescues_threshold_ends_game() {
        let mut e = engine();
        e.planet.lost = MAX_LOST - 1;
        let center = BlackHole::center(&e.core);
        e.planet.drifters.push(Drifter {
            pos: center + Vec2::new(EVENT_HORIZON - 5.0, 0.0),
            vel: Vec2::ZERO,
            kind: DriftKind::Astronaut,
            collected: false,
        });
        // A few ticks for the astronaut to cross the horizon
        for _ in 0..5 {
            e.step();
        }
        assert!(e.planet.lost >= MAX_LOST);
        assert!(e.core.is_game_over);
    }

    #[test]
    fn test_astronaut_not_picked_up_at_capacity() {
        let mut e = engine();
        e.planet.carried = BASE_CARRY_CAPACITY;
        e.core.player.pos = Vec2::new(120.0, 420.0);
        e.planet.drifters.push(Drifter {
            pos: e.core.player.pos,
            vel: Vec2::ZERO,
            kind: DriftKind::Astronaut,
            collected: false,
        });
        e.step();
        assert_eq!(e.planet.carried, BASE_CARRY_CAPACITY);
        assert!(e.planet.drifters.iter().any(|d| !d.collected));
    }

    #[test]
    fn test_carry_boost_raises_capacity() {
        let mut e = engine();
        assert_eq!(e.planet.carry_capacity(&e.core), BASE_CARRY_CAPACITY);
        e.core.player.effects.carry_boost_ticks = 100.0;
        assert_eq!(
            e.planet.carry_capacity(&e.core),
            BASE_CARRY_CAPACITY + CARRY_BOOST_BONUS
        );
    }

    #[test]
    fn test_pull_rises_with_wave_but_caps() {
        let mut bh = BlackHole::new();
        let base = bh.pull_strength();
        bh.rescued = 30;
        assert!(bh.pull_strength() > base);
        bh.rescued = 10_000;
        assert!(bh.pull_strength() <= MAX_PULL);
    }
}
