//! Storm rider
//!
//! Skimming Jupiter's cloud tops. Storm cells scroll in from the right and
//! must be dodged; rectangular wind lanes push the scroll speed toward a cap
//! (tailwind) or a floor (headwind), never below the minimum. Surviving the
//! full run wins; three storm strikes end it.

use glam::Vec2;
use rand::Rng;

use crate::approach;
use crate::audio::SoundEvent;
use crate::sim::collision::{circle_aabb_overlap, circles_overlap, Aabb};
use crate::sim::engine::PlanetStatsView;
use crate::sim::planet::{Planet, PlanetId, PlanetProfile, Terminal};
use crate::sim::spawner::{SpawnClock, WeightedTable};
use crate::sim::state::Core;
use crate::sim::trivia::TriviaQuestion;
use crate::surface::{Color, DrawSurface};

/// Scroll speed band (px/tick). The floor prevents a headwind soft-lock.
const MIN_SPEED: f32 = 2.0;
const BASE_SPEED: f32 = 4.0;
const MAX_SPEED: f32 = 9.0;
/// Drift back toward cruise when no lane applies
const SPEED_RELAX: f32 = 0.02;
/// Signed lane deltas per tick
const TAILWIND_PUSH: f32 = 0.08;
const HEADWIND_DRAG: f32 = 0.06;

/// Player vertical handling
const CLIMB_ACCEL: f32 = 0.35;
const MAX_CLIMB_SPEED: f32 = 5.0;

const HIT_COOLDOWN: f32 = 60.0;
/// Ticks of survival for the win (~2 minutes at 60 fps)
pub const SURVIVAL_GOAL: f32 = 7200.0;
pub const STARTING_LIVES: u8 = 3;
/// Slow-mode duration from a correct trivia answer (storms at half speed)
const SLOW_TICKS: f32 = 600.0;

pub const STARDUST_CAP: u32 = 80;

/// Collectibles riding the jet streams. Rarity tracks reward value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkyKind {
    /// Common: stardust
    HeliumCell,
    /// Uncommon: score
    IonCharge,
    /// Rare: timed shield
    ShieldOrb,
}

#[derive(Debug, Clone)]
pub struct SkyPickup {
    pub pos: Vec2,
    pub kind: SkyKind,
    pub collected: bool,
}

#[derive(Debug, Clone)]
pub struct Storm {
    pub pos: Vec2,
    pub drift: f32,
    pub radius: f32,
    /// Dodge scored exactly once when the cell clears the player
    pub passed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaneKind {
    Tailwind,
    Headwind,
}

#[derive(Debug, Clone)]
pub struct WindLane {
    pub zone: Aabb,
    pub kind: LaneKind,
}

/// The storm rider minigame plugin.
pub struct StormRider {
    pub storms: Vec<Storm>,
    pub pickups: Vec<SkyPickup>,
    pub lanes: Vec<WindLane>,
    /// Current scroll speed (px/tick)
    pub speed: f32,
    pub distance: f32,
    pub dodged: u32,
    pub survived: f32,
    hit_cooldown: f32,
    storm_clock: SpawnClock,
    pickup_clock: SpawnClock,
    lane_clock: SpawnClock,
    pickup_table: WeightedTable<SkyKind>,
}

impl StormRider {
    pub fn new() -> Self {
        Self {
            storms: Vec::new(),
            pickups: Vec::new(),
            lanes: Vec::new(),
            speed: BASE_SPEED,
            distance: 0.0,
            dodged: 0,
            survived: 0.0,
            hit_cooldown: 0.0,
            storm_clock: SpawnClock::new(90.0, 30.0, 600.0),
            pickup_clock: SpawnClock::new(75.0, 40.0, 900.0),
            lane_clock: SpawnClock::new(320.0, 160.0, 400.0),
            pickup_table: WeightedTable::new(&[
                (SkyKind::HeliumCell, 60),
                (SkyKind::IonCharge, 30),
                (SkyKind::ShieldOrb, 10),
            ]),
        }
    }

    fn player_x(core: &Core) -> f32 {
        core.width * 0.25
    }

    /// Storm speed relative to the world, halved under slow-mode.
    fn storm_rate(&self, core: &Core) -> f32 {
        if core.player.effects.slow_ticks > 0.0 {
            self.speed * 0.5
        } else {
            self.speed
        }
    }
}

impl Default for StormRider {
    fn default() -> Self {
        Self::new()
    }
}

impl Planet for StormRider {
    fn profile(&self) -> PlanetProfile {
        PlanetProfile {
            id: PlanetId::StormRider,
            stardust_cap: STARDUST_CAP,
            combo_ceiling: 6.0,
            trivia_step: 15,
            trivia_bank: TRIVIA_BANK,
        }
    }

    fn reset(&mut self, core: &mut Core) {
        self.storms.clear();
        self.pickups.clear();
        self.lanes.clear();
        self.speed = BASE_SPEED;
        self.distance = 0.0;
        self.dodged = 0;
        self.survived = 0.0;
        self.hit_cooldown = 0.0;
        self.storm_clock.rearm();
        self.pickup_clock.rearm();
        self.lane_clock.rearm();
        core.player.pos = Vec2::new(Self::player_x(core), core.height / 2.0);
        core.player.vel = Vec2::ZERO;
        core.player.lives = STARTING_LIVES;
    }

    fn apply_forces(&mut self, core: &mut Core, dt: f32) {
        self.hit_cooldown = (self.hit_cooldown - dt).max(0.0);
        self.survived += dt;

        // Lane wind on the scroll speed; relax toward cruise otherwise
        let mut in_lane = false;
        for lane in &self.lanes {
            if circle_aabb_overlap(core.player.pos, core.player.radius, &lane.zone) {
                in_lane = true;
                match lane.kind {
                    LaneKind::Tailwind => {
                        self.speed = (self.speed + TAILWIND_PUSH * dt).min(MAX_SPEED)
                    }
                    LaneKind::Headwind => {
                        self.speed = (self.speed - HEADWIND_DRAG * dt).max(MIN_SPEED)
                    }
                }
            }
        }
        if !in_lane {
            self.speed = approach(self.speed, BASE_SPEED, SPEED_RELAX * dt);
        }
        // Clamp regardless of how many lanes overlapped this tick
        self.speed = self.speed.clamp(MIN_SPEED, MAX_SPEED);
        self.distance += self.speed * dt;

        // Vertical control only; the planet scrolls past
        let axis = core.input.vertical_axis();
        core.player.vel.y += axis * CLIMB_ACCEL * dt;
        core.player.vel.y = core.player.vel.y.clamp(-MAX_CLIMB_SPEED, MAX_CLIMB_SPEED);
        core.player.vel.y *= 0.96_f32.powf(dt);
        core.player.vel.x = 0.0;
        core.player.pos.x = Self::player_x(core);
        core.player.integrate(dt, core.width, core.height);

        // Scroll the world
        let storm_dx = self.storm_rate(core) * dt;
        for s in &mut self.storms {
            s.pos.x -= storm_dx;
            s.pos.y += s.drift * dt;
        }
        let dx = self.speed * dt;
        for p in &mut self.pickups {
            p.pos.x -= dx;
        }
        for lane in &mut self.lanes {
            lane.zone.translate(Vec2::new(-dx, 0.0));
        }
    }

    fn spawn(&mut self, core: &mut Core, dt: f32) {
        let progress = self.distance;
        let spawn_x = core.width + 60.0;
        if self.storm_clock.tick(dt, progress) {
            let y = core.rng.random_range(40.0..core.height - 40.0);
            self.storms.push(Storm {
                pos: Vec2::new(spawn_x, y),
                drift: core.rng.random_range(-0.4..0.4),
                radius: core.rng.random_range(22.0..40.0),
                passed: false,
            });
        }
        if self.pickup_clock.tick(dt, progress) {
            let kind = self.pickup_table.pick(&mut core.rng);
            let y = core.rng.random_range(30.0..core.height - 30.0);
            self.pickups.push(SkyPickup {
                pos: Vec2::new(spawn_x, y),
                kind,
                collected: false,
            });
        }
        if self.lane_clock.tick(dt, progress) {
            let kind = if core.rng.random_bool(0.5) {
                LaneKind::Tailwind
            } else {
                LaneKind::Headwind
            };
            let top = core.rng.random_range(0.0..core.height - 120.0);
            let height = core.rng.random_range(90.0..140.0);
            let width = core.rng.random_range(260.0..420.0);
            self.lanes.push(WindLane {
                zone: Aabb::new(
                    Vec2::new(spawn_x, top),
                    Vec2::new(spawn_x + width, top + height),
                ),
                kind,
            });
        }
    }

    fn resolve_collisions(&mut self, core: &mut Core, _dt: f32) {
        let player = core.player.pos;
        let player_r = core.player.radius;
        let player_x = Self::player_x(core);

        // Storms: strike or dodge, each scored exactly once
        let mut struck = false;
        for s in &mut self.storms {
            if !s.passed && s.pos.x + s.radius < player_x - player_r {
                s.passed = true;
                self.dodged += 1;
                core.score_with_combo(20);
                core.bump_combo(0.2);
            } else if !struck
                && self.hit_cooldown <= 0.0
                && circles_overlap(player, player_r, s.pos, s.radius)
            {
                if core.player.effects.shield_active() {
                    // Shield rides it out; the dodge still has to be earned
                    continue;
                }
                struck = true;
                core.player.lives = core.player.lives.saturating_sub(1);
                core.break_combo();
                core.cue(SoundEvent::Crash);
                core.particles.burst(&mut core.rng, player, 4, 14, 3.0);
            }
        }
        if struck {
            self.hit_cooldown = HIT_COOLDOWN;
        }
        self.storms.retain(|s| s.pos.x > -80.0);

        // Pickups
        for p in &mut self.pickups {
            if p.collected || !circles_overlap(player, player_r, p.pos, 10.0) {
                continue;
            }
            p.collected = true;
            match p.kind {
                SkyKind::HeliumCell => {
                    core.stardust.award(2);
                    core.score_with_combo(10);
                    core.bump_combo(0.1);
                }
                SkyKind::IonCharge => {
                    core.score_with_combo(50);
                    core.bump_combo(0.3);
                }
                SkyKind::ShieldOrb => {
                    let shield = &mut core.player.effects.shield_ticks;
                    *shield = shield.max(420.0);
                }
            }
            core.cue(SoundEvent::Collect);
            let pos = p.pos;
            core.particles.burst(&mut core.rng, pos, 1, 8, 2.0);
        }
        self.pickups.retain(|p| !p.collected && p.pos.x > -40.0);
        self.lanes.retain(|l| l.zone.max.x > -20.0);
    }

    fn check_terminal(&self, core: &Core) -> Option<Terminal> {
        if self.survived >= SURVIVAL_GOAL {
            return Some(Terminal::Victory);
        }
        if core.player.lives == 0 {
            return Some(Terminal::Defeat);
        }
        None
    }

    fn trivia_progress(&self, _core: &Core) -> u32 {
        self.dodged
    }

    fn on_trivia_result(&mut self, core: &mut Core, correct: bool) {
        if correct {
            let slow = &mut core.player.effects.slow_ticks;
            *slow = slow.max(SLOW_TICKS);
        }
    }

    fn stats(&self, _core: &Core) -> PlanetStatsView {
        PlanetStatsView::StormRider {
            distance: self.distance,
            dodged: self.dodged,
            survived_ticks: self.survived as u64,
            speed: self.speed,
        }
    }

    fn draw(&self, core: &Core, surface: &mut dyn DrawSurface) {
        // Banded cloud deck
        surface.clear(Color::rgb(0.45, 0.3, 0.18));
        let band_h = core.height / 5.0;
        for i in 0..5 {
            let shade = if i % 2 == 0 { 0.05 } else { -0.04 };
            surface.fill_rect(
                Vec2::new(0.0, i as f32 * band_h),
                Vec2::new(core.width, band_h),
                Color::rgb(0.45 + shade, 0.32 + shade, 0.2),
            );
        }

        for lane in &self.lanes {
            let color = match lane.kind {
                LaneKind::Tailwind => Color::rgba(0.5, 0.9, 0.6, 0.18),
                LaneKind::Headwind => Color::rgba(0.9, 0.5, 0.4, 0.18),
            };
            surface.fill_rect(lane.zone.min, lane.zone.size(), color);
            // Flow strokes hint at direction
            let y = lane.zone.center().y;
            let (from, to) = match lane.kind {
                LaneKind::Tailwind => (lane.zone.min.x + 10.0, lane.zone.max.x - 10.0),
                LaneKind::Headwind => (lane.zone.max.x - 10.0, lane.zone.min.x + 10.0),
            };
            surface.line(
                Vec2::new(from, y),
                Vec2::new(to, y),
                2.0,
                color.with_alpha(0.5),
            );
        }

        for s in &self.storms {
            surface.fill_circle(s.pos, s.radius, Color::rgba(0.75, 0.68, 0.6, 0.85));
            surface.stroke_circle(s.pos, s.radius * 0.6, 2.0, Color::rgb(0.55, 0.45, 0.4));
        }

        for p in &self.pickups {
            match p.kind {
                SkyKind::HeliumCell => surface.fill_circle(p.pos, 7.0, Color::rgb(1.0, 0.9, 0.3)),
                SkyKind::IonCharge => surface.fill_circle(p.pos, 8.0, Color::rgb(0.4, 0.7, 1.0)),
                SkyKind::ShieldOrb => {
                    surface.stroke_circle(p.pos, 9.0, 2.0, Color::rgb(0.3, 0.9, 0.9))
                }
            }
        }

        for part in core.particles.iter() {
            let alpha = part.life.clamp(0.0, 1.0);
            surface.fill_circle(
                part.pos,
                part.size,
                Color::rgb(1.0, 0.9, 0.6).with_alpha(alpha),
            );
        }

        // Glider
        let p = core.player.pos;
        let r = core.player.radius;
        surface.fill_polygon(
            &[
                p + Vec2::new(r * 1.2, 0.0),
                p + Vec2::new(-r, -r * 0.7),
                p + Vec2::new(-r * 0.5, 0.0),
                p + Vec2::new(-r, r * 0.7),
            ],
            Color::rgb(0.95, 0.95, 1.0),
        );
        if core.player.effects.shield_active() {
            surface.stroke_circle(p, r + 6.0, 2.0, Color::rgba(0.3, 0.9, 0.9, 0.8));
        }

        super::black_hole::draw_hud(
            core,
            surface,
            &[
                format!("LIVES {}", core.player.lives),
                format!("DODGED {}", self.dodged),
                format!("DIST {:.0}", self.distance),
                format!(
                    "T-{:.0}s",
                    ((SURVIVAL_GOAL - self.survived) / 60.0).max(0.0)
                ),
            ],
        );
    }
}

/// Question bank (external content table).
pub static TRIVIA_BANK: &[TriviaQuestion] = &[
    TriviaQuestion {
        question: "What is Jupiter's Great Red Spot?",
        answers: ["A volcano", "A giant storm", "A crater", "A shadow"],
        correct: 1,
        fact: "The Great Red Spot is a storm wider than Earth, raging for centuries.",
    },
    TriviaQuestion {
        question: "Jupiter is mostly made of which gases?",
        answers: ["Oxygen and nitrogen", "Hydrogen and helium", "Methane and argon", "CO2 and neon"],
        correct: 1,
        fact: "Like the Sun, Jupiter is mostly hydrogen with some helium.",
    },
    TriviaQuestion {
        question: "How long is a day on Jupiter?",
        answers: ["About 10 hours", "About 24 hours", "About 3 days", "About 1 week"],
        correct: 0,
        fact: "Jupiter spins fastest of all planets - under 10 hours per rotation.",
    },
    TriviaQuestion {
        question: "How fast can Jupiter's jet-stream winds blow?",
        answers: ["50 km/h", "Over 500 km/h", "Under 10 km/h", "They are still"],
        correct: 1,
        fact: "Cloud-top winds in Jupiter's belts exceed 500 km/h.",
    },
    TriviaQuestion {
        question: "How many moons does Jupiter have?",
        answers: ["4", "About 12", "Over 90", "None"],
        correct: 2,
        fact: "Jupiter has more than 90 known moons, led by the four Galilean giants.",
    },
    TriviaQuestion {
        question: "What protects Jupiter's moons inside its magnetic field?",
        answers: ["Nothing - it's hazardous", "A dust ring", "Solar wind", "Cloud cover"],
        correct: 0,
        fact: "Jupiter's radiation belts are intense; the field funnels charged particles.",
    },
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::Engine;

    fn engine() -> Engine<StormRider> {
        Engine::new(800.0, 600.0, 7, StormRider::new()).unwrap()
    }

    #[test]
    fn test_speed_never_below_floor_under_headwind() {
        let mut e = engine();
        // Blanket the field in headwind lanes
        for i in 0..4 {
            e.planet.lanes.push(WindLane {
                zone: Aabb::new(
                    Vec2::new(-1000.0, i as f32 * 150.0),
                    Vec2::new(2000.0, (i + 1) as f32 * 150.0),
                ),
                kind: LaneKind::Headwind,
            });
        }
        for _ in 0..2_000 {
            e.step();
            assert!(e.planet.speed >= MIN_SPEED - 1e-4);
            assert!(e.planet.speed <= MAX_SPEED + 1e-4);
        }
    }

    #[test]
    fn test_tailwind_caps_at_max() {
        let mut e = engine();
        for _ in 0..3 {
            e.planet.lanes.push(WindLane {
                zone: Aabb::new(Vec2::new(-1000.0, 0.0), Vec2::new(2000.0, 600.0)),
                kind: LaneKind::Tailwind,
            });
        }
        for _ in 0..500 {
            e.step();
        }
        assert!(e.planet.speed <= MAX_SPEED + 1e-4);
        assert!(e.planet.speed > BASE_SPEED);
    }

    #[test]
    fn test_dodge_scores_exactly_once() {
        let mut e = engine();
        let px = StormRider::player_x(&e.core);
        e.planet.storms.push(Storm {
            pos: Vec2::new(px - 100.0, 300.0),
            drift: 0.0,
            radius: 20.0,
            passed: false,
        });
        e.step();
        assert_eq!(e.planet.dodged, 1);
        let score = e.core.score;
        // Still behind the player on later frames - must not re-score
        for _ in 0..10 {
            e.step();
        }
        assert_eq!(e.planet.dodged, 1);
        assert_eq!(e.core.score, score);
    }

    #[test]
    fn test_storm_strike_costs_a_life() {
        let mut e = engine();
        e.planet.storms.push(Storm {
            pos: e.core.player.pos,
            drift: 0.0,
            radius: 30.0,
            passed: false,
        });
        e.step();
        assert_eq!(e.core.player.lives, STARTING_LIVES - 1);
        assert!((e.core.combo - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_survival_goal_wins() {
        let mut e = engine();
        e.planet.survived = SURVIVAL_GOAL - 1.0;
        e.step();
        assert!(e.core.is_game_over);
        assert!(e.core.victory);
    }

    #[test]
    fn test_losing_all_lives_ends_game() {
        let mut e = engine();
        e.core.player.lives = 1;
        e.planet.storms.push(Storm {
            pos: e.core.player.pos,
            drift: 0.0,
            radius: 30.0,
            passed: false,
        });
        e.step();
        assert!(e.core.is_game_over);
        assert!(!e.core.victory);
    }
}
