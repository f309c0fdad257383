//! Visual particle effects
//!
//! Deterministic bursts from the engine's seeded RNG. Particles are not
//! gameplay-affecting; they share the per-frame cadence and the cap honors
//! the quality preset.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};
use std::f32::consts::TAU;

/// A single particle. `color` is a palette index resolved by the draw layer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub color: u32,
    /// 0-1, decreases over time
    pub life: f32,
    pub size: f32,
}

/// Bounded particle pool. Oldest particles are evicted to make room.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Particles {
    list: Vec<Particle>,
    cap: usize,
}

impl Particles {
    pub fn new(cap: usize) -> Self {
        Self {
            list: Vec::new(),
            cap,
        }
    }

    pub fn len(&self) -> usize {
        self.list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Particle> {
        self.list.iter()
    }

    fn push(&mut self, p: Particle) {
        if self.cap == 0 {
            return;
        }
        if self.list.len() >= self.cap {
            self.list.remove(0);
        }
        self.list.push(p);
    }

    /// Radial burst at a point (collect, crash, deliver).
    pub fn burst(&mut self, rng: &mut Pcg32, pos: Vec2, color: u32, count: usize, speed: f32) {
        for _ in 0..count {
            let angle = rng.random_range(0.0..TAU);
            let s = speed * rng.random_range(0.4..1.0);
            self.push(Particle {
                pos,
                vel: Vec2::new(angle.cos(), angle.sin()) * s,
                color,
                life: rng.random_range(0.6..1.0),
                size: rng.random_range(2.0..6.0),
            });
        }
    }

    /// Expanding ring (victory, sonic boom).
    pub fn ring(&mut self, rng: &mut Pcg32, center: Vec2, radius: f32, color: u32, count: usize) {
        for i in 0..count {
            let angle = TAU * (i as f32 / count.max(1) as f32);
            let outward = Vec2::new(angle.cos(), angle.sin());
            self.push(Particle {
                pos: center + outward * radius,
                vel: outward * rng.random_range(3.0..6.0),
                color,
                life: rng.random_range(0.8..1.2),
                size: rng.random_range(3.0..5.0),
            });
        }
    }

    /// Integrate, drag, decay, cull. `gravity` is a constant per-tick pull
    /// (e.g. toward a singularity or straight down).
    pub fn update(&mut self, dt: f32, drag: f32, gravity: Vec2) {
        for p in self.list.iter_mut() {
            p.pos += p.vel * dt;
            p.vel += gravity * dt;
            p.vel *= drag.powf(dt);
            p.life -= dt * 0.025;
            p.size *= 0.995_f32.powf(dt);
        }
        self.list.retain(|p| p.life > 0.0);
    }

    pub fn clear(&mut self) {
        self.list.clear();
    }
}
