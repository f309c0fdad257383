//! Collision queries for planar entities
//!
//! Distance and AABB checks between the player, mobile entities, and
//! delivery/current zones. Pure functions; flag transitions stay with the
//! per-planet resolvers.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned box, used for wind lanes, current zones and delivery pads.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    pub fn from_center_size(center: Vec2, size: Vec2) -> Self {
        let half = size / 2.0;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    pub fn center(&self) -> Vec2 {
        (self.min + self.max) / 2.0
    }

    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
    }

    /// Translate the box (scrolling zones).
    pub fn translate(&mut self, delta: Vec2) {
        self.min += delta;
        self.max += delta;
    }
}

/// Circle-vs-circle overlap test.
#[inline]
pub fn circles_overlap(a: Vec2, ra: f32, b: Vec2, rb: f32) -> bool {
    let r = ra + rb;
    a.distance_squared(b) <= r * r
}

/// Circle-vs-AABB overlap test (closest-point distance).
pub fn circle_aabb_overlap(center: Vec2, radius: f32, aabb: &Aabb) -> bool {
    let closest = Vec2::new(
        center.x.clamp(aabb.min.x, aabb.max.x),
        center.y.clamp(aabb.min.y, aabb.max.y),
    );
    center.distance_squared(closest) <= radius * radius
}

/// Reflect velocity off a surface: v' = v - 2(v·n)n
#[inline]
pub fn reflect_velocity(velocity: Vec2, normal: Vec2) -> Vec2 {
    velocity - 2.0 * velocity.dot(normal) * normal
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_circles_overlap() {
        assert!(circles_overlap(
            Vec2::new(0.0, 0.0),
            10.0,
            Vec2::new(15.0, 0.0),
            10.0
        ));
        assert!(!circles_overlap(
            Vec2::new(0.0, 0.0),
            10.0,
            Vec2::new(25.0, 0.0),
            10.0
        ));
        // Exactly touching counts as overlap
        assert!(circles_overlap(
            Vec2::new(0.0, 0.0),
            10.0,
            Vec2::new(20.0, 0.0),
            10.0
        ));
    }

    #[test]
    fn test_aabb_overlaps() {
        let a = Aabb::new(Vec2::new(0.0, 0.0), Vec2::new(10.0, 10.0));
        let b = Aabb::new(Vec2::new(5.0, 5.0), Vec2::new(15.0, 15.0));
        let c = Aabb::new(Vec2::new(11.0, 11.0), Vec2::new(20.0, 20.0));
        assert!(a.overlaps(&b));
        assert!(!a.overlaps(&c));
        assert!(b.overlaps(&c));
    }

    #[test]
    fn test_circle_aabb_overlap() {
        let zone = Aabb::new(Vec2::new(0.0, 0.0), Vec2::new(100.0, 50.0));
        assert!(circle_aabb_overlap(Vec2::new(50.0, 25.0), 5.0, &zone));
        assert!(circle_aabb_overlap(Vec2::new(-3.0, 25.0), 5.0, &zone));
        assert!(!circle_aabb_overlap(Vec2::new(-10.0, 25.0), 5.0, &zone));
        // Corner case: diagonal distance matters
        assert!(!circle_aabb_overlap(Vec2::new(-4.0, -4.0), 5.0, &zone));
        assert!(circle_aabb_overlap(Vec2::new(-3.0, -3.0), 5.0, &zone));
    }

    #[test]
    fn test_reflect_velocity() {
        let v = Vec2::new(100.0, 0.0);
        let n = Vec2::new(-1.0, 0.0);
        let r = reflect_velocity(v, n);
        assert!((r.x - (-100.0)).abs() < 0.001);
        assert!(r.y.abs() < 0.001);
    }

    #[test]
    fn test_aabb_translate() {
        let mut z = Aabb::from_center_size(Vec2::new(50.0, 50.0), Vec2::new(20.0, 10.0));
        z.translate(Vec2::new(-5.0, 0.0));
        assert_eq!(z.center(), Vec2::new(45.0, 50.0));
        assert_eq!(z.size(), Vec2::new(20.0, 10.0));
    }
}
