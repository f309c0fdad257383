//! Immediate-mode 2D draw boundary
//!
//! The core issues draw calls against this trait and never reads pixels
//! back. The browser shell backs it with a canvas context; tests and the
//! headless demo use `RecordingSurface`.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Straight-alpha RGBA color, components in 0-1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub const fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }

    pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);
    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);
}

/// Immediate-mode drawing surface (filled/stroked shapes, paths, gradients,
/// text). Implementations own all rasterization; the core never sees pixels.
pub trait DrawSurface {
    fn clear(&mut self, color: Color);
    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color);
    fn stroke_circle(&mut self, center: Vec2, radius: f32, width: f32, color: Color);
    fn fill_rect(&mut self, min: Vec2, size: Vec2, color: Color);
    fn stroke_rect(&mut self, min: Vec2, size: Vec2, width: f32, color: Color);
    fn line(&mut self, from: Vec2, to: Vec2, width: f32, color: Color);
    fn fill_polygon(&mut self, points: &[Vec2], color: Color);
    /// Radial gradient disc from `inner` at `r0` to `outer` at `r1`.
    fn radial_gradient(&mut self, center: Vec2, r0: f32, r1: f32, inner: Color, outer: Color);
    fn text(&mut self, pos: Vec2, size: f32, color: Color, text: &str);
}

/// A recorded draw call, for assertions and the headless demo.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear(Color),
    FillCircle {
        center: Vec2,
        radius: f32,
        color: Color,
    },
    StrokeCircle {
        center: Vec2,
        radius: f32,
        width: f32,
        color: Color,
    },
    FillRect {
        min: Vec2,
        size: Vec2,
        color: Color,
    },
    StrokeRect {
        min: Vec2,
        size: Vec2,
        width: f32,
        color: Color,
    },
    Line {
        from: Vec2,
        to: Vec2,
        width: f32,
        color: Color,
    },
    FillPolygon {
        points: Vec<Vec2>,
        color: Color,
    },
    RadialGradient {
        center: Vec2,
        r0: f32,
        r1: f32,
        inner: Color,
        outer: Color,
    },
    Text {
        pos: Vec2,
        size: f32,
        color: Color,
        text: String,
    },
}

/// Surface that records every call instead of rasterizing.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    pub commands: Vec<DrawCommand>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear_commands(&mut self) {
        self.commands.clear();
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

impl DrawSurface for RecordingSurface {
    fn clear(&mut self, color: Color) {
        self.commands.push(DrawCommand::Clear(color));
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color) {
        self.commands.push(DrawCommand::FillCircle {
            center,
            radius,
            color,
        });
    }

    fn stroke_circle(&mut self, center: Vec2, radius: f32, width: f32, color: Color) {
        self.commands.push(DrawCommand::StrokeCircle {
            center,
            radius,
            width,
            color,
        });
    }

    fn fill_rect(&mut self, min: Vec2, size: Vec2, color: Color) {
        self.commands.push(DrawCommand::FillRect { min, size, color });
    }

    fn stroke_rect(&mut self, min: Vec2, size: Vec2, width: f32, color: Color) {
        self.commands.push(DrawCommand::StrokeRect {
            min,
            size,
            width,
            color,
        });
    }

    fn line(&mut self, from: Vec2, to: Vec2, width: f32, color: Color) {
        self.commands.push(DrawCommand::Line {
            from,
            to,
            width,
            color,
        });
    }

    fn fill_polygon(&mut self, points: &[Vec2], color: Color) {
        self.commands.push(DrawCommand::FillPolygon {
            points: points.to_vec(),
            color,
        });
    }

    fn radial_gradient(&mut self, center: Vec2, r0: f32, r1: f32, inner: Color, outer: Color) {
        self.commands.push(DrawCommand::RadialGradient {
            center,
            r0,
            r1,
            inner,
            outer,
        });
    }

    fn text(&mut self, pos: Vec2, size: f32, color: Color, text: &str) {
        self.commands.push(DrawCommand::Text {
            pos,
            size,
            color,
            text: text.to_string(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_surface_captures_calls() {
        let mut surface = RecordingSurface::new();
        surface.clear(Color::BLACK);
        surface.fill_circle(Vec2::new(10.0, 20.0), 5.0, Color::WHITE);
        surface.text(Vec2::ZERO, 14.0, Color::WHITE, "hud");
        assert_eq!(surface.len(), 3);
        assert!(matches!(surface.commands[0], DrawCommand::Clear(_)));
        assert!(matches!(
            surface.commands[2],
            DrawCommand::Text { ref text, .. } if text == "hud"
        ));
    }

    #[test]
    fn test_color_with_alpha() {
        let c = Color::rgb(0.2, 0.4, 0.6).with_alpha(0.5);
        assert_eq!(c.a, 0.5);
        assert_eq!(c.r, 0.2);
    }
}
