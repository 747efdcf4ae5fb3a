//! Rendering module
//!
//! Scenes are drawn against a small 2D `Surface` trait: the browser build
//! backs it with a canvas context, tests and the native demo record commands.

pub mod catcher;
pub mod glider;
pub mod recording;

#[cfg(target_arch = "wasm32")]
pub mod canvas;

use glam::Vec2;

use crate::sim::Rect;

#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasSurface;
pub use recording::{DrawCommand, RecordingSurface};

/// RGBA colour, alpha in `[0, 1]`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Color {
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const BLACK: Color = Color::rgb(0, 0, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// `0xRRGGBB`
    pub const fn hex(value: u32) -> Self {
        Self::rgb((value >> 16) as u8, (value >> 8) as u8, value as u8)
    }

    pub fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }

    /// CSS colour string
    pub fn to_css(&self) -> String {
        if self.a >= 1.0 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
        }
    }
}

/// Fill style
#[derive(Debug, Clone, PartialEq)]
pub enum Paint {
    Solid(Color),
    /// Linear gradient from `from` to `to` with `(offset, colour)` stops
    Linear {
        from: Vec2,
        to: Vec2,
        stops: Vec<(f32, Color)>,
    },
}

impl Paint {
    /// Vertical gradient over `[top, bottom]`
    pub fn vertical(top: f32, bottom: f32, stops: &[(f32, Color)]) -> Self {
        Paint::Linear {
            from: Vec2::new(0.0, top),
            to: Vec2::new(0.0, bottom),
            stops: stops.to_vec(),
        }
    }
}

impl From<Color> for Paint {
    fn from(color: Color) -> Self {
        Paint::Solid(color)
    }
}

/// 2D drawing target with a fixed logical resolution
///
/// Transforms (`translate`, `rotate`) apply until the matching `restore`.
pub trait Surface {
    fn clear(&mut self);
    fn fill_rect(&mut self, rect: Rect, paint: &Paint);
    /// Ellipse centred at `center`; `rotation` in radians
    fn fill_ellipse(&mut self, center: Vec2, radii: Vec2, rotation: f32, paint: &Paint);
    fn fill_polygon(&mut self, points: &[Vec2], paint: &Paint);
    fn stroke_line(&mut self, from: Vec2, to: Vec2, color: Color, width: f32);
    /// Left-aligned text with its baseline at `pos`
    fn fill_text(&mut self, text: &str, pos: Vec2, size: f32, color: Color);
    /// Soft shadow for subsequent fills; `None` turns it off
    fn set_shadow(&mut self, shadow: Option<(Color, f32)>);
    fn save(&mut self);
    fn restore(&mut self);
    fn translate(&mut self, offset: Vec2);
    fn rotate(&mut self, radians: f32);

    fn fill_circle(&mut self, center: Vec2, radius: f32, paint: &Paint) {
        self.fill_ellipse(center, Vec2::splat(radius), 0.0, paint);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_css() {
        assert_eq!(Color::hex(0x87CEEB).to_css(), "#87ceeb");
        assert_eq!(
            Color::rgba(255, 255, 255, 0.8).to_css(),
            "rgba(255, 255, 255, 0.8)"
        );
    }

    #[test]
    fn test_vertical_gradient() {
        let paint = Paint::vertical(0.0, 600.0, &[(0.0, Color::WHITE), (1.0, Color::BLACK)]);
        match paint {
            Paint::Linear { from, to, stops } => {
                assert_eq!(from.y, 0.0);
                assert_eq!(to.y, 600.0);
                assert_eq!(stops.len(), 2);
            }
            Paint::Solid(_) => panic!("expected gradient"),
        }
    }
}
