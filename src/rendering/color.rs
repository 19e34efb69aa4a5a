//! RGBA color values for grid cells.

use serde::{Deserialize, Serialize};

/// A 4-component float color. Components are expected to lie in `[0, 1]`.
///
/// The default color is fully transparent black, which backends treat as
/// "show whatever is behind this cell".
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const TRANSPARENT: Color = Color::rgba(0.0, 0.0, 0.0, 0.0);
    pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);
    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);
    pub const RED: Color = Color::rgb(1.0, 0.0, 0.0);
    pub const GREEN: Color = Color::rgb(0.0, 1.0, 0.0);
    pub const BLUE: Color = Color::rgb(0.0, 0.0, 1.0);

    /// Creates an opaque color.
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Creates a color with explicit alpha.
    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Returns the color with every component clamped into `[0, 1]`.
    pub fn clamped(self) -> Self {
        Self {
            r: self.r.clamp(0.0, 1.0),
            g: self.g.clamp(0.0, 1.0),
            b: self.b.clamp(0.0, 1.0),
            a: self.a.clamp(0.0, 1.0),
        }
    }

    /// Returns whether the color is fully transparent.
    pub fn is_transparent(self) -> bool {
        self.a <= f32::EPSILON
    }

    /// Alpha-composites `self` over `below`. The result is opaque whenever
    /// `below` is opaque.
    pub fn over(self, below: Color) -> Color {
        let a = self.a + below.a * (1.0 - self.a);
        if a <= f32::EPSILON {
            return Color::TRANSPARENT;
        }
        Color {
            r: (self.r * self.a + below.r * below.a * (1.0 - self.a)) / a,
            g: (self.g * self.a + below.g * below.a * (1.0 - self.a)) / a,
            b: (self.b * self.a + below.b * below.a * (1.0 - self.a)) / a,
            a,
        }
    }

    /// Converts to 8-bit RGB, dropping alpha.
    pub fn to_rgb8(self) -> [u8; 3] {
        let c = self.clamped();
        [
            (c.r * 255.0).round() as u8,
            (c.g * 255.0).round() as u8,
            (c.b * 255.0).round() as u8,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transparency() {
        assert!(Color::TRANSPARENT.is_transparent());
        assert!(Color::default().is_transparent());
        assert!(!Color::RED.is_transparent());
    }

    #[test]
    fn over_compositing() {
        // opaque over anything is itself
        assert_eq!(Color::RED.over(Color::BLUE), Color::RED);
        // transparent over anything is the background
        assert_eq!(Color::TRANSPARENT.over(Color::BLUE), Color::BLUE);

        let half = Color::rgba(1.0, 0.0, 0.0, 0.5);
        let blended = half.over(Color::BLACK);
        assert!((blended.a - 1.0).abs() < 1e-6);
        assert!((blended.r - 0.5).abs() < 1e-6);
    }

    #[test]
    fn to_rgb8_clamps() {
        assert_eq!(Color::rgb(2.0, -1.0, 0.5).to_rgb8(), [255, 0, 128]);
    }
}
