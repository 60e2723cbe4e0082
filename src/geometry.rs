//! Points, rectangles and colors shared by the draw list and the table engine.

use std::ops::{Add, Mul, Sub};

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn min(self, other: Vec2) -> Vec2 {
        Vec2::new(self.x.min(other.x), self.y.min(other.y))
    }

    pub fn max(self, other: Vec2) -> Vec2 {
        Vec2::new(self.x.max(other.x), self.y.max(other.y))
    }

    pub fn floor(self) -> Vec2 {
        Vec2::new(self.x.floor(), self.y.floor())
    }
}

impl Add for Vec2 {
    type Output = Vec2;

    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Vec2 {
    type Output = Vec2;

    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f32> for Vec2 {
    type Output = Vec2;

    fn mul(self, rhs: f32) -> Vec2 {
        Vec2::new(self.x * rhs, self.y * rhs)
    }
}

impl From<(f32, f32)> for Vec2 {
    fn from((x, y): (f32, f32)) -> Self {
        Vec2::new(x, y)
    }
}

/// Axis-aligned rectangle stored as two corners.
///
/// `max` is exclusive for hit testing. A rectangle whose `max` is not past its
/// `min` on either axis is considered empty.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rect {
    pub min: Vec2,
    pub max: Vec2,
}

impl Rect {
    pub const fn new(min_x: f32, min_y: f32, max_x: f32, max_y: f32) -> Self {
        Self {
            min: Vec2::new(min_x, min_y),
            max: Vec2::new(max_x, max_y),
        }
    }

    pub fn from_min_max(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    pub fn from_pos_size(pos: Vec2, size: Vec2) -> Self {
        Self {
            min: pos,
            max: pos + size,
        }
    }

    /// A rectangle covering the whole representable plane, used as "no clip".
    pub const fn infinite() -> Self {
        Rect::new(-f32::MAX, -f32::MAX, f32::MAX, f32::MAX)
    }

    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    pub fn is_inverted(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y
    }

    pub fn offset(&self, dx: f32, dy: f32) -> Self {
        Rect::new(self.min.x + dx, self.min.y + dy, self.max.x + dx, self.max.y + dy)
    }

    pub fn inset(&self, amount: f32) -> Self {
        Rect::new(
            self.min.x + amount,
            self.min.y + amount,
            self.max.x - amount,
            self.max.y - amount,
        )
    }

    pub fn intersects(&self, other: &Rect) -> bool {
        other.min.y < self.max.y
            && other.max.y > self.min.y
            && other.min.x < self.max.x
            && other.max.x > self.min.x
    }

    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.min.x && y >= self.min.y && x < self.max.x && y < self.max.y
    }

    pub fn contains_rect(&self, other: &Rect) -> bool {
        other.min.x >= self.min.x
            && other.min.y >= self.min.y
            && other.max.x <= self.max.x
            && other.max.y <= self.max.y
    }

    /// Grow this rectangle to also cover `other`.
    pub fn add_rect(&mut self, other: &Rect) {
        self.min = self.min.min(other.min);
        self.max = self.max.max(other.max);
    }

    /// Clip against `clip`, keeping corners ordered even when they do not overlap.
    pub fn clip_with(&mut self, clip: &Rect) {
        self.min = self.min.max(clip.min);
        self.max = self.max.min(clip.max);
    }

    /// Clip against `clip` and then force `max >= min`, so a disjoint input
    /// collapses to a zero-area rectangle on the edge of `clip`.
    pub fn clip_with_full(&mut self, clip: &Rect) {
        self.min.x = self.min.x.clamp(clip.min.x, clip.max.x.max(clip.min.x));
        self.min.y = self.min.y.clamp(clip.min.y, clip.max.y.max(clip.min.y));
        self.max.x = self.max.x.clamp(clip.min.x, clip.max.x.max(clip.min.x));
        self.max.y = self.max.y.clamp(clip.min.y, clip.max.y.max(clip.min.y));
    }

    pub fn floor(&self) -> Self {
        Rect::from_min_max(self.min.floor(), self.max.floor())
    }

    /// Layout of the clip rect as stored in a draw command.
    pub fn to_array(&self) -> [f32; 4] {
        [self.min.x, self.min.y, self.max.x, self.max.y]
    }

    pub fn from_array(v: [f32; 4]) -> Self {
        Rect::new(v[0], v[1], v[2], v[3])
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);
    pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);
    pub const TRANSPARENT: Color = Color::rgba(0.0, 0.0, 0.0, 0.0);

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub fn from_hex(hex: u32) -> Self {
        let r = ((hex >> 16) & 0xFF) as f32 / 255.0;
        let g = ((hex >> 8) & 0xFF) as f32 / 255.0;
        let b = (hex & 0xFF) as f32 / 255.0;
        Self::rgb(r, g, b)
    }

    pub fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }

    /// Fully transparent colors emit no geometry.
    pub fn is_visible(&self) -> bool {
        self.a > 0.0
    }

    pub fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_size() {
        let r = Rect::new(10.0, 20.0, 110.0, 70.0);
        assert_eq!(r.width(), 100.0);
        assert_eq!(r.height(), 50.0);
        assert_eq!(r.size(), Vec2::new(100.0, 50.0));
    }

    #[test]
    fn test_rect_contains_is_max_exclusive() {
        let r = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(r.contains(0.0, 0.0));
        assert!(r.contains(9.9, 9.9));
        assert!(!r.contains(10.0, 5.0));
    }

    #[test]
    fn test_clip_with_full_collapses_disjoint() {
        let mut r = Rect::new(200.0, 0.0, 300.0, 10.0);
        r.clip_with_full(&Rect::new(0.0, 0.0, 100.0, 100.0));
        assert_eq!(r.min.x, 100.0);
        assert_eq!(r.max.x, 100.0);
        assert_eq!(r.width(), 0.0);
    }

    #[test]
    fn test_add_rect_union() {
        let mut r = Rect::new(0.0, 0.0, 10.0, 10.0);
        r.add_rect(&Rect::new(5.0, -5.0, 20.0, 8.0));
        assert_eq!(r, Rect::new(0.0, -5.0, 20.0, 10.0));
    }

    #[test]
    fn test_color_from_hex() {
        let c = Color::from_hex(0xFF8000);
        assert_eq!(c.r, 1.0);
        assert!((c.g - 128.0 / 255.0).abs() < 1e-6);
        assert_eq!(c.b, 0.0);
        assert_eq!(c.a, 1.0);
    }
}
