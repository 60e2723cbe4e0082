//! Text measurement and emission.
//!
//! The table engine only needs to know how large a label is and to emit it
//! into the current channel. Real glyph rasterization belongs to the host; the
//! [`Font`] trait is the seam, and [`FixedFont`] is a monospace implementation
//! that draws every visible character as a solid box.

use super::DrawList;
use crate::geometry::{Color, Rect, Vec2};

pub trait Font {
    /// Height of one line of text.
    fn line_height(&self) -> f32;

    /// Size of `text` laid out on a single line.
    fn measure(&self, text: &str) -> Vec2;

    /// Emit `text` with its top-left corner at `pos`. When `clip` is given,
    /// glyph geometry is clipped to it on the CPU.
    fn render(&self, draw_list: &mut DrawList, pos: Vec2, color: Color, text: &str, clip: Option<Rect>);

    /// Number of leading bytes of `text` that fit in `max_width`, always on a
    /// char boundary.
    fn fit_prefix(&self, text: &str, max_width: f32) -> usize {
        let mut end = 0;
        for (i, ch) in text.char_indices() {
            let next = i + ch.len_utf8();
            if self.measure(&text[..next]).x > max_width {
                break;
            }
            end = next;
        }
        end
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedFont {
    pub size: f32,
    pub advance: f32,
}

impl Default for FixedFont {
    fn default() -> Self {
        Self::new(13.0)
    }
}

impl FixedFont {
    pub fn new(size: f32) -> Self {
        Self {
            size,
            advance: (size * 0.5).round(),
        }
    }
}

impl Font for FixedFont {
    fn line_height(&self) -> f32 {
        self.size
    }

    fn measure(&self, text: &str) -> Vec2 {
        Vec2::new(text.chars().count() as f32 * self.advance, self.size)
    }

    fn render(&self, draw_list: &mut DrawList, pos: Vec2, color: Color, text: &str, clip: Option<Rect>) {
        let mut x = pos.x;
        for ch in text.chars() {
            if !ch.is_whitespace() {
                let mut glyph = Rect::new(
                    x + 1.0,
                    pos.y + (self.size * 0.2).floor(),
                    x + self.advance - 1.0,
                    pos.y + self.size - 1.0,
                );
                if let Some(clip) = &clip {
                    glyph.clip_with(clip);
                }
                if glyph.width() > 0.0 && glyph.height() > 0.0 {
                    draw_list.add_rect_filled(glyph, color);
                }
            }
            x += self.advance;
        }
    }

    fn fit_prefix(&self, text: &str, max_width: f32) -> usize {
        let fit = (max_width / self.advance).floor().max(0.0) as usize;
        text.char_indices()
            .nth(fit)
            .map(|(i, _)| i)
            .unwrap_or(text.len())
    }
}
