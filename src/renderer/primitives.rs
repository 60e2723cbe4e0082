//! Primitive emission.
//!
//! Shapes reserve a block of indices and vertices with [`DrawList::prim_reserve`]
//! and then fill it through the returned [`PrimRange`]. Writes are checked
//! against the reservation, so a shape can never scribble past its own block.

use super::{DrawIdx, DrawList, DrawVert};
use crate::geometry::{Color, Rect, Vec2};

/// A reserved block inside the index and vertex buffers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrimRange {
    pub idx_start: usize,
    pub idx_count: usize,
    pub vtx_start: usize,
    pub vtx_count: usize,
    /// Index value of the first reserved vertex, relative to the command's vertex offset
    base: u32,
}

impl PrimRange {
    pub fn is_empty(&self) -> bool {
        self.idx_count == 0 && self.vtx_count == 0
    }
}

const VTX_INDEX_LIMIT: u32 = 1 << 16;

impl DrawList {
    /// Reserve `idx_count` indices and `vtx_count` vertices for a new shape.
    ///
    /// When the 16-bit index space is about to overflow, the header vertex
    /// offset moves to the end of the vertex buffer and a fresh command opens.
    pub fn prim_reserve(&mut self, idx_count: usize, vtx_count: usize) -> PrimRange {
        assert!(
            (vtx_count as u32) < VTX_INDEX_LIMIT,
            "a single primitive cannot use more than 65535 vertices"
        );
        if self.vtx_current_idx + vtx_count as u32 >= VTX_INDEX_LIMIT {
            self.cmd_header.vtx_offset = self.vtx_buffer.len() as u32;
            self.on_changed_vtx_offset();
        }
        if self.cmd_buffer.is_empty() {
            self.add_draw_cmd();
        }
        if let Some(cmd) = self.cmd_buffer.last_mut() {
            cmd.elem_count += idx_count as u32;
        }

        let range = PrimRange {
            idx_start: self.idx_buffer.len(),
            idx_count,
            vtx_start: self.vtx_buffer.len(),
            vtx_count,
            base: self.vtx_current_idx,
        };
        self.idx_buffer.resize(range.idx_start + idx_count, 0);
        self.vtx_buffer.resize(
            range.vtx_start + vtx_count,
            DrawVert::solid(Vec2::ZERO, Color::TRANSPARENT),
        );
        self.vtx_current_idx += vtx_count as u32;
        range
    }

    pub fn prim_set_vtx(&mut self, range: &PrimRange, n: usize, vert: DrawVert) {
        assert!(n < range.vtx_count, "vertex {n} outside reservation");
        self.vtx_buffer[range.vtx_start + n] = vert;
    }

    /// Write index `n` of the reservation, pointing at reserved vertex `local`.
    pub fn prim_set_idx(&mut self, range: &PrimRange, n: usize, local: usize) {
        assert!(n < range.idx_count, "index {n} outside reservation");
        assert!(local < range.vtx_count, "vertex {local} outside reservation");
        self.idx_buffer[range.idx_start + n] = (range.base + local as u32) as DrawIdx;
    }

    /// Write an axis-aligned quad at quad slot `quad` of the reservation.
    pub fn prim_quad(&mut self, range: &PrimRange, quad: usize, corners: [Vec2; 4], color: Color) {
        let v = quad * 4;
        let i = quad * 6;
        for (n, corner) in corners.into_iter().enumerate() {
            self.prim_set_vtx(range, v + n, DrawVert::solid(corner, color));
        }
        for (n, local) in [0, 1, 2, 0, 2, 3].into_iter().enumerate() {
            self.prim_set_idx(range, i + n, v + local);
        }
    }

    pub fn add_rect_filled(&mut self, rect: Rect, color: Color) {
        if !color.is_visible() {
            return;
        }
        let range = self.prim_reserve(6, 4);
        self.prim_quad(&range, 0, rect_corners(&rect), color);
    }

    /// Outline of `rect`, drawn inside the rectangle bounds.
    pub fn add_rect(&mut self, rect: Rect, color: Color, thickness: f32) {
        if !color.is_visible() || thickness <= 0.0 {
            return;
        }
        let t = thickness.min(rect.width() * 0.5).min(rect.height() * 0.5).max(0.0);
        let (a, b) = (rect.min, rect.max);
        let edges = [
            Rect::new(a.x, a.y, b.x, a.y + t),
            Rect::new(a.x, b.y - t, b.x, b.y),
            Rect::new(a.x, a.y + t, a.x + t, b.y - t),
            Rect::new(b.x - t, a.y + t, b.x, b.y - t),
        ];
        let range = self.prim_reserve(6 * edges.len(), 4 * edges.len());
        for (quad, edge) in edges.iter().enumerate() {
            self.prim_quad(&range, quad, rect_corners(edge), color);
        }
    }

    /// Straight line of the given thickness. Endpoints are nudged by half a
    /// pixel so one-pixel lines land on pixel centers.
    pub fn add_line(&mut self, p1: Vec2, p2: Vec2, color: Color, thickness: f32) {
        if !color.is_visible() {
            return;
        }
        let p1 = p1 + Vec2::new(0.5, 0.5);
        let p2 = p2 + Vec2::new(0.5, 0.5);
        let d = p2 - p1;
        let len = (d.x * d.x + d.y * d.y).sqrt();
        if len <= 0.0 {
            return;
        }
        let half = thickness * 0.5;
        let n = Vec2::new(-d.y / len * half, d.x / len * half);
        let range = self.prim_reserve(6, 4);
        self.prim_quad(&range, 0, [p1 + n, p2 + n, p2 - n, p1 - n], color);
    }

    pub fn add_triangle_filled(&mut self, p1: Vec2, p2: Vec2, p3: Vec2, color: Color) {
        if !color.is_visible() {
            return;
        }
        let range = self.prim_reserve(3, 3);
        for (n, p) in [p1, p2, p3].into_iter().enumerate() {
            self.prim_set_vtx(&range, n, DrawVert::solid(p, color));
            self.prim_set_idx(&range, n, n);
        }
    }
}

fn rect_corners(rect: &Rect) -> [Vec2; 4] {
    [
        rect.min,
        Vec2::new(rect.max.x, rect.min.y),
        rect.max,
        Vec2::new(rect.min.x, rect.max.y),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_filled_emits_one_quad() {
        let mut dl = DrawList::new();
        dl.add_rect_filled(Rect::new(0.0, 0.0, 10.0, 10.0), Color::WHITE);
        assert_eq!(dl.vtx_buffer.len(), 4);
        assert_eq!(dl.idx_buffer, vec![0, 1, 2, 0, 2, 3]);
        assert_eq!(dl.cmd_buffer[0].elem_count, 6);
    }

    #[test]
    fn test_transparent_shapes_are_skipped() {
        let mut dl = DrawList::new();
        dl.add_rect_filled(Rect::new(0.0, 0.0, 10.0, 10.0), Color::TRANSPARENT);
        dl.add_line(Vec2::ZERO, Vec2::new(5.0, 0.0), Color::TRANSPARENT, 1.0);
        assert!(dl.idx_buffer.is_empty());
    }

    #[test]
    fn test_indices_are_relative_to_reservation() {
        let mut dl = DrawList::new();
        dl.add_rect_filled(Rect::new(0.0, 0.0, 10.0, 10.0), Color::WHITE);
        dl.add_triangle_filled(Vec2::ZERO, Vec2::new(1.0, 0.0), Vec2::new(0.0, 1.0), Color::WHITE);
        assert_eq!(&dl.idx_buffer[6..], &[4, 5, 6]);
    }

    #[test]
    #[should_panic]
    fn test_write_outside_reservation_panics() {
        let mut dl = DrawList::new();
        let range = dl.prim_reserve(3, 3);
        dl.prim_set_idx(&range, 3, 0);
    }

    #[test]
    fn test_vertex_offset_rolls_over() {
        let mut dl = DrawList::new();
        // 16383 quads fill 65532 vertices; the next quad must start a new command.
        for _ in 0..16383 {
            dl.add_rect_filled(Rect::new(0.0, 0.0, 1.0, 1.0), Color::WHITE);
        }
        assert_eq!(dl.cmd_buffer.len(), 1);
        dl.add_rect_filled(Rect::new(0.0, 0.0, 1.0, 1.0), Color::WHITE);
        assert_eq!(dl.cmd_buffer.len(), 2);
        assert_eq!(dl.cmd_buffer[1].vtx_offset, 65532);
        assert_eq!(&dl.idx_buffer[dl.idx_buffer.len() - 6..], &[0, 1, 2, 0, 2, 3]);
    }
}
