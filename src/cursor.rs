//! Layout cursor of the host surface.
//!
//! Items are placed top to bottom: each item advances the cursor to the start
//! of the next line and grows `max_pos`, the extent of everything submitted.
//! Tables narrow the work rect to the current cell and restore it afterwards.

use crate::geometry::{Rect, Vec2};

#[derive(Debug, Clone, PartialEq)]
pub struct LayoutCursor {
    /// Where the next item goes
    pub pos: Vec2,
    /// Bottom-right extent of submitted items
    pub max_pos: Vec2,
    /// X the cursor returns to after each line
    pub line_start_x: f32,
    pub prev_line_height: f32,
    pub curr_line_height: f32,
    /// Area available to items
    pub work_rect: Rect,
    /// Clip rectangle of the current draw target
    pub clip_rect: Rect,
    /// Accumulated indentation
    pub indent_x: f32,
    /// Items are neither laid out nor drawn
    pub skip_items: bool,
    /// Default width of width-taking items
    pub item_width: f32,
}

impl LayoutCursor {
    pub fn new(area: Rect) -> Self {
        Self {
            pos: area.min,
            max_pos: area.min,
            line_start_x: area.min.x,
            prev_line_height: 0.0,
            curr_line_height: 0.0,
            work_rect: area,
            clip_rect: area,
            indent_x: 0.0,
            skip_items: false,
            item_width: (area.width() * 0.65).floor(),
        }
    }

    /// Space left between the cursor and the bottom-right of the work rect.
    pub fn content_region_avail(&self) -> Vec2 {
        self.work_rect.max - self.pos
    }

    /// Account for an item of `size` at the cursor and move to the next line.
    pub fn item_size(&mut self, size: Vec2, spacing_y: f32) {
        let line_height = self.curr_line_height.max(size.y);
        self.max_pos.x = self.max_pos.x.max(self.pos.x + size.x);
        self.max_pos.y = self.max_pos.y.max(self.pos.y + line_height);
        self.pos.x = self.line_start_x.floor();
        self.pos.y = (self.pos.y + line_height + spacing_y).floor();
        self.prev_line_height = line_height;
        self.curr_line_height = 0.0;
    }

    pub fn indent(&mut self, width: f32) {
        self.indent_x += width;
        self.line_start_x += width;
        self.pos.x = self.line_start_x;
    }

    pub fn unindent(&mut self, width: f32) {
        self.indent(-width);
    }

    /// Whether an item covering `rect` would be visible.
    pub fn is_rect_visible(&self, rect: &Rect) -> bool {
        rect.intersects(&self.clip_rect)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_size_advances_line() {
        let mut cursor = LayoutCursor::new(Rect::new(10.0, 20.0, 210.0, 420.0));
        cursor.item_size(Vec2::new(50.0, 13.0), 4.0);
        assert_eq!(cursor.pos, Vec2::new(10.0, 37.0));
        assert_eq!(cursor.max_pos, Vec2::new(60.0, 33.0));
        assert_eq!(cursor.prev_line_height, 13.0);
    }

    #[test]
    fn test_indent_moves_line_start() {
        let mut cursor = LayoutCursor::new(Rect::new(0.0, 0.0, 100.0, 100.0));
        cursor.indent(21.0);
        cursor.item_size(Vec2::new(5.0, 5.0), 0.0);
        assert_eq!(cursor.pos.x, 21.0);
        cursor.unindent(21.0);
        assert_eq!(cursor.pos.x, 0.0);
    }

    #[test]
    fn test_content_region_avail() {
        let cursor = LayoutCursor::new(Rect::new(0.0, 0.0, 300.0, 200.0));
        assert_eq!(cursor.content_region_avail(), Vec2::new(300.0, 200.0));
    }
}
