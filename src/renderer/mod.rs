//! CPU-side draw list.
//!
//! The draw list accumulates vertices, indices and draw commands for one frame.
//! Commands are stamped with the current clip rectangle, texture and vertex
//! offset (the command header); changing any of them either retargets the
//! trailing empty command or opens a new one. The table engine temporarily
//! swaps the command and index buffers out through a [`ChannelSplitter`].

pub mod commands;
pub mod font;
pub mod primitives;
pub mod splitter;
pub mod vertex;

pub use commands::{DrawCallback, DrawCmd, DrawCmdHeader, DrawIdx, TextureId};
pub use font::{FixedFont, Font};
pub use primitives::PrimRange;
pub use splitter::{ChannelSplitter, DrawChannel};
pub use vertex::DrawVert;

use crate::geometry::Rect;

#[derive(Debug, Clone)]
pub struct DrawList {
    pub cmd_buffer: Vec<DrawCmd>,
    pub idx_buffer: Vec<DrawIdx>,
    pub vtx_buffer: Vec<DrawVert>,
    /// Header applied to the next command created
    pub(crate) cmd_header: DrawCmdHeader,
    clip_rect_stack: Vec<Rect>,
    texture_stack: Vec<TextureId>,
    /// Next vertex index relative to `cmd_header.vtx_offset`
    pub(crate) vtx_current_idx: u32,
}

impl Default for DrawList {
    fn default() -> Self {
        Self::new()
    }
}

impl DrawList {
    pub fn new() -> Self {
        let mut list = Self {
            cmd_buffer: Vec::with_capacity(16),
            idx_buffer: Vec::with_capacity(1024),
            vtx_buffer: Vec::with_capacity(1024),
            cmd_header: DrawCmdHeader::default(),
            clip_rect_stack: Vec::with_capacity(8),
            texture_stack: Vec::with_capacity(4),
            vtx_current_idx: 0,
        };
        list.reset();
        list
    }

    /// Clear all buffers for a new frame, preserving allocated capacity.
    pub fn reset(&mut self) {
        self.cmd_buffer.clear();
        self.idx_buffer.clear();
        self.vtx_buffer.clear();
        self.clip_rect_stack.clear();
        self.texture_stack.clear();
        self.cmd_header = DrawCmdHeader::default();
        self.vtx_current_idx = 0;
        self.add_draw_cmd();
    }

    pub fn header(&self) -> &DrawCmdHeader {
        &self.cmd_header
    }

    pub fn clip_rect(&self) -> Rect {
        self.cmd_header.clip_rect
    }

    pub fn clip_stack_depth(&self) -> usize {
        self.clip_rect_stack.len()
    }

    /// Commands that actually render something or run a callback.
    pub fn visible_cmd_count(&self) -> usize {
        self.cmd_buffer
            .iter()
            .filter(|cmd| cmd.elem_count > 0 || cmd.is_callback())
            .count()
    }

    /// Open a new command stamped with the current header.
    pub fn add_draw_cmd(&mut self) {
        let cmd = DrawCmd {
            clip_rect: self.cmd_header.clip_rect,
            texture_id: self.cmd_header.texture_id,
            vtx_offset: self.cmd_header.vtx_offset,
            idx_offset: self.idx_buffer.len() as u32,
            elem_count: 0,
            callback: None,
        };
        debug_assert!(cmd.clip_rect.min.x <= cmd.clip_rect.max.x);
        debug_assert!(cmd.clip_rect.min.y <= cmd.clip_rect.max.y);
        self.cmd_buffer.push(cmd);
    }

    /// Drop trailing commands that have neither geometry nor a callback.
    pub fn pop_unused_draw_cmd(&mut self) {
        while let Some(cmd) = self.cmd_buffer.last() {
            if cmd.elem_count != 0 || cmd.is_callback() {
                return;
            }
            self.cmd_buffer.pop();
        }
    }

    /// Record a backend callback. A fresh command always follows it.
    pub fn add_callback(&mut self, callback: DrawCallback) {
        let needs_cmd = match self.cmd_buffer.last() {
            Some(cmd) => {
                assert!(!cmd.is_callback(), "trailing command already holds a callback");
                cmd.elem_count != 0
            }
            None => true,
        };
        if needs_cmd {
            self.add_draw_cmd();
        }
        if let Some(cmd) = self.cmd_buffer.last_mut() {
            cmd.callback = Some(callback);
        }
        self.add_draw_cmd();
    }

    /// Push a clip rectangle, optionally intersected with the current one.
    pub fn push_clip_rect(&mut self, rect: Rect, intersect_with_current: bool) {
        let mut cr = rect;
        if intersect_with_current && !self.clip_rect_stack.is_empty() {
            let current = self.cmd_header.clip_rect;
            cr.min = cr.min.max(current.min);
            cr.max = cr.max.min(current.max);
        }
        cr.max.x = cr.max.x.max(cr.min.x);
        cr.max.y = cr.max.y.max(cr.min.y);

        self.clip_rect_stack.push(cr);
        self.cmd_header.clip_rect = cr;
        self.on_changed_clip_rect();
    }

    pub fn pop_clip_rect(&mut self) {
        assert!(
            self.clip_rect_stack.pop().is_some(),
            "pop_clip_rect without matching push_clip_rect"
        );
        self.cmd_header.clip_rect = self
            .clip_rect_stack
            .last()
            .copied()
            .unwrap_or_else(Rect::infinite);
        self.on_changed_clip_rect();
    }

    /// Overwrite the current clip rect without opening a command. Used right
    /// before switching channels so the channel switch does the comparison.
    pub(crate) fn set_clip_rect_before_set_channel(&mut self, rect: Rect) {
        self.cmd_header.clip_rect = rect;
        if let Some(top) = self.clip_rect_stack.last_mut() {
            *top = rect;
        }
    }

    pub fn push_texture_id(&mut self, texture_id: TextureId) {
        self.texture_stack.push(texture_id);
        self.cmd_header.texture_id = texture_id;
        self.on_changed_texture_id();
    }

    pub fn pop_texture_id(&mut self) {
        assert!(
            self.texture_stack.pop().is_some(),
            "pop_texture_id without matching push_texture_id"
        );
        self.cmd_header.texture_id = self
            .texture_stack
            .last()
            .copied()
            .unwrap_or(TextureId::WHITE);
        self.on_changed_texture_id();
    }

    /// Retarget or open a command after the header clip rect changed.
    fn on_changed_clip_rect(&mut self) {
        let header = self.cmd_header;
        let len = self.cmd_buffer.len();
        let Some(curr) = self.cmd_buffer.last_mut() else {
            self.add_draw_cmd();
            return;
        };
        if curr.elem_count != 0 && curr.clip_rect != header.clip_rect {
            self.add_draw_cmd();
            return;
        }
        if curr.is_callback() {
            self.add_draw_cmd();
            return;
        }
        if self.try_merge_with_previous(len) {
            return;
        }
        if let Some(curr) = self.cmd_buffer.last_mut() {
            curr.clip_rect = header.clip_rect;
        }
    }

    fn on_changed_texture_id(&mut self) {
        let header = self.cmd_header;
        let len = self.cmd_buffer.len();
        let Some(curr) = self.cmd_buffer.last_mut() else {
            self.add_draw_cmd();
            return;
        };
        if curr.elem_count != 0 && curr.texture_id != header.texture_id {
            self.add_draw_cmd();
            return;
        }
        if curr.is_callback() {
            self.add_draw_cmd();
            return;
        }
        if self.try_merge_with_previous(len) {
            return;
        }
        if let Some(curr) = self.cmd_buffer.last_mut() {
            curr.texture_id = header.texture_id;
        }
    }

    /// An empty trailing command is dropped when the command before it
    /// already matches the header and the index ranges are contiguous.
    fn try_merge_with_previous(&mut self, len: usize) -> bool {
        if len < 2 {
            return false;
        }
        let (prev, curr) = (&self.cmd_buffer[len - 2], &self.cmd_buffer[len - 1]);
        if curr.elem_count == 0
            && prev.header_matches(&self.cmd_header)
            && prev.is_followed_by(curr)
            && !prev.is_callback()
        {
            self.cmd_buffer.pop();
            return true;
        }
        false
    }

    fn on_changed_vtx_offset(&mut self) {
        self.vtx_current_idx = 0;
        let vtx_offset = self.cmd_header.vtx_offset;
        match self.cmd_buffer.last_mut() {
            Some(curr) if curr.elem_count == 0 && !curr.is_callback() => {
                curr.vtx_offset = vtx_offset;
            }
            _ => self.add_draw_cmd(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_list_has_one_empty_cmd() {
        let dl = DrawList::new();
        assert_eq!(dl.cmd_buffer.len(), 1);
        assert_eq!(dl.cmd_buffer[0].elem_count, 0);
        assert_eq!(dl.visible_cmd_count(), 0);
    }

    #[test]
    fn test_clip_change_on_empty_cmd_retargets() {
        let mut dl = DrawList::new();
        dl.push_clip_rect(Rect::new(0.0, 0.0, 100.0, 100.0), false);
        assert_eq!(dl.cmd_buffer.len(), 1);
        assert_eq!(dl.cmd_buffer[0].clip_rect, Rect::new(0.0, 0.0, 100.0, 100.0));
    }

    #[test]
    fn test_clip_change_after_geometry_opens_cmd() {
        let mut dl = DrawList::new();
        dl.push_clip_rect(Rect::new(0.0, 0.0, 100.0, 100.0), false);
        dl.add_rect_filled(Rect::new(1.0, 1.0, 5.0, 5.0), crate::geometry::Color::WHITE);
        dl.push_clip_rect(Rect::new(10.0, 10.0, 50.0, 50.0), true);
        assert_eq!(dl.cmd_buffer.len(), 2);
        dl.pop_clip_rect();
        // Popping back to the previous clip drops the empty command again.
        assert_eq!(dl.cmd_buffer.len(), 1);
        assert_eq!(dl.cmd_buffer[0].elem_count, 6);
    }

    #[test]
    fn test_push_clip_intersects() {
        let mut dl = DrawList::new();
        dl.push_clip_rect(Rect::new(0.0, 0.0, 100.0, 100.0), false);
        dl.push_clip_rect(Rect::new(50.0, -10.0, 200.0, 40.0), true);
        assert_eq!(dl.clip_rect(), Rect::new(50.0, 0.0, 100.0, 40.0));
        dl.push_clip_rect(Rect::new(300.0, 0.0, 400.0, 10.0), true);
        assert!(dl.clip_rect().width() >= 0.0);
    }

    #[test]
    fn test_callback_is_followed_by_fresh_cmd() {
        let mut dl = DrawList::new();
        dl.add_rect_filled(Rect::new(0.0, 0.0, 5.0, 5.0), crate::geometry::Color::WHITE);
        dl.add_callback(DrawCallback { id: 7, data: 0 });
        assert_eq!(dl.cmd_buffer.len(), 3);
        assert!(dl.cmd_buffer[1].is_callback());
        assert!(!dl.cmd_buffer[2].is_callback());
        dl.pop_unused_draw_cmd();
        assert_eq!(dl.cmd_buffer.len(), 2);
    }

    #[test]
    #[should_panic]
    fn test_unbalanced_pop_clip_panics() {
        let mut dl = DrawList::new();
        dl.pop_clip_rect();
    }
}
