//! Draw command records.
//!
//! A draw list is a flat sequence of commands. Each command renders
//! `elem_count` indices starting at `idx_offset` with a single clip rectangle
//! and texture. The table engine only ever manipulates these records and the
//! index buffer they point into; vertices are never copied around.

use crate::geometry::Rect;

/// 16-bit index type. Vertex offsets let a draw list grow past 65535 vertices.
pub type DrawIdx = u16;

/// Opaque handle to a texture owned by the renderer backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TextureId(pub u64);

impl TextureId {
    /// Texture holding the solid white pixel used by untextured shapes.
    pub const WHITE: TextureId = TextureId(0);
}

/// A callback recorded in place of geometry. The backend interprets `id`
/// and `data`; the draw list only guarantees ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawCallback {
    pub id: u32,
    pub data: u64,
}

/// The state every command is stamped with when created.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawCmdHeader {
    /// Clipping rectangle (min x, min y, max x, max y)
    pub clip_rect: Rect,
    /// Texture bound while drawing this command
    pub texture_id: TextureId,
    /// First vertex of the command, added to every index
    pub vtx_offset: u32,
}

impl Default for DrawCmdHeader {
    fn default() -> Self {
        Self {
            clip_rect: Rect::infinite(),
            texture_id: TextureId::WHITE,
            vtx_offset: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawCmd {
    /// Clipping rectangle (min x, min y, max x, max y)
    pub clip_rect: Rect,
    /// Texture bound while drawing this command
    pub texture_id: TextureId,
    /// First vertex of the command, added to every index
    pub vtx_offset: u32,
    /// Start offset in the index buffer
    pub idx_offset: u32,
    /// Number of indices (multiple of 3) to render as triangles
    pub elem_count: u32,
    /// When set, the backend runs the callback instead of rendering geometry
    pub callback: Option<DrawCallback>,
}

impl DrawCmd {
    pub fn header(&self) -> DrawCmdHeader {
        DrawCmdHeader {
            clip_rect: self.clip_rect,
            texture_id: self.texture_id,
            vtx_offset: self.vtx_offset,
        }
    }

    pub fn header_matches(&self, header: &DrawCmdHeader) -> bool {
        self.clip_rect == header.clip_rect
            && self.texture_id == header.texture_id
            && self.vtx_offset == header.vtx_offset
    }

    pub fn set_header(&mut self, header: &DrawCmdHeader) {
        self.clip_rect = header.clip_rect;
        self.texture_id = header.texture_id;
        self.vtx_offset = header.vtx_offset;
    }

    /// Callback commands are never merged or dropped.
    pub fn is_callback(&self) -> bool {
        self.callback.is_some()
    }

    /// The next command starts exactly where this one ends.
    pub fn is_followed_by(&self, next: &DrawCmd) -> bool {
        self.idx_offset + self.elem_count == next.idx_offset
    }
}
