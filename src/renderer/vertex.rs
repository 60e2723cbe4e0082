use crate::geometry::{Color, Vec2};

/// Vertex layout shared with the renderer backend.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct DrawVert {
    pub pos: [f32; 2],
    /// Texture coordinates. Untextured shapes sample the white pixel at the origin.
    pub uv: [f32; 2],
    pub color: [f32; 4],
}

impl DrawVert {
    pub fn new(pos: Vec2, uv: Vec2, color: Color) -> Self {
        Self {
            pos: [pos.x, pos.y],
            uv: [uv.x, uv.y],
            color: color.to_array(),
        }
    }

    pub fn solid(pos: Vec2, color: Color) -> Self {
        Self::new(pos, Vec2::ZERO, color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertex_is_tightly_packed() {
        assert_eq!(std::mem::size_of::<DrawVert>(), 32);
        let v = DrawVert::solid(Vec2::new(1.0, 2.0), Color::WHITE);
        let bytes: &[u8] = bytemuck::bytes_of(&v);
        assert_eq!(bytes.len(), 32);
        assert_eq!(&bytes[0..4], &1.0f32.to_le_bytes());
    }
}
