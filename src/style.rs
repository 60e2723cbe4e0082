//! Spacing and colors used by tables.

use crate::geometry::{Color, Vec2};

#[derive(Debug, Clone, PartialEq)]
pub struct TableColors {
    pub text: Color,
    pub text_disabled: Color,
    /// Header cell background
    pub header_bg: Color,
    /// Header cell background while hovered
    pub header_hovered: Color,
    /// Header cell background while held
    pub header_active: Color,
    /// Outer borders and the line under header rows
    pub border_strong: Color,
    /// Inner borders
    pub border_light: Color,
    /// Row background for even rows
    pub row_bg: Color,
    /// Row background for odd rows
    pub row_bg_alt: Color,
    /// Sort direction arrow
    pub sort_arrow: Color,
}

impl Default for TableColors {
    fn default() -> Self {
        Self {
            text: Color::WHITE,
            text_disabled: Color::rgb(0.5, 0.5, 0.5),
            header_bg: Color::rgb(0.19, 0.19, 0.20),
            header_hovered: Color::rgba(0.26, 0.59, 0.98, 0.80),
            header_active: Color::rgb(0.26, 0.59, 0.98),
            border_strong: Color::rgb(0.31, 0.31, 0.35),
            border_light: Color::rgb(0.23, 0.23, 0.25),
            row_bg: Color::TRANSPARENT,
            row_bg_alt: Color::rgba(1.0, 1.0, 1.0, 0.06),
            sort_arrow: Color::WHITE,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableStyle {
    /// Padding inside each cell
    pub cell_padding: Vec2,
    /// Horizontal padding also drives the minimum column width
    pub frame_padding: Vec2,
    /// Spacing between items laid out by the host cursor
    pub item_spacing: Vec2,
    /// Horizontal offset applied by `indent`
    pub indent_spacing: f32,
    /// Seconds a table may stay unused before its transient buffers are released.
    /// `None` never compacts.
    pub compact_after_secs: Option<f32>,
    pub colors: TableColors,
}

impl Default for TableStyle {
    fn default() -> Self {
        Self {
            cell_padding: Vec2::new(4.0, 2.0),
            frame_padding: Vec2::new(4.0, 3.0),
            item_spacing: Vec2::new(8.0, 4.0),
            indent_spacing: 21.0,
            compact_after_secs: Some(60.0),
            colors: TableColors::default(),
        }
    }
}

impl TableStyle {
    /// Narrowest width a column can be resized to.
    pub fn min_column_width(&self) -> f32 {
        self.frame_padding.x.max(1.0)
    }
}
