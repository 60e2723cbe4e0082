//! Table, column and row options.
//!
//! Capabilities are bitflags. Sizing policies are plain enums so a column can
//! never be both fixed and stretched; raw bits only appear in saved settings.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    /// Capabilities of a whole table.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct TableFlags: u32 {
        /// Columns can be resized by dragging their right border
        const RESIZABLE = 1 << 0;
        /// Columns can be reordered by dragging their header
        const REORDERABLE = 1 << 1;
        /// Columns can be hidden with `set_column_enabled`
        const HIDEABLE = 1 << 2;
        /// Clicking a header cycles the column's sort direction
        const SORTABLE = 1 << 3;
        /// Never load or save settings for this table
        const NO_SAVED_SETTINGS = 1 << 4;
        /// Alternate row background colors
        const ROW_BG = 1 << 6;
        const BORDERS_INNER_H = 1 << 7;
        const BORDERS_OUTER_H = 1 << 8;
        const BORDERS_INNER_V = 1 << 9;
        const BORDERS_OUTER_V = 1 << 10;
        const BORDERS_H = Self::BORDERS_INNER_H.bits() | Self::BORDERS_OUTER_H.bits();
        const BORDERS_V = Self::BORDERS_INNER_V.bits() | Self::BORDERS_OUTER_V.bits();
        const BORDERS_INNER = Self::BORDERS_INNER_V.bits() | Self::BORDERS_INNER_H.bits();
        const BORDERS_OUTER = Self::BORDERS_OUTER_V.bits() | Self::BORDERS_OUTER_H.bits();
        const BORDERS = Self::BORDERS_INNER.bits() | Self::BORDERS_OUTER.bits();
        /// Do not draw vertical borders in the body, only in headers
        const NO_BORDERS_IN_BODY = 1 << 11;
        /// With a fixed outer width, do not grow the outer rect to fit columns
        const NO_HOST_EXTEND_X = 1 << 16;
        /// With a fixed outer height, stop submitting rows past the outer rect
        const NO_HOST_EXTEND_Y = 1 << 17;
        /// Let columns be pushed out of view instead of shrinking them
        const NO_KEEP_COLUMNS_VISIBLE = 1 << 18;
        /// Distribute leftover pixels instead of keeping exact widths
        const PRECISE_WIDTHS = 1 << 19;
        /// Do not clip cells to their column
        const NO_CLIP = 1 << 20;
        /// Outer padding on the first and last column
        const PAD_OUTER_X = 1 << 21;
        const NO_PAD_OUTER_X = 1 << 22;
        const NO_PAD_INNER_X = 1 << 23;
        const SCROLL_X = 1 << 24;
        const SCROLL_Y = 1 << 25;
        /// Shift-click adds secondary sort keys
        const SORT_MULTI = 1 << 26;
        /// Sorting can be cleared, leaving no sorted column
        const SORT_TRISTATE = 1 << 27;
    }
}

bitflags! {
    /// Capabilities and defaults of one column.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct ColumnFlags: u32 {
        /// Hidden until enabled by the user
        const DEFAULT_HIDE = 1 << 1;
        /// Sorted on first use
        const DEFAULT_SORT = 1 << 2;
        const NO_RESIZE = 1 << 5;
        const NO_REORDER = 1 << 6;
        const NO_HIDE = 1 << 7;
        /// Ignore this column's content when clipping it
        const NO_CLIP = 1 << 8;
        const NO_SORT = 1 << 9;
        const NO_SORT_ASCENDING = 1 << 10;
        const NO_SORT_DESCENDING = 1 << 11;
        /// Omit the label from the header row
        const NO_HEADER_LABEL = 1 << 12;
        /// Header width does not contribute to the automatic width
        const NO_HEADER_WIDTH = 1 << 13;
        const PREFER_SORT_ASCENDING = 1 << 14;
        const PREFER_SORT_DESCENDING = 1 << 15;
        /// Indent cell content by the row indent
        const INDENT_ENABLE = 1 << 16;
        const INDENT_DISABLE = 1 << 17;
    }
}

bitflags! {
    /// Per-frame state of a column, recomputed by each layout pass.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
    pub struct ColumnStatus: u8 {
        const ENABLED = 1 << 0;
        const VISIBLE = 1 << 1;
        const SORTED = 1 << 2;
        const HOVERED = 1 << 3;
    }
}

bitflags! {
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
    pub struct RowFlags: u8 {
        /// A header row: content feeds header widths, bg uses the header color
        const HEADERS = 1 << 0;
    }
}

/// Default width policy of a table, inherited by columns that declare none.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TableSizing {
    /// Fixed columns sized to fit their content
    FixedFit,
    /// Fixed columns all sized to the widest content
    FixedSame,
    /// Stretch columns weighted by their content width
    StretchProp,
    /// Stretch columns with equal weights
    StretchSame,
}

impl TableSizing {
    pub fn is_fixed(self) -> bool {
        matches!(self, TableSizing::FixedFit | TableSizing::FixedSame)
    }

    pub(crate) fn default_policy(self) -> WidthPolicy {
        if self.is_fixed() {
            WidthPolicy::Fixed
        } else {
            WidthPolicy::Stretch
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WidthPolicy {
    Fixed,
    Stretch,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn flipped(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }
}

/// Where `set_bg_color` paints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BgTarget {
    /// Row background, drawn first
    RowBg0,
    /// Row background, drawn over `RowBg0`
    RowBg1,
    /// Background of a single cell, drawn over both row colors
    CellBg,
}

impl TableFlags {
    /// Normalize caller flags into the set the layout actually honors.
    pub(crate) fn fixed_up(self, sizing: TableSizing) -> TableFlags {
        let mut flags = self;
        if sizing == TableSizing::FixedSame {
            flags |= TableFlags::NO_KEEP_COLUMNS_VISIBLE;
        }
        if flags.contains(TableFlags::RESIZABLE) {
            flags |= TableFlags::BORDERS_INNER_V;
        }
        if flags.intersects(TableFlags::SCROLL_X | TableFlags::SCROLL_Y) {
            flags.remove(TableFlags::NO_HOST_EXTEND_X | TableFlags::NO_HOST_EXTEND_Y);
        }
        if !flags.intersects(
            TableFlags::RESIZABLE | TableFlags::HIDEABLE | TableFlags::REORDERABLE | TableFlags::SORTABLE,
        ) {
            flags |= TableFlags::NO_SAVED_SETTINGS;
        }
        flags
    }
}

impl ColumnFlags {
    /// Fill in indent and sort defaults.
    pub(crate) fn fixed_up(self, column_index: usize) -> ColumnFlags {
        let mut flags = self;
        if !flags.intersects(ColumnFlags::INDENT_ENABLE | ColumnFlags::INDENT_DISABLE) {
            flags |= if column_index == 0 {
                ColumnFlags::INDENT_ENABLE
            } else {
                ColumnFlags::INDENT_DISABLE
            };
        }
        flags
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resizable_forces_inner_vertical_borders() {
        let flags = TableFlags::RESIZABLE.fixed_up(TableSizing::StretchSame);
        assert!(flags.contains(TableFlags::BORDERS_INNER_V));
        assert!(!flags.contains(TableFlags::NO_SAVED_SETTINGS));
    }

    #[test]
    fn test_nothing_to_save_disables_settings() {
        let flags = TableFlags::ROW_BG.fixed_up(TableSizing::FixedFit);
        assert!(flags.contains(TableFlags::NO_SAVED_SETTINGS));
    }

    #[test]
    fn test_scrolling_clears_host_extend() {
        let flags = (TableFlags::SCROLL_Y | TableFlags::NO_HOST_EXTEND_Y).fixed_up(TableSizing::FixedFit);
        assert!(!flags.contains(TableFlags::NO_HOST_EXTEND_Y));
    }

    #[test]
    fn test_first_column_indents_by_default() {
        assert!(ColumnFlags::empty().fixed_up(0).contains(ColumnFlags::INDENT_ENABLE));
        assert!(ColumnFlags::empty().fixed_up(1).contains(ColumnFlags::INDENT_DISABLE));
    }
}
