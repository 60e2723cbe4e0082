//! Per-column state.

use super::flags::{ColumnFlags, ColumnStatus, SortDirection, WidthPolicy};
use crate::geometry::Rect;

/// Declaration of one column, passed to `setup_column`.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnSetup {
    pub label: String,
    pub flags: ColumnFlags,
    /// `None` inherits the table's sizing
    pub policy: Option<WidthPolicy>,
    /// Initial width for fixed columns or weight for stretch columns; `<= 0` is unset
    pub init_width_or_weight: f32,
    pub user_id: u32,
}

impl ColumnSetup {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            flags: ColumnFlags::empty(),
            policy: None,
            init_width_or_weight: -1.0,
            user_id: 0,
        }
    }

    pub fn flags(mut self, flags: ColumnFlags) -> Self {
        self.flags = flags;
        self
    }

    pub fn fixed(mut self, width: f32) -> Self {
        self.policy = Some(WidthPolicy::Fixed);
        self.init_width_or_weight = width;
        self
    }

    pub fn stretch(mut self, weight: f32) -> Self {
        self.policy = Some(WidthPolicy::Stretch);
        self.init_width_or_weight = weight;
        self
    }

    pub fn user_id(mut self, user_id: u32) -> Self {
        self.user_id = user_id;
        self
    }
}

#[derive(Debug, Clone)]
pub struct TableColumn {
    pub name: String,
    pub user_id: u32,
    pub flags: ColumnFlags,
    pub policy: WidthPolicy,
    pub status: ColumnStatus,
    /// Set for the right-most enabled column when a stretch column exists
    pub(crate) no_direct_resize: bool,

    pub width_request: f32,
    pub width_auto: f32,
    pub width_given: f32,
    pub stretch_weight: f32,
    pub init_width_or_weight: f32,

    pub min_x: f32,
    pub max_x: f32,
    pub work_min_x: f32,
    pub work_max_x: f32,
    pub clip_rect: Rect,
    pub item_width: f32,

    pub content_max_x_frozen: f32,
    pub content_max_x_unfrozen: f32,
    pub content_max_x_headers_used: f32,
    pub content_max_x_headers_ideal: f32,

    pub index_within_enabled_set: Option<usize>,
    pub prev_enabled: Option<usize>,
    pub next_enabled: Option<usize>,

    pub draw_channel_frozen: usize,
    pub draw_channel_unfrozen: usize,
    pub draw_channel_current: usize,

    pub is_enabled: bool,
    pub is_user_enabled: bool,
    pub is_user_enabled_next_frame: bool,
    pub is_visible_x: bool,
    pub is_request_output: bool,
    pub is_skip_items: bool,
    pub is_preserve_width_auto: bool,

    /// One bit per frame: fit to content for the next frames
    pub auto_fit_queue: u8,
    /// One bit per frame: submit content even when clipped
    pub cannot_skip_items_queue: u8,

    pub sort_order: Option<usize>,
    pub sort_direction: Option<SortDirection>,
    pub(crate) sort_directions_available: Vec<SortDirection>,
    tristate: bool,
}

impl Default for TableColumn {
    fn default() -> Self {
        Self {
            name: String::new(),
            user_id: 0,
            flags: ColumnFlags::empty(),
            policy: WidthPolicy::Fixed,
            status: ColumnStatus::empty(),
            no_direct_resize: false,
            width_request: -1.0,
            width_auto: 0.0,
            width_given: 0.0,
            stretch_weight: -1.0,
            init_width_or_weight: 0.0,
            min_x: 0.0,
            max_x: 0.0,
            work_min_x: 0.0,
            work_max_x: 0.0,
            clip_rect: Rect::default(),
            item_width: 0.0,
            content_max_x_frozen: 0.0,
            content_max_x_unfrozen: 0.0,
            content_max_x_headers_used: 0.0,
            content_max_x_headers_ideal: 0.0,
            index_within_enabled_set: None,
            prev_enabled: None,
            next_enabled: None,
            draw_channel_frozen: 0,
            draw_channel_unfrozen: 0,
            draw_channel_current: 0,
            is_enabled: true,
            is_user_enabled: true,
            is_user_enabled_next_frame: true,
            is_visible_x: true,
            is_request_output: true,
            is_skip_items: false,
            is_preserve_width_auto: false,
            auto_fit_queue: AUTO_FIT_FRAMES,
            cannot_skip_items_queue: AUTO_FIT_FRAMES,
            sort_order: None,
            sort_direction: None,
            sort_directions_available: Vec::new(),
            tristate: false,
        }
    }
}

/// Fit to content over three frames: the first measures, the next two settle.
pub(crate) const AUTO_FIT_FRAMES: u8 = (1 << 3) - 1;

impl TableColumn {
    pub fn is_stretch(&self) -> bool {
        self.policy == WidthPolicy::Stretch
    }

    pub fn is_fixed(&self) -> bool {
        self.policy == WidthPolicy::Fixed
    }

    pub fn is_sorted(&self) -> bool {
        self.sort_order.is_some()
    }

    /// Queue an auto-fit over the next frames.
    pub(crate) fn request_auto_fit(&mut self) {
        self.auto_fit_queue = AUTO_FIT_FRAMES;
        self.cannot_skip_items_queue = AUTO_FIT_FRAMES;
    }

    /// Reset content accumulators to the left edge of the column.
    pub(crate) fn reset_content(&mut self, x: f32) {
        self.content_max_x_frozen = x;
        self.content_max_x_unfrozen = x;
        self.content_max_x_headers_used = x;
        self.content_max_x_headers_ideal = x;
    }

    /// Rebuild the list of sort directions the column cycles through.
    pub(crate) fn update_sort_directions(&mut self, tristate: bool) {
        let mut dirs = Vec::with_capacity(3);
        let asc = !self.flags.contains(ColumnFlags::NO_SORT_ASCENDING);
        let desc = !self.flags.contains(ColumnFlags::NO_SORT_DESCENDING);
        if self.flags.contains(ColumnFlags::PREFER_SORT_DESCENDING) {
            if desc {
                dirs.push(SortDirection::Descending);
            }
            if asc {
                dirs.push(SortDirection::Ascending);
            }
        } else {
            if asc {
                dirs.push(SortDirection::Ascending);
            }
            if desc {
                dirs.push(SortDirection::Descending);
            }
        }
        self.sort_directions_available = dirs;
        self.tristate = tristate;
    }

    /// Direction after the current one; `None` clears the sort.
    pub(crate) fn next_sort_direction(&self) -> Option<SortDirection> {
        let dirs = &self.sort_directions_available;
        let first = dirs.first().copied()?;
        let Some(current) = self.sort_direction else {
            return Some(first);
        };
        match dirs.iter().position(|&d| d == current) {
            Some(i) if i + 1 < dirs.len() => Some(dirs[i + 1]),
            Some(_) if self.tristate => None,
            _ => Some(first),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_cycle_two_state() {
        let mut col = TableColumn::default();
        col.update_sort_directions(false);
        assert_eq!(col.next_sort_direction(), Some(SortDirection::Ascending));
        col.sort_direction = Some(SortDirection::Ascending);
        assert_eq!(col.next_sort_direction(), Some(SortDirection::Descending));
        col.sort_direction = Some(SortDirection::Descending);
        assert_eq!(col.next_sort_direction(), Some(SortDirection::Ascending));
    }

    #[test]
    fn test_sort_cycle_tristate_and_preference() {
        let mut col = TableColumn {
            flags: ColumnFlags::PREFER_SORT_DESCENDING,
            ..Default::default()
        };
        col.update_sort_directions(true);
        assert_eq!(col.next_sort_direction(), Some(SortDirection::Descending));
        col.sort_direction = Some(SortDirection::Ascending);
        assert_eq!(col.next_sort_direction(), None);
    }

    #[test]
    fn test_single_direction_column() {
        let mut col = TableColumn {
            flags: ColumnFlags::NO_SORT_DESCENDING,
            ..Default::default()
        };
        col.update_sort_directions(false);
        col.sort_direction = Some(SortDirection::Ascending);
        assert_eq!(col.next_sort_direction(), Some(SortDirection::Ascending));
    }

    #[test]
    fn test_setup_builder() {
        let setup = ColumnSetup::new("Name").fixed(80.0).user_id(7);
        assert_eq!(setup.policy, Some(WidthPolicy::Fixed));
        assert_eq!(setup.init_width_or_weight, 80.0);
        assert_eq!(setup.user_id, 7);
    }
}
