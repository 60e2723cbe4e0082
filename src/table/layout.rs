//! Column width solver.
//!
//! Widths are resolved once per frame, when the first row is requested, so
//! every `setup_column` call of the frame is known. Fixed columns take their
//! requested width; the remaining width is shared between stretch columns in
//! proportion to their weights.

use super::column::{ColumnSetup, TableColumn};
use super::flags::{ColumnFlags, ColumnStatus, TableFlags, TableSizing, WidthPolicy};
use super::{Table, TableEnv, BORDER_SIZE, CHANNEL_NOCLIP, MAX_COLUMNS};
use crate::geometry::Rect;
use crate::stats;

impl Table {
    /// Declare the next column. Must be called before the first row.
    pub(crate) fn setup_column(&mut self, setup: ColumnSetup) {
        assert!(
            self.decl_columns_count < self.columns.len(),
            "setup_column called more times than the table has columns"
        );
        assert!(
            !self.is_layout_locked,
            "setup_column must be called before the first row"
        );
        let column_n = self.decl_columns_count;
        self.decl_columns_count += 1;

        // A width passed without a policy belongs to a fixed column on fixed-sizing tables.
        let mut policy = setup.policy;
        if policy.is_none() && self.is_initializing && setup.init_width_or_weight > 0.0 && self.sizing.is_fixed() {
            policy = Some(WidthPolicy::Fixed);
        }
        self.setup_column_flags(column_n, setup.flags, policy);

        let settings_loaded = self.settings_loaded_flags;
        let is_initializing = self.is_initializing;
        let column = &mut self.columns[column_n];
        column.user_id = setup.user_id;
        column.init_width_or_weight = setup.init_width_or_weight;
        column.name = setup.label;

        if is_initializing {
            let init = setup.init_width_or_weight;
            if column.width_request < 0.0 && column.stretch_weight < 0.0 {
                if column.is_fixed() && init > 0.0 {
                    column.width_request = init;
                }
                if column.is_stretch() {
                    column.stretch_weight = if init > 0.0 { init } else { -1.0 };
                }
                // An explicit size disables fitting to content.
                if init > 0.0 {
                    column.auto_fit_queue = 0;
                }
            }

            if column.flags.contains(ColumnFlags::DEFAULT_HIDE)
                && !settings_loaded.contains(TableFlags::HIDEABLE)
            {
                column.is_user_enabled = false;
                column.is_user_enabled_next_frame = false;
            }
            if column.flags.contains(ColumnFlags::DEFAULT_SORT)
                && !settings_loaded.contains(TableFlags::SORTABLE)
            {
                // Duplicate orders from several default-sorted columns are linearized later.
                column.sort_order = Some(0);
                column.sort_direction = column.sort_directions_available.first().copied();
            }
        }
    }

    /// Normalize the flags of a column and store them with its policy.
    pub(crate) fn setup_column_flags(&mut self, column_n: usize, flags: ColumnFlags, policy: Option<WidthPolicy>) {
        let table_flags = self.flags;
        let column = &mut self.columns[column_n];
        let mut flags = flags.fixed_up(column_n);
        if !table_flags.contains(TableFlags::RESIZABLE) {
            flags |= ColumnFlags::NO_RESIZE;
        }
        if flags.contains(ColumnFlags::NO_SORT_ASCENDING | ColumnFlags::NO_SORT_DESCENDING) {
            flags |= ColumnFlags::NO_SORT;
        }
        column.policy = policy.unwrap_or(self.sizing.default_policy());
        column.flags = flags;

        column.update_sort_directions(table_flags.contains(TableFlags::SORT_TRISTATE));
        if !table_flags.contains(TableFlags::SORTABLE) || flags.contains(ColumnFlags::NO_SORT) {
            column.sort_directions_available.clear();
        }
        self.fix_column_sort_direction(column_n);
    }

    /// Request frozen columns and rows. Must be called before the first row.
    pub(crate) fn setup_scroll_freeze(&mut self, columns: usize, rows: usize) {
        assert!(
            !self.is_layout_locked,
            "setup_scroll_freeze must be called before the first row"
        );
        assert!(columns < MAX_COLUMNS, "too many frozen columns");
        self.freeze_columns_request = if self.flags.contains(TableFlags::SCROLL_X) {
            columns.min(self.columns.len())
        } else {
            0
        };
        self.freeze_columns_count = if self.scroll.x != 0.0 {
            self.freeze_columns_request
        } else {
            0
        };
        self.freeze_rows_request = if self.flags.contains(TableFlags::SCROLL_Y) {
            rows
        } else {
            0
        };
        self.freeze_rows_count = if self.scroll.y != 0.0 {
            self.freeze_rows_request
        } else {
            0
        };
        self.is_unfrozen_rows = self.freeze_rows_count == 0;
    }

    /// Width needed to show a column's content without clipping.
    pub(crate) fn column_width_auto(&self, column: &TableColumn) -> f32 {
        let body = column.content_max_x_frozen.max(column.content_max_x_unfrozen) - column.work_min_x;
        let headers = column.content_max_x_headers_ideal - column.work_min_x;
        let mut width_auto = body;
        if !column.flags.contains(ColumnFlags::NO_HEADER_WIDTH) {
            width_auto = width_auto.max(headers);
        }

        // Non-resizable fixed columns keep their requested width.
        if column.is_fixed()
            && column.init_width_or_weight > 0.0
            && (!self.flags.contains(TableFlags::RESIZABLE) || column.flags.contains(ColumnFlags::NO_RESIZE))
        {
            width_auto = column.init_width_or_weight;
        }
        width_auto.max(self.min_column_width)
    }

    /// Widest a column may get at its current position.
    ///
    /// Without horizontal scrolling every column to the right must keep room
    /// for its minimum width. With horizontal scrolling only frozen columns
    /// are bounded, by the visible width.
    pub(crate) fn max_column_width(&self, column_n: usize) -> f32 {
        let column = &self.columns[column_n];
        let min_column_distance =
            self.min_column_width + self.cell_padding_x * 2.0 + self.cell_spacing_x1 + self.cell_spacing_x2;
        let enabled_n = column.index_within_enabled_set.unwrap_or(0);
        if self.flags.contains(TableFlags::SCROLL_X) {
            if enabled_n < self.freeze_columns_request {
                let frozen_after = (self.freeze_columns_request - enabled_n) as f32;
                return self.inner_clip_rect.max.x
                    - frozen_after * min_column_distance
                    - column.min_x
                    - self.outer_padding_x
                    - self.cell_padding_x
                    - self.cell_spacing_x2;
            }
            f32::MAX
        } else if !self.flags.contains(TableFlags::NO_KEEP_COLUMNS_VISIBLE) {
            let columns_after = self.columns_enabled_count.saturating_sub(enabled_n + 1) as f32;
            self.work_rect.max.x
                - columns_after * min_column_distance
                - column.min_x
                - self.cell_spacing_x2
                - self.cell_padding_x * 2.0
                - self.outer_padding_x
        } else {
            f32::MAX
        }
    }

    /// Resolve widths, positions, clip rects and draw channels for this frame.
    pub(crate) fn update_layout(&mut self, env: &mut TableEnv) {
        assert!(!self.is_layout_locked, "layout already locked");
        stats::record_layout();

        let columns_count = self.columns.len();
        self.is_default_display_order = true;
        self.columns_enabled_count = 0;
        self.enabled_mask_by_index.reset(columns_count);
        self.enabled_mask_by_display_order.reset(columns_count);
        self.left_most_enabled_column = None;
        self.min_column_width = env.style.min_column_width();

        // Enabled state, links between enabled columns, automatic widths.
        let mut count_fixed = 0usize;
        let mut count_stretch = 0usize;
        let mut prev_enabled: Option<usize> = None;
        let mut has_auto_fit_request = false;
        let mut has_resizable = false;
        let mut stretch_sum_width_auto = 0.0f32;
        let mut fixed_max_width_auto = 0.0f32;
        for order_n in 0..columns_count {
            let column_n = self.display_order.column_at(order_n);
            if column_n != order_n {
                self.is_default_display_order = false;
            }

            // Columns not declared this frame fall back to defaults.
            if self.decl_columns_count <= column_n {
                self.setup_column_flags(column_n, ColumnFlags::empty(), None);
                let column = &mut self.columns[column_n];
                column.name.clear();
                column.user_id = 0;
                column.init_width_or_weight = -1.0;
            }

            let hideable = self.flags.contains(TableFlags::HIDEABLE);
            let sort_multi = self.flags.contains(TableFlags::SORT_MULTI);
            let column = &mut self.columns[column_n];
            if !hideable || column.flags.contains(ColumnFlags::NO_HIDE) {
                column.is_user_enabled_next_frame = true;
            }
            if column.is_user_enabled != column.is_user_enabled_next_frame {
                column.is_user_enabled = column.is_user_enabled_next_frame;
                self.is_settings_dirty = true;
            }
            column.is_enabled = column.is_user_enabled;

            if column.sort_order.is_some() && !column.is_enabled {
                self.is_sort_specs_dirty = true;
            }
            if column.sort_order.is_some_and(|o| o > 0) && !sort_multi {
                self.is_sort_specs_dirty = true;
            }

            let start_auto_fit = if column.is_fixed() {
                column.width_request < 0.0
            } else {
                column.stretch_weight < 0.0
            };
            if start_auto_fit {
                column.request_auto_fit();
            }

            if !column.is_enabled {
                column.index_within_enabled_set = None;
                continue;
            }

            column.prev_enabled = prev_enabled;
            column.next_enabled = None;
            column.index_within_enabled_set = Some(self.columns_enabled_count);
            match prev_enabled {
                Some(prev) => self.columns[prev].next_enabled = Some(column_n),
                None => self.left_most_enabled_column = Some(column_n),
            }
            self.columns_enabled_count += 1;
            self.enabled_mask_by_index.set(column_n);
            self.enabled_mask_by_display_order.set(order_n);
            prev_enabled = Some(column_n);

            if !self.columns[column_n].is_preserve_width_auto {
                let width_auto = self.column_width_auto(&self.columns[column_n]);
                self.columns[column_n].width_auto = width_auto;
            }

            let column = &mut self.columns[column_n];
            let resizable = !column.flags.contains(ColumnFlags::NO_RESIZE);
            if resizable {
                has_resizable = true;
            }
            if column.is_fixed() && column.init_width_or_weight > 0.0 && !resizable {
                column.width_auto = column.init_width_or_weight;
            }
            if column.auto_fit_queue != 0 {
                has_auto_fit_request = true;
            }
            if column.is_stretch() {
                stretch_sum_width_auto += column.width_auto;
                count_stretch += 1;
            } else {
                fixed_max_width_auto = fixed_max_width_auto.max(column.width_auto);
                count_fixed += 1;
            }
        }
        if self.flags.contains(TableFlags::SORTABLE)
            && self.sort_specs_count == 0
            && !self.flags.contains(TableFlags::SORT_TRISTATE)
        {
            self.is_sort_specs_dirty = true;
        }
        self.right_most_enabled_column = prev_enabled;
        if has_auto_fit_request {
            self.is_settings_dirty = true;
        }

        // Requested widths of fixed columns and weights of stretch columns.
        let mut sum_width_requests = 0.0f32;
        let mut stretch_sum_weights = 0.0f32;
        self.left_most_stretched_column = None;
        self.right_most_stretched_column = None;
        for column_n in 0..columns_count {
            if !self.enabled_mask_by_index.test(column_n) {
                continue;
            }
            let min_column_width = self.min_column_width;
            let is_initializing = self.is_initializing;
            let sizing = self.sizing;
            let order = self.display_order.order_of(column_n);
            let column = &mut self.columns[column_n];
            let resizable = !column.flags.contains(ColumnFlags::NO_RESIZE);
            if column.is_fixed() {
                let mut width_auto = column.width_auto;
                if sizing == TableSizing::FixedSame && (column.auto_fit_queue != 0 || !resizable) {
                    width_auto = fixed_max_width_auto;
                }

                // Latch the fitted width, or keep tracking content for non-resizable columns.
                if column.auto_fit_queue != 0 || (!resizable && column.is_request_output) {
                    column.width_request = width_auto;
                }

                // Start wide enough on the first frame so content measured while fitting is not squeezed.
                if column.auto_fit_queue > 0x01 && is_initializing && !column.is_preserve_width_auto {
                    column.width_request = column.width_request.max(min_column_width * 4.0);
                }
                sum_width_requests += column.width_request;
            } else {
                if column.auto_fit_queue != 0 || column.stretch_weight < 0.0 || !resizable {
                    column.stretch_weight = if column.init_width_or_weight > 0.0 {
                        column.init_width_or_weight
                    } else if sizing == TableSizing::StretchProp && stretch_sum_width_auto > 0.0 {
                        (column.width_auto / stretch_sum_width_auto) * count_stretch as f32
                    } else {
                        1.0
                    };
                }
                stretch_sum_weights += column.stretch_weight;

                let left_most = self.left_most_stretched_column;
                if left_most.map_or(true, |c| self.display_order.order_of(c) > order) {
                    self.left_most_stretched_column = Some(column_n);
                }
                let right_most = self.right_most_stretched_column;
                if right_most.map_or(true, |c| self.display_order.order_of(c) < order) {
                    self.right_most_stretched_column = Some(column_n);
                }
            }
            self.columns[column_n].is_preserve_width_auto = false;
            sum_width_requests += self.cell_padding_x * 2.0;
        }
        self.columns_enabled_fixed_count = count_fixed;
        self.columns_stretch_sum_weights = stretch_sum_weights;

        // Share the remaining width between stretch columns.
        let width_spacings = self.width_spacings();
        let width_avail = if self.flags.contains(TableFlags::SCROLL_X) && self.inner_width == 0.0 {
            self.inner_clip_rect.width()
        } else {
            self.work_rect.width()
        }
        .max(1.0);
        let width_avail_for_stretched_columns = width_avail - width_spacings - sum_width_requests;
        let mut width_remaining_for_stretched_columns = width_avail_for_stretched_columns;
        self.columns_given_width = width_spacings + self.cell_padding_x * 2.0 * self.columns_enabled_count as f32;
        for column_n in 0..columns_count {
            if !self.enabled_mask_by_index.test(column_n) {
                continue;
            }
            let min_column_width = self.min_column_width;
            let has_stretch = self.left_most_stretched_column.is_some();
            let column = &mut self.columns[column_n];
            if column.is_stretch() {
                let weight_ratio = column.stretch_weight / stretch_sum_weights;
                column.width_request =
                    ((width_avail_for_stretched_columns * weight_ratio).max(min_column_width) + 0.01).trunc();
                width_remaining_for_stretched_columns -= column.width_request;
            }

            // Resizing the right-most column is meaningless when stretch columns absorb any change.
            column.no_direct_resize = column.next_enabled.is_none() && has_stretch;

            column.width_given = column.width_request.max(min_column_width).floor();
            self.columns_given_width += column.width_given;
        }

        // Hand out the rounding remainder one pixel at a time, right to left.
        if width_remaining_for_stretched_columns >= 1.0 && !self.flags.contains(TableFlags::PRECISE_WIDTHS) {
            for order_n in (0..columns_count).rev() {
                if stretch_sum_weights <= 0.0 || width_remaining_for_stretched_columns < 1.0 {
                    break;
                }
                if !self.enabled_mask_by_display_order.test(order_n) {
                    continue;
                }
                let column = &mut self.columns[self.display_order.column_at(order_n)];
                if !column.is_stretch() {
                    continue;
                }
                column.width_request += 1.0;
                column.width_given += 1.0;
                width_remaining_for_stretched_columns -= 1.0;
            }
        }

        let last_outer_height = self.instance().last_outer_height;
        self.hovered_column_body = None;
        self.hovered_column_border = None;
        let mouse_hit_rect = Rect::new(
            self.outer_rect.min.x,
            self.outer_rect.min.y,
            self.outer_rect.max.x,
            self.outer_rect.max.y.max(self.outer_rect.min.y + last_outer_height),
        );
        let is_hovering_table = env.input.is_mouse_hovering_rect(&mouse_hit_rect);
        let mouse_x = env.input.mouse_pos().x;

        // Lock positions and clip rects left to right in display order.
        let mut visible_n = 0usize;
        let mut offset_x_frozen = self.freeze_columns_count > 0;
        let mut offset_x = if self.freeze_columns_count > 0 {
            self.outer_rect.min.x
        } else {
            self.work_rect.min.x
        } + self.outer_padding_x
            - self.cell_spacing_x1;
        let mut host_clip_rect = self.inner_clip_rect;
        self.visible_mask_by_index.reset(columns_count);
        for order_n in 0..columns_count {
            let column_n = self.display_order.column_at(order_n);

            if offset_x_frozen && self.freeze_columns_count == visible_n {
                offset_x += self.work_rect.min.x - self.outer_rect.min.x;
                offset_x_frozen = false;
            }

            self.columns[column_n].status = ColumnStatus::empty();

            if !self.enabled_mask_by_display_order.test(order_n) {
                // Zero-width clip rect, with a valid vertical range.
                let work_min_y = self.work_rect.min.y;
                let column = &mut self.columns[column_n];
                column.min_x = offset_x;
                column.max_x = offset_x;
                column.work_min_x = offset_x;
                column.width_given = 0.0;
                column.clip_rect = Rect::new(offset_x, work_min_y, offset_x, f32::MAX);
                column.clip_rect.clip_with_full(&host_clip_rect);
                column.is_visible_x = false;
                column.is_request_output = false;
                column.is_skip_items = true;
                column.item_width = 1.0;
                continue;
            }

            let max_width = self.max_column_width_at(column_n, offset_x);
            let cell_extra = self.cell_spacing_x1 + self.cell_spacing_x2 + self.cell_padding_x * 2.0;
            let min_column_width = self.min_column_width;
            let cell_padding_x = self.cell_padding_x;
            let cell_spacing_x1 = self.cell_spacing_x1;
            let cell_spacing_x2 = self.cell_spacing_x2;
            let work_min_y = self.work_rect.min.y;
            let host_skip_items = self.host_skip_items;

            let column = &mut self.columns[column_n];
            column.min_x = offset_x;
            column.width_given = column.width_given.min(max_width);
            column.width_given = column.width_given.max(column.width_request.min(min_column_width));
            column.max_x = offset_x + column.width_given + cell_extra;

            column.work_min_x = column.min_x + cell_padding_x + cell_spacing_x1;
            column.work_max_x = column.max_x - cell_padding_x - cell_spacing_x2;
            column.item_width = (column.width_given * 0.65).floor();
            column.clip_rect = Rect::new(column.min_x, work_min_y, column.max_x, f32::MAX);
            column.clip_rect.clip_with_full(&host_clip_rect);
            let hovered =
                is_hovering_table && mouse_x >= column.clip_rect.min.x && mouse_x < column.clip_rect.max.x;

            column.is_visible_x = column.clip_rect.max.x > column.clip_rect.min.x;
            let is_visible = column.is_visible_x;
            column.is_request_output = is_visible || column.auto_fit_queue != 0 || column.cannot_skip_items_queue != 0;
            column.is_skip_items = !column.is_enabled || host_skip_items;
            debug_assert!(!(column.is_skip_items && is_visible && !host_skip_items));

            column.status |= ColumnStatus::ENABLED;
            if is_visible {
                column.status |= ColumnStatus::VISIBLE;
            }
            if column.sort_order.is_some() {
                column.status |= ColumnStatus::SORTED;
            }
            if hovered {
                column.status |= ColumnStatus::HOVERED;
            }

            let work_min_x = column.work_min_x;
            column.reset_content(work_min_x);

            // Auto-fit counters only advance once the host actually submits items.
            if !host_skip_items {
                column.auto_fit_queue >>= 1;
                column.cannot_skip_items_queue >>= 1;
            }

            let max_x = column.max_x;
            let width_given = column.width_given;
            if is_visible {
                self.visible_mask_by_index.set(column_n);
            }
            if hovered {
                self.hovered_column_body = Some(column_n);
            }
            if visible_n < self.freeze_columns_count {
                host_clip_rect.min.x = (max_x + BORDER_SIZE).clamp(host_clip_rect.min.x, host_clip_rect.max.x);
            }

            offset_x += width_given + cell_extra;
            visible_n += 1;
        }

        // Hovering the unused space right of the last column.
        let unused_x1 = match self.right_most_enabled_column {
            Some(c) => self.work_rect.min.x.max(self.columns[c].clip_rect.max.x),
            None => self.work_rect.min.x,
        };
        if is_hovering_table && self.hovered_column_body.is_none() && mouse_x >= unused_x1 {
            self.hovered_column_body = Some(columns_count);
        }
        if !has_resizable && self.flags.contains(TableFlags::RESIZABLE) {
            self.flags.remove(TableFlags::RESIZABLE);
        }

        // Fixed-width tables may give back the space their columns do not use.
        if self.right_most_stretched_column.is_some() {
            self.flags.remove(TableFlags::NO_HOST_EXTEND_X);
        }
        if self.flags.contains(TableFlags::NO_HOST_EXTEND_X) {
            self.outer_rect.max.x = unused_x1;
            self.work_rect.max.x = unused_x1;
            self.inner_clip_rect.max.x = self.inner_clip_rect.max.x.min(unused_x1);
        }
        self.border_x1 = self.inner_clip_rect.min.x;
        self.border_x2 = self.inner_clip_rect.max.x;

        log::debug!(
            "table {:?} layout: {} enabled ({} fixed), widths {:?}",
            self.id,
            self.columns_enabled_count,
            self.columns_enabled_fixed_count,
            self.enabled_columns()
                .map(|c| self.columns[c].width_given)
                .collect::<Vec<_>>()
        );

        self.setup_draw_channels(env);

        if self.flags.contains(TableFlags::RESIZABLE) {
            self.update_borders(env);
        }
        self.instance_mut().last_first_row_height = 0.0;
        self.is_layout_locked = true;
        self.is_using_headers = false;

        if self.flags.contains(TableFlags::NO_CLIP) {
            env.splitter.set_current(env.draw_list, CHANNEL_NOCLIP);
        } else {
            env.draw_list.push_clip_rect(self.host_clip_rect, false);
            env.cursor.clip_rect = self.host_clip_rect;
        }
    }

    /// `max_column_width` for a column whose left edge is about to be locked at `min_x`.
    fn max_column_width_at(&mut self, column_n: usize, min_x: f32) -> f32 {
        self.columns[column_n].min_x = min_x;
        self.max_column_width(column_n)
    }

    /// Change the width of a column, taking the difference from a neighbour
    /// when stretch columns are involved.
    pub(crate) fn set_column_width(&mut self, column_n: usize, width: f32) {
        assert!(
            !self.is_layout_locked,
            "set_column_width must be called before the first row"
        );
        assert!(column_n < self.columns.len(), "column {column_n} out of range");
        let min_width = self.min_column_width;
        let max_width = min_width.max(self.max_column_width(column_n));
        let mut column_0_width = width.clamp(min_width, max_width);
        let column_0 = &self.columns[column_n];
        if column_0.width_given == column_0_width || column_0.width_request == column_0_width {
            return;
        }

        // The border between A and B moves: B gives up what A gains. The
        // right-most column borrows from its left neighbour, unless it is
        // fixed and can simply grow the table.
        let column_1 = match column_0.next_enabled {
            Some(next) => Some(next),
            None if column_0.is_fixed() => None,
            None => column_0.prev_enabled,
        };
        let Some(column_1) = column_1.filter(|&n| !self.columns[n].flags.contains(ColumnFlags::NO_RESIZE)) else {
            if self.columns[column_n].is_fixed() {
                self.columns[column_n].width_request = column_0_width;
                self.is_settings_dirty = true;
            }
            return;
        };

        // Keep the sum of both widths: a + b == a' + b'.
        let a_request = self.columns[column_n].width_request;
        let b_request = self.columns[column_1].width_request;
        let column_1_width = (b_request - (column_0_width - a_request)).max(min_width);
        column_0_width = a_request + b_request - column_1_width;
        debug_assert!(column_0_width > 0.0 && column_1_width > 0.0);
        self.columns[column_n].width_request = column_0_width;
        self.columns[column_1].width_request = column_1_width;
        if self.columns[column_n].is_stretch() || self.columns[column_1].is_stretch() {
            self.update_columns_weight_from_width();
        }
        self.is_settings_dirty = true;
    }

    /// Derive stretch weights from the current requested widths.
    pub(crate) fn update_columns_weight_from_width(&mut self) {
        let mut visible_weight = 0.0;
        let mut visible_width = 0.0;
        for column in self.columns.iter().filter(|c| c.is_enabled && c.is_stretch()) {
            visible_weight += column.stretch_weight;
            visible_width += column.width_request;
        }
        if visible_width <= 0.0 {
            return;
        }
        for column in self.columns.iter_mut().filter(|c| c.is_enabled && c.is_stretch()) {
            column.stretch_weight = (column.width_request / visible_width) * visible_weight;
        }
    }

    /// Fit a single column to its content at the next `begin_table`.
    pub(crate) fn set_column_width_auto_single(&mut self, column_n: usize) {
        let column = &mut self.columns[column_n];
        if !column.is_enabled {
            return;
        }
        column.cannot_skip_items_queue = 1 << 0;
        self.auto_fit_single_column = Some(column_n);
    }

    /// Fit every column to its content over the next frames.
    pub(crate) fn set_column_width_auto_all(&mut self) {
        for column in &mut self.columns {
            // A hidden stretch column cannot recompute its weight.
            if !column.is_enabled && !column.is_stretch() {
                continue;
            }
            if column.is_stretch() {
                column.stretch_weight = -1.0;
            }
            column.cannot_skip_items_queue = 1 << 0;
            column.auto_fit_queue = 1 << 1;
        }
    }

    /// Apply resize, auto-fit and reorder requests collected last frame.
    pub(crate) fn begin_apply_requests(&mut self) {
        if self.instance_current == 0 {
            if let (Some(column), Some(width)) = (self.resized_column, self.resized_column_next_width) {
                self.set_column_width(column, width);
            }
            self.last_resized_column = self.resized_column;
            self.resized_column_next_width = None;
            self.resized_column = None;

            if let Some(column) = self.auto_fit_single_column.take() {
                let width_auto = self.columns[column].width_auto;
                self.set_column_width(column, width_auto);
            }
        }

        if self.instance_current == 0 {
            if self.held_header_column.is_none() && self.reorder_column.is_some() {
                self.reorder_column = None;
            }
            self.held_header_column = None;
            if let Some(src) = self.reorder_column {
                if self.reorder_column_dir != 0 {
                    debug_assert!(self.flags.contains(TableFlags::REORDERABLE));
                    let dst = if self.reorder_column_dir < 0 {
                        self.columns[src].prev_enabled
                    } else {
                        self.columns[src].next_enabled
                    };
                    if let Some(dst) = dst {
                        let src_order = self.display_order.order_of(src);
                        let dst_order = self.display_order.order_of(dst);
                        self.display_order.move_to(src_order, dst_order);
                        log::debug!("table {:?}: column {src} moved to display order {dst_order}", self.id);
                    }
                    self.reorder_column_dir = 0;
                    self.is_settings_dirty = true;
                }
            }
        }

        if self.is_reset_display_order_request {
            self.display_order = super::DisplayOrder::identity(self.columns.len());
            self.is_reset_display_order_request = false;
            self.is_settings_dirty = true;
        }
    }

    /// Forget user widths, order, visibility and sort.
    pub(crate) fn reset_settings(&mut self) {
        self.is_initializing = true;
        self.is_settings_dirty = true;
        self.is_reset_all_request = false;
        self.is_settings_request_load = false;
        self.settings_loaded_flags = TableFlags::empty();
    }
}
