//! Column borders: resize hit-testing during layout, drawing at `end_table`.

use super::flags::{ColumnFlags, TableFlags, TableSizing};
use super::{Table, TableEnv, BORDER_SIZE, CHANNEL_BG0, RESIZE_FEEDBACK_DELAY, RESIZE_HALF_THICKNESS};
use crate::geometry::{Rect, Vec2};
use crate::input::{ButtonFlags, CursorIcon, MouseButton};

impl Table {
    /// Let the mouse grab the right border of each resizable column.
    ///
    /// The table's final height is only known at `end_table`, so the hit
    /// area uses last frame's height.
    pub(crate) fn update_borders(&mut self, env: &mut TableEnv) {
        debug_assert!(self.flags.contains(TableFlags::RESIZABLE));
        let instance = self.instance();
        let hit_y1 = if self.freeze_rows_count >= 1 {
            self.outer_rect.min.y
        } else {
            self.work_rect.min.y
        };
        let hit_y2_body = self.outer_rect.max.y.max(hit_y1 + instance.last_outer_height);
        let hit_y2_head = hit_y1 + instance.last_top_headers_row_height;
        let no_borders_in_body = self.flags.contains(TableFlags::NO_BORDERS_IN_BODY);
        if no_borders_in_body && !self.is_using_headers {
            return;
        }
        let hit_y2 = if no_borders_in_body { hit_y2_head } else { hit_y2_body };

        for order_n in 0..self.columns.len() {
            if !self.enabled_mask_by_display_order.test(order_n) {
                continue;
            }
            let column_n = self.display_order.column_at(order_n);
            let column = &self.columns[column_n];
            if column.flags.contains(ColumnFlags::NO_RESIZE) || column.no_direct_resize {
                continue;
            }
            if !column.is_visible_x && self.last_resized_column != Some(column_n) {
                continue;
            }

            let id = self.column_resize_id(column_n);
            let hit_rect = Rect::new(
                column.max_x - RESIZE_HALF_THICKNESS,
                hit_y1,
                column.max_x + RESIZE_HALF_THICKNESS,
                hit_y2,
            );
            let response = env.input.button_behavior(
                id,
                &hit_rect,
                ButtonFlags::PRESS_ON_CLICK | ButtonFlags::PRESS_ON_DOUBLE_CLICK,
            );
            let mut held = response.held;
            if response.pressed && env.input.is_mouse_double_clicked(MouseButton::Left) {
                log::debug!("table {:?}: auto-fit column {column_n}", self.id);
                self.set_column_width_auto_single(column_n);
                env.input.clear_active_id();
                held = false;
            }
            if held {
                if self.last_resized_column.is_none() {
                    self.resize_lock_min_contents_x2 = self
                        .right_most_enabled_column
                        .map_or(-f32::MAX, |c| self.columns[c].max_x);
                }
                self.resized_column = Some(column_n);
                self.instance_interacted = Some(self.instance_current);
            }
            if (response.hovered && env.input.hovered_id_timer() > RESIZE_FEEDBACK_DELAY) || held {
                self.hovered_column_border = Some(column_n);
                env.input.set_cursor(CursorIcon::ColResize);
            }
        }
    }

    /// Inner vertical borders, the outer frame and the line under the last row.
    pub(crate) fn draw_borders(&mut self, env: &mut TableEnv) {
        if !self.outer_rect.intersects(&env.cursor.clip_rect) {
            return;
        }
        env.splitter.set_current(env.draw_list, CHANNEL_BG0);
        env.draw_list.push_clip_rect(self.bg0_clip_rect_for_draw_cmd, false);

        let colors = &env.style.colors;
        let top_y = if self.freeze_rows_count >= 1 {
            self.inner_rect.min.y
        } else {
            self.work_rect.min.y
        };
        let outer_h_offset = if self.flags.contains(TableFlags::BORDERS_OUTER_H) { 1.0 } else { 0.0 };
        let draw_y1 = self.inner_rect.min.y.max(top_y) + outer_h_offset;
        let draw_y2_body = self.inner_rect.max.y;
        let draw_y2_head = if self.is_using_headers {
            self.inner_rect.max.y.min(top_y + self.instance().last_top_headers_row_height)
        } else {
            draw_y1
        };

        if self.flags.contains(TableFlags::BORDERS_INNER_V) {
            for order_n in 0..self.columns.len() {
                if !self.enabled_mask_by_display_order.test(order_n) {
                    continue;
                }
                let column_n = self.display_order.column_at(order_n);
                let column = &self.columns[column_n];
                let is_hovered = self.hovered_column_border == Some(column_n);
                let is_resized =
                    self.resized_column == Some(column_n) && self.instance_interacted == Some(self.instance_current);
                let is_resizable = !column.flags.contains(ColumnFlags::NO_RESIZE) && !column.no_direct_resize;
                let is_frozen_separator =
                    column.index_within_enabled_set.map(|n| n + 1) == Some(self.freeze_columns_count);
                if column.max_x > self.inner_clip_rect.max.x && !is_resized {
                    continue;
                }

                // The right-most border doubles as the outer border unless fixed columns leave a gap.
                if column.next_enabled.is_none()
                    && !is_resizable
                    && (self.sizing != TableSizing::FixedSame || self.flags.contains(TableFlags::NO_HOST_EXTEND_X))
                {
                    continue;
                }
                if column.max_x <= column.clip_rect.min.x {
                    continue;
                }

                let full_height = is_hovered
                    || is_resized
                    || is_frozen_separator
                    || !self.flags.contains(TableFlags::NO_BORDERS_IN_BODY);
                let draw_y2 = if full_height { draw_y2_body } else { draw_y2_head };
                let color = if is_resized {
                    colors.header_active
                } else if is_hovered {
                    colors.header_hovered
                } else if is_frozen_separator || !full_height {
                    colors.border_strong
                } else {
                    colors.border_light
                };
                if draw_y2 > draw_y1 {
                    env.draw_list.add_line(
                        Vec2::new(column.max_x, draw_y1),
                        Vec2::new(column.max_x, draw_y2),
                        color,
                        BORDER_SIZE,
                    );
                }
            }
        }

        if self.flags.intersects(TableFlags::BORDERS_OUTER) {
            let outer = self.outer_rect;
            let color = colors.border_strong;
            if self.flags.contains(TableFlags::BORDERS_OUTER) {
                env.draw_list.add_rect(outer, color, BORDER_SIZE);
            } else if self.flags.contains(TableFlags::BORDERS_OUTER_V) {
                env.draw_list.add_line(outer.min, Vec2::new(outer.min.x, outer.max.y), color, BORDER_SIZE);
                env.draw_list.add_line(Vec2::new(outer.max.x, outer.min.y), outer.max, color, BORDER_SIZE);
            } else {
                env.draw_list.add_line(outer.min, Vec2::new(outer.max.x, outer.min.y), color, BORDER_SIZE);
                env.draw_list.add_line(Vec2::new(outer.min.x, outer.max.y), outer.max, color, BORDER_SIZE);
            }
        }

        if self.flags.contains(TableFlags::BORDERS_INNER_H) && self.row_pos_y2 < self.outer_rect.max.y {
            let y = self.row_pos_y2;
            if y >= self.bg_clip_rect.min.y && y < self.bg_clip_rect.max.y {
                env.draw_list.add_line(
                    Vec2::new(self.border_x1, y),
                    Vec2::new(self.border_x2, y),
                    colors.border_light,
                    BORDER_SIZE,
                );
            }
        }

        env.draw_list.pop_clip_rect();
    }
}
