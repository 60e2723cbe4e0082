//! Row and cell cursor.
//!
//! A row is open between `next_row` and the following `next_row` (or
//! `end_table`); within it, at most one cell is open. Opening a cell moves
//! the layout cursor into the column and activates the column's draw
//! channel; closing it feeds the column's content width back to the solver.

use super::channels::set_clip_and_channel;
use super::flags::{BgTarget, RowFlags, TableFlags};
use super::{CellBg, Table, TableEnv, BORDER_SIZE, CHANNEL_BG0, CHANNEL_NOCLIP};
use crate::geometry::{Color, Rect, Vec2};

impl Table {
    /// Close the current row, if any, and open the next one.
    pub(crate) fn next_row(&mut self, env: &mut TableEnv, row_flags: RowFlags, min_height: f32) {
        if !self.is_layout_locked {
            self.update_layout(env);
        }
        if self.is_inside_row {
            self.end_row(env);
        }
        self.last_row_flags = self.row_flags;
        self.row_flags = row_flags;
        self.row_min_height = min_height;
        self.begin_row(env);

        // Rows are at least as tall as their padding, taller rows come from content.
        self.row_pos_y2 += self.cell_padding_y * 2.0;
        self.row_pos_y2 = self.row_pos_y2.max(self.row_pos_y1 + min_height);

        // No output until a cell is opened.
        env.cursor.skip_items = true;
    }

    fn begin_row(&mut self, env: &mut TableEnv) {
        self.current_row += 1;
        self.current_column = None;
        self.row_bg_color = [None; 2];
        self.row_cell_data.clear();
        self.is_inside_row = true;

        // Frozen rows start at the top of the table, outside the scrolled area.
        let mut next_y1 = self.row_pos_y2;
        if self.current_row == 0 && self.freeze_rows_count > 0 {
            next_y1 = self.outer_rect.min.y;
            env.cursor.pos.y = next_y1;
        }
        self.row_pos_y1 = next_y1;
        self.row_pos_y2 = next_y1;
        self.row_indent_offset_x = env.cursor.indent_x - self.host_indent_x;
        env.cursor.prev_line_height = 0.0;
        env.cursor.curr_line_height = 0.0;
        env.cursor.max_pos.y = next_y1;

        if self.row_flags.contains(RowFlags::HEADERS) {
            self.set_bg_color(BgTarget::RowBg0, env.style.colors.header_bg, None);
            if self.current_row == 0 {
                self.is_using_headers = true;
            }
        }
    }

    /// Draw the row backgrounds and borders, and unfreeze after the last frozen row.
    pub(crate) fn end_row(&mut self, env: &mut TableEnv) {
        assert!(self.is_inside_row, "end_row outside a row");
        if self.current_column.is_some() {
            self.end_cell(env);
        }
        env.cursor.pos.y = self.row_pos_y2;

        let bg_y1 = self.row_pos_y1;
        let bg_y2 = self.row_pos_y2;
        let row_n = self.current_row as usize;
        let unfreeze_rows = row_n + 1 == self.freeze_rows_count;
        if self.current_row == 0 {
            self.instance_mut().last_first_row_height = bg_y2 - bg_y1;
        }

        let is_visible = bg_y2 >= self.inner_clip_rect.min.y && bg_y1 <= self.inner_clip_rect.max.y;
        if is_visible {
            let colors = &env.style.colors;
            let bg_col0 = self.row_bg_color[0].or_else(|| {
                self.flags.contains(TableFlags::ROW_BG).then(|| {
                    if self.row_bg_color_counter & 1 == 1 {
                        colors.row_bg_alt
                    } else {
                        colors.row_bg
                    }
                })
            });
            let bg_col1 = self.row_bg_color[1];

            let top_border_col = (self.current_row > 0 && self.flags.contains(TableFlags::BORDERS_INNER_H)).then(|| {
                if self.last_row_flags.contains(RowFlags::HEADERS) {
                    colors.border_strong
                } else {
                    colors.border_light
                }
            });

            let draw_cell_bg = !self.row_cell_data.is_empty();
            if bg_col0.is_some() || bg_col1.is_some() || top_border_col.is_some() || unfreeze_rows || draw_cell_bg {
                // Every cell change sets its own clip rect, so only the header needs overwriting here.
                if !self.flags.contains(TableFlags::NO_CLIP) {
                    env.draw_list.set_clip_rect_before_set_channel(self.bg0_clip_rect_for_draw_cmd);
                }
                env.splitter.set_current(env.draw_list, CHANNEL_BG0);
            }

            // Backgrounds are clipped on the CPU so they all share the bg0 clip rect.
            let mut row_rect = Rect::new(self.work_rect.min.x, bg_y1, self.work_rect.max.x, bg_y2);
            row_rect.clip_with(&self.bg_clip_rect);
            if row_rect.min.y < row_rect.max.y {
                for color in [bg_col0, bg_col1].into_iter().flatten() {
                    env.draw_list.add_rect_filled(row_rect, color);
                }
            }

            for cell in &self.row_cell_data {
                let column = &self.columns[cell.column];
                let mut rect = self.cell_bg_rect(cell.column);
                rect.clip_with(&self.bg_clip_rect);
                rect.min.x = rect.min.x.max(column.clip_rect.min.x);
                rect.max.x = rect.max.x.min(column.max_x);
                if rect.min.y < rect.max.y {
                    env.draw_list.add_rect_filled(rect, cell.color);
                }
            }

            let in_bg_clip = |y: f32| y >= self.bg_clip_rect.min.y && y < self.bg_clip_rect.max.y;
            if let Some(color) = top_border_col {
                if in_bg_clip(bg_y1) {
                    env.draw_list.add_line(
                        Vec2::new(self.border_x1, bg_y1),
                        Vec2::new(self.border_x2, bg_y1),
                        color,
                        BORDER_SIZE,
                    );
                }
            }
            // The line under the last frozen row is always strong.
            if unfreeze_rows && in_bg_clip(bg_y2) {
                env.draw_list.add_line(
                    Vec2::new(self.border_x1, bg_y2),
                    Vec2::new(self.border_x2, bg_y2),
                    colors.border_strong,
                    BORDER_SIZE,
                );
            }
        }

        if unfreeze_rows {
            self.unfreeze_rows(env);
        }

        if !self.row_flags.contains(RowFlags::HEADERS) {
            self.row_bg_color_counter += 1;
        }
        self.is_inside_row = false;
    }

    /// Move from the frozen band into scrolled space.
    fn unfreeze_rows(&mut self, env: &mut TableEnv) {
        assert!(!self.is_unfrozen_rows, "rows unfrozen twice");
        let y0 = (self.row_pos_y2 + 1.0).max(self.inner_clip_rect.min.y);
        self.is_unfrozen_rows = true;
        let outer_min_y = self.outer_rect.min.y;
        self.instance_mut().last_frozen_height = y0 - outer_min_y;

        let clip_min_y = y0.min(self.inner_clip_rect.max.y);
        self.bg_clip_rect.min.y = clip_min_y;
        self.bg2_clip_rect_for_draw_cmd.min.y = clip_min_y;
        self.bg_clip_rect.max.y = self.inner_clip_rect.max.y;
        self.bg2_clip_rect_for_draw_cmd.max.y = self.inner_clip_rect.max.y;
        self.bg2_draw_channel_current = self.bg2_draw_channel_unfrozen;

        let row_height = self.row_pos_y2 - self.row_pos_y1;
        self.row_pos_y2 = self.work_rect.min.y + self.row_pos_y2 - outer_min_y;
        self.row_pos_y1 = self.row_pos_y2 - row_height;
        env.cursor.pos.y = self.row_pos_y2;
        for column in &mut self.columns {
            column.draw_channel_current = column.draw_channel_unfrozen;
            column.clip_rect.min.y = clip_min_y;
        }
        log::trace!("table {:?}: rows unfrozen at y {}", self.id, self.row_pos_y2);

        if let Some(first) = self.columns.first() {
            let (clip, channel) = (first.clip_rect, first.draw_channel_current);
            set_clip_and_channel(env.draw_list, env.splitter, &mut env.cursor.clip_rect, clip, channel);
        }
    }

    pub(crate) fn begin_cell(&mut self, env: &mut TableEnv, column_n: usize) {
        self.current_column = Some(column_n);
        let column = &self.columns[column_n];
        let mut start_x = column.work_min_x;
        if column.flags.contains(super::flags::ColumnFlags::INDENT_ENABLE) {
            start_x += self.row_indent_offset_x;
        }

        let cursor = &mut *env.cursor;
        cursor.pos.x = start_x;
        cursor.pos.y = self.row_pos_y1 + self.cell_padding_y;
        cursor.max_pos.x = start_x;
        cursor.line_start_x = start_x;
        cursor.work_rect.min.y = cursor.pos.y;
        cursor.work_rect.min.x = column.work_min_x;
        cursor.work_rect.max.x = column.work_max_x;
        cursor.item_width = column.item_width;
        cursor.skip_items = column.is_skip_items;

        if self.flags.contains(TableFlags::NO_CLIP) {
            env.splitter.set_current(env.draw_list, CHANNEL_NOCLIP);
        } else {
            let (clip, channel) = (column.clip_rect, column.draw_channel_current);
            set_clip_and_channel(env.draw_list, env.splitter, &mut env.cursor.clip_rect, clip, channel);
        }
    }

    pub(crate) fn end_cell(&mut self, env: &mut TableEnv) {
        let Some(column_n) = self.current_column else {
            return;
        };
        let is_headers = self.row_flags.contains(RowFlags::HEADERS);
        let is_unfrozen = self.is_unfrozen_rows;
        let column = &mut self.columns[column_n];
        let max_x = env.cursor.max_pos.x;
        let content = if is_headers {
            &mut column.content_max_x_headers_used
        } else if is_unfrozen {
            &mut column.content_max_x_unfrozen
        } else {
            &mut column.content_max_x_frozen
        };
        *content = content.max(max_x);
        if column.is_enabled {
            self.row_pos_y2 = self.row_pos_y2.max(env.cursor.max_pos.y + self.cell_padding_y);
        }
        column.item_width = env.cursor.item_width;
    }

    /// Move to the next cell, wrapping to a new row after the last column.
    /// Returns whether the cell's content is worth submitting.
    pub(crate) fn next_column(&mut self, env: &mut TableEnv) -> bool {
        match self.current_column {
            Some(c) if self.is_inside_row && c + 1 < self.columns.len() => {
                self.end_cell(env);
                self.begin_cell(env, c + 1);
            }
            None if self.is_inside_row => self.begin_cell(env, 0),
            _ => {
                self.next_row(env, RowFlags::empty(), 0.0);
                self.begin_cell(env, 0);
            }
        }
        self.current_column.is_some_and(|c| self.columns[c].is_request_output)
    }

    /// Jump to a column of the current row.
    pub(crate) fn set_column_index(&mut self, env: &mut TableEnv, column_n: usize) -> bool {
        assert!(column_n < self.columns.len(), "column {column_n} out of range");
        if !self.is_inside_row {
            self.next_row(env, RowFlags::empty(), 0.0);
        }
        if self.current_column != Some(column_n) {
            self.end_cell(env);
            self.begin_cell(env, column_n);
        }
        self.columns[column_n].is_request_output
    }

    /// Color a row layer or a cell of the current row. Ignored for rows
    /// already below the visible area and for hidden columns.
    pub(crate) fn set_bg_color(&mut self, target: BgTarget, color: Color, column: Option<usize>) {
        if self.row_pos_y1 > self.inner_clip_rect.max.y {
            return;
        }
        match target {
            BgTarget::CellBg => {
                let Some(column_n) = column.or(self.current_column) else {
                    return;
                };
                if !self.visible_mask_by_index.test(column_n) {
                    return;
                }
                match self.row_cell_data.last_mut() {
                    Some(last) if last.column == column_n => last.color = color,
                    _ => self.row_cell_data.push(CellBg { column: column_n, color }),
                }
            }
            BgTarget::RowBg0 => self.row_bg_color[0] = Some(color),
            BgTarget::RowBg1 => self.row_bg_color[1] = Some(color),
        }
    }
}
