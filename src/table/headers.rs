//! Header cells.
//!
//! A header is a button covering its whole cell. Clicking it cycles the
//! column's sort direction and dragging it past a neighbour's edge asks for
//! the two columns to swap at the next `begin_table`.

use super::flags::{BgTarget, ColumnFlags, RowFlags, SortDirection, TableFlags};
use super::{Table, TableEnv};
use crate::geometry::{Rect, Vec2};
use crate::id::display_label;
use crate::input::{ButtonFlags, MouseButton};
use crate::renderer::DrawList;

/// Size of the sort arrow relative to the font.
const ARROW_SCALE: f32 = 0.65;

impl Table {
    /// Height of a headers row: the tallest label plus vertical cell padding.
    pub(crate) fn header_row_height(&self, env: &TableEnv) -> f32 {
        let mut row_height = env.font.line_height();
        for column_n in self.enabled_mask_by_index.iter() {
            let column = &self.columns[column_n];
            if !column.flags.contains(ColumnFlags::NO_HEADER_LABEL) {
                row_height = row_height.max(env.font.measure(display_label(&column.name)).y);
            }
        }
        row_height + self.cell_padding_y * 2.0
    }

    /// Open a headers row and submit a header for every column with output.
    pub(crate) fn headers_row(&mut self, env: &mut TableEnv) {
        if !self.is_layout_locked {
            self.update_layout(env);
        }
        let row_height = self.header_row_height(env);
        self.next_row(env, RowFlags::HEADERS, row_height);
        self.instance_mut().last_top_headers_row_height = row_height;
        if self.host_skip_items {
            return;
        }

        for column_n in 0..self.columns.len() {
            if !self.set_column_index(env, column_n) {
                continue;
            }
            let label = if self.columns[column_n].flags.contains(ColumnFlags::NO_HEADER_LABEL) {
                String::new()
            } else {
                self.columns[column_n].name.clone()
            };
            // Unnamed columns still get distinct ids.
            env.ids.push_int(column_n as u64);
            self.header(env, &label);
            env.ids.pop();
        }
    }

    /// Submit a header into the current cell.
    pub(crate) fn header(&mut self, env: &mut TableEnv, label: &str) {
        if env.cursor.skip_items {
            return;
        }
        let Some(column_n) = self.current_column else {
            log::warn!("table {:?}: header {label:?} submitted outside a cell", self.id);
            return;
        };

        let style = env.style;
        let text = display_label(label);
        let label_size = env.font.measure(text);
        let label_pos = env.cursor.pos;
        let cell_r = self.cell_bg_rect(column_n);
        let label_height = label_size.y.max(self.row_min_height - self.cell_padding_y * 2.0);

        // Room for the sort arrow and, for secondary keys, the sort order.
        let sortable = self.flags.contains(TableFlags::SORTABLE)
            && !self.columns[column_n].flags.contains(ColumnFlags::NO_SORT);
        let sort_order = self.columns[column_n].sort_order;
        let inner_spacing_x = (style.item_spacing.x * 0.5).floor();
        let mut w_arrow = 0.0;
        let mut w_sort_text = 0.0;
        let mut sort_order_text = String::new();
        if sortable {
            w_arrow = (env.font.line_height() * ARROW_SCALE + style.frame_padding.x).floor();
            if let Some(order) = sort_order.filter(|&o| o > 0) {
                sort_order_text = (order + 1).to_string();
                w_sort_text = inner_spacing_x + env.font.measure(&sort_order_text).x;
            }
        }
        let sort_arrow = sortable && sort_order.is_some();

        // Content width goes to the column directly so the cell stays mergeable.
        let max_pos_x = label_pos.x + label_size.x + w_sort_text + w_arrow;
        let column = &mut self.columns[column_n];
        let used = if sort_arrow { cell_r.max.x } else { max_pos_x.min(cell_r.max.x) };
        column.content_max_x_headers_used = column.content_max_x_headers_used.max(used);
        column.content_max_x_headers_ideal = column.content_max_x_headers_ideal.max(max_pos_x);

        let id = env.ids.get(label);
        let bb = Rect::new(
            cell_r.min.x,
            cell_r.min.y,
            cell_r.max.x,
            cell_r.max.y.max(cell_r.min.y + label_height + self.cell_padding_y * 2.0),
        );
        env.cursor.item_size(Vec2::new(0.0, label_height), style.item_spacing.y);
        if !env.cursor.is_rect_visible(&bb) {
            return;
        }

        let response = env.input.button_behavior(id, &bb, ButtonFlags::ALLOW_OVERLAP);
        if response.held || response.hovered {
            let color = if response.held {
                style.colors.header_active
            } else {
                style.colors.header_hovered
            };
            self.set_bg_color(BgTarget::CellBg, color, Some(column_n));
        } else if !self.row_flags.contains(RowFlags::HEADERS) {
            // A lone header still looks like one.
            self.set_bg_color(BgTarget::CellBg, style.colors.header_bg, Some(column_n));
        }
        if response.held {
            self.held_header_column = Some(column_n);
        }
        env.cursor.pos.y -= style.item_spacing.y * 0.5;

        if response.held && self.flags.contains(TableFlags::REORDERABLE) && env.input.is_mouse_dragging(MouseButton::Left) {
            self.reorder_column = Some(column_n);
            self.instance_interacted = Some(self.instance_current);
            let mouse_x = env.input.mouse_pos().x;
            let delta_x = env.input.mouse_delta().x;
            if delta_x < 0.0 && mouse_x < cell_r.min.x {
                if let Some(prev) = self.columns[column_n].prev_enabled {
                    if self.can_reorder_with(column_n, prev) {
                        self.reorder_column_dir = -1;
                    }
                }
            }
            if delta_x > 0.0 && mouse_x > cell_r.max.x {
                if let Some(next) = self.columns[column_n].next_enabled {
                    if self.can_reorder_with(column_n, next) {
                        self.reorder_column_dir = 1;
                    }
                }
            }
        }

        let ellipsis_max = (cell_r.max.x - w_arrow - w_sort_text).max(label_pos.x);
        if sortable {
            if sort_arrow {
                let mut x = cell_r.min.x.max(cell_r.max.x - w_arrow - w_sort_text);
                let y = label_pos.y;
                if !sort_order_text.is_empty() {
                    let color = style.colors.text.with_alpha(style.colors.text.a * 0.7);
                    env.font
                        .render(env.draw_list, Vec2::new(x + inner_spacing_x, y), color, &sort_order_text, None);
                    x += w_sort_text;
                }
                let direction = self.columns[column_n].sort_direction.unwrap_or(SortDirection::Ascending);
                render_arrow(
                    env.draw_list,
                    Vec2::new(x, y),
                    env.font.line_height(),
                    direction,
                    style.colors.sort_arrow,
                );
            }

            // A click that ended a drag is not a sort request.
            if response.pressed && self.reorder_column != Some(column_n) {
                let direction = self.columns[column_n].next_sort_direction();
                if direction.is_some() || self.flags.contains(TableFlags::SORT_TRISTATE) {
                    let append = env.input.modifiers().shift;
                    self.set_column_sort_direction(column_n, direction, append);
                }
            }
        }

        render_text_ellipsis(env, label_pos, ellipsis_max, text);
    }

    /// Whether `column_n` may swap places with its neighbour `other`:
    /// neither is pinned and both sit on the same side of the freeze line.
    fn can_reorder_with(&self, column_n: usize, other: usize) -> bool {
        let a = &self.columns[column_n];
        let b = &self.columns[other];
        if (a.flags | b.flags).contains(ColumnFlags::NO_REORDER) {
            return false;
        }
        let frozen = |index: Option<usize>| index.is_some_and(|i| i < self.freeze_columns_request);
        frozen(a.index_within_enabled_set) == frozen(b.index_within_enabled_set)
    }
}

/// Filled triangle pointing up for ascending, down for descending.
fn render_arrow(draw_list: &mut DrawList, pos: Vec2, font_size: f32, direction: SortDirection, color: crate::geometry::Color) {
    let h = font_size;
    let mut r = h * 0.40 * ARROW_SCALE;
    let center = pos + Vec2::new(h * 0.5, h * 0.5 * ARROW_SCALE);
    if direction == SortDirection::Ascending {
        r = -r;
    }
    let a = Vec2::new(0.0, 0.750) * r;
    let b = Vec2::new(-0.866, -0.750) * r;
    let c = Vec2::new(0.866, -0.750) * r;
    draw_list.add_triangle_filled(center + a, center + b, center + c, color);
}

/// Draw `text`, cut short with "..." when it would pass `max_x`.
fn render_text_ellipsis(env: &mut TableEnv, pos: Vec2, max_x: f32, text: &str) {
    let color = env.style.colors.text;
    let avail = max_x - pos.x;
    if env.font.measure(text).x <= avail {
        env.font.render(env.draw_list, pos, color, text, None);
        return;
    }
    const ELLIPSIS: &str = "...";
    let ellipsis_width = env.font.measure(ELLIPSIS).x;
    let end = env.font.fit_prefix(text, (avail - ellipsis_width).max(0.0));
    let shown = format!("{}{ELLIPSIS}", text[..end].trim_end());
    let clip = Rect::new(pos.x, pos.y, max_x.max(pos.x), pos.y + env.font.line_height());
    env.font.render(env.draw_list, pos, color, &shown, Some(clip));
}
