//! The table context.
//!
//! [`TableContext`] owns everything a frame of tables needs: the host draw
//! list and layout cursor, pointer interaction, the id stack, the registry of
//! retained tables with their saved settings, and a stack of per-depth
//! scratch data for nested tables. All table calls go through it; the table
//! they apply to is the innermost one begun and not yet ended.

use std::collections::HashMap;
use std::mem;
use std::ops::{Deref, DerefMut};

use crate::cursor::LayoutCursor;
use crate::geometry::{Rect, Vec2};
use crate::id::{Id, IdStack};
use crate::input::{FrameInput, Interaction};
use crate::renderer::{DrawList, FixedFont, Font};
use crate::stats;
use crate::style::TableStyle;
use crate::table::{
    BgTarget, ColumnFlags, ColumnSetup, RowFlags, SettingsStore, SortDirection, SortSpecs, Table, TableColumn,
    TableEnv, TableFlags, TableInstanceData, TableSizing, TableTempData, WidthPolicy, BORDER_SIZE, MAX_COLUMNS,
    RESIZE_HALF_THICKNESS,
};

/// Switches for inspecting the engine's output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DebugOptions {
    /// Leave every column channel as its own draw command at `end_table`
    pub disable_channel_merge: bool,
}

pub struct TableContext {
    tables: HashMap<Id, Table>,
    settings: SettingsStore,
    temp_data: Vec<TableTempData>,
    depth: usize,
    draw_list: DrawList,
    input: Interaction,
    cursor: LayoutCursor,
    ids: IdStack,
    font: Box<dyn Font>,
    style: TableStyle,
    frame_count: u64,
    next_sizing: Option<TableSizing>,
    pub debug: DebugOptions,
}

impl TableContext {
    pub fn new(style: TableStyle) -> Self {
        Self::with_font(style, Box::new(FixedFont::default()))
    }

    pub fn with_font(style: TableStyle, font: Box<dyn Font>) -> Self {
        let input = Interaction::new();
        let area = Rect::from_pos_size(Vec2::ZERO, input.display_size());
        Self {
            tables: HashMap::new(),
            settings: SettingsStore::new(),
            temp_data: Vec::new(),
            depth: 0,
            draw_list: DrawList::new(),
            input,
            cursor: LayoutCursor::new(area),
            ids: IdStack::new(),
            font,
            style,
            frame_count: 0,
            next_sizing: None,
            debug: DebugOptions::default(),
        }
    }

    /// Start a frame: feed input, reset the draw list and the cursor, and
    /// release buffers of tables that have been idle for a while.
    pub fn new_frame(&mut self, input: &FrameInput) {
        assert_eq!(self.depth, 0, "new_frame called while a table is open");
        self.frame_count += 1;
        self.input.new_frame(input);
        self.draw_list.reset();
        let area = Rect::from_pos_size(Vec2::ZERO, input.display_size);
        self.cursor = LayoutCursor::new(area);
        self.draw_list.push_clip_rect(area, false);
        self.ids = IdStack::new();
        self.compact_idle_tables();
    }

    fn compact_idle_tables(&mut self) {
        let Some(secs) = self.style.compact_after_secs else {
            return;
        };
        let threshold = self.input.time() - secs as f64;
        for table in self.tables.values_mut() {
            if table.last_time_active >= 0.0 && table.last_time_active < threshold {
                table.compact_transient_buffers();
                table.last_time_active = -1.0;
            }
        }
        for temp in &mut self.temp_data {
            if temp.last_time_active >= 0.0 && temp.last_time_active < threshold {
                log::debug!("releasing draw channels of nesting depth for table {:?}", temp.table_id);
                temp.splitter.clear_free_memory();
                temp.last_time_active = -1.0;
            }
        }
    }

    /// Finish the frame and hand out the draw list.
    pub fn end_frame(&mut self) -> &DrawList {
        assert_eq!(self.depth, 0, "end_frame called while a table is open");
        self.draw_list.pop_clip_rect();
        stats::end_frame();
        &self.draw_list
    }

    pub fn draw_list(&self) -> &DrawList {
        &self.draw_list
    }

    pub fn draw_list_mut(&mut self) -> &mut DrawList {
        &mut self.draw_list
    }

    pub fn input(&self) -> &Interaction {
        &self.input
    }

    pub fn style(&self) -> &TableStyle {
        &self.style
    }

    pub fn style_mut(&mut self) -> &mut TableStyle {
        &mut self.style
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    pub fn cursor(&self) -> &LayoutCursor {
        &self.cursor
    }

    pub fn cursor_pos(&self) -> Vec2 {
        self.cursor.pos
    }

    pub fn set_cursor_pos(&mut self, pos: Vec2) {
        self.cursor.pos = pos;
        self.cursor.max_pos = self.cursor.max_pos.max(pos);
    }

    /// Lay out an item of `size` at the cursor. Returns whether it is visible.
    pub fn item(&mut self, size: Vec2) -> bool {
        if self.cursor.skip_items {
            return false;
        }
        let rect = Rect::from_pos_size(self.cursor.pos, size);
        self.cursor.item_size(size, self.style.item_spacing.y);
        self.cursor.is_rect_visible(&rect)
    }

    /// Lay out and draw one line of text.
    pub fn text(&mut self, text: &str) {
        if self.cursor.skip_items {
            return;
        }
        let size = self.font.measure(text);
        let rect = Rect::from_pos_size(self.cursor.pos, size);
        if self.cursor.is_rect_visible(&rect) {
            self.font
                .render(&mut self.draw_list, self.cursor.pos, self.style.colors.text, text, None);
        }
        self.cursor.item_size(size, self.style.item_spacing.y);
    }

    pub fn indent(&mut self) {
        self.cursor.indent(self.style.indent_spacing);
    }

    pub fn unindent(&mut self) {
        self.cursor.unindent(self.style.indent_spacing);
    }

    pub fn push_id(&mut self, label: &str) {
        self.ids.push_str(label);
    }

    pub fn pop_id(&mut self) {
        self.ids.pop();
    }

    pub fn settings(&self) -> &SettingsStore {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut SettingsStore {
        &mut self.settings
    }

    /// Table registered under `id`, whether or not it is open.
    pub fn table(&self, id: Id) -> Option<&Table> {
        self.tables.get(&id)
    }

    /// Table a `begin_table(name, ..)` at the current id scope refers to.
    pub fn table_by_name(&self, name: &str) -> Option<&Table> {
        self.tables.get(&self.ids.get(name))
    }

    /// Innermost open table.
    pub fn current_table(&self) -> Option<&Table> {
        let temp = self.temp_data.get(self.depth.checked_sub(1)?)?;
        self.tables.get(&temp.table_id)
    }

    /// Run `f` against the innermost open table and the shared frame state.
    fn with_current<R>(&mut self, f: impl FnOnce(&mut Table, &mut TableEnv) -> R) -> Option<R> {
        let temp = self.temp_data.get_mut(self.depth.checked_sub(1)?)?;
        let table = self.tables.get_mut(&temp.table_id)?;
        let mut env = TableEnv {
            draw_list: &mut self.draw_list,
            splitter: &mut temp.splitter,
            input: &mut self.input,
            cursor: &mut self.cursor,
            ids: &mut self.ids,
            font: self.font.as_ref(),
            style: &self.style,
        };
        Some(f(table, &mut env))
    }

    /// Sizing policy for the next `begin_table`. Without one, tables with
    /// horizontal scrolling use `FixedFit` and others `StretchSame`.
    pub fn set_next_table_sizing(&mut self, sizing: TableSizing) {
        self.next_sizing = Some(sizing);
    }

    /// Begin a table of `columns` columns.
    ///
    /// A zero `outer_size` axis takes the available space (or, for height
    /// without scrolling, grows with the rows); a negative one leaves that
    /// much space free. Returns `false` when the table is not submitted, in
    /// which case `end_table` must not be called.
    pub fn begin_table(
        &mut self,
        name: &str,
        columns: usize,
        flags: TableFlags,
        outer_size: Vec2,
        inner_width: f32,
    ) -> bool {
        let id = self.ids.get(name);
        self.begin_table_with_id(id, columns, flags, outer_size, inner_width)
    }

    /// Like [`begin_table`](Self::begin_table), returning a guard that ends
    /// the table when dropped.
    pub fn begin_table_scoped(
        &mut self,
        name: &str,
        columns: usize,
        flags: TableFlags,
        outer_size: Vec2,
        inner_width: f32,
    ) -> Option<TableScope<'_>> {
        if self.begin_table(name, columns, flags, outer_size, inner_width) {
            Some(TableScope { ctx: self })
        } else {
            None
        }
    }

    pub fn begin_table_with_id(
        &mut self,
        id: Id,
        columns: usize,
        flags: TableFlags,
        outer_size: Vec2,
        inner_width: f32,
    ) -> bool {
        let sizing = self.next_sizing.take();
        if self.cursor.skip_items {
            return false;
        }
        assert!(
            columns > 0 && columns <= MAX_COLUMNS,
            "a table needs between 1 and {MAX_COLUMNS} columns, got {columns}"
        );
        if flags.contains(TableFlags::SCROLL_X) {
            assert!(inner_width >= 0.0, "inner_width must not be negative with SCROLL_X");
        }

        let use_scroll = flags.intersects(TableFlags::SCROLL_X | TableFlags::SCROLL_Y);
        let avail = self.cursor.content_region_avail();
        let actual_outer_size = Vec2::new(
            resolve_item_size(outer_size.x, avail.x, avail.x.max(1.0)),
            resolve_item_size(outer_size.y, avail.y, if use_scroll { avail.y.max(1.0) } else { 0.0 }),
        );
        let outer_rect = Rect::from_pos_size(self.cursor.pos, actual_outer_size);
        if use_scroll && !self.cursor.is_rect_visible(&outer_rect) {
            self.cursor.item_size(actual_outer_size, self.style.item_spacing.y);
            return false;
        }

        let sizing = sizing.unwrap_or(if flags.contains(TableFlags::SCROLL_X) {
            TableSizing::FixedFit
        } else {
            TableSizing::StretchSame
        });
        let flags = flags.fixed_up(sizing);

        // Scratch data for this nesting depth.
        self.depth += 1;
        if self.temp_data.len() < self.depth {
            self.temp_data.resize_with(self.depth, TableTempData::default);
        }
        let time = self.input.time();
        let frame = self.frame_count;
        let table = self.tables.entry(id).or_insert_with(|| {
            log::debug!("creating table {id:?} with {columns} columns");
            Table::new(id)
        });

        let instance_no = if !table.instances.is_empty() && table.last_frame_active == frame {
            assert_eq!(
                table.columns.len(),
                columns,
                "cannot change column count mid-frame for the same id"
            );
            table.instance_current + 1
        } else {
            0
        };
        let previous_flags = table.flags;
        table.flags = flags;
        table.sizing = sizing;
        table.last_frame_active = frame;
        table.is_layout_locked = false;
        table.inner_width = inner_width;
        table.instance_current = instance_no;
        let instance_id = if instance_no > 0 {
            id.with_str("##Instances").with_int(instance_no as u64)
        } else {
            id
        };
        if table.instances.len() <= instance_no {
            table.instances.resize_with(instance_no + 1, TableInstanceData::default);
        }
        table.instance_mut().id = instance_id;

        // Scrolling, clamped against last frame's content.
        if let Some(next) = table.scroll_next.take() {
            table.scroll = next;
        }
        let max_scroll = (table.content_size - actual_outer_size).max(Vec2::ZERO);
        table.scroll.x = if flags.contains(TableFlags::SCROLL_X) {
            table.scroll.x.clamp(0.0, max_scroll.x)
        } else {
            0.0
        };
        table.scroll.y = if flags.contains(TableFlags::SCROLL_Y) {
            table.scroll.y.clamp(0.0, max_scroll.y)
        } else {
            0.0
        };

        table.outer_rect = outer_rect;
        table.inner_rect = outer_rect;
        if use_scroll {
            let mut host_clip = self.cursor.clip_rect;
            host_clip.clip_with_full(&outer_rect);
            table.host_clip_rect = host_clip;
            let mut work = outer_rect.offset(-table.scroll.x, -table.scroll.y);
            if flags.contains(TableFlags::SCROLL_X) {
                let width = if inner_width > 0.0 {
                    inner_width.max(outer_rect.width())
                } else {
                    table.content_size.x.max(outer_rect.width())
                };
                work.max.x = work.min.x + width;
            }
            table.work_rect = work;
        } else {
            table.host_clip_rect = self.cursor.clip_rect;
            table.work_rect = outer_rect;
        }

        self.ids.push_id(id);
        if instance_no > 0 {
            self.ids.push_id(instance_id);
        }

        // Back up the host cursor state the table overwrites.
        let temp = &mut self.temp_data[self.depth - 1];
        temp.table_id = id;
        temp.user_outer_size = outer_size;
        temp.host_backup_work_rect = self.cursor.work_rect;
        temp.host_backup_cursor_max_pos = self.cursor.max_pos;
        temp.host_backup_prev_line_height = self.cursor.prev_line_height;
        temp.host_backup_curr_line_height = self.cursor.curr_line_height;
        temp.host_backup_line_start_x = self.cursor.line_start_x;
        temp.host_backup_item_width = self.cursor.item_width;
        temp.id_stack_depth = self.ids.depth();
        temp.clip_stack_depth = self.draw_list.clip_stack_depth();
        temp.last_time_active = time;
        self.cursor.prev_line_height = 0.0;
        self.cursor.curr_line_height = 0.0;
        table.host_indent_x = self.cursor.indent_x;
        table.host_skip_items = self.cursor.skip_items;

        // Padding and spacing:
        // - outer padding pads the left of the first and right of the last column,
        // - inner padding pads both sides of inner borders when they are drawn,
        //   or becomes spacing between columns when they are not.
        let style = &self.style;
        let pad_outer_x = if flags.contains(TableFlags::NO_PAD_OUTER_X) {
            false
        } else if flags.contains(TableFlags::PAD_OUTER_X) {
            true
        } else {
            flags.contains(TableFlags::BORDERS_OUTER_V)
        };
        let pad_inner_x = !flags.contains(TableFlags::NO_PAD_INNER_X);
        let inner_v = flags.contains(TableFlags::BORDERS_INNER_V);
        let inner_spacing_for_border = if inner_v { BORDER_SIZE } else { 0.0 };
        let inner_spacing_explicit = if pad_inner_x && !inner_v { style.cell_padding.x } else { 0.0 };
        let inner_padding_explicit = if pad_inner_x && inner_v { style.cell_padding.x } else { 0.0 };
        table.cell_spacing_x1 = inner_spacing_explicit + inner_spacing_for_border;
        table.cell_spacing_x2 = inner_spacing_explicit;
        table.cell_padding_x = inner_padding_explicit;
        table.cell_padding_y = style.cell_padding.y;
        let outer_padding_for_border = if flags.contains(TableFlags::BORDERS_OUTER_V) { BORDER_SIZE } else { 0.0 };
        let outer_padding_explicit = if pad_outer_x { style.cell_padding.x } else { 0.0 };
        table.outer_padding_x = outer_padding_for_border + outer_padding_explicit - table.cell_padding_x;

        table.current_column = None;
        table.current_row = -1;
        table.is_inside_row = false;
        table.row_bg_color_counter = 0;
        table.last_row_flags = RowFlags::empty();
        table.row_flags = RowFlags::empty();

        let mut inner_clip = if use_scroll { table.inner_rect } else { table.work_rect };
        inner_clip.clip_with(&table.work_rect);
        inner_clip.clip_with_full(&table.host_clip_rect);
        inner_clip.max.y = if flags.contains(TableFlags::NO_HOST_EXTEND_Y) {
            let host_work_max_y = if use_scroll { table.inner_rect.max.y } else { self.cursor.work_rect.max.y };
            inner_clip.max.y.min(host_work_max_y)
        } else {
            table.host_clip_rect.max.y
        };
        table.inner_clip_rect = inner_clip;

        table.row_pos_y1 = table.work_rect.min.y;
        table.row_pos_y2 = table.work_rect.min.y;
        table.freeze_rows_request = 0;
        table.freeze_rows_count = 0;
        table.freeze_columns_request = 0;
        table.freeze_columns_count = 0;
        table.is_unfrozen_rows = true;
        table.decl_columns_count = 0;

        if previous_flags.contains(TableFlags::REORDERABLE) && !flags.contains(TableFlags::REORDERABLE) {
            table.is_reset_display_order_request = true;
        }
        table.last_time_active = time;
        table.memory_compacted = false;

        // A changed column count re-initializes the table, keeping what it can.
        let old_count = table.columns.len();
        let count_changed = old_count != columns;
        if count_changed {
            if old_count != 0 {
                log::debug!("table {id:?}: column count changed from {old_count} to {columns}");
            }
            table.is_initializing = true;
            table.is_settings_request_load = true;
        }
        if table.is_reset_all_request {
            table.reset_settings();
        }
        if table.is_initializing {
            table.is_sort_specs_dirty = true;
            table.instance_interacted = None;
            table.reorder_column = None;
            table.resized_column = None;
            table.last_resized_column = None;
            table.auto_fit_single_column = None;
            table.hovered_column_body = None;
            table.hovered_column_border = None;
            let preserve = count_changed && old_count != 0;
            let old = mem::take(&mut table.columns);
            table.columns = (0..columns)
                .map(|n| match old.get(n) {
                    Some(column) if preserve => column.clone(),
                    previous => {
                        let mut column = TableColumn::default();
                        column.width_auto = previous.map_or(0.0, |c| c.width_auto);
                        column.is_preserve_width_auto = true;
                        column
                    }
                })
                .collect();
            table.display_order = crate::table::DisplayOrder::identity(columns);
        }

        if table.is_settings_request_load {
            table.load_settings(&self.settings);
        }

        // Rescale fixed widths when the font changed since they were saved.
        let ref_scale = self.font.line_height();
        if table.ref_scale != 0.0 && table.ref_scale != ref_scale {
            let factor = ref_scale / table.ref_scale;
            log::debug!("table {id:?}: rescaling widths by {factor}");
            for column in &mut table.columns {
                column.width_request *= factor;
            }
        }
        table.ref_scale = ref_scale;

        // Nothing is submitted until the first row or cell.
        self.cursor.skip_items = true;

        table.begin_apply_requests();
        true
    }

    /// Finish the innermost table: close the last row, draw borders, merge
    /// draw channels and hand the cursor back to the host below the table.
    pub fn end_table(&mut self) {
        assert!(self.depth > 0, "end_table called without a matching begin_table");
        let depth = self.depth - 1;
        let table_id = self.temp_data[depth].table_id;
        let disable_merge = self.debug.disable_channel_merge;

        let temp = &mut self.temp_data[depth];
        let backup_work_rect = temp.host_backup_work_rect;
        let backup_max_pos = temp.host_backup_cursor_max_pos;
        let backup_prev_line_height = temp.host_backup_prev_line_height;
        let backup_curr_line_height = temp.host_backup_curr_line_height;
        let backup_line_start_x = temp.host_backup_line_start_x;
        let backup_item_width = temp.host_backup_item_width;
        let user_outer_size = temp.user_outer_size;
        let id_stack_depth = temp.id_stack_depth;
        let clip_stack_depth = temp.clip_stack_depth;

        let Some(table) = self.tables.get_mut(&table_id) else {
            panic!("end_table: table {table_id:?} is not registered");
        };
        let mut env = TableEnv {
            draw_list: &mut self.draw_list,
            splitter: &mut temp.splitter,
            input: &mut self.input,
            cursor: &mut self.cursor,
            ids: &mut self.ids,
            font: self.font.as_ref(),
            style: &self.style,
        };

        if !table.is_layout_locked {
            table.update_layout(&mut env);
        }
        if table.is_inside_row {
            table.end_row(&mut env);
        }
        let flags = table.flags;

        // Height of the table is known now.
        env.cursor.prev_line_height = backup_prev_line_height;
        env.cursor.curr_line_height = backup_curr_line_height;
        env.cursor.max_pos = backup_max_pos;
        let inner_content_max_y = table.row_pos_y2;
        let use_scroll = flags.intersects(TableFlags::SCROLL_X | TableFlags::SCROLL_Y);
        if !flags.contains(TableFlags::NO_HOST_EXTEND_Y) && !use_scroll {
            table.outer_rect.max.y = table.outer_rect.max.y.max(inner_content_max_y);
            table.inner_rect.max.y = table.outer_rect.max.y;
        }
        table.work_rect.max.y = table.work_rect.max.y.max(table.outer_rect.max.y);
        let outer_height = table.outer_rect.height();
        table.instance_mut().last_outer_height = outer_height;

        // Content extent, for scroll clamping next frame.
        let mut content_max_x = table.work_rect.min.x;
        if let Some(c) = table.right_most_enabled_column {
            let outer_padding_for_border = if flags.contains(TableFlags::BORDERS_OUTER_V) { BORDER_SIZE } else { 0.0 };
            content_max_x = content_max_x.max(
                table.columns[c].work_max_x + table.cell_padding_x + table.outer_padding_x - outer_padding_for_border,
            );
        }
        if table.resized_column.is_some() {
            content_max_x = content_max_x.max(table.resize_lock_min_contents_x2);
        }
        table.content_size = Vec2::new(
            content_max_x - table.work_rect.min.x,
            inner_content_max_y - table.work_rect.min.y,
        );

        if !flags.contains(TableFlags::NO_CLIP) {
            assert_eq!(
                env.draw_list.clip_stack_depth(),
                clip_stack_depth + 1,
                "mismatched push_clip_rect/pop_clip_rect inside table"
            );
            env.draw_list.pop_clip_rect();
        }
        env.cursor.clip_rect = env.draw_list.clip_rect();

        if flags.intersects(TableFlags::BORDERS) {
            table.draw_borders(&mut env);
        }

        env.splitter.set_current(env.draw_list, 0);
        if !flags.contains(TableFlags::NO_CLIP) && !disable_merge {
            table.merge_draw_channels(env.splitter);
        }
        env.splitter.merge(env.draw_list);

        // Width the columns would like, for hosts that size to content.
        let mut fit_fixed = 0.0f32;
        let mut fit_stretched = 0.0f32;
        let mut fit_stretched_min = 0.0f32;
        for column_n in table.enabled_mask_by_index.iter() {
            let column = &table.columns[column_n];
            let resizable = !column.flags.contains(ColumnFlags::NO_RESIZE);
            let request = if column.is_fixed() && resizable {
                column.width_request
            } else {
                table.column_width_auto(column)
            };
            if column.is_fixed() {
                fit_fixed += request;
            } else {
                fit_stretched += request;
                if !resizable && table.columns_stretch_sum_weights > 0.0 {
                    fit_stretched_min = fit_stretched_min
                        .max(request / (column.stretch_weight / table.columns_stretch_sum_weights));
                }
            }
        }
        table.columns_auto_fit_width = table.width_spacings()
            + table.cell_padding_x * 2.0 * table.columns_enabled_count as f32
            + fit_fixed
            + fit_stretched.max(fit_stretched_min);

        // Dragged border: apply the new width at the next begin.
        if let Some(column_n) = table.resized_column {
            if table.instance_interacted == Some(table.instance_current) {
                let column = &table.columns[column_n];
                let new_x2 = env.input.mouse_pos().x - env.input.active_id_click_offset().x + RESIZE_HALF_THICKNESS;
                let new_width = (new_x2 - column.min_x - table.cell_spacing_x1 - table.cell_padding_x * 2.0).floor();
                table.resized_column_next_width = Some(new_width);
            }
        }

        assert_eq!(
            env.ids.depth(),
            id_stack_depth,
            "mismatched push_id/pop_id inside table"
        );
        if table.instance_current > 0 {
            env.ids.pop();
        }
        env.ids.pop();

        // Hand the cursor back to the host, below the table.
        env.cursor.work_rect = backup_work_rect;
        env.cursor.skip_items = table.host_skip_items;
        env.cursor.line_start_x = backup_line_start_x;
        env.cursor.item_width = backup_item_width;
        env.cursor.pos = table.outer_rect.min;
        env.cursor.item_size(table.outer_rect.size(), env.style.item_spacing.y);

        let outer = table.outer_rect;
        if flags.contains(TableFlags::NO_HOST_EXTEND_X) {
            env.cursor.max_pos.x = backup_max_pos.x.max(outer.min.x + table.columns_auto_fit_width);
        } else if user_outer_size.x <= 0.0 {
            env.cursor.max_pos.x = backup_max_pos
                .x
                .max(outer.max.x.min(outer.min.x + table.columns_auto_fit_width));
        } else {
            env.cursor.max_pos.x = backup_max_pos.x.max(outer.max.x);
        }
        env.cursor.max_pos.y = if user_outer_size.y <= 0.0 {
            backup_max_pos.y.max(outer.max.y.min(inner_content_max_y))
        } else {
            backup_max_pos.y.max(outer.max.y)
        };

        if table.is_settings_dirty {
            table.save_settings(&mut self.settings);
        }
        table.is_initializing = false;
        self.depth -= 1;
    }

    /// Declare the next column.
    pub fn setup_column(&mut self, setup: ColumnSetup) {
        let done = self.with_current(|table, _| table.setup_column(setup));
        assert!(done.is_some(), "setup_column called outside a table");
    }

    pub fn setup_column_with(
        &mut self,
        label: &str,
        flags: ColumnFlags,
        policy: Option<WidthPolicy>,
        init_width_or_weight: f32,
        user_id: u32,
    ) {
        self.setup_column(ColumnSetup {
            label: label.to_string(),
            flags,
            policy,
            init_width_or_weight,
            user_id,
        });
    }

    /// Keep the first `columns` columns and `rows` rows in view while scrolling.
    pub fn setup_scroll_freeze(&mut self, columns: usize, rows: usize) {
        let done = self.with_current(|table, _| table.setup_scroll_freeze(columns, rows));
        assert!(done.is_some(), "setup_scroll_freeze called outside a table");
    }

    pub fn next_row(&mut self, flags: RowFlags, min_height: f32) {
        self.with_current(|table, env| table.next_row(env, flags, min_height));
    }

    /// Move to the next cell. Returns whether its content is worth submitting;
    /// `false` when no table is open.
    pub fn next_column(&mut self) -> bool {
        self.with_current(|table, env| table.next_column(env))
            .unwrap_or(false)
    }

    pub fn set_column_index(&mut self, column: usize) -> bool {
        self.with_current(|table, env| table.set_column_index(env, column))
            .unwrap_or(false)
    }

    pub fn headers_row(&mut self) {
        self.with_current(|table, env| table.headers_row(env));
    }

    /// Submit a header into the current cell.
    pub fn header(&mut self, label: &str) {
        self.with_current(|table, env| table.header(env, label));
    }

    /// Sort keys of the current table, or `None` if it is not sortable.
    /// Clear `dirty` once the data has been sorted.
    pub fn get_sort_specs(&mut self) -> Option<&mut SortSpecs> {
        let temp = self.temp_data.get_mut(self.depth.checked_sub(1)?)?;
        let table = self.tables.get_mut(&temp.table_id)?;
        let mut env = TableEnv {
            draw_list: &mut self.draw_list,
            splitter: &mut temp.splitter,
            input: &mut self.input,
            cursor: &mut self.cursor,
            ids: &mut self.ids,
            font: self.font.as_ref(),
            style: &self.style,
        };
        table.sort_specs(&mut env)
    }

    pub fn set_bg_color(&mut self, target: BgTarget, color: crate::geometry::Color, column: Option<usize>) {
        self.with_current(|table, _| table.set_bg_color(target, color, column));
    }

    /// Request a column width. Must be called before the first row.
    pub fn set_column_width(&mut self, column: usize, width: f32) {
        self.with_current(|table, _| table.set_column_width(column, width));
    }

    /// Show or hide a column from the next frame on. Needs `TableFlags::HIDEABLE`.
    pub fn set_column_enabled(&mut self, column: usize, enabled: bool) {
        self.with_current(|table, _| {
            assert!(
                table.flags.contains(TableFlags::HIDEABLE),
                "set_column_enabled needs TableFlags::HIDEABLE"
            );
            table.columns[column].is_user_enabled_next_frame = enabled;
        });
    }

    pub fn set_column_sort_direction(&mut self, column: usize, direction: Option<SortDirection>, append: bool) {
        self.with_current(|table, _| table.set_column_sort_direction(column, direction, append));
    }

    /// Scroll offset applied at the next `begin_table`.
    pub fn set_scroll(&mut self, scroll: Vec2) {
        self.with_current(|table, _| table.scroll_next = Some(scroll));
    }

    /// Fit every column of the current table to its content.
    pub fn set_columns_width_auto(&mut self) {
        self.with_current(|table, _| table.set_column_width_auto_all());
    }

    /// Draw into the row-wide background channel until `pop_background_channel`.
    pub fn push_background_channel(&mut self) {
        self.with_current(|table, env| table.push_background_channel(env));
    }

    pub fn pop_background_channel(&mut self) {
        self.with_current(|table, env| table.pop_background_channel(env));
    }

    /// Forget widths, order, visibility and sort of a table at its next begin.
    pub fn reset_settings(&mut self, id: Id) {
        if let Some(table) = self.tables.get_mut(&id) {
            table.is_reset_all_request = true;
        }
    }

    /// Restore declaration order of a table's columns at its next begin.
    pub fn reset_display_order(&mut self, id: Id) {
        if let Some(table) = self.tables.get_mut(&id) {
            table.is_reset_display_order_request = true;
        }
    }
}

/// `0` takes `default`, negative values leave that much of `avail` free.
fn resolve_item_size(size: f32, avail: f32, default: f32) -> f32 {
    if size == 0.0 {
        default
    } else if size < 0.0 {
        (avail + size).max(4.0)
    } else {
        size
    }
}

/// An open table that ends itself when dropped.
pub struct TableScope<'a> {
    ctx: &'a mut TableContext,
}

impl Deref for TableScope<'_> {
    type Target = TableContext;

    fn deref(&self) -> &TableContext {
        self.ctx
    }
}

impl DerefMut for TableScope<'_> {
    fn deref_mut(&mut self) -> &mut TableContext {
        self.ctx
    }
}

impl Drop for TableScope<'_> {
    fn drop(&mut self) {
        // Ending a table mid-panic would only trip its own assertions.
        if !std::thread::panicking() {
            self.ctx.end_table();
        }
    }
}
