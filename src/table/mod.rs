//! Retained table state.
//!
//! A [`Table`] is created the first time a table id is begun and kept in the
//! [`TableContext`](crate::context::TableContext) registry. Each frame the
//! caller declares columns, then submits rows and cells; the first row locks
//! the layout (widths, clip rects, draw channels) and `end_table` merges the
//! per-column draw channels back into the host draw list.
//!
//! The algorithms are split across submodules, each adding an `impl Table`
//! block: `layout` solves widths, `channels` allocates and merges draw
//! channels, `row` runs the row/cell cursor, `borders` handles resize
//! borders, `headers` draws header cells and `sort` maintains sort specs.

pub mod column;
pub mod flags;
pub mod mask;
pub mod order;
pub mod settings;
pub mod sort;

mod borders;
mod channels;
mod headers;
mod layout;
mod row;

pub use column::{ColumnSetup, TableColumn};
pub use flags::{BgTarget, ColumnFlags, ColumnStatus, RowFlags, SortDirection, TableFlags, TableSizing, WidthPolicy};
pub use mask::ColumnMask;
pub use order::DisplayOrder;
pub use settings::{ColumnSettings, SettingsError, SettingsStore, TableSettings};
pub use sort::{ColumnSortSpec, SortSpecs};

use crate::cursor::LayoutCursor;
use crate::geometry::{Color, Rect, Vec2};
use crate::id::{Id, IdStack};
use crate::input::Interaction;
use crate::renderer::{ChannelSplitter, DrawList, Font};
use crate::style::TableStyle;

pub type TableId = Id;

/// Most columns a table may declare.
pub const MAX_COLUMNS: usize = 512;

pub(crate) const BORDER_SIZE: f32 = 1.0;
/// Half width of the area around a column border that grabs the mouse.
pub(crate) const RESIZE_HALF_THICKNESS: f32 = 4.0;
/// Seconds a border must be hovered before it highlights.
pub(crate) const RESIZE_FEEDBACK_DELAY: f32 = 0.06;

/// Row backgrounds and borders.
pub(crate) const CHANNEL_BG0: usize = 0;
/// Background channel while rows are frozen.
pub(crate) const CHANNEL_BG2_FROZEN: usize = 1;
/// Shared cell channel with `TableFlags::NO_CLIP`.
pub(crate) const CHANNEL_NOCLIP: usize = 2;

/// State kept per instance when one table id is begun several times a frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableInstanceData {
    pub id: Id,
    pub last_outer_height: f32,
    pub last_top_headers_row_height: f32,
    pub last_first_row_height: f32,
    pub last_frozen_height: f32,
}

/// Background color of one cell in the current row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct CellBg {
    pub column: usize,
    pub color: Color,
}

/// Scratch state of one nesting depth.
///
/// Temp data is pooled by depth rather than owned by tables, so only as many
/// splitters exist as tables are nested at once.
#[derive(Debug, Default)]
pub(crate) struct TableTempData {
    pub table_id: Id,
    pub splitter: ChannelSplitter,
    pub user_outer_size: Vec2,
    pub host_backup_work_rect: Rect,
    pub host_backup_cursor_max_pos: Vec2,
    pub host_backup_prev_line_height: f32,
    pub host_backup_curr_line_height: f32,
    pub host_backup_line_start_x: f32,
    pub host_backup_item_width: f32,
    /// Id stack depth right after the table pushed its id
    pub id_stack_depth: usize,
    /// Clip stack depth of the host when the table began
    pub clip_stack_depth: usize,
    pub last_time_active: f64,
}

/// Everything besides the table that the algorithms read or write.
pub(crate) struct TableEnv<'a> {
    pub draw_list: &'a mut DrawList,
    pub splitter: &'a mut ChannelSplitter,
    pub input: &'a mut Interaction,
    pub cursor: &'a mut LayoutCursor,
    pub ids: &'a mut IdStack,
    pub font: &'a dyn Font,
    pub style: &'a TableStyle,
}

#[derive(Debug, Clone)]
pub struct Table {
    pub id: TableId,
    pub flags: TableFlags,
    pub sizing: TableSizing,
    pub columns: Vec<TableColumn>,
    pub display_order: DisplayOrder,
    pub enabled_mask_by_index: ColumnMask,
    pub enabled_mask_by_display_order: ColumnMask,
    pub visible_mask_by_index: ColumnMask,

    pub instances: Vec<TableInstanceData>,
    pub instance_current: usize,
    pub instance_interacted: Option<usize>,

    pub outer_rect: Rect,
    pub inner_rect: Rect,
    pub work_rect: Rect,
    pub inner_clip_rect: Rect,
    pub bg_clip_rect: Rect,
    pub bg0_clip_rect_for_draw_cmd: Rect,
    pub bg2_clip_rect_for_draw_cmd: Rect,
    pub host_clip_rect: Rect,
    pub border_x1: f32,
    pub border_x2: f32,

    pub cell_padding_x: f32,
    pub cell_padding_y: f32,
    pub cell_spacing_x1: f32,
    pub cell_spacing_x2: f32,
    pub outer_padding_x: f32,
    pub min_column_width: f32,
    pub inner_width: f32,
    pub ref_scale: f32,

    pub columns_enabled_count: usize,
    pub columns_enabled_fixed_count: usize,
    pub columns_stretch_sum_weights: f32,
    pub columns_given_width: f32,
    pub columns_auto_fit_width: f32,
    pub decl_columns_count: usize,
    pub left_most_enabled_column: Option<usize>,
    pub right_most_enabled_column: Option<usize>,
    pub left_most_stretched_column: Option<usize>,
    pub right_most_stretched_column: Option<usize>,

    pub freeze_rows_request: usize,
    pub freeze_rows_count: usize,
    pub freeze_columns_request: usize,
    pub freeze_columns_count: usize,
    pub is_unfrozen_rows: bool,

    pub scroll: Vec2,
    pub scroll_next: Option<Vec2>,
    pub content_size: Vec2,

    pub current_row: i32,
    pub current_column: Option<usize>,
    pub is_inside_row: bool,
    pub row_pos_y1: f32,
    pub row_pos_y2: f32,
    pub row_min_height: f32,
    pub row_indent_offset_x: f32,
    pub host_indent_x: f32,
    pub row_flags: RowFlags,
    pub last_row_flags: RowFlags,
    pub row_bg_color: [Option<Color>; 2],
    pub(crate) row_cell_data: Vec<CellBg>,
    pub row_bg_color_counter: usize,

    pub dummy_draw_channel: Option<usize>,
    pub bg2_draw_channel_current: usize,
    pub bg2_draw_channel_unfrozen: usize,
    pub(crate) host_backup_inner_clip_rect: Rect,
    pub host_skip_items: bool,

    pub resized_column: Option<usize>,
    pub last_resized_column: Option<usize>,
    pub resized_column_next_width: Option<f32>,
    pub resize_lock_min_contents_x2: f32,
    pub auto_fit_single_column: Option<usize>,
    pub held_header_column: Option<usize>,
    pub reorder_column: Option<usize>,
    pub reorder_column_dir: i8,
    pub hovered_column_body: Option<usize>,
    pub hovered_column_border: Option<usize>,

    pub is_layout_locked: bool,
    pub is_initializing: bool,
    pub is_settings_dirty: bool,
    pub is_settings_request_load: bool,
    pub is_sort_specs_dirty: bool,
    pub is_using_headers: bool,
    pub is_default_display_order: bool,
    pub is_reset_display_order_request: bool,
    pub is_reset_all_request: bool,
    pub settings_loaded_flags: TableFlags,

    pub(crate) sort_specs: SortSpecs,
    pub sort_specs_count: usize,

    pub last_frame_active: u64,
    pub last_time_active: f64,
    pub memory_compacted: bool,
}

impl Table {
    pub(crate) fn new(id: TableId) -> Self {
        Self {
            id,
            flags: TableFlags::empty(),
            sizing: TableSizing::StretchSame,
            columns: Vec::new(),
            display_order: DisplayOrder::identity(0),
            enabled_mask_by_index: ColumnMask::default(),
            enabled_mask_by_display_order: ColumnMask::default(),
            visible_mask_by_index: ColumnMask::default(),
            instances: Vec::new(),
            instance_current: 0,
            instance_interacted: None,
            outer_rect: Rect::default(),
            inner_rect: Rect::default(),
            work_rect: Rect::default(),
            inner_clip_rect: Rect::default(),
            bg_clip_rect: Rect::default(),
            bg0_clip_rect_for_draw_cmd: Rect::default(),
            bg2_clip_rect_for_draw_cmd: Rect::default(),
            host_clip_rect: Rect::default(),
            border_x1: 0.0,
            border_x2: 0.0,
            cell_padding_x: 0.0,
            cell_padding_y: 0.0,
            cell_spacing_x1: 0.0,
            cell_spacing_x2: 0.0,
            outer_padding_x: 0.0,
            min_column_width: 1.0,
            inner_width: 0.0,
            ref_scale: 0.0,
            columns_enabled_count: 0,
            columns_enabled_fixed_count: 0,
            columns_stretch_sum_weights: 0.0,
            columns_given_width: 0.0,
            columns_auto_fit_width: 0.0,
            decl_columns_count: 0,
            left_most_enabled_column: None,
            right_most_enabled_column: None,
            left_most_stretched_column: None,
            right_most_stretched_column: None,
            freeze_rows_request: 0,
            freeze_rows_count: 0,
            freeze_columns_request: 0,
            freeze_columns_count: 0,
            is_unfrozen_rows: true,
            scroll: Vec2::ZERO,
            scroll_next: None,
            content_size: Vec2::ZERO,
            current_row: -1,
            current_column: None,
            is_inside_row: false,
            row_pos_y1: 0.0,
            row_pos_y2: 0.0,
            row_min_height: 0.0,
            row_indent_offset_x: 0.0,
            host_indent_x: 0.0,
            row_flags: RowFlags::empty(),
            last_row_flags: RowFlags::empty(),
            row_bg_color: [None; 2],
            row_cell_data: Vec::new(),
            row_bg_color_counter: 0,
            dummy_draw_channel: None,
            bg2_draw_channel_current: CHANNEL_BG2_FROZEN,
            bg2_draw_channel_unfrozen: CHANNEL_BG2_FROZEN,
            host_backup_inner_clip_rect: Rect::default(),
            host_skip_items: false,
            resized_column: None,
            last_resized_column: None,
            resized_column_next_width: None,
            resize_lock_min_contents_x2: 0.0,
            auto_fit_single_column: None,
            held_header_column: None,
            reorder_column: None,
            reorder_column_dir: 0,
            hovered_column_body: None,
            hovered_column_border: None,
            is_layout_locked: false,
            is_initializing: true,
            is_settings_dirty: false,
            is_settings_request_load: true,
            is_sort_specs_dirty: true,
            is_using_headers: false,
            is_default_display_order: true,
            is_reset_display_order_request: false,
            is_reset_all_request: false,
            settings_loaded_flags: TableFlags::empty(),
            sort_specs: SortSpecs::default(),
            sort_specs_count: 0,
            last_frame_active: 0,
            last_time_active: -1.0,
            memory_compacted: false,
        }
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn column(&self, column: usize) -> &TableColumn {
        &self.columns[column]
    }

    /// Label of a column as declared this frame.
    pub fn column_name(&self, column: usize) -> &str {
        &self.columns[column].name
    }

    pub fn column_flags(&self, column: usize) -> ColumnFlags {
        self.columns[column].flags
    }

    pub fn column_status(&self, column: usize) -> ColumnStatus {
        self.columns[column].status
    }

    pub fn column_index(&self) -> Option<usize> {
        self.current_column
    }

    pub fn row_index(&self) -> i32 {
        self.current_row
    }

    /// Enabled columns in display order.
    pub fn enabled_columns(&self) -> impl Iterator<Item = usize> + '_ {
        self.display_order
            .columns()
            .iter()
            .copied()
            .filter(|&c| self.columns[c].is_enabled)
    }

    pub(crate) fn instance(&self) -> &TableInstanceData {
        &self.instances[self.instance_current]
    }

    pub(crate) fn instance_mut(&mut self) -> &mut TableInstanceData {
        &mut self.instances[self.instance_current]
    }

    /// Hit-test id of the resize border right of `column`.
    pub(crate) fn column_resize_id(&self, column: usize) -> Id {
        self.instance().id.with_str("#resize").with_int(column as u64)
    }

    /// Rectangle of a cell of the current row, clamped to the work rect.
    pub(crate) fn cell_bg_rect(&self, column: usize) -> Rect {
        let column = &self.columns[column];
        let x1 = column.min_x.max(self.work_rect.min.x);
        let x2 = column.max_x.min(self.work_rect.max.x);
        Rect::new(x1, self.row_pos_y1, x2, self.row_pos_y2)
    }

    /// Spacing consumed between and around the enabled columns.
    pub fn width_spacings(&self) -> f32 {
        self.outer_padding_x * 2.0
            + (self.cell_spacing_x1 + self.cell_spacing_x2)
                * self.columns_enabled_count.saturating_sub(1) as f32
    }

    /// Release per-frame buffers of a table that has not been used for a while.
    pub(crate) fn compact_transient_buffers(&mut self) {
        log::debug!("compacting table {:?}", self.id);
        self.sort_specs = SortSpecs::default();
        self.is_sort_specs_dirty = true;
        self.row_cell_data = Vec::new();
        self.memory_compacted = true;
        for column in &mut self.columns {
            column.name = String::new();
        }
    }
}
