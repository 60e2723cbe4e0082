use gridline::id::IdStack;
use gridline::prelude::*;
use gridline::table::ColumnSettings;
use gridline::table::TableSettings;

fn context() -> TableContext {
    let _ = env_logger::builder().is_test(true).try_init();
    TableContext::new(TableStyle::default())
}

/// Run one frame and return the number of visible draw commands.
fn frame(ctx: &mut TableContext, build: impl FnOnce(&mut TableContext)) -> usize {
    ctx.new_frame(&FrameInput::default());
    build(ctx);
    ctx.end_frame().visible_cmd_count()
}

fn fill_rows(ctx: &mut TableContext, rows: usize) {
    for row in 0..rows {
        ctx.next_row(RowFlags::empty(), 0.0);
        for column in 0..ctx.current_table().map_or(0, |t| t.column_count()) {
            ctx.set_column_index(column);
            ctx.text(&format!("{row}:{column}"));
        }
    }
}

fn widths(table: &Table) -> Vec<f32> {
    (0..table.column_count()).map(|c| table.column(c).width_given).collect()
}

#[test]
fn test_fixed_and_stretch_share_outer_width() {
    let mut ctx = context();
    frame(&mut ctx, |ctx| {
        assert!(ctx.begin_table("widths", 3, TableFlags::empty(), Vec2::new(250.0, 0.0), 0.0));
        ctx.setup_column(ColumnSetup::new("fixed").fixed(50.0));
        ctx.setup_column(ColumnSetup::new("a").stretch(1.0));
        ctx.setup_column(ColumnSetup::new("b").stretch(1.0));
        fill_rows(ctx, 2);
        ctx.end_table();
    });

    let table = ctx.table_by_name("widths").expect("table registered");
    assert_eq!(widths(table), vec![50.0, 92.0, 92.0]);
    let spacing = table.width_spacings();
    assert_eq!(widths(table).iter().sum::<f32>() + spacing, 250.0);
}

#[test]
fn test_stretch_widths_follow_weights() {
    let mut ctx = context();
    frame(&mut ctx, |ctx| {
        ctx.begin_table("weights", 2, TableFlags::empty(), Vec2::new(400.0, 0.0), 0.0);
        ctx.setup_column(ColumnSetup::new("one").stretch(1.0));
        ctx.setup_column(ColumnSetup::new("three").stretch(3.0));
        fill_rows(ctx, 1);
        ctx.end_table();
    });

    let table = ctx.table_by_name("weights").expect("table registered");
    assert_eq!(widths(table), vec![98.0, 294.0]);
}

#[test]
fn test_widths_conserve_outer_width() {
    for outer in [200.0f32, 317.0, 451.0, 600.0] {
        let mut ctx = context();
        frame(&mut ctx, |ctx| {
            ctx.begin_table("sum", 3, TableFlags::BORDERS, Vec2::new(outer, 0.0), 0.0);
            ctx.setup_column(ColumnSetup::new("a").stretch(1.0));
            ctx.setup_column(ColumnSetup::new("b").stretch(2.0));
            ctx.setup_column(ColumnSetup::new("c").stretch(3.0));
            fill_rows(ctx, 3);
            ctx.end_table();
        });
        let table = ctx.table_by_name("sum").expect("table registered");
        let used = widths(table).iter().sum::<f32>() + table.width_spacings();
        assert!((used - outer).abs() <= 3.0, "outer {outer}: columns use {used}");
        let w = widths(table);
        assert!(w[0] < w[1] && w[1] < w[2], "outer {outer}: {w:?}");
    }
}

#[test]
fn test_channel_merge_reduces_draw_commands() {
    let build = |ctx: &mut TableContext| {
        ctx.begin_table("merge", 4, TableFlags::ROW_BG, Vec2::new(400.0, 0.0), 0.0);
        fill_rows(ctx, 5);
        ctx.end_table();
    };

    let mut merged_ctx = context();
    frame(&mut merged_ctx, build);
    let merged = frame(&mut merged_ctx, build);

    let mut split_ctx = context();
    split_ctx.debug.disable_channel_merge = true;
    frame(&mut split_ctx, build);
    let unmerged = frame(&mut split_ctx, build);

    assert!(merged < unmerged, "merged {merged} vs unmerged {unmerged}");
    assert!(merged <= 2, "expected row backgrounds plus one cell batch, got {merged}");

    // Everything drawn stays inside the table horizontally.
    let floats: &[f32] = bytemuck::cast_slice(&merged_ctx.draw_list().vtx_buffer);
    assert!(!floats.is_empty());
    for vertex in floats.chunks_exact(8) {
        assert!(vertex[0] >= 0.0 && vertex[0] <= 400.0, "vertex x {}", vertex[0]);
    }
}

/// Every triangle's bounding box cut by its command's clip rect, with its
/// color. Two lists with the same set render the same pixels.
fn visible_geometry(list: &DrawList) -> Vec<[u32; 8]> {
    let mut visible = Vec::new();
    for cmd in list.cmd_buffer.iter().filter(|cmd| cmd.elem_count > 0) {
        let start = cmd.idx_offset as usize;
        let indices = &list.idx_buffer[start..start + cmd.elem_count as usize];
        for triangle in indices.chunks_exact(3) {
            let verts: Vec<&DrawVert> = triangle
                .iter()
                .map(|&i| &list.vtx_buffer[cmd.vtx_offset as usize + i as usize])
                .collect();
            let min_x = verts.iter().map(|v| v.pos[0]).fold(f32::MAX, f32::min).max(cmd.clip_rect.min.x);
            let min_y = verts.iter().map(|v| v.pos[1]).fold(f32::MAX, f32::min).max(cmd.clip_rect.min.y);
            let max_x = verts.iter().map(|v| v.pos[0]).fold(f32::MIN, f32::max).min(cmd.clip_rect.max.x);
            let max_y = verts.iter().map(|v| v.pos[1]).fold(f32::MIN, f32::max).min(cmd.clip_rect.max.y);
            if max_x <= min_x || max_y <= min_y {
                continue;
            }
            let q = |v: f32| (v * 4.0).round() as i32 as u32;
            let color = verts[0].color;
            visible.push([
                q(min_x),
                q(min_y),
                q(max_x),
                q(max_y),
                color[0].to_bits(),
                color[1].to_bits(),
                color[2].to_bits(),
                color[3].to_bits(),
            ]);
        }
    }
    visible.sort_unstable();
    visible
}

/// Run the same two frames with and without channel merging and return
/// `(merged, unmerged)` draw command counts after checking both show the same geometry.
fn assert_merge_is_invisible(label: &str, build: impl Fn(&mut TableContext, bool)) -> (usize, usize) {
    let mut merged_ctx = context();
    let mut split_ctx = context();
    split_ctx.debug.disable_channel_merge = true;
    let mut counts = (0, 0);
    for first in [true, false] {
        counts.0 = frame(&mut merged_ctx, |ctx| build(ctx, first));
        counts.1 = frame(&mut split_ctx, |ctx| build(ctx, first));
    }
    let merged = visible_geometry(merged_ctx.draw_list());
    let unmerged = visible_geometry(split_ctx.draw_list());
    assert!(!unmerged.is_empty(), "{label}: nothing drawn");
    assert_eq!(merged.len(), unmerged.len(), "{label}: visible triangle count differs");
    assert_eq!(merged, unmerged, "{label}: visible geometry differs");
    assert!(counts.0 <= counts.1, "{label}: merged {} vs unmerged {}", counts.0, counts.1);
    counts
}

#[test]
fn test_merged_output_matches_unmerged_output() {
    // (label, freeze columns, freeze rows, scroll, hide first column)
    let cases = [
        ("no freeze", 0, 0, Vec2::ZERO, false),
        ("row freeze", 0, 1, Vec2::new(0.0, 30.0), false),
        ("column freeze", 1, 0, Vec2::new(60.0, 0.0), false),
        ("both frozen", 1, 1, Vec2::new(60.0, 30.0), false),
        ("hidden before frozen", 1, 0, Vec2::new(60.0, 0.0), true),
        ("hidden with both frozen", 1, 1, Vec2::new(60.0, 30.0), true),
    ];
    for (label, freeze_columns, freeze_rows, scroll, hide_first) in cases {
        let flags = TableFlags::SCROLL_X | TableFlags::SCROLL_Y | TableFlags::HIDEABLE | TableFlags::ROW_BG;
        assert_merge_is_invisible(label, |ctx, first| {
            assert!(ctx.begin_table("merge", 4, flags, Vec2::new(250.0, 120.0), 0.0));
            for (n, name) in ["a", "b", "c", "d"].into_iter().enumerate() {
                let mut setup = ColumnSetup::new(name).fixed(100.0);
                if n == 0 && hide_first {
                    setup = setup.flags(ColumnFlags::DEFAULT_HIDE);
                }
                ctx.setup_column(setup);
            }
            ctx.setup_scroll_freeze(freeze_columns, freeze_rows);
            ctx.headers_row();
            for row in 0..12 {
                ctx.next_row(RowFlags::empty(), 0.0);
                for column in 0..4 {
                    if ctx.set_column_index(column) {
                        ctx.text(&format!("row {row} col {column}"));
                    }
                }
            }
            if first {
                ctx.set_scroll(scroll);
            }
            ctx.end_table();
        });
    }
}

#[test]
fn test_overflowing_and_multi_command_columns_keep_their_clip() {
    let mut ctx = context();
    let build = |ctx: &mut TableContext, _first: bool| {
        ctx.begin_table("overflow", 4, TableFlags::empty(), Vec2::new(400.0, 0.0), 0.0);
        for name in ["a", "b", "c", "d"] {
            ctx.setup_column(ColumnSetup::new(name).fixed(80.0));
        }
        for row in 0..3 {
            ctx.next_row(RowFlags::empty(), 0.0);
            for column in 0..4 {
                ctx.set_column_index(column);
                match column {
                    1 => ctx.text("this label is far wider than its column"),
                    2 => {
                        let pos = ctx.cursor_pos();
                        ctx.draw_list_mut()
                            .push_clip_rect(Rect::from_pos_size(pos, Vec2::new(20.0, 20.0)), true);
                        ctx.text(&format!("clipped {row}"));
                        ctx.draw_list_mut().pop_clip_rect();
                    }
                    _ => ctx.text(&format!("{row}:{column}")),
                }
            }
        }
        ctx.end_table();
    };
    let (merged, unmerged) = assert_merge_is_invisible("overflow", build);
    assert!(merged < unmerged, "merged {merged} vs unmerged {unmerged}");

    for first in [true, false] {
        frame(&mut ctx, |ctx| build(ctx, first));
    }
    let (clip_a, clip_b, clip_d) = {
        let table = ctx.table_by_name("overflow").expect("table registered");
        (table.column(0).clip_rect, table.column(1).clip_rect, table.column(3).clip_rect)
    };
    let list = ctx.draw_list();
    let drawn: Vec<_> = list.cmd_buffer.iter().filter(|cmd| cmd.elem_count > 0).collect();

    // The overflowing column is left alone so its text stays cut at the column edge.
    assert!(drawn.iter().any(|cmd| cmd.clip_rect == clip_b));
    // Its well-behaved neighbours were folded into one wider command.
    assert!(!drawn.iter().any(|cmd| cmd.clip_rect == clip_a || cmd.clip_rect == clip_d));
    assert!(drawn
        .iter()
        .any(|cmd| cmd.clip_rect.contains_rect(&clip_a) && cmd.clip_rect.contains_rect(&clip_d)));
    // The column with its own clip rect keeps every command it recorded.
    assert!(drawn.iter().filter(|cmd| cmd.clip_rect.width() <= 20.0).count() >= 1);
}

#[test]
fn test_frozen_column_and_row_stay_while_others_scroll() {
    let mut ctx = context();
    let flags = TableFlags::SCROLL_X | TableFlags::SCROLL_Y;
    // Returns the top of every row.
    let build = |ctx: &mut TableContext, scroll: Option<Vec2>| -> Vec<f32> {
        assert!(ctx.begin_table("frozen", 4, flags, Vec2::new(200.0, 100.0), 0.0));
        for name in ["a", "b", "c", "d"] {
            ctx.setup_column(ColumnSetup::new(name).fixed(100.0));
        }
        ctx.setup_scroll_freeze(1, 1);
        let mut row_tops = Vec::new();
        ctx.headers_row();
        row_tops.extend(ctx.current_table().map(|t| t.row_pos_y1));
        for row in 0..20 {
            ctx.next_row(RowFlags::empty(), 0.0);
            row_tops.extend(ctx.current_table().map(|t| t.row_pos_y1));
            for column in 0..4 {
                ctx.set_column_index(column);
                ctx.text(&format!("{row}:{column}"));
            }
        }
        if let Some(scroll) = scroll {
            ctx.set_scroll(scroll);
        }
        ctx.end_table();
        row_tops
    };

    let mut unscrolled = Vec::new();
    frame(&mut ctx, |ctx| unscrolled = build(ctx, Some(Vec2::new(50.0, 40.0))));
    let (col0_x, col1_x, freeze) = {
        let table = ctx.table_by_name("frozen").expect("table registered");
        (table.column(0).min_x, table.column(1).min_x, table.freeze_columns_count)
    };
    assert_eq!(freeze, 0, "nothing is frozen before scrolling");

    let mut scrolled = Vec::new();
    frame(&mut ctx, |ctx| scrolled = build(ctx, None));
    let table = ctx.table_by_name("frozen").expect("table registered");
    assert_eq!(table.scroll, Vec2::new(50.0, 40.0));
    assert_eq!(table.freeze_columns_count, 1);
    assert_eq!(table.freeze_rows_count, 1);
    assert!(table.is_unfrozen_rows);

    // The frozen column keeps its place, the others move with the scroll.
    assert_eq!(table.column(0).min_x, col0_x);
    assert_eq!(table.column(1).min_x, col1_x - 50.0);

    // The frozen header row keeps its place, body rows move with the scroll.
    assert_eq!(unscrolled.len(), 21);
    assert_eq!(scrolled.len(), 21);
    assert_eq!(scrolled[0], unscrolled[0]);
    for row in 1..21 {
        assert_eq!(scrolled[row], unscrolled[row] - 40.0, "row {row}");
    }
}

fn drag_frames(ctx: &mut TableContext, path: &[(f32, bool)], y: f32, build: impl Fn(&mut TableContext)) {
    for &(x, down) in path {
        ctx.new_frame(&FrameInput::default().with_mouse(Vec2::new(x, y), down));
        build(ctx);
        ctx.end_frame();
    }
}

#[test]
fn test_border_drag_conserves_neighbour_widths() {
    let build = |ctx: &mut TableContext| {
        ctx.begin_table("drag", 3, TableFlags::RESIZABLE, Vec2::new(300.0, 0.0), 0.0);
        ctx.setup_column(ColumnSetup::new("a"));
        ctx.setup_column(ColumnSetup::new("b"));
        ctx.setup_column(ColumnSetup::new("c"));
        fill_rows(ctx, 3);
        ctx.end_table();
    };
    let mut ctx = context();
    frame(&mut ctx, build);
    let before = widths(ctx.table_by_name("drag").expect("table registered"));
    let border_x = ctx.table_by_name("drag").map_or(0.0, |t| t.column(0).max_x);

    // Hover, press, drag 30px right, release, then one settled frame.
    let path = [
        (border_x, false),
        (border_x, true),
        (border_x + 30.0, true),
        (border_x + 30.0, false),
        (border_x + 30.0, false),
    ];
    drag_frames(&mut ctx, &path, 5.0, build);

    let after = widths(ctx.table_by_name("drag").expect("table registered"));
    assert!(after[0] >= before[0] + 28.0, "{before:?} -> {after:?}");
    assert!(((after[0] + after[1]) - (before[0] + before[1])).abs() <= 1.0, "{before:?} -> {after:?}");
    assert!((after[2] - before[2]).abs() <= 1.0, "{before:?} -> {after:?}");
}

#[test]
fn test_border_drag_between_fixed_columns_conserves_their_sum() {
    let build = |ctx: &mut TableContext| {
        ctx.begin_table("fixed_drag", 3, TableFlags::RESIZABLE, Vec2::new(400.0, 0.0), 0.0);
        for name in ["a", "b", "c"] {
            ctx.setup_column(ColumnSetup::new(name).fixed(80.0));
        }
        fill_rows(ctx, 3);
        ctx.end_table();
    };
    let mut ctx = context();
    frame(&mut ctx, build);
    let before = widths(ctx.table_by_name("fixed_drag").expect("table registered"));
    let border_x = ctx.table_by_name("fixed_drag").map_or(0.0, |t| t.column(0).max_x);

    let path = [
        (border_x, false),
        (border_x, true),
        (border_x + 30.0, true),
        (border_x + 30.0, false),
        (border_x + 30.0, false),
    ];
    drag_frames(&mut ctx, &path, 5.0, build);

    let after = widths(ctx.table_by_name("fixed_drag").expect("table registered"));
    assert_eq!(before, vec![80.0, 80.0, 80.0]);
    assert_eq!(after, vec![110.0, 50.0, 80.0]);
    assert_eq!(after[0] + after[1], before[0] + before[1]);
}

#[test]
fn test_header_drag_reorders_columns() {
    let build = |ctx: &mut TableContext| {
        ctx.begin_table("reorder", 3, TableFlags::REORDERABLE | TableFlags::RESIZABLE, Vec2::new(300.0, 0.0), 0.0);
        ctx.setup_column(ColumnSetup::new("first"));
        ctx.setup_column(ColumnSetup::new("second"));
        ctx.setup_column(ColumnSetup::new("third"));
        ctx.headers_row();
        fill_rows(ctx, 2);
        ctx.end_table();
    };
    let mut ctx = context();
    frame(&mut ctx, build);
    let third_x = ctx.table_by_name("reorder").map_or(0.0, |t| t.column(2).min_x);
    let first_x = ctx.table_by_name("reorder").map_or(0.0, |t| t.column(0).max_x);

    // Grab the last header and drag it past both left neighbours.
    let path = [
        (third_x + 40.0, false),
        (third_x + 40.0, true),
        (third_x - 10.0, true),
        (third_x - 20.0, true),
        (first_x - 40.0, true),
        (first_x - 40.0, false),
        (first_x - 40.0, false),
    ];
    drag_frames(&mut ctx, &path, 5.0, build);

    let table = ctx.table_by_name("reorder").expect("table registered");
    assert_eq!(table.display_order.columns(), &[2, 0, 1]);
    assert!(table.display_order.is_consistent());
    for column in 0..3 {
        assert_eq!(table.display_order.column_at(table.display_order.order_of(column)), column);
    }
    assert!(table.column(2).min_x < table.column(0).min_x);
}

#[test]
fn test_saved_display_order_is_applied() {
    let mut ctx = context();
    let id = IdStack::new().get("order");
    ctx.settings_mut().insert(TableSettings {
        id: id.0,
        save_flags: TableFlags::REORDERABLE.bits(),
        ref_scale: 0.0,
        columns: [2, 0, 1]
            .iter()
            .enumerate()
            .map(|(index, &display_order)| ColumnSettings {
                index,
                user_id: 0,
                width_or_weight: -1.0,
                display_order,
                sort_order: None,
                sort_direction: None,
                is_enabled: true,
                is_stretch: true,
            })
            .collect(),
    });

    frame(&mut ctx, |ctx| {
        ctx.begin_table("order", 3, TableFlags::REORDERABLE, Vec2::new(300.0, 0.0), 0.0);
        fill_rows(ctx, 1);
        ctx.end_table();
    });

    let table = ctx.table_by_name("order").expect("table registered");
    assert_eq!(table.display_order.columns(), &[1, 2, 0]);
    assert!(table.display_order.is_consistent());
    let shown: Vec<usize> = table.enabled_columns().collect();
    assert_eq!(shown, vec![1, 2, 0]);
    // Display order drives positions.
    assert!(table.column(1).min_x < table.column(2).min_x);
    assert!(table.column(2).min_x < table.column(0).min_x);
}

#[test]
fn test_invalid_saved_order_falls_back_to_declaration_order() {
    let mut ctx = context();
    let id = IdStack::new().get("broken");
    ctx.settings_mut().insert(TableSettings {
        id: id.0,
        save_flags: TableFlags::REORDERABLE.bits(),
        ref_scale: 0.0,
        columns: [0, 0, 1]
            .iter()
            .enumerate()
            .map(|(index, &display_order)| ColumnSettings {
                index,
                user_id: 0,
                width_or_weight: -1.0,
                display_order,
                sort_order: None,
                sort_direction: None,
                is_enabled: true,
                is_stretch: true,
            })
            .collect(),
    });

    frame(&mut ctx, |ctx| {
        ctx.begin_table("broken", 3, TableFlags::REORDERABLE, Vec2::new(300.0, 0.0), 0.0);
        ctx.end_table();
    });
    let table = ctx.table_by_name("broken").expect("table registered");
    assert!(table.display_order.is_identity());
}

#[test]
fn test_resized_width_survives_settings_round_trip() {
    let build = |ctx: &mut TableContext, resize: bool| {
        ctx.begin_table("persist", 2, TableFlags::RESIZABLE, Vec2::new(400.0, 0.0), 0.0);
        ctx.setup_column(ColumnSetup::new("name").fixed(60.0));
        ctx.setup_column(ColumnSetup::new("size").fixed(60.0));
        if resize {
            ctx.set_column_width(0, 90.0);
        }
        fill_rows(ctx, 2);
        ctx.end_table();
    };

    let mut ctx = context();
    frame(&mut ctx, |ctx| build(ctx, false));
    frame(&mut ctx, |ctx| build(ctx, true));
    let json = ctx.settings().to_json().expect("settings serialize");

    let mut restored = context();
    *restored.settings_mut() = SettingsStore::from_json(&json).expect("settings parse");
    frame(&mut restored, |ctx| build(ctx, false));

    let table = restored.table_by_name("persist").expect("table registered");
    assert_eq!(table.column(0).width_request, 90.0);
    assert_eq!(table.column(1).width_request, 30.0);
}

#[test]
fn test_default_sort_and_explicit_sort_change() {
    let mut ctx = context();
    let build = |ctx: &mut TableContext, change: bool| -> Option<SortSpecs> {
        ctx.begin_table("sorted", 3, TableFlags::SORTABLE, Vec2::new(300.0, 0.0), 0.0);
        ctx.setup_column(ColumnSetup::new("name").user_id(10));
        ctx.setup_column(ColumnSetup::new("size").user_id(11).flags(ColumnFlags::DEFAULT_SORT));
        ctx.setup_column(
            ColumnSetup::new("kind")
                .user_id(12)
                .flags(ColumnFlags::PREFER_SORT_DESCENDING),
        );
        if change {
            ctx.set_column_sort_direction(2, Some(SortDirection::Descending), false);
        }
        let specs = ctx.get_sort_specs().map(|specs| {
            let snapshot = specs.clone();
            specs.dirty = false;
            snapshot
        });
        ctx.headers_row();
        fill_rows(ctx, 3);
        ctx.end_table();
        specs
    };

    let mut specs = None;
    frame(&mut ctx, |ctx| specs = build(ctx, false));
    let specs = specs.expect("sortable table has specs");
    assert!(specs.dirty);
    assert_eq!(specs.specs.len(), 1);
    assert_eq!(specs.specs[0].column_index, 1);
    assert_eq!(specs.specs[0].user_id, 11);
    assert_eq!(specs.specs[0].direction, SortDirection::Ascending);

    let mut again = None;
    frame(&mut ctx, |ctx| again = build(ctx, false));
    assert_eq!(again.map(|s| s.dirty), Some(false));

    let mut changed = None;
    frame(&mut ctx, |ctx| changed = build(ctx, true));
    let changed = changed.expect("sortable table has specs");
    assert!(changed.dirty);
    assert_eq!(changed.specs.len(), 1);
    assert_eq!(changed.specs[0].column_index, 2);
    assert_eq!(changed.specs[0].direction, SortDirection::Descending);
}

#[test]
fn test_unsortable_table_has_no_specs() {
    let mut ctx = context();
    frame(&mut ctx, |ctx| {
        ctx.begin_table("plain", 2, TableFlags::empty(), Vec2::ZERO, 0.0);
        assert!(ctx.get_sort_specs().is_none());
        ctx.end_table();
    });
}

#[test]
fn test_nested_table_restores_outer_table() {
    let mut ctx = context();
    frame(&mut ctx, |ctx| {
        ctx.begin_table("outer", 2, TableFlags::BORDERS, Vec2::new(500.0, 0.0), 0.0);
        let outer_id = ctx.current_table().map(|t| t.id);
        ctx.next_column();
        ctx.text("left");
        ctx.next_column();
        if ctx.begin_table("inner", 2, TableFlags::BORDERS | TableFlags::ROW_BG, Vec2::ZERO, 0.0) {
            let inner_id = ctx.current_table().map(|t| t.id);
            assert_ne!(inner_id, outer_id);
            fill_rows(ctx, 2);
            ctx.end_table();
        }
        assert_eq!(ctx.current_table().map(|t| t.id), outer_id);
        ctx.next_column();
        ctx.text("second row");
        ctx.end_table();
    });

    let outer = ctx.table_by_name("outer").expect("outer registered");
    assert_eq!(outer.row_index(), 1);
    assert!(ctx.current_table().is_none());
}

#[test]
fn test_same_table_twice_in_a_frame_gets_two_instances() {
    let mut ctx = context();
    frame(&mut ctx, |ctx| {
        for _ in 0..2 {
            ctx.begin_table("twice", 2, TableFlags::RESIZABLE, Vec2::new(300.0, 0.0), 0.0);
            fill_rows(ctx, 1);
            ctx.end_table();
        }
    });
    let table = ctx.table_by_name("twice").expect("table registered");
    assert_eq!(table.instances.len(), 2);
    assert_ne!(table.instances[0].id, table.instances[1].id);
}

#[test]
fn test_scoped_table_ends_itself() {
    let mut ctx = context();
    frame(&mut ctx, |ctx| {
        if let Some(mut table) = ctx.begin_table_scoped("scoped", 2, TableFlags::empty(), Vec2::new(200.0, 0.0), 0.0) {
            table.next_column();
            table.text("a");
            table.next_column();
            table.text("b");
        }
        assert!(ctx.current_table().is_none());
    });
}

#[test]
#[should_panic(expected = "cannot change column count mid-frame")]
fn test_column_count_change_within_frame_panics() {
    let mut ctx = context();
    ctx.new_frame(&FrameInput::default());
    ctx.begin_table("shape", 2, TableFlags::empty(), Vec2::ZERO, 0.0);
    ctx.end_table();
    ctx.begin_table("shape", 3, TableFlags::empty(), Vec2::ZERO, 0.0);
}

#[test]
fn test_body_hover_follows_a_resize_in_the_same_frame() {
    let build = |ctx: &mut TableContext, widen: bool| {
        ctx.begin_table("hover", 2, TableFlags::RESIZABLE, Vec2::new(300.0, 0.0), 0.0);
        ctx.setup_column(ColumnSetup::new("a").fixed(80.0));
        ctx.setup_column(ColumnSetup::new("b").fixed(80.0));
        if widen {
            ctx.set_column_width(0, 120.0);
        }
        fill_rows(ctx, 2);
        ctx.end_table();
    };
    let mut ctx = context();
    let input = FrameInput::default().with_mouse(Vec2::new(100.0, 5.0), false);

    ctx.new_frame(&input);
    build(&mut ctx, false);
    ctx.end_frame();
    let status = |ctx: &TableContext, column| ctx.table_by_name("hover").map(|t| t.column_status(column));
    assert!(status(&ctx, 1).is_some_and(|s| s.contains(ColumnStatus::HOVERED)));

    ctx.new_frame(&input);
    build(&mut ctx, true);
    ctx.end_frame();
    assert!(status(&ctx, 0).is_some_and(|s| s.contains(ColumnStatus::HOVERED)));
    assert!(status(&ctx, 1).is_some_and(|s| !s.contains(ColumnStatus::HOVERED)));
}
