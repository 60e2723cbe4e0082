use gridline::prelude::*;

struct File {
    name: &'static str,
    size: u64,
    kind: &'static str,
}

const FILES: &[File] = &[
    File { name: "Cargo.toml", size: 612, kind: "toml" },
    File { name: "lib.rs", size: 1_024, kind: "rust" },
    File { name: "layout.rs", size: 24_310, kind: "rust" },
    File { name: "README.md", size: 3_870, kind: "markdown" },
    File { name: "logo.png", size: 48_112, kind: "image" },
];

fn draw_files(ctx: &mut TableContext, files: &mut [&File]) {
    let flags = TableFlags::RESIZABLE
        | TableFlags::REORDERABLE
        | TableFlags::SORTABLE
        | TableFlags::ROW_BG
        | TableFlags::BORDERS
        | TableFlags::SCROLL_Y;
    if !ctx.begin_table("files", 3, flags, Vec2::new(480.0, 120.0), 0.0) {
        return;
    }
    ctx.setup_column(ColumnSetup::new("Name").flags(ColumnFlags::DEFAULT_SORT).user_id(0));
    ctx.setup_column(ColumnSetup::new("Size").fixed(80.0).user_id(1));
    ctx.setup_column(ColumnSetup::new("Kind").user_id(2));
    ctx.setup_scroll_freeze(0, 1);

    if let Some(specs) = ctx.get_sort_specs() {
        if specs.dirty {
            if let Some(primary) = specs.primary() {
                let descending = primary.direction == SortDirection::Descending;
                let column = primary.user_id;
                files.sort_by(|a, b| {
                    let ordering = match column {
                        0 => a.name.cmp(b.name),
                        1 => a.size.cmp(&b.size),
                        _ => a.kind.cmp(b.kind),
                    };
                    if descending {
                        ordering.reverse()
                    } else {
                        ordering
                    }
                });
            }
            specs.dirty = false;
        }
    }

    ctx.headers_row();
    for file in files.iter() {
        ctx.next_row(RowFlags::empty(), 0.0);
        if ctx.next_column() {
            ctx.text(file.name);
        }
        if ctx.next_column() {
            ctx.text(&file.size.to_string());
        }
        if ctx.next_column() {
            ctx.text(file.kind);
        }
    }
    ctx.end_table();
}

fn main() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).try_init();

    let mut ctx = TableContext::new(TableStyle::default());
    let mut files: Vec<&File> = FILES.iter().collect();

    // Hover the border right of "Name", then drag it 40px to the right.
    let border_x = 160.0;
    let script = [
        FrameInput::default(),
        FrameInput::default(),
        FrameInput::default().with_mouse(Vec2::new(border_x, 30.0), false),
        FrameInput::default().with_mouse(Vec2::new(border_x, 30.0), true),
        FrameInput::default().with_mouse(Vec2::new(border_x + 20.0, 30.0), true),
        FrameInput::default().with_mouse(Vec2::new(border_x + 40.0, 30.0), true),
        FrameInput::default().with_mouse(Vec2::new(border_x + 40.0, 30.0), false),
        FrameInput::default(),
    ];

    for (frame_n, input) in script.iter().enumerate() {
        ctx.new_frame(input);
        draw_files(&mut ctx, &mut files);
        let draw_list = ctx.end_frame();
        log::info!(
            "frame {frame_n}: {} draw commands, {} vertices",
            draw_list.visible_cmd_count(),
            draw_list.vtx_buffer.len()
        );
    }

    if let Some(table) = ctx.table_by_name("files") {
        for column in table.enabled_columns() {
            log::info!(
                "{:>6}: width {:>6.1}, status {:?}",
                table.column_name(column),
                table.column(column).width_given,
                table.column_status(column)
            );
        }
    }

    let order: Vec<&str> = files.iter().map(|f| f.name).collect();
    log::info!("sorted rows: {order:?}");

    let path = std::env::temp_dir().join("gridline_demo_settings.json");
    match ctx.settings().save_to_path(&path) {
        Ok(()) => log::info!("settings written to {}", path.display()),
        Err(err) => log::error!("could not save settings: {err}"),
    }

    let stats = gridline::stats::get_stats();
    log::info!("draw stats: {stats:?}");
}
