pub mod context;
pub mod cursor;
pub mod geometry;
pub mod id;
pub mod input;
pub mod renderer;
pub mod stats;
pub mod style;
pub mod table;

pub use context::{DebugOptions, TableContext, TableScope};

pub mod prelude {
    pub use crate::context::{DebugOptions, TableContext, TableScope};
    pub use crate::geometry::{Color, Rect, Vec2};
    pub use crate::id::Id;
    pub use crate::input::{FrameInput, Modifiers, MouseButton};
    pub use crate::renderer::{DrawCmd, DrawList, DrawVert, FixedFont, Font};
    pub use crate::style::{TableColors, TableStyle};
    pub use crate::table::{
        BgTarget, ColumnFlags, ColumnSetup, ColumnSortSpec, ColumnStatus, RowFlags, SettingsError, SettingsStore,
        SortDirection, SortSpecs, Table, TableFlags, TableSizing, WidthPolicy,
    };
}
