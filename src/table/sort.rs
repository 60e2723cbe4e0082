//! Sort specifications.
//!
//! Columns carry their own `sort_order` and `sort_direction`; the specs
//! handed to the caller are rebuilt from them whenever something changed.

use super::flags::{ColumnFlags, SortDirection, TableFlags};
use super::{Table, TableEnv};

/// One sort key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnSortSpec {
    pub column_index: usize,
    pub user_id: u32,
    /// Position among the sort keys, 0 is primary
    pub sort_order: usize,
    pub direction: SortDirection,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SortSpecs {
    /// Sort keys, primary first
    pub specs: Vec<ColumnSortSpec>,
    /// Set when the specs changed; the caller clears it after sorting.
    pub dirty: bool,
}

impl SortSpecs {
    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    pub fn primary(&self) -> Option<&ColumnSortSpec> {
        self.specs.first()
    }
}

impl Table {
    /// Sort keys for this frame, `None` when the table is not sortable.
    pub(crate) fn sort_specs(&mut self, env: &mut TableEnv) -> Option<&mut SortSpecs> {
        if !self.flags.contains(TableFlags::SORTABLE) {
            return None;
        }
        if !self.is_layout_locked {
            self.update_layout(env);
        }
        if self.is_sort_specs_dirty {
            self.sort_specs_build();
        }
        Some(&mut self.sort_specs)
    }

    /// Set the sort direction of a column. `append` adds it as a secondary
    /// key on `SORT_MULTI` tables; otherwise every other column is unsorted.
    pub(crate) fn set_column_sort_direction(&mut self, column_n: usize, direction: Option<SortDirection>, append: bool) {
        assert!(column_n < self.columns.len(), "column {column_n} out of range");
        let append = append && self.flags.contains(TableFlags::SORT_MULTI);
        if !self.flags.contains(TableFlags::SORT_TRISTATE) {
            assert!(direction.is_some(), "clearing a sort needs TableFlags::SORT_TRISTATE");
        }

        let sort_order_max = if append {
            self.columns.iter().filter_map(|c| c.sort_order).max()
        } else {
            None
        };

        let column = &mut self.columns[column_n];
        column.sort_direction = direction;
        if direction.is_none() {
            column.sort_order = None;
        } else if column.sort_order.is_none() || !append {
            column.sort_order = Some(if append { sort_order_max.map_or(0, |o| o + 1) } else { 0 });
        }

        for other in 0..self.columns.len() {
            if other != column_n && !append {
                self.columns[other].sort_order = None;
            }
            self.fix_column_sort_direction(other);
        }
        self.is_settings_dirty = true;
        self.is_sort_specs_dirty = true;
    }

    /// Replace a sort direction the column no longer allows.
    pub(crate) fn fix_column_sort_direction(&mut self, column_n: usize) {
        let column = &mut self.columns[column_n];
        let Some(direction) = column.sort_direction else {
            return;
        };
        if column.sort_order.is_none() || column.sort_directions_available.contains(&direction) {
            return;
        }
        column.sort_direction = column.sort_directions_available.first().copied();
        self.is_sort_specs_dirty = true;
    }

    /// Make sort orders dense and consistent with the table flags.
    ///
    /// Hidden columns lose their sort, gaps and duplicates are renumbered in
    /// order of appearance, single-sort tables keep only the primary key and
    /// tables without `SORT_TRISTATE` always sort by something.
    pub(crate) fn sort_specs_sanitize(&mut self) {
        let mut sorted: Vec<(usize, usize)> = Vec::new();
        for (column_n, column) in self.columns.iter_mut().enumerate() {
            let Some(order) = column.sort_order else {
                continue;
            };
            if !column.is_enabled || column.sort_direction.is_none() {
                column.sort_order = None;
                continue;
            }
            sorted.push((order, column_n));
        }
        sorted.sort_unstable();

        if sorted.len() > 1 && !self.flags.contains(TableFlags::SORT_MULTI) {
            for &(_, column_n) in &sorted[1..] {
                self.columns[column_n].sort_order = None;
            }
            sorted.truncate(1);
        }

        let dense = sorted.iter().enumerate().all(|(n, &(order, _))| order == n);
        if !dense {
            log::warn!("table {:?}: renumbering sort orders {:?}", self.id, sorted);
            for (n, &(_, column_n)) in sorted.iter().enumerate() {
                self.columns[column_n].sort_order = Some(n);
            }
        }

        if sorted.is_empty() && !self.flags.contains(TableFlags::SORT_TRISTATE) {
            let fallback = self
                .columns
                .iter()
                .position(|c| c.is_enabled && !c.flags.contains(ColumnFlags::NO_SORT));
            if let Some(column_n) = fallback {
                let column = &mut self.columns[column_n];
                column.sort_order = Some(0);
                column.sort_direction = column.sort_directions_available.first().copied();
                sorted.push((0, column_n));
            }
        }
        self.sort_specs_count = sorted.len();
    }

    /// Rebuild the caller-facing specs from the columns.
    pub(crate) fn sort_specs_build(&mut self) {
        self.sort_specs_sanitize();
        let mut specs: Vec<ColumnSortSpec> = self
            .columns
            .iter()
            .enumerate()
            .filter_map(|(column_n, column)| {
                Some(ColumnSortSpec {
                    column_index: column_n,
                    user_id: column.user_id,
                    sort_order: column.sort_order?,
                    direction: column.sort_direction?,
                })
            })
            .collect();
        specs.sort_by_key(|s| s.sort_order);
        debug_assert_eq!(specs.len(), self.sort_specs_count);
        log::debug!("table {:?}: sort specs {:?}", self.id, specs);

        self.sort_specs.specs = specs;
        self.sort_specs.dirty = true;
        self.is_sort_specs_dirty = false;
    }
}
