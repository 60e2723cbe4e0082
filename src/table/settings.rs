//! Persisted column settings.
//!
//! Each table keeps one [`TableSettings`] record in a [`SettingsStore`],
//! keyed by table id. Only what the user changed is applied back on load:
//! `save_flags` records which kinds of state (widths, order, visibility,
//! sort) differ from the declared defaults.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::flags::{ColumnFlags, SortDirection, TableFlags};
use super::order::DisplayOrder;
use super::Table;
use crate::id::Id;

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("settings I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed settings: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnSettings {
    pub index: usize,
    pub user_id: u32,
    /// Width of a fixed column or weight of a stretch column
    pub width_or_weight: f32,
    pub display_order: usize,
    pub sort_order: Option<usize>,
    pub sort_direction: Option<SortDirection>,
    pub is_enabled: bool,
    pub is_stretch: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableSettings {
    pub id: u64,
    /// Raw `TableFlags` bits of the state worth restoring
    pub save_flags: u32,
    /// Font line height the fixed widths were measured with, 0 when unused
    pub ref_scale: f32,
    pub columns: Vec<ColumnSettings>,
}

impl TableSettings {
    pub fn save_flags(&self) -> TableFlags {
        TableFlags::from_bits_truncate(self.save_flags)
    }
}

/// Settings of every table, by id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SettingsStore {
    tables: HashMap<Id, TableSettings>,
}

impl SettingsStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    pub fn get(&self, id: Id) -> Option<&TableSettings> {
        self.tables.get(&id)
    }

    pub fn insert(&mut self, settings: TableSettings) {
        self.tables.insert(Id(settings.id), settings);
    }

    pub fn remove(&mut self, id: Id) -> Option<TableSettings> {
        self.tables.remove(&id)
    }

    pub fn clear(&mut self) {
        self.tables.clear();
    }

    /// Records sorted by id, so output is stable between runs.
    pub fn to_json(&self) -> Result<String, SettingsError> {
        let mut records: Vec<&TableSettings> = self.tables.values().collect();
        records.sort_by_key(|s| s.id);
        Ok(serde_json::to_string_pretty(&records)?)
    }

    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let records: Vec<TableSettings> = serde_json::from_str(json)?;
        let mut store = Self::new();
        for settings in records {
            store.insert(settings);
        }
        Ok(store)
    }

    pub fn save_to_path(&self, path: impl AsRef<Path>) -> Result<(), SettingsError> {
        fs::write(path, self.to_json()?)?;
        Ok(())
    }

    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }
}

impl Table {
    /// Snapshot the user-facing column state.
    pub(crate) fn save_settings(&mut self, store: &mut SettingsStore) {
        self.is_settings_dirty = false;
        if self.flags.contains(TableFlags::NO_SAVED_SETTINGS) {
            return;
        }

        let mut save_flags = TableFlags::empty();
        let mut save_ref_scale = false;
        let mut columns = Vec::with_capacity(self.columns.len());
        for (column_n, column) in self.columns.iter().enumerate() {
            let width_or_weight = if column.is_stretch() {
                column.stretch_weight
            } else {
                column.width_request
            };
            let display_order = self.display_order.order_of(column_n);
            if !column.is_stretch() {
                save_ref_scale = true;
            }
            if width_or_weight != column.init_width_or_weight {
                save_flags |= TableFlags::RESIZABLE;
            }
            if display_order != column_n {
                save_flags |= TableFlags::REORDERABLE;
            }
            if column.sort_order.is_some() {
                save_flags |= TableFlags::SORTABLE;
            }
            if column.is_user_enabled != !column.flags.contains(ColumnFlags::DEFAULT_HIDE) {
                save_flags |= TableFlags::HIDEABLE;
            }
            columns.push(ColumnSettings {
                index: column_n,
                user_id: column.user_id,
                width_or_weight,
                display_order,
                sort_order: column.sort_order,
                sort_direction: column.sort_direction,
                is_enabled: column.is_user_enabled,
                is_stretch: column.is_stretch(),
            });
        }
        save_flags &= self.flags;

        log::debug!("saving settings of table {:?} ({:?})", self.id, save_flags);
        store.insert(TableSettings {
            id: self.id.0,
            save_flags: save_flags.bits(),
            ref_scale: if save_ref_scale { self.ref_scale } else { 0.0 },
            columns,
        });
    }

    /// Apply a stored record, if any. Entries for columns the table no
    /// longer has are skipped.
    pub(crate) fn load_settings(&mut self, store: &SettingsStore) {
        self.is_settings_request_load = false;
        if self.flags.contains(TableFlags::NO_SAVED_SETTINGS) {
            return;
        }
        let Some(settings) = store.get(self.id) else {
            return;
        };
        let columns_count = self.columns.len();
        if settings.columns.len() != columns_count {
            self.is_settings_dirty = true;
        }

        let save_flags = settings.save_flags();
        self.settings_loaded_flags = save_flags;
        self.ref_scale = settings.ref_scale;

        let mut orders: Vec<usize> = (0..columns_count).collect();
        for column_settings in &settings.columns {
            let column_n = column_settings.index;
            if column_n >= columns_count {
                log::warn!(
                    "table {:?}: ignoring saved settings of column {column_n}, table has {columns_count}",
                    self.id
                );
                continue;
            }
            let column = &mut self.columns[column_n];
            if save_flags.contains(TableFlags::RESIZABLE) {
                if column_settings.is_stretch {
                    column.stretch_weight = column_settings.width_or_weight;
                } else {
                    column.width_request = column_settings.width_or_weight;
                }
                column.auto_fit_queue = 0;
            }
            if save_flags.contains(TableFlags::REORDERABLE) {
                orders[column_n] = column_settings.display_order;
            }
            column.is_user_enabled = column_settings.is_enabled;
            column.is_user_enabled_next_frame = column_settings.is_enabled;
            column.sort_order = column_settings.sort_order;
            column.sort_direction = column_settings.sort_direction;
        }

        self.display_order = match DisplayOrder::from_column_orders(&orders) {
            Ok(order) => order,
            Err(err) => {
                log::warn!("table {:?}: {err}, using declaration order", self.id);
                DisplayOrder::identity(columns_count)
            }
        };
        log::debug!("loaded settings of table {:?} ({:?})", self.id, save_flags);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::column::TableColumn;
    use crate::table::flags::WidthPolicy;

    fn table_with(count: usize, flags: TableFlags) -> Table {
        let mut table = Table::new(Id(42));
        table.flags = flags;
        table.columns = vec![TableColumn::default(); count];
        table.display_order = DisplayOrder::identity(count);
        table
    }

    #[test]
    fn test_only_changed_state_is_flagged() {
        let mut table = table_with(2, TableFlags::RESIZABLE | TableFlags::REORDERABLE | TableFlags::SORTABLE);
        for column in &mut table.columns {
            column.init_width_or_weight = 50.0;
            column.width_request = 50.0;
        }
        let mut store = SettingsStore::new();
        table.save_settings(&mut store);
        assert_eq!(store.get(Id(42)).map(|s| s.save_flags()), Some(TableFlags::empty()));

        table.display_order.move_to(1, 0);
        table.columns[0].width_request = 80.0;
        table.save_settings(&mut store);
        let flags = store.get(Id(42)).map(|s| s.save_flags());
        assert_eq!(flags, Some(TableFlags::RESIZABLE | TableFlags::REORDERABLE));
    }

    #[test]
    fn test_save_load_restores_columns() {
        let flags = TableFlags::RESIZABLE | TableFlags::REORDERABLE | TableFlags::HIDEABLE | TableFlags::SORTABLE;
        let mut table = table_with(3, flags);
        table.columns[1].policy = WidthPolicy::Stretch;
        table.columns[0].width_request = 120.0;
        table.columns[1].stretch_weight = 2.5;
        table.columns[2].is_user_enabled = false;
        table.columns[2].sort_order = Some(0);
        table.columns[2].sort_direction = Some(SortDirection::Descending);
        table.display_order.move_to(2, 0);

        let mut store = SettingsStore::new();
        table.save_settings(&mut store);
        let json = store.to_json().unwrap();
        let store = SettingsStore::from_json(&json).unwrap();

        let mut fresh = table_with(3, flags);
        fresh.columns[1].policy = WidthPolicy::Stretch;
        fresh.load_settings(&store);
        assert_eq!(fresh.columns[0].width_request, 120.0);
        assert_eq!(fresh.columns[1].stretch_weight, 2.5);
        assert!(!fresh.columns[2].is_user_enabled_next_frame);
        assert_eq!(fresh.columns[2].sort_direction, Some(SortDirection::Descending));
        assert_eq!(fresh.display_order.columns(), &[2, 0, 1]);
        assert_eq!(fresh.columns[0].auto_fit_queue, 0);
    }

    #[test]
    fn test_corrupt_order_falls_back_to_identity() {
        let mut store = SettingsStore::new();
        let column = |index, display_order| ColumnSettings {
            index,
            user_id: 0,
            width_or_weight: 10.0,
            display_order,
            sort_order: None,
            sort_direction: None,
            is_enabled: true,
            is_stretch: false,
        };
        store.insert(TableSettings {
            id: 42,
            save_flags: TableFlags::REORDERABLE.bits(),
            ref_scale: 0.0,
            columns: vec![column(0, 1), column(1, 1), column(7, 0)],
        });

        let mut table = table_with(2, TableFlags::REORDERABLE);
        table.load_settings(&store);
        assert!(table.display_order.is_identity());
        assert!(table.display_order.is_consistent());
    }

    #[test]
    fn test_no_saved_settings_skips_store() {
        let mut table = table_with(1, TableFlags::NO_SAVED_SETTINGS);
        let mut store = SettingsStore::new();
        table.is_settings_dirty = true;
        table.save_settings(&mut store);
        assert!(store.is_empty());
        assert!(!table.is_settings_dirty);
    }

    #[test]
    fn test_path_round_trip() {
        let mut table = table_with(1, TableFlags::RESIZABLE);
        table.columns[0].width_request = 33.0;
        let mut store = SettingsStore::new();
        table.save_settings(&mut store);

        let path = std::env::temp_dir().join(format!("gridline-settings-{}.json", std::process::id()));
        store.save_to_path(&path).unwrap();
        let loaded = SettingsStore::load_from_path(&path).unwrap();
        let _ = std::fs::remove_file(&path);
        assert_eq!(loaded, store);
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        assert!(matches!(SettingsStore::from_json("{"), Err(SettingsError::Json(_))));
    }
}
