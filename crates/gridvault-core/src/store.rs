use async_trait::async_trait;

use crate::error::StoreError;
use crate::name::SheetName;
use crate::registry::RegistryRecord;
use crate::table::TableSnapshot;

/// Result of removing a sheet from the registry and the table store together
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SheetRemoval {
    /// Whether the registry listed the name before removal
    pub unregistered: bool,
    /// Number of table documents deleted (0 or 1)
    pub tables_deleted: u64,
}

/// Persistence port for the sheet registry and per-sheet tables
///
/// Implementations own two aggregates: the singleton registry record and one
/// table snapshot per sheet name. Nothing at this level enforces that a table
/// belongs to a registered sheet.
#[async_trait]
pub trait SheetStore: Send + Sync {
    /// Load the registry record, `None` if no sheet was ever added
    async fn load_registry(&self) -> Result<Option<RegistryRecord>, StoreError>;

    /// Append a name to the registry, creating the record if needed.
    /// Returns `false` without writing when the name is already present.
    async fn register_sheet(&self, name: &SheetName) -> Result<bool, StoreError>;

    /// Remove a name from the registry and delete its table as one unit
    async fn remove_sheet(&self, name: &SheetName) -> Result<SheetRemoval, StoreError>;

    /// Fetch the table stored for a sheet
    async fn find_table(&self, name: &SheetName) -> Result<Option<TableSnapshot>, StoreError>;

    /// Create or fully replace the table stored for a sheet
    async fn upsert_table(&self, name: &SheetName, table: &TableSnapshot)
        -> Result<(), StoreError>;

    /// Delete the table stored for a sheet, returning how many were removed
    async fn delete_table(&self, name: &SheetName) -> Result<u64, StoreError>;
}
