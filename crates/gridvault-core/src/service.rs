use std::sync::Arc;

use crate::error::SheetError;
use crate::name::SheetName;
use crate::store::{SheetRemoval, SheetStore};
use crate::table::TableSnapshot;

/// Sheet registry and table operations on top of a [`SheetStore`]
///
/// The service never decides which sheet is active. Callers resolve the
/// target name first and pass it in.
#[derive(Clone)]
pub struct SheetService {
    store: Arc<dyn SheetStore>,
}

impl SheetService {
    pub fn new(store: Arc<dyn SheetStore>) -> Self {
        Self { store }
    }

    /// Register a new sheet name
    pub async fn add_sheet(&self, name: &SheetName) -> Result<(), SheetError> {
        if !self.store.register_sheet(name).await? {
            return Err(SheetError::AlreadyExists(name.to_string()));
        }
        tracing::info!(sheet = %name, "sheet added");
        Ok(())
    }

    /// Registered sheet names in insertion order
    pub async fn list_sheets(&self) -> Result<Vec<String>, SheetError> {
        Ok(self
            .store
            .load_registry()
            .await?
            .map(|registry| registry.into_names())
            .unwrap_or_default())
    }

    /// Unregister a sheet and delete its table.
    ///
    /// The registry entry goes away whether or not a table existed; the call
    /// only reports `NotFound` when no table was deleted.
    pub async fn remove_sheet(&self, name: &SheetName) -> Result<SheetRemoval, SheetError> {
        let removal = self.store.remove_sheet(name).await?;
        if removal.tables_deleted == 0 {
            tracing::debug!(
                sheet = %name,
                unregistered = removal.unregistered,
                "no table stored for removed sheet"
            );
            return Err(SheetError::NotFound(name.to_string()));
        }
        tracing::info!(sheet = %name, "sheet deleted");
        Ok(removal)
    }

    /// Table stored for a sheet, or the blank 5x5 grid
    pub async fn table(&self, name: &SheetName) -> Result<TableSnapshot, SheetError> {
        Ok(self.store.find_table(name).await?.unwrap_or_default())
    }

    /// Replace the table stored for a sheet
    pub async fn save_table(
        &self,
        name: &SheetName,
        table: &TableSnapshot,
    ) -> Result<(), SheetError> {
        let outside = table.out_of_bounds();
        if outside > 0 {
            tracing::debug!(sheet = %name, cells = outside, "saving cells outside declared grid");
        }
        self.store.upsert_table(name, table).await?;
        tracing::debug!(
            sheet = %name,
            rows = table.rows,
            columns = table.columns,
            cells = table.cells.len(),
            "table saved"
        );
        Ok(())
    }

    /// Delete a sheet's table without touching the registry
    pub async fn delete_table(&self, name: &SheetName) -> Result<u64, SheetError> {
        Ok(self.store.delete_table(name).await?)
    }
}
