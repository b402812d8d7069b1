use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::error::StoreError;
use crate::name::SheetName;
use crate::registry::RegistryRecord;
use crate::store::{SheetRemoval, SheetStore};
use crate::table::TableSnapshot;

#[derive(Default)]
struct MemoryState {
    registry: Option<RegistryRecord>,
    tables: HashMap<SheetName, TableSnapshot>,
}

/// Process-local sheet store
///
/// Everything lives behind one lock, so a sheet removal updates the registry
/// and drops the table without any other request observing the halfway state.
/// Data is lost when the process exits.
#[derive(Default)]
pub struct MemorySheetStore {
    state: RwLock<MemoryState>,
}

impl MemorySheetStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored tables
    pub async fn table_count(&self) -> usize {
        self.state.read().await.tables.len()
    }
}

#[async_trait]
impl SheetStore for MemorySheetStore {
    async fn load_registry(&self) -> Result<Option<RegistryRecord>, StoreError> {
        Ok(self.state.read().await.registry.clone())
    }

    async fn register_sheet(&self, name: &SheetName) -> Result<bool, StoreError> {
        let mut state = self.state.write().await;
        Ok(state
            .registry
            .get_or_insert_with(RegistryRecord::new)
            .insert(name))
    }

    async fn remove_sheet(&self, name: &SheetName) -> Result<SheetRemoval, StoreError> {
        let mut state = self.state.write().await;
        let unregistered = state
            .registry
            .as_mut()
            .map(|registry| registry.remove(name))
            .unwrap_or(false);
        let tables_deleted = u64::from(state.tables.remove(name).is_some());

        Ok(SheetRemoval {
            unregistered,
            tables_deleted,
        })
    }

    async fn find_table(&self, name: &SheetName) -> Result<Option<TableSnapshot>, StoreError> {
        Ok(self.state.read().await.tables.get(name).cloned())
    }

    async fn upsert_table(
        &self,
        name: &SheetName,
        table: &TableSnapshot,
    ) -> Result<(), StoreError> {
        self.state
            .write()
            .await
            .tables
            .insert(name.clone(), table.clone());
        Ok(())
    }

    async fn delete_table(&self, name: &SheetName) -> Result<u64, StoreError> {
        let removed = self.state.write().await.tables.remove(name);
        Ok(u64::from(removed.is_some()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::CellEntry;

    fn name(s: &str) -> SheetName {
        SheetName::parse(s).unwrap()
    }

    #[tokio::test]
    async fn test_registry_created_lazily() {
        let store = MemorySheetStore::new();
        assert!(store.load_registry().await.unwrap().is_none());

        assert!(store.register_sheet(&name("Budget")).await.unwrap());
        let registry = store.load_registry().await.unwrap().unwrap();
        assert_eq!(registry.names(), ["Budget"]);
    }

    #[tokio::test]
    async fn test_upsert_replaces_whole_table() {
        let store = MemorySheetStore::new();
        let sheet = name("Budget");

        let cells = vec![CellEntry::new(0, 0, "a"), CellEntry::new(1, 1, "b")];
        let first = TableSnapshot::new(3, 3, cells);
        store.upsert_table(&sheet, &first).await.unwrap();

        let second = TableSnapshot::new(4, 2, vec![CellEntry::new(2, 0, "c")]);
        store.upsert_table(&sheet, &second).await.unwrap();

        assert_eq!(store.find_table(&sheet).await.unwrap(), Some(second));
        assert_eq!(store.table_count().await, 1);
    }

    #[tokio::test]
    async fn test_delete_table_reports_count() {
        let store = MemorySheetStore::new();
        let sheet = name("Budget");
        assert_eq!(store.delete_table(&sheet).await.unwrap(), 0);

        store.upsert_table(&sheet, &TableSnapshot::blank()).await.unwrap();
        assert_eq!(store.delete_table(&sheet).await.unwrap(), 1);
        assert_eq!(store.delete_table(&sheet).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_remove_sheet_touches_both_aggregates() {
        let store = MemorySheetStore::new();
        let sheet = name("Budget");
        store.register_sheet(&sheet).await.unwrap();
        store.upsert_table(&sheet, &TableSnapshot::blank()).await.unwrap();

        let removal = store.remove_sheet(&sheet).await.unwrap();
        assert_eq!(
            removal,
            SheetRemoval {
                unregistered: true,
                tables_deleted: 1
            }
        );
        assert!(store.load_registry().await.unwrap().unwrap().is_empty());
        assert!(store.find_table(&sheet).await.unwrap().is_none());
    }
}
