use gridvault_core::{SheetName, StoreError};
use tokio::sync::RwLock;

use crate::auth::{CurrentSession, SessionManager};

/// Active sheet shared by every request that has no session
///
/// Starts at the default sentinel name and is not persisted. Concurrent
/// anonymous clients overwrite each other's selection; the last write wins.
pub struct ActiveSheet {
    current: RwLock<SheetName>,
}

impl ActiveSheet {
    pub fn new() -> Self {
        Self {
            current: RwLock::new(SheetName::default()),
        }
    }

    pub async fn select(&self, name: SheetName) {
        *self.current.write().await = name;
    }

    pub async fn current(&self) -> SheetName {
        self.current.read().await.clone()
    }
}

impl Default for ActiveSheet {
    fn default() -> Self {
        Self::new()
    }
}

/// Which pointer a selection was written to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionScope {
    Session,
    Shared,
}

/// Record a sheet selection for the caller.
///
/// Logged-in callers keep their selection in their session; everyone else
/// moves the shared pointer.
pub async fn select_sheet(
    shared: &ActiveSheet,
    sessions: &SessionManager,
    session: &CurrentSession,
    name: SheetName,
) -> Result<SelectionScope, StoreError> {
    if let Some(record) = session.record() {
        if sessions.select_sheet(record, &name).await? {
            return Ok(SelectionScope::Session);
        }
        tracing::debug!(username = %record.username, "session vanished while selecting sheet");
    }
    shared.select(name).await;
    Ok(SelectionScope::Shared)
}

/// Sheet a table read or write should target.
///
/// An explicitly named sheet wins, then the session's own selection, then the
/// shared pointer.
pub async fn target_sheet(
    shared: &ActiveSheet,
    session: &CurrentSession,
    explicit: Option<SheetName>,
) -> SheetName {
    if let Some(name) = explicit {
        return name;
    }
    if let Some(name) = session.record().and_then(|record| record.active_sheet.clone()) {
        return name;
    }
    shared.current().await
}
