use chrono::{DateTime, Utc};
use gridvault_core::{CellEntry, SheetName, StoreError, TableSnapshot};
use sqlx::types::Json;
use uuid::Uuid;

use crate::auth::{Account, SessionRecord};

/// Account database model
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AccountRow {
    pub id: Uuid,
    pub username: String,
    pub password_hash: String,
}

impl From<AccountRow> for Account {
    fn from(row: AccountRow) -> Self {
        Self {
            id: row.id,
            username: row.username,
            password_hash: row.password_hash,
        }
    }
}

/// Stored table snapshot
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct TableRow {
    pub row_count: i64,
    pub column_count: i64,
    pub cells: Json<Vec<CellEntry>>,
}

impl TryFrom<TableRow> for TableSnapshot {
    type Error = StoreError;

    fn try_from(row: TableRow) -> Result<Self, Self::Error> {
        Ok(TableSnapshot::new(
            u32::try_from(row.row_count).map_err(StoreError::backend)?,
            u32::try_from(row.column_count).map_err(StoreError::backend)?,
            row.cells.0,
        ))
    }
}

/// Session database model
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct SessionRow {
    pub token: String,
    pub account_id: Uuid,
    pub username: String,
    pub active_sheet: Option<String>,
    pub expires_at: DateTime<Utc>,
}

impl From<SessionRow> for SessionRecord {
    fn from(row: SessionRow) -> Self {
        Self {
            token: row.token,
            account_id: row.account_id,
            username: row.username,
            // an empty stored name is treated as "never selected"
            active_sheet: row.active_sheet.and_then(|s| SheetName::parse(s).ok()),
            expires_at: row.expires_at,
        }
    }
}
