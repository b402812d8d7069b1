pub mod models;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use gridvault_core::{
    RegistryRecord, SheetName, SheetRemoval, SheetStore, StoreError, TableSnapshot, REGISTRY_KEY,
};
use sqlx::{postgres::PgPoolOptions, types::Json, PgPool};

use crate::auth::{Account, AccountError, AccountStore, SessionRecord, SessionStore};
use crate::config::Config;
use models::{AccountRow, SessionRow, TableRow};

fn store_err(err: sqlx::Error) -> StoreError {
    StoreError::backend(err)
}

/// Database connection wrapper
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Connect to the database
    pub async fn connect(config: &Config) -> anyhow::Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(config.db_max_connections)
            .acquire_timeout(config.db_connect_timeout)
            .connect(&config.database_url)
            .await?;

        Ok(Self::from_pool(pool))
    }

    /// Wrap an existing pool
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Run database migrations
    pub async fn migrate(&self) -> anyhow::Result<()> {
        sqlx::migrate!("../../migrations").run(&self.pool).await?;
        Ok(())
    }
}

#[async_trait]
impl SheetStore for Database {
    async fn load_registry(&self) -> Result<Option<RegistryRecord>, StoreError> {
        let names: Option<(Vec<String>,)> =
            sqlx::query_as(r#"SELECT sheet_names FROM sheet_registry WHERE registry_key = $1"#)
                .bind(REGISTRY_KEY)
                .fetch_optional(&self.pool)
                .await
                .map_err(store_err)?;

        Ok(names.map(|(names,)| RegistryRecord::from_names(names)))
    }

    async fn register_sheet(&self, name: &SheetName) -> Result<bool, StoreError> {
        // No row comes back when the name is already listed
        let inserted: Option<(String,)> = sqlx::query_as(
            r#"
            INSERT INTO sheet_registry (registry_key, sheet_names)
            VALUES ($1, ARRAY[$2]::TEXT[])
            ON CONFLICT (registry_key)
            DO UPDATE SET sheet_names = array_append(sheet_registry.sheet_names, $2),
                          updated_at = NOW()
            WHERE NOT ($2 = ANY(sheet_registry.sheet_names))
            RETURNING registry_key
            "#,
        )
        .bind(REGISTRY_KEY)
        .bind(name.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(store_err)?;

        Ok(inserted.is_some())
    }

    async fn remove_sheet(&self, name: &SheetName) -> Result<SheetRemoval, StoreError> {
        let mut tx = self.pool.begin().await.map_err(store_err)?;

        let unregistered = sqlx::query(
            r#"
            UPDATE sheet_registry
            SET sheet_names = array_remove(sheet_names, $2), updated_at = NOW()
            WHERE registry_key = $1 AND $2 = ANY(sheet_names)
            "#,
        )
        .bind(REGISTRY_KEY)
        .bind(name.as_str())
        .execute(&mut *tx)
        .await
        .map_err(store_err)?
        .rows_affected()
            > 0;

        let tables_deleted = sqlx::query("DELETE FROM sheet_tables WHERE sheet_name = $1")
            .bind(name.as_str())
            .execute(&mut *tx)
            .await
            .map_err(store_err)?
            .rows_affected();

        tx.commit().await.map_err(store_err)?;

        Ok(SheetRemoval {
            unregistered,
            tables_deleted,
        })
    }

    async fn find_table(&self, name: &SheetName) -> Result<Option<TableSnapshot>, StoreError> {
        let row = sqlx::query_as::<_, TableRow>(
            r#"SELECT row_count, column_count, cells FROM sheet_tables WHERE sheet_name = $1"#,
        )
        .bind(name.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(store_err)?;

        row.map(TableSnapshot::try_from).transpose()
    }

    async fn upsert_table(
        &self,
        name: &SheetName,
        table: &TableSnapshot,
    ) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO sheet_tables (sheet_name, row_count, column_count, cells)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (sheet_name)
            DO UPDATE SET row_count = $2, column_count = $3, cells = $4, updated_at = NOW()
            "#,
        )
        .bind(name.as_str())
        .bind(i64::from(table.rows))
        .bind(i64::from(table.columns))
        .bind(Json(&table.cells))
        .execute(&self.pool)
        .await
        .map_err(store_err)?;

        Ok(())
    }

    async fn delete_table(&self, name: &SheetName) -> Result<u64, StoreError> {
        let result = sqlx::query("DELETE FROM sheet_tables WHERE sheet_name = $1")
            .bind(name.as_str())
            .execute(&self.pool)
            .await
            .map_err(store_err)?;

        Ok(result.rows_affected())
    }
}

#[async_trait]
impl AccountStore for Database {
    async fn find_by_username(&self, username: &str) -> Result<Option<Account>, StoreError> {
        let row = sqlx::query_as::<_, AccountRow>(
            r#"SELECT id, username, password_hash FROM accounts WHERE username = $1"#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(store_err)?;

        Ok(row.map(Into::into))
    }

    async fn insert(&self, account: &Account) -> Result<(), AccountError> {
        let result = sqlx::query(
            r#"INSERT INTO accounts (id, username, password_hash) VALUES ($1, $2, $3)"#,
        )
        .bind(account.id)
        .bind(&account.username)
        .bind(&account.password_hash)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
                Err(AccountError::UsernameTaken)
            }
            Err(e) => Err(AccountError::Store(store_err(e))),
        }
    }
}

#[async_trait]
impl SessionStore for Database {
    async fn create(&self, session: &SessionRecord) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO sessions (token, account_id, username, active_sheet, expires_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(&session.token)
        .bind(session.account_id)
        .bind(&session.username)
        .bind(session.active_sheet.as_ref().map(SheetName::as_str))
        .bind(session.expires_at)
        .execute(&self.pool)
        .await
        .map_err(store_err)?;

        Ok(())
    }

    async fn find(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<SessionRecord>, StoreError> {
        let row = sqlx::query_as::<_, SessionRow>(
            r#"
            SELECT token, account_id, username, active_sheet, expires_at
            FROM sessions
            WHERE token = $1 AND expires_at > $2
            "#,
        )
        .bind(token)
        .bind(now)
        .fetch_optional(&self.pool)
        .await
        .map_err(store_err)?;

        Ok(row.map(Into::into))
    }

    async fn set_active_sheet(&self, token: &str, sheet: &SheetName) -> Result<bool, StoreError> {
        let result = sqlx::query("UPDATE sessions SET active_sheet = $2 WHERE token = $1")
            .bind(token)
            .bind(sheet.as_str())
            .execute(&self.pool)
            .await
            .map_err(store_err)?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, token: &str) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM sessions WHERE token = $1")
            .bind(token)
            .execute(&self.pool)
            .await
            .map_err(store_err)?;

        Ok(result.rows_affected() > 0)
    }

    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<u64, StoreError> {
        let result = sqlx::query("DELETE FROM sessions WHERE expires_at <= $1")
            .bind(now)
            .execute(&self.pool)
            .await
            .map_err(store_err)?;

        Ok(result.rows_affected())
    }
}
