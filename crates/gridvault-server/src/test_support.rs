//! In-memory account and session stores plus router builders for tests.

use async_trait::async_trait;
use axum::Router;
use chrono::{DateTime, Utc};
use gridvault_core::{MemorySheetStore, SheetName, StoreError};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::auth::{Account, AccountError, AccountStore, SessionRecord, SessionStore};
use crate::config::Config;
use crate::AppState;

pub const TEST_SECRET: &str = "test-secret-that-is-long-enough-for-signing-cookies";

#[derive(Default)]
pub struct MemoryAccountStore {
    accounts: RwLock<HashMap<String, Account>>,
}

#[async_trait]
impl AccountStore for MemoryAccountStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<Account>, StoreError> {
        Ok(self.accounts.read().await.get(username).cloned())
    }

    async fn insert(&self, account: &Account) -> Result<(), AccountError> {
        let mut accounts = self.accounts.write().await;
        if accounts.contains_key(&account.username) {
            return Err(AccountError::UsernameTaken);
        }
        accounts.insert(account.username.clone(), account.clone());
        Ok(())
    }
}

#[derive(Default)]
pub struct MemorySessionStore {
    sessions: RwLock<HashMap<String, SessionRecord>>,
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn create(&self, session: &SessionRecord) -> Result<(), StoreError> {
        self.sessions
            .write()
            .await
            .insert(session.token.clone(), session.clone());
        Ok(())
    }

    async fn find(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<SessionRecord>, StoreError> {
        Ok(self
            .sessions
            .read()
            .await
            .get(token)
            .filter(|session| !session.is_expired(now))
            .cloned())
    }

    async fn set_active_sheet(&self, token: &str, sheet: &SheetName) -> Result<bool, StoreError> {
        match self.sessions.write().await.get_mut(token) {
            Some(session) => {
                session.active_sheet = Some(sheet.clone());
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, token: &str) -> Result<bool, StoreError> {
        Ok(self.sessions.write().await.remove(token).is_some())
    }

    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<u64, StoreError> {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, session| !session.is_expired(now));
        Ok((before - sessions.len()) as u64)
    }
}

/// Configuration with test values; nothing connects to `DATABASE_URL`
pub fn test_config(require_auth: bool) -> Config {
    let require_auth = require_auth.to_string();
    Config::from_lookup(|key| match key {
        "DATABASE_URL" => Some("postgres://unused/gridvault".to_string()),
        "SESSION_SECRET" => Some(TEST_SECRET.to_string()),
        "SESSION_TTL_SECS" => Some("3600".to_string()),
        "REQUIRE_AUTH" => Some(require_auth.clone()),
        _ => None,
    })
    .expect("test configuration is valid")
}

/// Application state wired to in-memory stores
pub fn memory_state(require_auth: bool) -> AppState {
    AppState::new(
        Arc::new(MemorySheetStore::new()),
        Arc::new(MemoryAccountStore::default()),
        Arc::new(MemorySessionStore::default()),
        &test_config(require_auth),
    )
}

/// Full router over in-memory stores
pub fn memory_app(require_auth: bool) -> Router {
    crate::build_router(memory_state(require_auth))
}
