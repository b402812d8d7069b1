use async_trait::async_trait;
use axum_extra::extract::cookie::{Cookie, SameSite};
use chrono::{DateTime, Utc};
use gridvault_core::{SheetName, StoreError};
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

use super::account::{Account, UserSummary};

/// Name of the cookie carrying the session token
pub const SESSION_COOKIE: &str = "gridvault.sid";

/// Server-side session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionRecord {
    pub token: String,
    pub account_id: Uuid,
    pub username: String,
    /// Sheet selected by this session, if it ever selected one
    pub active_sheet: Option<SheetName>,
    pub expires_at: DateTime<Utc>,
}

impl SessionRecord {
    pub fn user(&self) -> UserSummary {
        UserSummary {
            id: self.account_id,
            username: self.username.clone(),
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

/// Expiry of a session opened at `now`, or `None` if the instant is not representable
pub fn expiry_after(now: DateTime<Utc>, ttl: Duration) -> Option<DateTime<Utc>> {
    let ttl = chrono::Duration::from_std(ttl).ok()?;
    now.checked_add_signed(ttl)
}

/// Persistence port for sessions
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn create(&self, session: &SessionRecord) -> Result<(), StoreError>;

    /// Live session for a token; expired entries are reported as absent
    async fn find(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<SessionRecord>, StoreError>;

    /// Store the sheet a session selected, returning `false` if the session is gone
    async fn set_active_sheet(&self, token: &str, sheet: &SheetName) -> Result<bool, StoreError>;

    async fn delete(&self, token: &str) -> Result<bool, StoreError>;

    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<u64, StoreError>;
}

/// Issues, resolves and ends sessions and builds their cookies
#[derive(Clone)]
pub struct SessionManager {
    store: Arc<dyn SessionStore>,
    ttl: Duration,
    secure_cookies: bool,
}

impl SessionManager {
    pub fn new(store: Arc<dyn SessionStore>, ttl: Duration, secure_cookies: bool) -> Self {
        Self {
            store,
            ttl,
            secure_cookies,
        }
    }

    /// Open a session for a freshly authenticated account
    pub async fn start(&self, account: &Account) -> Result<SessionRecord, StoreError> {
        let expires_at = expiry_after(Utc::now(), self.ttl)
            .ok_or_else(|| StoreError::backend("session expiry out of range"))?;
        let session = SessionRecord {
            token: Uuid::new_v4().to_string(),
            account_id: account.id,
            username: account.username.clone(),
            active_sheet: None,
            expires_at,
        };
        self.store.create(&session).await?;
        tracing::info!(username = %session.username, "session started");
        Ok(session)
    }

    /// Look up a token. Unknown and expired tokens both yield `None`.
    pub async fn resolve(&self, token: &str) -> Result<Option<SessionRecord>, StoreError> {
        self.store.find(token, Utc::now()).await
    }

    /// Remember the sheet a session selected
    pub async fn select_sheet(
        &self,
        session: &SessionRecord,
        sheet: &SheetName,
    ) -> Result<bool, StoreError> {
        self.store.set_active_sheet(&session.token, sheet).await
    }

    pub async fn end(&self, token: &str) -> Result<bool, StoreError> {
        self.store.delete(token).await
    }

    pub async fn purge_expired(&self) -> Result<u64, StoreError> {
        self.store.purge_expired(Utc::now()).await
    }

    /// Cookie handing the session token to the browser
    pub fn cookie(&self, session: &SessionRecord) -> Cookie<'static> {
        let max_age =
            time::Duration::seconds(i64::try_from(self.ttl.as_secs()).unwrap_or(i64::MAX));
        Cookie::build((SESSION_COOKIE, session.token.clone()))
            .path("/")
            .http_only(true)
            .secure(self.secure_cookies)
            .same_site(SameSite::Lax)
            .max_age(max_age)
            .build()
    }

    /// Cookie used to clear the session token
    pub fn removal_cookie(&self) -> Cookie<'static> {
        Cookie::build(SESSION_COOKIE).path("/").build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::MemorySessionStore;

    fn account() -> Account {
        Account {
            id: Uuid::new_v4(),
            username: "alice".into(),
            password_hash: "irrelevant".into(),
        }
    }

    fn manager(ttl: Duration) -> SessionManager {
        SessionManager::new(Arc::new(MemorySessionStore::default()), ttl, true)
    }

    #[tokio::test]
    async fn test_start_and_resolve() {
        let sessions = manager(Duration::from_secs(60));
        let started = sessions.start(&account()).await.unwrap();

        let resolved = sessions.resolve(&started.token).await.unwrap().unwrap();
        assert_eq!(resolved, started);
        assert!(resolved.active_sheet.is_none());
    }

    #[tokio::test]
    async fn test_unknown_token_is_not_an_error() {
        let sessions = manager(Duration::from_secs(60));
        assert!(sessions.resolve("no-such-token").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_expired_session_is_absent_and_purged() {
        let sessions = manager(Duration::ZERO);
        let started = sessions.start(&account()).await.unwrap();

        assert!(sessions.resolve(&started.token).await.unwrap().is_none());
        assert_eq!(sessions.purge_expired().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_select_sheet_is_stored_per_session() {
        let sessions = manager(Duration::from_secs(60));
        let first = sessions.start(&account()).await.unwrap();
        let second = sessions.start(&account()).await.unwrap();
        let budget = SheetName::parse("Budget").unwrap();

        assert!(sessions.select_sheet(&first, &budget).await.unwrap());

        let first = sessions.resolve(&first.token).await.unwrap().unwrap();
        let second = sessions.resolve(&second.token).await.unwrap().unwrap();
        assert_eq!(first.active_sheet, Some(budget));
        assert_eq!(second.active_sheet, None);
    }

    #[tokio::test]
    async fn test_end_session() {
        let sessions = manager(Duration::from_secs(60));
        let started = sessions.start(&account()).await.unwrap();

        assert!(sessions.end(&started.token).await.unwrap());
        assert!(!sessions.end(&started.token).await.unwrap());
        assert!(sessions.resolve(&started.token).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_unrepresentable_expiry_is_an_error() {
        let sessions = manager(Duration::from_secs(10_000_000_000_000));
        assert!(sessions.start(&account()).await.is_err());
    }

    #[test]
    fn test_expiry_after() {
        let now = Utc::now();
        assert_eq!(
            expiry_after(now, Duration::from_secs(60)),
            Some(now + chrono::Duration::seconds(60))
        );
        assert_eq!(expiry_after(now, Duration::from_secs(u64::MAX)), None);
        assert_eq!(expiry_after(now, Duration::from_secs(10_000_000_000_000)), None);
    }

    #[tokio::test]
    async fn test_cookie_attributes() {
        let sessions = manager(Duration::from_secs(3600));
        let started = sessions.start(&account()).await.unwrap();
        let cookie = sessions.cookie(&started);

        assert_eq!(cookie.name(), SESSION_COOKIE);
        assert_eq!(cookie.value(), started.token);
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.secure(), Some(true));
        assert_eq!(cookie.max_age(), Some(time::Duration::seconds(3600)));
    }
}
