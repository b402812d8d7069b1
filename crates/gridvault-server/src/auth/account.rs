use async_trait::async_trait;
use gridvault_core::StoreError;
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

use super::password::{hash_password_blocking, verify_password_blocking};
use super::AccountError;

pub const MIN_USERNAME_LEN: usize = 3;
pub const MIN_PASSWORD_LEN: usize = 6;

/// Stored account
#[derive(Debug, Clone)]
pub struct Account {
    pub id: Uuid,
    pub username: String,
    pub password_hash: String,
}

/// Public view of an account
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserSummary {
    pub id: Uuid,
    pub username: String,
}

impl From<&Account> for UserSummary {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id,
            username: account.username.clone(),
        }
    }
}

/// Username and plaintext password taken from a request
#[derive(Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    /// Both fields must be present and non-empty
    pub fn from_fields(
        username: Option<String>,
        password: Option<String>,
    ) -> Result<Self, AccountError> {
        match (username, password) {
            (Some(username), Some(password)) if !username.is_empty() && !password.is_empty() => {
                Ok(Self { username, password })
            }
            _ => Err(AccountError::MissingField),
        }
    }

    /// Length rules applied to new accounts
    pub fn validate_new(&self) -> Result<(), AccountError> {
        if self.username.chars().count() < MIN_USERNAME_LEN {
            return Err(AccountError::UsernameTooShort);
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AccountError::PasswordTooShort);
        }
        Ok(())
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Persistence port for accounts
#[async_trait]
pub trait AccountStore: Send + Sync {
    async fn find_by_username(&self, username: &str) -> Result<Option<Account>, StoreError>;

    /// Insert a new account. A taken username is reported as
    /// [`AccountError::UsernameTaken`] by the store's uniqueness constraint.
    async fn insert(&self, account: &Account) -> Result<(), AccountError>;
}

/// Signup and login on top of an [`AccountStore`]
#[derive(Clone)]
pub struct AccountService {
    store: Arc<dyn AccountStore>,
}

impl AccountService {
    pub fn new(store: Arc<dyn AccountStore>) -> Self {
        Self { store }
    }

    /// Create an account after validating lengths and hashing the password
    pub async fn signup(&self, credentials: Credentials) -> Result<Account, AccountError> {
        credentials.validate_new()?;

        let Credentials { username, password } = credentials;
        let account = Account {
            id: Uuid::new_v4(),
            username,
            password_hash: hash_password_blocking(password).await?,
        };
        self.store.insert(&account).await?;

        tracing::info!(username = %account.username, account_id = %account.id, "account created");
        Ok(account)
    }

    /// Check credentials and return the matching account
    pub async fn login(&self, credentials: Credentials) -> Result<Account, AccountError> {
        let account = self
            .store
            .find_by_username(&credentials.username)
            .await?
            .ok_or(AccountError::UnknownUser)?;

        let matches =
            verify_password_blocking(credentials.password, account.password_hash.clone()).await?;
        if !matches {
            tracing::info!(username = %account.username, "login rejected");
            return Err(AccountError::InvalidCredentials);
        }
        Ok(account)
    }
}
