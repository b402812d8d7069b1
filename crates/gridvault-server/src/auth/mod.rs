//! Accounts, password hashing and server-side sessions.

pub mod account;
pub mod extract;
pub mod password;
pub mod session;

use gridvault_core::StoreError;
use thiserror::Error;

pub use account::{Account, AccountService, AccountStore, Credentials, UserSummary};
pub use extract::CurrentSession;
pub use session::{SessionManager, SessionRecord, SessionStore, SESSION_COOKIE};

/// Errors raised by signup and login
#[derive(Error, Debug)]
pub enum AccountError {
    #[error("Username and password are required!")]
    MissingField,

    #[error("Username must be at least 3 characters long")]
    UsernameTooShort,

    #[error("Password must be at least 6 characters long")]
    PasswordTooShort,

    #[error("Username is already taken")]
    UsernameTaken,

    #[error("User not found")]
    UnknownUser,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("password hashing failed: {0}")]
    Hashing(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}
