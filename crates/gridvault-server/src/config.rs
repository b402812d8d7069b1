use anyhow::{anyhow, bail, Context};
use chrono::Utc;
use std::env;
use std::time::Duration;

use crate::auth::session::expiry_after;

/// Minimum length of the cookie signing secret in bytes
pub const MIN_SECRET_LEN: usize = 32;

/// Server configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Server host address
    pub host: String,
    /// Server port
    pub port: u16,
    /// Database connection URL
    pub database_url: String,
    /// Maximum pooled database connections
    pub db_max_connections: u32,
    /// How long to wait for a database connection before failing
    pub db_connect_timeout: Duration,
    /// Key material for signing session cookies
    pub session_secret: String,
    /// Session lifetime
    pub session_ttl: Duration,
    /// Mark the session cookie `Secure`
    pub secure_cookies: bool,
    /// Reject sheet and table requests that carry no live session
    pub require_auth: bool,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port = parse_or(&lookup, "PORT", 3000u16)?;

        let database_url = lookup("DATABASE_URL")
            .filter(|v| !v.is_empty())
            .ok_or_else(|| anyhow!("DATABASE_URL must be set"))?;
        let db_max_connections = parse_or(&lookup, "DB_MAX_CONNECTIONS", 10u32)?;
        let db_connect_timeout =
            Duration::from_secs(parse_or(&lookup, "DB_CONNECT_TIMEOUT_SECS", 5u64)?);

        let session_secret = lookup("SESSION_SECRET")
            .filter(|v| !v.is_empty())
            .ok_or_else(|| anyhow!("SESSION_SECRET must be set"))?;
        if session_secret.len() < MIN_SECRET_LEN {
            bail!("SESSION_SECRET must be at least {MIN_SECRET_LEN} bytes");
        }
        let session_ttl =
            Duration::from_secs(parse_or(&lookup, "SESSION_TTL_SECS", 14 * 24 * 60 * 60u64)?);
        if expiry_after(Utc::now(), session_ttl).is_none() {
            bail!("SESSION_TTL_SECS out of range: {}", session_ttl.as_secs());
        }

        let production = lookup("APP_ENV").is_some_and(|v| v.eq_ignore_ascii_case("production"));
        let secure_cookies = match lookup("COOKIE_SECURE") {
            Some(raw) => parse_flag("COOKIE_SECURE", &raw)?,
            None => production,
        };
        let require_auth = match lookup("REQUIRE_AUTH") {
            Some(raw) => parse_flag("REQUIRE_AUTH", &raw)?,
            None => false,
        };

        Ok(Self {
            host,
            port,
            database_url,
            db_max_connections,
            db_connect_timeout,
            session_secret,
            session_ttl,
            secure_cookies,
            require_auth,
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> anyhow::Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("invalid value for {key}: {raw:?}")),
        None => Ok(default),
    }
}

fn parse_flag(key: &str, raw: &str) -> anyhow::Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => bail!("invalid value for {key}: {raw:?}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    const SECRET: &str = "0123456789abcdef0123456789abcdef";

    fn config(vars: &[(&str, &str)]) -> anyhow::Result<Config> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config(&[
            ("DATABASE_URL", "postgres://localhost/grid"),
            ("SESSION_SECRET", SECRET),
        ])
        .unwrap();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 3000);
        assert_eq!(config.db_connect_timeout, Duration::from_secs(5));
        assert_eq!(config.session_ttl, Duration::from_secs(1_209_600));
        assert!(!config.secure_cookies);
        assert!(!config.require_auth);
    }

    #[test]
    fn test_missing_database_url_fails() {
        let err = config(&[("SESSION_SECRET", SECRET)]).unwrap_err();
        assert!(err.to_string().contains("DATABASE_URL"));
    }

    #[test]
    fn test_missing_or_short_secret_fails() {
        assert!(config(&[("DATABASE_URL", "postgres://localhost/grid")]).is_err());
        let err = config(&[
            ("DATABASE_URL", "postgres://localhost/grid"),
            ("SESSION_SECRET", "short"),
        ])
        .unwrap_err();
        assert!(err.to_string().contains("at least"));
    }

    #[test]
    fn test_production_turns_on_secure_cookies() {
        let config = config(&[
            ("DATABASE_URL", "postgres://localhost/grid"),
            ("SESSION_SECRET", SECRET),
            ("APP_ENV", "production"),
        ])
        .unwrap();
        assert!(config.secure_cookies);
    }

    #[test]
    fn test_explicit_cookie_flag_wins() {
        let config = config(&[
            ("DATABASE_URL", "postgres://localhost/grid"),
            ("SESSION_SECRET", SECRET),
            ("APP_ENV", "production"),
            ("COOKIE_SECURE", "false"),
            ("REQUIRE_AUTH", "1"),
        ])
        .unwrap();
        assert!(!config.secure_cookies);
        assert!(config.require_auth);
    }

    #[test]
    fn test_bad_port_fails() {
        let err = config(&[
            ("DATABASE_URL", "postgres://localhost/grid"),
            ("SESSION_SECRET", SECRET),
            ("PORT", "eighty"),
        ])
        .unwrap_err();
        assert!(err.to_string().contains("PORT"));
    }

    #[test]
    fn test_huge_session_ttl_fails() {
        let err = config(&[
            ("DATABASE_URL", "postgres://localhost/grid"),
            ("SESSION_SECRET", SECRET),
            ("SESSION_TTL_SECS", "10000000000000"),
        ])
        .unwrap_err();
        assert!(err.to_string().contains("SESSION_TTL_SECS"));
    }
}
