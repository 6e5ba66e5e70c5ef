//! Runtime settings from the environment (`.env` honored by the binary).

use crate::error::ConfigError;
use std::str::FromStr;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
pub const DEFAULT_TOKEN_TTL_HOURS: i64 = 10_000;
pub const DEFAULT_MAX_BODY_BYTES: usize = 1024 * 1024;
pub const DEFAULT_DB_MAX_CONNECTIONS: u32 = 5;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StorageBackend {
    Postgres,
    Memory,
}

impl FromStr for StorageBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(StorageBackend::Postgres),
            "memory" => Ok(StorageBackend::Memory),
            other => Err(format!("unknown backend '{}', expected postgres or memory", other)),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Settings {
    pub storage: StorageBackend,
    /// Required when `storage` is postgres.
    pub database_url: Option<String>,
    pub bind_addr: String,
    pub jwt_secret: String,
    pub token_ttl_hours: i64,
    pub bcrypt_cost: u32,
    pub max_body_bytes: usize,
    pub db_max_connections: u32,
}

impl Settings {
    /// Read from process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read through `lookup`; empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let storage = parsed(&get, "STORAGE_BACKEND")?.unwrap_or(StorageBackend::Postgres);
        let database_url = get("DATABASE_URL");
        if storage == StorageBackend::Postgres && database_url.is_none() {
            return Err(ConfigError::Setting {
                name: "DATABASE_URL",
                detail: "required for the postgres backend".into(),
            });
        }
        let jwt_secret = get("JWT_SECRET").ok_or(ConfigError::Setting {
            name: "JWT_SECRET",
            detail: "must be set".into(),
        })?;

        let token_ttl_hours = parsed(&get, "TOKEN_TTL_HOURS")?.unwrap_or(DEFAULT_TOKEN_TTL_HOURS);
        if token_ttl_hours <= 0 {
            return Err(ConfigError::Setting {
                name: "TOKEN_TTL_HOURS",
                detail: "must be positive".into(),
            });
        }
        let expiry_fits = chrono::Duration::try_hours(token_ttl_hours)
            .and_then(|ttl| chrono::Utc::now().checked_add_signed(ttl))
            .is_some();
        if !expiry_fits {
            return Err(ConfigError::Setting {
                name: "TOKEN_TTL_HOURS",
                detail: "too large to compute an expiry".into(),
            });
        }
        let bcrypt_cost = parsed(&get, "BCRYPT_COST")?.unwrap_or(bcrypt::DEFAULT_COST);
        if !(4..=31).contains(&bcrypt_cost) {
            return Err(ConfigError::Setting {
                name: "BCRYPT_COST",
                detail: "must be between 4 and 31".into(),
            });
        }

        Ok(Settings {
            storage,
            database_url,
            bind_addr: get("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string()),
            jwt_secret,
            token_ttl_hours,
            bcrypt_cost,
            max_body_bytes: parsed(&get, "MAX_BODY_BYTES")?.unwrap_or(DEFAULT_MAX_BODY_BYTES),
            db_max_connections: parsed(&get, "DB_MAX_CONNECTIONS")?.unwrap_or(DEFAULT_DB_MAX_CONNECTIONS),
        })
    }

    pub fn token_ttl(&self) -> chrono::Duration {
        chrono::Duration::try_hours(self.token_ttl_hours)
            .unwrap_or_else(|| chrono::Duration::hours(DEFAULT_TOKEN_TTL_HOURS))
    }
}

fn parsed<T>(get: &impl Fn(&str) -> Option<String>, name: &'static str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    get(name)
        .map(|v| {
            v.parse::<T>().map_err(|e| ConfigError::Setting {
                name,
                detail: e.to_string(),
            })
        })
        .transpose()
}
