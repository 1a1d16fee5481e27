//! Runtime configuration from environment variables (after `.env` is loaded).
//!
//! - `DATABASE_URL`: PostgreSQL connection string (default `postgres://localhost/pet_store`)
//! - `BIND_ADDR`: listen address (default `0.0.0.0:3000`)
//! - `DATABASE_MAX_CONNECTIONS`: pool size (default 5)
//! - `PET_STORE_SCHEMA`: schema holding the tables (default `pet_store`)
//! - `PET_STORE_DELETE_POLICY`: `cascade` or `restrict` (default `cascade`)
//! - `PET_STORE_STORAGE`: `postgres` or `memory` (default `postgres`)

use crate::error::ConfigError;
use serde::Serialize;
use std::net::SocketAddr;
use std::str::FromStr;

const DEFAULT_DATABASE_URL: &str = "postgres://localhost/pet_store";
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_MAX_CONNECTIONS: u32 = 5;
const DEFAULT_SCHEMA: &str = "pet_store";

/// What deleting a store does to the records that hang off it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DeletePolicy {
    /// Delete the store's employees and detach its customers; customers are kept.
    #[default]
    Cascade,
    /// Refuse to delete a store that still has employees or customers.
    Restrict,
}

impl FromStr for DeletePolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "cascade" => Ok(DeletePolicy::Cascade),
            "restrict" => Ok(DeletePolicy::Restrict),
            _ => Err(ConfigError::Invalid {
                key: "PET_STORE_DELETE_POLICY",
                value: s.to_string(),
                reason: "expected cascade or restrict",
            }),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageKind {
    #[default]
    Postgres,
    Memory,
}

impl FromStr for StorageKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(StorageKind::Postgres),
            "memory" => Ok(StorageKind::Memory),
            _ => Err(ConfigError::Invalid {
                key: "PET_STORE_STORAGE",
                value: s.to_string(),
                reason: "expected postgres or memory",
            }),
        }
    }
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub database_url: String,
    pub bind_addr: SocketAddr,
    pub max_connections: u32,
    pub schema: String,
    pub delete_policy: DeletePolicy,
    pub storage: StorageKind,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build config from any key lookup; unset or empty keys take their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let bind_raw = get("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.into());
        let bind_addr: SocketAddr = bind_raw.parse().map_err(|_| ConfigError::Invalid {
            key: "BIND_ADDR",
            value: bind_raw.clone(),
            reason: "expected host:port",
        })?;

        let max_connections = match get("DATABASE_MAX_CONNECTIONS") {
            Some(v) => v.parse::<u32>().ok().filter(|n| *n > 0).ok_or(ConfigError::Invalid {
                key: "DATABASE_MAX_CONNECTIONS",
                value: v,
                reason: "expected a positive integer",
            })?,
            None => DEFAULT_MAX_CONNECTIONS,
        };

        let schema = get("PET_STORE_SCHEMA").unwrap_or_else(|| DEFAULT_SCHEMA.into());
        if !is_plain_identifier(&schema) {
            return Err(ConfigError::Invalid {
                key: "PET_STORE_SCHEMA",
                value: schema,
                reason: "expected lowercase letters, digits and underscores",
            });
        }

        Ok(AppConfig {
            database_url: get("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.into()),
            bind_addr,
            max_connections,
            schema,
            delete_policy: get("PET_STORE_DELETE_POLICY")
                .map(|v| v.parse())
                .transpose()?
                .unwrap_or_default(),
            storage: get("PET_STORE_STORAGE")
                .map(|v| v.parse())
                .transpose()?
                .unwrap_or_default(),
        })
    }
}

/// Schema names are spliced into DDL, so only `[a-z_][a-z0-9_]*` is accepted.
fn is_plain_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_lowercase() || c == '_')
        && chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
}
